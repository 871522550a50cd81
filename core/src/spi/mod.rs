use std::fmt::{Debug, Display};

use crate::prelude::{DisconnectReason, RequestId, RspAuthenticateField, RspInfoField, RspUserLoginField, SpecificTraderField, UserLogoutField};

pub mod chain;
pub mod channel;
pub mod counter;
pub mod logger;

/// Receiver of every notification produced by a [crate::prelude::Transport].
///
/// # Important
/// The transport calls these methods on a thread it owns. Implementations must return quickly,
/// [channel::ChannelSpi] moves the work to another thread.
///
/// All methods default to no-op so an implementation only overrides what it needs.
#[allow(unused_variables)]
pub trait TraderSpi: Display + Debug + Send + Sync + 'static {
    /// Link to the front established, the client is not logged in yet.
    fn on_front_connected(&self) {}
    /// Link to the front lost, the transport reconnects on its own.
    fn on_front_disconnected(&self, reason: DisconnectReason) {}
    /// Nothing was received from the front for `time_lapse` seconds.
    fn on_heart_beat_warning(&self, time_lapse: i32) {}
    fn on_rsp_subscribe_flow_ctrl_warning(&self, rsp: Option<&SpecificTraderField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {}
    fn on_rsp_unsubscribe_flow_ctrl_warning(&self, rsp: Option<&SpecificTraderField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {}
    fn on_rsp_authenticate(&self, rsp: Option<&RspAuthenticateField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {}
    fn on_rsp_user_login(&self, rsp: Option<&RspUserLoginField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {}
    fn on_rsp_user_logout(&self, rsp: Option<&UserLogoutField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {}
    /// Error response not tied to a specific response type.
    fn on_rsp_error(&self, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {}
}
