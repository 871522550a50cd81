use std::{
    fmt::{Debug, Display},
    sync::{
        atomic::{AtomicUsize, Ordering::Relaxed},
        Arc,
    },
};

use crate::{asserted_short_name, fmt_num, prelude::*};

/// Counts notifications, useful in tests and as a cheap health probe.
/// `rsp` counts every response, `error` the ones carrying a non zero error id.
#[derive(Debug, Default)]
pub struct CounterSpi {
    connected: AtomicUsize,
    disconnected: AtomicUsize,
    heart_beat_warning: AtomicUsize,
    rsp: AtomicUsize,
    error: AtomicUsize,
}
impl CounterSpi {
    pub fn new_ref() -> Arc<Self> {
        Arc::new(Self::default())
    }
    #[inline(always)]
    pub fn connected_count(&self) -> usize {
        self.connected.load(Relaxed)
    }
    #[inline(always)]
    pub fn disconnected_count(&self) -> usize {
        self.disconnected.load(Relaxed)
    }
    #[inline(always)]
    pub fn heart_beat_warning_count(&self) -> usize {
        self.heart_beat_warning.load(Relaxed)
    }
    #[inline(always)]
    pub fn rsp_count(&self) -> usize {
        self.rsp.load(Relaxed)
    }
    #[inline(always)]
    pub fn error_count(&self) -> usize {
        self.error.load(Relaxed)
    }
    #[inline(always)]
    fn on_rsp(&self, info: Option<&RspInfoField>) {
        self.rsp.fetch_add(1, Relaxed);
        if info.map_or(false, RspInfoField::is_error) {
            self.error.fetch_add(1, Relaxed);
        }
    }
}

impl Display for CounterSpi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}<connected: {}, disconnected: {}, rsp: {}, error: {}>",
            asserted_short_name!("CounterSpi", Self),
            fmt_num!(self.connected_count()),
            fmt_num!(self.disconnected_count()),
            fmt_num!(self.rsp_count()),
            fmt_num!(self.error_count())
        )
    }
}

#[allow(unused_variables)]
impl TraderSpi for CounterSpi {
    fn on_front_connected(&self) {
        self.connected.fetch_add(1, Relaxed);
    }
    fn on_front_disconnected(&self, reason: DisconnectReason) {
        self.disconnected.fetch_add(1, Relaxed);
    }
    fn on_heart_beat_warning(&self, time_lapse: i32) {
        self.heart_beat_warning.fetch_add(1, Relaxed);
    }
    fn on_rsp_subscribe_flow_ctrl_warning(&self, rsp: Option<&SpecificTraderField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        self.on_rsp(info);
    }
    fn on_rsp_unsubscribe_flow_ctrl_warning(&self, rsp: Option<&SpecificTraderField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        self.on_rsp(info);
    }
    fn on_rsp_authenticate(&self, rsp: Option<&RspAuthenticateField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        self.on_rsp(info);
    }
    fn on_rsp_user_login(&self, rsp: Option<&RspUserLoginField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        self.on_rsp(info);
    }
    fn on_rsp_user_logout(&self, rsp: Option<&UserLogoutField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        self.on_rsp(info);
    }
    fn on_rsp_error(&self, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        self.on_rsp(info);
    }
}
