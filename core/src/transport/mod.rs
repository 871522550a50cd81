use std::{fmt::Display, sync::Arc};

use crate::prelude::{ReqAuthenticateField, ReqUserLoginField, RequestId, ResumeType, TraderSpi, UserLogoutField};

/// Boundary with the vendor trader api. Wire protocol, session management, heartbeats,
/// reconnection and flow control all live behind this trait.
///
/// # Contract
/// * Initialization order is [Transport::register_spi], [Transport::subscribe_private_topic],
///   [Transport::subscribe_public_topic], [Transport::register_front], [Transport::init].
/// * `req_*` methods only queue the request and return right away. `0` means queued,
///   anything else is a vendor defined failure code. The response arrives later on the registered [TraderSpi]
///   from a thread owned by the transport, tagged with the same [RequestId].
/// * [Transport::release] is called at most once, nothing is called after it.
pub trait Transport: Display + Send + Sync + 'static {
    fn api_version(&self) -> String;
    fn register_spi(&mut self, spi: Arc<dyn TraderSpi>);
    fn subscribe_private_topic(&mut self, resume: ResumeType);
    fn subscribe_public_topic(&mut self, resume: ResumeType);
    fn register_front(&mut self, address: &str);
    /// Starts connecting in the background, reconnects on its own when `auto_reconnect` is set.
    fn init(&mut self, auto_reconnect: bool);
    fn release(&mut self);
    /// Trading day cached by the transport as `YYYYMMDD`, blank before the first login.
    fn trading_day(&self) -> String;

    fn req_authenticate(&self, req: &ReqAuthenticateField, request_id: RequestId) -> i32;
    fn req_user_login(&self, req: &ReqUserLoginField, request_id: RequestId) -> i32;
    fn req_user_logout(&self, req: &UserLogoutField, request_id: RequestId) -> i32;
}
