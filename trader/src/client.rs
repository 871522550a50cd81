use std::{
    fmt::{Debug, Display},
    io::{Error, ErrorKind},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::channel,
        Arc,
    },
};

use chrono::NaiveDate;
use log::{debug, info, log_enabled, Level};

use crate::{
    config::TraderConfig,
    dispatcher::Dispatcher,
    pending::{PendingRequests, RequestKind, Ticket},
    prelude::*,
};

/// Trading client over a [Transport].
///
/// Every `req_*` call builds a fixed width request, tags it with the next [RequestId] and hands it to the transport.
/// It returns as soon as the transport queued the request. The reply arrives later on the dispatcher thread,
/// is routed to the returned [Ticket] and replayed on the application [TraderSpi].
///
/// # User id
/// The user id is given once to [TraderClient::req_authenticate] and recorded when that request is queued.
/// [TraderClient::req_user_login] and [TraderClient::req_user_logout] use the recorded value.
///
/// # Important
/// `req_*` methods take `&self` and may be called from several threads, request ids never repeat.
pub struct TraderClient<T: Transport> {
    config: TraderConfig,
    broker_id: BrokerId,
    app_id: AppId,
    auth_code: AuthCode,
    user_id: spin::Once<UserId>,
    // serializes req_authenticate only, login and logout read user_id without waiting on it
    authenticating: spin::Mutex<()>,
    request_ids: RequestIdSequence,
    pending: Arc<PendingRequests>,
    connected: Arc<AtomicBool>,
    dispatcher: Dispatcher,
    transport: Option<T>,
}
impl<T: Transport> TraderClient<T> {
    /// Validates `config`, starts the dispatcher and runs the transport initialization sequence.
    /// Connecting happens in the background, watch [ConnectionStatus::is_connected] or `app_spi`.
    pub fn new(config: TraderConfig, mut transport: T, app_spi: Arc<dyn TraderSpi>) -> Result<Self, Error> {
        config.validate()?;
        let broker_id = BrokerId::try_from_str(&config.broker_id)?;
        let app_id = AppId::try_from_str(&config.app_id)?;
        let auth_code = AuthCode::try_from_str(&config.auth_code)?;

        if log_enabled!(Level::Info) {
            info!("{} init, api version: {}", config, transport.api_version());
        }

        let (tx_event, rx_event) = channel();
        let pending = PendingRequests::new_ref();
        let connected = Arc::new(AtomicBool::new(false));
        let dispatcher = Dispatcher::spawn(&config.name, rx_event, pending.clone(), connected.clone(), app_spi)?;

        transport.register_spi(ChannelSpi::new_ref(tx_event));
        transport.subscribe_private_topic(ResumeType::Quick);
        transport.subscribe_public_topic(ResumeType::Restart);
        transport.register_front(&config.front_address);
        transport.init(true);

        Ok(Self {
            config,
            broker_id,
            app_id,
            auth_code,
            user_id: spin::Once::new(),
            authenticating: spin::Mutex::new(()),
            request_ids: RequestIdSequence::new(),
            pending,
            connected,
            dispatcher,
            transport: Some(transport),
        })
    }

    /// Releases the transport and stops the dispatcher. Waiting [Ticket]s observe [ErrorKind::ConnectionAborted].
    /// Only the first call has an effect, every later operation fails with [ErrorKind::NotConnected].
    pub fn release(&mut self) {
        match self.transport.take() {
            Some(mut transport) => {
                transport.release();
                self.dispatcher.stop();
                let abandoned = self.pending.clear();
                self.connected.store(false, Ordering::SeqCst);
                if log_enabled!(Level::Info) {
                    info!("{} released {}, abandoned requests: {}", self, transport, abandoned);
                }
            }
            None => {
                if log_enabled!(Level::Debug) {
                    debug!("{} already released", self);
                }
            }
        }
    }
    pub fn is_released(&self) -> bool {
        self.transport.is_none()
    }

    fn transport(&self) -> Result<&T, Error> {
        self.transport.as_ref().ok_or_else(|| Error::new(ErrorKind::NotConnected, format!("{} transport already released", self)))
    }

    pub fn api_version(&self) -> Result<String, Error> {
        Ok(self.transport()?.api_version())
    }

    /// Trading day cached by the transport as `YYYYMMDD`, blank until the first successful login.
    pub fn trading_day(&self) -> Result<String, Error> {
        let day = self.transport()?.trading_day();
        if log_enabled!(Level::Info) {
            info!("trading day: {}", day);
        }
        Ok(day)
    }
    /// [TraderClient::trading_day] as a date, `None` while the transport has not reported one yet.
    pub fn trading_day_date(&self) -> Result<Option<NaiveDate>, Error> {
        let day = self.trading_day()?;
        let day = day.trim_end_matches('\0').trim();
        if day.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(day, "%Y%m%d").map(Some).map_err(|e| Error::new(ErrorKind::InvalidData, format!("trading day '{}': {}", day, e)))
    }

    /// User id recorded by the first queued [TraderClient::req_authenticate].
    pub fn user_id(&self) -> Option<String> {
        self.user_id.get().map(|user_id| user_id.text().into_owned())
    }
    fn recorded_user_id(&self) -> Result<UserId, Error> {
        self.user_id.get().copied().ok_or_else(|| Error::new(ErrorKind::InvalidInput, "user id unknown, req_authenticate must be queued first"))
    }

    /// Submits client authentication for `user_id` using the configured broker id, auth code and app id.
    ///
    /// # Errors
    /// * [ErrorKind::InvalidInput] if `user_id` does not fit or differs from the one already recorded, nothing is submitted
    /// * [SubmitRejected] if the transport refused to queue the request
    pub fn req_authenticate(&self, user_id: &str) -> Result<Ticket, Error> {
        let user_id = UserId::try_from_str(user_id)?;
        // held across submission so concurrent callers cannot record two different user ids
        let _authenticating = self.authenticating.lock();
        if let Some(recorded) = self.user_id.get() {
            if *recorded != user_id {
                return Err(Error::new(ErrorKind::InvalidInput, format!("user id already recorded as '{}', a client serves one user", recorded.text())));
            }
        }
        let req = ReqAuthenticateField::new(self.broker_id, user_id, self.auth_code, self.app_id);
        let ticket = self.submit(RequestKind::Authenticate, &req, |transport, req, request_id| transport.req_authenticate(req, request_id))?;
        self.user_id.call_once(|| user_id);
        Ok(ticket)
    }

    /// Submits login of the recorded user with `password`.
    pub fn req_user_login(&self, password: &str) -> Result<Ticket, Error> {
        let req = ReqUserLoginField::new(self.broker_id, self.recorded_user_id()?, Password::try_from_str(password)?);
        self.submit(RequestKind::UserLogin, &req, |transport, req, request_id| transport.req_user_login(req, request_id))
    }

    /// Submits logout of the recorded user.
    pub fn req_user_logout(&self) -> Result<Ticket, Error> {
        let req = UserLogoutField::new(self.broker_id, self.recorded_user_id()?);
        self.submit(RequestKind::UserLogout, &req, |transport, req, request_id| transport.req_user_logout(req, request_id))
    }

    fn submit<R: Debug, F: FnOnce(&T, &R, RequestId) -> i32>(&self, kind: RequestKind, req: &R, send: F) -> Result<Ticket, Error> {
        let transport = self.transport()?;
        let request_id = self.request_ids.next_id();
        // registered before sending, a fast reply must find its waiter
        let ticket = self.pending.register(request_id, kind);
        let code = send(transport, req, request_id);
        if log_enabled!(Level::Debug) {
            debug!("{} submitted request_id: {}, code: {}, {:?}", self, request_id, code, req);
        }
        SubmitRejected::check(request_id, code)?;
        Ok(ticket)
    }

    pub fn config(&self) -> &TraderConfig {
        &self.config
    }
    /// Requests queued and not yet completed, see [PendingRequests::older_than] to find stale ones.
    pub fn pending(&self) -> &PendingRequests {
        &self.pending
    }
    /// Id the next submitted request will use.
    pub fn next_request_id(&self) -> RequestId {
        self.request_ids.peek()
    }
}
impl<T: Transport> ConnectionStatus for TraderClient<T> {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
impl<T: Transport> Drop for TraderClient<T> {
    fn drop(&mut self) {
        self.release();
    }
}
impl<T: Transport> Display for TraderClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}<{}, front: {}, broker: {}, connected: {}, released: {}>",
            asserted_short_name!("TraderClient", Self),
            self.config.name,
            self.config.front_address,
            self.config.broker_id,
            self.is_connected(),
            self.is_released()
        )
    }
}
impl<T: Transport> Debug for TraderClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(asserted_short_name!("TraderClient", Self))
            .field("config", &self.config)
            .field("user_id", &self.user_id())
            .field("request_ids", &self.request_ids)
            .field("pending", &self.pending.len())
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ctp_mini_core::unittest::setup::{self, model::*, transport::*, wait::*};
    use log::info;
    use more_asserts::assert_lt;

    fn config() -> TraderConfig {
        TraderConfig::new(FRONT_ADDRESS, APP_ID, AUTH_CODE, BROKER_ID).with_name("unittest-trader")
    }

    #[test]
    fn test_init_sequence() {
        setup::log::configure();
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let client = TraderClient::new(config(), transport, LoggerSpi::new_ref()).unwrap();
        info!("client: {}", client);

        assert!(state.has_spi());
        assert_eq!(state.private_resume(), Some(ResumeType::Quick));
        assert_eq!(state.public_resume(), Some(ResumeType::Restart));
        assert_eq!(state.front().as_deref(), Some(FRONT_ADDRESS));
        assert_eq!(state.init_count(), 1);
        assert!(state.auto_reconnect());
        assert!(client.is_connected_busywait_timeout(default_connect_timeout()));
        assert_eq!(client.api_version().unwrap(), "loopback_v1");
    }

    #[test]
    fn test_invalid_config() {
        setup::log::configure();
        let cfg = TraderConfig::new(FRONT_ADDRESS, APP_ID, "AUTH-CODE-THAT-IS-TOO-LONG", BROKER_ID);
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let e = TraderClient::new(cfg, transport, LoggerSpi::new_ref()).unwrap_err();
        info!("e: {}", e);
        assert_eq!(e.kind(), ErrorKind::InvalidInput);
        assert_eq!(state.init_count(), 0);
    }

    #[test]
    fn test_login_requires_user_id() {
        setup::log::configure();
        let client = TraderClient::new(config(), LoopbackTransport::new(), LoggerSpi::new_ref()).unwrap();
        assert_eq!(client.req_user_login(PASSWORD).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(client.req_user_logout().unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(client.next_request_id(), 0);
        assert_eq!(client.user_id(), None);
    }

    #[test]
    fn test_user_id_recorded_once() {
        setup::log::configure();
        let client = TraderClient::new(config(), LoopbackTransport::new(), LoggerSpi::new_ref()).unwrap();
        client.req_authenticate(USER_ID).unwrap();
        assert_eq!(client.user_id().as_deref(), Some(USER_ID));
        // same user may authenticate again
        client.req_authenticate(USER_ID).unwrap();
        let e = client.req_authenticate("someone_else").unwrap_err();
        info!("e: {}", e);
        assert_eq!(e.kind(), ErrorKind::InvalidInput);
        assert_eq!(client.user_id().as_deref(), Some(USER_ID));
        assert_eq!(client.next_request_id(), 2);
    }

    #[test]
    fn test_user_id_not_recorded_when_rejected() {
        setup::log::configure();
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let client = TraderClient::new(config(), transport, LoggerSpi::new_ref()).unwrap();
        state.set_return_code(-1);
        let e = client.req_authenticate(USER_ID).unwrap_err();
        info!("e: {}", e);
        assert_eq!(e.kind(), ErrorKind::NotConnected);
        assert_eq!(SubmitRejected::find(&e), Some(&SubmitRejected { request_id: 0, code: -1 }));
        assert_eq!(client.user_id(), None);
        assert!(client.pending().is_empty());
        assert_eq!(client.next_request_id(), 1);
    }

    #[test]
    fn test_trading_day() {
        setup::log::configure();
        let client = TraderClient::new(config(), LoopbackTransport::new(), LoggerSpi::new_ref()).unwrap();
        assert_eq!(client.trading_day().unwrap(), "");
        assert_eq!(client.trading_day_date().unwrap(), None);

        client.req_authenticate(USER_ID).unwrap().wait_timeout(default_reply_timeout()).unwrap();
        client.req_user_login(PASSWORD).unwrap().wait_timeout(default_reply_timeout()).unwrap();
        assert_eq!(client.trading_day().unwrap(), TRADING_DAY);
        assert_eq!(client.trading_day_date().unwrap(), NaiveDate::from_ymd_opt(2026, 10, 19));
    }

    #[test]
    fn test_release_twice() {
        setup::log::configure();
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let mut client = TraderClient::new(config(), transport, LoggerSpi::new_ref()).unwrap();
        client.release();
        client.release();
        info!("client: {:?}", client);
        assert!(!format!("{:?}", client).contains(AUTH_CODE));
        assert!(client.is_released());
        assert_eq!(state.release_count(), 1);
        assert_eq!(client.req_authenticate(USER_ID).unwrap_err().kind(), ErrorKind::NotConnected);
        assert_eq!(client.trading_day().unwrap_err().kind(), ErrorKind::NotConnected);
        assert_eq!(client.next_request_id(), 0);
        drop(client);
        assert_eq!(state.release_count(), 1);
    }

    #[test]
    fn test_authenticate_then_logout_ids() {
        setup::log::configure();
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let client = TraderClient::new(config(), transport, LoggerSpi::new_ref()).unwrap();
        assert!(client.is_connected_busywait_timeout(default_connect_timeout()));

        let auth = client.req_authenticate(USER_ID).unwrap();
        let logout = client.req_user_logout().unwrap();
        assert_eq!(auth.request_id(), 0);
        assert_eq!(logout.request_id(), 1);
        auth.wait_timeout(default_reply_timeout()).unwrap();
        logout.wait_timeout(default_reply_timeout()).unwrap();

        let submitted = state.submitted();
        info!("submitted: {:?}", submitted);
        assert_eq!(submitted.len(), 2);
        match &submitted[0] {
            Submitted::Authenticate(0, req) => {
                assert_eq!(req.broker_id.as_slice(), b"9999\0\0\0\0\0\0\0");
                assert_eq!(req.user_id.text(), USER_ID);
                assert_eq!(req.auth_code.text(), AUTH_CODE);
                assert_eq!(req.app_id.text(), APP_ID);
                assert!(req.user_product_info.is_blank());
            }
            other => panic!("unexpected {:?}", other),
        }
        match &submitted[1] {
            Submitted::UserLogout(1, req) => {
                assert_eq!(req.broker_id.text(), BROKER_ID);
                assert_eq!(req.user_id.text(), USER_ID);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_concurrent_ids_unique() {
        setup::log::configure_level(log::LevelFilter::Info);
        const THREADS: usize = 4;
        const PER_THREAD: usize = 250;
        let transport = LoopbackTransport::new();
        let state = transport.state();
        state.set_respond(false);
        let client = Arc::new(TraderClient::new(config(), transport, LoggerSpi::new_ref()).unwrap());
        client.req_authenticate(USER_ID).unwrap();

        let handles = (0..THREADS)
            .map(|_| {
                let client = client.clone();
                std::thread::spawn(move || (0..PER_THREAD).map(|_| client.req_user_logout().unwrap().request_id()).collect::<Vec<_>>())
            })
            .collect::<Vec<_>>();
        let mut ids = handles.into_iter().flat_map(|jh| jh.join().unwrap()).collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), THREADS * PER_THREAD);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&((THREADS * PER_THREAD) as RequestId)));
        assert_eq!(state.submitted().len(), THREADS * PER_THREAD + 1);
    }

    #[test]
    fn test_login_flow_reaches_application() {
        setup::log::configure();
        let counter = CounterSpi::new_ref();
        let client = TraderClient::new(config(), LoopbackTransport::new(), ChainSpi::new_ref(vec![LoggerSpi::new_ref(), counter.clone()])).unwrap();

        client.req_authenticate(USER_ID).unwrap().wait_timeout(default_reply_timeout()).unwrap();
        let reply = client.req_user_login(PASSWORD).unwrap().wait_last_timeout(default_reply_timeout()).unwrap();
        info!("reply: {}", reply);
        match reply.body {
            Some(RspBody::UserLogin(rsp)) => {
                assert_eq!(rsp.user_id.text(), USER_ID);
                assert_eq!(rsp.trading_day.text(), TRADING_DAY);
            }
            other => panic!("unexpected {:?}", other),
        }
        client.req_user_logout().unwrap().wait_timeout(default_reply_timeout()).unwrap();

        // application spi runs after the ticket was completed
        let start = std::time::Instant::now();
        while counter.rsp_count() < 3 && start.elapsed() < default_reply_timeout() {
            std::thread::yield_now();
        }
        info!("counter: {}", counter);
        assert_eq!(counter.connected_count(), 1);
        assert_eq!(counter.rsp_count(), 3);
        assert!(client.pending().is_empty());
    }

    #[test]
    fn test_rejected_login() {
        setup::log::configure();
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let client = TraderClient::new(config(), transport, LoggerSpi::new_ref()).unwrap();
        client.req_authenticate(USER_ID).unwrap().wait_timeout(default_reply_timeout()).unwrap();

        state.reject_next(RspInfoField::rejected(3, "invalid login"));
        let e = client.req_user_login("wrong").unwrap().wait_timeout(default_reply_timeout()).unwrap_err();
        info!("e: {}", e);
        let rsp_error = RspError::find(&e).unwrap();
        assert_eq!(rsp_error.request_id, 1);
        assert_eq!(rsp_error.info.error_id, 3);
        assert_eq!(client.trading_day().unwrap(), "");
    }

    #[test]
    fn test_submit_rejected() {
        setup::log::configure();
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let client = TraderClient::new(config(), transport, LoggerSpi::new_ref()).unwrap();
        client.req_authenticate(USER_ID).unwrap();

        state.set_return_code(-2);
        let e = client.req_user_login(PASSWORD).unwrap_err();
        info!("e: {}", e);
        assert_eq!(e.kind(), ErrorKind::WouldBlock);
        assert_eq!(SubmitRejected::find(&e).map(|e| e.request_id), Some(1));
        assert!(client.pending().older_than(std::time::Duration::ZERO).iter().all(|(id, _)| *id != 1));

        // rejected ids are not reused
        state.set_return_code(0);
        assert_eq!(client.req_user_logout().unwrap().request_id(), 2);
    }

    #[test]
    fn test_overflow_consumes_no_id() {
        setup::log::configure();
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let client = TraderClient::new(config(), transport, LoggerSpi::new_ref()).unwrap();

        let e = client.req_authenticate("a_user_id_longer_than_fifteen").unwrap_err();
        info!("e: {}", e);
        assert_eq!(e.kind(), ErrorKind::InvalidInput);
        client.req_authenticate(USER_ID).unwrap();
        let e = client.req_user_login(&"p".repeat(Password::CAPACITY + 1)).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidInput);
        assert_eq!(client.req_user_login(&"p".repeat(Password::CAPACITY)).unwrap().request_id(), 1);
        assert_eq!(state.submitted().len(), 2);
    }

    #[test]
    fn test_multi_part_reply() {
        setup::log::configure();
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let client = TraderClient::new(config(), transport, LoggerSpi::new_ref()).unwrap();
        state.set_reply_parts(3);

        let parts = client.req_authenticate(USER_ID).unwrap().wait_timeout(default_reply_timeout()).unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.iter().filter(|reply| reply.is_last).count(), 1);
        assert!(parts.iter().all(|reply| reply.request_id == 0));
    }

    #[test]
    fn test_no_reply_times_out() {
        setup::log::configure();
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let client = TraderClient::new(config(), transport, LoggerSpi::new_ref()).unwrap();
        state.set_respond(false);

        let ticket = client.req_authenticate(USER_ID).unwrap();
        let e = ticket.wait_timeout(std::time::Duration::from_millis(20)).unwrap_err();
        info!("e: {}", e);
        assert_eq!(e.kind(), ErrorKind::TimedOut);
        assert_eq!(client.pending().len(), 1);
        drop(ticket);
        assert!(client.pending().is_empty());
    }

    #[test]
    fn test_release_aborts_waiting_ticket() {
        setup::log::configure();
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let mut client = TraderClient::new(config(), transport, LoggerSpi::new_ref()).unwrap();
        state.set_respond(false);

        let ticket = client.req_authenticate(USER_ID).unwrap();
        client.release();
        assert_eq!(ticket.wait_timeout(default_reply_timeout()).unwrap_err().kind(), ErrorKind::ConnectionAborted);
        assert!(!client.is_connected());
    }

    #[test]
    fn test_disconnect_and_reconnect() {
        setup::log::configure();
        let counter = CounterSpi::new_ref();
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let client = TraderClient::new(config(), transport, counter.clone()).unwrap();
        assert!(client.is_connected_busywait_timeout(default_connect_timeout()));

        state.heart_beat_warning(30);
        state.disconnect(DisconnectReason::HeartbeatReadFailed);
        let start = std::time::Instant::now();
        while client.is_connected() && start.elapsed() < default_connect_timeout() {
            std::thread::yield_now();
        }
        assert!(!client.is_connected());

        state.reconnect();
        assert!(client.is_connected_busywait_timeout(default_connect_timeout()));
        // flag flips before the application is notified
        let start = std::time::Instant::now();
        while counter.connected_count() < 2 && start.elapsed() < default_connect_timeout() {
            std::thread::yield_now();
        }
        info!("counter: {}", counter);
        assert_eq!(counter.connected_count(), 2);
        assert_eq!(counter.disconnected_count(), 1);
        assert_eq!(counter.heart_beat_warning_count(), 1);
    }

    #[test]
    fn test_generic_error_response() {
        setup::log::configure();
        let counter = CounterSpi::new_ref();
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let client = TraderClient::new(config(), transport, counter.clone()).unwrap();

        state.rsp_error_next(Some(RspInfoField::rejected(90, "query too frequent")));
        let e = client.req_authenticate(USER_ID).unwrap().wait_timeout(default_reply_timeout()).unwrap_err();
        info!("e: {}", e);
        let rsp_error = RspError::find(&e).unwrap();
        assert_eq!(rsp_error.request_id, 0);
        assert_eq!(rsp_error.info.error_id, 90);

        // no error info still fails the waiting caller
        state.rsp_error_next(None);
        let e = client.req_user_logout().unwrap().wait_timeout(default_reply_timeout()).unwrap_err();
        info!("e: {}", e);
        let rsp_error = RspError::find(&e).unwrap();
        assert_eq!(rsp_error.request_id, 1);
        assert_eq!(rsp_error.info.error_id, RspInfoField::UNSPECIFIED_ERROR_ID);
        assert!(client.pending().is_empty());

        let start = std::time::Instant::now();
        while counter.rsp_count() < 2 && start.elapsed() < default_reply_timeout() {
            std::thread::yield_now();
        }
        assert_eq!(counter.rsp_count(), 2);
        // application sees the error exactly as the front sent it
        assert_eq!(counter.error_count(), 1);
    }

    #[test]
    fn test_flow_ctrl_warning_reaches_application() {
        setup::log::configure();
        let counter = CounterSpi::new_ref();
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let client = TraderClient::new(config(), transport, ChainSpi::new_ref(vec![LoggerSpi::new_ref(), counter.clone()])).unwrap();
        assert!(client.is_connected_busywait_timeout(default_connect_timeout()));

        state.flow_ctrl_warning(77, true);
        state.flow_ctrl_warning(78, false);
        let start = std::time::Instant::now();
        while counter.rsp_count() < 2 && start.elapsed() < default_reply_timeout() {
            std::thread::yield_now();
        }
        info!("counter: {}", counter);
        assert_eq!(counter.rsp_count(), 2);
        assert_eq!(counter.error_count(), 0);
        assert!(client.pending().is_empty());
    }

    #[test]
    fn test_login_not_blocked_by_authenticate() {
        setup::log::configure();
        let delay = std::time::Duration::from_millis(300);
        let transport = LoopbackTransport::new();
        let state = transport.state();
        let client = Arc::new(TraderClient::new(config(), transport, LoggerSpi::new_ref()).unwrap());
        client.req_authenticate(USER_ID).unwrap();

        state.set_authenticate_delay(delay);
        let jh = {
            let client = client.clone();
            std::thread::spawn(move || client.req_authenticate(USER_ID).map(|ticket| ticket.request_id()))
        };
        // second authenticate is inside the transport once it was recorded
        let start = std::time::Instant::now();
        while state.submitted().len() < 2 && start.elapsed() < delay {
            std::thread::yield_now();
        }
        assert_eq!(state.submitted().len(), 2);

        let start = std::time::Instant::now();
        let ticket = client.req_user_login(PASSWORD).unwrap();
        let elapsed = start.elapsed();
        info!("login submitted after {:?}", elapsed);
        assert_lt!(elapsed, delay / 2);
        assert_eq!(ticket.request_id(), 2);
        assert_eq!(jh.join().unwrap().unwrap(), 1);
    }
}
