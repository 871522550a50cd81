use std::{
    fmt::{Debug, Display},
    sync::{
        atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering::SeqCst},
        mpsc::{channel, Receiver, Sender},
        Arc,
    },
    thread::{sleep, Builder, JoinHandle},
    time::Duration,
};

use log::{debug, info, log_enabled, warn, Level};

use super::setup::model::{BROKER_ID, TRADING_DAY, USER_ID};
use crate::{asserted_short_name, prelude::*};

/// A request as it was handed to the [LoopbackTransport].
#[derive(Debug, Clone, PartialEq)]
pub enum Submitted {
    Authenticate(RequestId, ReqAuthenticateField),
    UserLogin(RequestId, ReqUserLoginField),
    UserLogout(RequestId, UserLogoutField),
}
impl Submitted {
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::Authenticate(id, _) | Self::UserLogin(id, _) | Self::UserLogout(id, _) => *id,
        }
    }
    pub fn broker_id(&self) -> &BrokerId {
        match self {
            Self::Authenticate(_, req) => &req.broker_id,
            Self::UserLogin(_, req) => &req.broker_id,
            Self::UserLogout(_, req) => &req.broker_id,
        }
    }
}

#[derive(Debug)]
enum Operation {
    Connect,
    Disconnect(DisconnectReason),
    HeartBeatWarning(i32),
    Respond { req: Submitted, info: RspInfoField, parts: usize },
    GenericError { request_id: RequestId, info: Option<RspInfoField> },
    FlowCtrlWarning { request_id: RequestId, subscribe: bool },
    Stop,
}

/// Everything the [LoopbackTransport] records and the knobs that steer its replies.
/// Shared with the test via [LoopbackTransport::state] so it stays reachable after the transport is moved into a client.
#[derive(Debug)]
pub struct LoopbackState {
    spi: spin::Mutex<Option<Arc<dyn TraderSpi>>>,
    front: spin::Mutex<Option<String>>,
    private_resume: spin::Mutex<Option<ResumeType>>,
    public_resume: spin::Mutex<Option<ResumeType>>,
    auto_reconnect: AtomicBool,
    init_count: AtomicUsize,
    release_count: AtomicUsize,
    trading_day: spin::Mutex<String>,
    submitted: spin::Mutex<Vec<Submitted>>,
    return_code: AtomicI32,
    respond: AtomicBool,
    reply_parts: AtomicUsize,
    reject_next: spin::Mutex<Option<RspInfoField>>,
    // outer None: answer normally, Some(info): answer with OnRspError carrying info
    rsp_error_next: spin::Mutex<Option<Option<RspInfoField>>>,
    authenticate_delay: spin::Mutex<Duration>,
    tx: spin::Mutex<Option<Sender<Operation>>>,
}
impl Default for LoopbackState {
    fn default() -> Self {
        Self {
            spi: spin::Mutex::new(None),
            front: spin::Mutex::new(None),
            private_resume: spin::Mutex::new(None),
            public_resume: spin::Mutex::new(None),
            auto_reconnect: AtomicBool::new(false),
            init_count: AtomicUsize::new(0),
            release_count: AtomicUsize::new(0),
            trading_day: spin::Mutex::new(String::new()),
            submitted: spin::Mutex::new(vec![]),
            return_code: AtomicI32::new(0),
            respond: AtomicBool::new(true),
            reply_parts: AtomicUsize::new(1),
            reject_next: spin::Mutex::new(None),
            rsp_error_next: spin::Mutex::new(None),
            authenticate_delay: spin::Mutex::new(Duration::ZERO),
            tx: spin::Mutex::new(None),
        }
    }
}
impl LoopbackState {
    pub fn submitted(&self) -> Vec<Submitted> {
        self.submitted.lock().clone()
    }
    pub fn front(&self) -> Option<String> {
        self.front.lock().clone()
    }
    pub fn private_resume(&self) -> Option<ResumeType> {
        *self.private_resume.lock()
    }
    pub fn public_resume(&self) -> Option<ResumeType> {
        *self.public_resume.lock()
    }
    pub fn auto_reconnect(&self) -> bool {
        self.auto_reconnect.load(SeqCst)
    }
    pub fn init_count(&self) -> usize {
        self.init_count.load(SeqCst)
    }
    pub fn release_count(&self) -> usize {
        self.release_count.load(SeqCst)
    }
    pub fn has_spi(&self) -> bool {
        self.spi.lock().is_some()
    }
    /// Code returned by every following `req_*` call, a non zero code also suppresses the reply.
    pub fn set_return_code(&self, code: i32) {
        self.return_code.store(code, SeqCst);
    }
    /// When `false` requests are queued but never answered.
    pub fn set_respond(&self, respond: bool) {
        self.respond.store(respond, SeqCst);
    }
    /// Splits every following reply into `parts` callbacks, only the last one flagged `is_last`.
    pub fn set_reply_parts(&self, parts: usize) {
        self.reply_parts.store(parts.max(1), SeqCst);
    }
    /// Attaches `info` to the reply of the next request.
    pub fn reject_next(&self, info: RspInfoField) {
        *self.reject_next.lock() = Some(info);
    }
    /// Answers the next request with a generic `on_rsp_error` instead of its typed response.
    pub fn rsp_error_next(&self, info: Option<RspInfoField>) {
        *self.rsp_error_next.lock() = Some(info);
    }
    /// Blocks every following `req_authenticate` call for `delay` after it was recorded.
    pub fn set_authenticate_delay(&self, delay: Duration) {
        *self.authenticate_delay.lock() = delay;
    }
    /// Emits an unsolicited flow control warning response tagged with `request_id`.
    pub fn flow_ctrl_warning(&self, request_id: RequestId, subscribe: bool) {
        self.post(Operation::FlowCtrlWarning { request_id, subscribe });
    }
    pub fn disconnect(&self, reason: DisconnectReason) {
        self.post(Operation::Disconnect(reason));
    }
    pub fn reconnect(&self) {
        self.post(Operation::Connect);
    }
    pub fn heart_beat_warning(&self, time_lapse: i32) {
        self.post(Operation::HeartBeatWarning(time_lapse));
    }

    fn post(&self, op: Operation) {
        match self.tx.lock().as_ref() {
            Some(tx) => {
                if let Err(e) = tx.send(op) {
                    warn!("loopback worker is gone, dropping {:?}", e.0);
                }
            }
            None => warn!("loopback transport not initialized, dropping {:?}", op),
        }
    }
    fn submit(&self, req: Submitted) -> i32 {
        if log_enabled!(Level::Debug) {
            debug!("loopback submit {:?}", req);
        }
        self.submitted.lock().push(req.clone());
        if let Submitted::Authenticate(..) = req {
            let delay = *self.authenticate_delay.lock();
            if !delay.is_zero() {
                sleep(delay);
            }
        }
        let code = self.return_code.load(SeqCst);
        if code == 0 && self.respond.load(SeqCst) {
            if let Some(info) = self.rsp_error_next.lock().take() {
                self.post(Operation::GenericError { request_id: req.request_id(), info });
                return code;
            }
            let info = self.reject_next.lock().take().unwrap_or_default();
            let parts = self.reply_parts.load(SeqCst);
            self.post(Operation::Respond { req, info, parts });
        }
        code
    }
}

/// In process [Transport] that answers every request from its own thread.
/// It records what it was asked to do and never touches the network.
pub struct LoopbackTransport {
    state: Arc<LoopbackState>,
    worker: Option<JoinHandle<()>>,
}
impl LoopbackTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::new(LoopbackState::default()),
            worker: None,
        }
    }
    pub fn state(&self) -> Arc<LoopbackState> {
        self.state.clone()
    }
    fn stop_worker(&mut self) {
        if let Some(tx) = self.state.tx.lock().take() {
            let _ = tx.send(Operation::Stop);
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("{} worker panicked", asserted_short_name!("LoopbackTransport", Self));
            }
        }
    }
}
impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::new()
    }
}
impl Drop for LoopbackTransport {
    fn drop(&mut self) {
        self.stop_worker();
    }
}
impl Debug for LoopbackTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(asserted_short_name!("LoopbackTransport", Self)).field("front", &self.state.front()).field("running", &self.worker.is_some()).finish()
    }
}
impl Display for LoopbackTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}<{}>", asserted_short_name!("LoopbackTransport", Self), self.state.front().unwrap_or_else(|| "pending".to_owned()))
    }
}

impl Transport for LoopbackTransport {
    fn api_version(&self) -> String {
        "loopback_v1".to_owned()
    }
    fn register_spi(&mut self, spi: Arc<dyn TraderSpi>) {
        *self.state.spi.lock() = Some(spi);
    }
    fn subscribe_private_topic(&mut self, resume: ResumeType) {
        *self.state.private_resume.lock() = Some(resume);
    }
    fn subscribe_public_topic(&mut self, resume: ResumeType) {
        *self.state.public_resume.lock() = Some(resume);
    }
    fn register_front(&mut self, address: &str) {
        *self.state.front.lock() = Some(address.to_owned());
    }
    fn init(&mut self, auto_reconnect: bool) {
        self.state.auto_reconnect.store(auto_reconnect, SeqCst);
        self.state.init_count.fetch_add(1, SeqCst);
        if self.worker.is_some() {
            return;
        }
        let (tx, rx) = channel();
        *self.state.tx.lock() = Some(tx);
        let state = self.state.clone();
        match Builder::new().name("loopback-transport".to_owned()).spawn(move || Worker { state, rx }.run()) {
            Ok(worker) => {
                self.worker = Some(worker);
                self.state.post(Operation::Connect);
            }
            Err(e) => warn!("unable to spawn loopback worker: {}", e),
        }
    }
    fn release(&mut self) {
        self.stop_worker();
        self.state.spi.lock().take();
        self.state.release_count.fetch_add(1, SeqCst);
    }
    fn trading_day(&self) -> String {
        self.state.trading_day.lock().clone()
    }

    fn req_authenticate(&self, req: &ReqAuthenticateField, request_id: RequestId) -> i32 {
        self.state.submit(Submitted::Authenticate(request_id, req.clone()))
    }
    fn req_user_login(&self, req: &ReqUserLoginField, request_id: RequestId) -> i32 {
        self.state.submit(Submitted::UserLogin(request_id, req.clone()))
    }
    fn req_user_logout(&self, req: &UserLogoutField, request_id: RequestId) -> i32 {
        self.state.submit(Submitted::UserLogout(request_id, req.clone()))
    }
}

/// Runs on the `loopback-transport` thread and plays the front's side of the conversation.
struct Worker {
    state: Arc<LoopbackState>,
    rx: Receiver<Operation>,
}
impl Worker {
    fn run(self) {
        use Operation::*;
        while let Ok(op) = self.rx.recv() {
            if let Stop = op {
                break;
            }
            let spi = match self.state.spi.lock().clone() {
                Some(spi) => spi,
                None => continue,
            };
            match op {
                Connect => spi.on_front_connected(),
                Disconnect(reason) => spi.on_front_disconnected(reason),
                HeartBeatWarning(time_lapse) => spi.on_heart_beat_warning(time_lapse),
                Respond { req, info, parts } => self.respond(spi.as_ref(), req, info, parts),
                GenericError { request_id, info } => spi.on_rsp_error(info.as_ref(), request_id, true),
                FlowCtrlWarning { request_id, subscribe } => {
                    let rsp = SpecificTraderField {
                        broker_id: BrokerId::try_from_str(BROKER_ID).unwrap_or_default(),
                        user_id: UserId::try_from_str(USER_ID).unwrap_or_default(),
                    };
                    if subscribe {
                        spi.on_rsp_subscribe_flow_ctrl_warning(Some(&rsp), Some(&RspInfoField::ok()), request_id, true)
                    } else {
                        spi.on_rsp_unsubscribe_flow_ctrl_warning(Some(&rsp), Some(&RspInfoField::ok()), request_id, true)
                    }
                }
                Stop => break,
            }
        }
        if log_enabled!(Level::Info) {
            info!("loopback worker terminated");
        }
    }
    fn respond(&self, spi: &dyn TraderSpi, req: Submitted, info: RspInfoField, parts: usize) {
        let request_id = req.request_id();
        for part in 0..parts {
            let is_last = part + 1 == parts;
            match &req {
                Submitted::Authenticate(_, req) => {
                    let rsp = RspAuthenticateField {
                        broker_id: req.broker_id,
                        user_id: req.user_id,
                        user_product_info: req.user_product_info,
                        app_id: req.app_id,
                        app_type: b'1',
                    };
                    spi.on_rsp_authenticate(Some(&rsp), Some(&info), request_id, is_last);
                }
                Submitted::UserLogin(_, req) => {
                    if !info.is_error() {
                        *self.state.trading_day.lock() = TRADING_DAY.to_owned();
                    }
                    let rsp = RspUserLoginField {
                        trading_day: Date::try_from_str(TRADING_DAY).unwrap_or_default(),
                        login_time: Time::try_from_str("09:00:00").unwrap_or_default(),
                        broker_id: req.broker_id,
                        user_id: req.user_id,
                        system_name: SystemName::try_from_str("loopback").unwrap_or_default(),
                        front_id: 1,
                        session_id: 42,
                        max_order_ref: OrderRef::try_from_str("1").unwrap_or_default(),
                    };
                    spi.on_rsp_user_login(Some(&rsp), Some(&info), request_id, is_last);
                }
                Submitted::UserLogout(_, req) => spi.on_rsp_user_logout(Some(req), Some(&info), request_id, is_last),
            }
        }
    }
}
