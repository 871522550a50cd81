use std::{
    fmt::{Debug, Display},
    sync::{mpsc::Sender, Arc},
};

use log::{log_enabled, warn, Level};

use crate::{
    asserted_short_name,
    prelude::{DisconnectReason, Reply, RequestId, RspAuthenticateField, RspBody, RspInfoField, RspUserLoginField, SpecificTraderField, TraderEvent, TraderSpi, UserLogoutField},
};

/// A [TraderSpi] that converts every notification into a [TraderEvent] and posts it onto a channel.
///
/// Registered with the transport so that nothing but a channel send runs on the transport thread.
/// Use [TraderEvent::notify] on the consuming side to replay the event on another [TraderSpi].
#[derive(Debug)]
pub struct ChannelSpi {
    tx: spin::Mutex<Sender<TraderEvent>>,
}
impl ChannelSpi {
    pub fn new(tx: Sender<TraderEvent>) -> Self {
        Self { tx: spin::Mutex::new(tx) }
    }
    pub fn new_ref(tx: Sender<TraderEvent>) -> Arc<Self> {
        Arc::new(Self::new(tx))
    }
    fn post(&self, event: TraderEvent) {
        if let Err(e) = self.tx.lock().send(event) {
            if log_enabled!(Level::Warn) {
                warn!("{} receiver is gone, dropping {}", asserted_short_name!("ChannelSpi", Self), e.0);
            }
        }
    }
}
impl Display for ChannelSpi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", asserted_short_name!("ChannelSpi", Self))
    }
}

impl TraderSpi for ChannelSpi {
    fn on_front_connected(&self) {
        self.post(TraderEvent::FrontConnected);
    }
    fn on_front_disconnected(&self, reason: DisconnectReason) {
        self.post(TraderEvent::FrontDisconnected(reason));
    }
    fn on_heart_beat_warning(&self, time_lapse: i32) {
        self.post(TraderEvent::HeartBeatWarning { time_lapse });
    }
    fn on_rsp_subscribe_flow_ctrl_warning(&self, rsp: Option<&SpecificTraderField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        let body = rsp.cloned().map(RspBody::FlowCtrlWarning);
        self.post(TraderEvent::RspSubscribeFlowCtrlWarning(Reply::new(request_id, body, info.cloned(), is_last)));
    }
    fn on_rsp_unsubscribe_flow_ctrl_warning(&self, rsp: Option<&SpecificTraderField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        let body = rsp.cloned().map(RspBody::FlowCtrlWarning);
        self.post(TraderEvent::RspUnSubscribeFlowCtrlWarning(Reply::new(request_id, body, info.cloned(), is_last)));
    }
    fn on_rsp_authenticate(&self, rsp: Option<&RspAuthenticateField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        let body = rsp.cloned().map(RspBody::Authenticate);
        self.post(TraderEvent::RspAuthenticate(Reply::new(request_id, body, info.cloned(), is_last)));
    }
    fn on_rsp_user_login(&self, rsp: Option<&RspUserLoginField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        let body = rsp.cloned().map(RspBody::UserLogin);
        self.post(TraderEvent::RspUserLogin(Reply::new(request_id, body, info.cloned(), is_last)));
    }
    fn on_rsp_user_logout(&self, rsp: Option<&UserLogoutField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        let body = rsp.cloned().map(RspBody::UserLogout);
        self.post(TraderEvent::RspUserLogout(Reply::new(request_id, body, info.cloned(), is_last)));
    }
    fn on_rsp_error(&self, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        self.post(TraderEvent::RspError(Reply::new(request_id, None, info.cloned(), is_last)));
    }
}

impl TraderEvent {
    /// Replays this event on `spi` by calling the matching [TraderSpi] method.
    pub fn notify<S: TraderSpi + ?Sized>(&self, spi: &S) {
        use TraderEvent::*;
        match self {
            FrontConnected => spi.on_front_connected(),
            FrontDisconnected(reason) => spi.on_front_disconnected(*reason),
            HeartBeatWarning { time_lapse } => spi.on_heart_beat_warning(*time_lapse),
            RspSubscribeFlowCtrlWarning(r) => spi.on_rsp_subscribe_flow_ctrl_warning(flow_ctrl_body(r), r.info.as_ref(), r.request_id, r.is_last),
            RspUnSubscribeFlowCtrlWarning(r) => spi.on_rsp_unsubscribe_flow_ctrl_warning(flow_ctrl_body(r), r.info.as_ref(), r.request_id, r.is_last),
            RspAuthenticate(r) => {
                let rsp = match &r.body {
                    Some(RspBody::Authenticate(rsp)) => Some(rsp),
                    _ => None,
                };
                spi.on_rsp_authenticate(rsp, r.info.as_ref(), r.request_id, r.is_last)
            }
            RspUserLogin(r) => {
                let rsp = match &r.body {
                    Some(RspBody::UserLogin(rsp)) => Some(rsp),
                    _ => None,
                };
                spi.on_rsp_user_login(rsp, r.info.as_ref(), r.request_id, r.is_last)
            }
            RspUserLogout(r) => {
                let rsp = match &r.body {
                    Some(RspBody::UserLogout(rsp)) => Some(rsp),
                    _ => None,
                };
                spi.on_rsp_user_logout(rsp, r.info.as_ref(), r.request_id, r.is_last)
            }
            RspError(r) => spi.on_rsp_error(r.info.as_ref(), r.request_id, r.is_last),
        }
    }
}
fn flow_ctrl_body(reply: &Reply) -> Option<&SpecificTraderField> {
    match &reply.body {
        Some(RspBody::FlowCtrlWarning(rsp)) => Some(rsp),
        _ => None,
    }
}
