use std::{borrow::Cow, fmt::Display};

use crate::prelude::{DisconnectReason, RequestId, RspAuthenticateField, RspInfoField, RspUserLoginField, SpecificTraderField, UserLogoutField};

/// Typed body of a response, `None` in a [Reply] when the front sent no body.
#[derive(Debug, Clone, PartialEq)]
pub enum RspBody {
    Authenticate(RspAuthenticateField),
    UserLogin(RspUserLoginField),
    UserLogout(UserLogoutField),
    FlowCtrlWarning(SpecificTraderField),
}

/// One part of a response to the request identified by `request_id`.
/// `is_last` marks the final part of a multi part response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub request_id: RequestId,
    pub body: Option<RspBody>,
    pub info: Option<RspInfoField>,
    pub is_last: bool,
}
impl Reply {
    pub fn new(request_id: RequestId, body: Option<RspBody>, info: Option<RspInfoField>, is_last: bool) -> Self {
        Self { request_id, body, info, is_last }
    }
    /// Error info of this part if the front reported a non zero error id.
    pub fn error(&self) -> Option<&RspInfoField> {
        self.info.as_ref().filter(|info| info.is_error())
    }
}
impl Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Reply<request_id: {}, is_last: {}", self.request_id, self.is_last)?;
        if let Some(info) = self.error() {
            write!(f, ", {}", info)?;
        }
        write!(f, ">")
    }
}

/// Every notification the transport can deliver, in a form that can cross a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum TraderEvent {
    FrontConnected,
    FrontDisconnected(DisconnectReason),
    HeartBeatWarning { time_lapse: i32 },
    RspSubscribeFlowCtrlWarning(Reply),
    RspUnSubscribeFlowCtrlWarning(Reply),
    RspAuthenticate(Reply),
    RspUserLogin(Reply),
    RspUserLogout(Reply),
    RspError(Reply),
}
impl TraderEvent {
    pub fn reply(&self) -> Option<&Reply> {
        use TraderEvent::*;
        match self {
            RspSubscribeFlowCtrlWarning(r) | RspUnSubscribeFlowCtrlWarning(r) | RspAuthenticate(r) | RspUserLogin(r) | RspUserLogout(r) | RspError(r) => Some(r),
            FrontConnected | FrontDisconnected(_) | HeartBeatWarning { .. } => None,
        }
    }
    /// Reply for the caller waiting on its `request_id`.
    /// An `OnRspError` always fails the request, without error info it carries [RspInfoField::unspecified].
    pub fn caller_reply(&self) -> Option<Cow<'_, Reply>> {
        match self {
            TraderEvent::RspError(reply) if reply.error().is_none() => Some(Cow::Owned(Reply {
                info: Some(RspInfoField::unspecified()),
                ..reply.clone()
            })),
            _ => self.reply().map(Cow::Borrowed),
        }
    }
    pub fn name(&self) -> &'static str {
        use TraderEvent::*;
        match self {
            FrontConnected => "OnFrontConnected",
            FrontDisconnected(_) => "OnFrontDisconnected",
            HeartBeatWarning { .. } => "OnHeartBeatWarning",
            RspSubscribeFlowCtrlWarning(_) => "OnRspSubscribeFlowCtrlWarning",
            RspUnSubscribeFlowCtrlWarning(_) => "OnRspUnSubscribeFlowCtrlWarning",
            RspAuthenticate(_) => "OnRspAuthenticate",
            RspUserLogin(_) => "OnRspUserLogin",
            RspUserLogout(_) => "OnRspUserLogout",
            RspError(_) => "OnRspError",
        }
    }
}
impl Display for TraderEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TraderEvent::*;
        match self {
            FrontConnected => write!(f, "{}", self.name()),
            FrontDisconnected(reason) => write!(f, "{} reason: {}", self.name(), reason),
            HeartBeatWarning { time_lapse } => write!(f, "{} time_lapse: {}", self.name(), time_lapse),
            _ => match self.reply() {
                Some(reply) => write!(f, "{} {}", self.name(), reply),
                None => write!(f, "{}", self.name()),
            },
        }
    }
}
