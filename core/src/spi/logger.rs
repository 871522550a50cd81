use std::{
    fmt::{Debug, Display},
    sync::Arc,
};

use log::{debug, error, info, log_enabled, trace, warn, Level};

use crate::{asserted_short_name, prelude::*};

/// Logs every notification. Connection events use `level_link`, responses use `level_rsp`
/// and any response carrying a non zero error id is logged at [Level::Warn] or above.
#[derive(Debug, Clone)]
pub struct LoggerSpi {
    level_link: Level,
    level_rsp: Level,
}
impl Default for LoggerSpi {
    fn default() -> Self {
        Self {
            level_link: Level::Info,
            level_rsp: Level::Info,
        }
    }
}

impl LoggerSpi {
    pub fn with_level(level_link: Level, level_rsp: Level) -> Self {
        Self { level_link, level_rsp }
    }
    pub fn with_level_ref(level_link: Level, level_rsp: Level) -> Arc<Self> {
        Arc::new(Self::with_level(level_link, level_rsp))
    }
    pub fn new_ref() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn log(&self, level: Level, text: std::fmt::Arguments) {
        match level {
            Level::Error => error!("{}::{}", asserted_short_name!("LoggerSpi", Self), text),
            Level::Warn => warn!("{}::{}", asserted_short_name!("LoggerSpi", Self), text),
            Level::Info => info!("{}::{}", asserted_short_name!("LoggerSpi", Self), text),
            Level::Debug => debug!("{}::{}", asserted_short_name!("LoggerSpi", Self), text),
            Level::Trace => trace!("{}::{}", asserted_short_name!("LoggerSpi", Self), text),
        }
    }
    fn log_rsp<T: Debug>(&self, name: &str, rsp: Option<&T>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        let level = match info {
            // lower Level is more severe
            Some(info) if info.is_error() => self.level_rsp.min(Level::Warn),
            _ => self.level_rsp,
        };
        if !log_enabled!(level) {
            return;
        }
        match info {
            Some(info) if info.is_error() => self.log(level, format_args!("{} request_id: {}, is_last: {}, {}", name, request_id, is_last, info)),
            _ => self.log(level, format_args!("{} request_id: {}, is_last: {}, rsp: {:?}", name, request_id, is_last, rsp)),
        }
    }
}

impl Display for LoggerSpi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}<link: {}, rsp: {}>", asserted_short_name!("LoggerSpi", Self), self.level_link, self.level_rsp)
    }
}

impl TraderSpi for LoggerSpi {
    fn on_front_connected(&self) {
        if log_enabled!(self.level_link) {
            self.log(self.level_link, format_args!("on_front_connected"));
        }
    }
    fn on_front_disconnected(&self, reason: DisconnectReason) {
        if log_enabled!(self.level_link) {
            self.log(self.level_link, format_args!("on_front_disconnected reason: {}, transport will reconnect", reason));
        }
    }
    fn on_heart_beat_warning(&self, time_lapse: i32) {
        if log_enabled!(Level::Warn) {
            self.log(Level::Warn, format_args!("on_heart_beat_warning time_lapse: {}s", time_lapse));
        }
    }
    fn on_rsp_subscribe_flow_ctrl_warning(&self, rsp: Option<&SpecificTraderField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        self.log_rsp("on_rsp_subscribe_flow_ctrl_warning", rsp, info, request_id, is_last);
    }
    fn on_rsp_unsubscribe_flow_ctrl_warning(&self, rsp: Option<&SpecificTraderField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        self.log_rsp("on_rsp_unsubscribe_flow_ctrl_warning", rsp, info, request_id, is_last);
    }
    fn on_rsp_authenticate(&self, rsp: Option<&RspAuthenticateField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        self.log_rsp("on_rsp_authenticate", rsp, info, request_id, is_last);
    }
    fn on_rsp_user_login(&self, rsp: Option<&RspUserLoginField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        self.log_rsp("on_rsp_user_login", rsp, info, request_id, is_last);
    }
    fn on_rsp_user_logout(&self, rsp: Option<&UserLogoutField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        self.log_rsp("on_rsp_user_logout", rsp, info, request_id, is_last);
    }
    fn on_rsp_error(&self, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        self.log_rsp::<()>("on_rsp_error", None, info, request_id, is_last);
    }
}

#[cfg(test)]
mod test {
    use crate::prelude::*;
    use crate::unittest::setup;
    use log::Level;

    #[test]
    fn test_callback() {
        setup::log::configure_level(log::LevelFilter::Trace);
        let clbk = LoggerSpi::with_level(Level::Trace, Level::Trace);

        clbk.on_front_connected();
        clbk.on_front_disconnected(DisconnectReason::from(-8));
        clbk.on_heart_beat_warning(30);
        for i in 0..2 {
            clbk.on_rsp_user_login(Some(&RspUserLoginField::default()), Some(&RspInfoField::ok()), i, true);
        }
        clbk.on_rsp_user_logout(None, Some(&RspInfoField::rejected(4, "not logged in")), 3, true);
        clbk.on_rsp_error(Some(&RspInfoField::rejected(7, "boom")), 4, true);
        assert_eq!(clbk.to_string(), "LoggerSpi<link: TRACE, rsp: TRACE>");
    }
}
