use std::{
    fmt::{Debug, Display},
    sync::Arc,
};

use crate::{asserted_short_name, prelude::*};

pub type Chain = Vec<Arc<dyn TraderSpi>>;

/// Forwards every notification to each [TraderSpi] in the chain, in order.
#[derive(Debug)]
pub struct ChainSpi {
    chain: Chain,
}

impl ChainSpi {
    pub fn new(chain: Chain) -> Self {
        Self { chain }
    }
    pub fn new_ref(chain: Chain) -> Arc<Self> {
        Arc::new(Self::new(chain))
    }
}
impl Display for ChainSpi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}<{}, [{}]>",
            asserted_short_name!("ChainSpi", Self),
            self.chain.len(),
            self.chain.iter().map(|c| format!("{}", c)).collect::<Vec<_>>().join(", ")
        )
    }
}
impl TraderSpi for ChainSpi {
    fn on_front_connected(&self) {
        for spi in self.chain.iter() {
            spi.on_front_connected();
        }
    }
    fn on_front_disconnected(&self, reason: DisconnectReason) {
        for spi in self.chain.iter() {
            spi.on_front_disconnected(reason);
        }
    }
    fn on_heart_beat_warning(&self, time_lapse: i32) {
        for spi in self.chain.iter() {
            spi.on_heart_beat_warning(time_lapse);
        }
    }
    fn on_rsp_subscribe_flow_ctrl_warning(&self, rsp: Option<&SpecificTraderField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        for spi in self.chain.iter() {
            spi.on_rsp_subscribe_flow_ctrl_warning(rsp, info, request_id, is_last);
        }
    }
    fn on_rsp_unsubscribe_flow_ctrl_warning(&self, rsp: Option<&SpecificTraderField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        for spi in self.chain.iter() {
            spi.on_rsp_unsubscribe_flow_ctrl_warning(rsp, info, request_id, is_last);
        }
    }
    fn on_rsp_authenticate(&self, rsp: Option<&RspAuthenticateField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        for spi in self.chain.iter() {
            spi.on_rsp_authenticate(rsp, info, request_id, is_last);
        }
    }
    fn on_rsp_user_login(&self, rsp: Option<&RspUserLoginField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        for spi in self.chain.iter() {
            spi.on_rsp_user_login(rsp, info, request_id, is_last);
        }
    }
    fn on_rsp_user_logout(&self, rsp: Option<&UserLogoutField>, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        for spi in self.chain.iter() {
            spi.on_rsp_user_logout(rsp, info, request_id, is_last);
        }
    }
    fn on_rsp_error(&self, info: Option<&RspInfoField>, request_id: RequestId, is_last: bool) {
        for spi in self.chain.iter() {
            spi.on_rsp_error(info, request_id, is_last);
        }
    }
}
