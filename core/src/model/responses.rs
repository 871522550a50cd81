use std::fmt::Display;

use byteserde::prelude::*;
use byteserde_derive::{ByteDeserializeSlice, ByteSerializeStack, ByteSerializedLenOf};

use super::fields::{AppId, BrokerId, Date, ErrorMsg, OrderRef, ProductInfo, SystemName, Time, UserId};

/// Outcome attached to every response, `error_id == 0` means success.
#[derive(ByteSerializeStack, ByteDeserializeSlice, ByteSerializedLenOf, PartialEq, Clone, Debug, Default)]
#[byteserde(endian = "le")]
pub struct RspInfoField {
    pub error_id: i32,
    pub error_msg: ErrorMsg,
}
impl RspInfoField {
    /// Error id used when the front signals an error without saying which.
    pub const UNSPECIFIED_ERROR_ID: i32 = -1;

    pub fn ok() -> Self {
        Self::default()
    }
    pub fn unspecified() -> Self {
        Self::rejected(Self::UNSPECIFIED_ERROR_ID, "error response without error info")
    }
    /// Builds a rejection, a message that does not fit [ErrorMsg::CAPACITY] is cut to fit.
    pub fn rejected(error_id: i32, error_msg: &str) -> Self {
        let mut end = error_msg.len().min(ErrorMsg::CAPACITY);
        while !error_msg.is_char_boundary(end) {
            end -= 1;
        }
        Self {
            error_id,
            error_msg: ErrorMsg::try_from_str(&error_msg[..end]).unwrap_or_default(),
        }
    }
    #[inline(always)]
    pub fn is_error(&self) -> bool {
        self.error_id != 0
    }
}
impl Display for RspInfoField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RspInfo error_id: {}, error_msg: \"{}\"", self.error_id, self.error_msg.text())
    }
}

#[derive(ByteSerializeStack, ByteDeserializeSlice, ByteSerializedLenOf, PartialEq, Clone, Debug, Default)]
#[byteserde(endian = "le")]
pub struct RspAuthenticateField {
    pub broker_id: BrokerId,
    pub user_id: UserId,
    pub user_product_info: ProductInfo,
    pub app_id: AppId,
    pub app_type: u8,
}

#[derive(ByteSerializeStack, ByteDeserializeSlice, ByteSerializedLenOf, PartialEq, Clone, Debug, Default)]
#[byteserde(endian = "le")]
pub struct RspUserLoginField {
    pub trading_day: Date,
    pub login_time: Time,
    pub broker_id: BrokerId,
    pub user_id: UserId,
    pub system_name: SystemName,
    pub front_id: i32,
    pub session_id: i32,
    pub max_order_ref: OrderRef,
}
impl Display for RspUserLoginField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Login Accepted, user \"{}\" trading day \"{}\" front {} session {} max order ref \"{}\"",
            self.user_id.text(),
            self.trading_day.text(),
            self.front_id,
            self.session_id,
            self.max_order_ref.text()
        )
    }
}

/// Body of the flow control warning subscribe/unsubscribe responses.
#[derive(ByteSerializeStack, ByteDeserializeSlice, ByteSerializedLenOf, PartialEq, Clone, Debug, Default)]
#[byteserde(endian = "le")]
pub struct SpecificTraderField {
    pub broker_id: BrokerId,
    pub user_id: UserId,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::unittest::setup;
    use log::info;

    #[test]
    fn test_rsp_info() {
        setup::log::configure();
        let ok = RspInfoField::ok();
        assert!(!ok.is_error());

        let rejected = RspInfoField::rejected(3, "invalid login");
        info!("rejected: {}", rejected);
        assert!(rejected.is_error());
        assert_eq!(rejected.error_msg.text(), "invalid login");

        let long = "x".repeat(200);
        let rejected = RspInfoField::rejected(-1, &long);
        assert_eq!(rejected.error_msg.text().len(), ErrorMsg::CAPACITY);

        let unspecified = RspInfoField::unspecified();
        assert!(unspecified.is_error());
        assert_eq!(unspecified.error_id, RspInfoField::UNSPECIFIED_ERROR_ID);
    }
}
