use std::fmt::{Debug, Display};

use byteserde::prelude::*;
use byteserde_derive::{ByteDeserializeSlice, ByteSerializeStack, ByteSerializedLenOf};

use super::fields::{AppId, AuthCode, BrokerId, Date, Password, ProductInfo, UserId};

// broker/11 + user/16 + product_info/11 + auth_code/17 + app_id/33
pub const REQ_AUTHENTICATE_BYTE_LEN: usize = 88;
// trading_day/9 + broker/11 + user/16 + password/41
pub const REQ_USER_LOGIN_BYTE_LEN: usize = 77;
// broker/11 + user/16
pub const USER_LOGOUT_BYTE_LEN: usize = 27;

/// Client authentication, must be accepted by the front before [ReqUserLoginField] is sent.
#[derive(ByteSerializeStack, ByteDeserializeSlice, ByteSerializedLenOf, PartialEq, Clone, Default)]
#[byteserde(endian = "le")]
pub struct ReqAuthenticateField {
    pub broker_id: BrokerId,
    pub user_id: UserId,
    pub user_product_info: ProductInfo,
    pub auth_code: AuthCode,
    pub app_id: AppId,
}
impl ReqAuthenticateField {
    pub fn new(broker_id: BrokerId, user_id: UserId, auth_code: AuthCode, app_id: AppId) -> Self {
        Self {
            broker_id,
            user_id,
            user_product_info: Default::default(),
            auth_code,
            app_id,
        }
    }
}
// obfuscate auth_code
impl Debug for ReqAuthenticateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqAuthenticateField")
            .field("broker_id", &self.broker_id.text())
            .field("user_id", &self.user_id.text())
            .field("user_product_info", &self.user_product_info.text())
            .field("auth_code", &"********")
            .field("app_id", &self.app_id.text())
            .finish()
    }
}
impl Display for ReqAuthenticateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Authenticate Request, broker \"{}\" user \"{}\" app \"{}\"", self.broker_id.text(), self.user_id.text(), self.app_id.text())
    }
}

#[derive(ByteSerializeStack, ByteDeserializeSlice, ByteSerializedLenOf, PartialEq, Clone, Default)]
#[byteserde(endian = "le")]
pub struct ReqUserLoginField {
    /// left blank by the client, filled by the front
    pub trading_day: Date,
    pub broker_id: BrokerId,
    pub user_id: UserId,
    pub password: Password,
}
impl ReqUserLoginField {
    pub fn new(broker_id: BrokerId, user_id: UserId, password: Password) -> Self {
        Self {
            trading_day: Default::default(),
            broker_id,
            user_id,
            password,
        }
    }
}
// obfuscate password
impl Debug for ReqUserLoginField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqUserLoginField")
            .field("trading_day", &self.trading_day.text())
            .field("broker_id", &self.broker_id.text())
            .field("user_id", &self.user_id.text())
            .field("password", &"********")
            .finish()
    }
}
impl Display for ReqUserLoginField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Login Request, broker \"{}\" user \"{}\"", self.broker_id.text(), self.user_id.text())
    }
}

/// Used both as the logout request and as the body of its response.
#[derive(ByteSerializeStack, ByteDeserializeSlice, ByteSerializedLenOf, PartialEq, Clone, Debug, Default)]
#[byteserde(endian = "le")]
pub struct UserLogoutField {
    pub broker_id: BrokerId,
    pub user_id: UserId,
}
impl UserLogoutField {
    pub fn new(broker_id: BrokerId, user_id: UserId) -> Self {
        Self { broker_id, user_id }
    }
}
impl Display for UserLogoutField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Logout, broker \"{}\" user \"{}\"", self.broker_id.text(), self.user_id.text())
    }
}
