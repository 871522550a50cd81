use std::{
    fmt::{Debug, Display},
    fs,
    io::{Error, ErrorKind},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::prelude::{asserted_short_name, AppId, AuthCode, BrokerId};

fn default_name() -> String {
    "trader".to_owned()
}

/// Session parameters fixed for the lifetime of a [crate::prelude::TraderClient].
///
/// # Example
/// ```
/// use ctp_mini_trader::prelude::TraderConfig;
/// let cfg = TraderConfig::from_json_str(r#"{
///     "front_address": "tcp://127.0.0.1:7001",
///     "app_id": "X1",
///     "auth_code": "AUTH1",
///     "broker_id": "9999"
/// }"#).unwrap();
/// assert_eq!(cfg.name, "trader");
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderConfig {
    /// Name of the client, also used for the dispatcher thread
    #[serde(default = "default_name")]
    pub name: String,
    pub front_address: String,
    pub app_id: String,
    pub auth_code: String,
    pub broker_id: String,
}
impl TraderConfig {
    pub fn new(front_address: &str, app_id: &str, auth_code: &str, broker_id: &str) -> Self {
        Self {
            name: default_name(),
            front_address: front_address.to_owned(),
            app_id: app_id.to_owned(),
            auth_code: auth_code.to_owned(),
            broker_id: broker_id.to_owned(),
        }
    }
    pub fn with_name(self, name: &str) -> Self {
        Self { name: name.to_owned(), ..self }
    }
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| Error::new(ErrorKind::InvalidData, format!("invalid trader config: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }
    /// Checks every field fits its fixed width counterpart, fails with [ErrorKind::InvalidInput] otherwise.
    pub fn validate(&self) -> Result<(), Error> {
        if self.front_address.trim().is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput, "front_address must not be empty"));
        }
        if self.name.is_empty() || self.name.contains('\0') {
            return Err(Error::new(ErrorKind::InvalidInput, "name must not be empty or contain NUL"));
        }
        AppId::try_from_str(&self.app_id)?;
        AuthCode::try_from_str(&self.auth_code)?;
        BrokerId::try_from_str(&self.broker_id)?;
        Ok(())
    }
}
impl Display for TraderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // auth_code is a credential
        write!(f, "{}<{}, front: {}, broker: {}, app: {}>", asserted_short_name!("TraderConfig", Self), self.name, self.front_address, self.broker_id, self.app_id)
    }
}
// obfuscate auth_code
impl Debug for TraderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(asserted_short_name!("TraderConfig", Self))
            .field("name", &self.name)
            .field("front_address", &self.front_address)
            .field("app_id", &self.app_id)
            .field("auth_code", &"********")
            .field("broker_id", &self.broker_id)
            .finish()
    }
}
