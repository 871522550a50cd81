pub use crate::core::errors::{RspError, SubmitRejected};
pub use crate::core::reqid::{RequestId, RequestIdSequence};
pub use crate::core::status::{ConnectionStatus, DisconnectReason, ResumeType};

// model
pub use crate::model::events::{Reply, RspBody, TraderEvent};
pub use crate::model::fields::{bounded_copy, nul_trimmed, AppId, AuthCode, BrokerId, Date, ErrorMsg, OrderRef, Password, ProductInfo, SystemName, Time, UserId};
pub use crate::model::requests::{ReqAuthenticateField, ReqUserLoginField, UserLogoutField};
pub use crate::model::responses::{RspAuthenticateField, RspInfoField, RspUserLoginField, SpecificTraderField};

// spi
pub use crate::spi::TraderSpi;

pub use crate::spi::chain::ChainSpi;
pub use crate::spi::channel::ChannelSpi;
pub use crate::spi::counter::CounterSpi;
pub use crate::spi::logger::LoggerSpi;

// transport
pub use crate::transport::Transport;

pub use crate::{asserted_short_name, core::macros::ty_name, fmt_num};

pub use num_format;
