pub use ctp_mini_core::prelude::*;

pub use crate::client::TraderClient;
pub use crate::config::TraderConfig;
pub use crate::dispatcher::Dispatcher;
pub use crate::pending::{PendingRequests, RequestKind, Ticket};
