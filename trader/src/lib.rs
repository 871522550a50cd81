pub mod client;
pub mod config;
pub mod dispatcher;
pub mod pending;
pub mod prelude;
