pub mod errors;
pub mod macros;
pub mod reqid;
pub mod status;
