pub mod events;
pub mod fields;
pub mod requests;
pub mod responses;
