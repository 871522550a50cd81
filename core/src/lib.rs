pub mod core;
pub mod model;
pub mod prelude;
pub mod spi;
pub mod transport;

#[cfg(any(test, feature = "unittest"))]
pub mod unittest;
