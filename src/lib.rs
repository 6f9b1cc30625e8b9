pub mod load;
pub mod driver;
pub mod logging;
pub(crate) mod config;
