pub mod config;
pub mod decode;
pub mod error;
pub mod logging;
pub mod server;

pub use error::{Error, Result};
