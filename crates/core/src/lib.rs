#![forbid(unsafe_code)]

pub mod error;
pub mod import;
pub mod matcher;
pub mod model;
pub mod ranking;
pub mod time;

pub use error::Error;
pub use time::Clock;
