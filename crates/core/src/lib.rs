#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod shuffle;
pub mod time;

pub use error::Error;
pub use shuffle::shuffle;
pub use time::Clock;
