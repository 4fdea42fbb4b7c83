pub mod config;
pub mod error;
pub mod grid;
pub mod types;

pub use config::Config;
pub use error::MeetSpotError;
pub use types::*;
