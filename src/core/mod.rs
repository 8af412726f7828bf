pub mod config;
pub mod error;
pub mod types;

pub use config::CreatureConfig;
pub use error::{DuckError, Result};
