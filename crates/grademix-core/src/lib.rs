pub mod config;
pub mod error;
pub mod types;

pub use config::GrademixConfig;
pub use error::{CoreError, CoreResult};
pub use types::*;
