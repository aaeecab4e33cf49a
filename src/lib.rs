pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::ClientConfig;
pub use context::ClientContext;
pub use error::{ApiErrorCode, AppError, AppResult};
