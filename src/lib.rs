pub mod auth;
pub mod config;
pub mod error;
pub mod guidance;
pub mod identify;
pub mod llm;
pub mod server;

pub use error::{Error, Result};

pub const API_VERSION: &str = "2.0.0";
pub const SERVICE_NAME: &str = "Crystal Grimoire Enhanced API";
