pub mod app;
pub mod autoload;
pub mod cli;
pub mod config;
pub mod db;
pub mod dependencies;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod prompt;
pub mod service;

pub(crate) mod utils;

pub use error::ModsyncError;
