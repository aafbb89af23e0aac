pub mod calendar;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ops;

pub use db::Database;
pub use error::{Error, Result};
