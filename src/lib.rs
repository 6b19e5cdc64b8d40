pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod export;
pub mod import;
pub mod mailer;
pub mod server;
pub mod utils;

pub use error::DeskError;
