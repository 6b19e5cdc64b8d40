//! SQL for each table, as free functions over the pool.
//!
//! Only the DB actor calls into here; multi-statement writes open their own transaction.

pub mod agents;
pub mod announcements;
pub mod checkins;
pub mod duties;
pub mod email_settings;
pub mod notes;
pub mod packages;
pub mod properties;
pub mod reports;
pub mod residents;
pub mod templates;
pub mod users;
