//! Persistent storage: models, schema, per-table queries and the actor that owns the pool.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `queries/`: one module of SQL per table group
//! - `actor.rs`: the single writer every handler talks to

pub mod actor;
pub mod models;
pub mod patch;
pub mod queries;
pub mod schema;

pub use actor::{DbActorHandle, DbActorMessage, spawn};
pub use models::{
    AgentShiftAssignment, Announcement, DailyDuty, DailyReport, DbUser, DutyTemplate,
    EmailSettings, GuestCheckin, Package, PackageAudit, Property, ReportBundle, Resident,
    ShiftNotes,
};
pub use schema::SQLITE_INIT;
