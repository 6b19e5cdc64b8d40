//! `/api` route groups. Each module exposes a `router()` merged by `desk_router`.

pub mod announcements;
pub mod auth;
pub mod entries;
pub mod misc;
pub mod properties;
pub mod reports;
pub mod setup;
pub mod users;
