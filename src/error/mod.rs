mod desk;

pub use desk::{ApiErrorBody, ApiErrorObject, DeskError};
