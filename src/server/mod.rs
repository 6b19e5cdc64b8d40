pub mod extract;
pub mod guards;
pub mod router;
pub mod routes;

pub use router::{DeskState, desk_router};
