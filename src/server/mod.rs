pub mod dto;
mod logs;
mod protocols;
pub mod response;
mod roles;
mod router;
mod session;
mod templates;
mod users;
pub mod validation;

pub use router::{AppState, create_router};
