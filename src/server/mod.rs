mod categories;
mod companies;
pub mod dto;
mod products;
pub mod response;
mod router;
mod session;
mod users;
pub mod validation;

pub use router::{AppState, create_router};
