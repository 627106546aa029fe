pub mod handlers;
pub mod openapi;
mod routes;
mod state;
pub mod upload;

pub use routes::create_router;
pub use state::AppState;
