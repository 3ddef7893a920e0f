pub mod controllers;
pub mod layers;
pub mod request_id;
pub mod server;
pub mod state;

pub use request_id::RequestId;
pub use server::{build_router, ServeError, ServerSettings};
pub use state::AppState;
