pub mod client_store;
pub mod config;
pub mod draft_store;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::AppError;
pub use routes::router;
pub use state::AppState;
