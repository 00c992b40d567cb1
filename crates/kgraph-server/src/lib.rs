//! kgraph web server: form page, graph artifact and JSON API.

pub mod cli;
pub mod page;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
