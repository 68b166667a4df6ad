pub mod auth;
pub mod cookie;
pub mod docs;
pub mod middleware;
pub mod pages;
pub mod respond;
pub mod routes;
pub mod state;

// Re-exported for the binary and the router-level tests.
pub use middleware::require_auth;
pub use routes::build_router;
