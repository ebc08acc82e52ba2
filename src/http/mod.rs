//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request id, accounting)
//!     → handlers.rs / admin (extract, call provider client)
//!     → response.rs (GatewayError → status + error body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{status_for, ErrorBody, ErrorDetail};
pub use server::{build_router, AppState, HttpServer};
