//! HTTP surface.
//!
//! An HTML form at `/` for people and a JSON API under `/api/` for
//! scripts. Both go through the same `Assessor`.
//!
//! The router is composable: `assessment_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod pages;
pub mod router;
pub mod server;
pub mod types;

pub use router::assessment_router;
pub use server::{serve_until_ctrl_c, start_server, AssessmentServer, ServerError, ServerSession};
pub use types::ApiContext;
