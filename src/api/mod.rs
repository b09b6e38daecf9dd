//! HTTP endpoints served by the local callback server.
//!
//! The server only exists to complete browser-based OAuth flows: one callback
//! route per provider plus a health endpoint. It is started on demand by the
//! CLI and shuts down once the pending authorization completes.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
