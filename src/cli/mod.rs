//! Command-line interface layer.
//!
//! Each submodule implements one user-facing command. The CLI owns all
//! terminal interaction (spinners, tables, colored status lines) and identity
//! resolution, then delegates to the conversion engine and OAuth managers.
//! Authorization is driven lazily: a conversion that fails with a missing or
//! revoked token triggers the browser flow for exactly that provider and is
//! retried once.

mod auth;
mod convert;
mod history;

pub use auth::auth;
pub use auth::auth_flow;
pub use convert::convert;
pub use history::history;
