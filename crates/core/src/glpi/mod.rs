//! GLPI REST API access.
//!
//! This module provides the `TicketingApi` trait (the seam between the batch
//! logic and the network), the reqwest-backed `GlpiHttpClient`, and the
//! two-call session handshake built on top of it.

mod http;
mod session;
mod types;

pub use http::GlpiHttpClient;
pub use session::{begin, end, SessionContext};
pub use types::*;
