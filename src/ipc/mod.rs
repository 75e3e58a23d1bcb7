//! JSON-lines request handling for the fees sidecar: one request object per
//! stdin line, one `{id, ok, result | error}` object per stdout line.

mod error;
mod handlers;
mod helpers;
mod router;
mod types;

pub use error::unparsable_line;
pub use router::handle_request;
pub use types::{AppState, Request};
