//! HTTP Layer
//!
//! - transport: Wire-level seam (`reqwest` or a test double)
//! - client: Token attachment and 401 recovery

mod client;
mod transport;

pub use client::{ApiClient, ApiRequest, REFRESH_PATH};
pub use transport::{HttpResponse, HttpTransport, OutgoingRequest, ReqwestTransport};
