//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transactions)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (fills the span field, echoes the header)
//! 4. CORS (any origin, GET/POST, Content-Type; answers preflights)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
