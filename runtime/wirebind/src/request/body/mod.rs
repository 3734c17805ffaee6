//! Buffer the body of incoming requests.
//!
//! Bodies are fully buffered in memory before decoding.
//! [`BufferedBody`] enforces an upper limit on their size, configured via
//! [`BodySizeLimit`], to avoid resource exhaustion attacks.
pub use buffered_body::BufferedBody;
pub use limit::BodySizeLimit;

mod buffered_body;
pub mod errors;
mod limit;
