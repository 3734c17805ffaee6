//! The request data a [`Decoder`](crate::Decoder) draws from.
//!
//! Routing and transport are out of scope: the router hands over the matched
//! [`PathParams`], the server hands over the request head and body.
//! [`IncomingRequest`] bundles them together.
pub use incoming::IncomingRequest;
pub use request_head::RequestHead;

pub mod body;
mod incoming;
pub mod path;
pub mod query;
mod request_head;
