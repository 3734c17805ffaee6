//! # wirebind
//!
//! Populate typed request records from path parameters, query parameters and
//! JSON bodies.
//!
//! A [`Record`] is a struct deriving `#[derive(Record)]`.
//! A [`Decoder`] fills it from an [`IncomingRequest`](request::IncomingRequest)
//! in three phases: path, then query, then body. Later phases overwrite earlier ones.
//!
//! Path and query values are single textual tokens: the [`literal`] module converts them
//! into the type of each field, refusing to silently truncate numbers.
//! The body goes through `serde_json`.

// The derive macro emits `::wirebind::...` paths, which must resolve within this crate too.
extern crate self as wirebind;

pub use decoder::{DecodeError, Decoder, DecoderConfig, request_decoder};
pub use record::Record;
pub use wirebind_macros::Record;

pub mod decoder;
pub mod literal;
pub mod record;
pub mod request;
