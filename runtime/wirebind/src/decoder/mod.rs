//! Populate records from incoming requests.
//!
//! A [`Decoder`] fills a [`Record`] in three phases, following the declaration
//! order of its fields:
//!
//! 1. path parameters, stored through the [`LiteralStore`](crate::literal::LiteralStore);
//! 2. query parameters, overwriting values from the path;
//! 3. the JSON body, if there is one, overwriting values for the keys it contains.
//!
//! A field therefore ends up with the body value if the body has its key,
//! otherwise the query value, otherwise the path value, otherwise whatever the
//! record was initialized with.
pub use config::{DecoderConfig, RepeatedValuePolicy, TokenSyntax};
#[cfg(feature = "config")]
pub use config::{ConfigLoadError, ENV_PREFIX};
pub use errors::{BodyError, DecodeError, Origin, TokenError};

mod config;
pub mod errors;
mod phases;

use std::any::Any;

use tracing_log_error::log_error;

use crate::literal::{BoxError, Converters, LiteralStore};
use crate::record::{Record, Schema};
use crate::request::IncomingRequest;
use crate::request::path::PathParams;

/// Decode incoming requests into [`Record`]s.
///
/// A decoder is cheap to clone and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use wirebind::request::IncomingRequest;
/// use wirebind::request::path::PathParams;
/// use wirebind::{Decoder, Record};
///
/// #[derive(Default, Record)]
/// pub struct UpdateUser {
///     id: u64,
///     name: String,
///     notify: Option<bool>,
/// }
///
/// let (parts, _) = http::Request::put("/users/42?notify=true")
///     .body(())
///     .unwrap()
///     .into_parts();
/// let path_params: PathParams = [("id", "42")].into_iter().collect();
/// let request = IncomingRequest::from_parts(parts, path_params, r#"{"name": "Ann"}"#);
///
/// let mut user = UpdateUser::default();
/// Decoder::new().decode(&request, &mut user).unwrap();
/// assert_eq!(user.id, 42);
/// assert_eq!(user.name, "Ann");
/// assert_eq!(user.notify, Some(true));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
    converters: Converters,
}

impl Decoder {
    /// A decoder with the default configuration and the default [`Converters`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            converters: Converters::default(),
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Register how to convert a token into a `T`, for fields marked with `#[wire(converter)]`.
    ///
    /// It replaces any converter previously registered for `T`.
    pub fn register_converter<T, E, F>(&mut self, convert: F) -> &mut Self
    where
        T: Any,
        E: Into<BoxError>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        self.converters.register(convert);
        self
    }

    /// Populate `record` from `request`.
    ///
    /// Decoding stops at the first error.
    pub fn decode<R: Record>(
        &self,
        request: &IncomingRequest,
        record: &mut R,
    ) -> Result<(), DecodeError> {
        let schema = R::schema();
        let span = tracing::debug_span!(
            "decode_request",
            record = schema.type_name(),
            n_fields = schema.fields().len()
        );
        let _guard = span.enter();

        log_unmatched_path_params(schema, &request.path_params);

        let store = LiteralStore::new()
            .number_policy(self.config.number_policy)
            .converters(&self.converters);
        let query_params = request.query_params();
        record.visit(&mut phases::TokenPhase {
            store,
            syntax: self.config.token_syntax,
            repeated_values: self.config.repeated_query_values,
            path_params: &request.path_params,
            query_params: &query_params,
        })?;

        phases::merge_body(&request.body, record)
    }
}

fn log_unmatched_path_params(schema: &Schema, path_params: &PathParams) {
    for (key, _) in path_params.iter() {
        if schema.field(key).is_none() {
            tracing::debug!(
                path_param = key,
                "The path parameter doesn't match any field of the record"
            );
        }
    }
}

/// Build a request decoder for `R`.
///
/// Every call creates a fresh record with `factory`, then populates it with `decoder`.
/// Failures are logged at `DEBUG` level before being returned.
///
/// # Example
///
/// ```rust
/// use wirebind::request::IncomingRequest;
/// use wirebind::request::path::PathParams;
/// use wirebind::{Decoder, Record, request_decoder};
///
/// #[derive(Record)]
/// pub struct Search {
///     q: String,
///     limit: u32,
/// }
///
/// let decode = request_decoder(Decoder::new(), || Search {
///     q: String::new(),
///     limit: 20,
/// });
///
/// let (parts, _) = http::Request::get("/search?q=rust").body(()).unwrap().into_parts();
/// let request = IncomingRequest::from_parts(parts, PathParams::new(), "");
/// let search = decode(&request).unwrap();
/// assert_eq!(search.q, "rust");
/// assert_eq!(search.limit, 20);
/// ```
pub fn request_decoder<R, F>(
    decoder: Decoder,
    factory: F,
) -> impl Fn(&IncomingRequest) -> Result<R, DecodeError> + Send + Sync
where
    R: Record,
    F: Fn() -> R + Send + Sync,
{
    move |request: &IncomingRequest| {
        let mut record = factory();
        match decoder.decode(request, &mut record) {
            Ok(()) => Ok(record),
            Err(e) => {
                log_error!(
                    e,
                    level: tracing::Level::DEBUG,
                    "Failed to decode the incoming request"
                );
                Err(e)
            }
        }
    }
}
