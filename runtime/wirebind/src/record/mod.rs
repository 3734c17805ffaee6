//! Destination records and their field descriptors.
//!
//! A record is a struct whose named fields are populated from a request.
//! You don't usually implement [`Record`] by hand: use `#[derive(Record)]`.
//!
//! # Attributes
//!
//! On the struct:
//!
//! - `#[wire(rename_all = "...")]` changes the casing of every wire name.
//!   Supported: `lowercase`, `UPPERCASE`, `camelCase`, `PascalCase`,
//!   `snake_case`, `SCREAMING_SNAKE_CASE`, `kebab-case`.
//!
//! On a field:
//!
//! - `#[wire(rename = "...")]` sets the wire name;
//! - `#[wire(skip)]` leaves the field out of every phase;
//! - `#[wire(flatten)]` promotes the fields of a nested record into this one;
//! - `#[wire(quoted)]` marks tokens for the field as coming from a quoted context;
//! - `#[wire(custom)]` parses tokens with [`FromRawText`](crate::literal::FromRawText);
//! - `#[wire(converter)]` parses tokens with the converter registered for the field type;
//! - `#[wire(body_only)]` only populates the field from the request body.
//!
//! # Example
//!
//! ```rust
//! use wirebind::Record;
//!
//! #[derive(Default, Record)]
//! #[wire(rename_all = "camelCase")]
//! pub struct ListOrders {
//!     customer_id: u64,
//!     page_size: Option<u16>,
//!     #[wire(skip)]
//!     cache_hit: bool,
//! }
//!
//! let schema = ListOrders::schema();
//! let names: Vec<_> = schema.fields().iter().map(|f| f.key.wire_name).collect();
//! assert_eq!(names, ["customerId", "pageSize"]);
//! ```
pub use access::{BodyOnly, Converted, FieldAccess, MergeError, RawText, Typed};
pub use schema::{FieldDescriptor, FieldKey, Schema};

mod access;
mod schema;

use crate::decoder::DecodeError;

/// A struct that can be populated from a request.
///
/// Use `#[derive(Record)]` to implement it.
pub trait Record: 'static {
    /// Push the descriptors of every non-skipped field, in declaration order.
    fn describe(fields: &mut Vec<FieldDescriptor>);

    /// Hand every non-skipped field to `visitor`, in declaration order.
    fn visit(&mut self, visitor: &mut dyn FieldVisitor) -> Result<(), DecodeError>;

    /// The cached descriptor list for this record type.
    fn schema() -> &'static Schema
    where
        Self: Sized,
    {
        schema::schema_of::<Self>()
    }
}

/// Receives the fields of a [`Record`], one at a time.
pub trait FieldVisitor {
    fn visit_field(
        &mut self,
        key: &FieldKey,
        field: &mut dyn FieldAccess,
    ) -> Result<(), DecodeError>;
}
