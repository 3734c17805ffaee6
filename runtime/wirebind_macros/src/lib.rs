use proc_macro::TokenStream;

mod record;

/// Derive `wirebind::Record` (and `wirebind::literal::Field`) for a struct with named fields.
///
/// Check out the documentation of the `wirebind::record` module for the supported
/// `#[wire(...)]` attributes.
#[proc_macro_derive(Record, attributes(wire))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input)
}
