//! Query parameters, as found in the target URI.
pub use query_params::QueryParams;

mod query_params;
