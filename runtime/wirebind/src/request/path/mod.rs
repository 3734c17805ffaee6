//! Path parameters, as extracted by the router.
pub use errors::InvalidUtf8InPathParam;
pub use path_params::PathParams;

pub mod errors;
mod path_params;
