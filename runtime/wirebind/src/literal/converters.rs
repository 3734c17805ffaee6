use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::types::BoxError;

type ConvertFn = dyn Fn(&str, &mut dyn Any) -> Result<(), BoxError> + Send + Sync;

/// A registry of string-to-value conversions, keyed by destination type.
///
/// Fields marked with `#[wire(converter)]` are populated by looking up the
/// converter registered for their exact type.
///
/// With the `time` feature enabled, [`Converters::default`] comes with a converter
/// for [`jiff::Timestamp`], accepting RFC 3339 text with or without surrounding
/// double quotes.
#[derive(Clone)]
pub struct Converters {
    by_type: HashMap<TypeId, (&'static str, Arc<ConvertFn>)>,
}

impl Converters {
    /// A registry with no converters at all.
    pub fn empty() -> Self {
        Self {
            by_type: HashMap::new(),
        }
    }

    /// Register the conversion for `T`, replacing any previous one.
    pub fn register<T, E, F>(&mut self, convert: F) -> &mut Self
    where
        T: Any,
        E: Into<BoxError>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        let f = move |raw: &str, target: &mut dyn Any| -> Result<(), BoxError> {
            let value = convert(raw).map_err(Into::<BoxError>::into)?;
            let Some(target) = target.downcast_mut::<T>() else {
                return Err(format!("expected a destination of type `{}`", type_name::<T>()).into());
            };
            *target = value;
            Ok(())
        };
        let f: Arc<ConvertFn> = Arc::new(f);
        self.by_type.insert(TypeId::of::<T>(), (type_name::<T>(), f));
        self
    }

    /// Returns `true` if a converter is registered for `T`.
    pub fn contains<T: Any>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    /// Convert `raw` into `target`.
    ///
    /// Returns `None` if no converter is registered for the type of `target`.
    pub(crate) fn convert(&self, raw: &str, target: &mut dyn Any) -> Option<Result<(), BoxError>> {
        let (_, convert) = self.by_type.get(&(*target).type_id())?;
        Some(convert(raw, target))
    }
}

impl Default for Converters {
    fn default() -> Self {
        #[allow(unused_mut)]
        let mut converters = Self::empty();
        #[cfg(feature = "time")]
        converters.register(|raw: &str| unquote(raw).parse::<jiff::Timestamp>());
        converters
    }
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.by_type.values().map(|(name, _)| name))
            .finish()
    }
}

#[cfg(feature = "time")]
fn unquote(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(raw)
}
