use std::any::{Any, type_name};
use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde_json::Value;

use crate::literal::{Field, FloatSlot, FromRawText, LiteralError, Outcome, Shape, Slot};

/// Mutable access to one field of a [`Record`](super::Record), for every decoding phase.
///
/// Implemented by the wrappers the derive macro puts around each field:
/// [`Typed`], [`RawText`], [`Converted`] and [`BodyOnly`].
pub trait FieldAccess {
    /// A typed view on the field, for path and query tokens.
    fn slot(&mut self) -> Slot<'_>;

    /// Overwrite the field with a value taken from the request body.
    ///
    /// A JSON `null` resets nullable fields, dynamic values and sequences,
    /// and leaves every other field untouched.
    fn merge_json(&mut self, value: Value) -> Result<(), MergeError>;
}

/// The error returned by [`FieldAccess::merge_json`].
#[derive(Debug)]
pub struct MergeError {
    path: Option<String>,
    source: serde_json::Error,
}

impl MergeError {
    /// Where the error occurred, relative to the field itself.
    ///
    /// `None` if the error concerns the field value as a whole.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn into_inner(self) -> serde_json::Error {
        self.source
    }

    fn custom(error: impl fmt::Display) -> Self {
        Self {
            path: None,
            source: serde_json::Error::custom(error),
        }
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for MergeError {
    fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = e.path().to_string();
        Self {
            // The root of the field value is printed as `.`.
            path: (path != ".").then_some(path),
            source: e.into_inner(),
        }
    }
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl std::error::Error for MergeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Reject numbers that don't fit an `f32` destination.
///
/// `serde` narrows an `f64` into an `f32` with a cast, which turns large finite
/// numbers into infinity. `path` receives the location of the offending
/// element, relative to `value`.
fn check_f32_range(slot: Slot<'_>, value: &Value, path: &mut String) -> Result<(), LiteralError> {
    match (slot, value) {
        (Slot::Float(FloatSlot::F32(_)), Value::Number(n)) => {
            let wide = n.as_f64().unwrap_or_default();
            if wide.is_finite() && (wide as f32).is_infinite() {
                return Err(LiteralError::overflow(&n.to_string(), "f32"));
            }
            Ok(())
        }
        (Slot::Nullable(target), _) => {
            // Nothing is stored: the fresh inner value is only inspected.
            target
                .store_with(&mut |inner| check_f32_range(inner, value, path).map(|()| Outcome::Ignored))
                .map(|_| ())
        }
        (Slot::Sequence(target), Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                let checked = target.push_with(&mut |element| {
                    check_f32_range(element, item, path).map(|()| Outcome::Ignored)
                });
                if let Err(e) = checked {
                    path.insert_str(0, &format!("[{i}]"));
                    return Err(e);
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn deserialize_into<T: DeserializeOwned>(target: &mut T, value: Value) -> Result<(), MergeError> {
    *target = serde_path_to_error::deserialize(value)?;
    Ok(())
}

/// A field using the built-in rules for its [`Shape`].
pub struct Typed<'a, T>(pub &'a mut T);

impl<T: Field + DeserializeOwned> Typed<'_, T> {
    pub fn shape() -> Shape {
        T::shape()
    }
}

impl<T: Field + DeserializeOwned> FieldAccess for Typed<'_, T> {
    fn slot(&mut self) -> Slot<'_> {
        self.0.slot()
    }

    fn merge_json(&mut self, value: Value) -> Result<(), MergeError> {
        if value.is_null() {
            match self.0.slot() {
                Slot::Nullable(target) => target.clear(),
                Slot::Sequence(target) => target.clear(),
                Slot::Dynamic(target) => *target = Value::Null,
                _ => {}
            }
            return Ok(());
        }
        let mut path = String::new();
        if let Err(e) = check_f32_range(self.0.slot(), &value, &mut path) {
            return Err(MergeError {
                path: (!path.is_empty()).then_some(path),
                source: serde_json::Error::custom(e),
            });
        }
        deserialize_into(self.0, value)
    }
}

/// A field parsing its own text, marked with `#[wire(custom)]`.
///
/// Body values are handed over as JSON text: strings keep their quotes.
pub struct RawText<'a, T>(pub &'a mut T);

impl<T: FromRawText> RawText<'_, T> {
    pub fn shape() -> Shape {
        Shape::Custom(type_name::<T>())
    }
}

impl<T: FromRawText> FieldAccess for RawText<'_, T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Custom {
            target: self.0,
            type_name: type_name::<T>(),
        }
    }

    fn merge_json(&mut self, value: Value) -> Result<(), MergeError> {
        if value.is_null() {
            return Ok(());
        }
        self.0
            .from_raw_text(&value.to_string())
            .map_err(MergeError::custom)
    }
}

/// A field populated through a registered converter, marked with `#[wire(converter)]`.
///
/// Body values go through the `Deserialize` implementation of the field type.
pub struct Converted<'a, T>(pub &'a mut T);

impl<T: Any + DeserializeOwned> Converted<'_, T> {
    pub fn shape() -> Shape {
        Shape::Converted(type_name::<T>())
    }
}

impl<T: Any + DeserializeOwned> FieldAccess for Converted<'_, T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Converted {
            target: self.0,
            type_name: type_name::<T>(),
        }
    }

    fn merge_json(&mut self, value: Value) -> Result<(), MergeError> {
        if value.is_null() {
            return Ok(());
        }
        deserialize_into(self.0, value)
    }
}

/// A field that can only be populated from the request body, marked with `#[wire(body_only)]`.
pub struct BodyOnly<'a, T>(pub &'a mut T);

impl<T: DeserializeOwned> BodyOnly<'_, T> {
    pub fn shape() -> Shape {
        Shape::Unsupported(type_name::<T>())
    }
}

impl<T: DeserializeOwned> FieldAccess for BodyOnly<'_, T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Unsupported {
            type_name: type_name::<T>(),
        }
    }

    fn merge_json(&mut self, value: Value) -> Result<(), MergeError> {
        if value.is_null() {
            return Ok(());
        }
        deserialize_into(self.0, value)
    }
}
