//! Store raw literal tokens into typed fields.
//!
//! A [`LiteralStore`] takes one raw string (a path segment, a query value) and
//! writes it into a destination field via its [`Slot`].
//! Two token syntaxes are supported:
//!
//! - plain text, via [`LiteralStore::store_token`]: `42`, `true`, `hello`;
//! - JSON literals, via [`LiteralStore::store_literal`]: `42`, `true`, `"hello"`, `null`.
//!
//! Either way, numbers never get silently truncated: a value that doesn't fit
//! the destination width is an [`Overflow`](LiteralError::Overflow) error.
pub use converters::Converters;
pub use errors::LiteralError;
pub use number::is_valid_number;
pub use shape::Shape;
pub use slot::{Field, FloatSlot, IntSlot, Nullable, Sequence, Slot, StoreFn, UintSlot};
pub use types::{Blob, BoxError, FromRawText, RawNumber};

mod converters;
mod errors;
mod number;
mod shape;
mod slot;
mod types;

use serde_json::Value;

/// What happened to a token handed to the [`LiteralStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The field was written.
    Stored,
    /// The token carried no value for this field, which was left untouched.
    Ignored,
}

/// How numbers are represented when stored into a [`Dynamic`](Shape::Dynamic) field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberPolicy {
    /// Convert to a `f64`.
    #[default]
    Float,
    /// Keep the number exact: integers stay integers.
    ///
    /// With the `arbitrary_precision` feature the original text is preserved.
    Exact,
}

/// Convert literal tokens and store them into destination fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralStore<'r> {
    number_policy: NumberPolicy,
    converters: Option<&'r Converters>,
}

impl<'r> LiteralStore<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the representation of numbers stored into dynamic fields.
    pub fn number_policy(mut self, policy: NumberPolicy) -> Self {
        self.number_policy = policy;
        self
    }

    /// Set the registry used for [`Converted`](Shape::Converted) fields.
    pub fn converters(mut self, converters: &'r Converters) -> Self {
        self.converters = Some(converters);
        self
    }

    /// Store a plain-text token into `slot`.
    ///
    /// An empty token is always [`Outcome::Ignored`].
    pub fn store_token(&self, token: &str, slot: Slot<'_>) -> Result<Outcome, LiteralError> {
        if token.is_empty() {
            return Ok(Outcome::Ignored);
        }
        self.store_plain(token, slot)
    }

    fn store_plain(&self, token: &str, slot: Slot<'_>) -> Result<Outcome, LiteralError> {
        match slot {
            Slot::String(target) => {
                token.clone_into(target);
            }
            Slot::Bool(target) => {
                *target = parse_bool(token)
                    .ok_or_else(|| LiteralError::type_mismatch(token, "bool"))?;
            }
            Slot::Int(target) => return number::store_signed(token, target),
            Slot::Uint(target) => return number::store_unsigned(token, target),
            Slot::Float(target) => return number::store_float(token, target),
            Slot::Bytes(target) => {
                *target = number::decode_base64(token)?;
            }
            Slot::Number(target) => {
                *target = RawNumber::new(token)?;
            }
            Slot::Dynamic(target) => {
                *target = Value::String(token.to_owned());
            }
            Slot::Custom { target, type_name } => return from_raw_text(token, target, type_name),
            Slot::Converted { target, type_name } => {
                return self.convert(token, target, type_name);
            }
            Slot::Nullable(target) => {
                return target.store_with(&mut |inner| self.store_plain(token, inner));
            }
            Slot::Sequence(target) => {
                target.clear();
                return target.push_with(&mut |inner| self.store_plain(token, inner));
            }
            Slot::Unsupported { type_name } => {
                return Err(LiteralError::UnsupportedShape {
                    expected_type: type_name,
                });
            }
        }
        Ok(Outcome::Stored)
    }

    /// Store a JSON literal (`null`, `true`, `"text"`, `-1.5e3`) into `slot`.
    ///
    /// `from_quoted` marks literals that were found inside a quoted string:
    /// a literal that doesn't fit its destination is then reported as
    /// [`LiteralError::InvalidQuotedUse`].
    ///
    /// Fields that parse themselves ([`Custom`](Shape::Custom) and
    /// [`Converted`](Shape::Converted)) receive the literal verbatim, quotes included.
    pub fn store_literal(
        &self,
        item: &str,
        slot: Slot<'_>,
        from_quoted: bool,
    ) -> Result<Outcome, LiteralError> {
        if item.is_empty() {
            return Ok(Outcome::Ignored);
        }
        let is_null = item.starts_with('n');
        match slot {
            Slot::Custom { target, type_name } => from_raw_text(item, target, type_name),
            Slot::Converted { target, type_name } => self.convert(item, target, type_name),
            Slot::Nullable(target) if is_null => {
                expect_null(item, target.type_name(), from_quoted)?;
                target.clear();
                Ok(Outcome::Stored)
            }
            Slot::Nullable(target) => {
                target.store_with(&mut |inner| self.store_literal(item, inner, from_quoted))
            }
            Slot::Sequence(target) if is_null => {
                expect_null(item, target.type_name(), from_quoted)?;
                target.clear();
                Ok(Outcome::Stored)
            }
            Slot::Sequence(target) => {
                target.clear();
                target.push_with(&mut |inner| self.store_literal(item, inner, from_quoted))
            }
            slot => self.store_scalar_literal(item, slot, from_quoted),
        }
    }

    fn store_scalar_literal(
        &self,
        item: &str,
        slot: Slot<'_>,
        from_quoted: bool,
    ) -> Result<Outcome, LiteralError> {
        let expected_type = slot.type_name();
        let mismatch = || LiteralError::mismatch(item, expected_type, from_quoted);
        if let Slot::Unsupported { .. } = slot {
            return Err(LiteralError::UnsupportedShape { expected_type });
        }

        match item.as_bytes()[0] {
            b'n' => {
                expect_null(item, expected_type, from_quoted)?;
                match slot {
                    Slot::Dynamic(target) => {
                        *target = Value::Null;
                        Ok(Outcome::Stored)
                    }
                    // `null` carries no value for non-nullable fields.
                    _ => Ok(Outcome::Ignored),
                }
            }
            b't' | b'f' => {
                let value = match item {
                    "true" => true,
                    "false" => false,
                    _ => return Err(mismatch()),
                };
                match slot {
                    Slot::Bool(target) => *target = value,
                    Slot::Dynamic(target) => *target = Value::Bool(value),
                    _ => return Err(mismatch()),
                }
                Ok(Outcome::Stored)
            }
            b'"' => {
                let text: String = serde_json::from_str(item).map_err(|_| mismatch())?;
                match slot {
                    Slot::String(target) => *target = text,
                    Slot::Dynamic(target) => *target = Value::String(text),
                    Slot::Bytes(target) => *target = number::decode_base64(&text)?,
                    Slot::Number(target) => *target = RawNumber::new(text)?,
                    _ => return Err(mismatch()),
                }
                Ok(Outcome::Stored)
            }
            first => {
                if first != b'-' && !first.is_ascii_digit() {
                    return Err(mismatch());
                }
                if !is_valid_number(item) {
                    return Err(if from_quoted {
                        mismatch()
                    } else {
                        LiteralError::MalformedNumber {
                            value: item.to_owned(),
                        }
                    });
                }
                match slot {
                    Slot::Int(target) => number::store_signed(item, target),
                    Slot::Uint(target) => number::store_unsigned(item, target),
                    Slot::Float(target) => number::store_float(item, target),
                    Slot::Number(target) => {
                        *target = RawNumber::new(item)?;
                        Ok(Outcome::Stored)
                    }
                    Slot::Dynamic(target) => {
                        *target = Value::Number(self.dynamic_number(item, expected_type)?);
                        Ok(Outcome::Stored)
                    }
                    _ => Err(mismatch()),
                }
            }
        }
    }

    /// Convert a valid numeric literal according to the number policy.
    fn dynamic_number(
        &self,
        item: &str,
        expected_type: &'static str,
    ) -> Result<serde_json::Number, LiteralError> {
        match self.number_policy {
            NumberPolicy::Float => item
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .ok_or_else(|| LiteralError::overflow(item, expected_type)),
            NumberPolicy::Exact => item
                .parse::<serde_json::Number>()
                .map_err(|_| LiteralError::overflow(item, expected_type)),
        }
    }

    fn convert(
        &self,
        raw: &str,
        target: &mut dyn std::any::Any,
        type_name: &'static str,
    ) -> Result<Outcome, LiteralError> {
        let missing = || LiteralError::MissingConverter {
            expected_type: type_name,
        };
        let result = self
            .converters
            .ok_or_else(missing)?
            .convert(raw, target)
            .ok_or_else(missing)?;
        result.map_err(|source| LiteralError::Custom {
            value: raw.to_owned(),
            expected_type: type_name,
            source,
        })?;
        Ok(Outcome::Stored)
    }
}

fn from_raw_text(
    raw: &str,
    target: &mut dyn FromRawText,
    type_name: &'static str,
) -> Result<Outcome, LiteralError> {
    target
        .from_raw_text(raw)
        .map_err(|source| LiteralError::Custom {
            value: raw.to_owned(),
            expected_type: type_name,
            source,
        })?;
    Ok(Outcome::Stored)
}

fn expect_null(item: &str, expected_type: &'static str, from_quoted: bool) -> Result<(), LiteralError> {
    if item == "null" {
        Ok(())
    } else {
        Err(LiteralError::mismatch(item, expected_type, from_quoted))
    }
}

/// The spellings accepted for booleans in plain tokens.
fn parse_bool(token: &str) -> Option<bool> {
    match token {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain<T: Field>(token: &str, target: &mut T) -> Result<Outcome, LiteralError> {
        LiteralStore::new().store_token(token, target.slot())
    }

    fn literal<T: Field>(item: &str, target: &mut T, quoted: bool) -> Result<Outcome, LiteralError> {
        LiteralStore::new().store_literal(item, target.slot(), quoted)
    }

    #[test]
    fn empty_tokens_leave_fields_untouched() {
        let mut n = 5u8;
        assert_eq!(plain("", &mut n).unwrap(), Outcome::Ignored);
        assert_eq!(n, 5);

        let mut s = String::from("kept");
        assert_eq!(literal("", &mut s, true).unwrap(), Outcome::Ignored);
        assert_eq!(s, "kept");

        let mut ids = vec![1u32, 2];
        assert_eq!(plain("", &mut ids).unwrap(), Outcome::Ignored);
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn plain_tokens_follow_the_field_shape() {
        let mut s = String::new();
        plain("hello world", &mut s).unwrap();
        assert_eq!(s, "hello world");

        let mut b = false;
        plain("1", &mut b).unwrap();
        assert!(b);
        plain("False", &mut b).unwrap();
        assert!(!b);
        assert!(matches!(
            plain("yes", &mut b),
            Err(LiteralError::TypeMismatch { .. })
        ));

        let mut blob = Blob::default();
        plain("aGVsbG8=", &mut blob).unwrap();
        assert_eq!(&*blob, b"hello");
        assert!(matches!(
            plain("not base64!", &mut blob),
            Err(LiteralError::MalformedByteSequence { .. })
        ));

        let mut dynamic = Value::Null;
        plain("42", &mut dynamic).unwrap();
        assert_eq!(dynamic, Value::String("42".into()));

        let mut number = RawNumber::default();
        plain("-1.50", &mut number).unwrap();
        assert_eq!(number.as_str(), "-1.50");
        assert!(matches!(
            plain("1.", &mut number),
            Err(LiteralError::MalformedNumber { .. })
        ));

        let mut maybe: Option<i8> = None;
        plain("-128", &mut maybe).unwrap();
        assert_eq!(maybe, Some(-128));
        assert!(matches!(
            plain("128", &mut maybe),
            Err(LiteralError::Overflow { .. })
        ));
        assert_eq!(maybe, Some(-128));

        let mut ids = vec![1u16, 2, 3];
        plain("9", &mut ids).unwrap();
        assert_eq!(ids, vec![9]);
    }

    #[test]
    fn nested_data_cannot_be_populated_from_tokens() {
        let mut map = std::collections::HashMap::<String, String>::new();
        let err = plain("x", &mut map).unwrap_err();
        assert!(matches!(err, LiteralError::UnsupportedShape { .. }));
        let err = literal("1", &mut map, false).unwrap_err();
        assert!(matches!(err, LiteralError::UnsupportedShape { .. }));
    }

    #[test]
    fn null_literals_only_reset_nullable_fields() {
        let mut maybe = Some(3u64);
        assert_eq!(literal("null", &mut maybe, false).unwrap(), Outcome::Stored);
        assert_eq!(maybe, None);

        let mut ids = vec![1i32];
        assert_eq!(literal("null", &mut ids, false).unwrap(), Outcome::Stored);
        assert!(ids.is_empty());

        let mut dynamic = Value::Bool(true);
        assert_eq!(literal("null", &mut dynamic, false).unwrap(), Outcome::Stored);
        assert_eq!(dynamic, Value::Null);

        let mut n = 7i32;
        assert_eq!(literal("null", &mut n, false).unwrap(), Outcome::Ignored);
        assert_eq!(n, 7);

        assert!(matches!(
            literal("nil", &mut maybe, true),
            Err(LiteralError::InvalidQuotedUse { .. })
        ));
    }

    #[test]
    fn json_literals_follow_the_field_shape() {
        let mut s = String::new();
        literal(r#""café""#, &mut s, false).unwrap();
        assert_eq!(s, "café");

        let mut b = false;
        literal("true", &mut b, false).unwrap();
        assert!(b);

        let mut blob = Blob::default();
        literal("\"aGk=\"", &mut blob, false).unwrap();
        assert_eq!(&*blob, b"hi");

        let mut maybe: Option<f32> = None;
        literal("-2.5e1", &mut maybe, false).unwrap();
        assert_eq!(maybe, Some(-25.0));

        let mut number = RawNumber::default();
        literal("\"12.0\"", &mut number, false).unwrap();
        assert_eq!(number.as_str(), "12.0");
        assert!(matches!(
            literal("\"twelve\"", &mut number, false),
            Err(LiteralError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn quoted_values_that_do_not_fit_are_errors() {
        let mut b = false;
        let err = literal("\"yes\"", &mut b, true).unwrap_err();
        assert!(matches!(err, LiteralError::InvalidQuotedUse { .. }));
        let err = literal("\"yes\"", &mut b, false).unwrap_err();
        assert!(matches!(err, LiteralError::TypeMismatch { .. }));

        let mut n = 0i32;
        let err = literal("abc", &mut n, true).unwrap_err();
        assert!(matches!(err, LiteralError::InvalidQuotedUse { .. }));

        let mut s = String::new();
        let err = literal("12", &mut s, true).unwrap_err();
        assert!(matches!(err, LiteralError::InvalidQuotedUse { .. }));
        let err = literal("12", &mut s, false).unwrap_err();
        assert!(matches!(err, LiteralError::TypeMismatch { .. }));
    }

    #[test]
    fn dynamic_numbers_follow_the_number_policy() {
        let mut dynamic = Value::Null;
        LiteralStore::new()
            .store_literal("12", dynamic.slot(), false)
            .unwrap();
        assert!(dynamic.is_f64());
        assert_eq!(dynamic.as_f64(), Some(12.0));

        LiteralStore::new()
            .number_policy(NumberPolicy::Exact)
            .store_literal("12", dynamic.slot(), false)
            .unwrap();
        assert_eq!(dynamic.as_u64(), Some(12));

        let err = LiteralStore::new()
            .store_literal("1e400", dynamic.slot(), false)
            .unwrap_err();
        assert!(matches!(err, LiteralError::Overflow { .. }));
    }

    #[test]
    fn converted_fields_need_a_registered_converter() {
        #[derive(Debug, Default, PartialEq)]
        struct Percent(u8);

        let mut target = Percent::default();
        let slot = Slot::Converted {
            target: &mut target,
            type_name: "Percent",
        };
        let err = LiteralStore::new().store_token("50%", slot).unwrap_err();
        assert!(matches!(err, LiteralError::MissingConverter { .. }));

        let mut converters = Converters::empty();
        converters.register(|raw: &str| {
            raw.trim_end_matches('%').parse::<u8>().map(Percent)
        });
        let store = LiteralStore::new().converters(&converters);
        let slot = Slot::Converted {
            target: &mut target,
            type_name: "Percent",
        };
        store.store_token("50%", slot).unwrap();
        assert_eq!(target, Percent(50));

        let slot = Slot::Converted {
            target: &mut target,
            type_name: "Percent",
        };
        let err = store.store_token("lots", slot).unwrap_err();
        insta::assert_snapshot!(err, @r"
        `lots` can't be parsed as a `Percent`.
        invalid digit found in string
        ");
    }

    #[test]
    fn error_messages() {
        let mut n = 0u8;
        insta::assert_snapshot!(plain("300", &mut n).unwrap_err(), @"`300` is out of range for a `u8`");
        insta::assert_snapshot!(plain("x", &mut n).unwrap_err(), @"`x` can't be parsed as a `u8`");

        let mut s = String::new();
        insta::assert_snapshot!(
            literal("true", &mut s, true).unwrap_err(),
            @"Invalid use of a quoted value: `true` can't be stored into a `String`"
        );
    }
}
