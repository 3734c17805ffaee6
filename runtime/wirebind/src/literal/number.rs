use std::num::IntErrorKind;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::Outcome;
use super::errors::LiteralError;
use super::slot::{FloatSlot, IntSlot, UintSlot};

/// Returns `true` if `s` follows the JSON number grammar.
///
/// That is: an optional `-`, then `0` or a non-zero digit followed by more
/// digits, then an optional fraction (`.` and at least one digit), then an
/// optional exponent (`e` or `E`, an optional sign, at least one digit).
/// Nothing else is allowed, not even surrounding whitespace.
pub fn is_valid_number(s: &str) -> bool {
    let mut rest = s.as_bytes();
    if let [b'-', tail @ ..] = rest {
        rest = tail;
    }

    rest = match rest {
        [b'0', tail @ ..] => tail,
        [b'1'..=b'9', tail @ ..] => skip_digits(tail),
        _ => return false,
    };

    if let [b'.', tail @ ..] = rest {
        rest = match tail {
            [b'0'..=b'9', ..] => skip_digits(tail),
            _ => return false,
        };
    }

    if let [b'e' | b'E', exponent @ ..] = rest {
        rest = match exponent {
            [b'+' | b'-', digits @ ..] => digits,
            _ => exponent,
        };
        rest = match rest {
            [b'0'..=b'9', ..] => skip_digits(rest),
            _ => return false,
        };
    }

    rest.is_empty()
}

fn skip_digits(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(bytes.len());
    &bytes[end..]
}

fn parse_wide(token: &str, expected_type: &'static str) -> Result<i128, LiteralError> {
    token.parse::<i128>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            LiteralError::overflow(token, expected_type)
        }
        _ => LiteralError::type_mismatch(token, expected_type),
    })
}

pub(super) fn store_signed(token: &str, slot: IntSlot<'_>) -> Result<Outcome, LiteralError> {
    let expected_type = slot.type_name();
    let value = parse_wide(token, expected_type)?;
    slot.set(value)
        .map_err(|_| LiteralError::overflow(token, expected_type))?;
    Ok(Outcome::Stored)
}

pub(super) fn store_unsigned(token: &str, slot: UintSlot<'_>) -> Result<Outcome, LiteralError> {
    let expected_type = slot.type_name();
    let value = parse_wide(token, expected_type)?;
    // Negative values don't fit any unsigned width.
    slot.set(value)
        .map_err(|_| LiteralError::overflow(token, expected_type))?;
    Ok(Outcome::Stored)
}

pub(super) fn store_float(token: &str, slot: FloatSlot<'_>) -> Result<Outcome, LiteralError> {
    let expected_type = slot.type_name();
    // Rules out `inf`, `NaN` and friends, which `str::parse` would accept.
    if !token
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return Err(LiteralError::type_mismatch(token, expected_type));
    }
    match slot {
        FloatSlot::F32(target) => {
            let value: f32 = token
                .parse()
                .map_err(|_| LiteralError::type_mismatch(token, expected_type))?;
            if value.is_infinite() {
                return Err(LiteralError::overflow(token, expected_type));
            }
            *target = value;
        }
        FloatSlot::F64(target) => {
            let value: f64 = token
                .parse()
                .map_err(|_| LiteralError::type_mismatch(token, expected_type))?;
            if value.is_infinite() {
                return Err(LiteralError::overflow(token, expected_type));
            }
            *target = value;
        }
    }
    Ok(Outcome::Stored)
}

pub(super) fn decode_base64(token: &str) -> Result<Vec<u8>, LiteralError> {
    STANDARD
        .decode(token.as_bytes())
        .map_err(|source| LiteralError::MalformedByteSequence {
            value: token.to_owned(),
            source,
        })
}
