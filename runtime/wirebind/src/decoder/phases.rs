use serde_json::{Map, Value};

use crate::literal::{LiteralError, LiteralStore, Outcome, Sequence, Shape, Slot};
use crate::record::{FieldAccess, FieldKey, FieldVisitor, Record};
use crate::request::path::PathParams;
use crate::request::query::QueryParams;

use super::config::{RepeatedValuePolicy, TokenSyntax};
use super::errors::{BodyError, DecodeError, Origin, TokenError};

/// Store path and query tokens into every field.
pub(super) struct TokenPhase<'a> {
    pub(super) store: LiteralStore<'a>,
    pub(super) syntax: TokenSyntax,
    pub(super) repeated_values: RepeatedValuePolicy,
    pub(super) path_params: &'a PathParams,
    pub(super) query_params: &'a QueryParams,
}

impl TokenPhase<'_> {
    fn store(&self, key: &FieldKey, token: &str, slot: Slot<'_>) -> Result<Outcome, LiteralError> {
        match self.syntax {
            TokenSyntax::Plain => self.store.store_token(token, slot),
            TokenSyntax::Json => self.store.store_literal(token, slot, key.quoted),
        }
    }

    fn store_from(
        &self,
        origin: Origin,
        key: &FieldKey,
        token: &str,
        field: &mut dyn FieldAccess,
    ) -> Result<(), DecodeError> {
        let outcome = self
            .store(key, token, field.slot())
            .map_err(|source| TokenError {
                wire_name: key.wire_name,
                origin,
                source,
            })?;
        tracing::trace!(
            %origin,
            wire_name = key.wire_name,
            field = key.rust_name,
            ?outcome,
            "Stored token"
        );
        Ok(())
    }

    /// Replace the content of a sequence field (optional or not) with every query value.
    fn store_sequence(
        &self,
        key: &FieldKey,
        values: &[String],
        field: &mut dyn FieldAccess,
    ) -> Result<(), DecodeError> {
        let outcome = match field.slot() {
            Slot::Sequence(sequence) => self.fill_sequence(key, values, sequence),
            Slot::Nullable(target) => target.store_with(&mut |inner| match inner {
                Slot::Sequence(sequence) => self.fill_sequence(key, values, sequence),
                _ => Ok(Outcome::Ignored),
            }),
            _ => Ok(Outcome::Ignored),
        }
        .map_err(|source| TokenError {
            wire_name: key.wire_name,
            origin: Origin::Query,
            source,
        })?;
        tracing::trace!(
            origin = %Origin::Query,
            wire_name = key.wire_name,
            field = key.rust_name,
            n_values = values.len(),
            ?outcome,
            "Stored repeated tokens"
        );
        Ok(())
    }

    /// `Stored` if at least one value made it into the sequence.
    fn fill_sequence(
        &self,
        key: &FieldKey,
        values: &[String],
        sequence: &mut dyn Sequence,
    ) -> Result<Outcome, LiteralError> {
        sequence.clear();
        let mut outcome = Outcome::Ignored;
        for value in values {
            if sequence.push_with(&mut |element| self.store(key, value, element))?
                == Outcome::Stored
            {
                outcome = Outcome::Stored;
            }
        }
        Ok(outcome)
    }
}

/// Sequences and optional sequences receive every value of a repeated query parameter.
fn holds_sequence(slot: Slot<'_>) -> bool {
    match slot {
        Slot::Sequence(_) => true,
        Slot::Nullable(target) => matches!(target.inner_shape(), Shape::Sequence(_)),
        _ => false,
    }
}

impl FieldVisitor for TokenPhase<'_> {
    fn visit_field(
        &mut self,
        key: &FieldKey,
        field: &mut dyn FieldAccess,
    ) -> Result<(), DecodeError> {
        if let Some(token) = self.path_params.get(key.wire_name) {
            self.store_from(Origin::Path, key, token, field)?;
        }

        match self.query_params.get_all(key.wire_name) {
            [] => Ok(()),
            [value] => self.store_from(Origin::Query, key, value, field),
            values => {
                if holds_sequence(field.slot()) {
                    return self.store_sequence(key, values, field);
                }
                let value = match self.repeated_values {
                    RepeatedValuePolicy::Reject => {
                        return Err(DecodeError::RepeatedQueryParameter {
                            wire_name: key.wire_name,
                            count: values.len(),
                        });
                    }
                    RepeatedValuePolicy::First => &values[0],
                    RepeatedValuePolicy::Last => &values[values.len() - 1],
                };
                self.store_from(Origin::Query, key, value, field)
            }
        }
    }
}

/// Merge a JSON body over the record, key by key.
///
/// Empty (or whitespace-only) bodies and a `null` document leave the record untouched.
pub(super) fn merge_body<R: Record>(body: &[u8], record: &mut R) -> Result<(), DecodeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        tracing::trace!("The request body is empty, skipping");
        return Ok(());
    }
    let document: Value = serde_json::from_slice(body).map_err(BodyError::Syntax)?;
    let object = match document {
        Value::Object(object) => object,
        Value::Null => return Ok(()),
        other => {
            return Err(BodyError::NotAnObject {
                found: kind_of(&other),
            }
            .into());
        }
    };
    record.visit(&mut BodyPhase { object })
}

struct BodyPhase {
    object: Map<String, Value>,
}

impl FieldVisitor for BodyPhase {
    fn visit_field(
        &mut self,
        key: &FieldKey,
        field: &mut dyn FieldAccess,
    ) -> Result<(), DecodeError> {
        // The first field using a wire name consumes its value.
        let Some(value) = self.object.remove(key.wire_name) else {
            return Ok(());
        };
        field.merge_json(value).map_err(|e| {
            let location = match e.path() {
                None => key.wire_name.to_owned(),
                Some(path) if path.starts_with('[') => format!("{}{path}", key.wire_name),
                Some(path) => format!("{}.{path}", key.wire_name),
            };
            BodyError::Field {
                wire_name: key.wire_name,
                location,
                source: e.into_inner(),
            }
        })?;
        tracing::trace!(
            wire_name = key.wire_name,
            field = key.rust_name,
            "Merged body value"
        );
        Ok(())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
