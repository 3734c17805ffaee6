use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock};

use crate::literal::Shape;

use super::Record;

/// The identity of a field on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldKey {
    /// The key used in path parameters, query parameters and body objects.
    pub wire_name: &'static str,
    /// The name of the field in the Rust struct.
    pub rust_name: &'static str,
    /// Whether tokens for this field come from a quoted context.
    pub quoted: bool,
}

impl FieldKey {
    pub const fn new(wire_name: &'static str, rust_name: &'static str, quoted: bool) -> Self {
        Self {
            wire_name,
            rust_name,
            quoted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub shape: Shape,
}

impl FieldDescriptor {
    pub fn new(key: FieldKey, shape: Shape) -> Self {
        Self { key, shape }
    }
}

/// The fields of a [`Record`] type, in declaration order.
///
/// Fields of flattened records are inlined where the flattened field is declared.
/// Skipped fields are not listed.
#[derive(Debug)]
pub struct Schema {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// The name of the record type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// The first field using `wire_name`, if any.
    pub fn field(&self, wire_name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key.wire_name == wire_name)
    }
}

static SCHEMAS: LazyLock<RwLock<HashMap<TypeId, &'static Schema>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Computed once per type, then leaked: record types live for the whole process.
pub(super) fn schema_of<R: Record>() -> &'static Schema {
    let id = TypeId::of::<R>();
    let cached = SCHEMAS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .copied();
    if let Some(schema) = cached {
        return schema;
    }

    let mut fields = Vec::new();
    R::describe(&mut fields);
    let schema = Schema {
        type_name: type_name::<R>(),
        fields,
    };
    let mut schemas = SCHEMAS.write().unwrap_or_else(PoisonError::into_inner);
    *schemas
        .entry(id)
        .or_insert_with(|| &*Box::leak(Box::new(schema)))
}
