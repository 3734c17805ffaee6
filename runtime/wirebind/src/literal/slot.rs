use std::any::{Any, type_name};
use std::collections::{BTreeMap, HashMap};
use std::num::TryFromIntError;

use super::errors::LiteralError;
use super::types::{Blob, FromRawText, RawNumber};
use super::{Outcome, Shape};

/// A type that can be used as a field of a [`Record`](crate::Record).
///
/// The implementation tells the [`LiteralStore`](super::LiteralStore) which
/// [`Shape`] the field has and hands out a mutable, typed view of it, a [`Slot`].
///
/// wirebind implements `Field` for strings, booleans, integers, floats,
/// [`Blob`], [`RawNumber`], [`serde_json::Value`], `Option<T>` and `Vec<T>`.
/// Maps report [`Shape::Unsupported`]: they can only be populated from the
/// request body.
pub trait Field {
    /// The shape of this field type.
    fn shape() -> Shape;

    /// A typed view on the field, used to store literal tokens into it.
    fn slot(&mut self) -> Slot<'_>;
}

/// A mutable, typed view on a single destination field.
#[non_exhaustive]
pub enum Slot<'a> {
    String(&'a mut String),
    Bool(&'a mut bool),
    Int(IntSlot<'a>),
    Uint(UintSlot<'a>),
    Float(FloatSlot<'a>),
    Bytes(&'a mut Vec<u8>),
    Number(&'a mut RawNumber),
    Dynamic(&'a mut serde_json::Value),
    /// A type that knows how to parse its own raw text.
    Custom {
        target: &'a mut dyn FromRawText,
        type_name: &'static str,
    },
    /// A type populated through the converter registered for its [`TypeId`](std::any::TypeId).
    Converted {
        target: &'a mut dyn Any,
        type_name: &'static str,
    },
    Nullable(&'a mut dyn Nullable),
    Sequence(&'a mut dyn Sequence),
    Unsupported {
        type_name: &'static str,
    },
}

impl Slot<'_> {
    /// The name of the destination type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Slot::String(_) => "String",
            Slot::Bool(_) => "bool",
            Slot::Int(i) => i.type_name(),
            Slot::Uint(u) => u.type_name(),
            Slot::Float(f) => f.type_name(),
            Slot::Bytes(_) => "Blob",
            Slot::Number(_) => "RawNumber",
            Slot::Dynamic(_) => "serde_json::Value",
            Slot::Custom { type_name, .. }
            | Slot::Converted { type_name, .. }
            | Slot::Unsupported { type_name } => type_name,
            Slot::Nullable(n) => n.type_name(),
            Slot::Sequence(s) => s.type_name(),
        }
    }
}

/// Store a value into a slot, reporting what happened.
pub type StoreFn<'f> = dyn FnMut(Slot<'_>) -> Result<Outcome, LiteralError> + 'f;

/// A field that may hold no value at all, such as `Option<T>`.
pub trait Nullable {
    /// Reset the field to its "no value" state.
    fn clear(&mut self);

    /// Store into a fresh inner value, which replaces the current one only if
    /// something was actually stored.
    fn store_with(&mut self, store: &mut StoreFn<'_>) -> Result<Outcome, LiteralError>;

    /// The shape of the value held when the field isn't empty.
    fn inner_shape(&self) -> Shape;

    fn type_name(&self) -> &'static str;
}

/// A field holding a sequence of values, such as `Vec<T>`.
pub trait Sequence {
    /// Remove all elements.
    fn clear(&mut self);

    /// Store into a fresh element, which is appended only if something was
    /// actually stored.
    fn push_with(&mut self, store: &mut StoreFn<'_>) -> Result<Outcome, LiteralError>;

    fn type_name(&self) -> &'static str;
}

macro_rules! width_slot {
    (@shape IntSlot, $ty:ident) => { Shape::SignedInteger { bits: $ty::BITS } };
    (@shape UintSlot, $ty:ident) => { Shape::UnsignedInteger { bits: $ty::BITS } };
    (@slot IntSlot, $variant:ident, $e:expr) => { Slot::Int(IntSlot::$variant($e)) };
    (@slot UintSlot, $variant:ident, $e:expr) => { Slot::Uint(UintSlot::$variant($e)) };
    ($slot:ident, $wide:ty, $($variant:ident => $ty:ident),+ $(,)?) => {
        #[derive(Debug)]
        pub enum $slot<'a> {
            $($variant(&'a mut $ty)),+
        }

        impl $slot<'_> {
            /// The bit width of the destination.
            pub fn bits(&self) -> u32 {
                match self {
                    $($slot::$variant(_) => $ty::BITS),+
                }
            }

            pub fn type_name(&self) -> &'static str {
                match self {
                    $($slot::$variant(_) => stringify!($ty)),+
                }
            }

            /// Write `value` into the destination, failing if it doesn't fit.
            pub fn set(self, value: $wide) -> Result<(), TryFromIntError> {
                match self {
                    $($slot::$variant(target) => *target = $ty::try_from(value)?),+
                }
                Ok(())
            }
        }

        $(
            impl Field for $ty {
                fn shape() -> Shape {
                    width_slot!(@shape $slot, $ty)
                }

                fn slot(&mut self) -> Slot<'_> {
                    width_slot!(@slot $slot, $variant, self)
                }
            }
        )+
    };
}

width_slot!(IntSlot, i128, I8 => i8, I16 => i16, I32 => i32, I64 => i64, Isize => isize);
width_slot!(UintSlot, i128, U8 => u8, U16 => u16, U32 => u32, U64 => u64, Usize => usize);

#[derive(Debug)]
pub enum FloatSlot<'a> {
    F32(&'a mut f32),
    F64(&'a mut f64),
}

impl FloatSlot<'_> {
    pub fn bits(&self) -> u32 {
        match self {
            FloatSlot::F32(_) => 32,
            FloatSlot::F64(_) => 64,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FloatSlot::F32(_) => "f32",
            FloatSlot::F64(_) => "f64",
        }
    }
}

impl Field for f32 {
    fn shape() -> Shape {
        Shape::Float { bits: 32 }
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Float(FloatSlot::F32(self))
    }
}

impl Field for f64 {
    fn shape() -> Shape {
        Shape::Float { bits: 64 }
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Float(FloatSlot::F64(self))
    }
}

impl Field for String {
    fn shape() -> Shape {
        Shape::String
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::String(self)
    }
}

impl Field for bool {
    fn shape() -> Shape {
        Shape::Boolean
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Bool(self)
    }
}

impl Field for Blob {
    fn shape() -> Shape {
        Shape::ByteSequence
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Bytes(&mut self.0)
    }
}

impl Field for RawNumber {
    fn shape() -> Shape {
        Shape::Number
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Number(self)
    }
}

impl Field for serde_json::Value {
    fn shape() -> Shape {
        Shape::Dynamic
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Dynamic(self)
    }
}

impl<T: Field + Default> Field for Option<T> {
    fn shape() -> Shape {
        Shape::Nullable(Box::new(T::shape()))
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Nullable(self)
    }
}

impl<T: Field + Default> Nullable for Option<T> {
    fn clear(&mut self) {
        *self = None;
    }

    fn store_with(&mut self, store: &mut StoreFn<'_>) -> Result<Outcome, LiteralError> {
        let mut value = T::default();
        let outcome = store(value.slot())?;
        if outcome == Outcome::Stored {
            *self = Some(value);
        }
        Ok(outcome)
    }

    fn inner_shape(&self) -> Shape {
        T::shape()
    }

    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

impl<T: Field + Default> Field for Vec<T> {
    fn shape() -> Shape {
        Shape::Sequence(Box::new(T::shape()))
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Sequence(self)
    }
}

impl<T: Field + Default> Sequence for Vec<T> {
    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn push_with(&mut self, store: &mut StoreFn<'_>) -> Result<Outcome, LiteralError> {
        let mut element = T::default();
        let outcome = store(element.slot())?;
        if outcome == Outcome::Stored {
            self.push(element);
        }
        Ok(outcome)
    }

    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

impl<K, V, S> Field for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::Unsupported(type_name::<Self>())
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Unsupported {
            type_name: type_name::<Self>(),
        }
    }
}

impl<K, V> Field for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Unsupported(type_name::<Self>())
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Unsupported {
            type_name: type_name::<Self>(),
        }
    }
}
