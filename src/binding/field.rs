//! Typed field slots and textual value coercion.
//!
//! # Coercion rules
//! - bool: boolean literal grammar; unparsable text writes `false`
//! - String: verbatim
//! - i32/i64, f32/f64: parsed into the field's own width; unparsable text
//!   leaves the field untouched
//! - anything else: reported as unsupported, never written

use std::fmt;

/// Declared kind of a bound field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    String,
    Int32,
    Int64,
    Float32,
    Float64,
    /// A type the binder refuses to coerce into, named by its Rust type.
    Unsupported(&'static str),
}

impl FieldKind {
    pub fn is_supported(&self) -> bool {
        !matches!(self, FieldKind::Unsupported(_))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::Int32 => "int32",
            FieldKind::Int64 => "int64",
            FieldKind::Float32 => "float32",
            FieldKind::Float64 => "float64",
            FieldKind::Unsupported(name) => name,
        };
        f.write_str(name)
    }
}

/// What happened when a textual value was written into a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// The parsed value was written.
    Assigned,
    /// The text did not parse; the field holds its fallback or previous value.
    ParseFailed,
}

/// A field the binder can write configuration text into.
pub trait ConfigField {
    /// The declared kind, checked before any assignment.
    fn kind(&self) -> FieldKind;

    /// Coerce `raw` into this field. Never called for unsupported kinds.
    fn assign(&mut self, raw: &str) -> Coercion;
}

/// Parse the boolean literal grammar used by the service.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl ConfigField for bool {
    fn kind(&self) -> FieldKind {
        FieldKind::Bool
    }

    fn assign(&mut self, raw: &str) -> Coercion {
        match parse_bool(raw) {
            Some(value) => {
                *self = value;
                Coercion::Assigned
            }
            None => {
                *self = false;
                Coercion::ParseFailed
            }
        }
    }
}

impl ConfigField for String {
    fn kind(&self) -> FieldKind {
        FieldKind::String
    }

    fn assign(&mut self, raw: &str) -> Coercion {
        raw.clone_into(self);
        Coercion::Assigned
    }
}

macro_rules! parsed_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl ConfigField for $ty {
                fn kind(&self) -> FieldKind {
                    FieldKind::$kind
                }

                fn assign(&mut self, raw: &str) -> Coercion {
                    match raw.parse::<$ty>() {
                        Ok(value) => {
                            *self = value;
                            Coercion::Assigned
                        }
                        Err(_) => Coercion::ParseFailed,
                    }
                }
            }
        )*
    };
}

parsed_field!(i32 => Int32, i64 => Int64, f32 => Float32, f64 => Float64);

macro_rules! unsupported_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ConfigField for $ty {
                fn kind(&self) -> FieldKind {
                    FieldKind::Unsupported(stringify!($ty))
                }

                fn assign(&mut self, _raw: &str) -> Coercion {
                    Coercion::ParseFailed
                }
            }
        )*
    };
}

unsupported_field!(i8, i16, i128, isize, u8, u16, u32, u64, u128, usize, char);
