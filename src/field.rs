//! Field model for target configuration structures.
//!
//! A target structure describes its fields through the `Resolve` trait,
//! usually generated with `#[derive(Resolve)]`. Leaf fields implement
//! `Scalar`, which owns the narrow coercion from a mock `Value`.
//!
//! # Example
//!
//! ```ignore
//! use cfgmock::{FieldInfo, FieldMut, Resolve};
//!
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl Resolve for Server {
//!     fn type_name(&self) -> &'static str {
//!         "Server"
//!     }
//!
//!     fn fields(&self) -> &'static [FieldInfo] {
//!         const FIELDS: &[FieldInfo] = &[FieldInfo::scalar("host"), FieldInfo::scalar("port")];
//!         FIELDS
//!     }
//!
//!     fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
//!         match index {
//!             0 => Some(FieldMut::Scalar(&mut self.host)),
//!             1 => Some(FieldMut::Scalar(&mut self.port)),
//!             _ => None,
//!         }
//!     }
//! }
//! ```

use crate::value::{Value, ValueKind};

/// How a field participates in path resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Terminal field holding a scalar
    Scalar,
    /// Named field holding another structure (`parent.child`)
    Nested,
    /// Transparent member whose fields are promoted into the parent
    Embedded,
}

/// Static description of one declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Declared field name
    pub name: &'static str,
    /// External name tag, matched in addition to `name`
    pub alias: Option<&'static str>,
    /// Role of the field during resolution
    pub kind: FieldKind,
}

impl FieldInfo {
    /// Describe a scalar field.
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            kind: FieldKind::Scalar,
        }
    }

    /// Describe a nested structure field.
    pub const fn nested(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            kind: FieldKind::Nested,
        }
    }

    /// Describe an embedded (transparent) structure field.
    pub const fn embedded(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            kind: FieldKind::Embedded,
        }
    }

    /// Attach an external name tag.
    pub const fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Whether `segment` names this field directly.
    pub fn matches(&self, segment: &str) -> bool {
        self.name == segment || self.alias == Some(segment)
    }

    /// Name used when printing canonical paths.
    pub fn display_name(&self) -> &'static str {
        self.alias.unwrap_or(self.name)
    }
}

/// Mutable access to one field of a structure.
pub enum FieldMut<'a> {
    /// A terminal scalar slot
    Scalar(&'a mut dyn Scalar),
    /// A nested or embedded structure
    Struct(&'a mut dyn Resolve),
}

/// A structure whose fields can be addressed by dotted paths.
///
/// `fields()` and `field_mut()` must agree: index `i` of the slice describes
/// what `field_mut(i)` returns, with `FieldKind::Scalar` paired with
/// `FieldMut::Scalar` and both structure kinds paired with `FieldMut::Struct`.
pub trait Resolve {
    /// Name used to qualify this structure when it is embedded.
    fn type_name(&self) -> &'static str;

    /// Declared fields, in declaration order.
    fn fields(&self) -> &'static [FieldInfo];

    /// Mutable handle to the field at `index`.
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>>;
}

impl<T: Resolve + ?Sized> Resolve for Box<T> {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn fields(&self) -> &'static [FieldInfo] {
        (**self).fields()
    }

    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
        (**self).field_mut(index)
    }
}

/// Why a value could not be assigned to a scalar field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct CoercionError {
    /// Kind the field expects
    pub expected: ValueKind,
    /// Kind of the supplied value
    pub actual: ValueKind,
    /// Human-readable reason
    pub message: String,
}

impl CoercionError {
    fn mismatch(expected: ValueKind, value: &Value) -> Self {
        Self {
            expected,
            actual: value.kind(),
            message: format!("cannot assign {} value {}", value.type_name(), value),
        }
    }

    fn out_of_range(expected: ValueKind, type_name: &str, value: &Value) -> Self {
        Self {
            expected,
            actual: value.kind(),
            message: format!("{} is out of range for {}", value, type_name),
        }
    }
}

/// A terminal field that a mock `Value` can be assigned to.
pub trait Scalar {
    /// Declared kind of the field.
    fn kind(&self) -> ValueKind;

    /// Check whether `value` could be assigned, without writing it.
    fn check(&self, value: &Value) -> Result<(), CoercionError>;

    /// Coerce `value` to the field's type and store it.
    fn assign(&mut self, value: &Value) -> Result<(), CoercionError>;
}

impl Scalar for String {
    fn kind(&self) -> ValueKind {
        ValueKind::String
    }

    fn check(&self, value: &Value) -> Result<(), CoercionError> {
        match value {
            Value::String(_) => Ok(()),
            other => Err(CoercionError::mismatch(ValueKind::String, other)),
        }
    }

    fn assign(&mut self, value: &Value) -> Result<(), CoercionError> {
        match value {
            Value::String(s) => {
                self.clone_from(s);
                Ok(())
            }
            other => Err(CoercionError::mismatch(ValueKind::String, other)),
        }
    }
}

impl Scalar for bool {
    fn kind(&self) -> ValueKind {
        ValueKind::Bool
    }

    fn check(&self, value: &Value) -> Result<(), CoercionError> {
        match value {
            Value::Bool(_) => Ok(()),
            other => Err(CoercionError::mismatch(ValueKind::Bool, other)),
        }
    }

    fn assign(&mut self, value: &Value) -> Result<(), CoercionError> {
        match value {
            Value::Bool(b) => {
                *self = *b;
                Ok(())
            }
            other => Err(CoercionError::mismatch(ValueKind::Bool, other)),
        }
    }
}

macro_rules! impl_scalar_int {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                fn kind(&self) -> ValueKind {
                    ValueKind::Integer
                }

                fn check(&self, value: &Value) -> Result<(), CoercionError> {
                    match value {
                        Value::Integer(i) => <$t>::try_from(*i).map(|_| ()).map_err(|_| {
                            CoercionError::out_of_range(ValueKind::Integer, stringify!($t), value)
                        }),
                        other => Err(CoercionError::mismatch(ValueKind::Integer, other)),
                    }
                }

                fn assign(&mut self, value: &Value) -> Result<(), CoercionError> {
                    match value {
                        Value::Integer(i) => {
                            *self = <$t>::try_from(*i).map_err(|_| {
                                CoercionError::out_of_range(ValueKind::Integer, stringify!($t), value)
                            })?;
                            Ok(())
                        }
                        other => Err(CoercionError::mismatch(ValueKind::Integer, other)),
                    }
                }
            }
        )*
    };
}

impl_scalar_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Convert `value` to `T` without changing it.
///
/// Integers must round-trip exactly and finite floats must stay finite.
fn exact_float<T>(value: &Value, type_name: &str) -> Result<T, CoercionError>
where
    T: Copy + Into<f64> + FloatCast,
{
    let converted = match value {
        Value::Float(f) => {
            let x = T::from_f64(*f);
            if f.is_finite() && !Into::<f64>::into(x).is_finite() {
                return Err(CoercionError::out_of_range(
                    ValueKind::Float,
                    type_name,
                    value,
                ));
            }
            x
        }
        Value::Integer(i) => {
            let x = T::from_f64(*i as f64);
            if Into::<f64>::into(x) as i128 != i128::from(*i) {
                return Err(CoercionError::out_of_range(
                    ValueKind::Float,
                    type_name,
                    value,
                ));
            }
            x
        }
        other => return Err(CoercionError::mismatch(ValueKind::Float, other)),
    };
    Ok(converted)
}

/// Rounding conversion from `f64`.
trait FloatCast {
    fn from_f64(f: f64) -> Self;
}

macro_rules! impl_scalar_float {
    ($($t:ty),*) => {
        $(
            impl FloatCast for $t {
                #[allow(clippy::unnecessary_cast)]
                fn from_f64(f: f64) -> Self {
                    f as $t
                }
            }

            impl Scalar for $t {
                fn kind(&self) -> ValueKind {
                    ValueKind::Float
                }

                fn check(&self, value: &Value) -> Result<(), CoercionError> {
                    exact_float::<$t>(value, stringify!($t)).map(|_| ())
                }

                fn assign(&mut self, value: &Value) -> Result<(), CoercionError> {
                    *self = exact_float::<$t>(value, stringify!($t))?;
                    Ok(())
                }
            }
        )*
    };
}

impl_scalar_float!(f32, f64);
