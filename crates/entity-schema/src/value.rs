// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property values and host vector handles.

use crate::error::PropertyError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Number of components of a fixed-arity vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorArity {
    Two,
    Three,
    Four,
}

impl VectorArity {
    /// Component count (2, 3 or 4).
    pub const fn count(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    /// Arity for a component count, `None` outside {2,3,4}.
    pub const fn from_count(count: usize) -> Option<Self> {
        match count {
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            _ => None,
        }
    }

    /// Canonical codec name (`VECTOR2`, `VECTOR3`, `VECTOR4`).
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Two => "VECTOR2",
            Self::Three => "VECTOR3",
            Self::Four => "VECTOR4",
        }
    }
}

/// Host-side fixed-arity vector.
///
/// Cloning the handle shares the same instance: attribute slots holding a
/// clone observe in-place updates made through [`ScriptVector::assign`].
/// Use [`ScriptVector::detached`] for an independent copy.
#[derive(Clone)]
pub struct ScriptVector {
    arity: VectorArity,
    components: Arc<RwLock<[f32; 4]>>,
}

impl ScriptVector {
    /// Create a vector from its components. The slice length sets the arity.
    pub fn new(components: &[f32]) -> Result<Self, PropertyError> {
        let arity =
            VectorArity::from_count(components.len()).ok_or_else(|| PropertyError::TypeMismatch {
                expected: "2, 3 or 4 vector components".into(),
                found: format!("{} components", components.len()),
            })?;
        let mut storage = [0.0f32; 4];
        storage[..components.len()].copy_from_slice(components);
        Ok(Self {
            arity,
            components: Arc::new(RwLock::new(storage)),
        })
    }

    /// All-zero vector of the given arity.
    pub fn zero(arity: VectorArity) -> Self {
        Self {
            arity,
            components: Arc::new(RwLock::new([0.0; 4])),
        }
    }

    pub fn arity(&self) -> VectorArity {
        self.arity
    }

    /// Snapshot of the components.
    pub fn components(&self) -> Vec<f32> {
        let guard = self.components.read();
        guard[..self.arity.count()].to_vec()
    }

    /// Component by index.
    pub fn get(&self, index: usize) -> Option<f32> {
        if index >= self.arity.count() {
            return None;
        }
        Some(self.components.read()[index])
    }

    /// True when both handles refer to the same instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.components, &other.components)
    }

    /// Independent copy with the same contents.
    pub fn detached(&self) -> Self {
        let snapshot = *self.components.read();
        Self {
            arity: self.arity,
            components: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Overwrite every component from `source` in place.
    ///
    /// `source` may be another vector or a numeric sequence. The whole source
    /// is validated before the first write, so a failure leaves the vector
    /// untouched.
    pub fn assign(&self, source: &Value) -> Result<(), PropertyError> {
        let incoming = source.vector_components()?;
        if incoming.len() != self.arity.count() {
            return Err(PropertyError::TypeMismatch {
                expected: format!("{} components", self.arity.count()),
                found: format!("{} components", incoming.len()),
            });
        }
        let mut guard = self.components.write();
        guard[..incoming.len()].copy_from_slice(&incoming);
        Ok(())
    }
}

impl PartialEq for ScriptVector {
    fn eq(&self, other: &Self) -> bool {
        self.arity == other.arity && self.components() == other.components()
    }
}

impl fmt::Debug for ScriptVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector{}{:?}", self.arity.count(), self.components())
    }
}

/// Reference to a remote entity mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MailboxRef {
    /// Target entity id.
    pub entity_id: i32,
    /// Component the mailbox routes to (cell, base, client...).
    pub component: u16,
}

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Unicode(String),
    Blob(Vec<u8>),

    // Composites
    Vector(ScriptVector),
    Dict(HashMap<String, Value>),
    Sequence(Vec<Value>),

    Mailbox(MailboxRef),
    None,
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short variant label used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I8(_) => "int8",
            Self::I16(_) => "int16",
            Self::I32(_) => "int32",
            Self::I64(_) => "int64",
            Self::U8(_) => "uint8",
            Self::U16(_) => "uint16",
            Self::U32(_) => "uint32",
            Self::U64(_) => "uint64",
            Self::F32(_) => "float",
            Self::F64(_) => "double",
            Self::String(_) => "string",
            Self::Unicode(_) => "unicode",
            Self::Blob(_) => "blob",
            Self::Vector(_) => "vector",
            Self::Dict(_) => "dict",
            Self::Sequence(_) => "sequence",
            Self::Mailbox(_) => "mailbox",
            Self::None => "none",
        }
    }

    /// Any integer variant widened to i128.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Self::I8(v) => Some(i128::from(*v)),
            Self::I16(v) => Some(i128::from(*v)),
            Self::I32(v) => Some(i128::from(*v)),
            Self::I64(v) => Some(i128::from(*v)),
            Self::U8(v) => Some(i128::from(*v)),
            Self::U16(v) => Some(i128::from(*v)),
            Self::U32(v) => Some(i128::from(*v)),
            Self::U64(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    /// Any numeric variant as f64.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::F32(v) => Some(f64::from(*v)),
            Self::F64(v) => Some(*v),
            other => other.as_integer().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) | Self::Unicode(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&ScriptVector> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Self::Dict(v) => Some(v),
            _ => None,
        }
    }

    /// Dict entry by key.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.as_dict()?.get(name)
    }

    /// Components of a vector or numeric sequence.
    pub(crate) fn vector_components(&self) -> Result<Vec<f32>, PropertyError> {
        match self {
            Self::Vector(v) => Ok(v.components()),
            Self::Sequence(items) => items
                .iter()
                .map(|item| {
                    item.as_number()
                        .map(|n| n as f32)
                        .ok_or_else(|| PropertyError::TypeMismatch {
                            expected: "numeric vector component".into(),
                            found: item.kind_name().into(),
                        })
                })
                .collect(),
            other => Err(PropertyError::TypeMismatch {
                expected: "vector or numeric sequence".into(),
                found: other.kind_name().into(),
            }),
        }
    }

    /// Deep copy: nested vectors are detached from their source instances.
    pub fn deep_copy(&self) -> Self {
        match self {
            Self::Vector(v) => Self::Vector(v.detached()),
            Self::Dict(map) => Self::Dict(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.deep_copy()))
                    .collect(),
            ),
            Self::Sequence(items) => Self::Sequence(items.iter().map(Self::deep_copy).collect()),
            other => other.clone(),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Self::I8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::I16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<ScriptVector> for Value {
    fn from(v: ScriptVector) -> Self {
        Self::Vector(v)
    }
}

impl From<MailboxRef> for Value {
    fn from(v: MailboxRef) -> Self {
        Self::Mailbox(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Sequence(v.into_iter().map(Into::into).collect())
    }
}
