// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scalar codecs.

use super::{invalid_default, DataType, DataTypeId, DataTypeKind};
use crate::error::PropertyError;
use crate::stream::MemoryStream;
use crate::value::Value;

/// Scalar shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    String,
    Unicode,
    Blob,
}

impl PrimitiveKind {
    pub const ALL: [Self; 14] = [
        Self::Bool,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Float,
        Self::Double,
        Self::String,
        Self::Unicode,
        Self::Blob,
    ];

    /// Canonical schema name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "BOOL",
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::UInt8 => "UINT8",
            Self::UInt16 => "UINT16",
            Self::UInt32 => "UINT32",
            Self::UInt64 => "UINT64",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::String => "STRING",
            Self::Unicode => "UNICODE",
            Self::Blob => "BLOB",
        }
    }

    /// Encoded size in bytes, `None` for length-prefixed kinds.
    pub const fn size(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float => Some(4),
            Self::Int64 | Self::UInt64 | Self::Double => Some(8),
            Self::String | Self::Unicode | Self::Blob => None,
        }
    }

    const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }

    /// Build the value variant for an integer, `None` when out of range.
    fn integer_value(self, v: i128) -> Option<Value> {
        let value = match self {
            Self::Int8 => Value::I8(i8::try_from(v).ok()?),
            Self::Int16 => Value::I16(i16::try_from(v).ok()?),
            Self::Int32 => Value::I32(i32::try_from(v).ok()?),
            Self::Int64 => Value::I64(i64::try_from(v).ok()?),
            Self::UInt8 => Value::U8(u8::try_from(v).ok()?),
            Self::UInt16 => Value::U16(u16::try_from(v).ok()?),
            Self::UInt32 => Value::U32(u32::try_from(v).ok()?),
            Self::UInt64 => Value::U64(u64::try_from(v).ok()?),
            _ => return None,
        };
        Some(value)
    }

    /// Value of the right variant for `value`, `None` if it does not fit.
    fn coerce(self, value: &Value) -> Option<Value> {
        match self {
            Self::Bool => match value {
                Value::Bool(_) => Some(value.clone()),
                _ => None,
            },
            k if k.is_integer() => k.integer_value(value.as_integer()?),
            Self::Float => exact_f32(value).map(Value::F32),
            Self::Double => value.as_number().map(Value::F64),
            Self::String => value.as_str().map(|s| Value::String(s.to_string())),
            Self::Unicode => value.as_str().map(|s| Value::Unicode(s.to_string())),
            Self::Blob => match value {
                Value::Blob(_) => Some(value.clone()),
                _ => None,
            },
            _ => None,
        }
    }
}

/// `value` as an f32, `None` unless the conversion is lossless.
fn exact_f32(value: &Value) -> Option<f32> {
    match value {
        Value::F32(v) => Some(*v),
        Value::F64(v) => {
            let narrowed = *v as f32;
            (v.is_nan() || f64::from(narrowed) == *v).then_some(narrowed)
        }
        other => {
            let v = other.as_integer()?;
            let narrowed = v as f32;
            (narrowed as i128 == v).then_some(narrowed)
        }
    }
}

/// Length prefix for `len` payload bytes plus `extra` trailing bytes.
fn length_prefix(len: usize, extra: usize) -> Option<u32> {
    len.checked_add(extra).and_then(|n| u32::try_from(n).ok())
}

/// Codec for one [`PrimitiveKind`].
#[derive(Debug, Clone)]
pub struct PrimitiveType {
    id: DataTypeId,
    kind: PrimitiveKind,
}

impl PrimitiveType {
    pub fn new(id: DataTypeId, kind: PrimitiveKind) -> Self {
        Self { id, kind }
    }

    pub fn primitive_kind(&self) -> PrimitiveKind {
        self.kind
    }
}

impl DataType for PrimitiveType {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn id(&self) -> DataTypeId {
        self.id
    }

    fn kind(&self) -> DataTypeKind {
        DataTypeKind::Primitive(self.kind)
    }

    fn encode(&self, stream: &mut MemoryStream, value: &Value) -> Result<(), PropertyError> {
        let coerced = self
            .kind
            .coerce(value)
            .ok_or_else(|| PropertyError::mismatch(self.kind.name(), value.kind_name()))?;

        match coerced {
            Value::Bool(v) => stream.write_bool(v),
            Value::I8(v) => stream.write_i8(v),
            Value::I16(v) => stream.write_i16(v),
            Value::I32(v) => stream.write_i32(v),
            Value::I64(v) => stream.write_i64(v),
            Value::U8(v) => stream.write_u8(v),
            Value::U16(v) => stream.write_u16(v),
            Value::U32(v) => stream.write_u32(v),
            Value::U64(v) => stream.write_u64(v),
            Value::F32(v) => stream.write_f32(v),
            Value::F64(v) => stream.write_f64(v),
            Value::String(s) | Value::Unicode(s) => {
                length_prefix(s.len(), 1).ok_or_else(|| {
                    PropertyError::mismatch("string shorter than u32::MAX bytes", "longer string")
                })?;
                stream.write_string(&s)
            }
            Value::Blob(b) => {
                length_prefix(b.len(), 0).ok_or_else(|| {
                    PropertyError::mismatch("blob shorter than u32::MAX bytes", "longer blob")
                })?;
                stream.write_blob(&b)
            }
            other => {
                return Err(PropertyError::mismatch(
                    self.kind.name(),
                    other.kind_name(),
                ))
            }
        }
        Ok(())
    }

    fn decode(&self, stream: &mut MemoryStream) -> Result<Value, PropertyError> {
        let value = match self.kind {
            PrimitiveKind::Bool => Value::Bool(stream.read_bool()?),
            PrimitiveKind::Int8 => Value::I8(stream.read_i8()?),
            PrimitiveKind::Int16 => Value::I16(stream.read_i16()?),
            PrimitiveKind::Int32 => Value::I32(stream.read_i32()?),
            PrimitiveKind::Int64 => Value::I64(stream.read_i64()?),
            PrimitiveKind::UInt8 => Value::U8(stream.read_u8()?),
            PrimitiveKind::UInt16 => Value::U16(stream.read_u16()?),
            PrimitiveKind::UInt32 => Value::U32(stream.read_u32()?),
            PrimitiveKind::UInt64 => Value::U64(stream.read_u64()?),
            PrimitiveKind::Float => Value::F32(stream.read_f32()?),
            PrimitiveKind::Double => Value::F64(stream.read_f64()?),
            PrimitiveKind::String => Value::String(stream.read_string()?),
            PrimitiveKind::Unicode => Value::Unicode(stream.read_string()?),
            PrimitiveKind::Blob => Value::Blob(stream.read_blob()?),
        };
        Ok(value)
    }

    fn parse_default(&self, expr: &str) -> Result<Value, PropertyError> {
        let name = self.kind.name();
        let text = expr.trim();
        match self.kind {
            PrimitiveKind::String => return Ok(Value::String(expr.to_string())),
            PrimitiveKind::Unicode => return Ok(Value::Unicode(expr.to_string())),
            PrimitiveKind::Blob => return Ok(Value::Blob(expr.as_bytes().to_vec())),
            PrimitiveKind::Bool => {
                return match text {
                    "" | "0" | "false" | "False" => Ok(Value::Bool(false)),
                    "1" | "true" | "True" => Ok(Value::Bool(true)),
                    _ => Err(invalid_default(name, expr, "expected true/false")),
                }
            }
            PrimitiveKind::Float | PrimitiveKind::Double => {
                let n = if text.is_empty() {
                    0.0
                } else {
                    text.parse::<f64>()
                        .map_err(|e| invalid_default(name, expr, e))?
                };
                return Ok(if self.kind == PrimitiveKind::Float {
                    Value::F32(n as f32)
                } else {
                    Value::F64(n)
                });
            }
            _ => {}
        }

        let n = if text.is_empty() {
            0
        } else {
            text.parse::<i128>()
                .map_err(|e| invalid_default(name, expr, e))?
        };
        self.kind
            .integer_value(n)
            .ok_or_else(|| invalid_default(name, expr, "out of range"))
    }

    fn is_same_type(&self, value: &Value) -> bool {
        self.kind.coerce(value).is_some()
    }
}
