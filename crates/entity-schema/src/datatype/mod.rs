// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Data type codecs.
//!
//! A codec knows how to write a [`Value`] to a [`MemoryStream`], read it
//! back, and turn a textual default expression into a value. Codecs are
//! shared between descriptors as `Arc<dyn DataType>`.
//!
//! # Example
//!
//! ```
//! use entity_schema::{DataTypes, MemoryStream, Value};
//!
//! let types = DataTypes::with_builtins();
//! let uint16 = types.get("UINT16").unwrap();
//!
//! let mut stream = MemoryStream::new();
//! uint16.encode(&mut stream, &Value::U16(512)).unwrap();
//! assert_eq!(uint16.decode(&mut stream).unwrap(), Value::U16(512));
//! ```

mod array;
mod fixed_dict;
mod mailbox;
mod primitive;
mod registry;
mod vector;

pub use array::{ArrayType, ARRAY_TYPE_NAME};
pub use fixed_dict::{FixedDictField, FixedDictType, FIXED_DICT_TYPE_NAME};
pub use mailbox::{MailboxType, MAILBOX_TYPE_NAME};
pub use primitive::{PrimitiveKind, PrimitiveType};
pub use registry::{DataTypes, RegistryError};
pub use vector::VectorType;

use crate::error::PropertyError;
use crate::stream::MemoryStream;
use crate::value::{Value, VectorArity};
use std::fmt;

/// Numeric codec identifier, unique within a [`DataTypes`] registry.
pub type DataTypeId = u16;

/// Shape family of a codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataTypeKind {
    Primitive(PrimitiveKind),
    Vector(VectorArity),
    FixedDict,
    Array,
    Mailbox,
}

/// Encoder/decoder/default-parser for one data shape.
pub trait DataType: Send + Sync + fmt::Debug {
    /// Canonical codec name (`UINT32`, `FIXED_DICT`, `VECTOR3`...).
    fn name(&self) -> &str;

    fn id(&self) -> DataTypeId;

    fn kind(&self) -> DataTypeKind;

    /// Append `value`. On error the stream may hold a partial write; callers
    /// that need atomicity roll back to their own mark.
    fn encode(&self, stream: &mut MemoryStream, value: &Value) -> Result<(), PropertyError>;

    fn decode(&self, stream: &mut MemoryStream) -> Result<Value, PropertyError>;

    /// Value described by a default expression from the schema.
    fn parse_default(&self, expr: &str) -> Result<Value, PropertyError>;

    /// True when `value` can be encoded by this codec.
    fn is_same_type(&self, value: &Value) -> bool;

    fn as_fixed_dict(&self) -> Option<&FixedDictType> {
        None
    }

    fn as_array(&self) -> Option<&ArrayType> {
        None
    }
}

pub(crate) fn invalid_default(
    type_name: &str,
    expr: &str,
    reason: impl fmt::Display,
) -> PropertyError {
    PropertyError::InvalidDefault {
        type_name: type_name.to_string(),
        expr: expr.to_string(),
        reason: reason.to_string(),
    }
}
