// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `FIXED_DICT` codec: struct-like value with a fixed, ordered key set.

use super::{DataType, DataTypeId, DataTypeKind};
use crate::error::PropertyError;
use crate::stream::MemoryStream;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub const FIXED_DICT_TYPE_NAME: &str = "FIXED_DICT";

/// One key of a fixed dict.
#[derive(Debug, Clone)]
pub struct FixedDictField {
    pub name: String,
    pub data_type: Arc<dyn DataType>,
    /// Written by the persistent encoding path.
    pub persistent: bool,
}

impl FixedDictField {
    pub fn new(name: impl Into<String>, data_type: Arc<dyn DataType>) -> Self {
        Self {
            name: name.into(),
            data_type,
            persistent: true,
        }
    }

    /// Exclude this key from persistent encoding.
    pub fn transient(mut self) -> Self {
        self.persistent = false;
        self
    }
}

/// Struct codec. Keys are encoded in declaration order with no tags.
#[derive(Debug, Clone)]
pub struct FixedDictType {
    id: DataTypeId,
    alias: String,
    fields: Vec<FixedDictField>,
}

impl FixedDictType {
    /// `alias` is the schema name the dict was declared under.
    pub fn new(id: DataTypeId, alias: impl Into<String>, fields: Vec<FixedDictField>) -> Self {
        Self {
            id,
            alias: alias.into(),
            fields,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn fields(&self) -> &[FixedDictField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FixedDictField> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn entries<'a>(&self, value: &'a Value) -> Result<&'a HashMap<String, Value>, PropertyError> {
        value
            .as_dict()
            .ok_or_else(|| PropertyError::mismatch(&self.alias, value.kind_name()))
    }

    /// Extended encoding. With `only_persistent`, keys marked transient are
    /// skipped.
    pub fn encode_ex(
        &self,
        stream: &mut MemoryStream,
        value: &Value,
        only_persistent: bool,
    ) -> Result<(), PropertyError> {
        let entries = self.entries(value)?;
        for field in &self.fields {
            if only_persistent && !field.persistent {
                continue;
            }
            let item = entries.get(&field.name).ok_or_else(|| {
                PropertyError::mismatch(
                    format!("{} with key '{}'", self.alias, field.name),
                    "dict without it",
                )
            })?;
            field.data_type.encode(stream, item)?;
        }
        Ok(())
    }

    /// Counterpart of [`encode_ex`](Self::encode_ex). Skipped keys take
    /// their codec default.
    pub fn decode_ex(
        &self,
        stream: &mut MemoryStream,
        only_persistent: bool,
    ) -> Result<Value, PropertyError> {
        let mut entries = HashMap::with_capacity(self.fields.len());
        for field in &self.fields {
            let item = if only_persistent && !field.persistent {
                field.data_type.parse_default("")?
            } else {
                field.data_type.decode(stream)?
            };
            entries.insert(field.name.clone(), item);
        }
        Ok(Value::Dict(entries))
    }

    /// Fresh dict holding deep copies of `value`'s entries.
    pub fn create_new_from_obj(&self, value: &Value) -> Result<Value, PropertyError> {
        if !self.is_same_type(value) {
            return Err(PropertyError::mismatch(&self.alias, value.kind_name()));
        }
        let entries = self.entries(value)?;
        let copy = self
            .fields
            .iter()
            .filter_map(|f| {
                entries
                    .get(&f.name)
                    .map(|item| (f.name.clone(), item.deep_copy()))
            })
            .collect();
        Ok(Value::Dict(copy))
    }
}

impl DataType for FixedDictType {
    fn name(&self) -> &str {
        FIXED_DICT_TYPE_NAME
    }

    fn id(&self) -> DataTypeId {
        self.id
    }

    fn kind(&self) -> DataTypeKind {
        DataTypeKind::FixedDict
    }

    fn encode(&self, stream: &mut MemoryStream, value: &Value) -> Result<(), PropertyError> {
        self.encode_ex(stream, value, false)
    }

    fn decode(&self, stream: &mut MemoryStream) -> Result<Value, PropertyError> {
        self.decode_ex(stream, false)
    }

    // Dicts have no textual default; every key takes its own codec default.
    fn parse_default(&self, _expr: &str) -> Result<Value, PropertyError> {
        let mut entries = HashMap::with_capacity(self.fields.len());
        for field in &self.fields {
            entries.insert(field.name.clone(), field.data_type.parse_default("")?);
        }
        Ok(Value::Dict(entries))
    }

    fn is_same_type(&self, value: &Value) -> bool {
        let Some(entries) = value.as_dict() else {
            return false;
        };
        entries.len() == self.fields.len()
            && self.fields.iter().all(|f| {
                entries
                    .get(&f.name)
                    .is_some_and(|item| f.data_type.is_same_type(item))
            })
    }

    fn as_fixed_dict(&self) -> Option<&FixedDictType> {
        Some(self)
    }
}
