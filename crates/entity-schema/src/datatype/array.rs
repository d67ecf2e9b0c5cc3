// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `ARRAY` codec: homogeneous, variable-length sequence.

use super::{DataType, DataTypeId, DataTypeKind};
use crate::error::PropertyError;
use crate::stream::MemoryStream;
use crate::value::Value;
use std::sync::Arc;

pub const ARRAY_TYPE_NAME: &str = "ARRAY";

/// Wire layout: u32 element count, then each element.
#[derive(Debug, Clone)]
pub struct ArrayType {
    id: DataTypeId,
    alias: String,
    element: Arc<dyn DataType>,
}

impl ArrayType {
    pub fn new(id: DataTypeId, alias: impl Into<String>, element: Arc<dyn DataType>) -> Self {
        Self {
            id,
            alias: alias.into(),
            element,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn element_type(&self) -> &Arc<dyn DataType> {
        &self.element
    }

    /// Fresh sequence holding deep copies of `value`'s elements.
    pub fn create_new_from_obj(&self, value: &Value) -> Result<Value, PropertyError> {
        if !self.is_same_type(value) {
            return Err(PropertyError::mismatch(&self.alias, value.kind_name()));
        }
        let items = value
            .as_sequence()
            .ok_or_else(|| PropertyError::mismatch(&self.alias, value.kind_name()))?;
        Ok(Value::Sequence(items.iter().map(Value::deep_copy).collect()))
    }
}

impl DataType for ArrayType {
    fn name(&self) -> &str {
        ARRAY_TYPE_NAME
    }

    fn id(&self) -> DataTypeId {
        self.id
    }

    fn kind(&self) -> DataTypeKind {
        DataTypeKind::Array
    }

    fn encode(&self, stream: &mut MemoryStream, value: &Value) -> Result<(), PropertyError> {
        let items = value
            .as_sequence()
            .ok_or_else(|| PropertyError::mismatch(&self.alias, value.kind_name()))?;
        let count = u32::try_from(items.len())
            .map_err(|_| PropertyError::mismatch("at most u32::MAX elements", "longer sequence"))?;
        stream.write_u32(count);
        for item in items {
            self.element.encode(stream, item)?;
        }
        Ok(())
    }

    fn decode(&self, stream: &mut MemoryStream) -> Result<Value, PropertyError> {
        let count = stream.read_u32()? as usize;
        // A corrupt count must not drive a huge allocation.
        let mut items = Vec::with_capacity(count.min(stream.remaining()));
        for _ in 0..count {
            items.push(self.element.decode(stream)?);
        }
        Ok(Value::Sequence(items))
    }

    fn parse_default(&self, _expr: &str) -> Result<Value, PropertyError> {
        Ok(Value::Sequence(Vec::new()))
    }

    fn is_same_type(&self, value: &Value) -> bool {
        value
            .as_sequence()
            .is_some_and(|items| items.iter().all(|item| self.element.is_same_type(item)))
    }

    fn as_array(&self) -> Option<&ArrayType> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::{PrimitiveKind, PrimitiveType};

    fn int_list() -> ArrayType {
        ArrayType::new(
            50,
            "INT_LIST",
            Arc::new(PrimitiveType::new(7, PrimitiveKind::Int32)),
        )
    }

    #[test]
    fn test_roundtrip() {
        let codec = int_list();
        let value = Value::from(vec![1i32, -2, 3]);
        let mut s = MemoryStream::new();
        codec.encode(&mut s, &value).unwrap();
        assert_eq!(s.len(), 4 + 3 * 4);
        assert_eq!(codec.decode(&mut s).unwrap(), value);
    }

    #[test]
    fn test_element_mismatch() {
        let codec = int_list();
        let value = Value::Sequence(vec![Value::I32(1), Value::from("two")]);
        assert!(!codec.is_same_type(&value));
        assert!(codec.create_new_from_obj(&value).is_err());
    }

    #[test]
    fn test_truncated_elements() {
        let codec = int_list();
        let mut s = MemoryStream::new();
        s.write_u32(3);
        s.write_i32(1);
        assert!(matches!(
            codec.decode(&mut s),
            Err(PropertyError::MalformedStream(_))
        ));
    }

    #[test]
    fn test_default_is_empty() {
        assert_eq!(
            int_list().parse_default("").unwrap(),
            Value::Sequence(Vec::new())
        );
    }
}
