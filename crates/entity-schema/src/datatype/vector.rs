// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-arity float vector codecs (`VECTOR2`, `VECTOR3`, `VECTOR4`).

use super::{invalid_default, DataType, DataTypeId, DataTypeKind};
use crate::error::PropertyError;
use crate::stream::MemoryStream;
use crate::value::{ScriptVector, Value, VectorArity};

/// Codec for a 2/3/4 component float vector.
///
/// Wire layout is `count` little-endian f32s. Encoding accepts a host
/// vector or any numeric sequence of the right length.
#[derive(Debug, Clone)]
pub struct VectorType {
    id: DataTypeId,
    arity: VectorArity,
}

impl VectorType {
    pub fn new(id: DataTypeId, arity: VectorArity) -> Self {
        Self { id, arity }
    }

    pub fn arity(&self) -> VectorArity {
        self.arity
    }
}

impl DataType for VectorType {
    fn name(&self) -> &str {
        self.arity.type_name()
    }

    fn id(&self) -> DataTypeId {
        self.id
    }

    fn kind(&self) -> DataTypeKind {
        DataTypeKind::Vector(self.arity)
    }

    fn encode(&self, stream: &mut MemoryStream, value: &Value) -> Result<(), PropertyError> {
        let components = value.vector_components()?;
        if components.len() != self.arity.count() {
            return Err(PropertyError::mismatch(
                self.name(),
                format!("{} components", components.len()),
            ));
        }
        for c in components {
            stream.write_f32(c);
        }
        Ok(())
    }

    fn decode(&self, stream: &mut MemoryStream) -> Result<Value, PropertyError> {
        let mut components = [0.0f32; 4];
        for slot in components.iter_mut().take(self.arity.count()) {
            *slot = stream.read_f32()?;
        }
        Ok(Value::Vector(ScriptVector::new(
            &components[..self.arity.count()],
        )?))
    }

    fn parse_default(&self, expr: &str) -> Result<Value, PropertyError> {
        let parts: Vec<&str> = expr
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            return Ok(Value::Vector(ScriptVector::zero(self.arity)));
        }
        if parts.len() != self.arity.count() {
            return Err(invalid_default(
                self.name(),
                expr,
                format!(
                    "expected {} components, got {}",
                    self.arity.count(),
                    parts.len()
                ),
            ));
        }
        let components = parts
            .iter()
            .map(|p| p.parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| invalid_default(self.name(), expr, e))?;
        Ok(Value::Vector(ScriptVector::new(&components)?))
    }

    fn is_same_type(&self, value: &Value) -> bool {
        value
            .vector_components()
            .is_ok_and(|c| c.len() == self.arity.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_vector_and_sequence_alike() {
        let codec = VectorType::new(20, VectorArity::Three);
        let mut a = MemoryStream::new();
        let mut b = MemoryStream::new();

        let v = ScriptVector::new(&[1.0, 2.0, 3.0]).unwrap();
        codec.encode(&mut a, &Value::Vector(v.clone())).unwrap();
        codec.encode(&mut b, &Value::from(vec![1i32, 2, 3])).unwrap();

        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.len(), 12);
        assert_eq!(codec.decode(&mut a).unwrap(), Value::Vector(v));
    }

    #[test]
    fn test_wrong_arity_rejected() {
        let codec = VectorType::new(20, VectorArity::Two);
        let mut s = MemoryStream::new();
        assert!(codec
            .encode(&mut s, &Value::from(vec![1.0f32, 2.0, 3.0]))
            .is_err());
        assert!(!codec.is_same_type(&Value::from(vec![1.0f32])));
        assert!(codec.is_same_type(&Value::from(vec![1.0f32, 0.5])));
    }

    #[test]
    fn test_parse_default() {
        let codec = VectorType::new(21, VectorArity::Four);
        let zero = codec.parse_default("").unwrap();
        assert_eq!(zero.as_vector().unwrap().components(), vec![0.0; 4]);

        let v = codec.parse_default("1, 2 3,4").unwrap();
        assert_eq!(
            v.as_vector().unwrap().components(),
            vec![1.0, 2.0, 3.0, 4.0]
        );

        assert!(matches!(
            codec.parse_default("1 2"),
            Err(PropertyError::InvalidDefault { .. })
        ));
        assert!(codec.parse_default("1 2 x 4").is_err());
    }
}
