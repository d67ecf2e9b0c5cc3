// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec registry.
//!
//! [`DataTypes`] maps type names and aliases to shared codecs and hands out
//! sequential [`DataTypeId`]s. Builtins are registered first, in a fixed
//! order, so their ids are stable across processes.

use super::{
    DataType, DataTypeId, MailboxType, PrimitiveKind, PrimitiveType, VectorType,
};
use crate::value::VectorArity;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// RegistryError
// ---------------------------------------------------------------------------

/// Errors produced while registering codecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A codec or alias with this name is already registered.
    DuplicateName(String),
    /// Alias target does not exist.
    UnknownType(String),
    /// All `DataTypeId` values are taken.
    IdSpaceExhausted,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateName(name) => write!(f, "type '{}' already registered", name),
            RegistryError::UnknownType(name) => write!(f, "unknown type '{}'", name),
            RegistryError::IdSpaceExhausted => write!(f, "no data type ids left"),
        }
    }
}

impl std::error::Error for RegistryError {}

// ---------------------------------------------------------------------------
// DataTypes
// ---------------------------------------------------------------------------

/// Named, shared codecs.
///
/// Ids are handed out sequentially from 1 in registration order, so two
/// processes registering the same types in the same order agree on ids.
pub struct DataTypes {
    by_name: HashMap<String, Arc<dyn DataType>>,
    by_id: HashMap<DataTypeId, Arc<dyn DataType>>,
    next_id: DataTypeId,
}

impl DataTypes {
    /// Empty registry.
    pub fn new() -> Self {
        DataTypes {
            by_name: HashMap::new(),
            by_id: HashMap::new(),
            next_id: 1,
        }
    }

    /// Registry holding every primitive, `VECTOR2..4` and `MAILBOX`.
    pub fn with_builtins() -> Self {
        let mut types = Self::new();
        if let Err(e) = types.register_builtins() {
            log::error!("[DataTypes::with_builtins] {}", e);
        }
        types
    }

    fn register_builtins(&mut self) -> Result<(), RegistryError> {
        for kind in PrimitiveKind::ALL {
            self.register_with(kind.name(), |id| PrimitiveType::new(id, kind))?;
        }
        for arity in [VectorArity::Two, VectorArity::Three, VectorArity::Four] {
            self.register_with(arity.type_name(), |id| VectorType::new(id, arity))?;
        }
        self.register_with("MAILBOX", MailboxType::new)?;
        Ok(())
    }

    /// Register a codec under `name`; `build` receives the assigned id.
    pub fn register_with<T, F>(
        &mut self,
        name: &str,
        build: F,
    ) -> Result<Arc<dyn DataType>, RegistryError>
    where
        T: DataType + 'static,
        F: FnOnce(DataTypeId) -> T,
    {
        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(RegistryError::IdSpaceExhausted)?;

        let data_type: Arc<dyn DataType> = Arc::new(build(id));
        self.by_name.insert(name.to_string(), data_type.clone());
        self.by_id.insert(id, data_type.clone());
        Ok(data_type)
    }

    /// Make `alias` resolve to the codec registered as `target`.
    pub fn alias(&mut self, alias: &str, target: &str) -> Result<(), RegistryError> {
        if self.by_name.contains_key(alias) {
            return Err(RegistryError::DuplicateName(alias.to_string()));
        }
        let data_type = self
            .get(target)
            .ok_or_else(|| RegistryError::UnknownType(target.to_string()))?;
        self.by_name.insert(alias.to_string(), data_type);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn DataType>> {
        self.by_name.get(name).cloned()
    }

    pub fn by_id(&self, id: DataTypeId) -> Option<Arc<dyn DataType>> {
        self.by_id.get(&id).cloned()
    }

    /// Registered names and aliases, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_name.keys().cloned().collect();
        names.sort();
        names
    }

    /// Distinct codecs (aliases not counted).
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for DataTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DataTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTypes")
            .field("names", &self.names())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::{ArrayType, DataTypeKind};

    #[test]
    fn test_builtins_have_sequential_ids() {
        let types = DataTypes::with_builtins();
        assert_eq!(types.len(), 18);
        assert_eq!(types.get("BOOL").map(|t| t.id()), Some(1));
        assert_eq!(types.get("MAILBOX").map(|t| t.id()), Some(18));
        assert_eq!(
            types.get("VECTOR3").map(|t| t.kind()),
            Some(DataTypeKind::Vector(VectorArity::Three))
        );
    }

    #[test]
    fn test_register_composite_and_lookup_by_id() {
        let mut types = DataTypes::with_builtins();
        let element = types.get("INT32").unwrap();
        let list = types
            .register_with("INT_LIST", |id| ArrayType::new(id, "INT_LIST", element))
            .unwrap();

        assert_eq!(list.name(), "ARRAY");
        let found = types.by_id(list.id()).unwrap();
        assert!(Arc::ptr_eq(&found, &list));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut types = DataTypes::with_builtins();
        let err = types
            .register_with("UINT8", |id| PrimitiveType::new(id, PrimitiveKind::UInt8))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("UINT8".into()));
    }

    #[test]
    fn test_alias_shares_codec() {
        let mut types = DataTypes::with_builtins();
        types.alias("ENTITY_ID", "INT32").unwrap();

        let a = types.get("ENTITY_ID").unwrap();
        let b = types.get("INT32").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(types.len(), 18);

        assert_eq!(
            types.alias("X", "NOPE"),
            Err(RegistryError::UnknownType("NOPE".into()))
        );
    }

    #[test]
    fn test_builtins_registered_twice_reports_duplicate() {
        let mut types = DataTypes::with_builtins();
        assert_eq!(
            types.register_builtins(),
            Err(RegistryError::DuplicateName("BOOL".into()))
        );
        assert_eq!(types.len(), 18);
    }
}
