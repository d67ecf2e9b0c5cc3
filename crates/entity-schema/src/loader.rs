// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema loading.
//!
//! A [`SchemaLoader`] turns parsed field tuples into descriptors for each
//! entity, in declaration order, feeding one [`SchemaFingerprint`]. Calling
//! [`finish`](SchemaLoader::finish) seals the fingerprint and returns the
//! immutable [`Schema`].

use crate::config::{DuplicatePolicy, LoaderConfig, MissingCodecPolicy};
use crate::datatype::DataTypes;
use crate::error::PropertyError;
use crate::fingerprint::{SchemaDigest, SchemaFingerprint};
use crate::property::{PropertyDef, PropertyDescription, PropertyUType};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// LoadError
// ---------------------------------------------------------------------------

/// Errors produced while loading a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// Type name resolves to no codec and the policy is `reject`.
    MissingCodec {
        entity: String,
        property: String,
        type_name: String,
    },
    /// Two properties of one entity share a name.
    DuplicateName { entity: String, property: String },
    /// Two properties share a utype and the policy is `reject`.
    DuplicateUType {
        utype: PropertyUType,
        first: String,
        second: String,
    },
    /// An entity with this name was already loaded.
    DuplicateEntity(String),
    /// Descriptor construction failed.
    Property {
        entity: String,
        property: String,
        source: PropertyError,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::MissingCodec {
                entity,
                property,
                type_name,
            } => write!(
                f,
                "{}.{}: no data type named '{}'",
                entity, property, type_name
            ),
            LoadError::DuplicateName { entity, property } => {
                write!(f, "{}.{}: property declared twice", entity, property)
            }
            LoadError::DuplicateUType {
                utype,
                first,
                second,
            } => write!(f, "utype {} used by both {} and {}", utype, first, second),
            LoadError::DuplicateEntity(name) => write!(f, "entity '{}' loaded twice", name),
            LoadError::Property {
                entity,
                property,
                source,
            } => write!(f, "{}.{}: {}", entity, property, source),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Property { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// EntitySchema
// ---------------------------------------------------------------------------

/// Descriptors of one entity type, in declaration order.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    name: String,
    properties: Vec<PropertyDescription>,
    by_name: HashMap<String, usize>,
    by_utype: HashMap<PropertyUType, usize>,
}

impl EntitySchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[PropertyDescription] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescription> {
        self.by_name.get(name).map(|&i| &self.properties[i])
    }

    /// First property declared with `utype`.
    pub fn property_by_utype(&self, utype: PropertyUType) -> Option<&PropertyDescription> {
        self.by_utype.get(&utype).map(|&i| &self.properties[i])
    }

    /// Properties written by the persistent path.
    pub fn persistent_properties(&self) -> impl Iterator<Item = &PropertyDescription> {
        self.properties.iter().filter(|p| p.is_persistent())
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Result of a completed load.
#[derive(Debug, Clone)]
pub struct Schema {
    entities: Vec<EntitySchema>,
    property_count: u32,
    digest: SchemaDigest,
}

impl Schema {
    pub fn entities(&self) -> &[EntitySchema] {
        &self.entities
    }

    pub fn entity(&self, name: &str) -> Option<&EntitySchema> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Descriptors built during the load, inert ones included.
    pub fn property_count(&self) -> u32 {
        self.property_count
    }

    /// Fingerprint compared between processes before they exchange data.
    pub fn digest(&self) -> SchemaDigest {
        self.digest
    }
}

// ---------------------------------------------------------------------------
// SchemaLoader
// ---------------------------------------------------------------------------

/// Builds a [`Schema`] from field tuples.
///
/// The fingerprint depends on load order: entities and their properties
/// must be fed in the same order on every process that compares digests.
pub struct SchemaLoader<'a> {
    types: &'a DataTypes,
    config: LoaderConfig,
    fingerprint: SchemaFingerprint,
    entities: Vec<EntitySchema>,
    /// utype -> "Entity.property" of its first owner.
    utypes: HashMap<PropertyUType, String>,
}

impl<'a> SchemaLoader<'a> {
    pub fn new(types: &'a DataTypes) -> Self {
        Self::with_config(types, LoaderConfig::default())
    }

    pub fn with_config(types: &'a DataTypes, config: LoaderConfig) -> Self {
        Self {
            types,
            config,
            fingerprint: SchemaFingerprint::new(),
            entities: Vec::new(),
            utypes: HashMap::new(),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Descriptors built so far.
    pub fn property_count(&self) -> u32 {
        self.fingerprint.property_count()
    }

    /// Build descriptors for one entity.
    ///
    /// On error nothing from this entity is kept, the fingerprint included.
    pub fn load_entity<I>(&mut self, name: &str, defs: I) -> Result<&EntitySchema, LoadError>
    where
        I: IntoIterator<Item = PropertyDef>,
    {
        if self.entities.iter().any(|e| e.name == name) {
            return Err(LoadError::DuplicateEntity(name.to_string()));
        }

        // Work on copies so a failure leaves the loader as it was.
        let mut fingerprint = self.fingerprint.clone();
        let mut utypes = self.utypes.clone();
        let mut entity = EntitySchema {
            name: name.to_string(),
            properties: Vec::new(),
            by_name: HashMap::new(),
            by_utype: HashMap::new(),
        };

        for def in defs {
            let qualified = format!("{}.{}", name, def.name);

            if entity.by_name.contains_key(&def.name) {
                return Err(LoadError::DuplicateName {
                    entity: name.to_string(),
                    property: def.name,
                });
            }

            if let Some(first) = utypes.get(&def.utype) {
                match self.config.duplicate_utype {
                    DuplicatePolicy::Reject => {
                        return Err(LoadError::DuplicateUType {
                            utype: def.utype,
                            first: first.clone(),
                            second: qualified,
                        })
                    }
                    DuplicatePolicy::Warn => log::warn!(
                        "[SchemaLoader::load_entity] utype {} used by both {} and {}",
                        def.utype,
                        first,
                        qualified
                    ),
                }
            } else {
                utypes.insert(def.utype, qualified);
            }

            let data_type = self.types.get(&def.type_name);
            if data_type.is_none() && self.config.missing_codec == MissingCodecPolicy::Reject {
                return Err(LoadError::MissingCodec {
                    entity: name.to_string(),
                    property: def.name,
                    type_name: def.type_name,
                });
            }

            let property_name = def.name.clone();
            let desc = PropertyDescription::create(def, data_type, &mut fingerprint).map_err(
                |source| LoadError::Property {
                    entity: name.to_string(),
                    property: property_name,
                    source,
                },
            )?;

            let index = entity.properties.len();
            entity.by_name.insert(desc.name().to_string(), index);
            entity.by_utype.entry(desc.utype()).or_insert(index);
            entity.properties.push(desc);
        }

        log::debug!(
            "[SchemaLoader::load_entity] {} with {} properties",
            name,
            entity.properties.len()
        );

        self.fingerprint = fingerprint;
        self.utypes = utypes;
        self.entities.push(entity);
        Ok(&self.entities[self.entities.len() - 1])
    }

    /// Seal the fingerprint and return the schema.
    pub fn finish(self) -> Schema {
        let property_count = self.fingerprint.property_count();
        let digest = self.fingerprint.finalize();
        log::info!(
            "[SchemaLoader::finish] {} entities, {} properties, digest {}",
            self.entities.len(),
            property_count,
            digest
        );
        Schema {
            entities: self.entities,
            property_count,
            digest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avatar_defs() -> Vec<PropertyDef> {
        vec![
            PropertyDef::new(1, "name", "STRING").persistent(),
            PropertyDef::new(2, "level", "UINT16").persistent().with_default("1"),
            PropertyDef::new(3, "position", "VECTOR3"),
        ]
    }

    #[test]
    fn test_load_and_lookup() {
        let types = DataTypes::with_builtins();
        let mut loader = SchemaLoader::new(&types);
        loader.load_entity("Avatar", avatar_defs()).unwrap();
        let schema = loader.finish();

        let avatar = schema.entity("Avatar").unwrap();
        assert_eq!(avatar.len(), 3);
        assert_eq!(avatar.property("level").map(|p| p.utype()), Some(2));
        assert_eq!(avatar.property_by_utype(3).map(|p| p.name()), Some("position"));
        assert_eq!(avatar.persistent_properties().count(), 2);
        assert_eq!(schema.property_count(), 3);
    }

    #[test]
    fn test_missing_codec_degrades_by_default() {
        let types = DataTypes::with_builtins();
        let mut loader = SchemaLoader::new(&types);
        let entity = loader
            .load_entity("Npc", vec![PropertyDef::new(1, "ai", "BEHAVIOUR_TREE")])
            .unwrap();
        assert!(entity.property("ai").unwrap().is_inert());
        assert_eq!(loader.property_count(), 1);
    }

    #[test]
    fn test_missing_codec_rejected_when_strict() {
        let types = DataTypes::with_builtins();
        let mut loader = SchemaLoader::with_config(&types, LoaderConfig::strict());
        let err = loader
            .load_entity("Npc", vec![PropertyDef::new(1, "ai", "BEHAVIOUR_TREE")])
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingCodec { .. }));
    }

    #[test]
    fn test_duplicate_name() {
        let types = DataTypes::with_builtins();
        let mut loader = SchemaLoader::new(&types);
        let err = loader
            .load_entity(
                "Avatar",
                vec![
                    PropertyDef::new(1, "hp", "INT32"),
                    PropertyDef::new(2, "hp", "INT32"),
                ],
            )
            .unwrap_err();
        assert_eq!(
            err,
            LoadError::DuplicateName {
                entity: "Avatar".into(),
                property: "hp".into()
            }
        );
    }

    #[test]
    fn test_duplicate_utype_across_entities() {
        let types = DataTypes::with_builtins();

        let mut loader = SchemaLoader::new(&types);
        loader.load_entity("Avatar", avatar_defs()).unwrap();
        loader
            .load_entity("Monster", vec![PropertyDef::new(2, "hp", "INT32")])
            .unwrap();

        let mut strict = SchemaLoader::with_config(&types, LoaderConfig::strict());
        strict.load_entity("Avatar", avatar_defs()).unwrap();
        let err = strict
            .load_entity("Monster", vec![PropertyDef::new(2, "hp", "INT32")])
            .unwrap_err();
        assert_eq!(
            err,
            LoadError::DuplicateUType {
                utype: 2,
                first: "Avatar.level".into(),
                second: "Monster.hp".into()
            }
        );
    }

    #[test]
    fn test_failed_entity_leaves_fingerprint_untouched() {
        let types = DataTypes::with_builtins();

        let mut clean = SchemaLoader::new(&types);
        clean.load_entity("Avatar", avatar_defs()).unwrap();
        let expected = clean.finish().digest();

        let mut loader = SchemaLoader::new(&types);
        loader.load_entity("Avatar", avatar_defs()).unwrap();
        let bad = vec![
            PropertyDef::new(10, "hp", "INT32"),
            PropertyDef::new(11, "hp", "INT32"),
        ];
        assert!(loader.load_entity("Broken", bad).is_err());
        assert_eq!(loader.property_count(), 3);
        assert!(loader.finish().entity("Broken").is_none());

        let mut loader = SchemaLoader::new(&types);
        loader.load_entity("Avatar", avatar_defs()).unwrap();
        assert!(matches!(
            loader.load_entity("Avatar", avatar_defs()),
            Err(LoadError::DuplicateEntity(_))
        ));
        assert_eq!(loader.finish().digest(), expected);
    }
}
