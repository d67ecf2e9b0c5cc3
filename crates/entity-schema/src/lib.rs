// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # entity-schema - Typed attribute schemas for networked entities
//!
//! Every attribute of a networked entity type has a [`PropertyDescription`]:
//! its identity, replication flags, persistence flags, default expression and
//! a shared [`DataType`] codec. Descriptors serialize values to and from a
//! [`MemoryStream`], build default values, bind values onto host objects and
//! contribute to an MD5 [`SchemaDigest`] that two processes compare before
//! they exchange entity data.
//!
//! ## Quick Start
//!
//! ```rust
//! use entity_schema::{DataTypes, MemoryStream, PropertyDef, SchemaLoader, Value};
//!
//! let types = DataTypes::with_builtins();
//! let mut loader = SchemaLoader::new(&types);
//! loader.load_entity(
//!     "Avatar",
//!     vec![
//!         PropertyDef::new(1, "name", "STRING").persistent(),
//!         PropertyDef::new(2, "position", "VECTOR3").with_default("0 0 0"),
//!     ],
//! )?;
//! let schema = loader.finish();
//!
//! let position = schema.entity("Avatar").and_then(|e| e.property("position")).unwrap();
//! let mut stream = MemoryStream::new();
//! position.encode(&mut stream, &Value::from(vec![1.0f32, 2.0, 3.0]))?;
//! assert_eq!(stream.len(), 12);
//! println!("schema digest {}", schema.digest());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! field tuples (PropertyDef)
//!        |
//!        v
//!   SchemaLoader --- DataTypes (named, shared codecs)
//!        |
//!        +--> PropertyDescription::create --> SchemaFingerprint (MD5)
//!        v
//!   Schema (entities, descriptors, digest)
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PropertyDescription`] | Descriptor of one attribute; encode, decode, bind |
//! | [`DataType`] | Codec trait shared between descriptors |
//! | [`SchemaFingerprint`] | Accumulates descriptor bytes into an MD5 digest |
//! | [`SchemaLoader`] | Builds a [`Schema`] from field tuples |
//! | [`HostObject`] | Attribute slots a descriptor binds values onto |

pub mod config;
pub mod datatype;
pub mod error;
pub mod fingerprint;
pub mod host;
pub mod loader;
pub mod property;
pub mod stream;
pub mod value;

pub use config::{ConfigError, DuplicatePolicy, LoaderConfig, MissingCodecPolicy};
pub use datatype::{
    ArrayType, DataType, DataTypeId, DataTypeKind, DataTypes, FixedDictField, FixedDictType,
    MailboxType, PrimitiveKind, PrimitiveType, RegistryError, VectorType,
};
pub use error::PropertyError;
pub use fingerprint::{SchemaDigest, SchemaFingerprint};
pub use host::{AttributeMap, HostError, HostObject};
pub use loader::{EntitySchema, LoadError, Schema, SchemaLoader};
pub use property::{PropertyDef, PropertyDescription, PropertyKind, PropertyUType};
pub use stream::{MemoryStream, StreamError};
pub use value::{MailboxRef, ScriptVector, Value, VectorArity};
