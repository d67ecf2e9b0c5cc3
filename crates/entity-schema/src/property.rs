// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property descriptors.
//!
//! A [`PropertyDescription`] is the runtime metadata of one entity
//! attribute plus the shared codec that serializes its values. Descriptors
//! are built once per schema load by [`PropertyDescription::create`], which
//! picks the [`PropertyKind`] and feeds the schema fingerprint, and are
//! immutable afterwards.
//!
//! # Example
//!
//! ```
//! use entity_schema::{
//!     AttributeMap, DataTypes, MemoryStream, PropertyDef, PropertyDescription,
//!     SchemaFingerprint, Value,
//! };
//!
//! let types = DataTypes::with_builtins();
//! let mut fingerprint = SchemaFingerprint::new();
//!
//! let def = PropertyDef::new(1, "level", "UINT16").persistent().with_default("1");
//! let level = PropertyDescription::create(def, types.get("UINT16"), &mut fingerprint)?;
//!
//! let mut stream = MemoryStream::new();
//! level.encode_persistent(&mut stream, None)?;
//! assert_eq!(level.decode(&mut stream)?, Value::U16(1));
//!
//! let mut avatar = AttributeMap::new();
//! level.bind(&mut avatar, Value::U16(7))?;
//! # Ok::<(), entity_schema::PropertyError>(())
//! ```

use crate::datatype::{
    ArrayType, DataType, DataTypeKind, FixedDictType, ARRAY_TYPE_NAME, FIXED_DICT_TYPE_NAME,
};
use crate::error::PropertyError;
use crate::fingerprint::SchemaFingerprint;
use crate::host::HostObject;
use crate::stream::MemoryStream;
use crate::value::{Value, VectorArity};
use std::sync::Arc;

/// Process-wide property identifier.
pub type PropertyUType = u16;

// ---------------------------------------------------------------------------
// PropertyDef
// ---------------------------------------------------------------------------

/// Parsed field tuple, as produced by the entity definition parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyDef {
    pub utype: PropertyUType,
    pub name: String,
    /// Type name as written in the schema (may be an alias).
    pub type_name: String,
    /// Replication scope bits, opaque here.
    pub flags: u32,
    pub persistent: bool,
    pub identifier: bool,
    pub database_length: u32,
    pub default_expr: String,
    pub detail_level: u8,
}

impl PropertyDef {
    pub fn new(
        utype: PropertyUType,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            utype,
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    pub fn identifier(mut self) -> Self {
        self.identifier = true;
        self
    }

    pub fn with_database_length(mut self, length: u32) -> Self {
        self.database_length = length;
        self
    }

    pub fn with_default(mut self, expr: impl Into<String>) -> Self {
        self.default_expr = expr.into();
        self
    }

    pub fn with_detail_level(mut self, level: u8) -> Self {
        self.detail_level = level;
        self
    }
}

// ---------------------------------------------------------------------------
// PropertyKind
// ---------------------------------------------------------------------------

/// Descriptor variant; decides bind and persistent-encoding behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Scalars and anything without special handling.
    Plain,
    FixedDict,
    Array,
    Vector(VectorArity),
}

impl PropertyKind {
    /// Pick the variant from the declared type name or the codec's own name.
    ///
    /// Precedence: fixed dict, array, vector2, vector3, vector4, plain.
    pub fn resolve(type_name: &str, data_type: Option<&dyn DataType>) -> Self {
        let codec_name = data_type.map_or("", |dt| dt.name());
        let declares = |name: &str| type_name == name || codec_name == name;

        if declares(FIXED_DICT_TYPE_NAME) {
            Self::FixedDict
        } else if declares(ARRAY_TYPE_NAME) {
            Self::Array
        } else if declares(VectorArity::Two.type_name()) {
            Self::Vector(VectorArity::Two)
        } else if declares(VectorArity::Three.type_name()) {
            Self::Vector(VectorArity::Three)
        } else if declares(VectorArity::Four.type_name()) {
            Self::Vector(VectorArity::Four)
        } else {
            Self::Plain
        }
    }
}

// ---------------------------------------------------------------------------
// PropertyDescription
// ---------------------------------------------------------------------------

/// Runtime descriptor of one entity attribute.
#[derive(Debug, Clone)]
pub struct PropertyDescription {
    utype: PropertyUType,
    name: String,
    type_name: String,
    flags: u32,
    persistent: bool,
    identifier: bool,
    database_length: u32,
    default_expr: String,
    detail_level: u8,
    kind: PropertyKind,
    /// `None` only for descriptors whose codec could not be resolved.
    data_type: Option<Arc<dyn DataType>>,
}

impl PropertyDescription {
    /// Build the descriptor variant matching `def` and `data_type`.
    ///
    /// A missing codec is logged and yields an inert descriptor whose
    /// operations all fail with [`PropertyError::MissingCodec`]. A fixed
    /// dict or array declaration backed by a codec of another shape is a
    /// schema error and is returned as `TypeMismatch`.
    pub fn create(
        def: PropertyDef,
        data_type: Option<Arc<dyn DataType>>,
        fingerprint: &mut SchemaFingerprint,
    ) -> Result<Self, PropertyError> {
        let kind = PropertyKind::resolve(&def.type_name, data_type.as_deref());

        if let Some(dt) = &data_type {
            let shape_ok = match kind {
                PropertyKind::FixedDict => dt.as_fixed_dict().is_some(),
                PropertyKind::Array => dt.as_array().is_some(),
                PropertyKind::Plain | PropertyKind::Vector(_) => true,
            };
            if !shape_ok {
                log::error!(
                    "[PropertyDescription::create] property[{}] declared {} but codec is {}",
                    def.name,
                    def.type_name,
                    dt.name()
                );
                return Err(PropertyError::mismatch(
                    format!("{:?} codec", kind),
                    dt.name(),
                ));
            }
        }

        log::debug!(
            "[PropertyDescription::create] utype={} name={} type={} kind={:?}",
            def.utype,
            def.name,
            def.type_name,
            kind
        );
        Ok(Self::new(def, kind, data_type, fingerprint))
    }

    fn new(
        def: PropertyDef,
        kind: PropertyKind,
        data_type: Option<Arc<dyn DataType>>,
        fingerprint: &mut SchemaFingerprint,
    ) -> Self {
        let is_mailbox = data_type
            .as_ref()
            .is_some_and(|dt| dt.kind() == DataTypeKind::Mailbox);

        // Mailboxes cannot be stored.
        let persistent = def.persistent && !is_mailbox;

        let desc = Self {
            utype: def.utype,
            name: def.name,
            type_name: def.type_name,
            flags: def.flags,
            persistent,
            identifier: def.identifier,
            database_length: def.database_length,
            default_expr: def.default_expr,
            detail_level: def.detail_level,
            kind,
            data_type,
        };

        fingerprint.append(&desc.canonical_bytes());
        fingerprint.record_property();

        if desc.data_type.is_none() {
            log::error!(
                "[PropertyDescription::create] {} DataType is missing, in property[{}]",
                desc.type_name,
                desc.name
            );
        }
        desc
    }

    /// Bytes this descriptor contributes to the schema fingerprint.
    ///
    /// Layout: name, default expression, declared type name (raw bytes, no
    /// length prefix), then little-endian utype u16, flags u32, persistent
    /// u8, identifier u8, database length u32, detail level u8, codec id
    /// u16 (0 when the codec is missing).
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut s = MemoryStream::with_capacity(
            self.name.len() + self.default_expr.len() + self.type_name.len() + 15,
        );
        s.write_bytes(self.name.as_bytes());
        s.write_bytes(self.default_expr.as_bytes());
        s.write_bytes(self.type_name.as_bytes());
        s.write_u16(self.utype);
        s.write_u32(self.flags);
        s.write_bool(self.persistent);
        s.write_bool(self.identifier);
        s.write_u32(self.database_length);
        s.write_u8(self.detail_level);
        s.write_u16(self.data_type.as_ref().map_or(0, |dt| dt.id()));
        s.into_bytes()
    }

    // -- accessors -------------------------------------------------------

    pub fn utype(&self) -> PropertyUType {
        self.utype
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn is_identifier(&self) -> bool {
        self.identifier
    }

    pub fn database_length(&self) -> u32 {
        self.database_length
    }

    pub fn default_expr(&self) -> &str {
        &self.default_expr
    }

    pub fn detail_level(&self) -> u8 {
        self.detail_level
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn data_type(&self) -> Option<&Arc<dyn DataType>> {
        self.data_type.as_ref()
    }

    /// True when built without a codec.
    pub fn is_inert(&self) -> bool {
        self.data_type.is_none()
    }

    /// Codec-level shape check; `false` for inert descriptors.
    pub fn is_same_type(&self, value: &Value) -> bool {
        self.data_type
            .as_ref()
            .is_some_and(|dt| dt.is_same_type(value))
    }

    // -- codec operations ------------------------------------------------

    fn codec(&self) -> Result<&Arc<dyn DataType>, PropertyError> {
        self.data_type
            .as_ref()
            .ok_or_else(|| PropertyError::MissingCodec {
                property: self.name.clone(),
                type_name: self.type_name.clone(),
            })
    }

    fn fixed_dict(&self) -> Result<&FixedDictType, PropertyError> {
        let codec = self.codec()?;
        codec
            .as_fixed_dict()
            .ok_or_else(|| PropertyError::mismatch(FIXED_DICT_TYPE_NAME, codec.name()))
    }

    fn array(&self) -> Result<&ArrayType, PropertyError> {
        let codec = self.codec()?;
        codec
            .as_array()
            .ok_or_else(|| PropertyError::mismatch(ARRAY_TYPE_NAME, codec.name()))
    }

    /// Run `write`, discarding its output if it fails.
    fn write_atomic<F>(stream: &mut MemoryStream, write: F) -> Result<(), PropertyError>
    where
        F: FnOnce(&mut MemoryStream) -> Result<(), PropertyError>,
    {
        let mark = stream.wpos();
        let result = write(stream);
        if result.is_err() {
            stream.truncate(mark);
        }
        result
    }

    /// Run `read`, restoring the read cursor if it fails.
    fn read_atomic<F>(stream: &mut MemoryStream, read: F) -> Result<Value, PropertyError>
    where
        F: FnOnce(&mut MemoryStream) -> Result<Value, PropertyError>,
    {
        let mark = stream.rpos();
        let result = read(stream);
        if result.is_err() {
            stream.set_rpos(mark);
        }
        result
    }

    /// Encode `value` for the network path.
    pub fn encode(&self, stream: &mut MemoryStream, value: &Value) -> Result<(), PropertyError> {
        let codec = self.codec()?;
        Self::write_atomic(stream, |s| codec.encode(s, value))
    }

    pub fn decode(&self, stream: &mut MemoryStream) -> Result<Value, PropertyError> {
        let codec = self.codec()?;
        Self::read_atomic(stream, |s| codec.decode(s))
    }

    /// Encode for durable storage.
    ///
    /// `None` writes the default value exactly as [`encode`](Self::encode)
    /// would, transient fixed dict fields included. A supplied fixed dict
    /// value goes through the extended path and skips transient fields.
    pub fn encode_persistent(
        &self,
        stream: &mut MemoryStream,
        value: Option<&Value>,
    ) -> Result<(), PropertyError> {
        let codec = self.codec()?;
        let Some(value) = value else {
            let default = self.new_default_value()?;
            return Self::write_atomic(stream, |s| codec.encode(s, &default));
        };

        match self.kind {
            PropertyKind::FixedDict => {
                let dict = self.fixed_dict()?;
                Self::write_atomic(stream, |s| dict.encode_ex(s, value, true))
            }
            PropertyKind::Plain | PropertyKind::Array | PropertyKind::Vector(_) => {
                Self::write_atomic(stream, |s| codec.encode(s, value))
            }
        }
    }

    /// Read a value written by [`encode_persistent`](Self::encode_persistent)
    /// with a supplied value. Fixed dicts skip transient fields and fill
    /// them from their defaults.
    pub fn decode_persistent(&self, stream: &mut MemoryStream) -> Result<Value, PropertyError> {
        let codec = self.codec()?;
        match self.kind {
            PropertyKind::FixedDict => {
                let dict = self.fixed_dict()?;
                Self::read_atomic(stream, |s| dict.decode_ex(s, true))
            }
            PropertyKind::Plain | PropertyKind::Array | PropertyKind::Vector(_) => {
                Self::read_atomic(stream, |s| codec.decode(s))
            }
        }
    }

    /// Parse the default expression through the codec.
    pub fn new_default_value(&self) -> Result<Value, PropertyError> {
        self.codec()?.parse_default(&self.default_expr)
    }

    // -- binding ---------------------------------------------------------

    /// Assign `candidate` to this attribute on `host`; returns the value
    /// that ended up bound.
    ///
    /// - plain: set as-is, no extra shape check.
    /// - fixed dict / array: shape must match the codec; a deep copy is set.
    /// - vector: a host vector of the same arity is set by reference; any
    ///   other representation updates the vector already bound on the host
    ///   in place and that same instance is returned.
    pub fn bind<H>(&self, host: &mut H, candidate: Value) -> Result<Value, PropertyError>
    where
        H: HostObject + ?Sized,
    {
        self.codec()?;
        match self.kind {
            PropertyKind::Plain => self.bind_generic(host, candidate),
            PropertyKind::FixedDict => {
                let dict = self.fixed_dict()?;
                if !dict.is_same_type(&candidate) {
                    return Err(PropertyError::mismatch(
                        dict.alias(),
                        candidate.kind_name(),
                    ));
                }
                let copy = dict.create_new_from_obj(&candidate)?;
                self.bind_generic(host, copy)
            }
            PropertyKind::Array => {
                let array = self.array()?;
                if !array.is_same_type(&candidate) {
                    return Err(PropertyError::mismatch(
                        array.alias(),
                        candidate.kind_name(),
                    ));
                }
                let copy = array.create_new_from_obj(&candidate)?;
                self.bind_generic(host, copy)
            }
            PropertyKind::Vector(arity) => self.bind_vector(host, candidate, arity),
        }
    }

    fn bind_generic<H>(&self, host: &mut H, value: Value) -> Result<Value, PropertyError>
    where
        H: HostObject + ?Sized,
    {
        host.set_attribute(&self.name, value.clone())
            .map_err(|e| PropertyError::bind_rejected(&self.name, e))?;
        Ok(value)
    }

    fn bind_vector<H>(
        &self,
        host: &mut H,
        candidate: Value,
        arity: VectorArity,
    ) -> Result<Value, PropertyError>
    where
        H: HostObject + ?Sized,
    {
        if candidate.as_vector().is_some_and(|v| v.arity() == arity) {
            return self.bind_generic(host, candidate);
        }

        let count = candidate.vector_components()?.len();
        if count != arity.count() {
            return Err(PropertyError::mismatch(
                arity.type_name(),
                format!("{} components", count),
            ));
        }

        let target = match host.get_attribute(&self.name) {
            Some(Value::Vector(v)) if v.arity() == arity => v,
            Some(other) => {
                return Err(PropertyError::bind_rejected(
                    &self.name,
                    format!("bound value is {}, not {}", other.kind_name(), arity.type_name()),
                ))
            }
            None => {
                return Err(PropertyError::bind_rejected(
                    &self.name,
                    "no vector bound on host",
                ))
            }
        };

        target.assign(&candidate)?;
        Ok(Value::Vector(target))
    }
}
