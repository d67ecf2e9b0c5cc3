// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Host object attribute interface.
//!
//! Descriptors bind values through [`HostObject`] only; any entity
//! representation (script object, ECS component, test double) can sit
//! behind it.

use crate::value::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Reasons a host refuses an attribute access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Slot exists but cannot be assigned.
    ReadOnly(String),
    /// Host has no attribute with that name.
    UnknownAttribute(String),
    /// Host-level guard refused the value.
    Rejected { attribute: String, reason: String },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly(name) => write!(f, "attribute '{}' is read-only", name),
            Self::UnknownAttribute(name) => write!(f, "no attribute '{}'", name),
            Self::Rejected { attribute, reason } => {
                write!(f, "attribute '{}' rejected value: {}", attribute, reason)
            }
        }
    }
}

impl std::error::Error for HostError {}

/// Generic get/set-by-name access to a live object.
pub trait HostObject {
    /// Current value of `name`, `None` if the attribute does not exist.
    ///
    /// Returned vectors are handles to the bound instance, not copies.
    fn get_attribute(&self, name: &str) -> Option<Value>;

    /// Assign `value` to `name`.
    fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), HostError>;
}

/// Plain attribute table implementing [`HostObject`].
///
/// Accepts assignments to any name unless the slot was marked read-only,
/// like a generic script object.
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    slots: HashMap<String, Value>,
    read_only: HashSet<String>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert without going through the read-only guard.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.slots.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Mark a slot read-only for later `set_attribute` calls.
    pub fn set_read_only(&mut self, name: impl Into<String>) {
        self.read_only.insert(name.into());
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl HostObject for AttributeMap {
    fn get_attribute(&self, name: &str) -> Option<Value> {
        self.slots.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), HostError> {
        if self.read_only.contains(name) {
            return Err(HostError::ReadOnly(name.to_string()));
        }
        self.slots.insert(name.to_string(), value);
        Ok(())
    }
}
