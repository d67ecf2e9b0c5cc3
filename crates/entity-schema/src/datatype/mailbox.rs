// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `MAILBOX` codec: a live reference to a remote entity.
//!
//! Mailboxes travel over the network but never reach durable storage;
//! descriptors using this codec are always non-persistent.

use super::{DataType, DataTypeId, DataTypeKind};
use crate::error::PropertyError;
use crate::stream::MemoryStream;
use crate::value::{MailboxRef, Value};

pub const MAILBOX_TYPE_NAME: &str = "MAILBOX";

/// Wire layout: i32 entity id, u16 component. Entity id 0 encodes `None`.
#[derive(Debug, Clone)]
pub struct MailboxType {
    id: DataTypeId,
}

impl MailboxType {
    pub fn new(id: DataTypeId) -> Self {
        Self { id }
    }
}

impl DataType for MailboxType {
    fn name(&self) -> &str {
        MAILBOX_TYPE_NAME
    }

    fn id(&self) -> DataTypeId {
        self.id
    }

    fn kind(&self) -> DataTypeKind {
        DataTypeKind::Mailbox
    }

    fn encode(&self, stream: &mut MemoryStream, value: &Value) -> Result<(), PropertyError> {
        match value {
            Value::Mailbox(m) => {
                stream.write_i32(m.entity_id);
                stream.write_u16(m.component);
            }
            Value::None => {
                stream.write_i32(0);
                stream.write_u16(0);
            }
            other => return Err(PropertyError::mismatch(MAILBOX_TYPE_NAME, other.kind_name())),
        }
        Ok(())
    }

    fn decode(&self, stream: &mut MemoryStream) -> Result<Value, PropertyError> {
        let entity_id = stream.read_i32()?;
        let component = stream.read_u16()?;
        if entity_id == 0 {
            return Ok(Value::None);
        }
        Ok(Value::Mailbox(MailboxRef {
            entity_id,
            component,
        }))
    }

    fn parse_default(&self, _expr: &str) -> Result<Value, PropertyError> {
        Ok(Value::None)
    }

    fn is_same_type(&self, value: &Value) -> bool {
        matches!(value, Value::Mailbox(_) | Value::None)
    }
}
