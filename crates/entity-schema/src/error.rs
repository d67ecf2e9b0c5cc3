// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property operation errors.

use crate::stream::StreamError;
use std::fmt;

/// Failure modes of descriptor and codec operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// Default-value expression could not be parsed by the codec.
    InvalidDefault {
        type_name: String,
        expr: String,
        reason: String,
    },
    /// Value shape is incompatible with the codec or vector arity.
    TypeMismatch { expected: String, found: String },
    /// Decode ran past the end of the stream or hit invalid bytes.
    MalformedStream(StreamError),
    /// Host refused the assignment or lacks the target attribute.
    BindRejected { attribute: String, reason: String },
    /// Descriptor was built without a codec; it cannot encode, decode or bind.
    MissingCodec { property: String, type_name: String },
}

impl PropertyError {
    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn bind_rejected(attribute: &str, reason: impl fmt::Display) -> Self {
        Self::BindRejected {
            attribute: attribute.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDefault {
                type_name,
                expr,
                reason,
            } => write!(
                f,
                "invalid default {:?} for {}: {}",
                expr, type_name, reason
            ),
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            Self::MalformedStream(e) => write!(f, "malformed stream: {}", e),
            Self::BindRejected { attribute, reason } => {
                write!(f, "bind of '{}' rejected: {}", attribute, reason)
            }
            Self::MissingCodec {
                property,
                type_name,
            } => write!(
                f,
                "property '{}' has no codec for type {}",
                property, type_name
            ),
        }
    }
}

impl std::error::Error for PropertyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedStream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StreamError> for PropertyError {
    fn from(e: StreamError) -> Self {
        Self::MalformedStream(e)
    }
}
