// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fatal conversion failures. A call that returns one of these produced no
/// partial document.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("panel with uid {name} not found (referenced at {path})")]
    DanglingElementReference { name: String, path: String },
    #[error("unknown layout kind {kind:?} at {path}")]
    UnknownLayoutKind { kind: String, path: String },
    #[error("malformed document: {details}")]
    MalformedDocument { details: String },
}

impl Error {
    pub fn malformed(details: impl Into<String>) -> Self {
        Error::MalformedDocument {
            details: details.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::malformed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable problems found while converting. The affected item is left
/// out of the output and conversion continues.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversionWarning {
    UnsupportedVariableKind { name: String, kind: String },
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionWarning::UnsupportedVariableKind { name, kind } => {
                write!(f, "variable {name:?} of kind {kind:?} has no equivalent and was skipped")
            }
        }
    }
}

/// A converted document together with any warnings raised on the way.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversion<T> {
    pub document: T,
    pub warnings: Vec<ConversionWarning>,
}

impl<T> Conversion<T> {
    pub fn clean(document: T) -> Self {
        Conversion {
            document,
            warnings: vec![],
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Conversion<U> {
        Conversion {
            document: f(self.document),
            warnings: self.warnings,
        }
    }
}

// Helper functions for serde skip_serializing_if

pub(crate) fn is_false(val: &bool) -> bool {
    !*val
}

pub(crate) fn is_empty_vec<T>(val: &[T]) -> bool {
    val.is_empty()
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    T: Default + serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
