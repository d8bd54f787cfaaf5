// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::backward;
use crate::common::{Conversion, Error, Result};
use crate::config::ConversionOptions;
use crate::flat;
use crate::forward;
use crate::layout::validate_layout_kinds;
use crate::structured;

/// Which of the two dashboard formats a document is written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    Flat,
    Structured,
}

impl Generation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Generation::Flat => "flat",
            Generation::Structured => "structured",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a raw document. Anything that is not recognizably structured
/// is treated as flat, including non-objects.
pub fn detect_generation(doc: &Value) -> Generation {
    match doc.as_object() {
        Some(obj) => detect_generation_of(obj),
        None => Generation::Flat,
    }
}

/// A decoded dashboard of either generation.
#[derive(Clone, Debug, PartialEq)]
pub enum Document {
    Flat(flat::Dashboard),
    Structured(structured::Dashboard),
}

impl Document {
    /// Decodes a raw document into the model matching its generation.
    ///
    /// A resource envelope (`apiVersion` plus a `spec` object) is unwrapped
    /// and its `spec` decoded. Layout discriminants are checked before the
    /// typed decode so an unknown kind is reported with its path.
    pub fn from_value(value: Value) -> Result<Document> {
        let Value::Object(obj) = value else {
            return Err(Error::malformed("dashboard must be a JSON object"));
        };
        let generation = detect_generation_of(&obj);
        let body = unwrap_envelope(obj);

        match generation {
            Generation::Flat => Ok(Document::Flat(serde_json::from_value(Value::Object(body))?)),
            Generation::Structured => {
                if let Some(layout) = body.get("layout") {
                    validate_layout_kinds(layout, "layout")?;
                }
                Ok(Document::Structured(serde_json::from_value(Value::Object(body))?))
            }
        }
    }

    pub fn generation(&self) -> Generation {
        match self {
            Document::Flat(_) => Generation::Flat,
            Document::Structured(_) => Generation::Structured,
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(match self {
            Document::Flat(dash) => serde_json::to_value(dash)?,
            Document::Structured(dash) => serde_json::to_value(dash)?,
        })
    }
}

impl From<flat::Dashboard> for Document {
    fn from(dash: flat::Dashboard) -> Self {
        Document::Flat(dash)
    }
}

impl From<structured::Dashboard> for Document {
    fn from(dash: structured::Dashboard) -> Self {
        Document::Structured(dash)
    }
}

fn detect_generation_of(obj: &Map<String, Value>) -> Generation {
    let has = |key: &str| obj.contains_key(key);
    if has("elements") || has("layout") {
        return Generation::Structured;
    }
    if has("panels") {
        return Generation::Flat;
    }
    let is_v2 = obj
        .get("apiVersion")
        .and_then(Value::as_str)
        .is_some_and(|v| v.contains("v2"));
    if is_v2 { Generation::Structured } else { Generation::Flat }
}

fn unwrap_envelope(mut obj: Map<String, Value>) -> Map<String, Value> {
    if !obj.contains_key("apiVersion") {
        return obj;
    }
    match obj.remove("spec") {
        Some(Value::Object(spec)) => spec,
        Some(other) => {
            obj.insert("spec".to_owned(), other);
            obj
        }
        None => obj,
    }
}

/// Converts `document` to the structured generation. A document that is
/// already structured is returned unchanged.
pub fn to_structured(
    document: Document,
    options: &ConversionOptions,
) -> Result<Conversion<structured::Dashboard>> {
    match document {
        Document::Structured(dash) => Ok(Conversion::clean(dash)),
        Document::Flat(dash) => Ok(forward::convert(&dash, options)),
    }
}

/// Converts `document` to the flat generation. A document that is already
/// flat is returned unchanged.
pub fn to_flat(document: Document, options: &ConversionOptions) -> Result<Conversion<flat::Dashboard>> {
    match document {
        Document::Flat(dash) => Ok(Conversion::clean(dash)),
        Document::Structured(dash) => backward::convert(&dash, options).map(Conversion::clean),
    }
}

/// Decodes a raw document and converts it to `target`, returning JSON.
///
/// A document already in the `target` generation is validated and then
/// returned as it was given, envelope and unknown keys included.
pub fn convert_value(
    value: Value,
    target: Generation,
    options: &ConversionOptions,
) -> Result<Conversion<Value>> {
    if detect_generation(&value) == target {
        Document::from_value(value.clone())?;
        return Ok(Conversion::clean(value));
    }
    let document = Document::from_value(value)?;
    let converted = match target {
        Generation::Flat => to_flat(document, options)?.map(Document::Flat),
        Generation::Structured => to_structured(document, options)?.map(Document::Structured),
    };
    Ok(Conversion {
        document: converted.document.to_value()?,
        warnings: converted.warnings,
    })
}
