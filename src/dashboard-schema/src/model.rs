// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Value types whose wire shape is identical in both schema generations.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{deserialize_null_default, is_empty_vec, is_false};

/// A variable's option text or value: a single string, or a list when the
/// variable allows multiple selections.
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Single(String),
    Multi(Vec<String>),
}

impl Default for OptionValue {
    fn default() -> Self {
        OptionValue::Single(String::new())
    }
}

impl OptionValue {
    /// Flattens the value to a single string, joining lists with `,`.
    pub fn joined(&self) -> String {
        match self {
            OptionValue::Single(s) => s.clone(),
            OptionValue::Multi(values) => values.join(","),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            OptionValue::Single(s) => s.is_empty(),
            OptionValue::Multi(values) => values.is_empty(),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Single(s.to_owned())
    }
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableOption {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub selected: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub text: OptionValue,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub value: OptionValue,
}

impl VariableOption {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        VariableOption {
            selected: None,
            text: OptionValue::Single(text.into()),
            value: OptionValue::Single(value.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.value.is_empty()
    }
}

/// A link from a panel to an external resource.
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataLink {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "targetBlank", skip_serializing_if = "Option::is_none", default)]
    pub target_blank: Option<bool>,
}

fn default_link_type() -> String {
    "link".to_string()
}

/// A dashboard-level link, either to a URL or to a tag-filtered set of
/// dashboards.
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardLink {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default = "default_link_type")]
    pub link_type: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub tooltip: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub tags: Vec<String>,
    #[serde(rename = "asDropdown", default)]
    pub as_dropdown: bool,
    #[serde(rename = "targetBlank", default)]
    pub target_blank: bool,
    #[serde(rename = "includeVars", default)]
    pub include_vars: bool,
    #[serde(rename = "keepTime", default)]
    pub keep_time: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub placement: Option<String>,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryPanelRef {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub name: String,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRangeOption {
    pub display: String,
    pub from: String,
    pub to: String,
}

/// An ad hoc filter. The same shape is used for `filters` and `baseFilters`.
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdHocFilter {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub values: Option<Vec<String>>,
    #[serde(rename = "keyLabel", skip_serializing_if = "Option::is_none", default)]
    pub key_label: Option<String>,
    #[serde(rename = "valueLabels", skip_serializing_if = "Option::is_none", default)]
    pub value_labels: Option<Vec<String>>,
    #[serde(rename = "forceEdit", skip_serializing_if = "Option::is_none", default)]
    pub force_edit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub condition: Option<String>,
}

/// A suggested key for ad hoc filters or group-by variables.
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricFindValue {
    #[serde(default)]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expandable: Option<bool>,
}

/// Restricts an annotation query to a set of panel ids.
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPanelFilter {
    #[serde(skip_serializing_if = "is_false", default)]
    pub exclude: bool,
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub ids: Vec<i64>,
}

/// One step of a panel's transformation pipeline.
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationConfig {
    #[serde(default)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub topic: Option<String>,
    #[serde(default = "empty_object")]
    pub options: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_option_value_single_and_multi() {
        let opt: VariableOption =
            serde_json::from_value(json!({"text": ["a", "b"], "value": ["1", "2"]})).unwrap();
        assert_eq!(opt.value.joined(), "1,2");
        assert_eq!(opt.selected, None);

        let opt: VariableOption = serde_json::from_value(json!({"text": null})).unwrap();
        assert!(opt.is_empty());
    }

    #[test]
    fn test_dashboard_link_defaults() {
        let link: DashboardLink = serde_json::from_value(json!({"title": "Docs"})).unwrap();
        assert_eq!(link.link_type, "link");
        assert!(link.tags.is_empty());
        assert_eq!(link.url, None);

        let out = serde_json::to_value(&link).unwrap();
        assert_eq!(out["asDropdown"], false);
        assert!(out.get("placement").is_none());
    }

    #[test]
    fn test_transformation_options_default_to_object() {
        let t: TransformationConfig = serde_json::from_value(json!({"id": "merge"})).unwrap();
        assert_eq!(t.options, json!({}));
        assert_eq!(t.disabled, None);
    }
}
