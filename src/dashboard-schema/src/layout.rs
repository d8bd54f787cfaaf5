// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The structured layout tree.
//!
//! Every node is serialized as `{"kind": ..., "spec": {...}}`. A layout
//! never owns panel content; items point into the dashboard's element map
//! through an [`ElementReference`].

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{Error, Result, deserialize_null_default};

pub const REPEAT_MODE_VARIABLE: &str = "variable";

/// Discriminants accepted for layout nodes.
pub const LAYOUT_KINDS: [&str; 4] = ["GridLayout", "RowsLayout", "TabsLayout", "AutoGridLayout"];

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec")]
pub enum Layout {
    GridLayout(GridLayoutSpec),
    RowsLayout(RowsLayoutSpec),
    TabsLayout(TabsLayoutSpec),
    AutoGridLayout(AutoGridLayoutSpec),
}

impl Default for Layout {
    fn default() -> Self {
        Layout::GridLayout(GridLayoutSpec::default())
    }
}

impl Layout {
    pub fn kind(&self) -> &'static str {
        match self {
            Layout::GridLayout(_) => "GridLayout",
            Layout::RowsLayout(_) => "RowsLayout",
            Layout::TabsLayout(_) => "TabsLayout",
            Layout::AutoGridLayout(_) => "AutoGridLayout",
        }
    }

    pub fn grid(items: Vec<GridLayoutItemSpec>) -> Self {
        Layout::GridLayout(GridLayoutSpec {
            items: items.into_iter().map(GridLayoutItemKind::GridLayoutItem).collect(),
        })
    }

    pub fn rows(rows: Vec<RowsLayoutRowSpec>) -> Self {
        Layout::RowsLayout(RowsLayoutSpec {
            rows: rows.into_iter().map(RowsLayoutRowKind::RowsLayoutRow).collect(),
        })
    }

    pub fn tabs(tabs: Vec<TabsLayoutTabSpec>) -> Self {
        Layout::TabsLayout(TabsLayoutSpec {
            tabs: tabs.into_iter().map(TabsLayoutTabKind::TabsLayoutTab).collect(),
        })
    }
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementReference {
    #[serde(default = "element_reference_kind")]
    pub kind: String,
    pub name: String,
}

fn element_reference_kind() -> String {
    "ElementReference".to_string()
}

impl ElementReference {
    pub fn new(name: impl Into<String>) -> Self {
        ElementReference {
            kind: element_reference_kind(),
            name: name.into(),
        }
    }
}

/// Repeat a grid item once per value of a template variable.
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatOptions {
    pub mode: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub direction: Option<RepeatDirection>,
    #[serde(rename = "maxPerRow", skip_serializing_if = "Option::is_none", default)]
    pub max_per_row: Option<i64>,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatDirection {
    #[serde(rename = "h")]
    Horizontal,
    #[serde(rename = "v")]
    Vertical,
}

impl RepeatDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatDirection::Horizontal => "h",
            RepeatDirection::Vertical => "v",
        }
    }
}

/// Repeat directive for rows, tabs and auto-grid items, which never carry
/// a direction.
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRepeat {
    pub mode: String,
    pub value: String,
}

impl VariableRepeat {
    pub fn variable(value: impl Into<String>) -> Self {
        VariableRepeat {
            mode: REPEAT_MODE_VARIABLE.to_string(),
            value: value.into(),
        }
    }
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridLayoutSpec {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub items: Vec<GridLayoutItemKind>,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec")]
pub enum GridLayoutItemKind {
    GridLayoutItem(GridLayoutItemSpec),
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayoutItemSpec {
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
    #[serde(default)]
    pub width: i64,
    #[serde(default)]
    pub height: i64,
    pub element: ElementReference,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub repeat: Option<RepeatOptions>,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowsLayoutSpec {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub rows: Vec<RowsLayoutRowKind>,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec")]
pub enum RowsLayoutRowKind {
    RowsLayoutRow(RowsLayoutRowSpec),
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowsLayoutRowSpec {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub collapse: Option<bool>,
    #[serde(rename = "hideHeader", skip_serializing_if = "Option::is_none", default)]
    pub hide_header: Option<bool>,
    #[serde(rename = "fillScreen", skip_serializing_if = "Option::is_none", default)]
    pub fill_screen: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub repeat: Option<VariableRepeat>,
    #[serde(default)]
    pub layout: Box<Layout>,
}

impl RowsLayoutRowSpec {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapse.unwrap_or(false)
    }

    pub fn hides_header(&self) -> bool {
        self.hide_header.unwrap_or(false)
    }
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabsLayoutSpec {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub tabs: Vec<TabsLayoutTabKind>,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec")]
pub enum TabsLayoutTabKind {
    TabsLayoutTab(TabsLayoutTabSpec),
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabsLayoutTabSpec {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub repeat: Option<VariableRepeat>,
    #[serde(default)]
    pub layout: Box<Layout>,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowHeightMode {
    Short,
    #[default]
    Standard,
    Tall,
    Custom,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnWidthMode {
    Narrow,
    #[default]
    Standard,
    Wide,
    Custom,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoGridLayoutSpec {
    #[serde(rename = "maxColumnCount", skip_serializing_if = "Option::is_none", default)]
    pub max_column_count: Option<i64>,
    #[serde(rename = "columnWidthMode", default)]
    pub column_width_mode: ColumnWidthMode,
    #[serde(rename = "columnWidth", skip_serializing_if = "Option::is_none", default)]
    pub column_width: Option<f64>,
    #[serde(rename = "rowHeightMode", default)]
    pub row_height_mode: RowHeightMode,
    #[serde(rename = "rowHeight", skip_serializing_if = "Option::is_none", default)]
    pub row_height: Option<f64>,
    #[serde(rename = "fillScreen", skip_serializing_if = "Option::is_none", default)]
    pub fill_screen: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub items: Vec<AutoGridLayoutItemKind>,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec")]
pub enum AutoGridLayoutItemKind {
    AutoGridLayoutItem(AutoGridLayoutItemSpec),
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoGridLayoutItemSpec {
    pub element: ElementReference,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub repeat: Option<VariableRepeat>,
}

/// Checks every `kind` discriminant in a raw layout tree before it is
/// decoded, so an unknown kind is reported with its location instead of as
/// a generic decode failure.
pub fn validate_layout_kinds(layout: &Value, path: &str) -> Result<()> {
    let kind = kind_of(layout);
    if !LAYOUT_KINDS.contains(&kind) {
        return Err(Error::UnknownLayoutKind {
            kind: kind.to_owned(),
            path: path.to_owned(),
        });
    }
    match kind {
        "RowsLayout" => validate_children(layout, path, "rows", "RowsLayoutRow"),
        "TabsLayout" => validate_children(layout, path, "tabs", "TabsLayoutTab"),
        "AutoGridLayout" => validate_items(layout, path, "items", "AutoGridLayoutItem"),
        _ => validate_items(layout, path, "items", "GridLayoutItem"),
    }
}

fn kind_of(node: &Value) -> &str {
    node.get("kind").and_then(Value::as_str).unwrap_or("")
}

fn list<'a>(node: &'a Value, key: &str) -> &'a [Value] {
    node.get("spec")
        .and_then(|spec| spec.get(key))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn expect_kind(node: &Value, expected: &str, path: &str) -> Result<()> {
    let kind = kind_of(node);
    if kind == expected {
        Ok(())
    } else {
        Err(Error::UnknownLayoutKind {
            kind: kind.to_owned(),
            path: path.to_owned(),
        })
    }
}

fn validate_items(layout: &Value, path: &str, key: &str, item_kind: &str) -> Result<()> {
    for (i, item) in list(layout, key).iter().enumerate() {
        let item_path = format!("{path}.spec.{key}[{i}]");
        expect_kind(item, item_kind, &item_path)?;
        if let Some(element) = item.get("spec").and_then(|spec| spec.get("element")) {
            if element.get("kind").is_some() {
                expect_kind(element, "ElementReference", &format!("{item_path}.spec.element"))?;
            }
        }
    }
    Ok(())
}

fn validate_children(layout: &Value, path: &str, key: &str, child_kind: &str) -> Result<()> {
    for (i, child) in list(layout, key).iter().enumerate() {
        let child_path = format!("{path}.spec.{key}[{i}]");
        expect_kind(child, child_kind, &child_path)?;
        if let Some(nested) = child.get("spec").and_then(|spec| spec.get("layout")) {
            validate_layout_kinds(nested, &format!("{child_path}.spec.layout"))?;
        }
    }
    Ok(())
}
