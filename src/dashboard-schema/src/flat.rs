// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The flat (legacy) dashboard model: an ordered panel list in which rows
//! are panels of type `row`.
//!
//! Keys this model does not know about are kept in `extra` maps so that a
//! flat document passes through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::{deserialize_null_default, is_empty_vec, is_false};
use crate::datasource::{DataSourceRef, deserialize_loose_ref};
use crate::grid::GridPos;
use crate::model::{
    AdHocFilter, AnnotationPanelFilter, DashboardLink, DataLink, LibraryPanelRef, MetricFindValue,
    TimeRangeOption, TransformationConfig, VariableOption,
};

pub const ROW_PANEL_TYPE: &str = "row";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub editable: Option<bool>,
    #[serde(rename = "graphTooltip", default)]
    pub graph_tooltip: i64,
    #[serde(skip_serializing_if = "is_false", default)]
    pub preload: bool,
    #[serde(rename = "liveNow", skip_serializing_if = "Option::is_none", default)]
    pub live_now: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub revision: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub time: Option<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timepicker: Option<TimePicker>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refresh: Option<String>,
    #[serde(rename = "fiscalYearStartMonth", skip_serializing_if = "Option::is_none", default)]
    pub fiscal_year_start_month: Option<i64>,
    #[serde(rename = "weekStart", skip_serializing_if = "Option::is_none", default)]
    pub week_start: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub links: Vec<DashboardLink>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub panels: Vec<Panel>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub templating: Templating,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub annotations: Annotations,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dashboard {
    /// Number of panels that are not rows, including those nested inside
    /// collapsed rows.
    pub fn content_panel_count(&self) -> usize {
        self.panels
            .iter()
            .map(|p| {
                if p.is_row() {
                    p.panels.as_ref().map_or(0, |children| children.len())
                } else {
                    1
                }
            })
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

impl Default for TimeRange {
    fn default() -> Self {
        TimeRange {
            from: "now-6h".to_string(),
            to: "now".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimePicker {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refresh_intervals: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hidden: Option<bool>,
    #[serde(rename = "nowDelay", skip_serializing_if = "Option::is_none", default)]
    pub now_delay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub quick_ranges: Option<Vec<TimeRangeOption>>,
}

impl TimePicker {
    pub fn is_empty(&self) -> bool {
        self.refresh_intervals.is_none()
            && self.hidden.is_none()
            && self.now_delay.is_none()
            && self.quick_ranges.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Templating {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub list: Vec<Variable>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub list: Vec<Annotation>,
}

/// A panel, or a row when `type` is `row`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
    #[serde(rename = "type", default)]
    pub panel_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(rename = "gridPos", skip_serializing_if = "Option::is_none", default)]
    pub grid_pos: Option<GridPos>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_loose_ref"
    )]
    pub datasource: Option<DataSourceRef>,
    #[serde(skip_serializing_if = "is_empty_vec", default, deserialize_with = "deserialize_null_default")]
    pub targets: Vec<Map<String, Value>>,
    #[serde(skip_serializing_if = "is_empty_vec", default, deserialize_with = "deserialize_null_default")]
    pub transformations: Vec<TransformationConfig>,
    #[serde(rename = "fieldConfig", skip_serializing_if = "Option::is_none", default)]
    pub field_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub options: Option<Map<String, Value>>,
    #[serde(rename = "pluginVersion", skip_serializing_if = "Option::is_none", default)]
    pub plugin_version: Option<String>,
    #[serde(skip_serializing_if = "is_empty_vec", default, deserialize_with = "deserialize_null_default")]
    pub links: Vec<DataLink>,
    #[serde(skip_serializing_if = "is_false", default)]
    pub transparent: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub repeat: Option<String>,
    #[serde(rename = "repeatDirection", skip_serializing_if = "Option::is_none", default)]
    pub repeat_direction: Option<String>,
    #[serde(rename = "maxPerRow", skip_serializing_if = "Option::is_none", default)]
    pub max_per_row: Option<i64>,
    #[serde(rename = "libraryPanel", skip_serializing_if = "Option::is_none", default)]
    pub library_panel: Option<LibraryPanelRef>,
    #[serde(rename = "cacheTimeout", skip_serializing_if = "Option::is_none", default)]
    pub cache_timeout: Option<String>,
    #[serde(rename = "maxDataPoints", skip_serializing_if = "Option::is_none", default)]
    pub max_data_points: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub interval: Option<String>,
    #[serde(rename = "hideTimeOverride", skip_serializing_if = "Option::is_none", default)]
    pub hide_time_override: Option<bool>,
    #[serde(rename = "queryCachingTTL", skip_serializing_if = "Option::is_none", default)]
    pub query_caching_ttl: Option<i64>,
    #[serde(rename = "timeFrom", skip_serializing_if = "Option::is_none", default)]
    pub time_from: Option<String>,
    #[serde(rename = "timeShift", skip_serializing_if = "Option::is_none", default)]
    pub time_shift: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub collapsed: Option<bool>,
    /// Children of a row. Only rows carry this; it is empty unless the row
    /// is collapsed.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub panels: Option<Vec<Panel>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Panel {
    pub fn is_row(&self) -> bool {
        self.panel_type == ROW_PANEL_TYPE
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed.unwrap_or(false)
    }

    pub fn y(&self) -> i64 {
        self.grid_pos.map_or(0, |pos| pos.y)
    }

    /// A row panel with no children.
    pub fn row(id: i64, title: &str, collapsed: bool, y: i64) -> Self {
        Panel {
            id: Some(id),
            panel_type: ROW_PANEL_TYPE.to_string(),
            title: title.to_owned(),
            grid_pos: Some(GridPos::new(0, y, crate::grid::GRID_COLUMN_COUNT, 1)),
            collapsed: Some(collapsed),
            panels: Some(vec![]),
            ..Panel::default()
        }
    }
}

/// A template variable. One struct covers every kind; `type` says which
/// fields are meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hide: i64,
    #[serde(rename = "skipUrlSync", default)]
    pub skip_url_sync: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub current: Option<VariableOption>,
    #[serde(skip_serializing_if = "is_empty_vec", default, deserialize_with = "deserialize_null_default")]
    pub options: Vec<VariableOption>,
    /// A string for most kinds; query variables may carry an object.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub query: Option<Value>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_loose_ref"
    )]
    pub datasource: Option<DataSourceRef>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub definition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refresh: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sort: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub multi: Option<bool>,
    #[serde(rename = "includeAll", skip_serializing_if = "Option::is_none", default)]
    pub include_all: Option<bool>,
    #[serde(rename = "allValue", skip_serializing_if = "Option::is_none", default)]
    pub all_value: Option<String>,
    #[serde(rename = "allowCustomValue", skip_serializing_if = "Option::is_none", default)]
    pub allow_custom_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub auto: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub auto_min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub auto_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub filters: Option<Vec<AdHocFilter>>,
    #[serde(rename = "baseFilters", skip_serializing_if = "Option::is_none", default)]
    pub base_filters: Option<Vec<AdHocFilter>>,
    #[serde(rename = "defaultKeys", skip_serializing_if = "Option::is_none", default)]
    pub default_keys: Option<Vec<MetricFindValue>>,
    #[serde(rename = "defaultValue", skip_serializing_if = "Option::is_none", default)]
    pub default_value: Option<VariableOption>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Variable {
    /// The `query` field as a string, empty when absent or not a string.
    pub fn query_str(&self) -> &str {
        self.query.as_ref().and_then(Value::as_str).unwrap_or("")
    }
}

/// An annotation query. Datasource-specific settings stay in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default)]
    pub name: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_loose_ref"
    )]
    pub datasource: Option<DataSourceRef>,
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub hide: bool,
    #[serde(rename = "iconColor", default)]
    pub icon_color: String,
    #[serde(
        rename = "builtIn",
        skip_serializing_if = "is_false",
        default,
        deserialize_with = "deserialize_flag",
        serialize_with = "serialize_flag"
    )]
    pub built_in: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub annotation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub filter: Option<AnnotationPanelFilter>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Legacy documents write flags as `1`/`0` or as booleans.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    })
}

fn serialize_flag<S>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i64(i64::from(*flag))
}
