// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The structured dashboard model: a map of named elements plus a layout
//! tree that arranges them.

use std::collections::BTreeMap;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::{default_true, deserialize_null_default, is_false};
use crate::datasource::DataSourceRef;
use crate::layout::Layout;
use crate::model::{
    AdHocFilter, AnnotationPanelFilter, DashboardLink, DataLink, LibraryPanelRef, MetricFindValue,
    TimeRangeOption, TransformationConfig, VariableOption,
};

/// Default choices offered by the auto-refresh picker.
pub const DEFAULT_AUTO_REFRESH_INTERVALS: [&str; 10] =
    ["5s", "10s", "30s", "1m", "5m", "15m", "30m", "1h", "2h", "1d"];

/// Key under which a plain-string variable query is stored inside a
/// structured query spec.
pub const LEGACY_STRING_VALUE_KEY: &str = "__legacyStringValue";

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub annotations: Vec<AnnotationQueryKind>,
    #[serde(rename = "cursorSync", default)]
    pub cursor_sync: CursorSync,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub editable: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub elements: BTreeMap<String, Element>,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub links: Vec<DashboardLink>,
    #[serde(rename = "liveNow", skip_serializing_if = "Option::is_none", default)]
    pub live_now: Option<bool>,
    #[serde(default)]
    pub preload: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub revision: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub tags: Vec<String>,
    #[serde(rename = "timeSettings", default)]
    pub time_settings: TimeSettings,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub variables: Vec<VariableKind>,
    /// Top-level keys without a field above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Dashboard {
            annotations: vec![],
            cursor_sync: CursorSync::Off,
            description: None,
            editable: Some(true),
            elements: BTreeMap::new(),
            layout: Layout::default(),
            links: vec![],
            live_now: None,
            preload: false,
            revision: None,
            tags: vec![],
            time_settings: TimeSettings::default(),
            title: String::new(),
            variables: vec![],
            extra: Map::new(),
        }
    }
}

/// Generate the JSON Schema for the structured dashboard model
#[cfg(feature = "schema")]
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(Dashboard)
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorSync {
    #[default]
    Off,
    Crosshair,
    Tooltip,
}

impl CursorSync {
    pub fn from_graph_tooltip(value: i64) -> Self {
        match value {
            1 => CursorSync::Crosshair,
            2 => CursorSync::Tooltip,
            _ => CursorSync::Off,
        }
    }

    pub fn graph_tooltip(&self) -> i64 {
        match self {
            CursorSync::Off => 0,
            CursorSync::Crosshair => 1,
            CursorSync::Tooltip => 2,
        }
    }
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSettings {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timezone: Option<String>,
    pub from: String,
    pub to: String,
    #[serde(rename = "autoRefresh", default)]
    pub auto_refresh: String,
    #[serde(rename = "autoRefreshIntervals", default, deserialize_with = "deserialize_null_default")]
    pub auto_refresh_intervals: Vec<String>,
    #[serde(rename = "quickRanges", skip_serializing_if = "Option::is_none", default)]
    pub quick_ranges: Option<Vec<TimeRangeOption>>,
    #[serde(rename = "hideTimepicker", default)]
    pub hide_timepicker: bool,
    #[serde(rename = "weekStart", skip_serializing_if = "Option::is_none", default)]
    pub week_start: Option<String>,
    #[serde(rename = "fiscalYearStartMonth", default)]
    pub fiscal_year_start_month: i64,
    #[serde(rename = "nowDelay", skip_serializing_if = "Option::is_none", default)]
    pub now_delay: Option<String>,
}

impl Default for TimeSettings {
    fn default() -> Self {
        TimeSettings {
            timezone: Some("browser".to_string()),
            from: "now-6h".to_string(),
            to: "now".to_string(),
            auto_refresh: String::new(),
            auto_refresh_intervals: DEFAULT_AUTO_REFRESH_INTERVALS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            quick_ranges: None,
            hide_timepicker: false,
            week_start: None,
            fiscal_year_start_month: 0,
            now_delay: None,
        }
    }
}

// Elements

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec")]
pub enum Element {
    Panel(PanelSpec),
    LibraryPanel(LibraryPanelSpec),
}

impl Element {
    pub fn id(&self) -> i64 {
        match self {
            Element::Panel(panel) => panel.id,
            Element::LibraryPanel(lib) => lib.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Element::Panel(panel) => &panel.title,
            Element::LibraryPanel(lib) => &lib.title,
        }
    }
}

/// Key under which the element with `id` is stored in the element map.
pub fn element_key(id: i64) -> String {
    format!("panel-{id}")
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub links: Vec<DataLink>,
    pub data: QueryGroupKind,
    #[serde(rename = "vizConfig")]
    pub viz_config: VizConfigKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transparent: Option<bool>,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryPanelSpec {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "libraryPanel")]
    pub library_panel: LibraryPanelRef,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec")]
pub enum QueryGroupKind {
    QueryGroup(QueryGroupSpec),
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryGroupSpec {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub queries: Vec<PanelQueryKind>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub transformations: Vec<TransformationKind>,
    #[serde(rename = "queryOptions", default)]
    pub query_options: QueryOptionsSpec,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec")]
pub enum PanelQueryKind {
    PanelQuery(PanelQuerySpec),
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelQuerySpec {
    pub query: DataQueryKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub datasource: Option<DataSourceRef>,
    #[serde(rename = "refId", default)]
    pub ref_id: String,
    #[serde(default)]
    pub hidden: bool,
}

/// A datasource query. `kind` is the datasource type; `spec` is the
/// datasource-specific query body.
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQueryKind {
    #[serde(default)]
    pub kind: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub spec: Map<String, Value>,
}

/// A transformation; `kind` repeats the transformer id.
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationKind {
    pub kind: String,
    pub spec: TransformationConfig,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOptionsSpec {
    #[serde(rename = "timeFrom", skip_serializing_if = "Option::is_none", default)]
    pub time_from: Option<String>,
    #[serde(rename = "maxDataPoints", skip_serializing_if = "Option::is_none", default)]
    pub max_data_points: Option<i64>,
    #[serde(rename = "timeShift", skip_serializing_if = "Option::is_none", default)]
    pub time_shift: Option<String>,
    #[serde(rename = "queryCachingTTL", skip_serializing_if = "Option::is_none", default)]
    pub query_caching_ttl: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub interval: Option<String>,
    #[serde(rename = "cacheTimeout", skip_serializing_if = "Option::is_none", default)]
    pub cache_timeout: Option<String>,
    #[serde(rename = "hideTimeOverride", skip_serializing_if = "Option::is_none", default)]
    pub hide_time_override: Option<bool>,
}

/// Visualization settings; `kind` is the plugin id.
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizConfigKind {
    pub kind: String,
    pub spec: VizConfigSpec,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VizConfigSpec {
    #[serde(rename = "pluginVersion", default)]
    pub plugin_version: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub options: Map<String, Value>,
    #[serde(rename = "fieldConfig", default = "default_field_config")]
    pub field_config: Value,
}

pub fn default_field_config() -> Value {
    serde_json::json!({"defaults": {}, "overrides": []})
}

// Annotations

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec")]
pub enum AnnotationQueryKind {
    AnnotationQuery(AnnotationQuerySpec),
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationQuerySpec {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub datasource: Option<DataSourceRef>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub query: Option<DataQueryKind>,
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub hide: bool,
    #[serde(rename = "iconColor", default)]
    pub icon_color: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "builtIn", skip_serializing_if = "is_false", default)]
    pub built_in: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub filter: Option<AnnotationPanelFilter>,
    #[serde(rename = "legacyOptions", skip_serializing_if = "Option::is_none", default)]
    pub legacy_options: Option<Map<String, Value>>,
}

// Variables

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec")]
pub enum VariableKind {
    QueryVariable(QueryVariableSpec),
    TextVariable(TextVariableSpec),
    ConstantVariable(ConstantVariableSpec),
    DatasourceVariable(DatasourceVariableSpec),
    IntervalVariable(IntervalVariableSpec),
    CustomVariable(CustomVariableSpec),
    GroupByVariable(GroupByVariableSpec),
    AdhocVariable(AdhocVariableSpec),
}

impl VariableKind {
    pub fn name(&self) -> &str {
        match self {
            VariableKind::QueryVariable(v) => &v.name,
            VariableKind::TextVariable(v) => &v.name,
            VariableKind::ConstantVariable(v) => &v.name,
            VariableKind::DatasourceVariable(v) => &v.name,
            VariableKind::IntervalVariable(v) => &v.name,
            VariableKind::CustomVariable(v) => &v.name,
            VariableKind::GroupByVariable(v) => &v.name,
            VariableKind::AdhocVariable(v) => &v.name,
        }
    }
}

/// Whether and how a variable shows on the dashboard. Stored as an ordinal
/// in the flat format.
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariableHide {
    #[default]
    DontHide,
    HideLabel,
    HideVariable,
}

impl VariableHide {
    pub fn from_ordinal(n: i64) -> Self {
        match n {
            1 => VariableHide::HideLabel,
            2 => VariableHide::HideVariable,
            _ => VariableHide::DontHide,
        }
    }

    pub fn ordinal(&self) -> i64 {
        match self {
            VariableHide::DontHide => 0,
            VariableHide::HideLabel => 1,
            VariableHide::HideVariable => 2,
        }
    }
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariableRefresh {
    #[default]
    Never,
    OnDashboardLoad,
    OnTimeRangeChanged,
}

impl VariableRefresh {
    pub fn from_ordinal(n: i64) -> Self {
        match n {
            1 => VariableRefresh::OnDashboardLoad,
            2 => VariableRefresh::OnTimeRangeChanged,
            _ => VariableRefresh::Never,
        }
    }

    pub fn ordinal(&self) -> i64 {
        match self {
            VariableRefresh::Never => 0,
            VariableRefresh::OnDashboardLoad => 1,
            VariableRefresh::OnTimeRangeChanged => 2,
        }
    }
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariableSort {
    #[default]
    Disabled,
    AlphabeticalAsc,
    AlphabeticalDesc,
    NumericalAsc,
    NumericalDesc,
    AlphabeticalCaseInsensitiveAsc,
    AlphabeticalCaseInsensitiveDesc,
    NaturalAsc,
    NaturalDesc,
}

impl VariableSort {
    const ORDER: [VariableSort; 9] = [
        VariableSort::Disabled,
        VariableSort::AlphabeticalAsc,
        VariableSort::AlphabeticalDesc,
        VariableSort::NumericalAsc,
        VariableSort::NumericalDesc,
        VariableSort::AlphabeticalCaseInsensitiveAsc,
        VariableSort::AlphabeticalCaseInsensitiveDesc,
        VariableSort::NaturalAsc,
        VariableSort::NaturalDesc,
    ];

    pub fn from_ordinal(n: i64) -> Self {
        usize::try_from(n)
            .ok()
            .and_then(|i| Self::ORDER.get(i).copied())
            .unwrap_or_default()
    }

    pub fn ordinal(&self) -> i64 {
        Self::ORDER.iter().position(|s| s == self).unwrap_or(0) as i64
    }
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryVariableSpec {
    pub name: String,
    #[serde(default)]
    pub current: VariableOption,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(default)]
    pub hide: VariableHide,
    #[serde(default)]
    pub refresh: VariableRefresh,
    #[serde(rename = "skipUrlSync", default)]
    pub skip_url_sync: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub datasource: Option<DataSourceRef>,
    #[serde(default)]
    pub query: DataQueryKind,
    #[serde(default)]
    pub regex: String,
    #[serde(default)]
    pub sort: VariableSort,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub definition: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub options: Vec<VariableOption>,
    #[serde(default)]
    pub multi: bool,
    #[serde(rename = "includeAll", default)]
    pub include_all: bool,
    #[serde(rename = "allValue", skip_serializing_if = "Option::is_none", default)]
    pub all_value: Option<String>,
    #[serde(rename = "allowCustomValue", default = "default_true")]
    pub allow_custom_value: bool,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextVariableSpec {
    pub name: String,
    #[serde(default)]
    pub current: VariableOption,
    #[serde(default)]
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(default)]
    pub hide: VariableHide,
    #[serde(rename = "skipUrlSync", default)]
    pub skip_url_sync: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstantVariableSpec {
    pub name: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub current: VariableOption,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(default)]
    pub hide: VariableHide,
    #[serde(rename = "skipUrlSync", default)]
    pub skip_url_sync: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasourceVariableSpec {
    pub name: String,
    #[serde(rename = "pluginId", default)]
    pub plugin_id: String,
    #[serde(default)]
    pub refresh: VariableRefresh,
    #[serde(default)]
    pub regex: String,
    #[serde(default)]
    pub current: VariableOption,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub options: Vec<VariableOption>,
    #[serde(default)]
    pub multi: bool,
    #[serde(rename = "includeAll", default)]
    pub include_all: bool,
    #[serde(rename = "allValue", skip_serializing_if = "Option::is_none", default)]
    pub all_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(default)]
    pub hide: VariableHide,
    #[serde(rename = "skipUrlSync", default)]
    pub skip_url_sync: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(rename = "allowCustomValue", default = "default_true")]
    pub allow_custom_value: bool,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervalVariableSpec {
    pub name: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub current: VariableOption,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub options: Vec<VariableOption>,
    #[serde(default)]
    pub auto: bool,
    #[serde(default)]
    pub auto_min: String,
    #[serde(default)]
    pub auto_count: i64,
    #[serde(default)]
    pub refresh: VariableRefresh,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(default)]
    pub hide: VariableHide,
    #[serde(rename = "skipUrlSync", default)]
    pub skip_url_sync: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomVariableSpec {
    pub name: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub current: VariableOption,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub options: Vec<VariableOption>,
    #[serde(default)]
    pub multi: bool,
    #[serde(rename = "includeAll", default)]
    pub include_all: bool,
    #[serde(rename = "allValue", skip_serializing_if = "Option::is_none", default)]
    pub all_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(default)]
    pub hide: VariableHide,
    #[serde(rename = "skipUrlSync", default)]
    pub skip_url_sync: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(rename = "allowCustomValue", default = "default_true")]
    pub allow_custom_value: bool,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupByVariableSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub datasource: Option<DataSourceRef>,
    #[serde(rename = "defaultValue", skip_serializing_if = "Option::is_none", default)]
    pub default_value: Option<VariableOption>,
    #[serde(default)]
    pub current: VariableOption,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub options: Vec<VariableOption>,
    #[serde(default)]
    pub multi: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(default)]
    pub hide: VariableHide,
    #[serde(rename = "skipUrlSync", default)]
    pub skip_url_sync: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdhocVariableSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub datasource: Option<DataSourceRef>,
    #[serde(rename = "baseFilters", default, deserialize_with = "deserialize_null_default")]
    pub base_filters: Vec<AdHocFilter>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub filters: Vec<AdHocFilter>,
    #[serde(rename = "defaultKeys", default, deserialize_with = "deserialize_null_default")]
    pub default_keys: Vec<MetricFindValue>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(default)]
    pub hide: VariableHide,
    #[serde(rename = "skipUrlSync", default)]
    pub skip_url_sync: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(rename = "allowCustomValue", default = "default_true")]
    pub allow_custom_value: bool,
}
