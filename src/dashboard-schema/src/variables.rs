// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Per-kind conversion of template variables between the flat and
//! structured models.
//!
//! Every structured kind has a flat counterpart. The reverse is not true:
//! flat variables of a kind with no structured equivalent are skipped with
//! a warning.

use serde_json::{Map, Value};

use crate::common::ConversionWarning;
use crate::config::ConversionOptions;
use crate::datasource::DataSourceRef;
use crate::flat;
use crate::model::{AdHocFilter, VariableOption};
use crate::structured::{
    AdhocVariableSpec, ConstantVariableSpec, CustomVariableSpec, DataQueryKind,
    DatasourceVariableSpec, GroupByVariableSpec, IntervalVariableSpec, LEGACY_STRING_VALUE_KEY,
    QueryVariableSpec, TextVariableSpec, VariableHide, VariableKind, VariableRefresh, VariableSort,
};

/// Converts the flat variable list, skipping kinds with no structured
/// equivalent.
pub fn to_structured(
    variables: &[flat::Variable],
    options: &ConversionOptions,
) -> (Vec<VariableKind>, Vec<ConversionWarning>) {
    let mut converted = Vec::with_capacity(variables.len());
    let mut warnings = vec![];
    for var in variables {
        match variable_to_structured(var, options) {
            Some(kind) => converted.push(kind),
            None => {
                tracing::warn!(name = %var.name, kind = %var.kind, "skipping unsupported variable kind");
                warnings.push(ConversionWarning::UnsupportedVariableKind {
                    name: var.name.clone(),
                    kind: var.kind.clone(),
                });
            }
        }
    }
    (converted, warnings)
}

/// Converts a single flat variable, or returns `None` when its kind has no
/// structured equivalent.
pub fn variable_to_structured(var: &flat::Variable, options: &ConversionOptions) -> Option<VariableKind> {
    let name = var.name.clone();
    let label = var.label.clone();
    let description = var.description.clone();
    let hide = VariableHide::from_ordinal(var.hide);
    let skip_url_sync = var.skip_url_sync;
    let current = var.current.clone().unwrap_or_default();

    let kind = match var.kind.as_str() {
        "query" => {
            let datasource = var.datasource.as_ref().map(|ds| options.registry.complete(ds));
            let ds_type = datasource
                .as_ref()
                .map(|ds| ds.ds_type().to_owned())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| options.default_datasource_ref().ds_type().to_owned());
            VariableKind::QueryVariable(QueryVariableSpec {
                name,
                current,
                label,
                hide,
                refresh: VariableRefresh::from_ordinal(var.refresh.unwrap_or(0)),
                skip_url_sync,
                description,
                datasource: datasource.filter(|ds| !ds.uid().is_empty()),
                query: DataQueryKind {
                    kind: ds_type,
                    spec: query_spec(var.query.as_ref()),
                },
                regex: var.regex.clone().unwrap_or_default(),
                sort: VariableSort::from_ordinal(var.sort.unwrap_or(0)),
                definition: var.definition.clone(),
                options: var.options.clone(),
                multi: var.multi.unwrap_or(false),
                include_all: var.include_all.unwrap_or(false),
                all_value: var.all_value.clone(),
                allow_custom_value: var.allow_custom_value.unwrap_or(true),
            })
        }
        "datasource" => {
            let plugin_id = match var.query_str() {
                "" => options.default_datasource_ref().ds_type().to_owned(),
                q => q.to_owned(),
            };
            VariableKind::DatasourceVariable(DatasourceVariableSpec {
                name,
                plugin_id,
                refresh: VariableRefresh::from_ordinal(var.refresh.unwrap_or(0)),
                regex: var.regex.clone().unwrap_or_default(),
                current,
                options: var.options.clone(),
                multi: var.multi.unwrap_or(false),
                include_all: var.include_all.unwrap_or(false),
                all_value: var.all_value.clone(),
                label,
                hide,
                skip_url_sync,
                description,
                allow_custom_value: var.allow_custom_value.unwrap_or(true),
            })
        }
        "custom" => VariableKind::CustomVariable(CustomVariableSpec {
            name,
            query: var.query_str().to_owned(),
            current,
            options: var.options.clone(),
            multi: var.multi.unwrap_or(false),
            include_all: var.include_all.unwrap_or(false),
            all_value: var.all_value.clone(),
            label,
            hide,
            skip_url_sync,
            description,
            allow_custom_value: var.allow_custom_value.unwrap_or(true),
        }),
        "constant" => {
            let query = var.query_str().to_owned();
            let current = if current.is_empty() {
                VariableOption::new(query.as_str(), query.as_str())
            } else {
                current
            };
            VariableKind::ConstantVariable(ConstantVariableSpec {
                name,
                query,
                current,
                label,
                hide,
                skip_url_sync,
                description,
            })
        }
        "interval" => {
            let query = match var.query_str() {
                "" => var
                    .options
                    .iter()
                    .map(|opt| opt.value.joined())
                    .collect::<Vec<_>>()
                    .join(","),
                q => q.to_owned(),
            };
            VariableKind::IntervalVariable(IntervalVariableSpec {
                name,
                query,
                current,
                options: var.options.clone(),
                auto: var.auto.unwrap_or(false),
                auto_min: var.auto_min.clone().unwrap_or_default(),
                auto_count: var.auto_count.unwrap_or(0),
                refresh: VariableRefresh::OnTimeRangeChanged,
                label,
                hide,
                skip_url_sync,
                description,
            })
        }
        "textbox" => {
            let query = var.query_str().to_owned();
            let current = if current.is_empty() {
                VariableOption::new(query.as_str(), query.as_str())
            } else {
                current
            };
            VariableKind::TextVariable(TextVariableSpec {
                name,
                current,
                query,
                label,
                hide,
                skip_url_sync,
                description,
            })
        }
        "adhoc" => VariableKind::AdhocVariable(AdhocVariableSpec {
            name,
            datasource: var.datasource.as_ref().map(|ds| options.registry.complete(ds)),
            base_filters: dashboard_filters(var.base_filters.as_deref()),
            filters: dashboard_filters(var.filters.as_deref()),
            default_keys: var.default_keys.clone().unwrap_or_default(),
            label,
            hide,
            skip_url_sync,
            description,
            allow_custom_value: var.allow_custom_value.unwrap_or(true),
        }),
        "groupby" => VariableKind::GroupByVariable(GroupByVariableSpec {
            name,
            datasource: var.datasource.as_ref().map(|ds| options.registry.complete(ds)),
            default_value: var.default_value.clone(),
            current,
            options: var.options.clone(),
            multi: var.multi.unwrap_or(true),
            label,
            hide,
            skip_url_sync,
            description,
        }),
        _ => return None,
    };
    Some(kind)
}

/// Query body for a structured query variable. A plain string is wrapped
/// under the legacy key; an object is used as-is.
fn query_spec(query: Option<&Value>) -> Map<String, Value> {
    match query {
        Some(Value::String(s)) if !s.is_empty() => {
            let mut spec = Map::new();
            spec.insert(LEGACY_STRING_VALUE_KEY.to_owned(), Value::String(s.clone()));
            spec
        }
        Some(Value::Object(obj)) => obj.clone(),
        _ => Map::new(),
    }
}

/// Inverse of [`query_spec`].
fn flat_query(spec: &Map<String, Value>) -> Value {
    if spec.is_empty() {
        return Value::String(String::new());
    }
    if spec.len() == 1 {
        if let Some(Value::String(s)) = spec.get(LEGACY_STRING_VALUE_KEY) {
            return Value::String(s.clone());
        }
    }
    Value::Object(spec.clone())
}

/// Keeps only filters that belong to the dashboard itself; filters injected
/// from elsewhere are not persisted.
fn dashboard_filters(filters: Option<&[AdHocFilter]>) -> Vec<AdHocFilter> {
    filters
        .unwrap_or_default()
        .iter()
        .filter(|f| matches!(f.origin.as_deref(), None | Some("") | Some("dashboard")))
        .map(|f| {
            let mut f = f.clone();
            if f.operator.is_empty() {
                f.operator = "=".to_owned();
            }
            f
        })
        .collect()
}

struct Common<'a> {
    name: &'a str,
    label: &'a Option<String>,
    description: &'a Option<String>,
    hide: VariableHide,
    skip_url_sync: bool,
}

impl Common<'_> {
    fn flat(&self, kind: &str) -> flat::Variable {
        flat::Variable {
            kind: kind.to_owned(),
            name: self.name.to_owned(),
            label: self.label.clone(),
            description: self.description.clone(),
            hide: self.hide.ordinal(),
            skip_url_sync: self.skip_url_sync,
            ..flat::Variable::default()
        }
    }
}

macro_rules! common {
    ($spec:expr) => {
        Common {
            name: &$spec.name,
            label: &$spec.label,
            description: &$spec.description,
            hide: $spec.hide,
            skip_url_sync: $spec.skip_url_sync,
        }
    };
}

/// Converts a structured variable back to its flat form.
pub fn variable_to_flat(var: &VariableKind) -> flat::Variable {
    match var {
        VariableKind::QueryVariable(spec) => {
            let datasource = spec.datasource.clone().or_else(|| {
                (!spec.query.kind.is_empty()).then(|| DataSourceRef::of_type(&spec.query.kind))
            });
            flat::Variable {
                current: Some(spec.current.clone()),
                options: spec.options.clone(),
                query: Some(flat_query(&spec.query.spec)),
                datasource,
                definition: spec.definition.clone(),
                refresh: Some(spec.refresh.ordinal()),
                regex: Some(spec.regex.clone()),
                sort: Some(spec.sort.ordinal()),
                multi: Some(spec.multi),
                include_all: Some(spec.include_all),
                all_value: spec.all_value.clone(),
                allow_custom_value: Some(spec.allow_custom_value),
                ..common!(spec).flat("query")
            }
        }
        VariableKind::TextVariable(spec) => flat::Variable {
            current: Some(spec.current.clone()),
            query: Some(Value::String(spec.query.clone())),
            ..common!(spec).flat("textbox")
        },
        VariableKind::ConstantVariable(spec) => flat::Variable {
            current: Some(VariableOption::new(spec.query.as_str(), spec.query.as_str())),
            query: Some(Value::String(spec.query.clone())),
            ..common!(spec).flat("constant")
        },
        VariableKind::DatasourceVariable(spec) => flat::Variable {
            current: Some(spec.current.clone()),
            options: spec.options.clone(),
            query: Some(Value::String(spec.plugin_id.clone())),
            refresh: Some(spec.refresh.ordinal()),
            regex: Some(spec.regex.clone()),
            multi: Some(spec.multi),
            include_all: Some(spec.include_all),
            all_value: spec.all_value.clone(),
            allow_custom_value: Some(spec.allow_custom_value),
            ..common!(spec).flat("datasource")
        },
        VariableKind::IntervalVariable(spec) => flat::Variable {
            current: Some(spec.current.clone()),
            options: spec.options.clone(),
            query: Some(Value::String(spec.query.clone())),
            refresh: Some(VariableRefresh::OnTimeRangeChanged.ordinal()),
            auto: Some(spec.auto),
            auto_min: Some(spec.auto_min.clone()),
            auto_count: Some(spec.auto_count),
            ..common!(spec).flat("interval")
        },
        VariableKind::CustomVariable(spec) => flat::Variable {
            current: Some(spec.current.clone()),
            options: spec.options.clone(),
            query: Some(Value::String(spec.query.clone())),
            multi: Some(spec.multi),
            include_all: Some(spec.include_all),
            all_value: spec.all_value.clone(),
            allow_custom_value: Some(spec.allow_custom_value),
            ..common!(spec).flat("custom")
        },
        VariableKind::GroupByVariable(spec) => flat::Variable {
            datasource: spec.datasource.clone(),
            default_value: spec.default_value.clone(),
            current: Some(spec.current.clone()),
            options: spec.options.clone(),
            multi: Some(spec.multi),
            ..common!(spec).flat("groupby")
        },
        VariableKind::AdhocVariable(spec) => flat::Variable {
            datasource: spec.datasource.clone(),
            filters: Some(spec.filters.clone()),
            base_filters: Some(spec.base_filters.clone()),
            default_keys: Some(spec.default_keys.clone()),
            allow_custom_value: Some(spec.allow_custom_value),
            ..common!(spec).flat("adhoc")
        },
    }
}

pub fn to_flat(variables: &[VariableKind]) -> Vec<flat::Variable> {
    variables.iter().map(variable_to_flat).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::DatasourceRegistry;
    use crate::model::OptionValue;
    use serde_json::json;

    fn flat_var(value: Value) -> flat::Variable {
        serde_json::from_value(value).unwrap()
    }

    fn options() -> ConversionOptions {
        let registry: DatasourceRegistry = serde_json::from_value(json!([
            {"name": "Prometheus", "uid": "prom-uid", "type": "prometheus"}
        ]))
        .unwrap();
        ConversionOptions::new(registry, Some("Prometheus".to_string()))
    }

    #[test]
    fn test_query_variable_string_query() {
        let var = flat_var(json!({
            "type": "query",
            "name": "job",
            "hide": 1,
            "refresh": 2,
            "sort": 5,
            "query": "label_values(up, job)",
            "datasource": {"uid": "prom-uid"},
            "current": {"text": "api", "value": "api"},
            "multi": true
        }));
        let Some(VariableKind::QueryVariable(spec)) = variable_to_structured(&var, &options()) else {
            panic!("expected a query variable");
        };
        assert_eq!(spec.hide, VariableHide::HideLabel);
        assert_eq!(spec.refresh, VariableRefresh::OnTimeRangeChanged);
        assert_eq!(spec.sort, VariableSort::AlphabeticalCaseInsensitiveAsc);
        assert_eq!(spec.query.kind, "prometheus");
        assert_eq!(
            spec.query.spec.get(LEGACY_STRING_VALUE_KEY),
            Some(&json!("label_values(up, job)"))
        );
        assert_eq!(spec.datasource.as_ref().map(|d| d.ds_type()), Some("prometheus"));
        assert!(spec.multi);
        assert!(spec.allow_custom_value);

        let back = variable_to_flat(&VariableKind::QueryVariable(spec));
        assert_eq!(back.kind, "query");
        assert_eq!(back.hide, 1);
        assert_eq!(back.refresh, Some(2));
        assert_eq!(back.sort, Some(5));
        assert_eq!(back.query, Some(json!("label_values(up, job)")));
    }

    #[test]
    fn test_query_variable_object_query_and_default_datasource() {
        let var = flat_var(json!({
            "type": "query",
            "name": "q",
            "query": {"query": "SELECT 1", "refId": "A"}
        }));
        let Some(VariableKind::QueryVariable(spec)) = variable_to_structured(&var, &options()) else {
            panic!("expected a query variable");
        };
        assert_eq!(spec.query.kind, "prometheus");
        assert_eq!(spec.datasource, None);
        assert_eq!(spec.query.spec.get("query"), Some(&json!("SELECT 1")));

        let back = variable_to_flat(&VariableKind::QueryVariable(spec));
        assert_eq!(back.query, Some(json!({"query": "SELECT 1", "refId": "A"})));
        assert_eq!(back.datasource, Some(DataSourceRef::of_type("prometheus")));
    }

    #[test]
    fn test_hide_is_preserved_for_every_kind() {
        for kind in ["query", "datasource", "custom", "constant", "interval", "textbox", "adhoc", "groupby"] {
            for hide in 0..3 {
                let var = flat_var(json!({"type": kind, "name": "v", "hide": hide}));
                let converted = variable_to_structured(&var, &options()).unwrap();
                let back = variable_to_flat(&converted);
                assert_eq!(back.hide, hide, "hide not preserved for {kind}");
                assert_eq!(back.kind, kind);
            }
        }
    }

    #[test]
    fn test_constant_current_from_query() {
        let var = flat_var(json!({"type": "constant", "name": "c", "query": "42", "hide": 2}));
        let Some(VariableKind::ConstantVariable(spec)) = variable_to_structured(&var, &options()) else {
            panic!("expected a constant variable");
        };
        assert_eq!(spec.current.value, OptionValue::Single("42".to_string()));
        assert_eq!(spec.hide, VariableHide::HideVariable);
    }

    #[test]
    fn test_interval_query_built_from_options() {
        let var = flat_var(json!({
            "type": "interval",
            "name": "iv",
            "refresh": 0,
            "options": [{"text": "1m", "value": "1m"}, {"text": "5m", "value": "5m"}]
        }));
        let Some(VariableKind::IntervalVariable(spec)) = variable_to_structured(&var, &options()) else {
            panic!("expected an interval variable");
        };
        assert_eq!(spec.query, "1m,5m");
        assert_eq!(spec.refresh, VariableRefresh::OnTimeRangeChanged);
        assert_eq!(variable_to_flat(&VariableKind::IntervalVariable(spec)).refresh, Some(2));
    }

    #[test]
    fn test_datasource_variable_plugin_id() {
        let var = flat_var(json!({"type": "datasource", "name": "ds", "query": "loki"}));
        let Some(VariableKind::DatasourceVariable(spec)) = variable_to_structured(&var, &options()) else {
            panic!("expected a datasource variable");
        };
        assert_eq!(spec.plugin_id, "loki");

        let var = flat_var(json!({"type": "datasource", "name": "ds"}));
        let Some(VariableKind::DatasourceVariable(spec)) = variable_to_structured(&var, &options()) else {
            panic!("expected a datasource variable");
        };
        assert_eq!(spec.plugin_id, "prometheus");
    }

    #[test]
    fn test_adhoc_filters_keep_dashboard_origin() {
        let var = flat_var(json!({
            "type": "adhoc",
            "name": "filters",
            "datasource": {"uid": "prom-uid"},
            "filters": [
                {"key": "job", "operator": "", "value": "api"},
                {"key": "env", "operator": "!=", "value": "dev", "origin": "dashboard"},
                {"key": "region", "operator": "=", "value": "eu", "origin": "scope"}
            ],
            "defaultKeys": [{"text": "job", "value": "job"}]
        }));
        let Some(VariableKind::AdhocVariable(spec)) = variable_to_structured(&var, &options()) else {
            panic!("expected an adhoc variable");
        };
        let keys: Vec<&str> = spec.filters.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["job", "env"]);
        assert_eq!(spec.filters[0].operator, "=");
        assert_eq!(spec.default_keys.len(), 1);
        assert_eq!(spec.datasource.as_ref().map(|d| d.ds_type()), Some("prometheus"));
    }

    #[test]
    fn test_groupby_multi_defaults_true() {
        let var = flat_var(json!({"type": "groupby", "name": "gb"}));
        let Some(VariableKind::GroupByVariable(spec)) = variable_to_structured(&var, &options()) else {
            panic!("expected a group-by variable");
        };
        assert!(spec.multi);
    }

    #[test]
    fn test_unsupported_kind_is_skipped_with_warning() {
        let vars = vec![
            flat_var(json!({"type": "custom", "name": "a", "query": "x,y"})),
            flat_var(json!({"type": "switch", "name": "sw"})),
            flat_var(json!({"type": "textbox", "name": "t", "query": "hello"})),
        ];
        let (converted, warnings) = to_structured(&vars, &options());
        let names: Vec<&str> = converted.iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["a", "t"]);
        assert_eq!(
            warnings,
            vec![ConversionWarning::UnsupportedVariableKind {
                name: "sw".to_string(),
                kind: "switch".to_string(),
            }]
        );
    }
}
