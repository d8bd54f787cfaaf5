// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Datasource references and their resolution against a registry snapshot
//! supplied by the caller.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const GRAFANA_DATASOURCE_UID: &str = "-- Grafana --";
pub const GRAFANA_DATASOURCE_TYPE: &str = "grafana";
pub const MIXED_DATASOURCE_UID: &str = "-- Mixed --";
pub const MIXED_DATASOURCE_TYPE: &str = "mixed";
pub const DASHBOARD_DATASOURCE_UID: &str = "-- Dashboard --";
pub const DASHBOARD_DATASOURCE_TYPE: &str = "datasource";

#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceRef {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub ds_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub uid: Option<String>,
    #[serde(rename = "apiVersion", skip_serializing_if = "Option::is_none", default)]
    pub api_version: Option<String>,
}

impl DataSourceRef {
    pub fn new(uid: &str, ds_type: &str) -> Self {
        DataSourceRef {
            ds_type: Some(ds_type.to_owned()),
            uid: Some(uid.to_owned()),
            api_version: None,
        }
    }

    pub fn of_type(ds_type: &str) -> Self {
        DataSourceRef {
            ds_type: Some(ds_type.to_owned()),
            ..DataSourceRef::default()
        }
    }

    pub fn grafana() -> Self {
        DataSourceRef::new(GRAFANA_DATASOURCE_UID, GRAFANA_DATASOURCE_TYPE)
    }

    pub fn mixed() -> Self {
        DataSourceRef::new(MIXED_DATASOURCE_UID, MIXED_DATASOURCE_TYPE)
    }

    pub fn uid(&self) -> &str {
        self.uid.as_deref().unwrap_or("")
    }

    pub fn ds_type(&self) -> &str {
        self.ds_type.as_deref().unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.uid().is_empty() && self.ds_type().is_empty()
    }

    /// A reference that names one specific datasource instance, as opposed
    /// to a template variable or the mixed pseudo-datasource.
    pub fn is_concrete(&self) -> bool {
        let uid = self.uid();
        !uid.is_empty() && !is_template_variable(uid) && uid != MIXED_DATASOURCE_UID
    }
}

pub fn is_template_variable(uid: &str) -> bool {
    uid.starts_with('$')
}

/// Accepts a datasource written as an object, a bare uid string or null.
pub(crate) fn deserialize_loose_ref<'de, D>(deserializer: D) -> Result<Option<DataSourceRef>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Uid(String),
        Ref(DataSourceRef),
    }

    Ok(match Option::<Loose>::deserialize(deserializer)? {
        None => None,
        Some(Loose::Uid(uid)) if uid.is_empty() => None,
        Some(Loose::Uid(uid)) => Some(DataSourceRef {
            uid: Some(uid),
            ..DataSourceRef::default()
        }),
        Some(Loose::Ref(r)) if r.is_empty() => None,
        Some(Loose::Ref(r)) => Some(r),
    })
}

/// One configured datasource instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceDescriptor {
    #[serde(default)]
    pub name: String,
    pub uid: String,
    #[serde(rename = "type")]
    pub ds_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl DatasourceDescriptor {
    pub fn to_ref(&self) -> DataSourceRef {
        DataSourceRef {
            ds_type: Some(self.ds_type.clone()),
            uid: Some(self.uid.clone()),
            api_version: self.api_version.clone(),
        }
    }
}

/// Read-only snapshot of the configured datasources, looked up by name or
/// uid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DatasourceRegistry {
    entries: Vec<DatasourceDescriptor>,
}

impl<'de> Deserialize<'de> for DatasourceRegistry {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // either a list of descriptors or a map keyed by datasource name
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(Vec<DatasourceDescriptor>),
            Map(std::collections::BTreeMap<String, DatasourceDescriptor>),
        }

        let entries = match Repr::deserialize(deserializer)? {
            Repr::List(entries) => entries,
            Repr::Map(map) => map
                .into_iter()
                .map(|(name, mut desc)| {
                    if desc.name.is_empty() {
                        desc.name = name;
                    }
                    desc
                })
                .collect(),
        };
        Ok(DatasourceRegistry { entries })
    }
}

impl FromIterator<DatasourceDescriptor> for DatasourceRegistry {
    fn from_iter<I: IntoIterator<Item = DatasourceDescriptor>>(iter: I) -> Self {
        DatasourceRegistry {
            entries: iter.into_iter().collect(),
        }
    }
}

impl DatasourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, descriptor: DatasourceDescriptor) {
        self.entries.push(descriptor);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds a datasource by name first, then by uid.
    pub fn get(&self, name_or_uid: &str) -> Option<&DatasourceDescriptor> {
        self.entries
            .iter()
            .find(|d| d.name == name_or_uid)
            .or_else(|| self.entries.iter().find(|d| d.uid == name_or_uid))
    }

    fn flagged_default(&self) -> Option<&DatasourceDescriptor> {
        self.entries.iter().find(|d| d.is_default)
    }

    /// Fills in whatever `reference` leaves out.
    ///
    /// A uid without a type is completed from the registry, unless it is a
    /// template variable. A `datasource`-typed reference without a uid
    /// points at the built-in dashboard datasource.
    pub fn complete(&self, reference: &DataSourceRef) -> DataSourceRef {
        let mut resolved = reference.clone();
        let uid = reference.uid();
        if !uid.is_empty() && reference.ds_type().is_empty() && !is_template_variable(uid) {
            match self.get(uid) {
                Some(desc) => {
                    resolved.uid = Some(desc.uid.clone());
                    resolved.ds_type = Some(desc.ds_type.clone());
                    if resolved.api_version.is_none() {
                        resolved.api_version = desc.api_version.clone();
                    }
                }
                None => tracing::warn!(uid, "datasource not found in registry"),
            }
        }
        if uid.is_empty() && reference.ds_type() == DASHBOARD_DATASOURCE_TYPE {
            resolved.uid = Some(GRAFANA_DATASOURCE_TYPE.to_owned());
        }
        resolved
    }
}

/// Returns the fully qualified default datasource.
///
/// `default_name` is matched by name, then uid. Without a configured name
/// an entry flagged as default is used; failing both, the built-in Grafana
/// datasource.
pub fn resolve_default_datasource(
    registry: &DatasourceRegistry,
    default_name: Option<&str>,
) -> DataSourceRef {
    let found = match default_name {
        Some(name) if !name.is_empty() => registry.get(name),
        _ => registry.flagged_default(),
    };
    match found {
        Some(desc) => desc.to_ref(),
        None => DataSourceRef::grafana(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> DatasourceRegistry {
        serde_json::from_value(json!([
            {"name": "Prometheus", "uid": "prom-uid", "type": "prometheus", "apiVersion": "v1"},
            {"name": "Loki", "uid": "loki-uid", "type": "loki", "isDefault": true},
        ]))
        .unwrap()
    }

    #[test]
    fn test_resolve_default_by_name_and_uid() {
        let reg = registry();
        let ds = resolve_default_datasource(&reg, Some("Prometheus"));
        assert_eq!(ds.uid(), "prom-uid");
        assert_eq!(ds.ds_type(), "prometheus");
        assert_eq!(ds.api_version.as_deref(), Some("v1"));

        let ds = resolve_default_datasource(&reg, Some("loki-uid"));
        assert_eq!(ds.ds_type(), "loki");
    }

    #[test]
    fn test_resolve_default_falls_back() {
        let reg = registry();
        assert_eq!(resolve_default_datasource(&reg, None).uid(), "loki-uid");
        assert_eq!(
            resolve_default_datasource(&reg, Some("missing")),
            DataSourceRef::grafana()
        );
        assert_eq!(
            resolve_default_datasource(&DatasourceRegistry::new(), None),
            DataSourceRef::grafana()
        );
    }

    #[test]
    fn test_registry_from_map() {
        let reg: DatasourceRegistry = serde_json::from_value(json!({
            "Tempo": {"uid": "tempo-uid", "type": "tempo"}
        }))
        .unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("Tempo").map(|d| d.uid.as_str()), Some("tempo-uid"));
    }

    #[test]
    fn test_complete_reference() {
        let reg = registry();
        let r = reg.complete(&DataSourceRef {
            uid: Some("prom-uid".to_string()),
            ..DataSourceRef::default()
        });
        assert_eq!(r.ds_type(), "prometheus");

        // template variables are resolved at render time
        let r = reg.complete(&DataSourceRef {
            uid: Some("${ds}".to_string()),
            ..DataSourceRef::default()
        });
        assert_eq!(r.ds_type, None);

        let r = reg.complete(&DataSourceRef::of_type("datasource"));
        assert_eq!(r.uid(), "grafana");
    }

    #[test]
    fn test_loose_reference_forms() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "deserialize_loose_ref")]
            datasource: Option<DataSourceRef>,
        }

        let h: Holder = serde_json::from_value(json!({"datasource": "prom-uid"})).unwrap();
        assert_eq!(h.datasource.unwrap().uid(), "prom-uid");
        let h: Holder = serde_json::from_value(json!({"datasource": null})).unwrap();
        assert!(h.datasource.is_none());
        let h: Holder = serde_json::from_value(json!({})).unwrap();
        assert!(h.datasource.is_none());
        let h: Holder =
            serde_json::from_value(json!({"datasource": {"type": "loki", "uid": "x"}})).unwrap();
        assert_eq!(h.datasource.unwrap().ds_type(), "loki");
    }

    #[test]
    fn test_concrete() {
        assert!(DataSourceRef::new("abc", "loki").is_concrete());
        assert!(!DataSourceRef::mixed().is_concrete());
        assert!(!DataSourceRef::new("$ds", "loki").is_concrete());
        assert!(!DataSourceRef::of_type("loki").is_concrete());
    }
}
