// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Flat to structured conversion.
//!
//! Every non-row panel becomes an element plus a grid item pointing at it.
//! Row panels become rows of a `RowsLayout`; panels that precede the first
//! row are gathered into a leading row with a hidden header.

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};

use crate::common::Conversion;
use crate::config::ConversionOptions;
use crate::datasource::{DataSourceRef, deserialize_loose_ref};
use crate::flat::{self, Panel};
use crate::grid::GridPos;
use crate::layout::{
    ElementReference, GridLayoutItemSpec, Layout, REPEAT_MODE_VARIABLE, RepeatDirection,
    RepeatOptions, RowsLayoutRowSpec, VariableRepeat,
};
use crate::structured::{
    self, AnnotationQueryKind, AnnotationQuerySpec, CursorSync, DataQueryKind, Element,
    LibraryPanelSpec, PanelQueryKind, PanelQuerySpec, PanelSpec, QueryGroupKind, QueryGroupSpec,
    QueryOptionsSpec, TimeSettings, TransformationKind, VizConfigKind, VizConfigSpec,
    default_field_config, element_key,
};
use crate::variables;

/// Converts a flat dashboard into the structured model.
pub fn convert(dash: &flat::Dashboard, options: &ConversionOptions) -> Conversion<structured::Dashboard> {
    tracing::debug!(
        panels = dash.panels.len(),
        content_panels = dash.content_panel_count(),
        "converting flat dashboard to structured"
    );
    let mut builder = ElementBuilder::new(&dash.panels, options);
    let layout = builder.layout(&dash.panels);
    let (variables, warnings) = variables::to_structured(&dash.templating.list, options);

    let document = structured::Dashboard {
        annotations: dash.annotations.list.iter().map(annotation).collect(),
        cursor_sync: CursorSync::from_graph_tooltip(dash.graph_tooltip),
        description: dash.description.clone(),
        editable: dash.editable,
        elements: builder.elements,
        layout,
        links: dash.links.clone(),
        live_now: dash.live_now,
        preload: dash.preload,
        revision: dash.revision,
        tags: dash.tags.clone(),
        time_settings: time_settings(dash),
        title: dash.title.clone(),
        variables,
        extra: Map::new(),
    };
    tracing::debug!(
        elements = document.elements.len(),
        layout = document.layout.kind(),
        warnings = warnings.len(),
        "converted flat dashboard to structured"
    );
    Conversion { document, warnings }
}

struct ElementBuilder<'a> {
    options: &'a ConversionOptions,
    elements: BTreeMap<String, Element>,
    next_id: i64,
}

impl<'a> ElementBuilder<'a> {
    fn new(panels: &[Panel], options: &'a ConversionOptions) -> Self {
        let max_id = panels
            .iter()
            .flat_map(|p| std::iter::once(p).chain(p.panels.iter().flatten()))
            .filter_map(|p| p.id)
            .max()
            .unwrap_or(0);
        ElementBuilder {
            options,
            elements: BTreeMap::new(),
            next_id: max_id + 1,
        }
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn layout(&mut self, panels: &[Panel]) -> Layout {
        let Some(first_row) = panels.iter().position(Panel::is_row) else {
            return Layout::grid(self.items(panels, 0));
        };

        let mut rows = vec![];
        let leading = &panels[..first_row];
        if !leading.is_empty() {
            rows.push(RowsLayoutRowSpec {
                title: Some(String::new()),
                collapse: Some(false),
                hide_header: Some(true),
                layout: Box::new(Layout::grid(self.items(leading, 0))),
                ..RowsLayoutRowSpec::default()
            });
        }

        let mut rest = &panels[first_row..];
        while let Some((row, tail)) = rest.split_first() {
            let end = tail.iter().position(Panel::is_row).unwrap_or(tail.len());
            let (following, next) = tail.split_at(end);
            let items = if row.is_collapsed() {
                self.items(row.panels.as_deref().unwrap_or_default(), 0)
            } else {
                self.items(following, -(row.y() + 1))
            };
            rows.push(RowsLayoutRowSpec {
                title: Some(row.title.clone()),
                collapse: Some(row.is_collapsed()),
                repeat: row
                    .repeat
                    .as_deref()
                    .filter(|r| !r.is_empty())
                    .map(VariableRepeat::variable),
                layout: Box::new(Layout::grid(items)),
                ..RowsLayoutRowSpec::default()
            });
            rest = next;
        }

        Layout::rows(rows)
    }

    /// Registers each panel as an element and returns its grid items, moved
    /// vertically by `dy`.
    fn items(&mut self, panels: &[Panel], dy: i64) -> Vec<GridLayoutItemSpec> {
        panels
            .iter()
            .filter(|p| !p.is_row())
            .map(|panel| {
                let id = match panel.id {
                    Some(id) if !self.elements.contains_key(&element_key(id)) => id,
                    Some(id) => {
                        let fresh = self.allocate_id();
                        tracing::warn!(
                            id,
                            fresh,
                            title = %panel.title,
                            "duplicate panel id; assigning a fresh one"
                        );
                        fresh
                    }
                    None => self.allocate_id(),
                };
                let key = element_key(id);
                let element = self.element(panel, id);
                self.elements.insert(key.clone(), element);

                let pos = panel.grid_pos.unwrap_or_else(GridPos::panel_default);
                GridLayoutItemSpec {
                    x: pos.x,
                    y: pos.y + dy,
                    width: pos.w,
                    height: pos.h,
                    element: ElementReference::new(key),
                    repeat: repeat_options(panel),
                }
            })
            .collect()
    }

    fn element(&self, panel: &Panel, id: i64) -> Element {
        if let Some(library_panel) = &panel.library_panel {
            return Element::LibraryPanel(LibraryPanelSpec {
                id,
                title: panel.title.clone(),
                library_panel: library_panel.clone(),
            });
        }

        Element::Panel(PanelSpec {
            id,
            title: panel.title.clone(),
            description: panel.description.clone().unwrap_or_default(),
            links: panel.links.clone(),
            data: QueryGroupKind::QueryGroup(QueryGroupSpec {
                queries: self.queries(panel),
                transformations: panel
                    .transformations
                    .iter()
                    .map(|t| TransformationKind {
                        kind: t.id.clone(),
                        spec: t.clone(),
                    })
                    .collect(),
                query_options: query_options(panel),
            }),
            viz_config: VizConfigKind {
                kind: panel.panel_type.clone(),
                spec: VizConfigSpec {
                    plugin_version: panel.plugin_version.clone().unwrap_or_default(),
                    options: panel.options.clone().unwrap_or_default(),
                    field_config: panel.field_config.clone().unwrap_or_else(default_field_config),
                },
            },
            transparent: panel.transparent.then_some(true),
        })
    }

    fn queries(&self, panel: &Panel) -> Vec<PanelQueryKind> {
        let used: HashSet<&str> = panel
            .targets
            .iter()
            .filter_map(|t| t.get("refId").and_then(Value::as_str))
            .collect();
        let mut free_ref_ids = (0..).map(ref_id).filter(|id| !used.contains(id.as_str()));

        panel
            .targets
            .iter()
            .map(|target| {
                let mut spec = target.clone();
                let ref_id = match spec.remove("refId") {
                    Some(Value::String(id)) if !id.is_empty() => id,
                    _ => free_ref_ids.next().unwrap_or_default(),
                };
                let hidden = spec.remove("hide").and_then(|v| v.as_bool()).unwrap_or(false);
                let target_ds = spec
                    .remove("datasource")
                    .and_then(|v| deserialize_loose_ref(v).ok().flatten());

                let datasource = self.resolve_datasource(target_ds, panel.datasource.as_ref());
                PanelQueryKind::PanelQuery(PanelQuerySpec {
                    query: DataQueryKind {
                        kind: datasource.ds_type().to_owned(),
                        spec,
                    },
                    datasource: Some(datasource),
                    ref_id,
                    hidden,
                })
            })
            .collect()
    }

    fn resolve_datasource(
        &self,
        target_ds: Option<DataSourceRef>,
        panel_ds: Option<&DataSourceRef>,
    ) -> DataSourceRef {
        let ds = target_ds
            .filter(|ds| !ds.is_empty())
            .or_else(|| panel_ds.filter(|ds| ds.is_concrete()).cloned())
            .unwrap_or_else(|| self.options.default_datasource_ref());
        self.options.registry.complete(&ds)
    }
}

/// The `n`th query ref id: A..Z, then AA, AB and so on.
fn ref_id(n: usize) -> String {
    let mut letters = vec![];
    let mut n = n;
    loop {
        letters.push(char::from(b'A' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn repeat_options(panel: &Panel) -> Option<RepeatOptions> {
    let value = panel.repeat.as_deref().filter(|r| !r.is_empty())?;
    let direction = match panel.repeat_direction.as_deref() {
        Some("h") => Some(RepeatDirection::Horizontal),
        Some("v") => Some(RepeatDirection::Vertical),
        _ => None,
    };
    Some(RepeatOptions {
        mode: REPEAT_MODE_VARIABLE.to_string(),
        value: value.to_owned(),
        direction,
        max_per_row: panel.max_per_row.filter(|n| *n > 0),
    })
}

fn query_options(panel: &Panel) -> QueryOptionsSpec {
    QueryOptionsSpec {
        time_from: panel.time_from.clone(),
        max_data_points: panel.max_data_points.filter(|n| *n > 0),
        time_shift: panel.time_shift.clone(),
        query_caching_ttl: panel.query_caching_ttl,
        interval: panel.interval.clone(),
        cache_timeout: panel.cache_timeout.clone(),
        hide_time_override: panel.hide_time_override,
    }
}

fn annotation(ann: &flat::Annotation) -> AnnotationQueryKind {
    let ds_type = ann.datasource.as_ref().map_or("", |ds| ds.ds_type());
    let mut legacy_options: Map<String, Value> = ann.extra.clone();
    if let Some(annotation_type) = &ann.annotation_type {
        legacy_options.insert("type".to_owned(), Value::String(annotation_type.clone()));
    }

    AnnotationQueryKind::AnnotationQuery(AnnotationQuerySpec {
        datasource: ann
            .datasource
            .clone()
            .filter(|ds| !ds.uid().is_empty() && !ds.ds_type().is_empty()),
        query: Some(DataQueryKind {
            kind: ds_type.to_owned(),
            spec: ann.target.clone().unwrap_or_default(),
        }),
        enable: ann.enable,
        hide: ann.hide,
        icon_color: ann.icon_color.clone(),
        name: ann.name.clone(),
        built_in: ann.built_in,
        filter: ann.filter.clone(),
        legacy_options: (!legacy_options.is_empty()).then_some(legacy_options),
    })
}

fn time_settings(dash: &flat::Dashboard) -> TimeSettings {
    let defaults = TimeSettings::default();
    let time = dash.time.clone().unwrap_or_default();
    let picker = dash.timepicker.clone().unwrap_or_default();
    TimeSettings {
        timezone: dash.timezone.clone().or(defaults.timezone),
        from: time.from,
        to: time.to,
        auto_refresh: dash.refresh.clone().unwrap_or_default(),
        auto_refresh_intervals: picker
            .refresh_intervals
            .filter(|intervals| !intervals.is_empty())
            .unwrap_or(defaults.auto_refresh_intervals),
        quick_ranges: picker.quick_ranges,
        hide_timepicker: picker.hidden.unwrap_or(false),
        week_start: dash.week_start.clone(),
        fiscal_year_start_month: dash.fiscal_year_start_month.unwrap_or(0),
        now_delay: picker.now_delay,
    }
}
