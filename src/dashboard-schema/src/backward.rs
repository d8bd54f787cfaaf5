// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Structured to flat conversion.
//!
//! Each layout node is flattened in its own coordinate space, with y
//! starting at 0, and the caller moves the result into place with
//! [`shift_y`]. The running y cursor is threaded through explicitly; the
//! row-id allocator is the only state the flattener owns.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::common::{Error, Result};
use crate::config::ConversionOptions;
use crate::datasource::{DASHBOARD_DATASOURCE_TYPE, DASHBOARD_DATASOURCE_UID, DataSourceRef};
use crate::flat::{self, Panel, TimePicker, TimeRange};
use crate::grid::{
    DEFAULT_MAX_COLUMN_COUNT, GridMetrics, GridPos, auto_grid_height, auto_grid_width, bottom_edge,
    pack_left_to_right, row_header_units, shift_y,
};
use crate::layout::{
    AutoGridLayoutItemKind, AutoGridLayoutSpec, GridLayoutItemKind, GridLayoutSpec, Layout,
    RowsLayoutRowKind, RowsLayoutSpec, TabsLayoutTabKind, TabsLayoutSpec, VariableRepeat,
};
use crate::structured::{
    self, AnnotationQueryKind, DEFAULT_AUTO_REFRESH_INTERVALS, Element, LEGACY_STRING_VALUE_KEY,
    PanelQueryKind, PanelQuerySpec, PanelSpec, QueryGroupKind,
};
use crate::variables;

/// Converts a structured dashboard into the flat model.
pub fn convert(dash: &structured::Dashboard, options: &ConversionOptions) -> Result<flat::Dashboard> {
    tracing::debug!(
        elements = dash.elements.len(),
        layout = dash.layout.kind(),
        "converting structured dashboard to flat"
    );
    let mut flattener = Flattener::new(&dash.elements, &options.metrics);
    let panels = match &dash.layout {
        Layout::RowsLayout(rows) => flattener.rows(rows, "layout", true)?,
        layout => flattener.layout(layout, "layout")?,
    };
    tracing::debug!(
        panels = panels.len(),
        rows = panels.iter().filter(|p| p.is_row()).count(),
        "converted structured dashboard to flat"
    );

    let settings = &dash.time_settings;
    Ok(flat::Dashboard {
        title: dash.title.clone(),
        description: dash.description.clone(),
        tags: dash.tags.clone(),
        editable: dash.editable,
        graph_tooltip: dash.cursor_sync.graph_tooltip(),
        preload: dash.preload,
        live_now: dash.live_now,
        revision: dash.revision,
        time: Some(TimeRange {
            from: settings.from.clone(),
            to: settings.to.clone(),
        }),
        timepicker: timepicker(settings),
        timezone: settings.timezone.clone(),
        refresh: Some(settings.auto_refresh.clone()),
        fiscal_year_start_month: Some(settings.fiscal_year_start_month),
        week_start: settings.week_start.clone(),
        links: dash.links.clone(),
        panels,
        templating: flat::Templating {
            list: variables::to_flat(&dash.variables),
        },
        annotations: flat::Annotations {
            list: dash.annotations.iter().map(annotation).collect(),
        },
        extra: Map::new(),
    })
}

struct Flattener<'a> {
    elements: &'a BTreeMap<String, Element>,
    metrics: &'a GridMetrics,
    next_row_id: i64,
}

impl<'a> Flattener<'a> {
    fn new(elements: &'a BTreeMap<String, Element>, metrics: &'a GridMetrics) -> Self {
        let max_id = elements.values().map(Element::id).max().unwrap_or(0);
        Flattener {
            elements,
            metrics,
            next_row_id: max_id + 1,
        }
    }

    fn allocate_row_id(&mut self) -> i64 {
        let id = self.next_row_id;
        self.next_row_id += 1;
        id
    }

    fn layout(&mut self, layout: &Layout, path: &str) -> Result<Vec<Panel>> {
        match layout {
            Layout::GridLayout(grid) => self.grid(grid, path),
            Layout::AutoGridLayout(auto) => self.auto_grid(auto, path),
            Layout::RowsLayout(rows) => self.rows(rows, path, false),
            Layout::TabsLayout(tabs) => self.tabs(tabs, path),
        }
    }

    fn grid(&self, grid: &GridLayoutSpec, path: &str) -> Result<Vec<Panel>> {
        let mut panels = Vec::with_capacity(grid.items.len());
        for (i, GridLayoutItemKind::GridLayoutItem(item)) in grid.items.iter().enumerate() {
            let mut panel = self.panel(&item.element.name, &format!("{path}.spec.items[{i}]"))?;
            panel.grid_pos = Some(GridPos::new(item.x, item.y, item.width, item.height));
            if let Some(repeat) = &item.repeat {
                panel.repeat = Some(repeat.value.clone());
                panel.repeat_direction = repeat.direction.map(|d| d.as_str().to_owned());
                panel.max_per_row = repeat.max_per_row;
            }
            panels.push(panel);
        }
        Ok(panels)
    }

    fn auto_grid(&self, auto: &AutoGridLayoutSpec, path: &str) -> Result<Vec<Panel>> {
        let columns = match auto.max_column_count {
            Some(n) if n > 0 => n,
            _ => DEFAULT_MAX_COLUMN_COUNT,
        };
        let width = auto_grid_width(Some(columns));
        let height = auto_grid_height(auto.row_height_mode, auto.row_height, self.metrics);
        let positions = pack_left_to_right(auto.items.len(), columns, width, height);

        let mut panels = Vec::with_capacity(auto.items.len());
        for (i, (AutoGridLayoutItemKind::AutoGridLayoutItem(item), pos)) in
            auto.items.iter().zip(positions).enumerate()
        {
            let mut panel = self.panel(&item.element.name, &format!("{path}.spec.items[{i}]"))?;
            panel.grid_pos = Some(pos);
            if let Some(repeat) = &item.repeat {
                panel.repeat = Some(repeat.value.clone());
                panel.repeat_direction = Some("h".to_owned());
                panel.max_per_row = Some(columns);
            }
            panels.push(panel);
        }
        Ok(panels)
    }

    /// Flattens a rows layout. In the outermost rows layout a leading row
    /// with no title and a hidden header is dropped and its children are
    /// emitted in its place.
    fn rows(&mut self, rows: &RowsLayoutSpec, path: &str, outermost: bool) -> Result<Vec<Panel>> {
        let mut panels = vec![];
        let mut cursor = 0;
        for (i, RowsLayoutRowKind::RowsLayoutRow(row)) in rows.rows.iter().enumerate() {
            let layout_path = format!("{path}.spec.rows[{i}].spec.layout");
            if outermost && i == 0 && row.title().is_empty() && row.hides_header() {
                let children = shift_y(&self.layout(&row.layout, &layout_path)?, cursor);
                cursor = bottom_edge(&children).unwrap_or(cursor);
                panels.extend(children);
                continue;
            }

            let id = self.allocate_row_id();
            let children = self.layout(&row.layout, &layout_path)?;
            let header = RowHeader {
                id,
                title: row.title(),
                repeat: row.repeat.as_ref(),
            };
            cursor = if row.is_collapsed() {
                emit_collapsed(&mut panels, header, children, cursor)
            } else {
                emit_expanded(&mut panels, header, children, cursor)
            };
        }
        Ok(panels)
    }

    /// Tabs have no flat counterpart; each becomes an expanded row.
    fn tabs(&mut self, tabs: &TabsLayoutSpec, path: &str) -> Result<Vec<Panel>> {
        let mut panels = vec![];
        let mut cursor = 0;
        for (i, TabsLayoutTabKind::TabsLayoutTab(tab)) in tabs.tabs.iter().enumerate() {
            let id = self.allocate_row_id();
            let children = self.layout(&tab.layout, &format!("{path}.spec.tabs[{i}].spec.layout"))?;
            let header = RowHeader {
                id,
                title: tab.title.as_deref().unwrap_or(""),
                repeat: tab.repeat.as_ref(),
            };
            cursor = emit_expanded(&mut panels, header, children, cursor);
        }
        Ok(panels)
    }

    fn panel(&self, name: &str, path: &str) -> Result<Panel> {
        match self.elements.get(name) {
            Some(element) => element_to_panel(element),
            None => Err(Error::DanglingElementReference {
                name: name.to_owned(),
                path: path.to_owned(),
            }),
        }
    }
}

struct RowHeader<'a> {
    id: i64,
    title: &'a str,
    repeat: Option<&'a VariableRepeat>,
}

impl RowHeader<'_> {
    fn panel(&self, collapsed: bool, y: i64) -> Panel {
        let mut row = Panel::row(self.id, self.title, collapsed, y);
        row.repeat = self.repeat.map(|r| r.value.clone());
        row
    }
}

/// Emits a collapsed row at `cursor` holding `children` unshifted, and
/// returns the cursor below the row header.
fn emit_collapsed(out: &mut Vec<Panel>, header: RowHeader, children: Vec<Panel>, cursor: i64) -> i64 {
    let mut row = header.panel(true, cursor);
    row.panels = Some(inline_rows(children));
    out.push(row);
    cursor + row_header_units()
}

/// Emits an expanded row at `cursor` followed by its children, and returns
/// the cursor below the last child.
fn emit_expanded(out: &mut Vec<Panel>, header: RowHeader, children: Vec<Panel>, cursor: i64) -> i64 {
    out.push(header.panel(false, cursor));
    let body_top = cursor + row_header_units();
    let children = shift_y(&children, body_top);
    let bottom = bottom_edge(&children).unwrap_or(body_top);
    out.extend(children);
    body_top.max(bottom)
}

/// Flat rows cannot nest: row panels inside a collapsed row are replaced by
/// their own children.
fn inline_rows(children: Vec<Panel>) -> Vec<Panel> {
    let mut panels = Vec::with_capacity(children.len());
    for child in children {
        if child.is_row() {
            panels.extend(child.panels.unwrap_or_default());
        } else {
            panels.push(child);
        }
    }
    panels
}

fn element_to_panel(element: &Element) -> Result<Panel> {
    match element {
        Element::Panel(spec) => panel_from_spec(spec),
        Element::LibraryPanel(lib) => Ok(Panel {
            id: Some(lib.id),
            title: lib.title.clone(),
            library_panel: Some(lib.library_panel.clone()),
            ..Panel::default()
        }),
    }
}

fn panel_from_spec(spec: &PanelSpec) -> Result<Panel> {
    let QueryGroupKind::QueryGroup(data) = &spec.data;
    let queries: Vec<&PanelQuerySpec> = data
        .queries
        .iter()
        .map(|PanelQueryKind::PanelQuery(q)| q)
        .collect();
    let targets = queries
        .iter()
        .map(|q| target(q))
        .collect::<Result<Vec<_>>>()?;
    let viz = &spec.viz_config;
    let query_options = &data.query_options;

    Ok(Panel {
        id: Some(spec.id),
        panel_type: viz.kind.clone(),
        title: spec.title.clone(),
        description: Some(spec.description.clone()).filter(|d| !d.is_empty()),
        datasource: panel_datasource(&queries),
        targets,
        transformations: data
            .transformations
            .iter()
            .map(|t| {
                let mut config = t.spec.clone();
                if config.id.is_empty() {
                    config.id = t.kind.clone();
                }
                config
            })
            .collect(),
        field_config: Some(viz.spec.field_config.clone()),
        options: Some(viz.spec.options.clone()),
        plugin_version: Some(viz.spec.plugin_version.clone()).filter(|v| !v.is_empty()),
        links: spec.links.clone(),
        transparent: spec.transparent.unwrap_or(false),
        cache_timeout: query_options.cache_timeout.clone(),
        max_data_points: query_options.max_data_points,
        interval: query_options.interval.clone(),
        hide_time_override: query_options.hide_time_override,
        query_caching_ttl: query_options.query_caching_ttl,
        time_from: query_options.time_from.clone(),
        time_shift: query_options.time_shift.clone(),
        ..Panel::default()
    })
}

/// The datasource a query runs against as written in the document: its
/// own reference when that names a uid, otherwise just the query type.
fn query_datasource(query: &PanelQuerySpec) -> DataSourceRef {
    match &query.datasource {
        Some(ds) if !ds.uid().is_empty() => {
            let mut ds = ds.clone();
            if ds.ds_type().is_empty() && !query.query.kind.is_empty() {
                ds.ds_type = Some(query.query.kind.clone());
            }
            ds
        }
        _ => DataSourceRef::of_type(&query.query.kind),
    }
}

fn target(query: &PanelQuerySpec) -> Result<Map<String, Value>> {
    let mut target = Map::new();
    for (key, value) in &query.query.spec {
        if key == LEGACY_STRING_VALUE_KEY {
            if let Value::String(s) = value {
                target.insert("query".to_owned(), Value::String(s.clone()));
            }
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
    target.insert("refId".to_owned(), Value::String(query.ref_id.clone()));
    if query.hidden {
        target.insert("hide".to_owned(), Value::Bool(true));
    }
    let datasource = query_datasource(query);
    if !datasource.is_empty() {
        target.insert("datasource".to_owned(), serde_json::to_value(datasource)?);
    }
    Ok(target)
}

/// The panel-level datasource: the one all queries share, or the mixed
/// datasource when they differ.
fn panel_datasource(queries: &[&PanelQuerySpec]) -> Option<DataSourceRef> {
    let dashboard_queries = queries
        .iter()
        .filter(|q| q.datasource.as_ref().is_some_and(|ds| ds.uid() == DASHBOARD_DATASOURCE_UID))
        .count();
    if dashboard_queries > 1 {
        return Some(DataSourceRef::mixed());
    }

    let mut refs = queries.iter().map(|q| query_datasource(q));
    let first = refs.next()?;
    if refs.any(|ds| ds.uid() != first.uid() || ds.ds_type() != first.ds_type()) {
        return Some(DataSourceRef::mixed());
    }
    if first.uid() == DASHBOARD_DATASOURCE_UID {
        return Some(DataSourceRef::new(DASHBOARD_DATASOURCE_UID, DASHBOARD_DATASOURCE_TYPE));
    }
    (!first.is_empty()).then_some(first)
}

fn annotation(kind: &AnnotationQueryKind) -> flat::Annotation {
    let AnnotationQueryKind::AnnotationQuery(spec) = kind;
    let mut extra = spec.legacy_options.clone().unwrap_or_default();
    let annotation_type = match extra.remove("type") {
        Some(Value::String(t)) => Some(t),
        _ if spec.built_in => Some("dashboard".to_owned()),
        _ => None,
    };
    let query_kind = spec.query.as_ref().map_or("", |q| q.kind.as_str());
    let datasource = spec
        .datasource
        .clone()
        .or_else(|| (!query_kind.is_empty()).then(|| DataSourceRef::of_type(query_kind)));

    flat::Annotation {
        name: spec.name.clone(),
        datasource,
        enable: spec.enable,
        hide: spec.hide,
        icon_color: spec.icon_color.clone(),
        built_in: spec.built_in,
        annotation_type,
        target: spec
            .query
            .as_ref()
            .map(|q| q.spec.clone())
            .filter(|target| !target.is_empty()),
        filter: spec.filter.clone(),
        extra,
    }
}

/// Only the settings that differ from the picker defaults are written out.
fn timepicker(settings: &structured::TimeSettings) -> Option<TimePicker> {
    let intervals = &settings.auto_refresh_intervals;
    let default_intervals = intervals.is_empty()
        || intervals.iter().map(String::as_str).eq(DEFAULT_AUTO_REFRESH_INTERVALS);
    let picker = TimePicker {
        refresh_intervals: (!default_intervals).then(|| intervals.clone()),
        hidden: settings.hide_timepicker.then_some(true),
        now_delay: settings.now_delay.clone().filter(|d| !d.is_empty()),
        quick_ranges: settings.quick_ranges.clone(),
    };
    (!picker.is_empty()).then_some(picker)
}
