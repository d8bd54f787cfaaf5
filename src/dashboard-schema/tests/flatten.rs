// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Layout flattening and row synthesis through the public entry points.

use serde_json::{Value, json};

use dashboard_schema::flat::{self, Panel};
use dashboard_schema::grid::GridPos;
use dashboard_schema::{ConversionOptions, ConversionWarning, Error, Generation, convert_value};

fn to_flat(doc: Value) -> flat::Dashboard {
    let out = convert_value(doc, Generation::Flat, &ConversionOptions::default()).unwrap();
    serde_json::from_value(out.document).unwrap()
}

fn to_structured(doc: Value) -> Value {
    convert_value(doc, Generation::Structured, &ConversionOptions::default())
        .unwrap()
        .document
}

fn panel_element(id: i64) -> Value {
    json!({
        "kind": "Panel",
        "spec": {
            "id": id,
            "title": format!("Panel {id}"),
            "data": {"kind": "QueryGroup", "spec": {"queries": [], "transformations": [], "queryOptions": {}}},
            "vizConfig": {"kind": "timeseries", "spec": {"pluginVersion": "", "options": {}, "fieldConfig": {"defaults": {}, "overrides": []}}}
        }
    })
}

fn elements(ids: &[i64]) -> Value {
    let map: serde_json::Map<String, Value> = ids
        .iter()
        .map(|id| (format!("panel-{id}"), panel_element(*id)))
        .collect();
    Value::Object(map)
}

fn grid_item(id: i64, x: i64, y: i64, w: i64, h: i64) -> Value {
    json!({
        "kind": "GridLayoutItem",
        "spec": {"x": x, "y": y, "width": w, "height": h, "element": {"kind": "ElementReference", "name": format!("panel-{id}")}}
    })
}

fn grid(items: Vec<Value>) -> Value {
    json!({"kind": "GridLayout", "spec": {"items": items}})
}

fn row(title: &str, collapse: bool, hide_header: bool, layout: Value) -> Value {
    json!({
        "kind": "RowsLayoutRow",
        "spec": {"title": title, "collapse": collapse, "hideHeader": hide_header, "layout": layout}
    })
}

fn summary(panels: &[Panel]) -> Vec<(String, String, Option<GridPos>)> {
    panels
        .iter()
        .map(|p| (p.panel_type.clone(), p.title.clone(), p.grid_pos))
        .collect()
}

fn leading_panels_dashboard() -> Value {
    json!({
        "title": "Leading",
        "panels": [
            {"id": 1, "type": "stat", "title": "One", "gridPos": {"x": 0, "y": 0, "w": 12, "h": 8}},
            {"id": 2, "type": "stat", "title": "Two", "gridPos": {"x": 12, "y": 0, "w": 12, "h": 8}},
            {"id": 3, "type": "row", "title": "R", "collapsed": false, "gridPos": {"x": 0, "y": 8, "w": 24, "h": 1}, "panels": []},
            {"id": 4, "type": "stat", "title": "Three", "gridPos": {"x": 0, "y": 9, "w": 12, "h": 8}}
        ]
    })
}

#[test]
fn leading_panels_get_hidden_header_row() {
    let structured = to_structured(leading_panels_dashboard());
    let layout = &structured["layout"];
    assert_eq!(layout["kind"], "RowsLayout");

    let rows = layout["spec"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["spec"]["title"], "");
    assert_eq!(rows[0]["spec"]["hideHeader"], true);
    assert_eq!(rows[0]["spec"]["layout"]["spec"]["items"].as_array().unwrap().len(), 2);

    assert_eq!(rows[1]["spec"]["title"], "R");
    assert!(rows[1]["spec"].get("hideHeader").is_none());
    let items = rows[1]["spec"]["layout"]["spec"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["spec"]["y"], 0);
}

#[test]
fn hidden_header_roundtrip_restores_panels() {
    let original: flat::Dashboard = serde_json::from_value(leading_panels_dashboard()).unwrap();
    let flat = to_flat(to_structured(leading_panels_dashboard()));

    assert_eq!(summary(&flat.panels), summary(&original.panels));
    // content panels keep their ids; row ids are renumbered past the
    // largest element id
    let ids: Vec<Option<i64>> = flat.panels.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![Some(1), Some(2), Some(5), Some(4)]);
    assert_eq!(flat.panels[2].panels, Some(vec![]));
    assert_eq!(flat.panels[2].collapsed, Some(false));
}

#[test]
fn non_first_hidden_header_row_is_kept() {
    let doc = json!({
        "elements": elements(&[1, 2]),
        "layout": {"kind": "RowsLayout", "spec": {"rows": [
            row("First", false, false, grid(vec![grid_item(1, 0, 0, 24, 4)])),
            row("", false, true, grid(vec![grid_item(2, 0, 0, 24, 4)]))
        ]}}
    });
    let flat = to_flat(doc);
    let rows: Vec<&Panel> = flat.panels.iter().filter(|p| p.is_row()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].y(), 0);
    assert_eq!(rows[1].y(), 5);
    assert_eq!(flat.panels.last().map(Panel::y), Some(6));
}

#[test]
fn tabs_inside_row_become_rows() {
    let tabs = json!({"kind": "TabsLayout", "spec": {"tabs": [
        {"kind": "TabsLayoutTab", "spec": {"title": "Tab A", "layout": grid(vec![grid_item(1, 0, 0, 12, 6)])}},
        {"kind": "TabsLayoutTab", "spec": {"title": "Tab B", "layout": grid(vec![grid_item(2, 0, 0, 12, 6)])}}
    ]}});
    let doc = json!({
        "elements": elements(&[1, 2]),
        "layout": {"kind": "RowsLayout", "spec": {"rows": [row("Parent", false, false, tabs)]}}
    });
    let flat = to_flat(doc);

    let rows: Vec<&Panel> = flat.panels.iter().filter(|p| p.is_row()).collect();
    let titles: Vec<&str> = rows.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Parent", "Tab A", "Tab B"]);
    assert!(rows.iter().all(|p| p.panels == Some(vec![])));

    let parent_y = rows[0].y();
    assert_eq!(rows[1].y(), parent_y + 1);
    assert_eq!(rows[2].y(), parent_y + 1 + 1 + 6);

    assert_eq!(
        summary(&flat.panels),
        vec![
            ("row".to_string(), "Parent".to_string(), Some(GridPos::new(0, 0, 24, 1))),
            ("row".to_string(), "Tab A".to_string(), Some(GridPos::new(0, 1, 24, 1))),
            ("timeseries".to_string(), "Panel 1".to_string(), Some(GridPos::new(0, 2, 12, 6))),
            ("row".to_string(), "Tab B".to_string(), Some(GridPos::new(0, 8, 24, 1))),
            ("timeseries".to_string(), "Panel 2".to_string(), Some(GridPos::new(0, 9, 12, 6))),
        ]
    );
    let row_ids: Vec<Option<i64>> = rows.iter().map(|p| p.id).collect();
    assert_eq!(row_ids, vec![Some(3), Some(4), Some(5)]);
}

fn auto_grid(extra: Value, count: i64) -> Value {
    let items: Vec<Value> = (1..=count)
        .map(|id| json!({"kind": "AutoGridLayoutItem", "spec": {"element": {"kind": "ElementReference", "name": format!("panel-{id}")}}}))
        .collect();
    let mut spec = json!({"items": items});
    if let (Some(spec), Some(extra)) = (spec.as_object_mut(), extra.as_object()) {
        spec.extend(extra.clone());
    }
    let ids: Vec<i64> = (1..=count).collect();
    json!({"elements": elements(&ids), "layout": {"kind": "AutoGridLayout", "spec": spec}})
}

#[test]
fn auto_grid_sizes() {
    let cases = [
        (json!({"maxColumnCount": 3, "rowHeightMode": "standard"}), 8, 9),
        (json!({"rowHeightMode": "short"}), 8, 5),
        (json!({"maxColumnCount": 4, "rowHeightMode": "tall"}), 6, 14),
        (json!({"maxColumnCount": 2, "rowHeightMode": "custom", "rowHeight": 250}), 12, 7),
        (json!({"maxColumnCount": 5}), 4, 9),
    ];
    for (spec, width, height) in cases {
        let flat = to_flat(auto_grid(spec.clone(), 1));
        let pos = flat.panels[0].grid_pos.unwrap();
        assert_eq!((pos.w, pos.h), (width, height), "for {spec}");
    }
}

#[test]
fn auto_grid_wraps_rows() {
    let flat = to_flat(auto_grid(json!({"maxColumnCount": 2, "rowHeightMode": "short"}), 3));
    let positions: Vec<GridPos> = flat.panels.iter().filter_map(|p| p.grid_pos).collect();
    assert_eq!(
        positions,
        vec![GridPos::new(0, 0, 12, 5), GridPos::new(12, 0, 12, 5), GridPos::new(0, 5, 12, 5)]
    );
}

#[test]
fn auto_grid_lines_hold_at_most_max_column_count() {
    let flat = to_flat(auto_grid(json!({"maxColumnCount": 5}), 6));
    let positions: Vec<(i64, i64, i64)> = flat
        .panels
        .iter()
        .filter_map(|p| p.grid_pos.map(|pos| (pos.x, pos.y, pos.w)))
        .collect();
    assert_eq!(
        positions,
        vec![(0, 0, 4), (4, 0, 4), (8, 0, 4), (12, 0, 4), (16, 0, 4), (0, 9, 4)]
    );
}

#[test]
fn dangling_reference_is_fatal() {
    let doc = json!({
        "elements": elements(&[1]),
        "layout": grid(vec![grid_item(1, 0, 0, 6, 3), grid_item(8, 6, 0, 6, 3)])
    });
    let err = convert_value(doc, Generation::Flat, &ConversionOptions::default()).unwrap_err();
    assert_eq!(
        err,
        Error::DanglingElementReference {
            name: "panel-8".to_string(),
            path: "layout.spec.items[1]".to_string(),
        }
    );
}

#[test]
fn unknown_layout_kind_is_fatal() {
    let doc = json!({
        "elements": {},
        "layout": {"kind": "MasonryLayout", "spec": {}}
    });
    let err = convert_value(doc, Generation::Flat, &ConversionOptions::default()).unwrap_err();
    assert!(matches!(err, Error::UnknownLayoutKind { ref kind, .. } if kind == "MasonryLayout"));
}

#[test]
fn unsupported_variable_is_skipped_with_warning() {
    let doc = json!({
        "panels": [],
        "templating": {"list": [
            {"type": "custom", "name": "env", "query": "dev,prod"},
            {"type": "switch", "name": "debug"}
        ]}
    });
    let out = convert_value(doc, Generation::Structured, &ConversionOptions::default()).unwrap();
    assert_eq!(
        out.warnings,
        vec![ConversionWarning::UnsupportedVariableKind {
            name: "debug".to_string(),
            kind: "switch".to_string(),
        }]
    );
    let variables = out.document["variables"].as_array().unwrap();
    assert_eq!(variables.len(), 1);
    assert_eq!(variables[0]["kind"], "CustomVariable");
}
