// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Flat -> structured -> flat round trips.
//!
//! Row panels are rebuilt from the layout, so only content panels are
//! expected to survive with their identity intact.

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::{Value, json};

use dashboard_schema::flat::{self, Panel};
use dashboard_schema::{ConversionOptions, Document, Generation, convert_value, to_flat, to_structured};

fn options() -> ConversionOptions {
    serde_json::from_value(json!({
        "registry": [{"name": "Prometheus", "uid": "prom-uid", "type": "prometheus", "isDefault": true}]
    }))
    .unwrap()
}

fn roundtrip(doc: Value) -> flat::Dashboard {
    let options = options();
    let structured = to_structured(Document::from_value(doc).unwrap(), &options).unwrap();
    let flat = to_flat(Document::Structured(structured.document), &options).unwrap();
    flat.document
}

/// (id, title) of every non-row panel, including those inside collapsed rows.
fn content_panels(panels: &[Panel]) -> BTreeSet<(i64, String)> {
    let mut found = BTreeSet::new();
    for panel in panels {
        if panel.is_row() {
            found.extend(content_panels(panel.panels.as_deref().unwrap_or_default()));
        } else {
            found.insert((panel.id.unwrap_or(-1), panel.title.clone()));
        }
    }
    found
}

fn sample_dashboard() -> Value {
    json!({
        "title": "Service overview",
        "uid": "svc",
        "graphTooltip": 2,
        "time": {"from": "now-24h", "to": "now"},
        "panels": [
            {"id": 1, "type": "stat", "title": "Requests", "gridPos": {"x": 0, "y": 0, "w": 12, "h": 4},
             "targets": [{"refId": "A", "expr": "sum(rate(http_requests_total[5m]))"}]},
            {"id": 2, "type": "stat", "title": "Errors", "gridPos": {"x": 12, "y": 0, "w": 12, "h": 4},
             "datasource": {"uid": "prom-uid", "type": "prometheus"},
             "targets": [{"expr": "sum(rate(http_errors_total[5m]))"}]},
            {"id": 3, "type": "row", "title": "Latency", "collapsed": false, "gridPos": {"x": 0, "y": 4, "w": 24, "h": 1}, "panels": []},
            {"id": 4, "type": "timeseries", "title": "p99", "gridPos": {"x": 0, "y": 5, "w": 24, "h": 8}},
            {"id": 5, "type": "row", "title": "Details", "collapsed": true, "gridPos": {"x": 0, "y": 13, "w": 24, "h": 1},
             "panels": [
                {"id": 6, "type": "table", "title": "Slow endpoints", "gridPos": {"x": 0, "y": 14, "w": 24, "h": 6}},
                {"id": 7, "title": "Shared", "libraryPanel": {"uid": "lib", "name": "Shared"}, "gridPos": {"x": 0, "y": 20, "w": 24, "h": 6}}
             ]}
        ],
        "templating": {"list": [
            {"type": "query", "name": "job", "query": "label_values(up, job)", "refresh": 1},
            {"type": "constant", "name": "region", "query": "eu", "hide": 2},
            {"type": "interval", "name": "step", "query": "1m,5m"}
        ]}
    })
}

#[test]
fn flat_identity() {
    let doc = sample_dashboard();
    let out = convert_value(doc.clone(), Generation::Flat, &options()).unwrap();
    assert!(out.warnings.is_empty());
    assert_eq!(out.document["uid"], "svc");

    let before: flat::Dashboard = serde_json::from_value(doc).unwrap();
    let after: flat::Dashboard = serde_json::from_value(out.document.clone()).unwrap();
    assert_eq!(after, before);

    let again = convert_value(out.document.clone(), Generation::Flat, &options()).unwrap();
    assert_eq!(again.document, out.document);
}

#[test]
fn structured_identity() {
    let once = convert_value(sample_dashboard(), Generation::Structured, &options()).unwrap();
    let twice = convert_value(once.document.clone(), Generation::Structured, &options()).unwrap();
    assert_eq!(twice.document, once.document);

    let flat_once = convert_value(once.document, Generation::Flat, &options()).unwrap();
    let flat_twice = convert_value(flat_once.document.clone(), Generation::Flat, &options()).unwrap();
    assert_eq!(flat_twice.document, flat_once.document);
}

#[test]
fn enveloped_structured_input_is_returned_verbatim() {
    let doc = json!({
        "apiVersion": "dashboard.grafana.app/v2beta1",
        "kind": "Dashboard",
        "metadata": {"name": "svc", "namespace": "default"},
        "spec": {
            "title": "Wrapped",
            "elements": {},
            "layout": {"kind": "GridLayout", "spec": {"items": []}},
            "futureSetting": {"enabled": true}
        }
    });
    let out = convert_value(doc.clone(), Generation::Structured, &options()).unwrap();
    assert!(out.warnings.is_empty());
    assert_eq!(out.document, doc);

    let flat = convert_value(doc, Generation::Flat, &options()).unwrap();
    assert_eq!(flat.document["title"], "Wrapped");
    assert_eq!(flat.document["panels"], json!([]));
}

#[test]
fn content_panels_survive() {
    let before: flat::Dashboard = serde_json::from_value(sample_dashboard()).unwrap();
    let after = roundtrip(sample_dashboard());
    assert_eq!(content_panels(&after.panels), content_panels(&before.panels));
    assert_eq!(after.content_panel_count(), before.content_panel_count());
}

#[test]
fn rows_keep_their_shape() {
    let after = roundtrip(sample_dashboard());
    let rows: Vec<&Panel> = after.panels.iter().filter(|p| p.is_row()).collect();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].title, "Latency");
    assert_eq!(rows[0].panels, Some(vec![]));
    assert_eq!(rows[0].y(), 4);

    assert_eq!(rows[1].title, "Details");
    assert!(rows[1].is_collapsed());
    let children: Vec<i64> = rows[1]
        .panels
        .iter()
        .flatten()
        .filter_map(|p| p.id)
        .collect();
    assert_eq!(children, vec![6, 7]);
    assert_eq!(rows[1].panels.as_ref().unwrap()[1].library_panel.as_ref().unwrap().uid, "lib");
}

#[test]
fn settings_and_variables_survive() {
    let after = roundtrip(sample_dashboard());
    assert_eq!(after.title, "Service overview");
    assert_eq!(after.graph_tooltip, 2);
    assert_eq!(after.time.as_ref().map(|t| t.from.as_str()), Some("now-24h"));

    let names: Vec<&str> = after.templating.list.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["job", "region", "step"]);
    assert_eq!(after.templating.list[0].query, Some(json!("label_values(up, job)")));
    assert_eq!(after.templating.list[0].refresh, Some(1));
    assert_eq!(after.templating.list[1].hide, 2);
    assert_eq!(after.templating.list[2].refresh, Some(2));
}

#[test]
fn targets_gain_ref_ids_and_datasources() {
    let after = roundtrip(sample_dashboard());
    let errors = after.panels.iter().find(|p| p.id == Some(2)).unwrap();
    assert_eq!(errors.targets[0]["refId"], "A");
    assert_eq!(errors.targets[0]["datasource"], json!({"type": "prometheus", "uid": "prom-uid"}));
    assert_eq!(errors.datasource.as_ref().map(|d| d.uid()), Some("prom-uid"));

    let requests = after.panels.iter().find(|p| p.id == Some(1)).unwrap();
    assert_eq!(requests.targets[0]["datasource"]["uid"], "prom-uid");
}

fn stat(id: i64, w: i64, h: i64, y: i64) -> Value {
    json!({"id": id, "type": "stat", "title": format!("Panel {id}"), "gridPos": {"x": 0, "y": y, "w": w, "h": h}})
}

fn row(id: i64, y: i64, collapsed: bool, children: Vec<Value>) -> Value {
    json!({"id": id, "type": "row", "title": format!("Row {id}"), "collapsed": collapsed,
           "gridPos": {"x": 0, "y": y, "w": 24, "h": 1}, "panels": children})
}

/// A flat dashboard built from leading panels followed by row sections.
/// Each section is (collapsed, panel sizes).
fn build_flat(leading: &[(i64, i64)], sections: &[(bool, Vec<(i64, i64)>)]) -> Value {
    let mut next_id = 1;
    let mut y = 0;
    let mut panels = vec![];

    for &(w, h) in leading {
        panels.push(stat(next_id, w, h, y));
        next_id += 1;
        y += h;
    }
    for (collapsed, sizes) in sections {
        let row_id = next_id;
        next_id += 1;
        let row_y = y;
        y += 1;
        let mut children = vec![];
        for &(w, h) in sizes {
            children.push(stat(next_id, w, h, y));
            next_id += 1;
            y += h;
        }
        if *collapsed {
            y = row_y + 1;
            panels.push(row(row_id, row_y, true, children));
        } else {
            panels.push(row(row_id, row_y, false, vec![]));
            panels.extend(children);
        }
    }
    json!({"title": "generated", "panels": panels})
}

proptest! {
    #[test]
    fn content_panel_count_is_preserved(
        leading in prop::collection::vec((1i64..=24, 1i64..=10), 0..4),
        sections in prop::collection::vec(
            (any::<bool>(), prop::collection::vec((1i64..=24, 1i64..=10), 0..4)),
            0..4,
        ),
    ) {
        let doc = build_flat(&leading, &sections);
        let before: flat::Dashboard = serde_json::from_value(doc.clone()).unwrap();
        let after = roundtrip(doc);
        prop_assert_eq!(content_panels(&after.panels), content_panels(&before.panels));

        let rows_before = before.panels.iter().filter(|p| p.is_row()).count();
        let rows_after = after.panels.iter().filter(|p| p.is_row()).count();
        prop_assert_eq!(rows_after, rows_before);
        for row in after.panels.iter().filter(|p| p.is_row() && !p.is_collapsed()) {
            prop_assert_eq!(row.panels.as_ref().map(Vec::len), Some(0));
        }
    }
}
