// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use serde::{Deserialize, Serialize};

use crate::datasource::{DataSourceRef, DatasourceRegistry, resolve_default_datasource};
use crate::grid::GridMetrics;

/// Read-only inputs to a conversion call.
///
/// Everything a converter would otherwise read from global configuration
/// is passed in here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionOptions {
    /// Snapshot of the configured datasources.
    pub registry: DatasourceRegistry,
    /// Name or uid of the datasource used when a query names none.
    pub default_datasource: Option<String>,
    pub metrics: GridMetrics,
}

impl ConversionOptions {
    pub fn new(registry: DatasourceRegistry, default_datasource: Option<String>) -> Self {
        ConversionOptions {
            registry,
            default_datasource,
            metrics: GridMetrics::default(),
        }
    }

    pub fn default_datasource_ref(&self) -> DataSourceRef {
        resolve_default_datasource(&self.registry, self.default_datasource.as_deref())
    }
}
