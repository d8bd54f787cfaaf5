// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Conversion between the flat dashboard format, where rows are panels in
//! one ordered list, and the structured format, where panels live in an
//! element map arranged by a layout tree.

#![forbid(unsafe_code)]

mod backward;
pub mod common;
pub mod config;
pub mod datasource;
mod dispatch;
pub mod flat;
mod forward;
pub mod grid;
pub mod layout;
pub mod model;
pub mod structured;
pub mod variables;

pub use self::common::{Conversion, ConversionWarning, Error, Result};
pub use self::config::ConversionOptions;
pub use self::datasource::{DataSourceRef, DatasourceRegistry, resolve_default_datasource};
pub use self::dispatch::{
    Document, Generation, convert_value, detect_generation, to_flat, to_structured,
};
pub use self::grid::GridMetrics;
