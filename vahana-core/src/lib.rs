//! # Vahana Core
//!
//! Core library for comparing vehicles side by side.
//! Provides the selection store (a bounded, observable list of vehicles chosen
//! for comparison), the comparison matrix builder, value formatting, renderers,
//! the vehicle catalog, and configuration.

pub mod catalog;
pub mod config;
pub mod error;
pub mod facts;
pub mod format;
pub mod matrix;
pub mod notify;
pub mod render;
pub mod selection;
pub mod types;

// Re-export commonly used types at the crate root.
pub use catalog::Catalog;
pub use config::{VahanaConfig, load_config};
pub use error::{CatalogError, ConfigError, NotifyError, Result, VahanaError};
pub use facts::{FactRow, FactRowConfig, RowFormat, default_fact_rows, resolve_path};
pub use format::{CurrencyConfig, DigitGrouping, EM_DASH, format_currency, format_mileage, to_number};
pub use matrix::{
    Cell, Column, ComparisonMatrix, MatrixBuilder, MatrixRow, SortKey, VehicleColumn, ViewOptions,
};
pub use notify::{
    NoOpSink, Notification, NotificationSink, RecordingSink, Severity, TracingSink,
};
pub use render::{render_html, render_text};
pub use selection::{AddOutcome, SelectionStore};
pub use types::{FieldValue, Price, Specifications, Vehicle};
