//! Fact rows: the declarative list of attributes shown in the comparison matrix.
//!
//! A row pairs a label with a way to read a raw [`FieldValue`] out of a vehicle
//! and an optional formatter. The built-in rows use typed accessor closures;
//! rows declared in configuration use dot-delimited paths such as
//! `specifications.power`, resolved against the vehicle's serialized form.
//! Either way, a path or field that does not exist yields `FieldValue::Absent`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::format::{CurrencyConfig, format_mileage};
use crate::types::{FieldValue, Vehicle};

/// Reads a raw value from a vehicle.
pub type Accessor = Arc<dyn Fn(&Vehicle) -> FieldValue + Send + Sync>;

/// Turns a raw value into display text. Receives the whole vehicle for context
/// (the mileage unit depends on the fuel type, for example).
pub type Formatter = Arc<dyn Fn(&FieldValue, &Vehicle) -> String + Send + Sync>;

#[derive(Clone)]
enum Source {
    Typed(Accessor),
    Path(String),
}

/// One comparable attribute.
#[derive(Clone)]
pub struct FactRow {
    key: String,
    label: String,
    source: Source,
    formatter: Option<Formatter>,
}

impl FactRow {
    /// A row backed by a typed accessor.
    pub fn new<F>(key: impl Into<String>, label: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Vehicle) -> FieldValue + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            label: label.into(),
            source: Source::Typed(Arc::new(accessor)),
            formatter: None,
        }
    }

    /// A row backed by a dot-delimited path; the path doubles as the row key.
    pub fn path(path: impl Into<String>, label: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            key: path.clone(),
            label: label.into(),
            source: Source::Path(path),
            formatter: None,
        }
    }

    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&FieldValue, &Vehicle) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Read this row's raw value from `vehicle`.
    pub fn extract(&self, vehicle: &Vehicle) -> FieldValue {
        match &self.source {
            Source::Typed(accessor) => accessor(vehicle),
            Source::Path(path) => resolve_path(vehicle, path),
        }
    }

    /// Display text for `raw`: the formatter's output if the row has one,
    /// otherwise the raw value itself with absent values shown as an em-dash.
    pub fn display(&self, raw: &FieldValue, vehicle: &Vehicle) -> String {
        match &self.formatter {
            Some(formatter) => formatter(raw, vehicle),
            None => raw.to_string(),
        }
    }
}

impl std::fmt::Debug for FactRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactRow")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("formatted", &self.formatter.is_some())
            .finish()
    }
}

/// Resolve a dot-delimited path against the vehicle's JSON form.
///
/// Keys are the serialized (camelCase) names, so `price.onRoad` and
/// `specifications.fuelType` work as written in catalog files. Numeric segments
/// index into arrays (`images.0`). Missing segments resolve to `Absent`.
pub fn resolve_path(vehicle: &Vehicle, path: &str) -> FieldValue {
    let Ok(root) = serde_json::to_value(vehicle) else {
        return FieldValue::Absent;
    };

    let mut current = &root;
    for segment in path.split('.') {
        let next = match current {
            serde_json::Value::Object(map) => map.get(segment),
            serde_json::Value::Array(items) => {
                segment.parse::<usize>().ok().and_then(|i| items.get(i))
            }
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return FieldValue::Absent,
        }
    }

    match current {
        serde_json::Value::Null => FieldValue::Absent,
        serde_json::Value::Number(n) => n.as_f64().map_or(FieldValue::Absent, FieldValue::Number),
        serde_json::Value::String(s) => FieldValue::Text(s.clone()),
        serde_json::Value::Bool(b) => FieldValue::Text(b.to_string()),
        other => FieldValue::Text(other.to_string()),
    }
}

/// Named formatter for rows declared in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowFormat {
    #[default]
    Plain,
    Currency,
    Mileage,
}

/// A fact row as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRowConfig {
    /// Dot-delimited path into the vehicle, e.g. `specifications.power`.
    pub path: String,
    pub label: String,
    #[serde(default)]
    pub format: RowFormat,
}

impl FactRowConfig {
    pub fn to_row(&self, currency: &CurrencyConfig) -> FactRow {
        let row = FactRow::path(self.path.clone(), self.label.clone());
        match self.format {
            RowFormat::Plain => row,
            RowFormat::Currency => with_currency(row, currency),
            RowFormat::Mileage => with_mileage(row),
        }
    }
}

/// Build rows from configuration, falling back to [`default_fact_rows`] when the
/// configured list is empty.
pub fn rows_from_config(rows: &[FactRowConfig], currency: &CurrencyConfig) -> Vec<FactRow> {
    if rows.is_empty() {
        default_fact_rows(currency)
    } else {
        rows.iter().map(|r| r.to_row(currency)).collect()
    }
}

fn with_currency(row: FactRow, currency: &CurrencyConfig) -> FactRow {
    let currency = currency.clone();
    row.with_formatter(move |raw, _| currency.format(raw))
}

fn with_mileage(row: FactRow) -> FactRow {
    row.with_formatter(|raw, vehicle| format_mileage(raw, vehicle.is_electric()))
}

/// Key facts first (price, mileage), then details.
pub fn default_fact_rows(currency: &CurrencyConfig) -> Vec<FactRow> {
    vec![
        with_currency(
            FactRow::new("price.onRoad", "On-road Price", |v| v.price.on_road.clone()),
            currency,
        ),
        with_mileage(FactRow::new("specifications.mileage", "Mileage", |v| {
            v.specifications.mileage.clone()
        })),
        FactRow::new("specifications.fuelType", "Fuel Type", |v| {
            v.specifications.fuel_type.clone().into()
        }),
        FactRow::new("specifications.transmission", "Transmission", |v| {
            v.specifications.transmission.clone().into()
        }),
        FactRow::new("category", "Category", |v| v.category.clone().into()),
        FactRow::new("year", "Model Year", |v| v.year.map(f64::from).into()),
        FactRow::new("specifications.engine", "Engine", |v| {
            v.specifications.engine.clone().into()
        }),
        FactRow::new("specifications.power", "Power", |v| {
            v.specifications.power.clone().into()
        }),
        FactRow::new("specifications.torque", "Torque", |v| {
            v.specifications.torque.clone().into()
        }),
        with_currency(
            FactRow::new("price.exShowroom", "Ex-showroom", |v| {
                v.price.ex_showroom.clone()
            }),
            currency,
        ),
    ]
}
