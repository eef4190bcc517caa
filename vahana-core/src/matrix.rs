//! Comparison matrix builder.
//!
//! Turns the current selection, a sort directive and the fact-row list into a
//! column-aligned display model:
//!
//! 1. keep the first `visual_max` vehicles and stable-sort them by the directive
//! 2. lay out one column per vehicle, padded with placeholders to `visual_max`
//! 3. for each fact row, extract and format a cell per vehicle and record whether
//!    every vehicle's raw value is the same
//! 4. with "differences only", drop the rows where all values agree
//!
//! The builder holds static configuration only. Every call to
//! [`MatrixBuilder::build`] recomputes from its inputs and never fails: absent
//! fields, bad paths and non-numeric prices all degrade to sentinels.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::trace;

use crate::facts::{FactRow, default_fact_rows};
use crate::format::{CurrencyConfig, EM_DASH, to_number};
use crate::types::{FieldValue, Vehicle};

/// Default number of display slots in the matrix.
pub const DEFAULT_VISUAL_MAX: usize = 5;

/// Shown in header cells for vehicles without a name.
const UNNAMED_VEHICLE: &str = "Unnamed Vehicle";

/// Column ordering directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    /// Keep selection (insertion) order.
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "price-asc")]
    PriceAscending,
    #[serde(rename = "price-desc")]
    PriceDescending,
    #[serde(rename = "mileage-desc")]
    MileageDescending,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::None,
        SortKey::PriceAscending,
        SortKey::PriceDescending,
        SortKey::MileageDescending,
    ];

    /// Human-readable description for menus.
    pub fn description(self) -> &'static str {
        match self {
            SortKey::None => "Selection order",
            SortKey::PriceAscending => "Price: Low → High",
            SortKey::PriceDescending => "Price: High → Low",
            SortKey::MileageDescending => "Mileage: High → Low",
        }
    }

    fn compare(self, a: &Vehicle, b: &Vehicle) -> Ordering {
        let on_road = |v: &Vehicle| to_number(&v.price.on_road, 0.0);
        let mileage = |v: &Vehicle| to_number(&v.specifications.mileage, 0.0);
        let ordering = match self {
            SortKey::None => None,
            SortKey::PriceAscending => on_road(a).partial_cmp(&on_road(b)),
            SortKey::PriceDescending => on_road(b).partial_cmp(&on_road(a)),
            SortKey::MileageDescending => mileage(b).partial_cmp(&mileage(a)),
        };
        ordering.unwrap_or(Ordering::Equal)
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::None => write!(f, "none"),
            SortKey::PriceAscending => write!(f, "price-asc"),
            SortKey::PriceDescending => write!(f, "price-desc"),
            SortKey::MileageDescending => write!(f, "mileage-desc"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(SortKey::None),
            "price-asc" | "price-low" | "pricelow" => Ok(SortKey::PriceAscending),
            "price-desc" | "price-high" | "pricehigh" => Ok(SortKey::PriceDescending),
            "mileage-desc" | "mileage" => Ok(SortKey::MileageDescending),
            other => Err(format!(
                "unknown sort key '{other}' (expected none, price-asc, price-desc or mileage-desc)"
            )),
        }
    }
}

/// Transient view parameters chosen by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOptions {
    pub sort: SortKey,
    /// Omit rows where every vehicle has the same value.
    pub diff_only: bool,
}

/// Header information for a real vehicle column.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleColumn {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub thumbnail: Option<String>,
    /// Formatted on-road price.
    pub price: String,
    #[serde(skip)]
    pub vehicle: Arc<Vehicle>,
}

/// One display slot.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Column {
    Vehicle(VehicleColumn),
    Placeholder,
}

impl Column {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Column::Placeholder)
    }

    pub fn vehicle(&self) -> Option<&Arc<Vehicle>> {
        match self {
            Column::Vehicle(col) => Some(&col.vehicle),
            Column::Placeholder => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
}

impl Cell {
    fn value(text: String) -> Self {
        Self {
            text,
            placeholder: false,
        }
    }

    fn placeholder() -> Self {
        Self {
            text: EM_DASH.to_string(),
            placeholder: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatrixRow {
    pub key: String,
    pub label: String,
    /// One cell per column, placeholders included.
    pub cells: Vec<Cell>,
    /// Whether every real vehicle has the same raw value for this row.
    pub all_equal: bool,
}

impl MatrixRow {
    pub fn differs(&self) -> bool {
        !self.all_equal
    }

    /// Display text of every cell, in column order.
    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }
}

/// The rendered comparison model.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonMatrix {
    pub columns: Vec<Column>,
    pub rows: Vec<MatrixRow>,
    pub view: ViewOptions,
    /// Number of real vehicle columns.
    pub vehicle_count: usize,
    pub visual_max: usize,
}

impl ComparisonMatrix {
    pub fn title(&self) -> String {
        format!(
            "Compare Vehicles ({}/{})",
            self.vehicle_count, self.visual_max
        )
    }

    pub fn is_empty(&self) -> bool {
        self.vehicle_count == 0
    }

    /// Vehicles in display order.
    pub fn vehicles(&self) -> Vec<&Arc<Vehicle>> {
        self.columns.iter().filter_map(Column::vehicle).collect()
    }

    pub fn row(&self, key: &str) -> Option<&MatrixRow> {
        self.rows.iter().find(|r| r.key == key)
    }
}

/// Stable-sort `vehicles` by `sort`. Values that are not numeric compare as 0.
pub fn sort_vehicles(vehicles: &[Arc<Vehicle>], sort: SortKey) -> Vec<Arc<Vehicle>> {
    let mut sorted = vehicles.to_vec();
    if sort != SortKey::None {
        sorted.sort_by(|a, b| sort.compare(a, b));
    }
    sorted
}

/// Builds comparison matrices from a fixed fact-row list.
#[derive(Debug, Clone)]
pub struct MatrixBuilder {
    rows: Vec<FactRow>,
    visual_max: usize,
    currency: CurrencyConfig,
}

impl MatrixBuilder {
    pub fn new(rows: Vec<FactRow>) -> Self {
        Self {
            rows,
            visual_max: DEFAULT_VISUAL_MAX,
            currency: CurrencyConfig::default(),
        }
    }

    pub fn with_visual_max(mut self, visual_max: usize) -> Self {
        self.visual_max = visual_max;
        self
    }

    /// Currency settings used for the column header prices.
    pub fn with_currency(mut self, currency: CurrencyConfig) -> Self {
        self.currency = currency;
        self
    }

    pub fn rows(&self) -> &[FactRow] {
        &self.rows
    }

    pub fn visual_max(&self) -> usize {
        self.visual_max
    }

    pub fn build(&self, vehicles: &[Arc<Vehicle>], view: ViewOptions) -> ComparisonMatrix {
        let shown = &vehicles[..vehicles.len().min(self.visual_max)];
        let sorted = sort_vehicles(shown, view.sort);
        let placeholders = self.visual_max - sorted.len();

        let mut columns: Vec<Column> = sorted
            .iter()
            .map(|v| Column::Vehicle(self.vehicle_column(v)))
            .collect();
        columns.extend(std::iter::repeat_with(|| Column::Placeholder).take(placeholders));

        let rows: Vec<MatrixRow> = self
            .rows
            .iter()
            .map(|row| build_row(row, &sorted, placeholders))
            .filter(|row| !(view.diff_only && row.all_equal))
            .collect();

        trace!(
            vehicles = sorted.len(),
            dropped = vehicles.len() - shown.len(),
            rows = rows.len(),
            sort = %view.sort,
            diff_only = view.diff_only,
            "built comparison matrix"
        );

        ComparisonMatrix {
            columns,
            rows,
            view,
            vehicle_count: sorted.len(),
            visual_max: self.visual_max,
        }
    }

    fn vehicle_column(&self, vehicle: &Arc<Vehicle>) -> VehicleColumn {
        let name = if vehicle.name.trim().is_empty() {
            UNNAMED_VEHICLE.to_string()
        } else {
            vehicle.name.clone()
        };
        let brand = if vehicle.brand.trim().is_empty() {
            EM_DASH.to_string()
        } else {
            vehicle.brand.clone()
        };
        VehicleColumn {
            id: vehicle.id.clone(),
            name,
            brand,
            thumbnail: vehicle.primary_image().map(str::to_string),
            price: self.currency.format(&vehicle.price.on_road),
            vehicle: Arc::clone(vehicle),
        }
    }
}

impl Default for MatrixBuilder {
    fn default() -> Self {
        Self::new(default_fact_rows(&CurrencyConfig::default()))
    }
}

/// Build one matrix row; `placeholders` empty slots follow the vehicle cells.
pub fn build_row(row: &FactRow, vehicles: &[Arc<Vehicle>], placeholders: usize) -> MatrixRow {
    let raw: Vec<FieldValue> = vehicles.iter().map(|v| row.extract(v)).collect();

    let mut cells: Vec<Cell> = raw
        .iter()
        .zip(vehicles)
        .map(|(value, vehicle)| Cell::value(row.display(value, vehicle)))
        .collect();
    cells.extend(std::iter::repeat_with(Cell::placeholder).take(placeholders));

    MatrixRow {
        key: row.key().to_string(),
        label: row.label().to_string(),
        cells,
        all_equal: all_equal(&raw),
    }
}

/// Whether every value normalizes to the same string. Empty and single-value
/// inputs are trivially equal.
pub fn all_equal(values: &[FieldValue]) -> bool {
    let mut normalized = values.iter().map(FieldValue::normalized);
    match normalized.next() {
        None => true,
        Some(first) => normalized.all(|v| v == first),
    }
}
