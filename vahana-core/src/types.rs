//! Fundamental vehicle types shared by the catalog, the selection store and the
//! comparison matrix.

use serde::{Deserialize, Serialize};

/// A loosely-typed raw value read from catalog data.
///
/// Catalog records are not strictly validated, so a price may arrive as a number,
/// as a string like `"1,20,000"` or `"₹ 95000"`, or not at all. JSON `null` and a
/// missing key both deserialize to [`FieldValue::Absent`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// The field is missing or null.
    #[default]
    Absent,
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// String form used for cross-vehicle equality: numbers in their shortest
    /// decimal form, text trimmed with case preserved, absent as `None`.
    pub fn normalized(&self) -> Option<String> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Text(s) => Some(s.trim().to_string()),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Absent => write!(f, "{}", crate::format::EM_DASH),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Absent, Into::into)
    }
}

/// Pricing in whole currency units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    #[serde(default)]
    pub ex_showroom: FieldValue,
    #[serde(default)]
    pub on_road: FieldValue,
}

/// Technical specifications. Only `mileage` and `engine` are always expected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specifications {
    /// km/l for combustion engines, km per charge for electric.
    #[serde(default)]
    pub mileage: FieldValue,
    #[serde(default)]
    pub engine: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torque: Option<String>,
}

/// A catalog vehicle. Read-only to the comparison core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub specifications: Specifications,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Vehicle {
    /// Create a vehicle with identity and display strings; everything else empty.
    pub fn new(
        id: impl Into<String>,
        brand: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            name: name.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn with_on_road(mut self, value: impl Into<FieldValue>) -> Self {
        self.price.on_road = value.into();
        self
    }

    pub fn with_ex_showroom(mut self, value: impl Into<FieldValue>) -> Self {
        self.price.ex_showroom = value.into();
        self
    }

    pub fn with_mileage(mut self, value: impl Into<FieldValue>) -> Self {
        self.specifications.mileage = value.into();
        self
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.specifications.engine = engine.into();
        self
    }

    pub fn with_fuel_type(mut self, fuel_type: impl Into<String>) -> Self {
        self.specifications.fuel_type = Some(fuel_type.into());
        self
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_image(mut self, uri: impl Into<String>) -> Self {
        self.images.push(uri.into());
        self
    }

    /// The primary thumbnail, if the vehicle has any images.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn is_electric(&self) -> bool {
        self.specifications
            .fuel_type
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("electric"))
    }
}
