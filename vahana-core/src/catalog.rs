//! The vehicle catalog the selection store draws from.
//!
//! Vehicles are shared as `Arc<Vehicle>` so the store and rendered matrices can
//! reference catalog records without copying them. Ids are checked for
//! uniqueness when a catalog is loaded.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::types::Vehicle;

/// Catalog data shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../data/vehicles.json");

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    vehicles: Vec<Arc<Vehicle>>,
}

impl Catalog {
    /// Build a catalog from records, rejecting duplicate ids.
    pub fn new(vehicles: Vec<Vehicle>) -> std::result::Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for vehicle in &vehicles {
            if !seen.insert(vehicle.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: vehicle.id.clone(),
                });
            }
        }
        Ok(Self {
            vehicles: vehicles.into_iter().map(Arc::new).collect(),
        })
    }

    /// The ten-vehicle catalog bundled with the application.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// Parse a JSON array of vehicle records.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let vehicles: Vec<Vehicle> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse {
                message: e.to_string(),
            })?;
        Ok(Self::new(vehicles)?)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&content)?;
        debug!(path = %path.display(), vehicles = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Load `path` when given, otherwise the built-in catalog.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<Vehicle>> {
        self.vehicles.iter().find(|v| v.id == id).cloned()
    }

    /// Like [`get`](Self::get) but reports a missing id as an error.
    pub fn require(&self, id: &str) -> std::result::Result<Arc<Vehicle>, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })
    }

    pub fn vehicles(&self) -> &[Arc<Vehicle>] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Case-insensitive substring match on name, brand, category and id.
    pub fn search(&self, query: &str) -> Vec<Arc<Vehicle>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.vehicles.clone();
        }
        self.vehicles
            .iter()
            .filter(|v| {
                [&v.name, &v.brand, &v.category, &v.id]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }
}
