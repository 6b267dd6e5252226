//! NGO roster and safe-zone dataset
//!
//! The dataset is loaded once at startup into immutable tables. Validation
//! happens here so that the matcher never sees an empty roster or an
//! out-of-range coordinate.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::models::{Ngo, SafeZone};

/// Dataset shipped with the binary
pub const EMBEDDED_DATASET: &str = include_str!("../../data/relief.toml");

/// Errors raised while building the roster or loading the dataset
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("NGO roster is empty")]
    Empty,

    #[error("Duplicate NGO id: {0}")]
    DuplicateId(String),

    #[error("Invalid coordinate for {id}: ({latitude}, {longitude})")]
    InvalidCoordinate {
        id: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Non-empty, read-only NGO table with lookup by id
#[derive(Debug, Clone)]
pub struct Roster {
    ngos: Vec<Ngo>,
    index: HashMap<String, usize>,
}

impl Roster {
    pub fn new(ngos: Vec<Ngo>) -> Result<Self, RosterError> {
        if ngos.is_empty() {
            return Err(RosterError::Empty);
        }

        let mut index = HashMap::with_capacity(ngos.len());
        for (pos, ngo) in ngos.iter().enumerate() {
            if !ngo.coords().is_valid() {
                return Err(RosterError::InvalidCoordinate {
                    id: ngo.id.clone(),
                    latitude: ngo.latitude,
                    longitude: ngo.longitude,
                });
            }
            if index.insert(ngo.id.clone(), pos).is_some() {
                return Err(RosterError::DuplicateId(ngo.id.clone()));
            }
        }

        Ok(Self { ngos, index })
    }

    pub fn len(&self) -> usize {
        self.ngos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ngos.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ngo> {
        self.ngos.iter()
    }

    pub fn as_slice(&self) -> &[Ngo] {
        &self.ngos
    }

    pub fn get(&self, id: &str) -> Option<&Ngo> {
        self.index.get(id).map(|&pos| &self.ngos[pos])
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Ngo;
    type IntoIter = std::slice::Iter<'a, Ngo>;

    fn into_iter(self) -> Self::IntoIter {
        self.ngos.iter()
    }
}

/// Raw dataset document
#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    ngos: Vec<Ngo>,
    #[serde(default)]
    safe_zones: Vec<SafeZone>,
}

/// NGO roster plus safe zones
#[derive(Debug, Clone)]
pub struct Dataset {
    pub roster: Roster,
    pub safe_zones: Vec<SafeZone>,
}

impl Dataset {
    /// Load the dataset compiled into the binary
    pub fn embedded() -> Result<Self, RosterError> {
        Self::from_toml(EMBEDDED_DATASET)
    }

    /// Load a dataset from a TOML file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RosterError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        info!("Loading relief dataset from {}", path.as_ref().display());
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, RosterError> {
        let raw: RawDataset = toml::from_str(content)?;

        for zone in &raw.safe_zones {
            if !zone.coords().is_valid() {
                return Err(RosterError::InvalidCoordinate {
                    id: zone.id.clone(),
                    latitude: zone.latitude,
                    longitude: zone.longitude,
                });
            }
        }

        let roster = Roster::new(raw.ngos)?;
        info!("Loaded {} NGOs and {} safe zones", roster.len(), raw.safe_zones.len());

        Ok(Self {
            roster,
            safe_zones: raw.safe_zones,
        })
    }
}
