use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Cell, FeatureFrame};
use crate::dataset::KnownSuburbs;
use crate::error::InvalidFeatureError;

/// Inclusive numeric range accepted for a feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    fn check(&self, field: &'static str, value: f64) -> Result<(), InvalidFeatureError> {
        if !value.is_finite() {
            return Err(InvalidFeatureError::NotFinite { field });
        }
        if !self.contains(value) {
            return Err(InvalidFeatureError::OutOfRange {
                field,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

pub const LANDSIZE_BOUNDS: Bounds = Bounds::new(0.0, 10_000.0);
pub const BUILDING_AREA_BOUNDS: Bounds = Bounds::new(0.0, 1_000.0);
pub const ROOM_BOUNDS: Bounds = Bounds::new(0.0, 10.0);

/// The kind of dwelling, encoded the way the training data codes it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PropertyType {
    #[serde(rename = "h", alias = "house")]
    House,
    #[serde(rename = "u", alias = "unit")]
    Unit,
    #[serde(rename = "t", alias = "townhouse")]
    Townhouse,
}

impl PropertyType {
    pub const ALL: [PropertyType; 3] = [Self::House, Self::Unit, Self::Townhouse];

    /// Single-letter code used as the model's category value.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::House => "h",
            Self::Unit => "u",
            Self::Townhouse => "t",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Unit => "unit",
            Self::Townhouse => "townhouse",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "house" => Ok(Self::House),
            "u" | "unit" => Ok(Self::Unit),
            "t" | "townhouse" => Ok(Self::Townhouse),
            other => Err(format!(
                "unknown property type '{}' (expected h, u or t)",
                other
            )),
        }
    }
}

/// One property described by the seven inputs the price model was fit on.
///
/// Field names and order mirror [`FeatureRecord::COLUMNS`]; the serialized
/// form uses those column names as keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Land size in square metres.
    #[serde(rename = "Landsize")]
    pub landsize: f64,
    #[serde(rename = "Type")]
    pub property_type: PropertyType,
    #[serde(rename = "Bedroom2")]
    pub bedroom2: u32,
    #[serde(rename = "Suburb")]
    pub suburb: String,
    /// Car spaces.
    #[serde(rename = "Car")]
    pub car: u32,
    #[serde(rename = "Bathroom")]
    pub bathroom: u32,
    /// Building area in square metres.
    #[serde(rename = "BuildingArea")]
    pub building_area: f64,
}

impl FeatureRecord {
    /// Column names in the order the model was trained on.
    pub const COLUMNS: [&'static str; 7] = [
        "Landsize",
        "Type",
        "Bedroom2",
        "Suburb",
        "Car",
        "Bathroom",
        "BuildingArea",
    ];

    /// The values a blank form starts with.
    pub fn form_defaults(suburb: impl Into<String>) -> Self {
        Self {
            landsize: 500.0,
            property_type: PropertyType::House,
            bedroom2: 3,
            suburb: suburb.into(),
            car: 1,
            bathroom: 2,
            building_area: 150.0,
        }
    }

    /// Clamp every numeric field into its accepted range.
    ///
    /// Non-finite sizes collapse to the lower bound.
    pub fn clamp(mut self) -> Self {
        self.landsize = clamp_finite(LANDSIZE_BOUNDS, self.landsize);
        self.building_area = clamp_finite(BUILDING_AREA_BOUNDS, self.building_area);
        self.bedroom2 = clamp_count(self.bedroom2);
        self.car = clamp_count(self.car);
        self.bathroom = clamp_count(self.bathroom);
        self
    }

    /// Check ranges and suburb membership.
    pub fn validate(&self, known_suburbs: &KnownSuburbs) -> Result<(), InvalidFeatureError> {
        LANDSIZE_BOUNDS.check("Landsize", self.landsize)?;
        ROOM_BOUNDS.check("Bedroom2", self.bedroom2 as f64)?;
        ROOM_BOUNDS.check("Car", self.car as f64)?;
        ROOM_BOUNDS.check("Bathroom", self.bathroom as f64)?;
        BUILDING_AREA_BOUNDS.check("BuildingArea", self.building_area)?;

        if !known_suburbs.contains(&self.suburb) {
            return Err(InvalidFeatureError::UnknownSuburb(self.suburb.clone()));
        }
        Ok(())
    }

    /// Build the single-row table handed to the model.
    pub fn to_frame(&self) -> FeatureFrame {
        let mut frame = FeatureFrame::new(Self::COLUMNS.iter().map(|c| c.to_string()).collect());
        frame.push_row(vec![
            Cell::Number(self.landsize),
            Cell::Text(self.property_type.as_code().to_string()),
            Cell::Number(self.bedroom2 as f64),
            Cell::Text(self.suburb.clone()),
            Cell::Number(self.car as f64),
            Cell::Number(self.bathroom as f64),
            Cell::Number(self.building_area),
        ]);
        frame
    }
}

fn clamp_finite(bounds: Bounds, value: f64) -> f64 {
    if value.is_nan() {
        bounds.min
    } else {
        bounds.clamp(value)
    }
}

fn clamp_count(value: u32) -> u32 {
    value.min(ROOM_BOUNDS.max as u32)
}
