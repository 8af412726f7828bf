//! Environment the duck finds itself in
//!
//! Supplied by the host each time an autonomous action is requested; the core
//! never stores it.

use serde::{Deserialize, Serialize};

/// Placeable structures in the duck's home
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Structure {
    Pond,
    Nest,
    FoodBowl,
    ToyBox,
    Bathtub,
}

/// Current weather condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Stormy,
    Snowy,
}

impl Weather {
    /// Whether outdoor activities are off the table
    pub fn keeps_indoors(&self) -> bool {
        matches!(self, Self::Stormy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Location {
    #[default]
    Indoors,
    Garden,
    Pond,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentContext {
    pub structures: Vec<Structure>,
    pub weather: Weather,
    pub location: Location,
}

impl EnvironmentContext {
    pub fn new(weather: Weather, location: Location) -> Self {
        Self {
            structures: Vec::new(),
            weather,
            location,
        }
    }

    pub fn with_structure(mut self, structure: Structure) -> Self {
        if !self.structures.contains(&structure) {
            self.structures.push(structure);
        }
        self
    }

    pub fn has(&self, structure: Structure) -> bool {
        self.structures.contains(&structure)
    }

    /// A structure counts as reachable when built, or when the duck stands in
    /// the matching place (a duck at the pond can swim without a built pond)
    pub fn can_reach(&self, structure: Structure) -> bool {
        self.has(structure) || (structure == Structure::Pond && self.location == Location::Pond)
    }

    /// Outdoor actions are blocked while a storm rages
    pub fn blocks_outdoor(&self) -> bool {
        self.weather.keeps_indoors()
    }
}
