use serde::{Deserialize, Serialize};

/// A single entry of the restaurant directory, as stored in the `restaurants` table.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub locality: Option<String>,
    pub cuisines: Option<String>,
    pub average_cost: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub aggregate_rating: Option<f64>,
    pub votes: Option<i32>,
}

impl Restaurant {
    /// Both coordinates, or nothing if either one is missing.
    pub fn location(&self) -> Option<Location> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Location { lat, lng }),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[cfg(test)]
impl Restaurant {
    pub fn fixture(id: i32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            city: None,
            address: None,
            locality: None,
            cuisines: None,
            average_cost: None,
            latitude: None,
            longitude: None,
            aggregate_rating: None,
            votes: None,
        }
    }
}
