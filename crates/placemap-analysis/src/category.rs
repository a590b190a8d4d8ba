//! Amenity categories and drive-time bands
//!
//! Each category and band carries the label and color the client renders it
//! with. Tagging never touches the source feature; it returns a copy with the
//! rendering properties added or overridden.

use geojson::Feature;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property value used when a place has no distance
pub const UNKNOWN_DISTANCE: &str = "Unknown";

/// Amenity categories analysed around a property, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Schools,
    GroceryStores,
    Parks,
    Clinics,
    Hospitals,
    Gyms,
    Restaurants,
}

impl Category {
    /// All categories in output order
    pub const ALL: [Category; 7] = [
        Category::Schools,
        Category::GroceryStores,
        Category::Parks,
        Category::Clinics,
        Category::Hospitals,
        Category::Gyms,
        Category::Restaurants,
    ];

    /// Label written to the `category` property
    pub fn label(&self) -> &'static str {
        match self {
            Category::Schools => "Schools",
            Category::GroceryStores => "Grocery Stores",
            Category::Parks => "Parks",
            Category::Clinics => "Clinics",
            Category::Hospitals => "Hospitals",
            Category::Gyms => "Gyms",
            Category::Restaurants => "Restaurants",
        }
    }

    /// Marker color for the client
    pub fn color(&self) -> &'static str {
        match self {
            Category::Schools => "#ff9ff3",
            Category::GroceryStores => "#54a0ff",
            Category::Parks => "#5f27cd",
            Category::Clinics => "#00d2d3",
            Category::Hospitals => "#ff6348",
            Category::Gyms => "#ffa502",
            Category::Restaurants => "#2ed573",
        }
    }

    /// Singular noun used in summaries
    pub fn singular(&self) -> &'static str {
        match self {
            Category::Schools => "school",
            Category::GroceryStores => "grocery store",
            Category::Parks => "park",
            Category::Clinics => "clinic",
            Category::Hospitals => "hospital",
            Category::Gyms => "gym",
            Category::Restaurants => "restaurant",
        }
    }

    /// Noun phrase for `count` places: "1 school", "3 schools"
    pub fn count_phrase(&self, count: usize) -> String {
        if count == 1 {
            format!("1 {}", self.singular())
        } else {
            format!("{count} {}s", self.singular())
        }
    }

    /// Copy `place` with this category's `category`, `color` and `distance`
    ///
    /// A missing or null distance becomes `"Unknown"`.
    pub fn tag(&self, place: &Feature) -> Feature {
        let distance = place
            .property("distance")
            .filter(|d| !d.is_null())
            .cloned()
            .unwrap_or_else(|| Value::from(UNKNOWN_DISTANCE));

        let mut tagged = place.clone();
        tagged.set_property("category", self.label());
        tagged.set_property("color", self.color());
        tagged.set_property("distance", distance);
        tagged
    }
}

/// Concentric drive-time bands, innermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DriveBand {
    FiveMinutes,
    TenMinutes,
}

impl DriveBand {
    /// Both bands, innermost first
    pub const ALL: [DriveBand; 2] = [DriveBand::FiveMinutes, DriveBand::TenMinutes];

    /// Opacity of band polygons
    pub const OPACITY: f64 = 0.3;

    /// Drive time in minutes
    pub fn minutes(&self) -> u32 {
        match self {
            DriveBand::FiveMinutes => 5,
            DriveBand::TenMinutes => 10,
        }
    }

    /// Label written to the band polygon's `category` property
    pub fn label(&self) -> &'static str {
        match self {
            DriveBand::FiveMinutes => "5_minutes_drive_area",
            DriveBand::TenMinutes => "10_minutes_drive_area",
        }
    }

    /// Fill color of the band polygon
    pub fn color(&self) -> &'static str {
        match self {
            DriveBand::FiveMinutes => "#ff6b6b",
            DriveBand::TenMinutes => "#4ecdc4",
        }
    }

    /// Copy `polygon` with this band's `category`, `color` and `opacity`
    pub fn tag(&self, polygon: &Feature) -> Feature {
        let mut tagged = polygon.clone();
        tagged.set_property("category", self.label());
        tagged.set_property("color", self.color());
        tagged.set_property("opacity", Self::OPACITY);
        tagged
    }
}
