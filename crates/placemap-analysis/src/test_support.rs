//! Feature builders shared by unit tests

use geojson::{Feature, Geometry, Value};
use placemap_core::{Dataset, DatasetName};
use serde_json::json;
use std::time::Duration;

use crate::store::DatasetStore;

pub fn feature(value: Value) -> Feature {
    Feature::from(Geometry::new(value))
}

/// Point place with an `id` and a `name`
pub fn place(id: &str, x: f64, y: f64) -> Feature {
    let mut place = feature(Value::Point(vec![x, y]));
    place.set_property("id", id);
    place.set_property("name", format!("Place {id}"));
    place
}

pub fn place_with_distance(id: &str, x: f64, y: f64, distance: serde_json::Value) -> Feature {
    let mut place = place(id, x, y);
    place.set_property("distance", distance);
    place
}

/// Axis-aligned square polygon with its lower-left corner at (x, y)
pub fn square(x: f64, y: f64, size: f64) -> Feature {
    feature(Value::Polygon(vec![vec![
        vec![x, y],
        vec![x + size, y],
        vec![x + size, y + size],
        vec![x, y + size],
        vec![x, y],
    ]]))
}

/// Spatial-join result row
pub fn filter_row(id: serde_json::Value, count: serde_json::Value) -> Feature {
    let mut row = Feature::default();
    row.set_property("id", id);
    row.set_property("Count", count);
    row
}

pub async fn store_with(datasets: Vec<(&str, Vec<Feature>)>) -> DatasetStore {
    let store = DatasetStore::new(Duration::from_secs(60), 50).unwrap();
    for (name, features) in datasets {
        store
            .insert(DatasetName::new(name), Dataset::from_features(features))
            .await;
    }
    store
}

#[test]
fn test_square_is_closed() {
    let Some(Value::Polygon(rings)) = square(1.0, 2.0, 3.0).geometry.map(|g| g.value) else {
        panic!("expected polygon");
    };
    assert_eq!(rings[0].first(), rings[0].last());
    assert_eq!(json!(rings[0][2]), json!([4.0, 5.0]));
}
