//! Point-in-polygon containment over GeoJSON features
//!
//! Containment is boundary-inclusive: a point lying on a ring counts as
//! inside, a point inside a hole does not. Only Polygon and MultiPolygon
//! candidates take part; any other geometry is ignored. Malformed input never
//! panics and never errors, it simply does not contain anything.

use geo::{Coord, Intersects, LineString, MultiPolygon, Point, Polygon};
use geojson::{Feature, Position, Value};
use tracing::warn;

use crate::error::{AnalysisError, Result};

/// Candidate polygons converted once for repeated point tests
#[derive(Debug, Clone, Default)]
pub struct PolygonSet {
    polygons: Vec<MultiPolygon<f64>>,
}

impl PolygonSet {
    /// Prepare polygons from features
    ///
    /// Non-polygon features are skipped. A polygon whose exterior ring is
    /// unusable is skipped with a warning; an unusable hole or multipolygon
    /// part is dropped on its own and the rest of the feature is kept.
    pub fn from_features(features: &[Feature]) -> Self {
        let polygons = features
            .iter()
            .enumerate()
            .filter_map(|(index, feature)| match polygon_from_feature(feature) {
                Ok(polygon) => polygon,
                Err(e) => {
                    warn!(index, error = %e, "Skipping polygon in spatial filtering");
                    None
                }
            })
            .collect();

        Self { polygons }
    }

    /// Number of usable polygons
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Check if no usable polygon was found
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Whether the point feature lies inside any polygon of the set
    pub fn contains(&self, point: &Feature) -> bool {
        feature_point(point).is_some_and(|p| self.contains_point(&p))
    }

    /// Whether the point lies inside any polygon of the set
    pub fn contains_point(&self, point: &Point<f64>) -> bool {
        self.polygons.iter().any(|polygon| polygon.intersects(point))
    }
}

/// Whether `point` lies inside any of `polygons`
///
/// Returns `false` when `point` is not a Point feature with at least two
/// coordinates, or when no candidate is a usable polygon.
pub fn is_point_in_polygons(point: &Feature, polygons: &[Feature]) -> bool {
    feature_point(point).is_some_and(|p| PolygonSet::from_features(polygons).contains_point(&p))
}

/// Extract a point from a Point feature
pub fn feature_point(feature: &Feature) -> Option<Point<f64>> {
    match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Point(coords)) if coords.len() >= 2 => Some(Point::new(coords[0], coords[1])),
        _ => None,
    }
}

fn polygon_from_feature(feature: &Feature) -> Result<Option<MultiPolygon<f64>>> {
    match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Polygon(rings)) => {
            Ok(Some(MultiPolygon::new(vec![polygon_from_rings(rings)?])))
        }
        Some(Value::MultiPolygon(polygons)) => {
            let parts: Vec<Polygon<f64>> = polygons
                .iter()
                .enumerate()
                .filter_map(|(part, rings)| match polygon_from_rings(rings) {
                    Ok(polygon) => Some(polygon),
                    Err(e) => {
                        warn!(part, error = %e, "Skipping multipolygon part");
                        None
                    }
                })
                .collect();

            if parts.is_empty() {
                return Err(AnalysisError::InvalidGeometry(
                    "multipolygon has no usable part".to_string(),
                ));
            }
            Ok(Some(MultiPolygon::new(parts)))
        }
        _ => Ok(None),
    }
}

// The exterior ring must be usable; a bad hole is dropped on its own.
fn polygon_from_rings(rings: &[Vec<Position>]) -> Result<Polygon<f64>> {
    let (exterior, holes) = rings
        .split_first()
        .ok_or_else(|| AnalysisError::InvalidGeometry("polygon has no exterior ring".to_string()))?;
    let exterior = ring_from_positions(exterior)?;

    let interiors = holes
        .iter()
        .enumerate()
        .filter_map(|(hole, ring)| match ring_from_positions(ring) {
            Ok(ring) => Some(ring),
            Err(e) => {
                warn!(hole, error = %e, "Skipping polygon hole");
                None
            }
        })
        .collect();

    Ok(Polygon::new(exterior, interiors))
}

fn ring_from_positions(positions: &[Position]) -> Result<LineString<f64>> {
    if positions.len() < 3 {
        return Err(AnalysisError::InvalidGeometry(format!(
            "ring has {} positions, at least 3 required",
            positions.len()
        )));
    }

    positions
        .iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Coord { x: *x, y: *y }),
            _ => Err(AnalysisError::InvalidGeometry(format!(
                "invalid ring position {position:?}"
            ))),
        })
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{feature, place, square};
    use geojson::Geometry;

    #[test]
    fn test_point_inside_square() {
        let polygons = vec![square(0.0, 0.0, 10.0)];
        assert!(is_point_in_polygons(&place("a", 5.0, 5.0), &polygons));
        assert!(!is_point_in_polygons(&place("b", 15.0, 5.0), &polygons));
    }

    #[test]
    fn test_boundary_counts_as_inside() {
        let polygons = vec![square(0.0, 0.0, 10.0)];
        assert!(is_point_in_polygons(&place("edge", 0.0, 5.0), &polygons));
        assert!(is_point_in_polygons(&place("corner", 10.0, 10.0), &polygons));
    }

    #[test]
    fn test_point_in_hole_is_outside() {
        let with_hole = feature(Value::Polygon(vec![
            vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![10.0, 10.0], vec![0.0, 10.0], vec![0.0, 0.0]],
            vec![vec![4.0, 4.0], vec![6.0, 4.0], vec![6.0, 6.0], vec![4.0, 6.0], vec![4.0, 4.0]],
        ]));
        assert!(!is_point_in_polygons(&place("hole", 5.0, 5.0), &[with_hole.clone()]));
        assert!(is_point_in_polygons(&place("ring", 2.0, 2.0), &[with_hole]));
    }

    #[test]
    fn test_any_polygon_matches() {
        let polygons = vec![square(0.0, 0.0, 1.0), square(20.0, 20.0, 1.0)];
        assert!(is_point_in_polygons(&place("far", 20.5, 20.5), &polygons));
    }

    #[test]
    fn test_multipolygon() {
        let multi = feature(Value::MultiPolygon(vec![
            vec![vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0]]],
            vec![vec![vec![5.0, 5.0], vec![7.0, 5.0], vec![7.0, 7.0], vec![5.0, 7.0], vec![5.0, 5.0]]],
        ]));
        assert!(is_point_in_polygons(&place("second", 6.0, 6.0), &[multi]));
    }

    #[test]
    fn test_empty_polygon_set() {
        assert!(!is_point_in_polygons(&place("a", 0.0, 0.0), &[]));
        assert!(PolygonSet::from_features(&[]).is_empty());
    }

    #[test]
    fn test_non_point_features_never_contained() {
        let polygons = vec![square(0.0, 0.0, 10.0)];

        let line = feature(Value::LineString(vec![vec![1.0, 1.0], vec![2.0, 2.0]]));
        assert!(!is_point_in_polygons(&line, &polygons));

        assert!(!is_point_in_polygons(&square(1.0, 1.0, 1.0), &polygons));
        assert!(!is_point_in_polygons(&Feature::default(), &polygons));

        let short = feature(Value::Point(vec![5.0]));
        assert!(!is_point_in_polygons(&short, &polygons));
    }

    #[test]
    fn test_non_polygon_candidates_ignored() {
        let candidates = vec![
            place("not-a-polygon", 5.0, 5.0),
            feature(Value::LineString(vec![vec![0.0, 0.0], vec![10.0, 10.0]])),
        ];
        let set = PolygonSet::from_features(&candidates);
        assert!(set.is_empty());
        assert!(!set.contains(&place("a", 5.0, 5.0)));
    }

    #[test]
    fn test_degenerate_polygons_skipped() {
        let degenerate = feature(Value::Polygon(vec![vec![vec![0.0], vec![1.0, 1.0], vec![2.0, 0.0]]]));
        let too_short = feature(Value::Polygon(vec![vec![vec![0.0, 0.0], vec![1.0, 1.0]]]));
        let no_rings = feature(Value::Polygon(vec![]));
        let non_finite = feature(Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![f64::NAN, 0.0],
            vec![1.0, 1.0],
        ]]));

        let set = PolygonSet::from_features(&[
            degenerate,
            too_short,
            no_rings,
            non_finite,
            square(0.0, 0.0, 10.0),
        ]);
        assert_eq!(set.len(), 1);
        assert!(set.contains(&place("a", 5.0, 5.0)));
    }

    #[test]
    fn test_bad_hole_keeps_exterior() {
        let with_bad_hole = feature(Value::Polygon(vec![
            vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![10.0, 10.0], vec![0.0, 10.0], vec![0.0, 0.0]],
            vec![vec![4.0, 4.0], vec![6.0, 6.0]],
            vec![vec![7.0, 7.0], vec![8.0, 7.0], vec![8.0, 8.0], vec![7.0, 8.0], vec![7.0, 7.0]],
        ]));
        let polygons = [with_bad_hole];

        assert!(is_point_in_polygons(&place("a", 1.0, 1.0), &polygons));
        assert!(is_point_in_polygons(&place("b", 5.0, 5.0), &polygons));
        assert!(!is_point_in_polygons(&place("c", 7.5, 7.5), &polygons));
    }

    #[test]
    fn test_bad_multipolygon_part_keeps_other_parts() {
        let multi = feature(Value::MultiPolygon(vec![
            vec![vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![10.0, 10.0], vec![0.0, 10.0], vec![0.0, 0.0]]],
            vec![vec![vec![20.0, 20.0], vec![21.0, 21.0]]],
        ]));
        let set = PolygonSet::from_features(&[multi]);

        assert_eq!(set.len(), 1);
        assert!(set.contains(&place("a", 1.0, 1.0)));

        let only_bad = feature(Value::MultiPolygon(vec![vec![vec![vec![0.0, 0.0], vec![1.0, 1.0]]]]));
        assert!(PolygonSet::from_features(&[only_bad]).is_empty());
    }

    #[test]
    fn test_feature_point() {
        let p = feature_point(&place("a", 1.5, -2.0)).unwrap();
        assert_eq!((p.x(), p.y()), (1.5, -2.0));

        let with_altitude = Feature::from(Geometry::new(Value::Point(vec![1.0, 2.0, 30.0])));
        assert!(feature_point(&with_altitude).is_some());
    }
}
