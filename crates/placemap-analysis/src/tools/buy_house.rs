//! Property analysis tool
//!
//! Buckets the places of seven amenity categories into two concentric
//! drive-time bands around a property. A place belongs to the innermost band
//! containing it and to no other. The result is one combined dataset drawn
//! band by band (polygon first, then its places) and a summary of the
//! amenity counts per band.

use async_trait::async_trait;
use futures::future::join_all;
use geojson::Feature;
use placemap_core::{Dataset, DatasetName, DatasetResolver, Error, Result as CoreResult};
use placemap_tools::{Tool, ToolOutput};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::category::{Category, DriveBand};
use crate::error::{AnalysisError, Result};
use crate::spatial::{PolygonSet, feature_point};
use crate::summary::AmenitySummary;

/// Prefix of datasets produced by this tool
pub const BUY_HOUSE_PREFIX: &str = "buyHouse";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuyHouseParams {
    redfin_description: String,
    redfin_url: String,
    schools_dataset_name: String,
    grocery_stores_dataset_name: String,
    parks_dataset_name: String,
    clinics_dataset_name: String,
    hospitals_dataset_name: String,
    gyms_dataset_name: String,
    restaurants_dataset_name: String,
    five_mins_drive_dataset_name: String,
    ten_mins_drive_dataset_name: String,
}

impl BuyHouseParams {
    fn category_dataset(&self, category: Category) -> &str {
        match category {
            Category::Schools => &self.schools_dataset_name,
            Category::GroceryStores => &self.grocery_stores_dataset_name,
            Category::Parks => &self.parks_dataset_name,
            Category::Clinics => &self.clinics_dataset_name,
            Category::Hospitals => &self.hospitals_dataset_name,
            Category::Gyms => &self.gyms_dataset_name,
            Category::Restaurants => &self.restaurants_dataset_name,
        }
    }

    fn band_dataset(&self, band: DriveBand) -> &str {
        match band {
            DriveBand::FiveMinutes => &self.five_mins_drive_dataset_name,
            DriveBand::TenMinutes => &self.ten_mins_drive_dataset_name,
        }
    }
}

/// LLM-facing result of `buyHouse`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyHouseLlmResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redfin_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Combined features and amenity counts for one property
#[derive(Debug, Clone)]
pub struct PropertyAnalysis {
    /// 5-minute polygons, 5-minute places, 10-minute polygons, 10-minute places
    pub features: Vec<Feature>,
    pub summary: AmenitySummary,
}

/// Bucket category places into the drive-time bands
///
/// `places` is visited in the given order for each band, so callers pass the
/// categories in output order. Places outside both bands are dropped.
pub fn analyze_property(
    five_minutes: &[Feature],
    ten_minutes: &[Feature],
    places: &[(Category, Vec<Feature>)],
) -> PropertyAnalysis {
    let inner = PolygonSet::from_features(five_minutes);
    let outer = PolygonSet::from_features(ten_minutes);

    let band_of = |place: &Feature| {
        let point = feature_point(place)?;
        if inner.contains_point(&point) {
            Some(DriveBand::FiveMinutes)
        } else if outer.contains_point(&point) {
            Some(DriveBand::TenMinutes)
        } else {
            None
        }
    };

    let assignments: Vec<Vec<Option<DriveBand>>> = places
        .iter()
        .map(|(_, candidates)| candidates.iter().map(|place| band_of(place)).collect())
        .collect();

    let mut features = Vec::new();
    let mut summary = AmenitySummary::new();

    for band in DriveBand::ALL {
        let polygons = match band {
            DriveBand::FiveMinutes => five_minutes,
            DriveBand::TenMinutes => ten_minutes,
        };
        features.extend(polygons.iter().map(|polygon| band.tag(polygon)));

        for ((category, candidates), bands) in places.iter().zip(&assignments) {
            let before = features.len();
            features.extend(
                candidates
                    .iter()
                    .zip(bands)
                    .filter(|(_, assigned)| **assigned == Some(band))
                    .map(|(place, _)| category.tag(place)),
            );
            let kept = features.len() - before;

            debug!(
                category = category.label(),
                minutes = band.minutes(),
                total = candidates.len(),
                kept,
                "Spatial filtering"
            );
            summary.add(band, *category, kept);
        }
    }

    PropertyAnalysis { features, summary }
}

/// Tool analysing the amenities around a property
pub struct BuyHouseTool {
    resolver: Arc<dyn DatasetResolver>,
}

impl BuyHouseTool {
    /// Create a new property analysis tool
    pub fn new(resolver: Arc<dyn DatasetResolver>) -> Self {
        Self { resolver }
    }

    async fn drive_area(&self, params: &BuyHouseParams, band: DriveBand) -> Result<Vec<Feature>> {
        let name = params.band_dataset(band);
        self.resolver
            .resolve_dataset(name)
            .await
            .filter(|polygons| !polygons.is_empty())
            .ok_or_else(|| AnalysisError::DriveAreaMissing {
                minutes: band.minutes(),
                dataset: name.to_string(),
            })
    }

    async fn category_places(&self, params: &BuyHouseParams) -> Vec<(Category, Vec<Feature>)> {
        join_all(Category::ALL.into_iter().map(|category| async move {
            let name = params.category_dataset(category);
            let places = self.resolver.resolve_dataset(name).await.unwrap_or_else(|| {
                warn!(category = category.label(), dataset = name, "Category dataset not found, treating as empty");
                Vec::new()
            });
            (category, places)
        }))
        .await
    }

    async fn analyze(&self, params: &BuyHouseParams) -> Result<ToolOutput> {
        let five_minutes = self.drive_area(params, DriveBand::FiveMinutes).await?;
        let ten_minutes = self.drive_area(params, DriveBand::TenMinutes).await?;
        let places = self.category_places(params).await;

        let analysis = analyze_property(&five_minutes, &ten_minutes, &places);
        let summary = analysis.summary.to_string();
        let dataset_name = DatasetName::unique(BUY_HOUSE_PREFIX);

        info!(
            dataset = %dataset_name,
            amenities = analysis.summary.total(),
            features = analysis.features.len(),
            "Property analysis complete"
        );

        let mut additional = Map::new();
        additional.insert("datasetName".to_string(), json!(dataset_name));
        additional.insert("redfinUrl".to_string(), json!(params.redfin_url));
        additional.insert("redfinDescription".to_string(), json!(params.redfin_description));
        additional.insert(
            dataset_name.to_string(),
            serde_json::to_value(Dataset::from_features(analysis.features))?,
        );

        let llm_result = BuyHouseLlmResult {
            success: true,
            redfin_description: Some(params.redfin_description.clone()),
            summary: Some(summary),
        };

        Ok(ToolOutput::new(serde_json::to_value(llm_result)?)
            .with_additional_data(Value::Object(additional)))
    }
}

#[async_trait]
impl Tool for BuyHouseTool {
    async fn execute(&self, params: Value) -> CoreResult<ToolOutput> {
        let params: BuyHouseParams = serde_json::from_value(params)
            .map_err(|e| Error::InvalidParameters(e.to_string()))?;

        debug!(?params, "buyHouse args");

        match self.analyze(&params).await {
            Ok(output) => Ok(output),
            Err(e) => {
                error!(error = %e, "Error analyzing property");
                let message = match e {
                    AnalysisError::DriveAreaMissing { .. } => e.to_string(),
                    other => format!("Error analyzing property: {other}"),
                };
                Ok(ToolOutput::new(serde_json::to_value(BuyHouseLlmResult {
                    success: false,
                    redfin_description: None,
                    summary: Some(message),
                })?))
            }
        }
    }

    fn name(&self) -> &str {
        "buyHouse"
    }

    fn description(&self) -> &str {
        "Analyze a property for home buying by combining Redfin information with nearby amenities data. \
         Uses the 5 minutes drive distance polygon to filter all categories of places, and the \
         10 minutes drive distance polygon for the places beyond it. Creates a combined GeoJSON \
         with the distance polygons and filtered points, and returns the Redfin description and \
         a summary of nearby amenities."
    }

    fn input_schema(&self) -> Value {
        let dataset = |what: &str| {
            json!({
                "type": "string",
                "description": format!("The name of the dataset containing {what}")
            })
        };

        json!({
            "type": "object",
            "properties": {
                "redfinDescription": {
                    "type": "string",
                    "description": "The Redfin description of the property"
                },
                "redfinUrl": {
                    "type": "string",
                    "description": "The Redfin URL of the property"
                },
                "schoolsDatasetName": dataset("schools"),
                "groceryStoresDatasetName": dataset("grocery stores"),
                "parksDatasetName": dataset("parks"),
                "clinicsDatasetName": dataset("clinics or urgent care"),
                "hospitalsDatasetName": dataset("hospitals"),
                "gymsDatasetName": dataset("gyms"),
                "restaurantsDatasetName": dataset("restaurants"),
                "fiveMinsDriveDatasetName": dataset("5 minutes drive distance polygon"),
                "tenMinsDriveDatasetName": dataset("10 minutes drive distance polygon")
            },
            "required": [
                "redfinDescription",
                "redfinUrl",
                "schoolsDatasetName",
                "groceryStoresDatasetName",
                "parksDatasetName",
                "clinicsDatasetName",
                "hospitalsDatasetName",
                "gymsDatasetName",
                "restaurantsDatasetName",
                "fiveMinsDriveDatasetName",
                "tenMinsDriveDatasetName"
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DatasetStore;
    use crate::test_support::{feature, place, place_with_distance, square, store_with};

    fn args() -> Value {
        json!({
            "redfinDescription": "3 bed, 2 bath craftsman",
            "redfinUrl": "https://www.redfin.com/home/1",
            "schoolsDatasetName": "schools",
            "groceryStoresDatasetName": "grocery",
            "parksDatasetName": "parks",
            "clinicsDatasetName": "clinics",
            "hospitalsDatasetName": "hospitals",
            "gymsDatasetName": "gyms",
            "restaurantsDatasetName": "restaurants",
            "fiveMinsDriveDatasetName": "drive5",
            "tenMinsDriveDatasetName": "drive10"
        })
    }

    // 5-minute band covers [0, 10], 10-minute band covers [-10, 20].
    fn bands() -> Vec<(&'static str, Vec<Feature>)> {
        vec![
            ("drive5", vec![square(0.0, 0.0, 10.0)]),
            ("drive10", vec![square(-10.0, -10.0, 30.0)]),
        ]
    }

    async fn run(store: DatasetStore) -> ToolOutput {
        BuyHouseTool::new(Arc::new(store)).execute(args()).await.unwrap()
    }

    fn combined(output: &ToolOutput) -> Vec<Feature> {
        let name = output.dataset_name().unwrap();
        let dataset: Dataset =
            serde_json::from_value(output.additional_data.as_ref().unwrap()[name].clone()).unwrap();
        dataset.into_features()
    }

    fn prop<'a>(feature: &'a Feature, key: &str) -> &'a Value {
        feature.property(key).unwrap_or(&Value::Null)
    }

    #[tokio::test]
    async fn test_one_school_per_band() {
        let mut datasets = bands();
        datasets.push((
            "schools",
            vec![place("inner", 5.0, 5.0), place("outer", 15.0, 15.0), place("away", 50.0, 50.0)],
        ));
        let output = run(store_with(datasets).await).await;

        assert!(output.success());
        assert_eq!(
            output.llm_result["summary"],
            "Within 5 minutes drive: 1 amenities (1 school). \
             Within 10 minutes drive: 1 amenities (1 school)."
        );
        assert_eq!(output.llm_result["redfinDescription"], "3 bed, 2 bath craftsman");

        let features = combined(&output);
        let categories: Vec<&Value> = features.iter().map(|f| prop(f, "category")).collect();
        assert_eq!(
            categories,
            vec![
                &json!("5_minutes_drive_area"),
                &json!("Schools"),
                &json!("10_minutes_drive_area"),
                &json!("Schools"),
            ]
        );
        assert_eq!(prop(&features[1], "id"), &json!("inner"));
        assert_eq!(prop(&features[3], "id"), &json!("outer"));
        assert_eq!(prop(&features[0], "opacity"), &json!(0.3));
        assert_eq!(prop(&features[1], "distance"), &json!("Unknown"));
    }

    #[tokio::test]
    async fn test_missing_drive_areas_report_five_minutes_first() {
        let output = run(store_with(vec![]).await).await;

        assert!(!output.success());
        assert_eq!(
            output.llm_result["summary"],
            "No 5 minutes drive distance polygon found for dataset: drive5"
        );
        assert!(output.additional_data.is_none());
    }

    #[tokio::test]
    async fn test_empty_ten_minute_area_fails() {
        let store = store_with(vec![
            ("drive5", vec![square(0.0, 0.0, 10.0)]),
            ("drive10", vec![]),
        ])
        .await;
        let output = run(store).await;

        assert!(!output.success());
        assert_eq!(
            output.llm_result["summary"],
            "No 10 minutes drive distance polygon found for dataset: drive10"
        );
    }

    #[tokio::test]
    async fn test_no_amenities() {
        let mut datasets = bands();
        for name in ["schools", "grocery", "parks", "clinics", "hospitals", "gyms", "restaurants"] {
            datasets.push((name, vec![]));
        }
        let output = run(store_with(datasets).await).await;

        assert!(output.success());
        assert_eq!(
            output.llm_result["summary"],
            "No nearby amenities found within the specified distances."
        );
        assert_eq!(combined(&output).len(), 2);
    }

    #[tokio::test]
    async fn test_missing_category_datasets_are_empty() {
        let mut datasets = bands();
        datasets.push(("gyms", vec![place("g1", 1.0, 1.0), place("g2", 2.0, 2.0)]));
        let output = run(store_with(datasets).await).await;

        assert!(output.success());
        assert_eq!(
            output.llm_result["summary"],
            "Within 5 minutes drive: 2 amenities (2 gyms)."
        );
    }

    #[tokio::test]
    async fn test_additional_data_shape_and_unique_names() {
        let store = store_with(bands()).await;
        let tool = BuyHouseTool::new(Arc::new(store));

        let first = tool.execute(args()).await.unwrap();
        let second = tool.execute(args()).await.unwrap();

        let name = first.dataset_name().unwrap();
        assert!(name.starts_with("buyHouse_"));
        assert_ne!(Some(name), second.dataset_name());

        let data = first.additional_data.as_ref().unwrap();
        assert_eq!(data["redfinUrl"], "https://www.redfin.com/home/1");
        assert_eq!(data["redfinDescription"], "3 bed, 2 bath craftsman");
        assert_eq!(data[name]["type"], "geojson");
        assert_eq!(data[name]["content"]["type"], "FeatureCollection");
        assert_eq!(first.datasets().len(), 1);
    }

    #[tokio::test]
    async fn test_source_datasets_untouched() {
        let mut datasets = bands();
        datasets.push(("parks", vec![place_with_distance("p1", 5.0, 5.0, json!(80))]));
        let store = store_with(datasets).await;

        let output = run(store.clone()).await;
        assert_eq!(prop(&combined(&output)[1], "distance"), &json!(80));

        let parks = store.features("parks").await.unwrap();
        assert!(parks[0].property("category").is_none());
        let drive5 = store.features("drive5").await.unwrap();
        assert!(drive5[0].property("opacity").is_none());
    }

    #[tokio::test]
    async fn test_invalid_parameters() {
        let store = store_with(vec![]).await;
        let result = BuyHouseTool::new(Arc::new(store))
            .execute(json!({ "redfinUrl": "https://www.redfin.com/home/1" }))
            .await;
        assert!(matches!(result, Err(Error::InvalidParameters(_))));
    }

    #[test]
    fn test_each_place_in_one_band() {
        let five = vec![square(0.0, 0.0, 10.0)];
        let ten = vec![square(-10.0, -10.0, 30.0)];
        let places = vec![
            (
                Category::Restaurants,
                vec![
                    place("r-edge", 10.0, 10.0),
                    place("r-outer", -5.0, -5.0),
                    place("r-inner", 3.0, 3.0),
                ],
            ),
            (Category::Schools, vec![place("s-outer", 19.0, 0.0), place("s-inner", 9.0, 1.0)]),
        ];

        let analysis = analyze_property(&five, &ten, &places);

        let ids: Vec<&Value> = analysis
            .features
            .iter()
            .filter_map(|f| f.property("id"))
            .collect();
        assert_eq!(
            ids,
            vec![
                &json!("r-edge"),
                &json!("r-inner"),
                &json!("s-inner"),
                &json!("r-outer"),
                &json!("s-outer"),
            ]
        );

        let inner = analysis.summary.band(DriveBand::FiveMinutes);
        let outer = analysis.summary.band(DriveBand::TenMinutes);
        assert_eq!(inner.get(Category::Restaurants), 2);
        assert_eq!(outer.get(Category::Restaurants), 1);
        assert_eq!(outer.get(Category::Schools), 1);
        assert_eq!(analysis.summary.total(), 5);
    }

    #[test]
    fn test_bad_hole_in_inner_band_keeps_place_inner() {
        let five = vec![feature(geojson::Value::Polygon(vec![
            vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![10.0, 10.0], vec![0.0, 10.0], vec![0.0, 0.0]],
            vec![vec![4.0, 4.0], vec![5.0, 5.0]],
        ]))];
        let ten = vec![square(-10.0, -10.0, 30.0)];
        let places = vec![(Category::Parks, vec![place("p1", 1.0, 1.0)])];

        let analysis = analyze_property(&five, &ten, &places);

        assert_eq!(analysis.summary.band(DriveBand::FiveMinutes).get(Category::Parks), 1);
        assert_eq!(analysis.summary.band(DriveBand::TenMinutes).total(), 0);
    }

    #[test]
    fn test_multiple_band_polygons_all_drawn() {
        let five = vec![square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)];
        let ten = vec![square(-1.0, -1.0, 10.0)];
        let places = vec![(Category::Clinics, vec![place("c1", 5.5, 5.5)])];

        let analysis = analyze_property(&five, &ten, &places);

        assert_eq!(analysis.features.len(), 4);
        assert_eq!(
            analysis.features[1].property("category"),
            Some(&json!("5_minutes_drive_area"))
        );
        assert_eq!(analysis.features[2].property("category"), Some(&json!("Clinics")));
        assert_eq!(analysis.summary.band(DriveBand::TenMinutes).total(), 0);
    }
}
