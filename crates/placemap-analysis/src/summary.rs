//! Natural-language amenity summaries

use std::collections::BTreeMap;
use std::fmt;

use crate::category::{Category, DriveBand};

/// Summary returned when no band contains any amenity
pub const NO_AMENITIES: &str = "No nearby amenities found within the specified distances.";

/// Per-category place counts for one band
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: BTreeMap<Category, usize>,
}

impl CategoryCounts {
    /// Add `count` places to `category`
    pub fn add(&mut self, category: Category, count: usize) {
        *self.counts.entry(category).or_default() += count;
    }

    /// Places counted for `category`
    pub fn get(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Places counted across all categories
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// "{n} {noun}" for every nonzero category, in category order
    pub fn parts(&self) -> Vec<String> {
        Category::ALL
            .iter()
            .filter_map(|category| match self.get(*category) {
                0 => None,
                n => Some(category.count_phrase(n)),
            })
            .collect()
    }
}

/// Amenity counts for both drive-time bands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmenitySummary {
    bands: BTreeMap<DriveBand, CategoryCounts>,
}

impl AmenitySummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` places of `category` to `band`
    pub fn add(&mut self, band: DriveBand, category: Category, count: usize) {
        self.bands.entry(band).or_default().add(category, count);
    }

    /// Counts for one band
    pub fn band(&self, band: DriveBand) -> CategoryCounts {
        self.bands.get(&band).cloned().unwrap_or_default()
    }

    /// Places counted across both bands
    pub fn total(&self) -> usize {
        self.bands.values().map(CategoryCounts::total).sum()
    }

    fn band_sentence(band: DriveBand, counts: &CategoryCounts) -> String {
        format!(
            "Within {} minutes drive: {} amenities ({})",
            band.minutes(),
            counts.total(),
            counts.parts().join(", ")
        )
    }
}

impl fmt::Display for AmenitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sentences: Vec<String> = DriveBand::ALL
            .iter()
            .filter_map(|band| {
                self.bands
                    .get(band)
                    .filter(|counts| counts.total() > 0)
                    .map(|counts| Self::band_sentence(*band, counts))
            })
            .collect();

        if sentences.is_empty() {
            f.write_str(NO_AMENITIES)
        } else {
            write!(f, "{}.", sentences.join(". "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        assert_eq!(AmenitySummary::new().to_string(), NO_AMENITIES);

        let mut zero = AmenitySummary::new();
        zero.add(DriveBand::FiveMinutes, Category::Schools, 0);
        assert_eq!(zero.to_string(), NO_AMENITIES);
    }

    #[test]
    fn test_singular_and_plural() {
        let mut summary = AmenitySummary::new();
        summary.add(DriveBand::FiveMinutes, Category::Schools, 1);
        summary.add(DriveBand::FiveMinutes, Category::Parks, 2);

        assert_eq!(
            summary.to_string(),
            "Within 5 minutes drive: 3 amenities (1 school, 2 parks)."
        );
    }

    #[test]
    fn test_zero_categories_omitted_and_order_kept() {
        let mut summary = AmenitySummary::new();
        summary.add(DriveBand::TenMinutes, Category::Restaurants, 4);
        summary.add(DriveBand::TenMinutes, Category::Hospitals, 0);
        summary.add(DriveBand::TenMinutes, Category::GroceryStores, 1);

        assert_eq!(
            summary.to_string(),
            "Within 10 minutes drive: 5 amenities (1 grocery store, 4 restaurants)."
        );
    }

    #[test]
    fn test_two_bands_two_sentences() {
        let mut summary = AmenitySummary::new();
        summary.add(DriveBand::TenMinutes, Category::Schools, 1);
        summary.add(DriveBand::FiveMinutes, Category::Schools, 1);

        assert_eq!(
            summary.to_string(),
            "Within 5 minutes drive: 1 amenities (1 school). \
             Within 10 minutes drive: 1 amenities (1 school)."
        );
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.band(DriveBand::FiveMinutes).get(Category::Schools), 1);
    }

    #[test]
    fn test_category_counts() {
        let mut counts = CategoryCounts::default();
        counts.add(Category::Gyms, 2);
        counts.add(Category::Gyms, 1);

        assert_eq!(counts.get(Category::Gyms), 3);
        assert_eq!(counts.get(Category::Clinics), 0);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.parts(), vec!["3 gyms".to_string()]);
    }
}
