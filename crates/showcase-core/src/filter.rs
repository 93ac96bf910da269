//! Category filter engine.
//!
//! Pure and O(n): `"all"` keeps every record, any other slug keeps the
//! records tagged with it in their original relative order. Slugs are not
//! validated here; an unknown slug simply matches nothing.

use crate::record::ProjectRecord;

/// Slug of the pseudo-category that disables filtering.
pub const ALL_CATEGORY: &str = "all";

/// Selected category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Slug(String),
}

impl CategoryFilter {
    /// Interpret a slug as sent by a filter button. Empty means `"all"`.
    #[must_use]
    pub fn parse(slug: &str) -> Self {
        let slug = slug.trim();
        if slug.is_empty() || slug == ALL_CATEGORY {
            Self::All
        } else {
            Self::Slug(slug.to_owned())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORY,
            Self::Slug(slug) => slug,
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    #[must_use]
    pub fn matches(&self, record: &ProjectRecord) -> bool {
        match self {
            Self::All => true,
            Self::Slug(slug) => record.has_service_area(slug),
        }
    }
}

/// Positions in `records` that pass `filter`, ascending.
#[must_use]
pub fn filter_indices(records: &[ProjectRecord], filter: &CategoryFilter) -> Vec<usize> {
    if filter.is_all() {
        return (0..records.len()).collect();
    }
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| filter.matches(record))
        .map(|(idx, _)| idx)
        .collect()
}

/// Records that pass `filter`, borrowed from `records`, in original order.
#[must_use]
pub fn filter_records<'a>(
    records: &'a [ProjectRecord],
    filter: &CategoryFilter,
) -> Vec<&'a ProjectRecord> {
    records.iter().filter(|record| filter.matches(record)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;

    fn tagged(id: i64, areas: &[&str]) -> ProjectRecord {
        ProjectRecord::new(id, format!("Project {id}")).with_service_areas(areas.iter().copied())
    }

    fn ids(records: &[&ProjectRecord]) -> Vec<RecordId> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn parse_maps_all_and_empty_to_all() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("  "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("solar"),
            CategoryFilter::Slug("solar".into())
        );
        assert_eq!(CategoryFilter::parse("solar").as_str(), "solar");
        assert_eq!(CategoryFilter::All.as_str(), "all");
    }

    #[test]
    fn all_keeps_every_record() {
        let records = vec![tagged(1, &["a"]), tagged(2, &[]), tagged(3, &["b"])];
        let filtered = filter_records(&records, &CategoryFilter::All);
        assert_eq!(filtered.len(), 3);
        assert_eq!(filter_indices(&records, &CategoryFilter::All), vec![0, 1, 2]);
    }

    #[test]
    fn slug_keeps_tagged_records_in_order() {
        let records = vec![
            tagged(1, &["reforestation"]),
            tagged(2, &["carbon-capture"]),
            tagged(3, &["reforestation", "carbon-capture"]),
        ];
        let filter = CategoryFilter::parse("reforestation");
        assert_eq!(
            ids(&filter_records(&records, &filter)),
            vec![RecordId::Int(1), RecordId::Int(3)]
        );
        assert_eq!(filter_indices(&records, &filter), vec![0, 2]);
    }

    #[test]
    fn unknown_slug_matches_nothing() {
        let records = vec![tagged(1, &["a"])];
        let filter = CategoryFilter::parse("does-not-exist");
        assert!(filter_records(&records, &filter).is_empty());
    }
}
