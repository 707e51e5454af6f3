//! Ranking by impact and the small strings shown next to items.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use plank_core::model::item::WorkItem;
use serde::Serialize;

use crate::metrics::ItemMetrics;

/// Impact bucket for an [`ItemMetrics::impact_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ImpactLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Bucket an impact score: critical ≥ 50, high ≥ 25, medium ≥ 10.
#[must_use]
pub fn impact_level(score: f64) -> ImpactLevel {
    if score >= 50.0 {
        ImpactLevel::Critical
    } else if score >= 25.0 {
        ImpactLevel::High
    } else if score >= 10.0 {
        ImpactLevel::Medium
    } else {
        ImpactLevel::Low
    }
}

/// Ordering that puts the most impactful item first.
///
/// Impact score descending, then unblock count descending, then critical
/// path items before the rest.
#[must_use]
pub fn compare_impact(a: &ItemMetrics, b: &ItemMetrics) -> Ordering {
    b.impact_score
        .total_cmp(&a.impact_score)
        .then_with(|| b.unblock_count.cmp(&a.unblock_count))
        .then_with(|| b.is_critical_path.cmp(&a.is_critical_path))
}

/// Items sorted by [`compare_impact`]. The sort is stable, and items with
/// no entry in `metrics` rank as if every metric were zero.
#[must_use]
pub fn sort_by_impact<'a>(
    items: &'a [WorkItem],
    metrics: &HashMap<String, ItemMetrics>,
) -> Vec<&'a WorkItem> {
    let zero = ItemMetrics::default();
    let lookup = |item: &WorkItem| metrics.get(&item.id).unwrap_or(&zero);

    let mut sorted: Vec<&WorkItem> = items.iter().collect();
    sorted.sort_by(|a, b| compare_impact(lookup(*a), lookup(*b)));
    sorted
}

/// Badge text for an unblock count, `None` when there is nothing to show.
#[must_use]
pub fn format_unblock_badge(count: usize) -> Option<String> {
    match count {
        0 => None,
        1 => Some("Unblocks 1 item".to_string()),
        n => Some(format!("Unblocks {n} items")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(impact: f64, unblock: usize, critical: bool) -> ItemMetrics {
        ItemMetrics {
            impact_score: impact,
            unblock_count: unblock,
            is_critical_path: critical,
            ..ItemMetrics::default()
        }
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(impact_level(50.0), ImpactLevel::Critical);
        assert_eq!(impact_level(49.9), ImpactLevel::High);
        assert_eq!(impact_level(25.0), ImpactLevel::High);
        assert_eq!(impact_level(10.0), ImpactLevel::Medium);
        assert_eq!(impact_level(9.99), ImpactLevel::Low);
        assert_eq!(impact_level(0.0), ImpactLevel::Low);
        assert!(ImpactLevel::Critical > ImpactLevel::High);
        assert_eq!(ImpactLevel::High.to_string(), "high");
    }

    #[test]
    fn badge_wording() {
        assert_eq!(format_unblock_badge(0), None);
        assert_eq!(format_unblock_badge(1).as_deref(), Some("Unblocks 1 item"));
        assert_eq!(format_unblock_badge(7).as_deref(), Some("Unblocks 7 items"));
    }

    #[test]
    fn compare_uses_tie_breakers_in_order() {
        assert_eq!(
            compare_impact(&metrics(20.0, 0, false), &metrics(10.0, 9, true)),
            Ordering::Less
        );
        assert_eq!(
            compare_impact(&metrics(10.0, 2, false), &metrics(10.0, 1, true)),
            Ordering::Less
        );
        assert_eq!(
            compare_impact(&metrics(10.0, 1, true), &metrics(10.0, 1, false)),
            Ordering::Less
        );
        assert_eq!(
            compare_impact(&metrics(10.0, 1, true), &metrics(10.0, 1, true)),
            Ordering::Equal
        );
    }

    #[test]
    fn sort_is_stable_and_tolerates_missing_metrics() {
        let items = vec![
            WorkItem::new("none-1", "no metrics"),
            WorkItem::new("low", "low"),
            WorkItem::new("high", "high"),
            WorkItem::new("none-2", "no metrics"),
        ];
        let mut map = HashMap::new();
        map.insert("low".to_string(), metrics(5.0, 0, false));
        map.insert("high".to_string(), metrics(60.0, 3, true));

        let ids: Vec<&str> = sort_by_impact(&items, &map)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, ["high", "low", "none-1", "none-2"]);
    }
}
