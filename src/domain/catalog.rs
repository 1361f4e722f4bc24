//! Search, filtering and summary statistics over the loaded boxes.

use super::category::CategoryFilter;
use super::subscription::SubscriptionBox;

/// Search term plus category filter applied to the list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxQuery {
    pub search: String,
    pub category: CategoryFilter,
}

impl BoxQuery {
    /// Case-insensitive substring match on name or description, combined
    /// with the category filter.
    #[must_use]
    pub fn matches(&self, sub: &SubscriptionBox) -> bool {
        let term = self.search.to_lowercase();
        let matches_search = sub.name.to_lowercase().contains(&term)
            || sub.description.to_lowercase().contains(&term);
        matches_search && self.category.matches(sub.category)
    }

    /// Filter preserving the input order.
    #[must_use]
    pub fn apply<'a>(&self, subs: &'a [SubscriptionBox]) -> Vec<&'a SubscriptionBox> {
        subs.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Aggregate figures shown above the list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubscriptionStats {
    pub total: usize,
    pub verified: usize,
    /// Mean of the verified cleartext preferences (0 when none are verified)
    pub avg_preference: f64,
}

impl SubscriptionStats {
    #[must_use]
    pub fn from_boxes(subs: &[SubscriptionBox]) -> Self {
        let verified: Vec<u32> = subs.iter().filter_map(SubscriptionBox::verified_preference).collect();
        let avg_preference = if verified.is_empty() {
            0.0
        } else {
            verified.iter().map(|&v| f64::from(v)).sum::<f64>() / verified.len() as f64
        };

        Self {
            total: subs.len(),
            verified: verified.len(),
            avg_preference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, BusinessData, Category};

    fn sample() -> Vec<SubscriptionBox> {
        let mk = |id: &str, name: &str, desc: &str, code: u64, verified: bool, value: u32| {
            SubscriptionBox::from_contract(
                id,
                BusinessData {
                    name: name.into(),
                    public_value1: code,
                    public_value2: 0,
                    description: desc.into(),
                    creator: Address::derive(id),
                    timestamp: 1_700_000_000,
                    is_verified: verified,
                    decrypted_value: value,
                },
            )
        };

        vec![
            mk("a", "Gadget Crate", "Chargers and cables", 0, true, 80),
            mk("b", "Page Turners", "Mystery novels", 2, false, 0),
            mk("c", "Snack Attack", "Sweet and salty GADGET-free treats", 3, true, 40),
            mk("d", "Trail Kit", "Outdoor sports gear", 5, false, 0),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_and_description() {
        let subs = sample();
        let query = BoxQuery {
            search: "gadget".into(),
            category: CategoryFilter::All,
        };
        let ids: Vec<&str> = query.apply(&subs).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_filter_is_conjunctive_subset() {
        let subs = sample();
        let terms = ["", "a", "MYSTERY", "gear", "zzz", "t"];
        let filters = std::iter::once(CategoryFilter::All)
            .chain(Category::ALL.iter().map(|&c| CategoryFilter::Only(c)));

        for filter in filters {
            for term in terms {
                let query = BoxQuery {
                    search: term.into(),
                    category: filter,
                };
                let out = query.apply(&subs);
                assert!(out.len() <= subs.len());
                for s in out {
                    assert!(subs.iter().any(|x| x == s));
                    assert!(filter.matches(s.category));
                    let t = term.to_lowercase();
                    assert!(
                        s.name.to_lowercase().contains(&t)
                            || s.description.to_lowercase().contains(&t)
                    );
                }
            }
        }
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let subs = sample();
        assert_eq!(BoxQuery::default().apply(&subs).len(), subs.len());
    }

    #[test]
    fn test_category_filter() {
        let subs = sample();
        let query = BoxQuery {
            search: String::new(),
            category: CategoryFilter::Only(Category::Sports),
        };
        let out = query.apply(&subs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "d");
    }

    #[test]
    fn test_stats() {
        let stats = SubscriptionStats::from_boxes(&sample());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.verified, 2);
        assert!((stats.avg_preference - 60.0).abs() < f64::EPSILON);

        let empty = SubscriptionStats::from_boxes(&[]);
        assert_eq!(empty, SubscriptionStats::default());
    }
}
