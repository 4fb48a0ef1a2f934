//! Filter evaluator tests
//!
//! Tests for record filtering including:
//! - Every returned record satisfies all active constraints
//! - The empty filter is the identity
//! - Date bounds are inclusive; undated records fail them unless admitted

mod common;

use common::*;
use proptest::prelude::*;
use shared::filter::{evaluate, evaluate_refs};
use shared::{AbcClass, DateBounds, FilterState, Selection};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn sample() -> Vec<shared::InventoryRecord> {
        let mut bolt = record("I1", "Fasteners", "2024-01-01", 100, 80, 30);
        bolt.item_name = "Hex Bolt M8".to_string();
        let mut oil = record("I2", "Lubricants", "2024-01-15", 20, 20, 0);
        oil.item_name = "Gear Oil".to_string();
        oil.abc_class = AbcClass::B;
        let mut nut = record("I3", "Fasteners", "2024-02-01", 50, 45, 5);
        nut.item_name = "hex nut".to_string();
        nut.abc_class = AbcClass::C;
        vec![bolt, oil, nut]
    }

    #[test]
    fn test_item_name_is_case_insensitive_substring() {
        let filter = FilterState {
            item_name: "HEX".to_string(),
            ..FilterState::cleared()
        };
        let ids: Vec<_> = evaluate(&sample(), &filter)
            .into_iter()
            .map(|r| r.item_id)
            .collect();
        assert_eq!(ids, vec!["I1", "I3"]);
    }

    #[test]
    fn test_class_and_category_conjunction() {
        let filter = FilterState {
            abc_class: Selection::Only(AbcClass::C),
            category: Selection::Only("Fasteners".to_string()),
            ..FilterState::cleared()
        };
        let result = evaluate(&sample(), &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item_id, "I3");
    }

    #[test]
    fn test_category_match_is_exact() {
        let filter = FilterState {
            category: Selection::Only("fasteners".to_string()),
            ..FilterState::cleared()
        };
        assert!(evaluate(&sample(), &filter).is_empty());
    }

    #[test]
    fn test_date_bounds_inclusive() {
        let filter = FilterState {
            date_range: DateBounds::new(Some(date("2024-01-01")), Some(date("2024-01-15"))),
            ..FilterState::cleared()
        };
        assert_eq!(evaluate(&sample(), &filter).len(), 2);

        let open_ended = FilterState {
            date_range: DateBounds::new(Some(date("2024-01-15")), None),
            ..FilterState::cleared()
        };
        assert_eq!(evaluate(&sample(), &open_ended).len(), 2);
    }

    #[test]
    fn test_undated_records_fail_active_bounds() {
        let mut records = sample();
        records[1].date = None;

        let bounded = FilterState {
            date_range: DateBounds::new(None, Some(date("2024-12-31"))),
            ..FilterState::cleared()
        };
        assert_eq!(evaluate(&records, &bounded).len(), 2);
        assert_eq!(evaluate(&records, &FilterState::cleared()).len(), 3);
    }

    #[test]
    fn test_undated_records_pass_when_admitted() {
        let mut records = sample();
        records[1].date = None;

        let bounded = FilterState {
            date_range: DateBounds::new(Some(date("2024-01-01")), Some(date("2024-12-31")))
                .with_undated(true),
            ..FilterState::cleared()
        };
        let result = evaluate(&records, &bounded);
        assert_eq!(result.len(), 3);
        assert!(result[1].date.is_none());
    }

    #[test]
    fn test_filter_state_json_uses_all_sentinel() {
        let filter: FilterState = serde_json::from_str(
            r#"{"itemName": "", "abcClass": "all", "category": "Tools",
                "dateRange": {"from": "2024-01-01T00:00:00.000Z", "to": null}}"#,
        )
        .unwrap();
        assert!(filter.abc_class.is_all());
        assert_eq!(filter.category, Selection::Only("Tools".to_string()));
        assert_eq!(filter.date_range.from, Some(date("2024-01-01")));
        assert_eq!(filter.date_range.to, None);

        let json = serde_json::to_value(&FilterState::cleared()).unwrap();
        assert_eq!(json["abcClass"], "all");
        assert_eq!(json["category"], "all");
    }

    #[test]
    fn test_invalid_class_in_json_is_rejected() {
        let result: Result<FilterState, _> = serde_json::from_str(r#"{"abcClass": "Z"}"#);
        assert!(result.is_err());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn filter_strategy() -> impl Strategy<Value = FilterState> {
        (
            prop::sample::select(vec!["", "hex", "OIL", "bit", "zz"]),
            prop_oneof![Just(Selection::All), abc_strategy().prop_map(Selection::Only)],
            prop_oneof![
                Just(Selection::All),
                prop::sample::select(vec!["Fasteners", "Tools", "Unknown"])
                    .prop_map(|c| Selection::Only(c.to_string())),
            ],
            date_strategy(),
            date_strategy(),
            any::<bool>(),
        )
            .prop_map(|(item_name, abc_class, category, from, to, include_undated)| FilterState {
                item_name: item_name.to_string(),
                abc_class,
                category,
                date_range: DateBounds::new(from, to).with_undated(include_undated),
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The result is a subsequence of the input and every element matches
        #[test]
        fn prop_filter_returns_matching_subset(
            records in records_strategy(),
            filter in filter_strategy(),
        ) {
            let result = evaluate(&records, &filter);
            prop_assert!(result.len() <= records.len());

            for r in &result {
                if !filter.item_name.is_empty() {
                    prop_assert!(r.item_name.to_lowercase().contains(&filter.item_name.to_lowercase()));
                }
                prop_assert!(filter.abc_class.matches(&r.abc_class));
                prop_assert!(filter.category.matches(&r.category));
                let undated_ok = filter.date_range.include_undated;
                if let Some(from) = filter.date_range.from {
                    prop_assert!(r.date.map_or(undated_ok, |d| d >= from));
                }
                if let Some(to) = filter.date_range.to {
                    prop_assert!(r.date.map_or(undated_ok, |d| d <= to));
                }
            }

            // Order preserved: the result is a subsequence of the input
            let mut remaining = records.iter();
            for r in &result {
                prop_assert!(remaining.any(|candidate| candidate == r));
            }

            // Nothing matching was dropped
            let expected = records.iter().filter(|r| filter.matches(r)).count();
            prop_assert_eq!(result.len(), expected);
        }

        /// The cleared filter returns the input unchanged
        #[test]
        fn prop_empty_filter_is_identity(records in records_strategy()) {
            let filter = FilterState::cleared();
            prop_assert!(filter.is_empty());
            prop_assert_eq!(evaluate(&records, &filter), records.clone());
            prop_assert_eq!(evaluate_refs(&records, &filter).len(), records.len());
        }
    }
}
