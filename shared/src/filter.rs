//! Filter evaluator

use crate::models::{FilterState, InventoryRecord};

/// Records satisfying every active constraint of `filter`, in input order.
/// The empty filter returns a copy of the input.
pub fn evaluate(records: &[InventoryRecord], filter: &FilterState) -> Vec<InventoryRecord> {
    if filter.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

/// Borrowing variant of [`evaluate`] for callers that only aggregate
pub fn evaluate_refs<'a>(
    records: &'a [InventoryRecord],
    filter: &FilterState,
) -> Vec<&'a InventoryRecord> {
    records.iter().filter(|record| filter.matches(record)).collect()
}
