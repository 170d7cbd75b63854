//! Mutual-constraint faceted filtering.
//!
//! One [`FacetState`] value replaces the scattered per-facet selection
//! flags the UI would otherwise juggle: multi-select value facets (OR
//! within a facet, AND across facets) plus two inclusive numeric count
//! ranges that constrain product aggregates. Option lists for a facet are
//! computed with that facet's own selection excluded, so a chosen value
//! never disappears from its own list.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::aggregate::ProductAggregate;
use crate::record::StockRecord;

/// One filterable dimension of a stock record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    ProductCode,
    Color,
    Size,
    Quantity,
    LocationCode,
    Category,
}

impl Facet {
    pub const ALL: [Facet; 6] = [
        Facet::ProductCode,
        Facet::Color,
        Facet::Size,
        Facet::Quantity,
        Facet::LocationCode,
        Facet::Category,
    ];

    /// The record's derived value for this facet.
    pub fn value_of<'a>(self, record: &'a StockRecord) -> Cow<'a, str> {
        match self {
            Facet::ProductCode => Cow::Borrowed(record.product_code.as_str()),
            Facet::Color => Cow::Borrowed(record.color.as_str()),
            Facet::Size => Cow::Borrowed(record.size.as_str()),
            Facet::Quantity => Cow::Owned(record.quantity.to_string()),
            Facet::LocationCode => Cow::Borrowed(record.location_code.as_str()),
            Facet::Category => Cow::Borrowed(record.category.as_str()),
        }
    }

    /// Quantity is the only facet whose options sort numerically.
    fn is_numeric(self) -> bool {
        matches!(self, Facet::Quantity)
    }
}

/// Inclusive numeric range; an absent bound leaves that side unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl CountRange {
    pub fn new(min: Option<u64>, max: Option<u64>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: u64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// The complete filter state of one browsing session.
///
/// Lives only in session scope; [`FacetState::clear`] resets every facet
/// simultaneously so observers see a single consistent empty state rather
/// than transient partial clears.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetState {
    selections: BTreeMap<Facet, BTreeSet<String>>,
    pub sku_count_range: CountRange,
    pub color_count_range: CountRange,
}

impl FacetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
            && self.sku_count_range.is_unbounded()
            && self.color_count_range.is_unbounded()
    }

    /// The active selection for a facet, if any value is selected.
    pub fn selection(&self, facet: Facet) -> Option<&BTreeSet<String>> {
        self.selections.get(&facet).filter(|set| !set.is_empty())
    }

    pub fn is_selected(&self, facet: Facet, value: &str) -> bool {
        self.selection(facet).is_some_and(|set| set.contains(value))
    }

    /// Toggle one value in one facet: present → removed, absent → added.
    /// Never touches any other facet's selection set.
    pub fn toggle(&mut self, facet: Facet, value: impl Into<String>) {
        let value = value.into();
        let set = self.selections.entry(facet).or_default();
        if !set.remove(&value) {
            set.insert(value);
        }
        if set.is_empty() {
            self.selections.remove(&facet);
        }
    }

    /// Empty every facet key and both count ranges atomically.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// A record passes iff, for every facet with a non-empty selection,
    /// its derived value is a member of the selection set.
    pub fn passes(&self, record: &StockRecord) -> bool {
        self.selections
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .all(|(facet, set)| set.contains(facet.value_of(record).as_ref()))
    }

    /// Count-range check against a product aggregate.
    pub fn product_passes(&self, aggregate: &ProductAggregate) -> bool {
        self.sku_count_range
            .contains(aggregate.distinct_sku_count as u64)
            && self
                .color_count_range
                .contains(aggregate.distinct_color_count as u64)
    }

    /// A copy of this state with one facet's selection removed, used for
    /// self-exclusion when computing that facet's option list.
    fn without(&self, facet: Facet) -> Self {
        let mut state = self.clone();
        state.selections.remove(&facet);
        state
    }
}

/// Records passing all value facets of `state`.
pub fn filter(records: &[StockRecord], state: &FacetState) -> Vec<StockRecord> {
    records
        .iter()
        .filter(|record| state.passes(record))
        .cloned()
        .collect()
}

/// Remaining valid options for `facet`, with self-exclusion: every facet
/// *except* the queried one is applied, so values already chosen in
/// `facet` stay visible. Distinct non-empty values, sorted numerically for
/// the quantity facet and lexicographically for everything else.
pub fn compute_options(records: &[StockRecord], state: &FacetState, facet: Facet) -> Vec<String> {
    let scoped = state.without(facet);
    let mut values: BTreeSet<String> = BTreeSet::new();
    for record in records {
        if !scoped.passes(record) {
            continue;
        }
        let value = facet.value_of(record);
        if !value.is_empty() {
            values.insert(value.into_owned());
        }
    }

    let mut options: Vec<String> = values.into_iter().collect();
    if facet.is_numeric() {
        options.sort_by_key(|v| v.parse::<u64>().unwrap_or(u64::MAX));
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RawStockEntry, normalize_entry};

    fn record(sku: &str, location: &str, quantity: i64) -> StockRecord {
        normalize_entry(RawStockEntry {
            sku_code: sku.to_string(),
            location_code: location.to_string(),
            quantity,
            ..RawStockEntry::default()
        })
    }

    fn sample() -> Vec<StockRecord> {
        vec![
            record("P1-红色-S", "L1", 2),
            record("P1-红色-M", "L2", 5),
            record("P1-白色-M", "L2", 3),
            record("P2-黑色-L", "L3", 7),
        ]
    }

    #[test]
    fn empty_state_passes_everything() {
        let state = FacetState::new();
        assert_eq!(filter(&sample(), &state).len(), 4);
    }

    #[test]
    fn facets_combine_with_and_values_with_or() {
        let mut state = FacetState::new();
        state.toggle(Facet::Color, "红色");
        state.toggle(Facet::Color, "白色");
        state.toggle(Facet::Size, "M");

        let filtered = filter(&sample(), &state);
        let skus: Vec<&str> = filtered.iter().map(|r| r.sku_code.as_str()).collect();
        assert_eq!(skus, vec!["P1-红色-M", "P1-白色-M"]);
    }

    #[test]
    fn toggle_is_symmetric_and_isolated_per_facet() {
        let mut state = FacetState::new();
        state.toggle(Facet::Color, "红色");
        state.toggle(Facet::Size, "M");
        assert!(state.is_selected(Facet::Color, "红色"));

        state.toggle(Facet::Color, "红色");
        assert!(!state.is_selected(Facet::Color, "红色"));
        assert!(state.selection(Facet::Color).is_none());
        // The other facet is untouched.
        assert!(state.is_selected(Facet::Size, "M"));
    }

    #[test]
    fn size_options_follow_color_selection() {
        // Scenario: color narrowed to 红色 constrains size options to
        // sizes existing in 红色 records, regardless of any size choice.
        let mut state = FacetState::new();
        state.toggle(Facet::Color, "红色");
        state.toggle(Facet::Size, "L");

        let options = compute_options(&sample(), &state, Facet::Size);
        assert_eq!(options, vec!["M", "S"]);
    }

    #[test]
    fn own_selection_never_narrows_own_options() {
        let records = sample();
        let mut state = FacetState::new();
        state.toggle(Facet::Color, "红色");
        let before = compute_options(&records, &state, Facet::Color);

        state.toggle(Facet::Color, "白色");
        let after = compute_options(&records, &state, Facet::Color);
        assert_eq!(before, after);
    }

    #[test]
    fn quantity_options_sort_numerically() {
        let records = vec![
            record("P1-红色-S", "L1", 12),
            record("P1-红色-M", "L2", 3),
            record("P1-红色-L", "L3", 100),
        ];
        let options = compute_options(&records, &FacetState::new(), Facet::Quantity);
        assert_eq!(options, vec!["3", "12", "100"]);
    }

    #[test]
    fn category_options_skip_empty_values() {
        let records = sample();
        let options = compute_options(&records, &FacetState::new(), Facet::Category);
        assert!(options.is_empty());
    }

    #[test]
    fn count_ranges_gate_product_aggregates() {
        let aggregate = ProductAggregate {
            product_code: "P1".into(),
            total_quantity: 10,
            distinct_sku_count: 3,
            distinct_color_count: 2,
            distinct_location_count: 2,
        };

        let mut state = FacetState::new();
        assert!(state.product_passes(&aggregate));

        state.sku_count_range = CountRange::new(Some(4), None);
        assert!(!state.product_passes(&aggregate));

        state.sku_count_range = CountRange::new(Some(2), Some(3));
        state.color_count_range = CountRange::new(None, Some(2));
        assert!(state.product_passes(&aggregate));
    }

    #[test]
    fn clear_resets_all_facets_and_ranges_at_once() {
        let mut state = FacetState::new();
        state.toggle(Facet::Color, "红色");
        state.toggle(Facet::LocationCode, "L1");
        state.sku_count_range = CountRange::new(Some(1), None);
        assert!(!state.is_empty());

        state.clear();
        assert!(state.is_empty());
        assert_eq!(state, FacetState::new());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_records() -> impl Strategy<Value = Vec<StockRecord>> {
            proptest::collection::vec(
                ("P[1-3]", "[A-C]", "[SML]", "L[1-3]", 0i64..9).prop_map(
                    |(product, color, size, location, qty)| {
                        record(&format!("{product}-{color}-{size}"), &location, qty)
                    },
                ),
                0..30,
            )
        }

        fn arb_state() -> impl Strategy<Value = FacetState> {
            proptest::collection::vec(
                (0usize..Facet::ALL.len(), "[A-C]|[SML]|L[1-3]"),
                0..6,
            )
            .prop_map(|picks| {
                let mut state = FacetState::new();
                for (index, value) in picks {
                    state.toggle(Facet::ALL[index], value);
                }
                state
            })
        }

        proptest! {
            /// Property: option lists for a facet are independent of that
            /// facet's own selection contents.
            #[test]
            fn options_ignore_own_selection(
                records in arb_records(),
                state in arb_state(),
                extra in "[A-C]",
            ) {
                for facet in Facet::ALL {
                    let before = compute_options(&records, &state, facet);
                    let mut toggled = state.clone();
                    toggled.toggle(facet, extra.clone());
                    let after = compute_options(&records, &toggled, facet);
                    prop_assert_eq!(before, after);
                }
            }

            /// Property: filtering is monotone, adding a selection to a
            /// previously unconstrained facet never grows the result.
            #[test]
            fn narrowing_never_grows_results(
                records in arb_records(),
                state in arb_state(),
                value in "[A-C]",
            ) {
                let base = filter(&records, &state).len();
                if state.selection(Facet::Color).is_none() {
                    let mut narrowed = state.clone();
                    narrowed.toggle(Facet::Color, value);
                    prop_assert!(filter(&records, &narrowed).len() <= base);
                }
            }
        }
    }
}
