//! Greedy multi-location quantity allocation.
//!
//! When one location cannot satisfy a requested quantity on its own, the
//! remainder spills over to other locations holding the SKU. The overflow
//! order is fixed: ascending by current quantity (ties by location code),
//! so low-stock locations are depleted first and remaining stock
//! consolidates into fewer locations. The allocator is a pure read over a
//! location snapshot; it never mutates stock.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockdeck_core::{LocationCode, SkuCode};

use crate::aggregate::LocationStock;

/// A request to source `requested_quantity` units of one SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub sku_code: SkuCode,
    pub requested_quantity: u32,
    pub preferred_location_code: LocationCode,
}

/// One location's share of an allocation. Quantity is always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub location_code: LocationCode,
    pub quantity: u32,
}

/// Outcome of an allocation run.
///
/// A positive `remainder` signals an unsatisfiable request. That is not an
/// error: it is a normal result the caller inspects and decides how to
/// present (block, warn, or allow partial fulfillment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub allocations: Vec<Allocation>,
    pub remainder: u32,
}

impl AllocationResult {
    pub fn fully_satisfied(&self) -> bool {
        self.remainder == 0
    }

    pub fn allocated_quantity(&self) -> u64 {
        self.allocations.iter().map(|a| u64::from(a.quantity)).sum()
    }
}

/// Split `request.requested_quantity` across `locations`.
///
/// The preferred location is drawn down first; overflow walks the other
/// locations in ascending-quantity order. The snapshot is re-sorted
/// locally so the policy holds regardless of the caller's array ordering.
/// Invariant: allocated + remainder == requested.
pub fn allocate(request: &AllocationRequest, locations: &[LocationStock]) -> AllocationResult {
    let mut allocations = Vec::new();
    let mut remaining = request.requested_quantity;

    let at_preferred = locations
        .iter()
        .filter(|l| l.location_code == request.preferred_location_code)
        .fold(0u32, |acc, l| acc.saturating_add(l.quantity));
    let take = remaining.min(at_preferred);
    if take > 0 {
        allocations.push(Allocation {
            location_code: request.preferred_location_code.clone(),
            quantity: take,
        });
        remaining -= take;
    }

    // Duplicate location entries in the snapshot merge before the walk;
    // a location never appears twice in the result.
    let mut merged: BTreeMap<&LocationCode, u32> = BTreeMap::new();
    for location in locations {
        if location.location_code == request.preferred_location_code {
            continue;
        }
        let entry = merged.entry(&location.location_code).or_default();
        *entry = entry.saturating_add(location.quantity);
    }
    let mut overflow: Vec<(&LocationCode, u32)> = merged.into_iter().collect();
    overflow.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));

    for (location_code, quantity) in overflow {
        if remaining == 0 {
            break;
        }
        if quantity == 0 {
            continue;
        }
        let take = remaining.min(quantity);
        allocations.push(Allocation {
            location_code: location_code.clone(),
            quantity: take,
        });
        remaining -= take;
    }

    AllocationResult {
        allocations,
        remainder: remaining,
    }
}
