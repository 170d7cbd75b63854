//! Browsing session: validation → API call → reconciliation.
//!
//! Local state changes only after the server confirms; there is no
//! optimistic pre-apply. All derived views are served by the underlying
//! [`RecordStore`] and recomputed from the record set on every change.

use stockdeck_core::{DomainError, LocationCode, SkuCode};
use stockdeck_engine::{
    AllocationRequest, AllocationResult, RecordStore, StockPatch, allocate, normalize,
};

use crate::api::InventoryApi;
use crate::convert;
use crate::dto::{
    AdjustStockRequest, InboundStockRequest, MutationResponse, OutboundStockRequest, ProductQuery,
    TransferStockRequest,
};
use crate::error::ClientResult;

/// One user's inventory browsing/mutation session.
pub struct StockSession<A: InventoryApi> {
    api: A,
    store: RecordStore,
}

impl<A: InventoryApi> StockSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            store: RecordStore::new(),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Mutable access for the memoized projections (`filtered`,
    /// `product_aggregates`).
    pub fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }

    /// Fetch the location-centric snapshot and apply it.
    ///
    /// Returns `false` when the response was stale (a newer fetch already
    /// landed) and was discarded.
    pub async fn refresh(&mut self) -> ClientResult<bool> {
        let token = self.store.begin_fetch();
        let payload = self.api.get_location_inventory().await?;
        let records = normalize(convert::location_inventory_entries(&payload));
        Ok(self.store.apply_snapshot(token, records))
    }

    /// Fetch the product-centric snapshot and apply it.
    pub async fn refresh_products(&mut self, query: &ProductQuery) -> ClientResult<bool> {
        let token = self.store.begin_fetch();
        let payload = self.api.get_aggregated_products(query).await?;
        let records = normalize(convert::aggregated_product_entries(&payload));
        Ok(self.store.apply_snapshot(token, records))
    }

    /// Set one (SKU, location) pair to an absolute target quantity.
    /// A target of zero is a valid way to empty a location.
    pub async fn adjust(
        &mut self,
        sku_code: &SkuCode,
        location_code: &LocationCode,
        target_quantity: u32,
    ) -> ClientResult<MutationResponse> {
        require_codes(sku_code, location_code)?;
        let request = AdjustStockRequest {
            sku_code: sku_code.to_string(),
            location_code: location_code.to_string(),
            target_quantity,
        };
        let response = self.api.adjust_stock(&request).await?;
        self.reconcile(sku_code, location_code, &response);
        Ok(response)
    }

    pub async fn inbound(
        &mut self,
        sku_code: &SkuCode,
        location_code: &LocationCode,
        quantity: u32,
    ) -> ClientResult<MutationResponse> {
        require_codes(sku_code, location_code)?;
        require_positive(quantity, "inbound_quantity")?;
        let request = InboundStockRequest {
            sku_code: sku_code.to_string(),
            location_code: location_code.to_string(),
            inbound_quantity: quantity,
        };
        let response = self.api.inbound_stock(&request).await?;
        self.reconcile(sku_code, location_code, &response);
        Ok(response)
    }

    pub async fn outbound(
        &mut self,
        sku_code: &SkuCode,
        location_code: &LocationCode,
        quantity: u32,
    ) -> ClientResult<MutationResponse> {
        require_codes(sku_code, location_code)?;
        require_positive(quantity, "outbound_quantity")?;
        let request = OutboundStockRequest {
            sku_code: sku_code.to_string(),
            location_code: location_code.to_string(),
            outbound_quantity: quantity,
        };
        let response = self.api.outbound_stock(&request).await?;
        self.reconcile(sku_code, location_code, &response);
        Ok(response)
    }

    /// Move quantity between two locations of one SKU.
    ///
    /// The wire contract only returns destination-side absolutes, so the
    /// destination is patched directly and a snapshot refresh reconciles
    /// the source side; a locally computed source delta is never applied.
    pub async fn transfer(
        &mut self,
        sku_code: &SkuCode,
        from_location_code: &LocationCode,
        to_location_code: &LocationCode,
        quantity: u32,
    ) -> ClientResult<MutationResponse> {
        require_codes(sku_code, from_location_code)?;
        require_codes(sku_code, to_location_code)?;
        require_positive(quantity, "transfer_quantity")?;
        if from_location_code == to_location_code {
            return Err(
                DomainError::validation("transfer source and destination must differ").into(),
            );
        }

        let request = TransferStockRequest {
            sku_code: sku_code.to_string(),
            from_location_code: from_location_code.to_string(),
            to_location_code: to_location_code.to_string(),
            transfer_quantity: quantity,
        };
        let response = self.api.transfer_stock(&request).await?;
        self.reconcile(sku_code, to_location_code, &response);
        self.refresh().await?;
        Ok(response)
    }

    /// Plan how a requested quantity would split across locations holding
    /// the SKU. Pure read over the current snapshot; callers inspect
    /// `remainder` to decide how to present a shortfall.
    pub fn plan_allocation(
        &self,
        sku_code: &SkuCode,
        requested_quantity: u32,
        preferred_location_code: &LocationCode,
    ) -> AllocationResult {
        let locations = self
            .store
            .sku_aggregate(sku_code)
            .map(|sku| sku.locations)
            .unwrap_or_default();
        allocate(
            &AllocationRequest {
                sku_code: sku_code.clone(),
                requested_quantity,
                preferred_location_code: preferred_location_code.clone(),
            },
            &locations,
        )
    }

    fn reconcile(
        &mut self,
        sku_code: &SkuCode,
        location_code: &LocationCode,
        response: &MutationResponse,
    ) {
        self.store.apply_patch(&StockPatch {
            sku_code: sku_code.clone(),
            location_code: location_code.clone(),
            quantity: absolute_quantity(response.sku_location_quantity),
        });
    }
}

fn require_codes(sku_code: &SkuCode, location_code: &LocationCode) -> Result<(), DomainError> {
    if sku_code.is_blank() {
        return Err(DomainError::validation("sku_code is required"));
    }
    if location_code.is_blank() {
        return Err(DomainError::validation("location_code is required"));
    }
    Ok(())
}

fn require_positive(quantity: u32, field: &str) -> Result<(), DomainError> {
    if quantity == 0 {
        return Err(DomainError::validation(format!("{field} must be positive")));
    }
    Ok(())
}

fn absolute_quantity(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::dto::{AggregatedProducts, LocationInventory, LocationItem};
    use crate::error::{ClientError, ClientResult};
    use stockdeck_engine::FacetState;

    #[derive(Default)]
    struct MockApi {
        snapshots: Mutex<VecDeque<Vec<LocationInventory>>>,
        responses: Mutex<VecDeque<MutationResponse>>,
        fail_status: Mutex<Option<u16>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockApi {
        fn queue_snapshot(&self, payload: Vec<LocationInventory>) {
            self.snapshots.lock().unwrap().push_back(payload);
        }

        fn queue_response(&self, response: MutationResponse) {
            self.responses.lock().unwrap().push_back(response);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn mutate(&self, name: &str) -> ClientResult<MutationResponse> {
            self.calls.lock().unwrap().push(name.to_string());
            if let Some(status) = *self.fail_status.lock().unwrap() {
                return Err(ClientError::Api {
                    status,
                    message: "backend rejected".to_string(),
                });
            }
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(MutationResponse {
                    sku_location_quantity: 0,
                    sku_total_quantity: 0,
                }))
        }
    }

    impl InventoryApi for &MockApi {
        async fn get_location_inventory(&self) -> ClientResult<Vec<LocationInventory>> {
            self.calls.lock().unwrap().push("locations".to_string());
            Ok(self.snapshots.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn get_aggregated_products(
            &self,
            _query: &ProductQuery,
        ) -> ClientResult<AggregatedProducts> {
            self.calls.lock().unwrap().push("products".to_string());
            Ok(AggregatedProducts { products: vec![] })
        }

        async fn adjust_stock(
            &self,
            _request: &AdjustStockRequest,
        ) -> ClientResult<MutationResponse> {
            self.mutate("adjust")
        }

        async fn transfer_stock(
            &self,
            _request: &TransferStockRequest,
        ) -> ClientResult<MutationResponse> {
            self.mutate("transfer")
        }

        async fn inbound_stock(
            &self,
            _request: &InboundStockRequest,
        ) -> ClientResult<MutationResponse> {
            self.mutate("inbound")
        }

        async fn outbound_stock(
            &self,
            _request: &OutboundStockRequest,
        ) -> ClientResult<MutationResponse> {
            self.mutate("outbound")
        }
    }

    fn item(sku: &str, quantity: i64) -> LocationItem {
        LocationItem {
            product_code: None,
            sku_code: sku.to_string(),
            sku_color: None,
            sku_size: None,
            stock_quantity: quantity,
            image_path: None,
        }
    }

    fn location(code: &str, items: Vec<LocationItem>) -> LocationInventory {
        LocationInventory {
            location_code: code.to_string(),
            items,
        }
    }

    fn two_location_stock() -> Vec<LocationInventory> {
        vec![
            location("L1", vec![item("P1-红色-M", 2)]),
            location("L2", vec![item("P1-红色-M", 5)]),
        ]
    }

    #[tokio::test]
    async fn refresh_normalizes_and_applies_the_snapshot() {
        let api = MockApi::default();
        api.queue_snapshot(two_location_stock());

        let mut session = StockSession::new(&api);
        assert!(session.refresh().await.unwrap());
        assert_eq!(session.store().records().len(), 2);

        let aggregates = session.store_mut().product_aggregates(&FacetState::new());
        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].product_code.as_str(), "P1");
        assert_eq!(aggregates[0].total_quantity, 7);
    }

    #[tokio::test]
    async fn validation_failures_never_reach_the_network() {
        let api = MockApi::default();
        let mut session = StockSession::new(&api);

        let err = session
            .adjust(&SkuCode::new("   "), &LocationCode::new("L1"), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Domain(DomainError::Validation(_))));

        let err = session
            .outbound(&SkuCode::new("P1-红色-M"), &LocationCode::new("L1"), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Domain(DomainError::Validation(_))));

        assert!(api.calls().is_empty());
        assert_eq!(session.store().version(), 0);
    }

    #[tokio::test]
    async fn adjust_reconciles_with_the_server_absolute_value() {
        let api = MockApi::default();
        api.queue_snapshot(two_location_stock());
        api.queue_response(MutationResponse {
            sku_location_quantity: 5,
            sku_total_quantity: 10,
        });

        let mut session = StockSession::new(&api);
        session.refresh().await.unwrap();
        session
            .adjust(&SkuCode::new("P1-红色-M"), &LocationCode::new("L1"), 5)
            .await
            .unwrap();

        let sku = session
            .store()
            .sku_aggregate(&SkuCode::new("P1-红色-M"))
            .unwrap();
        let at_l1: Vec<_> = sku
            .locations
            .iter()
            .filter(|l| l.location_code.as_str() == "L1")
            .collect();
        assert_eq!(at_l1.len(), 1);
        assert_eq!(at_l1[0].quantity, 5);
        assert_eq!(sku.total_quantity, 10);

        let aggregates = session.store_mut().product_aggregates(&FacetState::new());
        assert_eq!(aggregates[0].total_quantity, 10);
    }

    #[tokio::test]
    async fn rejected_mutation_leaves_the_store_untouched() {
        let api = MockApi::default();
        api.queue_snapshot(two_location_stock());
        *api.fail_status.lock().unwrap() = Some(404);

        let mut session = StockSession::new(&api);
        session.refresh().await.unwrap();
        let version = session.store().version();

        let err = session
            .inbound(&SkuCode::new("P9-蓝色-S"), &LocationCode::new("L1"), 3)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(session.store().version(), version);
    }

    #[tokio::test]
    async fn transfer_patches_destination_then_refreshes_for_the_source() {
        let api = MockApi::default();
        api.queue_snapshot(vec![location("L1", vec![item("P1-红色-M", 5)])]);
        // Post-transfer snapshot: the backend moved 2 units to L2.
        api.queue_snapshot(vec![
            location("L1", vec![item("P1-红色-M", 3)]),
            location("L2", vec![item("P1-红色-M", 2)]),
        ]);
        api.queue_response(MutationResponse {
            sku_location_quantity: 2,
            sku_total_quantity: 5,
        });

        let mut session = StockSession::new(&api);
        session.refresh().await.unwrap();
        session
            .transfer(
                &SkuCode::new("P1-红色-M"),
                &LocationCode::new("L1"),
                &LocationCode::new("L2"),
                2,
            )
            .await
            .unwrap();

        let sku = session
            .store()
            .sku_aggregate(&SkuCode::new("P1-红色-M"))
            .unwrap();
        assert_eq!(sku.total_quantity, 5);
        assert_eq!(sku.locations[0].quantity, 2);
        assert_eq!(sku.locations[1].quantity, 3);
        assert_eq!(api.calls(), vec!["locations", "transfer", "locations"]);
    }

    #[tokio::test]
    async fn transfer_to_the_same_location_is_rejected_locally() {
        let api = MockApi::default();
        let mut session = StockSession::new(&api);
        let err = session
            .transfer(
                &SkuCode::new("P1-红色-M"),
                &LocationCode::new("L1"),
                &LocationCode::new("L1"),
                2,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Domain(DomainError::Validation(_))));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn allocation_plans_split_across_locations() {
        let api = MockApi::default();
        api.queue_snapshot(two_location_stock());

        let mut session = StockSession::new(&api);
        session.refresh().await.unwrap();

        let sku = SkuCode::new("P1-红色-M");
        let preferred = LocationCode::new("L1");

        // 4 requested: 2 from the preferred location, 2 of overflow.
        let plan = session.plan_allocation(&sku, 4, &preferred);
        assert_eq!(plan.remainder, 0);
        assert_eq!(plan.allocations.len(), 2);
        assert_eq!(plan.allocations[0].location_code.as_str(), "L1");
        assert_eq!(plan.allocations[0].quantity, 2);
        assert_eq!(plan.allocations[1].location_code.as_str(), "L2");
        assert_eq!(plan.allocations[1].quantity, 2);

        // 10 requested: everything is taken and 3 remain unsatisfied.
        let plan = session.plan_allocation(&sku, 10, &preferred);
        assert_eq!(plan.remainder, 3);
        assert_eq!(plan.allocated_quantity(), 7);

        // Unknown SKU: the full request comes back as remainder.
        let plan = session.plan_allocation(&SkuCode::new("P9-蓝色-S"), 4, &preferred);
        assert!(plan.allocations.is_empty());
        assert_eq!(plan.remainder, 4);
    }
}
