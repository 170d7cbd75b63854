//! Fetch a live snapshot and print product rollups plus assortment gaps.
//!
//! ```sh
//! STOCKDECK_API_URL=http://localhost:8080 cargo run -p stockdeck-client --example warehouse_report
//! ```

use anyhow::Context;

use stockdeck_client::{HttpInventoryApi, StockSession};
use stockdeck_engine::{FacetState, find_assortment_gaps};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockdeck_observability::init();

    let base_url =
        std::env::var("STOCKDECK_API_URL").context("STOCKDECK_API_URL must be set")?;
    let api = match std::env::var("STOCKDECK_API_TOKEN") {
        Ok(token) => HttpInventoryApi::with_token(base_url, token),
        Err(_) => HttpInventoryApi::new(base_url),
    };

    let mut session = StockSession::new(api);
    session.refresh().await.context("snapshot fetch failed")?;

    let state = FacetState::new();
    let products: Vec<_> = session.store_mut().product_aggregates(&state).to_vec();
    for product in &products {
        println!(
            "{}  total={}  skus={}  colors={}  locations={}",
            product.product_code,
            product.total_quantity,
            product.distinct_sku_count,
            product.distinct_color_count,
            product.distinct_location_count,
        );
        for gap in find_assortment_gaps(&product.product_code, session.store().records()) {
            println!("  missing variant: {}", gap.sku_code);
        }
    }

    Ok(())
}
