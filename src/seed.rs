//! Sample catalogue for local development.

use crate::{
    db::{self, DbPool},
    errors::ServiceError,
    models::{ProductInput, SupplierInput},
    services::AppServices,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

struct SampleProduct {
    name: &'static str,
    cents: i64,
    qty: i32,
    category: &'static str,
}

impl SampleProduct {
    fn input(&self) -> ProductInput {
        ProductInput {
            name: self.name.to_string(),
            price: Decimal::new(self.cents, 2),
            qty: self.qty,
            category: self.category.to_string(),
        }
    }
}

const ORCHARD: &[SampleProduct] = &[
    SampleProduct { name: "Gala Apple", cents: 125, qty: 40, category: "fruit" },
    SampleProduct { name: "Bartlett Pear", cents: 150, qty: 25, category: "fruit" },
    SampleProduct { name: "Carrot Bunch", cents: 299, qty: 12, category: "vegetable" },
];

const BAKERY: &[SampleProduct] = &[
    SampleProduct { name: "Sourdough Loaf", cents: 650, qty: 8, category: "bakery" },
    SampleProduct { name: "Rye Rolls", cents: 425, qty: 16, category: "bakery" },
];

const UNATTACHED: SampleProduct =
    SampleProduct { name: "Rolled Oats", cents: 375, qty: 30, category: "grocery" };

/// Inserts two suppliers with products and one product without a supplier.
/// Returns the number of products created.
pub async fn seed_catalogue(services: &AppServices) -> Result<usize, ServiceError> {
    let mut created = 0;

    for (supplier, products) in [
        (
            SupplierInput {
                name: "Hillside Orchard".into(),
                address: "12 Orchard Lane".into(),
                email: "orders@hillside.example".into(),
            },
            ORCHARD,
        ),
        (
            SupplierInput {
                name: "Corner Bakery".into(),
                address: "3 Market Street".into(),
                email: "hello@cornerbakery.example".into(),
            },
            BAKERY,
        ),
    ] {
        let supplier = services.suppliers.create_supplier(supplier).await?;
        for product in products {
            services
                .suppliers
                .add_product(&supplier.id, product.input(), None)
                .await?;
            created += 1;
        }
    }

    services
        .products
        .create_product(UNATTACHED.input(), None)
        .await?;
    created += 1;

    info!(products = created, "Sample catalogue inserted");
    Ok(created)
}

/// Migrates, seeds and closes the pool. Backs the `seed` subcommand.
pub async fn seed_database(pool: DbPool) -> Result<usize, ServiceError> {
    db::run_migrations(&pool).await?;

    let pool = Arc::new(pool);
    let created = seed_catalogue(&AppServices::new(pool.clone())).await?;

    let pool = Arc::try_unwrap(pool).map_err(|_| {
        ServiceError::InternalError("database pool still shared after seeding".into())
    })?;
    db::close_pool(pool).await?;
    Ok(created)
}
