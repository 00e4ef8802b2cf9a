use crate::db::DbPool;
use std::sync::Arc;

pub mod products;
pub mod suppliers;

pub use products::{ProductService, ProductWithSupplier};
pub use suppliers::{SupplierService, SupplierWithProducts};

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductService>,
    pub suppliers: Arc<SupplierService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            products: Arc::new(ProductService::new(db_pool.clone())),
            suppliers: Arc::new(SupplierService::new(db_pool)),
        }
    }
}
