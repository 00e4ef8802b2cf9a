use crate::{
    db::DbPool,
    entities::{
        product::{self, Entity as Product},
        supplier::{self, Column as SupplierColumn, Entity as Supplier},
        supplier_product::{self, Column as LinkColumn, Entity as SupplierProduct},
    },
    errors::ServiceError,
    models::{ProductInput, SupplierInput},
    services::products::new_product,
    uploads::ProductImage,
};
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Set, SqlErr, TransactionTrait,
};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

/// A supplier with its product sequence resolved. References to products that
/// no longer exist are dropped.
#[derive(Clone, Debug)]
pub struct SupplierWithProducts {
    pub supplier: supplier::Model,
    pub products: Vec<product::Model>,
}

/// Service for managing suppliers
#[derive(Clone)]
pub struct SupplierService {
    db_pool: Arc<DbPool>,
}

impl SupplierService {
    /// Creates a new supplier service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists all suppliers
    #[instrument(skip(self))]
    pub async fn list_suppliers(&self) -> Result<Vec<supplier::Model>, ServiceError> {
        let db = &*self.db_pool;
        Supplier::find()
            .order_by_asc(SupplierColumn::CreatedAt)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error when listing suppliers");
                ServiceError::DatabaseError(e)
            })
    }

    /// Gets a supplier by ID
    #[instrument(skip(self))]
    pub async fn get_supplier(
        &self,
        supplier_id: &Uuid,
    ) -> Result<Option<supplier::Model>, ServiceError> {
        let db = &*self.db_pool;
        Supplier::find_by_id(*supplier_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get_supplier_with_products(
        &self,
        supplier_id: &Uuid,
    ) -> Result<Option<SupplierWithProducts>, ServiceError> {
        let db = &*self.db_pool;

        let Some(supplier) = self.get_supplier(supplier_id).await? else {
            return Ok(None);
        };

        let products = SupplierProduct::find()
            .filter(LinkColumn::SupplierId.eq(*supplier_id))
            .order_by_asc(LinkColumn::Position)
            .find_also_related(Product)
            .all(db)
            .await
            .map_err(|e| {
                error!(supplier_id = %supplier_id, error = %e, "Failed to load supplier products");
                ServiceError::DatabaseError(e)
            })?
            .into_iter()
            .filter_map(|(_, product)| product)
            .collect();

        Ok(Some(SupplierWithProducts { supplier, products }))
    }

    /// The raw product sequence of a supplier, dangling references included.
    #[instrument(skip(self))]
    pub async fn product_refs(&self, supplier_id: &Uuid) -> Result<Vec<Uuid>, ServiceError> {
        let db = &*self.db_pool;
        let links = SupplierProduct::find()
            .filter(LinkColumn::SupplierId.eq(*supplier_id))
            .order_by_asc(LinkColumn::Position)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(links.into_iter().map(|link| link.product_id).collect())
    }

    /// Creates a new supplier
    #[instrument(skip(self))]
    pub async fn create_supplier(
        &self,
        input: SupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        input.validate()?;
        let db = &*self.db_pool;
        let now = chrono::Utc::now();

        let created = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            address: Set(input.address),
            email: Set(input.email),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create supplier");
            ServiceError::DatabaseError(e)
        })?;

        counter!("stockroom_suppliers.created", 1);
        info!(supplier_id = %created.id, name = %created.name, "Supplier created");
        Ok(created)
    }

    /// Updates an existing supplier
    #[instrument(skip(self))]
    pub async fn update_supplier(
        &self,
        supplier_id: &Uuid,
        input: SupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        input.validate()?;
        let db = &*self.db_pool;

        let mut active = self
            .get_supplier(supplier_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Supplier", supplier_id))?
            .into_active_model();
        active.name = Set(input.name);
        active.address = Set(input.address);
        active.email = Set(input.email);

        let updated = active.update(db).await.map_err(|e| {
            error!(supplier_id = %supplier_id, error = %e, "Failed to update supplier");
            ServiceError::DatabaseError(e)
        })?;

        info!(supplier_id = %supplier_id, "Supplier updated");
        Ok(updated)
    }

    /// Creates a product owned by the supplier and appends it to the
    /// supplier's sequence. Both writes commit together or not at all.
    ///
    /// The transaction opens with the product insert, so on SQLite it takes the
    /// write lock before reading anything. A missing supplier is caught by the
    /// `products.supplier_id` foreign key.
    #[instrument(skip(self, image), fields(has_image = image.is_some()))]
    pub async fn add_product(
        &self,
        supplier_id: &Uuid,
        input: ProductInput,
        image: Option<ProductImage>,
    ) -> Result<product::Model, ServiceError> {
        input.validate_for_write()?;
        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let created = new_product(input, image, Some(*supplier_id))
            .insert(&txn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    ServiceError::not_found("Supplier", supplier_id)
                }
                _ => {
                    error!(supplier_id = %supplier_id, error = %e, "Failed to create supplier product");
                    ServiceError::DatabaseError(e)
                }
            })?;

        let next_position = SupplierProduct::find()
            .filter(LinkColumn::SupplierId.eq(*supplier_id))
            .order_by_desc(LinkColumn::Position)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .map_or(0, |last| last.position + 1);

        supplier_product::ActiveModel {
            supplier_id: Set(*supplier_id),
            product_id: Set(created.id),
            position: Set(next_position),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(supplier_id = %supplier_id, error = %e, "Failed to link product to supplier");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        counter!("stockroom_products.created", 1);
        info!(
            supplier_id = %supplier_id,
            product_id = %created.id,
            position = next_position,
            "Product added to supplier"
        );
        Ok(created)
    }

    /// Deletes a supplier and every product in its sequence.
    ///
    /// Returns `None` when there is no such supplier, otherwise the number of
    /// products removed. This is the only way suppliers get deleted.
    ///
    /// Every statement is a write, so the transaction never has to upgrade a
    /// read lock on SQLite.
    #[instrument(skip(self))]
    pub async fn delete_supplier_cascade(
        &self,
        supplier_id: &Uuid,
    ) -> Result<Option<u64>, ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let linked_ids = SupplierProduct::find()
            .select_only()
            .column(LinkColumn::ProductId)
            .filter(LinkColumn::SupplierId.eq(*supplier_id))
            .into_query();

        let removed = Product::delete_many()
            .filter(product::Column::Id.in_subquery(linked_ids))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(supplier_id = %supplier_id, error = %e, "Failed to delete supplier products");
                ServiceError::DatabaseError(e)
            })?
            .rows_affected;

        SupplierProduct::delete_many()
            .filter(LinkColumn::SupplierId.eq(*supplier_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        let deleted = Supplier::delete_by_id(*supplier_id)
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(supplier_id = %supplier_id, error = %e, "Failed to delete supplier");
                ServiceError::DatabaseError(e)
            })?
            .rows_affected;

        if deleted == 0 {
            txn.rollback().await.map_err(ServiceError::db_error)?;
            return Ok(None);
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        counter!("stockroom_suppliers.deleted", 1);
        if removed > 0 {
            counter!("stockroom_products.deleted", removed);
        }
        info!(supplier_id = %supplier_id, products_removed = removed, "Supplier deleted");
        Ok(Some(removed))
    }
}
