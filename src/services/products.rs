use crate::{
    db::DbPool,
    entities::{
        product::{self, Column as ProductColumn, Entity as Product},
        supplier,
    },
    errors::ServiceError,
    models::{Category, ProductInput, ALL_PRODUCTS_FILTER},
    uploads::ProductImage,
};
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// A product together with its owning supplier, when it has one.
pub type ProductWithSupplier = (product::Model, Option<supplier::Model>);

/// Service for managing products
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists products, oldest first.
    ///
    /// `None` and [`ALL_PRODUCTS_FILTER`] return everything; any other value must
    /// equal a product's category exactly. Unknown categories simply match nothing.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<product::Model>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = Product::find().order_by_asc(ProductColumn::CreatedAt);
        if let Some(category) = filter.filter(|f| *f != ALL_PRODUCTS_FILTER) {
            query = query.filter(ProductColumn::Category.eq(category));
        }

        query.all(db).await.map_err(|e| {
            error!(error = %e, "Database error when listing products");
            ServiceError::DatabaseError(e)
        })
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &Uuid) -> Result<Option<product::Model>, ServiceError> {
        let db = &*self.db_pool;

        Product::find_by_id(*id).one(db).await.map_err(|e| {
            error!(product_id = %id, error = %e, "Database error when fetching product");
            ServiceError::DatabaseError(e)
        })
    }

    /// Get a product with its supplier resolved
    #[instrument(skip(self))]
    pub async fn get_product_with_supplier(
        &self,
        id: &Uuid,
    ) -> Result<Option<ProductWithSupplier>, ServiceError> {
        let db = &*self.db_pool;

        Product::find_by_id(*id)
            .find_also_related(supplier::Entity)
            .one(db)
            .await
            .map_err(|e| {
                error!(product_id = %id, error = %e, "Database error when fetching product");
                ServiceError::DatabaseError(e)
            })
    }

    /// Creates a standalone product
    #[instrument(skip(self, image), fields(has_image = image.is_some()))]
    pub async fn create_product(
        &self,
        input: ProductInput,
        image: Option<ProductImage>,
    ) -> Result<product::Model, ServiceError> {
        input.validate_for_write()?;
        let db = &*self.db_pool;

        let created = new_product(input, image, None).insert(db).await.map_err(|e| {
            error!(error = %e, "Failed to create product");
            ServiceError::DatabaseError(e)
        })?;

        counter!("stockroom_products.created", 1);
        info!(product_id = %created.id, name = %created.name, "Product created");

        Ok(created)
    }

    /// Replaces name, price, qty and category.
    ///
    /// The input is validated before anything is written, so a rejected update
    /// leaves the stored record as it was.
    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: &Uuid,
        input: ProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate_for_write()?;
        let db = &*self.db_pool;

        let existing = self
            .get_product(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))?;

        let mut active = existing.into_active_model();
        active.name = Set(input.name);
        active.price = Set(input.price);
        active.qty = Set(input.qty);
        active.category = Set(input.category);

        let updated = active.update(db).await.map_err(|e| {
            error!(product_id = %id, error = %e, "Failed to update product");
            ServiceError::DatabaseError(e)
        })?;

        info!(product_id = %id, "Product updated");
        Ok(updated)
    }

    /// Deletes without checking existence first. Returns the rows removed.
    ///
    /// Supplier sequences that reference the product are left alone.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &Uuid) -> Result<u64, ServiceError> {
        let db = &*self.db_pool;

        let result = Product::delete_by_id(*id).exec(db).await.map_err(|e| {
            error!(product_id = %id, error = %e, "Failed to delete product");
            ServiceError::DatabaseError(e)
        })?;

        if result.rows_affected > 0 {
            counter!("stockroom_products.deleted", result.rows_affected);
            info!(product_id = %id, "Product deleted");
        }

        Ok(result.rows_affected)
    }

    /// The stored image of a product, if both exist
    #[instrument(skip(self))]
    pub async fn image(&self, id: &Uuid) -> Result<Option<ProductImage>, ServiceError> {
        Ok(self.get_product(id).await?.and_then(|product| {
            let data = product.image_data?;
            Some(ProductImage {
                data,
                content_type: product
                    .image_content_type
                    .unwrap_or_else(|| product::IMAGE_CONTENT_TYPE.to_string()),
            })
        }))
    }
}

impl ProductInput {
    /// Re-checks an input that may not have come through form parsing.
    pub(crate) fn validate_for_write(&self) -> Result<(), ServiceError> {
        validator::Validate::validate(self)?;
        if !Category::is_known(&self.category) {
            warn!(category = %self.category, "Storing product with unlisted category");
        }
        Ok(())
    }
}

/// Builds the insert for a new product, shared with supplier-owned creation.
pub(crate) fn new_product(
    input: ProductInput,
    image: Option<ProductImage>,
    supplier_id: Option<Uuid>,
) -> product::ActiveModel {
    let now = chrono::Utc::now();
    let (image_data, image_content_type) = match image {
        Some(image) => (Some(image.data), Some(image.content_type)),
        None => (None, None),
    };

    product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        price: Set(input.price),
        qty: Set(input.qty),
        category: Set(input.category),
        image_data: Set(image_data),
        image_content_type: Set(image_content_type),
        supplier_id: Set(supplier_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
}
