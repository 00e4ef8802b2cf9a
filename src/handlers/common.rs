use crate::{errors::ServiceError, models::ProductForm, uploads::UploadedFile};
use axum::extract::Multipart;
use uuid::Uuid;

/// Name of the file input on the product forms
pub const IMAGE_FIELD: &str = "image";

/// A malformed id is treated the same as an unknown one.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

/// Like [`parse_id`], for routes that answer through the error funnel.
pub fn require_id(kind: &str, raw: &str) -> Result<Uuid, ServiceError> {
    parse_id(raw).ok_or_else(|| ServiceError::not_found(kind, raw))
}

/// Product fields plus the optional image from a multipart product form.
#[derive(Debug, Default)]
pub struct ProductSubmission {
    pub form: ProductForm,
    pub image: Option<UploadedFile>,
}

/// Reads a product form. Unknown fields are skipped; a repeated field keeps the last value.
pub async fn read_product_submission(
    mut multipart: Multipart,
) -> Result<ProductSubmission, ServiceError> {
    let mut submission = ProductSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(field_name) = field.name().map(str::to_owned) else {
            continue;
        };

        if field_name == IMAGE_FIELD {
            let file_name = field.file_name().map(str::to_owned);
            let bytes = field.bytes().await?;
            submission.image = Some(UploadedFile { file_name, bytes });
            continue;
        }

        let slot = match field_name.as_str() {
            "name" => &mut submission.form.name,
            "price" => &mut submission.form.price,
            "qty" => &mut submission.form.qty,
            "category" => &mut submission.form.category,
            _ => continue,
        };
        *slot = Some(field.text().await?);
    }

    Ok(submission)
}
