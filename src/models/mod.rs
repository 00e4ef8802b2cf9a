pub mod category;
pub mod inputs;

pub use category::{Category, ALL_PRODUCTS_FILTER};
pub use inputs::{ProductForm, ProductInput, SupplierForm, SupplierInput};
