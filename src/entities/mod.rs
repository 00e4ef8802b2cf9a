pub mod product;
pub mod supplier;
pub mod supplier_product;

pub use product::{Entity as Product, Model as ProductModel};
pub use supplier::{Entity as Supplier, Model as SupplierModel};
pub use supplier_product::{Entity as SupplierProduct, Model as SupplierProductModel};
