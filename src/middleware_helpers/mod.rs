pub mod method_override;
pub mod request_id;

pub use method_override::{method_override, METHOD_OVERRIDE_PARAM};
pub use request_id::{request_id_middleware, REQUEST_ID_HEADER};
