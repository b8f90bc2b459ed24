pub mod auth_ctx;
pub mod path_param;
pub mod validated_json;

pub use auth_ctx::{CurrentIdentity, Identity};
pub use path_param::PathParam;
pub use validated_json::{FieldIssue, Validate, ValidatedJson, ValidationErrors};
