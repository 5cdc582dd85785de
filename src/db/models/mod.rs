pub mod field_record;

pub use field_record::{FieldKind, FieldRecord, NewFieldRecord};
