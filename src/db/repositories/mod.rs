pub mod field_records;
