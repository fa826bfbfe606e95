pub mod field;

pub use field::{encode_vl_length, type_code, FieldBuilder};
