pub mod date;
pub mod value;

pub use date::SaveDate;
pub use value::{Element, SaveObject, Scalar, ScalarValue};
