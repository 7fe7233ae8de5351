//! Parser, serializer, and model binder for Clausewitz-engine save files.
//!
//! Save text is a sequence of `key=value` properties where a value is a
//! quoted string, a bare word, a number, or a brace block; duplicate keys
//! are data, not errors. [`parse`] reads that text into a generic tree of
//! [`Element`]s, [`document_to_string`] writes the tree back out
//! deterministically, and [`bind`] projects a tree onto a typed model
//! declared with [`save_model!`].
//!
//! ```
//! let doc = clausewitz_save::parse("name=\"Test Empire\"\ncapital=5").unwrap();
//!
//! let capital = doc.get("capital").unwrap();
//! assert_eq!(capital.as_scalar().and_then(|s| s.as_i32()), Some(5));
//!
//! let text = clausewitz_save::document_to_string(&doc);
//! assert_eq!(text, "name=\"Test Empire\"\ncapital=5");
//! ```

pub mod bind;
pub mod decode;
pub mod encode;
pub mod error;
pub mod models;
pub mod types;

pub use bind::{bind, bind_with_diagnostics, BindDiagnostics, BindFieldError, FromSave, SaveModel};
pub use decode::parse;
pub use encode::{document_to_string, to_string};
pub use error::{Location, ParseError};
pub use types::{Element, SaveDate, SaveObject, Scalar, ScalarValue};

pub type Result<T> = std::result::Result<T, ParseError>;
