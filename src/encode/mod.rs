//! Serialization of the document tree back into save text.

mod writer;

use writer::Writer;

use crate::types::{Element, SaveObject};

/// Serialize a parsed document. The top level is written without braces,
/// matching the save file form; parsing the output yields an equal tree.
pub fn document_to_string(object: &SaveObject) -> String {
    let mut writer = Writer::new();
    writer.write_document(object);
    writer.finish()
}

/// Serialize any element. A root object is written in document form.
pub fn to_string(element: &Element) -> String {
    match element {
        Element::Obj(object) => document_to_string(object),
        other => {
            let mut writer = Writer::new();
            writer.write_element(other, 0);
            writer.finish()
        }
    }
}
