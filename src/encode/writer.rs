use crate::types::{Element, SaveObject, Scalar, ScalarValue};

const INDENT: &str = "\t";

/// Accumulates serialized save text.
///
/// Output is deterministic: entries in insertion order, one property per
/// line, tab indentation, no trailing newline.
pub(crate) struct Writer {
    buffer: String,
}

impl Writer {
    pub(crate) fn new() -> Self {
        Writer {
            buffer: String::new(),
        }
    }

    pub(crate) fn finish(self) -> String {
        self.buffer
    }

    /// Top-level form: properties without surrounding braces.
    pub(crate) fn write_document(&mut self, object: &SaveObject) {
        for (index, (key, value)) in object.iter().enumerate() {
            if index > 0 {
                self.buffer.push('\n');
            }
            self.write_entry(key, value, 0);
        }
    }

    fn write_entry(&mut self, key: &str, value: &Element, depth: usize) {
        self.write_indent(depth);
        self.write_key(key);
        self.buffer.push('=');
        self.write_element(value, depth);
    }

    pub(crate) fn write_element(&mut self, element: &Element, depth: usize) {
        match element {
            Element::Obj(object) => self.write_object(object, depth),
            Element::Arr(items) => self.write_array(items, depth),
            Element::Scalar(scalar) => self.write_scalar(scalar),
        }
    }

    fn write_object(&mut self, object: &SaveObject, depth: usize) {
        if object.is_empty() {
            self.buffer.push_str("{ }");
            return;
        }
        self.buffer.push_str("{\n");
        for (index, (key, value)) in object.iter().enumerate() {
            if index > 0 {
                self.buffer.push('\n');
            }
            self.write_entry(key, value, depth + 1);
        }
        self.buffer.push('\n');
        self.write_indent(depth);
        self.buffer.push('}');
    }

    fn write_array(&mut self, items: &[Element], depth: usize) {
        if items.is_empty() {
            self.buffer.push_str("{}");
            return;
        }
        self.buffer.push_str("{\n");
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.buffer.push('\n');
            }
            self.write_indent(depth + 1);
            self.write_element(item, depth + 1);
        }
        self.buffer.push('\n');
        self.write_indent(depth);
        self.buffer.push('}');
    }

    fn write_scalar(&mut self, scalar: &Scalar) {
        match scalar.value() {
            // Booleans normalize to lowercase regardless of the source text.
            ScalarValue::Bool(true) => self.buffer.push_str("yes"),
            ScalarValue::Bool(false) => self.buffer.push_str("no"),
            ScalarValue::String(_) | ScalarValue::Date(_) | ScalarValue::Guid(_) => {
                self.write_quoted(scalar.raw());
            }
            ScalarValue::Identifier(_)
            | ScalarValue::Int32(_)
            | ScalarValue::Int64(_)
            | ScalarValue::Float(_) => self.buffer.push_str(scalar.raw()),
        }
    }

    fn write_quoted(&mut self, text: &str) {
        self.buffer.push('"');
        for ch in text.chars() {
            if ch == '"' {
                self.buffer.push('\\');
            }
            self.buffer.push(ch);
        }
        self.buffer.push('"');
    }

    fn write_key(&mut self, key: &str) {
        let bare = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '%' | '.'));
        if bare {
            self.buffer.push_str(key);
        } else {
            self.write_quoted(key);
        }
    }

    fn write_indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.buffer.push_str(INDENT);
        }
    }
}
