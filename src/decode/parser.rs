use smol_str::SmolStr;
use uuid::Uuid;

use crate::decode::lexer::{Lexer, Token, TokenKind};
use crate::error::ParseError;
use crate::types::{Element, SaveDate, SaveObject, Scalar, ScalarValue};

/// Maximum nesting depth before a parse is rejected.
pub const MAX_DEPTH: usize = 256;

/// Recursive-descent parser over the token stream.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Parser {
            lexer,
            current,
            depth: 0,
        }
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn skip_trivia(&mut self) {
        while matches!(
            self.current.kind,
            TokenKind::Whitespace | TokenKind::NewLine
        ) {
            self.advance();
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.current.kind == kind {
            let token = self.current.clone();
            self.advance();
            Ok(token)
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: describe_token(&self.current),
            location: self.current.location,
        }
    }

    /// Parse the whole input as a sequence of `key=value` properties.
    pub fn parse_document(&mut self) -> Result<SaveObject, ParseError> {
        let mut entries = Vec::new();
        loop {
            self.skip_trivia();
            if self.current.kind == TokenKind::EndOfInput {
                break;
            }
            let key = self.take_key()?;
            self.skip_trivia();
            // Some saves omit `=` between a key and its block.
            if self.current.kind == TokenKind::Equals {
                self.advance();
            }
            let value = self.parse_value()?;
            entries.push((key, value));
        }
        Ok(SaveObject::new(entries))
    }

    fn take_key(&mut self) -> Result<SmolStr, ParseError> {
        match self.current.kind {
            TokenKind::Identifier | TokenKind::StringLiteral | TokenKind::NumberLiteral => {
                let key = SmolStr::new(&self.current.text);
                self.advance();
                Ok(key)
            }
            _ => Err(self.unexpected("a key")),
        }
    }

    fn parse_value(&mut self) -> Result<Element, ParseError> {
        self.skip_trivia();
        match self.current.kind {
            TokenKind::BlockOpen => self.parse_block(),
            TokenKind::StringLiteral => {
                let raw = std::mem::take(&mut self.current.text);
                self.advance();
                Ok(Element::Scalar(classify_string(raw)))
            }
            TokenKind::Identifier => {
                let raw = std::mem::take(&mut self.current.text);
                self.advance();
                Ok(Element::Scalar(classify_identifier(raw)))
            }
            TokenKind::NumberLiteral => {
                let raw = std::mem::take(&mut self.current.text);
                self.advance();
                Ok(Element::Scalar(classify_number(raw)))
            }
            // `key=}` means an empty value; leave the brace for the caller.
            TokenKind::BlockClose => Ok(Element::Obj(SaveObject::default())),
            TokenKind::EndOfInput => Ok(Element::Scalar(Scalar::new(
                String::new(),
                ScalarValue::String(String::new()),
            ))),
            _ => Err(self.unexpected("a value")),
        }
    }

    fn parse_block(&mut self) -> Result<Element, ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let location = self.current.location;
            return Err(ParseError::DepthExceeded {
                max: MAX_DEPTH,
                location,
            });
        }
        self.expect(TokenKind::BlockOpen)?;

        let mut properties: Vec<(SmolStr, Element)> = Vec::new();
        let mut values: Vec<Element> = Vec::new();

        loop {
            self.skip_trivia();
            if matches!(
                self.current.kind,
                TokenKind::BlockClose | TokenKind::EndOfInput
            ) {
                break;
            }

            if self.key_ahead_of_equals() {
                let key = self.take_key()?;
                self.skip_trivia();
                self.expect(TokenKind::Equals)?;
                let value = self.parse_value()?;
                properties.push((key, value));
            } else {
                values.push(self.parse_value()?);
            }
        }

        self.expect(TokenKind::BlockClose)?;
        self.depth -= 1;
        Ok(finish_block(properties, values))
    }

    /// True when the current token is a key followed (past trivia) by `=`.
    fn key_ahead_of_equals(&self) -> bool {
        if !matches!(
            self.current.kind,
            TokenKind::Identifier | TokenKind::StringLiteral | TokenKind::NumberLiteral
        ) {
            return false;
        }
        let mut lookahead = self.lexer.clone();
        loop {
            let token = lookahead.next_token();
            match token.kind {
                TokenKind::Whitespace | TokenKind::NewLine => continue,
                TokenKind::Equals => return true,
                _ => return false,
            }
        }
    }
}

fn finish_block(properties: Vec<(SmolStr, Element)>, values: Vec<Element>) -> Element {
    if values.is_empty() {
        // Covers the empty block too: `{ }` reads as an empty object.
        return Element::Obj(SaveObject::new(properties));
    }
    if properties.is_empty() {
        return Element::Arr(values);
    }
    // Mixed block: bare values get positional keys after the properties.
    let mut entries = properties;
    for (position, value) in values.into_iter().enumerate() {
        entries.push((SmolStr::new(position.to_string()), value));
    }
    Element::Obj(SaveObject::new(entries))
}

fn describe_token(token: &Token) -> String {
    match token.kind {
        TokenKind::EndOfInput => token.kind.describe().to_string(),
        _ => format!("{} ('{}')", token.kind.describe(), token.text),
    }
}

/// Quoted strings carry typed payloads: GUID first, then date, then string.
fn classify_string(raw: String) -> Scalar {
    if let Some(guid) = parse_guid(&raw) {
        return Scalar::new(raw, ScalarValue::Guid(guid));
    }
    if let Some(date) = SaveDate::parse_from_str(&raw) {
        return Scalar::new(raw, ScalarValue::Date(date));
    }
    let value = ScalarValue::String(raw.clone());
    Scalar::new(raw, value)
}

fn parse_guid(text: &str) -> Option<Uuid> {
    let bytes = text.as_bytes();
    // Only the canonical hyphenated form counts; anything else is a string.
    if bytes.len() != 36
        || bytes[8] != b'-'
        || bytes[13] != b'-'
        || bytes[18] != b'-'
        || bytes[23] != b'-'
    {
        return None;
    }
    Uuid::try_parse(text).ok()
}

fn classify_identifier(raw: String) -> Scalar {
    if raw.eq_ignore_ascii_case("yes") {
        return Scalar::new(raw, ScalarValue::Bool(true));
    }
    if raw.eq_ignore_ascii_case("no") {
        return Scalar::new(raw, ScalarValue::Bool(false));
    }
    let value = ScalarValue::Identifier(raw.clone());
    Scalar::new(raw, value)
}

/// Numeric widening: `i32`, then `i64`, then fall back to an identifier.
/// A decimal point forces a float, never an integer.
fn classify_number(raw: String) -> Scalar {
    if raw.contains('.') {
        if let Ok(float) = raw.parse::<f64>() {
            if float.is_finite() {
                return Scalar::new(raw, ScalarValue::Float(float));
            }
        }
    } else {
        if let Ok(int) = raw.parse::<i32>() {
            return Scalar::new(raw, ScalarValue::Int32(int));
        }
        if let Ok(long) = raw.parse::<i64>() {
            return Scalar::new(raw, ScalarValue::Int64(long));
        }
    }
    // Overflowing or malformed numbers (`1-2`, `1.2.3.4`) stay textual.
    let value = ScalarValue::Identifier(raw.clone());
    Scalar::new(raw, value)
}
