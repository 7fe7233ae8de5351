use crate::error::Location;

/// The lexical classes of the save grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An unquoted bare word (also covers `yes`/`no` before inference).
    Identifier,
    /// A double-quoted string; the token text is the unescaped content.
    StringLiteral,
    /// A bare word consisting only of digits, `-`, and `.`.
    NumberLiteral,
    Equals,
    BlockOpen,
    BlockClose,
    Whitespace,
    NewLine,
    EndOfInput,
}

impl TokenKind {
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::StringLiteral => "string literal",
            TokenKind::NumberLiteral => "number literal",
            TokenKind::Equals => "'='",
            TokenKind::BlockOpen => "'{'",
            TokenKind::BlockClose => "'}'",
            TokenKind::Whitespace => "whitespace",
            TokenKind::NewLine => "newline",
            TokenKind::EndOfInput => "end of input",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Unescaped content for string literals, the raw slice otherwise.
    pub text: String,
    /// Position of the token's first character.
    pub location: Location,
}

/// Converts the input into a token stream.
///
/// The lexer is lenient: unrecognized characters are skipped and scanning
/// retries, and an unterminated string literal spans to the end of input.
/// Structural validation happens in the parser.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn location(&self) -> Location {
        Location {
            offset: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn current(&self) -> Option<char> {
        let bytes = self.input.as_bytes();
        match bytes.get(self.position) {
            Some(&byte) if byte.is_ascii() => Some(byte as char),
            Some(_) => self.input[self.position..].chars().next(),
            None => None,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.current()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Scan the next token. Once the input is exhausted this keeps
    /// returning `EndOfInput`.
    pub fn next_token(&mut self) -> Token {
        loop {
            let location = self.location();
            let Some(ch) = self.current() else {
                return Token {
                    kind: TokenKind::EndOfInput,
                    text: String::new(),
                    location,
                };
            };

            match ch {
                '\n' => {
                    self.bump();
                    return Token {
                        kind: TokenKind::NewLine,
                        text: "\n".to_string(),
                        location,
                    };
                }
                '\r' => {
                    self.bump();
                    let mut text = String::from("\r");
                    if self.current() == Some('\n') {
                        self.bump();
                        text.push('\n');
                    } else {
                        // Bare carriage return still terminates the line.
                        self.line += 1;
                        self.column = 1;
                    }
                    return Token {
                        kind: TokenKind::NewLine,
                        text,
                        location,
                    };
                }
                c if c.is_whitespace() => return self.scan_whitespace(location),
                '{' => return self.structural(TokenKind::BlockOpen, ch, location),
                '}' => return self.structural(TokenKind::BlockClose, ch, location),
                '=' => return self.structural(TokenKind::Equals, ch, location),
                '"' => return self.scan_string(location),
                c if is_word_char(c) => return self.scan_word(location),
                _ => {
                    // Unrecognized character: skip it and retry.
                    self.bump();
                }
            }
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek_token(&self) -> Token {
        self.clone().next_token()
    }

    fn structural(&mut self, kind: TokenKind, ch: char, location: Location) -> Token {
        self.bump();
        Token {
            kind,
            text: ch.to_string(),
            location,
        }
    }

    fn scan_whitespace(&mut self, location: Location) -> Token {
        let start = self.position;
        while let Some(ch) = self.current() {
            if ch.is_whitespace() && ch != '\n' && ch != '\r' {
                self.bump();
            } else {
                break;
            }
        }
        Token {
            kind: TokenKind::Whitespace,
            text: self.input[start..self.position].to_string(),
            location,
        }
    }

    fn scan_string(&mut self, location: Location) -> Token {
        self.bump();

        let mut text = String::new();
        while let Some(ch) = self.current() {
            if ch == '"' {
                self.bump();
                break;
            }
            if ch == '\\' {
                self.bump();
                match self.current() {
                    // Only `\"` is an escape; anything else passes through.
                    Some('"') => {
                        text.push('"');
                        self.bump();
                    }
                    Some(other) => {
                        text.push('\\');
                        text.push(other);
                        self.bump();
                    }
                    None => text.push('\\'),
                }
                continue;
            }
            text.push(ch);
            self.bump();
        }

        Token {
            kind: TokenKind::StringLiteral,
            text,
            location,
        }
    }

    fn scan_word(&mut self, location: Location) -> Token {
        let start = self.position;
        while let Some(ch) = self.current() {
            if is_word_char(ch) {
                self.bump();
            } else {
                break;
            }
        }

        let text = &self.input[start..self.position];
        let kind = if is_number_text(text) {
            TokenKind::NumberLiteral
        } else {
            TokenKind::Identifier
        };
        Token {
            kind,
            text: text.to_string(),
            location,
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | '%' | '.')
}

fn is_number_text(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit() || b == b'-' || b == b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::EndOfInput;
            out.push(token.kind);
            if done {
                return out;
            }
        }
    }

    #[rstest::rstest]
    fn test_structural_tokens() {
        assert_eq!(
            kinds("{}="),
            vec![
                TokenKind::BlockOpen,
                TokenKind::BlockClose,
                TokenKind::Equals,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[rstest::rstest]
    fn test_whitespace_and_newlines_are_distinct() {
        assert_eq!(
            kinds("a \t\nb"),
            vec![
                TokenKind::Identifier,
                TokenKind::Whitespace,
                TokenKind::NewLine,
                TokenKind::Identifier,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[rstest::rstest]
    fn test_crlf_is_one_newline() {
        let mut lexer = Lexer::new("\r\nx");
        let newline = lexer.next_token();
        assert_eq!(newline.kind, TokenKind::NewLine);
        assert_eq!(newline.text, "\r\n");
        let next = lexer.next_token();
        assert_eq!(next.kind, TokenKind::Identifier);
        assert_eq!(next.location.line, 2);
    }

    #[rstest::rstest]
    #[case("fleet", TokenKind::Identifier)]
    #[case("flag_usa", TokenKind::Identifier)]
    #[case("100%", TokenKind::Identifier)]
    #[case("2200.1.1", TokenKind::NumberLiteral)]
    #[case("42", TokenKind::NumberLiteral)]
    #[case("-3.5", TokenKind::NumberLiteral)]
    #[case(".5", TokenKind::NumberLiteral)]
    #[case("-.5", TokenKind::NumberLiteral)]
    #[case("1x", TokenKind::Identifier)]
    fn test_word_classification(#[case] input: &str, #[case] expected: TokenKind) {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token();
        assert_eq!(token.kind, expected);
        assert_eq!(token.text, input);
    }

    #[rstest::rstest]
    fn test_string_literal_unescapes_quotes() {
        let mut lexer = Lexer::new(r#""say \"hi\"" rest"#);
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::StringLiteral);
        assert_eq!(token.text, r#"say "hi""#);
    }

    #[rstest::rstest]
    fn test_string_literal_passes_other_backslashes_through() {
        let mut lexer = Lexer::new(r#""a\nb""#);
        assert_eq!(lexer.next_token().text, r"a\nb");
    }

    #[rstest::rstest]
    fn test_unterminated_string_spans_to_end() {
        let mut lexer = Lexer::new("\"open ended");
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::StringLiteral);
        assert_eq!(token.text, "open ended");
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfInput);
    }

    #[rstest::rstest]
    fn test_unknown_characters_are_skipped() {
        assert_eq!(
            kinds("a#b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[rstest::rstest]
    fn test_end_of_input_is_persistent() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfInput);
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfInput);
    }

    #[rstest::rstest]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new("a=1");
        assert_eq!(lexer.peek_token().kind, TokenKind::Identifier);
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        assert_eq!(lexer.peek_token().kind, TokenKind::Equals);
    }

    #[rstest::rstest]
    fn test_locations() {
        let mut lexer = Lexer::new("a\nbb=1");
        assert_eq!(lexer.next_token().location, Location { offset: 0, line: 1, column: 1 });
        lexer.next_token(); // newline
        let second = lexer.next_token();
        assert_eq!(second.location, Location { offset: 2, line: 2, column: 1 });
        let equals = lexer.next_token();
        assert_eq!(equals.location, Location { offset: 4, line: 2, column: 3 });
    }
}
