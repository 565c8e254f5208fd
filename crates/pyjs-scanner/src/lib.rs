//! Indentation-aware tokenizer for the Python subset accepted by py2js.
//!
//! Block structure is surfaced as synthetic `Indent`/`Dedent` tokens driven
//! by an indent stack. Newlines inside parentheses, brackets and braces are
//! suppressed (implicit line joining), and blank or comment-only lines
//! produce no tokens at all.

mod token;

pub use token::{ScanError, Span, Token, TokenKind};

use std::iter::Peekable;
use std::str::CharIndices;

pub struct Scanner<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    indent_stack: Vec<usize>,
    pending: Vec<Token>,
    at_line_start: bool,
    eof_reached: bool,
    bracket_depth: usize,
    line: usize,
    column: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Scanner<'a> {
        Scanner {
            input,
            chars: input.char_indices().peekable(),
            indent_stack: vec![0],
            pending: Vec::new(),
            at_line_start: true,
            eof_reached: false,
            bracket_depth: 0,
            line: 1,
            column: 0,
        }
    }

    pub fn next_token(&mut self) -> Result<Token, ScanError> {
        if let Some(token) = self.pending.pop() {
            return Ok(token);
        }

        if self.eof_reached {
            return Ok(Token::new(TokenKind::Eof, self.here()));
        }

        if self.at_line_start && self.bracket_depth == 0 {
            self.at_line_start = false;
            if let Some(token) = self.scan_line_start()? {
                return Ok(token);
            }
        }

        loop {
            self.skip_spaces();

            let (start_idx, ch) = match self.chars.peek() {
                Some(&(idx, c)) => (idx, c),
                None => return self.finish_input(),
            };

            let start_line = self.line;
            let start_column = self.column;
            let span1 = Span {
                start: start_idx,
                end: start_idx + 1,
                line: start_line,
                column: start_column,
            };

            match ch {
                '\n' => {
                    self.advance_char();
                    if self.bracket_depth > 0 {
                        continue;
                    }
                    self.at_line_start = true;
                    return Ok(Token::new(TokenKind::Newline, span1));
                }
                '#' => {
                    self.skip_line_comment();
                    continue;
                }
                '(' | '[' | '{' => {
                    self.advance_char();
                    self.bracket_depth += 1;
                    let kind = match ch {
                        '(' => TokenKind::LParen,
                        '[' => TokenKind::LBracket,
                        _ => TokenKind::LBrace,
                    };
                    return Ok(Token::new(kind, span1));
                }
                ')' | ']' | '}' => {
                    self.advance_char();
                    self.bracket_depth = self.bracket_depth.saturating_sub(1);
                    let kind = match ch {
                        ')' => TokenKind::RParen,
                        ']' => TokenKind::RBracket,
                        _ => TokenKind::RBrace,
                    };
                    return Ok(Token::new(kind, span1));
                }
                ',' | ':' | ';' => {
                    self.advance_char();
                    let kind = match ch {
                        ',' => TokenKind::Comma,
                        ':' => TokenKind::Colon,
                        _ => TokenKind::Semi,
                    };
                    return Ok(Token::new(kind, span1));
                }
                '.' => {
                    self.advance_char();
                    return Ok(Token::new(TokenKind::Dot, span1));
                }
                '+' => return Ok(self.one_or_eq(TokenKind::Plus, TokenKind::PlusEq, span1)),
                '-' => return Ok(self.one_or_eq(TokenKind::Minus, TokenKind::MinusEq, span1)),
                '%' => return Ok(self.one_or_eq(TokenKind::Percent, TokenKind::PercentEq, span1)),
                '&' => return Ok(self.one_or_eq(TokenKind::Amp, TokenKind::AmpEq, span1)),
                '|' => return Ok(self.one_or_eq(TokenKind::Pipe, TokenKind::PipeEq, span1)),
                '^' => return Ok(self.one_or_eq(TokenKind::Caret, TokenKind::CaretEq, span1)),
                '=' => return Ok(self.one_or_eq(TokenKind::Assign, TokenKind::EqEq, span1)),
                '<' => return Ok(self.one_or_eq(TokenKind::Lt, TokenKind::LtEq, span1)),
                '>' => return Ok(self.one_or_eq(TokenKind::Gt, TokenKind::GtEq, span1)),
                '*' => {
                    self.advance_char();
                    let kind = match self.chars.peek() {
                        Some(&(_, '*')) => {
                            self.advance_char();
                            TokenKind::StarStar
                        }
                        Some(&(_, '=')) => {
                            self.advance_char();
                            TokenKind::StarEq
                        }
                        _ => TokenKind::Star,
                    };
                    return Ok(Token::new(kind, span1));
                }
                '/' => {
                    self.advance_char();
                    let kind = match self.chars.peek() {
                        Some(&(_, '/')) => {
                            self.advance_char();
                            TokenKind::SlashSlash
                        }
                        Some(&(_, '=')) => {
                            self.advance_char();
                            TokenKind::SlashEq
                        }
                        _ => TokenKind::Slash,
                    };
                    return Ok(Token::new(kind, span1));
                }
                '!' => {
                    self.advance_char();
                    if matches!(self.chars.peek(), Some(&(_, '='))) {
                        self.advance_char();
                        return Ok(Token::new(TokenKind::NotEq, span1));
                    }
                    return Err(self.error_at("Unexpected character '!'", start_line, start_column));
                }
                '"' | '\'' => return self.read_string(start_idx, start_line, start_column),
                c if c.is_alphabetic() || c == '_' => {
                    return Ok(self.read_name(start_idx, start_line, start_column));
                }
                c if c.is_ascii_digit() => {
                    return Ok(self.read_number(start_idx, start_line, start_column));
                }
                other => {
                    return Err(self.error_at(
                        &format!("Unexpected character '{}'", other),
                        start_line,
                        start_column,
                    ));
                }
            }
        }
    }

    /// Handle indentation at the start of a logical line. Blank and
    /// comment-only lines are consumed without producing tokens. Returns an
    /// `Indent` or `Dedent` token when the indent level changed.
    fn scan_line_start(&mut self) -> Result<Option<Token>, ScanError> {
        let indent = loop {
            let count = self.count_indentation()?;
            match self.chars.peek() {
                None => return Ok(None),
                Some(&(_, '\n')) => {
                    self.advance_char();
                }
                Some(&(_, '#')) => {
                    self.skip_line_comment();
                }
                Some(_) => break count,
            }
        };

        let current = match self.indent_stack.last() {
            Some(&level) => level,
            None => 0,
        };
        let span = self.here();

        if indent > current {
            self.indent_stack.push(indent);
            return Ok(Some(Token::new(TokenKind::Indent, span)));
        }
        if indent < current {
            while let Some(&top) = self.indent_stack.last() {
                if top > indent {
                    self.indent_stack.pop();
                    self.pending.push(Token::new(TokenKind::Dedent, span));
                } else {
                    break;
                }
            }
            if self.indent_stack.last() != Some(&indent) {
                return Err(self.error_at(
                    &format!("Invalid dedent to {} spaces", indent),
                    self.line,
                    self.column,
                ));
            }
            return Ok(self.pending.pop());
        }
        Ok(None)
    }

    fn count_indentation(&mut self) -> Result<usize, ScanError> {
        let mut count = 0;
        while let Some(&(_, c)) = self.chars.peek() {
            if c == ' ' {
                self.advance_char();
                count += 1;
            } else if c == '\t' {
                return Err(self.error_at(
                    "Tabs are not supported for indentation",
                    self.line,
                    self.column,
                ));
            } else {
                break;
            }
        }
        Ok(count)
    }

    /// Drain remaining dedents at end of input.
    fn finish_input(&mut self) -> Result<Token, ScanError> {
        self.eof_reached = true;
        let span = self.here();
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.pending.push(Token::new(TokenKind::Dedent, span));
        }
        match self.pending.pop() {
            Some(token) => Ok(token),
            None => Ok(Token::new(TokenKind::Eof, span)),
        }
    }

    fn one_or_eq(&mut self, plain: TokenKind, with_eq: TokenKind, span: Span) -> Token {
        self.advance_char();
        if matches!(self.chars.peek(), Some(&(_, '='))) {
            self.advance_char();
            return Token::new(with_eq, span);
        }
        Token::new(plain, span)
    }

    fn read_name(&mut self, start: usize, line: usize, column: usize) -> Token {
        self.advance_char();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance_char();
            } else {
                break;
            }
        }
        let end = self.current_index();
        let text = &self.input[start..end];
        let kind = match text {
            "and" => TokenKind::And,
            "as" => TokenKind::As,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "def" => TokenKind::Def,
            "del" => TokenKind::Del,
            "elif" => TokenKind::Elif,
            "else" => TokenKind::Else,
            "except" => TokenKind::Except,
            "finally" => TokenKind::Finally,
            "for" => TokenKind::For,
            "global" => TokenKind::Global,
            "if" => TokenKind::If,
            "import" => TokenKind::Import,
            "in" => TokenKind::In,
            "is" => TokenKind::Is,
            "lambda" => TokenKind::Lambda,
            "not" => TokenKind::Not,
            "or" => TokenKind::Or,
            "pass" => TokenKind::Pass,
            "raise" => TokenKind::Raise,
            "return" => TokenKind::Return,
            "try" => TokenKind::Try,
            "while" => TokenKind::While,
            "with" => TokenKind::With,
            "yield" => TokenKind::Yield,
            _ => TokenKind::Name(text.to_string()),
        };
        Token::new(
            kind,
            Span {
                start,
                end,
                line,
                column,
            },
        )
    }

    fn read_number(&mut self, start: usize, line: usize, column: usize) -> Token {
        self.advance_char();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_digit() {
                self.advance_char();
            } else {
                break;
            }
        }
        if matches!(self.chars.peek(), Some(&(_, '.'))) {
            self.advance_char();
            while let Some(&(_, c)) = self.chars.peek() {
                if c.is_ascii_digit() {
                    self.advance_char();
                } else {
                    break;
                }
            }
        }
        let end = self.current_index();
        Token::new(
            TokenKind::Number(self.input[start..end].to_string()),
            Span {
                start,
                end,
                line,
                column,
            },
        )
    }

    fn read_string(
        &mut self,
        start: usize,
        line: usize,
        column: usize,
    ) -> Result<Token, ScanError> {
        let quote = match self.advance_char() {
            Some((_, c)) => c,
            None => return Err(self.error_at("Unterminated string literal", line, column)),
        };
        let mut value = String::new();
        loop {
            match self.chars.peek() {
                None => return Err(self.error_at("Unterminated string literal", line, column)),
                Some(&(idx, c)) if c == quote => {
                    self.advance_char();
                    return Ok(Token::new(
                        TokenKind::Str(value),
                        Span {
                            start,
                            end: idx + 1,
                            line,
                            column,
                        },
                    ));
                }
                Some(&(_, '\n')) => {
                    return Err(self.error_at("Unterminated string literal", line, column));
                }
                Some(&(_, '\\')) => {
                    self.advance_char();
                    match self.advance_char() {
                        Some((_, 'n')) => value.push('\n'),
                        Some((_, 't')) => value.push('\t'),
                        Some((_, 'r')) => value.push('\r'),
                        Some((_, '0')) => value.push('\0'),
                        Some((_, '\\')) => value.push('\\'),
                        Some((_, '\'')) => value.push('\''),
                        Some((_, '"')) => value.push('"'),
                        Some((_, other)) => {
                            // Unknown escape: keep the backslash, like Python.
                            value.push('\\');
                            value.push(other);
                        }
                        None => {
                            return Err(self.error_at("Unterminated string literal", line, column));
                        }
                    }
                }
                Some(&(_, c)) => {
                    value.push(c);
                    self.advance_char();
                }
            }
        }
    }

    fn skip_line_comment(&mut self) {
        let start = self.current_index();
        let target = match memchr::memchr(b'\n', &self.input.as_bytes()[start..]) {
            Some(offset) => start + offset,
            None => self.input.len(),
        };
        while self.current_index() < target {
            self.advance_char();
        }
    }

    fn skip_spaces(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance_char();
            } else {
                break;
            }
        }
    }

    fn advance_char(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, c)) = next {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        next
    }

    fn current_index(&mut self) -> usize {
        self.chars
            .peek()
            .map(|&(idx, _)| idx)
            .unwrap_or(self.input.len())
    }

    fn here(&mut self) -> Span {
        let index = self.current_index();
        Span {
            start: index,
            end: index,
            line: self.line,
            column: self.column,
        }
    }

    fn error_at(&self, message: &str, line: usize, column: usize) -> ScanError {
        ScanError {
            message: message.to_string(),
            line,
            column,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) => {
                if matches!(token.kind, TokenKind::Eof) {
                    None
                } else {
                    Some(Ok(token))
                }
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Tokenize the whole input, including the trailing `Eof` token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ScanError> {
    let mut scanner = Scanner::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token()?;
        let is_eof = matches!(token.kind, TokenKind::Eof);
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .expect("tokenize should succeed")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn simple_block_structure() {
        let actual = kinds("def f():\n    a = 1\nf()\n");
        let expected = vec![
            TokenKind::Def,
            TokenKind::Name("f".to_string()),
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Colon,
            TokenKind::Newline,
            TokenKind::Indent,
            TokenKind::Name("a".to_string()),
            TokenKind::Assign,
            TokenKind::Number("1".to_string()),
            TokenKind::Newline,
            TokenKind::Dedent,
            TokenKind::Name("f".to_string()),
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Newline,
            TokenKind::Eof,
        ];
        assert_eq!(actual, expected);
    }

    #[test]
    fn blank_and_comment_lines_produce_no_tokens() {
        let actual = kinds("a = 1\n\n# comment\n    \nb = 2\n");
        let expected = vec![
            TokenKind::Name("a".to_string()),
            TokenKind::Assign,
            TokenKind::Number("1".to_string()),
            TokenKind::Newline,
            TokenKind::Name("b".to_string()),
            TokenKind::Assign,
            TokenKind::Number("2".to_string()),
            TokenKind::Newline,
            TokenKind::Eof,
        ];
        assert_eq!(actual, expected);
    }

    #[test]
    fn newlines_inside_brackets_are_joined() {
        let actual = kinds("a = [1,\n     2]\n");
        let expected = vec![
            TokenKind::Name("a".to_string()),
            TokenKind::Assign,
            TokenKind::LBracket,
            TokenKind::Number("1".to_string()),
            TokenKind::Comma,
            TokenKind::Number("2".to_string()),
            TokenKind::RBracket,
            TokenKind::Newline,
            TokenKind::Eof,
        ];
        assert_eq!(actual, expected);
    }

    #[test]
    fn dedents_drain_at_eof() {
        let actual = kinds("if x:\n    if y:\n        pass");
        assert_eq!(
            actual
                .iter()
                .filter(|k| matches!(k, TokenKind::Dedent))
                .count(),
            2
        );
        assert_eq!(actual.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn string_escapes_are_decoded() {
        let actual = kinds("s = 'a\\nb'\n");
        assert!(actual.contains(&TokenKind::Str("a\nb".to_string())));
    }

    #[test]
    fn two_char_operators() {
        let actual = kinds("a <= b != c ** d // e\n");
        assert!(actual.contains(&TokenKind::LtEq));
        assert!(actual.contains(&TokenKind::NotEq));
        assert!(actual.contains(&TokenKind::StarStar));
        assert!(actual.contains(&TokenKind::SlashSlash));
    }

    #[test]
    fn errors_on_invalid_character() {
        let err = tokenize("x = 1 @ 2\n").expect_err("expected scan failure");
        assert!(err.to_string().contains("Unexpected character '@'"));
    }

    #[test]
    fn errors_on_bad_dedent() {
        let err = tokenize("if x:\n    a = 1\n  b = 2\n").expect_err("expected dedent failure");
        assert!(err.to_string().contains("Invalid dedent"));
    }

    #[test]
    fn errors_on_tab_indentation() {
        let err = tokenize("if x:\n\ta = 1\n").expect_err("expected tab failure");
        assert!(err.to_string().contains("Tabs are not supported"));
    }
}
