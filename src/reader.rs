//! S-expression reader
//!
//! `Lexer` turns text into located tokens, `Reader` turns tokens into
//! values. `DatumParser` combines the two behind the `Parser` trait that
//! the session uses for batch reads.

use crate::error::{LError, LResult};
use crate::printer::char_from_name;
use crate::symbol::SymbolTable;
use crate::value::{cons, Value};

/// Batch parser used by the session to read a whole pending chunk of text.
pub trait Parser {
    /// Parse every top-level form in `text`. Each form comes with the byte
    /// offset just past its last character.
    fn parse_all(&mut self, text: &str) -> LResult<Vec<(Value, usize)>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLoc {
    pub line: usize,
    pub col: usize,
}

impl SourceLoc {
    pub fn new(line: usize, col: usize) -> Self {
        SourceLoc { line, col }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithLoc {
    pub token: Token,
    pub loc: SourceLoc,
    /// Byte offset just past the token.
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    VectorOpen,
    BytevectorOpen,
    Dot,
    Quote,
    Quasiquote,
    Unquote,
    UnquoteSplicing,
    Symbol(String),
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Char(char),
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || "()[]\";'`,".contains(c)
}

fn lexical_error(message: impl Into<String>, loc: SourceLoc) -> LError {
    LError::lexical_violation(
        "read",
        format!("{} at line {}, column {}", message.into(), loc.line, loc.col),
    )
}

pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    offset: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            pos: 0,
            offset: 0,
            line: 1,
            col: 1,
        }
    }

    fn get_loc(&self) -> SourceLoc {
        SourceLoc::new(self.line, self.col)
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current();
        if let Some(ch) = c {
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.offset += ch.len_utf8();
            self.pos += 1;
        }
        c
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.advance() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) -> LResult<()> {
        let loc = self.get_loc();
        self.advance(); // #
        self.advance(); // |
        let mut depth = 1;
        while depth > 0 {
            match (self.current(), self.peek(1)) {
                (None, _) => return Err(lexical_error("Unterminated block comment", loc)),
                (Some('|'), Some('#')) => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                }
                (Some('#'), Some('|')) => {
                    self.advance();
                    self.advance();
                    depth += 1;
                }
                _ => {
                    self.advance();
                }
            }
        }
        Ok(())
    }

    fn skip_whitespace(&mut self) -> LResult<()> {
        while let Some(c) = self.current() {
            if c.is_whitespace() {
                self.advance();
            } else if c == ';' {
                self.skip_line();
            } else if c == '#' && self.peek(1) == Some('!') {
                // #!/usr/bin/env ... or #!r6rs
                self.skip_line();
            } else if c == '#' && self.peek(1) == Some('|') {
                self.skip_block_comment()?;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn read_string(&mut self) -> LResult<String> {
        let loc = self.get_loc();
        self.advance(); // skip opening quote
        let mut s = String::new();
        loop {
            match self.current() {
                None => return Err(lexical_error("Unterminated string", loc)),
                Some('"') => {
                    self.advance();
                    return Ok(s);
                }
                Some('\\') => {
                    self.advance();
                    match self.current() {
                        Some('n') => s.push('\n'),
                        Some('t') => s.push('\t'),
                        Some('r') => s.push('\r'),
                        Some('a') => s.push('\u{7}'),
                        Some('0') => s.push('\0'),
                        Some('\\') => s.push('\\'),
                        Some('"') => s.push('"'),
                        Some(c) => s.push(c),
                        None => return Err(lexical_error("Unterminated string escape", loc)),
                    }
                    self.advance();
                }
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_atom(&mut self) -> String {
        let mut atom = String::new();
        while let Some(c) = self.current() {
            if is_delimiter(c) {
                break;
            }
            atom.push(c);
            self.advance();
        }
        atom
    }

    fn classify_atom(atom: String) -> Token {
        if atom == "." {
            return Token::Dot;
        }
        if let Ok(n) = atom.parse::<i64>() {
            return Token::Integer(n);
        }
        match atom.as_str() {
            "+inf.0" => return Token::Float(f64::INFINITY),
            "-inf.0" => return Token::Float(f64::NEG_INFINITY),
            "+nan.0" | "-nan.0" => return Token::Float(f64::NAN),
            _ => {}
        }
        let mut chars = atom.chars();
        let numeric_start = match (chars.next(), chars.next()) {
            (Some(c), _) if c.is_ascii_digit() => true,
            (Some('+' | '-' | '.'), Some(d)) => d.is_ascii_digit() || d == '.',
            _ => false,
        };
        if numeric_start {
            if let Ok(f) = atom.parse::<f64>() {
                return Token::Float(f);
            }
        }
        Token::Symbol(atom)
    }

    fn read_char_literal(&mut self, loc: SourceLoc) -> LResult<Token> {
        // The first character is taken as-is, even a delimiter: #\( or #\ .
        let first = self
            .advance()
            .ok_or_else(|| lexical_error("Unterminated character literal", loc))?;
        let mut name = String::from(first);
        name.push_str(&self.read_atom());
        if name.chars().count() == 1 {
            return Ok(Token::Char(first));
        }
        if let Some(c) = char_from_name(&name) {
            return Ok(Token::Char(c));
        }
        if let Some(hex) = name.strip_prefix('x') {
            if let Some(c) = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
                return Ok(Token::Char(c));
            }
        }
        Err(lexical_error(format!("Unknown character name #\\{}", name), loc))
    }

    fn read_hash(&mut self, loc: SourceLoc) -> LResult<Token> {
        self.advance(); // #
        match self.current() {
            Some('(') => {
                self.advance();
                Ok(Token::VectorOpen)
            }
            Some('\\') => {
                self.advance();
                self.read_char_literal(loc)
            }
            Some(_) => {
                let atom = self.read_atom();
                match atom.as_str() {
                    "t" | "true" => Ok(Token::Bool(true)),
                    "f" | "false" => Ok(Token::Bool(false)),
                    "vu8" if self.current() == Some('(') => {
                        self.advance();
                        Ok(Token::BytevectorOpen)
                    }
                    _ => Err(lexical_error(format!("Invalid # syntax: #{}", atom), loc)),
                }
            }
            None => Err(lexical_error("Invalid # syntax", loc)),
        }
    }

    pub fn next_token_with_loc(&mut self) -> LResult<Option<TokenWithLoc>> {
        self.skip_whitespace()?;
        let loc = self.get_loc();

        let token = match self.current() {
            None => return Ok(None),
            Some(c @ ('(' | ')' | '[' | ']' | '\'' | '`')) => {
                self.advance();
                match c {
                    '(' => Token::LeftParen,
                    ')' => Token::RightParen,
                    '[' => Token::LeftBracket,
                    ']' => Token::RightBracket,
                    '\'' => Token::Quote,
                    _ => Token::Quasiquote,
                }
            }
            Some(',') => {
                self.advance();
                if self.current() == Some('@') {
                    self.advance();
                    Token::UnquoteSplicing
                } else {
                    Token::Unquote
                }
            }
            Some('"') => Token::String(self.read_string()?),
            Some('#') => self.read_hash(loc)?,
            Some(_) => Self::classify_atom(self.read_atom()),
        };

        Ok(Some(TokenWithLoc {
            token,
            loc,
            end: self.offset,
        }))
    }

    pub fn next_token(&mut self) -> LResult<Option<Token>> {
        self.next_token_with_loc()
            .map(|opt| opt.map(|twl| twl.token))
    }

    pub fn tokenize(mut self) -> LResult<Vec<TokenWithLoc>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token_with_loc()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

pub struct Reader {
    tokens: Vec<TokenWithLoc>,
    pos: usize,
}

impl Reader {
    pub fn new(tokens: Vec<TokenWithLoc>) -> Self {
        Reader { tokens, pos: 0 }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn current_loc(&self) -> SourceLoc {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.loc)
            .unwrap_or(SourceLoc::new(1, 1))
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.current().cloned();
        self.pos += 1;
        token
    }

    /// Byte offset just past the most recently consumed token.
    pub fn consumed(&self) -> usize {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(t) => t.end,
            None => 0,
        }
    }

    /// Try to read a single value from the token stream.
    /// Returns None at the end of the tokens.
    pub fn try_read(&mut self, symbols: &mut SymbolTable) -> Option<LResult<Value>> {
        self.current()?;
        Some(self.read(symbols))
    }

    pub fn read(&mut self, symbols: &mut SymbolTable) -> LResult<Value> {
        let loc = self.current_loc();
        let token = match self.advance() {
            Some(token) => token,
            None => return Err(lexical_error("Unexpected end of input", loc)),
        };
        match token {
            Token::LeftParen => self.read_list(symbols, Token::RightParen, loc),
            Token::LeftBracket => self.read_list(symbols, Token::RightBracket, loc),
            Token::VectorOpen => Ok(Value::vector(self.read_sequence(symbols, loc)?)),
            Token::BytevectorOpen => self.read_bytevector(symbols, loc),
            Token::Quote => self.read_abbreviation(symbols, "quote"),
            Token::Quasiquote => self.read_abbreviation(symbols, "quasiquote"),
            Token::Unquote => self.read_abbreviation(symbols, "unquote"),
            Token::UnquoteSplicing => self.read_abbreviation(symbols, "unquote-splicing"),
            Token::Integer(n) => Ok(Value::Int(n)),
            Token::Float(f) => Ok(Value::Float(f)),
            Token::String(s) => Ok(Value::string(&s)),
            Token::Bool(b) => Ok(Value::Bool(b)),
            Token::Char(c) => Ok(Value::Char(c)),
            Token::Symbol(s) => Ok(Value::Symbol(symbols.intern(&s))),
            Token::Dot => Err(lexical_error("Unexpected .", loc)),
            Token::RightParen => Err(lexical_error("Unexpected )", loc)),
            Token::RightBracket => Err(lexical_error("Unexpected ]", loc)),
        }
    }

    fn read_abbreviation(&mut self, symbols: &mut SymbolTable, marker: &str) -> LResult<Value> {
        let datum = self.read(symbols)?;
        let marker = Value::Symbol(symbols.intern(marker));
        Ok(cons(marker, cons(datum, Value::Nil)))
    }

    fn read_list(
        &mut self,
        symbols: &mut SymbolTable,
        close: Token,
        open_loc: SourceLoc,
    ) -> LResult<Value> {
        let mut elements = Vec::new();
        let mut tail = Value::Nil;

        loop {
            match self.current() {
                None => return Err(lexical_error("Unterminated list", open_loc)),
                Some(t) if *t == close => {
                    self.advance();
                    break;
                }
                Some(Token::RightParen) | Some(Token::RightBracket) => {
                    return Err(lexical_error("Mismatched closing delimiter", self.current_loc()))
                }
                Some(Token::Dot) => {
                    let dot_loc = self.current_loc();
                    if elements.is_empty() {
                        return Err(lexical_error("Unexpected . at start of list", dot_loc));
                    }
                    self.advance();
                    tail = self.read(symbols)?;
                    if self.current() != Some(&close) {
                        return Err(lexical_error("Expected one datum after .", dot_loc));
                    }
                    self.advance();
                    break;
                }
                _ => elements.push(self.read(symbols)?),
            }
        }

        Ok(elements
            .into_iter()
            .rev()
            .fold(tail, |acc, v| cons(v, acc)))
    }

    fn read_sequence(&mut self, symbols: &mut SymbolTable, open_loc: SourceLoc) -> LResult<Vec<Value>> {
        let mut elements = Vec::new();
        loop {
            match self.current() {
                None => return Err(lexical_error("Unterminated vector", open_loc)),
                Some(Token::RightParen) => {
                    self.advance();
                    return Ok(elements);
                }
                _ => elements.push(self.read(symbols)?),
            }
        }
    }

    fn read_bytevector(&mut self, symbols: &mut SymbolTable, open_loc: SourceLoc) -> LResult<Value> {
        let elements = self.read_sequence(symbols, open_loc)?;
        let mut bytes = Vec::with_capacity(elements.len());
        for element in elements {
            match element.as_int().and_then(|n| u8::try_from(n).ok()) {
                Some(byte) => bytes.push(byte),
                None => {
                    return Err(lexical_error(
                        format!("Invalid bytevector element: {:?}", element),
                        open_loc,
                    ))
                }
            }
        }
        Ok(Value::bytevector(bytes))
    }
}

/// Default parser: the lexer and reader above with its own symbol table.
#[derive(Debug, Default)]
pub struct DatumParser {
    symbols: SymbolTable,
}

impl DatumParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}

impl Parser for DatumParser {
    fn parse_all(&mut self, text: &str) -> LResult<Vec<(Value, usize)>> {
        let mut reader = Reader::new(Lexer::new(text).tokenize()?);
        let mut forms = Vec::new();
        while let Some(result) = reader.try_read(&mut self.symbols) {
            forms.push((result?, reader.consumed()));
        }
        Ok(forms)
    }
}

/// Read the first datum of `input`.
pub fn read_str(input: &str, symbols: &mut SymbolTable) -> LResult<Value> {
    let mut reader = Reader::new(Lexer::new(input).tokenize()?);
    match reader.try_read(symbols) {
        Some(result) => result,
        None => Err(LError::lexical_violation("read", "No input")),
    }
}
