//! Lexical pass over C-family source text.
//!
//! The lexer never parses: it only separates code from comments (`//`,
//! `/* */`, Razor `@* *@`) and string literals so the classifier can look at
//! code tokens alone. State is kept explicitly in [`LexState`] plus a frame
//! stack for string literals and the interpolation holes nested inside them
//! (`$"a{b["c"]}"`, `` `a${b}` ``).

use std::mem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    Code,
    LineComment,
    BlockComment,
    StringLiteral,
    /// Code inside an interpolation hole of a string literal.
    InterpolatedExpression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based.
    pub line: usize,
    /// 1-based, in characters.
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Str(StrLit),
    Number,
    Punct(char),
}

/// A string literal split into literal text and interpolation holes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrLit {
    pub parts: Vec<StrPart>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StrPart {
    Text(String),
    /// Tokens of an interpolated expression.
    Hole(Vec<Token>),
}

impl StrLit {
    /// Full text when the literal has no interpolation holes.
    pub fn literal(&self) -> Option<String> {
        let mut text = String::new();
        for part in &self.parts {
            match part {
                StrPart::Text(t) => text.push_str(t),
                StrPart::Hole(_) => return None,
            }
        }
        Some(text)
    }

    pub fn holes(&self) -> impl Iterator<Item = &[Token]> {
        self.parts.iter().filter_map(|part| match part {
            StrPart::Hole(tokens) => Some(tokens.as_slice()),
            StrPart::Text(_) => None,
        })
    }
}

/// Token stream of one source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    /// A string literal or block comment was still open at end of input.
    /// Tokens inside it are dropped.
    pub partial: bool,
}

pub fn tokenize(source: &str) -> Lexed {
    Lexer::new(source).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interpolation {
    None,
    /// C# `$"..{expr}.."` with `{{`/`}}` escapes.
    Brace,
    /// JS/TS template `..${expr}..`.
    DollarBrace,
}

#[derive(Debug)]
struct StringFrame {
    quote: char,
    /// No backslash escapes; a doubled quote is a literal quote.
    verbatim: bool,
    interpolation: Interpolation,
    /// Quote-delimited text that stops at a line break (`'x'`).
    single_line: bool,
    parts: Vec<StrPart>,
    text: String,
    /// Char index just past the opening quote.
    start: usize,
    line: usize,
    column: usize,
}

impl StringFrame {
    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.parts.push(StrPart::Text(mem::take(&mut self.text)));
        }
    }
}

#[derive(Debug)]
enum Frame {
    String(StringFrame),
    Hole { tokens: Vec<Token>, depth: usize },
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    state: LexState,
    /// Second character of the open block comment's terminator (`*/`, `*@`).
    comment_close: char,
    tokens: Vec<Token>,
    stack: Vec<Frame>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            state: LexState::Code,
            comment_close: '/',
            tokens: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> Lexed {
        loop {
            let Some(c) = self.peek(0) else {
                if self.abandon_single_line() {
                    continue;
                }
                break;
            };
            match self.state {
                LexState::Code | LexState::InterpolatedExpression => self.lex_code(c),
                LexState::LineComment => {
                    if c == '\n' {
                        self.state = self.code_state();
                    }
                    self.bump();
                }
                LexState::BlockComment => {
                    if c == '*' && self.peek(1) == Some(self.comment_close) {
                        self.bump_n(2);
                        self.state = self.code_state();
                    } else {
                        self.bump();
                    }
                }
                LexState::StringLiteral => self.lex_string(c),
            }
        }

        let partial = self.state == LexState::BlockComment
            || self.stack.iter().any(|frame| match frame {
                Frame::Hole { .. } => true,
                Frame::String(s) => !s.single_line,
            });
        Lexed {
            tokens: self.tokens,
            partial,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) {
        if let Some(&c) = self.chars.get(self.pos) {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn code_state(&self) -> LexState {
        match self.stack.last() {
            Some(Frame::Hole { .. }) => LexState::InterpolatedExpression,
            _ => LexState::Code,
        }
    }

    fn emit(&mut self, kind: TokenKind, line: usize, column: usize) {
        let token = Token { kind, line, column };
        match self.stack.last_mut() {
            Some(Frame::Hole { tokens, .. }) => tokens.push(token),
            _ => self.tokens.push(token),
        }
    }

    fn lex_code(&mut self, c: char) {
        let (line, column) = (self.line, self.column);
        if let Some((len, verbatim, interpolated)) = self.string_prefix() {
            self.bump_n(len + 1);
            let interpolation = if interpolated {
                Interpolation::Brace
            } else {
                Interpolation::None
            };
            self.open_string('"', verbatim, interpolation, false, line, column);
            return;
        }

        match c {
            '/' if self.peek(1) == Some('/') => {
                self.bump_n(2);
                self.state = LexState::LineComment;
            }
            '/' | '@' if self.peek(1) == Some('*') => {
                self.bump_n(2);
                self.comment_close = c;
                self.state = LexState::BlockComment;
            }
            '"' => {
                self.bump();
                self.open_string('"', false, Interpolation::None, false, line, column);
            }
            '\'' => {
                self.bump();
                self.open_string('\'', false, Interpolation::None, true, line, column);
            }
            '`' => {
                self.bump();
                self.open_string('`', false, Interpolation::DollarBrace, false, line, column);
            }
            '{' => {
                if let Some(Frame::Hole { depth, .. }) = self.stack.last_mut() {
                    *depth += 1;
                }
                self.bump();
                self.emit(TokenKind::Punct('{'), line, column);
            }
            '}' => {
                if let Some(Frame::Hole { depth, .. }) = self.stack.last_mut() {
                    if *depth == 0 {
                        self.bump();
                        self.close_hole();
                        return;
                    }
                    *depth -= 1;
                }
                self.bump();
                self.emit(TokenKind::Punct('}'), line, column);
            }
            c if is_ident_start(c) => {
                let mut name = String::new();
                while let Some(c) = self.peek(0).filter(|c| is_ident_continue(*c)) {
                    name.push(c);
                    self.bump();
                }
                self.emit(TokenKind::Ident(name), line, column);
            }
            c if c.is_ascii_digit() => {
                while let Some(c) = self.peek(0) {
                    let fraction = c == '.' && self.peek(1).is_some_and(|n| n.is_ascii_digit());
                    if !(c.is_alphanumeric() || c == '_' || fraction) {
                        break;
                    }
                    self.bump();
                }
                self.emit(TokenKind::Number, line, column);
            }
            c if c.is_whitespace() => self.bump(),
            c => {
                self.bump();
                self.emit(TokenKind::Punct(c), line, column);
            }
        }
    }

    /// `(prefix length, verbatim, interpolated)` for `$"`, `@"`, `$@"` and `@$"`.
    fn string_prefix(&self) -> Option<(usize, bool, bool)> {
        match (self.peek(0)?, self.peek(1), self.peek(2)) {
            ('$', Some('"'), _) => Some((1, false, true)),
            ('@', Some('"'), _) => Some((1, true, false)),
            ('$', Some('@'), Some('"')) | ('@', Some('$'), Some('"')) => Some((2, true, true)),
            _ => None,
        }
    }

    fn open_string(
        &mut self,
        quote: char,
        verbatim: bool,
        interpolation: Interpolation,
        single_line: bool,
        line: usize,
        column: usize,
    ) {
        self.stack.push(Frame::String(StringFrame {
            quote,
            verbatim,
            interpolation,
            single_line,
            parts: Vec::new(),
            text: String::new(),
            start: self.pos,
            line,
            column,
        }));
        self.state = LexState::StringLiteral;
    }

    fn lex_string(&mut self, c: char) {
        let next = self.peek(1);
        let Some(Frame::String(frame)) = self.stack.last_mut() else {
            self.state = self.code_state();
            return;
        };

        if c == frame.quote {
            if frame.verbatim && next == Some(frame.quote) {
                frame.text.push(c);
                self.bump_n(2);
            } else {
                self.bump();
                self.close_string();
            }
            return;
        }

        if frame.single_line && (c == '\n' || (c == '\\' && next == Some('\n'))) {
            self.abandon_single_line();
            return;
        }

        if c == '\\' && !frame.verbatim {
            if let Some(escaped) = next {
                frame.text.push(unescape(escaped));
            }
            self.bump_n(2);
            return;
        }

        match (frame.interpolation, c, next) {
            (Interpolation::Brace, '{', Some('{')) | (Interpolation::Brace, '}', Some('}')) => {
                frame.text.push(c);
                self.bump_n(2);
            }
            (Interpolation::Brace, '{', _) => {
                self.bump();
                self.open_hole();
            }
            (Interpolation::DollarBrace, '$', Some('{')) => {
                self.bump_n(2);
                self.open_hole();
            }
            _ => {
                frame.text.push(c);
                self.bump();
            }
        }
    }

    /// Drop an open `'` frame that never closed (an apostrophe in prose or
    /// markup) and lex the rest of its line as code again.
    fn abandon_single_line(&mut self) -> bool {
        let Some(Frame::String(frame)) = self.stack.last() else {
            return false;
        };
        if !frame.single_line {
            return false;
        }
        let (start, line, column) = (frame.start, frame.line, frame.column + 1);
        self.stack.pop();
        self.pos = start;
        self.line = line;
        self.column = column;
        self.state = self.code_state();
        true
    }

    fn open_hole(&mut self) {
        if let Some(Frame::String(frame)) = self.stack.last_mut() {
            frame.flush_text();
        }
        self.stack.push(Frame::Hole {
            tokens: Vec::new(),
            depth: 0,
        });
        self.state = LexState::InterpolatedExpression;
    }

    fn close_hole(&mut self) {
        if let Some(Frame::Hole { tokens, .. }) = self.stack.pop()
            && let Some(Frame::String(frame)) = self.stack.last_mut()
        {
            frame.parts.push(StrPart::Hole(tokens));
        }
        self.state = LexState::StringLiteral;
    }

    fn close_string(&mut self) {
        if let Some(Frame::String(mut frame)) = self.stack.pop() {
            frame.flush_text();
            let literal = StrLit { parts: frame.parts };
            self.emit(TokenKind::Str(literal), frame.line, frame.column);
        }
        self.state = self.code_state();
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}
