//! Recognizes key-access shapes in a token stream.

use std::{
    collections::HashSet,
    path::Path,
    sync::LazyLock,
};

use regex::Regex;

use super::{
    lexer::{StrPart, Token, TokenKind},
    reference::{AccessPattern, Confidence, UsageReference},
};

/// Members of generated resource classes that are not keys.
const NON_KEY_MEMBERS: &[&str] = &["ResourceManager", "Culture"];

static FORMAT_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\d+(?:,[^{}]*)?(?::[^{}]*)?\}").expect("format placeholder pattern is valid")
});

/// Words that can precede a call but never a return type.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return", "await", "new", "yield", "throw", "else", "case", "in", "is", "as", "out", "ref",
    "typeof", "nameof", "do",
];

/// Statements naming namespaces rather than values.
const IMPORT_KEYWORDS: &[&str] = &["using", "import", "namespace", "package"];

/// Names that mark an accessor in source code.
#[derive(Debug, Clone, Default)]
pub struct Accessors {
    /// Generated classes exposing keys as members (`Resources.Hello`).
    pub resource_classes: HashSet<String>,
    /// Indexable localizer variables (`_localizer["Hello"]`).
    pub localizers: HashSet<String>,
    /// Lookup helpers taking the key as first argument (`GetString("Hello")`).
    pub wrapper_methods: HashSet<String>,
}

impl Accessors {
    pub fn new<S: Into<String>>(
        resource_classes: impl IntoIterator<Item = S>,
        localizers: impl IntoIterator<Item = S>,
        wrapper_methods: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            resource_classes: resource_classes.into_iter().map(Into::into).collect(),
            localizers: localizers.into_iter().map(Into::into).collect(),
            wrapper_methods: wrapper_methods.into_iter().map(Into::into).collect(),
        }
    }

    fn indexer_confidence(&self, name: &str) -> Option<Confidence> {
        if self.localizers.contains(name) {
            Some(Confidence::High)
        } else if name.to_ascii_lowercase().contains("localizer") {
            Some(Confidence::Medium)
        } else {
            None
        }
    }
}

/// Every key reference in `tokens`, including those inside interpolation holes.
pub fn classify(path: &Path, tokens: &[Token], accessors: &Accessors) -> Vec<UsageReference> {
    let mut classifier = Classifier {
        path,
        accessors,
        references: Vec::new(),
    };
    classifier.walk(tokens);
    classifier.references
}

struct Classifier<'a> {
    path: &'a Path,
    accessors: &'a Accessors,
    references: Vec<UsageReference>,
}

impl Classifier<'_> {
    fn walk(&mut self, tokens: &[Token]) {
        let mut i = 0;
        while i < tokens.len() {
            if let Some(end) = import_statement_end(tokens, i) {
                i = end;
                continue;
            }

            if let TokenKind::Str(literal) = &tokens[i].kind {
                for hole in literal.holes() {
                    self.walk(hole);
                }
            }

            let found = self
                .static_member(tokens, i)
                .or_else(|| self.indexer(tokens, i))
                .or_else(|| self.wrapper_call(tokens, i));
            if let Some(reference) = found {
                self.references.push(reference);
            }
            // One token at a time: key expressions may hold references too.
            i += 1;
        }
    }

    fn static_member(&self, tokens: &[Token], i: usize) -> Option<UsageReference> {
        let class = ident(tokens.get(i))?;
        if !self.accessors.resource_classes.contains(class) || !is_punct(tokens.get(i + 1), '.') {
            return None;
        }
        let member = ident(tokens.get(i + 2))?;
        if NON_KEY_MEMBERS.contains(&member) {
            return None;
        }
        Some(self.reference(
            &tokens[i],
            KeyExpr::Literal(member.to_string()),
            AccessPattern::StaticMember,
            Confidence::High,
        ))
    }

    fn indexer(&self, tokens: &[Token], i: usize) -> Option<UsageReference> {
        let name = ident(tokens.get(i))?;
        let confidence = self.accessors.indexer_confidence(name)?;
        if !is_punct(tokens.get(i + 1), '[') {
            return None;
        }
        let close = matching_close(tokens, i + 1)?;
        let key = KeyExpr::analyze(&tokens[i + 2..close])?;
        Some(self.reference(&tokens[i], key, AccessPattern::Indexer, confidence))
    }

    fn wrapper_call(&self, tokens: &[Token], i: usize) -> Option<UsageReference> {
        let name = ident(tokens.get(i))?;
        if !self.accessors.wrapper_methods.contains(name) || !is_punct(tokens.get(i + 1), '(') {
            return None;
        }
        let close = matching_close(tokens, i + 1)?;
        if is_declaration(tokens, i, close) {
            return None;
        }
        let arguments = &tokens[i + 2..close];
        let first = split_top_level(arguments, ',').next().unwrap_or_default();
        let key = KeyExpr::analyze(first)?;
        Some(self.reference(&tokens[i], key, AccessPattern::WrapperCall, Confidence::Medium))
    }

    fn reference(
        &self,
        at: &Token,
        key: KeyExpr,
        pattern: AccessPattern,
        confidence: Confidence,
    ) -> UsageReference {
        let (key, confidence, is_dynamic) = match key {
            KeyExpr::Literal(key) => (Some(key), confidence, false),
            KeyExpr::Dynamic(template) => (template, Confidence::Low, true),
        };
        UsageReference {
            file_path: self.path.to_path_buf(),
            line: at.line,
            column: at.column,
            key,
            pattern,
            confidence,
            is_dynamic,
        }
    }
}

/// Key expression of an accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyExpr {
    /// Constant text, including folded `"a" + ("b" + "c")` concatenations.
    Literal(String),
    /// Computed key: literal fragments with `*` for computed parts.
    Dynamic(Option<String>),
}

#[derive(Debug)]
enum Piece {
    Text(String),
    Computed,
}

impl KeyExpr {
    /// `None` for an empty expression or an empty literal key.
    fn analyze(tokens: &[Token]) -> Option<Self> {
        if tokens.is_empty() {
            return None;
        }
        let mut pieces = Vec::new();
        fold_concatenation(tokens, &mut pieces);

        if pieces.iter().all(|p| matches!(p, Piece::Text(_))) {
            let key: String = pieces
                .into_iter()
                .filter_map(|p| match p {
                    Piece::Text(text) => Some(text),
                    Piece::Computed => None,
                })
                .collect();
            return (!key.is_empty()).then_some(KeyExpr::Literal(key));
        }

        let mut template = String::new();
        let mut has_text = false;
        for piece in pieces {
            match piece {
                Piece::Text(text) => {
                    has_text |= !text.is_empty();
                    template.push_str(&text);
                }
                Piece::Computed if !template.ends_with('*') => template.push('*'),
                Piece::Computed => {}
            }
        }
        Some(KeyExpr::Dynamic(has_text.then_some(template)))
    }
}

fn fold_concatenation(tokens: &[Token], pieces: &mut Vec<Piece>) {
    let operands: Vec<&[Token]> = split_top_level(tokens, '+').collect();
    if operands.len() > 1 {
        for operand in operands {
            fold_concatenation(operand, pieces);
        }
        return;
    }

    let inner = strip_parens(tokens);
    if inner.len() < tokens.len() {
        fold_concatenation(inner, pieces);
        return;
    }

    match tokens {
        [Token {
            kind: TokenKind::Str(literal),
            ..
        }] => {
            for part in &literal.parts {
                pieces.push(match part {
                    StrPart::Text(text) => Piece::Text(text.clone()),
                    StrPart::Hole(_) => Piece::Computed,
                });
            }
            if literal.parts.is_empty() {
                pieces.push(Piece::Text(String::new()));
            }
        }
        _ => computed_operand(tokens, pieces),
    }
}

/// A non-literal operand keeps the text of string literals it is built from
/// (`string.Format("Status_{0}", s)` gives `Status_*`).
fn computed_operand(tokens: &[Token], pieces: &mut Vec<Piece>) {
    let start = pieces.len();
    for token in tokens {
        let TokenKind::Str(literal) = &token.kind else {
            continue;
        };
        for part in &literal.parts {
            match part {
                StrPart::Text(text) => push_format_text(text, pieces),
                StrPart::Hole(_) => pieces.push(Piece::Computed),
            }
        }
    }
    if !pieces[start..].iter().any(|p| matches!(p, Piece::Computed)) {
        pieces.push(Piece::Computed);
    }
}

/// Text with composite-format placeholders (`{0}`, `{1:N2}`) as computed parts.
fn push_format_text(text: &str, pieces: &mut Vec<Piece>) {
    let mut last = 0;
    for placeholder in FORMAT_PLACEHOLDER.find_iter(text) {
        if placeholder.start() > last {
            pieces.push(Piece::Text(text[last..placeholder.start()].to_string()));
        }
        pieces.push(Piece::Computed);
        last = placeholder.end();
    }
    if last < text.len() {
        pieces.push(Piece::Text(text[last..].to_string()));
    }
}

/// `tokens` without one pair of enclosing parentheses, if it has them.
fn strip_parens(tokens: &[Token]) -> &[Token] {
    if is_punct(tokens.first(), '(') && matching_close(tokens, 0) == Some(tokens.len() - 1) {
        &tokens[1..tokens.len() - 1]
    } else {
        tokens
    }
}

/// Split at `separator` outside any bracket pair.
fn split_top_level(tokens: &[Token], separator: char) -> impl Iterator<Item = &[Token]> {
    let mut depth = 0usize;
    let mut bounds = Vec::new();
    let mut start = 0;
    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Punct('(' | '[' | '{') => depth += 1,
            TokenKind::Punct(')' | ']' | '}') => depth = depth.saturating_sub(1),
            TokenKind::Punct(c) if c == separator && depth == 0 => {
                bounds.push((start, index));
                start = index + 1;
            }
            _ => {}
        }
    }
    bounds.push((start, tokens.len()));
    bounds.into_iter().map(move |(from, to)| &tokens[from..to])
}

/// Index of the bracket closing the one at `open`.
fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::Punct('(' | '[' | '{') => depth += 1,
            TokenKind::Punct(')' | ']' | '}') => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// A method definition rather than a call: `string GetString(string key)`,
/// `function Translate(key) {`.
fn is_declaration(tokens: &[Token], name: usize, close: usize) -> bool {
    let parameters = &tokens[name + 2..close];
    if parameters
        .first()
        .is_some_and(|t| matches!(t.kind, TokenKind::Str(_) | TokenKind::Number))
    {
        return false;
    }

    let function_keyword = name > 0
        && matches!(
            ident(tokens.get(name - 1)),
            Some("function" | "fun" | "def")
        );
    // A return type before the name and a parameter written with its type.
    let typed_parameter = follows_type(tokens, name)
        && split_top_level(parameters, ',').any(|parameter| {
            ident(parameter.first()).is_some() && ident(parameter.get(1)).is_some()
        });
    typed_parameter || function_keyword || is_punct(tokens.get(close + 1), '{')
}

fn follows_type(tokens: &[Token], name: usize) -> bool {
    let Some(previous) = name.checked_sub(1).and_then(|i| tokens.get(i)) else {
        return false;
    };
    match &previous.kind {
        TokenKind::Ident(word) => !EXPRESSION_KEYWORDS.contains(&word.as_str()),
        TokenKind::Punct('>' | ']' | '?') => true,
        _ => false,
    }
}

/// End of a `using X.Y;` / `import a.b.C` style statement starting at `i`.
fn import_statement_end(tokens: &[Token], i: usize) -> Option<usize> {
    let keyword = ident(tokens.get(i))?;
    if !IMPORT_KEYWORDS.contains(&keyword) {
        return None;
    }
    if i > 0 && !matches!(tokens[i - 1].kind, TokenKind::Punct(';' | '{' | '}')) {
        return None;
    }
    if matches!(ident(tokens.get(i + 1)), None | Some("var")) {
        return None;
    }

    let line = tokens[i].line;
    let mut end = i + 1;
    while let Some(token) = tokens.get(end) {
        if token.line != line {
            break;
        }
        match &token.kind {
            TokenKind::Punct(';') => return Some(end + 1),
            TokenKind::Ident(_) | TokenKind::Punct('.' | '*' | '=') => end += 1,
            _ => return None,
        }
    }
    Some(end)
}

fn ident(token: Option<&Token>) -> Option<&str> {
    match token {
        Some(Token {
            kind: TokenKind::Ident(name),
            ..
        }) => Some(name.as_str()),
        _ => None,
    }
}

fn is_punct(token: Option<&Token>, c: char) -> bool {
    matches!(token, Some(Token { kind: TokenKind::Punct(p), .. }) if *p == c)
}
