//! Token-level reference analyzer.
//!
//! Works on C-family code fragments without building a syntax tree: every
//! identifier that is not a member access (`x.name`) and not shadowed by a
//! local declared earlier in the fragment is checked against the available
//! declarations, then the globals.
//!
//! Local declarations (`int x = 0, y;`, `List<String> names = ...;`) are
//! recognized at statement starts in block fragments only.

use logos::Logos;
use rowan::TextRange;

use super::bindings::{
    AnalysisResult, AnalyzeError, AvailableBindings, ExpressionAnalyzer, FragmentKind,
    LocalIdentifier, LocalVariable, ReferencedBindings,
};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
enum TokenKind {
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*(\.[0-9]+)?([eE][+-]?[0-9]+)?[lLdDfF]?")]
    Number,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    #[regex(r"'(?:[^'\\]|\\.)*'")]
    Str,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*[^/])*\*/")]
    BlockComment,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token(";")]
    Semi,

    #[token("=")]
    Assign,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("&&")]
    #[token("||")]
    #[token("++")]
    #[token("--")]
    #[token("->")]
    Operator,

    #[regex(r"[-+*/%!&|^?:~@#]")]
    Punct,
}

impl TokenKind {
    fn is_trivia(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    fn opens_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Semi | TokenKind::BraceOpen | TokenKind::BraceClose
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
}

/// Words that can start a statement but never name a type.
const STATEMENT_KEYWORDS: &[&str] = &[
    "return", "new", "throw", "else", "case", "do", "if", "for", "while", "switch", "break",
    "continue", "this", "super", "true", "false", "null", "instanceof",
];

/// Reference analyzer over a flat token stream.
#[derive(Clone, Copy, Debug, Default)]
pub struct LexicalAnalyzer;

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionAnalyzer for LexicalAnalyzer {
    fn analyze(
        &self,
        code: &str,
        kind: FragmentKind,
        available: &AvailableBindings,
    ) -> Result<AnalysisResult, AnalyzeError> {
        let tokens = lex(code)?;
        check_balanced(&tokens)?;

        let locals = match kind {
            FragmentKind::Block => find_locals(code, &tokens),
            FragmentKind::Expression => Vec::new(),
        };

        let mut bindings = ReferencedBindings::new();
        for (i, token) in tokens.iter().enumerate() {
            if token.kind != TokenKind::Ident {
                continue;
            }
            if i > 0 && tokens[i - 1].kind == TokenKind::Dot {
                continue;
            }
            let name = &code[token.start..token.end];
            if is_shadowed(name, token.start, &locals) {
                continue;
            }
            if available.declaration_type(name).is_some() {
                bindings.add_declaration(name);
            } else if let Some(value_type) = available.global_type(name) {
                bindings.add_global(name, value_type.clone());
            }
        }

        Ok(AnalysisResult { bindings, locals })
    }
}

fn lex(code: &str) -> Result<Vec<Token>, AnalyzeError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(code);
    while let Some(next) = lexer.next() {
        let span = lexer.span();
        let Ok(kind) = next else {
            return Err(AnalyzeError::Syntax {
                offset: span.start as u32,
                message: format!("unrecognized input `{}`", lexer.slice()),
            });
        };
        if kind.is_trivia() {
            continue;
        }
        tokens.push(Token {
            kind,
            start: span.start,
            end: span.end,
        });
    }
    Ok(tokens)
}

fn check_balanced(tokens: &[Token]) -> Result<(), AnalyzeError> {
    let mut stack: Vec<(char, u32)> = Vec::new();
    for token in tokens {
        let offset = token.start as u32;
        let (delimiter, opener) = match token.kind {
            TokenKind::ParenOpen | TokenKind::BracketOpen | TokenKind::BraceOpen => {
                stack.push((opening_char(token.kind), offset));
                continue;
            }
            TokenKind::ParenClose => (')', '('),
            TokenKind::BracketClose => (']', '['),
            TokenKind::BraceClose => ('}', '{'),
            _ => continue,
        };
        match stack.pop() {
            Some((open, _)) if open == opener => {}
            _ => return Err(AnalyzeError::Unbalanced { delimiter, offset }),
        }
    }
    match stack.pop() {
        Some((delimiter, offset)) => Err(AnalyzeError::Unbalanced { delimiter, offset }),
        None => Ok(()),
    }
}

fn opening_char(kind: TokenKind) -> char {
    match kind {
        TokenKind::ParenOpen => '(',
        TokenKind::BracketOpen => '[',
        _ => '{',
    }
}

fn is_shadowed(name: &str, at: usize, locals: &[LocalVariable]) -> bool {
    locals.iter().flat_map(|l| &l.identifiers).any(|id| {
        id.name == name && usize::from(id.range.start()) <= at
    })
}

fn find_locals(code: &str, tokens: &[Token]) -> Vec<LocalVariable> {
    let mut locals = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let at_statement_start = i == 0 || tokens[i - 1].kind.opens_statement();
        if at_statement_start && let Some((local, next)) = parse_local(code, tokens, i) {
            locals.push(local);
            i = next;
            continue;
        }
        i += 1;
    }
    locals
}

/// Try to parse `[final] Type[<..>][[]..] name [= init] (, name [= init])* ;` at `start`.
///
/// Returns the declaration and the index of the token after it.
fn parse_local(code: &str, tokens: &[Token], start: usize) -> Option<(LocalVariable, usize)> {
    let text = |t: &Token| &code[t.start..t.end];
    let mut i = start;

    if tokens.get(i).is_some_and(|t| t.kind == TokenKind::Ident && text(t) == "final") {
        i += 1;
    }

    let type_start = tokens.get(i)?;
    if type_start.kind != TokenKind::Ident || STATEMENT_KEYWORDS.contains(&text(type_start)) {
        return None;
    }
    i += 1;

    // Qualified name: a.b.Type
    while tokens.get(i).is_some_and(|t| t.kind == TokenKind::Dot)
        && tokens.get(i + 1).is_some_and(|t| t.kind == TokenKind::Ident)
    {
        i += 2;
    }

    // Generic arguments
    if tokens.get(i).is_some_and(|t| t.kind == TokenKind::Lt) {
        let mut depth = 0usize;
        loop {
            let t = tokens.get(i)?;
            match t.kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => depth -= 1,
                TokenKind::Ident | TokenKind::Comma | TokenKind::Dot | TokenKind::Punct => {}
                _ => return None,
            }
            i += 1;
            if depth == 0 {
                break;
            }
        }
    }

    // Array dimensions
    while tokens.get(i).is_some_and(|t| t.kind == TokenKind::BracketOpen)
        && tokens.get(i + 1).is_some_and(|t| t.kind == TokenKind::BracketClose)
    {
        i += 2;
    }

    let type_end = tokens[i - 1].end;
    let type_name = code[type_start.start..type_end].to_owned();

    let mut identifiers = Vec::new();
    loop {
        let name = tokens.get(i)?;
        if name.kind != TokenKind::Ident {
            return None;
        }
        i += 1;
        let mut id_end = name.end;

        match tokens.get(i).map(|t| t.kind) {
            Some(TokenKind::Assign) => {
                i += 1;
                let mut depth = 0usize;
                while let Some(t) = tokens.get(i) {
                    match t.kind {
                        TokenKind::ParenOpen | TokenKind::BracketOpen | TokenKind::BraceOpen => {
                            depth += 1
                        }
                        TokenKind::ParenClose
                        | TokenKind::BracketClose
                        | TokenKind::BraceClose => depth = depth.saturating_sub(1),
                        TokenKind::Comma | TokenKind::Semi if depth == 0 => break,
                        _ => {}
                    }
                    id_end = t.end;
                    i += 1;
                }
            }
            Some(TokenKind::Comma) | Some(TokenKind::Semi) | None => {}
            Some(_) => return None,
        }

        identifiers.push(LocalIdentifier {
            name: text(name).to_owned(),
            range: text_range(name.start, id_end),
        });

        match tokens.get(i).map(|t| t.kind) {
            Some(TokenKind::Comma) => i += 1,
            Some(TokenKind::Semi) => {
                i += 1;
                break;
            }
            _ => break,
        }
    }

    let end = identifiers
        .last()
        .map(|id| usize::from(id.range.end()))
        .unwrap_or(type_end);
    let local = LocalVariable {
        type_name,
        range: text_range(type_start.start, end),
        identifiers,
    };
    Some((local, i))
}

fn text_range(start: usize, end: usize) -> TextRange {
    TextRange::new((start as u32).into(), (end as u32).into())
}
