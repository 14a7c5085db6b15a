//! Statement-level YANG reader.
//!
//! Turns YANG text into a [`Statement`] tree: `keyword [argument] (';' |
//! '{' ... '}')`, double-quoted strings with escapes and `+` concatenation,
//! single-quoted literal strings, `//` line and `/* */` block comments.
//! No semantic validation happens here; that is the job of the upstream
//! schema processor. This reader exists so the CLI works end to end.

use crate::yang::{Keyword, Statement, StmtId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: unexpected end of input")]
    UnexpectedEof { line: usize },
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },
    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },
    #[error("line {line}: unterminated block comment")]
    UnterminatedComment { line: usize },
    #[error("expected a single top-level module or submodule statement")]
    NotAModule,
}

/// Shared statement-id counter. One generator per run keeps ids unique across
/// every module loaded into the same registry.
#[derive(Debug, Default)]
pub struct IdGen {
    next: u32,
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh(&mut self) -> StmtId {
        let id = StmtId(self.next);
        self.next += 1;
        id
    }
}

/// Parse one source file into its single top-level module (or submodule).
pub fn parse_module(src: &str, ids: &mut IdGen) -> Result<Statement, ParseError> {
    let mut lx = Lexer::new(src);
    let stmt = parse_statement(&mut lx, ids)?;
    match lx.next_token()? {
        None => {}
        Some(tok) => {
            return Err(ParseError::UnexpectedToken { line: lx.line, token: tok.text() });
        }
    }
    if !matches!(stmt.keyword, Keyword::Module | Keyword::Submodule) {
        return Err(ParseError::NotAModule);
    }
    Ok(stmt)
}

fn parse_statement(lx: &mut Lexer<'_>, ids: &mut IdGen) -> Result<Statement, ParseError> {
    let kw_token = match lx.next_token()? {
        Some(Token::Word(w)) => w,
        Some(tok) => {
            return Err(ParseError::UnexpectedToken { line: lx.line, token: tok.text() });
        }
        None => return Err(ParseError::UnexpectedEof { line: lx.line }),
    };
    let keyword = Keyword::parse(&kw_token);

    // Optional argument: a word or a ('+'-concatenated) string sequence.
    let mut arg = String::new();
    let mut terminator = match lx.next_token()? {
        Some(Token::Word(w)) => {
            arg = w;
            None
        }
        Some(Token::Str(s)) => {
            arg = s;
            loop {
                // a '+' continues the string argument
                if !lx.peek_plus()? {
                    break;
                }
                match lx.next_token()? {
                    Some(Token::Str(s2)) => arg.push_str(&s2),
                    Some(tok) => {
                        return Err(ParseError::UnexpectedToken {
                            line: lx.line,
                            token: tok.text(),
                        });
                    }
                    None => return Err(ParseError::UnexpectedEof { line: lx.line }),
                }
            }
            None
        }
        Some(Token::Semi) => Some(Token::Semi),
        Some(Token::Open) => Some(Token::Open),
        Some(tok) => {
            return Err(ParseError::UnexpectedToken { line: lx.line, token: tok.text() });
        }
        None => return Err(ParseError::UnexpectedEof { line: lx.line }),
    };

    if terminator.is_none() {
        terminator = match lx.next_token()? {
            Some(tok @ (Token::Semi | Token::Open)) => Some(tok),
            Some(tok) => {
                return Err(ParseError::UnexpectedToken { line: lx.line, token: tok.text() });
            }
            None => return Err(ParseError::UnexpectedEof { line: lx.line }),
        };
    }

    let id = ids.fresh();
    let mut substmts = Vec::new();
    if matches!(terminator, Some(Token::Open)) {
        loop {
            if lx.peek_close()? {
                lx.next_token()?; // consume '}'
                break;
            }
            if lx.at_eof()? {
                return Err(ParseError::UnexpectedEof { line: lx.line });
            }
            substmts.push(parse_statement(lx, ids)?);
        }
    }

    Ok(Statement { id, keyword, arg, substmts })
}

// ------------------------------- Lexer ------------------------------------ //

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Str(String),
    Semi,
    Open,
    Close,
    Plus,
}

impl Token {
    fn text(&self) -> String {
        match self {
            Token::Word(w) => w.clone(),
            Token::Str(s) => format!("\"{s}\""),
            Token::Semi => ";".into(),
            Token::Open => "{".into(),
            Token::Close => "}".into(),
            Token::Plus => "+".into(),
        }
    }
}

struct Lexer<'s> {
    chars: std::iter::Peekable<std::str::Chars<'s>>,
    line: usize,
    lookahead: Option<Token>,
}

impl<'s> Lexer<'s> {
    fn new(src: &'s str) -> Self {
        Self { chars: src.chars().peekable(), line: 1, lookahead: None }
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        if let Some(tok) = self.lookahead.take() {
            return Ok(Some(tok));
        }
        self.scan_token()
    }

    fn peek_token(&mut self) -> Result<Option<&Token>, ParseError> {
        if self.lookahead.is_none() {
            self.lookahead = self.scan_token()?;
        }
        Ok(self.lookahead.as_ref())
    }

    fn peek_plus(&mut self) -> Result<bool, ParseError> {
        if matches!(self.peek_token()?, Some(Token::Plus)) {
            self.lookahead = None; // consume the '+'
            return Ok(true);
        }
        Ok(false)
    }

    fn peek_close(&mut self) -> Result<bool, ParseError> {
        Ok(matches!(self.peek_token()?, Some(Token::Close)))
    }

    fn at_eof(&mut self) -> Result<bool, ParseError> {
        Ok(self.peek_token()?.is_none())
    }

    fn scan_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_trivia()?;
        let Some(&c) = self.chars.peek() else { return Ok(None) };
        match c {
            ';' => {
                self.bump();
                Ok(Some(Token::Semi))
            }
            '{' => {
                self.bump();
                Ok(Some(Token::Open))
            }
            '}' => {
                self.bump();
                Ok(Some(Token::Close))
            }
            '+' => {
                self.bump();
                Ok(Some(Token::Plus))
            }
            '"' => self.scan_dquoted().map(Some),
            '\'' => self.scan_squoted().map(Some),
            _ => self.scan_word().map(Some),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut probe = self.chars.clone();
                    probe.next();
                    match probe.peek() {
                        Some('/') => {
                            while let Some(&c) = self.chars.peek() {
                                if c == '\n' {
                                    break;
                                }
                                self.bump();
                            }
                        }
                        Some('*') => {
                            let start = self.line;
                            self.bump();
                            self.bump();
                            let mut closed = false;
                            while let Some(c) = self.bump() {
                                if c == '*' && self.chars.peek() == Some(&'/') {
                                    self.bump();
                                    closed = true;
                                    break;
                                }
                            }
                            if !closed {
                                return Err(ParseError::UnterminatedComment { line: start });
                            }
                        }
                        _ => return Ok(()), // bare '/' belongs to an unquoted argument
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn scan_dquoted(&mut self) -> Result<Token, ParseError> {
        let start = self.line;
        self.bump(); // opening quote
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(Token::Str(out)),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some(other) => {
                        // Unknown escape: keep it verbatim.
                        out.push('\\');
                        out.push(other);
                    }
                    None => return Err(ParseError::UnterminatedString { line: start }),
                },
                Some(c) => out.push(c),
                None => return Err(ParseError::UnterminatedString { line: start }),
            }
        }
    }

    fn scan_squoted(&mut self) -> Result<Token, ParseError> {
        let start = self.line;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\'') => return Ok(Token::Str(out)),
                Some(c) => out.push(c),
                None => return Err(ParseError::UnterminatedString { line: start }),
            }
        }
    }

    fn scan_word(&mut self) -> Result<Token, ParseError> {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, ';' | '{' | '}' | '"' | '\'') {
                break;
            }
            // a comment terminates an unquoted string
            if c == '/' {
                let mut probe = self.chars.clone();
                probe.next();
                if matches!(probe.peek(), Some('/') | Some('*')) {
                    break;
                }
            }
            out.push(c);
            self.bump();
        }
        Ok(Token::Word(out))
    }
}
