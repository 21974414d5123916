use std::fmt;
use std::result;

use itertools::Itertools;

use super::lexer::Token;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, PartialEq, Clone)]
/// Expr is the structural form of a piece of source text: an atom, or a list of sub-expressions.
pub enum Expr {
    Number(f64),
    Symbol(String),
    List(Vec<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Expr::*;

        match self {
            Number(n) => write!(f, "{}", n),
            Symbol(s) => write!(f, "{}", s),
            List(nodes) => write!(f, "({})", nodes.iter().format(" ")),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// UnexpectedCloseParen points to the index in the token stream where a close paren appeared with no list open.
    UnexpectedCloseParen(usize),
    /// UnexpectedEndOfInput indicates the token stream ran out while an expression was still expected.
    UnexpectedEndOfInput,
}

/// Parser assembles a token stream into expression trees.
pub struct Parser {
    token_index: usize,
}

impl Parser {
    pub fn new() -> Self {
        Self { token_index: 0 }
    }

    /// parse_tokens consumes the whole token stream, yielding one Expr per top-level form.
    pub fn parse_tokens<'a, T>(&mut self, tokens: &mut T) -> Result<Vec<Expr>>
    where
        T: Iterator<Item = Token<'a>>,
    {
        let mut forms = vec![];

        while let Some((index, token)) = self.next_token(tokens) {
            forms.push(self.parse_token(index, token, tokens)?);
        }

        Ok(forms)
    }

    /// parse_expression consumes exactly one expression from the front of the token stream; an empty stream is an error.
    pub fn parse_expression<'a, T>(&mut self, tokens: &mut T) -> Result<Expr>
    where
        T: Iterator<Item = Token<'a>>,
    {
        match self.next_token(tokens) {
            None => Err(Error::UnexpectedEndOfInput),
            Some((index, token)) => self.parse_token(index, token, tokens),
        }
    }

    fn next_token<'a, T>(&mut self, tokens: &mut T) -> Option<(usize, Token<'a>)>
    where
        T: Iterator<Item = Token<'a>>,
    {
        tokens.next().map(|token| {
            let index = self.token_index;
            self.token_index += 1;
            (index, token)
        })
    }

    fn parse_token<'a, T>(&mut self, index: usize, token: Token<'a>, tokens: &mut T) -> Result<Expr>
    where
        T: Iterator<Item = Token<'a>>,
    {
        match token {
            Token::Open => self.parse_list(tokens),
            Token::Close => Err(Error::UnexpectedCloseParen(index)),
            Token::Atom(value) => Ok(Parser::parse_atom(value)),
        }
    }

    // the Open has already been consumed; collect sub-expressions until the matching Close
    fn parse_list<'a, T>(&mut self, tokens: &mut T) -> Result<Expr>
    where
        T: Iterator<Item = Token<'a>>,
    {
        let mut nodes = vec![];

        loop {
            match self.next_token(tokens) {
                None => return Err(Error::UnexpectedEndOfInput),
                Some((_, Token::Close)) => return Ok(Expr::List(nodes)),
                Some((_, Token::Open)) => nodes.push(self.parse_list(tokens)?),
                Some((_, Token::Atom(value))) => nodes.push(Parser::parse_atom(value)),
            }
        }
    }

    /// parse_atom classifies a token as a Number if it reads as a floating-point literal, else as a Symbol.
    fn parse_atom(value: &str) -> Expr {
        value
            .parse::<f64>()
            .map(Expr::Number)
            .unwrap_or_else(|_| Expr::Symbol(value.into()))
    }
}
