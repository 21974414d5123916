mod lexer;
mod parser;

use self::lexer::Lexer;
use self::parser::Parser;

pub use self::parser::{Error, Expr, Result};

pub use self::lexer::{lex, Token};

/// read parses a single expression from the front of `input`. Anything after the first expression belongs to the next top-level form and is left unread.
pub fn read(input: &str) -> Result<Expr> {
    let mut lexer = Lexer::new(input);

    let mut parser = Parser::new();
    parser.parse_expression(&mut lexer)
}

/// read_all parses every top-level form in `input`; empty input is an empty program.
pub fn read_all(input: &str) -> Result<Vec<Expr>> {
    let mut lexer = Lexer::new(input);

    let mut parser = Parser::new();
    parser.parse_tokens(&mut lexer)
}
