use std::collections::HashSet;
use std::iter;
use std::str;

use lazy_static::lazy_static;

const OPEN_PAREN: char = '(';
const CLOSE_PAREN: char = ')';

lazy_static! {
    /// DELIMITER_CHARS are characters that always form their own token, whatever surrounds them
    static ref DELIMITER_CHARS: HashSet<char> = {
        let mut set = HashSet::new();

        set.insert(OPEN_PAREN);
        set.insert(CLOSE_PAREN);

        set
    };
}

/// lex is a convenience function to take some `input` and produce the resulting `Vec<Token>`.
pub fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

#[derive(Debug, PartialEq)]
/// Token represents an atomic component of this language's syntax.
// There are no strings, comments or quoting in this grammar, so lexing cannot fail.
pub enum Token<'input> {
    Open,
    Close,
    Atom(&'input str),
}

/// Lexer contains the logic to lex individual tokens from the input source.
#[derive(Debug)]
pub struct Lexer<'input> {
    input: &'input str,
    iter: iter::Peekable<str::CharIndices<'input>>,
}

impl<'input> Lexer<'input> {
    /// new constructs a Lexer instance from the input but does not do any lexing.
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            iter: input.char_indices().peekable(),
        }
    }

    /// advance_if advances the state of the lexer while chars satisfy the `predicate`. Returns Some(span) in the `input` that was advanced over; returns None if such a span cannot be generated (e.g. because we ran out of more input chars).
    fn advance_if<P>(&mut self, predicate: P) -> Option<(usize, usize)>
    where
        P: Fn(char) -> bool,
    {
        let start = match self.peek() {
            Some(&(_, ch)) if predicate(ch) => self.consume().map(|(index, _)| index).unwrap(),
            _ => return None,
        };
        let mut end = start;

        while self.peek().map_or(false, |&(_, ch)| predicate(ch)) {
            end = self.consume().map(|(index, _)| index).unwrap()
        }

        Some((start, end))
    }

    /// consume advances the state of the lexer to the next char, yielding an Option of the current char from the input source
    fn consume(&mut self) -> Option<(usize, char)> {
        self.iter.next()
    }

    /// peek returns the next element in the iterator without consuming it
    fn peek(&mut self) -> Option<&(usize, char)> {
        self.iter.peek()
    }

    /// take_while advances the input while `predicate` is true and then returns a str slice of the traversed span.
    fn take_while<P>(&mut self, predicate: P) -> Option<&'input str>
    where
        P: Fn(char) -> bool,
    {
        self.advance_if(predicate)
            .map(|(start, finish)| &self.input[start..=finish])
    }

    fn consume_delimiter(&mut self, token: Token<'input>) -> Token<'input> {
        self.consume();
        token
    }

    fn is_atomic(ch: char) -> bool {
        !ch.is_whitespace() && !DELIMITER_CHARS.contains(&ch)
    }
}

impl<'a> iter::Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance_if(char::is_whitespace);

        match self.peek() {
            None => None,
            Some(&(_, OPEN_PAREN)) => Some(self.consume_delimiter(Token::Open)),
            Some(&(_, CLOSE_PAREN)) => Some(self.consume_delimiter(Token::Close)),
            // any other char begins an atom, so the span is never empty here
            Some(_) => self.take_while(Lexer::is_atomic).map(Token::Atom),
        }
    }
}
