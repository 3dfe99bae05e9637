//! The lexer struct is responsible for tokenizing the source code so that it can be used by the parser to create the AST.
//!
//! The lexer handles all atomic datatypes of the Scheme dialect (numbers, strings, `#t`/`#f`) as
//! well as parentheses, the quotation mark `'`, the pair dot and comments which are marked with ';'.
//! All that is following after ';' on the same line is discarded and ignored so that only a line
//! break ends a comment. Furthermore the lexer provides some usefull error messages like
//! recognizing a missing closing '"' when entering a string or a missing number after the dot when
//! entering a floating point number e.g. '1.'.
//!
//! Example:
//! ```rust
//! use sdot::frontend::lexer::Lexer;
//! let tokens_or_err = Lexer::new("(+ 1 2)").tokenize();
//! ```
//! `tokenize` either returns an error or a vector containing all tokens.

use std::{collections::VecDeque, iter::Peekable, str::Chars};

use super::{
    token::{Token, Type},
    utils::Position,
};
use crate::error::SdotError::{self, SyntaxError};
use crate::T;

/// Characters besides alphanumeric ones that may appear in an identifier. Scheme
/// identifiers cover the operator names, so `+` or `string=?` lex as identifiers.
const IDENT_SPECIALS: &str = "+-*/<>=!?_&";

fn is_identifier_char(c: &char) -> bool {
    c.is_alphanumeric() || IDENT_SPECIALS.contains(*c)
}

/// The lexer struct is responsible for the tokeniziation of the source code.
pub struct Lexer<'a> {
    /// Contains the source code. Used for 'cutting' out lexemes for the tokens.
    source: &'a str,
    /// Peekable iterator over all characters of the source string.
    chars: Peekable<Chars<'a>>,
    /// Vector where all the tokens are saved.
    tokens: VecDeque<Token<'a>>,
    /// The current relative position in the source code in repespect to the
    /// current line i.e. that the column is reset once a line break occurs.
    token_pos: Position,
    /// The current absolute starting position of a token.
    start_idx: usize,
    /// The current absolute position in the source code.
    current_idx: usize,
}

/// The lexer either returns a token or an error which will be propagated to
/// the user informing about an error.
type LexerResult<'a> = Result<Token<'a>, SdotError>;

impl<'a> Lexer<'a> {
    /// Create a new instance of `Lexer`
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().peekable(),
            tokens: VecDeque::new(),
            token_pos: Position::new(1, 1, 0),
            start_idx: 0,
            current_idx: 0,
        }
    }

    /// Tokenize the source string into a vector of tokens.
    pub fn tokenize(&mut self) -> Result<VecDeque<Token<'a>>, SdotError> {
        while !self.is_at_end() {
            self.start_idx = self.current_idx;
            let token = self.next_token()?;
            if token.typ != Type::Whitespace {
                self.tokens.push_back(token);
            }
            self.token_pos.start_column = self.token_pos.end_column + 1;
        }
        // Add end of file token at the end.
        self.start_idx = self.current_idx;
        self.tokens.push_back(Token::new(
            T![eof],
            Position::new(
                self.token_pos.line,
                self.start_idx as u32,
                self.current_idx as u32,
            ),
            "EOF",
        ));
        Ok(self.tokens.clone())
    }

    /// Return the next token.
    fn next_token(&mut self) -> LexerResult<'a> {
        match self.advance() {
            Some('(') => self.new_token(T!['(']),
            Some(')') => self.new_token(T![')']),
            Some('\'') => self.new_token(T!['\'']),
            Some('.') => self.new_token(T![.]),
            // A ';' discloses a comment reaching up to the next line break.
            Some(';') => {
                self.advance_while(&|x| x != &'\n');
                self.new_token(Type::Whitespace)
            }

            Some(' ') | Some('\t') | Some('\r') => self.new_token(Type::Whitespace), // Whitespaces will be discarded
            Some('\n') => {
                self.token_pos.next_line();
                self.new_token(Type::Whitespace)
            }
            Some('\"') => self.string(),
            Some('#') => self.boolean(),
            // A '-' directly followed by a digit starts a negative number,
            // otherwise it is just an ordinary identifier character.
            Some('-') => match self.chars.peek() {
                Some(c) if c.is_digit(10) => self.number(),
                _ => self.identifier(),
            },
            // Literals, keywords, identifiers
            Some(c) => {
                if c.is_digit(10) {
                    self.number()
                } else if is_identifier_char(&c) {
                    self.identifier()
                } else {
                    Err(SyntaxError {
                        pos: self.token_pos,
                        msg: "Invalid keyword/identifier.".to_string(),
                    })
                }
            }
            _ => Err(SyntaxError {
                pos: self.token_pos,
                msg: "Invalid input.".to_string(),
            }),
        }
    }

    //-------
    // HELPER
    //-------

    /// Extracts a substring from the source string starting at `start_index` and ending at `current_index`.
    fn get_substr_from_current_range(&self) -> &'a str {
        &self.source[self.start_idx..self.current_idx]
    }

    /// Convenience function for creating new `Token`s easily.
    fn new_token(&self, typ: Type) -> LexerResult<'a> {
        Ok(Token::new_non_literal(
            typ,
            self.token_pos,
            self.source,
            self.start_idx..self.current_idx,
        ))
    }

    /// Consume the current iterator and return the char it pointed at.
    /// If the iterator reached the end `None` will be returned.
    fn advance(&mut self) -> Option<char> {
        self.token_pos.next_column();
        self.current_idx += 1;
        self.chars.next()
    }

    /// Only advance the iterator if the next character is the expected one.
    fn advance_if(&mut self, predicate: &dyn Fn(&char) -> bool) -> Option<char> {
        match self.chars.peek() {
            Some(c) if predicate(c) => self.advance(),
            _ => None,
        }
    }

    /// Consumes all iterators while a given predicate is fullfilled.
    ///
    /// ## Example
    /// advance_while(&mut self, &|c| c.is_alphabetic());
    fn advance_while(&mut self, predicate: &dyn Fn(&char) -> bool) {
        loop {
            match self.chars.peek() {
                Some(c) if !predicate(c) => break,
                Some(c) => {
                    if c == &'\n' {
                        self.token_pos.next_line();
                    }
                    self.advance();
                }
                None => break,
            }
        }
    }

    /// Check if the char iterator has reached the end.
    fn is_at_end(&mut self) -> bool {
        self.chars.peek() == None
    }

    //---------
    // Literals
    //---------

    /// Tokenize a number literal.
    fn number(&mut self) -> LexerResult<'a> {
        self.advance_while(&|c| c.is_digit(10));
        if self.chars.peek() == Some(&'.') {
            self.advance();
            if let Some(num) = self.chars.peek() {
                if !num.is_digit(10) {
                    return Err(SyntaxError {
                        pos: self.token_pos,
                        msg: "Expected floating point number.".to_string(),
                    });
                }
            } else {
                return Err(SyntaxError {
                    pos: self.token_pos,
                    msg: "Expected floating point number.".to_string(),
                });
            }
            self.advance_while(&|c| c.is_digit(10))
        }
        let val: f64 = self.source[self.start_idx..self.current_idx]
            .parse()
            .unwrap();
        Ok(Token::new(
            Type::Number(val),
            self.token_pos,
            &self.get_substr_from_current_range(),
        ))
    }

    /// Tokenize a string literal
    fn string(&mut self) -> LexerResult<'a> {
        // Advance until closing `"` is found or the iterator reaches the end in which case an
        // error is returned.
        while !self.is_at_end() && self.chars.peek() != Some(&'\"') {
            self.advance();
        }
        if self.is_at_end() {
            return Err(SyntaxError {
                pos: self.token_pos,
                msg: "missing closing \".".to_string(),
            });
        }
        // Advance over "
        self.advance();

        let val = self.source[self.start_idx + 1..self.current_idx - 1].to_string();
        Ok(Token::new(
            Type::Str(val),
            self.token_pos,
            &self.get_substr_from_current_range(),
        ))
    }

    /// Tokenize a boolean literal, i.e. `#t` or `#f`.
    fn boolean(&mut self) -> LexerResult<'a> {
        match self.advance() {
            Some('t') => self.new_token(Type::Boolean(true)),
            Some('f') => self.new_token(Type::Boolean(false)),
            _ => Err(SyntaxError {
                pos: self.token_pos,
                msg: "Expected #t or #f.".to_string(),
            }),
        }
    }

    //----------------------
    // Identifier & keywords
    //----------------------

    /// Checks whether the following character stream is a known keyword. If not it has to be an identifier.
    fn identifier(&mut self) -> LexerResult<'a> {
        self.advance_while(&is_identifier_char);
        let substr = self.get_substr_from_current_range();
        // If it's not a known keyword it has to be an identifier
        let typ = Token::get_keyword(substr).unwrap_or(Type::Identifier);
        self.new_token(typ)
    }
}
