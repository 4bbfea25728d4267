//! Recursive descent parser for compiled pattern strings.

use std::iter::Peekable;
use std::str::Chars;

use itertools::Itertools;
use phf::{Map, phf_map};

use crate::error::PatternError;

use super::ast::*;

/// Escapes that stand for a control character rather than the escaped one.
const CONTROL_ESCAPES: Map<char, char> = phf_map! {
    't' => '\t',
    'n' => '\n',
    'r' => '\r',
    'f' => '\x0c',
    'v' => '\x0b',
    '0' => '\0',
};

/// Escapes that stand for a whole class of literal characters.
const CLASS_ESCAPES: Map<char, &'static str> = phf_map! {
    'd' => "0123456789",
    'w' => "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_",
    's' => " \t\n\r\x0b\x0c",
};

/// What a `\` escape stands for.
enum Escape {
    Char(char),
    Class(&'static str),
}

/// Parse a compiled pattern into a [`Compound`].
///
/// `symbols` lists the placeholder characters in symbol-index order; any other
/// character is a literal. Groups may nest at most `max_nesting` levels deep.
pub fn parse(input: &str, symbols: &[char], max_nesting: usize) -> Result<Compound, PatternError> {
    let mut parser = Parser {
        chars: input.chars().peekable(),
        symbols,
        depth: 0,
        max_nesting,
    };
    let compound = parser.parse_compound()?;
    match parser.chars.next() {
        None => Ok(compound),
        Some(c) => Err(PatternError::UnexpectedChar(c)),
    }
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    symbols: &'a [char],
    depth: usize,
    max_nesting: usize,
}

impl Parser<'_> {
    fn parse_compound(&mut self) -> Result<Compound, PatternError> {
        let mut alternatives = vec![self.parse_sequence()?];
        while self.chars.peek() == Some(&'|') {
            self.chars.next(); // consume '|'
            alternatives.push(self.parse_sequence()?);
        }
        Ok(Compound { alternatives })
    }

    fn parse_sequence(&mut self) -> Result<Sequence, PatternError> {
        let mut items = Vec::new();
        while let Some(item) = self.parse_item()? {
            items.push(item);
        }
        Ok(Sequence { items })
    }

    /// Parse one item (element + optional quantifier).
    ///
    /// Returns `None` at sequence terminators: `|`, `)`, end-of-input.
    fn parse_item(&mut self) -> Result<Option<Item>, PatternError> {
        match self.chars.peek() {
            None | Some('|') | Some(')') => return Ok(None),
            _ => {}
        }
        let element = self.parse_element()?;
        let quantifier = self.parse_quantifier()?;
        if quantifier != Quantifier::Once {
            // Lazy suffix; generation has no notion of greed.
            if self.chars.peek() == Some(&'?') {
                self.chars.next();
            }
            if let Some(&c) = self.chars.peek()
                && matches!(c, '*' | '+' | '?' | '{')
            {
                return Err(PatternError::NothingToRepeat(c));
            }
        }
        Ok(Some(Item {
            quantifier,
            element,
        }))
    }

    fn parse_quantifier(&mut self) -> Result<Quantifier, PatternError> {
        let quantifier = match self.chars.peek() {
            Some('?') => Quantifier::Optional,
            Some('*') => Quantifier::ZeroOrMore,
            Some('+') => Quantifier::OneOrMore,
            Some('{') => {
                self.chars.next();
                return self.parse_brace_quantifier();
            }
            _ => return Ok(Quantifier::Once),
        };
        self.chars.next();
        Ok(quantifier)
    }

    /// Parse a `{n,m}`-style quantifier (the opening `{` has already been consumed).
    fn parse_brace_quantifier(&mut self) -> Result<Quantifier, PatternError> {
        let first = self.parse_optional_number()?;

        // Single-number form: {n} = Exactly(n)
        if self.chars.peek() == Some(&'}') {
            self.chars.next();
            return Ok(Quantifier::Exactly(
                first.ok_or(PatternError::InvalidQuantifierRange)?,
            ));
        }

        match self.chars.next() {
            Some(',') => {}
            Some(c) => return Err(PatternError::UnexpectedChar(c)),
            None => return Err(PatternError::UnexpectedEnd),
        }

        let second = self.parse_optional_number()?;

        match self.chars.next() {
            Some('}') => {}
            Some(c) => return Err(PatternError::UnexpectedChar(c)),
            None => return Err(PatternError::UnexpectedEnd),
        }

        match (first, second) {
            (None, None) => Ok(Quantifier::ZeroOrMore),       // {,}
            (Some(n), None) => Ok(Quantifier::AtLeast(n)),    // {n,}
            (None, Some(m)) => Ok(Quantifier::Between(0, m)), // {,m}
            (Some(n), Some(m)) if n <= m => Ok(Quantifier::Between(n, m)),
            _ => Err(PatternError::InvalidQuantifierRange),
        }
    }

    fn parse_optional_number(&mut self) -> Result<Option<usize>, PatternError> {
        let mut s = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        if s.is_empty() {
            return Ok(None);
        }
        s.parse::<usize>()
            .map(Some)
            .map_err(|_| PatternError::InvalidNumber)
    }

    fn parse_element(&mut self) -> Result<Element, PatternError> {
        let c = self.chars.next().ok_or(PatternError::UnexpectedEnd)?;
        match c {
            '(' => self.parse_group(),
            '[' => self.parse_class(),
            '.' => Ok(Element::Any),
            '\\' => Ok(match self.parse_escape()? {
                Escape::Char(c) => Element::Literal(c),
                Escape::Class(set) => Element::Class(set.chars().map(Atom::Literal).collect()),
            }),
            '*' | '+' | '?' | '{' => Err(PatternError::NothingToRepeat(c)),
            c => Ok(match self.atom(c) {
                Atom::Symbol(idx) => Element::Symbol(idx),
                Atom::Literal(c) => Element::Literal(c),
            }),
        }
    }

    /// Parse a group body (the `(` has already been consumed).
    fn parse_group(&mut self) -> Result<Element, PatternError> {
        if self.chars.peek() == Some(&'?') {
            self.chars.next();
            match self.chars.next() {
                Some(':') => {}
                Some(c) => return Err(PatternError::UnexpectedChar(c)),
                None => return Err(PatternError::UnexpectedEnd),
            }
        }
        self.depth += 1;
        if self.depth > self.max_nesting {
            return Err(PatternError::NestingTooDeep(self.max_nesting));
        }
        let compound = self.parse_compound()?;
        match self.chars.next() {
            Some(')') => {}
            _ => return Err(PatternError::UnclosedGroup),
        }
        self.depth -= 1;
        Ok(Element::Group(Box::new(compound)))
    }

    /// Parse a class `[...]` (the `[` has already been consumed).
    ///
    /// Only a lone, unescaped member can be a symbol. Escaped members and
    /// every character of a range are literal.
    fn parse_class(&mut self) -> Result<Element, PatternError> {
        if self.chars.peek() == Some(&'^') {
            return Err(PatternError::NegatedClass);
        }
        let mut members = Vec::new();
        loop {
            let (lo, plain) = match self.chars.next() {
                None => return Err(PatternError::UnclosedClass),
                Some(']') => break,
                Some('\\') => match self.parse_escape()? {
                    Escape::Char(c) => (c, false),
                    Escape::Class(set) => {
                        let mut ahead = self.chars.clone();
                        if ahead.next() == Some('-') && !matches!(ahead.next(), None | Some(']')) {
                            return Err(PatternError::ClassEscapeInRange);
                        }
                        members.extend(set.chars().map(Atom::Literal));
                        continue;
                    }
                },
                Some(c) => (c, true),
            };
            let single = if plain { self.atom(lo) } else { Atom::Literal(lo) };
            if self.chars.peek() != Some(&'-') {
                members.push(single);
                continue;
            }
            self.chars.next(); // consume '-'
            let hi = match self.chars.next() {
                None => return Err(PatternError::UnclosedClass),
                Some(']') => {
                    // Trailing '-' is literal: [ab-]
                    members.push(single);
                    members.push(Atom::Literal('-'));
                    break;
                }
                Some('\\') => match self.parse_escape()? {
                    Escape::Char(c) => c,
                    Escape::Class(_) => return Err(PatternError::ClassEscapeInRange),
                },
                Some(c) => c,
            };
            if lo > hi {
                return Err(PatternError::InvalidClassRange(lo, hi));
            }
            members.extend((lo..=hi).map(Atom::Literal));
        }
        if members.is_empty() {
            return Err(PatternError::EmptyClass);
        }
        Ok(Element::Class(members.into_iter().unique().collect()))
    }

    /// Parse the character after a `\` (which has already been consumed).
    fn parse_escape(&mut self) -> Result<Escape, PatternError> {
        let c = self.chars.next().ok_or(PatternError::UnexpectedEnd)?;
        if let Some(&control) = CONTROL_ESCAPES.get(&c) {
            return Ok(Escape::Char(control));
        }
        if let Some(&set) = CLASS_ESCAPES.get(&c) {
            return Ok(Escape::Class(set));
        }
        match c {
            'x' => self.parse_hex_escape().map(Escape::Char),
            c if c.is_ascii_alphanumeric() => Err(PatternError::UnsupportedEscape(c)),
            c => Ok(Escape::Char(c)),
        }
    }

    /// Parse the two hex digits of a `\xHH` escape.
    fn parse_hex_escape(&mut self) -> Result<char, PatternError> {
        let mut code = 0;
        for _ in 0..2 {
            let c = self.chars.next().ok_or(PatternError::UnexpectedEnd)?;
            let digit = c.to_digit(16).ok_or(PatternError::UnexpectedChar(c))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or(PatternError::InvalidNumber)
    }

    fn atom(&self, c: char) -> Atom {
        match self.symbols.iter().position(|&s| s == c) {
            Some(idx) => Atom::Symbol(idx),
            None => Atom::Literal(c),
        }
    }
}
