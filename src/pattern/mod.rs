//! Compiled pattern language.
//!
//! After compilation every ingredient name in a recipe has been replaced by a
//! one-character placeholder symbol and all unescaped whitespace has been
//! removed. Whitespace escaped with `\` survives as a literal, so `a\ b`
//! matches a space between the two. What remains is parsed with the syntax
//! below.
//!
//! # Pattern syntax
//!
//! | Token          | Meaning                                         |
//! |----------------|-------------------------------------------------|
//! | symbol         | One value of the matching ingredient            |
//! | `x`            | Literal character                               |
//! | `\c`           | Literal punctuation or whitespace `c`           |
//! | `\xHH`         | Literal character with hex code HH              |
//! | `\t` `\n` …    | Control character (`\t \n \r \f \v \0`)         |
//! | `\d` `\w` `\s` | One digit, word character or whitespace         |
//! | `.`            | One printable ASCII character (0x20–0x7E)       |
//! | `[…]`          | One of the listed characters or ranges          |
//! | `(…)`          | Grouping (`(?:…)` is accepted too)              |
//! | `X\|Y`         | Alternation                                     |
//! | `X?`           | Zero or one                                     |
//! | `X*`           | Zero or more                                    |
//! | `X+`           | One or more                                     |
//! | `X{n}`         | Exactly n                                       |
//! | `X{n,}`        | At least n                                      |
//! | `X{n,m}`       | Between n and m                                 |
//! | `X{,m}`        | At most m                                       |
//!
//! Any other escaped letter or digit is rejected, as are the negated class
//! escapes `\D \W \S`. Inside a class only a lone, unescaped member can be a
//! symbol; escaped members and every character of a range are literal.

pub mod ast;
pub mod matcher;
pub mod parser;

pub use matcher::accepts;
pub use parser::parse;
