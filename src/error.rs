//! Error types for recipe parsing, compilation and generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while parsing a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("Unexpected character in pattern: {0:?}")]
    UnexpectedChar(char),
    #[error("Unexpected end of pattern")]
    UnexpectedEnd,
    #[error("Invalid number in pattern")]
    InvalidNumber,
    #[error("Unclosed group '(' in pattern")]
    UnclosedGroup,
    #[error("Unclosed character class '[' in pattern")]
    UnclosedClass,
    #[error("Empty character class in pattern")]
    EmptyClass,
    #[error("Invalid character class range {0:?}-{1:?}")]
    InvalidClassRange(char, char),
    #[error("Negated character classes are not supported")]
    NegatedClass,
    #[error("Invalid quantifier range {{n,m}}")]
    InvalidQuantifierRange,
    #[error("Quantifier {0:?} has nothing to repeat")]
    NothingToRepeat(char),
    #[error("Groups nested deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("Unsupported escape \\{0}")]
    UnsupportedEscape(char),
    #[error("Class escape used as a range endpoint")]
    ClassEscapeInRange,
}

/// Errors produced while building or using a [`Brewer`](crate::Brewer).
#[derive(Debug, Error)]
pub enum BrewError {
    #[error("Couldn't find a recipe pattern")]
    MissingPattern,
    #[error("Couldn't parse ingredient on line {line}: {text:?}")]
    MalformedIngredient { line: usize, text: String },
    #[error("Ingredient '{ingredient}' refers to '{reference}' before it is defined")]
    CyclicOrForwardReference {
        ingredient: String,
        reference: String,
    },
    #[error("Invalid range '{token}' in ingredient '{ingredient}'")]
    InvalidRange { ingredient: String, token: String },
    #[error("Invalid codepoint '{token}' in ingredient '{ingredient}'")]
    InvalidCodepoint { ingredient: String, token: String },
    #[error("Ingredient '{0}' is defined more than once")]
    DuplicateIngredient(String),
    #[error("Ingredient '{0}' has no values")]
    EmptyIngredient(String),
    #[error("Too many ingredients: {0} (at most 52 are supported)")]
    TooManyIngredients(usize),
    #[error("Pattern has an unbounded repetition and cannot be enumerated")]
    UnboundedPattern,
    #[error("No candidate met the length constraints in {attempts} attempts")]
    GenerationExhausted { attempts: usize },
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = BrewError> = std::result::Result<T, E>;
