//! Line-oriented parser for recipe documents.
//!
//! ```text
//! # Generate random Telugu-like morphemes
//! (Base (Halant Base){0,2} TopPositionedVowel?){1,3}
//!
//! Base = 0C15-0C28 0C2A-0C39
//! Halant = 0C4D
//! ```
//!
//! Blank lines and lines whose first non-space character is `#` are skipped
//! everywhere. The first remaining line is the pattern; every line after it
//! must be an `identifier = expression` definition.

use crate::error::{BrewError, Result};

const COMMENT_MARKER: char = '#';

/// One `name = expression` line, unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub expression: String,
    /// 1-based line number in the source document.
    pub line: usize,
}

/// A recipe document split into its pattern and ingredient definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDocument {
    pub pattern: String,
    /// Definitions in file order, duplicates included.
    pub definitions: Vec<Definition>,
}

/// Split `text` into a pattern line and the definitions that follow it.
pub fn parse_document(text: &str) -> Result<RecipeDocument> {
    let mut pattern = None;
    let mut definitions = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }
        if pattern.is_none() {
            pattern = Some(line.to_string());
            continue;
        }
        let definition = parse_definition(line, idx + 1).ok_or_else(|| {
            BrewError::MalformedIngredient {
                line: idx + 1,
                text: line.to_string(),
            }
        })?;
        definitions.push(definition);
    }

    let pattern = pattern.ok_or(BrewError::MissingPattern)?;
    Ok(RecipeDocument {
        pattern,
        definitions,
    })
}

/// Parse `name = expression`. The name must be a non-empty identifier and the
/// expression must contain at least one token.
fn parse_definition(line: &str, line_no: usize) -> Option<Definition> {
    let (name, expression) = line.split_once('=')?;
    let name = name.trim();
    let expression = expression.trim();
    if !is_identifier(name) || expression.is_empty() {
        return None;
    }
    Some(Definition {
        name: name.to_string(),
        expression: expression.to_string(),
        line: line_no,
    })
}

/// True for characters that may appear in an ingredient name.
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_identifier_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TELUGU: &str = "

# Generate random Telugu-like morphemes
(Base (Halant Base){0,2} TopPositionedVowel?){1,3}

Base = 0C15-0C28 0C2A-0C39
Halant = 0C4D
TopPositionedVowel = 0C46-0C48 0C4A-0C4C

    ";

    #[test]
    fn test_pattern_and_definitions() {
        let doc = parse_document(TELUGU).unwrap();
        assert_eq!(
            doc.pattern,
            "(Base (Halant Base){0,2} TopPositionedVowel?){1,3}"
        );
        let names: Vec<_> = doc.definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Base", "Halant", "TopPositionedVowel"]);
        assert_eq!(doc.definitions[0].expression, "0C15-0C28 0C2A-0C39");
        assert_eq!(doc.definitions[1].line, 7);
    }

    #[test]
    fn test_comments_between_definitions() {
        let doc = parse_document("A B\n# vowels\nA = a e\n\n   # more\nB = x").unwrap();
        assert_eq!(doc.definitions.len(), 2);
    }

    #[test]
    fn test_hash_inside_pattern_is_kept() {
        let doc = parse_document("  A#B  \nA = a").unwrap();
        assert_eq!(doc.pattern, "A#B");
    }

    #[test]
    fn test_spacing_around_equals() {
        let doc = parse_document("X\nX=a   b  ").unwrap();
        assert_eq!(doc.definitions[0].name, "X");
        assert_eq!(doc.definitions[0].expression, "a   b");
    }

    #[test]
    fn test_duplicates_are_preserved_in_order() {
        let doc = parse_document("X\nX = a\nX = b").unwrap();
        assert_eq!(doc.definitions.len(), 2);
        assert_eq!(doc.definitions[1].expression, "b");
    }

    #[test]
    fn test_missing_pattern() {
        assert!(matches!(
            parse_document("\n# only a comment\n\n"),
            Err(BrewError::MissingPattern)
        ));
        assert!(matches!(parse_document(""), Err(BrewError::MissingPattern)));
    }

    #[test]
    fn test_malformed_definition() {
        let err = parse_document("X\nX = a\nnot a definition").unwrap_err();
        match err {
            BrewError::MalformedIngredient { line, text } => {
                assert_eq!(line, 3);
                assert_eq!(text, "not a definition");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_expression_is_malformed() {
        assert!(matches!(
            parse_document("X\nX =   "),
            Err(BrewError::MalformedIngredient { .. })
        ));
    }

    #[test]
    fn test_identifier() {
        assert!(is_identifier("Base_2"));
        assert!(is_identifier("క"));
        assert!(!is_identifier("Base-2"));
        assert!(!is_identifier(""));
    }
}
