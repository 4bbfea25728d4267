//! Ingredients and the resolver that turns definition expressions into values.
//!
//! An expression is a whitespace-separated list of tokens. Each token is, in
//! order of precedence:
//!
//! | Token        | Meaning                                              |
//! |--------------|------------------------------------------------------|
//! | `Name`       | All values of an earlier-defined ingredient          |
//! | `a-e`        | Inclusive range; endpoints are characters or hex     |
//! | `0C4D`       | Hexadecimal codepoint                                |
//! | `x`          | The character itself                                 |

use std::collections::{HashMap, HashSet};

use log::trace;

use crate::config::DuplicatePolicy;
use crate::error::{BrewError, Result};
use crate::recipe::Definition;

/// A named, ordered list of literal values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub values: Vec<String>,
}

impl Ingredient {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ingredients stored in definition order and indexed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientMap {
    arena: Vec<Ingredient>,
    index: HashMap<String, usize>,
}

impl IngredientMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `ingredient`. A redefinition replaces the values in place, so the
    /// name keeps the position of its first definition. Returns the replaced
    /// ingredient, if any.
    pub fn insert(&mut self, ingredient: Ingredient) -> Option<Ingredient> {
        match self.index.get(&ingredient.name) {
            Some(&slot) => Some(std::mem::replace(&mut self.arena[slot], ingredient)),
            None => {
                self.index.insert(ingredient.name.clone(), self.arena.len());
                self.arena.push(ingredient);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Ingredient> {
        self.index.get(name).map(|&slot| &self.arena[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Iterate in definition order.
    pub fn iter(&self) -> std::slice::Iter<'_, Ingredient> {
        self.arena.iter()
    }

    /// Resolve `definitions` in file order.
    ///
    /// A definition may only refer to ingredients defined above it.
    pub fn resolve(definitions: &[Definition], duplicates: DuplicatePolicy) -> Result<Self> {
        let declared: HashSet<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
        let mut map = Self::new();

        for def in definitions {
            if duplicates == DuplicatePolicy::Reject && map.contains(&def.name) {
                return Err(BrewError::DuplicateIngredient(def.name.clone()));
            }
            let values = resolve_expression(&def.name, &def.expression, &map, &declared)?;
            trace!("ingredient {} resolved to {} values", def.name, values.len());
            map.insert(Ingredient {
                name: def.name.clone(),
                values,
            });
        }
        Ok(map)
    }
}

impl FromIterator<Ingredient> for IngredientMap {
    fn from_iter<T: IntoIterator<Item = Ingredient>>(iter: T) -> Self {
        let mut map = Self::new();
        for ingredient in iter {
            map.insert(ingredient);
        }
        map
    }
}

impl<'a> IntoIterator for &'a IngredientMap {
    type Item = &'a Ingredient;
    type IntoIter = std::slice::Iter<'a, Ingredient>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Resolve one expression against the ingredients resolved so far.
///
/// `declared` holds every name defined anywhere in the document; a token that
/// names one of those but is not yet in `resolved` is a self or forward reference.
pub fn resolve_expression(
    name: &str,
    expression: &str,
    resolved: &IngredientMap,
    declared: &HashSet<&str>,
) -> Result<Vec<String>> {
    let mut values = Vec::new();
    for token in expression.split_whitespace() {
        if let Some(ingredient) = resolved.get(token) {
            values.extend(ingredient.values.iter().cloned());
        } else if declared.contains(token) {
            return Err(BrewError::CyclicOrForwardReference {
                ingredient: name.to_string(),
                reference: token.to_string(),
            });
        } else if token.chars().count() > 1 && token.contains('-') {
            let (lo, hi) = parse_range(token).ok_or_else(|| BrewError::InvalidRange {
                ingredient: name.to_string(),
                token: token.to_string(),
            })?;
            values.extend((lo..=hi).filter_map(char::from_u32).map(String::from));
        } else {
            let ch = parse_literal(token).ok_or_else(|| BrewError::InvalidCodepoint {
                ingredient: name.to_string(),
                token: token.to_string(),
            })?;
            values.push(ch.to_string());
        }
    }
    Ok(values)
}

fn parse_range(token: &str) -> Option<(u32, u32)> {
    let (begin, end) = token.split_once('-')?;
    if end.contains('-') {
        return None;
    }
    let lo = parse_endpoint(begin)?;
    let hi = parse_endpoint(end)?;
    (lo <= hi).then_some((lo, hi))
}

fn parse_endpoint(s: &str) -> Option<u32> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (None, _) => None,
        (Some(c), None) => Some(c as u32),
        _ => parse_hex(s).filter(|&cp| char::from_u32(cp).is_some()),
    }
}

fn parse_literal(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => char::from_u32(parse_hex(token)?),
    }
}

fn parse_hex(s: &str) -> Option<u32> {
    if !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(s, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn resolve_one(expression: &str) -> Result<Vec<String>> {
        resolve_expression("X", expression, &IngredientMap::new(), &HashSet::new())
    }

    fn defs(lines: &[(&str, &str)]) -> Vec<Definition> {
        lines
            .iter()
            .enumerate()
            .map(|(i, (name, expression))| Definition {
                name: name.to_string(),
                expression: expression.to_string(),
                line: i + 2,
            })
            .collect()
    }

    #[test]
    fn test_char_range() {
        assert_eq!(resolve_one("a-e").unwrap(), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_hex_range() {
        let values = resolve_one("0C15-0C28").unwrap();
        assert_eq!(values.len(), 20);
        assert_eq!(values[0], "\u{0C15}");
        assert_eq!(values[19], "\u{0C28}");
        assert!(values.iter().all(|v| v.chars().count() == 1));
    }

    #[test]
    fn test_mixed_endpoints() {
        assert_eq!(resolve_one("x-7A").unwrap(), ["x", "y", "z"]);
    }

    #[test]
    fn test_hex_literal_and_single_chars() {
        assert_eq!(resolve_one("0C4D a ?").unwrap(), ["\u{0C4D}", "a", "?"]);
    }

    #[test]
    fn test_lone_hyphen_is_literal() {
        assert_eq!(resolve_one("-").unwrap(), ["-"]);
    }

    #[test]
    fn test_token_order_is_preserved() {
        assert_eq!(resolve_one("z a-b y").unwrap(), ["z", "a", "b", "y"]);
    }

    #[test]
    fn test_reversed_range() {
        assert!(matches!(
            resolve_one("e-a"),
            Err(BrewError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_bad_range_endpoints() {
        for token in ["a-", "-a", "a-b-c", "zz-0C15", "--"] {
            assert!(
                matches!(resolve_one(token), Err(BrewError::InvalidRange { .. })),
                "expected invalid range: {token}"
            );
        }
    }

    #[test]
    fn test_bad_codepoint() {
        assert!(matches!(
            resolve_one("0CZZ"),
            Err(BrewError::InvalidCodepoint { .. })
        ));
        assert!(matches!(
            resolve_one("D800"),
            Err(BrewError::InvalidCodepoint { .. })
        ));
    }

    #[test]
    fn test_references() {
        let map = IngredientMap::resolve(
            &defs(&[("Vowel", "a e"), ("Letter", "Vowel x-y")]),
            DuplicatePolicy::LastWins,
        )
        .unwrap();
        assert_eq!(map.get("Letter").unwrap().values, ["a", "e", "x", "y"]);
    }

    #[test]
    fn test_forward_reference() {
        let err = IngredientMap::resolve(
            &defs(&[("Letter", "Vowel"), ("Vowel", "a")]),
            DuplicatePolicy::LastWins,
        )
        .unwrap_err();
        match err {
            BrewError::CyclicOrForwardReference {
                ingredient,
                reference,
            } => {
                assert_eq!(ingredient, "Letter");
                assert_eq!(reference, "Vowel");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_self_reference() {
        assert!(matches!(
            IngredientMap::resolve(&defs(&[("Loop", "Loop a")]), DuplicatePolicy::LastWins),
            Err(BrewError::CyclicOrForwardReference { .. })
        ));
    }

    #[test]
    fn test_last_write_wins_keeps_position() {
        let map = IngredientMap::resolve(
            &defs(&[("A", "a"), ("B", "b"), ("A", "A c")]),
            DuplicatePolicy::LastWins,
        )
        .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("A").unwrap().values, ["a", "c"]);
        let names: Vec<_> = map.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn test_reject_duplicates() {
        assert!(matches!(
            IngredientMap::resolve(&defs(&[("A", "a"), ("A", "b")]), DuplicatePolicy::Reject),
            Err(BrewError::DuplicateIngredient(name)) if name == "A"
        ));
    }

    proptest! {
        #[test]
        fn prop_single_char_range_is_inclusive(lo in 0x21u32..0x7e, span in 0u32..40) {
            let hi = (lo + span).min(0x7e);
            let (a, b) = (char::from_u32(lo).unwrap(), char::from_u32(hi).unwrap());
            prop_assume!(a != '-' && b != '-');
            let values = resolve_one(&format!("{a}-{b}")).unwrap();
            let expected: Vec<String> = (lo..=hi)
                .map(|cp| char::from_u32(cp).unwrap().to_string())
                .collect();
            prop_assert_eq!(values, expected);
        }

        #[test]
        fn prop_hex_range_length(lo in 0x0C00u32..0x0C7F, span in 0u32..64) {
            let hi = lo + span;
            let values = resolve_one(&format!("{lo:04X}-{hi:04X}")).unwrap();
            prop_assert_eq!(values.len() as u32, span + 1);
        }
    }
}
