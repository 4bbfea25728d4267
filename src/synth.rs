//! Random synthesis of strings matching a compiled pattern.
//!
//! A candidate is first built in placeholder form by walking the pattern AST
//! and making a random choice at every alternation, class and repetition.
//! Once a candidate meets the length constraints (or the attempt budget runs
//! out) each placeholder occurrence is replaced by an independently chosen
//! value of its ingredient.

use log::trace;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::compiler::CompiledPattern;
use crate::config::BrewConfig;
use crate::error::{BrewError, Result};
use crate::pattern::ast::*;

/// The outcome of one call to [`synthesize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    /// The generated string, ingredients substituted.
    pub text: String,
    /// The accepted candidate written in placeholder symbols.
    pub candidate: String,
    /// Candidates drawn, including the accepted one.
    pub attempts: usize,
    /// False when the budget ran out and `text` is the last candidate drawn.
    pub satisfied: bool,
}

impl Synthesis {
    /// Treat an unsatisfied length constraint as an error.
    pub fn into_strict(self) -> Result<String> {
        if self.satisfied {
            Ok(self.text)
        } else {
            Err(BrewError::GenerationExhausted {
                attempts: self.attempts,
            })
        }
    }
}

/// Generate one string from `pattern`.
///
/// Length bounds are measured on the placeholder candidate, in characters.
pub fn synthesize<R: Rng>(
    pattern: &CompiledPattern,
    rng: &mut R,
    min_length: Option<usize>,
    max_length: Option<usize>,
    config: &BrewConfig,
) -> Synthesis {
    let budget = config.attempts.max(1);
    let mut pieces = Vec::new();
    let mut attempts = 0;
    let mut satisfied = false;

    while attempts < budget {
        pieces.clear();
        emit_compound(pattern.ast(), rng, config.repeat_limit, &mut pieces);
        attempts += 1;

        let len = pieces.len();
        if max_length.is_some_and(|max| len > max) || min_length.is_some_and(|min| len < min) {
            trace!("attempt {attempts}: rejected candidate of length {len}");
            continue;
        }
        satisfied = true;
        break;
    }

    let symbols = pattern.symbols();
    let candidate = pieces
        .iter()
        .map(|atom| match *atom {
            Atom::Symbol(idx) => symbols.symbols()[idx],
            Atom::Literal(c) => c,
        })
        .collect();

    let mut text = String::new();
    for atom in &pieces {
        match *atom {
            Atom::Symbol(idx) => {
                if let Some(value) = symbols.values()[idx].choose(rng) {
                    text.push_str(value);
                }
            }
            Atom::Literal(c) => text.push(c),
        }
    }

    Synthesis {
        text,
        candidate,
        attempts,
        satisfied,
    }
}

fn emit_compound<R: Rng>(compound: &Compound, rng: &mut R, limit: usize, out: &mut Vec<Atom>) {
    if let Some(seq) = compound.alternatives.choose(rng) {
        for item in &seq.items {
            emit_item(item, rng, limit, out);
        }
    }
}

fn emit_item<R: Rng>(item: &Item, rng: &mut R, limit: usize, out: &mut Vec<Atom>) {
    let min = item.quantifier.min();
    let max = item.quantifier.max().unwrap_or(limit.max(min));
    let times = rng.gen_range(min..=max);
    for _ in 0..times {
        emit_element(&item.element, rng, limit, out);
    }
}

fn emit_element<R: Rng>(element: &Element, rng: &mut R, limit: usize, out: &mut Vec<Atom>) {
    match element {
        Element::Symbol(idx) => out.push(Atom::Symbol(*idx)),
        Element::Literal(c) => out.push(Atom::Literal(*c)),
        Element::Class(atoms) => {
            if let Some(atom) = atoms.choose(rng) {
                out.push(*atom);
            }
        }
        Element::Any => out.push(Atom::Literal(rng.gen_range(PRINTABLE))),
        Element::Group(compound) => emit_compound(compound, rng, limit, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::ingredient::{Ingredient, IngredientMap};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn telugu() -> CompiledPattern {
        let ingredients: IngredientMap = [
            Ingredient::new(
                "Base",
                ('\u{0C15}'..='\u{0C28}')
                    .chain('\u{0C2A}'..='\u{0C39}')
                    .map(String::from),
            ),
            Ingredient::new("Halant", ["\u{0C4D}"]),
            Ingredient::new(
                "TopPositionedVowel",
                ('\u{0C46}'..='\u{0C48}')
                    .chain('\u{0C4A}'..='\u{0C4C}')
                    .map(String::from),
            ),
        ]
        .into_iter()
        .collect();
        compile(
            "(Base (Halant Base){0,2} TopPositionedVowel?){1,3}",
            &ingredients,
            &BrewConfig::default(),
        )
        .unwrap()
    }

    fn letters(recipe: &str) -> CompiledPattern {
        let ingredients: IngredientMap = [
            Ingredient::new("Vowel", ["a", "e"]),
            Ingredient::new("Cons", ["k", "t"]),
        ]
        .into_iter()
        .collect();
        compile(recipe, &ingredients, &BrewConfig::default()).unwrap()
    }

    #[test]
    fn test_telugu_output_is_accepted() {
        let pattern = telugu();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let s = synthesize(&pattern, &mut rng, None, None, &BrewConfig::default());
            assert!(s.satisfied);
            assert!(!s.text.is_empty());
            assert!(pattern.accepts(&s.text), "not accepted: {:?}", s.text);
            assert!(pattern.accepts_candidate(&s.candidate));
            assert_eq!(s.text.chars().count(), s.candidate.chars().count());
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let pattern = telugu();
        let config = BrewConfig::default();
        let a = synthesize(&pattern, &mut StdRng::seed_from_u64(42), None, None, &config);
        let b = synthesize(&pattern, &mut StdRng::seed_from_u64(42), None, None, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_max_length_respected() {
        let pattern = letters("Cons (Vowel Cons){0,5}");
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let s = synthesize(&pattern, &mut rng, None, Some(3), &BrewConfig::default());
            assert!(s.satisfied);
            assert!(s.text.chars().count() <= 3);
        }
    }

    #[test]
    fn test_min_length_respected() {
        let pattern = letters("Cons (Vowel Cons){0,5}");
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let s = synthesize(&pattern, &mut rng, Some(9), None, &BrewConfig::default());
            assert!(s.satisfied);
            assert!(s.text.chars().count() >= 9);
        }
    }

    #[test]
    fn test_unachievable_length_terminates() {
        let pattern = letters("Cons Vowel Cons");
        let mut rng = StdRng::seed_from_u64(3);
        let s = synthesize(&pattern, &mut rng, None, Some(2), &BrewConfig::default());
        assert!(!s.satisfied);
        assert_eq!(s.attempts, 100);
        assert_eq!(s.text.chars().count(), 3);
        assert!(matches!(
            s.into_strict(),
            Err(BrewError::GenerationExhausted { attempts: 100 })
        ));
    }

    #[test]
    fn test_repeated_symbols_draw_independently() {
        let pattern = letters("Vowel{40}");
        let mut rng = StdRng::seed_from_u64(4);
        let s = synthesize(&pattern, &mut rng, None, None, &BrewConfig::default());
        assert!(s.text.contains('a'));
        assert!(s.text.contains('e'));
    }

    #[test]
    fn test_literals_pass_through() {
        let pattern = letters("Cons - Vowel");
        let mut rng = StdRng::seed_from_u64(5);
        let s = synthesize(&pattern, &mut rng, None, None, &BrewConfig::default());
        assert_eq!(s.text.chars().nth(1), Some('-'));
    }

    #[test]
    fn test_repeat_limit_caps_unbounded() {
        let pattern = letters("Vowel*");
        let config = BrewConfig {
            repeat_limit: 4,
            ..BrewConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..100 {
            let s = synthesize(&pattern, &mut rng, None, None, &config);
            assert!(s.text.len() <= 4);
        }
    }

    proptest! {
        #[test]
        fn prop_output_round_trips(seed in any::<u64>()) {
            let pattern = letters("(Cons Vowel | Vowel){1,4} [kx]? Cons*");
            let config = BrewConfig { repeat_limit: 6, ..BrewConfig::default() };
            let s = synthesize(&pattern, &mut StdRng::seed_from_u64(seed), None, None, &config);
            prop_assert!(pattern.accepts_candidate(&s.candidate));
            prop_assert!(pattern.accepts(&s.text));
        }
    }
}
