//! Recipe compiler.
//!
//! Assigns every ingredient a one-character placeholder symbol, rewrites the
//! recipe with those symbols, and parses the result into a [`Compound`].

use std::cmp::Reverse;

use itertools::Itertools;
use log::debug;

use crate::config::BrewConfig;
use crate::error::{BrewError, Result};
use crate::ingredient::IngredientMap;
use crate::pattern::{self, ast::Compound};
use crate::recipe::is_identifier_char;

/// Placeholder symbols, handed out in this order.
pub const SYMBOL_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Most ingredients a recipe can use; one per placeholder symbol.
pub const MAX_INGREDIENTS: usize = SYMBOL_ALPHABET.len();

/// Symbol assignment for a compiled recipe. Index `i` of each vector
/// describes the ingredient behind symbol `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMap {
    symbols: Vec<char>,
    names: Vec<String>,
    values: Vec<Vec<String>>,
}

impl SymbolMap {
    /// Assign symbols by descending name length; equal lengths keep
    /// definition order.
    pub fn assign(ingredients: &IngredientMap) -> Result<Self> {
        if ingredients.len() > MAX_INGREDIENTS {
            return Err(BrewError::TooManyIngredients(ingredients.len()));
        }
        let mut map = Self {
            symbols: Vec::with_capacity(ingredients.len()),
            names: Vec::with_capacity(ingredients.len()),
            values: Vec::with_capacity(ingredients.len()),
        };
        let ordered = ingredients
            .iter()
            .sorted_by_key(|ingredient| Reverse(ingredient.name.chars().count()));
        for (symbol, ingredient) in SYMBOL_ALPHABET.chars().zip(ordered) {
            if ingredient.values.is_empty() {
                return Err(BrewError::EmptyIngredient(ingredient.name.clone()));
            }
            map.symbols.push(symbol);
            map.names.push(ingredient.name.clone());
            map.values.push(ingredient.values.clone());
        }
        Ok(map)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn values(&self) -> &[Vec<String>] {
        &self.values
    }

    pub fn symbol_of(&self, name: &str) -> Option<char> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(self.symbols[idx])
    }

    pub fn index_of_symbol(&self, symbol: char) -> Option<usize> {
        self.symbols.iter().position(|&s| s == symbol)
    }

    pub fn name(&self, idx: usize) -> &str {
        &self.names[idx]
    }
}

/// A recipe ready for generation. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPattern {
    text: String,
    ast: Compound,
    symbols: SymbolMap,
}

impl CompiledPattern {
    /// The rewritten pattern text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ast(&self) -> &Compound {
        &self.ast
    }

    pub fn symbols(&self) -> &SymbolMap {
        &self.symbols
    }

    /// Test whether `text` can be produced from this pattern.
    pub fn accepts(&self, text: &str) -> bool {
        pattern::accepts(&self.ast, self.symbols.values(), text)
    }

    /// Test whether `candidate`, written in placeholder symbols, is accepted.
    pub fn accepts_candidate(&self, candidate: &str) -> bool {
        let identity: Vec<Vec<String>> = self
            .symbols
            .symbols()
            .iter()
            .map(|s| vec![s.to_string()])
            .collect();
        pattern::accepts(&self.ast, &identity, candidate)
    }
}

/// Compile `recipe` against `ingredients`.
pub fn compile(
    recipe: &str,
    ingredients: &IngredientMap,
    config: &BrewConfig,
) -> Result<CompiledPattern> {
    let symbols = SymbolMap::assign(ingredients)?;
    let text = rewrite(recipe, &symbols);
    debug!(
        "compiled {:?} with {} ingredients to {:?}",
        recipe,
        symbols.len(),
        text
    );
    for (idx, symbol) in symbols.symbols().iter().enumerate() {
        debug!("  {symbol} = {}", symbols.name(idx));
    }
    let ast = pattern::parse(&text, symbols.symbols(), config.max_nesting)?;
    Ok(CompiledPattern { text, ast, symbols })
}

/// Replace whole-word ingredient names with their symbols and drop whitespace.
///
/// Every maximal identifier run is looked up as a whole, so a name can never
/// match inside a longer one. Runs that are not ingredient names stay literal,
/// with any letter that collides with an assigned symbol written as a `\xHH`
/// escape. The contents of quantifier braces and the character after a `\`
/// are copied verbatim; a `{` inside a class is an ordinary character.
pub fn rewrite(recipe: &str, symbols: &SymbolMap) -> String {
    let mut out = String::with_capacity(recipe.len());
    let mut chars = recipe.chars().peekable();
    let mut in_class = false;
    let mut in_braces = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '[' if !in_braces => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            '{' if !in_class => {
                in_braces = true;
                out.push(c);
            }
            '}' if in_braces => {
                in_braces = false;
                out.push(c);
            }
            c if c.is_whitespace() => {}
            c if in_braces || !is_identifier_char(c) => out.push(c),
            c => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !is_identifier_char(next) {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                match symbols.symbol_of(&word) {
                    Some(symbol) => out.push(symbol),
                    None => {
                        for ch in word.chars() {
                            if symbols.index_of_symbol(ch).is_some() {
                                out.push_str(&format!("\\x{:02x}", u32::from(ch)));
                            } else {
                                out.push(ch);
                            }
                        }
                    }
                }
            }
        }
    }
    out
}
