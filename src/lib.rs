//! Generate strings from recipes: regex-like patterns over named character
//! classes ("ingredients").
//!
//! # Example
//!
//! ```rust
//! use brewer::Brewer;
//!
//! let brewer: Brewer = "
//! ## Consonant-vowel syllables
//! (Cons Vowel){1,2}
//!
//! Cons = k t
//! Vowel = a e
//! "
//! .parse()
//! .unwrap();
//!
//! // One random string.
//! let word = brewer.generate(None, Some(4));
//! assert!(brewer.accepts(&word));
//!
//! // Every string, when the pattern is bounded.
//! let all: Vec<String> = brewer.generate_all().unwrap().collect();
//! assert_eq!(all.len(), 4 + 16);
//! assert_eq!(all[0], "ka");
//! ```

mod brewer;
pub mod compiler;
mod config;
pub mod enumerate;
mod error;
pub mod ingredient;
pub mod pattern;
pub mod recipe;
pub mod synth;

pub use brewer::{Brewer, RecipeSource};
pub use compiler::{CompiledPattern, SymbolMap, compile};
pub use config::{BrewConfig, DuplicatePolicy};
pub use error::{BrewError, PatternError, Result};
pub use ingredient::{Ingredient, IngredientMap};
pub use recipe::{Definition, RecipeDocument, parse_document};
pub use synth::Synthesis;
