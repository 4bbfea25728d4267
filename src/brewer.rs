//! The [`Brewer`]: a compiled recipe that generates strings on demand.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, warn};
use rand::Rng;

use crate::compiler::{CompiledPattern, compile};
use crate::config::BrewConfig;
use crate::enumerate::enumerate;
use crate::error::{BrewError, Result};
use crate::ingredient::IngredientMap;
use crate::recipe::parse_document;
use crate::synth::{Synthesis, synthesize};

/// Where a recipe comes from.
#[derive(Debug, Clone)]
pub enum RecipeSource {
    /// A recipe document on disk.
    FromPath(PathBuf),
    /// A recipe document held in memory.
    FromText(String),
    /// A pattern and its already resolved ingredients.
    FromParts {
        recipe: String,
        ingredients: IngredientMap,
    },
}

/// A compiled recipe.
///
/// All state is fixed at construction, so a `Brewer` can be shared between
/// threads; each generation call brings its own random source.
#[derive(Debug, Clone)]
pub struct Brewer {
    recipe: String,
    ingredients: IngredientMap,
    pattern: CompiledPattern,
    config: BrewConfig,
}

impl Brewer {
    pub fn new(source: RecipeSource, config: BrewConfig) -> Result<Self> {
        let (recipe, ingredients) = match source {
            RecipeSource::FromPath(path) => {
                let text = fs::read_to_string(&path).map_err(|source| BrewError::Io {
                    path: path.clone(),
                    source,
                })?;
                debug!("read recipe from {}", path.display());
                Self::parse_text(&text, &config)?
            }
            RecipeSource::FromText(text) => Self::parse_text(&text, &config)?,
            RecipeSource::FromParts {
                recipe,
                ingredients,
            } => (recipe, ingredients),
        };
        let pattern = compile(&recipe, &ingredients, &config)?;
        Ok(Self {
            recipe,
            ingredients,
            pattern,
            config,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(
            RecipeSource::FromPath(path.as_ref().to_path_buf()),
            BrewConfig::default(),
        )
    }

    pub fn from_parts(recipe: impl Into<String>, ingredients: IngredientMap) -> Result<Self> {
        Self::new(
            RecipeSource::FromParts {
                recipe: recipe.into(),
                ingredients,
            },
            BrewConfig::default(),
        )
    }

    fn parse_text(text: &str, config: &BrewConfig) -> Result<(String, IngredientMap)> {
        let document = parse_document(text)?;
        let ingredients = IngredientMap::resolve(&document.definitions, config.duplicates)?;
        Ok((document.pattern, ingredients))
    }

    /// The recipe pattern as written.
    pub fn recipe(&self) -> &str {
        &self.recipe
    }

    pub fn ingredients(&self) -> &IngredientMap {
        &self.ingredients
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn config(&self) -> &BrewConfig {
        &self.config
    }

    /// Generate one string using the thread-local random source.
    ///
    /// Length bounds are best effort: if the attempt budget runs out the last
    /// candidate is returned anyway.
    pub fn generate(&self, min_length: Option<usize>, max_length: Option<usize>) -> String {
        let synthesis = self.generate_with(&mut rand::thread_rng(), min_length, max_length);
        if !synthesis.satisfied {
            warn!(
                "no candidate for {:?} met length bounds {:?}..{:?} in {} attempts",
                self.recipe, min_length, max_length, synthesis.attempts
            );
        }
        synthesis.text
    }

    /// Generate one string drawing from `rng`.
    pub fn generate_with<R: Rng>(
        &self,
        rng: &mut R,
        min_length: Option<usize>,
        max_length: Option<usize>,
    ) -> Synthesis {
        synthesize(&self.pattern, rng, min_length, max_length, &self.config)
    }

    /// Every string the recipe can produce, lazily.
    ///
    /// Fails with [`BrewError::UnboundedPattern`] when the recipe uses `*`, `+`
    /// or `{n,}`; callers usually fall back to repeated [`generate`](Self::generate).
    pub fn generate_all(&self) -> Result<impl Iterator<Item = String> + '_> {
        enumerate(&self.pattern)
    }

    /// Test whether `text` is something this recipe could have produced.
    pub fn accepts(&self, text: &str) -> bool {
        self.pattern.accepts(text)
    }
}

impl FromStr for Brewer {
    type Err = BrewError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(RecipeSource::FromText(s.to_string()), BrewConfig::default())
    }
}
