/// What to do when an ingredient name is defined twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The later definition replaces the earlier one, keeping the earlier position.
    #[default]
    LastWins,
    /// A second definition is a [`DuplicateIngredient`](crate::BrewError::DuplicateIngredient) error.
    Reject,
}

/// Tunables applied when a recipe is compiled and sampled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrewConfig {
    /// Candidates drawn before length constraints are given up on.
    pub attempts: usize,
    /// Upper repetition count substituted for `*`, `+` and `{n,}`.
    pub repeat_limit: usize,
    /// Deepest group nesting the pattern parser accepts.
    pub max_nesting: usize,
    pub duplicates: DuplicatePolicy,
}

impl Default for BrewConfig {
    fn default() -> Self {
        Self {
            attempts: 100,
            repeat_limit: 100,
            max_nesting: 64,
            duplicates: DuplicatePolicy::LastWins,
        }
    }
}
