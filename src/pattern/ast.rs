//! AST types for compiled recipe patterns.

/// An alternation of one or more sequences (`|`-separated).
///
/// A single alternative with no items is the empty pattern; it produces and
/// matches only the empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    pub alternatives: Vec<Sequence>,
}

impl Compound {
    /// True if any quantifier inside this compound lacks an upper bound.
    pub fn is_unbounded(&self) -> bool {
        self.alternatives
            .iter()
            .flat_map(|seq| &seq.items)
            .any(|item| item.quantifier.max().is_none() || item.element.is_unbounded())
    }
}

/// A concatenation of items.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub items: Vec<Item>,
}

/// One quantified element.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub quantifier: Quantifier,
    pub element: Element,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Once,
    Optional,
    ZeroOrMore,
    OneOrMore,
    Exactly(usize),
    AtLeast(usize),
    Between(usize, usize),
}

impl Quantifier {
    pub fn min(self) -> usize {
        match self {
            Self::Once | Self::OneOrMore => 1,
            Self::Optional | Self::ZeroOrMore => 0,
            Self::Exactly(n) | Self::AtLeast(n) | Self::Between(n, _) => n,
        }
    }

    /// Upper repetition bound, `None` when unbounded.
    pub fn max(self) -> Option<usize> {
        match self {
            Self::Once | Self::Optional => Some(1),
            Self::ZeroOrMore | Self::OneOrMore | Self::AtLeast(_) => None,
            Self::Exactly(n) | Self::Between(_, n) => Some(n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Placeholder for an ingredient; the index into the symbol table.
    Symbol(usize),
    /// A character emitted verbatim.
    Literal(char),
    /// `[...]`: one of the listed atoms.
    Class(Vec<Atom>),
    /// `.`: any printable ASCII character.
    Any,
    Group(Box<Compound>),
}

impl Element {
    fn is_unbounded(&self) -> bool {
        match self {
            Element::Group(compound) => compound.is_unbounded(),
            _ => false,
        }
    }
}

/// One output position: a placeholder symbol or a literal character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Atom {
    Symbol(usize),
    Literal(char),
}

/// Characters `.` stands for.
pub const PRINTABLE: std::ops::RangeInclusive<char> = '\x20'..='\x7e';
