//! Pattern matcher: decide whether a whole string is produced by a [`Compound`].
//!
//! Matching tracks the set of byte offsets reachable after each item, so
//! nested quantifiers never backtrack and unbounded repeats stop as soon as
//! they reach no new offsets.

use std::collections::BTreeSet;

use super::ast::*;

type Offsets = BTreeSet<usize>;

/// Test whether `text` as a whole is produced by `pattern`, where symbol `i`
/// stands for any of `values[i]`.
pub fn accepts(pattern: &Compound, values: &[Vec<String>], text: &str) -> bool {
    let ctx = MatchCtx { values, text };
    match_compound(pattern, &ctx, &Offsets::from([0])).contains(&text.len())
}

struct MatchCtx<'a> {
    values: &'a [Vec<String>],
    text: &'a str,
}

fn match_compound(compound: &Compound, ctx: &MatchCtx, starts: &Offsets) -> Offsets {
    compound
        .alternatives
        .iter()
        .flat_map(|seq| match_sequence(seq, ctx, starts))
        .collect()
}

fn match_sequence(seq: &Sequence, ctx: &MatchCtx, starts: &Offsets) -> Offsets {
    let mut current = starts.clone();
    for item in &seq.items {
        if current.is_empty() {
            break;
        }
        current = match_item(item, ctx, &current);
    }
    current
}

fn match_item(item: &Item, ctx: &MatchCtx, starts: &Offsets) -> Offsets {
    let min = item.quantifier.min();
    let mut reached = starts.clone();
    for _ in 0..min {
        reached = match_element(&item.element, ctx, &reached);
        if reached.is_empty() {
            return reached;
        }
    }

    // An offset first reached after fewer repetitions has at least as much
    // repeat budget left, so only newly reached offsets need expanding.
    let extra = item.quantifier.max().map(|max| max - min);
    let mut frontier = reached.clone();
    let mut count = 0;
    while !frontier.is_empty() && extra.is_none_or(|extra| count < extra) {
        let next = match_element(&item.element, ctx, &frontier);
        frontier = next.difference(&reached).copied().collect();
        reached.extend(frontier.iter().copied());
        count += 1;
    }
    reached
}

fn match_element(element: &Element, ctx: &MatchCtx, starts: &Offsets) -> Offsets {
    let mut ends = Offsets::new();
    for &pos in starts {
        let rest = &ctx.text[pos..];
        match element {
            Element::Symbol(idx) => {
                for value in &ctx.values[*idx] {
                    if rest.starts_with(value.as_str()) {
                        ends.insert(pos + value.len());
                    }
                }
            }
            Element::Literal(c) => {
                if rest.starts_with(*c) {
                    ends.insert(pos + c.len_utf8());
                }
            }
            Element::Class(atoms) => {
                for atom in atoms {
                    match atom {
                        Atom::Symbol(idx) => {
                            for value in &ctx.values[*idx] {
                                if rest.starts_with(value.as_str()) {
                                    ends.insert(pos + value.len());
                                }
                            }
                        }
                        Atom::Literal(c) => {
                            if rest.starts_with(*c) {
                                ends.insert(pos + c.len_utf8());
                            }
                        }
                    }
                }
            }
            Element::Any => {
                if let Some(c) = rest.chars().next()
                    && PRINTABLE.contains(&c)
                {
                    ends.insert(pos + 1);
                }
            }
            Element::Group(compound) => {
                ends.extend(match_compound(compound, ctx, &Offsets::from([pos])));
            }
        }
    }
    ends
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::parser::parse;

    fn values() -> Vec<Vec<String>> {
        vec![
            vec!["k".into(), "g".into()],
            vec!["+".into()],
            vec!["ai".into(), "o".into()],
        ]
    }

    fn check(pattern: &str, text: &str) -> bool {
        let compound = parse(pattern, &['a', 'b', 'c'], 16).unwrap();
        accepts(&compound, &values(), text)
    }

    #[test]
    fn test_symbol_values() {
        assert!(check("a", "k"));
        assert!(check("a", "g"));
        assert!(!check("a", "x"));
        assert!(!check("a", "kg"));
    }

    #[test]
    fn test_multi_char_values() {
        assert!(check("ac", "kai"));
        assert!(check("ac", "go"));
        assert!(!check("ac", "ka"));
    }

    #[test]
    fn test_bounded_repeats() {
        let p = "(a(ba){0,2}c?){1,3}";
        assert!(check(p, "k"));
        assert!(check(p, "k+g"));
        assert!(check(p, "k+g+kai"));
        assert!(check(p, "kogk+gai"));
        assert!(!check(p, "k+g+k+k"));
        assert!(!check(p, "kkkk"));
        assert!(!check(p, ""));
    }

    #[test]
    fn test_unbounded_repeats() {
        assert!(check("a*", ""));
        assert!(check("a*", "kgkgkgkg"));
        assert!(check("a{2,}x", "kgx"));
        assert!(!check("a{2,}x", "kx"));
        assert!(check("()*a", "k"));
    }

    #[test]
    fn test_alternation_class_and_any() {
        assert!(check("a|xy", "xy"));
        assert!(check("[bz]", "+"));
        assert!(check("[bz]", "z"));
        assert!(check(".", "~"));
        assert!(!check(".", "\u{0C15}"));
    }

    #[test]
    fn test_literals_are_unicode_aware() {
        assert!(check("\u{0C15}a", "\u{0C15}k"));
    }
}
