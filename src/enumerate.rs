//! Exhaustive enumeration of a bounded compiled pattern.
//!
//! Paths through the pattern are explored depth-first from an explicit work
//! list, so deeply nested groups cannot exhaust the call stack. Paths that
//! converge on the same state (same emitted atoms, same pending work) are
//! explored once, which keeps patterns like `(X?){30}` polynomial. Each
//! distinct placeholder candidate is then expanded into every combination of
//! ingredient values.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::ptr;

use itertools::{Either, Itertools};

use crate::compiler::CompiledPattern;
use crate::error::{BrewError, Result};
use crate::pattern::ast::*;

/// Pending work for one partial path, innermost last.
#[derive(Debug, Clone, Copy)]
enum Task<'a> {
    Compound(&'a Compound),
    Items(&'a [Item]),
    Repeat { item: &'a Item, done: usize },
    Element(&'a Element),
}

impl Task<'_> {
    /// Tasks are identified by the AST node they point at, not its contents.
    fn key(&self) -> (u8, *const (), usize) {
        match *self {
            Task::Compound(compound) => (0, ptr::from_ref(compound).cast(), 0),
            Task::Items([]) => (1, ptr::null(), 0),
            Task::Items(items) => (1, items.as_ptr().cast(), items.len()),
            Task::Repeat { item, done } => (2, ptr::from_ref(item).cast(), done),
            Task::Element(element) => (3, ptr::from_ref(element).cast(), 0),
        }
    }
}

impl PartialEq for Task<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Task<'_> {}

impl Hash for Task<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Path<'a> {
    atoms: Vec<Atom>,
    tasks: Vec<Task<'a>>,
}

/// Every distinct placeholder candidate of a bounded pattern.
///
/// Fewer repetitions and earlier alternatives are produced first.
///
/// `visited` holds every distinct state reached so far, so memory grows with
/// the number of distinct partial candidates rather than with the number of
/// paths. It is released with the iterator.
pub struct Candidates<'a> {
    stack: Vec<Path<'a>>,
    visited: HashSet<Path<'a>>,
}

impl<'a> Candidates<'a> {
    pub fn new(pattern: &'a Compound) -> Result<Self> {
        if pattern.is_unbounded() {
            return Err(BrewError::UnboundedPattern);
        }
        Ok(Self {
            stack: vec![Path {
                atoms: Vec::new(),
                tasks: vec![Task::Compound(pattern)],
            }],
            visited: HashSet::new(),
        })
    }

    fn expand(&mut self, mut path: Path<'a>, task: Task<'a>) {
        match task {
            Task::Compound(compound) => {
                for seq in compound.alternatives.iter().rev() {
                    let mut branch = path.clone();
                    branch.tasks.push(Task::Items(&seq.items));
                    self.stack.push(branch);
                }
            }
            Task::Items(items) => {
                if let Some((first, rest)) = items.split_first() {
                    path.tasks.push(Task::Items(rest));
                    path.tasks.push(Task::Repeat {
                        item: first,
                        done: 0,
                    });
                }
                self.stack.push(path);
            }
            Task::Repeat { item, done } => {
                let min = item.quantifier.min();
                let max = item.quantifier.max().unwrap_or(done);
                if done < max {
                    let mut more = path.clone();
                    more.tasks.push(Task::Repeat {
                        item,
                        done: done + 1,
                    });
                    more.tasks.push(Task::Element(&item.element));
                    self.stack.push(more);
                }
                if done >= min {
                    self.stack.push(path);
                }
            }
            Task::Element(element) => match element {
                Element::Symbol(idx) => {
                    path.atoms.push(Atom::Symbol(*idx));
                    self.stack.push(path);
                }
                Element::Literal(c) => {
                    path.atoms.push(Atom::Literal(*c));
                    self.stack.push(path);
                }
                Element::Class(atoms) => {
                    for atom in atoms.iter().rev() {
                        let mut branch = path.clone();
                        branch.atoms.push(*atom);
                        self.stack.push(branch);
                    }
                }
                Element::Any => {
                    for c in PRINTABLE.rev() {
                        let mut branch = path.clone();
                        branch.atoms.push(Atom::Literal(c));
                        self.stack.push(branch);
                    }
                }
                Element::Group(compound) => {
                    path.tasks.push(Task::Compound(compound));
                    self.stack.push(path);
                }
            },
        }
    }
}

impl Iterator for Candidates<'_> {
    type Item = Vec<Atom>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut path = self.stack.pop()?;
            if !self.visited.insert(path.clone()) {
                continue;
            }
            match path.tasks.pop() {
                Some(task) => self.expand(path, task),
                None => return Some(path.atoms),
            }
        }
    }
}

/// Lazily produce every string `pattern` can generate.
///
/// Fails up front with [`BrewError::UnboundedPattern`] if any repetition has
/// no upper bound.
pub fn enumerate(pattern: &CompiledPattern) -> Result<impl Iterator<Item = String> + '_> {
    let values = pattern.symbols().values();
    let candidates = Candidates::new(pattern.ast())?;
    Ok(candidates.flat_map(move |atoms| substitutions(&atoms, values)))
}

/// Every way of replacing the symbols in `atoms` with ingredient values.
fn substitutions(atoms: &[Atom], values: &[Vec<String>]) -> impl Iterator<Item = String> + use<> {
    if atoms.is_empty() {
        return Either::Left(std::iter::once(String::new()));
    }
    let choices: Vec<Vec<String>> = atoms
        .iter()
        .map(|atom| match *atom {
            Atom::Symbol(idx) => values[idx].clone(),
            Atom::Literal(c) => vec![c.to_string()],
        })
        .collect();
    Either::Right(
        choices
            .into_iter()
            .multi_cartesian_product()
            .map(|parts| parts.concat()),
    )
}
