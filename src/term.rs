// Parse tree terms
//
//  Copyright (C) 2014-2023 Ryan Specialty, LLC.
//
//  This file is part of TAME.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Immutable parse forest.
//!
//! A [`Term`] is the output of the parser:
//!   a tree that may contain [`Ambiguity`] nodes wherever the grammar
//!   admitted more than one parse of the same source interval.
//! Disambiguation passes never modify a term;
//!   they produce a new term that shares every unchanged subtree with its
//!   input through [`Rc`].
//!
//! Equality and hashing are structural and disregard [`Span`]s,
//!   which exist only for diagnostics.
//! Two nodes that are the same allocation are always equal without
//!   inspecting their children,
//!     which keeps comparisons of largely-shared trees cheap.
//!
//! ```
//! use kdisamb::grammar::{Production, ProductionItem, Sort};
//! use kdisamb::span::UNKNOWN_SPAN;
//! use kdisamb::term::Term;
//! use std::rc::Rc;
//!
//! let int = Rc::new(Production::new(Sort::from("Int"), []));
//! let one = Term::constant("1", int.clone(), UNKNOWN_SPAN);
//! let two = Term::constant("2", int, UNKNOWN_SPAN);
//!
//! let amb = Term::ambiguity([one.clone(), two, one.clone()], UNKNOWN_SPAN);
//!
//! // Alternatives are deduplicated.
//! assert_eq!(2, amb.items().len());
//! assert_eq!(Some(Sort::from("Int")), one.sort());
//! ```

use crate::{
    diagnose::Annotate,
    diagnostic_panic,
    grammar::{Production, Sort},
    span::Span,
    sym::SymbolId,
};
use fxhash::FxHashSet;
use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
    rc::Rc,
};


/// A node of a parse forest.
///
/// Cloning a term clones only a reference to its node.
#[derive(Debug, Clone, Eq)]
pub enum Term {
    /// Leaf holding a token.
    Constant(Rc<Constant>),

    /// Application of a production to one child per nonterminal slot.
    Cons(Rc<TermCons>),

    /// Alternative parses of the same source interval.
    Ambiguity(Rc<Ambiguity>),

    /// Ordered grouping of terms produced by the parser.
    ///
    /// An empty grouping is the canonical empty marker;
    ///   see [`Term::is_empty_marker`].
    KList(Rc<KList>),
}

impl Term {
    pub fn constant<V: Into<SymbolId>>(
        value: V,
        production: Rc<Production>,
        span: Span,
    ) -> Self {
        Self::Constant(Rc::new(Constant {
            value: value.into(),
            production,
            span,
        }))
    }

    /// Apply `production` to `items`.
    ///
    /// Panics
    /// ======
    /// The number of items must equal the number of nonterminal slots of
    ///   the production.
    /// A mismatch means that whatever produced the tree is broken,
    ///   and so this is an internal error rather than a diagnostic.
    pub fn cons<I>(production: Rc<Production>, items: I, span: Span) -> Self
    where
        I: IntoIterator<Item = Term>,
    {
        Self::Cons(Rc::new(TermCons::new(production, items, span)))
    }

    /// Group alternative parses,
    ///   discarding any alternative equal to one seen before it.
    pub fn ambiguity<I>(items: I, span: Span) -> Self
    where
        I: IntoIterator<Item = Term>,
    {
        Self::Ambiguity(Rc::new(Ambiguity::new(items, span)))
    }

    pub fn klist<I>(items: I, span: Span) -> Self
    where
        I: IntoIterator<Item = Term>,
    {
        Self::KList(Rc::new(KList {
            items: items.into_iter().collect(),
            span,
        }))
    }

    /// The canonical empty marker:
    ///   a grouping with no items.
    pub fn empty(span: Span) -> Self {
        Self::klist([], span)
    }

    /// Whether this is an empty grouping.
    pub fn is_empty_marker(&self) -> bool {
        matches!(self, Self::KList(klist) if klist.items.is_empty())
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Constant(c) => c.span,
            Self::Cons(tc) => tc.span,
            Self::Ambiguity(amb) => amb.span,
            Self::KList(klist) => klist.span,
        }
    }

    /// Production of a constant or application node.
    ///
    /// Ambiguities and groupings have no production of their own.
    pub fn production(&self) -> Option<&Rc<Production>> {
        match self {
            Self::Constant(c) => Some(&c.production),
            Self::Cons(tc) => Some(&tc.production),
            Self::Ambiguity(_) | Self::KList(_) => None,
        }
    }

    /// Result sort of [`Term::production`].
    pub fn sort(&self) -> Option<Sort> {
        self.production().map(|prod| prod.sort())
    }

    /// Children of this node,
    ///   which is empty for constants.
    pub fn items(&self) -> &[Term] {
        match self {
            Self::Constant(_) => &[],
            Self::Cons(tc) => &tc.items,
            Self::Ambiguity(amb) => &amb.items,
            Self::KList(klist) => &klist.items,
        }
    }

    /// Address of the shared node,
    ///   identifying this particular allocation.
    ///
    /// Two terms with the same address are the same node;
    ///   the converse does not hold.
    pub fn addr(&self) -> usize {
        match self {
            Self::Constant(c) => Rc::as_ptr(c) as *const () as usize,
            Self::Cons(tc) => Rc::as_ptr(tc) as *const () as usize,
            Self::Ambiguity(amb) => Rc::as_ptr(amb) as *const () as usize,
            Self::KList(klist) => Rc::as_ptr(klist) as *const () as usize,
        }
    }

    /// Whether `self` and `other` are the same allocation.
    pub fn ptr_eq(&self, other: &Term) -> bool {
        match (self, other) {
            (Self::Constant(a), Self::Constant(b)) => Rc::ptr_eq(a, b),
            (Self::Cons(a), Self::Cons(b)) => Rc::ptr_eq(a, b),
            (Self::Ambiguity(a), Self::Ambiguity(b)) => Rc::ptr_eq(a, b),
            (Self::KList(a), Self::KList(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Number of nodes in this tree,
    ///   counting shared subtrees once per occurrence.
    pub fn size(&self) -> usize {
        1 + self.items().iter().map(Term::size).sum::<usize>()
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }

        match (self, other) {
            (Self::Constant(a), Self::Constant(b)) => a == b,
            (Self::Cons(a), Self::Cons(b)) => a == b,
            (Self::Ambiguity(a), Self::Ambiguity(b)) => a == b,
            (Self::KList(a), Self::KList(b)) => a == b,
            _ => false,
        }
    }
}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Self::Constant(c) => c.hash(state),
            Self::Cons(tc) => tc.hash(state),
            Self::Ambiguity(amb) => amb.hash(state),
            Self::KList(klist) => klist.hash(state),
        }
    }
}

impl From<TermCons> for Term {
    fn from(tc: TermCons) -> Self {
        Self::Cons(Rc::new(tc))
    }
}

impl Display for Term {
    /// Compact rendering for logs and test failures.
    ///
    /// Productions are represented by their label where they have one and
    ///   by their sort otherwise.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn list(f: &mut fmt::Formatter, items: &[Term]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                Display::fmt(item, f)?;
            }
            Ok(())
        }

        match self {
            Self::Constant(c) => {
                write!(f, "{}:{}", c.value, c.production.sort())
            }
            Self::Cons(tc) => {
                match tc.production.klabel() {
                    Some(klabel) => write!(f, "{klabel}(")?,
                    None => write!(f, "<{}>(", tc.production.sort())?,
                }
                list(f, &tc.items)?;
                f.write_str(")")
            }
            Self::Ambiguity(amb) => {
                f.write_str("amb(")?;
                list(f, &amb.items)?;
                f.write_str(")")
            }
            Self::KList(klist) => {
                f.write_str("[")?;
                list(f, &klist.items)?;
                f.write_str("]")
            }
        }
    }
}

/// Leaf term holding a token and the production that lexed it.
#[derive(Debug)]
pub struct Constant {
    value: SymbolId,
    production: Rc<Production>,
    span: Span,
}

impl Constant {
    pub fn value(&self) -> SymbolId {
        self.value
    }

    pub fn production(&self) -> &Rc<Production> {
        &self.production
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.production == other.production
    }
}

impl Eq for Constant {}

impl Hash for Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.production.hash(state);
    }
}

/// Application node.
///
/// Children correspond positionally to the nonterminal slots of the
///   production;
///     terminals produce no child.
#[derive(Debug)]
pub struct TermCons {
    items: Vec<Term>,
    production: Rc<Production>,
    span: Span,
}

impl TermCons {
    /// See [`Term::cons`].
    pub fn new<I>(production: Rc<Production>, items: I, span: Span) -> Self
    where
        I: IntoIterator<Item = Term>,
    {
        let items = items.into_iter().collect::<Vec<_>>();
        let arity = production.arity();

        if items.len() != arity {
            diagnostic_panic!(
                vec![span.internal_error(format!(
                    "application of `{production}` has {} children",
                    items.len()
                ))],
                "production with {arity} nonterminal(s) applied to {} term(s)",
                items.len(),
            );
        }

        Self {
            items,
            production,
            span,
        }
    }

    pub fn items(&self) -> &[Term] {
        &self.items
    }

    pub fn production(&self) -> &Rc<Production> {
        &self.production
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// A node with the same production and span but new children.
    ///
    /// This is subject to the same arity check as [`TermCons::new`].
    pub fn with_items<I>(&self, items: I) -> Self
    where
        I: IntoIterator<Item = Term>,
    {
        Self::new(self.production.clone(), items, self.span)
    }
}

impl PartialEq for TermCons {
    fn eq(&self, other: &Self) -> bool {
        self.production == other.production && self.items == other.items
    }
}

impl Eq for TermCons {}

impl Hash for TermCons {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.production.hash(state);
        self.items.hash(state);
    }
}

/// Alternative parses of one source interval.
///
/// Alternatives are unique under structural equality and retain the order
///   in which they were first seen,
///     so that passes over an ambiguity are deterministic.
/// Equality of two ambiguities,
///   however,
///   disregards that order.
#[derive(Debug)]
pub struct Ambiguity {
    items: Vec<Term>,
    span: Span,
}

impl Ambiguity {
    fn new<I>(items: I, span: Span) -> Self
    where
        I: IntoIterator<Item = Term>,
    {
        let mut seen = FxHashSet::default();

        let uniq = items
            .into_iter()
            .filter(|item| seen.insert(item.clone()))
            .collect();

        Self { items: uniq, span }
    }

    pub fn items(&self) -> &[Term] {
        &self.items
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl PartialEq for Ambiguity {
    fn eq(&self, other: &Self) -> bool {
        // Items are unique,
        //   so equal lengths and containment imply set equality.
        self.items.len() == other.items.len()
            && self.items.iter().all(|item| other.items.contains(item))
    }
}

impl Eq for Ambiguity {}

impl Hash for Ambiguity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent to agree with `PartialEq`.
        let combined = self
            .items
            .iter()
            .map(|item| {
                let mut hasher = fxhash::FxHasher::default();
                item.hash(&mut hasher);
                hasher.finish()
            })
            .fold(0u64, u64::wrapping_add);

        self.items.len().hash(state);
        combined.hash(state);
    }
}

/// Ordered grouping of terms.
///
/// Unlike [`Ambiguity`],
///   order is significant and duplicates are retained.
#[derive(Debug)]
pub struct KList {
    items: Vec<Term>,
    span: Span,
}

impl KList {
    pub fn items(&self) -> &[Term] {
        &self.items
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl PartialEq for KList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for KList {}

impl Hash for KList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}
