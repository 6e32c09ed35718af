// Grammar metadata consumed by disambiguation
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

//! Sorts, labels and productions of a sorted grammar.
//!
//! These objects are produced by the grammar compiler,
//!   which is external to this crate;
//!     they are consumed here only as read-only metadata that every parse
//!     tree node refers to.
//!
//! A [`Production`] maps an ordered sequence of [`ProductionItem`]s
//!   (terminals and sorted nonterminals)
//!   to a result [`Sort`].
//! Productions that carry a [`KLabel`] construct terms;
//!   productions without one are _subsort productions_
//!     (`syntax Exp ::= Int`)
//!     that exist only to inject one sort into another and must therefore
//!     have exactly one nonterminal.
//!
//! A [`Module`] bundles everything a disambiguation pass needs to know
//!   about the grammar:
//!     the [`SortLattice`],
//!     the [`ListCatalog`],
//!     and an index of productions by label.

use crate::{
    lists::ListCatalog,
    sort::SortLattice,
    sym::{st, GlobalSymbolResolve, SymbolId},
};
use fxhash::FxHashMap;
use std::{
    fmt::{self, Display},
    rc::Rc,
};


/// A syntactic category.
///
/// Sorts are compared by their interned name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sort(SymbolId);

impl Sort {
    /// The top sort of the framework,
    ///   of which every user sort is implicitly a subsort.
    pub const K: Sort = Sort(st::S_K);

    /// Sort of label literals appearing in `#KApply` terms.
    pub const KLABEL: Sort = Sort(st::S_KLABEL);

    pub fn new<S: Into<SymbolId>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> SymbolId {
        self.0
    }
}

impl From<&str> for Sort {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Label of a term-constructing production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KLabel(SymbolId);

impl KLabel {
    /// Rewrite marker `_=>_`.
    pub const KREWRITE: KLabel = KLabel(st::L_KREWRITE);

    /// Application of a label given as a term.
    pub const KAPPLY: KLabel = KLabel(st::L_KAPPLY);

    pub fn new<S: Into<SymbolId>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> SymbolId {
        self.0
    }

    /// Whether this label ascribes a sort to its operand.
    ///
    /// This includes syntactic casts (`e:S`),
    ///   inner casts,
    ///   and the family of semantic casts (`e::S`),
    ///     whose labels are suffixed with the sort they cast to.
    pub fn is_cast(&self) -> bool {
        let Self(sym) = *self;

        sym == st::L_SYNTACTIC_CAST
            || sym == st::L_INNER_CAST
            || sym
                .lookup_str()
                .starts_with(st::L_SEMANTIC_CAST_PREFIX.lookup_str())
    }

    /// Whether this is the rewrite marker [`KLabel::KREWRITE`].
    pub fn is_rewrite(&self) -> bool {
        *self == Self::KREWRITE
    }
}

impl From<&str> for KLabel {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Display for KLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Attribute keys of a production (e.g. `bracket`).
///
/// Keys are kept sorted and unique so that equal attribute sets compare
///   and hash equal regardless of declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Att(Vec<SymbolId>);

impl Att {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attribute set with `key` added.
    pub fn with<K: Into<SymbolId>>(mut self, key: K) -> Self {
        let key = key.into();

        if let Err(at) = self.0.binary_search(&key) {
            self.0.insert(at, key);
        }

        self
    }

    pub fn contains(&self, key: SymbolId) -> bool {
        self.0.binary_search(&key).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<SymbolId>> FromIterator<K> for Att {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

/// A slot of a [`Production`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductionItem {
    /// Literal token,
    ///   which produces no child term.
    Terminal(SymbolId),

    /// Slot holding a child term of the given sort.
    NonTerminal(Sort),
}

/// Grammar rule mapping an ordered sequence of slots to a result sort.
///
/// Productions are shared by every term parsed with them,
///   and so are passed around as [`Rc<Production>`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    sort: Sort,
    items: Vec<ProductionItem>,
    klabel: Option<KLabel>,
    att: Att,
}

impl Production {
    /// A production without a label or attributes.
    ///
    /// Use [`Production::labeled`] for term-constructing productions.
    pub fn new<I>(sort: Sort, items: I) -> Self
    where
        I: IntoIterator<Item = ProductionItem>,
    {
        Self {
            sort,
            items: items.into_iter().collect(),
            klabel: None,
            att: Att::empty(),
        }
    }

    /// A term-constructing production.
    pub fn labeled<I>(sort: Sort, klabel: KLabel, items: I) -> Self
    where
        I: IntoIterator<Item = ProductionItem>,
    {
        Self {
            klabel: Some(klabel),
            ..Self::new(sort, items)
        }
    }

    /// A subsort production injecting `sub` into `sort`.
    pub fn subsort(sort: Sort, sub: Sort) -> Self {
        Self::new(sort, [ProductionItem::NonTerminal(sub)])
    }

    pub fn with_att(self, att: Att) -> Self {
        Self { att, ..self }
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    pub fn klabel(&self) -> Option<KLabel> {
        self.klabel
    }

    pub fn att(&self) -> &Att {
        &self.att
    }

    pub fn items(&self) -> &[ProductionItem] {
        &self.items
    }

    /// Sorts of the nonterminal slots,
    ///   in order;
    ///     these correspond one-to-one with the children of an
    ///     application node.
    pub fn nonterminals(&self) -> impl Iterator<Item = Sort> + '_ {
        self.items.iter().filter_map(|item| match item {
            ProductionItem::NonTerminal(sort) => Some(*sort),
            ProductionItem::Terminal(_) => None,
        })
    }

    /// Number of nonterminal slots.
    pub fn arity(&self) -> usize {
        self.nonterminals().count()
    }

    /// Whether this production was declared with the `bracket`
    ///   attribute,
    ///     serving only to group its operand.
    pub fn is_bracket(&self) -> bool {
        self.att.contains(st::A_BRACKET)
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "syntax {} ::=", self.sort)?;

        for item in &self.items {
            match item {
                ProductionItem::Terminal(t) => write!(f, " \"{t}\"")?,
                ProductionItem::NonTerminal(s) => write!(f, " {s}")?,
            }
        }

        match self.klabel {
            Some(klabel) => write!(f, " [klabel({klabel})]"),
            None => Ok(()),
        }
    }
}

/// Module-level metadata required by disambiguation.
///
/// This bundles the subsort relation,
///   the declared list sorts,
///   and an index from each [`KLabel`] to the productions that declare it.
/// A module is immutable once constructed and may be shared by any number
///   of passes.
#[derive(Debug, Default)]
pub struct Module {
    subsorts: SortLattice,
    lists: ListCatalog,
    productions_for: FxHashMap<KLabel, Vec<Rc<Production>>>,
}

impl Module {
    pub fn new(subsorts: SortLattice, lists: ListCatalog) -> Self {
        Self {
            subsorts,
            lists,
            productions_for: FxHashMap::default(),
        }
    }

    /// Index the given productions by label.
    ///
    /// Productions without a label are not indexed.
    /// A label may be declared by many productions,
    ///   possibly of different sorts.
    pub fn with_productions<I>(mut self, prods: I) -> Self
    where
        I: IntoIterator<Item = Rc<Production>>,
    {
        for prod in prods {
            if let Some(klabel) = prod.klabel() {
                self.productions_for.entry(klabel).or_default().push(prod);
            }
        }

        self
    }

    pub fn subsorts(&self) -> &SortLattice {
        &self.subsorts
    }

    pub fn lists(&self) -> &ListCatalog {
        &self.lists
    }

    /// Whether `sort` was declared as a list sort.
    pub fn is_list_sort(&self, sort: Sort) -> bool {
        self.lists.is_list_sort(sort)
    }

    /// Productions declaring `klabel`,
    ///   which is empty if the label is unknown.
    pub fn productions_for(&self, klabel: KLabel) -> &[Rc<Production>] {
        self.productions_for
            .get(&klabel)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
