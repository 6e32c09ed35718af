// User-declared list sorts
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

//! User-declared list sorts and their completion.
//!
//! A grammar may declare a list sort with
//!   `syntax Exps ::= List{Exp, ","}`,
//!   which the grammar compiler expands into a cons production
//!     (`syntax Exps ::= Exp "," Exps`)
//!   and a nullary terminator production
//!     (`syntax Exps ::= ".Exps"`),
//!   and declares the element sort to be a subsort of the list sort.
//! Each such declaration is a [`UserList`],
//!   and the declarations of a module are held by a [`ListCatalog`].
//!
//! Because of that subsort,
//!   the parser will happily accept a lone element wherever a list is
//!   expected,
//!     but the resulting term is not a list.
//! [`ListCompleter`] finds such slots and wraps the element into a
//!   one-element list terminated by the list's terminator,
//!     so that `f(x)` with `f` taking `Exps` becomes `f(x , .Exps)`.
//! Where a slot cannot be completed safely,
//!   the term is left alone and a warning is recorded.

use crate::{
    error::DisambError,
    grammar::{KLabel, Module, Production, Sort},
    rewrite::{walk_cons, Memo, Outcome, Rewriter, Warnings},
    sym::{GlobalSymbolResolve, SymbolId},
    term::{Term, TermCons},
};
use fxhash::FxHashMap;
use std::{
    error::Error,
    fmt::{self, Display},
    rc::Rc,
};

#[cfg(test)]
mod test;

/// Declaration of a list sort.
///
/// The cons production must take an element followed by a list,
///   in that order,
///   and the terminator production must take nothing;
///     both must produce the list sort.
/// These properties are checked by [`UserList::new`] so that completion
///   can construct terms from them without further checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserList {
    sort: Sort,
    element: Sort,
    separator: Option<SymbolId>,
    non_empty: bool,
    terminator: Rc<Production>,
    cons: Rc<Production>,
}

impl UserList {
    pub fn new(
        sort: Sort,
        element: Sort,
        terminator: Rc<Production>,
        cons: Rc<Production>,
    ) -> Result<Self, CatalogError> {
        use CatalogError::*;

        if terminator.sort() != sort {
            return Err(SortMismatch {
                list: sort,
                found: terminator.sort(),
            });
        }

        if cons.sort() != sort {
            return Err(SortMismatch {
                list: sort,
                found: cons.sort(),
            });
        }

        if terminator.arity() != 0 {
            return Err(TerminatorNotNullary {
                list: sort,
                arity: terminator.arity(),
            });
        }

        if !cons.nonterminals().eq([element, sort]) {
            return Err(MalformedCons {
                list: sort,
                element,
            });
        }

        Ok(Self {
            sort,
            element,
            separator: None,
            non_empty: false,
            terminator,
            cons,
        })
    }

    /// Terminal separating elements in concrete syntax.
    pub fn with_separator<S: Into<SymbolId>>(self, separator: S) -> Self {
        Self {
            separator: Some(separator.into()),
            ..self
        }
    }

    /// Whether the list was declared to have at least one element
    ///   (`NeList`).
    pub fn with_non_empty(self, non_empty: bool) -> Self {
        Self { non_empty, ..self }
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    pub fn element(&self) -> Sort {
        self.element
    }

    pub fn separator(&self) -> Option<SymbolId> {
        self.separator
    }

    pub fn is_non_empty(&self) -> bool {
        self.non_empty
    }

    pub fn terminator(&self) -> &Rc<Production> {
        &self.terminator
    }

    pub fn cons(&self) -> &Rc<Production> {
        &self.cons
    }

    /// Label of the cons production.
    pub fn klabel(&self) -> Option<KLabel> {
        self.cons.klabel()
    }

    /// Label of the terminator production.
    pub fn terminator_label(&self) -> Option<KLabel> {
        self.terminator.klabel()
    }
}

/// The list sorts declared by a module.
///
/// A list sort may be declared more than once;
///   declarations are retained in the order in which they were added and
///   completion uses the first.
#[derive(Debug, Default)]
pub struct ListCatalog {
    lists: FxHashMap<Sort, Vec<UserList>>,
}

impl ListCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(mut self, list: UserList) -> Self {
        self.insert(list);
        self
    }

    pub fn insert(&mut self, list: UserList) {
        self.lists.entry(list.sort()).or_default().push(list);
    }

    pub fn is_list_sort(&self, sort: Sort) -> bool {
        self.lists.contains_key(&sort)
    }

    /// Declarations of the list sort `sort`,
    ///   which is empty if `sort` is not a list sort.
    pub fn lists_for(&self, sort: Sort) -> &[UserList] {
        self.lists.get(&sort).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The declaration used to complete slots of sort `sort`.
    pub fn first_for(&self, sort: Sort) -> Option<&UserList> {
        self.lists_for(sort).first()
    }

    /// Declarations of lists whose elements are of sort `element`.
    pub fn lists_for_element(
        &self,
        element: Sort,
    ) -> impl Iterator<Item = &UserList> + '_ {
        self.lists
            .values()
            .flatten()
            .filter(move |list| list.element() == element)
    }

    pub fn list_sorts(&self) -> impl Iterator<Item = Sort> + '_ {
        self.lists.keys().copied()
    }

    /// Number of list sorts.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

impl FromIterator<UserList> for ListCatalog {
    fn from_iter<I: IntoIterator<Item = UserList>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with_list)
    }
}

/// A list declaration whose productions do not have the shape of a list.
#[derive(Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// A production of the list produces some other sort.
    SortMismatch { list: Sort, found: Sort },

    /// The terminator production has nonterminals.
    TerminatorNotNullary { list: Sort, arity: usize },

    /// The cons production does not take an element followed by a list.
    MalformedCons { list: Sort, element: Sort },
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::SortMismatch { list, found } => write!(
                f,
                "production of sort '{found}' cannot declare list sort '{list}'"
            ),
            Self::TerminatorNotNullary { list, arity } => write!(
                f,
                "terminator of list sort '{list}' has {arity} nonterminal(s)"
            ),
            Self::MalformedCons { list, element } => write!(
                f,
                "cons production of list sort '{list}' must take \
                   '{element}' followed by '{list}'"
            ),
        }
    }
}

impl Error for CatalogError {}

/// Inserts list structure where an element occupies a list slot.
///
/// Children are completed before their parents.
/// For each nonterminal slot of a list sort `S` whose child has the
///   effective sort `X`
///     (see [`ListCompleter::effective_sort`]),
///   the child is left alone if
///
///   - `X` is a list sort no greater than `S`;
///   - the child was produced by a `bracket` production or is a rewrite;
///       or
///   - the node itself is a cast or a rewrite,
///       whose operands are not list contexts.
///
/// Otherwise,
///   if `X` is strictly less than `S` and is not `K`,
///   the child is wrapped as `cons(child, terminator)` using the first
///   [`UserList`] declared for `S`.
/// Any other child is left alone with a
///   [`DisambError::ListSortExpected`] warning.
///
/// Alternatives of an ambiguous child are completed individually.
///
/// This pass never fails.
#[derive(Debug)]
pub struct ListCompleter<'m> {
    module: &'m Module,
    memo: Option<Memo>,
}

impl<'m> ListCompleter<'m> {
    /// A completer that does not memoize.
    pub fn new(module: &'m Module) -> Self {
        Self::with_memo(module, false)
    }

    pub fn with_memo(module: &'m Module, memoize: bool) -> Self {
        Self {
            module,
            memo: memoize.then(Memo::new),
        }
    }

    /// Complete the list slots of `term`.
    pub fn complete(&mut self, term: &Term) -> Outcome {
        if let Some(memo) = self.memo.as_mut() {
            memo.clear();
        }

        self.rewrite(term)
    }

    /// Sort used to decide whether `child` fits a list slot.
    ///
    /// This is the sort of the production of `child`,
    ///   unless `child` is a `#KApply` of a label literal,
    ///     in which case the production sort is `K` and says nothing about
    ///     the term.
    /// The label's productions are then consulted and their greatest sort
    ///   is used,
    ///     if there is one.
    pub fn effective_sort(&self, child: &Term) -> Option<Sort> {
        let prod = child.production()?;

        let applied = match child {
            Term::Cons(tc) if prod.klabel() == Some(KLabel::KAPPLY) => {
                tc.items().first().and_then(label_literal)
            }
            _ => None,
        };

        applied
            .and_then(|label| {
                self.module.subsorts().greatest(
                    self.module
                        .productions_for(label)
                        .iter()
                        .map(|prod| prod.sort()),
                )
            })
            .or(Some(prod.sort()))
    }

    fn complete_node(&self, term: &Term) -> Outcome {
        let tc = match term {
            Term::Cons(tc) => tc,
            _ => return Outcome::ok(term.clone()),
        };

        if let Some(klabel) = tc.production().klabel() {
            if klabel.is_cast() || klabel.is_rewrite() {
                return Outcome::ok(term.clone());
            }
        }

        let mut warnings = Warnings::new();
        let mut changed = false;
        let mut items = Vec::with_capacity(tc.items().len());

        for (slot, child) in tc.production().nonterminals().zip(tc.items()) {
            let completed = self.complete_slot(slot, child, &mut warnings);
            changed |= !completed.ptr_eq(child);
            items.push(completed);
        }

        let result = if changed {
            tc.with_items(items).into()
        } else {
            term.clone()
        };

        Outcome::ok(result).merge_warnings(warnings)
    }

    fn complete_slot(
        &self,
        slot: Sort,
        child: &Term,
        warnings: &mut Warnings,
    ) -> Term {
        let lists = self.module.lists();
        let subsorts = self.module.subsorts();

        if !lists.is_list_sort(slot) {
            return child.clone();
        }

        if let Term::Ambiguity(amb) = child {
            let alts = amb
                .items()
                .iter()
                .map(|alt| self.complete_slot(slot, alt, warnings))
                .collect::<Vec<_>>();

            let unchanged =
                alts.iter().zip(amb.items()).all(|(a, b)| a.ptr_eq(b));

            return if unchanged {
                child.clone()
            } else {
                Term::ambiguity(alts, amb.span())
            };
        }

        let found = self.effective_sort(child);
        let (prod, found) = match (child.production(), found) {
            (Some(prod), Some(found)) => (prod, found),
            _ => return child.clone(),
        };

        if subsorts.less_than_eq(found, slot) && lists.is_list_sort(found) {
            return child.clone();
        }

        let is_rewrite = prod.klabel().map_or(false, |l| l.is_rewrite());
        if prod.is_bracket() || is_rewrite {
            return child.clone();
        }

        if found == Sort::K || !subsorts.less_than(found, slot) {
            tracing::debug!(
                span = %child.span(),
                %found,
                expected = %slot,
                "list sort expected"
            );

            warnings.insert(DisambError::ListSortExpected {
                found,
                expected: slot,
                span: child.span(),
            });

            return child.clone();
        }

        match lists.first_for(slot) {
            Some(list) => {
                let span = child.span();

                tracing::trace!(
                    %span,
                    list = %slot,
                    "completing element into singleton list"
                );

                let terminator =
                    Term::cons(list.terminator().clone(), [], span);

                Term::cons(
                    list.cons().clone(),
                    [child.clone(), terminator],
                    span,
                )
            }
            None => child.clone(),
        }
    }
}

/// Label named by a `KLabel` literal,
///   whose value is the label enclosed in quote characters.
fn label_literal(term: &Term) -> Option<KLabel> {
    match term {
        Term::Constant(c) if c.production().sort() == Sort::KLABEL => {
            let mut chars = c.value().lookup_str().chars();
            chars.next()?;
            chars.next_back()?;

            Some(KLabel::new(chars.as_str()))
        }
        _ => None,
    }
}

impl<'m> Rewriter for ListCompleter<'m> {
    fn memo(&mut self) -> Option<&mut Memo> {
        self.memo.as_mut()
    }

    fn rewrite_cons(&mut self, term: &Term, tc: &Rc<TermCons>) -> Outcome {
        walk_cons(self, term, tc)
            .and_then(|walked| self.complete_node(&walked))
    }
}
