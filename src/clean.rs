// Parse artifact removal
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

//! Removal of parsing artifacts.
//!
//! The parser produces a node for every production it applies,
//!   including subsort productions
//!     (`syntax Exp ::= Int`)
//!   that carry no meaning of their own,
//!   and it groups arguments and alternatives into nodes even when there
//!   is only one of them.
//! [`TreeCleaner`] removes both:
//!
//!   - An application of a production without a label is replaced by its
//!       sole child.
//!     Such a production with other than one nonterminal is malformed and
//!       fails with [`DisambError::UnlabeledNonSubsort`].
//!   - Groupings and ambiguities drop children that clean to the empty
//!       marker.
//!     If none remain,
//!       the node becomes the empty marker;
//!     if one remains,
//!       the node is replaced by it.
//!
//! Cleaning is idempotent.

use crate::{
    error::DisambError,
    rewrite::{walk_ambiguity, walk_cons, walk_klist, Memo, Outcome, Rewriter},
    term::{Ambiguity, KList, Term, TermCons},
};
use std::rc::Rc;


/// Removes subsort wrappers and collapses degenerate groupings.
///
/// See the [module-level documentation](self) for more information.
#[derive(Debug)]
pub struct TreeCleaner {
    memo: Option<Memo>,
}

impl Default for TreeCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeCleaner {
    /// A memoizing cleaner.
    pub fn new() -> Self {
        Self::with_memo(true)
    }

    pub fn with_memo(memoize: bool) -> Self {
        Self {
            memo: memoize.then(Memo::new),
        }
    }

    /// Clean `term`.
    ///
    /// Outcomes memoized by a previous call are discarded first.
    pub fn clean(&mut self, term: &Term) -> Outcome {
        if let Some(memo) = self.memo.as_mut() {
            memo.clear();
        }

        self.rewrite(term)
    }

    /// Drop empty markers from a rewritten grouping or ambiguity `term`
    ///   and collapse it if fewer than two children remain.
    fn collapse<F>(&mut self, term: Term, rebuild: F) -> Outcome
    where
        F: FnOnce(Vec<Term>) -> Term,
    {
        let len = term.items().len();
        let survivors = term
            .items()
            .iter()
            .filter(|item| !item.is_empty_marker())
            .cloned()
            .collect::<Vec<_>>();

        match survivors.len() {
            0 if term.is_empty_marker() => Outcome::ok(term),
            0 => Outcome::ok(Term::empty(term.span())),
            1 => self.rewrite(&survivors[0]),
            n if n == len => Outcome::ok(term),
            _ => Outcome::ok(rebuild(survivors)),
        }
    }
}

impl Rewriter for TreeCleaner {
    fn memo(&mut self) -> Option<&mut Memo> {
        self.memo.as_mut()
    }

    fn rewrite_cons(&mut self, term: &Term, tc: &Rc<TermCons>) -> Outcome {
        if tc.production().klabel().is_some() {
            return walk_cons(self, term, tc);
        }

        match tc.items() {
            [sole] => {
                tracing::trace!(
                    span = %tc.span(),
                    sort = %tc.production().sort(),
                    "eliminating subsort production"
                );

                self.rewrite(sole)
            }

            items => Outcome::fail(DisambError::UnlabeledNonSubsort {
                sort: tc.production().sort(),
                arity: items.len(),
                span: tc.span(),
            }),
        }
    }

    fn rewrite_klist(&mut self, term: &Term, klist: &Rc<KList>) -> Outcome {
        let span = klist.span();

        walk_klist(self, term, klist).and_then(|walked| {
            self.collapse(walked, |items| Term::klist(items, span))
        })
    }

    fn rewrite_ambiguity(
        &mut self,
        term: &Term,
        amb: &Rc<Ambiguity>,
    ) -> Outcome {
        let span = amb.span();

        walk_ambiguity(self, term, amb).and_then(|walked| {
            self.collapse(walked, |items| Term::ambiguity(items, span))
        })
    }
}
