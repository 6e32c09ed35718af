// Generic term rewriting
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

//! Recursive rewriting of a [`Term`] with error and warning propagation.
//!
//! A disambiguation pass is a [`Rewriter`]:
//!   it overrides the hook for each variant of [`Term`] that it cares
//!   about and delegates the rest to the default traversal,
//!     which rewrites children and rebuilds a node only if one of them
//!     changed.
//!
//! Every rewrite produces an [`Outcome`],
//!   which holds either a new term or a non-empty set of fatal
//!   diagnostics,
//!   alongside a set of warnings that is accumulated independently.
//! A failure invalidates only the branch of the tree in which it occurs:
//!   the default traversal of an [`Ambiguity`] discards the alternatives
//!   that failed and continues with the rest,
//!     failing itself only if no alternative survives.
//!
//! Rewriters may opt into memoization by returning a [`Memo`] from
//!   [`Rewriter::memo`],
//!     in which case a node that is shared by many parents
//!     (as is common in a parse forest)
//!     is rewritten only once per traversal.

use crate::{
    diagnostic_panic,
    error::DisambError,
    global,
    term::{Ambiguity, Constant, KList, Term, TermCons},
};
use fxhash::FxHashMap;
use std::{collections::BTreeSet, rc::Rc};

#[cfg(test)]
mod test;

/// Fatal diagnostics of a failed rewrite.
pub type Failures = BTreeSet<DisambError>;

/// Non-fatal diagnostics accumulated during a rewrite.
pub type Warnings = BTreeSet<DisambError>;

/// Result of rewriting a term.
///
/// Warnings are retained whether or not the rewrite succeeded,
///   so that a caller that recovers from the failure
///   (as the traversal of an ambiguity does)
///   decides for itself whether they are still relevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    result: Result<Term, Failures>,
    warnings: Warnings,
}

impl Outcome {
    pub fn ok(term: Term) -> Self {
        Self {
            result: Ok(term),
            warnings: Warnings::new(),
        }
    }

    pub fn fail(err: DisambError) -> Self {
        Self::fail_all(Failures::from([err]))
    }

    /// Fail with each of `failures`.
    ///
    /// Panics
    /// ======
    /// A failure must have at least one cause.
    pub fn fail_all(failures: Failures) -> Self {
        if failures.is_empty() {
            diagnostic_panic!(vec![], "rewrite failed without a cause");
        }

        Self {
            result: Err(failures),
            warnings: Warnings::new(),
        }
    }

    /// Record a warning,
    ///   which does not affect the result.
    pub fn warn(mut self, warning: DisambError) -> Self {
        self.warnings.insert(warning);
        self
    }

    pub fn merge_warnings(mut self, warnings: Warnings) -> Self {
        self.warnings.extend(warnings);
        self
    }

    /// Continue a successful rewrite with `f`,
    ///   keeping warnings from both steps.
    ///
    /// A failed outcome is returned unchanged without invoking `f`.
    pub fn and_then<F>(self, f: F) -> Self
    where
        F: FnOnce(Term) -> Outcome,
    {
        let Self { result, warnings } = self;

        match result {
            Ok(term) => f(term).merge_warnings(warnings),
            Err(failures) => Self {
                result: Err(failures),
                warnings,
            },
        }
    }

    pub fn map<F>(self, f: F) -> Self
    where
        F: FnOnce(Term) -> Term,
    {
        Self {
            result: self.result.map(f),
            warnings: self.warnings,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Rewritten term,
    ///   if the rewrite succeeded.
    pub fn term(&self) -> Option<&Term> {
        self.result.as_ref().ok()
    }

    pub fn failures(&self) -> Option<&Failures> {
        self.result.as_ref().err()
    }

    pub fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    /// Split into a [`Result`],
    ///   each side of which carries the accumulated warnings.
    pub fn into_result(
        self,
    ) -> Result<(Term, Warnings), (Failures, Warnings)> {
        match self.result {
            Ok(term) => Ok((term, self.warnings)),
            Err(failures) => Err((failures, self.warnings)),
        }
    }
}

/// Cache of outcomes keyed by the identity of the rewritten node.
///
/// A node is identified by its allocation rather than by structural
///   equality,
///     since rewriters may consult spans that equality disregards.
/// Each entry retains the node it was computed for so that its allocation
///   cannot be freed and reused by a different node while cached.
#[derive(Debug, Default)]
pub struct Memo {
    cache: FxHashMap<usize, (Term, Outcome)>,
}

impl Memo {
    pub fn new() -> Self {
        Self {
            cache: FxHashMap::with_capacity_and_hasher(
                global::INIT_MEMO_CAPACITY,
                Default::default(),
            ),
        }
    }

    pub fn get(&self, term: &Term) -> Option<Outcome> {
        self.cache
            .get(&term.addr())
            .filter(|(cached, _)| cached.ptr_eq(term))
            .map(|(_, outcome)| outcome.clone())
    }

    pub fn insert(&mut self, term: &Term, outcome: Outcome) {
        self.cache.insert(term.addr(), (term.clone(), outcome));
    }

    /// Forget all outcomes,
    ///   releasing the nodes they retain.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// A recursive transformation of [`Term`]s.
///
/// Implementors override the hooks for the variants that they transform;
///   every hook defaults to the structural traversal of its variant
///   ([`walk_cons`], [`walk_klist`], [`walk_ambiguity`]),
///     and constants default to themselves.
/// Hooks that recurse should do so through [`Rewriter::rewrite`] so that
///   memoization applies.
pub trait Rewriter {
    /// Outcome cache for this rewriter,
    ///   if it memoizes.
    fn memo(&mut self) -> Option<&mut Memo> {
        None
    }

    /// Rewrite `term`,
    ///   consulting and populating [`Rewriter::memo`].
    fn rewrite(&mut self, term: &Term) -> Outcome {
        if let Some(hit) = self.memo().and_then(|memo| memo.get(term)) {
            return hit;
        }

        let outcome = match term {
            Term::Constant(c) => self.rewrite_constant(term, c),
            Term::Cons(tc) => self.rewrite_cons(term, tc),
            Term::Ambiguity(amb) => self.rewrite_ambiguity(term, amb),
            Term::KList(klist) => self.rewrite_klist(term, klist),
        };

        if let Some(memo) = self.memo() {
            memo.insert(term, outcome.clone());
        }

        outcome
    }

    fn rewrite_constant(
        &mut self,
        term: &Term,
        _c: &Rc<Constant>,
    ) -> Outcome {
        Outcome::ok(term.clone())
    }

    fn rewrite_cons(&mut self, term: &Term, tc: &Rc<TermCons>) -> Outcome {
        walk_cons(self, term, tc)
    }

    fn rewrite_ambiguity(
        &mut self,
        term: &Term,
        amb: &Rc<Ambiguity>,
    ) -> Outcome {
        walk_ambiguity(self, term, amb)
    }

    fn rewrite_klist(&mut self, term: &Term, klist: &Rc<KList>) -> Outcome {
        walk_klist(self, term, klist)
    }
}

/// Rewrite each of `items` in order.
///
/// Produces the rewritten items if every item succeeded,
///   otherwise the union of all failures;
///     warnings are collected from every item either way.
fn walk_items<R: Rewriter + ?Sized>(
    r: &mut R,
    items: &[Term],
) -> (Result<Vec<Term>, Failures>, Warnings) {
    let mut warnings = Warnings::new();
    let mut failures = Failures::new();
    let mut rewritten = Vec::with_capacity(items.len());

    for item in items {
        let Outcome {
            result,
            warnings: item_warnings,
        } = r.rewrite(item);

        warnings.extend(item_warnings);

        match result {
            Ok(term) => rewritten.push(term),
            Err(item_failures) => failures.extend(item_failures),
        }
    }

    if failures.is_empty() {
        (Ok(rewritten), warnings)
    } else {
        (Err(failures), warnings)
    }
}

/// Whether `new` holds exactly the nodes of `old`.
fn unchanged(old: &[Term], new: &[Term]) -> bool {
    old.len() == new.len() && old.iter().zip(new).all(|(a, b)| a.ptr_eq(b))
}

/// Rewrite the children of an application node in order.
///
/// The node is rebuilt only if a child changed;
///   otherwise `term` itself is the result,
///     preserving sharing.
pub fn walk_cons<R: Rewriter + ?Sized>(
    r: &mut R,
    term: &Term,
    tc: &TermCons,
) -> Outcome {
    match walk_items(r, tc.items()) {
        (Ok(items), warnings) if unchanged(tc.items(), &items) => {
            Outcome::ok(term.clone()).merge_warnings(warnings)
        }
        (Ok(items), warnings) => {
            Outcome::ok(tc.with_items(items).into()).merge_warnings(warnings)
        }
        (Err(failures), warnings) => {
            Outcome::fail_all(failures).merge_warnings(warnings)
        }
    }
}

/// Rewrite the items of a grouping in order.
///
/// Like [`walk_cons`],
///   the grouping is rebuilt only if an item changed.
pub fn walk_klist<R: Rewriter + ?Sized>(
    r: &mut R,
    term: &Term,
    klist: &KList,
) -> Outcome {
    match walk_items(r, klist.items()) {
        (Ok(items), warnings) if unchanged(klist.items(), &items) => {
            Outcome::ok(term.clone()).merge_warnings(warnings)
        }
        (Ok(items), warnings) => {
            Outcome::ok(Term::klist(items, klist.span()))
                .merge_warnings(warnings)
        }
        (Err(failures), warnings) => {
            Outcome::fail_all(failures).merge_warnings(warnings)
        }
    }
}

/// Rewrite each alternative of an ambiguity independently.
///
/// Alternatives that fail are discarded along with their warnings.
/// If at least one alternative survives,
///   the result is an ambiguity of the survivors
///     (which may have only one alternative;
///       collapsing it is left to the rewriter)
///   carrying their warnings.
/// If every alternative fails,
///   the ambiguity fails with the union of their failures.
pub fn walk_ambiguity<R: Rewriter + ?Sized>(
    r: &mut R,
    term: &Term,
    amb: &Ambiguity,
) -> Outcome {
    let mut survivors = Vec::with_capacity(amb.items().len());
    let mut warnings = Warnings::new();
    let mut failures = Failures::new();

    for alt in amb.items() {
        let Outcome {
            result,
            warnings: alt_warnings,
        } = r.rewrite(alt);

        match result {
            Ok(alt) => {
                survivors.push(alt);
                warnings.extend(alt_warnings);
            }
            Err(alt_failures) => {
                tracing::trace!(
                    span = %alt.span(),
                    failures = alt_failures.len(),
                    "discarding failed alternative"
                );
                failures.extend(alt_failures);
            }
        }
    }

    if survivors.is_empty() && !failures.is_empty() {
        return Outcome::fail_all(failures);
    }

    let result = if unchanged(amb.items(), &survivors) {
        term.clone()
    } else {
        Term::ambiguity(survivors, amb.span())
    };

    Outcome::ok(result).merge_warnings(warnings)
}
