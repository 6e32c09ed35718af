// Tests for generic term rewriting
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

use super::*;
use crate::{
    grammar::{KLabel, Production, ProductionItem::*, Sort},
    span::{dummy::*, Span},
    sym::{GlobalSymbolIntern, GlobalSymbolResolve, SymbolId},
};

fn int() -> Rc<Production> {
    Rc::new(Production::new("Int".into(), []))
}

fn pair() -> Rc<Production> {
    let exp = Sort::from("Exp");
    Rc::new(Production::labeled(
        exp,
        KLabel::from("pair"),
        [NonTerminal(exp), NonTerminal(exp)],
    ))
}

fn int_const(value: &str, span: Span) -> Term {
    Term::constant(value, int(), span)
}

fn fatal(span: Span) -> DisambError {
    DisambError::UnlabeledNonSubsort {
        sort: "Exp".into(),
        arity: 0,
        span,
    }
}

fn warning(span: Span) -> DisambError {
    DisambError::ListSortExpected {
        found: "Exp".into(),
        expected: "Exps".into(),
        span,
    }
}

/// Renames constant `from` to `to`,
///   fails on `bad`,
///   and warns on `odd`.
///
/// Every constant visited is counted so that memoization can be observed.
struct Stub {
    from: SymbolId,
    to: SymbolId,
    visits: usize,
    memo: Option<Memo>,
}

impl Stub {
    fn new(memoize: bool) -> Self {
        Self {
            from: "x".intern(),
            to: "y".intern(),
            visits: 0,
            memo: memoize.then(Memo::new),
        }
    }
}

impl Rewriter for Stub {
    fn memo(&mut self) -> Option<&mut Memo> {
        self.memo.as_mut()
    }

    fn rewrite_constant(&mut self, term: &Term, c: &Rc<Constant>) -> Outcome {
        self.visits += 1;

        match c.value().lookup_str() {
            "bad" => Outcome::fail(fatal(c.span())),
            "odd" => Outcome::ok(term.clone()).warn(warning(c.span())),
            _ if c.value() == self.from => Outcome::ok(Term::constant(
                self.to,
                c.production().clone(),
                c.span(),
            )),
            _ => Outcome::ok(term.clone()),
        }
    }
}

#[test]
fn outcome_and_then_merges_warnings() {
    let a = int_const("1", S1);
    let b = int_const("2", S2);

    let outcome = Outcome::ok(a)
        .warn(warning(S1))
        .and_then(|_| Outcome::ok(b.clone()).warn(warning(S2)));

    assert_eq!(Some(&b), outcome.term());
    assert_eq!(
        &Warnings::from([warning(S1), warning(S2)]),
        outcome.warnings()
    );
}

#[test]
fn outcome_and_then_skips_failure() {
    let outcome = Outcome::fail(fatal(S1))
        .warn(warning(S2))
        .and_then(|_| panic!("must not be invoked"));

    assert_eq!(
        Err((Failures::from([fatal(S1)]), Warnings::from([warning(S2)]))),
        outcome.into_result()
    );
}

#[test]
fn outcome_map() {
    let outcome = Outcome::ok(int_const("1", S1))
        .warn(warning(S1))
        .map(|_| int_const("2", S2));

    assert!(outcome.is_ok());
    assert_eq!(Some(&int_const("2", S2)), outcome.term());
    assert_eq!(1, outcome.warnings().len());
}

#[should_panic = "rewrite failed without a cause"]
#[test]
fn outcome_cannot_fail_without_cause() {
    Outcome::fail_all(Failures::new());
}

#[test]
fn unchanged_tree_is_shared() {
    let tree =
        Term::cons(pair(), [int_const("1", S1), int_const("2", S2)], S3);

    let outcome = Stub::new(false).rewrite(&tree);

    assert!(outcome.term().unwrap().ptr_eq(&tree));
    assert!(outcome.warnings().is_empty());
}

#[test]
fn changed_child_rebuilds_parent_and_shares_siblings() {
    let sibling = int_const("1", S1);
    let tree =
        Term::cons(pair(), [sibling.clone(), int_const("x", S2)], S3);

    let outcome = Stub::new(false).rewrite(&tree);
    let result = outcome.term().unwrap();

    assert!(!result.ptr_eq(&tree));
    assert_eq!(
        &Term::cons(pair(), [int_const("1", S1), int_const("y", S2)], S3),
        result
    );
    assert!(result.items()[0].ptr_eq(&sibling));
    assert_eq!(S3, result.span());
}

#[test]
fn failures_of_children_are_unioned() {
    let tree =
        Term::cons(pair(), [int_const("bad", S1), int_const("bad", S2)], S3);

    let outcome = Stub::new(false).rewrite(&tree);

    assert_eq!(
        Some(&Failures::from([fatal(S1), fatal(S2)])),
        outcome.failures()
    );
}

#[test]
fn warnings_of_children_survive_sibling_failure() {
    let tree =
        Term::klist([int_const("odd", S1), int_const("bad", S2)], S3);

    let outcome = Stub::new(false).rewrite(&tree);

    assert!(!outcome.is_ok());
    assert_eq!(&Warnings::from([warning(S1)]), outcome.warnings());
}

#[test]
fn klist_rebuilt_in_order() {
    let tree = Term::klist(
        [int_const("x", S1), int_const("1", S2), int_const("x", S3)],
        S4,
    );

    let outcome = Stub::new(false).rewrite(&tree);

    assert_eq!(
        Some(&Term::klist(
            [int_const("y", S1), int_const("1", S2), int_const("y", S3)],
            S4
        )),
        outcome.term()
    );
}

#[test]
fn ambiguity_discards_failed_alternatives_and_their_warnings() {
    let failing =
        Term::klist([int_const("odd", S1), int_const("bad", S2)], S3);
    let surviving = Term::klist([int_const("odd", S4)], S5);

    let tree = Term::ambiguity([failing, surviving.clone()], S6);

    let outcome = Stub::new(false).rewrite(&tree);
    let result = outcome.term().unwrap();

    assert_eq!(&Term::ambiguity([surviving], S6), result);
    assert_eq!(1, result.items().len());
    assert_eq!(&Warnings::from([warning(S4)]), outcome.warnings());
}

#[test]
fn ambiguity_fails_when_all_alternatives_fail() {
    let tree = Term::ambiguity(
        [
            Term::klist([int_const("bad", S1)], S2),
            Term::klist([int_const("odd", S3), int_const("bad", S4)], S5),
        ],
        S6,
    );

    let outcome = Stub::new(false).rewrite(&tree);

    assert_eq!(
        Err((Failures::from([fatal(S1), fatal(S4)]), Warnings::new())),
        outcome.into_result()
    );
}

#[test]
fn ambiguity_without_failures_is_shared() {
    let tree =
        Term::ambiguity([int_const("1", S1), int_const("2", S2)], S3);

    let outcome = Stub::new(false).rewrite(&tree);

    assert!(outcome.term().unwrap().ptr_eq(&tree));
}

#[test]
fn memo_rewrites_shared_node_once() {
    let shared = int_const("x", S1);
    let tree = Term::cons(pair(), [shared.clone(), shared.clone()], S2);

    let mut plain = Stub::new(false);
    let mut memoized = Stub::new(true);

    let expected = plain.rewrite(&tree);
    let given = memoized.rewrite(&tree);

    assert_eq!(expected, given);
    assert_eq!(2, plain.visits);
    assert_eq!(1, memoized.visits);

    // Both occurrences are the very same rewritten node.
    let result = given.term().unwrap();
    assert!(result.items()[0].ptr_eq(&result.items()[1]));
}

#[test]
fn memo_distinguishes_structurally_equal_nodes() {
    let mut memo = Memo::new();

    let a = int_const("1", S1);
    let b = int_const("1", S2);

    memo.insert(&a, Outcome::ok(int_const("2", S1)));

    assert_eq!(Some(Outcome::ok(int_const("2", S1))), memo.get(&a));
    assert_eq!(None, memo.get(&b));
    assert_eq!(1, memo.len());

    memo.clear();
    assert!(memo.is_empty());
    assert_eq!(None, memo.get(&a));
}
