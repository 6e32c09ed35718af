// Tests for user-declared list sorts
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
    grammar::{Att, ProductionItem, ProductionItem::*},
    sort::SortLattice,
    span::{dummy::*, Span},
    sym::{st, GlobalSymbolIntern},
};

fn int() -> Sort {
    Sort::from("Int")
}

fn exp() -> Sort {
    Sort::from("Exp")
}

fn exps() -> Sort {
    Sort::from("Exps")
}

fn stmt() -> Sort {
    Sort::from("Stmt")
}

fn nt(sort: Sort) -> ProductionItem {
    NonTerminal(sort)
}

/// Productions of the grammar
///
/// ```text
///   syntax Int
///   syntax Exp  ::= Int
///   syntax Exps ::= List{Exp, ","}
///   syntax Exp  ::= "f" "(" Exps ")"           [klabel(f)]
///                 | "(" Exp ")"                [bracket]
///                 | "g"                        [klabel(g)]
///   syntax Int  ::= "g"                        [klabel(g)]
///   syntax Stmt ::= "h"                        [klabel(h)]
///   syntax Exp  ::= "h"                        [klabel(h)]
///   syntax Stmt ::= "s"                        [klabel(s)]
///   syntax K    ::= KLabel "(" KList ")"       [klabel(#KApply)]
///   syntax Exp  ::= Exps "=>" Exps             [klabel(#KRewrite)]
///   syntax Exps ::= Exps ":Exps"               [klabel(#SyntacticCast)]
/// ```
struct Grammar {
    int: Rc<Production>,
    f: Rc<Production>,
    pair: Rc<Production>,
    bracket: Rc<Production>,
    s: Rc<Production>,
    klabel: Rc<Production>,
    kapply: Rc<Production>,
    rewrite: Rc<Production>,
    cast: Rc<Production>,
    cons: Rc<Production>,
    terminator: Rc<Production>,
    module: Module,
}

impl Grammar {
    fn new() -> Self {
        let labeled = |sort: Sort, label: &str, items: Vec<ProductionItem>| {
            Rc::new(Production::labeled(sort, KLabel::from(label), items))
        };

        let cons = labeled(exps(), "_,_", vec![nt(exp()), nt(exps())]);
        let terminator = labeled(exps(), ".Exps", vec![]);

        let int_prod = Rc::new(Production::new(int(), []));
        let f = labeled(exp(), "f", vec![nt(exps())]);
        let pair = labeled(exp(), "pair", vec![nt(exps()), nt(exps())]);
        let bracket = Rc::new(
            Production::labeled(exp(), "(_)".into(), [nt(exp())])
                .with_att(Att::empty().with(st::A_BRACKET)),
        );
        let g_exp = labeled(exp(), "g", vec![]);
        let g_int = labeled(int(), "g", vec![]);
        let h_stmt = labeled(stmt(), "h", vec![]);
        let h_exp = labeled(exp(), "h", vec![]);
        let s = labeled(stmt(), "s", vec![]);
        let klabel = Rc::new(Production::new(Sort::KLABEL, []));
        let kapply = labeled(
            Sort::K,
            "#KApply",
            vec![nt(Sort::KLABEL), nt("KList".into())],
        );
        let rewrite =
            labeled(exp(), "#KRewrite", vec![nt(exps()), nt(exps())]);
        let cast = labeled(exps(), "#SyntacticCast", vec![nt(exps())]);

        let subsorts =
            SortLattice::from_subsorts([(int(), exp()), (exp(), exps())])
                .unwrap();

        let lists = ListCatalog::new().with_list(
            UserList::new(exps(), exp(), terminator.clone(), cons.clone())
                .unwrap()
                .with_separator(","),
        );

        let module = Module::new(subsorts, lists).with_productions(
            [
                &cons, &terminator, &f, &pair, &bracket, &g_exp, &g_int,
                &h_stmt, &h_exp, &s, &kapply, &rewrite, &cast,
            ]
            .into_iter()
            .cloned(),
        );

        Self {
            int: int_prod,
            f,
            pair,
            bracket,
            s,
            klabel,
            kapply,
            rewrite,
            cast,
            cons,
            terminator,
            module,
        }
    }

    fn x(&self, span: Span) -> Term {
        Term::constant("x", self.int.clone(), span)
    }

    /// `cons(child, terminator)` as completion would build it.
    fn singleton(&self, child: Term) -> Term {
        let span = child.span();
        let terminator = Term::cons(self.terminator.clone(), [], span);
        Term::cons(self.cons.clone(), [child, terminator], span)
    }

    /// Application of the label literal for `label` to no arguments.
    fn kapply(&self, label: &str, span: Span) -> Term {
        let literal = format!("`{label}`");
        Term::cons(
            self.kapply.clone(),
            [
                Term::constant(literal.as_str(), self.klabel.clone(), span),
                Term::empty(span),
            ],
            span,
        )
    }

    fn complete(&self, term: &Term) -> (Term, Warnings) {
        match ListCompleter::new(&self.module).complete(term).into_result() {
            Ok(done) => done,
            Err((failures, _)) => panic!("completion failed: {failures:?}"),
        }
    }
}

fn list_expected(found: Sort, span: Span) -> DisambError {
    DisambError::ListSortExpected {
        found,
        expected: exps(),
        span,
    }
}

#[test]
fn user_list_accepts_well_formed_declaration() {
    let g = Grammar::new();

    let list = g.module.lists().first_for(exps()).unwrap();

    assert_eq!(exps(), list.sort());
    assert_eq!(exp(), list.element());
    assert_eq!(Some(",".intern()), list.separator());
    assert_eq!(Some(KLabel::from("_,_")), list.klabel());
    assert_eq!(Some(KLabel::from(".Exps")), list.terminator_label());
    assert!(!list.is_non_empty());
}

#[test]
fn user_list_rejects_terminator_with_arguments() {
    let g = Grammar::new();

    assert_eq!(
        Err(CatalogError::TerminatorNotNullary {
            list: exps(),
            arity: 1,
        }),
        UserList::new(exps(), exp(), g.cast.clone(), g.cons.clone())
    );
}

#[test]
fn user_list_rejects_productions_of_other_sorts() {
    let g = Grammar::new();

    assert_eq!(
        Err(CatalogError::SortMismatch {
            list: exps(),
            found: exp(),
        }),
        UserList::new(exps(), exp(), g.terminator.clone(), g.f.clone())
    );
}

#[test]
fn user_list_rejects_cons_in_wrong_order() {
    let g = Grammar::new();
    let flipped = Rc::new(Production::labeled(
        exps(),
        "_,_".into(),
        [nt(exps()), Terminal(",".intern()), nt(exp())],
    ));

    assert_eq!(
        Err(CatalogError::MalformedCons {
            list: exps(),
            element: exp(),
        }),
        UserList::new(exps(), exp(), g.terminator.clone(), flipped)
    );
}

#[test]
fn catalog_lookup() {
    let g = Grammar::new();
    let lists = g.module.lists();

    assert!(lists.is_list_sort(exps()));
    assert!(!lists.is_list_sort(exp()));
    assert!(lists.lists_for(exp()).is_empty());
    assert_eq!(vec![exps()], lists.list_sorts().collect::<Vec<_>>());
    assert_eq!(1, lists.lists_for_element(exp()).count());
    assert_eq!(0, lists.lists_for_element(int()).count());
    assert_eq!(1, lists.len());
}

#[test]
fn catalog_keeps_declarations_in_order() {
    let g = Grammar::new();

    let first =
        UserList::new(exps(), exp(), g.terminator.clone(), g.cons.clone())
            .unwrap();
    let second = first.clone().with_non_empty(true);

    let lists = [first.clone(), second.clone()]
        .into_iter()
        .collect::<ListCatalog>();

    assert_eq!(&[first.clone(), second], lists.lists_for(exps()));
    assert_eq!(Some(&first), lists.first_for(exps()));
    assert_eq!(1, lists.len());
}

#[test]
fn element_in_list_slot_is_completed() {
    let g = Grammar::new();
    let x = g.x(S1);

    let input = Term::cons(g.f.clone(), [x.clone()], S2);
    let (done, warnings) = g.complete(&input);

    assert_eq!(Term::cons(g.f.clone(), [g.singleton(x.clone())], S2), done);
    assert!(warnings.is_empty());

    // The element is shared rather than copied.
    assert!(done.items()[0].items()[0].ptr_eq(&x));

    // Synthesized terms are located at the element.
    assert_eq!(S1, done.items()[0].span());
    assert_eq!(S1, done.items()[0].items()[1].span());
}

#[test]
fn list_in_list_slot_is_unchanged() {
    let g = Grammar::new();

    let input = Term::cons(g.f.clone(), [g.singleton(g.x(S1))], S2);
    let (done, warnings) = g.complete(&input);

    assert!(done.ptr_eq(&input));
    assert!(warnings.is_empty());
}

#[test]
fn only_changed_slots_are_rebuilt() {
    let g = Grammar::new();

    let list = g.singleton(g.x(S1));
    let input = Term::cons(g.pair.clone(), [list.clone(), g.x(S2)], S3);

    let (done, _) = g.complete(&input);

    assert!(done.items()[0].ptr_eq(&list));
    assert_eq!(g.singleton(g.x(S2)), done.items()[1]);
}

#[test]
fn nested_slots_completed() {
    let g = Grammar::new();

    // f(f(x))
    let inner = Term::cons(g.f.clone(), [g.x(S1)], S2);
    let input = Term::cons(g.f.clone(), [inner], S3);

    let (done, _) = g.complete(&input);

    let expected_inner =
        Term::cons(g.f.clone(), [g.singleton(g.x(S1))], S2);
    let expected = Term::cons(
        g.f.clone(),
        [g.singleton(expected_inner)],
        S3,
    );

    assert_eq!(expected, done);
}

#[test]
fn bracket_child_is_not_wrapped() {
    let g = Grammar::new();

    let paren = Term::cons(g.bracket.clone(), [g.x(S1)], S2);
    let input = Term::cons(g.f.clone(), [paren], S3);

    let (done, warnings) = g.complete(&input);

    assert!(done.ptr_eq(&input));
    assert!(warnings.is_empty());
}

#[test]
fn rewrite_child_is_not_wrapped() {
    let g = Grammar::new();

    let lhs = g.singleton(g.x(S1));
    let rhs = g.singleton(g.x(S2));
    let rw = Term::cons(g.rewrite.clone(), [lhs, rhs], S3);
    let input = Term::cons(g.f.clone(), [rw], S4);

    let (done, warnings) = g.complete(&input);

    assert!(done.ptr_eq(&input));
    assert!(warnings.is_empty());
}

#[test]
fn cast_operand_is_not_completed() {
    let g = Grammar::new();

    let input = Term::cons(g.cast.clone(), [g.x(S1)], S2);
    let (done, warnings) = g.complete(&input);

    assert!(done.ptr_eq(&input));
    assert!(warnings.is_empty());
}

#[test]
fn semantic_cast_operand_is_not_completed() {
    let g = Grammar::new();
    let cast = Rc::new(Production::labeled(
        exps(),
        "#SemanticCastToExps".into(),
        [nt(exps())],
    ));

    let input = Term::cons(cast, [g.x(S1)], S2);
    let (done, _) = g.complete(&input);

    assert!(done.ptr_eq(&input));
}

#[test]
fn rewrite_operands_are_not_completed() {
    let g = Grammar::new();

    let input = Term::cons(g.rewrite.clone(), [g.x(S1), g.x(S2)], S3);
    let (done, warnings) = g.complete(&input);

    assert!(done.ptr_eq(&input));
    assert!(warnings.is_empty());
}

#[test]
fn unrelated_sort_warns_and_is_kept() {
    let g = Grammar::new();

    let s = Term::cons(g.s.clone(), [], S1);
    let input = Term::cons(g.f.clone(), [s], S2);

    let (done, warnings) = g.complete(&input);

    assert!(done.ptr_eq(&input));
    assert_eq!(Warnings::from([list_expected(stmt(), S1)]), warnings);
}

#[test]
fn kapply_of_label_uses_greatest_sort() {
    let g = Grammar::new();

    // `g` is declared as both Exp and Int; Int < Exp.
    let applied = g.kapply("g", S1);
    let input = Term::cons(g.f.clone(), [applied.clone()], S2);

    let (done, warnings) = g.complete(&input);

    assert_eq!(
        Term::cons(g.f.clone(), [g.singleton(applied)], S2),
        done
    );
    assert!(warnings.is_empty());
    assert_eq!(
        Some(exp()),
        ListCompleter::new(&g.module).effective_sort(&g.kapply("g", S3))
    );
}

#[test]
fn kapply_without_greatest_sort_falls_back_to_k() {
    let g = Grammar::new();

    // `h` is declared as both Stmt and Exp, which are unrelated.
    let input = Term::cons(g.f.clone(), [g.kapply("h", S1)], S2);
    let (done, warnings) = g.complete(&input);

    assert!(done.ptr_eq(&input));
    assert_eq!(Warnings::from([list_expected(Sort::K, S1)]), warnings);
}

#[test]
fn kapply_of_unknown_label_warns_with_k() {
    let g = Grammar::new();

    let input = Term::cons(g.f.clone(), [g.kapply("unknown", S1)], S2);
    let (_, warnings) = g.complete(&input);

    assert_eq!(Warnings::from([list_expected(Sort::K, S1)]), warnings);
}

#[test]
fn label_literal_strips_quotes() {
    let g = Grammar::new();

    let literal = |value: &str| Term::constant(value, g.klabel.clone(), S1);

    assert_eq!(Some(KLabel::from("g")), label_literal(&literal("`g`")));
    assert_eq!(Some(KLabel::from("")), label_literal(&literal("``")));
    assert_eq!(None, label_literal(&literal("`")));
    assert_eq!(None, label_literal(&g.x(S1)));
}

#[test]
fn ambiguous_child_completed_per_alternative() {
    let g = Grammar::new();

    let list = g.singleton(g.x(S1));
    let amb = Term::ambiguity([g.x(S2), list.clone()], S3);
    let input = Term::cons(g.f.clone(), [amb], S4);

    let (done, _) = g.complete(&input);

    assert_eq!(
        Term::cons(
            g.f.clone(),
            [Term::ambiguity([g.singleton(g.x(S2)), list], S3)],
            S4
        ),
        done
    );
}

#[test]
fn completion_and_warning_in_sibling_slots() {
    let g = Grammar::new();

    // Two slots, one completed and one warned.
    let s = Term::cons(g.s.clone(), [], S1);
    let input = Term::cons(g.pair.clone(), [g.x(S2), s.clone()], S3);

    let (done, warnings) = g.complete(&input);

    assert_eq!(
        Term::cons(g.pair.clone(), [g.singleton(g.x(S2)), s], S3),
        done
    );
    assert_eq!(Warnings::from([list_expected(stmt(), S1)]), warnings);
}

#[test]
fn memoized_completion_agrees() {
    let g = Grammar::new();

    let shared = Term::cons(g.f.clone(), [g.x(S1)], S2);
    let input = Term::klist([shared.clone(), shared], S3);

    let plain = ListCompleter::new(&g.module).complete(&input);
    let memoized =
        ListCompleter::with_memo(&g.module, true).complete(&input);

    assert_eq!(plain, memoized);
}
