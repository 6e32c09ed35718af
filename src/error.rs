// Disambiguation diagnostics
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

//! Errors and warnings raised while disambiguating a tree.
//!
//! These are values,
//!   not panics:
//!     the rewrite engine collects them into ordered sets so that an error
//!     in one alternative of an ambiguity does not prevent the others from
//!     being considered.
//! Their ordering is therefore significant only in that it is total and
//!   deterministic.

use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic, Level},
    grammar::Sort,
    span::Span,
};
use std::{
    error::Error,
    fmt::{self, Display},
};

/// Subsystem that raised a [`DisambError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    /// Malformed output of the inner (term) parser.
    InnerParser,

    /// Completion of user-declared list sorts.
    Lists,
}

impl Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InnerParser => write!(f, "inner parser"),
            Self::Lists => write!(f, "lists"),
        }
    }
}

/// A diagnostic produced by a disambiguation pass.
///
/// Whether the diagnostic is fatal to the branch of the tree in which it
///   occurs is determined by [`DisambError::level`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DisambError {
    /// An application node without a label had other than exactly one
    ///   child.
    ///
    /// Only subsort productions may omit a label,
    ///   and they inject exactly one term into their sort.
    UnlabeledNonSubsort {
        sort: Sort,
        arity: usize,
        span: Span,
    },

    /// A term of sort `found` occupies a slot of list sort `expected` and
    ///   could not be completed into a list.
    ///
    /// The term is left as it was.
    ListSortExpected {
        found: Sort,
        expected: Sort,
        span: Span,
    },
}

impl DisambError {
    pub fn level(&self) -> Level {
        match self {
            Self::UnlabeledNonSubsort { .. } => Level::Error,
            Self::ListSortExpected { .. } => Level::Warning,
        }
    }

    pub fn group(&self) -> Group {
        match self {
            Self::UnlabeledNonSubsort { .. } => Group::InnerParser,
            Self::ListSortExpected { .. } => Group::Lists,
        }
    }

    /// Whether this diagnostic invalidates the branch in which it occurs.
    pub fn is_fatal(&self) -> bool {
        self.level() <= Level::Error
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnlabeledNonSubsort { span, .. }
            | Self::ListSortExpected { span, .. } => *span,
        }
    }
}

impl Display for DisambError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnlabeledNonSubsort { .. } => write!(
                f,
                "Only subsort productions are allowed to have no label"
            ),
            Self::ListSortExpected { found, expected, .. } => write!(
                f,
                "Found sort '{found}' where list sort '{expected}' was \
                   expected. Moving on."
            ),
        }
    }
}

impl Error for DisambError {}

impl Diagnostic for DisambError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::UnlabeledNonSubsort { sort, arity, span } => span
                .error(format!(
                    "unlabeled production of sort '{sort}' applied to \
                       {arity} terms"
                ))
                .with_help(
                    "a production without a label must contain exactly one \
                       nonterminal",
                )
                .into(),

            Self::ListSortExpected {
                found, expected, ..
            } => vec![self.span().warning(format!(
                "this has sort '{found}', which is not a subsort of \
                   '{expected}'"
            ))],
        }
    }
}
