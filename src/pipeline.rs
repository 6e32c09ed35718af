// Disambiguation pipeline
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

//! Disambiguation pipeline.
//!
//! The raw forest produced by the term parser flows through two passes:
//!
//! ```text
//!   raw forest -> TreeCleaner -> ListCompleter -> disambiguated term
//! ```
//!
//! The [`TreeCleaner`] removes parsing artifacts and the
//!   [`ListCompleter`] inserts list structure where a list sort is expected
//!   but a bare element was parsed.
//! The completer runs only if cleaning succeeded;
//!   warnings of both passes are accumulated.
//!
//! The result may still be ambiguous.
//! Ambiguities that survive both passes are genuine and are left for the
//!   consumer of the tree to resolve.

use crate::{
    clean::TreeCleaner,
    diagnose::{AnnotatedSpan, Diagnostic},
    grammar::Module,
    lists::ListCompleter,
    rewrite::{Failures, Warnings},
    term::Term,
};
use std::{
    error::Error,
    fmt::{self, Display},
};


/// Runtime configuration of the pipeline passes.
///
/// Memoization pays off on forests with heavily shared subtrees;
///   the cleaner is memoized by default and the completer is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassConfig {
    pub memoize_clean: bool,
    pub memoize_lists: bool,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            memoize_clean: true,
            memoize_lists: false,
        }
    }
}

/// A term that survived disambiguation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disambiguated {
    term: Term,
    warnings: Warnings,
}

impl Disambiguated {
    pub fn term(&self) -> &Term {
        &self.term
    }

    /// Warnings raised by either pass on surviving alternatives.
    pub fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    pub fn into_parts(self) -> (Term, Warnings) {
        (self.term, self.warnings)
    }
}

/// A term that could not be disambiguated.
///
/// `failures` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    failures: Failures,
    warnings: Warnings,
}

impl Rejected {
    pub fn failures(&self) -> &Failures {
        &self.failures
    }

    pub fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    pub fn into_parts(self) -> (Failures, Warnings) {
        (self.failures, self.warnings)
    }
}

impl Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.failures.len() {
            1 => write!(f, "failed to disambiguate term: 1 error"),
            n => write!(f, "failed to disambiguate term: {n} errors"),
        }
    }
}

impl Error for Rejected {}

impl Diagnostic for Rejected {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        self.failures.iter().flat_map(|f| f.describe()).collect()
    }
}

/// Disambiguate `term` against `module` using the default
///   [`PassConfig`].
pub fn disambiguate(
    module: &Module,
    term: &Term,
) -> Result<Disambiguated, Rejected> {
    disambiguate_with(module, term, PassConfig::default())
}

/// Disambiguate `term` against `module`.
///
/// The [`ListCompleter`] is not run if the [`TreeCleaner`] fails.
pub fn disambiguate_with(
    module: &Module,
    term: &Term,
    config: PassConfig,
) -> Result<Disambiguated, Rejected> {
    let _guard =
        tracing::debug_span!("disambiguate", span = %term.span()).entered();

    TreeCleaner::with_memo(config.memoize_clean)
        .clean(term)
        .and_then(|cleaned| {
            tracing::trace!(term = %cleaned, "cleaned");

            ListCompleter::with_memo(module, config.memoize_lists)
                .complete(&cleaned)
        })
        .into_result()
        .map(|(term, warnings)| {
            tracing::debug!(warnings = warnings.len(), "disambiguated");
            Disambiguated { term, warnings }
        })
        .map_err(|(failures, warnings)| {
            tracing::debug!(
                failures = failures.len(),
                warnings = warnings.len(),
                "rejected"
            );
            Rejected { failures, warnings }
        })
}
