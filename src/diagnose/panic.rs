// Panics with diagnostic information
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

//! Panic with diagnostic information.
//!
//! The system will produce diagnostic information using [`Error`]s
//!   implementing [`Diagnostic`] for most cases.
//! However,
//!   sometimes the system enters an unexpected and inconsistent state that
//!   represents a bug either in this crate or in the parser that handed it
//!   a tree,
//!     such as an application node whose number of children does not match
//!     its production.
//! Panics are not able to utilize spans to present additional
//!   information that the user may use to attempt to work around the issue,
//!     so the macro [`diagnostic_panic!`] acts like panic,
//!       but accepts a vector of [`AnnotatedSpan`]s
//!         (just like those produced by [`Diagnostic::describe`])
//!         as its first argument to produce a report alongside the panic.

use super::{AnnotatedSpan, Diagnostic};
use std::{
    cell::Cell,
    error::Error,
    fmt::{self, Debug, Display},
};

// Macro exports are unintuitive.
#[cfg(doc)]
use crate::diagnostic_panic;

/// Container for ad-hoc diagnostic data for panics.
///
/// This is public only because it is needed at the expansion site of
///   [`diagnostic_panic!`].
/// You should not use this outside of panics.
///
/// It is intended to be rendered _once_,
///   after which its [`AnnotatedSpan`] vector will be consumed and become
///   empty.
pub struct DiagnosticDesc<'a>(pub String, pub Cell<Vec<AnnotatedSpan<'a>>>);

impl<'a> Debug for DiagnosticDesc<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DiagnosticDesc")
    }
}

impl<'a> Error for DiagnosticDesc<'a> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl<'a> Display for DiagnosticDesc<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self(summary, _) => write!(f, "{}", summary),
        }
    }
}

impl<'a> Diagnostic for DiagnosticDesc<'a> {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self(_, desc) => desc.take(),
        }
    }
}

/// Produce a panic with diagnostic information and a message describing
///   this issue as a bug.
///
/// The first argument is of the same form as the return value of
///   [`Diagnostic::describe`].
///
/// This should be used in place of [`panic!`] whenever possible.
#[macro_export]
macro_rules! diagnostic_panic {
    ($desc_data:expr, $($panic_args:tt)*) => {{
        let summary = format!($($panic_args)*);
        let desc = $crate::diagnose::panic::DiagnosticDesc(
            summary,
            std::cell::Cell::new($desc_data),
        );

        panic!(
            "internal error: {}\n\
             !!! This is a bug in the disambiguation core or in the parser \
                 that produced its input;\n\
             !!! please report it, including the output above.",
            $crate::diagnose::TextReport::new(&desc),
        )
    }};
}
