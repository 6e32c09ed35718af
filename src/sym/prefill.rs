// Pre-interned strings
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

//! Pre-interned strings.
//!
//! These strings are expected to be encountered nearly every run,
//!   and substitute static strings that would otherwise appear hard-coded
//!   in the system and have to be interned to be compared against other
//!   values.
//! Most of them are labels, attributes and sorts that the framework
//!   reserves for itself and that the disambiguation passes must
//!   recognize by name.
//!
//! See the [parent module](super) for more information.

use super::{Interner, SymbolId};
use crate::global;

/// Statically allocate [`SymbolId`]s for the provided symbols,
///   and schedule their static strings to be interned upon initialization
///   of the global interner.
///
/// This generates `fill`,
///   which the global interner calls by default.
/// Any interner may optionally invoke this,
///   immediately after initialization,
///     /before/ any internment requests.
macro_rules! static_symbols {
    (@i $i:expr; $name:ident $str:expr, $($tail:tt)*) => {
        #[doc=concat!("Interned string `\"", $str, "\"`.")]
        pub const $name: SymbolId = SymbolId::from_nonzero(
            match global::NonZeroProgSymSize::new($i) {
                Some(n) => n,
                None => panic!("static symbol index must be non-zero"),
            }
        );

        // Recurse until no tail is left (terminating condition below).
        static_symbols! {
            // This will result in 1 + 1 + 1 + 1 ... and will eventually hit
            // the recursion limit if we have too many static symbols, after
            // which time we may have to switch methodology.
            @i $i + 1;
            $($tail)*
        }
    };

    // Terminating condition.
    (@i $i:expr;) => {
        /// Number of statically allocated symbols.
        ///
        /// This can be used to help determine a base capacity for
        ///   collections holding [`SymbolId`]s.
        pub const ST_COUNT: usize = ($i - 1) as usize;
    };

    ($($name:ident : $str:expr),* $(,)?) => {
        static_symbols! {
            // Index 0 is not valid, so begin at 1
            @i 1;
            $($name $str,)*
        }

        /// Fill a new interner with static symbols.
        ///
        /// Panics
        /// ======
        /// This function will panic if the interner has any symbols,
        ///   which would cause misalignment with the generated constants.
        pub(in super::super) fn fill<'a, I>(interner: I) -> I
        where
            I: Interner<'a>,
        {
            assert!(
                interner.len() == 0,
                "cannot fill non-empty Interner with static symbols"
            );

            [$($str,)*].into_iter().for_each(|sym| {
                interner.intern(sym);
            });

            interner
        }
    };
}

/// Static symbols.
///
/// The order of these symbols determines their index and is otherwise
///   meaningless.
pub mod st {
    use super::*;

    static_symbols! {
        // Span contexts.
        CTX_UNKNOWN: "#!unknown",
        CTX_DUMMY: "#!dummy",

        // Sort ascriptions.
        L_SYNTACTIC_CAST: "#SyntacticCast",
        L_INNER_CAST: "#InnerCast",
        L_SEMANTIC_CAST_PREFIX: "#SemanticCastTo",

        // Structural labels.
        L_KREWRITE: "#KRewrite",
        L_KAPPLY: "#KApply",

        // Production attributes.
        A_BRACKET: "bracket",

        // Builtin sorts.
        S_K: "K",
        S_KLABEL: "KLabel",
    }
}
