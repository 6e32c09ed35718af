// Source spans
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

//! Mapping to source input byte intervals.
//!
//! A [`Span`] is a mapping to a byte interval within a source file,
//!   representing primarily where some term originated.
//! Spans are carried by every node of a parse tree,
//!   but they are referenced only for diagnostic purposes;
//!     no disambiguation decision ever depends on a span.
//!
//! A span contains a [`Context`] representing the source location.
//! A context's path is a [`SymbolId`],
//!   which represents an interned string slice,
//!     _not_ a [`PathBuf`](std::path::PathBuf) or
//!     [`OsStr`](std::ffi::OsStr).
//!
//! ```
//! use kdisamb::span::{Span, Context};
//! use kdisamb::sym::GlobalSymbolIntern;
//!
//! // From raw parts
//! let ctx: Context = "some/path/foo.k".intern().into();
//! let span = Span::new(2, 6, ctx);
//!
//! assert_eq!(2, span.offset());
//! assert_eq!(6, span.len());
//! assert_eq!(ctx, span.context());
//!
//! // Freely copyable
//! let cp = span;
//! assert_eq!(cp, span);
//! ```
//!
//! A span is ordered as such:
//!
//!   1. Spans group by [`Context`],
//!        though the relative ordering of each [`Context`] isn't
//!        necessarily meaningful;
//!   2. Spans are then ordered relative to their offset; and
//!   3. Spans are finally ordered by their length.
//!
//! This gives diagnostics a deterministic order when they are collected
//!   into ordered sets.

use crate::sym::{st, GlobalSymbolResolve, SymbolId};
use crate::global;
use std::fmt::Display;

/// Size of a [`Span`]'s `offset` field.
pub type SpanOffsetSize = global::SourceFileSize;

/// Size of a [`Span`]'s `len` field.
pub type SpanLenSize = global::FrontendTokenLength;

/// Description of a source location and byte interval for some object.
///
/// Spans represent byte intervals within a given source context.
/// A span should map to useful positions for helping users debug error
///   messages.
/// If a term is synthesized
///   (as list terminators are),
///   the span ought to reference the original location of the code that
///   caused it to be synthesized.
///
/// See the [module-level documentation](self) for more information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Context onto which byte offsets are mapped,
    ///   such as a source file.
    ctx: Context,

    /// Starting 0-indexed byte position, inclusive.
    offset: SpanOffsetSize,

    /// Token length (ending byte offset - `offset`).
    len: SpanLenSize,
}

assert_eq_size!(Span, (u32, u32, u32));

impl Span {
    /// Create a new span from its constituent parts.
    pub fn new<C: Into<Context>>(
        offset: SpanOffsetSize,
        len: SpanLenSize,
        ctx: C,
    ) -> Self {
        Self {
            ctx: ctx.into(),
            offset,
            len,
        }
    }

    /// Create a constant span from a static context symbol.
    pub const fn st_ctx(sym: SymbolId) -> Self {
        Self {
            ctx: Context(sym),
            offset: 0,
            len: 0,
        }
    }

    /// Byte offset of the beginning of the span relative to its context.
    pub fn offset(&self) -> SpanOffsetSize {
        self.offset
    }

    /// Length of the span in bytes.
    ///
    /// The interval of the span is `[offset, offset+len]`.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> SpanLenSize {
        self.len
    }

    /// The context to which the span applies.
    ///
    /// The context is, for example, a file.
    pub fn context(&self) -> Context {
        self.ctx
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let end = self.offset as usize + self.len as usize;

        write!(f, "[{} offset {}-{}]", self.ctx, self.offset, end)
    }
}

/// A placeholder span indicating that a span is expected but is not yet
///   known.
pub const UNKNOWN_SPAN: Span = Span::st_ctx(st::CTX_UNKNOWN);

/// Context for byte offsets (e.g. a source file).
///
/// A context is lifetime-free and [`Copy`]-able,
///   with the assumption that an interned [`SymbolId`] will only need
///   to be resolved to its underlying value in a diagnostic context where
///   the internment system is readily available.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Context(SymbolId);

impl Context {
    /// Produce a [`Span`] within the given context.
    #[inline]
    pub const fn span(self, offset: SpanOffsetSize, len: SpanLenSize) -> Span {
        Span {
            ctx: self,
            offset,
            len,
        }
    }

    /// Path of this context,
    ///   as provided by the parser that produced the tree.
    pub fn path(&self) -> &'static str {
        self.0.lookup_str()
    }
}

/// A placeholder context indicating that a context is expected but is not
///   yet known.
pub const UNKNOWN_CONTEXT: Context = Context(st::CTX_UNKNOWN);

impl From<SymbolId> for Context {
    fn from(sym: SymbolId) -> Self {
        Self(sym)
    }
}

impl From<&str> for Context {
    fn from(path: &str) -> Self {
        Self(path.into())
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Dummy spans for testing.
#[cfg(test)]
pub mod dummy {
    use super::{st, Context, Span};

    /// A dummy span that can be used in contexts where a span is expected
    ///   but is not important.
    ///
    /// This is intended primarily for tests;
    ///   you should always use an appropriate span to permit sensible error
    ///   messages.
    /// For spans that are actually unknown,
    ///   use [`super::UNKNOWN_SPAN`].
    pub const DUMMY_SPAN: Span = Span::st_ctx(st::CTX_DUMMY);

    /// A dummy context that can be used where a span is expected but is not
    ///   important.
    pub const DUMMY_CONTEXT: Context = Context(st::CTX_DUMMY);

    pub const S1: Span = DUMMY_CONTEXT.span(1, 0);
    pub const S2: Span = DUMMY_CONTEXT.span(2, 0);
    pub const S3: Span = DUMMY_CONTEXT.span(3, 0);
    pub const S4: Span = DUMMY_CONTEXT.span(4, 0);
    pub const S5: Span = DUMMY_CONTEXT.span(5, 0);
    pub const S6: Span = DUMMY_CONTEXT.span(6, 0);
    pub const S7: Span = DUMMY_CONTEXT.span(7, 0);
    pub const S8: Span = DUMMY_CONTEXT.span(8, 0);
    pub const S9: Span = DUMMY_CONTEXT.span(9, 0);
    pub const S10: Span = DUMMY_CONTEXT.span(10, 0);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn spans_order_by_context_offset_then_len() {
        let ctx = Context::from("order");

        let a = ctx.span(2, 6);
        let b = ctx.span(10, 5);
        let c = ctx.span(10, 4);
        let d = ctx.span(5, 7);

        let mut spans = vec![a, b, c, d];
        spans.sort();

        assert_eq!(spans, vec![a, d, c, b]);
    }

    #[test]
    fn span_display_includes_context_and_interval() {
        let span = Context::from("foo.k").span(4, 3);

        assert_eq!("[foo.k offset 4-7]", span.to_string());
    }
}
