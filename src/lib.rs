//! Parse SVG path data into normalized drawing commands.
//!
//! The `d` attribute of an SVG `<path>` element describes a shape with a small
//! language of commands: moveto, lineto, horizontal and vertical lines, cubic and
//! quadratic Bézier curves with their smooth variants, elliptical arcs, and
//! closepath, each in an absolute and a relative form.
//!
//! This crate reduces all of that to four drawing commands that any 2D graphics
//! library can render directly:
//!
//! * `MoveTo` and `LineTo`, with one point each.
//! * `CubicTo`, with two control points and an end point.
//! * `Close`, with no points.
//!
//! All coordinates in the result are absolute.  Quadratic curves are raised to cubic
//! curves, and elliptical arcs are approximated with cubic curves that span at most a
//! quarter turn each.
//!
//! # Example
//!
//! ```
//! use svgpath::{DrawCommand, Point};
//!
//! let program = svgpath::parse("M0,0 l10,0 l0,10 z");
//!
//! assert_eq!(
//!     program.commands(),
//!     &[DrawCommand::MoveTo, DrawCommand::LineTo, DrawCommand::LineTo, DrawCommand::Close]
//! );
//! assert_eq!(
//!     program.points(),
//!     &[Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)]
//! );
//! ```
//!
//! # Malformed data
//!
//! Path data in the wild is often sloppy, and SVG asks renderers to draw a path up to
//! the first error in its data.  So [`parse`] never fails: it returns whatever was
//! parsed before the first malformed argument.  Use [`PathBuilder::parse`] if you need
//! to know where and why parsing stopped.
//!
//! Set the `SVGPATH_LOG` environment variable to get messages on stdout about data that
//! could not be parsed.

#![allow(clippy::derive_partial_eq_without_eq)]
#![warn(nonstandard_style, rust_2018_idioms, unused)]
// Some lints no longer exist
#![warn(renamed_and_removed_lints)]
// Standalone lints
#![warn(trivial_casts, trivial_numeric_casts)]

pub use crate::arc::{ArcParameterization, EllipticalArc, LargeArc, Sweep};
pub use crate::error::{ErrorKind, ParseError};
pub use crate::path_builder::{
    CubicBezierCurve, DrawCommand, PathBuilder, PathCommand, PathProgram, Point, SubPath,
    SubPathIter,
};

mod arc;
mod error;
mod float_eq;
mod path_builder;
mod path_lexer;
mod path_parser;

#[doc(hidden)]
pub mod log;

/// Parses SVG path data into a [`PathProgram`].
///
/// Parsing stops at the first malformed argument, and the commands parsed until then
/// are returned.  Empty data yields an empty program.
pub fn parse(path_str: &str) -> PathProgram {
    let mut builder = PathBuilder::default();

    if let Err(e) = builder.parse(path_str) {
        crate::svgpath_log!("could not parse path: {}", e);
    }

    builder.into_program()
}

#[doc(hidden)]
pub mod bench_only {
    pub use crate::path_builder::PathBuilder;
    pub use crate::path_lexer::Lexer;
}
