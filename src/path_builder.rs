//! Representation of normalized path programs.
//!
//! Whatever commands appear in the path data, the parser reduces them to four drawing
//! commands: MoveTo, LineTo, CubicTo and Close.  This module stores them as follows:
//!
//! * The path parser pushes commands into a [`PathBuilder`].  This is a mutable,
//! temporary storage for path data.
//!
//! * Then, the [`PathBuilder`] gets turned into a long-term, immutable [`PathProgram`]
//! that consists of two dense arrays: the command tags, and the points they consume.
//!
//! The builder uses [`TinyVec`] with room for 32 commands on the stack; most paths in
//! SVGs in the wild have fewer than that, and larger ones will spill to the heap.

use tinyvec::TinyVec;

use std::fmt;
use std::slice;

use crate::error::ParseError;
use crate::float_eq::ApproxEqFixed;
use crate::path_parser::PathParser;

/// A point in user space.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// Reflects `self` through `center`, i.e. returns `2 * center - self`.
    pub fn reflect_through(self, center: Point) -> Point {
        Point::new(2.0 * center.x - self.x, 2.0 * center.y - self.y)
    }

    /// Whether both coordinates are within 1/256 of the other point's.
    pub fn approx_eq_fixed(self, other: Point) -> bool {
        self.x.approx_eq_fixed(other.x) && self.y.approx_eq_fixed(other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Point {
        Point::new(x, y)
    }
}

/// Drawing command tag.
///
/// The points for each command are stored separately; see [`DrawCommand::num_points`].
///
/// This is `repr(u8)` to keep it as small as possible.
#[repr(u8)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    MoveTo,
    LineTo,
    CubicTo,
    // Only here so that TinyVec can fill its inline array.
    #[default]
    Close,
}

impl DrawCommand {
    /// Returns the number of points that this command consumes in a [`PathProgram`].
    pub fn num_points(self) -> usize {
        match self {
            DrawCommand::MoveTo => 1,
            DrawCommand::LineTo => 1,
            DrawCommand::CubicTo => 3,
            DrawCommand::Close => 0,
        }
    }
}

/// Cubic Bézier segment, starting at the end point of the previous command.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CubicBezierCurve {
    /// The first control point.
    pub pt1: Point,
    /// The second control point.
    pub pt2: Point,
    /// The end point of this path segment.
    pub to: Point,
}

/// Long-form version of a single drawing command.
///
/// This is returned from iterators on paths and subpaths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(CubicBezierCurve),
    ClosePath,
}

impl PathCommand {
    /// Consumes a command's points from the `points` iterator and returns the long form.
    fn from_packed(command: DrawCommand, points: &mut slice::Iter<'_, Point>) -> PathCommand {
        match command {
            DrawCommand::MoveTo => PathCommand::MoveTo(take_one(points)),
            DrawCommand::LineTo => PathCommand::LineTo(take_one(points)),
            DrawCommand::CubicTo => {
                let pt1 = take_one(points);
                let pt2 = take_one(points);
                let to = take_one(points);

                PathCommand::CurveTo(CubicBezierCurve { pt1, pt2, to })
            }
            DrawCommand::Close => PathCommand::ClosePath,
        }
    }

    /// The point where the pen ends up after this command, if the command has one.
    fn end_point(&self) -> Option<Point> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::CurveTo(ref curve) => Some(curve.to),
            PathCommand::ClosePath => None,
        }
    }
}

/// Constructs a path program out of drawing commands.
///
/// Create this with `PathBuilder::default`; you can then add commands to it or call the
/// `parse` method.  When you are finished, turn it into a [`PathProgram`] with
/// `into_program`.
#[derive(Default)]
pub struct PathBuilder {
    commands: TinyVec<[DrawCommand; 32]>,
    points: TinyVec<[Point; 64]>,
}

impl PathBuilder {
    /// Parses SVG path data and appends the resulting commands.
    ///
    /// Parsing stops at the first malformed argument.  Commands produced before that
    /// point stay in the builder, so the caller can still use the partial path.
    pub fn parse(&mut self, path_str: &str) -> Result<(), ParseError> {
        let mut parser = PathParser::new(self, path_str);
        parser.parse()
    }

    /// Consumes the `PathBuilder` and returns a compact, immutable `PathProgram`.
    pub fn into_program(self) -> PathProgram {
        debug_assert_eq!(
            self.commands
                .iter()
                .map(|cmd| cmd.num_points())
                .sum::<usize>(),
            self.points.len()
        );

        PathProgram {
            commands: self.commands.to_vec().into_boxed_slice(),
            points: self.points.to_vec().into_boxed_slice(),
        }
    }

    /// Adds a MoveTo command.
    pub fn move_to(&mut self, p: Point) {
        self.commands.push(DrawCommand::MoveTo);
        self.points.push(p);
    }

    /// Adds a LineTo command.
    pub fn line_to(&mut self, p: Point) {
        self.commands.push(DrawCommand::LineTo);
        self.points.push(p);
    }

    /// Adds a CubicTo command with two control points and an end point.
    pub fn curve_to(&mut self, pt1: Point, pt2: Point, to: Point) {
        self.commands.push(DrawCommand::CubicTo);
        self.points.push(pt1);
        self.points.push(pt2);
        self.points.push(to);
    }

    /// Adds a Close command.
    pub fn close_path(&mut self) {
        self.commands.push(DrawCommand::Close);
    }

    /// The most recently added command.
    pub fn last_command(&self) -> Option<DrawCommand> {
        self.commands.last().copied()
    }

    /// Number of commands added so far.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// An immutable path program with a compact representation.
///
/// Commands and points live in two parallel arrays.  Each command consumes a fixed
/// number of points, so summing [`DrawCommand::num_points`] over the commands always
/// yields the number of points.
///
/// This struct implements `Default`, and it yields an empty program.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct PathProgram {
    commands: Box<[DrawCommand]>,
    points: Box<[Point]>,
}

impl PathProgram {
    /// The drawing commands, in order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// The points consumed by the drawing commands, in order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Splits the program into its command and point sequences.
    pub fn into_parts(self) -> (Vec<DrawCommand>, Vec<Point>) {
        (self.commands.into_vec(), self.points.into_vec())
    }

    /// Returns whether there are no commands in the program.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Get an iterator over the program's commands.
    pub fn iter(&self) -> impl Iterator<Item = PathCommand> + '_ {
        let mut points = self.points.iter();

        self.commands
            .iter()
            .map(move |cmd| PathCommand::from_packed(*cmd, &mut points))
    }

    /// Get an iterator over the program's subpaths.
    pub fn iter_subpath(&self) -> SubPathIter<'_> {
        SubPathIter {
            program: self,
            commands_start: 0,
            points_start: 0,
        }
    }

    /// Whether both programs have the same commands, and points within 1/256 of each other.
    pub fn approx_eq(&self, other: &PathProgram) -> bool {
        self.commands == other.commands
            && self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(other.points.iter())
                .all(|(a, b)| a.approx_eq_fixed(*b))
    }
}

/// Serializes the program as SVG path data, using only absolute `M`, `L`, `C` and `Z`.
impl fmt::Display for PathProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }

            match cmd {
                PathCommand::MoveTo(p) => write!(f, "M{} {}", p.x, p.y)?,
                PathCommand::LineTo(p) => write!(f, "L{} {}", p.x, p.y)?,
                PathCommand::CurveTo(CubicBezierCurve { pt1, pt2, to }) => write!(
                    f,
                    "C{} {} {} {} {} {}",
                    pt1.x, pt1.y, pt2.x, pt2.y, to.x, to.y
                )?,
                PathCommand::ClosePath => f.write_str("Z")?,
            }
        }

        Ok(())
    }
}

/// An iterator over the subpaths of a `PathProgram`.
pub struct SubPathIter<'a> {
    program: &'a PathProgram,
    commands_start: usize,
    points_start: usize,
}

/// A slice of commands and points that starts at a `MoveTo`.
///
/// The first subpath of a program may not start with a `MoveTo`, since the parser does
/// not require path data to begin with one.
pub struct SubPath<'a> {
    commands: &'a [DrawCommand],
    points: &'a [Point],
}

impl<'a> SubPath<'a> {
    /// Returns an iterator over the subpath's commands.
    pub fn iter_commands(&self) -> impl Iterator<Item = PathCommand> + '_ {
        let mut points = self.points.iter();

        self.commands
            .iter()
            .map(move |cmd| PathCommand::from_packed(*cmd, &mut points))
    }

    /// The `(x, y)` coordinates of the subpath's initial `MoveTo`.
    pub fn origin(&self) -> Option<Point> {
        match self.commands.first() {
            Some(DrawCommand::MoveTo) => self.points.first().copied(),
            _ => None,
        }
    }

    /// Returns whether the pen never moves more than 1/256 away from where the subpath starts.
    pub fn is_zero_length(&self) -> bool {
        let mut start = None;

        for end in self.iter_commands().filter_map(|cmd| cmd.end_point()) {
            match start {
                None => start = Some(end),
                Some(s) if !end.approx_eq_fixed(s) => return false,
                Some(_) => (),
            }
        }

        true
    }
}

impl<'a> Iterator for SubPathIter<'a> {
    type Item = SubPath<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let commands = &self.program.commands[self.commands_start..];
        let first = *commands.first()?;

        let mut num_points = first.num_points();

        // A MoveTo anywhere but at the start begins the next subpath.
        let len = commands
            .iter()
            .skip(1)
            .position(|cmd| *cmd == DrawCommand::MoveTo)
            .map(|i| i + 1)
            .unwrap_or(commands.len());

        num_points += commands[1..len]
            .iter()
            .map(|cmd| cmd.num_points())
            .sum::<usize>();

        let points = &self.program.points[self.points_start..self.points_start + num_points];

        self.commands_start += len;
        self.points_start += num_points;

        Some(SubPath {
            commands: &commands[..len],
            points,
        })
    }
}

fn take_one(iter: &mut slice::Iter<'_, Point>) -> Point {
    // The point count always matches the commands; see PathBuilder::into_program().
    iter.next().copied().unwrap_or_default()
}
