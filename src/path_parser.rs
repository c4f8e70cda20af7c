//! Parser for SVG path data.
//!
//! The [`Lexer`] yields commands with their numeric arguments, and the [`PathParser`]
//! turns each of them into normalized drawing commands on a [`PathBuilder`]:
//!
//! * Relative coordinates are made absolute by adding the current point.
//!
//! * Horizontal and vertical lines become plain lines.
//!
//! * Quadratic curves are raised to cubic curves.
//!
//! * Smooth curves get their first control point by reflecting the last control point of
//! the previous curve through the current point.
//!
//! * Elliptical arcs are approximated with cubic curves.
//!
//! Parsing stops at the first malformed argument.  Everything emitted until then stays
//! in the builder.

use crate::arc::{EllipticalArc, LargeArc, Sweep};
use crate::error::ParseError;
use crate::path_builder::{DrawCommand, PathBuilder, Point};
use crate::path_lexer::{Args, Command, CommandKind, Lexer};

/// Which kind of curve command produced the last control point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CurveSource {
    Cubic,
    Quadratic,
}

/// Running state of the parser, adjusted at every command.
#[derive(Debug, Copy, Clone)]
struct ParserState {
    current: Point,

    // Last control point of the previous curve.  For quadratic curves this is the
    // quadratic control point, not one of the cubic ones they get raised to.
    last_control: Point,

    last_curve: CurveSource,
}

impl Default for ParserState {
    fn default() -> ParserState {
        ParserState {
            current: Point::new(0.0, 0.0),
            last_control: Point::new(0.0, 0.0),
            last_curve: CurveSource::Cubic,
        }
    }
}

pub struct PathParser<'b> {
    tokens: Lexer<'b>,
    builder: &'b mut PathBuilder,
    state: ParserState,
}

impl<'b> PathParser<'b> {
    pub fn new(builder: &'b mut PathBuilder, path_str: &'b str) -> PathParser<'b> {
        PathParser {
            tokens: Lexer::new(path_str),
            builder,
            state: ParserState::default(),
        }
    }

    /// Processes commands until the data runs out or a malformed argument is found.
    pub fn parse(&mut self) -> Result<(), ParseError> {
        while let Some(token) = self.tokens.next() {
            let (command, args) = token?;
            self.process_command(command, &args);
        }

        Ok(())
    }

    fn process_command(&mut self, command: Command, args: &Args) {
        let args = self.to_absolute(command, args);

        let point = |i: usize| Point::new(args[i], args[i + 1]);

        match command.kind {
            CommandKind::MoveTo => self.emit_move_to(point(0)),

            CommandKind::LineTo => self.emit_line_to(point(0)),

            CommandKind::HorizontalLineTo => {
                let y = self.state.current.y;
                self.emit_line_to(Point::new(args[0], y));
            }

            CommandKind::VerticalLineTo => {
                let x = self.state.current.x;
                self.emit_line_to(Point::new(x, args[0]));
            }

            CommandKind::CurveTo => self.emit_curve_to(point(0), point(2), point(4)),

            CommandKind::SmoothCurveTo => {
                let pt1 = self.reflected_control_point(CurveSource::Cubic);
                self.emit_curve_to(pt1, point(0), point(2));
            }

            CommandKind::QuadraticCurveTo => self.emit_quadratic_curve_to(point(0), point(2)),

            CommandKind::SmoothQuadraticCurveTo => {
                let control = self.reflected_control_point(CurveSource::Quadratic);
                self.emit_quadratic_curve_to(control, point(0));
            }

            CommandKind::EllipticalArc => {
                let sweep = if args[4] != 0.0 {
                    Sweep::Positive
                } else {
                    Sweep::Negative
                };

                self.emit_arc(EllipticalArc {
                    r: (args[0], args[1]),
                    x_axis_rotation: args[2],
                    large_arc: LargeArc(args[3] != 0.0),
                    sweep,
                    from: self.state.current,
                    to: point(5),
                });
            }

            // The current point stays where it is; returning to the start of the
            // subpath is up to whoever draws the program.
            CommandKind::ClosePath => self.builder.close_path(),
        }
    }

    // Relative commands offset every coordinate by the current point.  Arcs only offset
    // their end point, since the radii, angle and flags are not coordinates.
    fn to_absolute(&self, command: Command, args: &Args) -> Args {
        let mut args = args.clone();

        if command.absolute {
            return args;
        }

        let Point { x, y } = self.state.current;

        match command.kind {
            CommandKind::HorizontalLineTo => args[0] += x,
            CommandKind::VerticalLineTo => args[0] += y,
            CommandKind::EllipticalArc => {
                args[5] += x;
                args[6] += y;
            }
            CommandKind::ClosePath => (),
            _ => {
                for pair in args.chunks_exact_mut(2) {
                    pair[0] += x;
                    pair[1] += y;
                }
            }
        }

        args
    }

    // The reflection only applies if the previous command was a curve of the same
    // kind; otherwise the control point is the current point.
    fn reflected_control_point(&self, source: CurveSource) -> Point {
        let follows_curve = self.builder.len() > 1
            && self.builder.last_command() == Some(DrawCommand::CubicTo)
            && self.state.last_curve == source;

        if follows_curve {
            self.state.last_control.reflect_through(self.state.current)
        } else {
            self.state.current
        }
    }

    fn emit_move_to(&mut self, p: Point) {
        self.state.current = p;

        self.builder.move_to(p);
    }

    fn emit_line_to(&mut self, p: Point) {
        self.state.current = p;

        self.builder.line_to(p);
    }

    fn emit_curve_to(&mut self, pt1: Point, pt2: Point, to: Point) {
        self.state.last_control = pt2;
        self.state.current = to;
        self.state.last_curve = CurveSource::Cubic;

        self.builder.curve_to(pt1, pt2, to);
    }

    fn emit_quadratic_curve_to(&mut self, control: Point, to: Point) {
        let from = self.state.current;

        // raise quadratic Bézier to cubic
        let pt1 = Point::new((from.x + 2.0 * control.x) / 3.0, (from.y + 2.0 * control.y) / 3.0);
        let pt2 = Point::new((to.x + 2.0 * control.x) / 3.0, (to.y + 2.0 * control.y) / 3.0);

        self.state.last_control = control;
        self.state.current = to;
        self.state.last_curve = CurveSource::Quadratic;

        self.builder.curve_to(pt1, pt2, to);
    }

    // Arcs keep the curve source of the previous curve command.
    fn emit_arc(&mut self, arc: EllipticalArc) {
        if let Some(control) = arc.append_to(self.builder) {
            self.state.last_control = control;
        }

        self.state.current = arc.to;
    }
}
