//! Tokenizer for SVG path data.
//!
//! The [`Lexer`] walks the path data and yields one command at a time, together with
//! the fixed number of numeric arguments that the command takes.  SVG lets consecutive
//! argument groups omit the command letter, so a group without a letter repeats the
//! previous command; a repeated moveto becomes a lineto.
//!
//! Numbers are scanned by hand and converted with [`str::parse`], which always uses `.`
//! as the decimal separator no matter what the process locale says.

use tinyvec::ArrayVec;

use crate::error::{ErrorKind, ParseError};
use crate::svgpath_log;

/// The drawing operation named by a command letter, without regard to its case.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CommandKind {
    MoveTo,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CurveTo,
    SmoothCurveTo,
    QuadraticCurveTo,
    SmoothQuadraticCurveTo,
    EllipticalArc,
    ClosePath,
}

impl CommandKind {
    /// Number of numeric arguments that the command consumes.
    pub fn arity(self) -> usize {
        match self {
            CommandKind::HorizontalLineTo | CommandKind::VerticalLineTo => 1,
            CommandKind::MoveTo | CommandKind::LineTo | CommandKind::SmoothQuadraticCurveTo => 2,
            CommandKind::SmoothCurveTo | CommandKind::QuadraticCurveTo => 4,
            CommandKind::CurveTo => 6,
            CommandKind::EllipticalArc => 7,
            CommandKind::ClosePath => 0,
        }
    }
}

/// A path command: what to draw, and whether its coordinates are absolute or relative
/// to the current point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub absolute: bool,
}

impl Command {
    /// Looks up a command letter; uppercase letters are absolute, lowercase are relative.
    ///
    /// `E` and `e` are accepted as aliases for `C` and `c`.
    pub fn from_letter(c: u8) -> Option<Command> {
        let kind = match c.to_ascii_uppercase() {
            b'M' => CommandKind::MoveTo,
            b'L' => CommandKind::LineTo,
            b'H' => CommandKind::HorizontalLineTo,
            b'V' => CommandKind::VerticalLineTo,
            b'C' | b'E' => CommandKind::CurveTo,
            b'S' => CommandKind::SmoothCurveTo,
            b'Q' => CommandKind::QuadraticCurveTo,
            b'T' => CommandKind::SmoothQuadraticCurveTo,
            b'A' => CommandKind::EllipticalArc,
            b'Z' => CommandKind::ClosePath,
            _ => return None,
        };

        Some(Command {
            kind,
            absolute: c.is_ascii_uppercase(),
        })
    }

    /// The command that applies to an argument group written without a letter after
    /// this one.  Closepath takes no arguments, so nothing can follow it implicitly.
    fn implicit_successor(self) -> Option<Command> {
        match self.kind {
            CommandKind::MoveTo => Some(Command {
                kind: CommandKind::LineTo,
                ..self
            }),
            CommandKind::ClosePath => None,
            _ => Some(self),
        }
    }
}

/// Numeric arguments of a single command, in the order they appear in the path data.
///
/// For elliptical arcs the flags are stored as 0.0 or 1.0 at indices 3 and 4.
pub type Args = ArrayVec<[f64; 7]>;

#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    previous: Option<Command>,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            input,
            pos: 0,
            previous: None,
            done: false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, pos: usize) -> Option<u8> {
        self.input.as_bytes().get(pos).copied()
    }

    fn advance_over_whitespace(&mut self) {
        while self.peek().map_or(false, |c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn advance_over_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    // Whitespace and at most one comma.
    fn advance_over_separator(&mut self) {
        self.advance_over_whitespace();
        if self.peek() == Some(b',') {
            self.pos += 1;
            self.advance_over_whitespace();
        }
    }

    fn unexpected(&self, pos: usize) -> ErrorKind {
        match self.peek_at(pos) {
            None => ErrorKind::UnexpectedEof,
            Some(c) => ErrorKind::UnexpectedByte(c),
        }
    }

    // [+-]? (digits [. digits*] | . digits) ([eE] [+-]? digits)?
    //
    // An 'e' that is not followed by an exponent is left alone, so it can be read as
    // the next command letter.
    fn match_number(&mut self) -> Result<f64, ParseError> {
        self.advance_over_whitespace();
        let start = self.pos;

        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }

        let mut num_digits = self.advance_over_digits();

        if self.peek() == Some(b'.') {
            self.pos += 1;
            num_digits += self.advance_over_digits();
        }

        if num_digits == 0 {
            let kind = self.unexpected(self.pos);
            self.pos = start;
            return Err(ParseError::new(start, kind));
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mut exponent = self.pos + 1;
            if matches!(self.peek_at(exponent), Some(b'+' | b'-')) {
                exponent += 1;
            }

            if self.peek_at(exponent).map_or(false, |c| c.is_ascii_digit()) {
                self.pos = exponent;
                self.advance_over_digits();
            }
        }

        // All the scanned bytes are ASCII, so this slice is on char boundaries.
        match self.input[start..self.pos].parse::<f64>() {
            Ok(n) => {
                self.advance_over_separator();
                Ok(n)
            }

            Err(_) => {
                let kind = self.unexpected(start);
                self.pos = start;
                Err(ParseError::new(start, kind))
            }
        }
    }

    // A single digit; anything other than '0' is true.
    fn match_flag(&mut self) -> Result<bool, ParseError> {
        self.advance_over_whitespace();

        match self.peek() {
            Some(c) if c.is_ascii_digit() => {
                self.pos += 1;
                self.advance_over_separator();
                Ok(c != b'0')
            }

            _ => Err(ParseError::new(self.pos, self.unexpected(self.pos))),
        }
    }

    fn match_arguments(&mut self, command: Command) -> Result<Args, ParseError> {
        let mut args = Args::new();

        if command.kind == CommandKind::EllipticalArc {
            // rx ry x-axis-rotation large-arc-flag sweep-flag x y
            args.push(self.match_number()?);
            args.push(self.match_number()?);
            args.push(self.match_number()?);
            args.push(f64::from(u8::from(self.match_flag()?)));
            args.push(f64::from(u8::from(self.match_flag()?)));
            args.push(self.match_number()?);
            args.push(self.match_number()?);
        } else {
            for _ in 0..command.kind.arity() {
                args.push(self.match_number()?);
            }
        }

        Ok(args)
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<(Command, Args), ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.advance_over_separator();

            let c = self.peek()?;

            let command = if c.is_ascii_alphabetic() {
                self.pos += 1;

                match Command::from_letter(c) {
                    Some(command) => command,
                    None => {
                        svgpath_log!(
                            "ignoring unknown path command '{}' at position {}",
                            char::from(c),
                            self.pos - 1
                        );
                        self.previous = None;
                        continue;
                    }
                }
            } else {
                match self.previous.and_then(Command::implicit_successor) {
                    Some(command) => command,
                    None => {
                        self.done = true;
                        return Some(Err(ParseError::new(self.pos, ErrorKind::NoCommand)));
                    }
                }
            };

            self.previous = Some(command);

            let result = self.match_arguments(command);
            if result.is_err() {
                self.done = true;
            }

            return Some(result.map(|args| (command, args)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(letter: u8) -> Command {
        Command::from_letter(letter).unwrap()
    }

    fn lex(s: &str) -> Vec<Result<(Command, Vec<f64>), ParseError>> {
        Lexer::new(s)
            .map(|r| r.map(|(c, args)| (c, args.to_vec())))
            .collect()
    }

    fn ok(letter: u8, args: &[f64]) -> Result<(Command, Vec<f64>), ParseError> {
        Ok((cmd(letter), args.to_vec()))
    }

    fn err(position: usize, kind: ErrorKind) -> Result<(Command, Vec<f64>), ParseError> {
        Err(ParseError { position, kind })
    }

    #[test]
    fn command_letters() {
        assert_eq!(
            Command::from_letter(b'M'),
            Some(Command { kind: CommandKind::MoveTo, absolute: true })
        );
        assert_eq!(
            Command::from_letter(b'a'),
            Some(Command { kind: CommandKind::EllipticalArc, absolute: false })
        );
        assert_eq!(Command::from_letter(b'e'), Some(cmd(b'c')));
        assert_eq!(Command::from_letter(b'E'), Some(cmd(b'C')));
        assert_eq!(Command::from_letter(b'x'), None);
        assert_eq!(Command::from_letter(b'B'), None);
    }

    #[test]
    fn arities() {
        let table = [
            (b'M', 2), (b'L', 2), (b'T', 2),
            (b'H', 1), (b'V', 1),
            (b'S', 4), (b'Q', 4),
            (b'C', 6), (b'E', 6),
            (b'A', 7),
            (b'Z', 0),
        ];

        for (letter, arity) in table {
            assert_eq!(cmd(letter).kind.arity(), arity);
            assert_eq!(cmd(letter.to_ascii_lowercase()).kind.arity(), arity);
        }
    }

    #[test]
    fn handles_empty_data() {
        assert!(lex("").is_empty());
        assert!(lex("   \n\t ").is_empty());
    }

    #[test]
    fn handles_numbers() {
        assert_eq!(lex("M 10 20"), vec![ok(b'M', &[10.0, 20.0])]);
        assert_eq!(lex("M -10 -20"), vec![ok(b'M', &[-10.0, -20.0])]);
        assert_eq!(lex("M .10 0.20"), vec![ok(b'M', &[0.10, 0.20])]);
        assert_eq!(lex("M-.10-0.20"), vec![ok(b'M', &[-0.10, -0.20])]);
        assert_eq!(lex("M+1+2"), vec![ok(b'M', &[1.0, 2.0])]);
        assert_eq!(lex("M10.5.50"), vec![ok(b'M', &[10.5, 0.50])]);
        assert_eq!(lex("M.10.20"), vec![ok(b'M', &[0.10, 0.20])]);
        assert_eq!(lex("M5. 6."), vec![ok(b'M', &[5.0, 6.0])]);
        assert_eq!(lex("M .10E1 .20e-4"), vec![ok(b'M', &[1.0, 0.000020])]);
        assert_eq!(lex("M10.10E2 -0.20e3"), vec![ok(b'M', &[1010.0, -200.0])]);
        assert_eq!(lex("M1e2.5"), vec![ok(b'M', &[100.0, 0.5])]);
        assert_eq!(lex("M1e-2.5"), vec![ok(b'M', &[0.01, 0.5])]);
        assert_eq!(lex("M1e+2.5"), vec![ok(b'M', &[100.0, 0.5])]);
    }

    #[test]
    fn handles_separators() {
        assert_eq!(lex("M 10, 20"), vec![ok(b'M', &[10.0, 20.0])]);
        assert_eq!(lex("M10 ,20"), vec![ok(b'M', &[10.0, 20.0])]);
        assert_eq!(lex("M.10    ,    0.20   "), vec![ok(b'M', &[0.10, 0.20])]);
        assert_eq!(lex("M10,20,L30,40"), vec![ok(b'M', &[10.0, 20.0]), ok(b'L', &[30.0, 40.0])]);
        assert_eq!(lex("M\t10\n20\r\n"), vec![ok(b'M', &[10.0, 20.0])]);
    }

    #[test]
    fn only_one_comma_between_numbers() {
        assert_eq!(
            lex("M10,,20"),
            vec![err(4, ErrorKind::UnexpectedByte(b','))]
        );
    }

    #[test]
    fn exponent_without_digits_is_not_consumed() {
        assert_eq!(
            lex("M10e 20"),
            vec![err(3, ErrorKind::UnexpectedByte(b'e'))]
        );

        // Here the 'e' is the cubic alias.
        assert_eq!(
            lex("M1 2e 1 2 3 4 5 6"),
            vec![ok(b'M', &[1.0, 2.0]), ok(b'e', &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])]
        );
    }

    #[test]
    fn detects_bogus_numbers() {
        assert_eq!(lex("M+"), vec![err(1, ErrorKind::UnexpectedEof)]);
        assert_eq!(lex("M-"), vec![err(1, ErrorKind::UnexpectedEof)]);
        assert_eq!(lex("M+x"), vec![err(1, ErrorKind::UnexpectedByte(b'x'))]);
        assert_eq!(lex("M."), vec![err(1, ErrorKind::UnexpectedEof)]);
        assert_eq!(lex("M1 ."), vec![err(3, ErrorKind::UnexpectedEof)]);
        assert_eq!(lex("M1 #"), vec![err(3, ErrorKind::UnexpectedByte(b'#'))]);
    }

    #[test]
    fn repeats_previous_command() {
        assert_eq!(
            lex("L1 2 3 4"),
            vec![ok(b'L', &[1.0, 2.0]), ok(b'L', &[3.0, 4.0])]
        );
        assert_eq!(
            lex("h1-2"),
            vec![ok(b'h', &[1.0]), ok(b'h', &[-2.0])]
        );
    }

    #[test]
    fn repeated_moveto_becomes_lineto() {
        assert_eq!(
            lex("M0,0 10,10 20,20"),
            vec![ok(b'M', &[0.0, 0.0]), ok(b'L', &[10.0, 10.0]), ok(b'L', &[20.0, 20.0])]
        );
        assert_eq!(
            lex("m0,0 10,10"),
            vec![ok(b'm', &[0.0, 0.0]), ok(b'l', &[10.0, 10.0])]
        );
    }

    #[test]
    fn closepath_takes_no_arguments() {
        assert_eq!(
            lex("M1 2Zm3 4z"),
            vec![ok(b'M', &[1.0, 2.0]), ok(b'Z', &[]), ok(b'm', &[3.0, 4.0]), ok(b'z', &[])]
        );
        assert_eq!(
            lex("M1 2Z 3 4"),
            vec![ok(b'M', &[1.0, 2.0]), ok(b'Z', &[]), err(6, ErrorKind::NoCommand)]
        );
    }

    #[test]
    fn coordinates_need_a_command() {
        assert_eq!(lex("10 20"), vec![err(0, ErrorKind::NoCommand)]);
    }

    #[test]
    fn skips_unknown_commands() {
        assert_eq!(
            lex("M1 2 X L3 4"),
            vec![ok(b'M', &[1.0, 2.0]), ok(b'L', &[3.0, 4.0])]
        );
        assert_eq!(
            lex("M1 2 X 3 4"),
            vec![ok(b'M', &[1.0, 2.0]), err(7, ErrorKind::NoCommand)]
        );
    }

    #[test]
    fn arc_flags() {
        assert_eq!(
            lex("A5,5 30 1,0 10,20"),
            vec![ok(b'A', &[5.0, 5.0, 30.0, 1.0, 0.0, 10.0, 20.0])]
        );
        assert_eq!(
            lex("a1 1 0 0110 10"),
            vec![ok(b'a', &[1.0, 1.0, 0.0, 0.0, 1.0, 10.0, 10.0])]
        );
        assert_eq!(
            lex("A5 5 0 7 9 1 1"),
            vec![ok(b'A', &[5.0, 5.0, 0.0, 1.0, 1.0, 1.0, 1.0])]
        );
        assert_eq!(
            lex("A5 5 0 x"),
            vec![err(7, ErrorKind::UnexpectedByte(b'x'))]
        );
        assert_eq!(
            lex("A5 5 0 1"),
            vec![err(8, ErrorKind::UnexpectedEof)]
        );
    }

    #[test]
    fn stops_after_an_error() {
        let mut lexer = Lexer::new("M0,0 L10, M5 5");
        assert_eq!(lexer.next().map(|r| r.is_ok()), Some(true));
        assert_eq!(
            lexer.next().map(|r| r.map(|_| ())),
            Some(Err(ParseError { position: 10, kind: ErrorKind::UnexpectedByte(b'M') }))
        );
        assert_eq!(lexer.position(), 10);
        assert!(lexer.next().is_none());
        assert_eq!(lexer.position(), 10);
    }
}
