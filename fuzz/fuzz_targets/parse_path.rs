#![no_main]

use libfuzzer_sys::fuzz_target;

use svgpath::{DrawCommand, PathBuilder};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut builder = PathBuilder::default();
        let _ = builder.parse(s);
        let program = builder.into_program();

        let num_points: usize = program
            .commands()
            .iter()
            .map(|cmd| DrawCommand::num_points(*cmd))
            .sum();
        assert_eq!(num_points, program.points().len());

        // numbers like 1e999 overflow to infinity, which has no path data syntax
        if program.points().iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
            let reparsed = svgpath::parse(&program.to_string());
            assert_eq!(program.commands(), reparsed.commands());
        }
    }
});
