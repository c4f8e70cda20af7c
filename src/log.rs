//! Utilities for logging messages from the library.
//!
//! Logging is off unless the `SVGPATH_LOG` environment variable is set, in which
//! case messages go to stdout.  This is meant for debugging path data that does
//! not render as expected, since the parser itself never reports malformed input
//! to the end user.

use once_cell::sync::Lazy;

#[macro_export]
macro_rules! svgpath_log {
    (
        $($arg:tt)+
    ) => {
        if $crate::log::log_enabled() {
            println!("{}", format_args!($($arg)+));
        }
    };
}

pub fn log_enabled() -> bool {
    static ENABLED: Lazy<bool> = Lazy::new(|| ::std::env::var_os("SVGPATH_LOG").is_some());

    *ENABLED
}
