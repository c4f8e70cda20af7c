//! Utilities to compare floating-point numbers.

use float_cmp::ApproxEq;

const FIXED_FRAC_BITS: u64 = 8;

/// Smallest distance that is considered significant between two coordinates, 1/256.
///
/// Renderers downstream of the parser usually work in 24.8 fixed point, so two
/// coordinates closer than this end up at the same place anyway.
pub const SMALLEST_FRACTION: f64 = 1.0 / (1 << FIXED_FRAC_BITS) as f64;

/// Checks whether two floating-point numbers are approximately equal at 1/256 resolution.
///
/// Numbers are "close enough to equal" if their absolute difference is not larger
/// than [`SMALLEST_FRACTION`].  For very large values a difference of 1
/// unit-in-the-last-place (ULP) is also accepted.
pub trait ApproxEqFixed: ApproxEq {
    fn approx_eq_fixed(self, other: Self) -> bool;
}

impl ApproxEqFixed for f64 {
    fn approx_eq_fixed(self, other: f64) -> bool {
        self.approx_eq(other, (SMALLEST_FRACTION, 1))
    }
}

// Macro for usage in unit tests
#[doc(hidden)]
#[macro_export]
macro_rules! assert_approx_eq_fixed {
    ($left:expr, $right:expr) => {{
        match ($left, $right) {
            (l, r) => {
                if !l.approx_eq_fixed(r) {
                    panic!(
                        r#"assertion failed: `(left == right)`
  left: `{:?}`,
 right: `{:?}`"#,
                        l, r
                    )
                }
            }
        }
    }};
}
