//! Common utility functions for tax calculations.
//!
//! This module provides the integer rounding primitive shared by [`Money`]
//! arithmetic and the calculators, so that every rescaling step in the crate
//! rounds the same way.
//!
//! [`Money`]: crate::Money

/// Divides two integers, rounding half away from zero.
///
/// This follows standard financial rounding conventions where a remainder of
/// exactly one half moves the quotient one unit away from zero. The
/// denominator must not be zero.
///
/// # Examples
///
/// ```
/// use pph_core::calculations::common::div_round_half_up;
///
/// assert_eq!(div_round_half_up(14, 10), 1);
/// assert_eq!(div_round_half_up(15, 10), 2);
/// assert_eq!(div_round_half_up(-15, 10), -2); // Away from zero
/// assert_eq!(div_round_half_up(15, -10), -2);
/// ```
pub fn div_round_half_up(
    numerator: i128,
    denominator: i128,
) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;

    if remainder.unsigned_abs() * 2 >= denominator.unsigned_abs() {
        if (numerator < 0) == (denominator < 0) {
            quotient + 1
        } else {
            quotient - 1
        }
    } else {
        quotient
    }
}
