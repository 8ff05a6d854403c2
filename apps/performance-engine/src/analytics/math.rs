//! Decimal math helpers.

use rust_decimal::Decimal;

use super::constants::{MAX_SQRT_ITERATIONS, TOLERANCE, TWO};

/// Sum that returns `None` instead of overflowing.
pub fn checked_sum<'a>(values: impl IntoIterator<Item = &'a Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
}

/// Arithmetic mean, `None` for an empty slice or when the sum overflows.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    checked_sum(values)?.checked_div(Decimal::from(values.len() as u64))
}

/// Population standard deviation (divides by `n`).
///
/// `None` for an empty slice or when the squared deviations exceed the
/// decimal range.
pub fn population_std_dev(values: &[Decimal]) -> Option<Decimal> {
    let avg = mean(values)?;
    let variance_sum = values.iter().try_fold(Decimal::ZERO, |acc, v| {
        let deviation = v.checked_sub(avg)?;
        acc.checked_add(deviation.checked_mul(deviation)?)
    })?;
    sqrt_decimal(variance_sum.checked_div(Decimal::from(values.len() as u64))?)
}

/// Square root by Newton iteration.
pub fn sqrt_decimal(value: Decimal) -> Option<Decimal> {
    if value < Decimal::ZERO {
        return None;
    }
    if value.is_zero() {
        return Some(Decimal::ZERO);
    }

    // Start above the root so the iteration converges monotonically.
    let mut guess = if value > Decimal::ONE { value / TWO } else { Decimal::ONE };

    for _ in 0..MAX_SQRT_ITERATIONS {
        let next = guess.checked_add(value.checked_div(guess)?)? / TWO;
        if (next - guess).abs() < TOLERANCE {
            return Some(next);
        }
        guess = next;
    }

    Some(guess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn mean_of_values() {
        assert_eq!(mean(&[dec!(10), dec!(20), dec!(30), dec!(40)]), Some(dec!(25)));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn population_std_dev_divides_by_n() {
        // 2, 4, 4, 4, 5, 5, 7, 9 has population std dev exactly 2
        let values = [dec!(2), dec!(4), dec!(4), dec!(4), dec!(5), dec!(5), dec!(7), dec!(9)];
        let Some(std) = population_std_dev(&values) else {
            panic!("std dev should exist for non-empty input");
        };
        assert!((std - dec!(2)).abs() < dec!(0.000001));
    }

    #[test]
    fn std_dev_of_constant_series_is_zero() {
        assert_eq!(population_std_dev(&[dec!(3), dec!(3), dec!(3)]), Some(Decimal::ZERO));
    }

    #[test]
    fn sqrt_small_and_large() {
        let Some(root) = sqrt_decimal(dec!(0.25)) else {
            panic!("sqrt of 0.25 should succeed");
        };
        assert!((root - dec!(0.5)).abs() < dec!(0.000001));

        let Some(root) = sqrt_decimal(dec!(1000000)) else {
            panic!("sqrt of 1e6 should succeed");
        };
        assert!((root - dec!(1000)).abs() < dec!(0.000001));

        assert_eq!(sqrt_decimal(dec!(-1)), None);
    }

    #[test]
    fn overflowing_inputs_yield_none() {
        assert_eq!(checked_sum(&[Decimal::MAX, Decimal::ONE]), None);
        assert_eq!(mean(&[Decimal::MAX, Decimal::MAX]), None);

        // Deviations of 1e15 square to 1e30, past the decimal range.
        let wide = [dec!(1000000000000000), dec!(-1000000000000000)];
        assert_eq!(mean(&wide), Some(Decimal::ZERO));
        assert_eq!(population_std_dev(&wide), None);
    }

    #[test]
    fn sqrt_of_largest_decimal() {
        let Some(root) = sqrt_decimal(Decimal::MAX) else {
            panic!("sqrt of Decimal::MAX should succeed");
        };
        assert!(root > dec!(100000000000000));
    }
}
