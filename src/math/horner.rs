//! Horner evaluation of polynomials stored highest power first.

/// Evaluate `c[0] x^k + c[1] x^(k-1) + ... + c[k]` at `x`.
///
/// An empty coefficient slice is the zero polynomial.
pub fn horner(coeffs: &[f64], x: f64) -> f64 {
    let Some((&lead, rest)) = coeffs.split_first() else {
        return 0.0;
    };
    rest.iter().fold(lead, |acc, &c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_cubic() {
        // 2x^3 - 3x^2 + 0x + 5
        let c = [2.0, -3.0, 0.0, 5.0];
        assert_eq!(horner(&c, 0.0), 5.0);
        assert_eq!(horner(&c, 1.0), 4.0);
        assert_eq!(horner(&c, 2.0), 9.0);
        assert_eq!(horner(&c, -1.0), 0.0);
    }

    #[test]
    fn accumulator_carries_every_term() {
        // Every coefficient must feed the running accumulator; dropping the
        // accumulator in the loop would return only the trailing coefficient.
        let c = [1.0, 1.0, 1.0];
        assert_eq!(horner(&c, 3.0), 13.0);
        assert_ne!(horner(&c, 3.0), 1.0);
    }

    #[test]
    fn empty_and_constant() {
        assert_eq!(horner(&[], 4.0), 0.0);
        assert_eq!(horner(&[7.5], 1e9), 7.5);
    }
}
