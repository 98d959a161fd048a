//! Human-readable rendering of real and complex scalars.
//!
//! Values within `zero_tolerance` of zero are snapped to exactly 0 before
//! rounding. The snap happens per component, before deciding how a complex
//! number is written, so `1e-12 + 5i` prints as `5i`.

use crate::core::error::FormatError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberFormat {
    pub decimals: usize,
    pub zero_tolerance: f64,
}

pub const ZERO_TOLERANCE: f64 = 1e-10;

impl NumberFormat {
    /// Derivation steps.
    pub const STEPS: NumberFormat = NumberFormat { decimals: 4, zero_tolerance: ZERO_TOLERANCE };
    /// Detailed result panel.
    pub const RESULT: NumberFormat = NumberFormat { decimals: 6, zero_tolerance: ZERO_TOLERANCE };

    pub fn new(decimals: usize, zero_tolerance: f64) -> Self {
        Self { decimals, zero_tolerance }
    }

    /// Snap to zero, then round to `decimals` places.
    pub fn round(&self, x: f64) -> Result<f64, FormatError> {
        if !x.is_finite() {
            return Err(FormatError::NonFinite(x));
        }
        if x.abs() < self.zero_tolerance {
            return Ok(0.0);
        }
        let fixed = round_half_away(x, self.decimals);
        // `+ 0.0` folds -0 into 0
        Ok(fixed.parse::<f64>().unwrap_or(0.0) + 0.0)
    }

    pub fn real(&self, x: f64) -> Result<String, FormatError> {
        Ok(self.round(x)?.to_string())
    }

    pub fn complex(&self, re: f64, im: f64) -> Result<String, FormatError> {
        let re = self.round(re)?;
        let im = self.round(im)?;
        if im == 0.0 {
            return Ok(re.to_string());
        }
        if re == 0.0 {
            return Ok(format!("{im}i"));
        }
        let sign = if im > 0.0 { '+' } else { '-' };
        Ok(format!("{re} {sign} {}i", im.abs()))
    }

    pub fn vector(&self, real: &[f64], imag: &[f64]) -> Result<Vec<String>, FormatError> {
        real.iter()
            .zip(imag.iter())
            .map(|(&re, &im)| self.complex(re, im))
            .collect()
    }
}

/// Fixed-point text of `x` at `decimals` places, ties away from zero.
///
/// Works on the exact decimal expansion of the binary value, so `0.03125`
/// becomes `0.0313` while `0.00015` (stored just below the tie) stays `0.0001`.
fn round_half_away(x: f64, decimals: usize) -> String {
    // every finite f64 has at most 1074 fractional digits
    let exact = format!("{:.1074}", x.abs());
    let (int, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let (kept, rest) = frac.split_at(decimals.min(frac.len()));
    let mut digits: Vec<u8> = int.bytes().chain(kept.bytes()).collect();
    if rest.as_bytes().first().is_some_and(|d| *d >= b'5') {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, b'1');
                break;
            }
            i -= 1;
            if digits[i] == b'9' {
                digits[i] = b'0';
            } else {
                digits[i] += 1;
                break;
            }
        }
    }
    let split = digits.len() - kept.len();
    let (int, frac) = digits.split_at(split);
    let mut out = String::with_capacity(digits.len() + 2);
    if x.is_sign_negative() {
        out.push('-');
    }
    out.extend(int.iter().map(|d| *d as char));
    if !frac.is_empty() {
        out.push('.');
        out.extend(frac.iter().map(|d| *d as char));
    }
    out
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::STEPS
    }
}

/// [`NumberFormat::real`] with the 4-decimal step precision.
pub fn format_real(x: f64) -> Result<String, FormatError> {
    NumberFormat::STEPS.real(x)
}

/// [`NumberFormat::complex`] with the 4-decimal step precision.
pub fn format_complex(re: f64, im: f64) -> Result<String, FormatError> {
    NumberFormat::STEPS.complex(re, im)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_zero_is_zero() {
        for x in [0.0, 1e-11, -9.9e-11, -0.0] {
            assert_eq!(format_real(x).unwrap(), "0");
        }
    }

    #[test]
    fn rounds_and_strips_trailing_zeros() {
        assert_eq!(format_real(3.14159265).unwrap(), "3.1416");
        assert_eq!(format_real(2.5).unwrap(), "2.5");
        assert_eq!(format_real(7.0).unwrap(), "7");
        assert_eq!(format_real(-0.00001).unwrap(), "0");
        assert_eq!(NumberFormat::RESULT.real(3.14159265).unwrap(), "3.141593");
        assert_eq!(format_real(0.03125).unwrap(), "0.0313");
        assert_eq!(format_real(-0.03125).unwrap(), "-0.0313");
        assert_eq!(NumberFormat::RESULT.real(0.0078125).unwrap(), "0.007813");
        // stored below the tie, so it rounds down
        assert_eq!(format_real(0.00015).unwrap(), "0.0001");
        assert_eq!(format_real(9.99995).unwrap(), "10");
    }

    #[test]
    fn complex_branches() {
        assert_eq!(format_complex(0.0, 0.0).unwrap(), "0");
        assert_eq!(format_complex(2.0, 3.0).unwrap(), "2 + 3i");
        assert_eq!(format_complex(2.0, -3.0).unwrap(), "2 - 3i");
        assert_eq!(format_complex(0.0, 5.0).unwrap(), "5i");
        assert_eq!(format_complex(0.0, -5.0).unwrap(), "-5i");
        assert_eq!(format_complex(1e-12, 5.0).unwrap(), "5i");
        assert_eq!(format_complex(4.0, 1e-12).unwrap(), "4");
        // rounds away before the branch is chosen
        assert_eq!(format_complex(1.5, 0.00001).unwrap(), "1.5");
        assert_eq!(format_complex(0.15625, 1.03125).unwrap(), "0.1563 + 1.0313i");
    }

    #[test]
    fn non_finite_is_an_error() {
        assert_eq!(format_real(f64::NAN).unwrap_err().to_string(), "Cannot format non-finite value NaN");
        assert!(format_complex(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn vectors_format_per_component() {
        let out = NumberFormat::STEPS.vector(&[1.0, 0.0], &[0.0, -2.0]).unwrap();
        assert_eq!(out, vec!["1".to_string(), "-2i".to_string()]);
    }
}
