//! Compact, human-readable rendering of numbers.
//!
//! Magnitudes of one thousand and above are scaled down and tagged with a
//! `K`, `M` or `B` suffix at one decimal place. Smaller magnitudes are printed
//! as-is: integers bare, everything else at a fixed number of decimals.
//! Rounding is half-up on the magnitude and the sign is reapplied afterwards,
//! so `1250` renders as `1.3K` and `-1250` as `-1.3K`.

use thiserror::Error;

/// Decimals used for non-integer values below one thousand.
pub const DEFAULT_DECIMAL_PLACES: u8 = 2;

/// Largest accepted `decimal_places`.
pub const MAX_DECIMAL_PLACES: u8 = 10;

/// Scale tiers, largest first. The tier is picked on the raw magnitude.
const SCALES: [(f64, &str); 3] = [(1e9, "B"), (1e6, "M"), (1e3, "K")];

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum NumberError {
    #[error("value must be a finite number, got {0}")]
    NonFinite(f64),
    #[error("decimal_places must be between 0 and {max}, got {0}", max = MAX_DECIMAL_PLACES)]
    DecimalPlaces(u8),
}

/// Format `value` with the default decimals for sub-thousand non-integers.
pub fn format_number(value: f64) -> Result<String, NumberError> {
    format_number_with(value, DEFAULT_DECIMAL_PLACES)
}

/// Format `value`, printing sub-thousand non-integers with `decimal_places`
/// fixed decimals.
pub fn format_number_with(value: f64, decimal_places: u8) -> Result<String, NumberError> {
    if !value.is_finite() {
        return Err(NumberError::NonFinite(value));
    }
    if decimal_places > MAX_DECIMAL_PLACES {
        return Err(NumberError::DecimalPlaces(decimal_places));
    }

    let magnitude = value.abs();
    let body = match SCALES.iter().find(|(scale, _)| magnitude >= *scale) {
        // dividing by scale/10 keeps exact halves like 1050/100 exact
        Some((scale, suffix)) => {
            let tenths = round_half_up(magnitude / (scale / 10.0));
            format!("{:.1}{suffix}", tenths / 10.0)
        }
        None if magnitude.fract() == 0.0 => format!("{magnitude:.0}"),
        None => {
            let factor = 10f64.powi(i32::from(decimal_places));
            let rounded = round_half_up(magnitude * factor) / factor;
            format!("{rounded:.prec$}", prec = usize::from(decimal_places))
        }
    };

    // -0.0 and values that round to zero carry no sign
    if value.is_sign_negative() && body.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        Ok(format!("-{body}"))
    } else {
        Ok(body)
    }
}

fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}
