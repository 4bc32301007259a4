//! Result formatting
//!
//! Values print like C's `%.12g`: twelve significant digits, trailing zeros
//! dropped, scientific notation for very large or very small magnitudes.

/// Significant digits of printed results
pub const SIGNIFICANT_DIGITS: usize = 12;

/// Format one value with [`SIGNIFICANT_DIGITS`] significant digits.
pub fn format_value(value: f64) -> String {
    format_general(value, SIGNIFICANT_DIGITS)
}

/// Format a result list as `"a, b, c\n"`. An empty list prints nothing.
pub fn format_results(values: &[f64]) -> String {
    if values.is_empty() {
        return String::new();
    }
    let mut line = values
        .iter()
        .map(|&v| format_value(v))
        .collect::<Vec<_>>()
        .join(", ");
    line.push('\n');
    line
}

/// `%.{precision}g`
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    // Round to the requested digits first; the exponent after rounding
    // decides the notation.
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -4 || exponent >= precision as i32 {
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            if exponent < 0 { '-' } else { '+' },
            exponent.abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value))
    }
}

fn trim_fraction(digits: &str) -> String {
    if digits.contains('.') {
        digits
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        digits.to_string()
    }
}
