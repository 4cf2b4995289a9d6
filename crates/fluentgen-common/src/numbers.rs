//! Number formatting helpers.
//!
//! Literal numbers that flow into template literal text must render exactly
//! the way the host language prints them.

/// Converts a number to its JavaScript `Number.prototype.toString()` form.
///
/// Scientific notation is used when `|x| < 1e-6` or `|x| >= 1e21`, with an
/// explicit `+` on positive exponents.
pub fn js_number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() {
            "-Infinity".to_string()
        } else {
            "Infinity".to_string()
        };
    }

    let abs = value.abs();
    if !(1e-6..1e21).contains(&abs) {
        let mut formatted = format!("{:e}", value);
        if let Some(split) = formatted.find('e') {
            let (mantissa, exp) = formatted.split_at(split);
            let exp_digits = &exp[1..];
            let (sign, digits) = match exp_digits.strip_prefix('-') {
                Some(rest) => ('-', rest),
                None => ('+', exp_digits),
            };
            let trimmed = digits.trim_start_matches('0');
            let digits = if trimmed.is_empty() { "0" } else { trimmed };
            formatted = format!("{mantissa}e{sign}{digits}");
        }
        return formatted;
    }

    if value.fract() == 0.0 && abs < 1e15 {
        return format!("{}", value as i64);
    }
    value.to_string()
}
