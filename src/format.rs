//! Display formatting for predicted prices.

/// Render a price as whole dollars with thousands separators, e.g. `$850,000`.
///
/// Rounds half away from zero. Negative estimates keep their sign in front
/// of the currency symbol.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "$-".to_string();
    }

    let rounded = price.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    format!("{}${}", sign, group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
