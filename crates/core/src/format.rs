//! Number formatting shared by explanations and rendering.

/// `0.4567` -> `45.7%`.
pub fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Whole dollars with thousands separators: `125000.4` -> `$125,000`.
///
/// Halves round to even, so `125002.5` -> `$125,002`.
pub fn format_money(amount: f64) -> String {
    let digits = format!("{:.0}", amount.abs());
    let sign = if amount < 0.0 && digits != "0" { "-" } else { "" };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}
