//! Display helpers for dashboard cards.

/// US dollars with thousands separators and no fraction digits.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

/// Percentage with one decimal, e.g. `19.2%`.
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}
