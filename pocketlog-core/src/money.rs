/// Render an amount as dollars with thousands separators, e.g. `$1,234.50` or `-$20.00`.
pub fn format_money(amount: f64) -> String {
    // no integer cents: a u64 clamps amounts above ~1.8e17
    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = whole.bytes().all(|b| b == b'0') && frac.bytes().all(|b| b == b'0');
    let sign = if amount < 0.0 && !is_zero { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}
