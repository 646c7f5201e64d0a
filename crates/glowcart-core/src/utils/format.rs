/// Round to two decimal places.
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Format an amount with thousands separators and two decimals: `12,500.00`.
pub fn format_price(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, grouped, fraction)
}

/// Truncate to `max_len` characters, ending with `...` when shortened.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(2.345678), 2.35);
        assert_eq!(round_money(0.1 + 0.2), 0.3);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "0.00");
        assert_eq!(format_price(999.5), "999.50");
        assert_eq!(format_price(12500.0), "12,500.00");
        assert_eq!(format_price(1234567.891), "1,234,567.89");
        assert_eq!(format_price(-2500.0), "-2,500.00");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Rose Lip Oil", 20), "Rose Lip Oil");
        assert_eq!(truncate("Rose Lip Oil", 8), "Rose ...");
        assert_eq!(truncate("Rose", 2), "Ro");
    }
}
