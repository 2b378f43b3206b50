//! Human-readable renderings of amounts and dates.

use chrono::NaiveDate;
use tenders_core::Tender;

/// Full amount with thousands separators, e.g. `1.500.000 €`.
pub fn amount(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("{grouped} €")
}

/// Compact amount, e.g. `€1.50M` or `€200k`.
pub fn amount_short(value: u64) -> String {
    if value >= 1_000_000 {
        let hundredths = value.saturating_add(5_000) / 10_000;
        format!("€{}.{:02}M", hundredths / 100, hundredths % 100)
    } else if value >= 1_000 {
        format!("€{}k", value.saturating_add(500) / 1_000)
    } else {
        format!("€{value}")
    }
}

/// The funding range of a tender in compact form.
pub fn funding_range(tender: &Tender) -> String {
    format!(
        "{} - {}",
        amount_short(tender.funding_min),
        amount_short(tender.funding_max)
    )
}

/// A deadline, or a dash when unknown.
pub fn deadline(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%d.%m.%Y").to_string())
}

/// Days from `today` until `date`, phrased for display.
pub fn days_left(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        days if days < 0 => "closed".to_string(),
        0 => "closes today".to_string(),
        1 => "1 day left".to_string(),
        days => format!("{days} days left"),
    }
}

/// Shortens `text` to at most `width` characters, marking the cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(0, "0 €")]
    #[test_case(999, "999 €")]
    #[test_case(1_000, "1.000 €")]
    #[test_case(1_500_000, "1.500.000 €")]
    fn formats_full_amounts(value: u64, expected: &str) {
        assert_eq!(amount(value), expected);
    }

    #[test_case(500, "€500")]
    #[test_case(200_000, "€200k")]
    #[test_case(5_200_000, "€5.20M")]
    #[test_case(1_234_567, "€1.23M")]
    fn formats_short_amounts(value: u64, expected: &str) {
        assert_eq!(amount_short(value), expected);
    }

    #[test_case(-3, "closed")]
    #[test_case(0, "closes today")]
    #[test_case(1, "1 day left")]
    #[test_case(12, "12 days left")]
    fn phrases_days_left(offset: i64, expected: &str) {
        let today = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        let date = today + chrono::Duration::days(offset);
        assert_eq!(days_left(date, today), expected);
    }

    #[test]
    fn truncates_long_text() {
        assert_eq!(truncate("Zeleni prehod", 20), "Zeleni prehod");
        assert_eq!(truncate("Zeleni prehod", 7), "Zeleni…");
    }
}
