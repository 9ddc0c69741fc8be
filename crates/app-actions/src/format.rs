/// `minutes:seconds` with the seconds zero padded.
///
/// Missing, zero, negative and non-finite durations all render as `0:00`.
#[must_use]
pub fn format_duration(seconds: Option<f64>) -> String {
    let total = match seconds {
        Some(x) if x.is_finite() && x > 0.0 => x.floor(),
        _ => return "0:00".to_string(),
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = total as u64;

    format!("{}:{:02}", total / 60, total % 60)
}

/// Compact count: `1.5K`, `2.5M` or the plain number below a thousand.
///
/// One decimal, rounded half-up on the exact integer.
#[must_use]
pub fn format_count(count: Option<u64>) -> String {
    match count {
        None | Some(0) => "0".to_string(),
        Some(n) if n >= 1_000_000 => with_one_decimal(n, 1_000_000, 'M'),
        Some(n) if n >= 1_000 => with_one_decimal(n, 1_000, 'K'),
        Some(n) => n.to_string(),
    }
}

fn with_one_decimal(n: u64, unit: u64, suffix: char) -> String {
    let tenths = (u128::from(n) * 10 + u128::from(unit) / 2) / u128::from(unit);

    format!("{}.{}{}", tenths / 10, tenths % 10, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(Some(0.0)), "0:00");
        assert_eq!(format_duration(Some(75.0)), "1:15");
        assert_eq!(format_duration(None), "0:00");
        assert_eq!(format_duration(Some(9.9)), "0:09");
        assert_eq!(format_duration(Some(600.0)), "10:00");
        assert_eq!(format_duration(Some(3_725.0)), "62:05");
        assert_eq!(format_duration(Some(-4.0)), "0:00");
        assert_eq!(format_duration(Some(f64::NAN)), "0:00");
    }

    #[test]
    fn counts() {
        assert_eq!(format_count(Some(999)), "999");
        assert_eq!(format_count(Some(1_500)), "1.5K");
        assert_eq!(format_count(Some(2_500_000)), "2.5M");
        assert_eq!(format_count(None), "0");
        assert_eq!(format_count(Some(0)), "0");
        assert_eq!(format_count(Some(1_000)), "1.0K");
        assert_eq!(format_count(Some(25_400)), "25.4K");
    }

    #[test]
    fn counts_round_half_up() {
        assert_eq!(format_count(Some(1_049)), "1.0K");
        assert_eq!(format_count(Some(1_050)), "1.1K");
        assert_eq!(format_count(Some(1_250_000)), "1.3M");
        assert_eq!(format_count(Some(999_999)), "1000.0K");
    }
}
