// models/phone.rs

/// Converts a locally formatted Kenyan number into the `254`-prefixed form.
///
/// Non-digits are dropped first. The result is not validated; see [`is_valid`].
pub fn normalize(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if let Some(rest) = digits.strip_prefix('0') {
        return format!("254{}", rest);
    }
    if !digits.starts_with("254") {
        return format!("254{}", digits);
    }
    digits
}

/// `0` followed by the last nine digits of the canonical form.
pub fn to_local(canonical: &str) -> String {
    let digits: Vec<char> = canonical.chars().filter(|c| c.is_ascii_digit()).collect();
    let start = digits.len().saturating_sub(9);
    let subscriber: String = digits[start..].iter().collect();
    format!("0{}", subscriber)
}

/// Accepts `07xxxxxxxx`, `01xxxxxxxx`, `2547xxxxxxxx` and `2541xxxxxxxx`.
pub fn is_valid(candidate: &str) -> bool {
    const PREFIXES: [&str; 4] = ["07", "01", "2547", "2541"];

    if !candidate.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    PREFIXES.iter().any(|prefix| {
        candidate
            .strip_prefix(prefix)
            .map_or(false, |rest| rest.len() == 8)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_handles_local_prefixed_and_bare_numbers() {
        assert_eq!(normalize("0712345678"), "254712345678");
        assert_eq!(normalize("254712345678"), "254712345678");
        assert_eq!(normalize("712345678"), "254712345678");
        assert_eq!(normalize("0112345678"), "254112345678");
    }

    #[test]
    fn normalize_strips_formatting() {
        assert_eq!(normalize("+254 712-345-678"), "254712345678");
        assert_eq!(normalize("(071) 234 5678"), "254712345678");
    }

    #[test]
    fn normalize_never_fails_on_garbage() {
        assert_eq!(normalize(""), "254");
        assert_eq!(normalize("abc"), "254");
    }

    #[test]
    fn to_local_keeps_last_nine_digits() {
        assert_eq!(to_local("254712345678"), "0712345678");
        assert_eq!(to_local("254112345678"), "0112345678");
        assert_eq!(to_local("254"), "0254");
    }

    #[test]
    fn is_valid_accepts_known_prefixes() {
        for phone in ["0712345678", "0112345678", "254712345678", "254112345678"] {
            assert!(is_valid(phone), "{} should be accepted", phone);
        }
    }

    #[test]
    fn is_valid_rejects_other_shapes() {
        for phone in [
            "12345",
            "0812345678",
            "",
            "071234567",
            "07123456789",
            "25471234567",
            "07a2345678",
            "+254712345678",
        ] {
            assert!(!is_valid(phone), "{} should be rejected", phone);
        }
    }
}
