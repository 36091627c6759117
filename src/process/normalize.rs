// src/process/normalize.rs

use encoding_rs::WINDOWS_1252;

/// Placeholder the upstream site renders for "not reported".
const MISSING: &str = "-";

/// Parse a European-formatted number (`1.234.567,89`) into `f64`.
///
/// `"-"`, blanks and anything unparseable come back as `None`; malformed
/// upstream cells degrade to a missing value instead of failing the request.
pub fn normalize_quantity(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == MISSING {
        return None;
    }
    let cleaned: String = s
        .chars()
        .filter(|&c| c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Undo UTF-8 text that was read with the site's legacy charset
/// (`SuÃ§o` → `Suço`).
///
/// The text is re-encoded as Windows-1252; if every char maps and the bytes
/// form valid UTF-8 the decoded string is returned, otherwise the input.
pub fn repair_text_encoding(raw: &str) -> String {
    if raw.is_ascii() {
        return raw.to_string();
    }
    let (bytes, _, unmappable) = WINDOWS_1252.encode(raw);
    if unmappable {
        return raw.to_string();
    }
    match std::str::from_utf8(&bytes) {
        Ok(fixed) => fixed.to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_european_numbers() {
        assert_eq!(normalize_quantity("1.234,5"), Some(1234.5));
        assert_eq!(normalize_quantity("217.208.604"), Some(217_208_604.0));
        assert_eq!(normalize_quantity("0,75"), Some(0.75));
        assert_eq!(normalize_quantity("  42 "), Some(42.0));
        assert_eq!(normalize_quantity("-3,5"), Some(-3.5));
    }

    #[test]
    fn test_missing_values() {
        assert_eq!(normalize_quantity("-"), None);
        assert_eq!(normalize_quantity(""), None);
        assert_eq!(normalize_quantity("   "), None);
        assert_eq!(normalize_quantity(" - "), None);
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(normalize_quantity("abc"), None);
        assert_eq!(normalize_quantity("1,2,3"), None);
        assert_eq!(normalize_quantity("inf"), None);
        assert_eq!(normalize_quantity("NaN"), None);
    }

    #[test]
    fn test_repair_double_encoded() {
        assert_eq!(repair_text_encoding("SuÃ§o de uva"), "Suço de uva");
        assert_eq!(repair_text_encoding("Vin\u{c3}\u{ad}feras"), "Viníferas");
    }

    #[test]
    fn test_repair_leaves_good_text_alone() {
        assert_eq!(repair_text_encoding("Tinto"), "Tinto");
        // Latin-1 bytes E7 alone are not valid UTF-8
        assert_eq!(repair_text_encoding("Suço"), "Suço");
        // re-encodes to E7 ... 96, which is not UTF-8
        assert_eq!(repair_text_encoding("Suço – tinto"), "Suço – tinto");
    }

    #[test]
    fn test_repair_uppercase_accents() {
        // É and Ç carry a second UTF-8 byte in the 0x80..0x9F range,
        // which Windows-1252 reads as typographic punctuation
        assert_eq!(repair_text_encoding("VINHO FINO DE MESA (VINÃ\u{2030}FERAS)"), "VINHO FINO DE MESA (VINÉFERAS)");
        assert_eq!(repair_text_encoding("A\u{c3}\u{2021}UCAR"), "AÇUCAR");
    }
}
