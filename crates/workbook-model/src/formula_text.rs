/// Normalize formula text into the canonical stored form.
///
/// SpreadsheetML keeps `<f>` text without a leading `'='`, so stored formulas
/// are trimmed and have a single leading `'='` stripped.
pub fn normalize_formula_text(s: &str) -> String {
    let mut trimmed = s.trim();
    if let Some(rest) = trimmed.strip_prefix('=') {
        trimmed = rest.trim();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::normalize_formula_text;

    #[test]
    fn strips_one_leading_equals() {
        assert_eq!(normalize_formula_text("=A1+1"), "A1+1");
        assert_eq!(normalize_formula_text("  = SUM(A:A) "), "SUM(A:A)");
        assert_eq!(normalize_formula_text("==A1"), "=A1");
    }
}
