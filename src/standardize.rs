// Table-driven standardization - raw categorical codes to canonical labels.
// Every field's alphabet and fallback rule is declared once, in one place,
// so the defaults are uniform and testable instead of scattered per field.

/// What to do with a code outside the declared alphabet.
#[derive(Debug, Clone, Copy)]
pub enum Fallback {
    /// Closed enumeration: anything unrecognized maps to this label.
    Default(&'static str),
    /// Open alphabet (e.g. country names): unrecognized values pass
    /// through trimmed; only blank/null falls back to N/A.
    Passthrough,
}

/// Case-insensitive, whitespace-trimmed code-to-label map.
pub struct CodeMap {
    pub name: &'static str,
    entries: &'static [(&'static str, &'static str)],
    fallback: Fallback,
}

impl CodeMap {
    pub const fn new(
        name: &'static str,
        entries: &'static [(&'static str, &'static str)],
        fallback: Fallback,
    ) -> Self {
        CodeMap {
            name,
            entries,
            fallback,
        }
    }

    /// Resolve a raw code to its canonical label. Never fails: absence of
    /// a match is not an error, it is the declared fallback branch.
    pub fn resolve(&self, raw: Option<&str>) -> String {
        let trimmed = raw.map(str::trim).unwrap_or("");
        if trimmed.is_empty() {
            return self.blank_label().to_string();
        }

        let upper = trimmed.to_uppercase();
        for (code, label) in self.entries {
            if *code == upper {
                return (*label).to_string();
            }
        }

        match self.fallback {
            Fallback::Default(label) => label.to_string(),
            Fallback::Passthrough => trimmed.to_string(),
        }
    }

    fn blank_label(&self) -> &'static str {
        match self.fallback {
            Fallback::Default(label) => label,
            Fallback::Passthrough => NOT_AVAILABLE,
        }
    }
}

/// Canonical "unknown" label shared by every standardized field.
pub const NOT_AVAILABLE: &str = "N/A";

pub const GENDER: CodeMap = CodeMap::new(
    "gender",
    &[
        ("M", "MALE"),
        ("MALE", "MALE"),
        ("F", "FEMALE"),
        ("FEMALE", "FEMALE"),
    ],
    Fallback::Default(NOT_AVAILABLE),
);

pub const MARITAL_STATUS: CodeMap = CodeMap::new(
    "marital_status",
    &[
        ("M", "MARRIED"),
        ("MARRIED", "MARRIED"),
        ("S", "SINGLE"),
        ("SINGLE", "SINGLE"),
    ],
    Fallback::Default(NOT_AVAILABLE),
);

pub const PRODUCT_LINE: CodeMap = CodeMap::new(
    "product_line",
    &[
        ("M", "MOUNTAIN"),
        ("MOUNTAIN", "MOUNTAIN"),
        ("R", "ROAD"),
        ("ROAD", "ROAD"),
        ("S", "OTHER SALES"),
        ("T", "TOURING"),
        ("TOURING", "TOURING"),
    ],
    Fallback::Default(NOT_AVAILABLE),
);

pub const COUNTRY: CodeMap = CodeMap::new(
    "country",
    &[
        ("DE", "Germany"),
        ("GERMANY", "Germany"),
        ("US", "United States"),
        ("USA", "United States"),
        ("UNITED STATES", "United States"),
    ],
    Fallback::Passthrough,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_codes() {
        assert_eq!(GENDER.resolve(Some("M")), "MALE");
        assert_eq!(GENDER.resolve(Some("f")), "FEMALE");
        assert_eq!(GENDER.resolve(Some("Female")), "FEMALE");
    }

    #[test]
    fn test_gender_trims_and_ignores_case() {
        assert_eq!(GENDER.resolve(Some(" m ")), "MALE");
        assert_eq!(GENDER.resolve(Some("  FEMALE  ")), "FEMALE");
    }

    #[test]
    fn test_gender_fallback_default() {
        // Anything outside {M, F, MALE, FEMALE} maps to N/A
        assert_eq!(GENDER.resolve(Some("X")), NOT_AVAILABLE);
        assert_eq!(GENDER.resolve(Some("unknown")), NOT_AVAILABLE);
        assert_eq!(GENDER.resolve(Some("")), NOT_AVAILABLE);
        assert_eq!(GENDER.resolve(Some("   ")), NOT_AVAILABLE);
        assert_eq!(GENDER.resolve(None), NOT_AVAILABLE);
    }

    #[test]
    fn test_marital_status() {
        assert_eq!(MARITAL_STATUS.resolve(Some("M")), "MARRIED");
        assert_eq!(MARITAL_STATUS.resolve(Some("s")), "SINGLE");
        assert_eq!(MARITAL_STATUS.resolve(Some("divorced")), NOT_AVAILABLE);
        assert_eq!(MARITAL_STATUS.resolve(None), NOT_AVAILABLE);
    }

    #[test]
    fn test_product_line() {
        assert_eq!(PRODUCT_LINE.resolve(Some("M")), "MOUNTAIN");
        assert_eq!(PRODUCT_LINE.resolve(Some("r")), "ROAD");
        assert_eq!(PRODUCT_LINE.resolve(Some("S")), "OTHER SALES");
        assert_eq!(PRODUCT_LINE.resolve(Some("T")), "TOURING");
        assert_eq!(PRODUCT_LINE.resolve(Some("Z")), NOT_AVAILABLE);
    }

    #[test]
    fn test_country_known_codes() {
        assert_eq!(COUNTRY.resolve(Some("DE")), "Germany");
        assert_eq!(COUNTRY.resolve(Some("us")), "United States");
        assert_eq!(COUNTRY.resolve(Some("USA ")), "United States");
    }

    #[test]
    fn test_country_passthrough_and_blank() {
        // Open alphabet: unknown countries pass through trimmed
        assert_eq!(COUNTRY.resolve(Some(" Australia ")), "Australia");
        // Only blank/null falls back to N/A
        assert_eq!(COUNTRY.resolve(Some("")), NOT_AVAILABLE);
        assert_eq!(COUNTRY.resolve(None), NOT_AVAILABLE);
    }
}
