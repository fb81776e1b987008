//! Classification of command-line tokens into index queries

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

/// Integers strictly above this are NAIFIDs
pub const NAIF_ID_LOWER: i64 = 2_000_000;

/// Integers strictly below this (and above [`NAIF_ID_LOWER`]) are NAIFIDs
pub const NAIF_ID_UPPER: i64 = 50_000_000;

lazy_static! {
    static ref DECIMAL: Regex = Regex::new(r"^[+-]?[0-9]+\.[0-9]*").unwrap();
    static ref INTEGER: Regex = Regex::new(r"^[+-]?[0-9]+$").unwrap();
}

/// What a token asks the index for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// IAU catalog number
    CatalogNumber(i64),
    NaifId(i64),
    /// Decimal numbers are ambiguous and refused
    Rejected,
    /// Name or provisional designation, matched case-insensitively
    NameOrDesignation(String),
}

impl Query {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Query::Rejected)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::CatalogNumber(n) => write!(f, "catalog number {}", n),
            Query::NaifId(n) => write!(f, "NAIFID {}", n),
            Query::Rejected => write!(f, "rejected input"),
            Query::NameOrDesignation(s) => write!(f, "name or designation \"{}\"", s),
        }
    }
}

/// Classify a command-line token.
///
/// Integers between the NAIFID bounds (exclusive) are NAIFIDs, all other
/// integers are catalog numbers. Integers that do not fit an `i64` fall
/// through to a name lookup.
pub fn classify(token: &str) -> Query {
    let token = token.trim();

    if DECIMAL.is_match(token) {
        return Query::Rejected;
    }

    if INTEGER.is_match(token) {
        if let Ok(n) = token.parse::<i64>() {
            return if n > NAIF_ID_LOWER && n < NAIF_ID_UPPER {
                Query::NaifId(n)
            } else {
                Query::CatalogNumber(n)
            };
        }
    }

    Query::NameOrDesignation(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("64", Query::CatalogNumber(64))]
    #[case("1", Query::CatalogNumber(1))]
    #[case("0", Query::CatalogNumber(0))]
    #[case("+16", Query::CatalogNumber(16))]
    #[case("-5", Query::CatalogNumber(-5))]
    #[case("2000000", Query::CatalogNumber(2_000_000))]
    #[case("2000001", Query::NaifId(2_000_001))]
    #[case("2225088", Query::NaifId(2_225_088))]
    #[case("49999999", Query::NaifId(49_999_999))]
    #[case("50000000", Query::CatalogNumber(50_000_000))]
    #[case("50000001", Query::CatalogNumber(50_000_001))]
    #[case(" 79 ", Query::CatalogNumber(79))]
    fn test_integer_classification(#[case] token: &str, #[case] expected: Query) {
        assert_eq!(classify(token), expected);
    }

    #[rstest]
    #[case("64.5")]
    #[case("64.")]
    #[case("-1.25")]
    #[case("+3.0e5")]
    fn test_decimals_rejected(#[case] token: &str) {
        assert!(classify(token).is_rejected());
    }

    #[rstest]
    #[case("Psyche")]
    #[case("1976 YG")]
    #[case("2007 Or10")]
    #[case("Prokof'ev")]
    #[case("G!kun||'homdima")]
    #[case("Čapek")]
    #[case("99999999999999999999999")]
    #[case("١٦")]
    fn test_names_and_designations(#[case] token: &str) {
        assert_eq!(
            classify(token),
            Query::NameOrDesignation(token.to_string())
        );
    }

    #[test]
    fn test_naif_range_boundaries() {
        for n in [1_i64, 16, 1_999_999, 2_000_000, 50_000_000, 123_456_789] {
            assert_eq!(classify(&n.to_string()), Query::CatalogNumber(n));
        }
        for n in [2_000_001_i64, 20_000_000, 49_999_999] {
            assert_eq!(classify(&n.to_string()), Query::NaifId(n));
        }
    }
}
