//! Index record parsing and formatting
//!
//! A line of `DASTCOM.IDX` looks like
//!
//! ```text
//!     16 Psyche,2000016,A852 FA,
//! ```
//!
//! Field 0 holds the catalog number followed by the name, field 1 the NAIFID,
//! and the following fields the alternate designations up to the first empty
//! one.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Last field position scanned for alternate designations
pub const MAX_ALTERNATE_FIELD: usize = 15;

lazy_static! {
    /// A bare provisional or survey designation, e.g. `2015 TC25` or `2040 P-L`
    static ref PROVISIONAL: Regex =
        Regex::new(r"^[0-9]{4} (?:[A-Z]{2}[0-9]*|P-L|T-[1-3])$").unwrap();
}

/// One body from the index file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// IAU catalog number, absent for unnumbered bodies
    pub number: Option<u64>,
    /// Name, or provisional designation when the body is unnamed
    pub name: String,
    /// NAIFID exactly as written in the index
    pub naif_id: String,
    /// Alternate designations in file order
    pub alternates: Vec<String>,
}

impl Record {
    /// Parse one index line. Lines with fewer than two fields are not records.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 2 {
            return None;
        }

        let (number, name) = split_number_and_name(fields[0]);

        let alternates = fields
            .iter()
            .take(MAX_ALTERNATE_FIELD + 1)
            .skip(2)
            .map(|field| field.trim())
            .take_while(|field| !field.is_empty())
            .map(String::from)
            .collect();

        Some(Self {
            number,
            name,
            naif_id: fields[1].trim().to_string(),
            alternates,
        })
    }
}

/// Split field 0 into catalog number and name.
///
/// The number is the leading digit run, provided it stands alone as a word;
/// the name is what remains after removing that run once. A field that is
/// entirely a provisional designation has no number.
pub fn split_number_and_name(field: &str) -> (Option<u64>, String) {
    let field = field.trim();
    if PROVISIONAL.is_match(field) {
        return (None, field.to_string());
    }

    let digits_end = field
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(field.len());
    let (digits, rest) = field.split_at(digits_end);

    // "1P/Halley" style names start with digits that are not a catalog number
    let stands_alone = rest.is_empty() || rest.starts_with(char::is_whitespace);
    if digits.is_empty() || !stands_alone {
        return (None, field.to_string());
    }

    match digits.parse::<u64>() {
        Ok(number) => {
            let name = field.strip_prefix(digits).unwrap_or(field).trim();
            (Some(number), name.to_string())
        }
        Err(_) => (None, field.to_string()),
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.number {
            Some(number) => writeln!(f, "Number: {}", number)?,
            None => writeln!(f, "Number:")?,
        }
        writeln!(f, "Name/Designation: {}", self.name)?;
        write!(f, "NAIFID: {}", self.naif_id)?;
        if !self.alternates.is_empty() {
            write!(f, "\nAlternative designations: {}", self.alternates.join(", "))?;
        }
        Ok(())
    }
}
