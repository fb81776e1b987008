//! Line-by-line matching of index records against a query

use std::io::BufRead;

use log::{debug, warn};
use regex::{Regex, RegexBuilder};

use super::query::Query;
use super::record::Record;
use crate::Result;

/// Compiled form of a [`Query`], ready to test index lines
#[derive(Debug)]
pub struct Matcher {
    kind: MatchKind,
}

#[derive(Debug)]
enum MatchKind {
    Number(u64, String),
    NaifId(String),
    Word(Regex),
    Nothing,
}

impl Matcher {
    pub fn new(query: &Query) -> Self {
        let kind = match query {
            Query::CatalogNumber(n) => match u64::try_from(*n) {
                Ok(n) => MatchKind::Number(n, n.to_string()),
                Err(_) => MatchKind::Nothing,
            },
            Query::NaifId(n) => MatchKind::NaifId(n.to_string()),
            Query::NameOrDesignation(s) if !s.trim().is_empty() => {
                match whole_word_pattern(s.trim()) {
                    Ok(pattern) => MatchKind::Word(pattern),
                    Err(e) => {
                        warn!("Cannot search for {:?}: {}", s, e);
                        MatchKind::Nothing
                    }
                }
            }
            Query::NameOrDesignation(_) | Query::Rejected => MatchKind::Nothing,
        };
        Self { kind }
    }

    /// Parse and return the record on `line` if it satisfies the query
    pub fn match_line(&self, line: &str) -> Option<Record> {
        match &self.kind {
            MatchKind::Number(n, text) => {
                if !line.trim_start().starts_with(text.as_str()) {
                    return None;
                }
                Record::parse(line).filter(|record| record.number == Some(*n))
            }
            MatchKind::NaifId(text) => {
                if !line.contains(text.as_str()) {
                    return None;
                }
                Record::parse(line).filter(|record| record.naif_id == *text)
            }
            MatchKind::Word(pattern) => {
                if !pattern.is_match(line) {
                    return None;
                }
                Record::parse(line)
            }
            MatchKind::Nothing => None,
        }
    }
}

/// Case-insensitive pattern matching `word` only where it is delimited by
/// line boundaries or characters that are neither letters nor digits.
fn whole_word_pattern(word: &str) -> std::result::Result<Regex, regex::Error> {
    let pattern = format!(
        r"(?:^|[^\p{{L}}\p{{N}}]){}(?:$|[^\p{{L}}\p{{N}}])",
        regex::escape(word)
    );
    RegexBuilder::new(&pattern).case_insensitive(true).build()
}

/// Scan `reader` from start to end and collect every record matching `query`
pub fn find<R: BufRead>(mut reader: R, query: &Query) -> Result<Vec<Record>> {
    let matcher = Matcher::new(query);
    let mut records = Vec::new();
    let mut buffer = Vec::new();
    let mut line_count = 0usize;

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        line_count += 1;

        let line = String::from_utf8_lossy(&buffer);
        if let Some(record) = matcher.match_line(&line) {
            records.push(record);
        }
    }

    debug!(
        "Scanned {} lines for {}, {} match(es)",
        line_count,
        query,
        records.len()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LINES: &str = "\
    11 Parthenope,2000011,A850 JA,
   110 Lydia,2000110,A870 HA,
   211 Isolda,2000211,A879 XA,
  1011 Laodamia,2001011,1924 PK,
     1 Ceres,2000001,A801 AA,A899 OF,1943 XB,
 95954 Ceresia,2095954,2002 FE6,
        2015 TC25,3730985,,
";

    fn lookup(token: &str) -> Vec<Record> {
        find(Cursor::new(LINES), &crate::index::classify(token)).unwrap()
    }

    #[test]
    fn test_number_is_exact() {
        let records = lookup("11");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Parthenope");
    }

    #[test]
    fn test_number_does_not_match_designation_year() {
        assert!(lookup("2015").is_empty());
    }

    #[test]
    fn test_naif_id_is_exact() {
        let records = lookup("2000011");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].number, Some(11));

        assert!(lookup("2000012").is_empty());
    }

    #[test]
    fn test_name_is_whole_word() {
        let records = lookup("ceres");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].number, Some(1));

        assert!(lookup("Cere").is_empty());
    }

    #[test]
    fn test_designation_in_alternate_field() {
        let records = lookup("1924 pk");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Laodamia");
    }

    #[test]
    fn test_negative_and_empty_queries_match_nothing() {
        assert!(lookup("-11").is_empty());
        assert!(find(Cursor::new(LINES), &Query::NameOrDesignation("  ".into()))
            .unwrap()
            .is_empty());
        assert!(find(Cursor::new(LINES), &Query::Rejected).unwrap().is_empty());
    }

    #[test]
    fn test_oversized_name_matches_nothing() {
        let token = "Ceres".repeat(20_000);
        let records = find(Cursor::new(LINES), &Query::NameOrDesignation(token)).unwrap();
        assert!(records.is_empty());

        // A later lookup in the same run still works
        assert_eq!(lookup("Ceres").len(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let mut data = b"  1234 Bad\xff Name,2001234,,\n".to_vec();
        data.extend_from_slice(LINES.as_bytes());
        let records = find(Cursor::new(data), &Query::CatalogNumber(11)).unwrap();
        assert_eq!(records.len(), 1);
    }
}
