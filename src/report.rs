//! Printing lookup results
//!
//! Text output separates blocks with a line of `=`; JSON output writes one
//! object per query on its own line.

use std::io::Write;

use serde::Serialize;

use crate::index::Record;
use crate::Result;

/// Line printed before every result block and once at the end of a run
pub const SEPARATOR: &str = "===========================";

/// Write the text report for one query token
pub fn write_matches<W: Write>(out: &mut W, token: &str, records: &[Record]) -> Result<()> {
    if records.is_empty() {
        writeln!(out, "{}", SEPARATOR)?;
        writeln!(out, "No match for {}!", token)?;
        return Ok(());
    }

    if records.len() > 1 {
        writeln!(out, "Warning! Multiple matches!")?;
    }

    for record in records {
        writeln!(out, "{}", SEPARATOR)?;
        writeln!(out, "Object found for {}!", token)?;
        writeln!(out, "{}", record)?;
    }
    Ok(())
}

/// Write the closing separator
pub fn write_footer<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{}", SEPARATOR)?;
    Ok(())
}

#[derive(Serialize)]
struct QueryResult<'a> {
    query: &'a str,
    matches: &'a [Record],
}

/// Write the JSON report for one query token
pub fn write_json<W: Write>(out: &mut W, token: &str, records: &[Record]) -> Result<()> {
    let result = QueryResult {
        query: token,
        matches: records,
    };
    serde_json::to_writer(&mut *out, &result)?;
    writeln!(out)?;
    Ok(())
}
