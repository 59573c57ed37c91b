//! Line-oriented table scanning shared by all TetGen file kinds.
//!
//! A file is a header record followed by data records. `#` starts a
//! comment that runs to the end of the line; blank lines are skipped.

use std::str::FromStr;

use crate::error::{Result, TetgenError};

/// Sentinel TetGen writes for "no tetrahedron".
pub(crate) const NO_NEIGHBOR: i64 = -1;

/// One non-empty line, split on whitespace.
pub(crate) struct Record<'a> {
    pub file: &'static str,
    pub line: usize,
    pub tokens: Vec<&'a str>,
}

impl<'a> Record<'a> {
    pub fn error(&self, message: impl Into<String>) -> TetgenError {
        TetgenError::malformed(self.file, self.line, message)
    }

    /// Require a token count within `min..=max`.
    pub fn expect_len(&self, min: usize, max: usize) -> Result<()> {
        let n = self.tokens.len();
        if n < min || n > max {
            let expected = if min == max {
                format!("{min}")
            } else {
                format!("{min} to {max}")
            };
            return Err(self.error(format!("expected {expected} fields, found {n}")));
        }
        Ok(())
    }

    pub fn parse<T: FromStr>(&self, col: usize, what: &str) -> Result<T> {
        let token = self
            .tokens
            .get(col)
            .ok_or_else(|| self.error(format!("missing {what}")))?;
        token
            .parse()
            .map_err(|_| self.error(format!("invalid {what} '{token}'")))
    }

    /// Parse an index column and shift it to zero-based.
    pub fn index(&self, col: usize, base: u32, what: &str) -> Result<u32> {
        let raw: i64 = self.parse(col, what)?;
        raw.checked_sub(i64::from(base))
            .and_then(|i| u32::try_from(i).ok())
            .ok_or_else(|| self.error(format!("{what} {raw} out of range")))
    }

    /// Like [`Record::index`], with the `-1` sentinel mapped to `None`.
    pub fn optional_index(&self, col: usize, base: u32, what: &str) -> Result<Option<u32>> {
        let raw: i64 = self.parse(col, what)?;
        if raw == NO_NEIGHBOR {
            return Ok(None);
        }
        self.index(col, base, what).map(Some)
    }
}

/// Non-empty, comment-stripped records of `text`, with 1-based line numbers.
pub(crate) fn records<'a>(file: &'static str, text: &'a str) -> impl Iterator<Item = Record<'a>> {
    text.lines().enumerate().filter_map(move |(i, line)| {
        let content = line.split('#').next().unwrap_or_default();
        let tokens: Vec<&str> = content.split_whitespace().collect();
        (!tokens.is_empty()).then_some(Record {
            file,
            line: i + 1,
            tokens,
        })
    })
}

/// A parsed headed file: the header record and one row per declared index.
pub(crate) struct Table<'a, T> {
    pub header: Record<'a>,
    pub rows: Vec<T>,
    /// Index base of the records, either given or detected.
    pub base: u32,
}

/// Read a headed file whose records start with their own index.
///
/// With `base` unset, the first record's index (0 or 1) fixes it. Every
/// index in `base..base + count` must appear exactly once.
pub(crate) fn read_indexed<'a, T>(
    file: &'static str,
    text: &'a str,
    base: Option<u32>,
    mut parse_row: impl FnMut(&Record<'a>, u32) -> Result<T>,
) -> Result<Table<'a, T>> {
    let mut records = records(file, text);
    let header = records
        .next()
        .ok_or_else(|| TetgenError::malformed(file, 1, "missing header"))?;
    let count: usize = header.parse(0, "record count")?;
    // Every record takes at least two bytes, so larger counts are bogus.
    if count > text.len() {
        return Err(header.error(format!("record count {count} exceeds file size")));
    }

    let mut rows: Vec<Option<T>> = (0..count).map(|_| None).collect();
    let mut base = base;
    let mut last_line = header.line;
    for record in records {
        last_line = record.line;
        let raw: i64 = record.parse(0, "record index")?;
        let b = match base {
            Some(b) => b,
            None => {
                let detected = match raw {
                    0 => 0,
                    1 => 1,
                    _ => return Err(record.error(format!("first index {raw} is neither 0 nor 1"))),
                };
                base = Some(detected);
                detected
            }
        };
        let slot = raw
            .checked_sub(i64::from(b))
            .and_then(|i| usize::try_from(i).ok())
            .filter(|&i| i < count)
            .ok_or_else(|| record.error(format!("record index {raw} out of range (count {count})")))?;
        if rows[slot].is_some() {
            return Err(record.error(format!("duplicate record index {raw}")));
        }
        rows[slot] = Some(parse_row(&record, b)?);
    }

    let base = base.unwrap_or(0);
    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            row.ok_or_else(|| {
                TetgenError::malformed(
                    file,
                    last_line,
                    format!("record {} declared but missing", i as u64 + u64::from(base)),
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Table { header, rows, base })
}
