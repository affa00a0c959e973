//! Text header parsing for the header-based detector format family.
//!
//! Headers are a bounded ASCII block: a line containing `{`, zero or more
//! `KEY=VALUE;` lines, and a line containing `}`. Keys are stored uppercased
//! so later lookups are independent of the file's original casing. The parser
//! stops at the first line containing the closing delimiter and never reads
//! into the pixel payload.

use std::collections::HashMap;
use std::io::{self, BufRead};

use crate::util::{DiffraktError, DiffraktResult};

/// Upper bound on bytes scanned while looking for the header delimiters, so a
/// binary file misidentified as header-based cannot be scanned to its end.
const MAX_HEADER_SCAN_BYTES: u64 = 65_536;

/// Case-normalized `KEY -> VALUE` mapping extracted from a file header.
///
/// Built once per file and discarded after decode parameters are extracted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: HashMap<String, String>,
}

impl HeaderMap {
    /// Parses a brace-delimited header block from `reader`.
    ///
    /// A stream that ends before the closing delimiter surfaces an
    /// `Io { kind: UnexpectedEof, .. }` error; no partial map is returned.
    pub fn parse<R: BufRead>(reader: R) -> DiffraktResult<Self> {
        let mut limited = reader.take(MAX_HEADER_SCAN_BYTES);
        let mut entries = HashMap::new();
        let mut line = String::new();
        let mut found_open = false;

        loop {
            line.clear();
            let read = limited.read_line(&mut line)?;
            if read == 0 {
                return Err(DiffraktError::Io {
                    kind: io::ErrorKind::UnexpectedEof,
                    reason: if found_open {
                        "header closing delimiter not found".to_string()
                    } else {
                        "header opening delimiter not found".to_string()
                    },
                });
            }
            if !found_open {
                if line.contains('{') {
                    found_open = true;
                }
                continue;
            }
            if line.contains('}') {
                break;
            }
            parse_line(&line, &mut entries);
        }

        Ok(Self { entries })
    }

    /// Returns the value for `key`, matched case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Returns the value for `key` or a `MissingHeaderKey` error.
    pub fn require(&self, key: &'static str) -> DiffraktResult<&str> {
        self.get(key)
            .ok_or(DiffraktError::MissingHeaderKey { key })
    }

    /// Returns the value for `key` parsed as `T`.
    pub fn require_parsed<T: std::str::FromStr>(&self, key: &'static str) -> DiffraktResult<T> {
        let value = self.require(key)?;
        value.parse().map_err(|_| DiffraktError::MalformedHeader {
            reason: format!("{key} value {value:?} is unparsable"),
        })
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the header holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over stored `(key, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Splits one interior header line into `key=value` statements.
///
/// Statements are separated by `;`. A statement with no `=` stores the key
/// with value `"1"`. Surrounding whitespace is tolerated on both sides.
fn parse_line(line: &str, entries: &mut HashMap<String, String>) {
    for statement in line.split(';') {
        let mut parts = statement.splitn(2, '=');
        let key_part = parts.next().unwrap_or("");
        let key = match key_part.split_whitespace().next() {
            Some(token) => token,
            None => continue,
        };
        let value = parts
            .next()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("1");
        entries.insert(key.to_ascii_uppercase(), value.to_string());
    }
}
