//! Output normalization applied before comparison.
//!
//! Captured output is made portable across platforms: double quotes are
//! stripped, CRLF line endings are collapsed, surrounding whitespace is
//! trimmed. Quotes go first and a run of carriage returns before a line feed
//! collapses as a whole, so normalizing twice never changes the result.
//!
//! Expected fixtures only get their whitespace trimmed. Quotes in an expected
//! fixture are kept, so a fixture authored with literal `"` characters can
//! never match.

use std::iter;

/// Normalize the raw text captured from the executable under test.
pub fn normalize_output(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_cr = 0;

    for ch in raw.chars().filter(|&c| c != '"') {
        match ch {
            '\r' => pending_cr += 1,
            '\n' => {
                pending_cr = 0;
                out.push('\n');
            }
            other => {
                out.extend(iter::repeat_n('\r', pending_cr));
                pending_cr = 0;
                out.push(other);
            }
        }
    }
    out.extend(iter::repeat_n('\r', pending_cr));

    out.trim().to_string()
}

/// Normalize the contents of an expected-output fixture.
pub fn normalize_expected(raw: &str) -> &str {
    raw.trim()
}
