//! Fixture discovery
//!
//! Fixtures live in a single directory and follow a fixed naming convention:
//!
//! - `test<N>_input.txt` - the text fed to the executable under test
//! - `test<N>_output.txt` - the text it is expected to print
//!
//! `<N>` is the fixture index. Pairs are returned in ascending index order:
//! all-digit indices compare numerically (`test2` before `test10`), anything
//! else compares lexicographically after the numeric ones.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::test_interfaces::TestError;

const FIXTURE_PREFIX: &str = "test";
const INPUT_SUFFIX: &str = "_input.txt";
const OUTPUT_SUFFIX: &str = "_output.txt";

/// The segment of a fixture filename between `test` and `_input`/`_output`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixtureIndex(String);

impl FixtureIndex {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digits with leading zeros removed, if the index is purely numeric.
    fn numeric_digits(&self) -> Option<&str> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits = self.0.trim_start_matches('0');
        Some(if digits.is_empty() { "0" } else { digits })
    }
}

impl Ord for FixtureIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric_digits(), other.numeric_digits()) {
            (Some(a), Some(b)) => a
                .len()
                .cmp(&b.len())
                .then_with(|| a.cmp(b))
                .then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for FixtureIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FixtureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", FIXTURE_PREFIX, self.0)
    }
}

/// An input fixture and the expected-output fixture sharing its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixturePair {
    pub index: FixtureIndex,
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FixtureKind {
    Input,
    Output,
}

/// Classify a filename against the `test*_input.txt` / `test*_output.txt` patterns.
fn classify(file_name: &str) -> Option<(FixtureKind, FixtureIndex)> {
    let rest = file_name.strip_prefix(FIXTURE_PREFIX)?;
    if let Some(index) = rest.strip_suffix(INPUT_SUFFIX) {
        Some((FixtureKind::Input, FixtureIndex::new(index)))
    } else {
        rest.strip_suffix(OUTPUT_SUFFIX)
            .map(|index| (FixtureKind::Output, FixtureIndex::new(index)))
    }
}

/// Discover and pair the fixtures in `dir`.
///
/// A missing directory yields no pairs. Differing input/output counts and
/// indices present on only one side are configuration errors.
pub fn discover_fixtures(dir: &Path) -> Result<Vec<FixturePair>, TestError> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "fixture directory not found; no fixtures collected");
        return Ok(Vec::new());
    }

    let read_dir_error = |source| TestError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut inputs: BTreeMap<FixtureIndex, PathBuf> = BTreeMap::new();
    let mut outputs: BTreeMap<FixtureIndex, PathBuf> = BTreeMap::new();

    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let classified = {
            let name = file_name.to_string_lossy();
            if matches!(name, Cow::Owned(_)) {
                debug!(fixture = %path.display(), "fixture name is not valid UTF-8; matching it lossily");
            }
            classify(&name)
        };
        match classified {
            Some((FixtureKind::Input, index)) => {
                debug!(fixture = %path.display(), "input fixture");
                inputs.insert(index, path);
            }
            Some((FixtureKind::Output, index)) => {
                debug!(fixture = %path.display(), "output fixture");
                outputs.insert(index, path);
            }
            None => {}
        }
    }

    if inputs.len() != outputs.len() {
        return Err(TestError::FixtureCountMismatch {
            inputs: inputs.len(),
            outputs: outputs.len(),
        });
    }

    let mut pairs = Vec::with_capacity(inputs.len());
    for (index, input) in inputs {
        let Some(output) = outputs.remove(&index) else {
            return Err(TestError::UnpairedFixture {
                fixture: format!("{index}{INPUT_SUFFIX}"),
            });
        };
        pairs.push(FixturePair { index, input, output });
    }

    debug!(count = pairs.len(), dir = %dir.display(), "fixture pairs collected");
    Ok(pairs)
}
