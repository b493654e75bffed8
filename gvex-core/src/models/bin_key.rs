use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::ExpandError;

/// Shuffle key for one genome-position bin: `(reference_name, bin index)`.
///
/// The wire form is `"<reference_name>:<bin>"`. Parsing splits on the last
/// `:` so contig names that themselves contain colons survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinKey {
    pub reference_name: String,
    pub bin: u64,
}

impl BinKey {
    pub fn new(reference_name: impl Into<String>, bin: u64) -> Self {
        BinKey {
            reference_name: reference_name.into(),
            bin,
        }
    }
}

impl Display for BinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.reference_name, self.bin)
    }
}

impl FromStr for BinKey {
    type Err = ExpandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (reference_name, bin) = s
            .rsplit_once(':')
            .ok_or_else(|| ExpandError::MalformedBinKey(s.to_string()))?;
        let bin = bin
            .parse()
            .map_err(|_| ExpandError::MalformedBinKey(s.to_string()))?;

        Ok(BinKey {
            reference_name: reference_name.to_string(),
            bin,
        })
    }
}
