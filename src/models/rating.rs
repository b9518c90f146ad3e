//! Ordinal similarity ratings and the records they produce

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed 5-point ordinal similarity scale
///
/// Serialized (JSON and CSV) as exactly the label strings shown to the
/// listener, so the result file is self-describing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    /// No audible difference from the original
    #[serde(rename = "1-identical")]
    Identical,
    /// Difference suspected but not reliably audible
    #[serde(rename = "2-near-identical")]
    NearIdentical,
    /// Audible but minor difference
    #[serde(rename = "3-slight-difference")]
    SlightDifference,
    /// Clearly audible difference
    #[serde(rename = "4-noticeable-difference")]
    NoticeableDifference,
    /// Strong degradation relative to the original
    #[serde(rename = "5-very-different")]
    VeryDifferent,
}

impl Rating {
    /// All scale points in ascending order of perceived difference
    pub const ALL: [Rating; 5] = [
        Rating::Identical,
        Rating::NearIdentical,
        Rating::SlightDifference,
        Rating::NoticeableDifference,
        Rating::VeryDifferent,
    ];

    /// The label written to the result file and shown in the UI
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Identical => "1-identical",
            Rating::NearIdentical => "2-near-identical",
            Rating::SlightDifference => "3-slight-difference",
            Rating::NoticeableDifference => "4-noticeable-difference",
            Rating::VeryDifferent => "5-very-different",
        }
    }

    /// Labels in scale order, for building selection widgets
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|r| r.as_str()).collect()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("Unknown rating label: {}", s))
    }
}

/// One submitted judgment: how close a method's variant sounds to the original
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
    /// Audio file name as listed under `original/`
    pub filename: String,
    /// Watermarking method (subfolder name)
    pub method: String,
    /// Listener's similarity judgment
    pub rating: Rating,
}

impl RatingRecord {
    pub fn new(filename: impl Into<String>, method: impl Into<String>, rating: Rating) -> Self {
        Self {
            filename: filename.into(),
            method: method.into(),
            rating,
        }
    }
}
