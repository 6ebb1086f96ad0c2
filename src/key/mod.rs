//! Canonical string form of job/program/step identifiers.
//!
//! An identifier is either a bare scalar or a composite of scalars
//! (`[group, number, step]`). The key form joins the significant segments
//! with `@`:
//!
//! ```txt
//! ["G1", 12, 3]  ->  "G1@12@3"
//! ["G1", 12, 0]  ->  "G1@12"      trailing "" / 0 segments are dropped
//! [" ", 7]       ->  "@7"         " " marks a deliberately blank segment
//! "J-100"        ->  "J-100"
//! ```
//!
//! Decoding is lossy in one direction: a composite that trims down to a
//! single segment decodes as a bare scalar.

pub mod error;

use std::{fmt, str::FromStr};

use error::KeyError;
use serde::{Deserialize, Serialize};

pub const SEPARATOR: char = '@';
/// Segment value standing in for a blank (but present) segment
pub const BLANK: &str = " ";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Scalar(Segment),
    Composite(Vec<Segment>),
}

impl Segment {
    /// `""` and `0` are insignificant when trailing
    pub fn is_sentinel(&self) -> bool {
        match self {
            Self::Int(i) => *i == 0,
            Self::Str(s) => s.is_empty(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Str(s) if s == BLANK)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Segment {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Segment {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Segment {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl Id {
    /// Scalars are treated as one-element composites
    pub fn segments(&self) -> &[Segment] {
        match self {
            Self::Scalar(seg) => std::slice::from_ref(seg),
            Self::Composite(segs) => segs,
        }
    }

    pub fn head(&self) -> Option<&Segment> {
        self.segments().first()
    }
}

impl From<Segment> for Id {
    fn from(value: Segment) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<Vec<Segment>> for Id {
    fn from(value: Vec<Segment>) -> Self {
        Self::Composite(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for Id {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

pub fn encode(id: &Id) -> String {
    let segments = id.segments();
    let len = segments
        .iter()
        .rposition(|seg| !seg.is_sentinel())
        .map_or(0, |last| last + 1);

    let mut res = String::new();
    for (i, seg) in segments[..len].iter().enumerate() {
        if i > 0 {
            res.push(SEPARATOR);
        }
        if !seg.is_blank() {
            res.push_str(&seg.to_string());
        }
    }
    res
}

/// Text form of an optional identifier, `""` for none. Scalars are
/// written as is, only composites are trimmed.
pub fn id_to_string(id: Option<&Id>) -> String {
    match id {
        None => String::new(),
        Some(Id::Scalar(seg)) => seg.to_string(),
        Some(id @ Id::Composite(_)) => encode(id),
    }
}

/// Single-part keys come back as bare scalars, never as one-element composites
pub fn decode(s: &str) -> Result<Id, KeyError> {
    let parts: Vec<&str> = s.split(SEPARATOR).collect();
    if parts.len() == 1 {
        return Ok(Id::Scalar(Segment::Str(s.to_string())));
    }

    let mut segments = Vec::with_capacity(parts.len());
    for (i, part) in parts.into_iter().enumerate() {
        if i == 0 {
            segments.push(Segment::Str(match part {
                "" => BLANK.to_string(),
                _ => part.to_string(),
            }));
            continue;
        }
        let value = part
            .parse::<i64>()
            .map_err(|_| KeyError::NotAnInteger(i, s.to_string(), part.to_string()))?;
        segments.push(Segment::Int(value));
    }
    Ok(Id::Composite(segments))
}

/// A composite equals a scalar when its head does
pub fn equals(x: &Id, y: &Id) -> bool {
    if x == y {
        return true;
    }
    match (x, y) {
        (Id::Composite(segs), Id::Scalar(seg)) | (Id::Scalar(seg), Id::Composite(segs)) => {
            segs.first() == Some(seg)
        }
        _ => false,
    }
}
