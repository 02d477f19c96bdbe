use std::fmt;

use serde::{Deserialize, Serialize};

/// How a fracture trace ends relative to other traces and the outcrop edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Termination {
    /// Terminates without meeting another trace.
    #[default]
    #[serde(rename = "B")]
    Blind,
    /// Crosses another trace.
    #[serde(rename = "X")]
    Crossing,
    /// Terminates against another trace.
    #[serde(rename = "A")]
    Abutting,
    /// Runs off the edge of the mapped surface.
    #[serde(rename = "C")]
    Censored,
}

impl Termination {
    /// All labels in key-binding order (1–4).
    pub const ALL: [Self; 4] = [Self::Blind, Self::Crossing, Self::Abutting, Self::Censored];

    /// Single-character code used for labels and persisted files.
    #[must_use]
    pub fn code(self) -> char {
        match self {
            Self::Blind => 'B',
            Self::Crossing => 'X',
            Self::Abutting => 'A',
            Self::Censored => 'C',
        }
    }

    /// Parses a single-character code.
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Full name of the label.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Blind => "Blind",
            Self::Crossing => "Crossing",
            Self::Abutting => "Abutting",
            Self::Censored => "Censored",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for t in Termination::ALL {
            assert_eq!(Termination::from_code(t.code()), Some(t));
        }
        assert_eq!(Termination::from_code('Q'), None);
    }

    #[test]
    fn serializes_as_code() {
        let json = serde_json::to_string(&[Termination::Crossing, Termination::Censored]).unwrap();
        assert_eq!(json, r#"["X","C"]"#);
        let back: Vec<Termination> = serde_json::from_str(r#"["A","B"]"#).unwrap();
        assert_eq!(back, vec![Termination::Abutting, Termination::Blind]);
    }
}
