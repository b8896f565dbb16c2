use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::SourceTag;

/// Instrument classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentCategory {
    #[default]
    MajorIndex,
    Sector,
    PreciousMetal,
    Crypto,
    EquityRegion,
}

impl InstrumentCategory {
    /// Ranking board the category competes on.
    pub fn board(&self) -> Board {
        match self {
            Self::Sector => Board::Sector,
            Self::MajorIndex | Self::PreciousMetal | Self::Crypto | Self::EquityRegion => {
                Board::Major
            }
        }
    }
}

/// Ranking board. Instruments are only ranked against peers on the same board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Board {
    Major,
    Sector,
}

impl Board {
    pub const ALL: [Board; 2] = [Board::Major, Board::Sector];

    pub fn as_str(&self) -> &'static str {
        match self {
            Board::Major => "major",
            Board::Sector => "sector",
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one tracked instrument, loaded once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentSpec {
    /// Stable identifier (e.g. "000300", "XAU", "BTC")
    pub code: String,

    /// Display name
    pub name: String,

    #[serde(default)]
    pub category: InstrumentCategory,

    /// Which provider fetches this instrument
    pub source: SourceTag,
}

impl InstrumentSpec {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: InstrumentCategory,
        source: impl Into<SourceTag>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            category,
            source: source.into(),
        }
    }

    pub fn board(&self) -> Board {
        self.category.board()
    }
}
