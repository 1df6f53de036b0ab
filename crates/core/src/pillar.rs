//! Pillar category codes.
//!
//! Each pass uses the template image belonging to one pillar; `Sutd` is the
//! generic fallback template.

/// Fixed set of pillar codes selecting a template image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pillar {
    Asd,
    Csd,
    Esd,
    Epd,
    Dai,
    Sutd,
}

/// All valid pillar code strings, for error messages.
const VALID_PILLAR_STRINGS: &[&str] = &["ASD", "CSD", "ESD", "EPD", "DAI", "SUTD"];

/// Error returned when a pillar code string is not recognized.
#[derive(Debug, thiserror::Error)]
#[error("Invalid pillar code '{code}'. Must be one of: {}", VALID_PILLAR_STRINGS.join(", "))]
pub struct InvalidPillar {
    /// The rejected input.
    pub code: String,
}

impl Pillar {
    /// Every pillar, in declaration order.
    pub const ALL: [Pillar; 6] = [
        Pillar::Asd,
        Pillar::Csd,
        Pillar::Esd,
        Pillar::Epd,
        Pillar::Dai,
        Pillar::Sutd,
    ];

    /// Return the pillar code as the uppercase string used in filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asd => "ASD",
            Self::Csd => "CSD",
            Self::Esd => "ESD",
            Self::Epd => "EPD",
            Self::Dai => "DAI",
            Self::Sutd => "SUTD",
        }
    }
}

impl std::str::FromStr for Pillar {
    type Err = InvalidPillar;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASD" => Ok(Self::Asd),
            "CSD" => Ok(Self::Csd),
            "ESD" => Ok(Self::Esd),
            "EPD" => Ok(Self::Epd),
            "DAI" => Ok(Self::Dai),
            "SUTD" => Ok(Self::Sutd),
            _ => Err(InvalidPillar {
                code: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
