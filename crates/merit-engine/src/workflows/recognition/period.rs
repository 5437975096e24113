use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One rating cycle, addressed by its `YYYY-MM` token (e.g. `2025-03`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

const MONTH_LABELS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodParseError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodParseError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// All twelve cycles of a calendar year, January first.
    pub fn months_of(year: i32) -> impl Iterator<Item = Period> {
        (1..=12).map(move |month| Period { year, month })
    }

    /// Human-facing label used by the portal, e.g. `Maret 2025`.
    pub fn long_label(&self) -> String {
        let name = MONTH_LABELS[(self.month - 1) as usize];
        format!("{} {}", name, self.year)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let (year_part, month_part) = trimmed
            .split_once('-')
            .ok_or_else(|| PeriodParseError::Malformed(trimmed.to_string()))?;

        let year = year_part
            .parse::<i32>()
            .map_err(|_| PeriodParseError::Malformed(trimmed.to_string()))?;
        let month = month_part
            .parse::<u32>()
            .map_err(|_| PeriodParseError::Malformed(trimmed.to_string()))?;

        Period::new(year, month)
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodParseError {
    #[error("period '{0}' is not a YYYY-MM token")]
    Malformed(String),
    #[error("month {0} is outside 1..=12")]
    MonthOutOfRange(u32),
}
