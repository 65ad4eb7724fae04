use crate::finance::ViewType;
use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A reporting window: one calendar month or one calendar year.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Month { year: i32, month: u32 },
    Year(i32),
}

impl Period {
    pub fn month(year: i32, month: u32) -> crate::Result<Self> {
        if !(1..=12).contains(&month) {
            bail!("Month must be between 1 and 12, got {month}");
        }
        Ok(Period::Month { year, month })
    }

    pub fn year(year: i32) -> Self {
        Period::Year(year)
    }

    /// The window immediately before this one. The month before January is December of the
    /// prior year.
    pub fn previous(&self) -> Self {
        match *self {
            Period::Month { year, month: 1 } => Period::Month {
                year: year - 1,
                month: 12,
            },
            Period::Month { year, month } => Period::Month {
                year,
                month: month - 1,
            },
            Period::Year(year) => Period::Year(year - 1),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Period::Month { year, month } => date.year() == year && date.month() == month,
            Period::Year(year) => date.year() == year,
        }
    }

    pub fn view_type(&self) -> ViewType {
        match self {
            Period::Month { .. } => ViewType::Monthly,
            Period::Year(_) => ViewType::Yearly,
        }
    }

    /// The first day of the window, usable as a reference date for label formatting.
    pub fn first_day(&self) -> Option<NaiveDate> {
        match *self {
            Period::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
            Period::Year(year) => NaiveDate::from_ymd_opt(year, 1, 1),
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            Period::Year(year) => write!(f, "{year:04}"),
        }
    }
}

/// Parses `YYYY-MM` as a month and `YYYY` as a year. `YYYYMM` is also accepted, which is how
/// month windows are named in query strings.
impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (year, month) = match s.split_once('-') {
            Some((y, m)) => (y, Some(m)),
            None if s.len() == 6 && s.is_ascii() => (&s[..4], Some(&s[4..])),
            None => (s, None),
        };
        let year: i32 = year
            .parse()
            .with_context(|| format!("Invalid year in period '{s}'"))?;
        match month {
            Some(m) => {
                let month: u32 = m
                    .parse()
                    .with_context(|| format!("Invalid month in period '{s}'"))?;
                Period::month(year, month)
            }
            None => Ok(Period::year(year)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::date;

    #[test]
    fn test_parse() {
        assert_eq!(
            Period::from_str("2024-05").unwrap(),
            Period::Month {
                year: 2024,
                month: 5
            }
        );
        assert_eq!(
            Period::from_str("202405").unwrap(),
            Period::Month {
                year: 2024,
                month: 5
            }
        );
        assert_eq!(Period::from_str("2024").unwrap(), Period::Year(2024));
        assert!(Period::from_str("2024-13").is_err());
        assert!(Period::from_str("May").is_err());
    }

    #[test]
    fn test_previous_rolls_over_year() {
        let january = Period::month(2024, 1).unwrap();
        assert_eq!(january.previous(), Period::month(2023, 12).unwrap());
        assert_eq!(
            Period::month(2024, 5).unwrap().previous(),
            Period::month(2024, 4).unwrap()
        );
        assert_eq!(Period::Year(2024).previous(), Period::Year(2023));
    }

    #[test]
    fn test_contains_and_display() {
        let may = Period::month(2024, 5).unwrap();
        assert!(may.contains(date("2024-05-31")));
        assert!(!may.contains(date("2023-05-31")));
        assert!(Period::Year(2024).contains(date("2024-01-01")));
        assert_eq!(may.to_string(), "2024-05");
        assert_eq!(Period::Year(2024).to_string(), "2024");
        assert_eq!(may.first_day(), Some(date("2024-05-01")));
    }
}
