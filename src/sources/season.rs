use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A football season identified by the calendar year it starts in.
///
/// Every source spells seasons differently; the renderers below produce the
/// form each one expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Season {
    start_year: i32,
}

impl Season {
    pub fn new(start_year: i32) -> Self {
        Season { start_year }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.start_year + 1
    }

    /// `2023/2024`
    pub fn fotmob(&self) -> String {
        format!("{}/{}", self.start_year, self.end_year())
    }

    /// `2023-2024`
    pub fn fbref(&self) -> String {
        format!("{}-{}", self.start_year, self.end_year())
    }

    /// `2023/24`
    pub fn official(&self) -> String {
        format!("{}/{:02}", self.start_year, self.end_year() % 100)
    }

    /// `2023`
    pub fn transfermarkt(&self) -> String {
        self.start_year.to_string()
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fotmob())
    }
}

impl FromStr for Season {
    type Err = AppError;

    /// Accepts `2023`, `2023/2024`, `2023-2024` and `2023/24`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::config_error(format!("Invalid season '{s}'"));
        let s = s.trim();
        let (start, end) = match s.split_once(['/', '-']) {
            Some((start, end)) => (start, Some(end)),
            None => (s, None),
        };

        let start_year: i32 = start.parse().map_err(|_| invalid())?;
        if start.len() != 4 {
            return Err(invalid());
        }

        if let Some(end) = end {
            let end_year: i32 = end.parse().map_err(|_| invalid())?;
            let expected = match end.len() {
                4 => start_year + 1,
                2 => (start_year + 1) % 100,
                _ => return Err(invalid()),
            };
            if end_year != expected {
                return Err(invalid());
            }
        }

        Ok(Season::new(start_year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_renderings() {
        let season = Season::new(2023);
        assert_eq!(season.fotmob(), "2023/2024");
        assert_eq!(season.fbref(), "2023-2024");
        assert_eq!(season.official(), "2023/24");
        assert_eq!(season.transfermarkt(), "2023");
        assert_eq!(season.to_string(), "2023/2024");
    }

    #[test]
    fn test_official_rendering_across_century() {
        assert_eq!(Season::new(1999).official(), "1999/00");
    }

    #[test]
    fn test_parse_accepted_forms() {
        for input in ["2023", "2023/2024", "2023-2024", "2023/24", " 2023-24 "] {
            assert_eq!(input.parse::<Season>().unwrap(), Season::new(2023), "{input}");
        }
    }

    #[test]
    fn test_parse_rejects_inconsistent_years() {
        assert!("2023/2025".parse::<Season>().is_err());
        assert!("2023/26".parse::<Season>().is_err());
        assert!("23/24".parse::<Season>().is_err());
        assert!("season".parse::<Season>().is_err());
        assert!("2023/202".parse::<Season>().is_err());
    }
}
