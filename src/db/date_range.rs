use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Optional, independently bounded date range used to restrict exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Self {
        Self { from, to }
    }

    /// Human-readable description of the range, distinct for each
    /// combination of bounds.
    pub fn describe(&self) -> String {
        match (self.from, self.to) {
            (Some(from), Some(to)) => format!(
                "in the date range {} to {}",
                from.format(DATE_TIME_FORMAT),
                to.format(DATE_TIME_FORMAT)
            ),
            (Some(from), None) => format!("logged from {}", from.format(DATE_TIME_FORMAT)),
            (None, Some(to)) => format!("logged up to {}", to.format(DATE_TIME_FORMAT)),
            (None, None) => "for all dates".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_describe_distinguishes_every_bound_combination() {
        let both = DateRange::new(Some(at(1)), Some(at(5))).describe();
        let from_only = DateRange::new(Some(at(1)), None).describe();
        let to_only = DateRange::new(None, Some(at(5))).describe();
        let neither = DateRange::default().describe();

        assert_eq!(both, "in the date range 2024-03-01 08:30:00 to 2024-03-05 08:30:00");
        assert_eq!(from_only, "logged from 2024-03-01 08:30:00");
        assert_eq!(to_only, "logged up to 2024-03-05 08:30:00");
        assert_eq!(neither, "for all dates");
    }
}
