use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::ValidationError;

/// Calendar bucket resolutions supported by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Monthly,
    Quarterly,
    Annual,
}

impl Timeframe {
    pub const ALL: [Self; 3] = [Self::Monthly, Self::Quarterly, Self::Annual];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annual => "annual",
        }
    }

    /// Last calendar day of the bucket containing `date`.
    ///
    /// Daily bars whose dates map to the same bucket end belong to the same
    /// aggregated bar, and the bucket end labels the output.
    pub fn bucket_end(self, date: Date) -> Date {
        let year = date.year();
        let end_month = match self {
            Self::Monthly => date.month(),
            Self::Quarterly => {
                let quarter_end = ((u8::from(date.month()) - 1) / 3) * 3 + 3;
                Month::try_from(quarter_end).expect("quarter end is a valid month")
            }
            Self::Annual => Month::December,
        };

        let last_day = time::util::days_in_year_month(year, end_month);
        Date::from_calendar_date(year, end_month, last_day)
            .expect("bucket end is a valid calendar date")
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "annual" => Ok(Self::Annual),
            other => Err(ValidationError::InvalidTimeframe {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).expect("valid test date")
    }

    #[test]
    fn parses_timeframe() {
        let timeframe = Timeframe::from_str("quarterly").expect("must parse");
        assert_eq!(timeframe, Timeframe::Quarterly);
    }

    #[test]
    fn rejects_invalid_timeframe() {
        let err = Timeframe::from_str("weekly").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidTimeframe { .. }));
    }

    #[test]
    fn monthly_bucket_ends_on_last_day_of_month() {
        let end = Timeframe::Monthly.bucket_end(date(2021, Month::January, 4));
        assert_eq!(end, date(2021, Month::January, 31));
    }

    #[test]
    fn monthly_bucket_handles_leap_february() {
        let end = Timeframe::Monthly.bucket_end(date(2020, Month::February, 14));
        assert_eq!(end, date(2020, Month::February, 29));
    }

    #[test]
    fn quarterly_bucket_ends_on_quarter_boundary() {
        let end = Timeframe::Quarterly.bucket_end(date(2021, Month::May, 17));
        assert_eq!(end, date(2021, Month::June, 30));

        let end = Timeframe::Quarterly.bucket_end(date(2021, Month::October, 1));
        assert_eq!(end, date(2021, Month::December, 31));
    }

    #[test]
    fn annual_bucket_ends_on_december_31() {
        let end = Timeframe::Annual.bucket_end(date(2015, Month::March, 2));
        assert_eq!(end, date(2015, Month::December, 31));
    }
}
