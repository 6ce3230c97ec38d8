use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::DiaryError;

const FEED_DATE_FORMAT: &str = "%Y-%m-%d";
const DAY_MONTH_YEAR_FORMAT: &str = "%d/%m/%Y";

/// How watched dates are written into the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// Keep the feed's `YYYY-MM-DD` text as is.
    #[default]
    Iso,
    #[serde(rename = "dmy")]
    #[value(name = "dmy")]
    DayMonthYear,
}

impl DateStyle {
    pub fn name(self) -> &'static str {
        match self {
            Self::Iso => "iso",
            Self::DayMonthYear => "dmy",
        }
    }
}

/// Rewrite `YYYY-MM-DD` as `DD/MM/YYYY`.
pub fn to_day_month_year(date: &str) -> Result<String, DiaryError> {
    NaiveDate::parse_from_str(date.trim(), FEED_DATE_FORMAT)
        .map(|d| d.format(DAY_MONTH_YEAR_FORMAT).to_string())
        .map_err(|_| DiaryError::Format {
            kind: "date",
            value: date.to_string(),
        })
}

pub fn format_watched_date(date: &str, style: DateStyle) -> Result<String, DiaryError> {
    match style {
        DateStyle::Iso => Ok(date.to_string()),
        DateStyle::DayMonthYear => to_day_month_year(date),
    }
}
