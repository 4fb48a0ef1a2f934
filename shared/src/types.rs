//! Common types used across the analytics layer

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Sentinel the presentation layer sends for "no constraint" on a select box
pub const ALL_SENTINEL: &str = "all";

/// A categorical filter choice: everything, or exactly one value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// `All` matches every value; `Only(v)` requires exact equality
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => expected == value,
        }
    }
}

impl<T> FromStr for Selection<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == ALL_SENTINEL {
            return Ok(Selection::All);
        }
        trimmed
            .parse()
            .map(Selection::Only)
            .map_err(|e: T::Err| e.to_string())
    }
}

impl<T: fmt::Display> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selection::All => serializer.serialize_str(ALL_SENTINEL),
            Selection::Only(value) => serializer.collect_str(value),
        }
    }
}

impl<'de, T> Deserialize<'de> for Selection<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(Selection::All),
            Some(s) => s.parse::<Selection<T>>().map_err(de::Error::custom),
        }
    }
}

/// Inclusive calendar date bounds; an unset side is unconstrained
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateBounds {
    #[serde(default, deserialize_with = "deserialize_bound")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_bound")]
    pub to: Option<NaiveDate>,
    /// Let records without a readable date through an active bound
    #[serde(default, rename = "includeUndated")]
    pub include_undated: bool,
}

impl DateBounds {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            from,
            to,
            include_undated: false,
        }
    }

    pub fn with_undated(mut self, include_undated: bool) -> Self {
        self.include_undated = include_undated;
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// An undated record passes when neither bound is set, or when
    /// `include_undated` is on
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(date) = date else {
            return self.include_undated;
        };
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Calendar layouts read from exports: ISO first, then the slash forms
/// spreadsheets write (`MM/DD/YYYY` before `YYYY/MM/DD`)
pub const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse a date with no time part in any of [`DATE_FORMATS`]
pub fn parse_date_only(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

/// Parse a calendar date from `YYYY-MM-DD` or an ISO-8601 datetime.
/// Only the date part is read.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let date_part = s.trim().split(['T', ' ']).next()?;
    parse_date_only(date_part)
}

fn deserialize_bound<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_calendar_date(s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date bound '{}'", s))),
    }
}

/// Sort direction for ranked tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

/// Time bucket granularity for trend charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Monthly,
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Granularity::Daily),
            "monthly" | "month" => Ok(Granularity::Monthly),
            other => Err(format!("unknown granularity '{}'", other)),
        }
    }
}

// ============================================================================
// Decimal helpers
// ============================================================================

/// Round half-up to `dp` decimal places (`2.5 -> 3`, `-2.5 -> -2`)
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    value.round_dp_with_strategy(dp, strategy)
}

/// `numerator / denominator`, or zero when the denominator is not positive
pub fn guarded_ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Sum that stops at the `Decimal` limits instead of overflowing
pub fn saturating_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Arithmetic mean of a sum over `count` items; zero for an empty group
pub fn mean(sum: Decimal, count: usize) -> Decimal {
    guarded_ratio(sum, Decimal::from(count))
}
