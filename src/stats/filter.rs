use super::{StatsError, StatsResult};
use chrono::{DateTime, NaiveDate, Utc};

/// Parse a user identifier supplied by a client.
///
/// Identifiers are positive integers assigned by the database.
pub fn parse_user_id(raw: &str) -> StatsResult<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StatsError::InvalidInput("userId is required".to_string()));
    }

    match trimmed.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(StatsError::InvalidInput(format!(
            "userId '{}' is not a valid identifier",
            raw
        ))),
    }
}

/// Inclusive calendar-date range, either side optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> StatsResult<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(StatsError::InvalidInput(format!(
                    "startDate {} is after endDate {}",
                    start, end
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// Build a range from raw query-string values
    pub fn parse(start: Option<&str>, end: Option<&str>) -> StatsResult<Self> {
        let start = parse_date("startDate", start)?;
        let end = parse_date("endDate", end)?;
        Self::new(start, end)
    }

    /// First instant included by the range
    pub fn start_bound(&self) -> Option<DateTime<Utc>> {
        self.start
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Last instant included by the range, the whole end day counts
    pub fn end_bound(&self) -> Option<DateTime<Utc>> {
        self.end
            .and_then(|date| date.and_hms_nano_opt(23, 59, 59, 999_999_999))
            .map(|naive| naive.and_utc())
    }
}

/// Accepts `YYYY-MM-DD`, or an RFC 3339 timestamp whose UTC date is used.
/// Blank values count as absent.
fn parse_date(field: &str, raw: Option<&str>) -> StatsResult<Option<NaiveDate>> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Some(date));
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| Some(dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| {
            StatsError::InvalidInput(format!(
                "{} '{}' is not an ISO-8601 date (expected YYYY-MM-DD)",
                field, value
            ))
        })
}
