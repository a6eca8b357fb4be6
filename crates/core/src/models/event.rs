//! Events calendar records and their display formatting.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::EventId;

/// Format used by `datetime-local` form inputs.
pub const FORM_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A market, fair, or pop-up the business attends.
///
/// Times are local wall-clock times as entered in the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Event {
    /// Unique event ID.
    pub id: EventId,
    /// Event name.
    pub title: String,
    /// HTML description from the rich text editor.
    pub description: String,
    /// Optional poster or venue image.
    pub image_url: Option<String>,
    /// When the event opens.
    pub start_date: NaiveDateTime,
    /// When the event closes.
    pub end_date: NaiveDateTime,
}

impl Event {
    /// Date range such as `November 15th ~ 16th, 2025`.
    ///
    /// The start month is always shown. When the event crosses a year
    /// boundary both dates are written out in full.
    #[must_use]
    pub fn date_label(&self) -> String {
        let start = self.start_date;
        let end = self.end_date;
        let start_day = start.day();
        let end_day = end.day();

        if start.year() == end.year() {
            format!(
                "{} {start_day}{} ~ {end_day}{}, {}",
                start.format("%B"),
                ordinal_suffix(start_day),
                ordinal_suffix(end_day),
                start.year()
            )
        } else {
            format!(
                "{} {start_day}{}, {} ~ {} {end_day}{}, {}",
                start.format("%B"),
                ordinal_suffix(start_day),
                start.year(),
                end.format("%B"),
                ordinal_suffix(end_day),
                end.year()
            )
        }
    }

    /// Opening hours such as `10:00 am to 5:00 pm`.
    #[must_use]
    pub fn time_label(&self) -> String {
        format!(
            "{} to {}",
            self.start_date.format("%-I:%M %P"),
            self.end_date.format("%-I:%M %P")
        )
    }
}

const fn ordinal_suffix(day: u32) -> &'static str {
    if day > 3 && day < 21 {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Event fields accepted from the admin form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    /// Event name.
    pub title: String,
    /// HTML description.
    pub description: String,
    /// Optional poster or venue image.
    pub image_url: Option<String>,
    /// When the event opens.
    pub start_date: NaiveDateTime,
    /// When the event closes.
    pub end_date: NaiveDateTime,
}

impl EventDraft {
    /// Start a draft from an existing event.
    #[must_use]
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            image_url: event.image_url.clone(),
            start_date: event.start_date,
            end_date: event.end_date,
        }
    }

    /// Parse a `datetime-local` input value.
    ///
    /// Seconds are accepted but not required.
    ///
    /// # Errors
    ///
    /// Returns the chrono parse error if the value matches neither format.
    pub fn parse_form_datetime(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        let value = value.trim();
        NaiveDateTime::parse_from_str(value, FORM_DATETIME_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn event(start: &str, end: &str) -> Event {
        Event {
            id: EventId::new("e1"),
            title: "Winter Market".to_owned(),
            description: String::new(),
            image_url: None,
            start_date: EventDraft::parse_form_datetime(start).unwrap(),
            end_date: EventDraft::parse_form_datetime(end).unwrap(),
        }
    }

    #[test]
    fn test_date_label_same_year() {
        let event = event("2025-11-15T10:00", "2025-11-16T17:00");
        assert_eq!(event.date_label(), "November 15th ~ 16th, 2025");
    }

    #[test]
    fn test_date_label_across_years() {
        let event = event("2025-12-31T18:00", "2026-01-01T02:00");
        assert_eq!(
            event.date_label(),
            "December 31st, 2025 ~ January 1st, 2026"
        );
    }

    #[test]
    fn test_ordinal_suffixes() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(23), "rd");
        assert_eq!(ordinal_suffix(30), "th");
    }

    #[test]
    fn test_time_label() {
        let event = event("2025-11-15T10:00", "2025-11-15T17:05");
        assert_eq!(event.time_label(), "10:00 am to 5:05 pm");
    }

    #[test]
    fn test_parse_form_datetime_with_seconds() {
        let parsed = EventDraft::parse_form_datetime("2025-06-01T09:30:15").unwrap();
        assert_eq!(parsed.format(FORM_DATETIME_FORMAT).to_string(), "2025-06-01T09:30");
        assert!(EventDraft::parse_form_datetime("June 1").is_err());
    }
}
