use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::core::{ShowtimesError, ShowtimesResult};

/// One render pass worth of data: the date range and the new movies in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub today: String,
    pub end_date: String,
    pub movie_details: Vec<Movie>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub link: String,
    pub genre: String,
    #[serde(deserialize_with = "string_or_number")]
    pub production_year: String,
    pub description: String,
    #[serde(default)]
    pub screening_times: Vec<Screening>,
}

/// Showtimes of one movie on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screening {
    pub date: String,
    #[serde(default)]
    pub times: Vec<String>,
}

const REPORT_FIELDS: [&str; 3] = ["today", "end_date", "movie_details"];
const MOVIE_FIELDS: [&str; 5] = ["title", "link", "genre", "production_year", "description"];
const SCREENING_FIELDS: [&str; 1] = ["date"];

impl Report {
    pub fn new(today: impl Into<String>, end_date: impl Into<String>, movie_details: Vec<Movie>) -> Self {
        Report {
            today: today.into(),
            end_date: end_date.into(),
            movie_details,
        }
    }

    /// Builds a report covering `days` days starting at `today`, so a 10-day
    /// window starting on the 1st ends on the 10th.
    pub fn for_days_ahead(today: NaiveDate, days: u32, movie_details: Vec<Movie>) -> ShowtimesResult<Self> {
        let (start, end) = date_range(today, days)?;
        Ok(Report::new(
            start.format("%Y-%m-%d").to_string(),
            end.format("%Y-%m-%d").to_string(),
            movie_details,
        ))
    }

    /// Validates a JSON payload and converts it into a typed report.
    ///
    /// Absent or null required fields produce `MissingField` with the path of
    /// the offending field (`movie_details[2].genre`). Absent
    /// `screening_times` and `times` are valid and read as empty.
    pub fn from_value(value: &Value) -> ShowtimesResult<Self> {
        validate_report(value)?;
        let report = serde_json::from_value(value.clone())?;
        Ok(report)
    }

    pub fn from_json_str(raw: &str) -> ShowtimesResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(&value)
    }

    pub fn is_empty(&self) -> bool {
        self.movie_details.is_empty()
    }
}

impl Movie {
    pub fn has_screenings(&self) -> bool {
        self.screening_times.iter().any(Screening::has_times)
    }
}

impl Screening {
    pub fn new(date: impl Into<String>, times: Vec<String>) -> Self {
        Screening {
            date: date.into(),
            times,
        }
    }

    pub fn has_times(&self) -> bool {
        !self.times.is_empty()
    }

    /// Showtimes as displayed: `18:00, 21:00`.
    pub fn joined_times(&self) -> String {
        self.times.join(", ")
    }
}

/// Inclusive window of `days` days starting at `today`.
pub fn date_range(today: NaiveDate, days: u32) -> ShowtimesResult<(NaiveDate, NaiveDate)> {
    if days == 0 {
        return Err(ShowtimesError::Validation(
            "date range must cover at least one day".to_string(),
        ));
    }
    let end = today
        .checked_add_days(Days::new(u64::from(days) - 1))
        .ok_or_else(|| {
            ShowtimesError::Validation(format!(
                "date range of {} days starting {} is out of range",
                days, today
            ))
        })?;
    Ok((today, end))
}

fn validate_report(value: &Value) -> ShowtimesResult<()> {
    let obj = value
        .as_object()
        .ok_or_else(|| ShowtimesError::Validation("report must be a JSON object".to_string()))?;

    require_fields(obj, &REPORT_FIELDS, "")?;

    let movies = obj["movie_details"]
        .as_array()
        .ok_or_else(|| ShowtimesError::Validation("movie_details must be an array".to_string()))?;

    for (i, movie) in movies.iter().enumerate() {
        let prefix = format!("movie_details[{}].", i);
        let movie = movie.as_object().ok_or_else(|| {
            ShowtimesError::Validation(format!("movie_details[{}] must be an object", i))
        })?;
        require_fields(movie, &MOVIE_FIELDS, &prefix)?;

        let screenings = match movie.get("screening_times") {
            None | Some(Value::Null) => continue,
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ShowtimesError::Validation(format!(
                    "{}screening_times must be an array",
                    prefix
                )))
            }
        };

        for (j, screening) in screenings.iter().enumerate() {
            let screening_prefix = format!("{}screening_times[{}].", prefix, j);
            let screening = screening.as_object().ok_or_else(|| {
                ShowtimesError::Validation(format!(
                    "{}screening_times[{}] must be an object",
                    prefix, j
                ))
            })?;
            require_fields(screening, &SCREENING_FIELDS, &screening_prefix)?;
        }
    }

    Ok(())
}

fn require_fields(obj: &Map<String, Value>, fields: &[&str], prefix: &str) -> ShowtimesResult<()> {
    for field in fields {
        match obj.get(*field) {
            None | Some(Value::Null) => return Err(ShowtimesError::missing(format!("{}{}", prefix, field))),
            Some(_) => {}
        }
    }
    Ok(())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Year::deserialize(deserializer)? {
        Year::Text(text) => text,
        Year::Integer(year) => year.to_string(),
        Year::Float(year) => year.to_string(),
    })
}
