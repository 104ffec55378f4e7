//! Declarative validation of movie write payloads.
//!
//! Payloads are checked against a static rule table, one entry per field.
//! Every rule is evaluated and all violations are collected into a
//! [`ValidationReport`]; evaluation never stops at the first failure.
//! Fields not named in the table are stripped.

use std::fmt;
use std::num::TryFromIntError;

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::movie::{Genre, MovieDraft, MoviePatch};

/// Machine-readable category of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidType,
    InvalidString,
    TooSmall,
    TooBig,
    InvalidEnumValue,
}

/// One step of the path from the payload root to the offending value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A single field-addressable violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub code: IssueCode,
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl Issue {
    fn new(code: IssueCode, path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            code,
            path,
            message: message.into(),
        }
    }

    /// Top-level field this issue belongs to, or `None` for root issues.
    pub fn field(&self) -> Option<&str> {
        match self.path.first() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None,
        }
    }
}

/// All violations found in one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    name: &'static str,
    issues: Vec<Issue>,
}

impl ValidationReport {
    fn new(issues: Vec<Issue>) -> Self {
        Self {
            name: "ValidationError",
            issues,
        }
    }

    /// Returns every collected issue in rule-table order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Returns the issues reported against `field`.
    pub fn issues_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues
            .iter()
            .filter(move |issue| issue.field() == Some(field))
    }

    /// Returns `(field path, message)` pairs, with paths joined by dots.
    pub fn field_messages(&self) -> Vec<(String, String)> {
        self.issues
            .iter()
            .map(|issue| (join_path(&issue.path), issue.message.clone()))
            .collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self
            .field_messages()
            .into_iter()
            .map(|(path, message)| format!("{path}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&summary)
    }
}

impl std::error::Error for ValidationReport {}

/// Validates a complete movie payload for creation.
///
/// Every field except `rate` is required; `rate` defaults to 0.
///
/// # Errors
///
/// - `ValidationReport` - If the payload is not an object or any field violates its rule
pub fn validate_movie(payload: &Value) -> Result<MovieDraft, ValidationReport> {
    evaluate(payload, Mode::Full)?.into_draft().ok_or_else(|| {
        ValidationReport::new(vec![Issue::new(
            IssueCode::InvalidType,
            Vec::new(),
            "Incomplete movie payload",
        )])
    })
}

/// Validates a partial movie payload for update.
///
/// All fields are optional, but any present field must satisfy its rule.
///
/// # Errors
///
/// - `ValidationReport` - If the payload is not an object or a present field violates its rule
pub fn validate_partial_movie(payload: &Value) -> Result<MoviePatch, ValidationReport> {
    evaluate(payload, Mode::Partial)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Full,
    Partial,
}

/// Stores a checked integer, failing when it does not fit the field's type.
type IntegerSetter = fn(&mut MoviePatch, u64) -> Result<(), TryFromIntError>;

#[derive(Clone, Copy)]
enum Presence {
    Required,
    /// Applied in full mode when the field is absent
    DefaultsTo(fn(&mut MoviePatch)),
}

/// Rule for one field. Each variant owns the setter for the value it
/// produces, so a rule can only ever write the type it checked.
#[derive(Clone, Copy)]
enum Constraint {
    Text {
        non_empty: bool,
        assign: fn(&mut MoviePatch, String),
    },
    Url {
        assign: fn(&mut MoviePatch, String),
    },
    Integer {
        positive: bool,
        min: Option<f64>,
        max: Option<f64>,
        assign: IntegerSetter,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
        assign: fn(&mut MoviePatch, f64),
    },
    GenreList {
        assign: fn(&mut MoviePatch, Vec<Genre>),
    },
}

/// Per-field message overrides. `None` falls back to the generic wording.
#[derive(Debug, Clone, Copy)]
struct Messages {
    required: &'static str,
    invalid_type: Option<&'static str>,
    invalid_format: Option<&'static str>,
}

impl Messages {
    const GENERIC: Messages = Messages {
        required: "Required",
        invalid_type: None,
        invalid_format: None,
    };
}

#[derive(Clone, Copy)]
struct FieldRule {
    name: &'static str,
    presence: Presence,
    constraint: Constraint,
    messages: Messages,
}

const MOVIE_SCHEMA: [FieldRule; 7] = [
    FieldRule {
        name: "title",
        presence: Presence::Required,
        constraint: Constraint::Text {
            non_empty: true,
            assign: set_title,
        },
        messages: Messages {
            required: "Title is required",
            invalid_type: Some("Title must be a string"),
            invalid_format: Some("Title must not be empty"),
        },
    },
    FieldRule {
        name: "year",
        presence: Presence::Required,
        constraint: Constraint::Integer {
            positive: true,
            min: Some(1900.0),
            max: Some(2024.0),
            assign: set_year,
        },
        messages: Messages::GENERIC,
    },
    FieldRule {
        name: "director",
        presence: Presence::Required,
        constraint: Constraint::Text {
            non_empty: false,
            assign: set_director,
        },
        messages: Messages::GENERIC,
    },
    FieldRule {
        name: "duration",
        presence: Presence::Required,
        constraint: Constraint::Integer {
            positive: true,
            min: None,
            max: Some(u32::MAX as f64),
            assign: set_duration,
        },
        messages: Messages::GENERIC,
    },
    FieldRule {
        name: "poster",
        presence: Presence::Required,
        constraint: Constraint::Url { assign: set_poster },
        messages: Messages {
            required: "Required",
            invalid_type: None,
            invalid_format: Some("Poster must be a valid URL"),
        },
    },
    FieldRule {
        name: "genre",
        presence: Presence::Required,
        constraint: Constraint::GenreList { assign: set_genre },
        messages: Messages {
            required: "Genre is required",
            invalid_type: Some("Genre must be an array of enum values"),
            invalid_format: None,
        },
    },
    FieldRule {
        name: "rate",
        presence: Presence::DefaultsTo(default_rate),
        constraint: Constraint::Number {
            min: Some(0.0),
            max: Some(10.0),
            assign: set_rate,
        },
        messages: Messages::GENERIC,
    },
];

fn set_title(patch: &mut MoviePatch, title: String) {
    patch.title = Some(title);
}

fn set_year(patch: &mut MoviePatch, year: u64) -> Result<(), TryFromIntError> {
    patch.year = Some(u16::try_from(year)?);
    Ok(())
}

fn set_director(patch: &mut MoviePatch, director: String) {
    patch.director = Some(director);
}

fn set_duration(patch: &mut MoviePatch, duration: u64) -> Result<(), TryFromIntError> {
    patch.duration = Some(u32::try_from(duration)?);
    Ok(())
}

fn set_poster(patch: &mut MoviePatch, poster: String) {
    patch.poster = Some(poster);
}

fn set_genre(patch: &mut MoviePatch, genre: Vec<Genre>) {
    patch.genre = Some(genre);
}

fn set_rate(patch: &mut MoviePatch, rate: f64) {
    patch.rate = Some(rate);
}

fn default_rate(patch: &mut MoviePatch) {
    patch.rate = Some(0.0);
}

fn evaluate(payload: &Value, mode: Mode) -> Result<MoviePatch, ValidationReport> {
    let Value::Object(object) = payload else {
        return Err(ValidationReport::new(vec![Issue::new(
            IssueCode::InvalidType,
            Vec::new(),
            format!("Expected object, received {}", type_name(payload)),
        )]));
    };

    let mut issues = Vec::new();
    let mut patch = MoviePatch::default();

    for rule in &MOVIE_SCHEMA {
        match (object.get(rule.name), mode, rule.presence) {
            (Some(value), _, _) => rule.check(value, &mut patch, &mut issues),
            (None, Mode::Partial, _) => {}
            (None, Mode::Full, Presence::DefaultsTo(apply_default)) => apply_default(&mut patch),
            (None, Mode::Full, Presence::Required) => issues.push(Issue::new(
                IssueCode::InvalidType,
                rule.path(),
                rule.messages.required,
            )),
        }
    }

    if issues.is_empty() {
        Ok(patch)
    } else {
        Err(ValidationReport::new(issues))
    }
}

impl FieldRule {
    fn path(&self) -> Vec<PathSegment> {
        vec![PathSegment::Key(self.name.to_string())]
    }

    fn type_issue(&self, expected: &str, value: &Value) -> Issue {
        let message = match self.messages.invalid_type {
            Some(message) => message.to_string(),
            None => format!("Expected {expected}, received {}", type_name(value)),
        };
        Issue::new(IssueCode::InvalidType, self.path(), message)
    }

    /// Checks one present value, pushing any violations.
    ///
    /// The typed value is written to `patch` only when the field produced no
    /// issues.
    fn check(&self, value: &Value, patch: &mut MoviePatch, issues: &mut Vec<Issue>) {
        match self.constraint {
            Constraint::Text { non_empty, assign } => {
                let Some(text) = value.as_str() else {
                    issues.push(self.type_issue("string", value));
                    return;
                };
                if non_empty && text.is_empty() {
                    let message = self
                        .messages
                        .invalid_format
                        .unwrap_or("String must contain at least 1 character(s)");
                    issues.push(Issue::new(IssueCode::TooSmall, self.path(), message));
                    return;
                }
                assign(patch, text.to_string());
            }
            Constraint::Url { assign } => {
                let Some(text) = value.as_str() else {
                    issues.push(self.type_issue("string", value));
                    return;
                };
                if Url::parse(text).is_err() {
                    let message = self.messages.invalid_format.unwrap_or("Invalid url");
                    issues.push(Issue::new(IssueCode::InvalidString, self.path(), message));
                    return;
                }
                assign(patch, text.to_string());
            }
            Constraint::Integer {
                positive,
                min,
                max,
                assign,
            } => {
                let Some(number) = self.check_number(value, true, positive, min, max, issues)
                else {
                    return;
                };
                if assign(patch, number as u64).is_err() {
                    issues.push(Issue::new(
                        IssueCode::TooBig,
                        self.path(),
                        format!("Number {number} does not fit the {} field", self.name),
                    ));
                }
            }
            Constraint::Number { min, max, assign } => {
                if let Some(number) = self.check_number(value, false, false, min, max, issues) {
                    assign(patch, number);
                }
            }
            Constraint::GenreList { assign } => {
                if let Some(genres) = self.check_genres(value, issues) {
                    assign(patch, genres);
                }
            }
        }
    }

    fn check_number(
        &self,
        value: &Value,
        integer: bool,
        positive: bool,
        min: Option<f64>,
        max: Option<f64>,
        issues: &mut Vec<Issue>,
    ) -> Option<f64> {
        let Some(number) = value.as_f64() else {
            issues.push(self.type_issue("number", value));
            return None;
        };

        let before = issues.len();
        if integer && number.fract() != 0.0 {
            issues.push(Issue::new(
                IssueCode::InvalidType,
                self.path(),
                "Expected integer, received float",
            ));
        }
        if positive && number <= 0.0 {
            issues.push(Issue::new(
                IssueCode::TooSmall,
                self.path(),
                "Number must be greater than 0",
            ));
        }
        if let Some(min) = min
            && number < min
        {
            issues.push(Issue::new(
                IssueCode::TooSmall,
                self.path(),
                format!("Number must be greater than or equal to {min}"),
            ));
        }
        if let Some(max) = max
            && number > max
        {
            issues.push(Issue::new(
                IssueCode::TooBig,
                self.path(),
                format!("Number must be less than or equal to {max}"),
            ));
        }

        (issues.len() == before).then_some(number)
    }

    fn check_genres(&self, value: &Value, issues: &mut Vec<Issue>) -> Option<Vec<Genre>> {
        let Some(items) = value.as_array() else {
            issues.push(self.type_issue("array", value));
            return None;
        };

        let before = issues.len();
        let mut genres = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let mut path = self.path();
            path.push(PathSegment::Index(index));

            match item.as_str() {
                Some(text) => match text.parse::<Genre>() {
                    Ok(genre) => genres.push(genre),
                    Err(_) => issues.push(Issue::new(
                        IssueCode::InvalidEnumValue,
                        path,
                        format!(
                            "Invalid enum value. Expected {}, received '{text}'",
                            expected_genres()
                        ),
                    )),
                },
                None => issues.push(Issue::new(
                    IssueCode::InvalidType,
                    path,
                    format!("Expected {}, received {}", expected_genres(), type_name(item)),
                )),
            }
        }

        (issues.len() == before).then_some(genres)
    }
}

fn expected_genres() -> String {
    Genre::ALL
        .iter()
        .map(|genre| format!("'{genre}'"))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return "(root)".to_string();
    }
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn valid_payload() -> Value {
        json!({
            "title": "Heat",
            "year": 1995,
            "director": "Michael Mann",
            "duration": 170,
            "poster": "https://posters.reel.dev/heat.jpg",
            "genre": ["Action", "Crime", "Drama"],
            "rate": 8.3
        })
    }

    #[test]
    fn test_valid_payload_produces_draft() {
        let draft = validate_movie(&valid_payload()).unwrap();

        assert_eq!(draft.title, "Heat");
        assert_eq!(draft.year, 1995);
        assert_eq!(draft.duration, 170);
        assert_eq!(draft.genre, vec![Genre::Action, Genre::Crime, Genre::Drama]);
        assert_eq!(draft.rate, 8.3);
    }

    #[test]
    fn test_missing_rate_defaults_to_zero() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("rate");

        let draft = validate_movie(&payload).unwrap();
        assert_eq!(draft.rate, 0.0);
    }

    #[test]
    fn test_integral_float_is_accepted_as_integer() {
        let mut payload = valid_payload();
        payload["year"] = json!(2001.0);

        assert_eq!(validate_movie(&payload).unwrap().year, 2001);
    }

    #[test]
    fn test_missing_title_reports_required_message() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("title");

        let report = validate_movie(&payload).unwrap_err();
        let issues: Vec<_> = report.issues_for("title").collect();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::InvalidType);
        assert_eq!(issues[0].message, "Title is required");
    }

    #[test]
    fn test_all_violations_are_collected() {
        let payload = json!({
            "title": 42,
            "year": 1850.5,
            "duration": -3,
            "poster": "not a url",
            "genre": ["Drama", "Western", 7],
            "rate": 11
        });

        let report = validate_movie(&payload).unwrap_err();
        let fields: Vec<_> = report.issues().iter().filter_map(Issue::field).collect();

        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"year"));
        assert!(fields.contains(&"director"));
        assert!(fields.contains(&"duration"));
        assert!(fields.contains(&"poster"));
        assert!(fields.contains(&"genre"));
        assert!(fields.contains(&"rate"));

        let year_messages: Vec<_> = report.issues_for("year").map(|i| i.message.as_str()).collect();
        assert_eq!(
            year_messages,
            vec![
                "Expected integer, received float",
                "Number must be greater than or equal to 1900"
            ]
        );
        assert_eq!(
            report.issues_for("title").next().unwrap().message,
            "Title must be a string"
        );
    }

    #[test]
    fn test_genre_issues_are_addressed_by_index() {
        let mut payload = valid_payload();
        payload["genre"] = json!(["Drama", "Western"]);

        let report = validate_movie(&payload).unwrap_err();
        let issue = &report.issues()[0];

        assert_eq!(issue.code, IssueCode::InvalidEnumValue);
        assert_eq!(
            issue.path,
            vec![PathSegment::Key("genre".to_string()), PathSegment::Index(1)]
        );
        assert!(issue.message.contains("received 'Western'"));
        assert!(issue.message.contains("'Action' | 'Adventure'"));
    }

    #[test]
    fn test_genre_enum_is_case_sensitive() {
        let mut payload = valid_payload();
        payload["genre"] = json!(["drama"]);

        assert!(validate_movie(&payload).is_err());
    }

    #[test]
    fn test_genre_must_be_an_array() {
        let mut payload = valid_payload();
        payload["genre"] = json!("Drama");

        let report = validate_movie(&payload).unwrap_err();
        assert_eq!(
            report.issues()[0].message,
            "Genre must be an array of enum values"
        );
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let mut payload = valid_payload();
        payload["title"] = json!("");

        let report = validate_movie(&payload).unwrap_err();
        assert_eq!(report.issues()[0].code, IssueCode::TooSmall);
    }

    #[test]
    fn test_null_counts_as_wrong_type() {
        let mut payload = valid_payload();
        payload["director"] = Value::Null;

        let report = validate_movie(&payload).unwrap_err();
        assert_eq!(report.issues()[0].message, "Expected string, received null");
    }

    #[test]
    fn test_non_object_payload_is_a_root_issue() {
        let report = validate_movie(&json!([1, 2, 3])).unwrap_err();

        assert_eq!(report.issues().len(), 1);
        assert!(report.issues()[0].path.is_empty());
        assert_eq!(report.issues()[0].message, "Expected object, received array");
        assert_eq!(report.field_messages()[0].0, "(root)");
    }

    #[test]
    fn test_unknown_fields_are_stripped() {
        let mut payload = valid_payload();
        payload["id"] = json!("client-chosen");
        payload["studio"] = json!("Warner Bros.");

        assert!(validate_movie(&payload).is_ok());
    }

    #[test]
    fn test_partial_accepts_empty_object() {
        let patch = validate_partial_movie(&json!({})).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_partial_only_sets_present_fields() {
        let patch = validate_partial_movie(&json!({ "rate": 9.5 })).unwrap();

        assert_eq!(patch.rate, Some(9.5));
        assert_eq!(patch.title, None);
        assert_eq!(patch.year, None);
    }

    #[test]
    fn test_partial_still_enforces_field_rules() {
        let report = validate_partial_movie(&json!({ "year": 1899 })).unwrap_err();
        let issue = &report.issues()[0];

        assert_eq!(issue.code, IssueCode::TooSmall);
        assert_eq!(issue.message, "Number must be greater than or equal to 1900");

        assert!(validate_partial_movie(&json!({ "genre": ["Sci-Fi"] })).is_err());
    }

    #[test]
    fn test_integer_wider_than_field_is_reported() {
        let unbounded_year = FieldRule {
            name: "year",
            presence: Presence::Required,
            constraint: Constraint::Integer {
                positive: true,
                min: None,
                max: None,
                assign: set_year,
            },
            messages: Messages::GENERIC,
        };
        let mut patch = MoviePatch::default();
        let mut issues = Vec::new();

        unbounded_year.check(&json!(70_000), &mut patch, &mut issues);

        assert_eq!(patch.year, None);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::TooBig);
        assert_eq!(issues[0].path, vec![PathSegment::Key("year".to_string())]);
    }

    #[test]
    fn test_every_rule_writes_its_own_field() {
        let draft = validate_movie(&valid_payload()).unwrap();
        let payload = valid_payload();

        assert_eq!(draft.title, payload["title"]);
        assert_eq!(draft.year, payload["year"]);
        assert_eq!(draft.director, payload["director"]);
        assert_eq!(draft.duration, payload["duration"]);
        assert_eq!(draft.poster, payload["poster"]);
        assert_eq!(draft.rate, payload["rate"]);
        assert_eq!(
            serde_json::to_value(&draft.genre).unwrap(),
            payload["genre"]
        );
    }

    #[test]
    fn test_report_serializes_with_structured_issues() {
        let report = validate_partial_movie(&json!({ "rate": 12 })).unwrap_err();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["name"], "ValidationError");
        assert_eq!(value["issues"][0]["code"], "too_big");
        assert_eq!(value["issues"][0]["path"], json!(["rate"]));
        assert_eq!(
            value["issues"][0]["message"],
            "Number must be less than or equal to 10"
        );
    }

    proptest! {
        #[test]
        fn prop_years_in_range_are_accepted(year in 1900u16..=2024) {
            let mut payload = valid_payload();
            payload["year"] = json!(year);
            prop_assert_eq!(validate_movie(&payload).unwrap().year, year);
        }

        #[test]
        fn prop_years_out_of_range_are_rejected(year in prop_oneof![-500i64..1900, 2025i64..10_000]) {
            let report = validate_partial_movie(&json!({ "year": year })).unwrap_err();
            prop_assert!(report.issues().iter().all(|issue| issue.field() == Some("year")));
        }

        #[test]
        fn prop_rates_in_range_are_accepted(rate in 0.0f64..=10.0) {
            let patch = validate_partial_movie(&json!({ "rate": rate })).unwrap();
            prop_assert_eq!(patch.rate, Some(rate));
        }
    }
}
