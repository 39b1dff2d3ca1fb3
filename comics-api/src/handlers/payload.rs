//! Write payloads for create and replace
//!
//! Bodies are JSON objects (form-encoded bodies are accepted too). Anything
//! that is not an object, and any non-string field, counts as missing, so a
//! bad body always surfaces as a validation error rather than a parse error.

use axum::http::{header, HeaderMap};
use chrono::NaiveDate;
use serde_json::Value;

use super::error::ApiError;
use super::query::parse_date;

const REQUIRED_MESSAGE: &str = "Title, description, author and date are required";

/// Untrusted comic fields as received
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComicPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub image: Option<String>,
}

/// A payload that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidComic {
    pub title: String,
    pub description: String,
    pub author: String,
    pub date: NaiveDate,
    /// Base64 payload or existing asset reference; never empty
    pub image: Option<String>,
}

impl ComicPayload {
    /// Parse a request body according to its `Content-Type`
    pub fn from_body(headers: &HeaderMap, body: &[u8]) -> Self {
        let is_form = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| {
                value
                    .trim()
                    .to_ascii_lowercase()
                    .starts_with("application/x-www-form-urlencoded")
            });

        if is_form {
            Self::from_form(body)
        } else {
            serde_json::from_slice::<Value>(body)
                .map(|value| Self::from_json(&value))
                .unwrap_or_default()
        }
    }

    pub fn from_json(value: &Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            title: field("title"),
            description: field("description"),
            author: field("author"),
            date: field("date"),
            image: field("image"),
        }
    }

    pub fn from_form(body: &[u8]) -> Self {
        let mut payload = Self::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            let slot = match key.as_ref() {
                "title" => &mut payload.title,
                "description" => &mut payload.description,
                "author" => &mut payload.author,
                "date" => &mut payload.date,
                "image" => &mut payload.image,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        payload
    }

    /// Names of required fields that are absent or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !is_present(&self.title) {
            missing.push("title");
        }
        if !is_present(&self.description) {
            missing.push("description");
        }
        if !is_present(&self.author) {
            missing.push("author");
        }
        if !is_present(&self.date) {
            missing.push("date");
        }
        missing
    }

    /// Check required fields and parse the date
    ///
    /// ```rust
    /// use comics_api::handlers::ComicPayload;
    ///
    /// let payload = ComicPayload {
    ///     title: Some("A".into()),
    ///     author: Some("B".into()),
    ///     date: Some("2024-01-01".into()),
    ///     ..ComicPayload::default()
    /// };
    /// let err = payload.validate().unwrap_err();
    /// assert!(err.message.contains("description"));
    /// ```
    pub fn validate(self) -> Result<ValidComic, ApiError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ApiError::validation_failed(format!(
                "{REQUIRED_MESSAGE} (missing: {})",
                missing.join(", ")
            )));
        }

        let (Some(title), Some(description), Some(author), Some(raw_date)) =
            (self.title, self.description, self.author, self.date)
        else {
            return Err(ApiError::validation_failed(REQUIRED_MESSAGE));
        };

        let date = parse_date(&raw_date).ok_or_else(|| {
            ApiError::validation_failed(format!("Invalid date '{raw_date}', expected YYYY-MM-DD"))
        })?;

        Ok(ValidComic {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            author: author.trim().to_string(),
            date,
            image: self
                .image
                .map(|image| image.trim().to_string())
                .filter(|image| !image.is_empty()),
        })
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::ApiErrorKind;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn complete() -> Value {
        json!({
            "title": "Persepolis",
            "description": "A childhood in Iran",
            "author": "Marjane Satrapi",
            "date": "2000-01-01"
        })
    }

    #[test]
    fn test_valid_json_payload() {
        let valid = ComicPayload::from_json(&complete()).validate().unwrap();
        assert_eq!(valid.title, "Persepolis");
        assert_eq!(valid.date, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(valid.image, None);
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        let payload = ComicPayload::from_json(&json!({ "title": "A", "author": "B", "date": "2024-01-01" }));
        assert_eq!(payload.missing_fields(), vec!["description"]);

        let payload = ComicPayload::from_json(&json!({ "title": "  ", "description": "" }));
        assert_eq!(payload.missing_fields(), vec!["title", "description", "author", "date"]);
    }

    #[test]
    fn test_validation_error_message() {
        let err = ComicPayload::from_json(&json!({ "title": "A" })).validate().unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::ValidationFailed);
        assert_eq!(
            err.message,
            "Title, description, author and date are required (missing: description, author, date)"
        );
    }

    #[test]
    fn test_non_string_fields_count_as_missing() {
        let mut body = complete();
        body["date"] = json!(20000101);
        assert_eq!(ComicPayload::from_json(&body).missing_fields(), vec!["date"]);
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let mut body = complete();
        body["date"] = json!("someday");
        let err = ComicPayload::from_json(&body).validate().unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::ValidationFailed);
        assert!(err.message.contains("someday"));
    }

    #[test]
    fn test_non_object_body_is_all_missing() {
        let payload = ComicPayload::from_body(&HeaderMap::new(), b"[1, 2, 3]");
        assert_eq!(payload, ComicPayload::default());

        let payload = ComicPayload::from_body(&HeaderMap::new(), b"not json");
        assert_eq!(payload.missing_fields().len(), 4);
    }

    #[test]
    fn test_form_body() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let body = b"title=Blankets&description=Winter&author=Craig+Thompson&date=2003-07-01";

        let valid = ComicPayload::from_body(&headers, body).validate().unwrap();
        assert_eq!(valid.author, "Craig Thompson");
    }

    #[test]
    fn test_blank_image_is_absent() {
        let mut body = complete();
        body["image"] = json!("   ");
        assert_eq!(ComicPayload::from_json(&body).validate().unwrap().image, None);
    }
}
