use super::error::WebError;
use std::collections::HashMap;

/// Urlencoded form body. Optional text fields default to the empty string.
pub struct FormFields(HashMap<String, String>);

impl From<HashMap<String, String>> for FormFields {
    fn from(map: HashMap<String, String>) -> Self {
        FormFields(map)
    }
}

impl FormFields {
    /// Present (possibly empty) or a 400.
    pub fn required(&self, name: &str) -> Result<String, WebError> {
        self.0
            .get(name)
            .cloned()
            .ok_or_else(|| WebError::bad_request(format!("missing form field {name}")))
    }

    pub fn optional(&self, name: &str) -> String {
        self.0.get(name).cloned().unwrap_or_default()
    }

    pub fn optional_or(&self, name: &str, default: &str) -> String {
        self.0
            .get(name)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    pub fn required_i64(&self, name: &str) -> Result<i64, WebError> {
        let raw = self.required(name)?;
        raw.trim()
            .parse()
            .map_err(|_| WebError::bad_request(format!("form field {name} is not an integer")))
    }

    /// Absent or blank is `None`; anything else must parse.
    pub fn optional_i64(&self, name: &str) -> Result<Option<i64>, WebError> {
        match self.0.get(name).map(|s| s.trim()) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| WebError::bad_request(format!("form field {name} is not an integer"))),
        }
    }

    /// Checkbox semantics: true when present and non-empty.
    pub fn flag(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(|v| !v.is_empty())
    }
}
