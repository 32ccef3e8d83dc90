use crate::errors::AssertError;
use std::collections::BTreeMap;

/// Assertion type name of model assertions.
pub const MODEL_TYPE: &str = "model";

/// Header block of a signed model assertion.
///
/// Only the headers are interpreted. The body and signature that follow the
/// first blank line are ignored; the assertion is trusted as delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAssertion {
    headers: BTreeMap<String, String>,
}

impl ModelAssertion {
    /// Parses assertion text, requiring `type: model`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertError::WrongType`] for any other assertion type and
    /// [`AssertError::MalformedHeader`] when a header line has no `:`.
    pub fn parse(text: &str) -> Result<Self, AssertError> {
        let headers = parse_headers(text)?;
        let found = headers.get("type").cloned().unwrap_or_default();
        if found != MODEL_TYPE {
            return Err(AssertError::WrongType {
                expected: MODEL_TYPE,
                found,
            });
        }
        Ok(Self { headers })
    }

    /// Looks up a header by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// The `authority-id` header.
    pub fn authority_id(&self) -> Result<&str, AssertError> {
        self.required("authority-id")
    }

    /// The `brand-id` header.
    pub fn brand_id(&self) -> Result<&str, AssertError> {
        self.required("brand-id")
    }

    /// The `model` header.
    pub fn model(&self) -> Result<&str, AssertError> {
        self.required("model")
    }

    /// The `series` header.
    pub fn series(&self) -> Result<&str, AssertError> {
        self.required("series")
    }

    /// The `revision` header; assertions without one are at revision `0`.
    pub fn revision(&self) -> &str {
        match self.header("revision") {
            Some(revision) if !revision.is_empty() => revision,
            _ => "0",
        }
    }

    fn required(&self, name: &'static str) -> Result<&str, AssertError> {
        match self.header(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(AssertError::MissingField(name)),
        }
    }
}

fn parse_headers(text: &str) -> Result<BTreeMap<String, String>, AssertError> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    let mut last: Option<String> = None;

    for (index, line) in text.lines().enumerate() {
        if line.is_empty() {
            break;
        }

        // Indented lines continue the previous header (lists, multi-line values)
        if line.starts_with(' ') {
            let value = last
                .as_ref()
                .and_then(|name| headers.get_mut(name))
                .ok_or_else(|| AssertError::MalformedHeader {
                    line: index + 1,
                    reason: "continuation line without a header".to_string(),
                })?;
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(line.trim_start());
            continue;
        }

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| AssertError::MalformedHeader {
                line: index + 1,
                reason: "missing ':'".to_string(),
            })?;
        if name.is_empty() {
            return Err(AssertError::MalformedHeader {
                line: index + 1,
                reason: "empty header name".to_string(),
            });
        }
        let value = value.strip_prefix(' ').unwrap_or(value);
        headers.insert(name.to_string(), value.to_string());
        last = Some(name.to_string());
    }

    Ok(headers)
}
