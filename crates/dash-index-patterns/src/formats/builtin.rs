//! Built-in field formats and the default registry

use super::{FieldFormat, FieldFormatsRegistry, FormatParams};
use crate::error::IndexPatternError;
use crate::fields::shorten_dotted_string;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Rendering of a missing value
const MISSING: &str = "-";

/// Default numeral pattern for numbers
const DEFAULT_NUMBER_PATTERN: &str = "0,0.[000]";

const BYTE_UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => MISSING.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn trim_fraction(mut rendered: String) -> String {
    if rendered.contains('.') {
        while rendered.ends_with('0') {
            rendered.pop();
        }
        if rendered.ends_with('.') {
            rendered.pop();
        }
    }
    rendered
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render a number with a small numeral-style pattern
///
/// Supports a literal prefix (`$0,0`), thousands grouping (`0,0`) and fixed
/// (`0.00`) or optional (`0.[00]`) decimals.
fn format_number(n: f64, pattern: &str) -> String {
    let body_start = pattern.find('0').unwrap_or(pattern.len());
    let (prefix, body) = pattern.split_at(body_start);

    let (decimals, optional) = match body.split_once('.') {
        Some((_, fraction)) => (
            fraction.chars().filter(|c| *c == '0').count(),
            fraction.starts_with('['),
        ),
        None => (0, false),
    };

    let mut rendered = format!("{:.*}", decimals, n.abs());
    if optional {
        rendered = trim_fraction(rendered);
    }

    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (rendered.clone(), None),
    };
    let int_part = if body.contains(',') {
        group_thousands(&int_part)
    } else {
        int_part
    };

    let negative = n < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(prefix);
    out.push_str(&int_part);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Plain text, with optional case transform
#[derive(Debug, Clone, Default)]
pub struct StringFormat {
    params: FormatParams,
}

impl StringFormat {
    pub const ID: &'static str = "string";

    #[must_use]
    pub fn new(params: FormatParams) -> Self {
        Self { params }
    }
}

impl FieldFormat for StringFormat {
    fn id(&self) -> &str {
        Self::ID
    }

    fn params(&self) -> &FormatParams {
        &self.params
    }

    fn convert(&self, value: &Value) -> String {
        let text = plain_text(value);
        match self.params.get("transform").and_then(Value::as_str) {
            Some("lower") => text.to_lowercase(),
            Some("upper") => text.to_uppercase(),
            Some("short") => shorten_dotted_string(&text),
            _ => text,
        }
    }
}

/// Numbers rendered through a numeral pattern (`params.pattern`)
#[derive(Debug, Clone, Default)]
pub struct NumberFormat {
    params: FormatParams,
}

impl NumberFormat {
    pub const ID: &'static str = "number";

    #[must_use]
    pub fn new(params: FormatParams) -> Self {
        Self { params }
    }

    fn pattern(&self) -> &str {
        self.params
            .get("pattern")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_NUMBER_PATTERN)
    }
}

impl FieldFormat for NumberFormat {
    fn id(&self) -> &str {
        Self::ID
    }

    fn params(&self) -> &FormatParams {
        &self.params
    }

    fn convert(&self, value: &Value) -> String {
        match as_f64(value) {
            Some(n) => format_number(n, self.pattern()),
            None => plain_text(value),
        }
    }
}

/// Byte counts in binary units (`1.5KB`)
#[derive(Debug, Clone, Default)]
pub struct BytesFormat {
    params: FormatParams,
}

impl BytesFormat {
    pub const ID: &'static str = "bytes";

    #[must_use]
    pub fn new(params: FormatParams) -> Self {
        Self { params }
    }
}

impl FieldFormat for BytesFormat {
    fn id(&self) -> &str {
        Self::ID
    }

    fn params(&self) -> &FormatParams {
        &self.params
    }

    fn convert(&self, value: &Value) -> String {
        let Some(n) = as_f64(value) else {
            return plain_text(value);
        };

        let mut scaled = n.abs();
        let mut unit = 0;
        while scaled >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
            scaled /= 1024.0;
            unit += 1;
        }

        let sign = if n < 0.0 { "-" } else { "" };
        format!(
            "{sign}{}{}",
            trim_fraction(format!("{scaled:.1}")),
            BYTE_UNITS[unit]
        )
    }
}

/// true/false rendering of booleans, 0/1 and their string forms
#[derive(Debug, Clone, Default)]
pub struct BooleanFormat {
    params: FormatParams,
}

impl BooleanFormat {
    pub const ID: &'static str = "boolean";

    #[must_use]
    pub fn new(params: FormatParams) -> Self {
        Self { params }
    }
}

impl FieldFormat for BooleanFormat {
    fn id(&self) -> &str {
        Self::ID
    }

    fn params(&self) -> &FormatParams {
        &self.params
    }

    fn convert(&self, value: &Value) -> String {
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        parsed.map_or_else(|| plain_text(value), |b| b.to_string())
    }
}

/// Dates from epoch millis or RFC 3339, rendered in UTC
///
/// `params.pattern` is a strftime pattern; RFC 3339 with millis otherwise.
#[derive(Debug, Clone, Default)]
pub struct DateFormat {
    params: FormatParams,
}

impl DateFormat {
    pub const ID: &'static str = "date";

    #[must_use]
    pub fn new(params: FormatParams) -> Self {
        Self { params }
    }

    fn render(&self, date: DateTime<Utc>) -> String {
        if let Some(pattern) = self.params.get("pattern").and_then(Value::as_str) {
            let valid = !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error));
            if valid {
                return date.format(pattern).to_string();
            }
        }
        date.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl FieldFormat for DateFormat {
    fn id(&self) -> &str {
        Self::ID
    }

    fn params(&self) -> &FormatParams {
        &self.params
    }

    fn convert(&self, value: &Value) -> String {
        let parsed = match value {
            Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|d| d.with_timezone(&Utc)),
            _ => None,
        };
        parsed.map_or_else(|| plain_text(value), |d| self.render(d))
    }
}

/// Registry of the built-in formats
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFieldFormats;

impl DefaultFieldFormats {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Registered format ids
    #[must_use]
    pub fn ids(&self) -> [&'static str; 5] {
        [
            StringFormat::ID,
            NumberFormat::ID,
            BytesFormat::ID,
            BooleanFormat::ID,
            DateFormat::ID,
        ]
    }
}

impl FieldFormatsRegistry for DefaultFieldFormats {
    fn get_instance(
        &self,
        id: &str,
        params: &FormatParams,
    ) -> Result<Arc<dyn FieldFormat>, IndexPatternError> {
        let params = params.clone();
        let format: Arc<dyn FieldFormat> = match id {
            StringFormat::ID => Arc::new(StringFormat::new(params)),
            NumberFormat::ID => Arc::new(NumberFormat::new(params)),
            BytesFormat::ID => Arc::new(BytesFormat::new(params)),
            BooleanFormat::ID => Arc::new(BooleanFormat::new(params)),
            DateFormat::ID => Arc::new(DateFormat::new(params)),
            other => {
                return Err(IndexPatternError::UnknownFormat {
                    id: other.to_string(),
                })
            }
        };
        Ok(format)
    }

    fn get_default_instance(&self, field_type: &str, es_types: &[String]) -> Arc<dyn FieldFormat> {
        let params = Map::new();
        if es_types.iter().any(|t| t == "date_nanos") {
            return Arc::new(DateFormat::new(params));
        }
        match field_type {
            "number" => Arc::new(NumberFormat::new(params)),
            "boolean" => Arc::new(BooleanFormat::new(params)),
            "date" => Arc::new(DateFormat::new(params)),
            _ => Arc::new(StringFormat::new(params)),
        }
    }
}
