//! Front-matter parsing

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::ParseError;

/// Front-matter block syntax, chosen by the opening marker line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterFormat {
    /// `---` ... `---` (or `...`)
    Yaml,
    /// `;;;` ... `;;;`
    Json,
    /// `+++` ... `+++`
    Toml,
}

impl FrontMatterFormat {
    fn from_marker(line: &str) -> Option<Self> {
        match line {
            "---" => Some(FrontMatterFormat::Yaml),
            ";;;" => Some(FrontMatterFormat::Json),
            "+++" => Some(FrontMatterFormat::Toml),
            _ => None,
        }
    }

    /// Opening marker line
    pub fn marker(&self) -> &'static str {
        match self {
            FrontMatterFormat::Yaml => "---",
            FrontMatterFormat::Json => ";;;",
            FrontMatterFormat::Toml => "+++",
        }
    }

    fn closes(&self, line: &str) -> bool {
        match self {
            FrontMatterFormat::Yaml => line == "---" || line == "...",
            _ => line == self.marker(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            FrontMatterFormat::Yaml => "YAML",
            FrontMatterFormat::Json => "JSON",
            FrontMatterFormat::Toml => "TOML",
        }
    }
}

/// Validated front-matter of a document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontMatter {
    pub layout: String,
    pub title: String,

    /// Remaining keys, in source order
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> Result<(Self, &str), ParseError> {
        let (format, block, body) = split(content)?;
        let fields = parse_block(format, block)?;
        Ok((Self::from_fields(fields)?, body))
    }

    fn from_fields(mut fields: IndexMap<String, Value>) -> Result<Self, ParseError> {
        let layout = take_layout(fields.shift_remove("layout"))?;
        let title = take_title(fields.shift_remove("title"))?;
        Ok(Self {
            layout,
            title,
            extra: fields,
        })
    }

    /// Serialize as a YAML front-matter block, markers included
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{}---\n", yaml))
    }
}

/// Split content into (format, front-matter block, body).
///
/// Exactly one line ending after the closing marker is consumed, the body
/// is everything after it.
fn split(content: &str) -> Result<(FrontMatterFormat, &str, &str), ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let content = content.trim_start();

    let (first, rest) = content.split_once('\n').unwrap_or((content, ""));
    let format =
        FrontMatterFormat::from_marker(first.trim_end()).ok_or(ParseError::MissingFrontMatter)?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if format.closes(line.trim_end()) {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((format, block, body));
        }
        offset += line.len();
    }

    Err(ParseError::Unterminated {
        marker: format.marker(),
    })
}

fn parse_block(
    format: FrontMatterFormat,
    block: &str,
) -> Result<IndexMap<String, Value>, ParseError> {
    let malformed = |message: String| ParseError::Malformed {
        format: format.name(),
        message,
    };

    if block.trim().is_empty() {
        return Ok(IndexMap::new());
    }

    let value = match format {
        FrontMatterFormat::Yaml => {
            serde_yaml::from_str::<Value>(block).map_err(|e| malformed(e.to_string()))?
        }
        FrontMatterFormat::Json => {
            serde_json::from_str::<Value>(block).map_err(|e| malformed(e.to_string()))?
        }
        FrontMatterFormat::Toml => {
            let table = block
                .parse::<toml::Table>()
                .map_err(|e| malformed(e.message().to_string()))?;
            toml_to_json(toml::Value::Table(table))
        }
    };

    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Null => Ok(IndexMap::new()),
        other => Err(malformed(format!(
            "expected key/value pairs, found {}",
            kind(&other)
        ))),
    }
}

fn take_layout(value: Option<Value>) -> Result<String, ParseError> {
    let invalid = |reason: String| ParseError::InvalidField {
        field: "layout",
        reason,
    };

    match value {
        None | Some(Value::Null) => Err(ParseError::MissingField { field: "layout" }),
        Some(Value::String(s)) if s.is_empty() => Err(invalid("must not be empty".to_string())),
        Some(Value::String(s)) if is_layout_name(&s) => Ok(s),
        Some(Value::String(s)) => Err(invalid(format!(
            "'{}' is not a layout name (letters, digits, '_', '-', '/')",
            s
        ))),
        Some(other) => Err(invalid(format!("expected a string, found {}", kind(&other)))),
    }
}

fn take_title(value: Option<Value>) -> Result<String, ParseError> {
    match value {
        None | Some(Value::Null) => Err(ParseError::MissingField { field: "title" }),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(ParseError::InvalidField {
            field: "title",
            reason: format!("expected text, found {}", kind(&other)),
        }),
    }
}

/// Layout names are identifiers, optionally grouped into `/`-separated folders
pub fn is_layout_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('/').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
