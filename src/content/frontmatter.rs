//! Front-matter parsing

use indexmap::IndexMap;
use serde_json::Value;

/// Open-schema header of a document, in the order the keys were written
pub type Metadata = IndexMap<String, Value>;

/// Errors that can occur when splitting a header from its body
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    #[error("Invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML front-matter: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Front-matter must be a key/value mapping")]
    NotAMapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
    Json,
}

/// Recognise the opening delimiter line, returning the format and its closing delimiter
fn opening(line: &str) -> Option<(Format, &'static str)> {
    match line.trim_end() {
        "---" | "---yaml" | "---yml" => Some((Format::Yaml, "---")),
        "---toml" => Some((Format::Toml, "---")),
        "---json" => Some((Format::Json, "---")),
        "+++" => Some((Format::Toml, "+++")),
        ";;;" => Some((Format::Json, ";;;")),
        _ => None,
    }
}

/// Split a raw document into its parsed header and the remaining body.
///
/// The opening delimiter must be the very first line; only a BOM may precede
/// it. A document without one has an empty header and the whole text as
/// body. A header that is never closed runs to the end of the file and
/// leaves an empty body. The line break directly after the closing delimiter
/// is not part of the body; nothing else is trimmed.
pub fn parse_document(raw: &str) -> Result<(Metadata, &str), FrontMatterError> {
    let content = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let (first_line, after_open) = match content.find('\n') {
        Some(pos) => (&content[..pos], &content[pos + 1..]),
        None => (content, ""),
    };

    let Some((format, close)) = opening(first_line) else {
        return Ok((Metadata::new(), content));
    };

    let mut header = after_open;
    let mut body = "";
    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == close {
            header = &after_open[..offset];
            body = &after_open[offset + line.len()..];
            break;
        }
        offset += line.len();
    }

    let metadata = match format {
        Format::Yaml => parse_yaml(header)?,
        Format::Toml => parse_toml(header)?,
        Format::Json => parse_json(header)?,
    };
    Ok((metadata, body))
}

fn parse_yaml(header: &str) -> Result<Metadata, FrontMatterError> {
    match serde_yaml::from_str::<serde_yaml::Value>(header)? {
        // Empty or comment-only header
        serde_yaml::Value::Null => Ok(Metadata::new()),
        value @ serde_yaml::Value::Mapping(_) => Ok(serde_yaml::from_value(value)?),
        _ => Err(FrontMatterError::NotAMapping),
    }
}

fn parse_toml(header: &str) -> Result<Metadata, FrontMatterError> {
    let table: toml::Table = toml::from_str(header)?;
    Ok(table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect())
}

/// TOML datetimes have no JSON counterpart, so they are kept as their string form
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
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

fn parse_json(header: &str) -> Result<Metadata, FrontMatterError> {
    let header = header.trim();
    if header.is_empty() {
        return Ok(Metadata::new());
    }

    // Hexo-style JSON headers omit the surrounding braces
    let value: Value = if header.starts_with(['{', '[']) {
        serde_json::from_str(header)?
    } else {
        serde_json::from_str(&format!("{{{}}}", header.trim_end_matches(',')))?
    };

    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(FrontMatterError::NotAMapping),
    }
}
