use crate::error::FrontmatterError;
use crate::types::Metadata;
use serde_yaml::Value;

/// Line that opens and closes a frontmatter block
pub const DELIMITER: &str = "---";

/// Split a snippet file into its YAML header and the body that follows.
///
/// A file that does not start with a `---` line has no header: the metadata
/// is empty and the body is the whole input, untouched.
pub fn split_frontmatter(text: &str) -> Result<(Metadata, String), FrontmatterError> {
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((Metadata::new(), String::new()));
    };
    if !is_delimiter(first) {
        return Ok((Metadata::new(), text.to_string()));
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if is_delimiter(line) {
            let metadata = parse_header(&text[header_start..offset])?;
            let body = &text[offset + line.len()..];
            return Ok((metadata, body.to_string()));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unterminated)
}

/// The `desc` entry when it is a string, otherwise empty
pub fn description(metadata: &Metadata) -> String {
    metadata
        .get("desc")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(|c: char| c == '\n' || c == '\r') == DELIMITER
}

fn parse_header(header: &str) -> Result<Metadata, FrontmatterError> {
    if header.trim().is_empty() {
        return Ok(Metadata::new());
    }

    match serde_yaml::from_str::<Value>(header)? {
        Value::Null => Ok(Metadata::new()),
        Value::Mapping(map) => Ok(map
            .into_iter()
            .filter_map(|(k, v)| key_to_string(k).map(|k| (k, v)))
            .collect()),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

// Scalar keys are stringified; sequences/maps as keys are dropped
fn key_to_string(key: Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
