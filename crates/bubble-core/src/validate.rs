//! Field-by-field validation of loosely typed tool arguments.
//!
//! Every problem is collected rather than stopping at the first one, so a
//! caller can fix all offending fields in a single resubmission.

use serde_json::Value;
use std::fmt;

use crate::{
    AnalyzeContentArgs, DiagramType, EnumLabel, GenerateVisualizationArgs, NavigationStyle,
    SelectedItem, Theme,
};

pub type JsonObject = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted path to the field, array elements addressed by index
    /// (e.g. `selectedSystems.0.diagramType`).
    pub path: String,
    pub reason: String,
}

impl FieldIssue {
    fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid parameters: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Whether any issue was reported for exactly this path.
    pub fn mentions(&self, path: &str) -> bool {
        self.issues.iter().any(|i| i.path == path)
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate arguments for the `analyze_content` operation.
pub fn analyze_content_args(args: &JsonObject) -> Result<AnalyzeContentArgs, ValidationError> {
    let mut issues = Vec::new();
    let content = non_empty_string(args, "content", "", &mut issues);

    match content {
        Some(content) if issues.is_empty() => Ok(AnalyzeContentArgs { content }),
        _ => Err(ValidationError { issues }),
    }
}

/// Validate arguments for the `generate_visualization` operation.
/// `theme` and `navigationStyle` fall back to their defaults when absent.
pub fn generate_visualization_args(
    args: &JsonObject,
) -> Result<GenerateVisualizationArgs, ValidationError> {
    let mut issues = Vec::new();

    let content = string_field(args, "content", "", &mut issues);
    let selected_systems = selected_items(args, &mut issues);
    let theme = enum_field(args, "theme", "", Some(Theme::default()), &mut issues);
    let navigation_style = enum_field(
        args,
        "navigationStyle",
        "",
        Some(NavigationStyle::default()),
        &mut issues,
    );

    match (content, selected_systems, theme, navigation_style) {
        (Some(content), Some(selected_systems), Some(theme), Some(navigation_style))
            if issues.is_empty() =>
        {
            Ok(GenerateVisualizationArgs {
                content,
                selected_systems,
                theme,
                navigation_style,
            })
        }
        _ => Err(ValidationError { issues }),
    }
}

fn selected_items(args: &JsonObject, issues: &mut Vec<FieldIssue>) -> Option<Vec<SelectedItem>> {
    let key = "selectedSystems";
    let entries = match args.get(key) {
        None => {
            issues.push(FieldIssue::new(key, "Required"));
            return None;
        }
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            issues.push(FieldIssue::new(key, expected("array", other)));
            return None;
        }
    };

    let mut items = Vec::with_capacity(entries.len());
    let mut all_valid = true;
    for (idx, entry) in entries.iter().enumerate() {
        let path = format!("{key}.{idx}");
        let Value::Object(obj) = entry else {
            issues.push(FieldIssue::new(path, expected("object", entry)));
            all_valid = false;
            continue;
        };

        let id = integer_field(obj, "id", &path, issues);
        let title = string_field(obj, "title", &path, issues);
        let description = string_field(obj, "description", &path, issues);
        let diagram_type = enum_field::<DiagramType>(obj, "diagramType", &path, None, issues);

        match (id, title, description, diagram_type) {
            (Some(id), Some(title), Some(description), Some(diagram_type)) => {
                items.push(SelectedItem {
                    id,
                    title,
                    description,
                    diagram_type,
                });
            }
            _ => all_valid = false,
        }
    }

    all_valid.then_some(items)
}

// --- Field checks ---

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
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

fn expected(want: &str, got: &Value) -> String {
    format!("Expected {}, received {}", want, type_name(got))
}

fn string_field(
    obj: &JsonObject,
    key: &str,
    prefix: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    let path = join_path(prefix, key);
    match obj.get(key) {
        None => {
            issues.push(FieldIssue::new(path, "Required"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            issues.push(FieldIssue::new(path, expected("string", other)));
            None
        }
    }
}

fn non_empty_string(
    obj: &JsonObject,
    key: &str,
    prefix: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    let value = string_field(obj, key, prefix, issues)?;
    if value.is_empty() {
        issues.push(FieldIssue::new(
            join_path(prefix, key),
            "String must contain at least 1 character(s)",
        ));
        return None;
    }
    Some(value)
}

fn integer_field(
    obj: &JsonObject,
    key: &str,
    prefix: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<i64> {
    let path = join_path(prefix, key);
    match obj.get(key) {
        None => {
            issues.push(FieldIssue::new(path, "Required"));
            None
        }
        Some(Value::Number(n)) => match n.as_i64() {
            Some(v) => Some(v),
            None if n.is_f64() => {
                issues.push(FieldIssue::new(path, "Expected integer, received float"));
                None
            }
            // Only a u64 above i64::MAX gets here.
            None => {
                issues.push(FieldIssue::new(
                    path,
                    format!("Number must be less than or equal to {}", i64::MAX),
                ));
                None
            }
        },
        Some(other) => {
            issues.push(FieldIssue::new(path, expected("number", other)));
            None
        }
    }
}

/// Parse one of a closed set of labels. Absent fields take `default` when
/// one is given; `null` is never treated as absent.
fn enum_field<T: EnumLabel>(
    obj: &JsonObject,
    key: &str,
    prefix: &str,
    default: Option<T>,
    issues: &mut Vec<FieldIssue>,
) -> Option<T> {
    let path = join_path(prefix, key);
    let allowed = || {
        T::ALL
            .iter()
            .map(|v| format!("'{}'", v.as_str()))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    match obj.get(key) {
        None => {
            if default.is_none() {
                issues.push(FieldIssue::new(path, "Required"));
            }
            default
        }
        Some(Value::String(label)) => match T::parse(label) {
            Some(v) => Some(v),
            None => {
                issues.push(FieldIssue::new(
                    path,
                    format!(
                        "Invalid enum value. Expected {}, received '{}'",
                        allowed(),
                        label
                    ),
                ));
                None
            }
        },
        Some(other) => {
            issues.push(FieldIssue::new(
                path,
                format!("Expected {}, received {}", allowed(), type_name(other)),
            ));
            None
        }
    }
}
