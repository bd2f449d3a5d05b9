//! Method dispatch for the two visualization operations.
//!
//! Arguments are validated before any prompt is built; a call either yields
//! a complete reply or a single error describing everything that was wrong.

use bubble_core::{
    validate, AnalyzeContentArgs, EnumLabel, GenerateVisualizationArgs, JsonObject,
    ValidationError,
};
use bubble_prompts::{analysis_prompt, visualization_prompts, VisualizationPrompts};
use rmcp::{model::ErrorCode, ErrorData as McpError};

/// Number of content characters echoed back in the step-2 summary.
const CONTENT_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    AnalyzeContent,
    GenerateVisualization,
}

impl Method {
    pub fn name(self) -> &'static str {
        match self {
            Method::AnalyzeContent => "analyze_content",
            Method::GenerateVisualization => "generate_visualization",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "analyze_content" => Some(Method::AnalyzeContent),
            "generate_visualization" => Some(Method::GenerateVisualization),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error(transparent)]
    InvalidParameters(#[from] ValidationError),
    #[error("Unknown tool: {0}")]
    MethodNotFound(String),
}

impl From<RouterError> for McpError {
    fn from(err: RouterError) -> Self {
        let message = err.to_string();
        match err {
            RouterError::InvalidParameters(_) => McpError::invalid_params(message, None),
            RouterError::MethodNotFound(_) => {
                McpError::new(ErrorCode::METHOD_NOT_FOUND, message, None)
            }
        }
    }
}

/// A validated call, one variant per operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    AnalyzeContent(AnalyzeContentArgs),
    GenerateVisualization(GenerateVisualizationArgs),
}

impl Request {
    pub fn parse(method: &str, args: &JsonObject) -> Result<Self, RouterError> {
        let method =
            Method::from_name(method).ok_or_else(|| RouterError::MethodNotFound(method.into()))?;
        let request = match method {
            Method::AnalyzeContent => {
                Request::AnalyzeContent(validate::analyze_content_args(args)?)
            }
            Method::GenerateVisualization => {
                Request::GenerateVisualization(validate::generate_visualization_args(args)?)
            }
        };
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Analysis {
        prompt: String,
    },
    Visualization {
        prompts: VisualizationPrompts,
        args: GenerateVisualizationArgs,
    },
}

impl Reply {
    /// Text handed back to the MCP client.
    pub fn to_text(&self) -> String {
        match self {
            Reply::Analysis { prompt } => format!(
                "ANALYSIS PROMPT FOR LLM:\n\n{prompt}\n\n---\n\n\
Send this prompt to your LLM to identify visualization opportunities. \
The LLM will return a structured list of systems, workflows, and data models found in the content."
            ),
            Reply::Visualization { prompts, args } => {
                let preview: String = args.content.chars().take(CONTENT_PREVIEW_CHARS).collect();
                let theme = args.theme.as_str();
                let navigation = args.navigation_style.as_str();
                format!(
                    "STEP 1: GENERATE MERMAID DIAGRAMS\n\n\
Send this prompt to your LLM to generate Mermaid diagram code:\n\n\
---\n{step1}\n---\n\n\
STEP 2: GENERATE FINAL HTML\n\n\
After receiving the Mermaid diagrams from the LLM, construct the final HTML generation prompt by:\n\n\
1. Parsing the Mermaid code blocks from the LLM response\n\
2. Building the final prompt that includes:\n   \
- Original content: {preview}...\n   \
- Generated Mermaid diagrams\n   \
- Theme: {theme}\n   \
- Navigation: {navigation}\n\n\
{step2}\n\n\
The final prompt will instruct the LLM to create a complete, self-contained HTML file with:\n\
- Inline CSS and JavaScript\n\
- Mermaid diagrams embedded in appropriate sections\n\
- Responsive design\n\
- {navigation} navigation\n\
- {theme} theme\n\n\
Send the final prompt to the LLM to receive your complete HTML visualization.",
                    step1 = prompts.step1_prompt,
                    step2 = prompts.step2_instructions,
                )
            }
        }
    }
}

/// Validate `args` for `method` and build its reply.
pub fn dispatch(method: &str, args: &JsonObject) -> Result<Reply, RouterError> {
    let request = Request::parse(method, args).inspect_err(|e| {
        tracing::warn!(tool = method, error = %e, "rejected tool call");
    })?;
    tracing::info!(tool = method, "dispatching tool call");

    let reply = match request {
        Request::AnalyzeContent(args) => Reply::Analysis {
            prompt: analysis_prompt(&args.content),
        },
        Request::GenerateVisualization(args) => {
            tracing::debug!(selected = args.selected_systems.len(), "building diagram prompt");
            Reply::Visualization {
                prompts: visualization_prompts(&args),
                args,
            }
        }
    };
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::{json, Value};

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("test arguments must be an object"),
        }
    }

    #[test]
    fn analyze_reply_wraps_prompt() {
        let reply = dispatch(
            "analyze_content",
            &object(json!({"content": "Orders flow into billing."})),
        )
        .unwrap();
        let text = reply.to_text();
        assert!(text.starts_with("ANALYSIS PROMPT FOR LLM:\n\nAnalyze the following content"));
        assert!(text.contains("---\nOrders flow into billing.\n---"));
        assert!(text.ends_with("data models found in the content."));
    }

    #[test]
    fn generate_reply_has_both_steps() {
        let reply = dispatch(
            "generate_visualization",
            &object(json!({
                "content": "Orders flow into billing.",
                "selectedSystems": [
                    {"id": 2, "title": "Billing", "description": "Invoices", "diagramType": "sequence"}
                ],
                "navigationStyle": "tabs"
            })),
        )
        .unwrap();

        let Reply::Visualization { prompts, .. } = &reply else {
            panic!("expected a visualization reply");
        };
        assert!(prompts
            .step1_prompt
            .contains("1. Billing (Invoices) - Diagram type: sequence"));

        let text = reply.to_text();
        assert!(text.starts_with("STEP 1: GENERATE MERMAID DIAGRAMS"));
        assert!(text.contains("STEP 2: GENERATE FINAL HTML"));
        assert!(text.contains("   - Original content: Orders flow into billing....\n"));
        assert!(text.contains("   - Theme: professional\n   - Navigation: tabs\n"));
        assert!(text.contains("- tabs navigation\n- professional theme"));
    }

    #[test]
    fn content_preview_is_truncated_on_char_boundaries() {
        let content = "é".repeat(150);
        let reply = dispatch(
            "generate_visualization",
            &object(json!({"content": content, "selectedSystems": []})),
        )
        .unwrap();
        let expected = format!("Original content: {}...", "é".repeat(100));
        assert!(reply.to_text().contains(&expected));
    }

    #[rstest]
    #[case("summarize")]
    #[case("")]
    #[case("Analyze_Content")]
    fn unknown_methods_are_named(#[case] method: &str) {
        let err = dispatch(method, &JsonObject::new()).unwrap_err();
        assert!(matches!(&err, RouterError::MethodNotFound(name) if name == method));
        assert_eq!(err.to_string(), format!("Unknown tool: {method}"));

        let mcp: McpError = err.into();
        assert_eq!(mcp.code, ErrorCode::METHOD_NOT_FOUND);
    }

    #[test]
    fn missing_diagram_type_maps_to_invalid_params() {
        let err = dispatch(
            "generate_visualization",
            &object(json!({
                "content": "x",
                "selectedSystems": [{"id": 1, "title": "A", "description": "B"}]
            })),
        )
        .unwrap_err();
        let RouterError::InvalidParameters(validation) = &err else {
            panic!("expected invalid parameters");
        };
        assert!(validation.mentions("selectedSystems.0.diagramType"));

        let mcp: McpError = err.into();
        assert_eq!(mcp.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(
            mcp.message,
            "Invalid parameters: selectedSystems.0.diagramType: Required"
        );
    }

    #[test]
    fn method_names_round_trip() {
        for method in [Method::AnalyzeContent, Method::GenerateVisualization] {
            assert_eq!(Method::from_name(method.name()), Some(method));
        }
    }
}
