use std::borrow::Cow;
use std::marker::PhantomData;

use bubble_core::{AnalyzeContentArgs, GenerateVisualizationArgs, JsonObject};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    tool, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Deserializer};

use crate::router::{self, Method, RouterError};

const INSTRUCTIONS: &str = r#"thought-bubble turns documentation into prompts for interactive HTML visualizations with Mermaid diagrams. It never calls a model itself; every tool returns prompt text for you to send to your LLM.

## Workflow
1. Call `analyze_content` with the documentation. Send the returned prompt to your LLM; it answers with a numbered list of workflows, systems, data models and relationships.
2. Let the user pick items by number, then call `generate_visualization` with the original content, the chosen items (id, title, description, diagramType) and optionally a theme and navigation style.
3. Send the step-1 prompt to your LLM. Its reply contains one `### Diagram for Item N` mermaid block per item.
4. Build the final HTML prompt from the content, the parsed diagrams, the theme and navigation style, and send it to your LLM to get a single self-contained HTML file."#;

/// Tool arguments kept as the raw JSON object so validation can report
/// every bad field at once. Advertised with the input schema of `T`.
#[derive(Debug, Clone)]
pub struct ToolArgs<T> {
    object: JsonObject,
    _shape: PhantomData<fn() -> T>,
}

impl<T> ToolArgs<T> {
    pub fn new(object: JsonObject) -> Self {
        Self {
            object,
            _shape: PhantomData,
        }
    }
}

impl<'de, T> Deserialize<'de> for ToolArgs<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonObject::deserialize(deserializer).map(Self::new)
    }
}

impl<T: JsonSchema> JsonSchema for ToolArgs<T> {
    fn schema_name() -> Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        T::json_schema(generator)
    }
}

#[derive(Clone)]
pub struct BubbleServer {
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl BubbleServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Analyze documentation content to identify systems, workflows, data models, and relationships that would benefit from visualization. Returns a prompt for LLM analysis."
    )]
    fn analyze_content(
        &self,
        Parameters(args): Parameters<ToolArgs<AnalyzeContentArgs>>,
    ) -> Result<CallToolResult, McpError> {
        call(Method::AnalyzeContent, &args.object)
    }

    #[tool(
        description = "Generate an interactive HTML visualization with Mermaid diagrams for selected systems. Returns prompts for: (1) generating Mermaid diagrams, (2) creating the final HTML."
    )]
    fn generate_visualization(
        &self,
        Parameters(args): Parameters<ToolArgs<GenerateVisualizationArgs>>,
    ) -> Result<CallToolResult, McpError> {
        call(Method::GenerateVisualization, &args.object)
    }
}

impl Default for BubbleServer {
    fn default() -> Self {
        Self::new()
    }
}

fn call(method: Method, args: &JsonObject) -> Result<CallToolResult, McpError> {
    let reply = router::dispatch(method.name(), args)?;
    Ok(CallToolResult::success(vec![Content::text(reply.to_text())]))
}

impl ServerHandler for BubbleServer {
    /// Unknown tool names are rejected here, before the tool router would
    /// turn them into a generic invalid-params error.
    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        if !self.tool_router.has_route(&request.name) {
            let err = RouterError::MethodNotFound(request.name.into_owned());
            tracing::warn!(error = %err, "rejected tool call");
            return Err(err.into());
        }
        let tcc = ToolCallContext::new(self, request, context);
        self.tool_router.call(tcc).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            meta: None,
            next_cursor: None,
        })
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.tool_router.get(name).cloned()
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "thought-bubble-mcp-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::{model::ErrorCode, ServiceError, ServiceExt};
    use serde_json::{json, Value};

    fn args<T>(value: Value) -> Parameters<ToolArgs<T>> {
        let object = serde_json::from_value(value).expect("object arguments");
        Parameters(ToolArgs::new(object))
    }

    fn reply_text(result: &CallToolResult) -> String {
        let value = serde_json::to_value(result).expect("serialize result");
        value["content"][0]["text"]
            .as_str()
            .expect("text content")
            .to_string()
    }

    #[test]
    fn tools_advertise_both_operations_with_object_schemas() {
        let tools = BubbleServer::tool_router().list_all();
        let mut names: Vec<String> = tools.iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["analyze_content", "generate_visualization"]);

        for tool in &tools {
            assert!(tool.description.is_some(), "{} has no description", tool.name);
            assert_eq!(tool.input_schema.get("type"), Some(&json!("object")));
        }

        let generate = tools
            .iter()
            .find(|t| t.name == "generate_visualization")
            .expect("generate tool");
        let properties = generate.input_schema["properties"]
            .as_object()
            .expect("properties");
        for field in ["content", "selectedSystems", "theme", "navigationStyle"] {
            assert!(properties.contains_key(field), "missing {field}");
        }
        let required = generate.input_schema["required"].as_array().expect("required");
        assert!(required.contains(&json!("content")));
        assert!(required.contains(&json!("selectedSystems")));
        assert!(!required.contains(&json!("theme")));
    }

    #[test]
    fn tool_args_accept_any_object() {
        let parsed: ToolArgs<AnalyzeContentArgs> =
            serde_json::from_value(json!({"content": 3, "extra": true})).unwrap();
        assert_eq!(parsed.object.len(), 2);
    }

    #[tokio::test]
    async fn analyze_content_returns_prompt_text() {
        let server = BubbleServer::new();
        let result = server
            .analyze_content(args(json!({"content": "Users log in via SSO."})))
            .expect("analyze_content");
        assert_ne!(result.is_error, Some(true));
        let text = reply_text(&result);
        assert!(text.starts_with("ANALYSIS PROMPT FOR LLM:"));
        assert!(text.contains("Users log in via SSO."));
    }

    #[tokio::test]
    async fn generate_visualization_returns_both_steps() {
        let server = BubbleServer::new();
        let result = server
            .generate_visualization(args(json!({
                "content": "Users log in via SSO.",
                "selectedSystems": [
                    {"id": 1, "title": "Login", "description": "SSO handshake", "diagramType": "sequence"}
                ],
                "theme": "minimal"
            })))
            .expect("generate_visualization");
        let text = reply_text(&result);
        assert!(text.contains("1. Login (SSO handshake) - Diagram type: sequence"));
        assert!(text.contains("- minimal theme"));
        assert!(text.contains("- sidebar navigation"));
    }

    #[tokio::test]
    async fn invalid_arguments_fail_the_call() {
        let server = BubbleServer::new();
        let err = server
            .generate_visualization(args(json!({
                "content": "x",
                "selectedSystems": [{"id": 1, "title": "A", "description": "B"}],
                "theme": "neon"
            })))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("selectedSystems.0.diagramType: Required"));
        assert!(err.message.contains("theme: Invalid enum value."));
    }

    #[test]
    fn server_info_enables_tools() {
        let info = BubbleServer::new().get_info();
        assert!(info.capabilities.tools.is_some());
        assert_eq!(info.server_info.name, "thought-bubble-mcp-server");
        let instructions = info.instructions.as_deref().expect("instructions");
        assert!(instructions.contains("analyze_content"));
        assert!(instructions.contains("one `### Diagram for Item N` mermaid block per item."));
        assert!(instructions.ends_with("a single self-contained HTML file."));
    }

    #[tokio::test]
    async fn unknown_tools_are_method_not_found_over_the_wire() -> anyhow::Result<()> {
        let (server_transport, client_transport) = tokio::io::duplex(4096);
        let server_handle = tokio::spawn(async move {
            BubbleServer::new()
                .serve(server_transport)
                .await?
                .waiting()
                .await?;
            anyhow::Ok(())
        });
        let client = ().serve(client_transport).await?;

        let err = client
            .call_tool(CallToolRequestParams {
                meta: None,
                name: "summarize".into(),
                arguments: None,
                task: None,
            })
            .await
            .unwrap_err();
        let ServiceError::McpError(error) = err else {
            panic!("expected an MCP error");
        };
        assert_eq!(error.code, ErrorCode::METHOD_NOT_FOUND);
        assert_eq!(error.message, "Unknown tool: summarize");

        let err = client
            .call_tool(CallToolRequestParams {
                meta: None,
                name: "analyze_content".into(),
                arguments: Some(JsonObject::new()),
                task: None,
            })
            .await
            .unwrap_err();
        let ServiceError::McpError(error) = err else {
            panic!("expected an MCP error");
        };
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(error.message, "Invalid parameters: content: Required");

        let tools = client.list_all_tools().await?;
        assert_eq!(tools.len(), 2);

        client.cancel().await?;
        server_handle.await??;
        Ok(())
    }
}
