use easel_imagegen::{ImageService, OperationResponse, OutputTarget};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, JsonObject, ListToolsResult, PaginatedRequestParam,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt as _};

use crate::tools::{self, ToolKind};

const INSTRUCTIONS: &str = "Image generation and editing on Amazon Bedrock. Images can be passed as file paths \
or base64 data. Generated files are saved under the workspace output directory and their absolute paths are \
returned. Failed calls report an error_kind and whether retrying may help.";

/// MCP handler exposing every image operation as a tool
#[derive(Clone)]
pub struct EaselServer {
    service: ImageService,
}

impl EaselServer {
    pub fn new(service: ImageService) -> Self {
        Self { service }
    }

    /// Run one tool call by name
    ///
    /// Unknown names are a protocol error; every other outcome, including
    /// validation failures, is a tool result.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> Result<CallToolResult, ErrorData> {
        let Some(kind) = ToolKind::lookup(name) else {
            return Err(ErrorData::invalid_params(format!("unknown tool: {name}"), None));
        };

        let arguments = arguments.unwrap_or_default();
        let target = OutputTarget::from_args(&arguments);

        tracing::debug!(tool = name, "tool call");

        let response = match kind {
            ToolKind::Operation(operation) => self.service.call(operation, &arguments, &target).await,
            ToolKind::Mask(tool) => self.service.call_mask_tool(tool, &arguments, &target).await,
        };

        Ok(into_result(&response))
    }
}

fn into_result(response: &OperationResponse) -> CallToolResult {
    let text = serde_json::to_string_pretty(response).unwrap_or_else(|_| response.message.clone());
    if response.is_success() {
        CallToolResult::success(vec![Content::text(text)])
    } else {
        CallToolResult::error(vec![Content::text(text)])
    }
}

impl ServerHandler for EaselServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(tools::catalogue())))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move { self.dispatch(&request.name, request.arguments).await }
    }
}

/// Serve MCP over stdin/stdout until the peer disconnects or `shutdown` fires
pub async fn serve_stdio(server: EaselServer, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
    let service = server.serve(rmcp::transport::stdio()).await?;
    tracing::info!("MCP server ready on stdio");

    let cancel = service.cancellation_token();
    tokio::spawn(async move {
        shutdown.await;
        tracing::info!("shutdown signal received");
        cancel.cancel();
    });

    let reason = service.waiting().await?;
    tracing::info!(?reason, "MCP server stopped");
    Ok(())
}
