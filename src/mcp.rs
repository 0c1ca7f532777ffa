use std::sync::Arc;

use rmcp::{
    ServerHandler,
    ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult,
        Content,
        Implementation,
        ServerCapabilities,
        ServerInfo,
    },
    tool,
    tool_handler,
    tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    cache::ReportFeed,
    error,
    render::{self, Listing},
};

#[derive(Clone)]
pub struct ReportdeckMcpServer {
    feed: Arc<ReportFeed>,
    tool_router: ToolRouter<Self>,
}

impl ReportdeckMcpServer {
    pub fn new(feed: ReportFeed) -> Self {
        Self {
            feed: Arc::new(feed),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router(router = tool_router)]
impl ReportdeckMcpServer {
    /// Filter the report listing by a case-insensitive substring.
    #[tool(
        name = "reportdeck_search",
        description = "Search reports by title, description, author or tag. An empty query lists every report."
    )]
    pub async fn reportdeck_search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let reports = self.feed.reports().await;
        let listing = Listing::new(&reports, &params.query).limit(params.limit);

        let structured = serde_json::to_value(listing.body())
            .map_err(|e| mcp_error("failed to serialize reports", e))?;

        let mut result = CallToolResult::success(vec![Content::text(render::format_summary(&listing))]);
        result.structured_content = Some(structured);
        Ok(result)
    }

    /// Re-ingest reports now instead of waiting for the listing to expire.
    #[tool(
        name = "reportdeck_rebuild",
        description = "Re-fetch every report from the source and return the new listing."
    )]
    pub async fn reportdeck_rebuild(
        &self,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let regeneration = self.feed.regenerate().await;
        let summary = format!(
            "Rebuilt {} report(s); valid for {}s",
            regeneration.reports.len(),
            regeneration.revalidate.as_secs()
        );
        let structured = serde_json::to_value(&regeneration)
            .map_err(|e| mcp_error("failed to serialize reports", e))?;

        let mut result = CallToolResult::success(vec![Content::text(summary)]);
        result.structured_content = Some(structured);
        Ok(result)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for ReportdeckMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_server_info(
                Implementation::new("reportdeck", env!("CARGO_PKG_VERSION"))
                    .with_title("reportdeck MCP"),
            )
            .with_instructions(
                "Use reportdeck_search to find reports. Matching is a plain case-insensitive substring test.",
            )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Text to look for. Empty matches every report.
    #[serde(default)]
    pub query: String,
    /// Maximum number of reports to return.
    pub limit: Option<usize>,
}

fn mcp_error(message: &str, error: impl std::fmt::Display) -> rmcp::ErrorData {
    rmcp::ErrorData::internal_error(
        message.to_string(),
        Some(json!({ "error": error.to_string() })),
    )
}

/// Serve the MCP protocol over stdin/stdout until the client disconnects.
pub async fn serve_stdio(feed: ReportFeed) -> error::Result<()> {
    let server = ReportdeckMcpServer::new(feed);

    let transport = rmcp::transport::stdio();
    let running = server.serve(transport).await.map_err(|e| {
        error::Error::Config(format!("MCP server initialization failed: {e}"))
    })?;
    running
        .waiting()
        .await
        .map_err(|e| error::Error::Config(format!("MCP server error: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::source::{LocalDirSource, Source};

    fn server_with_reports() -> (ReportdeckMcpServer, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("outage.md"),
            "---\ntitle: Outage Postmortem\nauthor: Alice\ntags: [infra]\n---\n",
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("billing.md"),
            "---\ntitle: Billing Bug\nauthor: Bob\ntags: [billing, urgent]\n---\n",
        )
        .unwrap();

        let feed = ReportFeed::new(
            Source::Local(LocalDirSource::new(tmp.path())),
            Duration::from_secs(3600),
        );
        (ReportdeckMcpServer::new(feed), tmp)
    }

    fn summary(result: &CallToolResult) -> String {
        result
            .content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn search_tool_returns_structured_results() {
        let (server, _tmp) = server_with_reports();

        let result = server
            .reportdeck_search(Parameters(SearchParams {
                query: "bob".to_string(),
                limit: None,
            }))
            .await
            .unwrap();

        let structured = result.structured_content.clone().expect("structured");
        let results = structured
            .get("results")
            .and_then(|v| v.as_array())
            .expect("results array");

        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].get("slug").and_then(|v| v.as_str()),
            Some("billing")
        );
        assert!(summary(&result).contains("Found 1 report"));
    }

    #[tokio::test]
    async fn search_tool_reports_empty_state() {
        let (server, _tmp) = server_with_reports();

        let result = server
            .reportdeck_search(Parameters(SearchParams {
                query: "zzz".to_string(),
                limit: None,
            }))
            .await
            .unwrap();

        let structured = result.structured_content.clone().expect("structured");
        assert_eq!(
            structured.get("emptyState").and_then(|v| v.as_str()),
            Some(render::NO_MATCHES)
        );
        assert_eq!(summary(&result), render::NO_MATCHES);
    }

    #[tokio::test]
    async fn rebuild_tool_picks_up_new_files() {
        let (server, tmp) = server_with_reports();

        server
            .reportdeck_search(Parameters(SearchParams {
                query: String::new(),
                limit: None,
            }))
            .await
            .unwrap();
        std::fs::write(tmp.path().join("new.md"), "---\ntitle: Fresh\n---\n")
            .unwrap();

        let result = server.reportdeck_rebuild().await.unwrap();
        let structured = result.structured_content.expect("structured");

        assert_eq!(structured["reports"].as_array().map(Vec::len), Some(3));
        assert_eq!(structured["revalidate"], 3600);
    }
}
