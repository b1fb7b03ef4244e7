//! Network probes: ping and curl.
//!
//! Both are detached: when last in a pipeline they run as their own task,
//! and their lines reach the print queue in order with everything else.

use std::time::Instant;

use async_trait::async_trait;

use crate::interpreter::{ExecResult, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};

/// Characters of a response body `curl` prints.
const CURL_PREVIEW_CHARS: usize = 1000;

/// Ping tool: times one HEAD request to the host.
///
/// The reply line is printed even when the request fails; the time is how
/// long the attempt took.
pub struct Ping;

fn ping_url(host: &str) -> String {
    if host.starts_with("http") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[async_trait]
impl Tool for Ping {
    fn name(&self) -> &str {
        "ping"
    }

    fn description(&self) -> &str {
        "Check connectivity to a host"
    }

    fn detached(&self) -> bool {
        true
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let Some(host) = args.first() else {
            return ExecResult::failure(1, "Usage: ping <host>");
        };
        let url = ping_url(host);

        ctx.emit(OutputLine::plain(format!("PING {host} ...")));
        let started = Instant::now();
        if let Err(e) = ctx.http.head(&url).await {
            tracing::debug!(%url, error = %e, "ping request failed");
        }
        let elapsed = started.elapsed().as_secs_f64() * 1000.0;

        ExecResult::success(format!("Reply from {host}: time={elapsed:.2}ms"))
    }
}

/// Curl tool: prints the start of a response body.
pub struct Curl;

#[async_trait]
impl Tool for Curl {
    fn name(&self) -> &str {
        "curl"
    }

    fn description(&self) -> &str {
        "Fetch a URL"
    }

    fn detached(&self) -> bool {
        true
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let Some(url) = args.first() else {
            return ExecResult::failure(1, "Usage: curl <url>");
        };

        match ctx.http.get_text(url).await {
            Ok(body) => {
                let preview: String = body.chars().take(CURL_PREVIEW_CHARS).collect();
                ExecResult::success(preview)
            }
            Err(e) => {
                tracing::debug!(%url, error = %e, "curl request failed");
                ExecResult::failure(6, format!("curl: (6) Could not resolve host: {url}"))
            }
        }
    }
}
