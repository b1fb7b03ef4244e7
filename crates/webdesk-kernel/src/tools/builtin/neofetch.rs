//! neofetch: Session summary with a small logo.

use async_trait::async_trait;

use crate::interpreter::{ExecResult, LineStyle, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};

const LOGO: [&str; 7] = [
    "        /\\        ",
    "       /  \\       ",
    "      /\\   \\      ",
    "     /  __  \\     ",
    "    /  |  |  \\    ",
    "   /___|  |___\\   ",
    "                  ",
];

/// Neofetch tool: identity, uptime, window count and screen size.
pub struct Neofetch;

/// `3h, 7m`.
fn format_uptime(secs: u64) -> String {
    format!("{}h, {}m", secs / 3600, (secs % 3600) / 60)
}

#[async_trait]
impl Tool for Neofetch {
    fn name(&self) -> &str {
        "neofetch"
    }

    fn description(&self) -> &str {
        "Show system information"
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let (window_count, viewport) = {
            let windows = ctx.windows.lock();
            (windows.len(), windows.viewport())
        };
        let title = format!("{}@{}", ctx.identity.username, ctx.identity.hostname);
        let facts = [
            title.clone(),
            "-".repeat(title.chars().count()),
            "OS        webdesk".to_string(),
            format!("KERNEL    webdesk-kernel {}", env!("CARGO_PKG_VERSION")),
            format!("WINDOWS   {window_count}"),
            format!("RESOLUTION {}x{}", viewport.width, viewport.height),
            format!("UPTIME    {}", format_uptime(ctx.started_at.elapsed().as_secs())),
        ];

        let mut lines = vec![OutputLine::plain("")];
        lines.extend(
            LOGO.iter()
                .zip(&facts)
                .map(|(logo, fact)| OutputLine::styled(format!("{logo}{fact}"), LineStyle::Accent)),
        );
        ExecResult::from_lines(lines)
    }
}
