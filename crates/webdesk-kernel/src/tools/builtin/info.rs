//! Identity and system information tools: whoami, hostname, date, uname.

use async_trait::async_trait;

use crate::interpreter::ExecResult;
use crate::tools::{ExecContext, Tool, ToolArgs};

/// Kernel string `uname` reports after the hostname.
const KERNEL_RELEASE: &str = "6.1.23-arch1-1 #1 SMP PREEMPT x86_64 GNU/Linux";

/// Whoami tool: prints the session's username.
pub struct Whoami;

#[async_trait]
impl Tool for Whoami {
    fn name(&self) -> &str {
        "whoami"
    }

    fn description(&self) -> &str {
        "Print current user"
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        ExecResult::success(ctx.identity.username.clone())
    }
}

/// Hostname tool.
pub struct Hostname;

#[async_trait]
impl Tool for Hostname {
    fn name(&self) -> &str {
        "hostname"
    }

    fn description(&self) -> &str {
        "Print system hostname"
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        ExecResult::success(ctx.identity.hostname.clone())
    }
}

/// Date tool: local time, e.g. `Fri Oct 16 2026 09:30:00 GMT+0200`.
pub struct Date;

#[async_trait]
impl Tool for Date {
    fn name(&self) -> &str {
        "date"
    }

    fn description(&self) -> &str {
        "Print current date and time"
    }

    async fn execute(&self, _args: ToolArgs, _ctx: &mut ExecContext) -> ExecResult {
        let now = chrono::Local::now();
        ExecResult::success(now.format("%a %b %d %Y %H:%M:%S GMT%z").to_string())
    }
}

/// Uname tool.
pub struct Uname;

#[async_trait]
impl Tool for Uname {
    fn name(&self) -> &str {
        "uname"
    }

    fn description(&self) -> &str {
        "Print system information"
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        ExecResult::success(format!("Linux {} {KERNEL_RELEASE}", ctx.identity.hostname))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::testing;

    #[tokio::test]
    async fn test_identity() {
        let mut ctx = testing::ctx();
        let result = Whoami.execute(ToolArgs::new(), &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["guest"]);
        let result = Hostname.execute(ToolArgs::new(), &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["webdesk"]);
    }

    #[tokio::test]
    async fn test_uname_uses_hostname() {
        let mut ctx = testing::ctx();
        let result = Uname.execute(ToolArgs::new(), &mut ctx).await;
        assert_eq!(
            testing::texts(&result),
            vec!["Linux webdesk 6.1.23-arch1-1 #1 SMP PREEMPT x86_64 GNU/Linux"]
        );
    }

    #[tokio::test]
    async fn test_date_shape() {
        let mut ctx = testing::ctx();
        let result = Date.execute(ToolArgs::new(), &mut ctx).await;
        let text = result.text();
        assert!(text.contains(" GMT"), "{text}");
        assert_eq!(text.split(' ').count(), 6, "{text}");
    }
}
