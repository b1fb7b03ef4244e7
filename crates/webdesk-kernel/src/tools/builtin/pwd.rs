//! pwd: Print working directory.

use async_trait::async_trait;

use crate::interpreter::ExecResult;
use crate::tools::{ExecContext, Tool, ToolArgs};

/// Pwd tool: prints the current working directory.
pub struct Pwd;

#[async_trait]
impl Tool for Pwd {
    fn name(&self) -> &str {
        "pwd"
    }

    fn description(&self) -> &str {
        "Print working directory"
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        ExecResult::success(ctx.cwd.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::testing;
    use crate::vfs::VfsPath;

    #[tokio::test]
    async fn test_pwd_home_and_root() {
        let mut ctx = testing::ctx();
        let result = Pwd.execute(ToolArgs::new(), &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["/home/guest"]);

        ctx.set_cwd(VfsPath::root());
        let result = Pwd.execute(ToolArgs::new(), &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["/"]);
    }
}
