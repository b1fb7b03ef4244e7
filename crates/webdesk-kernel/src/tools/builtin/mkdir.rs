//! mkdir: Create folders.

use async_trait::async_trait;

use crate::interpreter::{ExecResult, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};
use crate::vfs::{VfsError, VfsPath, VirtualFs};

/// Mkdir tool: creates folders. `-p` creates missing parents and accepts
/// folders that already exist.
pub struct Mkdir;

#[async_trait]
impl Tool for Mkdir {
    fn name(&self) -> &str {
        "mkdir"
    }

    fn description(&self) -> &str {
        "Create a new directory"
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        if args.is_empty() {
            return ExecResult::failure(1, "mkdir: missing operand");
        }
        let parents = args.has_flag('p');

        let mut vfs = ctx.vfs.lock();
        let mut out = ExecResult::empty();
        for arg in &args.positional {
            let path = ctx.resolve_path(arg);
            let created = if parents {
                create_all(&mut vfs, &path)
            } else {
                match path.split_last() {
                    Some((parent, name)) => vfs.create_folder(&parent, name),
                    None => Err(VfsError::AlreadyExists(path.to_string())),
                }
            };
            match created {
                Ok(()) => out.push(OutputLine::plain(format!("Created directory: {arg}"))),
                Err(e) => {
                    out.push(OutputLine::error(format!(
                        "mkdir: cannot process '{arg}': {}",
                        e.reason()
                    )));
                    out.code = 1;
                }
            }
        }
        out
    }
}

/// Create every missing folder along `path`.
fn create_all(vfs: &mut VirtualFs, path: &VfsPath) -> Result<(), VfsError> {
    let mut current = VfsPath::root();
    for segment in path.segments() {
        if !vfs.exists(&current, segment) {
            vfs.create_folder(&current, segment)?;
        } else if vfs.is_file(&current, segment) {
            return Err(VfsError::NotADirectory(current.join(segment).to_string()));
        }
        current = current.join(segment);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::testing;

    #[tokio::test]
    async fn test_mkdir_creates() {
        let mut ctx = testing::ctx_with(&[]);
        let result = Mkdir.execute(ToolArgs::positional(["new"]), &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["Created directory: new"]);
        assert!(ctx.vfs.lock().get_folder(&ctx.cwd.join("new")).is_ok());
    }

    #[tokio::test]
    async fn test_mkdir_existing_fails() {
        let mut ctx = testing::ctx_with(&[("dup/", "")]);
        let result = Mkdir.execute(ToolArgs::positional(["dup"]), &mut ctx).await;
        assert!(!result.ok());
        assert_eq!(
            testing::texts(&result),
            vec!["mkdir: cannot process 'dup': File exists"]
        );
    }

    #[tokio::test]
    async fn test_mkdir_parents() {
        let mut ctx = testing::ctx_with(&[("dup/", "")]);
        let args = ToolArgs::positional(["a/b/c", "dup"]).flag("-p");
        let result = Mkdir.execute(args, &mut ctx).await;
        assert!(result.ok());
        assert!(ctx.vfs.lock().get_folder(&ctx.cwd.join("a").join("b").join("c")).is_ok());

        let result = Mkdir.execute(ToolArgs::positional(["x/y"]), &mut ctx).await;
        assert_eq!(
            testing::texts(&result),
            vec!["mkdir: cannot process 'x/y': No such file or directory"]
        );
    }

    #[tokio::test]
    async fn test_mkdir_missing_operand() {
        let mut ctx = testing::ctx();
        let result = Mkdir.execute(ToolArgs::new(), &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["mkdir: missing operand"]);
    }
}
