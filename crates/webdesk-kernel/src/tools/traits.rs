//! The Tool trait and its arguments.

use async_trait::async_trait;

use super::ExecContext;
use crate::interpreter::ExecResult;

/// Arguments after glob expansion, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolArgs {
    /// Positional arguments, in order. Piped input arrives as the last one
    /// unless the tool [reads stdin](Tool::reads_stdin).
    pub positional: Vec<String>,
    /// Flag words as typed, e.g. `-la` or `--all`.
    pub flags: Vec<String>,
    /// Flags and positionals interleaved as typed, for tools like `echo`
    /// that print their arguments verbatim.
    pub words: Vec<String>,
    /// Output of the previous pipeline stage, for tools that read stdin.
    /// Always text, never a path.
    pub stdin: Option<String>,
}

impl ToolArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional-only arguments.
    pub fn positional<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let positional: Vec<String> = args.into_iter().map(Into::into).collect();
        Self {
            words: positional.clone(),
            positional,
            ..Self::default()
        }
    }

    /// Builder: set piped input.
    pub fn with_stdin(mut self, text: impl Into<String>) -> Self {
        self.stdin = Some(text.into());
        self
    }

    /// Builder: add a flag word.
    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.push_flag(flag);
        self
    }

    pub fn push_flag(&mut self, flag: impl Into<String>) {
        let flag = flag.into();
        self.words.push(flag.clone());
        self.flags.push(flag);
    }

    /// Append a positional argument, as a pipe does with captured output.
    pub fn push_positional(&mut self, arg: impl Into<String>) {
        let arg = arg.into();
        self.words.push(arg.clone());
        self.positional.push(arg);
    }

    /// True if a short flag cluster contains `c` (`-la` has `l` and `a`).
    pub fn has_flag(&self, c: char) -> bool {
        self.flags
            .iter()
            .filter(|f| !f.starts_with("--"))
            .any(|f| f.strip_prefix('-').is_some_and(|rest| rest.contains(c)))
    }

    /// True if `--name` was given.
    pub fn has_long(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f.strip_prefix("--") == Some(name))
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.get(0)
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }
}

/// A command the terminal can run.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name typed at the prompt.
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Detached tools run as their own task when last in a pipeline, so a
    /// slow network call never blocks the prompt.
    fn detached(&self) -> bool {
        false
    }

    /// Tools that read stdin get piped output in [`ToolArgs::stdin`];
    /// others get it as their last positional argument.
    fn reads_stdin(&self) -> bool {
        false
    }

    /// Execute the tool. Failures are reported in the result, never panics.
    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult;
}

/// A tool backed by a plain closure, for host-registered commands.
pub struct FnTool<F> {
    name: String,
    description: String,
    handler: F,
}

impl<F> FnTool<F>
where
    F: Fn(&ToolArgs, &mut ExecContext) -> ExecResult + Send + Sync,
{
    pub fn new(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            handler,
        }
    }
}

#[async_trait]
impl<F> Tool for FnTool<F>
where
    F: Fn(&ToolArgs, &mut ExecContext) -> ExecResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        (self.handler)(&args, ctx)
    }
}
