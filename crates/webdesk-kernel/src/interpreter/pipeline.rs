//! Pipeline execution.

use std::sync::Arc;

use super::command::{is_flag, parse, Command};
use super::glob;
use super::result::{ExecResult, LineStyle, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs, ToolRegistry};
use crate::vfs::VfsPath;

/// Exit code for an unknown command.
const NOT_FOUND: i64 = 127;

/// Outcome of [`Interpreter::execute`].
pub enum Execution {
    /// The whole pipeline ran.
    Finished(ExecResult),
    /// The last segment is a detached tool that still has to run.
    Detached(DetachedJob),
}

impl std::fmt::Debug for Execution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finished(result) => f.debug_tuple("Finished").field(result).finish(),
            Self::Detached(job) => f.debug_tuple("Detached").field(job).finish(),
        }
    }
}

impl Execution {
    /// Run any detached part to completion and return the combined result.
    pub async fn finish(self) -> ExecResult {
        match self {
            Self::Finished(result) => result,
            Self::Detached(mut job) => {
                let mut lines = std::mem::take(&mut job.lead);
                let mut result = job.run().await;
                lines.append(&mut result.lines);
                result.lines = lines;
                result
            }
        }
    }
}

/// A detached tool call, ready to be spawned.
///
/// It owns a copy of the context, so the session can move on while it runs.
/// Working-directory changes made by the job are not seen by the session.
pub struct DetachedJob {
    /// Output of earlier pipeline segments, to print before the job's own.
    pub lead: Vec<OutputLine>,
    tool: Arc<dyn Tool>,
    args: ToolArgs,
    ctx: ExecContext,
}

impl std::fmt::Debug for DetachedJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetachedJob")
            .field("tool", &self.tool.name())
            .field("args", &self.args)
            .field("lead", &self.lead.len())
            .finish()
    }
}

impl DetachedJob {
    pub fn name(&self) -> &str {
        self.tool.name()
    }

    /// The job's own context, e.g. to route its early output to a queue.
    pub fn context_mut(&mut self) -> &mut ExecContext {
        &mut self.ctx
    }

    /// Run the tool. Lines it emitted while not live come first.
    pub async fn run(mut self) -> ExecResult {
        let mut result = self.tool.execute(self.args, &mut self.ctx).await;
        let mut lines = self.ctx.take_emitted();
        lines.append(&mut result.lines);
        result.lines = lines;
        result
    }
}

/// Runs command lines against a tool registry.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    tools: ToolRegistry,
}

impl Interpreter {
    pub fn new(tools: ToolRegistry) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolRegistry {
        &mut self.tools
    }

    /// Execute one command line.
    ///
    /// Segments run left to right. An unknown name stops the line at that
    /// segment; earlier segments have already run. Intermediate segments
    /// print their error lines directly and pass the rest on. The exit code
    /// is the last segment's.
    pub async fn execute(&self, line: &str, ctx: &mut ExecContext) -> Execution {
        let pipeline = match parse(line) {
            Ok(pipeline) => pipeline,
            Err(e) => return Execution::Finished(ExecResult::failure(2, e.to_string())),
        };
        let Some((last, init)) = pipeline.segments.split_last() else {
            return Execution::Finished(ExecResult::empty());
        };

        tracing::debug!(line, segments = pipeline.segments.len(), "executing");
        ctx.commands = self.tools.summaries();

        let mut lead = Vec::new();
        let mut piped: Option<String> = None;
        for cmd in init {
            let tool = match self.lookup(cmd) {
                Ok(tool) => tool,
                Err(result) => return Execution::Finished(prepend(lead, result)),
            };
            let args = build_args(cmd, tool.as_ref(), ctx, piped.take());
            let result = tool.execute(args, ctx).await;
            lead.extend(ctx.take_emitted());

            let (errors, output): (Vec<OutputLine>, Vec<OutputLine>) = result
                .lines
                .into_iter()
                .partition(|l| l.style == LineStyle::Error);
            lead.extend(errors);
            piped = Some(
                output
                    .iter()
                    .map(|l| l.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }

        let last_tool = match self.lookup(last) {
            Ok(tool) => tool,
            Err(result) => return Execution::Finished(prepend(lead, result)),
        };
        let args = build_args(last, last_tool.as_ref(), ctx, piped);
        if last_tool.detached() {
            return Execution::Detached(DetachedJob {
                lead,
                tool: last_tool,
                args,
                ctx: ctx.clone(),
            });
        }

        let result = last_tool.execute(args, ctx).await;
        lead.extend(ctx.take_emitted());
        Execution::Finished(prepend(lead, result))
    }

    fn lookup(&self, cmd: &Command) -> Result<Arc<dyn Tool>, ExecResult> {
        self.tools.get(&cmd.name).ok_or_else(|| {
            tracing::debug!(command = %cmd.name, "command not found");
            ExecResult::failure(NOT_FOUND, format!("bash: {}: command not found", cmd.name))
        })
    }
}

/// Put `lead` ahead of the result's own lines.
fn prepend(mut lead: Vec<OutputLine>, mut result: ExecResult) -> ExecResult {
    lead.append(&mut result.lines);
    result.lines = lead;
    result
}

/// Turn a parsed command into tool arguments: expand globs and keep typed
/// order. Piped input goes to stdin for tools that read it, otherwise it is
/// appended as the last positional.
fn build_args(cmd: &Command, tool: &dyn Tool, ctx: &ExecContext, piped: Option<String>) -> ToolArgs {
    let mut args = ToolArgs::new();
    for word in &cmd.args {
        if is_flag(word) {
            args.push_flag(word.text.clone());
        } else if !word.quoted && glob::is_glob(&word.text) {
            for name in expand_word(&word.text, ctx) {
                args.push_positional(name);
            }
        } else {
            args.push_positional(word.text.clone());
        }
    }
    match piped {
        Some(text) if tool.reads_stdin() => args.stdin = Some(text),
        Some(text) => args.push_positional(text),
        None => {}
    }
    args
}

/// Expand a glob against the folder its directory part names.
///
/// Only the last path component may hold wildcards. Every entry name is a
/// candidate, dotfiles included.
fn expand_word(pattern: &str, ctx: &ExecContext) -> Vec<String> {
    let (dir_part, base) = match pattern.rfind('/') {
        Some(i) => pattern.split_at(i + 1),
        None => ("", pattern),
    };
    if glob::is_glob(dir_part) {
        return vec![pattern.to_string()];
    }

    let dir: VfsPath = if dir_part.is_empty() {
        ctx.cwd.clone()
    } else {
        ctx.resolve_path(dir_part)
    };
    let names = match ctx.vfs.lock().get_folder(&dir) {
        Ok(folder) => folder.names(),
        Err(_) => return vec![pattern.to_string()],
    };

    let matches = glob::expand(base, names.iter().map(String::as_str));
    if matches.len() == 1 && matches[0] == base {
        return vec![pattern.to_string()];
    }
    matches
        .into_iter()
        .map(|name| format!("{dir_part}{name}"))
        .collect()
}
