//! webdesk REPL: the desktop terminal in a real terminal.
//!
//! A line editor reads commands and hands them to one [`Terminal`] session.
//! Output goes through the session's print queue into a [`StyledSink`], so
//! the typing animation and ordering match the desktop front end. The VFS is
//! kept in a JSON file under the XDG data directory.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Style};
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};

use webdesk_kernel::interpreter::{complete, Completion, LineStyle};
use webdesk_kernel::scheduler::OutputSink;
use webdesk_kernel::state::paths;
use webdesk_kernel::tools::ExecContext;
use webdesk_kernel::vfs::FileStorage;
use webdesk_kernel::{Kernel, KernelConfig, Terminal};

/// Renders print-queue output onto a byte stream, with ANSI colors.
///
/// Echoed command lines are skipped unless `echo_commands` is set: the line
/// editor has already drawn what the user typed.
pub struct StyledSink<W> {
    out: W,
    colored: bool,
    echo_commands: bool,
    style: Option<Style>,
    skipping: bool,
}

impl<W: Write + Send + 'static> StyledSink<W> {
    pub fn new(out: W, colored: bool) -> Self {
        Self {
            out,
            colored,
            echo_commands: false,
            style: None,
            skipping: false,
        }
    }

    pub fn echo_commands(mut self, echo: bool) -> Self {
        self.echo_commands = echo;
        self
    }

    fn write(&mut self, text: impl std::fmt::Display) {
        if let Err(e) = write!(self.out, "{text}") {
            tracing::warn!("terminal write failed: {}", e);
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.out.flush() {
            tracing::warn!("terminal flush failed: {}", e);
        }
    }
}

fn style_for(style: LineStyle) -> Option<Style> {
    match style {
        LineStyle::Plain | LineStyle::Command => None,
        LineStyle::Folder => Some(Style::new().blue().bold()),
        LineStyle::Error => Some(Style::new().red()),
        LineStyle::Accent => Some(Style::new().cyan()),
    }
}

impl<W: Write + Send + 'static> OutputSink for StyledSink<W> {
    fn begin_line(&mut self, prompt: Option<&str>, style: LineStyle) {
        self.skipping = prompt.is_some() && !self.echo_commands;
        if self.skipping {
            return;
        }
        self.style = if self.colored { style_for(style) } else { None };
        if let Some(prompt) = prompt {
            if self.colored {
                self.write(prompt.green());
            } else {
                self.write(prompt);
            }
        }
        self.flush();
    }

    fn push_char(&mut self, c: char) {
        if self.skipping {
            return;
        }
        match self.style {
            Some(style) => self.write(c.style(style)),
            None => self.write(c),
        }
        self.flush();
    }

    fn end_line(&mut self) {
        if self.skipping {
            self.skipping = false;
            return;
        }
        self.write('\n');
        self.flush();
    }

    fn clear(&mut self) {
        if self.colored {
            self.write("\x1b[2J\x1b[H");
        }
        self.flush();
    }
}

/// Tab completion of VFS paths for the line editor.
///
/// Holds a snapshot of the session context, refreshed before every read so
/// completion sees the current directory.
pub struct PathCompleter {
    ctx: ExecContext,
}

impl PathCompleter {
    pub fn new(ctx: ExecContext) -> Self {
        Self { ctx }
    }

    pub fn refresh(&mut self, ctx: &ExecContext) {
        self.ctx = ctx.clone();
    }

    /// Byte offset where replacement starts, and the replacements.
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let left = &line[..pos.min(line.len())];
        let word_start = left
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8());

        match complete(&self.ctx, line, pos) {
            Completion::NoMatch => (pos, Vec::new()),
            Completion::Completed { line: done, cursor } => {
                (word_start, vec![done[word_start..cursor].to_string()])
            }
            Completion::Candidates(names) => {
                let base_start = left[word_start..]
                    .rfind('/')
                    .map_or(word_start, |i| word_start + i + 1);
                (base_start, names)
            }
        }
    }
}

impl Completer for PathCompleter {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(self.candidates(line, pos))
    }
}

impl Hinter for PathCompleter {
    type Hint = String;
}

impl Highlighter for PathCompleter {}

impl Validator for PathCompleter {}

impl Helper for PathCompleter {}

/// Where the REPL keeps its files.
#[derive(Debug, Clone)]
pub struct ReplPaths {
    pub config: PathBuf,
    pub storage: PathBuf,
    pub history: PathBuf,
}

impl ReplPaths {
    /// The XDG locations.
    pub fn standard() -> Self {
        Self {
            config: paths::config_file(),
            storage: paths::storage_dir(),
            history: paths::data_dir().join("history.txt"),
        }
    }

    /// Everything under one directory.
    pub fn under(dir: &Path) -> Self {
        Self {
            config: dir.join("config.toml"),
            storage: dir.join("storage"),
            history: dir.join("history.txt"),
        }
    }
}

/// Load the config and open a kernel over file-backed storage.
pub fn open_kernel(paths: &ReplPaths) -> Result<Kernel> {
    let config = KernelConfig::load_or_default(&paths.config)
        .with_context(|| format!("loading {}", paths.config.display()))?;
    let kernel = Kernel::new(config, FileStorage::new(&paths.storage))
        .with_context(|| format!("opening filesystem in {}", paths.storage.display()))?;
    tracing::info!(storage = %paths.storage.display(), "kernel ready");
    Ok(kernel)
}

/// Run the interactive REPL until end of input.
pub fn run() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    // The print queue worker is spawned onto this runtime.
    let _guard = runtime.enter();

    let paths = ReplPaths::standard();
    let kernel = open_kernel(&paths)?;
    let sink = StyledSink::new(io::stdout(), io::stdout().is_terminal());
    let mut terminal = kernel.open_terminal(sink);
    runtime.block_on(terminal.settle());

    let mut rl: Editor<PathCompleter, DefaultHistory> =
        Editor::new().context("Failed to create editor")?;
    rl.set_helper(Some(PathCompleter::new(terminal.context().clone())));
    if let Err(e) = rl.load_history(&paths.history) {
        tracing::debug!("no history loaded: {}", e);
    }

    loop {
        if let Some(helper) = rl.helper_mut() {
            helper.refresh(terminal.context());
        }

        match rl.readline(&terminal.prompt()) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                if let Err(e) = rl.add_history_entry(line.as_str()) {
                    tracing::debug!("history entry rejected: {}", e);
                }
                runtime.block_on(async {
                    terminal.submit(&line).await;
                    terminal.settle().await;
                });
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                terminal.close();
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    if let Some(parent) = paths.history.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    rl.save_history(&paths.history)
        .with_context(|| format!("saving history to {}", paths.history.display()))?;

    Ok(())
}

/// Open a kernel and terminal over `paths` and run `lines` through it,
/// returning everything printed. Used for scripted sessions and tests.
pub async fn run_script(paths: &ReplPaths, lines: &[&str]) -> Result<String> {
    let kernel = open_kernel(paths)?;
    let buffer = SharedBuffer::default();
    let sink = StyledSink::new(buffer.clone(), false).echo_commands(true);
    let mut terminal: Terminal = kernel.open_terminal(sink);
    for line in lines {
        terminal.submit(line).await;
        terminal.settle().await;
    }
    terminal.settle().await;
    Ok(buffer.contents())
}

/// A cloneable in-memory byte sink.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        match self.0.lock() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.0.lock() {
            Ok(mut bytes) => bytes.extend_from_slice(buf),
            Err(poisoned) => poisoned.into_inner().extend_from_slice(buf),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
