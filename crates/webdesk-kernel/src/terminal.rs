//! One interactive terminal: input line, history, completion and output.
//!
//! The terminal owns an [`ExecContext`] (cwd, identity, shared VFS and
//! windows) and a [`PrintQueue`]. Every line it prints, including the echo
//! of what was typed, goes through that queue, so the screen shows output
//! in the order it was produced even when detached jobs finish late.
//!
//! Input is never lost while output renders: keystrokes keep editing the
//! buffer, and a front end only hides the line while
//! [`Terminal::input_visible`] is false.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::interpreter::{complete, Completion, ExecResult, Execution, Interpreter, OutputLine};
use crate::scheduler::PrintQueue;
use crate::session::TerminalSession;
use crate::tools::ExecContext;

/// A key press the terminal reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Up,
    Down,
    Tab,
    Enter,
    /// Control chord, e.g. `Ctrl('c')`.
    Ctrl(char),
}

/// What a key press did, for front ends that need to react.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Input edited or nothing happened.
    Edited,
    /// A command ran. `None` when it was blank or detached.
    Submitted(Option<i64>),
    /// Ctrl-D: the terminal window is gone.
    Closed,
}

pub struct Terminal {
    ctx: ExecContext,
    interpreter: Arc<Interpreter>,
    session: TerminalSession,
    queue: PrintQueue,
    window_id: String,
    input: String,
    /// Byte offset into `input`, always on a char boundary.
    cursor: usize,
    jobs: JoinSet<()>,
    closed: bool,
}

impl std::fmt::Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("window_id", &self.window_id)
            .field("cwd", &self.ctx.cwd.to_string())
            .field("input", &self.input)
            .field("jobs", &self.jobs.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl Terminal {
    pub fn new(
        ctx: ExecContext,
        interpreter: Arc<Interpreter>,
        queue: PrintQueue,
        window_id: impl Into<String>,
    ) -> Self {
        Self {
            ctx,
            interpreter,
            session: TerminalSession::new(),
            queue,
            window_id: window_id.into(),
            input: String::new(),
            cursor: 0,
            jobs: JoinSet::new(),
            closed: false,
        }
    }

    /// `user@host:/path$ `
    pub fn prompt(&self) -> String {
        format!(
            "{}@{}:{}$ ",
            self.ctx.identity.username, self.ctx.identity.hostname, self.ctx.cwd
        )
    }

    /// Print the welcome banner.
    pub fn greet(&self) {
        self.queue.enqueue(OutputLine::plain(format!(
            "Welcome to the {} terminal",
            self.ctx.identity.hostname
        )));
        self.queue
            .enqueue(OutputLine::plain("Type 'help' for available commands"));
        self.queue.enqueue(OutputLine::plain(""));
    }

    pub fn context(&self) -> &ExecContext {
        &self.ctx
    }

    pub fn session(&self) -> &TerminalSession {
        &self.session
    }

    pub fn queue(&self) -> &PrintQueue {
        &self.queue
    }

    pub fn window_id(&self) -> &str {
        &self.window_id
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the input line and put the cursor at its end.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.cursor = self.input.len();
    }

    /// False while output is still rendering.
    pub fn input_visible(&self) -> bool {
        !self.queue.is_busy()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Run one command line as if typed and entered.
    ///
    /// Blank lines are ignored. Otherwise the line is echoed after the
    /// current prompt, recorded in history and executed. Returns the exit
    /// code, or `None` for blank lines and detached jobs.
    pub async fn submit(&mut self, line: &str) -> Option<i64> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        self.queue.enqueue(OutputLine::command(self.prompt(), line));
        self.session.push(line);
        self.ctx.history = self.session.history().to_vec();

        match self.interpreter.execute(line, &mut self.ctx).await {
            Execution::Finished(result) => {
                let code = result.code;
                self.render(result);
                Some(code)
            }
            Execution::Detached(mut job) => {
                tracing::debug!(job = job.name(), "spawning detached job");
                self.queue.enqueue_all(std::mem::take(&mut job.lead));
                job.context_mut().set_live(Some(self.queue.clone()));

                let queue = self.queue.clone();
                self.jobs.spawn(async move {
                    let result = job.run().await;
                    queue.enqueue_all(result.lines);
                });
                None
            }
        }
    }

    fn render(&self, result: ExecResult) {
        if result.clear {
            self.queue.clear();
        }
        self.queue.enqueue_all(result.lines);
    }

    /// Handle one key press.
    pub async fn handle_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::Char(c) => {
                self.input.insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }
            Key::Backspace => {
                if let Some(prev) = self.prev_boundary() {
                    self.input.replace_range(prev..self.cursor, "");
                    self.cursor = prev;
                }
            }
            Key::Delete => {
                if let Some(next) = self.next_boundary() {
                    self.input.replace_range(self.cursor..next, "");
                }
            }
            Key::Left => self.cursor = self.prev_boundary().unwrap_or(self.cursor),
            Key::Right => self.cursor = self.next_boundary().unwrap_or(self.cursor),
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = self.input.len(),
            Key::Up => {
                if let Some(cmd) = self.session.recall_prev() {
                    let cmd = cmd.to_string();
                    self.set_input(cmd);
                }
            }
            Key::Down => {
                let cmd = self.session.recall_next().to_string();
                self.set_input(cmd);
            }
            Key::Tab => self.tab(),
            Key::Enter => {
                let line = std::mem::take(&mut self.input);
                self.cursor = 0;
                return KeyOutcome::Submitted(self.submit(&line).await);
            }
            Key::Ctrl('c') => {
                self.queue.enqueue(OutputLine::command(self.prompt(), "^C"));
                self.set_input("");
            }
            Key::Ctrl('l') => {
                self.queue.clear();
            }
            Key::Ctrl('d') => {
                self.close();
                return KeyOutcome::Closed;
            }
            Key::Ctrl(_) => {}
        }
        KeyOutcome::Edited
    }

    fn tab(&mut self) {
        match complete(&self.ctx, &self.input, self.cursor) {
            Completion::NoMatch => {}
            Completion::Completed { line, cursor } => {
                self.input = line;
                self.cursor = cursor;
            }
            candidates @ Completion::Candidates(_) => {
                if let Some(listing) = candidates.listing() {
                    self.queue.enqueue(OutputLine::plain(listing));
                }
            }
        }
    }

    /// Remove the terminal's window and taskbar entry.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.ctx.windows.lock().close_window(&self.window_id);
        self.closed = true;
        tracing::info!(window = %self.window_id, "terminal closed");
    }

    /// Wait for detached jobs to finish and everything queued to render.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.jobs.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("detached job failed: {}", e);
            }
        }
        self.queue.idle().await;
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.input[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.input[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::scheduler::MemorySink;
    use crate::tools::builtin::testing;
    use crate::tools::{register_builtins, ToolRegistry};

    fn terminal() -> (Terminal, MemorySink) {
        let mut tools = ToolRegistry::new();
        register_builtins(&mut tools);
        let sink = MemorySink::new();
        let queue = PrintQueue::spawn(sink.clone(), Duration::ZERO);
        let term = Terminal::new(testing::ctx(), Arc::new(Interpreter::new(tools)), queue, "terminal-win");
        (term, sink)
    }

    async fn type_line(term: &mut Terminal, line: &str) -> KeyOutcome {
        for c in line.chars() {
            term.handle_key(Key::Char(c)).await;
        }
        term.handle_key(Key::Enter).await
    }

    #[tokio::test]
    async fn test_echoes_prompt_then_output() {
        let (mut term, sink) = terminal();
        let outcome = type_line(&mut term, "cd Music").await;
        assert_eq!(outcome, KeyOutcome::Submitted(Some(0)));
        term.submit("pwd").await;
        term.settle().await;
        assert_eq!(
            sink.lines(),
            vec![
                "guest@webdesk:/home/guest$ cd Music",
                "guest@webdesk:/home/guest/Music$ pwd",
                "/home/guest/Music",
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_input_ignored() {
        let (mut term, sink) = terminal();
        assert_eq!(type_line(&mut term, "   ").await, KeyOutcome::Submitted(None));
        term.settle().await;
        assert!(sink.lines().is_empty());
        assert!(term.session().history().is_empty());
    }

    #[tokio::test]
    async fn test_history_recall() {
        let (mut term, _sink) = terminal();
        term.submit("pwd").await;
        term.submit("whoami").await;

        term.handle_key(Key::Up).await;
        assert_eq!(term.input(), "whoami");
        term.handle_key(Key::Up).await;
        term.handle_key(Key::Up).await;
        assert_eq!(term.input(), "pwd");
        term.handle_key(Key::Down).await;
        assert_eq!(term.input(), "whoami");
        term.handle_key(Key::Down).await;
        assert_eq!(term.input(), "");
    }

    #[tokio::test]
    async fn test_history_command_sees_itself() {
        let (mut term, sink) = terminal();
        term.submit("pwd").await;
        term.submit("history").await;
        term.settle().await;
        let lines = sink.lines();
        assert_eq!(lines[lines.len() - 2..], ["  1  pwd", "  2  history"]);
    }

    #[tokio::test]
    async fn test_tab_completes_and_lists() {
        let (mut term, sink) = terminal();
        term.set_input("cd Mu");
        term.handle_key(Key::Tab).await;
        assert_eq!(term.input(), "cd Music/");
        assert_eq!(term.cursor(), 9);

        term.set_input("ls P");
        term.handle_key(Key::Tab).await;
        assert_eq!(term.input(), "ls Pictures/");

        term.set_input("cd ");
        term.handle_key(Key::Tab).await;
        assert_eq!(term.input(), "cd ");
        term.settle().await;
        assert!(sink.lines().is_empty());
    }

    #[tokio::test]
    async fn test_ctrl_c_marks_and_clears_input() {
        let (mut term, sink) = terminal();
        term.set_input("half typed");
        term.handle_key(Key::Ctrl('c')).await;
        assert_eq!(term.input(), "");
        term.settle().await;
        assert_eq!(sink.lines(), vec!["guest@webdesk:/home/guest$ ^C"]);
    }

    #[tokio::test]
    async fn test_clear() {
        let (mut term, sink) = terminal();
        term.submit("pwd").await;
        term.submit("clear").await;
        term.settle().await;
        assert_eq!(sink.clears(), 1);
        assert!(sink.lines().is_empty());

        term.handle_key(Key::Ctrl('l')).await;
        term.settle().await;
        assert_eq!(sink.clears(), 2);
    }

    #[tokio::test]
    async fn test_unknown_command_keeps_session() {
        let (mut term, sink) = terminal();
        assert_eq!(term.submit("frobnicate").await, Some(127));
        assert_eq!(term.submit("whoami").await, Some(0));
        term.settle().await;
        assert_eq!(
            sink.lines()[1..],
            [
                "bash: frobnicate: command not found",
                "guest@webdesk:/home/guest$ whoami",
                "guest",
            ]
        );
    }

    #[tokio::test]
    async fn test_detached_job_output_arrives() {
        let (mut term, sink) = terminal();
        assert_eq!(term.submit("ping example.com").await, None);
        term.settle().await;
        let lines = sink.lines();
        assert_eq!(lines[1], "PING example.com ...");
        assert!(lines[2].starts_with("Reply from example.com: time="));
    }

    #[tokio::test]
    async fn test_ctrl_d_closes_window() {
        let (mut term, _sink) = terminal();
        term.context()
            .windows
            .lock()
            .add_to_taskbar("terminal-win", "Terminal", None);
        assert_eq!(term.handle_key(Key::Ctrl('d')).await, KeyOutcome::Closed);
        assert!(term.is_closed());
        assert!(term.context().windows.lock().taskbar().is_empty());
    }

    #[tokio::test]
    async fn test_line_editing() {
        let (mut term, _sink) = terminal();
        for c in "ecXo".chars() {
            term.handle_key(Key::Char(c)).await;
        }
        term.handle_key(Key::Left).await;
        term.handle_key(Key::Backspace).await;
        term.handle_key(Key::Char('h')).await;
        assert_eq!(term.input(), "echo");
        term.handle_key(Key::Home).await;
        term.handle_key(Key::Delete).await;
        assert_eq!(term.input(), "cho");
        assert_eq!(term.cursor(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_hidden_while_rendering() {
        let mut tools = ToolRegistry::new();
        register_builtins(&mut tools);
        let sink = MemorySink::new();
        let queue = PrintQueue::spawn(sink.clone(), Duration::from_millis(30));
        let mut term = Terminal::new(testing::ctx(), Arc::new(Interpreter::new(tools)), queue, "t");

        term.submit("whoami").await;
        assert!(!term.input_visible());
        term.handle_key(Key::Char('l')).await;
        term.handle_key(Key::Char('s')).await;

        term.settle().await;
        assert!(term.input_visible());
        assert_eq!(term.input(), "ls");
    }
}
