//! FIFO print queue with typed-out rendering.
//!
//! Every request to draw something goes through one channel consumed by a
//! single worker task, so output from overlapping commands never
//! interleaves. The worker types each line into an [`OutputSink`] one
//! character at a time with a fixed delay.
//!
//! Callers can:
//! - await a [`PrintTicket`] to know when their line is on screen
//! - watch [`PrintQueue::is_busy`] to hide the input line while rendering
//! - await [`PrintQueue::idle`] to wait for everything queued so far

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};

use crate::interpreter::{LineStyle, OutputLine};

/// Default per-character delay.
pub const DEFAULT_TYPE_DELAY: Duration = Duration::from_millis(30);

/// Where rendered characters go.
pub trait OutputSink: Send + 'static {
    /// Start a new line. `prompt` is drawn at once, before any typed text.
    fn begin_line(&mut self, prompt: Option<&str>, style: LineStyle);
    fn push_char(&mut self, c: char);
    fn end_line(&mut self);
    /// Wipe everything drawn so far.
    fn clear(&mut self);
}

enum Job {
    Line(OutputLine),
    Clear,
}

struct Request {
    job: Job,
    done: oneshot::Sender<()>,
}

/// Completes once the request it was issued for has been rendered.
#[derive(Debug)]
pub struct PrintTicket(oneshot::Receiver<()>);

impl PrintTicket {
    /// Wait for the render. Returns immediately if the worker is gone.
    pub async fn wait(self) {
        let _ = self.0.await;
    }
}

/// Handle to the print worker. Clones share the same queue.
///
/// The worker exits once every handle is dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct PrintQueue {
    tx: mpsc::UnboundedSender<Request>,
    pending: Arc<watch::Sender<usize>>,
    pending_rx: watch::Receiver<usize>,
}

impl PrintQueue {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn(sink: impl OutputSink, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (pending, pending_rx) = watch::channel(0usize);
        let pending = Arc::new(pending);

        tokio::spawn(run_worker(rx, Box::new(sink), delay, Arc::clone(&pending)));
        tracing::debug!(delay_ms = delay.as_millis() as u64, "print queue started");

        Self {
            tx,
            pending,
            pending_rx,
        }
    }

    fn submit(&self, job: Job) -> PrintTicket {
        let (done, wait) = oneshot::channel();
        self.pending.send_modify(|n| *n += 1);
        if self.tx.send(Request { job, done }).is_err() {
            self.pending.send_modify(|n| *n = n.saturating_sub(1));
            tracing::warn!("print queue worker is gone; dropping output");
        }
        PrintTicket(wait)
    }

    /// Queue one line behind everything already queued.
    pub fn enqueue(&self, line: OutputLine) -> PrintTicket {
        self.submit(Job::Line(line))
    }

    /// Queue several lines; the ticket completes after the last one.
    pub fn enqueue_all(&self, lines: impl IntoIterator<Item = OutputLine>) -> Option<PrintTicket> {
        lines.into_iter().map(|line| self.enqueue(line)).last()
    }

    /// Queue a screen clear.
    pub fn clear(&self) -> PrintTicket {
        self.submit(Job::Clear)
    }

    /// Requests queued or rendering.
    pub fn pending(&self) -> usize {
        *self.pending_rx.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.pending() > 0
    }

    /// A receiver that changes whenever the pending count does.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.pending_rx.clone()
    }

    /// Wait until nothing is queued or rendering.
    pub async fn idle(&self) {
        let mut rx = self.pending_rx.clone();
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Request>,
    mut sink: Box<dyn OutputSink>,
    delay: Duration,
    pending: Arc<watch::Sender<usize>>,
) {
    while let Some(Request { job, done }) = rx.recv().await {
        match job {
            Job::Line(line) => {
                sink.begin_line(line.prompt.as_deref(), line.style);
                for c in line.text.chars() {
                    sink.push_char(c);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                sink.end_line();
            }
            Job::Clear => sink.clear(),
        }
        pending.send_modify(|n| *n = n.saturating_sub(1));
        let _ = done.send(());
    }
    tracing::debug!("print queue stopped");
}

/// Collects rendered lines in memory. Clones share the same screen.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    screen: Arc<Mutex<Screen>>,
}

#[derive(Debug, Default)]
struct Screen {
    lines: Vec<String>,
    open: Option<String>,
    clears: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn screen(&self) -> std::sync::MutexGuard<'_, Screen> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Finished lines currently on screen, prompts included.
    pub fn lines(&self) -> Vec<String> {
        self.screen().lines.clone()
    }

    /// How many times the screen was cleared.
    pub fn clears(&self) -> usize {
        self.screen().clears
    }
}

impl OutputSink for MemorySink {
    fn begin_line(&mut self, prompt: Option<&str>, _style: LineStyle) {
        self.screen().open = Some(prompt.unwrap_or_default().to_string());
    }

    fn push_char(&mut self, c: char) {
        if let Some(line) = self.screen().open.as_mut() {
            line.push(c);
        }
    }

    fn end_line(&mut self) {
        let mut screen = self.screen();
        if let Some(line) = screen.open.take() {
            screen.lines.push(line);
        }
    }

    fn clear(&mut self) {
        let mut screen = self.screen();
        screen.lines.clear();
        screen.open = None;
        screen.clears += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lines_render_in_submission_order() {
        let sink = MemorySink::new();
        let queue = PrintQueue::spawn(sink.clone(), Duration::ZERO);

        queue.enqueue(OutputLine::command("$ ", "ls"));
        queue.enqueue(OutputLine::plain("a.txt"));
        queue.enqueue(OutputLine::plain("b.txt")).wait().await;

        assert_eq!(sink.lines(), vec!["$ ls", "a.txt", "b.txt"]);
        assert!(!queue.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_producers_never_interleave() {
        let sink = MemorySink::new();
        let queue = PrintQueue::spawn(sink.clone(), DEFAULT_TYPE_DELAY);

        let a = queue.clone();
        let b = queue.clone();
        let first = tokio::spawn(async move {
            a.enqueue(OutputLine::plain("aaaa")).wait().await;
        });
        tokio::task::yield_now().await;
        let second = tokio::spawn(async move {
            b.enqueue(OutputLine::plain("bbbb")).wait().await;
        });
        first.await.unwrap();
        second.await.unwrap();

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        for line in lines {
            assert!(line == "aaaa" || line == "bbbb", "interleaved: {line}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn busy_until_drained() {
        let sink = MemorySink::new();
        let queue = PrintQueue::spawn(sink.clone(), DEFAULT_TYPE_DELAY);

        queue.enqueue(OutputLine::plain("typing"));
        assert!(queue.is_busy());
        queue.idle().await;
        assert!(!queue.is_busy());
        assert_eq!(sink.lines(), vec!["typing"]);
    }

    #[tokio::test]
    async fn clear_is_ordered_with_lines() {
        let sink = MemorySink::new();
        let queue = PrintQueue::spawn(sink.clone(), Duration::ZERO);

        queue.enqueue(OutputLine::plain("old"));
        queue.clear();
        queue.enqueue(OutputLine::plain("new"));
        queue.idle().await;

        assert_eq!(sink.lines(), vec!["new"]);
        assert_eq!(sink.clears(), 1);
    }
}
