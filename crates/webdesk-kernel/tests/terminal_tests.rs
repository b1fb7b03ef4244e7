//! Terminal session tests: typed input, completion and output ordering.

use webdesk_kernel::scheduler::MemorySink;
use webdesk_kernel::{Kernel, Key, KeyOutcome};

async fn type_keys(term: &mut webdesk_kernel::Terminal, text: &str) {
    for c in text.chars() {
        term.handle_key(Key::Char(c)).await;
    }
}

#[tokio::test]
async fn test_tab_lists_ambiguous_candidates() {
    let kernel = Kernel::transient().unwrap();
    kernel.execute("mkdir Downloads").await;

    let sink = MemorySink::new();
    let mut term = kernel.open_terminal(sink.clone());
    type_keys(&mut term, "cd Do").await;
    term.handle_key(Key::Tab).await;
    assert_eq!(term.input(), "cd Do");

    term.settle().await;
    assert_eq!(sink.lines().last().map(String::as_str), Some("Documents  Downloads"));
}

#[tokio::test]
async fn test_typed_session() {
    let kernel = Kernel::transient().unwrap();
    let sink = MemorySink::new();
    let mut term = kernel.open_terminal(sink.clone());

    type_keys(&mut term, "mkdir notes").await;
    assert_eq!(term.handle_key(Key::Enter).await, KeyOutcome::Submitted(Some(0)));
    type_keys(&mut term, "cd no").await;
    term.handle_key(Key::Tab).await;
    assert_eq!(term.input(), "cd notes/");
    term.handle_key(Key::Enter).await;
    type_keys(&mut term, "pwd").await;
    term.handle_key(Key::Enter).await;
    term.settle().await;

    let lines = sink.lines();
    assert_eq!(
        lines[3..],
        [
            "guest@webdesk:/home/guest$ mkdir notes",
            "Created directory: notes",
            "guest@webdesk:/home/guest$ cd notes/",
            "guest@webdesk:/home/guest/notes$ pwd",
            "/home/guest/notes",
        ]
    );
}

#[tokio::test]
async fn test_terminal_shares_kernel_vfs() {
    let kernel = Kernel::transient().unwrap();
    let mut term = kernel.open_terminal(MemorySink::new());
    term.submit("touch shared.txt").await;
    term.settle().await;

    let result = kernel.execute("ls").await;
    assert!(result.text().contains("shared.txt"));
}

#[tokio::test]
async fn test_ps_lists_terminal_window() {
    let kernel = Kernel::transient().unwrap();
    let sink = MemorySink::new();
    let mut term = kernel.open_terminal(sink.clone());
    term.submit("ps").await;
    term.settle().await;
    assert_eq!(
        sink.lines().last().map(String::as_str),
        Some("  1000  pts/0      0:00 Terminal")
    );
}

#[tokio::test]
async fn test_ctrl_d_removes_window() {
    let kernel = Kernel::transient().unwrap();
    let mut term = kernel.open_terminal(MemorySink::new());
    assert_eq!(term.handle_key(Key::Ctrl('d')).await, KeyOutcome::Closed);
    let windows = kernel.windows().lock();
    assert!(windows.is_empty());
    assert!(windows.taskbar().is_empty());
}
