//! Command interpreter tests through the kernel: pipes, globs and
//! shell-style diagnostics.

use webdesk_kernel::Kernel;

async fn kernel_in_scratch(files: &[&str]) -> Kernel {
    let kernel = Kernel::transient().unwrap();
    kernel.execute("mkdir scratch").await;
    kernel.execute("cd scratch").await;
    for file in files {
        kernel.execute(&format!("touch {file}")).await;
    }
    kernel
}

fn lines(result: &webdesk_kernel::interpreter::ExecResult) -> Vec<&str> {
    result.lines.iter().map(|l| l.text.as_str()).collect()
}

// ============================================================================
// Pipes
// ============================================================================

#[tokio::test]
async fn test_ls_grep_txt() {
    let kernel = kernel_in_scratch(&["a.txt", "b.png", "c.txt"]).await;
    let result = kernel.execute(r#"ls | grep ".txt""#).await;
    assert_eq!(lines(&result), vec!["a.txt", "c.txt"]);
}

#[tokio::test]
async fn test_pipe_quoted_bar_is_literal() {
    let kernel = Kernel::transient().unwrap();
    let result = kernel.execute(r#"echo "a|b" | grep "|""#).await;
    assert_eq!(lines(&result), vec!["a|b"]);
}

#[tokio::test]
async fn test_listing_equal_to_a_file_name_is_still_text() {
    let kernel = kernel_in_scratch(&["a.txt"]).await;
    let result = kernel.execute(r#"ls | grep ".txt""#).await;
    assert_eq!(lines(&result), vec!["a.txt"]);
    let result = kernel.execute("ls | wc -l").await;
    assert_eq!(lines(&result), vec!["1"]);
}

#[tokio::test]
async fn test_cat_into_wc() {
    let kernel = kernel_in_scratch(&[]).await;
    let result = kernel.execute("cat ../Documents/INFO.txt | wc -w").await;
    assert_eq!(lines(&result), vec!["11"]);
}

// ============================================================================
// Globs
// ============================================================================

#[tokio::test]
async fn test_rm_glob_only_matches() {
    let kernel = kernel_in_scratch(&["x.swf", "y.swf", "z.txt"]).await;
    let result = kernel.execute("rm *.swf").await;
    assert!(result.ok());
    let listing = kernel.execute("ls").await;
    assert_eq!(lines(&listing), vec!["z.txt"]);
}

#[tokio::test]
async fn test_question_mark_glob() {
    let kernel = kernel_in_scratch(&["a1.txt", "a22.txt", "b1.txt"]).await;
    let result = kernel.execute("echo a?.txt").await;
    assert_eq!(result.text(), "a1.txt");
}

// ============================================================================
// Diagnostics
// ============================================================================

#[tokio::test]
async fn test_command_not_found_then_session_continues() {
    let kernel = Kernel::transient().unwrap();
    let result = kernel.execute("sl -la").await;
    assert_eq!(result.code, 127);
    assert_eq!(lines(&result), vec!["bash: sl: command not found"]);
    assert!(kernel.execute("pwd").await.ok());
}

#[tokio::test]
async fn test_stages_before_unknown_command_run() {
    let kernel = kernel_in_scratch(&[]).await;
    let result = kernel.execute("mkdir newdir | nope").await;
    assert_eq!(result.code, 127);
    assert_eq!(lines(&result), vec!["bash: nope: command not found"]);
    assert_eq!(lines(&kernel.execute("ls").await), vec!["newdir/"]);
}

#[tokio::test]
async fn test_ls_missing_target() {
    let kernel = Kernel::transient().unwrap();
    let result = kernel.execute("ls nowhere").await;
    assert_eq!(
        lines(&result),
        vec!["ls: cannot access 'nowhere': No such file or directory"]
    );
}

#[tokio::test]
async fn test_file_op_messages() {
    let kernel = kernel_in_scratch(&[]).await;
    assert_eq!(lines(&kernel.execute("mkdir d").await), vec!["Created directory: d"]);
    assert_eq!(lines(&kernel.execute("touch f.txt").await), vec!["Created file: f.txt"]);
    assert_eq!(
        lines(&kernel.execute("mkdir d").await),
        vec!["mkdir: cannot process 'd': File exists"]
    );
    assert_eq!(lines(&kernel.execute("rm f.txt").await), vec!["Removed: f.txt"]);
    assert_eq!(lines(&kernel.execute("mkdir").await), vec!["mkdir: missing operand"]);
    assert_eq!(lines(&kernel.execute("touch").await), vec!["touch: missing file operand"]);
    assert_eq!(lines(&kernel.execute("rm").await), vec!["rm: missing operand"]);
}

#[tokio::test]
async fn test_history_records_kernel_lines() {
    let kernel = Kernel::transient().unwrap();
    kernel.execute("pwd").await;
    let result = kernel.execute("history").await;
    assert_eq!(lines(&result), vec!["  1  pwd", "  2  history"]);
}
