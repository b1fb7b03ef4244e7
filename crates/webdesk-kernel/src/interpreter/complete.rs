//! Tab completion of VFS paths.
//!
//! The word ending at the cursor is treated as a partial path. Its directory
//! part picks the folder, and entries starting with the rest are the
//! candidates.

use crate::tools::ExecContext;
use crate::vfs::Node;

/// What a Tab press does to the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Nothing to complete; the line is unchanged.
    NoMatch,
    /// The line was extended. `cursor` is a byte offset into `line`.
    Completed { line: String, cursor: usize },
    /// Several candidates share no longer prefix; show them.
    Candidates(Vec<String>),
}

impl Completion {
    /// Candidates as one output line, two spaces apart.
    pub fn listing(&self) -> Option<String> {
        match self {
            Self::Candidates(names) => Some(names.join("  ")),
            _ => None,
        }
    }
}

/// Complete the word ending at byte offset `cursor` in `input`.
///
/// One candidate completes fully, with a trailing `/` for folders. Several
/// candidates complete to their longest common prefix when that is longer
/// than what was typed; otherwise they are listed.
pub fn complete(ctx: &ExecContext, input: &str, cursor: usize) -> Completion {
    let mut cursor = cursor.min(input.len());
    while !input.is_char_boundary(cursor) {
        cursor -= 1;
    }
    let left = &input[..cursor];
    let start = left
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8());
    let partial = &left[start..];
    if partial.is_empty() {
        return Completion::NoMatch;
    }

    let (dir_part, base) = match partial.rfind('/') {
        Some(i) => partial.split_at(i + 1),
        None => ("", partial),
    };
    let dir = if dir_part.is_empty() {
        ctx.cwd.clone()
    } else {
        ctx.resolve_path(dir_part)
    };

    let vfs = ctx.vfs.lock();
    let Ok(folder) = vfs.get_folder(&dir) else {
        return Completion::NoMatch;
    };
    let matches: Vec<(&str, bool)> = folder
        .iter()
        .filter(|(name, _)| name.starts_with(base))
        .map(|(name, node)| (name, matches!(node, Node::Folder(_))))
        .collect();

    let completion = match matches.as_slice() {
        [] => return Completion::NoMatch,
        [(name, is_folder)] => {
            let slash = if *is_folder { "/" } else { "" };
            format!("{name}{slash}")
        }
        [(first, _), rest @ ..] => {
            let prefix = rest
                .iter()
                .fold(*first, |prefix, (name, _)| common_prefix(prefix, name));
            if prefix.len() <= base.len() {
                return Completion::Candidates(
                    matches.iter().map(|(name, _)| name.to_string()).collect(),
                );
            }
            prefix.to_string()
        }
    };

    let replacement = format!("{dir_part}{completion}");
    let line = format!("{}{replacement}{}", &input[..start], &input[cursor..]);
    Completion::Completed {
        cursor: start + replacement.len(),
        line,
    }
}

/// Longest common prefix, cut on a char boundary.
fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map_or_else(|| a.len().min(b.len()), |((i, _), _)| i);
    &a[..end]
}
