//! Command interpreter: tokenizing, globbing and running pipelines.
//!
//! # Architecture
//!
//! A line goes through [`lexer`] (words, quotes, pipes), then
//! [`command::parse`] (segments of name, flags and positionals). The
//! [`Interpreter`] expands globs against the working directory, looks each
//! segment's tool up in the registry and runs the segments in order, feeding
//! each one's output to the next as its last positional argument.
//!
//! Tab completion over VFS paths lives in [`complete`].

mod command;
mod complete;
mod glob;
mod lexer;
mod pipeline;
mod result;

pub use command::{is_flag, parse, Command, ParseError, Pipeline};
pub use complete::{complete, Completion};
pub use glob::{expand as expand_glob, is_glob};
pub use lexer::{tokenize, Lexeme, Word};
pub use pipeline::{DetachedJob, Execution, Interpreter};
pub use result::{ExecResult, LineStyle, OutputLine};
