//! Command-line grammar: pipeline segments of name, flags and positionals.

use super::lexer::{tokenize, Lexeme, Word};

/// One command in a pipeline, before glob expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    /// Arguments as typed.
    pub args: Vec<Word>,
}

impl Command {
    /// Unquoted words starting with `-`, in order.
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.args.iter().filter(|w| is_flag(w)).map(|w| w.text.as_str())
    }

    /// Everything that is not a flag, in order.
    pub fn positional(&self) -> impl Iterator<Item = &Word> {
        self.args.iter().filter(|w| !is_flag(w))
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pipeline {
    pub segments: Vec<Command>,
}

impl Pipeline {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("bash: syntax error near unexpected token `|'")]
    EmptySegment,
}

/// A flag is an unquoted word of at least two characters starting with `-`.
pub fn is_flag(word: &Word) -> bool {
    !word.quoted && word.text.len() > 1 && word.text.starts_with('-')
}

/// Parse a command line. A blank line is an empty pipeline.
pub fn parse(line: &str) -> Result<Pipeline, ParseError> {
    let lexemes = tokenize(line);
    if lexemes.is_empty() {
        return Ok(Pipeline::default());
    }

    let mut segments = Vec::new();
    for group in lexemes.split(|l| *l == Lexeme::Pipe) {
        let mut words = group.iter().filter_map(|l| match l {
            Lexeme::Word(w) => Some(w.clone()),
            Lexeme::Pipe => None,
        });
        let Some(name) = words.next() else {
            return Err(ParseError::EmptySegment);
        };

        segments.push(Command {
            name: name.text,
            args: words.collect(),
        });
    }
    Ok(Pipeline { segments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn positional(cmd: &Command) -> Vec<&str> {
        cmd.positional().map(|w| w.text.as_str()).collect()
    }

    #[test]
    fn flags_and_positionals_keep_relative_order() {
        let pipeline = parse("ls -l Documents -a Pictures").unwrap();
        let cmd = &pipeline.segments[0];
        assert_eq!(cmd.name, "ls");
        assert_eq!(cmd.flags().collect::<Vec<_>>(), vec!["-l", "-a"]);
        assert_eq!(positional(cmd), vec!["Documents", "Pictures"]);
        assert_eq!(cmd.args.len(), 4);
    }

    #[test]
    fn pipeline_segments() {
        let pipeline = parse(r#"ls | grep ".txt" | wc -l"#).unwrap();
        let names: Vec<_> = pipeline.segments.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ls", "grep", "wc"]);
        assert_eq!(positional(&pipeline.segments[1]), vec![".txt"]);
    }

    #[rstest]
    #[case::leading("| ls")]
    #[case::trailing("ls |")]
    #[case::double("ls || wc")]
    #[case::blank_middle("ls |   | wc")]
    fn empty_segments_are_syntax_errors(#[case] line: &str) {
        assert_eq!(parse(line), Err(ParseError::EmptySegment));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_is_empty(#[case] line: &str) {
        assert!(parse(line).unwrap().is_empty());
    }

    #[test]
    fn lone_dash_and_quoted_dash_are_positional() {
        let pipeline = parse(r#"echo - "-n""#).unwrap();
        let cmd = &pipeline.segments[0];
        assert_eq!(cmd.flags().count(), 0);
        assert_eq!(positional(cmd), vec!["-", "-n"]);
    }
}
