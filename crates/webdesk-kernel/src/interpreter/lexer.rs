//! Tokenizer for command lines, built on logos.
//!
//! Words are separated by whitespace. Double quotes group text into one word
//! and are stripped; adjacent quoted and bare pieces join (`a"b c"` is the
//! single word `ab c`). A `|` outside quotes separates pipeline segments.

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
enum Token {
    #[regex(r"[ \t\r\n\f]+")]
    Space,

    #[token("|")]
    Pipe,

    #[regex(r#""[^"]*""#, |lex| { let s = lex.slice(); s[1..s.len() - 1].to_string() })]
    Quoted(String),

    /// An opening quote with no closing one runs to end of line.
    #[regex(r#""[^"]*"#, |lex| lex.slice()[1..].to_string())]
    Unterminated(String),

    #[regex(r#"[^ \t\r\n\f|"]+"#, |lex| lex.slice().to_string())]
    Bare(String),
}

/// One whitespace-delimited word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    /// Any part of the word was quoted. Quoted words are never flags or globs.
    pub quoted: bool,
}

impl Word {
    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexeme {
    Word(Word),
    Pipe,
}

/// Split a command line into words and pipes.
pub fn tokenize(line: &str) -> Vec<Lexeme> {
    let mut out = Vec::new();
    let mut current: Option<Word> = None;

    let mut lexer = Token::lexer(line);
    while let Some(token) = lexer.next() {
        let (text, quoted) = match token {
            Ok(Token::Space) => {
                out.extend(current.take().map(Lexeme::Word));
                continue;
            }
            Ok(Token::Pipe) => {
                out.extend(current.take().map(Lexeme::Word));
                out.push(Lexeme::Pipe);
                continue;
            }
            Ok(Token::Quoted(s)) | Ok(Token::Unterminated(s)) => (s, true),
            Ok(Token::Bare(s)) => (s, false),
            Err(()) => (lexer.slice().to_string(), false),
        };
        let word = current.get_or_insert_with(|| Word {
            text: String::new(),
            quoted: false,
        });
        word.text.push_str(&text);
        word.quoted |= quoted;
    }
    out.extend(current.take().map(Lexeme::Word));
    out
}
