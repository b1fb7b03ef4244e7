//! Shell-style `*` and `?` expansion against one folder's entry names.

use regex::Regex;

/// True if `s` contains a wildcard.
pub fn is_glob(s: &str) -> bool {
    s.contains(['*', '?'])
}

/// Compile a glob into an anchored regex. `*` is any run, `?` one character;
/// everything else matches literally.
pub fn glob_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut re = String::with_capacity(pattern.len() + 8);
    re.push('^');
    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '*' | '?' => {
                re.push_str(&regex::escape(&literal));
                literal.clear();
                re.push_str(if c == '*' { ".*" } else { "." });
            }
            c => literal.push(c),
        }
    }
    re.push_str(&regex::escape(&literal));
    re.push('$');
    Regex::new(&re)
}

/// Expand `pattern` against `names`, in the order of `names`.
///
/// With no matches the pattern itself is returned unchanged.
pub fn expand<'a, I>(pattern: &str, names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let Ok(re) = glob_regex(pattern) else {
        return vec![pattern.to_string()];
    };
    let matches: Vec<String> = names
        .into_iter()
        .filter(|name| re.is_match(name))
        .map(str::to_string)
        .collect();
    if matches.is_empty() {
        vec![pattern.to_string()]
    } else {
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const NAMES: &[&str] = &["a.txt", "b.png", "c.txt", "x.swf", "y.swf", "notes(1).md"];

    #[rstest]
    #[case::star("*.swf", &["x.swf", "y.swf"])]
    #[case::question("?.txt", &["a.txt", "c.txt"])]
    #[case::anchored("*.t", &["*.t"])]
    #[case::literal_meta("notes(1).*", &["notes(1).md"])]
    #[case::question_matches_dot("a?txt", &["a.txt"])]
    #[case::no_match_passes_through("*xswf", &["*xswf"])]
    #[case::everything("*", NAMES)]
    fn expansion(#[case] pattern: &str, #[case] expected: &[&str]) {
        assert_eq!(expand(pattern, NAMES.iter().copied()), expected);
    }

    #[test]
    fn detects_wildcards() {
        assert!(is_glob("*.txt"));
        assert!(is_glob("file?"));
        assert!(!is_glob("plain.txt"));
    }
}
