//! Segment paths and relative path resolution.

use std::fmt;

/// An absolute path inside the VFS, stored as its segments.
///
/// The root is the empty sequence. Segments are never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VfsPath {
    segments: Vec<String>,
}

impl VfsPath {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from segments, dropping empty ones.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Split a `/`-separated string into segments without interpreting `.` or `..`.
    pub fn parse(s: &str) -> Self {
        Self::new(s.split('/'))
    }

    /// Resolve `input` against `current`.
    ///
    /// A leading `/` makes `input` absolute. `.` segments are dropped and `..`
    /// pops the last segment; popping past the root is a no-op.
    pub fn resolve(input: &str, current: &VfsPath) -> VfsPath {
        let mut segments = if input.starts_with('/') {
            Vec::new()
        } else {
            current.segments.clone()
        };

        for part in input.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                name => segments.push(name.to_string()),
            }
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append one segment.
    pub fn join(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        if !name.is_empty() {
            segments.push(name.to_string());
        }
        Self { segments }
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.segments.split_last()?;
        Some(Self {
            segments: parent.to_vec(),
        })
    }

    /// The last segment, or `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Split into parent folder and final name.
    pub fn split_last(&self) -> Option<(VfsPath, &str)> {
        let (last, parent) = self.segments.split_last()?;
        Some((
            Self {
                segments: parent.to_vec(),
            },
            last.as_str(),
        ))
    }

    /// True if `self` is `other` or lies underneath it.
    pub fn starts_with(&self, other: &VfsPath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for VfsPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn p(segments: &[&str]) -> VfsPath {
        VfsPath::new(segments.iter().copied())
    }

    #[rstest]
    #[case::parent("..", &["a", "b"], &["a"])]
    #[case::past_root("../../x", &["a"], &["x"])]
    #[case::root_parent("..", &[], &[])]
    #[case::absolute("/etc/conf", &["a", "b"], &["etc", "conf"])]
    #[case::dots("./c/./d", &["a"], &["a", "c", "d"])]
    #[case::double_slash("c//d/", &["a"], &["a", "c", "d"])]
    #[case::just_slash("/", &["a"], &[])]
    #[case::empty("", &["a"], &["a"])]
    fn resolve_cases(#[case] input: &str, #[case] current: &[&str], #[case] expected: &[&str]) {
        assert_eq!(VfsPath::resolve(input, &p(current)), p(expected));
    }

    #[test]
    fn display_root_and_nested() {
        assert_eq!(VfsPath::root().to_string(), "/");
        assert_eq!(p(&["home", "guest"]).to_string(), "/home/guest");
    }

    #[test]
    fn parse_drops_empty_segments() {
        assert_eq!(VfsPath::parse("/home//guest/"), p(&["home", "guest"]));
    }

    #[test]
    fn split_last_and_parent() {
        let path = p(&["a", "b", "c"]);
        let (parent, name) = path.split_last().unwrap();
        assert_eq!(parent, p(&["a", "b"]));
        assert_eq!(name, "c");
        assert_eq!(path.parent(), Some(p(&["a", "b"])));
        assert_eq!(VfsPath::root().parent(), None);
    }

    proptest! {
        #[test]
        fn resolve_never_yields_empty_or_dot_segments(
            input in "[a-z./]{0,24}",
            current in proptest::collection::vec("[a-z]{1,4}", 0..4),
        ) {
            let resolved = VfsPath::resolve(&input, &VfsPath::new(current));
            for segment in resolved.segments() {
                prop_assert!(!segment.is_empty());
                prop_assert!(segment != "." && segment != "..");
            }
        }

        #[test]
        fn absolute_input_ignores_current(
            input in "/[a-z/]{0,16}",
            current in proptest::collection::vec("[a-z]{1,4}", 0..4),
        ) {
            prop_assert_eq!(
                VfsPath::resolve(&input, &VfsPath::new(current)),
                VfsPath::resolve(&input, &VfsPath::root()),
            );
        }

        #[test]
        fn parent_of_joined_is_original(
            current in proptest::collection::vec("[a-z]{1,4}", 0..4),
            name in "[a-z]{1,6}",
        ) {
            let base = VfsPath::new(current);
            prop_assert_eq!(VfsPath::resolve("..", &base.join(&name)), base);
        }
    }
}
