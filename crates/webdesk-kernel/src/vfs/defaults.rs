//! The default tree and the non-destructive merge used on load.

use super::node::{FileKind, FileNode, Folder, Node, NOTEPAD_ICON};

/// Number of stock wallpapers shipped under `Pictures/`.
pub const DEFAULT_WALLPAPER_COUNT: usize = 11;

const INFO_TEXT: &str = "Files you saved in notepad get saved in your browser session.";

/// Build the tree a fresh session starts with.
pub fn default_tree(username: &str) -> Folder {
    let documents = Folder::new().with(
        "INFO.txt",
        FileNode::with_kind(
            "INFO.txt",
            INFO_TEXT,
            Some(FileKind::Text),
            Some(NOTEPAD_ICON.to_string()),
        ),
    );

    let pictures = (1..=DEFAULT_WALLPAPER_COUNT).fold(Folder::new(), |folder, n| {
        let name = format!("wallpaper{n}.webp");
        let uri = format!("/static/wallpapers/{name}");
        let file = FileNode::with_kind(&name, uri, Some(FileKind::Image), None);
        folder.with(name, file)
    });

    let user_home = Folder::new()
        .with("Documents", documents)
        .with("Pictures", pictures)
        .with("Music", Folder::new())
        .with("Games", Folder::new());

    Folder::new().with("home", Folder::new().with(username, user_home))
}

/// Deep-merge `defaults` into `stored`.
///
/// Keys missing from `stored` are copied in. When both sides hold a folder the
/// merge recurses. Anything already stored is kept as is, including a stored
/// file sitting where the defaults have a folder. Returns the number of
/// entries added.
pub fn merge_defaults(stored: &mut Folder, defaults: &Folder) -> usize {
    let mut added = 0;
    for (name, default_node) in defaults.iter() {
        if !stored.contains(name) {
            stored.insert(name, default_node.clone());
            added += 1;
            continue;
        }
        if let (Some(Node::Folder(existing)), Node::Folder(default_folder)) =
            (stored.get_mut(name), default_node)
        {
            added += merge_defaults(existing, default_folder);
        }
    }
    added
}
