//! The persisted filesystem tree.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::defaults::merge_defaults;
use super::error::VfsError;
use super::node::{FileKind, FileNode, Folder, Node};
use super::path::VfsPath;
use super::storage::{MemoryStorage, Storage};

/// Borrowed view of one tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Folder(&'a Folder),
    File(&'a FileNode),
}

impl<'a> NodeRef<'a> {
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Content bytes, summed over descendants for folders.
    pub fn size(&self) -> u64 {
        match self {
            Self::Folder(folder) => folder.total_size(),
            Self::File(file) => file.size(),
        }
    }
}

impl<'a> From<&'a Node> for NodeRef<'a> {
    fn from(node: &'a Node) -> Self {
        match node {
            Node::Folder(folder) => Self::Folder(folder),
            Node::File(file) => Self::File(file),
        }
    }
}

/// A tree of folders and files, written through to a [`Storage`] key.
///
/// Every mutating method mutates the in-memory tree and then saves the whole
/// tree before returning. If the save fails the in-memory change stays and
/// the storage error is returned.
pub struct VirtualFs {
    root: Folder,
    key: String,
    storage: Box<dyn Storage>,
}

impl std::fmt::Debug for VirtualFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualFs")
            .field("key", &self.key)
            .field("entries", &self.root.len())
            .finish()
    }
}

impl VirtualFs {
    /// Open the tree stored under `key`.
    ///
    /// On first run the medium is seeded with `defaults`. Otherwise the
    /// stored tree is loaded and deep-merged with `defaults`; stored values
    /// always win. The merged tree is written back when the merge added
    /// anything.
    pub fn open(
        storage: Box<dyn Storage>,
        key: impl Into<String>,
        defaults: Folder,
    ) -> Result<Self, VfsError> {
        let key = key.into();
        let blob = storage.load(&key)?;

        let Some(blob) = blob else {
            tracing::info!(%key, "seeding filesystem with defaults");
            let mut fs = Self {
                root: defaults,
                key,
                storage,
            };
            fs.persist()?;
            return Ok(fs);
        };

        let mut root: Folder = serde_json::from_str(&blob).map_err(|source| VfsError::Corrupt {
            key: key.clone(),
            source,
        })?;
        let added = merge_defaults(&mut root, &defaults);
        tracing::debug!(%key, added, "loaded filesystem");

        let mut fs = Self { root, key, storage };
        if added > 0 {
            fs.persist()?;
        }
        Ok(fs)
    }

    /// A tree held in process memory only, seeded with `defaults`.
    pub fn in_memory(defaults: Folder) -> Self {
        Self {
            root: defaults,
            key: "transient".to_string(),
            storage: Box::new(MemoryStorage::new()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn root(&self) -> &Folder {
        &self.root
    }

    /// Walk from the root one segment at a time.
    pub fn get_folder(&self, path: &VfsPath) -> Result<&Folder, VfsError> {
        let mut folder = &self.root;
        for (depth, segment) in path.segments().iter().enumerate() {
            folder = match folder.get(segment) {
                Some(Node::Folder(child)) => child,
                Some(Node::File(_)) => return Err(VfsError::NotADirectory(prefix(path, depth))),
                None => return Err(VfsError::InvalidPath(prefix(path, depth))),
            };
        }
        Ok(folder)
    }

    fn folder_mut(&mut self, path: &VfsPath) -> Result<&mut Folder, VfsError> {
        let mut folder = &mut self.root;
        for (depth, segment) in path.segments().iter().enumerate() {
            folder = match folder.get_mut(segment) {
                Some(Node::Folder(child)) => child,
                Some(Node::File(_)) => return Err(VfsError::NotADirectory(prefix(path, depth))),
                None => return Err(VfsError::InvalidPath(prefix(path, depth))),
            };
        }
        Ok(folder)
    }

    /// Look up the entry at a full path. The root is a folder.
    pub fn lookup(&self, path: &VfsPath) -> Result<NodeRef<'_>, VfsError> {
        let Some((parent, name)) = path.split_last() else {
            return Ok(NodeRef::Folder(&self.root));
        };
        self.get_folder(&parent)?
            .get(name)
            .map(NodeRef::from)
            .ok_or_else(|| VfsError::InvalidPath(path.to_string()))
    }

    /// True iff `name` exists under `path` and is a file.
    pub fn is_file(&self, path: &VfsPath, name: &str) -> bool {
        self.child(path, name).is_some_and(Node::is_file)
    }

    /// True iff `name` exists under `path`.
    pub fn exists(&self, path: &VfsPath, name: &str) -> bool {
        self.child(path, name).is_some()
    }

    fn child(&self, path: &VfsPath, name: &str) -> Option<&Node> {
        self.get_folder(path).ok()?.get(name)
    }

    fn file(&self, path: &VfsPath, name: &str) -> Option<&FileNode> {
        self.child(path, name).and_then(Node::as_file)
    }

    /// Create a file with kind and icon inferred from `name` and `content`.
    pub fn create_file(
        &mut self,
        path: &VfsPath,
        name: &str,
        content: impl Into<String>,
    ) -> Result<(), VfsError> {
        let file = FileNode::new(name, content);
        self.create_file_with(path, name, file)
    }

    /// Create a file from a prepared node.
    pub fn create_file_with(
        &mut self,
        path: &VfsPath,
        name: &str,
        file: FileNode,
    ) -> Result<(), VfsError> {
        self.insert_new(path, name, Node::File(file))
    }

    /// Create an empty folder.
    pub fn create_folder(&mut self, path: &VfsPath, name: &str) -> Result<(), VfsError> {
        self.insert_new(path, name, Node::Folder(Folder::new()))
    }

    fn insert_new(&mut self, path: &VfsPath, name: &str, node: Node) -> Result<(), VfsError> {
        validate_name(name)?;
        let folder = self.folder_mut(path)?;
        if folder.contains(name) {
            return Err(VfsError::AlreadyExists(name.to_string()));
        }
        folder.insert(name, node);
        self.persist()
    }

    /// Remove `name` under `path`. Absent names are a no-op.
    ///
    /// Returns whether anything was removed.
    pub fn delete_item(&mut self, path: &VfsPath, name: &str) -> Result<bool, VfsError> {
        let removed = self.folder_mut(path)?.remove(name).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Move `old_name` to `new_name` within the same folder.
    ///
    /// Fails with `InvalidPath` if `old_name` is absent and `AlreadyExists`
    /// if `new_name` is taken. Renaming onto itself is a no-op.
    pub fn rename_item(
        &mut self,
        path: &VfsPath,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), VfsError> {
        validate_name(new_name)?;
        let folder = self.folder_mut(path)?;
        if !folder.contains(old_name) {
            return Err(VfsError::InvalidPath(path.join(old_name).to_string()));
        }
        if old_name == new_name {
            return Ok(());
        }
        if folder.contains(new_name) {
            return Err(VfsError::AlreadyExists(new_name.to_string()));
        }
        if let Some(node) = folder.remove(old_name) {
            folder.insert(new_name, node);
        }
        self.persist()
    }

    /// Move `name` out of `from` into `to` under `new_name`.
    ///
    /// Within one folder this is [`rename_item`](Self::rename_item). A folder
    /// can never be moved into itself or one of its descendants.
    pub fn move_item(
        &mut self,
        from: &VfsPath,
        name: &str,
        to: &VfsPath,
        new_name: &str,
    ) -> Result<(), VfsError> {
        if from == to {
            return self.rename_item(from, name, new_name);
        }
        validate_name(new_name)?;

        let source = from.join(name);
        if !self.get_folder(from)?.contains(name) {
            return Err(VfsError::InvalidPath(source.to_string()));
        }
        if to.starts_with(&source) {
            return Err(VfsError::IntoItself(source.to_string()));
        }
        if self.get_folder(to)?.contains(new_name) {
            return Err(VfsError::AlreadyExists(new_name.to_string()));
        }

        let Some(node) = self.folder_mut(from)?.remove(name) else {
            return Err(VfsError::InvalidPath(source.to_string()));
        };
        self.folder_mut(to)?.insert(new_name, node);
        self.persist()
    }

    /// Replace a file's content, keeping its kind and icon, or create it.
    ///
    /// A folder under `name` is never replaced by a file.
    pub fn update_file(
        &mut self,
        path: &VfsPath,
        name: &str,
        content: impl Into<String>,
    ) -> Result<(), VfsError> {
        validate_name(name)?;
        let content = content.into();
        let folder = self.folder_mut(path)?;
        match folder.get_mut(name) {
            Some(Node::File(file)) => file.content = content,
            Some(Node::Folder(_)) => return Err(VfsError::AlreadyExists(name.to_string())),
            None => folder.insert(name, Node::File(FileNode::new(name, content))),
        }
        self.persist()
    }

    /// Content of a file, or `None` if absent or a folder.
    pub fn get_file_content(&self, path: &VfsPath, name: &str) -> Option<&str> {
        self.file(path, name).map(|f| f.content.as_str())
    }

    pub fn get_file_kind(&self, path: &VfsPath, name: &str) -> Option<FileKind> {
        self.file(path, name).map(|f| f.kind)
    }

    pub fn get_file_icon(&self, path: &VfsPath, name: &str) -> Option<&str> {
        self.file(path, name).map(|f| f.icon.as_str())
    }

    /// See [`VfsPath::resolve`].
    pub fn resolve_path(&self, input: &str, current: &VfsPath) -> VfsPath {
        VfsPath::resolve(input, current)
    }

    /// Serialize the whole tree and write it under our key.
    fn persist(&mut self) -> Result<(), VfsError> {
        let blob = serde_json::to_string(&self.root).map_err(|source| VfsError::Corrupt {
            key: self.key.clone(),
            source,
        })?;
        self.storage.save(&self.key, &blob)?;
        tracing::trace!(key = %self.key, bytes = blob.len(), "persisted filesystem");
        Ok(())
    }
}

/// Display string of the first `depth + 1` segments.
fn prefix(path: &VfsPath, depth: usize) -> String {
    VfsPath::new(path.segments().iter().take(depth + 1).cloned()).to_string()
}

fn validate_name(name: &str) -> Result<(), VfsError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(VfsError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// A [`VirtualFs`] shared between the terminal, its tools and app shells.
///
/// Each operation takes the lock for its duration, so two mutations can never
/// interleave.
#[derive(Debug, Clone)]
pub struct SharedVfs(Arc<Mutex<VirtualFs>>);

impl SharedVfs {
    pub fn new(fs: VirtualFs) -> Self {
        Self(Arc::new(Mutex::new(fs)))
    }

    /// Lock the tree. A panic in another holder does not make it unusable.
    pub fn lock(&self) -> MutexGuard<'_, VirtualFs> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
