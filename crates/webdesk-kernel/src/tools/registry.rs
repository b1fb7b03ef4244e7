//! Tool registry for looking up and managing tools.

use std::collections::HashMap;
use std::sync::Arc;

use super::context::CommandInfo;
use super::traits::{FnTool, Tool, ToolArgs};
use super::ExecContext;
use crate::interpreter::ExecResult;

/// Registry of available tools.
///
/// Cloning is cheap: tools are shared behind `Arc`.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.register_arc(Arc::new(tool));
    }

    /// Register a tool that's already in an Arc.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::debug!(tool = %name, "tool replaced");
        }
    }

    /// Register a closure as a command.
    pub fn register_fn<F>(&mut self, name: &str, description: &str, handler: F)
    where
        F: Fn(&ToolArgs, &mut ExecContext) -> ExecResult + Send + Sync + 'static,
    {
        self.register(FnTool::new(name, description, handler));
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all tool names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Name and description of every tool, sorted by name.
    pub fn summaries(&self) -> Vec<CommandInfo> {
        let mut infos: Vec<_> = self
            .tools
            .values()
            .map(|t| CommandInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
