//! 文件树数据模型
//!
//! 项目树完全在内存中：slotmap 作为 arena，文件夹保存有序子节点列表。
//! 节点一经创建不会被删除。

use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{new_key_type, SlotMap};
use std::fmt;

use crate::kernel::language::LanguageId;

new_key_type! { pub struct NodeId; }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTreeError {
    InvalidNodeId,
    ParentNotFolder,
    EmptyName,
}

impl fmt::Display for FileTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileTreeError::InvalidNodeId => write!(f, "invalid node id"),
            FileTreeError::ParentNotFolder => write!(f, "parent is not a folder"),
            FileTreeError::EmptyName => write!(f, "name must not be empty"),
        }
    }
}

impl std::error::Error for FileTreeError {}

/// `FileTree::validate` 发现的第一个结构性问题
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    RootCount(usize),
    RootNotFolder,
    MissingParent(NodeId),
    ParentNotFolder(NodeId),
    MissingChild { parent: NodeId, child: NodeId },
    WrongParent { listed_in: NodeId, child: NodeId },
    ListedTimes { child: NodeId, times: usize },
    FileHasChildren(NodeId),
    Cycle(NodeId),
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootCount(n) => write!(f, "expected exactly one root, found {n}"),
            Self::RootNotFolder => write!(f, "root is not a folder"),
            Self::MissingParent(id) => write!(f, "{id:?} points at a missing parent"),
            Self::ParentNotFolder(id) => write!(f, "parent of {id:?} is not a folder"),
            Self::MissingChild { parent, child } => {
                write!(f, "{parent:?} lists missing child {child:?}")
            }
            Self::WrongParent { listed_in, child } => {
                write!(f, "{child:?} is listed in {listed_in:?} which is not its parent")
            }
            Self::ListedTimes { child, times } => {
                write!(f, "{child:?} appears in {times} child lists")
            }
            Self::FileHasChildren(id) => write!(f, "file {id:?} has children"),
            Self::Cycle(id) => write!(f, "parent chain of {id:?} does not reach the root"),
        }
    }
}

impl std::error::Error for InvariantViolation {}

#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: CompactString,
    kind: NodeKind,
    content: String,
    language: Option<LanguageId>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    dirty: bool,
}

impl Node {
    fn new_file(
        id: NodeId,
        name: CompactString,
        parent: NodeId,
        language: LanguageId,
        content: String,
        dirty: bool,
    ) -> Self {
        Self {
            id,
            name,
            kind: NodeKind::File,
            content,
            language: Some(language),
            parent: Some(parent),
            children: Vec::new(),
            dirty,
        }
    }

    fn new_folder(id: NodeId, name: CompactString, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name,
            kind: NodeKind::Folder,
            content: String::new(),
            language: None,
            parent,
            children: Vec::new(),
            dirty: false,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// 仅文件有语言；文件夹返回 None
    pub fn language(&self) -> Option<LanguageId> {
        self.language
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[derive(Debug)]
pub struct FileTree {
    arena: SlotMap<NodeId, Node>,
    root: NodeId,
    expanded: FxHashMap<NodeId, bool>,
}

impl FileTree {
    pub fn new(root_name: &str) -> Self {
        let mut arena = SlotMap::with_key();
        let root = arena.insert_with_key(|id| Node::new_folder(id, root_name.into(), None));
        Self {
            arena,
            root,
            expanded: FxHashMap::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn resolve(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    pub fn is_file(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some_and(Node::is_file)
    }

    pub fn is_folder(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some_and(Node::is_folder)
    }

    /// 所有节点，按存储顺序
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.arena.values()
    }

    pub fn files(&self) -> impl Iterator<Item = &Node> {
        self.arena.values().filter(|n| n.is_file())
    }

    /// 从根到 `id` 的名字序列（含根）。父链长度以节点数为上限。
    pub fn path_of(&self, id: NodeId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = self.arena.get(id);
        while let Some(node) = current {
            if names.len() >= self.arena.len() {
                tracing::warn!(node = ?id, "parent chain exceeds tree size; stopping walk");
                break;
            }
            names.push(node.name.as_str());
            current = node.parent.and_then(|p| self.arena.get(p));
        }
        names.reverse();
        names
    }

    /// 去掉根名的相对路径，例如 `src/app.js`
    pub fn display_path(&self, id: NodeId) -> String {
        let names = self.path_of(id);
        names.iter().skip(1).copied().collect::<Vec<_>>().join("/")
    }

    pub fn find_by_path(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root;
        for part in path.split('/').filter(|p| !p.is_empty()) {
            let node = self.arena.get(current)?;
            current = node
                .children
                .iter()
                .copied()
                .find(|&child| self.arena.get(child).is_some_and(|c| c.name == part))?;
        }
        Some(current)
    }

    pub fn create_file(
        &mut self,
        parent: NodeId,
        name: &str,
        language: LanguageId,
    ) -> Result<NodeId, FileTreeError> {
        self.insert_child(parent, name, |id, name| {
            Node::new_file(id, name, parent, language, String::new(), true)
        })
    }

    pub fn create_folder(&mut self, parent: NodeId, name: &str) -> Result<NodeId, FileTreeError> {
        self.insert_child(parent, name, |id, name| {
            Node::new_folder(id, name, Some(parent))
        })
    }

    /// 插入一个已保存（clean）的文件，用于装载初始项目
    pub fn insert_file(
        &mut self,
        parent: NodeId,
        name: &str,
        language: LanguageId,
        content: impl Into<String>,
    ) -> Result<NodeId, FileTreeError> {
        let content = content.into();
        self.insert_child(parent, name, |id, name| {
            Node::new_file(id, name, parent, language, content, false)
        })
    }

    fn insert_child(
        &mut self,
        parent: NodeId,
        name: &str,
        make: impl FnOnce(NodeId, CompactString) -> Node,
    ) -> Result<NodeId, FileTreeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FileTreeError::EmptyName);
        }
        let parent_node = self.arena.get(parent).ok_or(FileTreeError::InvalidNodeId)?;
        if !parent_node.is_folder() {
            return Err(FileTreeError::ParentNotFolder);
        }

        let name = CompactString::from(name);
        let id = self.arena.insert_with_key(|id| make(id, name));
        self.arena
            .get_mut(parent)
            .ok_or(FileTreeError::InvalidNodeId)?
            .children
            .push(id);
        Ok(id)
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.get(&id).copied().unwrap_or(id == self.root)
    }

    pub fn toggle_expanded(&mut self, id: NodeId) -> bool {
        if !self.is_folder(id) {
            tracing::debug!(node = ?id, "toggle_expanded ignored for non-folder");
            return false;
        }
        let next = !self.is_expanded(id);
        self.expanded.insert(id, next);
        true
    }

    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> bool {
        if !self.is_folder(id) || self.is_expanded(id) == expanded {
            return false;
        }
        self.expanded.insert(id, expanded);
        true
    }

    pub fn mark_clean(&mut self, id: NodeId) -> bool {
        match self.arena.get_mut(id) {
            Some(node) if node.is_file() && node.dirty => {
                node.dirty = false;
                true
            }
            _ => false,
        }
    }

    pub fn mark_dirty(&mut self, id: NodeId, content: impl Into<String>) -> bool {
        match self.arena.get_mut(id) {
            Some(node) if node.is_file() => {
                node.content = content.into();
                node.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// 检查全部结构不变量，返回遇到的第一个问题
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let roots = self.arena.values().filter(|n| n.parent.is_none()).count();
        if roots != 1 || self.arena.get(self.root).is_some_and(|r| r.parent.is_some()) {
            return Err(InvariantViolation::RootCount(roots));
        }
        if !self.is_folder(self.root) {
            return Err(InvariantViolation::RootNotFolder);
        }

        let mut listed: FxHashMap<NodeId, usize> = FxHashMap::default();
        for node in self.arena.values() {
            if node.is_file() && !node.children.is_empty() {
                return Err(InvariantViolation::FileHasChildren(node.id));
            }
            for &child in &node.children {
                let Some(child_node) = self.arena.get(child) else {
                    return Err(InvariantViolation::MissingChild {
                        parent: node.id,
                        child,
                    });
                };
                if child_node.parent != Some(node.id) {
                    return Err(InvariantViolation::WrongParent {
                        listed_in: node.id,
                        child,
                    });
                }
                *listed.entry(child).or_default() += 1;
            }
        }

        for node in self.arena.values() {
            let Some(parent) = node.parent else {
                continue;
            };
            match self.arena.get(parent) {
                None => return Err(InvariantViolation::MissingParent(node.id)),
                Some(p) if !p.is_folder() => {
                    return Err(InvariantViolation::ParentNotFolder(node.id))
                }
                Some(_) => {}
            }
            let times = listed.get(&node.id).copied().unwrap_or(0);
            if times != 1 {
                return Err(InvariantViolation::ListedTimes {
                    child: node.id,
                    times,
                });
            }
            if !self.reaches_root(node.id) {
                return Err(InvariantViolation::Cycle(node.id));
            }
        }

        Ok(())
    }

    fn reaches_root(&self, id: NodeId) -> bool {
        let mut current = id;
        for _ in 0..=self.arena.len() {
            if current == self.root {
                return true;
            }
            match self.arena.get(current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTreeRow {
    pub id: NodeId,
    pub depth: u16,
    pub name: CompactString,
    pub is_folder: bool,
    pub is_expanded: bool,
    pub is_dirty: bool,
}

impl FileTree {
    /// 资源管理器的扁平行列表。
    ///
    /// `filter` 为空时按展开状态遍历；否则展示名字包含 `filter`（忽略大小写）的文件
    /// 以及它们的祖先文件夹，不考虑展开状态。
    pub fn flatten_for_view(&self, filter: &str) -> Vec<FileTreeRow> {
        let filter = filter.trim().to_lowercase();
        let visible = (!filter.is_empty()).then(|| self.filter_matches(&filter));

        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = vec![(self.root, 0)];

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            if let Some(visible) = &visible {
                if !visible.contains(&id) {
                    continue;
                }
            }

            let is_expanded = self.is_expanded(id);
            result.push(FileTreeRow {
                id,
                depth: u16::try_from(depth).unwrap_or(u16::MAX),
                name: node.name.clone(),
                is_folder: node.is_folder(),
                is_expanded,
                is_dirty: node.dirty,
            });

            let descend = node.is_folder() && (visible.is_some() || is_expanded);
            if descend && depth < self.arena.len() {
                for &child in node.children.iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }

        result
    }

    fn filter_matches(&self, filter: &str) -> FxHashSet<NodeId> {
        let mut visible = FxHashSet::default();
        for file in self.files() {
            if !file.name.to_lowercase().contains(filter) {
                continue;
            }
            let mut current = Some(file.id);
            while let Some(id) = current {
                if !visible.insert(id) {
                    break;
                }
                current = self.arena.get(id).and_then(|n| n.parent);
            }
        }
        visible
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
