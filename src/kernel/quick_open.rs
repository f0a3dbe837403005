use crate::models::{FileTree, NodeId};

/// 快速打开：按文件名子串（忽略大小写）过滤，空查询列出全部文件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuickOpenState {
    pub query: String,
    pub selected: usize,
}

impl QuickOpenState {
    pub fn reset(&mut self) {
        self.query.clear();
        self.selected = 0;
    }

    pub fn set_query(&mut self, query: String) -> bool {
        if self.query == query {
            return false;
        }
        self.query = query;
        self.selected = 0;
        true
    }

    pub fn matches(&self, tree: &FileTree) -> Vec<NodeId> {
        let query = self.query.trim().to_lowercase();
        tree.files()
            .filter(|f| query.is_empty() || f.name().to_lowercase().contains(&query))
            .map(|f| f.id())
            .collect()
    }

    /// 选中项限制在 `[0, len - 1]`
    pub fn move_selection(&mut self, tree: &FileTree, delta: isize) -> bool {
        let len = self.matches(tree).len();
        if len == 0 {
            return false;
        }
        let next = self
            .selected
            .saturating_add_signed(delta)
            .min(len - 1);
        if next == self.selected {
            return false;
        }
        self.selected = next;
        true
    }

    pub fn selected_file(&self, tree: &FileTree) -> Option<NodeId> {
        self.matches(tree).get(self.selected).copied()
    }
}
