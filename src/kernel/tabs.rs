//! 标签栏：打开的文件序列 + 当前活动文件

use crate::models::{FileTree, NodeId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabsState {
    open: Vec<NodeId>,
    active: Option<NodeId>,
}

impl TabsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_files(&self) -> &[NodeId] {
        &self.open
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn is_open(&self, id: NodeId) -> bool {
        self.open.contains(&id)
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.open.iter().position(|&open| open == id)
    }

    pub fn select(&mut self, tree: &FileTree, id: NodeId) -> bool {
        if !tree.is_file(id) {
            tracing::debug!(node = ?id, "select ignored: not a file");
            return false;
        }
        let prev_active = self.active;
        self.active = Some(id);
        if self.is_open(id) {
            return prev_active != Some(id);
        }
        self.open.push(id);
        true
    }

    /// 关闭标签；若关闭的是活动文件，活动文件落到最右侧剩余标签
    pub fn close(&mut self, id: NodeId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.open.remove(index);
        if self.active == Some(id) {
            self.active = self.open.last().copied();
        }
        true
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.open.len();
        if from >= len || to >= len {
            tracing::debug!(from, to, len, "reorder ignored: index out of range");
            return false;
        }
        if from == to {
            return false;
        }
        let moved = self.open.remove(from);
        self.open.insert(to, moved);
        true
    }

    pub fn close_others(&mut self, keep: NodeId) -> bool {
        if !self.is_open(keep) {
            return false;
        }
        let others: Vec<_> = self.open.iter().copied().filter(|&id| id != keep).collect();
        self.close_each(others)
    }

    pub fn close_to_right(&mut self, id: NodeId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let right = self.open[index + 1..].to_vec();
        self.close_each(right)
    }

    pub fn close_saved(&mut self, tree: &FileTree) -> bool {
        let saved: Vec<_> = self
            .open
            .iter()
            .copied()
            .filter(|&id| tree.resolve(id).is_some_and(|n| !n.is_dirty()))
            .collect();
        self.close_each(saved)
    }

    pub fn close_all(&mut self) -> bool {
        let all = self.open.clone();
        self.close_each(all)
    }

    fn close_each(&mut self, ids: Vec<NodeId>) -> bool {
        let mut changed = false;
        for id in ids {
            changed |= self.close(id);
        }
        changed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/tabs.rs"]
mod tests;
