use rustc_hash::FxHashMap;

use crate::kernel::services::adapters::search_files;
use crate::kernel::services::ports::{FileMatches, SearchOptions};
use crate::models::{FileTree, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFileResult {
    pub result: FileMatches,
    pub expanded: bool,
}

/// 搜索面板：查询与开关一变就重新扫描
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub options: SearchOptions,
    pub files: Vec<SearchFileResult>,
    pub total_matches: usize,
    pub last_error: Option<String>,
}

impl SearchState {
    pub fn set_query(&mut self, tree: &FileTree, query: String) -> bool {
        if self.query == query {
            return false;
        }
        self.query = query;
        self.run(tree);
        true
    }

    pub fn toggle_case_sensitive(&mut self, tree: &FileTree) {
        self.options.case_sensitive = !self.options.case_sensitive;
        self.run(tree);
    }

    pub fn toggle_whole_word(&mut self, tree: &FileTree) {
        self.options.whole_word = !self.options.whole_word;
        self.run(tree);
    }

    pub fn toggle_regex(&mut self, tree: &FileTree) {
        self.options.use_regex = !self.options.use_regex;
        self.run(tree);
    }

    /// 失败时清空结果并记录错误；已有文件的展开状态沿用，新文件默认展开
    pub fn run(&mut self, tree: &FileTree) {
        let expanded: FxHashMap<NodeId, bool> = self
            .files
            .iter()
            .map(|f| (f.result.file_id, f.expanded))
            .collect();

        match search_files(tree, &self.query, self.options) {
            Ok(results) => {
                self.total_matches = results.iter().map(|f| f.matches.len()).sum();
                self.files = results
                    .into_iter()
                    .map(|result| SearchFileResult {
                        expanded: expanded.get(&result.file_id).copied().unwrap_or(true),
                        result,
                    })
                    .collect();
                self.last_error = None;
            }
            Err(e) => {
                tracing::debug!(query = %self.query, error = %e, "search failed");
                self.files.clear();
                self.total_matches = 0;
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// 查询非空时才重跑（文件内容变化后调用）
    pub fn refresh(&mut self, tree: &FileTree) -> bool {
        if self.query.trim().is_empty() {
            return false;
        }
        self.run(tree);
        true
    }

    pub fn toggle_file_expanded(&mut self, file: NodeId) -> bool {
        match self.files.iter_mut().find(|f| f.result.file_id == file) {
            Some(entry) => {
                entry.expanded = !entry.expanded;
                true
            }
            None => false,
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_failed(&self) -> bool {
        self.last_error.is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/search.rs"]
mod tests;
