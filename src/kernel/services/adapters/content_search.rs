//! 全局内容搜索：对内存中的每个文件逐行线性扫描

use regex::{Regex, RegexBuilder};

use crate::kernel::services::ports::search::{FileMatches, Match, Result, SearchOptions};
use crate::models::FileTree;

/// 编译好的查询
#[derive(Debug, Clone)]
pub struct ContentSearcher {
    regex: Regex,
}

impl ContentSearcher {
    /// 空白查询返回 `Ok(None)`；正则模式下的非法模式返回错误
    pub fn new(query: &str, options: SearchOptions) -> Result<Option<Self>> {
        if query.trim().is_empty() {
            return Ok(None);
        }

        let pattern = if options.use_regex {
            query.to_string()
        } else {
            let escaped = regex::escape(query);
            if options.whole_word {
                format!(r"\b{escaped}\b")
            } else {
                escaped
            }
        };

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!options.case_sensitive)
            .build()?;
        Ok(Some(Self { regex }))
    }

    pub fn search_text(&self, content: &str) -> Vec<Match> {
        let mut matches = Vec::new();
        for (index, line) in lines(content).enumerate() {
            for m in self.regex.find_iter(line) {
                if m.start() == m.end() {
                    continue;
                }
                matches.push(Match {
                    line: index + 1,
                    start: char_offset(line, m.start()),
                    end: char_offset(line, m.end()),
                    line_content: line.to_string(),
                });
            }
        }
        matches
    }

    /// 按存储顺序扫描所有文件，只返回有命中的文件
    pub fn search_tree(&self, tree: &FileTree) -> Vec<FileMatches> {
        let mut results = Vec::new();
        let mut files_searched = 0usize;
        for file in tree.files() {
            files_searched += 1;
            let matches = self.search_text(file.content());
            if matches.is_empty() {
                continue;
            }
            results.push(FileMatches {
                file_id: file.id(),
                file_name: file.name().into(),
                path: tree.display_path(file.id()),
                matches,
            });
        }
        tracing::debug!(
            pattern = self.regex.as_str(),
            files_searched,
            files_with_matches = results.len(),
            "content search finished"
        );
        results
    }
}

/// 编译并执行一次搜索
pub fn search_files(
    tree: &FileTree,
    query: &str,
    options: SearchOptions,
) -> Result<Vec<FileMatches>> {
    Ok(ContentSearcher::new(query, options)?
        .map(|searcher| searcher.search_tree(tree))
        .unwrap_or_default())
}

fn char_offset(line: &str, byte_offset: usize) -> usize {
    if line.is_ascii() {
        byte_offset
    } else {
        line[..byte_offset].chars().count()
    }
}

/// 按 `\n` 切行；末尾的换行会留下一个空行
fn lines(content: &str) -> impl Iterator<Item = &str> {
    let bytes = content.as_bytes();
    let mut start = 0;
    memchr::memchr_iter(b'\n', bytes)
        .chain(std::iter::once(bytes.len()))
        .map(move |end| {
            let line = &content[start..end];
            start = end + 1;
            line
        })
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/content_search.rs"]
mod tests;
