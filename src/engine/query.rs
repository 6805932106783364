//! 查询解析：部分标题匹配与两阶段消歧
//!
//! 第一阶段 find_candidates 枚举所有大小写不敏感的子串命中；
//! 第二阶段 apply_selection 把调用方的选择（序号或取消）落到具体记录。
//! 两阶段分离是一个挂起点：选择可以来自同步 CLI 提示、异步 UI 回调
//! 或测试脚本，解析器本身不做任何 IO。

use serde::Serialize;

use crate::store::MovieRecord;

/// 一个消歧候选；display_index 从 1 开始，按库内顺序
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub display_index: usize,
    pub movie_id: i64,
    pub title: String,
}

/// 调用方对消歧提示的回应
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// 1 基序号
    Index(usize),
    /// 显式取消；没有超时语义，未回应就一直挂起
    Cancel,
}

/// 应用选择的结果；OutOfRange 由调用方决定是否重新提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Chosen(i64),
    OutOfRange,
    Cancelled,
}

/// 标题子串匹配（大小写不敏感）；空标题跳过，命中按记录顺序返回
pub fn find_candidates(records: &[MovieRecord], query: &str) -> Vec<Candidate> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| !r.title.is_empty() && r.title.to_lowercase().contains(&needle))
        .enumerate()
        .map(|(i, r)| Candidate {
            display_index: i + 1,
            movie_id: r.id,
            title: r.title.clone(),
        })
        .collect()
}

/// 把选择应用到候选列表；纯函数
pub fn apply_selection(candidates: &[Candidate], selection: Selection) -> SelectionOutcome {
    match selection {
        Selection::Cancel => SelectionOutcome::Cancelled,
        Selection::Index(i) => {
            if (1..=candidates.len()).contains(&i) {
                SelectionOutcome::Chosen(candidates[i - 1].movie_id)
            } else {
                SelectionOutcome::OutOfRange
            }
        }
    }
}
