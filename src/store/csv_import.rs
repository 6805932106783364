//! CSV 批量导入
//!
//! 列名沿用抓取产物：title / star / all_tags / description。抓取文件的表头
//! 常带多余空白，统一 Trim 后再匹配。行级错误（缺列、评分不是数字）与
//! 重复标题只计数、不中断导入；进度通过回调上报而不是直接打印，
//! 以便 CLI 与测试各自接管输出。

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, warn};

use super::SqliteStore;
use crate::error::RecError;

/// 导入结果统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// 文件中的数据行数（不含表头）
    pub total_rows: usize,
    pub inserted: usize,
    /// 跳过的行：解析失败或标题重复
    pub skipped: usize,
}

/// 从 CSV 文件批量导入电影；progress 每处理一行收到 (已处理, 总行数)
pub fn import_from_csv(
    store: &SqliteStore,
    path: impl AsRef<Path>,
    mut progress: Option<&mut dyn FnMut(usize, usize)>,
) -> Result<ImportSummary, RecError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path.as_ref())?;

    let headers = reader.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h == name);
    let (title_col, star_col, tags_col, desc_col) = match (
        col("title"),
        col("star"),
        col("all_tags"),
        col("description"),
    ) {
        (Some(t), Some(s), Some(c), Some(d)) => (t, s, c, d),
        _ => {
            return Err(RecError::CsvFormat(format!(
                "missing required columns (title/star/all_tags/description), got: {:?}",
                headers.iter().collect::<Vec<_>>()
            )))
        }
    };

    // 先整体读入以便报告总行数；导入文件规模有限（数千行）
    let rows: Vec<StringRecord> = reader.records().collect::<Result<_, _>>()?;
    let total_rows = rows.len();
    info!(path = %path.as_ref().display(), total_rows, "开始导入 CSV");

    let mut summary = ImportSummary {
        total_rows,
        ..Default::default()
    };

    for (i, row) in rows.iter().enumerate() {
        match parse_row(row, title_col, star_col, tags_col, desc_col) {
            Some((title, rating, category, comments)) => {
                if store.insert_movie(title, rating, category, comments)? {
                    summary.inserted += 1;
                } else {
                    summary.skipped += 1;
                }
            }
            None => {
                warn!(line = i + 2, "行解析失败，已跳过");
                summary.skipped += 1;
            }
        }
        if let Some(report) = progress.as_mut() {
            report(i + 1, total_rows);
        }
    }

    info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        "CSV 导入完成"
    );
    Ok(summary)
}

fn parse_row<'a>(
    row: &'a StringRecord,
    title_col: usize,
    star_col: usize,
    tags_col: usize,
    desc_col: usize,
) -> Option<(&'a str, f64, &'a str, &'a str)> {
    let title = row.get(title_col)?;
    if title.is_empty() {
        return None;
    }
    let rating: f64 = row.get(star_col)?.parse().ok()?;
    let category = row.get(tags_col)?;
    let comments = row.get(desc_col)?;
    Some((title, rating, category, comments))
}
