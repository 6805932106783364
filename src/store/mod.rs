//! 电影数据存储
//!
//! - MovieRecord: 引擎消费的只读记录
//! - MovieStore: 引擎对数据源的唯一契约（一次性全量读取）
//! - SqliteStore: rusqlite 实现（movies 表）
//! - csv_import: CSV 批量导入（带进度回调）

mod csv_import;
mod sqlite;

pub use csv_import::{import_from_csv, ImportSummary};
pub use sqlite::SqliteStore;

use serde::Serialize;

use crate::error::RecError;

/// 一条电影记录。引擎视为不可变快照，从不回写或修改。
#[derive(Debug, Clone, Serialize)]
pub struct MovieRecord {
    /// 库内唯一、稳定的数字标识
    pub id: i64,
    /// 标题，库内唯一
    pub title: String,
    pub rating: f64,
    /// `/` 分隔的多标签类别，如 "剧情/科幻"
    pub category: String,
    /// 自由文本简介
    pub comments: String,
}

/// 引擎对数据源的契约：一次 fetch_all 取回全量记录（不分页、不过滤、不回写）。
/// Send + Sync 以便后台构建任务共享。
pub trait MovieStore: Send + Sync {
    fn fetch_all(&self) -> Result<Vec<MovieRecord>, RecError>;
}
