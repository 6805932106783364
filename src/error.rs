//! 推荐引擎错误类型
//!
//! EmptyCorpus / NotFound / UnknownMovie 属于查询级、可恢复的错误，调用方换个输入即可重试；
//! Store 表示数据源不可用，构建失败后模型保持未初始化，后续查询以 ModelNotReady 快速失败。

use thiserror::Error;

/// 推荐流程中可能出现的错误（语料为空、查询未命中、数据源故障等）
#[derive(Error, Debug)]
pub enum RecError {
    /// 电影库为空，无法构建模型；推荐服务不可用但进程不退出
    #[error("Empty corpus: no movies to build a model from")]
    EmptyCorpus,

    /// 没有任何标题包含查询串（原样携带查询文本）
    #[error("No movie title contains '{0}'")]
    NotFound(String),

    /// 模型尚未构建成功，查询需先 rebuild
    #[error("Model not ready: rebuild before querying")]
    ModelNotReady,

    /// 选中的电影 id 不在当前模型里（例如重建后记录已被移除）
    #[error("Movie id {0} is not in the current model")]
    UnknownMovie(i64),

    /// 数据源不可用（打开 / 读取 SQLite 失败）
    #[error("Store unavailable: {0}")]
    Store(#[from] rusqlite::Error),

    /// CSV 文件级读取错误（行级错误只计数、不中断导入）
    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    /// CSV 表头缺少必需列
    #[error("CSV format: {0}")]
    CsvFormat(String),
}
