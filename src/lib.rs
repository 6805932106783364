//! cinerec - 基于内容的电影推荐引擎
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **engine**: 核心（分词、TF-IDF 特征、余弦相似度、标题消歧、top-N 排名）
//! - **error**: 错误类型
//! - **service**: Recommender 门面（模型槽、后台重建、两阶段消歧协议）
//! - **store**: SQLite 电影库与 CSV 批量导入

pub mod config;
pub mod engine;
pub mod error;
pub mod service;
pub mod store;

pub use engine::{ModelConfig, Recommendation, RecommenderModel};
pub use error::RecError;
pub use service::{Outcome, Recommender};
pub use store::{MovieRecord, MovieStore};
