//! 推荐引擎核心
//!
//! 模块划分：
//! - **tokenizer**: 中英混合分词（jieba）
//! - **features**: 内容串拼接 + TF-IDF 向量化
//! - **similarity**: 两两余弦相似度矩阵
//! - **query**: 部分标题匹配与两阶段消歧
//! - **rank**: 按相似度取 top-N
//! - **model**: RecommenderModel 值对象（一次性批量构建，整体替换）

pub mod features;
pub mod model;
pub mod query;
pub mod rank;
pub mod similarity;
pub mod tokenizer;

pub use model::{ModelConfig, Recommendation, RecommenderModel};
pub use query::{Candidate, Selection, SelectionOutcome};
pub use similarity::SimilarityMatrix;
