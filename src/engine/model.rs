//! 推荐模型：一次性批量构建的值对象
//!
//! 记录快照、相似度矩阵与 id→行号 映射一起构建、一起被替换；
//! 不存在增量更新路径，底层数据变化需要整体 rebuild。
//! 模型是纯值对象，不持有全局状态，测试与多租户可以各建各的。

use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::engine::query::{self, Candidate};
use crate::engine::similarity::SimilarityMatrix;
use crate::engine::{features, rank, similarity};
use crate::error::RecError;
use crate::store::MovieRecord;

/// 模型构建参数（来自 [model] 配置段）
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// 词表上限，超出时按词频截断
    pub max_features: usize,
    /// 类别相对简介的权重（内容串中类别的重复次数）
    pub category_weight: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            category_weight: 3,
        }
    }
}

/// 一条推荐结果
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub rating: f64,
    pub category: String,
    /// 与查询电影的余弦相似度
    pub score: f32,
}

/// 构建完成的模型：记录快照 + 相似度矩阵 + id→行号映射
pub struct RecommenderModel {
    records: Vec<MovieRecord>,
    row_of: HashMap<i64, usize>,
    similarity: SimilarityMatrix,
}

impl RecommenderModel {
    /// 全量构建；空记录集返回 EmptyCorpus。CPU 密集，调用方可放入
    /// 阻塞线程池，内部不做任何交互式输入。
    pub fn build(records: Vec<MovieRecord>, config: &ModelConfig) -> Result<Self, RecError> {
        let started = Instant::now();
        let matrix = features::build(&records, config.category_weight, config.max_features)?;
        let similarity = similarity::compute(&matrix);
        let row_of = records.iter().enumerate().map(|(i, r)| (r.id, i)).collect();
        info!(
            movies = records.len(),
            vocab = matrix.vocab_size(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "推荐模型构建完成"
        );
        Ok(Self {
            records,
            row_of,
            similarity,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 标题子串候选（消歧第一阶段）
    pub fn find_candidates(&self, query: &str) -> Vec<Candidate> {
        query::find_candidates(&self.records, query)
    }

    /// 对指定电影检索最相似的至多 top_n 部（不含自身）
    pub fn recommend_for(
        &self,
        movie_id: i64,
        top_n: usize,
    ) -> Result<Vec<Recommendation>, RecError> {
        let row = self
            .row_of
            .get(&movie_id)
            .copied()
            .ok_or(RecError::UnknownMovie(movie_id))?;
        Ok(rank::top_similar(&self.similarity, row, top_n)
            .into_iter()
            .map(|(j, score)| {
                let r = &self.records[j];
                Recommendation {
                    title: r.title.clone(),
                    rating: r.rating,
                    category: r.category.clone(),
                    score,
                }
            })
            .collect())
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }
}
