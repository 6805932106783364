//! 推荐服务门面
//!
//! 持有当前模型槽（RwLock<ModelSlot>）：构建在锁外完成，仅在替换指针时
//! 短暂持写锁；查询要么看到旧模型、要么看到新模型，绝不会观察到半成品。
//! rebuild 可经 spawn_blocking 移到后台线程，完成或失败通过 oneshot
//! 一次性通知，交互式前端据此保持响应。

use std::sync::{Arc, RwLock};

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::engine::query::{apply_selection, Candidate, Selection, SelectionOutcome};
use crate::engine::{ModelConfig, Recommendation, RecommenderModel};
use crate::error::RecError;
use crate::store::MovieStore;

/// 一次查询的出口：直接给出排名、等待调用方消歧、或被显式取消
#[derive(Debug)]
pub enum Outcome {
    Ranked(Vec<Recommendation>),
    /// 多个标题命中；候选按库内顺序、1 基序号，待 select_candidate 回应
    NeedsChoice(Vec<Candidate>),
    Cancelled,
}

/// 构建完成的终态通知内容
#[derive(Debug, Clone)]
pub struct ModelStats {
    pub movies: usize,
}

/// 模型槽：区分「从未构建」与「构建过但库是空的」，
/// 前者查询报 ModelNotReady，后者报 EmptyCorpus。
enum ModelSlot {
    NotBuilt,
    Empty,
    Ready(Arc<RecommenderModel>),
}

pub struct Recommender {
    model: RwLock<ModelSlot>,
    config: ModelConfig,
}

impl Recommender {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            model: RwLock::new(ModelSlot::NotBuilt),
            config,
        }
    }

    /// 当前模型快照；未构建 / 空库时快速失败
    fn current(&self) -> Result<Arc<RecommenderModel>, RecError> {
        match &*self.model.read().unwrap() {
            ModelSlot::NotBuilt => Err(RecError::ModelNotReady),
            ModelSlot::Empty => Err(RecError::EmptyCorpus),
            ModelSlot::Ready(model) => Ok(Arc::clone(model)),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.model.read().unwrap(), ModelSlot::Ready(_))
    }

    /// 同步全量重建：fetch_all → build → 原子替换。
    /// 数据源故障时旧模型保持不变；空库把槽置为 Empty 并返回 EmptyCorpus。
    pub fn rebuild(&self, store: &dyn MovieStore) -> Result<ModelStats, RecError> {
        let records = store.fetch_all()?;
        if records.is_empty() {
            *self.model.write().unwrap() = ModelSlot::Empty;
            return Err(RecError::EmptyCorpus);
        }
        let model = RecommenderModel::build(records, &self.config)?;
        let stats = ModelStats {
            movies: model.len(),
        };
        *self.model.write().unwrap() = ModelSlot::Ready(Arc::new(model));
        Ok(stats)
    }

    /// 后台重建：CPU 密集构建放入阻塞线程池，完成或失败通过 oneshot
    /// 一次性通知；构建过程不做任何交互式输入。
    pub fn rebuild_in_background(
        self: &Arc<Self>,
        store: Arc<dyn MovieStore>,
    ) -> oneshot::Receiver<Result<ModelStats, RecError>> {
        let (tx, rx) = oneshot::channel();
        let this = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            let result = this.rebuild(store.as_ref());
            if let Err(e) = &result {
                warn!(error = %e, "后台模型构建失败");
            }
            let _ = tx.send(result);
        });
        rx
    }

    /// 查询入口：恰好一个命中直接排名，多个命中交还候选列表等待选择
    pub fn get_recommendations(&self, query: &str, top_n: usize) -> Result<Outcome, RecError> {
        let model = self.current()?;
        let candidates = model.find_candidates(query);
        debug!(query, hits = candidates.len(), "标题匹配");
        match candidates.len() {
            0 => Err(RecError::NotFound(query.to_string())),
            1 => Ok(Outcome::Ranked(
                model.recommend_for(candidates[0].movie_id, top_n)?,
            )),
            _ => Ok(Outcome::NeedsChoice(candidates)),
        }
    }

    /// 消歧第一阶段：枚举候选（挂起点之前的半程）
    pub fn list_candidates(&self, query: &str) -> Result<Vec<Candidate>, RecError> {
        let model = self.current()?;
        let candidates = model.find_candidates(query);
        if candidates.is_empty() {
            return Err(RecError::NotFound(query.to_string()));
        }
        Ok(candidates)
    }

    /// 消歧第二阶段：应用调用方的选择。越界把候选原样交还
    /// （调用方重新提示），取消返回 Cancelled。
    pub fn select_candidate(
        &self,
        candidates: &[Candidate],
        selection: Selection,
        top_n: usize,
    ) -> Result<Outcome, RecError> {
        match apply_selection(candidates, selection) {
            SelectionOutcome::Cancelled => Ok(Outcome::Cancelled),
            SelectionOutcome::OutOfRange => Ok(Outcome::NeedsChoice(candidates.to_vec())),
            SelectionOutcome::Chosen(id) => {
                let model = self.current()?;
                Ok(Outcome::Ranked(model.recommend_for(id, top_n)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MovieRecord;

    /// 测试用内存数据源
    struct VecStore(Vec<MovieRecord>);

    impl MovieStore for VecStore {
        fn fetch_all(&self) -> Result<Vec<MovieRecord>, RecError> {
            Ok(self.0.clone())
        }
    }

    fn record(id: i64, title: &str, category: &str, comments: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            rating: 8.0,
            category: category.to_string(),
            comments: comments.to_string(),
        }
    }

    fn scenario_store() -> VecStore {
        VecStore(vec![
            record(1, "Inception", "Sci-Fi/Thriller", "dream heist"),
            record(2, "Interstellar", "Sci-Fi/Drama", "space travel"),
            record(3, "Titanic", "Romance/Drama", "ship disaster"),
        ])
    }

    #[test]
    fn test_query_before_build_fails_fast() {
        let recommender = Recommender::new(ModelConfig::default());
        let err = recommender.get_recommendations("Inception", 5).unwrap_err();
        assert!(matches!(err, RecError::ModelNotReady));
    }

    #[test]
    fn test_empty_store_reports_empty_corpus_on_every_query() {
        let recommender = Recommender::new(ModelConfig::default());
        let err = recommender.rebuild(&VecStore(Vec::new())).unwrap_err();
        assert!(matches!(err, RecError::EmptyCorpus));
        // 之后的查询报 EmptyCorpus 而不是 ModelNotReady
        let err = recommender.get_recommendations("anything", 5).unwrap_err();
        assert!(matches!(err, RecError::EmptyCorpus));
    }

    #[test]
    fn test_single_match_ranks_directly() {
        let recommender = Recommender::new(ModelConfig::default());
        recommender.rebuild(&scenario_store()).unwrap();
        match recommender.get_recommendations("Titanic", 2).unwrap() {
            Outcome::Ranked(recs) => {
                assert_eq!(recs.len(), 2);
                assert!(recs.iter().all(|r| r.title != "Titanic"));
            }
            other => panic!("expected Ranked, got {other:?}"),
        }
    }

    #[test]
    fn test_not_found_carries_query_text() {
        let recommender = Recommender::new(ModelConfig::default());
        recommender.rebuild(&scenario_store()).unwrap();
        match recommender.get_recommendations("Matrix", 5).unwrap_err() {
            RecError::NotFound(q) => assert_eq!(q, "Matrix"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_two_phase_disambiguation() {
        let recommender = Recommender::new(ModelConfig::default());
        recommender.rebuild(&scenario_store()).unwrap();

        let candidates = match recommender.get_recommendations("in", 2).unwrap() {
            Outcome::NeedsChoice(c) => c,
            other => panic!("expected NeedsChoice, got {other:?}"),
        };
        assert_eq!(candidates[0].title, "Inception");
        assert_eq!(candidates[1].title, "Interstellar");

        // 越界：候选原样交还，调用方重新提示
        match recommender
            .select_candidate(&candidates, Selection::Index(9), 2)
            .unwrap()
        {
            Outcome::NeedsChoice(c) => assert_eq!(c.len(), 2),
            other => panic!("expected NeedsChoice, got {other:?}"),
        }

        // 选 2 号 → Interstellar 的推荐
        match recommender
            .select_candidate(&candidates, Selection::Index(2), 2)
            .unwrap()
        {
            Outcome::Ranked(recs) => {
                assert!(recs.iter().all(|r| r.title != "Interstellar"));
                assert_eq!(recs[0].title, "Inception");
            }
            other => panic!("expected Ranked, got {other:?}"),
        }

        // 显式取消
        match recommender
            .select_candidate(&candidates, Selection::Cancel, 2)
            .unwrap()
        {
            Outcome::Cancelled => {}
            other => panic!("expected Cancelled, got {other:?}"),
        }
    }

    #[test]
    fn test_top_n_zero_is_empty_not_error() {
        let recommender = Recommender::new(ModelConfig::default());
        recommender.rebuild(&scenario_store()).unwrap();
        match recommender.get_recommendations("Titanic", 0).unwrap() {
            Outcome::Ranked(recs) => assert!(recs.is_empty()),
            other => panic!("expected Ranked, got {other:?}"),
        }
    }

    #[test]
    fn test_rebuild_swaps_model_atomically() {
        let recommender = Recommender::new(ModelConfig::default());
        recommender.rebuild(&scenario_store()).unwrap();

        // 数据源故障：旧模型保持可用
        struct FailingStore;
        impl MovieStore for FailingStore {
            fn fetch_all(&self) -> Result<Vec<MovieRecord>, RecError> {
                Err(RecError::Store(rusqlite::Error::InvalidQuery))
            }
        }
        assert!(recommender.rebuild(&FailingStore).is_err());
        assert!(recommender.is_ready());
        assert!(recommender.get_recommendations("Titanic", 1).is_ok());

        // 换一套数据重建后按新库应答
        let stats = recommender
            .rebuild(&VecStore(vec![
                record(7, "流浪地球", "科幻/冒险", "带着地球去流浪"),
                record(8, "星际穿越", "科幻/剧情", "穿越虫洞寻找新家园"),
            ]))
            .unwrap();
        assert_eq!(stats.movies, 2);
        assert!(matches!(
            recommender.get_recommendations("Titanic", 1),
            Err(RecError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_background_rebuild_notifies_once() {
        let recommender = Arc::new(Recommender::new(ModelConfig::default()));
        let store: Arc<dyn MovieStore> = Arc::new(scenario_store());

        let done = recommender.rebuild_in_background(store);
        let stats = done.await.expect("sender dropped").expect("build failed");
        assert_eq!(stats.movies, 3);
        assert!(recommender.is_ready());
    }

    #[tokio::test]
    async fn test_background_rebuild_reports_failure() {
        let recommender = Arc::new(Recommender::new(ModelConfig::default()));
        let store: Arc<dyn MovieStore> = Arc::new(VecStore(Vec::new()));

        let done = recommender.rebuild_in_background(store);
        let result = done.await.expect("sender dropped");
        assert!(matches!(result, Err(RecError::EmptyCorpus)));
        assert!(!recommender.is_ready());
    }
}
