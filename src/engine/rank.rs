//! 排名：按相似度取 top-N
//!
//! 按矩阵行号跳过查询行本身，而不是假定降序后的首位就是它：
//! 语料里存在与查询完全同分（如内容完全相同）的记录时，首位未必是查询行。
//! 稳定排序保证同分记录按库内顺序输出。

use crate::engine::similarity::SimilarityMatrix;

/// 返回与 row 最相似的至多 top_n 个 (行号, 分数)，降序，不含 row 自身。
/// top_n 为 0 返回空；超过候选数时返回全部候选。
pub fn top_similar(similarity: &SimilarityMatrix, row: usize, top_n: usize) -> Vec<(usize, f32)> {
    if top_n == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(usize, f32)> = similarity
        .row(row)
        .iter()
        .copied()
        .enumerate()
        .filter(|(j, _)| *j != row)
        .collect();

    // sort_by 是稳定排序，同分保持库内顺序
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{features, similarity};
    use crate::store::MovieRecord;

    fn record(id: i64, category: &str, comments: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: format!("movie-{id}"),
            rating: 8.0,
            category: category.to_string(),
            comments: comments.to_string(),
        }
    }

    fn sim_for(records: &[MovieRecord]) -> SimilarityMatrix {
        similarity::compute(&features::build(records, 3, 5000).unwrap())
    }

    #[test]
    fn test_excludes_query_row_even_with_equal_scored_duplicate() {
        // 记录 0 与 1 内容完全相同，sim(0,1)=1 与自相似同分
        let sim = sim_for(&[
            record(1, "Sci-Fi", "space travel"),
            record(2, "Sci-Fi", "space travel"),
            record(3, "Romance", "ship disaster"),
        ]);
        let ranked = top_similar(&sim, 0, 10);
        assert!(ranked.iter().all(|(j, _)| *j != 0));
        assert_eq!(ranked[0].0, 1);
        assert!((ranked[0].1 - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_length_is_min_of_top_n_and_candidates() {
        let sim = sim_for(&[
            record(1, "Sci-Fi", "a"),
            record(2, "Sci-Fi", "b"),
            record(3, "Sci-Fi", "c"),
        ]);
        assert_eq!(top_similar(&sim, 0, 1).len(), 1);
        assert_eq!(top_similar(&sim, 0, 2).len(), 2);
        // top_n 超过候选数时返回全部候选，不报错、不填充
        assert_eq!(top_similar(&sim, 0, 100).len(), 2);
    }

    #[test]
    fn test_top_n_zero_is_empty() {
        let sim = sim_for(&[record(1, "Sci-Fi", "a"), record(2, "Sci-Fi", "b")]);
        assert!(top_similar(&sim, 0, 0).is_empty());
    }

    #[test]
    fn test_descending_with_stable_tie_break() {
        // 1 与 2 对查询行同分（都只共享类别词），应按库内顺序输出
        let sim = sim_for(&[
            record(1, "Sci-Fi", "dream heist"),
            record(2, "Sci-Fi", "first tie"),
            record(3, "Sci-Fi", "first tie"),
            record(4, "Romance", "ship disaster"),
        ]);
        let ranked = top_similar(&sim, 0, 3);
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
        let tied: Vec<usize> = ranked
            .iter()
            .filter(|(_, s)| (*s - ranked[0].1).abs() < 1e-6)
            .map(|(j, _)| *j)
            .collect();
        assert!(tied.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_deterministic() {
        let sim = sim_for(&[
            record(1, "科幻/冒险", "带着地球去流浪"),
            record(2, "科幻/剧情", "穿越虫洞寻找新家园"),
            record(3, "爱情/剧情", "巨轮海难中的爱情"),
        ]);
        assert_eq!(top_similar(&sim, 0, 2), top_similar(&sim, 0, 2));
    }
}
