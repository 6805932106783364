//! 特征构建：内容串拼接 + TF-IDF 向量化
//!
//! 每条记录的内容 = 类别（`/` 归一为空格，重复 category_weight 次）+ 简介，
//! 使相似度偏向类型而非文案。词表按语料词频降序截断到 max_features，
//! 并列按词典序升序（同一语料下结果确定）。
//! idf 采用平滑形式 ln((1+n)/(1+df)) + 1；行向量不做归一化，
//! 归一化留给余弦相似度计算。

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::engine::tokenizer;
use crate::error::RecError;
use crate::store::MovieRecord;

/// TF-IDF 特征矩阵：行序与输入记录一致，该对齐是相似度矩阵正确性的前提
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    rows: Vec<Vec<f32>>,
    /// 保留下来的词表，按列序排列（词频降序、并列按词典序升序）
    terms: Vec<String>,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn vocab_size(&self) -> usize {
        self.terms.len()
    }

    /// 词表（列序即截断顺序），供调用方检查截断结果
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.rows[i]
    }
}

/// 由记录构建内容文档：repeat(normalize(category), weight) + " " + comments
pub fn content_document(record: &MovieRecord, category_weight: usize) -> String {
    let category = record.category.replace('/', " ");
    let mut content = String::new();
    for _ in 0..category_weight {
        content.push_str(&category);
        content.push(' ');
    }
    content.push_str(&record.comments);
    content
}

/// 对整个语料拟合 TF-IDF；不修改输入记录。空语料返回 EmptyCorpus。
pub fn build(
    records: &[MovieRecord],
    category_weight: usize,
    max_features: usize,
) -> Result<FeatureMatrix, RecError> {
    if records.is_empty() {
        return Err(RecError::EmptyCorpus);
    }

    let docs: Vec<Vec<String>> = records
        .iter()
        .map(|r| tokenizer::tokenize(&content_document(r, category_weight)))
        .collect();

    // 语料词频与文档频率
    let mut term_freq: HashMap<String, usize> = HashMap::new();
    let mut doc_freq: HashMap<String, usize> = HashMap::new();
    for tokens in &docs {
        let mut seen: HashSet<&str> = HashSet::new();
        for t in tokens {
            *term_freq.entry(t.clone()).or_insert(0) += 1;
            if seen.insert(t.as_str()) {
                *doc_freq.entry(t.clone()).or_insert(0) += 1;
            }
        }
    }

    // 词表截断：词频降序，并列按词典序升序
    let mut sorted: Vec<(String, usize)> = term_freq.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(max_features);
    let terms: Vec<String> = sorted.into_iter().map(|(term, _)| term).collect();
    let vocab: HashMap<&str, usize> = terms
        .iter()
        .enumerate()
        .map(|(idx, term)| (term.as_str(), idx))
        .collect();

    let n_docs = docs.len();
    let vocab_size = terms.len();

    let mut idf = vec![0.0f32; vocab_size];
    for (idx, term) in terms.iter().enumerate() {
        let df = doc_freq.get(term).copied().unwrap_or(0);
        idf[idx] = (((1 + n_docs) as f32) / ((1 + df) as f32)).ln() + 1.0;
    }

    let mut rows = Vec::with_capacity(n_docs);
    for tokens in &docs {
        let mut row = vec![0.0f32; vocab_size];
        for t in tokens {
            if let Some(&idx) = vocab.get(t.as_str()) {
                row[idx] += 1.0;
            }
        }
        for (v, w) in row.iter_mut().zip(idf.iter()) {
            *v *= w;
        }
        rows.push(row);
    }

    debug!(n_docs, vocab_size, "TF-IDF 矩阵构建完成");
    Ok(FeatureMatrix { rows, terms })
}
