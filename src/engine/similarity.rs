//! 两两余弦相似度矩阵
//!
//! 稠密对称 n×n，内存 O(n²)，这限定了引擎可以在内存中服务的语料规模
//! （几万条以内）；超出时应分片或换近似检索，而不是悄悄截断。
//! 零向量行（无可提取内容的记录）与所有行的相似度定义为 0，含对角线，
//! 以避免除零。计算无随机因素，相同输入产出相同矩阵。

use crate::engine::features::FeatureMatrix;

/// 对称相似度矩阵，行序与特征矩阵一致
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

/// 计算两两余弦相似度：sim(i,j) = dot(v_i, v_j) / (‖v_i‖·‖v_j‖)
pub fn compute(features: &FeatureMatrix) -> SimilarityMatrix {
    let n = features.n_rows();
    let norms: Vec<f32> = (0..n)
        .map(|i| features.row(i).iter().map(|v| v * v).sum::<f32>().sqrt())
        .collect();

    let mut data = vec![0.0f32; n * n];
    for i in 0..n {
        if norms[i] == 0.0 {
            // 零向量行整行保持 0
            continue;
        }
        data[i * n + i] = 1.0;
        for j in (i + 1)..n {
            if norms[j] == 0.0 {
                continue;
            }
            let dot: f32 = features
                .row(i)
                .iter()
                .zip(features.row(j))
                .map(|(a, b)| a * b)
                .sum();
            let sim = dot / (norms[i] * norms[j]);
            data[i * n + j] = sim;
            data[j * n + i] = sim;
        }
    }
    SimilarityMatrix { n, data }
}
