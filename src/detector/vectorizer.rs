use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::artifacts::ArtifactError;

static RE_TOKEN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").ok());

/// Sparse feature row produced for a single document.
///
/// `indices` are strictly increasing and every index is below `dim`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Build from unordered `(index, value)` pairs. Zero entries are dropped.
    pub fn from_pairs(dim: usize, mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.retain(|&(idx, v)| idx < dim && v != 0.0);
        pairs.sort_by_key(|&(idx, _)| idx);
        pairs.dedup_by_key(|&mut (idx, _)| idx);
        let (indices, values) = pairs.into_iter().unzip();
        Self { dim, indices, values }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.iter()
            .map(|(idx, v)| dense.get(idx).copied().unwrap_or(0.0) * v)
            .sum()
    }
}

/// Turns normalized text into a fixed-dimension feature row.
pub trait Vectorizer: Send + Sync {
    fn transform(&self, text: &str) -> anyhow::Result<FeatureVector>;

    fn num_features(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// Fitted TF-IDF state exported from training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_lowercase() -> bool {
    true
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

impl TfidfVectorizer {
    #[cfg(test)]
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Result<Self, ArtifactError> {
        let vectorizer = Self {
            vocabulary,
            idf,
            ngram_range: default_ngram_range(),
            lowercase: default_lowercase(),
            sublinear_tf: false,
            norm: default_norm(),
        };
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    #[cfg(test)]
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Result<Self, ArtifactError> {
        self.ngram_range = (min_n, max_n);
        self.validate()?;
        Ok(self)
    }

    #[cfg(test)]
    pub fn with_sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.sublinear_tf = sublinear_tf;
        self
    }

    #[cfg(test)]
    pub fn with_norm(mut self, norm: Option<Norm>) -> Self {
        self.norm = norm;
        self
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes).map_err(|e| e.at(path))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let vectorizer: Self = serde_json::from_slice(bytes).map_err(ArtifactError::Format)?;
        vectorizer.validate()?;
        debug!(
            vocab_size = vectorizer.vocabulary.len(),
            ngram_range = ?vectorizer.ngram_range,
            "Loaded TF-IDF vectorizer"
        );
        Ok(vectorizer)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::Invalid(format!(
                "ngram_range ({min_n}, {max_n}) must satisfy 1 <= min <= max"
            )));
        }
        if self.idf.len() != self.vocabulary.len() {
            return Err(ArtifactError::Invalid(format!(
                "idf has {} entries but vocabulary has {} terms",
                self.idf.len(),
                self.vocabulary.len()
            )));
        }
        if let Some((term, &idx)) = self.vocabulary.iter().find(|&(_, &idx)| idx >= self.idf.len()) {
            return Err(ArtifactError::Invalid(format!(
                "term {term:?} maps to column {idx} outside {} features",
                self.idf.len()
            )));
        }
        Ok(())
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let Some(re) = &*RE_TOKEN else {
            return Vec::new();
        };
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        re.find_iter(&text).map(|m| m.as_str().to_string()).collect()
    }

    fn ngrams(&self, tokens: &[String]) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        let mut grams = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            grams.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        grams
    }

    fn term_counts(&self, text: &str) -> HashMap<usize, f64> {
        let mut counts = HashMap::new();
        for gram in self.ngrams(&self.tokenize(text)) {
            if let Some(&idx) = self.vocabulary.get(&gram) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        counts
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, text: &str) -> anyhow::Result<FeatureVector> {
        let mut weights: Vec<(usize, f64)> = self
            .term_counts(text)
            .into_iter()
            .map(|(idx, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (idx, tf * self.idf[idx])
            })
            .collect();

        let norm = match self.norm {
            Some(Norm::L2) => weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt(),
            Some(Norm::L1) => weights.iter().map(|(_, w)| w.abs()).sum::<f64>(),
            None => 1.0,
        };
        if norm > 0.0 {
            for (_, w) in weights.iter_mut() {
                *w /= norm;
            }
        }

        debug!(nnz = weights.len(), "Vectorized document");
        Ok(FeatureVector::from_pairs(self.num_features(), weights))
    }

    fn num_features(&self) -> usize {
        self.idf.len()
    }
}
