//! Configuration for the retriever.

use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, Result};

/// Configuration parameters for a [`Retriever`](crate::retriever::Retriever).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetrieverConfig {
    /// Number of nearest neighbors to request per search.
    pub top_k: usize,
    /// When `true`, index failures during search are logged and reported as
    /// empty result sets. When `false`, they are returned as errors so
    /// callers can distinguish "no matches" from "the index is down".
    pub lenient_failures: bool,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self { top_k: 5, lenient_failures: true }
    }
}

impl RetrieverConfig {
    /// Create a new builder for constructing a [`RetrieverConfig`].
    pub fn builder() -> RetrieverConfigBuilder {
        RetrieverConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RetrieverConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrieverConfigBuilder {
    config: RetrieverConfig,
}

impl RetrieverConfigBuilder {
    /// Set the number of nearest neighbors to request per search.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set whether index failures during search degrade to empty results.
    pub fn lenient_failures(mut self, lenient: bool) -> Self {
        self.config.lenient_failures = lenient;
        self
    }

    /// Build the [`RetrieverConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Config`] if `top_k == 0`.
    pub fn build(self) -> Result<RetrieverConfig> {
        if self.config.top_k == 0 {
            return Err(CorpusError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_requests_five_neighbors_leniently() {
        let config = RetrieverConfig::default();
        assert_eq!(config.top_k, 5);
        assert!(config.lenient_failures);
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let err = RetrieverConfig::builder().top_k(0).build().unwrap_err();
        assert!(matches!(err, CorpusError::Config(_)));
    }

    #[test]
    fn builder_sets_fields() {
        let config = RetrieverConfig::builder()
            .top_k(3)
            .lenient_failures(false)
            .build()
            .unwrap();
        assert_eq!(config, RetrieverConfig { top_k: 3, lenient_failures: false });
    }
}
