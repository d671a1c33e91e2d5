use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Embedding provider: "openai", "ollama" or "hash" (local, deterministic)
    pub provider: String,
    pub model: String,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub dimension: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub llm_endpoint: String,
    pub llm_key: String,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
}

fn default_llm_model() -> String {
    "gemma3:27b".to_string()
}

/// One retrieval strategy entry; the list order is the registration
/// order, which decides dedup priority in the ensemble merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Strategy kind: "baseline-vector", "keyword", "mix" or "smaller-chunks"
    pub kind: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_threshold: Option<f32>,
    /// Child-chunk splitter size, only read by "smaller-chunks"
    #[serde(default = "default_child_chunk_size")]
    pub child_chunk_size: usize,
    #[serde(default = "default_child_chunk_overlap")]
    pub child_chunk_overlap: usize,
}

fn default_top_k() -> usize {
    10
}

fn default_child_chunk_size() -> usize {
    128
}

fn default_child_chunk_overlap() -> usize {
    16
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Target collection identifier for both stores
    pub collection: String,
    pub strategies: Vec<StrategyConfig>,
    /// Parent-chunk splitter parameters used at ingestion time
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// Extract a per-document title with the LLM and attach it as metadata
    #[serde(default)]
    pub add_aux_info: bool,
    /// "tolerate-partial" (default) or "fail-fast"
    #[serde(default = "default_failure_policy")]
    pub failure_policy: String,
}

fn default_chunk_size() -> usize {
    512
}

fn default_chunk_overlap() -> usize {
    64
}

fn default_failure_policy() -> String {
    "tolerate-partial".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Hard ceiling on the total character length of selected context
    pub max_content: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> usize {
    2000
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRetrievalConfig {
    /// Re-sort the selected chunks by (source, chunk_index) after truncation
    #[serde(default)]
    pub sort_by_source_and_index: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    pub retriever: RetrieverConfig,
    pub generate: GenerateConfig,
    #[serde(default)]
    pub post_retrieval: PostRetrievalConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(crate::RagweaveError::Io)?;

        let config: AppConfig =
            toml::from_str(&content).map_err(crate::RagweaveError::TomlParsing)?;

        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            println!(
                "Warning: Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::RagweaveError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.llm_endpoint
    }

    /// Get LLM key
    pub fn llm_key(&self) -> &str {
        &self.llm.llm_key
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.llm_model
    }

    /// Get target collection identifier
    pub fn collection(&self) -> &str {
        &self.retriever.collection
    }

    /// Get maximum context character budget
    pub fn max_content(&self) -> usize {
        self.generate.max_content
    }

    /// Whether selected chunks are re-sorted by (source, chunk_index)
    pub fn sort_by_source_and_index(&self) -> bool {
        self.post_retrieval.sort_by_source_and_index
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
            embeddings: EmbeddingsConfig {
                provider: "hash".to_string(),
                model: "feature-hash-v1".to_string(),
                endpoint: "http://localhost:11434".to_string(),
                api_key: None,
                dimension: 256,
            },
            llm: LlmConfig {
                llm_endpoint: "http://localhost:11434".to_string(),
                llm_key: "ollama".to_string(),
                llm_model: "gemma3:27b".to_string(),
            },
            retriever: RetrieverConfig {
                collection: "default".to_string(),
                strategies: vec![
                    StrategyConfig {
                        kind: "baseline-vector".to_string(),
                        top_k: 10,
                        score_threshold: None,
                        child_chunk_size: default_child_chunk_size(),
                        child_chunk_overlap: default_child_chunk_overlap(),
                    },
                    StrategyConfig {
                        kind: "keyword".to_string(),
                        top_k: 10,
                        score_threshold: None,
                        child_chunk_size: default_child_chunk_size(),
                        child_chunk_overlap: default_child_chunk_overlap(),
                    },
                ],
                chunk_size: default_chunk_size(),
                chunk_overlap: default_chunk_overlap(),
                add_aux_info: false,
                failure_policy: default_failure_policy(),
            },
            generate: GenerateConfig {
                max_content: 4000,
                temperature: default_temperature(),
                max_tokens: default_max_tokens(),
            },
            post_retrieval: PostRetrievalConfig {
                sort_by_source_and_index: true,
            },
        }
    }
}
