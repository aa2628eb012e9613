//! Configuration for the RAG system

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main RAG system configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Text chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Remote similarity-search service
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Gemini generation configuration
    #[serde(default)]
    pub generation: GenerationSettings,
    /// Processing configuration
    #[serde(default)]
    pub processing: ProcessingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum size of a single uploaded file in bytes (default: 10MB)
    pub max_upload_size: usize,
    /// Maximum number of files accepted per upload request
    pub max_files_per_upload: usize,
    /// Keep a copy of every accepted upload in this directory
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
            max_upload_size: 10 * 1024 * 1024, // 10MB
            max_files_per_upload: 10,
            upload_dir: None,
        }
    }
}

impl ServerConfig {
    /// Body limit for a whole multipart request
    pub fn request_body_limit(&self) -> usize {
        // Room for every file plus multipart framing
        self.max_upload_size
            .saturating_mul(self.max_files_per_upload.max(1))
            .saturating_add(64 * 1024)
    }
}

/// Word-window chunking configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Words per chunk
    pub chunk_size: usize,
    /// Words shared with the previous chunk
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

impl ChunkingConfig {
    /// Reject windows that would never advance
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::invalid_config("chunking.chunk_size must be > 0"));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::invalid_config(format!(
                "chunking.overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Remote similarity-search service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Base URL of the index service (exposes `/add` and `/search`)
    pub base_url: String,
    /// Chunks retrieved per query
    pub top_k: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            top_k: 5,
            timeout_secs: 30,
        }
    }
}

/// Sampling parameters passed verbatim to the model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct GenerationConfig {
    /// Sampling randomness
    pub temperature: f32,
    /// Top-k sampling breadth
    pub top_k: u32,
    /// Nucleus sampling breadth
    pub top_p: f32,
    /// Hard cap on answer length
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3, // Lower for more faithful answers
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        }
    }
}

/// Gemini client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Generative Language API base URL
    pub base_url: String,
    /// API key (usually supplied through `GEMINI_API_KEY`)
    #[serde(default)]
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling parameters
    #[serde(default)]
    pub params: GenerationConfig,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            timeout_secs: 120,
            params: GenerationConfig::default(),
        }
    }
}

/// Processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Documents of one upload processed concurrently (1 = strictly sequential)
    pub parallel_documents: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_documents: 1,
        }
    }
}

impl RagConfig {
    /// Load configuration from a TOML file. Missing sections fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Build configuration from the process environment.
    ///
    /// Starts from the file named by `RAG_CONFIG` (or defaults), then applies
    /// `GEMINI_API_KEY`, `GEMINI_MODEL`, `VECTOR_SERVICE_URL`, `HOST`, `PORT`
    /// and `UPLOAD_DIR`.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("RAG_CONFIG") {
            Ok(path) => Self::load(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.generation.api_key = key;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.generation.model = model;
        }
        if let Some(url) = lookup("VECTOR_SERVICE_URL") {
            self.retrieval.base_url = url;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("Invalid PORT '{}': {}", port, e)))?;
        }
        if let Some(dir) = lookup("UPLOAD_DIR") {
            self.server.upload_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    /// Check cross-field invariants
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;

        if self.retrieval.top_k == 0 {
            return Err(Error::invalid_config("retrieval.top_k must be >= 1"));
        }

        let temperature = self.generation.params.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(Error::invalid_config(format!(
                "generation.params.temperature must be in [0.0, 2.0], got {}",
                temperature
            )));
        }

        if self.server.max_files_per_upload == 0 {
            return Err(Error::invalid_config("server.max_files_per_upload must be >= 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = RagConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.overlap, 200);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.server.max_upload_size, 10 * 1024 * 1024);
        assert_eq!(config.generation.params.top_k, 40);
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk_size() {
        let mut config = RagConfig::default();
        config.chunking.overlap = 1000;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));

        config.chunking.overlap = 1500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = RagConfig::from_toml(
            r#"
            [chunking]
            chunk_size = 300
            overlap = 50

            [retrieval]
            base_url = "http://index:9000"
            top_k = 3
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.chunking.chunk_size, 300);
        assert_eq!(config.retrieval.base_url, "http://index:9000");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.generation.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_generation_params_use_camel_case() {
        let config = RagConfig::from_toml(
            r#"
            [generation]
            base_url = "http://localhost"
            model = "gemini-2.5-pro"
            timeout_secs = 10

            [generation.params]
            temperature = 0.1
            topK = 20
            topP = 0.8
            maxOutputTokens = 512
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.params.top_k, 20);
        assert_eq!(config.generation.params.max_output_tokens, 512);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GEMINI_API_KEY", "secret"),
            ("PORT", "8088"),
            ("VECTOR_SERVICE_URL", "http://faiss:8001"),
        ]
        .into_iter()
        .collect();

        let mut config = RagConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.generation.api_key, "secret");
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.retrieval.base_url, "http://faiss:8001");
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = RagConfig::default();
        let result = config.apply_overrides(|k| (k == "PORT").then(|| "not-a-port".to_string()));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
