use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::MatchMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Ollama,
    OpenAI,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub assistant_name: String,
    pub window_title: String,
    pub window_width: f32,
    pub window_height: f32,
    pub images_dir: PathBuf,
    pub knowledge_path: Option<PathBuf>,
    pub backend: LlmBackend,
    pub ollama_base_url: Option<String>,
    pub ollama_model: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub openai_model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: u32,
    pub generation_timeout: Option<Duration>,
    pub match_mode: MatchMode,
    pub history_turns: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }
}

impl Config {
    /// Builds the configuration from a key lookup (the process environment in
    /// production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = var("OPENAI_API_KEY");
        let wants_openai = var("VERTEX_LLM_BACKEND")
            .map(|v| v.trim().eq_ignore_ascii_case("openai"))
            .unwrap_or(false);
        let backend = if wants_openai && openai_api_key.is_some() {
            LlmBackend::OpenAI
        } else {
            if wants_openai {
                log::warn!("⚠️ OpenAI backend requested without OPENAI_API_KEY, using Ollama");
            }
            LlmBackend::Ollama
        };

        let temperature = var("VERTEX_TEMPERATURE")
            .and_then(|v| v.parse::<f32>().ok())
            .map(|t| t.clamp(0.0, 2.0));

        let max_tokens = var("VERTEX_MAX_TOKENS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(500);

        let timeout_secs = var("VERTEX_GENERATION_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(120);
        let generation_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let match_mode = match var("VERTEX_MATCH_MODE") {
            Some(raw) => MatchMode::parse(&raw).unwrap_or_else(|| {
                log::warn!("⚠️ Unknown VERTEX_MATCH_MODE '{}', using substring", raw);
                MatchMode::Substring
            }),
            None => MatchMode::Substring,
        };

        let history_turns = var("VERTEX_HISTORY_TURNS").and_then(|v| v.parse::<usize>().ok());

        Self {
            assistant_name: "Vertex AI".to_string(),
            window_title: "Vertex AI".to_string(),
            window_width: 600.0,
            window_height: 900.0,
            images_dir: var("VERTEX_IMAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("images")),
            knowledge_path: var("VERTEX_KNOWLEDGE_PATH").map(PathBuf::from),
            backend,
            ollama_base_url: var("OLLAMA_BASE_URL"),
            ollama_model: var("OLLAMA_MODEL"),
            openai_api_key,
            openai_base_url: var("OPENAI_BASE_URL"),
            openai_model: var("OPENAI_MODEL"),
            temperature,
            max_tokens,
            generation_timeout,
            match_mode,
            history_turns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.backend, LlmBackend::Ollama);
        assert_eq!(cfg.match_mode, MatchMode::Substring);
        assert_eq!(cfg.generation_timeout, Some(Duration::from_secs(120)));
        assert_eq!(cfg.max_tokens, 500);
        assert_eq!(cfg.temperature, None);
        assert_eq!(cfg.history_turns, None);
        assert_eq!(cfg.knowledge_path, None);
        assert_eq!(cfg.images_dir, PathBuf::from("images"));
        assert_eq!(cfg.window_title, "Vertex AI");
    }

    #[test]
    fn test_openai_needs_a_key() {
        let cfg = config(&[("VERTEX_LLM_BACKEND", "openai")]);
        assert_eq!(cfg.backend, LlmBackend::Ollama);

        let cfg = config(&[("VERTEX_LLM_BACKEND", "OpenAI"), ("OPENAI_API_KEY", "sk-1")]);
        assert_eq!(cfg.backend, LlmBackend::OpenAI);
        assert_eq!(cfg.openai_api_key.as_deref(), Some("sk-1"));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let cfg = config(&[
            ("VERTEX_LLM_BACKEND", "openai"),
            ("OPENAI_API_KEY", "  "),
            ("OLLAMA_MODEL", ""),
        ]);
        assert_eq!(cfg.backend, LlmBackend::Ollama);
        assert_eq!(cfg.ollama_model, None);
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let cfg = config(&[("VERTEX_GENERATION_TIMEOUT_SECS", "0")]);
        assert_eq!(cfg.generation_timeout, None);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let cfg = config(&[
            ("VERTEX_GENERATION_TIMEOUT_SECS", "soon"),
            ("VERTEX_MAX_TOKENS", "-4"),
            ("VERTEX_HISTORY_TURNS", "many"),
        ]);
        assert_eq!(cfg.generation_timeout, Some(Duration::from_secs(120)));
        assert_eq!(cfg.max_tokens, 500);
        assert_eq!(cfg.history_turns, None);
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("VERTEX_MATCH_MODE", "word"),
            ("VERTEX_TEMPERATURE", "7.5"),
            ("VERTEX_HISTORY_TURNS", "6"),
            ("VERTEX_KNOWLEDGE_PATH", "/etc/vertex/kb.json"),
            ("OLLAMA_BASE_URL", "http://gpu-box:11434"),
        ]);
        assert_eq!(cfg.match_mode, MatchMode::Word);
        assert_eq!(cfg.temperature, Some(2.0));
        assert_eq!(cfg.history_turns, Some(6));
        assert_eq!(cfg.knowledge_path, Some(PathBuf::from("/etc/vertex/kb.json")));
        assert_eq!(cfg.ollama_base_url.as_deref(), Some("http://gpu-box:11434"));
    }

    #[test]
    fn test_unknown_match_mode_uses_substring() {
        let cfg = config(&[("VERTEX_MATCH_MODE", "fuzzy")]);
        assert_eq!(cfg.match_mode, MatchMode::Substring);
    }
}
