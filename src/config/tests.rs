use crate::config::{
    Config, LLMConfig, LLMProvider, NAME_LIST_LIMIT, PROFILE_LIMIT, PipelineConfig, SearchConfig,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(config.output_dir.is_none());
    assert!(!config.verbose);
    assert_eq!(config.pipeline, PipelineConfig::default());
    assert!(config.validate().is_ok());
}

#[test]
fn test_llm_provider_default() {
    let provider = LLMProvider::default();
    assert_eq!(provider, LLMProvider::OpenAI);
}

#[test]
fn test_llm_provider_from_str() {
    assert_eq!(
        "openai".parse::<LLMProvider>().unwrap(),
        LLMProvider::OpenAI
    );
    assert_eq!(
        "OpenRouter".parse::<LLMProvider>().unwrap(),
        LLMProvider::OpenRouter
    );
    assert_eq!(
        "anthropic".parse::<LLMProvider>().unwrap(),
        LLMProvider::Anthropic
    );
    assert_eq!(
        "ollama".parse::<LLMProvider>().unwrap(),
        LLMProvider::Ollama
    );

    assert!("invalid".parse::<LLMProvider>().is_err());
}

#[test]
fn test_llm_provider_display_round_trips() {
    for provider in [
        LLMProvider::OpenAI,
        LLMProvider::Moonshot,
        LLMProvider::DeepSeek,
        LLMProvider::Mistral,
        LLMProvider::OpenRouter,
        LLMProvider::Anthropic,
        LLMProvider::Gemini,
        LLMProvider::Ollama,
    ] {
        assert_eq!(provider.to_string().parse::<LLMProvider>().unwrap(), provider);
    }
}

#[test]
fn test_llm_config_default() {
    let config = LLMConfig::default();

    assert_eq!(config.provider, LLMProvider::OpenAI);
    // api_key may be empty if env var is not set
    assert_eq!(config.api_base_url, "https://api.openai.com/v1");
    assert_eq!(config.model_efficient, "gpt-4o-mini");
    assert_eq!(config.temperature, 0.1);
    assert_eq!(config.retry_attempts, 3);
    assert_eq!(config.max_parallels, 1);
}

#[test]
fn test_search_config_default() {
    let config = SearchConfig::default();

    assert_eq!(config.api_base_url, "https://api.firecrawl.dev");
    assert_eq!(config.query_suffix, "company pricing");
    assert_eq!(config.timeout_seconds, 60);
}

#[test]
fn test_pipeline_config_default_bounds() {
    let config = PipelineConfig::default();

    assert_eq!(config.max_search_results, 3);
    assert_eq!(config.page_char_budget, 1500);
    assert_eq!(config.max_candidates, 5);
    assert_eq!(config.max_profiles, 4);
    assert_eq!(config.max_alternatives, 5);
    assert_eq!(config.min_alternative_chars, 3);
}

#[test]
fn test_from_file_accepts_partial_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("b2b-research.toml");
    fs::write(
        &path,
        r#"
verbose = true

[llm]
provider = "deepseek"
model_efficient = "deepseek-chat"

[pipeline]
max_profiles = 2
"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();

    assert!(config.verbose);
    assert_eq!(config.llm.provider, LLMProvider::DeepSeek);
    assert_eq!(config.llm.model_efficient, "deepseek-chat");
    assert_eq!(config.llm.retry_attempts, 3);
    assert_eq!(config.pipeline.max_profiles, 2);
    assert_eq!(config.pipeline.page_char_budget, 1500);
}

#[test]
fn test_from_file_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = Config::from_file(&temp_dir.path().join("missing.toml"));
    assert!(result.is_err());
}

#[test]
fn test_from_file_invalid_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "[llm\nprovider = ").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_load_with_explicit_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.toml");
    fs::write(&path, "[search]\nquery_suffix = \"pricing\"\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.search.query_suffix, "pricing");
}

#[test]
fn test_validate_rejects_zero_bounds() {
    let mut config = Config::default();
    config.pipeline.max_profiles = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.pipeline.page_char_budget = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.llm.max_parallels = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_caps_above_limits() {
    let mut config = Config::default();
    config.pipeline.max_profiles = PROFILE_LIMIT + 4;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.pipeline.max_candidates = NAME_LIST_LIMIT + 1;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.pipeline.max_alternatives = NAME_LIST_LIMIT + 1;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.pipeline.max_profiles = PROFILE_LIMIT;
    assert!(config.validate().is_ok());
}
