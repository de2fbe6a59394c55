use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "b2b-research.toml";

/// 单次调研最多生成画像的候选数量
pub const PROFILE_LIMIT: usize = 4;

/// 提取候选与AI生成替代品的名单长度上限
pub const NAME_LIST_LIMIT: usize = 5;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Moonshot => write!(f, "moonshot"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Mistral => write!(f, "mistral"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "moonshot" => Ok(LLMProvider::Moonshot),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "mistral" => Ok(LLMProvider::Mistral),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// 搜索/抓取服务配置
    pub search: SearchConfig,

    /// 调研流水线参数
    pub pipeline: PipelineConfig,

    /// 调研报告输出目录，为空时不落盘
    pub output_dir: Option<PathBuf>,

    /// 跳过启动时的模型连接检查
    pub skip_connection_check: bool,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，用于常规推理任务
    pub model_efficient: String,

    /// 高质量模型，作为efficient失效情况下的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 单次调用超时时间（秒）
    pub timeout_seconds: u64,

    /// 候选画像生成的最大并发数，1表示严格串行
    pub max_parallels: usize,
}

/// 搜索/抓取服务配置（Firecrawl）
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Firecrawl API KEY
    pub api_key: String,

    /// Firecrawl API基地址
    pub api_base_url: String,

    /// 追加到每次搜索后的限定词
    pub query_suffix: String,

    /// 单次请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 调研流水线参数
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// 搜索对比文章时追加的限定词
    pub search_qualifier: String,

    /// 搜索结果数量上限
    pub max_search_results: usize,

    /// 每个页面参与提取的最大字符数
    pub page_char_budget: usize,

    /// 原始搜索记录保留的最大字符数
    pub record_content_chars: usize,

    /// 提取阶段保留的候选数量上限
    pub max_candidates: usize,

    /// 调研阶段最多生成画像的候选数量
    pub max_profiles: usize,

    /// AI兜底生成替代品时请求的数量
    pub max_alternatives: usize,

    /// AI兜底生成的名称最短长度
    pub min_alternative_chars: usize,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 按优先级加载配置：显式路径 > 当前目录下的默认配置文件 > 默认值
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let default_config_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE);

        if default_config_path.exists() {
            Self::from_file(&default_config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// 校验会导致流水线无法工作的参数
    pub fn validate(&self) -> Result<()> {
        if !(1..=PROFILE_LIMIT).contains(&self.pipeline.max_profiles) {
            bail!("pipeline.max_profiles must be between 1 and {}", PROFILE_LIMIT);
        }
        if self.pipeline.max_candidates > NAME_LIST_LIMIT {
            bail!("pipeline.max_candidates must not exceed {}", NAME_LIST_LIMIT);
        }
        if self.pipeline.max_alternatives > NAME_LIST_LIMIT {
            bail!("pipeline.max_alternatives must not exceed {}", NAME_LIST_LIMIT);
        }
        if self.pipeline.page_char_budget == 0 {
            bail!("pipeline.page_char_budget must be greater than 0");
        }
        if self.llm.max_parallels == 0 {
            bail!("llm.max_parallels must be greater than 0");
        }
        Ok(())
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.openai.com/v1"),
            model_efficient: String::from("gpt-4o-mini"),
            model_powerful: String::from("gpt-4o-mini"),
            max_tokens: 4096,
            temperature: 0.1,
            retry_attempts: 3,
            retry_delay_ms: 2000,
            timeout_seconds: 120,
            max_parallels: 1,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("FIRECRAWL_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.firecrawl.dev"),
            query_suffix: String::from("company pricing"),
            timeout_seconds: 60,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_qualifier: String::from("B2B top comparison best alternatives"),
            max_search_results: 3,
            page_char_budget: 1500,
            record_content_chars: 1000,
            max_candidates: 5,
            max_profiles: 4,
            max_alternatives: 5,
            min_alternative_chars: 3,
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
