use crate::config::{Config, LLMProvider};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// b2b-research - 由Rust与AI驱动的B2B替代品/潜在客户调研助手
#[derive(Parser, Debug)]
#[command(name = "b2b-research")]
#[command(
    about = "AI-based B2B research assistant. It searches comparison articles, extracts alternative tools or prospective customers, profiles each candidate and writes a strategic recommendation."
)]
#[command(version)]
pub struct Args {
    /// 要调研的工具/服务名称，留空则进入交互模式
    #[arg(short, long)]
    pub query: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 调研报告输出目录
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 高能效模型，用于常规推理任务
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，作为efficient失效情况下的兜底
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 画像生成的最大并发数
    #[arg(long)]
    pub max_parallels: Option<usize>,

    /// LLM Provider (openai, moonshot, deepseek, mistral, openrouter, anthropic, gemini, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// Firecrawl API KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 跳过启动时的模型连接检查
    #[arg(long)]
    pub skip_connection_check: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                );
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        match (self.model_efficient, self.model_powerful) {
            (Some(efficient), Some(powerful)) => {
                config.llm.model_efficient = efficient;
                config.llm.model_powerful = powerful;
            }
            (Some(efficient), None) => {
                config.llm.model_powerful = efficient.clone();
                config.llm.model_efficient = efficient;
            }
            (None, Some(powerful)) => config.llm.model_powerful = powerful,
            (None, None) => {}
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(max_parallels) = self.max_parallels {
            config.llm.max_parallels = max_parallels;
        }

        if let Some(search_api_key) = self.search_api_key {
            config.search.api_key = search_api_key;
        }

        // 其他配置
        if self.output_dir.is_some() {
            config.output_dir = self.output_dir;
        }
        config.skip_connection_check |= self.skip_connection_check;
        config.verbose |= self.verbose;

        Ok(config)
    }
}
