use anyhow::Result;

use crate::config::Config;
use crate::llm::{LLMClient, LanguageModel};
use crate::search::{FirecrawlClient, SearchProvider};

/// 一次调研所需的全部协作方，由调用方构造后注入
pub struct ResearchContext<S, L> {
    /// 配置
    pub config: Config,
    /// 搜索/抓取服务
    pub search: S,
    /// LLM调用器
    pub llm: L,
}

impl<S, L> ResearchContext<S, L>
where
    S: SearchProvider,
    L: LanguageModel,
{
    pub fn new(config: Config, search: S, llm: L) -> Self {
        Self {
            config,
            search,
            llm,
        }
    }
}

impl ResearchContext<FirecrawlClient, LLMClient> {
    /// 按配置创建 Firecrawl + rig 的默认组合
    pub fn from_config(config: Config) -> Result<Self> {
        let search = FirecrawlClient::new(config.search.clone())?;
        let llm = LLMClient::new(config.llm.clone())?;
        Ok(Self::new(config, search, llm))
    }
}
