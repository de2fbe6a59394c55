//! 搜索/抓取协作方

use async_trait::async_trait;

use crate::types::{ScrapedPage, SearchRecord};

pub mod firecrawl;

pub use firecrawl::{FirecrawlClient, normalize_search_payload};

/// 搜索与抓取服务接口
///
/// 实现方自行吸收网络与解码错误：搜索失败返回空列表，抓取失败返回 `None`，
/// 从不向调用方抛出错误。
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchRecord>;

    async fn scrape(&self, url: &str) -> Option<ScrapedPage>;
}
