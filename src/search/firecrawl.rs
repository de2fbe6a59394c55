use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

use crate::config::SearchConfig;
use crate::search::SearchProvider;
use crate::types::{ScrapedPage, SearchRecord};

/// 依次尝试的正文字段
const CONTENT_KEYS: [&str; 4] = ["markdown", "content", "description", "snippet"];

/// Firecrawl HTTP 适配器
#[derive(Clone)]
pub struct FirecrawlClient {
    config: SearchConfig,
    http: reqwest::Client,
}

impl FirecrawlClient {
    pub fn new(config: SearchConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { config, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    fn decorate_query(&self, query: &str) -> String {
        let suffix = self.config.query_suffix.trim();
        if suffix.is_empty() {
            query.to_string()
        } else {
            format!("{} {}", query, suffix)
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value> {
        if self.config.api_key.trim().is_empty() {
            bail!("Missing Firecrawl API key");
        }

        let response = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .context(format!("Firecrawl request to {} failed", path))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("Firecrawl {} returned {}: {}", path, status, text);
        }

        response
            .json::<Value>()
            .await
            .context("Failed to decode Firecrawl response")
    }

    async fn try_search(&self, query: &str, max_results: usize) -> Result<Vec<SearchRecord>> {
        let payload = self
            .post(
                "v1/search",
                json!({
                    "query": self.decorate_query(query),
                    "limit": max_results,
                    "scrapeOptions": { "formats": ["markdown"] }
                }),
            )
            .await?;

        Ok(normalize_search_payload(&payload))
    }

    async fn try_scrape(&self, url: &str) -> Result<Option<ScrapedPage>> {
        let payload = self
            .post(
                "v1/scrape",
                json!({
                    "url": url,
                    "formats": ["markdown"]
                }),
            )
            .await?;

        let data = payload.get("data").unwrap_or(&payload);
        Ok(data
            .get("markdown")
            .and_then(Value::as_str)
            .map(|markdown| ScrapedPage {
                markdown: markdown.to_string(),
            }))
    }
}

#[async_trait]
impl SearchProvider for FirecrawlClient {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchRecord> {
        match self.try_search(query, max_results).await {
            Ok(records) => records,
            Err(e) => {
                eprintln!("❌ 搜索出错: {}", e);
                Vec::new()
            }
        }
    }

    async fn scrape(&self, url: &str) -> Option<ScrapedPage> {
        match self.try_scrape(url).await {
            Ok(page) => page,
            Err(e) => {
                eprintln!("⚠️ 页面抓取出错 {}: {}", url, e);
                None
            }
        }
    }
}

/// 将搜索接口的各种返回结构统一为记录列表
///
/// 优先级：`data` 字段 > 顶层数组 > `results` 字段 > `web` 字段 > 空。
/// `data` 本身为对象时，继续从其中的 `web`/`results` 取列表。
pub fn normalize_search_payload(payload: &Value) -> Vec<SearchRecord> {
    let items = if let Some(data) = payload.get("data") {
        match data {
            Value::Array(items) => Some(items),
            Value::Object(_) => ["web", "results"]
                .iter()
                .find_map(|key| data.get(key).and_then(Value::as_array)),
            _ => None,
        }
    } else if let Value::Array(items) = payload {
        Some(items)
    } else {
        ["results", "web"]
            .iter()
            .find_map(|key| payload.get(key).and_then(Value::as_array))
    };

    items
        .map(|items| items.iter().filter_map(record_from_item).collect())
        .unwrap_or_default()
}

fn record_from_item(item: &Value) -> Option<SearchRecord> {
    let object = item.as_object()?;
    let text = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let content = CONTENT_KEYS
        .iter()
        .map(|key| text(*key))
        .find(|value| !value.trim().is_empty())
        .unwrap_or_default();

    Some(SearchRecord {
        title: text("title"),
        content,
        url: text("url"),
    })
}
