#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use b2b_research::config::Config;
use b2b_research::llm::{ChatMessage, LanguageModel, Role};
use b2b_research::pipeline::ResearchContext;
use b2b_research::search::SearchProvider;
use b2b_research::types::{ScrapedPage, SearchRecord};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 返回预置结果的搜索服务
#[derive(Default)]
pub struct StubSearch {
    pub results: Vec<SearchRecord>,
    pub pages: HashMap<String, String>,
    pub queries: Mutex<Vec<String>>,
    pub scraped: Mutex<Vec<String>>,
}

impl StubSearch {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_results(results: Vec<SearchRecord>) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }

    pub fn page(mut self, url: &str, markdown: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), markdown.into());
        self
    }

    pub fn scrape_count(&self) -> usize {
        self.scraped.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchRecord> {
        self.queries.lock().unwrap().push(query.to_string());
        self.results.iter().take(max_results).cloned().collect()
    }

    async fn scrape(&self, url: &str) -> Option<ScrapedPage> {
        self.scraped.lock().unwrap().push(url.to_string());
        self.pages.get(url).map(|markdown| ScrapedPage {
            markdown: markdown.clone(),
        })
    }
}

/// 按队列顺序回放预置响应的模型；队列耗尽后返回错误
#[derive(Default)]
pub struct StubModel {
    pub text_responses: Mutex<VecDeque<Result<String, String>>>,
    pub structured_responses: Mutex<VecDeque<Result<Value, String>>>,
    pub text_calls: Mutex<Vec<Vec<ChatMessage>>>,
    pub structured_calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl StubModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, response: Result<&str, &str>) -> Self {
        self.text_responses.lock().unwrap().push_back(
            response
                .map(str::to_string)
                .map_err(str::to_string),
        );
        self
    }

    pub fn structured(self, response: Result<Value, &str>) -> Self {
        self.structured_responses
            .lock()
            .unwrap()
            .push_back(response.map_err(str::to_string));
        self
    }

    pub fn text_call_count(&self) -> usize {
        self.text_calls.lock().unwrap().len()
    }

    pub fn structured_call_count(&self) -> usize {
        self.structured_calls.lock().unwrap().len()
    }

    /// 第 `index` 次文本调用中user消息的内容
    pub fn text_user_prompt(&self, index: usize) -> String {
        self.text_calls.lock().unwrap()[index]
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn complete_text(&self, messages: &[ChatMessage]) -> Result<String> {
        self.text_calls.lock().unwrap().push(messages.to_vec());
        match self.text_responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(e)) => Err(anyhow!(e)),
            None => Err(anyhow!("no scripted text response")),
        }
    }

    async fn complete_structured<T>(&self, messages: &[ChatMessage]) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        self.structured_calls.lock().unwrap().push(messages.to_vec());
        let next = self.structured_responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(value)) => Ok(serde_json::from_value(value)?),
            Some(Err(e)) => Err(anyhow!(e)),
            None => Err(anyhow!("no scripted structured response")),
        }
    }
}

pub fn record(title: &str, url: &str) -> SearchRecord {
    SearchRecord {
        title: title.to_string(),
        content: format!("{} summary", title),
        url: url.to_string(),
    }
}

pub fn context(search: StubSearch, llm: StubModel) -> ResearchContext<StubSearch, StubModel> {
    ResearchContext::new(Config::default(), search, llm)
}
