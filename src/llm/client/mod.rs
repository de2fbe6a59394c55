//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::config::LLMConfig;

mod providers;
pub mod types;
pub mod utils;

pub use types::{ChatMessage, LanguageModel, Role};

use providers::ProviderClient;
use utils::evaluate_befitting_model;

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// 检查模型连接和功能是否正常
    pub async fn check_connection(&self) -> Result<()> {
        println!("🔄 正在检查模型连接...");
        match self
            .prompt("You are a helpful assistant.", "Hello")
            .await
        {
            Ok(_) => {
                println!("✅ 模型连接正常");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ 模型连接失败: {}", e);
                Err(e)
            }
        }
    }

    /// 通用重试逻辑，每次尝试都受超时约束
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let max_retries = self.config.retry_attempts.max(1);
        let retry_delay = Duration::from_millis(self.config.retry_delay_ms);
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let mut retries = 0;

        loop {
            let outcome = match tokio::time::timeout(timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(anyhow!(
                    "model call timed out after {}s",
                    self.config.timeout_seconds
                )),
            };

            match outcome {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    eprintln!(
                        "❌ 调用模型服务出错，重试中 (第 {} / {}次尝试): {}",
                        retries, max_retries, err
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(retry_delay).await;
                }
            }
        }
    }

    /// 数据提取方法：先使用高能效模型，全部失败后切换到备选模型
    pub async fn extract<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let (befitting_model, fallover_model) =
            evaluate_befitting_model(&self.config, system_prompt, user_prompt);

        let first_error = match self
            .extract_with_model::<T>(&befitting_model, system_prompt, user_prompt)
            .await
        {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        match fallover_model {
            Some(model) => {
                eprintln!(
                    "❌ 调用模型服务出错，尝试 {} 次均失败，尝试使用备选模型{}...{}",
                    self.config.retry_attempts, model, first_error
                );
                let user_prompt_with_fixer = format!(
                    "{}\n\n**Note** A previous attempt failed with the error \"{}\". Make sure to avoid it this time.",
                    user_prompt, first_error
                );
                self.extract_with_model::<T>(&model, system_prompt, &user_prompt_with_fixer)
                    .await
            }
            None => {
                eprintln!(
                    "❌ 调用模型服务出错，尝试 {} 次均失败...{}",
                    self.config.retry_attempts, first_error
                );
                Err(first_error)
            }
        }
    }

    async fn extract_with_model<T>(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let extractor = self
            .client
            .create_extractor::<T>(model, system_prompt, &self.config)?;

        self.retry_with_backoff(|| extractor.extract(user_prompt))
            .await
    }

    /// 单轮对话方法（不使用工具）
    pub async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let agent = self.client.create_agent(
            &self.config.model_efficient,
            system_prompt,
            &self.config,
        )?;

        self.retry_with_backoff(|| agent.prompt(user_prompt))
            .await
    }
}

#[async_trait]
impl LanguageModel for LLMClient {
    async fn complete_text(&self, messages: &[ChatMessage]) -> Result<String> {
        let (preamble, prompt) = types::split_messages(messages);
        self.prompt(&preamble, &prompt).await
    }

    async fn complete_structured<T>(&self, messages: &[ChatMessage]) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let (preamble, prompt) = types::split_messages(messages);
        self.extract::<T>(&preamble, &prompt).await
    }
}
