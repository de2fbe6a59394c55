use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// 带角色标记的对话消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// 将消息列表拆分为 (preamble, prompt)：system消息合并为preamble，其余合并为prompt
pub fn split_messages(messages: &[ChatMessage]) -> (String, String) {
    let join = |wanted: fn(Role) -> bool| {
        messages
            .iter()
            .filter(|m| wanted(m.role))
            .map(|m| m.content.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    };
    (
        join(|role| role == Role::System),
        join(|role| role != Role::System),
    )
}

/// 消息总字符数，用于详细日志
pub fn prompt_chars(messages: &[ChatMessage]) -> usize {
    messages.iter().map(|m| m.content.chars().count()).sum()
}

/// 大模型协作方接口
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// 自由文本补全
    async fn complete_text(&self, messages: &[ChatMessage]) -> Result<String>;

    /// 按 `T` 的JSON Schema约束输出并解码；无法解码时返回错误
    async fn complete_structured<T>(&self, messages: &[ChatMessage]) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_messages() {
        let messages = vec![
            ChatMessage::system("You are an analyst."),
            ChatMessage::user("List tools."),
            ChatMessage::system("Be concise."),
            ChatMessage::user("  "),
        ];

        let (preamble, prompt) = split_messages(&messages);
        assert_eq!(preamble, "You are an analyst.\n\nBe concise.");
        assert_eq!(prompt, "List tools.");
    }

    #[test]
    fn test_prompt_chars_counts_every_message() {
        let messages = vec![ChatMessage::system("abc"), ChatMessage::user("héllo")];
        assert_eq!(prompt_chars(&messages), 8);
    }

    #[test]
    fn test_split_messages_without_system() {
        let (preamble, prompt) = split_messages(&[ChatMessage::user("hi")]);
        assert!(preamble.is_empty());
        assert_eq!(prompt, "hi");
    }
}
