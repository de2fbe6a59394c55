use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::utils::text::is_same_name;

/// 未能确定字段取值时使用的占位值
pub const UNKNOWN: &str = "Unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// 候选工具/公司的结构化画像
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct CandidateProfile {
    /// Product or company name
    pub name: String,
    /// Brief description of the product, 2-3 sentences
    #[serde(default = "unknown")]
    pub description: String,
    /// Official website URL
    #[serde(default = "unknown")]
    pub website: String,
    /// Pricing model, one of Free, Freemium, Paid, Enterprise or Unknown
    #[serde(default = "unknown")]
    pub pricing_model: String,
    /// Key integration capabilities, or Unknown
    #[serde(default = "unknown")]
    pub integration_capabilities: String,
}

impl CandidateProfile {
    /// 调用模型失败时的确定性兜底画像
    pub fn fallback(candidate_name: &str, query: &str) -> Self {
        Self {
            name: candidate_name.to_string(),
            description: format!(
                "{} is a business software platform that serves as an alternative to {}.",
                candidate_name, query
            ),
            website: format!(
                "https://{}.com",
                candidate_name.to_lowercase().replace(' ', "")
            ),
            pricing_model: "Freemium".to_string(),
            integration_capabilities: "API integrations, third-party apps, webhooks".to_string(),
        }
    }

    /// 修正模型返回的画像：名称不能为空也不能是查询本身，其余空字段统一为Unknown
    pub fn normalized(mut self, candidate_name: &str, query: &str) -> Self {
        let name = self.name.trim();
        if name.is_empty() || is_same_name(name, query) {
            self.name = candidate_name.to_string();
        } else {
            self.name = name.to_string();
        }

        for field in [
            &mut self.description,
            &mut self.website,
            &mut self.pricing_model,
            &mut self.integration_capabilities,
        ] {
            let trimmed = field.trim();
            *field = if trimmed.is_empty() {
                unknown()
            } else {
                trimmed.to_string()
            };
        }
        self
    }

    /// 集成能力是否已确定
    pub fn has_known_integrations(&self) -> bool {
        !self.integration_capabilities.is_empty() && self.integration_capabilities != UNKNOWN
    }
}

/// 搜索服务返回的原始记录，仅作为证据保留
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct SearchRecord {
    pub title: String,
    pub content: String,
    pub url: String,
}

/// 页面抓取结果
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ScrapedPage {
    pub markdown: String,
}
