use anyhow::Result;
use async_trait::async_trait;

use crate::llm::{ChatMessage, LanguageModel, prompt_chars};
use crate::pipeline::context::ResearchContext;
use crate::pipeline::step::PipelineStep;
use crate::search::SearchProvider;
use crate::types::{CandidateProfile, PipelineState, StateUpdate};

/// 汇总全部画像，生成最终推荐
#[derive(Default)]
pub struct AnalyzeCandidates;

pub fn no_candidates_message(query: &str) -> String {
    format!(
        "No alternative tools found for {}. Please try a different search term.",
        query
    )
}

pub fn analysis_failed_message(query: &str) -> String {
    format!("Unable to generate analysis for {} alternatives.", query)
}

/// 每个画像一段，以 `---` 分隔
pub fn format_profiles(profiles: &[CandidateProfile]) -> String {
    profiles
        .iter()
        .map(|profile| {
            format!(
                "Company: {}\nWebsite: {}\nDescription: {}\nPricing: {}\nIntegrations: {}\n---",
                profile.name,
                profile.website,
                profile.description,
                profile.pricing_model,
                profile.integration_capabilities
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl<S, L> PipelineStep<S, L> for AnalyzeCandidates
where
    S: SearchProvider + 'static,
    L: LanguageModel + 'static,
{
    fn name(&self) -> &'static str {
        "analyze"
    }

    async fn execute(
        &self,
        context: &ResearchContext<S, L>,
        state: &PipelineState,
    ) -> Result<StateUpdate> {
        let query = state.query.as_str();
        println!("🧠 正在生成推荐...");

        if state.profiles.is_empty() {
            return Ok(StateUpdate::analysis(no_candidates_message(query)));
        }

        let messages = vec![
            ChatMessage::system(include_str!("../prompts/recommendations_system.tpl")),
            ChatMessage::user(format!(
                include_str!("../prompts/recommendations_user.tpl"),
                query = query,
                profiles = format_profiles(&state.profiles)
            )),
        ];
        if context.config.verbose {
            println!("   📏 推荐生成prompt长度: {} 字符", prompt_chars(&messages));
        }

        let analysis = match context.llm.complete_text(&messages).await {
            Ok(response) if !response.trim().is_empty() => response.trim().to_string(),
            Ok(_) => {
                eprintln!("❌ 推荐生成结果为空");
                analysis_failed_message(query)
            }
            Err(e) => {
                eprintln!("❌ 推荐生成出错: {}", e);
                analysis_failed_message(query)
            }
        };

        Ok(StateUpdate::analysis(analysis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_profiles_one_block_per_profile() {
        let profiles = vec![
            CandidateProfile::fallback("Discord", "Slack"),
            CandidateProfile::fallback("Zoom", "Slack"),
        ];

        let text = format_profiles(&profiles);
        assert_eq!(text.matches("---").count(), 2);
        assert!(text.starts_with("Company: Discord\nWebsite: https://discord.com\n"));
        assert!(text.contains("Company: Zoom"));
        assert!(text.contains("Pricing: Freemium"));
    }

    #[test]
    fn test_fixed_messages_reference_query() {
        assert_eq!(
            no_candidates_message("Slack"),
            "No alternative tools found for Slack. Please try a different search term."
        );
        assert!(analysis_failed_message("Slack").contains("Slack"));
    }
}
