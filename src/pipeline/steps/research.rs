use anyhow::Result;
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;

use crate::config::{NAME_LIST_LIMIT, PROFILE_LIMIT};
use crate::llm::{ChatMessage, LanguageModel};
use crate::pipeline::context::ResearchContext;
use crate::pipeline::error::PipelineError;
use crate::pipeline::step::PipelineStep;
use crate::search::SearchProvider;
use crate::types::{CandidateProfile, PipelineState, StateUpdate};
use crate::utils::text::parse_name_lines;

/// 为每个候选生成结构化画像
#[derive(Default)]
pub struct ResearchCandidates;

impl ResearchCandidates {
    /// 没有候选时，仅凭模型知识生成替代品名单
    ///
    /// 这次调用本身失败时没有更下一级的兜底，错误会交给驱动器处理。
    pub async fn generate_alternatives<S, L>(
        &self,
        context: &ResearchContext<S, L>,
        query: &str,
    ) -> Result<Vec<String>, PipelineError>
    where
        S: SearchProvider,
        L: LanguageModel,
    {
        let pipeline = &context.config.pipeline;
        let max_alternatives = pipeline.max_alternatives.min(NAME_LIST_LIMIT);
        let messages = vec![
            ChatMessage::system(include_str!("../prompts/alternatives_system.tpl")),
            ChatMessage::user(format!(
                include_str!("../prompts/alternatives_user.tpl"),
                count = max_alternatives,
                query = query
            )),
        ];

        let response = context
            .llm
            .complete_text(&messages)
            .await
            .map_err(|e| PipelineError::AlternativeGeneration(format!("{:#}", e)))?;

        Ok(parse_name_lines(
            &response,
            query,
            pipeline.min_alternative_chars,
            max_alternatives,
        ))
    }

    /// 生成单个候选的画像，失败时返回确定性兜底画像
    pub async fn profile_candidate<S, L>(
        &self,
        context: &ResearchContext<S, L>,
        candidate_name: &str,
        query: &str,
    ) -> CandidateProfile
    where
        S: SearchProvider,
        L: LanguageModel,
    {
        println!("  📊 正在分析: {}", candidate_name);
        let messages = vec![
            ChatMessage::system(include_str!("../prompts/profile_system.tpl")),
            ChatMessage::user(format!(
                include_str!("../prompts/profile_user.tpl"),
                candidate = candidate_name,
                query = query
            )),
        ];

        match context
            .llm
            .complete_structured::<CandidateProfile>(&messages)
            .await
        {
            Ok(profile) => profile.normalized(candidate_name, query),
            Err(e) => {
                eprintln!("❌ 生成 {} 的画像出错，使用兜底信息: {}", candidate_name, e);
                CandidateProfile::fallback(candidate_name, query)
            }
        }
    }
}

#[async_trait]
impl<S, L> PipelineStep<S, L> for ResearchCandidates
where
    S: SearchProvider + 'static,
    L: LanguageModel + 'static,
{
    fn name(&self) -> &'static str {
        "research_candidates"
    }

    async fn execute(
        &self,
        context: &ResearchContext<S, L>,
        state: &PipelineState,
    ) -> Result<StateUpdate> {
        let query = state.query.as_str();
        let max_profiles = context.config.pipeline.max_profiles.min(PROFILE_LIMIT);

        let mut candidate_names = if state.candidate_names.is_empty() {
            println!("⚠️ 没有提取到候选，改用AI生成替代品");
            self.generate_alternatives(context, query).await?
        } else {
            state.candidate_names.clone()
        };
        candidate_names.truncate(max_profiles);

        if candidate_names.is_empty() {
            eprintln!("❌ 没有可调研的候选");
            return Ok(StateUpdate::profiles(Vec::new()));
        }

        println!("🔬 正在生成候选信息: {}", candidate_names.join(", "));

        // buffered 保证输出顺序与候选顺序一致
        let parallels = context.config.llm.max_parallels.max(1);
        let tasks: Vec<_> = candidate_names
            .iter()
            .map(|name| self.profile_candidate(context, name, query))
            .collect();
        let profiles: Vec<CandidateProfile> =
            stream::iter(tasks).buffered(parallels).collect().await;

        println!("✅ 成功调研 {} 个候选", profiles.len());
        Ok(StateUpdate::profiles(profiles))
    }
}
