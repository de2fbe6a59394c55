use anyhow::Result;
use async_trait::async_trait;

use crate::config::NAME_LIST_LIMIT;
use crate::llm::{ChatMessage, LanguageModel, prompt_chars};
use crate::pipeline::context::ResearchContext;
use crate::pipeline::step::PipelineStep;
use crate::search::SearchProvider;
use crate::types::{PipelineState, SearchRecord, StateUpdate};
use crate::utils::text::{parse_name_lines, truncate_chars};

/// 从对比文章中提取候选工具/公司名称
#[derive(Default)]
pub struct ExtractCandidates;

/// 提取阶段收集到的证据
pub struct Evidence {
    /// 送入模型的正文，保证非空
    pub content: String,
    pub records: Vec<SearchRecord>,
}

impl ExtractCandidates {
    /// 搜索并抓取对比文章，拼接为一段受长度约束的正文
    pub async fn gather_evidence<S, L>(
        &self,
        context: &ResearchContext<S, L>,
        query: &str,
    ) -> Evidence
    where
        S: SearchProvider,
        L: LanguageModel,
    {
        let pipeline = &context.config.pipeline;
        let search_phrase = format!("{} {}", query, pipeline.search_qualifier.trim());
        println!("🔍 正在搜索对比文章: {}", search_phrase.trim());

        let results = context
            .search
            .search(search_phrase.trim(), pipeline.max_search_results)
            .await;

        let mut content = String::new();
        for result in &results {
            let url = result.url.trim();
            if url.is_empty() {
                continue;
            }
            if let Some(page) = context.search.scrape(url).await {
                let excerpt = truncate_chars(&page.markdown, pipeline.page_char_budget);
                if excerpt.trim().is_empty() {
                    continue;
                }
                content.push_str(excerpt);
                content.push_str("\n\n");
            }
        }

        if content.trim().is_empty() {
            println!("⚠️ 未能从文章中获取内容，直接使用查询进行提取");
            content = format!("Looking for alternatives to {}", query);
        } else if context.config.verbose {
            println!(
                "   📄 已收集 {} 条搜索结果，正文 {} 字符",
                results.len(),
                content.chars().count()
            );
        }

        let records = results
            .into_iter()
            .map(|record| SearchRecord {
                content: truncate_chars(&record.content, pipeline.record_content_chars)
                    .to_string(),
                ..record
            })
            .collect();

        Evidence { content, records }
    }
}

/// 构建提取用的消息
pub fn extraction_messages(query: &str, content: &str, limit: usize) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(include_str!("../prompts/extract_system.tpl")),
        ChatMessage::user(format!(
            include_str!("../prompts/extract_user.tpl"),
            query = query,
            content = content,
            limit = limit
        )),
    ]
}

#[async_trait]
impl<S, L> PipelineStep<S, L> for ExtractCandidates
where
    S: SearchProvider + 'static,
    L: LanguageModel + 'static,
{
    fn name(&self) -> &'static str {
        "extract_candidates"
    }

    async fn execute(
        &self,
        context: &ResearchContext<S, L>,
        state: &PipelineState,
    ) -> Result<StateUpdate> {
        let query = state.query.as_str();
        let max_candidates = context.config.pipeline.max_candidates.min(NAME_LIST_LIMIT);
        let evidence = self.gather_evidence(context, query).await;

        let messages = extraction_messages(query, &evidence.content, max_candidates);
        if context.config.verbose {
            println!("   📏 候选提取prompt长度: {} 字符", prompt_chars(&messages));
        }
        let names = match context.llm.complete_text(&messages).await {
            Ok(response) => {
                let names = parse_name_lines(&response, query, 1, max_candidates);
                println!("🔍 提取到的候选: {}", names.join(", "));
                names
            }
            Err(e) => {
                eprintln!("❌ 候选提取出错: {}", e);
                Vec::new()
            }
        };

        Ok(StateUpdate::candidates(names, evidence.records))
    }
}
