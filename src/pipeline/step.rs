use anyhow::Result;
use async_trait::async_trait;

use crate::llm::LanguageModel;
use crate::pipeline::context::ResearchContext;
use crate::search::SearchProvider;
use crate::types::{PipelineState, StateUpdate};

/// 流水线中的一个步骤
///
/// 步骤只读取当前累积的状态，返回自己负责字段的局部更新。
/// 可恢复的失败必须在步骤内部吸收；返回 `Err` 会终止整次调研。
#[async_trait]
pub trait PipelineStep<S, L>: Send + Sync
where
    S: SearchProvider + 'static,
    L: LanguageModel + 'static,
{
    fn name(&self) -> &'static str;

    async fn execute(
        &self,
        context: &ResearchContext<S, L>,
        state: &PipelineState,
    ) -> Result<StateUpdate>;
}
