use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::llm::LanguageModel;
use crate::outlet::{ConsoleOutlet, DiskOutlet, Outlet};
use crate::pipeline::context::ResearchContext;
use crate::pipeline::step::PipelineStep;
use crate::pipeline::steps::{AnalyzeCandidates, ExtractCandidates, ResearchCandidates};
use crate::pipeline::timing::TimingScope;
use crate::search::SearchProvider;
use crate::types::PipelineState;

/// 候选提取 → 候选调研 → 推荐分析 的线性流水线
pub struct ResearchWorkflow<S, L> {
    context: ResearchContext<S, L>,
}

impl<S, L> ResearchWorkflow<S, L>
where
    S: SearchProvider + 'static,
    L: LanguageModel + 'static,
{
    pub fn new(context: ResearchContext<S, L>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ResearchContext<S, L> {
        &self.context
    }

    /// 执行一次调研；任何越过步骤边界的错误都会被转换为失败终态，不会向外抛出
    pub async fn run(&self, query: &str) -> PipelineState {
        let query = query.trim();
        match self.execute(query).await {
            Ok(state) => state,
            Err(e) => {
                eprintln!("❌ 调研流程出错: {:#}", e);
                PipelineState::failed(query, &e)
            }
        }
    }

    async fn execute(&self, query: &str) -> Result<PipelineState> {
        let steps: [&dyn PipelineStep<S, L>; 3] =
            [&ExtractCandidates, &ResearchCandidates, &AnalyzeCandidates];

        let mut state = PipelineState::new(query);
        let mut timing = TimingScope::new();

        for step in steps {
            timing.start_phase(step.name());
            let update = step
                .execute(&self.context, &state)
                .await
                .with_context(|| format!("step `{}` failed", step.name()))?;
            state.apply(update)?;
            timing.end_phase(step.name());
        }

        if self.context.config.verbose {
            println!("⏱️ {}", timing.generate_timing_report());
        }

        Ok(state)
    }
}

/// 输入是否为退出指令
pub fn is_exit_command(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "exit" | "quit")
}

/// 启动调研：给定查询时只执行一次，否则进入交互模式
pub async fn launch(config: &Config, query: Option<&str>) -> Result<()> {
    config.validate()?;
    let context = ResearchContext::from_config(config.clone())?;

    // 启动时检查模型连接
    if !config.skip_connection_check {
        context.llm.check_connection().await?;
    }

    let workflow = ResearchWorkflow::new(context);

    if let Some(query) = query {
        return research_and_report(&workflow, query).await;
    }

    println!("B2B Research Agent\n");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n🔍 Enter B2B Tools/Services you want alternatives of: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if is_exit_command(&line) {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        research_and_report(&workflow, &line).await?;
    }

    Ok(())
}

async fn research_and_report<S, L>(workflow: &ResearchWorkflow<S, L>, query: &str) -> Result<()>
where
    S: SearchProvider + 'static,
    L: LanguageModel + 'static,
{
    let state = workflow.run(query).await;
    ConsoleOutlet.save(&state).await?;

    if let Some(output_dir) = &workflow.context().config.output_dir {
        let outlet = DiskOutlet::new(output_dir.clone());
        if let Err(e) = outlet.save(&state).await {
            eprintln!("❌ 保存调研报告失败: {:#}", e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_exit_command() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("  QUIT \n"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command("Slack"));
        assert!(!is_exit_command(""));
    }
}
