use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::types::{CandidateProfile, PipelineState};

#[allow(async_fn_in_trait)]
pub trait Outlet {
    async fn save(&self, state: &PipelineState) -> Result<()>;
}

/// 将调研结果渲染为终端文本
pub fn render_report(state: &PipelineState) -> String {
    let mut report = format!("\n📊 Research Results for: {}\n", state.query);
    report.push_str(&"=".repeat(60));
    report.push('\n');

    for (i, company) in state.profiles.iter().enumerate() {
        report.push_str(&format!("\n{}. 🏢 Company: {}\n", i + 1, company.name));
        report.push_str(&format!("   📝 Description: {}\n", company.description));
        report.push_str(&format!("   🌐 Website: {}\n", company.website));
        report.push_str(&format!("   💰 Pricing Model: {}\n", company.pricing_model));
        if company.has_known_integrations() {
            report.push_str(&format!(
                "   🔗 Integrations: {}\n",
                company.integration_capabilities
            ));
        }
    }

    if let Some(analysis) = &state.analysis {
        report.push_str("\n🧠 B2B Tool Recommendations:\n");
        report.push_str(&"-".repeat(40));
        report.push('\n');
        report.push_str(analysis);
        report.push('\n');
    }

    report
}

/// 终端输出
pub struct ConsoleOutlet;

impl Outlet for ConsoleOutlet {
    async fn save(&self, state: &PipelineState) -> Result<()> {
        println!("{}", render_report(state));
        Ok(())
    }
}

/// 落盘的调研报告
#[derive(Debug, Serialize)]
pub struct ResearchReport<'a> {
    pub query: &'a str,
    pub generated_at: DateTime<Local>,
    pub companies: &'a [CandidateProfile],
    pub analysis: Option<&'a str>,
}

impl<'a> ResearchReport<'a> {
    pub fn new(state: &'a PipelineState, generated_at: DateTime<Local>) -> Self {
        Self {
            query: &state.query,
            generated_at,
            companies: &state.profiles,
            analysis: state.analysis.as_deref(),
        }
    }
}

/// 报告文件名：查询中的非字母数字字符替换为下划线
pub fn report_filename(query: &str, generated_at: &DateTime<Local>) -> String {
    let slug: String = query
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!(
        "b2b_research_{}_{}.json",
        slug,
        generated_at.format("%Y%m%d_%H%M%S_%3f")
    )
}

/// 将调研报告以JSON写入输出目录
pub struct DiskOutlet {
    output_dir: PathBuf,
}

impl DiskOutlet {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 写入报告；同名文件已存在时报错，不覆盖已有报告
    pub async fn write_report(
        &self,
        state: &PipelineState,
        generated_at: DateTime<Local>,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .await
            .context(format!("Failed to create {:?}", self.output_dir))?;

        let report = ResearchReport::new(state, generated_at);
        let path = self
            .output_dir
            .join(report_filename(&state.query, &generated_at));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .context(format!("Failed to create {:?}", path))?;
        file.write_all(serde_json::to_string_pretty(&report)?.as_bytes())
            .await
            .context(format!("Failed to write {:?}", path))?;
        file.flush().await?;

        Ok(path)
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, state: &PipelineState) -> Result<()> {
        let path = self.write_report(state, Local::now()).await?;
        println!(
            "💾 已保存调研报告: {}（{} 个候选）",
            path.display(),
            state.profiles.len()
        );
        Ok(())
    }
}
