// B2B 替代品调研流水线
// A ExtractCandidates：搜索对比文章 + 抓取正文 → 模型提取候选名称（无证据时以查询本身兜底）
// B ResearchCandidates：候选为空时由模型直接生成替代品 → 每个候选一个结构化画像（失败时使用兜底画像）
// C AnalyzeCandidates：汇总画像 → 一次模型调用生成推荐（失败时返回固定文案）

pub mod context;
pub mod error;
pub mod step;
pub mod steps;
pub mod timing;
pub mod workflow;

pub use context::ResearchContext;
pub use error::PipelineError;
pub use step::PipelineStep;
pub use workflow::{ResearchWorkflow, launch};
