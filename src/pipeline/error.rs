use thiserror::Error;

use crate::types::StateField;

/// 会越过步骤边界、由驱动器兜底的错误
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("state field `{0}` was already written by an earlier step")]
    FieldAlreadyWritten(StateField),

    #[error("alternative generation failed: {0}")]
    AlternativeGeneration(String),
}
