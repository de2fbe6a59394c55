use serde::{Deserialize, Serialize};

use crate::pipeline::error::PipelineError;
use crate::types::candidate::{CandidateProfile, SearchRecord};

/// 流水线状态中的字段，用于追踪每个字段是否已被写入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateField {
    CandidateNames,
    Profiles,
    SearchRecords,
    Analysis,
}

impl std::fmt::Display for StateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateField::CandidateNames => write!(f, "candidate_names"),
            StateField::Profiles => write!(f, "profiles"),
            StateField::SearchRecords => write!(f, "search_records"),
            StateField::Analysis => write!(f, "analysis"),
        }
    }
}

/// 一次调研贯穿所有步骤的状态
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineState {
    pub query: String,
    pub candidate_names: Vec<String>,
    pub profiles: Vec<CandidateProfile>,
    pub search_records: Vec<SearchRecord>,
    pub analysis: Option<String>,
    #[serde(skip)]
    written: Vec<StateField>,
}

/// 单个步骤产出的局部更新，只包含该步骤负责的字段
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub candidate_names: Option<Vec<String>>,
    pub profiles: Option<Vec<CandidateProfile>>,
    pub search_records: Option<Vec<SearchRecord>>,
    pub analysis: Option<String>,
}

impl StateUpdate {
    pub fn candidates(names: Vec<String>, records: Vec<SearchRecord>) -> Self {
        Self {
            candidate_names: Some(names),
            search_records: Some(records),
            ..Default::default()
        }
    }

    pub fn profiles(profiles: Vec<CandidateProfile>) -> Self {
        Self {
            profiles: Some(profiles),
            ..Default::default()
        }
    }

    pub fn analysis(analysis: impl Into<String>) -> Self {
        Self {
            analysis: Some(analysis.into()),
            ..Default::default()
        }
    }

    /// 本次更新涉及的字段
    pub fn fields(&self) -> Vec<StateField> {
        let mut fields = Vec::new();
        if self.candidate_names.is_some() {
            fields.push(StateField::CandidateNames);
        }
        if self.profiles.is_some() {
            fields.push(StateField::Profiles);
        }
        if self.search_records.is_some() {
            fields.push(StateField::SearchRecords);
        }
        if self.analysis.is_some() {
            fields.push(StateField::Analysis);
        }
        fields
    }
}

impl PipelineState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// 流水线失败时的终态：画像清空，analysis携带失败说明
    pub fn failed(query: impl Into<String>, error: &anyhow::Error) -> Self {
        Self {
            query: query.into(),
            analysis: Some(format!("Workflow failed: {:#}", error)),
            written: vec![StateField::Analysis],
            ..Default::default()
        }
    }

    pub fn is_written(&self, field: StateField) -> bool {
        self.written.contains(&field)
    }

    /// 合并步骤产出；每个字段只允许被写入一次
    pub fn apply(&mut self, update: StateUpdate) -> Result<(), PipelineError> {
        let fields = update.fields();
        if let Some(field) = fields.iter().find(|field| self.is_written(**field)) {
            return Err(PipelineError::FieldAlreadyWritten(*field));
        }

        if let Some(names) = update.candidate_names {
            self.candidate_names = names;
        }
        if let Some(profiles) = update.profiles {
            self.profiles = profiles;
        }
        if let Some(records) = update.search_records {
            self.search_records = records;
        }
        if let Some(analysis) = update.analysis {
            self.analysis = Some(analysis);
        }
        self.written.extend(fields);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_only_has_query() {
        let state = PipelineState::new("Slack");

        assert_eq!(state.query, "Slack");
        assert!(state.candidate_names.is_empty());
        assert!(state.profiles.is_empty());
        assert!(state.search_records.is_empty());
        assert!(state.analysis.is_none());
    }

    #[test]
    fn test_apply_sets_only_updated_fields() {
        let mut state = PipelineState::new("Slack");
        state
            .apply(StateUpdate::candidates(vec!["Discord".to_string()], vec![]))
            .unwrap();

        assert_eq!(state.candidate_names, vec!["Discord".to_string()]);
        assert!(state.is_written(StateField::CandidateNames));
        assert!(state.is_written(StateField::SearchRecords));
        assert!(!state.is_written(StateField::Profiles));
        assert!(state.analysis.is_none());
    }

    #[test]
    fn test_apply_rejects_second_write() {
        let mut state = PipelineState::new("Slack");
        state.apply(StateUpdate::analysis("first")).unwrap();

        let err = state.apply(StateUpdate::analysis("second")).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::FieldAlreadyWritten(StateField::Analysis)
        ));
        assert_eq!(state.analysis.as_deref(), Some("first"));
    }

    #[test]
    fn test_empty_write_still_counts() {
        let mut state = PipelineState::new("Slack");
        state.apply(StateUpdate::profiles(vec![])).unwrap();

        assert!(state.apply(StateUpdate::profiles(vec![])).is_err());
    }

    #[test]
    fn test_failed_state() {
        let state = PipelineState::failed("Slack", &anyhow::anyhow!("boom"));

        assert!(state.profiles.is_empty());
        assert_eq!(state.analysis.as_deref(), Some("Workflow failed: boom"));
    }
}
