use crate::CoreError;
use serde::Serialize;

/// Progress of one stage-then-configure run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigureState {
    NotStaged,
    Staged,
    Configured,
    Failed,
}

impl ConfigureState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ConfigureState::Configured | ConfigureState::Failed)
    }
}

impl std::fmt::Display for ConfigureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigureState::NotStaged => write!(f, "not-staged"),
            ConfigureState::Staged => write!(f, "staged"),
            ConfigureState::Configured => write!(f, "configured"),
            ConfigureState::Failed => write!(f, "failed"),
        }
    }
}

pub fn validate_transition(from: ConfigureState, to: ConfigureState) -> Result<(), CoreError> {
    let valid = matches!(
        (from, to),
        (ConfigureState::NotStaged, ConfigureState::Staged)
            | (ConfigureState::Staged, ConfigureState::Configured)
            | (
                ConfigureState::NotStaged | ConfigureState::Staged,
                ConfigureState::Failed
            )
    );

    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}
