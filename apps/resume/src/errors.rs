use std::process::ExitCode;

use thiserror::Error;

use crate::document::LoadError;
use crate::render::RenderError;
use crate::validation::{PathError, ValidationError};

/// Application-level error type.
/// Commands return `Result<T, AppError>`; `main` turns it into a message and an exit code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Invalid built-in rule definition: {0}")]
    Rules(#[from] PathError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Validation(_) => 1,
            AppError::Load(_) => 2,
            AppError::Render(_) => 3,
            AppError::Rules(_) | AppError::Internal(_) => 4,
        }
    }
}

impl From<&AppError> for ExitCode {
    fn from(err: &AppError) -> Self {
        ExitCode::from(err.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::report::{FailureKind, RuleTarget};
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_exit_codes_per_concern() {
        let validation = AppError::from(ValidationError {
            path: "name".to_string(),
            description: "Full Name".to_string(),
            target: RuleTarget::Field,
            kind: FailureKind::EmptyValue,
        });
        assert_eq!(validation.exit_code(), 1);

        let load = AppError::from(LoadError::NotFound {
            path: PathBuf::from("nope.json"),
        });
        assert_eq!(load.exit_code(), 2);

        let render = AppError::from(RenderError::Timeout(Duration::from_secs(1)));
        assert_eq!(render.exit_code(), 3);

        let internal = AppError::from(anyhow::anyhow!("boom"));
        assert_eq!(internal.exit_code(), 4);
    }

    #[test]
    fn test_transparent_messages() {
        let err = AppError::from(LoadError::NotFound {
            path: PathBuf::from("data/resume.json"),
        });
        assert_eq!(err.to_string(), "Resume file not found at data/resume.json");
    }
}
