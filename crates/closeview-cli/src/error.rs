use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] closeview_core::ValidationError),

    #[error(transparent)]
    Dataset(#[from] closeview_core::DatasetError),

    #[error("command error: {0}")]
    Command(String),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Command(_) => 2,
            Self::Dataset(_) => 6,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_failures_have_their_own_exit_code() {
        let error = CliError::from(closeview_core::DatasetError::MissingColumn { column: "Close" });
        assert_eq!(error.exit_code(), 6);
        assert_eq!(
            error.to_string(),
            "dataset is missing required column 'Close'"
        );
    }

    #[test]
    fn strict_mode_exit_code() {
        let error = CliError::StrictModeViolation {
            warning_count: 1,
            error_count: 0,
        };
        assert_eq!(error.exit_code(), 5);
    }
}
