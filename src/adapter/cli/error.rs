use std::process::ExitCode;

use crate::domain::error::DomainError;

/// Exit status for a failed command: 2 for login required, 3 for invalid
/// input, 1 otherwise.
pub fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<DomainError>() {
        Some(DomainError::AuthRequired) => ExitCode::from(2),
        Some(DomainError::Validation(_)) => ExitCode::from(3),
        _ => ExitCode::FAILURE,
    }
}

/// Whether the error was already shown to the user as a notice.
pub fn already_reported(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DomainError>(),
        Some(
            DomainError::AuthRequired
                | DomainError::Validation(_)
                | DomainError::Rejected(_)
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code(&anyhow::Error::new(DomainError::AuthRequired)),
            ExitCode::from(2)
        );
        assert_eq!(
            exit_code(&anyhow::Error::new(DomainError::Validation("x".into()))),
            ExitCode::from(3)
        );
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), ExitCode::FAILURE);
    }

    #[test]
    fn test_already_reported() {
        assert!(already_reported(&anyhow::Error::new(DomainError::Rejected(
            "Already joined this group".into()
        ))));
        assert!(!already_reported(&anyhow::Error::new(DomainError::Transport(
            "timeout".into()
        ))));
    }
}
