use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutomationError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("Environment misconfigured: {0}")]
    MissingEnvironment(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}
