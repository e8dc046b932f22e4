use otsu_eval_core::ImageError;

/// Errors produced by the evaluation harness.
#[derive(thiserror::Error, Debug)]
pub enum EvalError {
    #[error("repeat count must be at least 1")]
    InvalidRepeats,

    #[error("no strategies to run")]
    NoStrategies,

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
