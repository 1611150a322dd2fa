use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("x and y have different lengths ({x} and {y})")]
    LengthMismatch { x: usize, y: usize },

    #[error("At least 2 points are needed for a regression, got {0}")]
    TooFewPoints(usize),

    #[error("All x values are identical, the regression line is undefined")]
    ZeroVariance,
}
