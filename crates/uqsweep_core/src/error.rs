use std::fmt;

/// Errors raised while constructing or combining probability densities
#[derive(Debug, Clone)]
pub enum PdfError {
    /// No data points were supplied
    EmptyInput,
    LengthMismatch {
        x: usize,
        y: usize,
    },
    InvalidParameters {
        family: &'static str,
        reason: String,
    },
    /// Density integrates to zero or a negative value
    NonPositiveMass,
    /// Scaling a density by exactly zero collapses it to a point
    MultiplyByZero,
    DivideByZero,
    /// Division is undefined when the divisor's support includes zero
    DivisorSpansZero,
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::EmptyInput => write!(f, "cannot build a PDF from zero data points"),
            PdfError::LengthMismatch { x, y } => {
                write!(f, "x and y lengths differ ({x} vs {y})")
            }
            PdfError::InvalidParameters { family, reason } => {
                write!(f, "invalid {family} parameters: {reason}")
            }
            PdfError::NonPositiveMass => write!(f, "density has no positive mass"),
            PdfError::MultiplyByZero => write!(f, "cannot multiply a PDF by zero"),
            PdfError::DivideByZero => write!(f, "cannot divide a PDF by zero"),
            PdfError::DivisorSpansZero => {
                write!(f, "cannot divide by a PDF whose range includes zero")
            }
        }
    }
}

impl std::error::Error for PdfError {}

/// Errors raised by sampling strategies
#[derive(Debug, Clone)]
pub enum StrategyError {
    Pdf(PdfError),
    /// The strategy cannot append further samples
    ExtendUnsupported {
        strategy: &'static str,
        reason: &'static str,
    },
    InvalidSampleCount(usize),
    /// Analysis was requested before any values were generated
    NoSamples,
    /// A caller-supplied value column does not match the others in length
    ValueLengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    /// Quadrature requires a result at every collocation point
    IncompleteResults {
        expected: usize,
        finished: usize,
    },
    /// The interpolation system could not be solved
    ResponseFit(&'static str),
}

impl fmt::Display for StrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyError::Pdf(e) => write!(f, "{e}"),
            StrategyError::ExtendUnsupported { strategy, reason } => {
                write!(f, "{strategy} cannot extend: {reason}")
            }
            StrategyError::InvalidSampleCount(n) => {
                write!(f, "sample count must be positive, got {n}")
            }
            StrategyError::NoSamples => write!(f, "no samples have been generated yet"),
            StrategyError::ValueLengthMismatch {
                name,
                expected,
                got,
            } => {
                write!(
                    f,
                    "value column for '{name}' has length {got}, expected {expected}"
                )
            }
            StrategyError::IncompleteResults { expected, finished } => {
                write!(
                    f,
                    "analysis needs all {expected} points but only {finished} finished"
                )
            }
            StrategyError::ResponseFit(reason) => {
                write!(f, "response surface fit failed: {reason}")
            }
        }
    }
}

impl std::error::Error for StrategyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StrategyError::Pdf(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PdfError> for StrategyError {
    fn from(e: PdfError) -> Self {
        StrategyError::Pdf(e)
    }
}

/// Errors raised by the sweep orchestrator
#[derive(Debug)]
pub enum SweepError {
    Pdf(PdfError),
    Strategy(StrategyError),
    /// Parameter names must be unique within a sweep
    DuplicateParameter(String),
    NoParameters,
    /// The job runner reported a dispatch failure
    Dispatch(String),
    /// No tagged output lines were recovered for any job
    NoOutputData,
    Serialization(serde_json::Error),
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepError::Pdf(e) => write!(f, "{e}"),
            SweepError::Strategy(e) => write!(f, "{e}"),
            SweepError::DuplicateParameter(name) => {
                write!(f, "duplicate parameter name '{name}'")
            }
            SweepError::NoParameters => write!(f, "a sweep needs at least one parameter"),
            SweepError::Dispatch(msg) => write!(f, "job dispatch failed: {msg}"),
            SweepError::NoOutputData => write!(f, "no tagged output recovered from any job"),
            SweepError::Serialization(e) => write!(f, "serialization error: {e}"),
        }
    }
}

impl std::error::Error for SweepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SweepError::Pdf(e) => Some(e),
            SweepError::Strategy(e) => Some(e),
            SweepError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PdfError> for SweepError {
    fn from(e: PdfError) -> Self {
        SweepError::Pdf(e)
    }
}

impl From<StrategyError> for SweepError {
    fn from(e: StrategyError) -> Self {
        SweepError::Strategy(e)
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(e: serde_json::Error) -> Self {
        SweepError::Serialization(e)
    }
}
