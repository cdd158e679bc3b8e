use hifitime::Epoch;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemError {
    #[error("Invalid TLE: {0}")]
    TleParse(String),

    #[error("SGP4 initialization failed: {0}")]
    PropagatorInit(String),

    #[error("Propagation failed at {epoch}: {reason}")]
    Propagation { epoch: Epoch, reason: String },

    #[error("Degenerate orbit at {epoch}: {reason}")]
    DegenerateOrbit { epoch: Epoch, reason: String },

    #[error("Invalid time window: {0}")]
    InvalidTimeWindow(String),

    #[error("Invalid tabulation parameter: {0}")]
    InvalidTabulationParameter(String),
}

impl EphemError {
    /// Epoch of the sample that triggered the error, for per-sample failures.
    pub fn epoch(&self) -> Option<Epoch> {
        match self {
            EphemError::Propagation { epoch, .. } | EphemError::DegenerateOrbit { epoch, .. } => {
                Some(*epoch)
            }
            _ => None,
        }
    }

    /// Short, stable name of the error kind (used in failure reports).
    pub fn kind(&self) -> &'static str {
        match self {
            EphemError::TleParse(_) => "ParseError",
            EphemError::PropagatorInit(_) => "PropagatorInitError",
            EphemError::Propagation { .. } => "PropagationError",
            EphemError::DegenerateOrbit { .. } => "DegenerateOrbitError",
            EphemError::InvalidTimeWindow(_) => "InvalidTimeWindow",
            EphemError::InvalidTabulationParameter(_) => "InvalidTabulationParameter",
        }
    }
}
