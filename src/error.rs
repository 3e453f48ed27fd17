use std::fmt;

/// Error conditions surfaced by [`crate::calculate`] and the CLI binary.
#[derive(Debug)]
pub enum Error {
    /// `minSetback` exceeds `maxSetback`, or a constraint is negative.
    InvalidConstraints,
    /// Tent dimensions are non-positive, or too small to fit the minimum
    /// setback on both axes.
    InvalidTent,
    /// Total brace area is smaller than the smallest single brace, so no
    /// column can ever be built.
    InsufficientInventoryArea,
    /// No brace type fits the usable length in either orientation.
    NoFeasibleColumn,
    /// The DP and filtering pipeline produced no scenario for either
    /// orientation; carries a short diagnostic trail.
    NoFeasibleLayout(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConstraints => {
                write!(f, "constraints are invalid: minSetback must not exceed maxSetback, and none may be negative")
            }
            Error::InvalidTent => write!(
                f,
                "tent dimensions are non-positive, or too small for the minimum setback on one axis"
            ),
            Error::InsufficientInventoryArea => write!(
                f,
                "total brace area in inventory is smaller than the smallest single brace"
            ),
            Error::NoFeasibleColumn => write!(
                f,
                "no brace type fits the usable length in either orientation"
            ),
            Error::NoFeasibleLayout(detail) => write!(f, "no feasible layout found: {}", detail),
            Error::Io(err) => write!(f, "IO error occurs: {}.", err),
            Error::Json(err) => write!(f, "invalid request JSON: {}", err),
        }
    }
}

impl std::error::Error for Error {}
