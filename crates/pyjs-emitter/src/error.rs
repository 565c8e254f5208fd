use std::fmt;

/// Translation failure. The emitter stops at the first construct it cannot
/// rewrite; there is no partial-output recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    Unsupported { construct: String },
}

impl EmitError {
    pub fn unsupported(construct: impl Into<String>) -> EmitError {
        EmitError::Unsupported {
            construct: construct.into(),
        }
    }
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitError::Unsupported { construct } => write!(f, "Unsupported: {}", construct),
        }
    }
}

impl std::error::Error for EmitError {}
