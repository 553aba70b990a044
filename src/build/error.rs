/// Errors raised while turning script values into nodes
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// Value shape does not match the constructor's format
    Type { expected: String },
    /// A format string is malformed
    Format { format: String, reason: &'static str },
    /// Well-typed input rejected by the constructor
    Invalid(String),
    /// No constructor bound under this name
    Unbound(String),
    /// A resource (sample file) could not be opened
    Resource { path: String, reason: String },
    /// An engine slot was given the wrong node kind
    Binding { name: String },
}

impl BuildError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        BuildError::Invalid(msg.into())
    }
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Type { expected } => write!(f, "Type error. Expected '{}'.", expected),
            BuildError::Format { format, reason } => {
                write!(f, "Invalid format '{}': {}", format, reason)
            }
            BuildError::Invalid(msg) => f.write_str(msg),
            BuildError::Unbound(name) => write!(f, "Unknown constructor '{}'.", name),
            BuildError::Resource { path, reason } => {
                write!(f, "Cannot open '{}': {}", path, reason)
            }
            BuildError::Binding { name } => write!(f, "Type for '{}' is not valid.", name),
        }
    }
}

impl std::error::Error for BuildError {}
