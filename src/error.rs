use std::fmt;

#[derive(Debug)]
pub enum AuditError {
    /// Node.js browser server failed to spawn
    SubprocessSpawn { script: String, source: std::io::Error },

    /// I/O failure talking to the browser server over stdin/stdout
    SessionIo(String),

    /// Browser server answered a command with ok=false
    SessionProtocol { command: String, error: String },

    /// JSON parsing failed (browser server output or report data)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (command to browser server)
    JsonSerialize { context: String, source: serde_json::Error },

    /// Driver reported a failure executing a page operation
    Driver(String),

    /// No session in the pool could be initialized
    PoolExhausted(String),
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditError::SubprocessSpawn { script, source } => {
                write!(f, "Failed to spawn {} (is Node.js installed?): {}", script, source)
            }
            AuditError::SessionIo(msg) => {
                write!(f, "Session I/O error: {}", msg)
            }
            AuditError::SessionProtocol { command, error } => {
                write!(f, "Command '{}' failed: {}", command, error)
            }
            AuditError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            AuditError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            AuditError::Driver(msg) => {
                write!(f, "Driver error: {}", msg)
            }
            AuditError::PoolExhausted(msg) => {
                write!(f, "Session pool could not be initialized: {}", msg)
            }
        }
    }
}

impl std::error::Error for AuditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuditError::SubprocessSpawn { source, .. } => Some(source),
            AuditError::JsonParse { source, .. } => Some(source),
            AuditError::JsonSerialize { source, .. } => Some(source),
            _ => None,
        }
    }
}
