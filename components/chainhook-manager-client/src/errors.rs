/// Failure taxonomy shared by the registry client and the contract
/// interface resolver. Nothing in this layer retries; every failure is
/// surfaced immediately to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainhookApiError {
    /// Missing or unusable startup configuration. Raised before any call is
    /// attempted.
    Configuration(String),
    /// The definition failed structural validation and was never sent.
    InvalidDefinition(Vec<String>),
    /// The registry rejected a well-formed definition. Status and message
    /// are carried verbatim for the caller to render.
    Registration { status: u16, message: String },
    /// The uuid or contract is unknown to the remote service.
    NotFound(String),
    /// Transport failure or an unexpected remote-side error.
    Fetch(String),
}

impl std::fmt::Display for ChainhookApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            ChainhookApiError::Configuration(e) => write!(f, "configuration error: {}", e),
            ChainhookApiError::InvalidDefinition(errors) => {
                write!(f, "invalid chainhook definition: {}", errors.join(", "))
            }
            ChainhookApiError::Registration { status, message } => {
                write!(f, "registration rejected (status {}): {}", status, message)
            }
            ChainhookApiError::NotFound(subject) => write!(f, "{} not found", subject),
            ChainhookApiError::Fetch(e) => write!(f, "{}", e),
        }
    }
}
