use crate::capability::CapabilityId;
use crate::scope::ResourceId;

/// Error type returned by provider factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures of a discovery scope to enumerate configuration resources.
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    #[error("invalid capability identifier: {0:?}")]
    InvalidIdentifier(String),
    #[error("unsupported discovery scope: {0}")]
    Unsupported(String),
    #[error("I/O error at {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unreadable archive {location}: {message}")]
    Archive { location: String, message: String },
}

/// What was wrong with a configuration line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxErrorKind {
    #[error("Illegal configuration-file syntax")]
    IllegalSyntax,
    #[error("Illegal provider-class name: {0}")]
    IllegalName(String),
}

/// Errors surfaced while iterating the providers of a capability.
///
/// Every variant aborts the pass that produced it. Providers cached before
/// the failure stay valid.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("{capability}: Error locating configuration files: {source}")]
    Scope {
        capability: CapabilityId,
        #[source]
        source: ScopeError,
    },
    #[error("{capability}: {resource}:{line}: {kind}")]
    ConfigSyntax {
        capability: CapabilityId,
        resource: ResourceId,
        line: usize,
        kind: SyntaxErrorKind,
    },
    #[error("{capability}: Error reading configuration file {resource}: {source}")]
    ConfigRead {
        capability: CapabilityId,
        resource: ResourceId,
        #[source]
        source: std::io::Error,
    },
    #[error("{capability}: Provider {name} not found")]
    ProviderNotFound {
        capability: CapabilityId,
        name: String,
    },
    #[error("{capability}: Provider {name} not a subtype")]
    ProviderNotAssignable {
        capability: CapabilityId,
        name: String,
    },
    #[error("{capability}: Provider {name} could not be instantiated")]
    ProviderInstantiationFailed {
        capability: CapabilityId,
        name: String,
        #[source]
        source: BoxError,
    },
    #[error("{capability}: {operation} is not supported")]
    NotSupported {
        capability: CapabilityId,
        operation: &'static str,
    },
    #[error("{capability}: privileged action refused: {reason}")]
    PrivilegeDenied {
        capability: CapabilityId,
        reason: String,
    },
}

impl DiscoveryError {
    pub fn capability(&self) -> &CapabilityId {
        match self {
            DiscoveryError::Scope { capability, .. }
            | DiscoveryError::ConfigSyntax { capability, .. }
            | DiscoveryError::ConfigRead { capability, .. }
            | DiscoveryError::ProviderNotFound { capability, .. }
            | DiscoveryError::ProviderNotAssignable { capability, .. }
            | DiscoveryError::ProviderInstantiationFailed { capability, .. }
            | DiscoveryError::NotSupported { capability, .. }
            | DiscoveryError::PrivilegeDenied { capability, .. } => capability,
        }
    }
}

pub type DiscoveryResult<T> = std::result::Result<T, DiscoveryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_message_carries_location() {
        let err = DiscoveryError::ConfigSyntax {
            capability: CapabilityId::new("com.acme.Codec"),
            resource: ResourceId::new("file:/cp/META-INF/services/com.acme.Codec"),
            line: 3,
            kind: SyntaxErrorKind::IllegalSyntax,
        };
        assert_eq!(
            err.to_string(),
            "com.acme.Codec: file:/cp/META-INF/services/com.acme.Codec:3: Illegal configuration-file syntax"
        );
    }

    #[test]
    fn test_instantiation_failure_keeps_cause() {
        let err = DiscoveryError::ProviderInstantiationFailed {
            capability: CapabilityId::new("x.Y"),
            name: "x.Impl".to_string(),
            source: "boom".into(),
        };
        let cause = std::error::Error::source(&err).map(|e| e.to_string());
        assert_eq!(cause.as_deref(), Some("boom"));
        assert_eq!(err.capability().as_str(), "x.Y");
    }
}
