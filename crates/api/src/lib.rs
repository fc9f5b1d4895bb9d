pub mod capability;
pub mod error;
pub mod privilege;
pub mod scope;
pub mod types;

// Re-export commonly used types
pub use capability::{Capability, CapabilityId, SERVICES_PREFIX};
pub use error::{BoxError, DiscoveryError, DiscoveryResult, ScopeError, SyntaxErrorKind};
pub use privilege::{PrivilegeContext, PrivilegeToken, Unrestricted};
pub use scope::{ConfigResource, DiscoveryScope, ResourceId, root_scope};
pub use types::{ProviderFactory, ResolvedType, TypeResolver};
