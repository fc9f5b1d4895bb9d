//! Captured authority for discovery work.
//!
//! A [`PrivilegeContext`] captures the caller's authority when a loader is
//! created and is asked to re-enter it around every resource read and every
//! provider construction, so discovered code never runs with more authority
//! than the loader's creator had.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque, immutable capture of a caller's authority.
#[derive(Clone)]
pub struct PrivilegeToken {
    label: Arc<str>,
    payload: Arc<dyn Any + Send + Sync>,
}

impl PrivilegeToken {
    pub fn new(label: impl Into<Arc<str>>, payload: impl Any + Send + Sync) -> Self {
        Self {
            label: label.into(),
            payload: Arc::new(payload),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Context-specific payload, for the context that issued the token.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for PrivilegeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivilegeToken").field(&self.label).finish()
    }
}

/// Capture/re-enter service for caller authority.
pub trait PrivilegeContext: Send + Sync {
    /// Capture the current caller's authority.
    ///
    /// `None` means the caller is unrestricted and no re-entry is needed.
    fn capture(&self) -> Option<PrivilegeToken>;

    /// Run `action` under the authority recorded in `token`.
    ///
    /// Returning `Err` means the action was refused and did not run.
    fn run_as(&self, token: &PrivilegeToken, action: &mut dyn FnMut()) -> Result<(), String>;
}

/// Context for callers without restrictions: captures nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unrestricted;

impl PrivilegeContext for Unrestricted {
    fn capture(&self) -> Option<PrivilegeToken> {
        None
    }

    fn run_as(&self, _token: &PrivilegeToken, action: &mut dyn FnMut()) -> Result<(), String> {
        action();
        Ok(())
    }
}
