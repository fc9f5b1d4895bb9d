//! Privilege propagation around discovery steps.

use provscope_api::{CapabilityId, DiscoveryError, PrivilegeContext, PrivilegeToken, Unrestricted};
use std::sync::Arc;

/// Re-enters the authority captured when a loader was created.
#[derive(Clone)]
pub struct Propagator {
    context: Arc<dyn PrivilegeContext>,
    token: Option<PrivilegeToken>,
}

impl Propagator {
    /// Capture the current authority from `context`.
    pub fn capture(context: Arc<dyn PrivilegeContext>) -> Self {
        let token = context.capture();
        Self { context, token }
    }

    pub fn unrestricted() -> Self {
        Self {
            context: Arc::new(Unrestricted),
            token: None,
        }
    }

    pub fn token(&self) -> Option<&PrivilegeToken> {
        self.token.as_ref()
    }

    /// Run `action` under the captured authority.
    ///
    /// Without a token this is a plain call.
    pub fn run<R>(
        &self,
        capability: &CapabilityId,
        action: impl FnOnce() -> R,
    ) -> Result<R, DiscoveryError> {
        let Some(token) = &self.token else {
            return Ok(action());
        };

        let mut action = Some(action);
        let mut output = None;
        self.context
            .run_as(token, &mut || {
                if let Some(action) = action.take() {
                    output = Some(action());
                }
            })
            .map_err(|reason| DiscoveryError::PrivilegeDenied {
                capability: capability.clone(),
                reason,
            })?;

        output.ok_or_else(|| DiscoveryError::PrivilegeDenied {
            capability: capability.clone(),
            reason: format!("context for {} did not run the action", token.label()),
        })
    }
}

impl Default for Propagator {
    fn default() -> Self {
        Self::unrestricted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        entered: Mutex<Vec<String>>,
    }

    impl PrivilegeContext for Recording {
        fn capture(&self) -> Option<PrivilegeToken> {
            Some(PrivilegeToken::new("caller", 7u32))
        }

        fn run_as(&self, token: &PrivilegeToken, action: &mut dyn FnMut()) -> Result<(), String> {
            self.entered.lock().unwrap().push(token.label().to_string());
            action();
            Ok(())
        }
    }

    struct Refusing;

    impl PrivilegeContext for Refusing {
        fn capture(&self) -> Option<PrivilegeToken> {
            Some(PrivilegeToken::new("sandboxed", ()))
        }

        fn run_as(&self, _token: &PrivilegeToken, _action: &mut dyn FnMut()) -> Result<(), String> {
            Err("access denied".to_string())
        }
    }

    #[test]
    fn test_unrestricted_is_passthrough() {
        let propagator = Propagator::unrestricted();
        assert!(propagator.token().is_none());
        let out = propagator.run(&CapabilityId::new("a.B"), || 41 + 1).unwrap();
        assert_eq!(out, 42);
    }

    #[test]
    fn test_runs_inside_captured_context() {
        let context = Arc::new(Recording::default());
        let propagator = Propagator::capture(context.clone());
        assert_eq!(propagator.token().and_then(|t| t.payload::<u32>()), Some(&7));

        let out = propagator.run(&CapabilityId::new("a.B"), || "done").unwrap();
        assert_eq!(out, "done");
        assert_eq!(*context.entered.lock().unwrap(), vec!["caller"]);
    }

    #[test]
    fn test_refused_action_is_an_error() {
        let propagator = Propagator::capture(Arc::new(Refusing));
        let mut ran = false;
        let err = propagator
            .run(&CapabilityId::new("a.B"), || ran = true)
            .unwrap_err();
        assert!(!ran);
        assert!(matches!(err, DiscoveryError::PrivilegeDenied { .. }));
    }
}
