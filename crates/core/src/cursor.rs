//! Candidate cursor: walks parser output across resources.
//!
//! The cursor owns the only mutable discovery position of a generation:
//! the located resources still to parse, the names pending from the current
//! resource, and a one-name lookahead. Names that the caller already knows
//! about (cached providers) or that were returned earlier in this generation
//! are skipped without error.

use crate::locator::ResourceLocator;
use crate::parser::{CandidateName, parse_resource};
use provscope_api::{CapabilityId, ConfigResource, DiscoveryError, ResourceId};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace};

/// A candidate name together with the resource that listed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: CandidateName,
    pub resource: ResourceId,
}

pub struct CandidateCursor {
    capability: CapabilityId,
    locator: ResourceLocator,
    /// `None` until the scope has been enumerated successfully.
    resources: Option<VecDeque<Box<dyn ConfigResource>>>,
    current: Option<ResourceId>,
    pending: VecDeque<CandidateName>,
    next_candidate: Option<Candidate>,
    returned: HashSet<CandidateName>,
}

impl CandidateCursor {
    pub fn new(capability: CapabilityId, locator: ResourceLocator) -> Self {
        Self {
            capability,
            locator,
            resources: None,
            current: None,
            pending: VecDeque::new(),
            next_candidate: None,
            returned: HashSet::new(),
        }
    }

    /// Advance until an unseen name is buffered or every resource is exhausted.
    ///
    /// `known` reports names that must be skipped because they are already
    /// materialized elsewhere.
    pub fn has_next(&mut self, known: impl Fn(&str) -> bool) -> Result<bool, DiscoveryError> {
        if self.next_candidate.is_some() {
            return Ok(true);
        }

        if self.resources.is_none() {
            let located =
                self.locator
                    .locate(&self.capability)
                    .map_err(|source| DiscoveryError::Scope {
                        capability: self.capability.clone(),
                        source,
                    })?;
            self.resources = Some(located.into());
        }

        loop {
            while let Some(name) = self.pending.pop_front() {
                if known(&name) || self.returned.contains(&name) {
                    trace!("Skipping duplicate provider name {}", name);
                    continue;
                }
                if let Some(resource) = &self.current {
                    self.next_candidate = Some(Candidate {
                        name,
                        resource: resource.clone(),
                    });
                    return Ok(true);
                }
            }

            let Some(resource) = self.resources.as_mut().and_then(VecDeque::pop_front) else {
                return Ok(false);
            };
            let names = parse_resource(&self.capability, resource.as_ref())?;
            debug!("{} lists {} provider names", resource.id(), names.len());
            self.current = Some(resource.id().clone());
            self.pending = names.into();
        }
    }

    /// Take the next unseen candidate, or `None` when discovery is complete.
    pub fn next(
        &mut self,
        known: impl Fn(&str) -> bool,
    ) -> Result<Option<Candidate>, DiscoveryError> {
        if !self.has_next(known)? {
            return Ok(None);
        }
        let candidate = self.next_candidate.take();
        if let Some(candidate) = &candidate {
            self.returned.insert(candidate.name.clone());
        }
        Ok(candidate)
    }

    /// Candidates are derived from configuration files; they cannot be removed.
    pub fn remove(&mut self) -> Result<(), DiscoveryError> {
        Err(DiscoveryError::NotSupported {
            capability: self.capability.clone(),
            operation: "remove",
        })
    }

    pub fn capability(&self) -> &CapabilityId {
        &self.capability
    }
}

impl Iterator for CandidateCursor {
    type Item = Result<Candidate, DiscoveryError>;

    /// Walk candidates with nothing known up front.
    fn next(&mut self) -> Option<Self::Item> {
        CandidateCursor::next(self, |_| false).transpose()
    }
}
