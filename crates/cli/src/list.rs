use provscope_core::api::{CapabilityId, DiscoveryScope};
use provscope_core::cursor::CandidateCursor;
use provscope_core::locator::ResourceLocator;
use serde::Serialize;
use std::sync::Arc;
use tabled::{Table, Tabled};

#[derive(Tabled, Serialize, Debug)]
pub(crate) struct ProviderRow {
    #[tabled(rename = "#")]
    pub position: usize,
    #[tabled(rename = "Provider")]
    pub provider: String,
    #[tabled(rename = "Resource")]
    pub resource: String,
}

/// Candidate names in discovery order, duplicates removed.
pub(crate) fn candidates(
    scope: Arc<dyn DiscoveryScope>,
    capability: &str,
) -> Result<Vec<ProviderRow>, Box<dyn std::error::Error>> {
    let cursor = CandidateCursor::new(CapabilityId::new(capability), ResourceLocator::new(scope));
    let mut rows = Vec::new();
    for candidate in cursor {
        let candidate = candidate?;
        rows.push(ProviderRow {
            position: rows.len() + 1,
            provider: candidate.name,
            resource: candidate.resource.to_string(),
        });
    }
    Ok(rows)
}

pub fn run(
    scope: Arc<dyn DiscoveryScope>,
    capability: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows = candidates(scope, capability)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if rows.is_empty() {
        println!("No providers configured for {capability}.");
    } else {
        println!("{}", Table::new(rows));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use provscope_core::MemoryScope;

    #[test]
    fn test_candidates_in_discovery_order() {
        let installed = Arc::new(MemoryScope::new("installed").with_service("a.Codec", "zstd.Codec"));
        let scope = Arc::new(
            MemoryScope::new("app")
                .with_service("a.Codec", "gzip.Codec\nzstd.Codec\nlz4.Codec")
                .with_parent(installed),
        );

        let rows = candidates(scope, "a.Codec").unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.provider.as_str()).collect();
        assert_eq!(names, vec!["zstd.Codec", "gzip.Codec", "lz4.Codec"]);
        assert_eq!(rows[0].resource, "mem:installed/META-INF/services/a.Codec#0");
        assert_eq!(rows[2].position, 3);
    }

    #[test]
    fn test_candidates_stop_at_syntax_error() {
        let scope = Arc::new(MemoryScope::new("m").with_service("a.Codec", "1bad.Codec"));
        let err = candidates(scope, "a.Codec").unwrap_err();
        assert!(err.to_string().contains("Illegal provider-class name: 1bad.Codec"));
    }
}
