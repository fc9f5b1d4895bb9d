use provscope_core::api::{CapabilityId, DiscoveryScope};
use provscope_core::locator::ResourceLocator;
use provscope_core::parser::parse_resource;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::{info, warn};

#[derive(Tabled, Debug)]
pub(crate) struct CheckRow {
    #[tabled(rename = "Capability")]
    pub capability: String,
    #[tabled(rename = "Resource")]
    pub resource: String,
    #[tabled(rename = "Providers")]
    pub providers: usize,
    #[tabled(rename = "Status")]
    pub status: String,
}

/// Parse every configuration resource of `capabilities` and report one row
/// per resource. The second value counts resources that failed.
pub(crate) fn check(
    scope: &Arc<dyn DiscoveryScope>,
    capabilities: &[String],
) -> Result<(Vec<CheckRow>, usize), Box<dyn std::error::Error>> {
    let capabilities = if capabilities.is_empty() {
        scope.service_names()?
    } else {
        capabilities.to_vec()
    };

    let locator = ResourceLocator::new(scope.clone());
    let mut rows = Vec::new();
    let mut failures = 0;

    for name in capabilities {
        let capability = CapabilityId::new(name);
        let resources = match locator.locate(&capability) {
            Ok(resources) => resources,
            Err(e) => {
                warn!("{}: {}", capability, e);
                failures += 1;
                rows.push(CheckRow {
                    capability: capability.to_string(),
                    resource: "-".to_string(),
                    providers: 0,
                    status: e.to_string(),
                });
                continue;
            }
        };

        if resources.is_empty() {
            rows.push(CheckRow {
                capability: capability.to_string(),
                resource: "-".to_string(),
                providers: 0,
                status: "no configuration".to_string(),
            });
        }

        for resource in resources {
            let (providers, status) = match parse_resource(&capability, resource.as_ref()) {
                Ok(names) => (names.len(), "ok".to_string()),
                Err(e) => {
                    warn!("{}", e);
                    failures += 1;
                    (0, e.to_string())
                }
            };
            rows.push(CheckRow {
                capability: capability.to_string(),
                resource: resource.id().to_string(),
                providers,
                status,
            });
        }
    }

    Ok((rows, failures))
}

pub fn run(
    scope: Arc<dyn DiscoveryScope>,
    capabilities: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Checking configuration in {}", scope.name());
    let (rows, failures) = check(&scope, capabilities)?;

    if rows.is_empty() {
        println!("No configuration files found.");
        return Ok(());
    }
    let checked = rows.len();
    println!("{}", Table::new(rows));

    if failures > 0 {
        return Err(format!("{failures} of {checked} configuration files are invalid").into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use provscope_core::MemoryScope;

    #[test]
    fn test_check_reports_bad_lines() {
        let scope: Arc<dyn DiscoveryScope> = Arc::new(
            MemoryScope::new("m")
                .with_service("a.Codec", "gzip.Codec\n")
                .with_service("a.Codec", "lz4.Codec\nbad name\n")
                .with_service("b.Sink", "# nothing\n"),
        );

        let (rows, failures) = check(&scope, &[]).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(failures, 1);
        assert_eq!(rows[0].providers, 1);
        assert_eq!(rows[0].status, "ok");
        assert!(rows[1].status.contains(":2: Illegal configuration-file syntax"));
        assert_eq!(rows[2].capability, "b.Sink");
        assert_eq!(rows[2].providers, 0);
    }

    #[test]
    fn test_check_missing_capability() {
        let scope: Arc<dyn DiscoveryScope> = Arc::new(MemoryScope::new("m"));
        let (rows, failures) = check(&scope, &["x.Missing".to_string()]).unwrap();
        assert_eq!(failures, 0);
        assert_eq!(rows[0].status, "no configuration");
    }
}
