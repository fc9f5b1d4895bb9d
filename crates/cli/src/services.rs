use provscope_core::api::DiscoveryScope;
use std::sync::Arc;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Capability")]
    capability: String,
}

pub fn run(scope: Arc<dyn DiscoveryScope>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let names = scope.service_names()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }
    if names.is_empty() {
        println!("No service configuration found in {}.", scope.name());
        return Ok(());
    }

    let rows: Vec<ServiceRow> = names
        .into_iter()
        .map(|capability| ServiceRow { capability })
        .collect();
    println!("{}", Table::new(rows));
    Ok(())
}
