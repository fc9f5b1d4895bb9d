mod check;
mod list;
mod services;

use clap::{Args, Parser, Subcommand};
use provscope_core::ClassPathConfig;
use provscope_core::api::DiscoveryScope;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "provscope",
    version,
    about = "Inspect provider configuration on a class path",
    long_about = "Provscope locates META-INF/services configuration files in directories and \
                  JAR archives, validates them, and shows which providers a capability would \
                  discover, in discovery order, without instantiating anything."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate configuration files
    #[command(
        long_about = "Parses every configuration file for the given capabilities and reports \
                            syntax errors with their line numbers. Without a capability, every \
                            service file on the class path is checked."
    )]
    Check {
        /// Capability identifiers to check
        #[arg(value_name = "CAPABILITY")]
        capabilities: Vec<String>,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// List the providers a capability would discover
    List {
        /// Capability identifier, e.g. com.example.Codec
        #[arg(value_name = "CAPABILITY")]
        capability: String,
        #[command(flatten)]
        scope: ScopeArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List capabilities with configuration on the class path
    Services {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Class-path options shared by every command.
#[derive(Args, Debug, Default)]
pub struct ScopeArgs {
    /// Directory or JAR to search; repeat for more entries.
    /// Defaults to PROVSCOPE_CLASS_PATH.
    #[arg(long = "class-path", short = 'c', value_name = "PATH")]
    pub class_path: Vec<PathBuf>,
    /// Installation whose lib/*.jar hold installed providers.
    /// Defaults to PROVSCOPE_HOME.
    #[arg(long, value_name = "DIR")]
    pub home: Option<PathBuf>,
}

impl ScopeArgs {
    pub fn scope(&self) -> Arc<dyn DiscoveryScope> {
        Arc::new(
            ClassPathConfig::from_env()
                .merge(self.class_path.clone(), self.home.clone())
                .build(),
        )
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Check { .. } => "check",
        Commands::List { .. } => "list",
        Commands::Services { .. } => "services",
    };
    let _guard = provscope_core::logging::init_logging(component, false);

    execute(cli)
}

/// Dispatch a parsed command line.
pub fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Check {
            capabilities,
            scope,
        } => check::run(scope.scope(), &capabilities),
        Commands::List {
            capability,
            scope,
            json,
        } => list::run(scope.scope(), &capability, json),
        Commands::Services { scope, json } => services::run(scope.scope(), json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn class_path_dir(services: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let root = dir.path().join("META-INF/services");
        fs::create_dir_all(&root).unwrap();
        for (capability, contents) in services {
            fs::write(root.join(capability), contents).unwrap();
        }
        dir
    }

    fn execute_args(args: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
        execute(Cli::try_parse_from(args.iter().copied())?)
    }

    #[test]
    fn test_parse_shared_scope_args() {
        let cli = Cli::try_parse_from([
            "provscope",
            "list",
            "a.Codec",
            "--class-path",
            "/tmp/a",
            "-c",
            "/tmp/b.jar",
            "--home",
            "/opt/app",
            "--json",
        ])
        .unwrap();
        let Commands::List {
            capability,
            scope,
            json,
        } = cli.command
        else {
            panic!("expected the list command");
        };
        assert_eq!(capability, "a.Codec");
        assert_eq!(scope.class_path, vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b.jar")]);
        assert_eq!(scope.home, Some(PathBuf::from("/opt/app")));
        assert!(json);
    }

    #[test]
    fn test_execute_each_command() {
        let dir = class_path_dir(&[("a.Codec", "gzip.Codec\nlz4.Codec\n")]);
        let path = dir.path().to_str().unwrap();

        execute_args(&["provscope", "check", "--class-path", path]).unwrap();
        execute_args(&["provscope", "check", "a.Codec", "--class-path", path]).unwrap();
        execute_args(&["provscope", "list", "a.Codec", "--class-path", path]).unwrap();
        execute_args(&["provscope", "list", "a.Codec", "--class-path", path, "--json"]).unwrap();
        execute_args(&["provscope", "services", "--class-path", path]).unwrap();
    }

    #[test]
    fn test_execute_check_fails_on_bad_configuration() {
        let dir = class_path_dir(&[("a.Codec", "gzip.Codec\nnot valid\n")]);
        let path = dir.path().to_str().unwrap();

        let err = execute_args(&["provscope", "check", "--class-path", path])
            .err()
            .expect("invalid configuration should fail the check");
        assert!(err.to_string().contains("1 of 1 configuration files are invalid"));
    }

    #[test]
    fn test_execute_list_rejects_invalid_capability() {
        let dir = class_path_dir(&[]);
        let path = dir.path().to_str().unwrap();

        let err = execute_args(&["provscope", "list", "../../secret", "--class-path", path])
            .err()
            .expect("path-like capability should be rejected");
        assert!(err.to_string().contains("invalid capability identifier"));
    }
}
