use clap::Parser;
use log::{debug, error, info, warn};
use std::process;

use keptn_workload::models::definition::{DefinitionKind, InMemoryCatalog, Location, Phase};
use keptn_workload::models::workload::KeptnWorkload;
use keptn_workload::utils::config::{Cli, Commands, OutputFormat};
use keptn_workload::utils::error::Error;
use keptn_workload::utils::registry::Registry;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    debug!("{:?}", cli);

    // The registry is built here once and passed to everything that decodes resources.
    let registry = Registry::new().register::<KeptnWorkload>();

    match &cli.command {
        Commands::Crd => {
            for crd in registry.crds() {
                match cli.output {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(crd)?),
                }
            }
        }
        Commands::Describe { path } => {
            let manifest = std::fs::read_to_string(path)?;
            let workload: KeptnWorkload = registry.decode(&manifest)?;
            describe(&workload, cli);
        }
    }

    Ok(())
}

fn describe(workload: &KeptnWorkload, cli: &Cli) {
    info!(
        "KeptnWorkload {} ({}) of app {}",
        workload.workload_name(),
        workload.name_without_app_prefix(),
        workload.spec.app_name
    );

    for attribute in workload.span_attributes() {
        println!("{} = {}", attribute.key.as_str(), attribute.value);
    }
    for (key, value) in workload.event_annotations() {
        println!("{}: {}", key, value);
    }

    // no cluster access here, names are only checked against an empty catalog
    let catalog = InMemoryCatalog::new();
    for phase in [Phase::PreDeployment, Phase::PostDeployment].iter() {
        for kind in [DefinitionKind::Task, DefinitionKind::Evaluation].iter() {
            let resolved =
                workload.resolve_definitions(*phase, *kind, &catalog, &cli.system_namespace);
            for definition in resolved {
                match definition.location {
                    Location::Namespace(namespace) => {
                        println!("{} {:?} {} in {}", phase.as_str(), kind, definition.name, namespace)
                    }
                    Location::Missing => warn!(
                        "{} {:?} {} not found in {} or {}",
                        phase.as_str(),
                        kind,
                        definition.name,
                        workload.metadata.namespace.as_deref().unwrap_or_default(),
                        cli.system_namespace
                    ),
                }
            }
        }
    }
}
