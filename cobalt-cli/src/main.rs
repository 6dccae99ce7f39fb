//! cobalt - declarative infrastructure management for Azure

use std::collections::{HashMap, HashSet};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use similar::{ChangeTag, TextDiff};

use cobalt_core::config::{self, ConfiguredResource};
use cobalt_core::differ::create_plan;
use cobalt_core::effect::Effect;
use cobalt_core::executor::{Action, ExecutionReport, Executor, OperationTimeouts};
use cobalt_core::plan::Plan;
use cobalt_core::provider::Provider;
use cobalt_core::resource::{Resource, ResourceId, State, Value};
use cobalt_core::schema::ResourceSchema;
use cobalt_provider_azure::AzureProvider;
use cobalt_state::{BackendConfig, ResourceState, StateBackend, StateFile, create_backend};

#[derive(Parser)]
#[command(name = "cobalt")]
#[command(about = "Declarative infrastructure management for Azure", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration file
    Validate {
        /// Path to the configuration file
        #[arg(default_value = "cobalt.json")]
        file: PathBuf,
    },
    /// Show the execution plan without applying changes
    Plan {
        #[arg(default_value = "cobalt.json")]
        file: PathBuf,
    },
    /// Apply changes to reach the declared state
    Apply {
        #[arg(default_value = "cobalt.json")]
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long)]
        auto_approve: bool,
    },
    /// Destroy every resource recorded in the state
    Destroy {
        #[arg(default_value = "cobalt.json")]
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long)]
        auto_approve: bool,
    },
    /// State inspection and management
    State {
        #[command(subcommand)]
        command: StateCommands,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

#[derive(Subcommand)]
enum StateCommands {
    /// List resources recorded in the state
    List,
    /// Show one resource ("type.name")
    Show { address: String },
    /// Remove a stuck lock by its ID
    ForceUnlock { lock_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate { file } => validate(&file),
        Commands::Plan { file } => plan(&file).await,
        Commands::Apply { file, auto_approve } => apply(&file, auto_approve).await,
        Commands::Destroy { file, auto_approve } => destroy(&file, auto_approve).await,
        Commands::State { command } => state_command(command).await,
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "cobalt", &mut std::io::stdout());
            Ok(())
        }
    }
}

// =============================================================================
// Configuration Loading and Validation
// =============================================================================

fn schema_map() -> HashMap<String, ResourceSchema> {
    cobalt_provider_azure::schemas::configs()
        .into_iter()
        .map(|c| (c.resource_type.to_string(), c.schema))
        .collect()
}

fn load_config(file: &Path) -> anyhow::Result<Vec<ConfiguredResource>> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    config::parse(&content).with_context(|| format!("failed to parse {}", file.display()))
}

fn validate_config(configured: &[ConfiguredResource]) -> anyhow::Result<()> {
    let schemas = schema_map();
    let mut failures = 0;

    for entry in configured {
        let resource = &entry.resource;
        let Some(schema) = schemas.get(&resource.id.resource_type) else {
            eprintln!(
                "{} {}: unknown resource type '{}'",
                "error:".red().bold(),
                resource.id,
                resource.id.resource_type
            );
            failures += 1;
            continue;
        };

        if let Err(errors) = schema.validate(&resource.attributes) {
            for error in errors {
                eprintln!("{} {}: {}", "error:".red().bold(), resource.id, error);
            }
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{} resource(s) failed validation", failures);
    }
    Ok(())
}

fn validate(file: &Path) -> anyhow::Result<()> {
    let configured = load_config(file)?;
    validate_config(&configured)?;
    println!(
        "{} {} resource(s) are valid",
        "Success!".green().bold(),
        configured.len()
    );
    Ok(())
}

// =============================================================================
// Plan and Apply
// =============================================================================

struct Workspace {
    provider: AzureProvider,
    backend: Box<dyn StateBackend>,
    state_file: StateFile,
}

async fn open_workspace() -> anyhow::Result<Workspace> {
    let provider =
        AzureProvider::from_env().context("failed to configure Azure credentials")?;
    let backend = create_backend(&BackendConfig::local())?;
    backend.init().await?;
    let state_file = backend.read_state().await?.unwrap_or_default();
    Ok(Workspace {
        provider,
        backend,
        state_file,
    })
}

/// Refresh the remote state of every configured resource
async fn refresh(
    workspace: &Workspace,
    configured: &[ConfiguredResource],
) -> anyhow::Result<HashMap<ResourceId, State>> {
    let mut current = HashMap::new();
    for entry in configured {
        let id = &entry.resource.id;
        let identifier = workspace
            .state_file
            .find_resource(id)
            .map(|r| r.identifier.clone());
        let state = workspace
            .provider
            .read(id, identifier.as_deref())
            .await
            .map_err(|e| anyhow::anyhow!("refreshing {}: {}", id, e))?;
        current.insert(id.clone(), state);
    }
    Ok(current)
}

fn timeouts_by_resource(
    configured: &[ConfiguredResource],
) -> HashMap<ResourceId, OperationTimeouts> {
    configured
        .iter()
        .map(|entry| (entry.resource.id.clone(), entry.timeouts))
        .collect()
}

async fn build_plan(
    workspace: &Workspace,
    configured: &[ConfiguredResource],
) -> anyhow::Result<Plan> {
    let resources: Vec<Resource> = configured.iter().map(|e| e.resource.clone()).collect();
    let current = refresh(workspace, configured).await?;
    let mut plan = create_plan(&resources, &current, &schema_map());

    // Resources recorded in state but no longer declared get deleted
    let declared: HashSet<ResourceId> = resources.iter().map(|r| r.id.clone()).collect();
    for entry in &workspace.state_file.resources {
        let id = entry.resource_id();
        if !declared.contains(&id) {
            plan.add(Effect::Delete(id));
        }
    }

    Ok(plan)
}

async fn plan(file: &Path) -> anyhow::Result<()> {
    let configured = load_config(file)?;
    validate_config(&configured)?;

    let workspace = open_workspace().await?;
    let plan = build_plan(&workspace, &configured).await?;

    if plan.is_empty() {
        println!("{}", "No changes. Infrastructure is up to date.".green());
        return Ok(());
    }

    print!("{}", render_plan(&plan));
    Ok(())
}

async fn apply(file: &Path, auto_approve: bool) -> anyhow::Result<()> {
    let configured = load_config(file)?;
    validate_config(&configured)?;

    let mut workspace = open_workspace().await?;
    let lock = workspace.backend.acquire_lock("apply").await?;

    let result = apply_locked(&mut workspace, &configured, auto_approve).await;

    workspace.backend.release_lock(&lock).await?;
    result
}

async fn apply_locked(
    workspace: &mut Workspace,
    configured: &[ConfiguredResource],
    auto_approve: bool,
) -> anyhow::Result<()> {
    let plan = build_plan(workspace, configured).await?;

    if plan.is_empty() {
        println!("{}", "No changes. Infrastructure is up to date.".green());
        return Ok(());
    }

    print!("{}", render_plan(&plan));
    if !auto_approve && !confirm("Do you want to perform these actions?")? {
        bail!("apply cancelled");
    }

    let identifiers = workspace.state_file.identifiers();
    let report = Executor::new(&workspace.provider)
        .with_timeouts(timeouts_by_resource(configured))
        .apply(&plan, &identifiers)
        .await;

    record_outcomes(&mut workspace.state_file, &report);
    workspace.backend.write_state(&workspace.state_file).await?;

    print_report(&report);
    if let Some(error) = report.first_error() {
        bail!("apply failed: {}", error);
    }
    Ok(())
}

async fn destroy(file: &Path, auto_approve: bool) -> anyhow::Result<()> {
    // The configuration is loaded only to catch pointing destroy at the
    // wrong directory; the plan comes from state
    let _ = load_config(file)?;

    let mut workspace = open_workspace().await?;
    if workspace.state_file.resources.is_empty() {
        println!("{}", "Nothing to destroy.".green());
        return Ok(());
    }

    let lock = workspace.backend.acquire_lock("destroy").await?;

    let mut plan = Plan::new();
    // Destroy in reverse creation order so dependents go first
    for entry in workspace.state_file.resources.iter().rev() {
        plan.add(Effect::Delete(entry.resource_id()));
    }

    print!("{}", render_plan(&plan));
    if !auto_approve && !confirm("Do you really want to destroy all resources?")? {
        workspace.backend.release_lock(&lock).await?;
        bail!("destroy cancelled");
    }

    let identifiers = workspace.state_file.identifiers();
    let report = Executor::new(&workspace.provider)
        .apply(&plan, &identifiers)
        .await;

    record_outcomes(&mut workspace.state_file, &report);
    workspace.backend.write_state(&workspace.state_file).await?;
    workspace.backend.release_lock(&lock).await?;

    print_report(&report);
    if let Some(error) = report.first_error() {
        bail!("destroy failed: {}", error);
    }
    Ok(())
}

/// Fold execution outcomes back into the state file
fn record_outcomes(state_file: &mut StateFile, report: &ExecutionReport) {
    let mut mutated = false;
    for outcome in &report.outcomes {
        match (&outcome.action, &outcome.result) {
            (Action::Deleted, Ok(_)) => {
                state_file.remove_resource(&outcome.id);
                mutated = true;
            }
            (_, Ok(Some(state))) => {
                if let Some(entry) = ResourceState::from_remote(state, "azure") {
                    state_file.upsert_resource(entry);
                    mutated = true;
                }
            }
            _ => {}
        }
    }
    if mutated {
        state_file.increment_serial();
    }
}

// =============================================================================
// State Subcommands
// =============================================================================

async fn state_command(command: StateCommands) -> anyhow::Result<()> {
    let backend = create_backend(&BackendConfig::local())?;

    match command {
        StateCommands::List => {
            let state_file = backend.read_state().await?.unwrap_or_default();
            if state_file.resources.is_empty() {
                println!("The state is empty.");
            }
            for entry in &state_file.resources {
                println!("{}", entry.resource_id());
            }
            Ok(())
        }
        StateCommands::Show { address } => {
            let state_file = backend.read_state().await?.unwrap_or_default();
            let id = parse_address(&address)?;
            let Some(entry) = state_file.find_resource(&id) else {
                bail!("no resource {} in state", id);
            };
            println!("{}", "# ".dimmed().to_string() + &entry.identifier);
            println!("{}", serde_json::to_string_pretty(&entry.attributes)?);
            Ok(())
        }
        StateCommands::ForceUnlock { lock_id } => {
            backend.force_unlock(&lock_id).await?;
            println!("Lock {} released.", lock_id);
            Ok(())
        }
    }
}

fn parse_address(address: &str) -> anyhow::Result<ResourceId> {
    match address.split_once('.') {
        Some((resource_type, name)) if !resource_type.is_empty() && !name.is_empty() => {
            Ok(ResourceId::new(resource_type, name))
        }
        _ => bail!("invalid address '{}', expected type.name", address),
    }
}

// =============================================================================
// Rendering
// =============================================================================

fn render_plan(plan: &Plan) -> String {
    let mut out = String::new();

    for effect in plan.effects() {
        match effect {
            Effect::Create(resource) => {
                out.push_str(&format!("{} {}\n", "+".green().bold(), resource.id));
            }
            Effect::Update { id, from, to } => {
                out.push_str(&format!("{} {}\n", "~".yellow().bold(), id));
                out.push_str(&render_attribute_diff(from, to));
            }
            Effect::Replace { id, from, to } => {
                out.push_str(&format!("{} {}\n", "-/+".red().bold(), id));
                out.push_str(&render_attribute_diff(from, to));
            }
            Effect::Delete(id) => {
                out.push_str(&format!("{} {}\n", "-".red().bold(), id));
            }
            Effect::Read(id) => {
                out.push_str(&format!("{} {}\n", "?".dimmed(), id));
            }
        }
    }

    out.push_str(&format!("\n{}\n", plan.summary()));
    out
}

/// Unified diff of the attribute sets, in stable key order
fn render_attribute_diff(from: &State, to: &Resource) -> String {
    let before = sorted_json(&from.attributes);
    let after = sorted_json(&to.attributes);

    let mut out = String::new();
    let diff = TextDiff::from_lines(before.as_str(), after.as_str());
    for change in diff.iter_all_changes() {
        let line = match change.tag() {
            ChangeTag::Delete => format!("    - {}", change).red().to_string(),
            ChangeTag::Insert => format!("    + {}", change).green().to_string(),
            ChangeTag::Equal => continue,
        };
        out.push_str(&line);
    }
    out
}

fn sorted_json(attributes: &HashMap<String, Value>) -> String {
    let mut keys: Vec<&String> = attributes.keys().collect();
    keys.sort();

    let mut object = serde_json::Map::new();
    for key in keys {
        object.insert(key.clone(), attributes[key].to_json());
    }
    serde_json::to_string_pretty(&serde_json::Value::Object(object)).unwrap_or_default()
}

fn print_report(report: &ExecutionReport) {
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(_) => {
                println!("{} {} {}", "✓".green(), outcome.id, outcome.action.as_str());
            }
            Err(error) => {
                println!("{} {}: {}", "✗".red().bold(), outcome.id, error);
            }
        }
    }
    if report.skipped > 0 {
        println!("{} {} effect(s) skipped", "!".yellow().bold(), report.skipped);
    }
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} Only 'yes' will be accepted: ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim() == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_address_splits_on_first_dot() {
        let id = parse_address("netapp_volume.vol-1").unwrap();
        assert_eq!(id.resource_type, "netapp_volume");
        assert_eq!(id.name, "vol-1");

        assert!(parse_address("no-dot").is_err());
        assert!(parse_address(".name").is_err());
    }

    #[test]
    fn schema_map_covers_every_provider_type() {
        let schemas = schema_map();
        for config in cobalt_provider_azure::schemas::configs() {
            assert!(schemas.contains_key(config.resource_type));
        }
    }

    #[test]
    fn attribute_diff_marks_changes() {
        colored::control::set_override(false);

        let mut current_attrs = HashMap::new();
        current_attrs.insert(
            "location".to_string(),
            Value::String("westeurope".to_string()),
        );
        let from = State::existing(ResourceId::new("resource_group", "a"), current_attrs);

        let to = Resource::new("resource_group", "a")
            .with_attribute("location", Value::String("northeurope".to_string()));

        let diff = render_attribute_diff(&from, &to);
        assert!(diff.contains("- "));
        assert!(diff.contains("+ "));
        assert!(diff.contains("northeurope"));

        colored::control::unset_override();
    }

    #[test]
    fn sorted_json_is_stable() {
        let mut attrs = HashMap::new();
        attrs.insert("b".to_string(), Value::Int(2));
        attrs.insert("a".to_string(), Value::Int(1));

        let first = sorted_json(&attrs);
        let second = sorted_json(&attrs);
        assert_eq!(first, second);
        assert!(first.find("\"a\"").unwrap() < first.find("\"b\"").unwrap());
    }
}
