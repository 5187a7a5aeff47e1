//! `lumify-worker` command line

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use lumify_store::{UserId, WorkspaceId};
use lumify_worker::{replay_file, SwitchWorkspace, WorkerChannels, WorkerConfig, WorkerContext};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn cli() -> Command {
    let config = Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("Worker configuration file (TOML)");
    let workspace = Arg::new("workspace")
        .long("workspace")
        .required(true)
        .help("Workspace id");

    Command::new("lumify-worker")
        .version(lumify_worker::VERSION)
        .about("Lumify workspace store worker")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON on stderr"),
        )
        .subcommand(
            Command::new("replay")
                .about("Feed captured responses through the store and print UI messages")
                .arg(workspace.clone())
                .arg(
                    Arg::new("current")
                        .long("current")
                        .help("Workspace the UI is displaying (defaults to --workspace)"),
                )
                .arg(config.clone())
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON lines file, one response body per line"),
                ),
        )
        .subcommand(
            Command::new("switch")
                .about("Switch to a workspace against a live server and print messages")
                .arg(workspace)
                .arg(Arg::new("user").long("user").required(true).help("Signed-in user id"))
                .arg(config),
        )
}

fn load_config(args: &ArgMatches) -> anyhow::Result<WorkerConfig> {
    match args.get_one::<PathBuf>("config") {
        Some(path) => WorkerConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(WorkerConfig::default()),
    }
}

fn init_tracing(config: &WorkerConfig, json: bool) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter)
            .with_context(|| format!("invalid log_filter {:?}", config.log_filter))?,
    };
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .context("initialising tracing")
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a String> {
    args.get_one::<String>(name)
        .with_context(|| format!("missing --{name}"))
}

/// Print every queued message as one JSON line
fn drain(channels: &mut WorkerChannels) -> anyhow::Result<()> {
    while let Ok(message) = channels.socket.try_recv() {
        println!("{}", serde_json::to_string(&message)?);
    }
    while let Ok(message) = channels.main.try_recv() {
        println!("{}", serde_json::to_string(&message)?);
    }
    Ok(())
}

fn replay(args: &ArgMatches, config: WorkerConfig) -> anyhow::Result<()> {
    let workspace_id = WorkspaceId::new(required(args, "workspace")?.as_str());
    let current = args
        .get_one::<String>("current")
        .map_or_else(|| workspace_id.clone(), |id| WorkspaceId::new(id.as_str()));
    let file = args.get_one::<PathBuf>("file").context("missing input file")?;

    let (context, mut channels) = WorkerContext::with_channels(config);
    context.session().activate(current);

    let summary = replay_file(file, &context.interceptor(), &workspace_id)
        .with_context(|| format!("replaying {}", file.display()))?;
    drain(&mut channels)?;

    eprintln!(
        "{} responses, {} skipped: {} new, {} updated, {} unchanged",
        summary.responses,
        summary.skipped,
        summary.report.new,
        summary.report.updated,
        summary.report.unchanged
    );
    Ok(())
}

async fn switch(args: &ArgMatches, config: WorkerConfig) -> anyhow::Result<()> {
    let workspace_id = required(args, "workspace")?.as_str();
    let user_id = UserId::new(required(args, "user")?.as_str());

    let (context, mut channels) = WorkerContext::with_channels(config);
    context.session().set_user(user_id);

    let handler = context.switch_handler(context.http_service()?);
    let outcome = handler
        .handle(SwitchWorkspace::new(workspace_id))
        .await
        .with_context(|| format!("switching to workspace {workspace_id}"))?;
    drain(&mut channels)?;

    tracing::info!(loaded = outcome.is_loaded(), "switch complete");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let json_logs = matches.get_flag("log-json");

    match matches.subcommand() {
        Some(("replay", args)) => {
            let config = load_config(args)?;
            init_tracing(&config, json_logs)?;
            replay(args, config)
        }
        Some(("switch", args)) => {
            let config = load_config(args)?;
            init_tracing(&config, json_logs)?;
            switch(args, config).await
        }
        _ => anyhow::bail!("a subcommand is required"),
    }
}
