use std::path::Path;

use anyhow::{bail, Context};
use cfr_engine::{ReplaceConfig, ReplaceEngine};
use cfr_protocol::{handle_copy_config, resolve_datastore, CopyConfigRequest, RpcReply, SourceSpec};
use cfr_store::{DatastoreSnapshot, InMemoryDatastore};
use cfr_types::{ConfigNode, Value};
use colored::Colorize;
use serde::Deserialize;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Init(args) => cmd_init(args),
        Command::CopyConfig(args) => cmd_copy_config(args, &cli.format),
        Command::Show(args) => cmd_show(args, &cli.format),
    }
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    if args.store.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", args.store.display());
    }
    DatastoreSnapshot::empty()
        .save(&args.store)
        .with_context(|| format!("writing {}", args.store.display()))?;
    println!(
        "{} Initialized datastores in {}",
        "✓".green().bold(),
        args.store.display().to_string().bold()
    );
    Ok(())
}

fn cmd_copy_config(args: CopyConfigArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => ReplaceConfig::load(path)?,
        None => ReplaceConfig::default(),
    };
    let source = match (args.source, &args.config_tree) {
        (_, Some(path)) => SourceSpec::Config(read_config_tree(path)?),
        (Some(name), None) => SourceSpec::Datastore(name),
        (None, None) => bail!("one of --source or --config-tree is required"),
    };

    let store = InMemoryDatastore::from_snapshot(load_snapshot(&args.store)?);
    let engine = ReplaceEngine::new(config);
    let request = CopyConfigRequest {
        target: args.target.clone(),
        source,
    };
    let reply = handle_copy_config(&engine, &store, request);

    store
        .snapshot()?
        .save(&args.store)
        .with_context(|| format!("writing {}", args.store.display()))?;
    debug!(store = %args.store.display(), "datastores saved");

    print_reply(&reply, &args.target, format)?;
    match reply.error() {
        Some(err) => bail!("copy-config failed: {}", err.error_tag.as_str()),
        None => Ok(()),
    }
}

fn cmd_show(args: ShowArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let kind = resolve_datastore(&args.datastore)?;
    let items = load_snapshot(&args.store)?.items(kind);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
        OutputFormat::Text => {
            if items.is_empty() {
                println!("{} is empty.", kind.as_str().yellow());
            }
            for (path, value) in &items {
                println!("{} {}", path.cyan(), render_value(value));
            }
        }
    }
    Ok(())
}

fn print_reply(reply: &RpcReply, target: &str, format: &OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(reply)?);
        return Ok(());
    }
    match reply {
        RpcReply::Ok => println!("{} {} replaced", "✓".green().bold(), target.yellow()),
        RpcReply::RpcError(err) => {
            println!("{} {}", "✗".red().bold(), err.error_tag.as_str().red());
            if let Some(path) = &err.error_path {
                println!("  Path: {}", path.cyan());
            }
            if let Some(message) = &err.error_message {
                println!("  Message: {}", message.text);
            }
        }
    }
    Ok(())
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Scalar(s) | Value::LeafListEntry(s) => format!("= {}", s.green()),
        other => other.to_string().dimmed().to_string(),
    }
}

fn load_snapshot(path: &Path) -> anyhow::Result<DatastoreSnapshot> {
    DatastoreSnapshot::load(path).with_context(|| format!("reading {}", path.display()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TreeFile {
    Many(Vec<ConfigNode>),
    One(ConfigNode),
}

/// Read a configuration tree: one top-level node or an array of them.
fn read_config_tree(path: &Path) -> anyhow::Result<Vec<ConfigNode>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let tree: TreeFile = serde_json::from_str(&text)
        .with_context(|| format!("parsing configuration tree {}", path.display()))?;
    Ok(match tree {
        TreeFile::Many(roots) => roots,
        TreeFile::One(root) => vec![root],
    })
}
