use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
};
use vdom_snapshot_config::Config;
use vdom_snapshot_engine::{
    NodePath, SnapshotOptions, TextFormat, VNode, decode, normalize, simulate, to_html,
    to_json_string_with,
};

#[derive(Debug, PartialEq)]
enum Command {
    Snapshot {
        fixture: PathBuf,
        pretty: bool,
        keys: bool,
    },
    Html {
        fixture: PathBuf,
    },
    Event {
        fixture: PathBuf,
        path: NodePath,
        event: String,
        payload: Value,
    },
    InitConfig {
        fixtures_dir: Option<PathBuf>,
        path: Option<PathBuf>,
    },
}

fn usage(program: &str) -> String {
    format!(
        "Usage:\n  \
         {program} snapshot <fixture.json> [--pretty] [--keys]\n  \
         {program} html <fixture.json>\n  \
         {program} event <fixture.json> <path> <event> [payload-json]\n  \
         {program} init-config [--fixtures-dir <dir>] [--path <config.toml>]"
    )
}

fn parse_args(args: &[String]) -> Result<Command> {
    let Some((subcommand, rest)) = args.split_first() else {
        bail!("missing command");
    };
    match subcommand.as_str() {
        "snapshot" => {
            let mut fixture = None;
            let mut pretty = false;
            let mut keys = false;
            for arg in rest {
                match arg.as_str() {
                    "--pretty" => pretty = true,
                    "--keys" => keys = true,
                    flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
                    path if fixture.is_none() => fixture = Some(PathBuf::from(path)),
                    extra => bail!("unexpected argument {extra}"),
                }
            }
            Ok(Command::Snapshot {
                fixture: fixture.context("missing fixture path")?,
                pretty,
                keys,
            })
        }
        "html" => match rest {
            [fixture] => Ok(Command::Html {
                fixture: PathBuf::from(fixture),
            }),
            _ => bail!("html takes exactly one fixture path"),
        },
        "event" => match rest {
            [fixture, path, event] | [fixture, path, event, _] => {
                let payload = match rest.get(3) {
                    Some(raw) => serde_json::from_str(raw)
                        .with_context(|| format!("payload is not valid JSON: {raw}"))?,
                    None => Value::Object(Default::default()),
                };
                Ok(Command::Event {
                    fixture: PathBuf::from(fixture),
                    path: path.parse()?,
                    event: event.clone(),
                    payload,
                })
            }
            _ => bail!(
                "event takes a fixture path, a node path, an event name and an optional payload"
            ),
        },
        "init-config" => {
            let mut fixtures_dir = None;
            let mut path = None;
            let mut rest = rest.iter();
            while let Some(arg) = rest.next() {
                let slot = match arg.as_str() {
                    "--fixtures-dir" => &mut fixtures_dir,
                    "--path" => &mut path,
                    other => bail!("unexpected argument {other}"),
                };
                let value = rest.next().with_context(|| format!("{arg} needs a value"))?;
                *slot = Some(PathBuf::from(value));
            }
            Ok(Command::InitConfig { fixtures_dir, path })
        }
        other => bail!("unknown command {other}"),
    }
}

/// Reads, decodes and normalizes a fixture. `null` fixtures are absent trees.
fn load_tree(config: &Config, fixture: &Path) -> Result<Option<VNode>> {
    let fixture = config.resolve_fixture(fixture);
    log::info!("Loading fixture {}", fixture.display());
    let json = fs::read_to_string(&fixture)
        .with_context(|| format!("failed to read fixture {}", fixture.display()))?;
    let tree = decode::from_str(&json)
        .with_context(|| format!("failed to decode fixture {}", fixture.display()))?;
    normalize(tree).with_context(|| format!("failed to normalize fixture {}", fixture.display()))
}

fn run(command: Command, config: &Config) -> Result<String> {
    match command {
        Command::Snapshot {
            fixture,
            pretty,
            keys,
        } => {
            let tree = load_tree(config, &fixture)?;
            let options = SnapshotOptions {
                format: if pretty {
                    TextFormat::Pretty
                } else {
                    config.snapshot.format
                },
                include_keys: keys || config.snapshot.include_keys,
                ..config.snapshot.clone()
            };
            Ok(to_json_string_with(tree.as_ref(), &options)?)
        }
        Command::Html { fixture } => match load_tree(config, &fixture)? {
            Some(tree) => Ok(to_html(&tree)?),
            None => Ok(String::new()),
        },
        Command::Event {
            fixture,
            path,
            event,
            payload,
        } => {
            let Some(tree) = load_tree(config, &fixture)? else {
                bail!("fixture {} is an empty tree", fixture.display());
            };
            let message = simulate(&tree, &path, &event, &payload)?;
            Ok(message.to_string())
        }
        Command::InitConfig { fixtures_dir, path } => {
            let new_config = Config {
                fixtures_dir: fixtures_dir.or_else(|| config.fixtures_dir.clone()),
                snapshot: config.snapshot.clone(),
            };
            let written = match &path {
                Some(path) => new_config.save_to_path(path),
                None => new_config.save(),
            };
            let path = path.unwrap_or_else(Config::config_path);
            written.with_context(|| format!("failed to write config to {}", path.display()))?;
            log::info!("Wrote config file {}", path.display());
            Ok(format!("Wrote {}", path.display()))
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("vdom-snapshot-cli");

    let config = match Config::load() {
        Ok(Some(config)) => {
            log::info!("Using config file {}", Config::config_path().display());
            config
        }
        Ok(None) => Config::default(),
        Err(e) => {
            log::warn!("Ignoring config file: {e}");
            Config::default()
        }
    };

    let command = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", usage(program));
            process::exit(1);
        }
    };

    let output = run(command, &config)?;
    println!("{output}");
    Ok(())
}
