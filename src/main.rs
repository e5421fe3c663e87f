//! CLI entry point for shiori
//!
//! Plays event scripts in the terminal and checks them for broken links.

use anyhow::{Context, bail};
use shiori::{
    cli,
    config::PlayerConfig,
    repository::{FileSystemScriptRepository, ScriptRepository},
    types::{ScriptDocument, Termination},
};
use std::io;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Debug, Default)]
struct Options {
    target: Option<PathBuf>,
    assets: Option<PathBuf>,
    config: Option<PathBuf>,
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let code = match command {
        "play" | "check" | "list" => match run(command, &args[2..]).await {
            Ok(code) => code,
            Err(err) => {
                eprintln!("Error: {err:#}");
                1
            }
        },
        "--help" | "-h" => {
            print_usage();
            0
        }
        _ => {
            eprintln!("Error: Unknown command '{}'", command);
            eprintln!();
            print_usage();
            1
        }
    };

    process::exit(code);
}

fn print_usage() {
    println!("shiori - Visual Novel Event Script Player");
    println!();
    println!("USAGE:");
    println!("    shiori <command> [options]");
    println!();
    println!("COMMANDS:");
    println!("    play <script.json>    Play a script in the terminal");
    println!("    check <script.json>   Report broken links and unreachable events");
    println!("    list <dir>            List scripts in a directory");
    println!("    --help, -h            Show this help message");
    println!();
    println!("OPTIONS:");
    println!("    --assets <dir>     Directory asset paths are relative to");
    println!("    --config <file>    JSON player configuration");
    println!("    --debug            Show interpreter state after every step");
    println!();
    println!("ENVIRONMENT:");
    println!("    SHIORI_ASSET_ROOT, SHIORI_LOG, SHIORI_DEBUG");
}

async fn run(command: &str, args: &[String]) -> anyhow::Result<i32> {
    let options = parse_options(args)?;
    let config = load_config(&options)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .init();

    let Some(target) = options.target else {
        bail!("Missing path for '{command}'");
    };

    match command {
        "play" => {
            let script = load_script(&target).await?;
            let termination =
                tokio::task::spawn_blocking(move || cli::run_play(script, &config)).await??;
            Ok(match termination {
                Termination::Completed | Termination::Cancelled => 0,
                Termination::ScriptError => 1,
            })
        }
        "check" => {
            let script = load_script(&target).await?;
            let result = cli::run_check(&script, &mut io::stdout().lock())?;
            Ok(if result.is_valid() { 0 } else { 1 })
        }
        _ => {
            let repository = FileSystemScriptRepository::new(&target);
            for id in repository.list_scripts().await? {
                println!("{id}");
            }
            Ok(0)
        }
    }
}

fn parse_options(args: &[String]) -> anyhow::Result<Options> {
    let mut options = Options::default();
    let mut args = args.iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--debug" => options.debug = true,
            "--assets" => {
                let Some(dir) = args.next() else {
                    bail!("--assets needs a directory");
                };
                options.assets = Some(PathBuf::from(dir));
            }
            "--config" => {
                let Some(file) = args.next() else {
                    bail!("--config needs a file");
                };
                options.config = Some(PathBuf::from(file));
            }
            flag if flag.starts_with("--") => bail!("Unknown option '{flag}'"),
            path => {
                if options.target.is_some() {
                    bail!("Unexpected argument '{path}'");
                }
                options.target = Some(PathBuf::from(path));
            }
        }
    }

    Ok(options)
}

/// File (or defaults), then environment, then command-line flags
fn load_config(options: &Options) -> anyhow::Result<PlayerConfig> {
    let base = match &options.config {
        Some(path) => PlayerConfig::from_file(path)?,
        None => PlayerConfig::default(),
    };
    let mut config = base.with_overrides(|name| std::env::var(name).ok())?;

    if let Some(assets) = &options.assets {
        config.asset_root = assets.clone();
    }
    if options.debug {
        config.debug = true;
    }
    Ok(config)
}

/// `<dir>/<id>.json` goes through the script repository; other paths are read directly
async fn load_script(path: &Path) -> anyhow::Result<ScriptDocument> {
    let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
    let id = path.file_stem().and_then(|stem| stem.to_str());

    match id {
        Some(id) if is_json => {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            FileSystemScriptRepository::new(dir)
                .load_script(id)
                .await
                .with_context(|| format!("Failed to load script '{}'", path.display()))
        }
        _ => shiori::parser::load_file(path)
            .with_context(|| format!("Failed to load script '{}'", path.display())),
    }
}
