use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use resolve_node::config::ServiceConfig;
use resolve_node::logging::{LogOptions, init_logging};
use resolve_node::resolve::types::ResolutionRequest;
use resolve_node::server::run_server;
use resolve_node::service::LookupService;

#[derive(Parser)]
#[command(name = "resolve-node")]
#[command(version, about = "Resolve Node.js version tags against the release indexes")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP lookup service (default)
    Serve {
        /// Address to listen on, overrides the configuration file
        #[arg(long)]
        bind: Option<String>,
    },
    /// Resolve a single tag and print the result
    Resolve(ResolveArgs),
}

#[derive(Args)]
struct ResolveArgs {
    /// Version tag, e.g. `lts`, `8.x`, `lts/carbon`
    #[arg(default_value = "*")]
    tag: String,

    /// Only consider security releases
    #[arg(long)]
    security: bool,

    #[arg(long)]
    platform: Option<String>,

    #[arg(long)]
    arch: Option<String>,

    /// Print the full release record as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let _guard = init_logging(&LogOptions {
        file: cli.log_file.clone(),
        json: cli.log_json,
    })?;

    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        None => runtime.block_on(run_server(config))?,
        Some(Command::Serve { bind }) => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            runtime.block_on(run_server(config))?
        }
        Some(Command::Resolve(args)) => return runtime.block_on(resolve_once(config, args)),
    }

    Ok(ExitCode::SUCCESS)
}

async fn resolve_once(config: ServiceConfig, args: ResolveArgs) -> anyhow::Result<ExitCode> {
    let service = LookupService::from_config(&config.catalogs)?;
    let request = ResolutionRequest {
        tag: args.tag,
        security_only: args.security,
        platform: args.platform,
        arch: args.arch,
    };

    let Some(result) = service.lookup(&request).await? else {
        eprintln!("No match found for {:?}", request.tag);
        return Ok(ExitCode::FAILURE);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.version());
        if let Some(url) = &result.url {
            println!("{}", url);
        }
    }

    Ok(ExitCode::SUCCESS)
}
