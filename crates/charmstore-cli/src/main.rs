use std::{env, fs};

use charmstore_api::{ApiContext, ApiHandler};
use charmstore_config::{
    config::{self, config_path, generate_default_config, get_config, set_config_path, Config},
    error::ConfigError,
};
use charmstore_core::{
    auth::Identity,
    database::store::ListFilter,
    error::{CatalogError, ErrorContext},
    CatalogResult,
};
use charmstore_utils::path::resolve_path;
use clap::Parser;
use cli::{Args, Commands};
use logging::setup_logging;
use tracing::{info, warn};

mod cli;
mod get;
mod list;
mod logging;
mod publish;
mod resolve;
mod utils;

fn show_config() -> CatalogResult<()> {
    let config_path = config_path();
    let content = match fs::read_to_string(&config_path) {
        Ok(v) => v,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("Config file {} not found", config_path.display());
            let def_config = Config::default_config();
            toml::to_string_pretty(&def_config).map_err(ConfigError::from)?
        }
        Err(err) => {
            return Err(CatalogError::IoError {
                action: "reading config".to_string(),
                source: err,
            });
        }
    };
    info!("{}", content);
    Ok(())
}

fn show_env() -> CatalogResult<()> {
    let config = get_config();

    info!("CHARMSTORE_CONFIG={}", config_path().display());
    info!("CHARMSTORE_ROOT={}", config.get_root_path()?.display());
    info!("CHARMSTORE_DB={}", config.get_db_path()?.display());
    Ok(())
}

async fn handle_cli() -> CatalogResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        utils::disable_color();
    }

    if let Some(ref c) = args.config {
        let path = resolve_path(c)?;
        let path = if path.is_absolute() {
            path
        } else {
            env::current_dir()
                .with_context(|| "retrieving current directory".into())?
                .join(path)
        };
        set_config_path(path);
    }

    let identity = Identity::from_user(args.as_user.clone());

    match args.command {
        Commands::DefConfig => generate_default_config()?,
        Commands::Config => show_config()?,
        command => {
            config::init()?;
            let ctx = ApiContext::new(get_config());

            match command {
                Commands::Env => show_env()?,
                Commands::Publish {
                    reference,
                    archive,
                    extra,
                } => publish::publish_archive(&ctx, &reference, &archive, &extra)?,
                Commands::Resolve {
                    references,
                } => resolve::resolve_references(&ctx, &references).await?,
                Commands::RevisionInfo {
                    reference,
                } => resolve::revision_info(&ctx, &reference, &identity)?,
                Commands::Get {
                    paths,
                } => {
                    let handler = ApiHandler::new(ctx.clone());
                    get::serve_paths(&handler, paths, &identity).await?;
                }
                Commands::List {
                    name,
                    user,
                    series,
                    limit,
                } => {
                    list::list_entities(
                        &ctx,
                        ListFilter {
                            name: name.as_deref(),
                            user: user.as_deref(),
                            series: series.as_deref(),
                            limit,
                        },
                    )?;
                }
                Commands::Grant {
                    reference,
                    users,
                    everyone,
                } => publish::grant(&ctx, &reference, users, everyone)?,
                Commands::DefConfig | Commands::Config => unreachable!(),
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli().await {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
