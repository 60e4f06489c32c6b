mod cli;

use textless::{
    config,
    item::{BaseItem, ItemKind, MetadataProviderKind},
    metadata::provider::ImageType,
    server::{self, auth, AppContext},
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use tokio_util::sync::CancellationToken;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    config::apply_server_overrides(&mut config, host, port);
    config::validate_config(&config)?;

    tracing::info!("Starting Textless image provider");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!(
        exclude_text_less_images = config.plugin.exclude_text_less_images,
        auth_enabled = config.server.auth.enabled,
        "Plugin configuration loaded"
    );

    // PUT /textless/Configuration writes back to this file
    let resolved_config_path = config::find_config_path(config_path);
    match &resolved_config_path {
        Some(path) => tracing::info!("Persisting configuration changes to {:?}", path),
        None => tracing::warn!("No config file in use; configuration changes will not persist"),
    }

    server::start_server(config, resolved_config_path).await
}

struct ImagesArgs {
    item_type: String,
    tmdb_id: Option<String>,
    imdb_id: Option<String>,
    language: Option<String>,
    image_type: Option<String>,
    exclude_textless: Option<bool>,
    json: bool,
}

async fn list_images(args: ImagesArgs, config_path: Option<&std::path::Path>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    if let Some(exclude) = args.exclude_textless {
        config.plugin.exclude_text_less_images = exclude;
    }

    let kind: ItemKind = args.item_type.parse().map_err(anyhow::Error::msg)?;
    let image_type: Option<ImageType> = args
        .image_type
        .as_deref()
        .map(str::parse::<ImageType>)
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let language = args
        .language
        .unwrap_or_else(|| config.tmdb.default_language.clone());

    let mut item = BaseItem::new(kind, "").with_language(language);
    if let Some(id) = args.tmdb_id {
        item.set_provider_id(MetadataProviderKind::Tmdb, id);
    }
    if let Some(id) = args.imdb_id {
        item.set_provider_id(MetadataProviderKind::Imdb, id);
    }

    let ctx = AppContext::new(config, None)?;
    let result = ctx
        .registry
        .get_remote_images(&item, image_type, &CancellationToken::new())
        .await
        .context("Image lookup failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Images: {}", result.total_record_count);
    for image in &result.images {
        print!("  [{}] {}", image.image_type, image.url);
        if let Some(ref lang) = image.language {
            print!(" ({})", lang);
        }
        if let (Some(w), Some(h)) = (image.width, image.height) {
            print!(" {}x{}", w, h);
        }
        println!();
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "textless=trace,tower_http=debug".to_string()
        } else {
            "textless=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Images {
            item_type,
            tmdb_id,
            imdb_id,
            language,
            image_type,
            exclude_textless,
            json,
        } => {
            let args = ImagesArgs {
                item_type,
                tmdb_id,
                imdb_id,
                language,
                image_type,
                exclude_textless,
                json,
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(list_images(args, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("textless {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::GenerateApiKey => {
            println!("{}", auth::generate_api_key());
            Ok(())
        }
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Auth enabled: {}", config.server.auth.enabled);
            println!("  TMDb API key set: {}", !config.tmdb.api_key.is_empty());
            println!(
                "  Image sizes: poster={}, backdrop={}, logo={}",
                config.tmdb.poster_size, config.tmdb.backdrop_size, config.tmdb.logo_size
            );
            println!(
                "  Exclude textless images: {}",
                config.plugin.exclude_text_less_images
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}
