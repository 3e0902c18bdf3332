use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use avatar_cache::application::{AvatarContext, AvatarResolver, CacheMaintenance};
use avatar_cache::domain::entities::{
    AvatarRequest, IdentityHash, IdentityKind, ResolveArgs, UploadedImage,
};
use avatar_cache::infrastructure::{
    AppConfig, CliArgs, Command, FileSettingsStore, ResolveCommand, StorageManager,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<(AppConfig, StorageManager)> {
    let storage = match args.config.as_deref().and_then(std::path::Path::parent) {
        Some(dir) if !dir.as_os_str().is_empty() => StorageManager::with_dir(dir.to_path_buf()),
        _ => StorageManager::new()?,
    };

    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok((config, storage))
}

async fn resolve(context: &AvatarContext, command: ResolveCommand) -> Result<String> {
    let hash = match (&command.hash, &command.identifier) {
        (Some(hash), _) => {
            IdentityHash::parse(hash).ok_or_else(|| eyre!("invalid identity hash: {hash}"))?
        }
        (None, Some(identifier)) => context.hasher.get_hash(identifier).await?,
        (None, None) => return Err(eyre!("either --hash or --identifier is required")),
    };

    let mut request = AvatarRequest::new(command.avatar_type, hash, command.size)
        .with_force(command.force);
    if let Some(rating) = &command.rating {
        request = request.with_rating(rating);
    }
    if let Some(mimetype) = command.mimetype {
        request = request.with_mimetype(mimetype);
    }

    let mut args = ResolveArgs::default();
    if let Some(identifier) = command.identifier {
        args = args.with_identifier(identifier);
    }
    if let Some(file) = command.upload {
        args = args.with_upload(UploadedImage::new(file, command.upload_mimetype));
    }
    if command.registered {
        args = args.with_identity(IdentityKind::Registered);
    }

    let resolver = AvatarResolver::new(context);
    Ok(resolver.resolve(&request, args, &command.default_url).await)
}

async fn run(args: CliArgs, config: AppConfig, storage: StorageManager) -> Result<()> {
    let settings = Arc::new(FileSettingsStore::open(
        storage,
        &config.gravatar.default_rating,
    )?);
    let context = AvatarContext::from_config(&config, settings).await?;
    let maintenance = CacheMaintenance::new(context.cache.clone(), context.registry.clone());

    match args.command {
        Command::Hash { identifier, remote } => {
            if remote {
                println!("{}", context.hasher.get_remote_hash(&identifier));
            } else {
                println!("{}", context.hasher.get_hash(&identifier).await?);
            }
        }
        Command::Resolve(command) => {
            println!("{}", resolve(&context, command).await?);
        }
        Command::Invalidate { hash } => {
            let hash =
                IdentityHash::parse(&hash).ok_or_else(|| eyre!("invalid identity hash: {hash}"))?;
            let removed = maintenance.invalidate_user_avatar(&hash).await;
            println!("{removed}");
        }
        Command::Sweep { max_age_secs } => {
            let remote = max_age_secs.unwrap_or(config.maintenance.remote_max_age_secs);
            let generated = max_age_secs.unwrap_or(config.maintenance.generated_max_age_secs);
            let removed = maintenance.sweep_stale(Duration::from_secs(remote)).await
                + maintenance
                    .sweep_generated(Duration::from_secs(generated))
                    .await;
            println!("{removed}");
        }
        Command::Providers => {
            for (name, label) in context.registry.descriptors() {
                println!("{name}\t{label}");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let (config, storage) = load_config(&args)?;
    init_logging(&config)?;

    info!(version = avatar_cache::VERSION, "Starting {}", avatar_cache::NAME);

    run(args, config, storage).await
}
