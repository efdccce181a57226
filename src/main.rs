use clap::{Parser, Subcommand};
use gallery_index::{config, loader::GalleryLoader, output};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Shared flags for commands that print a view.
#[derive(clap::Args, Clone, Copy)]
struct ViewArgs {
    /// Print JSON in the shape page templates consume
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
#[command(name = "gallery-index")]
#[command(about = "Image inventory and tag index for static gallery builds")]
#[command(long_about = "\
Image inventory and tag index for static gallery builds

Images come from exactly one source:

  LOCAL_SOURCE=photos        Local directory (relative to the working directory)
  R2_* variables             Cloudflare R2 bucket (default when LOCAL_SOURCE is unset)

R2 mode needs R2_ACCOUNT_ID, R2_ACCESS_KEY_ID, R2_SECRET_ACCESS_KEY and
R2_BUCKET_NAME. Set R2_PUBLIC_DOMAIN to serve public URLs instead of
one-hour presigned links.

Each image is tagged with its containing folder:

  photos/
  ├── a.jpg                  # no tags
  └── nature/
      └── b.png              # tag: nature

Descriptions and credits come from _data/image_metadata.json, keyed by
image path. Settings can also live in gallery.toml; environment variables
win. Run 'gallery-index gen-config' for a documented template.")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to ./gallery.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Metadata JSON file, overriding the configured path
    #[arg(long, global = true)]
    metadata: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every image in display order
    Images(ViewArgs),
    /// List distinct tags
    Tags(ViewArgs),
    /// List images grouped by tag
    Groups(ViewArgs),
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "gallery_index=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let loader = build_loader(&cli);

    match cli.command {
        Command::Images(args) => {
            let images = loader.images().await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&*images)?);
            } else {
                output::print_images(&images);
            }
        }
        Command::Tags(args) => {
            let tags = loader.tags().await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&tags)?);
            } else {
                output::print_tags(&tags);
            }
        }
        Command::Groups(args) => {
            let groups = loader.tag_groups().await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                output::print_tag_groups(&groups);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Loader over the environment, with the `--metadata` flag layered on top.
fn build_loader(cli: &Cli) -> GalleryLoader {
    let config_file = cli.config.clone();
    match cli.metadata.clone() {
        None => GalleryLoader::from_env(config_file),
        Some(metadata_path) => GalleryLoader::new(
            move |base| {
                let mut settings = config::from_env(config_file.as_deref(), base)?;
                settings.metadata_path = metadata_path.clone();
                Ok(settings)
            },
            std::sync::Arc::new(gallery_index::storage::R2Connector),
        ),
    }
}
