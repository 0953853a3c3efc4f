use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};

mod assets;
mod catalog;
mod navigation;
mod screen;
mod session;
mod speech;

use assets::{image_report, AssetLocator, ImageStatus};
use catalog::{BundledCatalog, Catalog, FileCatalog};
use session::Session;
use speech::{EspeakService, Speaker};

#[derive(Parser, Debug)]
#[command(name = "mflash", about = "Marathi vocabulary flashcards", version)]
struct Args {
    /// Base path prefixed to every image path
    #[arg(long, env = "MFLASH_BASE_PATH", default_value = "/")]
    base_path: String,

    /// Local directory holding the images; missing ones show a placeholder
    #[arg(long, env = "MFLASH_ASSETS_DIR")]
    assets_dir: Option<PathBuf>,

    /// Load cards from this JSON file instead of the bundled set
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Start on this category
    #[arg(short, long)]
    category: Option<String>,

    /// Never try to speak
    #[arg(long)]
    no_speech: bool,

    /// List categories and exit
    #[arg(short, long, default_value = "false")]
    list: bool,

    /// Report which card images exist under the assets directory and exit
    #[arg(long, requires = "assets_dir")]
    images: bool,
}

fn load_catalog(data: Option<&Path>) -> Result<Catalog> {
    let catalog = match data {
        Some(path) => Catalog::load(&FileCatalog::new(path)),
        None => Catalog::load(&BundledCatalog),
    };
    catalog.context("Failed to load flashcard catalog")
}

fn print_categories(catalog: &Catalog) {
    for category in catalog.categories() {
        println!("{} {} ({})", category.icon, category.name, category.count);
    }
}

fn print_image_report(catalog: &Catalog, assets_dir: &Path) {
    let entries = image_report(catalog, assets_dir);
    for entry in &entries {
        let label = match entry.status {
            ImageStatus::Present => "ok",
            ImageStatus::Frozen => "frozen",
            ImageStatus::Missing => "missing",
        };
        println!("{:<8} {:<16} {}", label, entry.card.english, entry.file.display());
        if entry.status == ImageStatus::Missing {
            if let Some(prompt) = &entry.card.image_prompt {
                println!("         prompt: {}", prompt);
            }
        }
    }

    let count = |status: ImageStatus| entries.iter().filter(|e| e.status == status).count();
    println!(
        "\n{} present, {} frozen, {} missing",
        count(ImageStatus::Present),
        count(ImageStatus::Frozen),
        count(ImageStatus::Missing)
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let catalog = load_catalog(args.data.as_deref())?;

    if args.list {
        print_categories(&catalog);
        return Ok(());
    }

    if args.images {
        if let Some(dir) = &args.assets_dir {
            print_image_report(&catalog, dir);
        }
        return Ok(());
    }

    let speech = if args.no_speech {
        None
    } else {
        let detected = EspeakService::detect();
        if detected.is_none() {
            log::info!("no espeak-ng or espeak found, speech disabled");
        }
        detected
    };

    println!(
        "Loaded {} flashcards in {} categories.",
        catalog.len(),
        catalog.categories().len()
    );
    println!("Type '\\h' for commands.");

    let assets = AssetLocator::new(args.base_path, args.assets_dir);
    let mut session = Session::new(catalog, assets, Speaker::new(speech));

    if let Some(name) = &args.category {
        if !session.open_category(name) {
            eprintln!("Warning: Category '{}' not found.", name);
        }
    }

    session.run(io::stdin().lock(), io::stdout().lock())?;

    Ok(())
}
