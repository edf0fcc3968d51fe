use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;

use detox_leadmagnet::assets::GuideImages;
use detox_leadmagnet::content;

/// Renders the Coral Detox lead magnet to a PDF file.
///
/// Fonts must be present under `assets/fonts` (see assets/fonts/README.md) or
/// provided via the `LEADMAGNET_FONTS_DIR` environment variable.  The guide
/// images are resolved the same way, via `LEADMAGNET_IMAGES_DIR` or the
/// `--images-dir` flag.
#[derive(Parser)]
#[command(author, version, about = "Generates the Coral Detox lead magnet PDF")]
struct Cli {
    /// Output path for the rendered document.
    #[arg(short = 'o', long, default_value = "detox-leadmagnet-v2.pdf")]
    out: PathBuf,

    /// Directory containing cover.jpg and the img_*.png product shots.
    #[arg(long)]
    images_dir: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let images = match &cli.images_dir {
        Some(directory) => GuideImages::load_from(directory)?,
        None => GuideImages::load()?,
    };

    let builder = content::leadmagnet(images)?;

    #[cfg(feature = "hyphenation")]
    let builder = {
        use hyphenation::{Language, Load, Standard};
        builder.with_hyphenator(Standard::from_embedded(Language::Russian)?)
    };

    #[cfg(feature = "bookmarks")]
    let pdf = builder.render_with_bookmarks()?;
    #[cfg(not(feature = "bookmarks"))]
    let pdf = builder.render()?;

    fs::write(&cli.out, &pdf.bytes)?;
    println!(
        "PDF created: {} ({} bytes)",
        cli.out.display(),
        pdf.bytes.len()
    );
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
