// Render a single verse frame to PNG without touching the network or the encoder

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ayah_reel::{
    config::Config,
    frame::{FrameCompositor, RenderSpec},
    quran::DisplayFields,
    text::FontSet,
};

#[derive(Parser)]
#[command(name = "preview_frame", about = "Render one verse frame to a PNG file")]
struct Args {
    /// Surah title line
    #[arg(long, default_value = "سورة الفاتحة - The Opening")]
    title: String,

    /// Verse number line
    #[arg(long, default_value = "Verse 1")]
    verse_label: String,

    /// Verse text in the source script
    #[arg(long, default_value = "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ")]
    text: String,

    /// Translation line
    #[arg(long, default_value = "In the Name of Allah, the Most Compassionate, Most Merciful.")]
    translation: String,

    /// Source-script font file; the built-in face when omitted
    #[arg(long)]
    font: Option<PathBuf>,

    /// Translation font file; defaults to --font
    #[arg(long)]
    translation_font: Option<PathBuf>,

    /// Configuration file supplying the [render] section
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for particles and rays
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Output PNG path
    #[arg(short, long, default_value = "preview_frame.png")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.validate()?;

    let fields = DisplayFields {
        title: args.title,
        verse_label: args.verse_label,
        source_text: args.text,
        translation: args.translation,
        footer: config.render.footer.clone(),
    };
    let fonts = FontSet {
        translation: args.translation_font.or_else(|| args.font.clone()),
        source: args.font,
    };

    println!("🖼️  Rendering {}x{} frame", config.render.width, config.render.height);
    let spec = RenderSpec::for_verse(&fields, &fonts, &config.render);
    for block in &spec.blocks {
        println!("   y={:>6.1} size={:>5.1} {:?}", block.center_y, block.initial_size, block.text);
    }

    let compositor = FrameCompositor::new(config.render.clone());
    let frame = compositor.compose_to_file(&spec, &args.output, &mut StdRng::seed_from_u64(args.seed))?;

    println!(
        "   📁 {}x{} frame saved to: {}",
        frame.width(),
        frame.height(),
        args.output.display()
    );
    Ok(())
}
