use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use svgpdf::{AddSvg, ConvertOptions, Document, PdfConfig, PdfSurface, RecordingSurface, StateScoping};

/// Convert a simple SVG document into a single-page PDF
#[derive(Parser, Debug)]
#[command(name = "svgpdf", version, about)]
struct Args {
    /// Input SVG file
    input: PathBuf,

    /// Output PDF path (defaults to the input path with a .pdf extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON options file (`removeInvalid`, `scale`, `x_offset`, `y_offset`, `scoping`)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Uniform coordinate multiplier
    #[arg(long)]
    scale: Option<f64>,

    /// Delete elements that can't be translated
    #[arg(long)]
    remove_invalid: bool,

    /// Restore colors, line width and font when a group ends
    #[arg(long)]
    isolate_groups: bool,

    /// Placement offset recorded with the conversion
    #[arg(long, default_value_t = 0.0)]
    x: f64,

    #[arg(long, default_value_t = 0.0)]
    y: f64,

    /// Page width in points
    #[arg(long)]
    page_width: Option<f32>,

    /// Page height in points
    #[arg(long)]
    page_height: Option<f32>,

    /// Size the page from the root's width/height (times the scale);
    /// --page-width / --page-height still win
    #[arg(long)]
    fit_page: bool,

    /// Also write the drawing-command log as JSON
    #[arg(long)]
    commands: Option<PathBuf>,

    /// Also write the pruned SVG tree
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Print the PDF as a base64 data URI instead of writing a file
    #[arg(long)]
    data_uri: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "svgpdf=info",
        1 => "svgpdf=debug",
        _ => "svgpdf=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(args: &Args) -> Result<ConvertOptions> {
    let mut opts = match &args.options {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading options {}", path.display()))?;
            ConvertOptions::from_json(&json)?
        }
        None => ConvertOptions::default(),
    };
    if let Some(scale) = args.scale {
        opts.scale = scale;
    }
    if args.remove_invalid {
        opts.remove_invalid = true;
    }
    if args.isolate_groups {
        opts.scoping = StateScoping::Isolated;
    }
    opts.validate()?;
    Ok(opts)
}

fn run(args: Args) -> Result<()> {
    let opts = load_options(&args)?;
    let svg = fs::read_to_string(&args.input).with_context(|| format!("reading {}", args.input.display()))?;

    let mut doc = Document::parse(&svg)?;

    let mut page = PdfConfig::default();
    if args.fit_page {
        match doc.size() {
            (w, h) if w.is_finite() && h.is_finite() => {
                page.page_width = (w * opts.scale) as f32;
                page.page_height = (h * opts.scale) as f32;
            }
            _ => log::warn!("root has no usable width/height; keeping the default page size"),
        }
    }
    if let Some(w) = args.page_width {
        page.page_width = w;
    }
    if let Some(h) = args.page_height {
        page.page_height = h;
    }
    page.title = args.input.file_stem().map(|s| s.to_string_lossy().into_owned());

    if let Some(path) = &args.commands {
        let mut doc = doc.clone();
        let mut recording = RecordingSurface::new();
        recording.add_svg(doc.root_mut(), args.x, args.y, Some(opts.clone()));
        fs::write(path, recording.to_json()?).with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote {} command(s) to {}", recording.commands().len(), path.display());
    }

    let mut surface = PdfSurface::new(page);
    surface.add_svg(doc.root_mut(), args.x, args.y, Some(opts));
    if surface.skipped() > 0 {
        log::warn!("{} draw call(s) had non-finite coordinates and were dropped", surface.skipped());
    }

    if let Some(path) = &args.preview {
        fs::write(path, doc.to_svg_string()?).with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote pruned SVG to {}", path.display());
    }

    if args.data_uri {
        println!("{}", surface.to_data_uri());
        return Ok(());
    }

    let output = args.output.clone().unwrap_or_else(|| args.input.with_extension("pdf"));
    let bytes = surface.finish();
    fs::write(&output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    log::info!("wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    if let Err(e) = run(args) {
        eprintln!("svgpdf failed: {:#}", e);
        std::process::exit(1);
    }
}
