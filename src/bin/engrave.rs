use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "engrave", version)]
struct Cli {
    /// Filter capabilities (`none`, `filter`, `convolution`, `all`, comma-separated).
    /// Defaults to the ENGRAVE_CAPABILITIES environment variable.
    #[arg(long, global = true)]
    capabilities: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply one filter to an image.
    Filter(FilterArgs),
    /// Draw the engraving rows from a JSON config onto an image.
    Text(TextArgs),
}

#[derive(Args, Debug)]
struct Io {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image; the format follows the extension.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct FilterArgs {
    #[command(flatten)]
    io: Io,

    #[command(subcommand)]
    op: FilterOp,
}

#[derive(Subcommand, Debug)]
enum FilterOp {
    /// Luma grayscale.
    Grayscale,
    /// Grayscale with a warm brown cast.
    Sepia,
    /// Invert color channels.
    Invert,
    /// Laplacian edge detection.
    EdgeDetect,
    /// Mean removal sharpen.
    MeanRemoval,
    /// Add per-channel offsets.
    Colorize {
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        r: i32,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        g: i32,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        b: i32,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        a: i32,
    },
    /// Multiplicative tint toward a color.
    Grade {
        #[arg(long, value_parser = parse_color)]
        color: engrave::Color,
    },
    /// Replace whites with a color.
    Tint {
        #[arg(long, value_parser = parse_color)]
        color: engrave::Color,
    },
    /// Replace blacks with a color.
    Tone {
        #[arg(long, value_parser = parse_color)]
        color: engrave::Color,
    },
    /// Contrast, -100..=100 (negative is more contrast).
    Contrast {
        #[arg(long, allow_hyphen_values = true)]
        level: f32,
    },
    /// Fill square tiles with one color.
    Pixelate {
        #[arg(long)]
        block: i32,
        /// Average the whole tile instead of sampling its corner.
        #[arg(long)]
        advanced: bool,
    },
    /// Unsharp mask.
    Unsharp {
        #[arg(long, default_value_t = 80.0)]
        amount: f32,
        #[arg(long, default_value_t = 0.5)]
        radius: f32,
        #[arg(long, default_value_t = 3.0)]
        threshold: f32,
    },
    /// Multiply-blend another image on top.
    Overlay {
        #[arg(long)]
        top: PathBuf,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        x: i64,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        y: i64,
        /// Square the top factor.
        #[arg(long)]
        double: bool,
    },
    /// Take alpha from a mask image's alpha channel.
    Alpha {
        #[arg(long)]
        mask: PathBuf,
    },
    /// Take alpha from a mask image's luma (white keeps, black clears).
    Mask {
        #[arg(long)]
        mask: PathBuf,
    },
}

#[derive(Args, Debug)]
struct TextArgs {
    #[command(flatten)]
    io: Io,

    /// Engraving config JSON.
    #[arg(long)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let capability = match &cli.capabilities {
        Some(raw) => engrave::FilterCapability::parse(raw)?,
        None => engrave::FilterCapability::probe(),
    };

    match cli.cmd {
        Command::Filter(args) => cmd_filter(capability, args),
        Command::Text(args) => cmd_text(capability, args),
    }
}

fn parse_color(s: &str) -> Result<engrave::Color, String> {
    let t = s.trim();
    let hex = t
        .strip_prefix("0x")
        .or_else(|| t.strip_prefix("0X"))
        .or_else(|| t.strip_prefix('#'));
    let packed = match hex {
        Some(h) => u32::from_str_radix(h, 16),
        None => t.parse::<u32>(),
    }
    .map_err(|e| format!("invalid color '{s}': {e}"))?;
    Ok(engrave::Color::from_argb(packed))
}

fn read_buffer(path: &Path) -> anyhow::Result<engrave::RasterBuffer> {
    let img = image::open(path).with_context(|| format!("decode image '{}'", path.display()))?;
    Ok(engrave::RasterBuffer::from_dynamic(&img)?)
}

fn open_session(
    capability: engrave::FilterCapability,
    path: &Path,
) -> anyhow::Result<engrave::Session> {
    Ok(engrave::Session::with_buffer(
        capability,
        read_buffer(path)?,
    ))
}

fn write_session(session: &engrave::Session, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    session
        .export_image()?
        .save(out)
        .with_context(|| format!("write image '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_filter(capability: engrave::FilterCapability, args: FilterArgs) -> anyhow::Result<()> {
    let mut session = open_session(capability, &args.io.in_path)?;

    match args.op {
        FilterOp::Grayscale => session.grayscale()?,
        FilterOp::Sepia => session.sepia()?,
        FilterOp::Invert => session.invert()?,
        FilterOp::EdgeDetect => session.edge_detect()?,
        FilterOp::MeanRemoval => session.mean_removal()?,
        FilterOp::Colorize { r, g, b, a } => {
            session.colorize(engrave::ColorDelta { r, g, b, a })?;
        }
        FilterOp::Grade { color } => session.grade(color)?,
        FilterOp::Tint { color } => session.tint(color)?,
        FilterOp::Tone { color } => session.tone(color)?,
        FilterOp::Contrast { level } => session.contrast(level)?,
        FilterOp::Pixelate { block, advanced } => session.pixelate(block, advanced)?,
        FilterOp::Unsharp {
            amount,
            radius,
            threshold,
        } => session.unsharp_mask(amount, radius, threshold)?,
        FilterOp::Overlay { top, x, y, double } => {
            let top = read_buffer(&top)?;
            if double {
                session.double_overlay(&top, x, y)?;
            } else {
                session.overlay(&top, x, y)?;
            }
        }
        FilterOp::Alpha { mask } => session.apply_alpha(read_buffer(&mask)?)?,
        FilterOp::Mask { mask } => session.apply_mask(read_buffer(&mask)?)?,
    }

    write_session(&session, &args.io.out)
}

fn cmd_text(capability: engrave::FilterCapability, args: TextArgs) -> anyhow::Result<()> {
    let config = engrave::EngraveConfig::from_json_path(&args.config)?;
    let engraver = config
        .build_engraver(Box::new(engrave::ParleyGlyphs::new()))
        .with_context(|| format!("configure text from '{}'", args.config.display()))?;

    let mut session = open_session(capability, &args.io.in_path)?;
    session.attach_engraver(engraver);
    let drawn = session.engrave()?;
    tracing::info!(drawn, "engraved rows");

    write_session(&session, &args.io.out)
}
