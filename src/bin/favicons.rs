use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use favicons::{ColorSpec, Favicons, FaviconsOpts};

#[derive(Parser, Debug)]
#[command(name = "favicons", version)]
struct Cli {
    /// Log per-variant progress.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every favicon variant into an output directory.
    Generate(GenerateArgs),
    /// Print one `<link>` element per variant.
    Html(HtmlArgs),
    /// Print the variant catalog as JSON.
    Json(JsonArgs),
    /// Print variant filenames.
    Names(NamesArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Source image (svg, png, jpg/jpeg, tif/tiff).
    #[arg(long)]
    source: PathBuf,

    /// Output directory, created if missing.
    #[arg(long)]
    out: PathBuf,

    /// JSON options file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Background color: hex, CSS name, or `r,g,b[,a]`.
    #[arg(long)]
    background: Option<String>,

    /// Fill the background canvas opaquely instead of leaving it transparent.
    #[arg(long, default_value_t = false)]
    opaque: bool,

    /// Base URL for generated links.
    #[arg(long)]
    base_url: Option<String>,

    /// Render variants in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct HtmlArgs {
    /// Base URL for hrefs.
    #[arg(long, default_value = "/")]
    base_url: String,
}

#[derive(Parser, Debug)]
struct JsonArgs {
    /// Indent the output.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct NamesArgs {
    /// Prefix each name with the base URL.
    #[arg(long, default_value_t = false)]
    prefix: bool,

    /// Base URL used with `--prefix`.
    #[arg(long, default_value = "/")]
    base_url: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Html(args) => cmd_html(args),
        Command::Json(args) => cmd_json(args),
        Command::Names(args) => cmd_names(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut opts = match &args.config {
        Some(path) => FaviconsOpts::from_json_path(path)?,
        None => FaviconsOpts::default(),
    };
    if let Some(bg) = &args.background {
        opts.background = parse_color_arg(bg)?;
    }
    if args.opaque {
        opts.transparent = false;
    }
    if let Some(base_url) = args.base_url {
        opts.base_url = base_url;
    }
    if args.threads.is_some() {
        opts.threads = args.threads;
    }

    let parallel = args.parallel;
    let written = Favicons::scoped(&args.source, &args.out, opts, |fav| {
        if parallel {
            fav.generate_concurrent()
        } else {
            fav.generate_sync()
        }
    })
    .with_context(|| format!("generate favicons from '{}'", args.source.display()))?;

    for path in &written {
        println!("{}", path.display());
    }
    tracing::info!(count = written.len(), out = %args.out.display(), "wrote favicons");
    Ok(())
}

fn cmd_html(args: HtmlArgs) -> anyhow::Result<()> {
    for line in favicons::links(favicons::catalog(), &args.base_url) {
        println!("{line}");
    }
    Ok(())
}

fn cmd_json(args: JsonArgs) -> anyhow::Result<()> {
    println!("{}", favicons::formats_json(favicons::catalog(), args.pretty)?);
    Ok(())
}

fn cmd_names(args: NamesArgs) -> anyhow::Result<()> {
    for name in favicons::filenames(favicons::catalog(), &args.base_url, args.prefix) {
        println!("{name}");
    }
    Ok(())
}

fn parse_color_arg(s: &str) -> anyhow::Result<ColorSpec> {
    if s.contains(',') {
        let channels = s
            .split(',')
            .map(|c| {
                c.trim()
                    .parse::<i64>()
                    .with_context(|| format!("invalid color channel '{c}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        return Ok(ColorSpec::from_channels(&channels)?);
    }
    Ok(ColorSpec::parse(s)?)
}
