use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use svg2res::archive::ZipArchiveBuilder;
use svg2res::catalog::DensitySelection;
use svg2res::config::{self, AppConfig};
use svg2res::descriptor::ConversionDescriptor;
use svg2res::export::ExportRequest;
use svg2res::imaging::ResvgBackend;
use svg2res::{naming, output, source};

/// Image selection and export settings shared by `plan` and `export`.
#[derive(clap::Args, Clone)]
struct ExportArgs {
    /// SVG files, or directories searched recursively for them
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Density to render; repeat for several (default: from config)
    #[arg(long = "density", value_name = "NAME")]
    densities: Vec<String>,

    /// Output format: WEBP, PNG or JPEG
    #[arg(long)]
    format: Option<String>,

    /// Quality percentage, 0-100
    #[arg(long)]
    quality: Option<String>,

    /// Directory template inside res/, e.g. "drawable-ja-{}-v29"
    #[arg(long)]
    directory: Option<String>,

    /// Resource name for a source, by file stem; repeatable
    #[arg(long, value_name = "STEM=NAME", value_parser = parse_rename)]
    rename: Vec<(String, String)>,
}

#[derive(Parser)]
#[command(name = "svg2res")]
#[command(about = "Export SVG images as Android density bitmaps in a res.zip")]
#[command(long_about = "\
Export SVG images as Android density bitmaps in a res.zip

Every image is rasterized natively at each selected density and packed into
one archive, ready to unzip over an Android project:

  res/
  ├── drawable-mdpi/
  │   └── ic_home.webp        # x1
  ├── drawable-hdpi/
  │   └── ic_home.webp        # x1.5
  └── drawable-xhdpi/
      └── ic_home.webp        # x2

Resource names default to the file stem with anything outside [A-Za-z0-9_]
replaced by an underscore. Use --rename to pick another.

Run 'svg2res gen-config' to generate a documented svg2res.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./svg2res.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log each render to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List densities, marking the configured selection
    Densities,
    /// List image formats
    Formats,
    /// Show the archive entries an export would write, without rendering
    Plan {
        #[command(flatten)]
        args: ExportArgs,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render every image and write the archive
    Export {
        #[command(flatten)]
        args: ExportArgs,
        /// Archive path (default: from config, res.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a stock svg2res.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Densities => {
            let config = load_app_config(cli.config.as_deref())?;
            output::print_density_catalog(&config.export.density_selection()?);
        }
        Command::Formats => {
            output::print_format_catalog();
        }
        Command::Plan { args, json } => {
            let config = load_app_config(cli.config.as_deref())?;
            let request = build_request(&args, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&request.plan())?);
            } else {
                output::print_plan(&request);
            }
        }
        Command::Export {
            args,
            output: archive_path,
        } => {
            let config = load_app_config(cli.config.as_deref())?;
            let request = build_request(&args, &config)?;
            for (path, times) in request.collisions() {
                eprintln!("Warning: {path} is written {times} times; the last image wins");
            }

            init_thread_pool(&config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_export_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = request.run(&ResvgBackend::new(), &ZipArchiveBuilder::new(), Some(&tx));
            drop(tx);
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let archive = result?;

            let path = archive_path.unwrap_or_else(|| PathBuf::from(&config.export.output));
            std::fs::write(&path, &archive)?;
            println!("==> Wrote {}", path.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings only, or debug output for this crate with `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "svg2res=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .init();
}

fn load_app_config(path: Option<&Path>) -> Result<AppConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        tracing::warn!(threads, error = %e, "rayon thread pool already initialized");
    }
}

fn parse_rename(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((stem, name)) if !stem.is_empty() => Ok((stem.to_string(), name.to_string())),
        _ => Err(format!("expected STEM=NAME, got {arg:?}")),
    }
}

/// Load the sources, apply flags over config, and pass everything through the export gate.
fn build_request(
    args: &ExportArgs,
    config: &AppConfig,
) -> Result<ExportRequest, Box<dyn std::error::Error>> {
    let sources = source::load_sources(&args.inputs)?;

    let densities = if args.densities.is_empty() {
        config.export.density_selection()?
    } else {
        DensitySelection::from_names(args.densities.as_slice())?
    };
    let format = args.format.as_deref().unwrap_or(&config.export.format);
    let quality = args
        .quality
        .clone()
        .unwrap_or_else(|| config.export.quality.to_string());

    let mut renames: HashMap<&str, &str> = args
        .rename
        .iter()
        .map(|(stem, name)| (stem.as_str(), name.as_str()))
        .collect();

    let mut descriptors = Vec::with_capacity(sources.len());
    for source in sources {
        let name = match renames.remove(source.display_name.as_str()) {
            Some(name) => name.to_string(),
            None => naming::suggest_resource_name(&source.display_name),
        };
        let descriptor = ConversionDescriptor::new(source)
            .with_name(Some(name))
            .with_format(format)?
            .with_quality_text(Some(quality.clone()));
        descriptors.push(descriptor);
    }
    for stem in renames.keys() {
        tracing::warn!(stem, "--rename matched no source");
    }

    let directory = args.directory.as_deref().unwrap_or(&config.export.directory);
    Ok(ExportRequest::validate(
        descriptors,
        densities,
        Some(directory),
    )?)
}
