use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use twill_image::{
    CompileOverrides, ImageCompiler, ImageConfig, Layout, Loading, config, output,
    parse_descriptor,
};

#[derive(Parser)]
#[command(name = "twill-image")]
#[command(about = "Compile responsive image descriptors into <picture> attribute bundles")]
#[command(long_about = "\
Compile responsive image descriptors into <picture> attribute bundles

A descriptor is the JSON produced by the asset layer: the default image with
its srcsets and optional LQIP payload, plus optional art-direction sources
keyed by media query.

  {
    \"image\": {\"src\": \"hero.jpg\", \"alt\": \"Harbour\", \"width\": 1600,
              \"height\": 900, \"aspectRatio\": 1.7778,
              \"srcSet\": \"hero-800.jpg 800w, hero-1600.jpg 1600w\",
              \"srcSetWebp\": \"hero-800.webp 800w, hero-1600.webp 1600w\",
              \"extension\": \"jpg\", \"lqipBase64\": \"data:image/gif;base64,...\"},
    \"sources\": [{\"mediaQuery\": \"(max-width: 600px)\", \"image\": {...}}]
  }

Defaults resolve as: command-line option → descriptor → config → computed.

Run 'twill-image gen-config' to generate a documented twill-image.toml.")]
#[command(version)]
struct Cli {
    /// Config file(s), layered in order. Defaults to ./twill-image.toml if present
    #[arg(long, global = true)]
    config: Vec<PathBuf>,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Per-image options, mirroring `CompileOverrides`.
#[derive(clap::Args, Clone)]
struct OverrideArgs {
    /// Layout strategy: fullWidth, constrained or fixed
    #[arg(long)]
    layout: Option<String>,
    #[arg(long, value_enum)]
    loading: Option<Loading>,
    /// Emit low-quality placeholders (true/false)
    #[arg(long)]
    lqip: Option<bool>,
    /// Explicit sizes attribute
    #[arg(long)]
    sizes: Option<String>,
    /// Extra wrapper class
    #[arg(long)]
    class: Option<String>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Wrapper background color (CSS)
    #[arg(long)]
    background_color: Option<String>,
}

impl From<OverrideArgs> for CompileOverrides {
    fn from(args: OverrideArgs) -> Self {
        CompileOverrides {
            background_color: args.background_color,
            layout: args.layout.map(Layout::from),
            loading: args.loading,
            lqip: args.lqip,
            sizes: args.sizes,
            class: args.class,
            width: args.width,
            height: args.height,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Compile a descriptor and print the render bundle as JSON
    Compile {
        /// Descriptor JSON file, or '-' for stdin
        descriptor: PathBuf,
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Print a readable summary instead of JSON
        #[arg(long)]
        summary: bool,
    },
    /// Validate a descriptor without compiling it
    Check {
        /// Descriptor JSON file, or '-' for stdin
        descriptor: PathBuf,
    },
    /// Print a stock twill-image.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Compile {
            descriptor,
            overrides,
            summary,
        } => {
            let image_config = resolve_config(&cli.config)?;
            let descriptor = parse_descriptor(&read_input(&descriptor)?)?;
            let compiler = ImageCompiler::new(image_config);
            let bundle = compiler.compile(&descriptor, &overrides.into())?;
            if summary {
                output::print_bundle(&bundle);
            } else {
                println!("{}", serde_json::to_string_pretty(&bundle)?);
            }
        }
        Command::Check { descriptor } => {
            let descriptor = parse_descriptor(&read_input(&descriptor)?)?;
            output::print_check(&descriptor);
            println!("==> Descriptor is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit `--config` files, else `./twill-image.toml`, else stock defaults.
fn resolve_config(paths: &[PathBuf]) -> Result<ImageConfig, config::ConfigError> {
    if paths.is_empty() {
        config::load_config(Path::new("."))
    } else {
        config::load_config_files(paths)
    }
}

fn read_input(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}
