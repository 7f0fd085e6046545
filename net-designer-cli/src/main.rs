use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use net_designer::render::{JsonRenderer, Renderer, TorchRenderer};
use net_designer::{presets, ArchitectureBuilder, DesignPlan};

mod report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Torch,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Design layered networks and render them as scripts")]
struct Args {
    /// Built-in architecture to render
    #[arg(short, long, conflicts_with = "plan")]
    preset: Option<String>,

    /// JSON plan describing the architecture
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Output syntax
    #[arg(short, long, value_enum, default_value = "torch")]
    format: Format,

    /// Write the rendered model here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Leave out the `-- WxH -> W'xH'` comments
    #[arg(long)]
    no_shape_comments: bool,

    /// Print the shape history and warnings before the model
    #[arg(short, long)]
    summary: bool,

    /// List the built-in architectures and exit
    #[arg(long)]
    list_presets: bool,
}

fn load(args: &Args) -> Result<ArchitectureBuilder> {
    if let Some(path) = &args.plan {
        log::info!("loading plan {}", path.display());
        let plan = DesignPlan::load(path)
            .with_context(|| format!("loading plan `{}`", path.display()))?;
        return plan
            .build()
            .with_context(|| format!("building plan `{}`", path.display()));
    }

    let name = match &args.preset {
        Some(name) => name,
        None => bail!("pass --preset <NAME> or --plan <FILE>"),
    };
    log::info!("building preset {name}");
    match presets::by_name(name) {
        Some(builder) => builder.with_context(|| format!("building preset `{name}`")),
        None => bail!(
            "unknown preset `{name}`, expected one of: {}",
            presets::PRESETS.join(", ")
        ),
    }
}

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    if args.list_presets {
        for name in presets::PRESETS {
            println!("{name}");
        }
        return Ok(());
    }

    let builder = load(&args)?;
    let design = builder.finalize();
    for warning in &design.warnings {
        log::warn!("{warning}");
    }

    if args.summary {
        report::print_summary(&builder);
    }

    let rendered = match args.format {
        Format::Torch => TorchRenderer::default()
            .with_shape_comments(!args.no_shape_comments)
            .render(&design)?,
        Format::Json => JsonRenderer::new(true).render(&design)?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("writing `{}`", path.display()))?;
            log::info!("saved to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
