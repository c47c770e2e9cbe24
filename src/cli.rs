use crate::chart::{FamilyChart, JsonPersonStore};
use crate::config::load_config;
use crate::layout_dump::write_layout_dump;
use crate::render::write_output_svg;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "kintree", version, about = "Family descent chart renderer")]
pub struct Args {
    /// Input family tree (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON/JSON5 file (theme and layout overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Person id to highlight as the focus of the chart
    #[arg(long = "focus")]
    pub focus: Option<String>,

    /// People roster (.json array). When given, --focus is resolved through
    /// it and an unknown id leaves the chart unhighlighted.
    #[arg(long = "roster")]
    pub roster: Option<PathBuf>,

    /// Write the solved geometry as JSON (debugging)
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Rasterization width for PNG output
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Rasterization height for PNG output
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    let input = read_input(args.input.as_deref())?;
    let tree: serde_json::Value = serde_json::from_str(&input)?;

    let mut chart = FamilyChart::from_value(&tree, config.layout.clone(), config.theme.clone())?;
    if let Some(focus) = args.focus.as_deref() {
        match load_roster(args.roster.as_deref())? {
            Some(store) => {
                chart.activate_node(focus, &store);
            }
            None => chart.highlight_node(focus),
        }
    }
    let svg = chart.draw_svg();

    if let Some(dump_path) = args.dump_layout.as_deref() {
        write_layout_dump(dump_path, chart.root())?;
    }

    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            #[cfg(feature = "png")]
            {
                let output = ensure_output(&args.output, "png")?;
                crate::render::write_output_png(&svg, &output, &config.render)?;
            }
            #[cfg(not(feature = "png"))]
            {
                return Err(anyhow::anyhow!(
                    "PNG output requires the `png` feature"
                ));
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn load_roster(path: Option<&Path>) -> Result<Option<JsonPersonStore>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let contents = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    Ok(Some(JsonPersonStore::from_value(value)?))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(feature = "png")]
fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
