use crate::config::load_config;
use crate::dot::to_dot;
use crate::graph::build_graph;
use crate::highlight::highlight_sets;
use crate::layout::compute_layout;
use crate::layout_dump::{layout_dump_json, write_layout_dump};
use crate::parser::parse_dmrs;
use crate::render::{render_svg, write_output_svg};
use crate::xml_dump::dump_dmrs;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "dmrsr", version, about = "Render DMRS graphs as arc diagrams")]
pub struct Args {
    /// Input DMRS XML file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for text formats if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, layout)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Node id to highlight (outbound, inbound, label set and scope)
    #[arg(short = 's', long = "select")]
    pub select: Option<i64>,

    /// PNG width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// PNG height
    #[arg(short = 'H', long = "height", default_value_t = 400.0)]
    pub height: f32,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
    Dot,
    Xml,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    let input = read_input(args.input.as_deref())?;
    let doc = parse_dmrs(&input).context("failed to parse DMRS input")?;

    let graph = build_graph(&doc, &config.theme, &config.layout)?;
    let layout = compute_layout(&graph, &config.theme, &config.layout);
    info!(
        nodes = layout.nodes.len(),
        links = layout.links.len(),
        "laid out graph"
    );

    match args.output_format {
        OutputFormat::Json => match args.output.as_deref() {
            Some(path) => write_layout_dump(path, &layout)
                .with_context(|| format!("failed to write {}", path.display())),
            None => write_text(&layout_dump_json(&layout)?, None),
        },
        OutputFormat::Svg | OutputFormat::Png => {
            let highlight = match args.select {
                Some(node_id) => Some(
                    highlight_sets(&graph, node_id)
                        .ok_or_else(|| anyhow::anyhow!("no node with id {node_id}"))?,
                ),
                None => None,
            };
            let svg = render_svg(&layout, &config.theme, &config.render, highlight.as_ref());
            if args.output_format == OutputFormat::Svg {
                return write_output_svg(&svg, args.output.as_deref());
            }
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, &config.render)
        }
        OutputFormat::Dot => write_text(&to_dot(&doc), args.output.as_deref()),
        OutputFormat::Xml => write_text(&dump_dmrs(&doc), args.output.as_deref()),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, render: &crate::config::RenderConfig) -> Result<()> {
    crate::render::write_output_png(svg, output, render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _render: &crate::config::RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn write_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arguments() {
        let args = Args::try_parse_from([
            "dmrsr", "-i", "in.xml", "-e", "json", "--select", "10002", "-vv",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some(Path::new("in.xml")));
        assert_eq!(args.output_format, OutputFormat::Json);
        assert_eq!(args.select, Some(10002));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn accepts_xml_output_format() {
        let args = Args::try_parse_from(["dmrsr", "-e", "xml", "-o", "out.xml"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Xml);
        assert_eq!(args.output.as_deref(), Some(Path::new("out.xml")));
    }

    #[test]
    fn png_needs_an_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        assert_eq!(
            ensure_output(&Some(PathBuf::from("out.png")), "png").unwrap(),
            PathBuf::from("out.png")
        );
    }
}
