use anyhow::{Context, Result};
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode};
use std::env;
use std::fs;
use std::io::{self, Write};
use treecard::svg::render_svg;
use treecard::{read_tree, Detached, ExpansionPolicy, RendererConfig, TreeRenderer};

#[derive(Default)]
struct Config {
    input_file: Option<String>,
    output_file: Option<String>,
    config_file: Option<String>,
    width: Option<f32>,
    expansion: Option<ExpansionPolicy>,
}

fn parse_args() -> Result<Config> {
    let args: Vec<String> = env::args().collect();
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-out" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-out requires a file path argument");
                }
                config.output_file = Some(args[i].clone());
            }
            "-config" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-config requires a file path argument");
                }
                config.config_file = Some(args[i].clone());
            }
            "-width" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-width requires an argument");
                }
                let width: f32 = args[i].parse()?;
                if !width.is_finite() || width <= 0.0 {
                    anyhow::bail!("-width must be a positive number, got {}", args[i]);
                }
                config.width = Some(width);
            }
            "-expand" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-expand requires an argument");
                }
                let policy = ExpansionPolicy::parse(&args[i]).with_context(|| {
                    format!("Unknown expansion policy: {} (expected collapsed, expanded, depth:N or label:N)", args[i])
                })?;
                config.expansion = Some(policy);
            }
            "-h" | "-help" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') && config.input_file.is_none() => {
                config.input_file = Some(arg.to_string());
            }
            _ => {
                log::warn!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    Ok(config)
}

fn print_help() {
    println!("tree-card-svg - render a tree file to SVG");
    println!();
    println!("USAGE:");
    println!("    tree-card-svg <INPUT> [OPTIONS]");
    println!();
    println!("INPUT:");
    println!("    Nested JSON (.json) or parent-linked records (.jsonl)");
    println!("    A .br suffix reads Brotli-compressed input");
    println!();
    println!("OPTIONS:");
    println!("    -out <FILE>       Output file; stdout if omitted");
    println!("    -width <N>        Drawing width (default: 628)");
    println!("    -expand <POLICY>  collapsed, expanded, depth:N or label:N (default: label:7)");
    println!("    -config <FILE>    Renderer config as JSON; flags above override it");
    println!("    -h, --help        Print this help message");
}

fn load_renderer_config(config: &Config) -> Result<RendererConfig> {
    let mut renderer_config = match &config.config_file {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to open file: {}", path))?;
            RendererConfig::from_json_str(&json)
                .with_context(|| format!("Failed to parse renderer config: {}", path))?
        }
        None => RendererConfig::default(),
    };
    if let Some(width) = config.width {
        renderer_config.width = width;
    }
    if let Some(policy) = config.expansion {
        renderer_config.expansion = policy;
    }
    renderer_config
        .validate()
        .context("Invalid renderer config")?;
    Ok(renderer_config)
}

fn main() -> Result<()> {
    let _ = TermLogger::init(
        treecard::log_level(),
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let config = parse_args()?;
    let Some(input) = config.input_file.as_deref() else {
        print_help();
        anyhow::bail!("no input file given");
    };

    let renderer_config = load_renderer_config(&config)?;
    let data = read_tree(input)?;

    let mut renderer = TreeRenderer::new(Detached, renderer_config);
    renderer
        .render(&data)
        .with_context(|| format!("Failed to render {}", input))?;
    let frame = renderer
        .settled_frame()
        .context("Renderer produced no drawing")?;
    let svg = render_svg(&frame, renderer.config(), renderer.palette());

    let stats = renderer.stats();
    log::info!("{} nodes and {} links drawn", stats.nodes, stats.links);

    match &config.output_file {
        Some(path) => {
            fs::write(path, svg).with_context(|| format!("Failed to create file: {}", path))?;
            log::info!("SVG written to: {}", path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", svg).context("Failed to write SVG")?;
        }
    }

    Ok(())
}
