use anyhow::Result;
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode};
use std::env;
use std::io;
use treecard::{RandomTreeReader, TreeWriter};

struct Config {
    max_depth: usize,
    max_children: usize,
    seed: u64,
    output_file: Option<String>,
    nested: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: 4,
            max_children: 5,
            seed: 42,
            output_file: None,
            nested: false,
        }
    }
}

fn parse_args() -> Result<Config> {
    let args: Vec<String> = env::args().collect();
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-depth" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-depth requires an argument");
                }
                config.max_depth = args[i].parse()?;
            }
            "-fanout" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-fanout requires an argument");
                }
                config.max_children = args[i].parse()?;
            }
            "-seed" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-seed requires an argument");
                }
                config.seed = args[i].parse()?;
            }
            "-out" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-out requires a file path argument");
                }
                config.output_file = Some(args[i].clone());
            }
            "-nested" => {
                config.nested = true;
            }
            "-h" | "-help" | "--help" => {
                print_help();
                std::process::exit(0);
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
    println!("tree-card-gen - random tree generator for the tree card");
    println!();
    println!("USAGE:");
    println!("    tree-card-gen [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -depth <N>      Maximum tree depth (default: 4)");
    println!("    -fanout <N>     Maximum children per node (default: 5)");
    println!("    -seed <N>       Random seed (default: 42)");
    println!("    -out <FILE>     Output file; stdout if omitted");
    println!("                    A .br suffix enables Brotli compression");
    println!("    -nested         Write one nested JSON document instead of records");
    println!("    -h, --help      Print this help message");
    println!();
    println!("EXAMPLES:");
    println!("    tree-card-gen -depth 3 -fanout 4 -out tree.jsonl");
    println!("    tree-card-gen -nested -seed 7 -out tree.json.br");
}

fn main() -> Result<()> {
    let _ = TermLogger::init(
        treecard::log_level(),
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let config = parse_args()?;

    let tree = RandomTreeReader::with_config(config.max_depth, config.max_children, config.seed).generate();
    log::info!(
        "generated {} nodes, height {} (seed {})",
        tree.node_count(),
        tree.height(),
        config.seed
    );

    let mut writer = match &config.output_file {
        Some(path) => TreeWriter::new(path)?,
        None => TreeWriter::from_writer(Box::new(io::stdout())),
    };

    if config.nested {
        writer.write_nested(&tree)?;
    } else {
        writer.write_tree(&tree)?;
    }

    if let Some(path) = &config.output_file {
        log::info!("{} nodes written to: {}", writer.record_count(), path);
    }

    Ok(())
}
