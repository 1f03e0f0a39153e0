use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use image_toolbox::{
    FileFetcher, Operation, OperationContext, ToolboxConfig, batch,
    command::{OPERATION_NAMES, write_output},
    load_images,
};

#[derive(Parser, Debug)]
#[command(name = "image-toolbox", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one operation over input files and write the results.
    Apply(ApplyArgs),
    /// List the operation names accepted in `--op`.
    Ops,
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Operation as JSON, e.g. '{"op":"resize","size":"50%"}'.
    #[arg(long)]
    op: String,

    /// Input image paths (or file:// URLs), in order.
    #[arg(long = "in")]
    inputs: Vec<String>,

    /// Directory receiving numbered outputs.
    #[arg(long)]
    out_dir: PathBuf,

    /// JSON config overriding defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Worker threads for per-frame work.
    #[arg(long)]
    threads: Option<usize>,
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
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Ops => {
            for name in OPERATION_NAMES {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>, threads: Option<usize>) -> anyhow::Result<ToolboxConfig> {
    let mut cfg = match path {
        Some(p) => ToolboxConfig::from_path(p)?,
        None => ToolboxConfig::default(),
    };
    if threads.is_some() {
        cfg.threads = threads;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let op: Operation = serde_json::from_str(&args.op).with_context(|| "parse operation JSON")?;
    let cfg = load_config(args.config.as_deref(), args.threads)?;
    let batch_size = cfg.batch_size;
    let ctx = OperationContext::new(cfg)?;

    let fetcher = FileFetcher::new();
    let images = load_images(&fetcher, &args.inputs)?;
    let outputs = match op.apply(images, &ctx) {
        Ok(out) => out.into_vec(),
        Err(e) => {
            if let Some(op_err) = e.as_operation() {
                anyhow::bail!("{} {:?}", op_err.key(), op_err.params());
            }
            return Err(e.into());
        }
    };

    // Overflowing outputs are delivered in numbered batch directories.
    let batched = outputs.len() > batch_size;
    let mut index = 0usize;
    for (n, group) in batch(&outputs, batch_size).into_iter().enumerate() {
        let dir = if batched {
            args.out_dir.join(format!("batch-{n:02}"))
        } else {
            args.out_dir.clone()
        };
        for encoded in group {
            let path = dir.join(format!("{}-{index:03}.{}", op.name(), encoded.extension()));
            write_output(&path, &encoded.bytes)?;
            eprintln!("wrote {}", path.display());
            index += 1;
        }
    }
    Ok(())
}
