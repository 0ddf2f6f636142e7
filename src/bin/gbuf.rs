use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "gbuf", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a log as one line of text per record.
    Dump(DumpArgs),
    /// Translate a log into another vector format.
    Export(ExportArgs),
    /// Rewrite a log without redundant records.
    Clean(CleanArgs),
    /// Summarize a log: byte order, timestamp mode and record counts.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// Input log.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input log.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path.
    #[arg(long)]
    out: PathBuf,

    /// Output format; guessed from the output extension when omitted.
    #[arg(long, value_enum)]
    format: Option<FormatChoice>,
}

#[derive(Parser, Debug)]
struct CleanArgs {
    /// Input log.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output log.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input log.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Ascii,
    Ps,
    Ai,
    Pdf,
    Fig,
    Json,
}

impl From<FormatChoice> for gbuf::Format {
    fn from(c: FormatChoice) -> Self {
        match c {
            FormatChoice::Ascii => gbuf::Format::Ascii,
            FormatChoice::Ps => gbuf::Format::PostScript,
            FormatChoice::Ai => gbuf::Format::Illustrator,
            FormatChoice::Pdf => gbuf::Format::Pdf,
            FormatChoice::Fig => gbuf::Format::Fig,
            FormatChoice::Json => gbuf::Format::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Dump(args) => cmd_dump(args),
        Command::Export(args) => cmd_export(args),
        Command::Clean(args) => cmd_clean(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn read_log(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read log '{}'", path.display()))
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let bytes = read_log(&args.in_path)?;
    let text = gbuf::to_ascii(&bytes).with_context(|| "decode log")?;
    print!("{text}");
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let format = match args.format {
        Some(c) => c.into(),
        None => args
            .out
            .extension()
            .and_then(|e| e.to_str())
            .and_then(gbuf::Format::from_extension)
            .with_context(|| {
                format!(
                    "cannot guess a format from '{}'; pass --format",
                    args.out.display()
                )
            })?,
    };

    let bytes = read_log(&args.in_path)?;
    gbuf::export_to_file(&bytes, &gbuf::ImageTable::new(), format, &args.out)
        .with_context(|| format!("export {format:?} to '{}'", args.out.display()))?;
    Ok(())
}

fn cmd_clean(args: CleanArgs) -> anyhow::Result<()> {
    let bytes = read_log(&args.in_path)?;
    let cleaned = gbuf::clean(&bytes, gbuf::RecorderOpts::default()).with_context(|| "clean log")?;
    cleaned
        .save(&args.out)
        .with_context(|| format!("write log '{}'", args.out.display()))?;
    eprintln!(
        "cleaned {} -> {} bytes",
        bytes.len(),
        cleaned.bytes().len()
    );
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let bytes = read_log(&args.in_path)?;
    let mut reader = gbuf::RecordReader::new(&bytes);
    let mut counts: BTreeMap<gbuf::Opcode, usize> = BTreeMap::new();
    let mut stamped = 0usize;
    for ev in reader.by_ref() {
        let ev = ev.with_context(|| "decode log")?;
        *counts.entry(ev.record.opcode()).or_default() += 1;
        if ev.stamp.is_some() {
            stamped += 1;
        }
    }

    println!("bytes: {}", bytes.len());
    println!("byte order: {:?}", reader.order());
    println!("foreign: {}", reader.flip_mode());
    println!("stamped records: {stamped}");
    for (op, n) in &counts {
        println!("{:>18} {n}", op.name());
    }
    Ok(())
}
