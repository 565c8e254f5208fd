//! `py2js`: read source text, print the transliterated JavaScript.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "py2js", version, about = "Best-effort Python-to-JavaScript syntax converter")]
struct Args {
    /// Input file; reads standard input when omitted
    input: Option<PathBuf>,

    /// Print the parsed syntax tree as JSON instead of translating
    #[arg(long)]
    dump_ast: bool,
}

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("PYJS_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let output = run(&args)?;
    print!("{}", output);
    Ok(())
}

fn run(args: &Args) -> Result<String> {
    let source = read_source(args)?;
    let module = pyjs_parser::parse(&source)?;
    if args.dump_ast {
        let json =
            serde_json::to_string_pretty(&module).context("failed to serialize syntax tree")?;
        return Ok(format!("{}\n", json));
    }
    let output = pyjs_emitter::translate(&module)?;
    Ok(output)
}

fn read_source(args: &Args) -> Result<String> {
    match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read standard input")?;
            Ok(buffer)
        }
    }
}
