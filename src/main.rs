use anyhow::{Context, Result};
use bincodegen::{FileUnit, Generator, DEFAULT_INDENT, DEFAULT_RUNTIME};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bincodegen")]
#[command(about = "Generate binary coder impls from classified type manifests.", long_about = None)]
struct Cli {
    /// Crate path the generated code imports BinaryCoder, Reader, Writer and
    /// Error from.
    #[arg(long, default_value = DEFAULT_RUNTIME)]
    runtime: String,

    /// Spaces per indentation level of the generated code.
    #[arg(long, default_value_t = DEFAULT_INDENT)]
    indent: usize,

    /// JSON manifests, one output unit each.
    #[arg(required = true)]
    manifests: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let generator = Generator::default()
        .with_runtime(&cli.runtime)
        .with_indent(cli.indent);

    for path in cli.manifests.iter() {
        let manifest = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let unit = FileUnit::from_json(&manifest)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let code = generator
            .generate(&unit)
            .with_context(|| format!("failed to generate {}", path.display()))?;
        println!("{}", code);
    }

    Ok(())
}
