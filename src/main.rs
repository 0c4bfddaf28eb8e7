use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notedata")]
#[command(version = "0.1.0")]
#[command(about = "Tracker note chart to delta-stream compiler", long_about = None)]
struct Args {
    /// Input chart file
    input: PathBuf,

    /// Output binary file (defaults to the input path with `.bin` appended)
    output: Option<PathBuf>,
}

fn main() -> Result<(), notedata::Error> {
    let args = Args::parse();

    let output = args.output.unwrap_or_else(|| {
        let mut name = args.input.clone().into_os_string();
        name.push(".bin");
        PathBuf::from(name)
    });

    let mut compiler = notedata::Compiler::new();
    compiler.compile_file(&args.input, &output)?;

    Ok(())
}
