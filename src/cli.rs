use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Decode RETS query results using field metadata", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode a delimited result set into typed values
    Decode(DecodeArgs),
    /// Show the decoder each metadata field resolves to
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Input rows with a header line of field names ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Field metadata table (.json, .yaml or .yml)
    #[arg(short, long)]
    pub meta: PathBuf,
    /// Output file ('-' or omitted for stdout)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Output representation
    #[arg(long, value_enum, default_value_t = OutputFormat::Jsonl)]
    pub format: OutputFormat,
    /// Keep temporal values zone-aware instead of normalizing offsets away
    #[arg(long = "include-tz")]
    pub include_tz: bool,
    /// Decode at most this many rows
    #[arg(long)]
    pub limit: Option<usize>,
    /// Input delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Field metadata table (.json, .yaml or .yml)
    #[arg(short, long)]
    pub meta: PathBuf,
    /// Resolve temporal decoders in zone-aware mode
    #[arg(long = "include-tz")]
    pub include_tz: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One JSON object per row
    #[default]
    Jsonl,
    /// Delimited text using display values
    Csv,
    /// Aligned text table
    Table,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
