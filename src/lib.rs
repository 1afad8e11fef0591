pub mod cli;
pub mod data;
pub mod decode_cmd;
pub mod decoder;
pub mod diagnostics;
pub mod error;
pub mod inspect_cmd;
pub mod io_utils;
pub mod metadata;
pub mod record;
pub mod rows;
pub mod table;
pub mod temporal;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};

use crate::cli::{Cli, Commands};

pub use crate::{
    data::Value,
    decoder::Decoder,
    diagnostics::{CollectingDiagnostics, Diagnostics, LogDiagnostics},
    error::{DecodeError, DecodeResult, TemporalError, UnknownDataType, ValueError},
    metadata::{DataType, FieldDescriptor, Interpretation, MetadataIndex},
    record::{DecodeOptions, RecordDecoder},
    rows::{DecodedRow, RawRow, Row},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("rets_decode", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    debug!("Parsed command line: {:?}", cli.command);
    match cli.command {
        Commands::Decode(args) => decode_cmd::execute(&args),
        Commands::Inspect(args) => inspect_cmd::execute(&args),
    }
}
