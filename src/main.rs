// SPDX-License-Identifier: MPL-2.0
use iced_folio::app::{self, Flags};
use std::process::ExitCode;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
iced_folio - photo gallery client

USAGE:
  iced_folio [OPTIONS]

OPTIONS:
  --lang <LOCALE>       Interface language (e.g. en-US, fr)
  --server <URL>        PocketBase server address
  --config-dir <DIR>    Directory holding settings.toml
  --data-dir <DIR>      Directory holding state.cbor
  --log <FILTER>        Log filter (e.g. debug, iced_folio=trace); overrides RUST_LOG
  -h, --help            Print this help
";

struct Args {
    flags: Flags,
    log: Option<String>,
}

fn parse_args() -> Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let parsed = Args {
        flags: Flags {
            lang: args.opt_value_from_str("--lang")?,
            server: args.opt_value_from_str("--server")?,
            config_dir: args.opt_value_from_str("--config-dir")?,
            data_dir: args.opt_value_from_str("--data-dir")?,
        },
        log: args.opt_value_from_str("--log")?,
    };

    let rest = args.finish();
    if !rest.is_empty() {
        eprintln!("warning: ignoring unexpected arguments: {rest:?}");
    }
    Ok(Some(parsed))
}

/// `--log` wins over `RUST_LOG`; anything unparsable falls back to `warn`.
fn init_tracing(log: Option<&str>) {
    let filter = match log {
        Some(directives) => EnvFilter::try_new(directives).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    init_tracing(args.log.as_deref());

    match app::run(args.flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "iced_folio exited with an error");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
