//! Logging setup on top of `log` and `env_logger`.
//!
//! The filter comes from `RUST_LOG` when it is set, otherwise from the
//! `-v`/`-q` flags: `-q` keeps errors only, no flag is info, `-v` debug and
//! `-vv` trace.
//!
//! What each level carries:
//!
//! - info: one `[DUPLICATE]`/`[PAIR]` line per duplicate, then `[DELETED]`
//!   and `[RENAMED]` lines
//! - warn: files that were skipped or could not be deleted or renamed
//! - debug: stage transitions and stage totals
//! - trace: per-file digests and skipped non-file entries
//!
//! Log output goes to stderr so that `--output json` on stdout stays
//! parseable.
//!
//! ```rust,no_run
//! dupseq::logging::init_logging(1, false);
//! log::info!("[DELETED] b.webp");
//! ```

use std::env;
use std::io::Write;

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Dependencies that log their own matcher internals at debug.
const NOISY_MODULES: &[&str] = &["globset", "ignore"];

/// Install the global logger.
///
/// `verbose` is the `-v` count; `quiet` wins over it. Both are ignored when
/// `RUST_LOG` is set.
///
/// # Panics
///
/// Panics if a logger is already installed.
pub fn init_logging(verbose: u8, quiet: bool) {
    let from_env = env::var_os("RUST_LOG").is_some();
    let level = level_for(verbose, quiet);

    let mut builder = Builder::new();
    builder.target(Target::Stderr);
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(level);
        if level < LevelFilter::Trace {
            for module in NOISY_MODULES {
                builder.filter_module(module, LevelFilter::Warn);
            }
        }
    }
    configure_format(&mut builder, verbose);
    builder.init();

    if from_env {
        log::debug!("log filter taken from RUST_LOG");
    } else {
        log::debug!("log level {level}");
    }
}

fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

// Debug builds add a timestamp, and the module path with -v.
fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    {
        builder.format(move |buf, record| {
            let style = buf.default_level_style(record.level());
            let timestamp = buf.timestamp_seconds();
            if verbose > 0 {
                writeln!(
                    buf,
                    "{timestamp} {style}{:<5}{style:#} [{}] {}",
                    record.level(),
                    record.module_path().unwrap_or("?"),
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "{timestamp} {style}{:<5}{style:#} {}",
                    record.level(),
                    record.args()
                )
            }
        });
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(buf, "{style}{:<5}{style:#} {}", record.level(), record.args())
        });
    }
}
