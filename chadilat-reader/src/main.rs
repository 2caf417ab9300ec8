use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;

use chadilat_reader::{open_replay, Reader, ReaderConfig, ReaderError, ReaderStats, SerialSource};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "chadilat-reader",
    version,
    about = "Decode the Chadilat sample stream into text lines",
    long_about = "Reads frames from the logic analyzer and prints one \
                  `<counter> <timestamp> <pins>` line per frame on stdout."
)]
struct Cli {
    /// Serial device the analyzer is attached to
    #[arg(env = "CHADILAT_DEVICE", default_value = "/dev/ttyACM0")]
    device: String,

    /// Baud rate (ignored by USB CDC devices)
    #[arg(short, long, default_value_t = 9600)]
    baud: u32,

    /// Decode a captured byte stream instead of the live device
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set by SIGINT/SIGTERM; the reader returns after its current poll
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn request_shutdown(_signal: libc::c_int) {
    SHUTDOWN.store(true, std::sync::atomic::Ordering::Relaxed);
}

#[cfg(unix)]
fn install_shutdown_handler() {
    // SAFETY: the handler only stores to an atomic, which is async-signal-safe
    unsafe {
        libc::signal(libc::SIGINT, request_shutdown as *const () as libc::sighandler_t);
        libc::signal(libc::SIGTERM, request_shutdown as *const () as libc::sighandler_t);
    }
}

#[cfg(not(unix))]
fn install_shutdown_handler() {}

fn run(cli: &Cli) -> Result<ReaderStats, ReaderError> {
    let config = ReaderConfig::default();
    let stdout = io::stdout().lock();

    match &cli.replay {
        Some(path) => Reader::new(open_replay(path)?, stdout, config).run_until(&SHUTDOWN),
        None => Reader::new(SerialSource::open(&cli.device, cli.baud)?, stdout, config)
            .run_until(&SHUTDOWN),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    install_shutdown_handler();

    match run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) if e.is_broken_pipe() => {
            log::info!("Output closed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
