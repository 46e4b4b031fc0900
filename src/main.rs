use std::env;
use std::fs;
use std::io;
use std::process::ExitCode;

const USAGE: &str = "\
usage: huffc (-e | -d) [-v] FROM_FILE TO_FILE
  -e         encode FROM_FILE into TO_FILE
  -d         decode FROM_FILE into TO_FILE
  -v         log progress to stderr
  FROM_FILE  file to read from (plaintext if -e, encoded if -d)
  TO_FILE    file to write to (encoded if -e, decoded if -d)
Exactly one of -e or -d must be given.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Encode,
    Decode,
}

#[derive(Debug, PartialEq, Eq)]
struct Options {
    mode: Mode,
    verbose: bool,
    from: String,
    to: String,
}

fn parse_args(args: impl Iterator<Item = String>) -> Option<Options> {
    let mut mode = None;
    let mut verbose = false;
    let mut paths = Vec::new();

    for arg in args {
        match arg.as_str() {
            "-e" | "-d" => {
                let m = if arg == "-e" { Mode::Encode } else { Mode::Decode };
                if mode.replace(m).is_some() {
                    return None;
                }
            }
            "-v" => verbose = true,
            s if s.starts_with('-') && s.len() > 1 => return None,
            _ => paths.push(arg.clone()),
        }
    }

    let [from, to]: [String; 2] = paths.try_into().ok()?;
    Some(Options {
        mode: mode?,
        verbose,
        from,
        to,
    })
}

fn main() -> ExitCode {
    let Some(opts) = parse_args(env::args().skip(1)) else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    if let Ok(()) = log::set_logger(&LOGGER) {
        log::set_max_level(if opts.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        });
    }

    let res = match opts.mode {
        Mode::Encode => huffc::encode(&opts.from, &opts.to).map(|s| {
            log::info!(
                "{} bytes -> {} bytes ({:.1}%), {} distinct symbols",
                s.original_len,
                s.encoded_len,
                s.ratio() * 100.0,
                s.distinct_symbols
            );
        }),
        Mode::Decode => huffc::decode(&opts.from, &opts.to).map(|n| {
            log::info!("wrote {} bytes", n);
        }),
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_format_error() {
                eprintln!("{}: not a valid encoded file: {}", opts.from, e);
            } else {
                eprintln!("Something went wrong: {}", e);
            }
            remove_output(&opts.to);
            ExitCode::FAILURE
        }
    }
}

/// Deletes whatever a failed run left at `path`. Returns true if a file was removed.
fn remove_output(path: &str) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            log::debug!("removed {}", path);
            true
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            log::warn!("failed to remove {}: {}", path, e);
            false
        }
    }
}

static LOGGER: SimpleLogger = SimpleLogger;

/// A simple stderr logger.
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let level = match record.level() {
                log::Level::Error => "Error",
                log::Level::Warn => "Warning",
                log::Level::Info => "Info",
                log::Level::Debug => "Debug",
                log::Level::Trace => "Trace",
            };
            eprintln!("{} (in {}): {}", level, record.target(), record.args());
        }
    }

    fn flush(&self) {}
}
