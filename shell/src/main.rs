//! Interactive shell for evaluating expressions.
use abacus_core::expr;
use std::io::{self, BufRead, Write};

const PROMPT: &str = "abacus> ";
const SOURCE_NAME: &str = "<stdin>";
const EXIT_COMMAND: &str = "exit";

fn main() -> io::Result<()> {
    #[cfg(feature = "tracing")]
    let _log_guard = logging::enable();

    let default_panic_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        panic_hook(panic_info);
        default_panic_hook(panic_info);
    }));

    let stdin = io::stdin();
    let stdout = io::stdout();
    repl(stdin.lock(), stdout.lock())
}

/// Read lines from `input` until end of input or the exit command,
/// writing results to `output`.
/// Variables persist across lines.
fn repl(mut input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    let mut env = expr::Environment::new();
    let mut line = String::new();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        let text = line.trim_end_matches(['\n', '\r']);
        if text.trim().is_empty() {
            continue;
        }
        if text.trim().eq_ignore_ascii_case(EXIT_COMMAND) {
            break;
        }

        match expr::run(SOURCE_NAME, text, &mut env) {
            Ok(value) => writeln!(output, "{value}")?,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(?err.kind);
                writeln!(output, "{}", err.render())?
            }
        }
    }

    Ok(())
}

fn panic_hook(panic_info: &std::panic::PanicHookInfo) {
    let payload = if let Some(payload) = panic_info.payload().downcast_ref::<&str>() {
        Some(&**payload)
    } else if let Some(payload) = panic_info.payload().downcast_ref::<String>() {
        Some(payload.as_str())
    } else {
        None
    };

    let location = panic_info.location().map(|location| location.to_string());
    #[cfg(feature = "tracing")]
    tracing::error!("shell panicked at {location:?}: {payload:?}");
    #[cfg(not(feature = "tracing"))]
    let _ = (location, payload);
}

#[cfg(feature = "tracing")]
mod logging {
    use tracing_subscriber::{
        EnvFilter, Registry, filter,
        fmt::{self, time},
        prelude::*,
    };

    const LOG_DIR: &str = ".";
    const LOG_PREFIX: &str = "abacus.log";

    #[cfg(debug_assertions)]
    const ABACUS_LOG_LEVEL_FILE: tracing::Level = tracing::Level::DEBUG;
    #[cfg(not(debug_assertions))]
    const ABACUS_LOG_LEVEL_FILE: tracing::Level = tracing::Level::ERROR;

    /// Log to a daily rolling file.
    /// Nothing is written to stdout, it belongs to the prompt.
    pub fn enable() -> tracing_appender::non_blocking::WorkerGuard {
        let file_filter = filter::Targets::default()
            .with_default(tracing::Level::ERROR)
            .with_target("abacus_core", ABACUS_LOG_LEVEL_FILE)
            .with_target("abacus", ABACUS_LOG_LEVEL_FILE);

        let file_logger = tracing_appender::rolling::daily(LOG_DIR, LOG_PREFIX);
        let (file_logger, _log_guard) = tracing_appender::non_blocking(file_logger);
        let file_logger = fmt::layer()
            .with_writer(file_logger)
            .with_timer(time::UtcTime::rfc_3339())
            .json()
            .with_filter(file_filter);

        let subscriber = Registry::default()
            .with(EnvFilter::from_default_env())
            .with(file_logger);

        if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("could not enable logging: {err}");
        }
        _log_guard
    }
}
