//! Replay CLI: re-run a logged event stream and verify its trades.
//!
//! Usage: `replay <logfile>`. Exits 0 when the produced trade stream
//! matches the logged one, 1 on a trade-stream mismatch, and 2 when the
//! log cannot be read or decoded.

use matchbook::replay::replay_file;
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: replay <logfile>");
        return ExitCode::from(2);
    };

    match replay_file(&path) {
        Ok(summary) => {
            println!(
                "replay ok: {} events re-applied, {} trades match the log",
                summary.events_replayed, summary.trades_verified
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
