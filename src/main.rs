mod config;
mod glyphs;
mod renderer;
mod script;
mod session;
mod store;
mod surface;

use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use session::{Flow, Notice, Session};

/// The editor holds `Rc` handles, so everything runs on one thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let (decode_tx, mut decode_rx) = mpsc::unbounded_channel();
    let mut session = Session::open(&config, decode_tx);

    let mut autosave = tokio::time::interval(config.autosave);
    autosave.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0;

    tracing::info!(
        state = %config.state_path.display(),
        canvas = %config.canvas_path.display(),
        "gridcollage reading events from stdin"
    );

    loop {
        let deadline = session.next_deadline();
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "stdin read failed");
                        break;
                    }
                };
                line_no += 1;
                match script::parse_line(line_no, &line) {
                    Ok(Some(event)) => {
                        if session.apply(event) == Flow::Quit {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!(error = %e, "skipping malformed event"),
                }
            }
            Some(decoded) = decode_rx.recv() => session.image_ready(decoded),
            () = sleep_until(deadline) => session.poll(std::time::Instant::now()),
            _ = autosave.tick() => session.autosave(),
        }
        emit(session.take_notices());
    }

    session.save();
    emit(session.take_notices());
    tracing::info!("gridcollage stopped");
    ExitCode::SUCCESS
}

/// Sleep until the editor's next deadline, or forever when there is none.
async fn sleep_until(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at.into()).await,
        None => std::future::pending().await,
    }
}

fn emit(notices: Vec<Notice>) {
    for notice in notices {
        match serde_json::to_string(&notice) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "notice not serializable"),
        }
    }
}
