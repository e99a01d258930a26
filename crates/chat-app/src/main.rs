use std::io::Write;
use std::process::ExitCode;

use natter_chat::{ChatEvent, ChatSessionController, RandomIdGenerator, SubmitOutcome};
use natter_storage::JsonFileStore;
use snafu::ResultExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod error;
mod settings;
mod socket;
mod terminal;

use error::{AppResult, OpenStoreSnafu, ReadInputSnafu, WriteOutputSnafu};
use settings::AppSettings;
use terminal::{Command, HELP_TEXT, TerminalSurfaces};

/// Terminal client for a natter chat server.
///
/// Each input line is replayed as keystrokes through the same session
/// controller the browser widget uses, so limits and soft line breaks behave
/// identically.
#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{}", error);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> AppResult<()> {
    let settings = AppSettings::load();
    let store_path = settings.store_path();
    let store = JsonFileStore::open(&store_path).context(OpenStoreSnafu {
        stage: "open-json-store",
    })?;
    tracing::debug!(path = ?store.path(), "store opened");

    let (transport, mut tasks) = socket::connect(&settings.server_url).await?;

    let mut controller = ChatSessionController::start(
        settings.chat.clone(),
        store,
        transport,
        TerminalSurfaces::default(),
        RandomIdGenerator::thread_local(),
        &mut rand::thread_rng(),
    );

    let mut stdout = std::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_notices(&mut stdout, controller.surfaces_mut().take_notices())?;

        let line = tokio::select! {
            line = lines.next_line() => line.context(ReadInputSnafu { stage: "read-stdin-line" })?,
            _ = &mut tasks.reader => break,
        };
        let Some(line) = line else {
            break;
        };

        match Command::parse(&line) {
            Command::Quit => break,
            Command::Help => print_notices(&mut stdout, vec![HELP_TEXT.to_string()])?,
            Command::ToggleChat => {
                controller.handle(ChatEvent::ToggleChat);
            }
            Command::Rename(raw) => terminal::rename(&mut controller, &raw),
            Command::Compose { text, soft_break } => {
                if let Some(SubmitOutcome::Failed(error)) =
                    terminal::type_line(&mut controller, &text, soft_break)
                {
                    tracing::debug!("submission failed: {}", error);
                }
            }
        }
    }

    print_notices(&mut stdout, controller.surfaces_mut().take_notices())?;

    // Dropping the controller closes the outbound queue so the writer can flush.
    drop(controller);
    if let Err(error) = tasks.writer.await {
        tracing::warn!("socket writer task failed: {}", error);
    }
    Ok(())
}

fn print_notices(stdout: &mut std::io::Stdout, notices: Vec<String>) -> AppResult<()> {
    for notice in notices {
        writeln!(stdout, "* {notice}").context(WriteOutputSnafu {
            stage: "write-notice",
        })?;
    }
    stdout.flush().context(WriteOutputSnafu {
        stage: "flush-stdout",
    })
}
