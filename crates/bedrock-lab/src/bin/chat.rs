//! An interactive chat with the configured model. Type `exit` to leave.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::time::Duration;

use bedrock_lab::{Error, Lab};
use bedrock_lab_core::TurnOutcome;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::{pin, select};
use tokio::time::sleep;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let lab = Lab::load()?;
    let mut session = lab.chat_session();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    let mut lines = io::BufReader::new(io::stdin()).lines();
    loop {
        print!("User: ");
        std::io::stdout().flush()?;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!("error reading input: {err}");
                break;
            }
        };
        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(progress_style.clone());
        progress_bar.set_message("Thinking...");

        let turn = session.handle_input(&line);
        pin!(turn);
        let outcome = loop {
            select! {
                outcome = &mut turn => break outcome,
                _ = sleep(Duration::from_millis(100)) => progress_bar.inc(1),
            }
        };
        // Finish the progress bar before printing anything else.
        progress_bar.finish_and_clear();

        match outcome {
            TurnOutcome::Reply(text) => {
                println!("{}", "Model response:".bright_cyan());
                println!("{}", text.bright_white());
            }
            TurnOutcome::Failed(err) => {
                println!("{} {err}", "Error invoking model:".bright_red());
            }
            TurnOutcome::Skipped => {}
            TurnOutcome::Exit => break,
        }
    }
    Ok(())
}
