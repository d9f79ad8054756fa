//! Interactive loop
//!
//! Reads commands line by line, runs them, and reports the outcome. User
//! facing results go through `tracing`: INFO lines are successes, ERROR lines
//! are failures, so the binary can route them to stdout and stderr.

use std::io::{self, BufRead, Write};
use std::thread;

use crossbeam::channel::{self, Receiver};

use crate::error::Result;
use crate::protocol::Response;
use crate::shutdown::CancellationToken;
use super::kv_client::KvClient;
use super::input::{parse_line, USAGE};
use super::transport::Transport;

/// Forward stdin lines over a channel from a helper thread
///
/// The channel disconnects at end of input.
pub fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = channel::unbounded();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run the interactive loop until QUIT, end of input, or cancellation
///
/// On end of input or cancellation a QUIT is still sent, best effort, so the
/// server can release the connection.
pub fn run<T: Transport>(
    client: &mut KvClient<T>,
    lines: &Receiver<String>,
    shutdown: &CancellationToken,
) -> Result<()> {
    println!("{}", USAGE);

    loop {
        if shutdown.is_cancelled() {
            return clean_up(client);
        }
        prompt();

        let line = crossbeam::select! {
            recv(lines) -> line => match line {
                Ok(line) => line,
                Err(_) => return clean_up(client),
            },
            recv(shutdown.cancelled()) -> _ => return clean_up(client),
        };

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(e) => {
                tracing::error!("{}", e);
                println!("{}", USAGE);
                continue;
            }
        };

        match client.execute(&command) {
            Ok(Some(response)) => report(&response),
            Ok(None) => {
                tracing::info!("Connection closed");
                return Ok(());
            }
            Err(e) if client.is_session_lost(&e) => {
                tracing::error!("{}", e);
                return Err(e);
            }
            Err(e) => tracing::error!("{}", e),
        }
    }
}

/// Log a decoded response the way the user sees it
pub fn report(response: &Response) {
    if response.is_success() {
        if let Some(value) = &response.value {
            tracing::info!("Value Read: {}", value);
        }
        tracing::info!("Message from server: {}", response.message);
    } else {
        tracing::error!("Message from server: {}", response.message);
    }
}

fn prompt() {
    print!("Enter Command: ");
    let _ = io::stdout().flush();
}

fn clean_up<T: Transport>(client: &mut KvClient<T>) -> Result<()> {
    if let Err(e) = client.quit() {
        tracing::error!("Error while closing connection: {}", e);
    }
    tracing::info!("Connection closed");
    Ok(())
}
