//! Transcript source
//!
//! Reads recognized utterances line by line and turns them into discrete
//! session inputs. Each line is the full text of one finished utterance, so
//! every non-blank line is forwarded, including one that repeats the line
//! before it ("next", "next").
//!
//! Two directives stand in for the form UI:
//! - `@focus <key>` focuses a field
//! - `@set <key> <value>` edits a field

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::session::SessionInput;

/// Parse one line into a session input. `None` for blank lines.
pub fn parse_line(line: &str) -> Option<SessionInput> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(rest) = line.strip_prefix("@focus ") {
        return Some(SessionInput::Focus {
            key: rest.trim().to_string(),
        });
    }

    if let Some(rest) = line.strip_prefix("@set ") {
        let rest = rest.trim_start();
        let (key, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        return Some(SessionInput::ManualEdit {
            key: key.to_string(),
            value: value.trim().to_string(),
        });
    }

    Some(SessionInput::Transcript(line.to_string()))
}

/// Forward inputs read from `reader` until EOF or until the session goes away
pub async fn forward<R>(reader: R, input_tx: mpsc::Sender<SessionInput>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let Some(input) = parse_line(&line) else {
            continue;
        };

        debug!(?input, "utterance received");
        if input_tx.send(input).await.is_err() {
            warn!("session closed, transcript source stopping");
            return Ok(());
        }
    }

    info!("transcript source reached end of input");
    Ok(())
}
