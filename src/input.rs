// src/input.rs
use anyhow::{Context, Result};
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use tracing::{debug, info};

/// A source of answer lines. `Ok(None)` means input is closed; an error of kind
/// `Interrupted` means the user pressed Ctrl-C.
pub trait LineSource {
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Reads up to and including the next `\n`. Unlike `BufRead::read_line`,
/// `Interrupted` from the reader is returned to the caller instead of retried.
impl<T: BufRead> LineSource for T {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();
        loop {
            let (done, used) = {
                let available = self.fill_buf()?;
                if available.is_empty() {
                    break;
                }
                match available.iter().position(|&b| b == b'\n') {
                    Some(i) => {
                        line.extend_from_slice(&available[..=i]);
                        (true, i + 1)
                    }
                    None => {
                        line.extend_from_slice(available);
                        (false, available.len())
                    }
                }
            };
            self.consume(used);
            if done {
                break;
            }
        }
        if line.is_empty() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

#[derive(Debug)]
enum InputEvent {
    Line(String),
    Closed,
    Interrupted,
}

/// Stdin read on a background thread, merged with Ctrl-C so that an interrupt
/// wakes up a prompt that is blocked waiting for a line.
pub struct InterruptibleStdin {
    rx: Receiver<InputEvent>,
}

impl InterruptibleStdin {
    /// Spawn the reader thread and install the Ctrl-C handler. Call once per process.
    pub fn spawn() -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let on_interrupt = tx.clone();
        ctrlc::set_handler(move || {
            info!("interrupt received");
            let _ = on_interrupt.send(InputEvent::Interrupted);
        })
        .context("installing Ctrl-C handler")?;

        thread::Builder::new()
            .name("stdin".into())
            .spawn(move || {
                let stdin = io::stdin();
                let mut lock = stdin.lock();
                loop {
                    let event = match lock.next_line() {
                        Ok(Some(line)) => InputEvent::Line(line),
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Ok(None) => InputEvent::Closed,
                        Err(e) => {
                            debug!(error = %e, "stdin read failed");
                            InputEvent::Closed
                        }
                    };
                    let last = !matches!(event, InputEvent::Line(_));
                    if tx.send(event).is_err() || last {
                        break;
                    }
                }
            })
            .context("spawning stdin reader")?;

        Ok(Self { rx })
    }
}

impl LineSource for InterruptibleStdin {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        match self.rx.recv() {
            Ok(InputEvent::Line(line)) => Ok(Some(line)),
            Ok(InputEvent::Interrupted) => Err(io::ErrorKind::Interrupted.into()),
            Ok(InputEvent::Closed) | Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    #[test]
    fn test_lines_keep_their_newline_until_eof() -> io::Result<()> {
        let mut src = Cursor::new(b"chicago\nall\nlast".to_vec());
        assert_eq!(src.next_line()?, Some("chicago\n".to_string()));
        assert_eq!(src.next_line()?, Some("all\n".to_string()));
        assert_eq!(src.next_line()?, Some("last".to_string()));
        assert_eq!(src.next_line()?, None);
        Ok(())
    }

    #[test]
    fn test_long_line_spanning_buffer_refills() -> io::Result<()> {
        let text = format!("{}\nnext\n", "x".repeat(50));
        let mut src = io::BufReader::with_capacity(8, Cursor::new(text.into_bytes()));
        assert_eq!(src.next_line()?, Some(format!("{}\n", "x".repeat(50))));
        assert_eq!(src.next_line()?, Some("next\n".to_string()));
        Ok(())
    }

    /// A terminal whose read is cut short by Ctrl-C.
    struct Interrupting;

    impl Read for Interrupting {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::ErrorKind::Interrupted.into())
        }
    }

    impl BufRead for Interrupting {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            Err(io::ErrorKind::Interrupted.into())
        }
        fn consume(&mut self, _: usize) {}
    }

    #[test]
    fn test_interrupted_read_is_not_retried() {
        let err = Interrupting.next_line().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
    }

    #[test]
    fn test_channel_events_map_to_lines_and_interrupts() {
        let (tx, rx) = mpsc::channel();
        let mut stdin = InterruptibleStdin { rx };
        tx.send(InputEvent::Line("yes\n".into())).unwrap();
        tx.send(InputEvent::Interrupted).unwrap();
        tx.send(InputEvent::Closed).unwrap();

        assert_eq!(stdin.next_line().unwrap(), Some("yes\n".to_string()));
        assert_eq!(
            stdin.next_line().unwrap_err().kind(),
            io::ErrorKind::Interrupted
        );
        assert_eq!(stdin.next_line().unwrap(), None);
        // every sender gone
        drop(tx);
        assert_eq!(stdin.next_line().unwrap(), None);
    }
}
