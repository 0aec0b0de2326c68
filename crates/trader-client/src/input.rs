use std::io::BufRead;
use std::thread;

use tokio::sync::mpsc;

use crate::session::SessionEvent;

/// Read user lines on a plain OS thread and post them to the session.
///
/// A blocking read can't be cancelled, so the thread is never joined: it
/// ends with the process once `main` returns. EOF or a read error ends the
/// session like `logout`.
pub fn spawn_reader<R>(
    reader: R,
    events: mpsc::UnboundedSender<SessionEvent>,
) -> thread::JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in reader.lines() {
            let Ok(line) = line else {
                break;
            };
            if events.send(SessionEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = events.send(SessionEvent::Input("logout".to_string()));
    })
}
