//! Log capture for unit tests.

use std::io;
use std::sync::{Arc, Mutex};

use tracing::Dispatch;

/// Shared buffer a test subscriber writes into.
#[derive(Clone, Default)]
pub(crate) struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    pub(crate) fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).lines().map(str::to_owned).collect()
    }
}

/// A JSON subscriber writing one line per event into the returned buffer.
///
/// Events list their enclosing spans once, under `spans`.
pub(crate) fn json_logger() -> (Captured, Dispatch) {
    let out = Captured::default();
    let writer = out.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_current_span(false)
        .with_writer(move || writer.clone())
        .finish();
    (out, Dispatch::new(subscriber))
}
