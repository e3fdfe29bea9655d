//! `tracing` subscriber setup.
//!
//! In the browser, formatted lines go to `console.log`; natively they go to
//! stderr. Installing twice is a no-op.

use std::io::{self, Write};
use std::str::FromStr;

use tracing::Level;

/// Line-buffered writer that flushes each record to the browser console.
#[derive(Default)]
pub struct ConsoleWriter {
    buf: Vec<u8>,
}

impl Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(line));
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("{line}");
        self.buf.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Unknown names fall back to `info`.
pub fn parse_level(name: &str) -> Level {
    Level::from_str(name.trim()).unwrap_or(Level::INFO)
}

/// Returns false when a global subscriber was already set.
pub fn init(level: &str) -> bool {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(ConsoleWriter::default)
        .with_max_level(parse_level(level))
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }

    #[test]
    fn test_writer_buffers_until_flush() {
        let mut w = ConsoleWriter::default();
        w.write_all(b"partial").unwrap();
        assert_eq!(w.buf, b"partial");
        w.flush().unwrap();
        assert!(w.buf.is_empty());
    }
}
