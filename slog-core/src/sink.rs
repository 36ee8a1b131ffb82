//! ## slog-core::sink
//! **Destinations for finished log records**
//!
//! A sink receives the whole root field tree wrapped in a [`Record`]. Text
//! sinks call [`Record::render`] to serialize it into the arena's output
//! buffer; other sinks may inspect or re-render the tree however they like.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use parking_lot::Mutex;
use tracing::debug;

use crate::alloc::OutputBuffer;
use crate::error::SlogError;
use crate::field::FieldNode;
use crate::level::Level;
use crate::serializer::{FormatOptions, Serializer};

/// One log call as seen by a sink.
pub struct Record<'r, 'b> {
    root: &'b FieldNode<'b>,
    level: Level,
    out: &'r mut OutputBuffer,
    format: &'r FormatOptions,
    rendered: bool,
}

impl<'r, 'b> Record<'r, 'b> {
    pub(crate) fn new(
        root: &'b FieldNode<'b>,
        level: Level,
        out: &'r mut OutputBuffer,
        format: &'r FormatOptions,
    ) -> Self {
        Self {
            root,
            level,
            out,
            format,
            rendered: false,
        }
    }

    /// The keyless root object: call-site members followed by the fields.
    #[inline]
    pub fn root(&self) -> &'b FieldNode<'b> {
        self.root
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub fn format(&self) -> &FormatOptions {
        self.format
    }

    /// Looks up a top-level member, including the caller's fields.
    pub fn get(&self, key: &str) -> Option<&'b FieldNode<'b>> {
        self.root.get(key)
    }

    /// Serializes the tree with the logger's format. Rendering happens at
    /// most once per record.
    pub fn render(&mut self) -> Result<&[u8], SlogError> {
        if !self.rendered {
            let format = self.format;
            self.render_with(format)?;
        }
        Ok(self.out.as_bytes())
    }

    /// Serializes the tree with a different format, replacing any earlier
    /// rendering.
    pub fn render_with(&mut self, format: &FormatOptions) -> Result<&[u8], SlogError> {
        self.out.clear();
        self.rendered = false;
        Serializer::new(self.out, format).render(self.root)?;
        self.rendered = true;
        Ok(self.out.as_bytes())
    }

    /// Length of the rendered text, `0` if nothing was rendered.
    pub fn rendered_len(&self) -> usize {
        if self.rendered {
            self.out.len()
        } else {
            0
        }
    }
}

/// Receiver of finished records.
pub trait Sink: Send + Sync {
    fn dispatch(&self, record: &mut Record<'_, '_>) -> Result<(), SlogError>;
}

fn write_line<W: Write>(w: &mut W, line: &[u8]) -> io::Result<()> {
    w.write_all(line)?;
    w.write_all(b"\n")?;
    w.flush()
}

/// Default sink: one line per record on standard output, flushed.
///
/// Write failures are reported to diagnostics and otherwise ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn dispatch(&self, record: &mut Record<'_, '_>) -> Result<(), SlogError> {
        let line = record.render()?;
        if let Err(e) = write_line(&mut io::stdout().lock(), line) {
            debug!(error = %e, "stdout write failed, line dropped");
        }
        Ok(())
    }
}

/// Like [`StdoutSink`], on standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn dispatch(&self, record: &mut Record<'_, '_>) -> Result<(), SlogError> {
        let line = record.render()?;
        if let Err(e) = write_line(&mut io::stderr().lock(), line) {
            debug!(error = %e, "stderr write failed, line dropped");
        }
        Ok(())
    }
}

/// Writes lines into any `Write`, serialized by a mutex. Errors propagate.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Runs `f` with the underlying writer locked.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.writer.lock())
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl WriterSink<File> {
    /// Opens `path` for appending, creating it if needed.
    pub fn append_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn dispatch(&self, record: &mut Record<'_, '_>) -> Result<(), SlogError> {
        let line = record.render()?;
        write_line(&mut *self.writer.lock(), line)?;
        Ok(())
    }
}

/// Handler sink backed by a closure.
pub struct FnSink<F> {
    handler: F,
}

impl<F> FnSink<F>
where
    F: Fn(&mut Record<'_, '_>) -> Result<(), SlogError> + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> Sink for FnSink<F>
where
    F: Fn(&mut Record<'_, '_>) -> Result<(), SlogError> + Send + Sync,
{
    fn dispatch(&self, record: &mut Record<'_, '_>) -> Result<(), SlogError> {
        (self.handler)(record)
    }
}

/// Renders and discards. Useful for measuring the formatting path.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl Sink for NullSink {
    fn dispatch(&self, record: &mut Record<'_, '_>) -> Result<(), SlogError> {
        record.render()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::FieldArena;
    use crate::serializer::{Separators, TimeZoneMode};

    fn with_record<R>(f: impl FnOnce(&mut Record<'_, '_>) -> R) -> R {
        let arena = FieldArena::new();
        let b = arena.builder();
        let root = b.root([b.string("msg", "hi"), b.plain([b.integer("n", 1)])]);
        let format = FormatOptions {
            time_zone: TimeZoneMode::Utc,
            ..FormatOptions::default()
        };
        let mut out = OutputBuffer::with_capacity(64);
        let mut record = Record::new(root.node(), Level::Info, &mut out, &format);
        f(&mut record)
    }

    #[test]
    fn writer_sink_appends_newline() {
        let sink = WriterSink::new(Vec::new());
        with_record(|r| sink.dispatch(r)).unwrap();
        with_record(|r| sink.dispatch(r)).unwrap();
        assert_eq!(
            sink.into_inner(),
            b"{\"msg\": \"hi\", \"n\": 1}\n{\"msg\": \"hi\", \"n\": 1}\n"
        );
    }

    #[test]
    fn record_exposes_tree_and_level() {
        with_record(|r| {
            assert_eq!(r.level(), Level::Info);
            assert_eq!(r.get("msg").and_then(|n| n.as_str()), Some("hi"));
            assert!(r.get("n").is_some());
            assert_eq!(r.rendered_len(), 0);
        });
    }

    #[test]
    fn render_with_replaces_previous_text() {
        with_record(|r| {
            r.render().unwrap();
            let compact = FormatOptions {
                separators: Separators::Compact,
                ..*r.format()
            };
            let text = r.render_with(&compact).unwrap().to_vec();
            assert_eq!(text, b"{\"msg\":\"hi\",\"n\":1}");
            assert_eq!(r.rendered_len(), text.len());
        });
    }

    #[test]
    fn fn_sink_receives_the_tree() {
        let sink = FnSink::new(|r: &mut Record<'_, '_>| {
            assert_eq!(r.root().children().count(), 2);
            Ok(())
        });
        with_record(|r| sink.dispatch(r)).unwrap();
    }

    #[test]
    fn null_sink_still_renders() {
        with_record(|r| {
            NullSink.dispatch(r).unwrap();
            assert!(r.rendered_len() > 0);
        });
    }

    #[test]
    fn append_file_creates_and_appends() {
        let path = std::env::temp_dir().join(format!("slog-sink-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);
        {
            let sink = WriterSink::append_file(&path).unwrap();
            with_record(|r| sink.dispatch(r)).unwrap();
        }
        {
            let sink = WriterSink::append_file(&path).unwrap();
            with_record(|r| sink.dispatch(r)).unwrap();
        }
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        let _ = std::fs::remove_file(&path);
    }
}
