//! ## slog-core::frame
//! **Call frame assembly and the process-wide entry point**
//!
//! One log call goes through these stages:
//! 1. capture the wall-clock time,
//! 2. collect the caller's fields into a keyless `Plain` node,
//! 3. build the root object: `time`, `file`, `line`, `func`, `level`,
//!    `msg`, then the spliced fields,
//! 4. hand the tree to the sink, which usually renders it into the arena's
//!    output buffer,
//! 5. leave the nodes to be released when the arena is reset.
//!
//! [`Logger`] is the explicit context object; [`emit`] and the `slog!`
//! macro go through a lock-guarded process-wide logger.

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{error, warn};

use crate::alloc::FieldArena;
use crate::error::SlogError;
use crate::field::{Field, Timestamp};
use crate::level::Level;
use crate::serializer::FormatOptions;
use crate::sink::{Record, Sink, StdoutSink, WriterSink};

/// Source location of a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    pub file: &'a str,
    pub line: u32,
    pub func: &'a str,
}

impl<'a> CallSite<'a> {
    pub const fn new(file: &'a str, line: u32, func: &'a str) -> Self {
        Self { file, line, func }
    }
}

/// Path of the enclosing function, e.g. `my_crate::worker::run`.
#[macro_export]
macro_rules! function_path {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        match name.strip_suffix("::f") {
            Some(path) => path,
            None => name,
        }
    }};
}

/// [`CallSite`] of the macro invocation.
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(file!(), line!(), $crate::function_path!())
    };
}

/// Emits one line through the process-wide logger.
///
/// ```ignore
/// let arena = LocalArena::acquire();
/// let f = arena.builder();
/// slog!(arena, Level::Info, "info helper", f.string("name", "qaqland"));
/// ```
#[macro_export]
macro_rules! slog {
    ($arena:expr, $level:expr, $msg:expr $(, $field:expr)* $(,)?) => {
        $crate::emit(&$arena, $crate::call_site!(), $level, $msg, [$($field),*])
    };
}

/// A sink plus the format used to render for it.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn Sink>,
    format: FormatOptions,
}

impl Logger {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self {
            sink,
            format: FormatOptions::default(),
        }
    }

    /// Logger writing to standard output.
    pub fn stdout() -> Self {
        Self::new(Arc::new(StdoutSink))
    }

    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    #[inline]
    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    #[inline]
    pub fn format(&self) -> &FormatOptions {
        &self.format
    }

    /// Builds the call frame around `fields` and dispatches it.
    ///
    /// The rendered text stays in the arena's output buffer until the next
    /// call or reset; the nodes live until the arena is reset.
    pub fn log<'b, I>(
        &self,
        arena: &'b FieldArena,
        site: CallSite<'b>,
        level: Level,
        msg: &'b str,
        fields: I,
    ) -> Result<(), SlogError>
    where
        I: IntoIterator<Item = Field<'b>>,
    {
        let now = Timestamp::now();
        let f = arena.builder();

        let extra = f.plain(fields);
        let root = f.root([
            f.timespec("time", now),
            f.string("file", site.file),
            f.integer("line", i64::from(site.line)),
            f.string("func", site.func),
            f.string("level", level.as_str()),
            f.string("msg", msg),
            extra,
        ]);

        arena.with_output(|out| {
            out.clear();
            let mut record = Record::new(root.node(), level, out, &self.format);
            self.sink.dispatch(&mut record)?;
            arena.stats().add_bytes_rendered(record.rendered_len());
            Ok(())
        })
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

static GLOBAL: Lazy<RwLock<Logger>> = Lazy::new(|| RwLock::new(Logger::default()));

/// A handle to the current process-wide logger.
pub fn logger() -> Logger {
    GLOBAL.read().clone()
}

pub fn set_logger(logger: Logger) {
    *GLOBAL.write() = logger;
}

/// Replaces the process-wide sink, keeping the format.
pub fn set_sink(sink: Arc<dyn Sink>) {
    GLOBAL.write().sink = sink;
}

pub fn set_format(format: FormatOptions) {
    GLOBAL.write().format = format;
}

/// Restores the default standard-output sink.
pub fn reset_sink() {
    set_sink(Arc::new(StdoutSink));
}

/// Sends process-wide output to `path`, appending.
pub fn set_file(path: impl AsRef<Path>) -> io::Result<()> {
    set_sink(Arc::new(WriterSink::append_file(path)?));
    Ok(())
}

/// Logs through the process-wide logger.
///
/// Dropped lines are reported through `tracing`. Failing to allocate the
/// output buffer is fatal and aborts the process.
pub fn emit<'b, I>(arena: &'b FieldArena, site: CallSite<'b>, level: Level, msg: &'b str, fields: I)
where
    I: IntoIterator<Item = Field<'b>>,
{
    // Cloned so the lock is not held while the sink runs.
    let logger = logger();
    if let Err(err) = logger.log(arena, site, level, msg, fields) {
        if err.is_fatal() {
            error!(error = %err, file = site.file, line = site.line, "log output allocation failed");
            std::process::abort();
        }
        warn!(error = %err, file = site.file, line = site.line, "log line dropped");
    }
}
