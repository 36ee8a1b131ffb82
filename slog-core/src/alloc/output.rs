//! ## slog-core::alloc::output
//! **Growable (optionally bounded) byte buffer for serialized text**
//!
//! `append` is the only primitive that writes bytes; everything else,
//! including formatted text, goes through it so the growth policy and the
//! hard limit are enforced in one place.

use std::fmt;

use crate::error::SlogError;

/// Byte buffer receiving serialized output.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    buf: Vec<u8>,
    limit: Option<usize>,
    growths: usize,
}

impl OutputBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            limit: None,
            growths: 0,
        }
    }

    /// A buffer that refuses to grow past `limit` bytes.
    pub fn bounded(capacity: usize, limit: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity.min(limit)),
            limit: Some(limit),
            growths: 0,
        }
    }

    /// Appends raw bytes, growing to `max(2 * capacity, needed)` when full.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), SlogError> {
        let needed = self.buf.len() + bytes.len();
        if let Some(limit) = self.limit {
            if needed > limit {
                return Err(SlogError::OutputOverflow { limit });
            }
        }
        if needed > self.buf.capacity() {
            let mut target = needed.max(self.buf.capacity().saturating_mul(2));
            if let Some(limit) = self.limit {
                target = target.min(limit);
            }
            self.buf.try_reserve_exact(target - self.buf.len())?;
            self.growths += 1;
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Appends formatted text through [`append`](Self::append).
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), SlogError> {
        if let Some(s) = args.as_str() {
            return self.append(s.as_bytes());
        }

        struct Adapter<'o> {
            out: &'o mut OutputBuffer,
            error: Option<SlogError>,
        }

        impl fmt::Write for Adapter<'_> {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.out.append(s.as_bytes()).map_err(|e| {
                    self.error = Some(e);
                    fmt::Error
                })
            }
        }

        let mut adapter = Adapter {
            out: self,
            error: None,
        };
        match fmt::write(&mut adapter, args) {
            Ok(()) => Ok(()),
            // A Display impl may fail on its own without touching the buffer.
            Err(fmt::Error) => Err(adapter.error.unwrap_or_else(|| {
                SlogError::Io(std::io::Error::other("formatter error"))
            })),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    #[inline]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Number of reallocations since creation.
    #[inline]
    pub fn growths(&self) -> usize {
        self.growths
    }

    /// Drops the contents but keeps the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Cuts the buffer back to `len` bytes, used to discard a partial render.
    #[inline]
    pub(crate) fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_at_least_geometrically() {
        let mut out = OutputBuffer::with_capacity(4);
        let cap = out.capacity();
        out.append(&vec![b'a'; cap]).unwrap();
        assert_eq!(out.growths(), 0);
        out.append(b"e").unwrap();
        assert!(out.capacity() >= 2 * cap);
        assert_eq!(out.growths(), 1);
        assert_eq!(out.len(), cap + 1);
        assert_eq!(out.as_bytes().last(), Some(&b'e'));
    }

    #[test]
    fn grows_to_exact_fit_for_large_appends() {
        let mut out = OutputBuffer::with_capacity(2);
        let big = vec![b'x'; 100];
        out.append(&big).unwrap();
        assert!(out.capacity() >= 100);
        assert_eq!(out.as_bytes(), &big[..]);
    }

    #[test]
    fn growth_keeps_earlier_content() {
        let long = "y".repeat(10_000);
        let mut small = OutputBuffer::with_capacity(8);
        let mut large = OutputBuffer::with_capacity(20_000);
        for out in [&mut small, &mut large] {
            out.append(b"prefix:").unwrap();
            out.append(long.as_bytes()).unwrap();
            out.append(b":suffix").unwrap();
        }
        assert_eq!(small.as_bytes(), large.as_bytes());
        assert!(small.growths() > 0);
        assert_eq!(large.growths(), 0);
    }

    #[test]
    fn bounded_buffer_rejects_overflow() {
        let mut out = OutputBuffer::bounded(8, 8);
        out.append(b"12345678").unwrap();
        assert!(matches!(
            out.append(b"9"),
            Err(SlogError::OutputOverflow { limit: 8 })
        ));
        assert_eq!(out.as_bytes(), b"12345678");
    }

    #[test]
    fn append_fmt_formats_numbers() {
        let mut out = OutputBuffer::with_capacity(1);
        out.append_fmt(format_args!("{}-{:.2}", -42i64, 1.5f64)).unwrap();
        assert_eq!(out.as_bytes(), b"-42-1.50");
    }

    #[test]
    fn append_fmt_reports_overflow() {
        let mut out = OutputBuffer::bounded(4, 4);
        let err = out.append_fmt(format_args!("{}", 123_456)).unwrap_err();
        assert!(matches!(err, SlogError::OutputOverflow { limit: 4 }));
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut out = OutputBuffer::with_capacity(64);
        out.append(b"data").unwrap();
        let cap = out.capacity();
        out.clear();
        assert!(out.is_empty());
        assert_eq!(out.capacity(), cap);
    }
}
