// Output processors applied to captured stdout/stderr

use std::fmt;
use std::sync::Arc;

type ProcessFn = dyn Fn(Vec<u8>) -> Vec<u8> + Send + Sync;

/// Maps raw captured bytes to their normalized form
///
/// Cheap to clone; the wrapped function is shared.
#[derive(Clone)]
pub struct OutputProcessor {
    name: &'static str,
    func: Arc<ProcessFn>,
}

impl OutputProcessor {
    /// Wrap an arbitrary processing function
    ///
    /// # Example
    /// ```text
    /// let upper = OutputProcessor::custom("upper", |b| b.to_ascii_uppercase());
    /// ```
    pub fn custom<F>(name: &'static str, func: F) -> Self
    where
        F: Fn(Vec<u8>) -> Vec<u8> + Send + Sync + 'static,
    {
        Self {
            name,
            func: Arc::new(func),
        }
    }

    /// Return output unchanged
    pub fn identity() -> Self {
        Self::custom("identity", |bytes| bytes)
    }

    /// Strip leading and trailing ASCII whitespace
    pub fn trim() -> Self {
        Self::custom("trim", |bytes| bytes.trim_ascii().to_vec())
    }

    /// Replace CRLF line endings with LF, so Windows and POSIX output compare equal
    pub fn normalize_newlines() -> Self {
        Self::custom("normalize_newlines", |bytes| {
            let mut out = Vec::with_capacity(bytes.len());
            let mut iter = bytes.into_iter().peekable();
            while let Some(b) = iter.next() {
                if b == b'\r' && iter.peek() == Some(&b'\n') {
                    continue;
                }
                out.push(b);
            }
            out
        })
    }

    /// Run `self`, then `next`
    pub fn then(self, next: OutputProcessor) -> Self {
        let first = self.func;
        let second = next.func;
        Self {
            name: "chain",
            func: Arc::new(move |bytes| second(first(bytes))),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, bytes: Vec<u8>) -> Vec<u8> {
        (self.func)(bytes)
    }
}

impl Default for OutputProcessor {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for OutputProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputProcessor")
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_keeps_bytes() {
        let p = OutputProcessor::default();
        assert_eq!(p.apply(b"  hi\r\n".to_vec()), b"  hi\r\n".to_vec());
        assert_eq!(p.name(), "identity");
    }

    #[test]
    fn test_trim() {
        let p = OutputProcessor::trim();
        assert_eq!(p.apply(b"\n  hello world \t\n".to_vec()), b"hello world".to_vec());
        assert_eq!(p.apply(Vec::new()), Vec::<u8>::new());
    }

    #[test]
    fn test_normalize_newlines_only_touches_crlf() {
        let p = OutputProcessor::normalize_newlines();
        assert_eq!(p.apply(b"a\r\nb\rc\n".to_vec()), b"a\nb\rc\n".to_vec());
    }

    #[test]
    fn test_chain_runs_in_order() {
        let p = OutputProcessor::normalize_newlines().then(OutputProcessor::trim());
        assert_eq!(p.apply(b"line1\r\nline2\r\n".to_vec()), b"line1\nline2".to_vec());
    }
}
