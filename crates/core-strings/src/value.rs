//! Uniform string value shared by readers, the symbolizer and the measures.
//!
//! Contract:
//! - Exactly one representation is populated; the enum tag is the `kind`.
//! - `len()` is the element count of the populated sequence.
//! - `sym(i)` widens bytes to `u64` so measures see one element type across
//!   both representations.
//! - After symbolization the sequence content never changes again.

/// Sequence payload of a string value.
#[derive(Debug, Clone, PartialEq)]
pub enum Seq {
    /// Raw byte sequence as produced by a reader.
    Bytes(Vec<u8>),
    /// 64-bit token ids produced by the symbolizer.
    Tokens(Vec<u64>),
}

/// One input string with its metadata.
#[derive(Debug, Clone)]
pub struct StrValue {
    seq: Seq,
    /// Class label; opaque to the engine, copied into the matrix for writers.
    pub label: f64,
    /// Optional source tag (file name, archive entry, ...).
    pub src: Option<String>,
    /// Position in the original input collection.
    pub idx: usize,
}

impl StrValue {
    pub fn from_bytes(bytes: Vec<u8>, label: f64, idx: usize) -> Self {
        Self {
            seq: Seq::Bytes(bytes),
            label,
            src: None,
            idx,
        }
    }

    /// Convenience constructor used pervasively in tests.
    pub fn from_str(s: &str, label: f64, idx: usize) -> Self {
        Self::from_bytes(s.as_bytes().to_vec(), label, idx)
    }

    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Element count of the populated sequence.
    pub fn len(&self) -> usize {
        match &self.seq {
            Seq::Bytes(b) => b.len(),
            Seq::Tokens(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn seq(&self) -> &Seq {
        &self.seq
    }

    pub fn is_tokens(&self) -> bool {
        matches!(self.seq, Seq::Tokens(_))
    }

    /// Byte payload, `None` once symbolized.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.seq {
            Seq::Bytes(b) => Some(b),
            Seq::Tokens(_) => None,
        }
    }

    /// Token payload, `None` before symbolization.
    pub fn tokens(&self) -> Option<&[u64]> {
        match &self.seq {
            Seq::Tokens(t) => Some(t),
            Seq::Bytes(_) => None,
        }
    }

    /// Element at `i`, widened to `u64`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`, like slice indexing.
    #[inline]
    pub fn sym(&self, i: usize) -> u64 {
        match &self.seq {
            Seq::Bytes(b) => b[i] as u64,
            Seq::Tokens(t) => t[i],
        }
    }

    /// Iterator over the widened elements.
    pub fn syms(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.len()).map(move |i| self.sym(i))
    }

    /// Replaces the byte payload with token ids. Symbolizer-only; the
    /// conversion is irreversible.
    pub(crate) fn replace_with_tokens(&mut self, tokens: Vec<u64>) {
        self.seq = Seq::Tokens(tokens);
    }
}
