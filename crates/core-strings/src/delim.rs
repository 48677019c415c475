//! Delimiter table: a 256-entry membership set parsed from a spec string.
//!
//! The spec string mixes literal characters with `%HH` two-hex-digit escapes
//! (`" %0a%0d"` marks space, newline and carriage return). A malformed or
//! truncated escape silently ends the spec. The canonical delimiter is the
//! lowest marked byte; the symbolizer collapses every delimiter run to it.

/// Parsed delimiter set. `None`-ness is modeled by the caller: an empty spec
/// string yields no table at all and strings stay byte-level.
#[derive(Debug, Clone)]
pub struct Delimiters {
    table: [bool; 256],
    canonical: Option<u8>,
}

impl Delimiters {
    /// Parses a delimiter specification. Returns `None` for the empty spec,
    /// which means byte-level processing with no symbolization.
    ///
    /// A non-empty spec that decodes to zero bytes (e.g. a lone truncated
    /// escape) still initializes the table; symbolization then emits one
    /// token per string.
    pub fn parse(spec: &str) -> Option<Self> {
        if spec.is_empty() {
            return None;
        }
        let mut table = [false; 256];
        let bytes = spec.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'%' {
                let (hi, lo) = match (bytes.get(i + 1), bytes.get(i + 2)) {
                    (Some(&h), Some(&l)) => ((h as char).to_digit(16), (l as char).to_digit(16)),
                    _ => break, // truncated escape
                };
                match (hi, lo) {
                    (Some(h), Some(l)) => {
                        table[(h * 16 + l) as usize] = true;
                        i += 3;
                    }
                    _ => break, // malformed escape
                }
            } else {
                table[bytes[i] as usize] = true;
                i += 1;
            }
        }
        let canonical = table.iter().position(|&d| d).map(|b| b as u8);
        Some(Self { table, canonical })
    }

    #[inline]
    pub fn is_delimiter(&self, b: u8) -> bool {
        self.table[b as usize]
    }

    /// Lowest marked byte; `None` when the set is empty.
    #[inline]
    pub fn canonical(&self) -> Option<u8> {
        self.canonical
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_none()
    }
}
