//! Adler-32 checksum (RFC 1950) used by the zlib wrapper.

const MOD_ADLER: u32 = 65_521;

/// Largest number of bytes whose sums fit in u32 without reduction.
const NMAX: usize = 5552;

/// Calculate the Adler-32 checksum of `data`.
#[inline]
pub fn adler32(data: &[u8]) -> u32 {
    let mut adler = Adler32::new();
    adler.update(data);
    adler.finalize()
}

/// Calculate Adler-32 incrementally over multiple byte spans.
///
/// The zlib layer feeds this as decompressed bytes are produced, then
/// compares against the stream trailer.
pub struct Adler32 {
    s1: u32,
    s2: u32,
}

impl Adler32 {
    /// Create a new Adler-32 calculator.
    pub fn new() -> Self {
        Self { s1: 1, s2: 0 }
    }

    /// Update the checksum with more data.
    ///
    /// The modulo is deferred to NMAX-byte batches.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        for chunk in data.chunks(NMAX) {
            for &b in chunk {
                self.s1 += b as u32;
                self.s2 += self.s1;
            }
            self.s1 %= MOD_ADLER;
            self.s2 %= MOD_ADLER;
        }
    }

    /// Finalize and return the checksum value.
    #[inline]
    pub fn finalize(&self) -> u32 {
        (self.s2 << 16) | self.s1
    }
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}
