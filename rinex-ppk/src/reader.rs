//! Buffered Reader wrapper, for efficient line by line
//! scanning with integrated .gz decompression.
#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

#[derive(Debug)]
pub enum BufferedReader {
    /// Readable `RINEX`
    Plain(BufReader<File>),
    /// gzip compressed RINEX
    #[cfg(feature = "flate2")]
    Gzip(BufReader<GzDecoder<File>>),
}

impl BufferedReader {
    /// Builds a new BufferedReader for efficient file interation,
    /// with possible .gz decompression
    pub fn new<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let f = File::open(path)?;
        let gzip = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("gz"))
            .unwrap_or(false);
        if gzip {
            // --> Gzip compressed
            #[cfg(feature = "flate2")]
            {
                Ok(Self::Gzip(BufReader::new(GzDecoder::new(f))))
            }
            #[cfg(not(feature = "flate2"))]
            {
                Err(std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    format!(
                        "\"{}\": .gz compressed files require --flate2 feature",
                        path.display()
                    ),
                ))
            }
        } else {
            // Assumes no extra compression
            Ok(Self::Plain(BufReader::new(f)))
        }
    }
    /// Converts Self into a line iterator. Lines are stripped of their
    /// terminator and decoded lossily: non UTF-8 bytes never abort the iteration,
    /// only I/O errors do.
    pub fn lossy_lines(self) -> LossyLines<Self> {
        LossyLines { inner: self }
    }
}

impl std::io::Read for BufferedReader {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, std::io::Error> {
        match self {
            Self::Plain(ref mut h) => h.read(buf),
            #[cfg(feature = "flate2")]
            Self::Gzip(ref mut h) => h.read(buf),
        }
    }
}

impl std::io::BufRead for BufferedReader {
    fn fill_buf(&mut self) -> Result<&[u8], std::io::Error> {
        match self {
            Self::Plain(ref mut bufreader) => bufreader.fill_buf(),
            #[cfg(feature = "flate2")]
            Self::Gzip(ref mut bufreader) => bufreader.fill_buf(),
        }
    }
    fn consume(&mut self, s: usize) {
        match self {
            Self::Plain(ref mut bufreader) => bufreader.consume(s),
            #[cfg(feature = "flate2")]
            Self::Gzip(ref mut bufreader) => bufreader.consume(s),
        }
    }
}

/// Line iterator over any [BufRead] that tolerates invalid UTF-8.
#[derive(Debug)]
pub struct LossyLines<R: BufRead> {
    inner: R,
}

impl<R: BufRead> LossyLines<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = std::io::Result<String>;
    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::with_capacity(128);
        match self.inner.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&buf).into_owned()))
            },
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn lossy_lines() {
        let content: &[u8] = b"first\r\nsecond\n\xffthird";
        let lines = LossyLines::new(content)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "first");
        assert_eq!(lines[1], "second");
        assert!(lines[2].ends_with("third"));
    }
}
