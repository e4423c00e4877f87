//! Reading a dump into memory.
//!
//! Dumps may be compressed (detected by extension) and are not guaranteed to
//! be valid UTF-8: invalid sequences are replaced with U+FFFD rather than
//! failing the run.

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Compression format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl Compression {
    /// Detect compression format from file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("gz" | "gzip") => Compression::Gzip,
            Some("bz2" | "bzip2") => Compression::Bzip2,
            Some("xz" | "lzma") => Compression::Xz,
            Some("zst" | "zstd") => Compression::Zstd,
            _ => Compression::None,
        }
    }

    /// Wrap a reader with the appropriate decompressor
    pub fn wrap_reader<'a>(&self, reader: Box<dyn Read + 'a>) -> io::Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Compression::None => reader,
            Compression::Gzip => Box::new(flate2::read::MultiGzDecoder::new(reader)),
            Compression::Bzip2 => Box::new(bzip2::read::MultiBzDecoder::new(reader)),
            Compression::Xz => Box::new(xz2::read::XzDecoder::new_multi_decoder(reader)),
            Compression::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        })
    }

    /// Output file name for a converted input: compression suffix removed.
    pub fn strip_extension(&self, file_name: &str) -> String {
        if *self == Compression::None {
            return file_name.to_string();
        }
        match file_name.rfind('.') {
            Some(idx) => file_name[..idx].to_string(),
            None => file_name.to_string(),
        }
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Gzip => write!(f, "gzip"),
            Compression::Bzip2 => write!(f, "bzip2"),
            Compression::Xz => write!(f, "xz"),
            Compression::Zstd => write!(f, "zstd"),
        }
    }
}

/// A reader wrapper that reports the running byte count after each read.
pub struct ProgressReader<R: Read> {
    reader: R,
    callback: Box<dyn Fn(u64)>,
    bytes_read: u64,
}

impl<R: Read> ProgressReader<R> {
    pub fn new<F>(reader: R, callback: F) -> Self
    where
        F: Fn(u64) + 'static,
    {
        Self {
            reader,
            callback: Box::new(callback),
            bytes_read: 0,
        }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        self.bytes_read += n as u64;
        (self.callback)(self.bytes_read);
        Ok(n)
    }
}

/// Decode raw dump bytes, replacing invalid UTF-8 and dropping a leading BOM.
pub fn decode(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    }
}

/// Read and decode a whole dump. With `progress`, a byte bar tracks the
/// compressed input.
pub fn read_dump(path: &Path, progress: bool) -> anyhow::Result<String> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let file_size = file.metadata().map(|m| m.len()).unwrap_or(0);
    let compression = Compression::from_path(path);

    let pb = if progress {
        let pb = ProgressBar::new(file_size);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {msg}",
            )
            .unwrap()
            .progress_chars("█▓▒░  ")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message("Reading dump...");
        Some(pb)
    } else {
        None
    };

    let reader: Box<dyn Read> = match &pb {
        Some(pb) => {
            let pb = pb.clone();
            Box::new(ProgressReader::new(file, move |bytes| pb.set_position(bytes)))
        }
        None => Box::new(file),
    };

    let mut reader = compression
        .wrap_reader(reader)
        .with_context(|| format!("Failed to open {} stream: {}", compression, path.display()))?;

    let mut bytes = Vec::with_capacity(file_size as usize);
    reader
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    Ok(decode(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_compression_from_path() {
        assert_eq!(Compression::from_path(Path::new("a.sql")), Compression::None);
        assert_eq!(Compression::from_path(Path::new("a.sql.gz")), Compression::Gzip);
        assert_eq!(Compression::from_path(Path::new("a.sql.BZ2")), Compression::Bzip2);
        assert_eq!(Compression::from_path(Path::new("a.sql.xz")), Compression::Xz);
        assert_eq!(Compression::from_path(Path::new("a.sql.zst")), Compression::Zstd);
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(Compression::Gzip.strip_extension("dump.sql.gz"), "dump.sql");
        assert_eq!(Compression::None.strip_extension("dump.sql"), "dump.sql");
    }

    #[test]
    fn test_decode_lossy_and_bom() {
        assert_eq!(decode(b"\xef\xbb\xbfSELECT 1;"), "SELECT 1;");
        assert_eq!(decode(b"a\xffb"), "a\u{fffd}b");
    }

    #[test]
    fn test_read_gzip_dump() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dump.sql.gz");
        let file = File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(b"CREATE TABLE t (\n  id int(11)\n);\n").unwrap();
        encoder.finish().unwrap();

        let text = read_dump(&path, false).unwrap();
        assert!(text.starts_with("CREATE TABLE t ("));
    }

    #[test]
    fn test_missing_file() {
        let err = read_dump(Path::new("/nonexistent/dump.sql"), false).unwrap_err();
        assert!(err.to_string().contains("Failed to open input file"));
    }
}
