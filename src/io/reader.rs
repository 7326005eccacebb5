/// D88 file reader

use crate::error::Result;
use crate::format::detect_format;
use crate::image::D88Image;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Read a D88 file from disk
pub fn read_d88<P: AsRef<Path>>(path: P) -> Result<D88Image> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut image = read_d88_from(BufReader::new(file))?;
    image.filename = Some(path.to_string_lossy().to_string());
    log::debug!("Loaded {} ({} bytes)", path.display(), image.len());
    Ok(image)
}

/// Read a D88 image from any reader
///
/// The whole stream is buffered in memory. Implausible headers are logged
/// but still loaded, so damaged images can be inspected.
pub fn read_d88_from<R: Read>(mut reader: R) -> Result<D88Image> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    if !detect_format(&data) {
        log::warn!("Data does not look like a D88 image, decoding anyway");
    }

    D88Image::from_bytes(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::D88Error;
    use crate::image::testutil::{ImageSpec, TrackSpec};
    use std::io::Cursor;

    #[test]
    fn test_read_from_cursor() {
        let data = ImageSpec::new()
            .title(b"CURSOR")
            .track(TrackSpec::new(0, 0, 4, 1))
            .build();
        let image = read_d88_from(Cursor::new(data.clone())).unwrap();

        assert_eq!(image.bytes(), data.as_slice());
        assert_eq!(image.title(), "CURSOR");
        assert!(image.filename().is_none());
    }

    #[test]
    fn test_read_short_stream() {
        assert!(matches!(
            read_d88_from(Cursor::new(vec![0u8; 32])),
            Err(D88Error::TruncatedHeader { length: 32, .. })
        ));
    }

    #[test]
    fn test_read_missing_file() {
        assert!(matches!(
            read_d88("/nonexistent/path/disk.d88"),
            Err(D88Error::Io(_))
        ));
    }
}
