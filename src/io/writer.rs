/// D88 and raw file writer

use crate::error::Result;
use crate::image::D88Image;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a D88 image to disk exactly as held in memory
pub fn write_d88<P: AsRef<Path>>(image: &D88Image, path: P) -> Result<()> {
    write_raw(image.bytes(), path)
}

/// Write a byte buffer to disk, such as a flattened sector dump
pub fn write_raw<P: AsRef<Path>>(data: &[u8], path: P) -> Result<()> {
    let mut file = BufWriter::new(File::create(path.as_ref())?);
    file.write_all(data)?;
    file.flush()?;
    log::debug!("Wrote {} bytes to {}", data.len(), path.as_ref().display());
    Ok(())
}
