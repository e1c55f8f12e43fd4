//! Writing save files to streams and paths

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use sbvj_format::{Config, Result};
use tracing::debug;

use crate::SaveFile;

/// Encode `save` and write it to `writer`, returning the number of bytes written
pub fn write_save<W: Write>(mut writer: W, save: &SaveFile, config: &Config) -> Result<usize> {
    // nothing is written unless the whole save encodes
    let bytes = save.encode(config)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(bytes.len())
}

/// Encode `save` and write it to `path`, replacing any existing file
pub fn write_save_file<P: AsRef<Path>>(path: P, save: &SaveFile, config: &Config) -> Result<usize> {
    let path = path.as_ref();
    let bytes = save.encode(config)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    debug!(path = %path.display(), len = bytes.len(), "wrote save file");
    Ok(bytes.len())
}
