//! Reading save files from streams and paths

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sbvj_format::{Config, Result};
use tracing::debug;

use crate::SaveFile;

/// Read a complete save file from `reader`
pub fn read_save<R: Read>(mut reader: R, config: &Config) -> Result<SaveFile> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    SaveFile::decode(&bytes, config)
}

/// Read a complete save file from `path`
pub fn read_save_file<P: AsRef<Path>>(path: P, config: &Config) -> Result<SaveFile> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading save file");
    let file = File::open(path)?;
    read_save(BufReader::new(file), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sbvj_format::{SbvjError, Value};
    use std::io::Cursor;

    #[test]
    fn test_read_from_cursor() {
        let config = Config::default();
        let save = SaveFile::new("Ship", Value::List(vec![Value::Int(3)]));
        let bytes = save.encode(&config).unwrap();

        let read = read_save(Cursor::new(bytes), &config).unwrap();
        assert_eq!(read, save);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_save_file("/definitely/not/here.player", &Config::default()).unwrap_err();
        assert!(matches!(err, SbvjError::Io(_)));
    }
}
