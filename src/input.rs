use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::{decode_strict, read_utf8, FileKind, QieyunError};

/// Where the text to annotate comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Text(String),
    File(PathBuf),
    Stdin,
}

impl InputSource {
    /// Pick the single input source. Piped stdin is used only when neither
    /// inline text nor a file was given.
    pub fn resolve(
        text: Option<String>,
        file: Option<PathBuf>,
        stdin_is_terminal: bool,
    ) -> Result<Self, QieyunError> {
        match (text, file) {
            (Some(_), Some(_)) => Err(QieyunError::InputConflict),
            (Some(text), None) => Ok(InputSource::Text(text)),
            (None, Some(path)) => Ok(InputSource::File(path)),
            (None, None) if !stdin_is_terminal => Ok(InputSource::Stdin),
            (None, None) => Err(QieyunError::MissingInput),
        }
    }

    pub fn read(self) -> Result<String, QieyunError> {
        match self {
            InputSource::Text(text) => Ok(text),
            InputSource::File(path) => read_utf8(&path, FileKind::Input),
            InputSource::Stdin => read_stdin(),
        }
    }
}

fn read_stdin() -> Result<String, QieyunError> {
    let path = Path::new("<stdin>");
    let mut bytes = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut bytes)
        .map_err(|e| QieyunError::from_io(FileKind::Input, path.to_path_buf(), e))?;
    decode_strict(&bytes, FileKind::Input, path)
}
