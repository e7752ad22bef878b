use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

// Maximum size of a chat log: 64MB
const MAX_FILE_SIZE_BYTES: u64 = 64 * 1024 * 1024;

/// Extension appended to a chat file name to form its document name
const DOCUMENT_EXTENSION: &str = "html";

/// Validates that a file's size is within acceptable limits (64MB)
///
/// Takes an open file handle so the size checked is the size read.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The file is larger than 64MB
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// Read a whole chat file into memory after checking its size
pub fn read_chat_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open chat file: {}", path.display()))?;
    validate_file_size(&file, path)?;

    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .with_context(|| format!("Failed to read chat file: {}", path.display()))?;
    Ok(data)
}

/// Path of the document exported for a chat file: `<output_dir>/<name>.html`
///
/// The full file name is kept, so `1358413.dat` becomes `1358413.dat.html`.
pub fn output_document_path(output_dir: &Path, chat_file: &Path) -> Result<PathBuf> {
    let Some(name) = chat_file.file_name() else {
        bail!("Chat file has no file name: {}", chat_file.display());
    };
    let mut document = name.to_os_string();
    document.push(".");
    document.push(DOCUMENT_EXTENSION);
    Ok(output_dir.join(document))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_output_document_path_keeps_full_name() {
        let path =
            output_document_path(Path::new("/out"), Path::new("/user/chat/1358413.dat")).unwrap();
        assert_eq!(path, PathBuf::from("/out/1358413.dat.html"));
    }

    #[test]
    fn test_output_document_path_without_name() {
        assert!(output_document_path(Path::new("/out"), Path::new("/")).is_err());
    }

    #[test]
    fn test_read_chat_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"ch\xff\xff\xff\xff").unwrap();
        file.flush().unwrap();
        assert_eq!(read_chat_file(file.path()).unwrap(), b"ch\xff\xff\xff\xff");
    }

    #[test]
    fn test_validate_file_size_rejects_large_files() {
        let file = NamedTempFile::new().unwrap();
        file.as_file().set_len(MAX_FILE_SIZE_BYTES + 1).unwrap();
        let err = validate_file_size(file.as_file(), file.path()).unwrap_err();
        assert!(err.to_string().contains("File too large"));
    }

    #[test]
    fn test_read_missing_chat_file() {
        let err = read_chat_file(Path::new("/nonexistent/1.dat")).unwrap_err();
        assert!(err.to_string().contains("Failed to open chat file"));
    }
}
