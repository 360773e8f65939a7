//! Reading the picked CSV file.

use js_sys::Uint8Array;
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

use crate::config::MAX_FILE_SIZE;
use crate::types::{AppError, AppResult};

/// Reject files over [`MAX_FILE_SIZE`] before reading them.
pub fn check_file_size(size: f64) -> AppResult<()> {
    if size > MAX_FILE_SIZE as f64 {
        return Err(AppError::File(format!(
            "file is {:.1} MB, the limit is {} MB",
            size / (1024.0 * 1024.0),
            MAX_FILE_SIZE / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Read the whole file. Decoding is left to the parser, which detects the
/// encoding.
pub async fn read_file_bytes(file: &File) -> AppResult<Vec<u8>> {
    check_file_size(file.size())?;

    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| AppError::File(format!("{:?}", e)))?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limit() {
        assert!(check_file_size(1024.0).is_ok());
        assert!(check_file_size(MAX_FILE_SIZE as f64).is_ok());

        let err = check_file_size((MAX_FILE_SIZE + 1) as f64).unwrap_err();
        assert!(matches!(err, AppError::File(_)));
    }
}
