use crate::store::error::StoreError;
use log::info;
use std::io;
use std::path::Path;

pub fn ensure_scratch_dir_exists(path: &Path) -> Result<(), StoreError> {
    match std::fs::metadata(path) {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(StoreError::ScratchDirNotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating scratch directory: {}", path.display());
            std::fs::create_dir_all(path)
                .map_err(|e| StoreError::ScratchDirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(StoreError::ScratchDirCreation(path.to_path_buf(), e)),
    }
}
