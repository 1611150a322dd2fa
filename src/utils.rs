use crate::error::CityWeatherError;
use log::info;
use std::path::{Path, PathBuf};

const CACHE_DIR_NAME: &str = "cityweather_cache";

pub fn get_cache_dir() -> Result<PathBuf, CityWeatherError> {
    dirs::cache_dir()
        .map(|p| p.join(CACHE_DIR_NAME))
        .ok_or(CityWeatherError::CacheDirResolution)
}

pub async fn ensure_dir_exists(path: &Path) -> Result<(), CityWeatherError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(CityWeatherError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("Creating directory: {}", path.display());
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| CityWeatherError::DirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(CityWeatherError::DirCreation(path.to_path_buf(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_dir_exists() -> Result<(), CityWeatherError> {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir_exists(&nested).await?;
        assert!(nested.is_dir());
        // Second call is a no-op.
        ensure_dir_exists(&nested).await?;

        let file = dir.path().join("file");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(
            ensure_dir_exists(&file).await,
            Err(CityWeatherError::NotADirectory(_))
        ));
        Ok(())
    }
}
