use loam_map::{
    DEFAULT_ALTITUDE, DEFAULT_COMPRESSION_FACTOR, DEFAULT_TERRAIN_HEIGHT, LEGACY_REGION_SIZE,
    PATCH_SIZE,
};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a fresh region surface is laid out. Missing fields take their default.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub size_x: u32,
    pub size_y: u32,
    /// Informational ceiling, never a storage axis.
    pub altitude: u32,
    pub compression_factor: f32,
    pub default_height: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            size_x: LEGACY_REGION_SIZE,
            size_y: LEGACY_REGION_SIZE,
            altitude: DEFAULT_ALTITUDE,
            compression_factor: DEFAULT_COMPRESSION_FACTOR,
            default_height: DEFAULT_TERRAIN_HEIGHT,
        }
    }
}

impl SurfaceConfig {
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self, ron::Error> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ron::Error> {
        let config: Self =
            ron::from_str(text).map_err(|e| ron::Error::Message(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ron::Error> {
        if self.size_x == 0 || self.size_y == 0 {
            return Err(ron::Error::Message(format!(
                "surface size <{},{}> is empty",
                self.size_x, self.size_y
            )));
        }
        if self.size_x % PATCH_SIZE != 0 || self.size_y % PATCH_SIZE != 0 {
            return Err(ron::Error::Message(format!(
                "surface size <{},{}> is not a multiple of {}",
                self.size_x, self.size_y, PATCH_SIZE
            )));
        }
        if !(self.compression_factor.is_finite() && self.compression_factor > 0.0) {
            return Err(ron::Error::Message(format!(
                "compression factor {} must be positive",
                self.compression_factor
            )));
        }
        if !self.default_height.is_finite() {
            return Err(ron::Error::Message(
                "default height must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = SurfaceConfig::from_ron_str("(size_x: 512, size_y: 128)").unwrap();
        assert_eq!(
            config,
            SurfaceConfig {
                size_x: 512,
                size_y: 128,
                ..Default::default()
            }
        );
    }

    #[test]
    fn odd_sizes_are_rejected() {
        assert!(SurfaceConfig::from_ron_str("(size_x: 100)").is_err());
        assert!(SurfaceConfig::from_ron_str("(size_y: 0)").is_err());
        assert!(SurfaceConfig::from_ron_str("(compression_factor: 0.0)").is_err());
    }

    #[test]
    fn read_from_file() {
        let path = std::env::temp_dir().join(format!("loam-config-{}.ron", std::process::id()));
        std::fs::write(&path, "(altitude: 1024, default_height: 5.5)").unwrap();
        let config = SurfaceConfig::read_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.altitude, 1024);
        assert_eq!(config.default_height, 5.5);
        assert_eq!(config.size_x, LEGACY_REGION_SIZE);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(SurfaceConfig::read_file("/nonexistent/loam.ron").is_err());
    }
}
