use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::block::GridSize;
use crate::constants::{
    DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH, DEFAULT_COLS, DEFAULT_COL_LABEL_HEIGHT,
    DEFAULT_ROWS, DEFAULT_ROW_LABEL_WIDTH,
};
use crate::error::{Error, Result};
use crate::selection::SelectionMode;

/// Configuration for gridsel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub geometry: GeometryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Selection mode a new grid starts in
    pub mode: SelectionMode,
    /// Initial number of rows
    pub rows: usize,
    /// Initial number of columns
    pub cols: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Cell size in pixels
    pub cell_width: i32,
    pub cell_height: i32,
    /// Row label column width in pixels (0 hides the labels)
    pub row_label_width: i32,
    /// Column label row height in pixels (0 hides the labels)
    pub col_label_height: i32,
    /// Window size in pixels, labels included
    pub viewport_width: i32,
    pub viewport_height: i32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            mode: SelectionMode::Cells,
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            row_label_width: DEFAULT_ROW_LABEL_WIDTH,
            col_label_height: DEFAULT_COL_LABEL_HEIGHT,
            viewport_width: 800,
            viewport_height: 600,
        }
    }
}

impl SelectionConfig {
    pub fn grid_size(&self) -> GridSize {
        GridSize::new(self.rows, self.cols)
    }
}

impl Config {
    /// Load configuration from file, or create default if not exists
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path,
            None => default_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.write_to(&config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(path) => path,
            None => default_path()?,
        };
        self.write_to(&config_path)
    }

    /// Reject values the geometry can't work with
    pub fn validate(&self) -> Result<()> {
        let geometry = &self.geometry;
        if geometry.cell_width <= 0 || geometry.cell_height <= 0 {
            return Err(Error::InvalidConfig(format!(
                "cell size must be positive, got {}x{}",
                geometry.cell_width, geometry.cell_height
            )));
        }
        if geometry.row_label_width < 0 || geometry.col_label_height < 0 {
            return Err(Error::InvalidConfig("label sizes must not be negative".to_string()));
        }
        if geometry.viewport_width < 0 || geometry.viewport_height < 0 {
            return Err(Error::InvalidConfig("viewport size must not be negative".to_string()));
        }
        Ok(())
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// `gridsel/config.toml` in the platform config directory
/// (`~/.config` on Linux)
fn default_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir()
        .ok_or_else(|| Error::InvalidConfig("no config directory".to_string()))?;
    path.push("gridsel");
    path.push("config.toml");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load(Some(path.clone())).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        // Second load reads the file back
        let reloaded = Config::load(Some(path)).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[selection]\nmode = \"rows\"\nrows = 12\n").unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.selection.mode, SelectionMode::Rows);
        assert_eq!(config.selection.grid_size(), GridSize::new(12, DEFAULT_COLS));
        assert_eq!(config.geometry, GeometryConfig::default());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.selection.mode = SelectionMode::RowsOrColumns;
        config.geometry.cell_width = 64;
        config.save(Some(path.clone())).unwrap();

        assert_eq!(Config::load(Some(path)).unwrap(), config);
    }

    #[test]
    fn test_invalid_cell_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[geometry]\ncell_width = 0\n").unwrap();

        assert!(matches!(Config::load(Some(path)), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_default_path_is_under_config_dir() {
        if let Some(config_dir) = dirs::config_dir() {
            let path = default_path().unwrap();
            assert!(path.starts_with(&config_dir));
            assert!(path.ends_with("gridsel/config.toml"));
        }
    }

    #[test]
    fn test_unknown_mode_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[selection]\nmode = \"diagonal\"\n").unwrap();

        assert!(matches!(Config::load(Some(path)), Err(Error::ParseConfig(_))));
    }
}
