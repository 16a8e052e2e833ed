use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::plot::Plot;

pub const DEFAULT_DPI: u32 = 100;
pub const DEFAULT_FONT: &str = "sans-serif";
pub const DEFAULT_LINE_WIDTH: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub name: String,
    pub results: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub settings: Settings,
    /// Chart sets to render, every known plot when empty
    #[serde(default)]
    pub plots: Vec<Box<dyn Plot>>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Pixels per inch of figure size
    pub dpi: Option<u32>,
    pub font: Option<String>,
    pub line_width: Option<u32>,
}

impl Settings {
    pub fn dpi(&self) -> u32 {
        self.dpi.unwrap_or(DEFAULT_DPI).max(1)
    }

    pub fn font(&self) -> &str {
        self.font.as_deref().unwrap_or(DEFAULT_FONT)
    }

    pub fn line_width(&self) -> u32 {
        self.line_width.unwrap_or(DEFAULT_LINE_WIDTH)
    }

    /// Pixels per typographic point
    pub fn point_scale(&self) -> f64 {
        self.dpi() as f64 / crate::POINTS_PER_INCH
    }

    /// Bitmap size of a figure given in inches
    pub fn figure_pixels(&self, fig_size: (f64, f64)) -> (u32, u32) {
        let dpi = self.dpi() as f64;
        (
            (fig_size.0 * dpi).round().max(1.0) as u32,
            (fig_size.1 * dpi).round().max(1.0) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let settings: Settings = serde_yml::from_str("font: DejaVu Sans").unwrap();
        assert_eq!(settings.dpi(), DEFAULT_DPI);
        assert_eq!(settings.font(), "DejaVu Sans");
        assert_eq!(settings.line_width(), DEFAULT_LINE_WIDTH);
        assert_eq!(settings.figure_pixels((15.0, 5.0)), (1500, 500));
    }

    #[test]
    fn point_scale_follows_dpi() {
        let settings = Settings {
            dpi: Some(144),
            ..Default::default()
        };
        assert_eq!(settings.point_scale(), 2.0);
        assert_eq!(settings.figure_pixels((7.0, 5.0)), (1008, 720));
    }
}
