use std::collections::HashMap;

use plotters::style::RGBColor;

use crate::{
    error::ChartError,
    results::{Framework, LineStyle},
};

#[derive(Debug, Clone, Copy)]
pub struct SeriesStyle {
    pub color: RGBColor,
    pub linestyle: LineStyle,
}

/// Color and line style per framework, built once from the results file
#[derive(Debug, Clone, Default)]
pub struct Palette {
    styles: HashMap<String, SeriesStyle>,
}

impl Palette {
    pub fn from_frameworks(frameworks: &[Framework]) -> Result<Self, ChartError> {
        let styles = frameworks
            .iter()
            .map(|framework| {
                Ok((
                    framework.name.clone(),
                    SeriesStyle {
                        color: parse_color(&framework.color)?,
                        linestyle: framework.linestyle,
                    },
                ))
            })
            .collect::<Result<HashMap<_, _>, ChartError>>()?;
        Ok(Self { styles })
    }

    pub fn style(&self, framework_name: &str) -> Result<&SeriesStyle, ChartError> {
        self.styles
            .get(framework_name)
            .ok_or_else(|| ChartError::UnknownFramework(framework_name.to_owned()))
    }
}

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("cyan", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("brown", (165, 42, 42)),
    ("pink", (255, 192, 203)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("olive", (128, 128, 0)),
    ("navy", (0, 0, 128)),
    ("teal", (0, 128, 128)),
    ("gold", (255, 215, 0)),
    ("tab:blue", (31, 119, 180)),
    ("tab:orange", (255, 127, 14)),
    ("tab:green", (44, 160, 44)),
    ("tab:red", (214, 39, 40)),
    ("tab:purple", (148, 103, 189)),
    ("tab:brown", (140, 86, 75)),
    ("tab:pink", (227, 119, 194)),
    ("tab:gray", (127, 127, 127)),
    ("tab:grey", (127, 127, 127)),
    ("tab:olive", (188, 189, 34)),
    ("tab:cyan", (23, 190, 207)),
];

/// Parses `#rrggbb`, `#rgb` or a named color (`red`, `tab:blue`, ...)
pub fn parse_color(color: &str) -> Result<RGBColor, ChartError> {
    let trimmed = color.trim();
    if let Some(hex) = trimmed.strip_prefix('#') {
        if !hex.is_ascii() {
            return Err(ChartError::InvalidColor(color.to_owned()));
        }
        let digits = match hex.len() {
            6 => hex.to_owned(),
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(ChartError::InvalidColor(color.to_owned())),
        };
        let channel = |idx: usize| {
            u8::from_str_radix(&digits[idx..idx + 2], 16)
                .map_err(|_| ChartError::InvalidColor(color.to_owned()))
        };
        return Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?));
    }

    let lower = trimmed.to_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, (r, g, b))| RGBColor(*r, *g, *b))
        .ok_or_else(|| ChartError::InvalidColor(color.to_owned()))
}
