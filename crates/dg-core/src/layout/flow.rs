//! Dungeon flow: what the layout generator is asked to build

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid dungeon flow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("dungeon flow has no tile templates")]
    NoTemplates,

    #[error("tile template '{name}' has a zero dimension")]
    EmptyTemplate { name: String },

    #[error("tile template '{name}' ({width}x{height}) does not fit a {level_width}x{level_height} level")]
    TemplateTooLarge {
        name: String,
        width: u32,
        height: u32,
        level_width: u32,
        level_height: u32,
    },

    #[error("{what} range is inverted: {min} > {max}")]
    InvertedRange { what: &'static str, min: u32, max: u32 },

    #[error("main path needs at least one room")]
    EmptyMainPath,

    #[error("{what} of {value} exceeds the limit of {max}")]
    DimensionTooLarge { what: &'static str, value: u32, max: u32 },
}

/// Largest level side and room spacing accepted, in tiles. Keeps every
/// placement coordinate well inside `i32`.
pub const MAX_LEVEL_SIZE: u32 = 1 << 20;

/// Index of a template in [`DungeonFlow::templates`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateId(pub usize);

/// A room shape rooms are stamped from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileTemplate {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl TileTemplate {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

/// Inclusive count range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn check(&self, what: &'static str) -> Result<(), LayoutError> {
        if self.min > self.max {
            return Err(LayoutError::InvertedRange {
                what,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Layout request for [`LayoutGenerator`](super::LayoutGenerator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonFlow {
    /// Level width in tiles
    pub width: u32,
    /// Level height in tiles
    pub height: u32,
    /// Empty tiles kept between neighbouring rooms
    pub room_spacing: u32,
    pub main_path_length: CountRange,
    pub branch_count: CountRange,
    pub branch_depth: CountRange,
    pub templates: Vec<TileTemplate>,
}

impl Default for DungeonFlow {
    fn default() -> Self {
        Self {
            width: 80,
            height: 40,
            room_spacing: 1,
            main_path_length: CountRange::new(6, 10),
            branch_count: CountRange::new(1, 4),
            branch_depth: CountRange::new(1, 3),
            templates: vec![
                TileTemplate::new("closet", 3, 3),
                TileTemplate::new("chamber", 5, 4),
                TileTemplate::new("hall", 8, 5),
                TileTemplate::new("gallery", 10, 3),
            ],
        }
    }
}

impl DungeonFlow {
    pub fn validate(&self) -> Result<(), LayoutError> {
        for (what, value) in [
            ("level width", self.width),
            ("level height", self.height),
            ("room spacing", self.room_spacing),
        ] {
            if value > MAX_LEVEL_SIZE {
                return Err(LayoutError::DimensionTooLarge {
                    what,
                    value,
                    max: MAX_LEVEL_SIZE,
                });
            }
        }
        if self.templates.is_empty() {
            return Err(LayoutError::NoTemplates);
        }
        for template in &self.templates {
            if template.width == 0 || template.height == 0 {
                return Err(LayoutError::EmptyTemplate {
                    name: template.name.clone(),
                });
            }
            if template.width > self.width || template.height > self.height {
                return Err(LayoutError::TemplateTooLarge {
                    name: template.name.clone(),
                    width: template.width,
                    height: template.height,
                    level_width: self.width,
                    level_height: self.height,
                });
            }
        }

        self.main_path_length.check("main path length")?;
        self.branch_count.check("branch count")?;
        self.branch_depth.check("branch depth")?;
        if self.main_path_length.max == 0 {
            return Err(LayoutError::EmptyMainPath);
        }
        Ok(())
    }

    pub fn template(&self, id: TemplateId) -> Option<&TileTemplate> {
        self.templates.get(id.0)
    }

    /// Display name of a template, falling back to its index
    pub fn template_name(&self, id: TemplateId) -> String {
        self.template(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("template #{}", id.0))
    }
}
