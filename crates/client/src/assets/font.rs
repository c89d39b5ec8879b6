//! Bitmap font loader for the 3D text label.
//!
//! The font file is JSON mapping characters to rows of `#`/`.` cells.
//! Each horizontal run of `#` cells is extruded into a box, so a glyph
//! becomes a small pile of cuboids rather than an outline mesh.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::Deserialize;

use super::AssetError;
use crate::renderer::mesh::{MeshBuilder, MeshData};

#[derive(Debug, Deserialize)]
struct FontFile {
    /// Side length of one bitmap cell in world units.
    cell_size: f32,
    /// Extrusion depth of the glyph boxes.
    depth: f32,
    /// Rows are listed top to bottom, columns left to right.
    glyphs: HashMap<String, Vec<String>>,
}

/// Builds extruded glyph meshes from a bitmap font file.
pub struct GlyphFactory {
    cell_size: f32,
    depth: f32,
    glyphs: HashMap<char, Vec<String>>,
}

impl GlyphFactory {
    /// Load a font from a JSON file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let text = fs::read_to_string(path)?;
        Self::from_str(&text)
    }

    /// Parse a font from JSON text.
    pub fn from_str(text: &str) -> Result<Self, AssetError> {
        let file: FontFile = serde_json::from_str(text)?;
        let glyphs = file
            .glyphs
            .into_iter()
            .filter_map(|(key, rows)| key.chars().next().map(|ch| (ch, rows)))
            .collect();
        Ok(Self {
            cell_size: file.cell_size,
            depth: file.depth,
            glyphs,
        })
    }

    /// Horizontal spacing between consecutive glyphs in world units.
    pub fn advance(&self) -> f32 {
        1.0
    }

    /// Whether the font defines this character.
    pub fn has_glyph(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    /// Build the mesh for one character, or None if the font lacks it.
    ///
    /// The glyph sits with its lower-left cell at the local origin and
    /// grows along +X and +Y, facing +Z.
    pub fn glyph_mesh(&self, ch: char) -> Option<MeshData> {
        let rows = self.glyphs.get(&ch)?;
        let cell = self.cell_size;
        let half_depth = self.depth * 0.5;
        let row_count = rows.len();

        let mut builder = MeshBuilder::new();
        for (row_idx, row) in rows.iter().enumerate() {
            // Row 0 is the top of the bitmap.
            let y = (row_count - 1 - row_idx) as f32 * cell;
            let mut run_start: Option<usize> = None;
            let cells: Vec<bool> = row.chars().map(|c| c == '#').collect();
            for col in 0..=cells.len() {
                let filled = col < cells.len() && cells[col];
                match (run_start, filled) {
                    (None, true) => run_start = Some(col),
                    (Some(start), false) => {
                        let width = (col - start) as f32 * cell;
                        let center = Vec3::new(
                            start as f32 * cell + width * 0.5,
                            y + cell * 0.5,
                            0.0,
                        );
                        builder.add_box(
                            center,
                            Vec3::new(width * 0.5, cell * 0.5, half_depth),
                        );
                        run_start = None;
                    }
                    _ => {}
                }
            }
        }
        Some(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_FONT: &str = r###"{
        "cell_size": 0.15,
        "depth": 0.05,
        "glyphs": {
            "I": ["#", "#", "#"],
            "L": ["#.", "#.", "##"]
        }
    }"###;

    #[test]
    fn vertical_bar_is_a_single_box_per_row() {
        let font = GlyphFactory::from_str(TEST_FONT).unwrap();
        let mesh = font.glyph_mesh('I').unwrap();
        // Three rows, one box each, 36 vertices per box.
        assert_eq!(mesh.vertex_count(), 3 * 36);
    }

    #[test]
    fn runs_merge_adjacent_cells() {
        let font = GlyphFactory::from_str(TEST_FONT).unwrap();
        let mesh = font.glyph_mesh('L').unwrap();
        // Two single-cell rows plus one two-cell run.
        assert_eq!(mesh.vertex_count(), 3 * 36);
    }

    #[test]
    fn missing_glyph_returns_none() {
        let font = GlyphFactory::from_str(TEST_FONT).unwrap();
        assert!(font.glyph_mesh('Z').is_none());
        assert!(!font.has_glyph('Z'));
        assert!(font.has_glyph('I'));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(GlyphFactory::from_str("{not json").is_err());
    }
}
