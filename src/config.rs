use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{TerrainError, TerrainResult, MAX_CHUNK_VERTICES};

/// Grid dimensions, chunking, and meshing parameters for a [`TerrainMesh`](crate::TerrainMesh).
///
/// Usually loaded from TOML:
///
/// ```
/// # use column_mesh::TerrainConfig;
/// let config = TerrainConfig::from_toml_str(
///     r#"
///     width = 64
///     length = 64
///     chunk_width = 16
///     chunk_length = 16
///
///     [atlas.top]
///     min = [0.0, 0.0]
///     max = [0.25, 0.25]
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.chunks_per_axis(), [4, 4]);
/// assert_eq!(config.collider_margin, 0.1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Number of columns along X.
    pub width: u32,
    /// Number of columns along Z.
    pub length: u32,
    /// Columns per chunk along X. Must divide `width`.
    pub chunk_width: u32,
    /// Columns per chunk along Z. Must divide `length`.
    pub chunk_length: u32,
    /// Scale applied to normalized height samples before truncating to an integer height.
    pub height_multiplier: f32,
    /// Bottom of the side faces drawn on the outer edge of the grid, where there is no neighbor column.
    pub floor_y: f32,
    /// Added to a column's height to get the top of its collider.
    pub collider_margin: f32,
    /// A chunk whose mesh would need more vertices than this fails to remesh and stays dirty. At most
    /// [`MAX_CHUNK_VERTICES`], the most a `u32` index buffer can address.
    pub max_chunk_vertices: usize,
    /// Log every chunk remesh at `info` level instead of `debug`.
    pub debug_remesh: bool,
    pub atlas: AtlasConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 32,
            length: 32,
            chunk_width: 16,
            chunk_length: 16,
            height_multiplier: 20.0,
            floor_y: -1.0,
            collider_margin: 0.1,
            max_chunk_vertices: MAX_CHUNK_VERTICES,
            debug_remesh: false,
            atlas: AtlasConfig::default(),
        }
    }
}

impl TerrainConfig {
    /// A config with the given grid and chunk dimensions and default meshing parameters.
    pub fn new(width: u32, length: u32, chunk_width: u32, chunk_length: u32) -> Self {
        Self {
            width,
            length,
            chunk_width,
            chunk_length,
            ..Default::default()
        }
    }

    pub fn from_toml_str(toml_str: &str) -> TerrainResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| TerrainError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> TerrainResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| TerrainError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks the structural constraints: every dimension is positive and the grid is an exact multiple of the chunk
    /// size along both axes.
    pub fn validate(&self) -> TerrainResult<()> {
        for (name, value) in [
            ("width", self.width),
            ("length", self.length),
            ("chunk_width", self.chunk_width),
            ("chunk_length", self.chunk_length),
        ] {
            if value == 0 {
                return Err(TerrainError::ZeroDimension { name });
            }
        }
        if self.width % self.chunk_width != 0 {
            return Err(TerrainError::NotChunkMultiple {
                axis: "width",
                terrain: self.width,
                chunk: self.chunk_width,
            });
        }
        if self.length % self.chunk_length != 0 {
            return Err(TerrainError::NotChunkMultiple {
                axis: "length",
                terrain: self.length,
                chunk: self.chunk_length,
            });
        }
        if !self.height_multiplier.is_finite() {
            return Err(TerrainError::InvalidConfig(format!(
                "height_multiplier must be finite, got {}",
                self.height_multiplier
            )));
        }
        if !self.floor_y.is_finite() {
            return Err(TerrainError::InvalidConfig(format!(
                "floor_y must be finite, got {}",
                self.floor_y
            )));
        }
        if !(self.collider_margin.is_finite() && self.collider_margin >= 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "collider_margin must be a non-negative number, got {}",
                self.collider_margin
            )));
        }
        if self.max_chunk_vertices == 0 || self.max_chunk_vertices > MAX_CHUNK_VERTICES {
            return Err(TerrainError::InvalidConfig(format!(
                "max_chunk_vertices must be in 1..={}, got {}",
                MAX_CHUNK_VERTICES, self.max_chunk_vertices
            )));
        }
        Ok(())
    }

    /// Number of chunks along X and Z. Only meaningful for a validated config.
    pub fn chunks_per_axis(&self) -> [u32; 2] {
        [
            self.width / self.chunk_width.max(1),
            self.length / self.chunk_length.max(1),
        ]
    }
}

/// Texture atlas tiles used for the two materials a terrain is drawn with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Tile for the top face of every column.
    pub top: AtlasTile,
    /// Tile for exposed side faces.
    pub side: AtlasTile,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            top: AtlasTile::GRASS,
            side: AtlasTile::DIRT,
        }
    }
}

/// A rectangle of UV space inside a texture atlas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtlasTile {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl AtlasTile {
    pub const GRASS: Self = Self {
        min: [0.05, 0.05],
        max: [0.09, 0.08],
    };

    pub const DIRT: Self = Self {
        min: [0.05, 0.13],
        max: [0.09, 0.24],
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = TerrainConfig::default();
        config.validate().unwrap();
        assert_eq!(config.chunks_per_axis(), [2, 2]);
    }

    #[test]
    fn rejects_zero_dimensions() {
        let err = TerrainConfig::new(16, 16, 0, 16).validate().unwrap_err();
        assert!(matches!(
            err,
            TerrainError::ZeroDimension {
                name: "chunk_width"
            }
        ));
    }

    #[test]
    fn rejects_partial_chunks() {
        let err = TerrainConfig::new(20, 16, 16, 16).validate().unwrap_err();
        assert!(matches!(
            err,
            TerrainError::NotChunkMultiple {
                axis: "width",
                terrain: 20,
                chunk: 16
            }
        ));

        let err = TerrainConfig::new(16, 10, 16, 4).validate().unwrap_err();
        assert!(matches!(
            err,
            TerrainError::NotChunkMultiple { axis: "length", .. }
        ));
    }

    #[test]
    fn rejects_negative_collider_margin() {
        let mut config = TerrainConfig::new(4, 4, 2, 2);
        config.collider_margin = -0.5;
        assert!(matches!(
            config.validate(),
            Err(TerrainError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_vertex_limits_outside_index_range() {
        let mut config = TerrainConfig::new(4, 4, 2, 2);
        assert_eq!(config.max_chunk_vertices, MAX_CHUNK_VERTICES);
        config.max_chunk_vertices = 0;
        assert!(matches!(
            config.validate(),
            Err(TerrainError::InvalidConfig(_))
        ));
        config.max_chunk_vertices = 64;
        config.validate().unwrap();
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config = TerrainConfig::from_toml_str(
            r#"
            width = 8
            length = 4
            chunk_width = 4
            chunk_length = 4
            floor_y = -2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.width, 8);
        assert_eq!(config.floor_y, -2.0);
        assert_eq!(config.height_multiplier, 20.0);
        assert_eq!(config.atlas, AtlasConfig::default());
    }

    #[test]
    fn toml_rejects_invalid_layout() {
        let err = TerrainConfig::from_toml_str("width = 10\nchunk_width = 4").unwrap_err();
        assert!(matches!(err, TerrainError::NotChunkMultiple { .. }));

        let err = TerrainConfig::from_toml_str("width = \"wide\"").unwrap_err();
        assert!(matches!(err, TerrainError::InvalidConfig(_)));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = TerrainConfig::new(64, 32, 16, 8);
        let text = toml::to_string(&config).unwrap();
        assert_eq!(TerrainConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = TerrainConfig::load("/nonexistent/terrain.toml").unwrap_err();
        assert!(matches!(err, TerrainError::ConfigIo { .. }));
    }
}
