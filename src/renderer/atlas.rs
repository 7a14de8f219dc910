//! CPU-side texture atlas
//!
//! Symbol images are packed into fixed-size square cells of one RGBA8 image
//! that is uploaded to the GPU once. Cell 0 is solid white so untextured
//! shapes can share the textured pipeline.

use crate::error::GameError;
use crate::sim::symbols::TextureHandle;

/// Texture handle of the white cell
pub const WHITE: TextureHandle = TextureHandle(0);

/// UV rectangle of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl UvRect {
    /// Center of the rectangle, used for flat-colored shapes
    pub fn center(&self) -> [f32; 2] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
        ]
    }
}

/// Packed RGBA8 image with square cells in a grid
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    cell_size: u32,
    columns: u32,
    rows: u32,
    pixels: Vec<u8>,
    used: u32,
}

impl TextureAtlas {
    /// Atlas with room for `capacity` images plus the white cell
    pub fn new(cell_size: u32, capacity: u32) -> Self {
        let cells = capacity + 1;
        let columns = (cells as f32).sqrt().ceil().max(1.0) as u32;
        let rows = cells.div_ceil(columns);
        let width = (columns * cell_size) as usize;
        let height = (rows * cell_size) as usize;

        let mut atlas = Self {
            cell_size,
            columns,
            rows,
            pixels: vec![0; width * height * 4],
            used: 1,
        };
        atlas.fill_cell(0, |_, _| [255, 255, 255, 255]);
        atlas
    }

    pub fn width(&self) -> u32 {
        self.columns * self.cell_size
    }

    pub fn height(&self) -> u32 {
        self.rows * self.cell_size
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Cells in use, including the white cell
    pub fn len(&self) -> u32 {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used <= 1
    }

    pub fn capacity(&self) -> u32 {
        self.columns * self.rows - 1
    }

    /// Copy an RGBA8 image into the next free cell, resampling to fit
    pub fn insert(
        &mut self,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> Result<TextureHandle, GameError> {
        if width == 0 || height == 0 || rgba.len() < (width * height * 4) as usize {
            return Err(GameError::Renderer(format!(
                "image data does not match {}x{}",
                width, height
            )));
        }
        if self.used >= self.columns * self.rows {
            return Err(GameError::Renderer("texture atlas is full".into()));
        }

        let cell = self.used;
        let size = self.cell_size;
        self.fill_cell(cell, |x, y| {
            // Nearest-neighbour sample
            let sx = (x * width / size).min(width - 1);
            let sy = (y * height / size).min(height - 1);
            let i = ((sy * width + sx) * 4) as usize;
            [rgba[i], rgba[i + 1], rgba[i + 2], rgba[i + 3]]
        });
        self.used += 1;
        Ok(TextureHandle(cell))
    }

    /// UV rectangle of a cell, inset by half a texel to avoid bleeding
    pub fn uv(&self, handle: TextureHandle) -> Option<UvRect> {
        if handle.0 >= self.used {
            return None;
        }
        let col = handle.0 % self.columns;
        let row = handle.0 / self.columns;
        let (w, h) = (self.width() as f32, self.height() as f32);
        let x0 = (col * self.cell_size) as f32 + 0.5;
        let y0 = (row * self.cell_size) as f32 + 0.5;
        let x1 = ((col + 1) * self.cell_size) as f32 - 0.5;
        let y1 = ((row + 1) * self.cell_size) as f32 - 0.5;
        Some(UvRect {
            min: [x0 / w, y0 / h],
            max: [x1 / w, y1 / h],
        })
    }

    /// UV inside the white cell
    pub fn white_uv(&self) -> [f32; 2] {
        self.uv(WHITE).map(|r| r.center()).unwrap_or([0.0, 0.0])
    }

    fn fill_cell(&mut self, cell: u32, mut texel: impl FnMut(u32, u32) -> [u8; 4]) {
        let col = cell % self.columns;
        let row = cell / self.columns;
        let stride = self.width() as usize * 4;
        for y in 0..self.cell_size {
            for x in 0..self.cell_size {
                let px = (col * self.cell_size + x) as usize;
                let py = (row * self.cell_size + y) as usize;
                let i = py * stride + px * 4;
                self.pixels[i..i + 4].copy_from_slice(&texel(x, y));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, c: [u8; 4]) -> Vec<u8> {
        (0..w * h).flat_map(|_| c).collect()
    }

    #[test]
    fn test_white_cell() {
        let atlas = TextureAtlas::new(4, 5);
        assert_eq!(atlas.len(), 1);
        assert!(atlas.is_empty());
        assert!(atlas.capacity() >= 5);
        assert_eq!(&atlas.pixels()[0..4], &[255, 255, 255, 255]);
        let uv = atlas.white_uv();
        assert!(uv[0] > 0.0 && uv[1] > 0.0);
    }

    #[test]
    fn test_insert_and_uv() {
        let mut atlas = TextureAtlas::new(8, 3);
        let red = atlas.insert(&solid(16, 16, [255, 0, 0, 255]), 16, 16).unwrap();
        let blue = atlas.insert(&solid(3, 5, [0, 0, 255, 128]), 3, 5).unwrap();
        assert_eq!(red, TextureHandle(1));
        assert_eq!(blue, TextureHandle(2));

        let a = atlas.uv(red).unwrap();
        let b = atlas.uv(blue).unwrap();
        assert!(a.min[0] < a.max[0] && a.min[1] < a.max[1]);
        assert_ne!(a, b);
        assert!(atlas.uv(TextureHandle(3)).is_none());

        // First texel of the red cell (column 1, row 0)
        let i = 8 * 4;
        assert_eq!(&atlas.pixels()[i..i + 4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_insert_rejects_bad_data_and_overflow() {
        let mut atlas = TextureAtlas::new(2, 1);
        assert!(atlas.insert(&[0; 4], 2, 2).is_err());
        let capacity = atlas.capacity();
        for _ in 0..capacity {
            atlas.insert(&solid(1, 1, [1, 2, 3, 4]), 1, 1).unwrap();
        }
        assert!(matches!(
            atlas.insert(&solid(1, 1, [1, 2, 3, 4]), 1, 1),
            Err(GameError::Renderer(_))
        ));
    }
}
