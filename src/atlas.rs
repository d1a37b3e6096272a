//! Glyph atlas allocator: a row-based shelf packer plus placement cache.
//!
//! The allocator only decides where a glyph bitmap lives in the atlas
//! texture; the GPU upload happens at the call site. Each glyph gets a
//! padding border so linear sampling cannot bleed between neighbors.

use std::collections::HashMap;

/// Cache key for a rasterized glyph: font glyph index plus pixel size.
///
/// The size pulse during explosions means the same glyph is cached at
/// several rounded pixel sizes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AtlasKey {
    pub glyph_id: u16,
    pub px: u16,
}

impl AtlasKey {
    pub const fn new(glyph_id: u16, px: u16) -> Self {
        Self { glyph_id, px }
    }
}

/// A cached placement: pixel rect, UVs and the bitmap bearing.
///
/// Zero-size placements are valid; they mark glyphs with no ink (for
/// example whitespace) so they are looked up once and never drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Top-left of the bitmap area in atlas pixels (excluding padding).
    pub min: [u32; 2],
    /// Bitmap dimensions in pixels.
    pub size: [u32; 2],
    /// Bitmap bearing (left, top) in a y-down space, pixels from the
    /// pen position.
    pub bearing: [i32; 2],
    /// Normalized UV rect of the bitmap area.
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

impl Placement {
    pub fn is_empty(&self) -> bool {
        self.size[0] == 0 || self.size[1] == 0
    }
}

/// Result of an insertion attempt.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AtlasSlot {
    /// Space was found; the caller should upload the bitmap to `min`.
    Placed(Placement),
    /// No space remains. There is no eviction strategy.
    Full,
}

#[derive(Copy, Clone, Debug)]
struct Shelf {
    y: u32,
    height: u32,
    x_cursor: u32,
}

/// Fixed-size shelf-packed atlas with a key -> placement cache.
pub struct GlyphAtlas {
    width: u32,
    height: u32,
    padding: u32,

    shelves: Vec<Shelf>,
    next_shelf_y: u32,

    cache: HashMap<AtlasKey, Placement>,
}

impl GlyphAtlas {
    pub fn new(width: u32, height: u32, padding: u32) -> Self {
        Self {
            width,
            height,
            padding,
            shelves: Vec::new(),
            next_shelf_y: 0,
            cache: HashMap::new(),
        }
    }

    pub fn get(&self, key: &AtlasKey) -> Option<Placement> {
        self.cache.get(key).copied()
    }

    /// Reserve space for a new glyph bitmap.
    ///
    /// `size` and `bearing` come from the rasterizer. The first shelf
    /// tall enough with horizontal room wins; otherwise a new shelf is
    /// opened below the last one.
    pub fn insert(&mut self, key: AtlasKey, size: [u32; 2], bearing: [i32; 2]) -> AtlasSlot {
        if let Some(placed) = self.cache.get(&key) {
            return AtlasSlot::Placed(*placed);
        }

        let (glyph_w, glyph_h) = (size[0], size[1]);

        // Ink-less glyphs still get a cache entry so lookups stop here.
        if glyph_w == 0 || glyph_h == 0 {
            let placed = Placement {
                min: [0, 0],
                size: [0, 0],
                bearing,
                uv_min: [0.0, 0.0],
                uv_max: [0.0, 0.0],
            };
            self.cache.insert(key, placed);
            return AtlasSlot::Placed(placed);
        }

        let pad = self.padding;
        let reserved_w = glyph_w.saturating_add(pad.saturating_mul(2));
        let reserved_h = glyph_h.saturating_add(pad.saturating_mul(2));

        if reserved_w > self.width || reserved_h > self.height {
            return AtlasSlot::Full;
        }

        for i in 0..self.shelves.len() {
            let shelf = self.shelves[i];
            if reserved_h <= shelf.height
                && shelf.x_cursor.saturating_add(reserved_w) <= self.width
            {
                let x = shelf.x_cursor;
                self.shelves[i].x_cursor += reserved_w;
                let placed = self.make_placement([x, shelf.y], size, bearing);
                self.cache.insert(key, placed);
                return AtlasSlot::Placed(placed);
            }
        }

        if self.next_shelf_y.saturating_add(reserved_h) > self.height {
            return AtlasSlot::Full;
        }

        let shelf = Shelf {
            y: self.next_shelf_y,
            height: reserved_h,
            x_cursor: reserved_w,
        };
        let placed = self.make_placement([0, shelf.y], size, bearing);
        self.next_shelf_y += shelf.height;
        self.shelves.push(shelf);
        self.cache.insert(key, placed);
        AtlasSlot::Placed(placed)
    }

    fn make_placement(&self, reserved_min: [u32; 2], size: [u32; 2], bearing: [i32; 2]) -> Placement {
        let pad = self.padding;
        let min = [reserved_min[0] + pad, reserved_min[1] + pad];
        let max = [min[0] + size[0], min[1] + size[1]];

        let inv_w = 1.0 / self.width as f32;
        let inv_h = 1.0 / self.height as f32;

        Placement {
            min,
            size,
            bearing,
            uv_min: [min[0] as f32 * inv_w, min[1] as f32 * inv_h],
            uv_max: [max[0] as f32 * inv_w, max[1] as f32 * inv_h],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_then_get_round_trips() {
        let mut atlas = GlyphAtlas::new(128, 128, 1);
        let key = AtlasKey::new(7, 24);
        let AtlasSlot::Placed(placed) = atlas.insert(key, [10, 12], [1, -9]) else {
            panic!("expected placement");
        };
        assert_eq!(atlas.get(&key), Some(placed));
        assert_eq!(placed.bearing, [1, -9]);

        // Re-inserting the same key returns the cached placement.
        assert_eq!(atlas.insert(key, [10, 12], [1, -9]), AtlasSlot::Placed(placed));
    }

    #[test]
    fn test_placements_do_not_overlap() {
        let mut atlas = GlyphAtlas::new(64, 64, 1);
        let a = match atlas.insert(AtlasKey::new(1, 24), [20, 20], [0, 0]) {
            AtlasSlot::Placed(p) => p,
            AtlasSlot::Full => panic!("atlas full"),
        };
        let b = match atlas.insert(AtlasKey::new(2, 24), [20, 20], [0, 0]) {
            AtlasSlot::Placed(p) => p,
            AtlasSlot::Full => panic!("atlas full"),
        };
        // Same shelf, packed left to right with padding in between.
        assert_eq!(a.min[1], b.min[1]);
        assert!(a.min[0] + a.size[0] < b.min[0]);
    }

    #[test]
    fn test_taller_glyph_opens_a_new_shelf() {
        let mut atlas = GlyphAtlas::new(64, 64, 1);
        let short = match atlas.insert(AtlasKey::new(1, 24), [10, 10], [0, 0]) {
            AtlasSlot::Placed(p) => p,
            AtlasSlot::Full => panic!("atlas full"),
        };
        let tall = match atlas.insert(AtlasKey::new(2, 48), [10, 30], [0, 0]) {
            AtlasSlot::Placed(p) => p,
            AtlasSlot::Full => panic!("atlas full"),
        };
        assert!(tall.min[1] > short.min[1]);
    }

    #[test]
    fn test_empty_bitmap_is_cached_without_space() {
        let mut atlas = GlyphAtlas::new(64, 64, 1);
        let key = AtlasKey::new(3, 24);
        let AtlasSlot::Placed(placed) = atlas.insert(key, [0, 0], [0, 0]) else {
            panic!("expected placement");
        };
        assert!(placed.is_empty());
        assert_eq!(atlas.get(&key).map(|p| p.is_empty()), Some(true));
    }

    #[test]
    fn test_full_atlas_reports_full() {
        let mut atlas = GlyphAtlas::new(16, 16, 1);
        assert!(matches!(
            atlas.insert(AtlasKey::new(1, 24), [14, 14], [0, 0]),
            AtlasSlot::Placed(_)
        ));
        assert_eq!(
            atlas.insert(AtlasKey::new(2, 24), [14, 14], [0, 0]),
            AtlasSlot::Full
        );
        // Oversized bitmaps can never fit.
        assert_eq!(
            atlas.insert(AtlasKey::new(3, 24), [64, 64], [0, 0]),
            AtlasSlot::Full
        );
    }
}
