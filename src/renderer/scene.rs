//! Scene building: game state to a triangle list
//!
//! Draw order: backdrop, reels, spin button, win particles. While loading
//! only the loader overlay is drawn. Text lives in the DOM overlay.

use glam::Vec2;

use super::atlas::TextureAtlas;
use super::shapes;
use super::vertex::Vertex;
use crate::consts::colors::{BACKGROUND, BLACK, BUTTON, BUTTON_GLOW, WHITE};
use crate::rgba;
use crate::sim::reel::{Reel, SHADOW_ALPHA, SHADOW_OFFSET};
use crate::sim::state::{GamePhase, GameState};
use crate::ui::spin_button::GLOW_MARGIN;
use crate::ui::win_animation::PARTICLE_RADIUS;
use crate::ui::{Background, Loader, SpinButton, WinAnimation};

const CIRCLE_SEGMENTS: usize = 20;
const PARTICLE_SEGMENTS: usize = 10;
const GLOW_ALPHA: f32 = 0.4;

#[derive(Debug)]
struct CachedMesh {
    revision: u64,
    vertices: Vec<Vertex>,
}

/// Per-reel vertex cache, reused while a reel is static and unchanged
#[derive(Debug, Default)]
pub struct ReelMeshCache {
    meshes: Vec<Option<CachedMesh>>,
    hits: u64,
    misses: u64,
}

impl ReelMeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertices for `reel`, rebuilt only when it moved or changed
    pub fn mesh(&mut self, reel: &Reel, atlas: &TextureAtlas) -> &[Vertex] {
        let index = reel.index();
        if self.meshes.len() <= index {
            self.meshes.resize_with(index + 1, || None);
        }

        let fresh = reel.is_static()
            && self.meshes[index]
                .as_ref()
                .is_some_and(|m| m.revision == reel.revision());
        if fresh {
            self.hits += 1;
        } else {
            self.misses += 1;
            let mut vertices = Vec::new();
            reel_mesh(&mut vertices, reel, atlas);
            self.meshes[index] = Some(CachedMesh {
                revision: reel.revision(),
                vertices,
            });
        }

        self.meshes[index]
            .as_ref()
            .map(|m| m.vertices.as_slice())
            .unwrap_or(&[])
    }

    pub fn clear(&mut self) {
        self.meshes.clear();
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

/// Shadow, background and masked symbol sprites of one reel
pub fn reel_mesh(out: &mut Vec<Vertex>, reel: &Reel, atlas: &TextureAtlas) {
    let white = atlas.white_uv();
    let origin = reel.origin();
    let frame = reel.frame();
    let size = Vec2::splat(frame.size);

    shapes::rounded_rect(
        out,
        origin + Vec2::splat(SHADOW_OFFSET),
        size,
        frame.corner_radius,
        white,
        rgba(BLACK, SHADOW_ALPHA),
    );
    shapes::rounded_rect(
        out,
        origin,
        size,
        frame.corner_radius,
        white,
        rgba(BACKGROUND, 1.0),
    );

    let clip_max = origin + size;
    for sprite in reel.sprites() {
        let Some(uv) = atlas.uv(sprite.texture) else {
            continue;
        };
        let half = sprite.size / 2.0;
        let min = origin
            + Vec2::new(
                (sprite.x - half) as f32,
                (reel.viewport_y(sprite) - half) as f32,
            );
        let edge = sprite.size as f32;
        shapes::clipped_sprite(
            out,
            min,
            Vec2::splat(edge),
            uv,
            origin,
            clip_max,
            rgba(WHITE, 1.0),
        );
    }
}

fn loader_mesh(out: &mut Vec<Vertex>, loader: &Loader, viewport: Vec2, white: [f32; 2]) {
    if loader.is_released() {
        return;
    }
    let alpha = loader.alpha();
    let layout = loader.layout();
    let radius = layout.corner_radius();

    shapes::rect(out, Vec2::ZERO, viewport, white, rgba(BACKGROUND, alpha));
    // 2px outline, then the translucent box inside it
    shapes::rounded_rect(
        out,
        layout.box_min - Vec2::ONE,
        layout.box_size + Vec2::splat(2.0),
        radius + 1.0,
        white,
        rgba(WHITE, alpha),
    );
    shapes::rounded_rect(
        out,
        layout.box_min + Vec2::ONE,
        layout.box_size - Vec2::splat(2.0),
        radius - 1.0,
        white,
        rgba(BACKGROUND, alpha),
    );
    shapes::rounded_rect(
        out,
        layout.box_min + Vec2::ONE,
        layout.box_size - Vec2::splat(2.0),
        radius - 1.0,
        white,
        rgba(BLACK, 0.3 * alpha),
    );

    let bar = Vec2::new(loader.bar_width(), layout.bar_size.y);
    shapes::rounded_rect(
        out,
        layout.bar_min,
        bar,
        layout.bar_size.y / 2.0,
        white,
        rgba(WHITE, alpha),
    );
}

fn background_mesh(out: &mut Vec<Vertex>, background: &Background, white: [f32; 2]) {
    let viewport = background.viewport();
    for layer in background.gradient() {
        shapes::rect(out, Vec2::ZERO, viewport, white, rgba(layer.color, layer.alpha));
    }
    for circle in background.circles() {
        shapes::circle(
            out,
            background.circle_position(circle),
            circle.radius(),
            CIRCLE_SEGMENTS,
            white,
            rgba(circle.color, circle.alpha()),
        );
    }
}

fn button_mesh(out: &mut Vec<Vertex>, button: &SpinButton, white: [f32; 2]) {
    let glow = button.glow_alpha();
    if glow > 0.0 {
        shapes::rounded_rect(
            out,
            button.min() - Vec2::splat(GLOW_MARGIN),
            button.size() + Vec2::splat(GLOW_MARGIN * 2.0),
            button.corner_radius() + GLOW_MARGIN,
            white,
            rgba(BUTTON_GLOW, GLOW_ALPHA * glow),
        );
    }
    shapes::scaled_rounded_rect(
        out,
        button.center(),
        button.size(),
        button.corner_radius(),
        button.scale(),
        white,
        rgba(BUTTON, button.alpha()),
    );
}

fn particles_mesh(out: &mut Vec<Vertex>, win: &WinAnimation, white: [f32; 2]) {
    for particle in win.particles() {
        shapes::circle(
            out,
            particle.position(),
            PARTICLE_RADIUS,
            PARTICLE_SEGMENTS,
            white,
            rgba(particle.color, particle.alpha()),
        );
    }
}

/// Build the full frame for `state`
pub fn build_scene(
    state: &GameState,
    atlas: &TextureAtlas,
    cache: &mut ReelMeshCache,
) -> Vec<Vertex> {
    let white = atlas.white_uv();
    let mut out = Vec::with_capacity(8192);

    match state.phase {
        GamePhase::Loading | GamePhase::Failed => {
            loader_mesh(&mut out, &state.loader, state.viewport, white);
        }
        GamePhase::Ready => {
            background_mesh(&mut out, &state.background, white);
            if let Some(machine) = &state.machine {
                for reel in machine.reels() {
                    out.extend_from_slice(cache.mesh(reel, atlas));
                }
            }
            button_mesh(&mut out, &state.spin_button, white);
            particles_mesh(&mut out, &state.win, white);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use crate::config::MachineConfig;
    use crate::sim::symbols::SymbolCatalog;

    fn atlas() -> TextureAtlas {
        let mut atlas = TextureAtlas::new(4, 5);
        let texel: Vec<u8> = vec![200; 4 * 4 * 4];
        for _ in 0..5 {
            atlas.insert(&texel, 4, 4).unwrap();
        }
        atlas
    }

    fn reel() -> Reel {
        let catalog = SymbolCatalog::sequential(&MachineConfig::default()).unwrap();
        let mut reel = Reel::new(&catalog, 100.0, 0);
        reel.set_origin(Vec2::new(50.0, 60.0));
        reel
    }

    #[test]
    fn test_reel_sprites_clipped_to_window() {
        let atlas = atlas();
        let reel = reel();
        let mut out = Vec::new();
        reel_mesh(&mut out, &reel, &atlas);

        // Only the first sprite overlaps the window at rest
        let sprite_vertices = out.len() - 2 * 3 * 4 * (shapes::CORNER_SEGMENTS + 1);
        assert_eq!(sprite_vertices, 6);
        for v in &out[out.len() - 6..] {
            assert!(v.position[0] >= 50.0 && v.position[0] <= 150.0);
            assert!(v.position[1] >= 60.0 && v.position[1] <= 160.0);
        }
    }

    #[test]
    fn test_cache_reuses_static_reel() {
        let atlas = atlas();
        let mut reel = reel();
        let mut cache = ReelMeshCache::new();

        let first = cache.mesh(&reel, &atlas).to_vec();
        let second = cache.mesh(&reel, &atlas).to_vec();
        assert_eq!(first, second);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));

        let mut rng = Pcg32::seed_from_u64(3);
        let _ = reel.spin(&mut rng);
        reel.update(0.1);
        cache.mesh(&reel, &atlas);
        reel.update(0.1);
        cache.mesh(&reel, &atlas);
        assert_eq!(cache.misses(), 3);

        reel.resize(120.0);
        cache.clear();
        cache.mesh(&reel, &atlas);
        assert_eq!(cache.misses(), 4);
    }
}
