//! Parallax background: ground props and sky layers
//!
//! Cosmetic only. Everything here draws from the cosmetic RNG and moves at a
//! fraction of the game speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::SimRng;
use crate::consts::*;

/// Stars per session at full detail
pub const DEFAULT_STAR_COUNT: usize = 15;
const SKYLINE_COUNT: usize = 5;
const CLOUD_COUNT: usize = 3;

/// Ground props recycle once their right edge passes this
const PROP_RECYCLE_X: f32 = -100.0;
/// Fraction of game speed a full-scale prop moves at
const PROP_PARALLAX: f32 = 0.3;

/// Window grid spacing on skyline buildings
const WINDOW_ROW_SPACING: f32 = 12.0;
const WINDOW_COL_SPACING: f32 = 15.0;
/// Chance a window is lit
const WINDOW_LIT_CHANCE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropKind {
    Building,
    Tree,
    Cactus,
}

impl PropKind {
    pub const ALL: [PropKind; 3] = [PropKind::Building, PropKind::Tree, PropKind::Cactus];

    /// ((min width, max width), (min height, max height)) before scaling
    fn size_range(&self) -> ((f32, f32), (f32, f32)) {
        match self {
            PropKind::Building => ((40.0, 100.0), (80.0, 200.0)),
            PropKind::Tree => ((30.0, 50.0), (70.0, 120.0)),
            PropKind::Cactus => ((20.0, 30.0), (40.0, 80.0)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropKind::Building => "building",
            PropKind::Tree => "tree",
            PropKind::Cactus => "cactus",
        }
    }
}

/// A prop standing on the ground line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundProp {
    pub kind: PropKind,
    pub x: f32,
    /// Scaled size
    pub size: Vec2,
    /// 0.5-1.0, smaller reads as farther away and moves slower
    pub scale: f32,
}

impl GroundProp {
    fn random(x: f32, rng: &mut SimRng) -> Self {
        let kind = rng.pick(&PropKind::ALL).copied().unwrap_or(PropKind::Tree);
        let ((w_min, w_max), (h_min, h_max)) = kind.size_range();
        let scale = rng.range(0.5, 1.0);
        let size = Vec2::new(rng.range(w_min, w_max), rng.range(h_min, h_max)) * scale;
        Self { kind, x, size, scale }
    }

    /// Top-left corner
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, GROUND_Y - self.size.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkyKind {
    Skyline,
    Cloud,
    Star,
}

impl SkyKind {
    /// Fraction of game speed
    pub fn parallax(&self) -> f32 {
        match self {
            SkyKind::Skyline => 0.5,
            SkyKind::Cloud => 0.3,
            SkyKind::Star => 0.1,
        }
    }

    pub fn opacity(&self) -> f32 {
        match self {
            SkyKind::Skyline => 0.3,
            SkyKind::Cloud => 0.4,
            SkyKind::Star => 0.6,
        }
    }
}

/// A far-background element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyItem {
    pub kind: SkyKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Lit windows row by row (skyline only)
    pub windows: Vec<bool>,
    pub window_cols: u32,
}

impl SkyItem {
    fn new(kind: SkyKind, pos: Vec2, size: Vec2, rng: &mut SimRng) -> Self {
        let mut item = Self {
            kind,
            pos,
            size,
            windows: Vec::new(),
            window_cols: 0,
        };
        item.light_windows(rng);
        item
    }

    /// Static lit-window pattern, regenerated only on recycle
    fn light_windows(&mut self, rng: &mut SimRng) {
        self.windows.clear();
        if self.kind != SkyKind::Skyline {
            self.window_cols = 0;
            return;
        }
        let rows = (self.size.y / WINDOW_ROW_SPACING) as u32;
        self.window_cols = (self.size.x / WINDOW_COL_SPACING) as u32;
        for _ in 0..rows * self.window_cols {
            self.windows.push(rng.chance(WINDOW_LIT_CHANCE));
        }
    }
}

/// All background layers for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenery {
    pub props: Vec<GroundProp>,
    pub sky: Vec<SkyItem>,
}

impl Scenery {
    /// Fill the screen with props and line the sky layers up off the right edge
    pub fn new(rng: &mut SimRng, stars: usize) -> Self {
        let mut props = Vec::new();
        let mut x = -200.0;
        while x < WORLD_WIDTH + 200.0 {
            props.push(GroundProp::random(x, rng));
            x += 150.0 + rng.unit() * 100.0;
        }

        let mut sky = Vec::with_capacity(SKYLINE_COUNT + CLOUD_COUNT + stars);
        for i in 0..SKYLINE_COUNT {
            let height = rng.range(80.0, 140.0);
            let x = WORLD_WIDTH + i as f32 * 200.0 + rng.unit() * 100.0;
            let pos = Vec2::new(x, GROUND_Y - height);
            let size = Vec2::new(rng.range(60.0, 100.0), height);
            sky.push(SkyItem::new(SkyKind::Skyline, pos, size, rng));
        }
        for i in 0..CLOUD_COUNT {
            let x = WORLD_WIDTH + i as f32 * 300.0 + rng.unit() * 150.0;
            let pos = Vec2::new(x, rng.range(50.0, 150.0));
            let size = Vec2::new(rng.range(80.0, 120.0), rng.range(30.0, 50.0));
            sky.push(SkyItem::new(SkyKind::Cloud, pos, size, rng));
        }
        for i in 0..stars {
            let x = WORLD_WIDTH + i as f32 * 60.0 + rng.unit() * 200.0;
            let pos = Vec2::new(x, rng.range(20.0, 170.0));
            sky.push(SkyItem::new(SkyKind::Star, pos, Vec2::splat(3.0), rng));
        }

        Self { props, sky }
    }

    /// Scroll every layer and recycle what left the screen
    pub fn update(&mut self, speed: f32, rng: &mut SimRng) {
        for prop in &mut self.props {
            prop.x -= prop.scale * PROP_PARALLAX * speed;
            if prop.x + prop.size.x < PROP_RECYCLE_X {
                prop.x = WORLD_WIDTH + rng.unit() * 200.0;
            }
        }

        for item in &mut self.sky {
            item.pos.x -= item.kind.parallax() * speed;
            if item.pos.x + item.size.x < 0.0 {
                item.pos.x = WORLD_WIDTH + rng.unit() * 100.0;
                item.light_windows(rng);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_counts() {
        let mut rng = SimRng::new(1);
        let scenery = Scenery::new(&mut rng, DEFAULT_STAR_COUNT);
        let count = |k: SkyKind| scenery.sky.iter().filter(|s| s.kind == k).count();
        assert_eq!(count(SkyKind::Skyline), 5);
        assert_eq!(count(SkyKind::Cloud), 3);
        assert_eq!(count(SkyKind::Star), 15);
        // Spaced 150-250 apart across [-200, 1000)
        assert!((5..=8).contains(&scenery.props.len()));
    }

    #[test]
    fn test_props_sit_on_ground_and_scale() {
        let mut rng = SimRng::new(2);
        let scenery = Scenery::new(&mut rng, 0);
        for prop in &scenery.props {
            assert!((0.5..=1.0).contains(&prop.scale));
            assert!((prop.pos().y + prop.size.y - GROUND_Y).abs() < 1e-3);
            let ((_, w_max), (_, h_max)) = prop.kind.size_range();
            assert!(prop.size.x <= w_max * prop.scale);
            assert!(prop.size.y <= h_max * prop.scale);
        }
    }

    #[test]
    fn test_props_move_with_parallax_and_recycle() {
        let mut rng = SimRng::new(3);
        let mut scenery = Scenery {
            props: vec![GroundProp {
                kind: PropKind::Cactus,
                x: 100.0,
                size: Vec2::new(20.0, 40.0),
                scale: 0.5,
            }],
            sky: Vec::new(),
        };
        scenery.update(10.0, &mut rng);
        assert!((scenery.props[0].x - 98.5).abs() < 1e-4);

        scenery.props[0].x = -121.0;
        scenery.update(10.0, &mut rng);
        assert!(scenery.props[0].x >= WORLD_WIDTH);
    }

    #[test]
    fn test_skyline_windows_regenerate_on_recycle() {
        let mut rng = SimRng::new(4);
        let mut scenery = Scenery::new(&mut rng, 0);
        let idx = scenery
            .sky
            .iter()
            .position(|s| s.kind == SkyKind::Skyline)
            .unwrap();
        let item = &scenery.sky[idx];
        let expected = item.window_cols as usize * (item.size.y / 12.0) as usize;
        assert_eq!(scenery.sky[idx].windows.len(), expected);

        // Pattern is stable while on screen
        let before = scenery.sky[idx].windows.clone();
        scenery.update(1.0, &mut rng);
        assert_eq!(scenery.sky[idx].windows, before);

        scenery.sky[idx].pos.x = -scenery.sky[idx].size.x - 1.0;
        scenery.update(0.0, &mut rng);
        assert!(scenery.sky[idx].pos.x >= WORLD_WIDTH);
        assert_eq!(scenery.sky[idx].windows.len(), expected);
    }

    #[test]
    fn test_stars_have_no_windows() {
        let mut rng = SimRng::new(5);
        let scenery = Scenery::new(&mut rng, 4);
        assert!(scenery
            .sky
            .iter()
            .filter(|s| s.kind != SkyKind::Skyline)
            .all(|s| s.windows.is_empty()));
    }
}
