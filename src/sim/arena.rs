//! Static arena layout: outer walls plus interior pillars and bars

use glam::Vec2;
use rand::Rng;

use super::collision::overlaps_any;
use super::rect::Rect;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, WALL_THICKNESS};

/// The playfield. Obstacles never change during a session.
#[derive(Debug, Clone)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    obstacles: Vec<Rect>,
}

impl Default for Arena {
    fn default() -> Self {
        Self::standard()
    }
}

impl Arena {
    /// The 800×600 room: four walls, two pillars and two central bars
    pub fn standard() -> Self {
        let (w, h, t) = (ARENA_WIDTH, ARENA_HEIGHT, WALL_THICKNESS);
        Self::with_obstacles(
            w,
            h,
            vec![
                Rect::new(0.0, 0.0, w, t),                       // top wall
                Rect::new(0.0, h - t, w, t),                     // bottom wall
                Rect::new(0.0, 0.0, t, h),                       // left wall
                Rect::new(w - t, 0.0, t, h),                     // right wall
                Rect::new(170.0, 170.0, 34.0, 100.0),            // upper-left pillar
                Rect::new(w - 170.0 - 34.0, 300.0, 34.0, 100.0), // lower-right pillar
                Rect::new(330.0, 80.0, 140.0, 34.0),             // upper bar
                Rect::new(330.0, h - 80.0 - 34.0, 140.0, 34.0),  // lower bar
            ],
        )
    }

    pub fn with_obstacles(width: f32, height: f32, obstacles: Vec<Rect>) -> Self {
        Self {
            width,
            height,
            obstacles,
        }
    }

    /// An open room with no obstacles at all (tests)
    pub fn empty(width: f32, height: f32) -> Self {
        Self::with_obstacles(width, height, Vec::new())
    }

    #[inline]
    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    /// Rectangle overlaps an obstacle
    #[inline]
    pub fn is_blocked(&self, rect: &Rect) -> bool {
        overlaps_any(rect, &self.obstacles)
    }

    /// Rectangle still intersects the screen area
    pub fn on_screen(&self, rect: &Rect) -> bool {
        !(rect.right() < 0.0
            || rect.left() > self.width
            || rect.bottom() < 0.0
            || rect.top() > self.height)
    }

    /// Point strictly inside the screen area
    #[inline]
    pub fn in_bounds(&self, p: Vec2) -> bool {
        p.x > 0.0 && p.x < self.width && p.y > 0.0 && p.y < self.height
    }

    /// Clamp a point so it stays `margin` away from every screen edge
    pub fn clamp(&self, p: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            p.x.clamp(margin, (self.width - margin).max(margin)),
            p.y.clamp(margin, (self.height - margin).max(margin)),
        )
    }

    /// Uniform integer point at least `margin` from every edge
    pub fn random_point(&self, rng: &mut impl Rng, margin: f32) -> Vec2 {
        let max_x = (self.width - margin).max(margin) as i32;
        let max_y = (self.height - margin).max(margin) as i32;
        let min = margin as i32;
        Vec2::new(
            rng.random_range(min..=max_x) as f32,
            rng.random_range(min..=max_y) as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_standard_layout() {
        let arena = Arena::standard();
        assert_eq!(arena.obstacles().len(), 8);
        // Center of the room is open floor
        assert!(!arena.is_blocked(&Rect::square(Vec2::new(400.0, 300.0), 24.0)));
        // Corners are walls
        assert!(arena.is_blocked(&Rect::square(Vec2::new(10.0, 10.0), 4.0)));
        // Upper-left pillar
        assert!(arena.is_blocked(&Rect::square(Vec2::new(187.0, 220.0), 4.0)));
    }

    #[test]
    fn test_on_screen() {
        let arena = Arena::standard();
        assert!(arena.on_screen(&Rect::new(790.0, 10.0, 16.0, 16.0)));
        assert!(!arena.on_screen(&Rect::new(801.0, 10.0, 16.0, 16.0)));
        assert!(!arena.on_screen(&Rect::new(-20.0, 10.0, 16.0, 16.0)));
    }

    #[test]
    fn test_clamp() {
        let arena = Arena::standard();
        let p = arena.clamp(Vec2::new(-50.0, 900.0), 46.0);
        assert_eq!(p, Vec2::new(46.0, 554.0));
    }

    #[test]
    fn test_random_point_respects_margin() {
        let arena = Arena::standard();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            let p = arena.random_point(&mut rng, 60.0);
            assert!((60.0..=740.0).contains(&p.x));
            assert!((60.0..=540.0).contains(&p.y));
        }
    }
}
