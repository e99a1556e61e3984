//! Plane geometry and overlap tests.
//!
//! Bodies (player, boss, field) are axis-aligned rectangles anchored at
//! their top-left corner; projectiles are circles around their centre.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector of length `len` pointing at `angle` radians.
    pub fn from_angle(angle: f32, len: f32) -> Self {
        Self::new(angle.cos() * len, angle.sin() * len)
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn at(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.w + 2.0 * margin,
            self.h + 2.0 * margin,
        )
    }
}

/// Inclusive on all four edges.
pub fn point_in_rect(p: Vec2, r: &Rect) -> bool {
    p.x >= r.x && p.x <= r.right() && p.y >= r.y && p.y <= r.bottom()
}

pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let reach = ra + rb;
    dx * dx + dy * dy < reach * reach
}

/// Closest-point test: the circle touches the rectangle when the nearest
/// point of the rectangle lies strictly inside the radius.
pub fn circle_rect_overlap(c: Vec2, radius: f32, r: &Rect) -> bool {
    let nx = c.x.clamp(r.x, r.right());
    let ny = c.y.clamp(r.y, r.bottom());
    let dx = c.x - nx;
    let dy = c.y - ny;
    dx * dx + dy * dy < radius * radius
}

pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}
