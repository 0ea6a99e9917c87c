use isorealm_engine::Vec2;

/// Axis-aligned rectangle in tile space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct TileRect {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl TileRect {
    pub(crate) const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub(crate) fn translated(self, u: f32, v: f32) -> TileRect {
        TileRect {
            x: self.x + u,
            y: self.y + v,
            ..self
        }
    }

    /// Strict overlap; rectangles that only share an edge do not overlap.
    pub(crate) fn overlaps(&self, other: &TileRect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub(crate) fn intersection(&self, other: &TileRect) -> Option<TileRect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        if x1 < x2 && y1 < y2 {
            Some(TileRect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Corners in drawing order: origin, +x, +x+y, +y.
    pub(crate) fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.x + self.width, self.y),
            Vec2::new(self.x + self.width, self.y + self.height),
            Vec2::new(self.x, self.y + self.height),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CollisionOutcome {
    pub(crate) position: Vec2,
    pub(crate) collided: bool,
}

/// Single pass over `obstacles` in order. Every overlap is measured against
/// the hit box at the incoming position and its push-out is added on top of
/// the previous ones; residual penetration after multi-box contact is kept.
pub(crate) fn resolve(
    position: Vec2,
    hit_box: TileRect,
    obstacles: &[TileRect],
) -> CollisionOutcome {
    let actor_box = hit_box.translated(position.x, position.y);
    let mut resolved = position;
    let mut collided = false;

    for obstacle in obstacles {
        if !actor_box.overlaps(obstacle) {
            continue;
        }
        collided = true;
        let Some(overlap) = actor_box.intersection(obstacle) else {
            continue;
        };
        if overlap.width > overlap.height {
            if overlap.y > obstacle.y {
                resolved.y += overlap.height;
            } else {
                resolved.y -= overlap.height;
            }
        } else if overlap.x > obstacle.x {
            resolved.x += overlap.width;
        } else {
            resolved.x -= overlap.width;
        }
    }

    CollisionOutcome {
        position: resolved,
        collided,
    }
}
