use glam::Vec2;

/// Axis-aligned rectangle in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Inclusive containment test. Positions exactly on the border are in.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[inline]
    pub fn area(&self) -> f32 {
        (self.max.x - self.min.x) * (self.max.y - self.min.y)
    }
}

/// Terrain category of an [`Zone`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneKind {
    Fertile,
    Rocky,
    Dry,
    Water,
    Shaded,
}

/// A named rectangular region with growth/cost modifiers.
///
/// The modifiers are part of the session's static data but are not
/// consulted by any simulation phase yet; see [`Environment`].
#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    pub name: String,
    pub kind: ZoneKind,
    pub bounds: Bounds,
    pub growth_multiplier: f32,
    pub energy_cost: f32,
    pub health_drain: f32,
}

/// The static world: a bounding rectangle plus zero or more zones.
///
/// Immutable for the lifetime of a session. The simulation phases only
/// consult [`Bounds::contains`] for placement legality; zone modifiers
/// are an extension point for future growth/cost rules and currently
/// influence nothing. Zones may overlap — [`Environment::zone_at`]
/// resolves overlaps by picking the smallest-area containing zone,
/// with declaration order breaking ties.
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    pub bounds: Bounds,
    pub zones: Vec<Zone>,
}

impl Environment {
    pub fn new(bounds: Bounds, zones: Vec<Zone>) -> Self {
        Self { bounds, zones }
    }

    /// Whether a position is a legal placement target.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.bounds.contains(p)
    }

    /// The zone governing a position, if any.
    ///
    /// Smallest-area zone wins; among equal areas the earliest-declared
    /// zone wins.
    pub fn zone_at(&self, p: Vec2) -> Option<&Zone> {
        let mut best: Option<&Zone> = None;
        for z in &self.zones {
            if !z.bounds.contains(p) {
                continue;
            }
            match best {
                Some(b) if z.bounds.area() >= b.bounds.area() => {}
                _ => best = Some(z),
            }
        }
        best
    }
}

impl Default for Environment {
    /// The default world: a 200x200 plane with a fertile center patch
    /// and a rocky strip along the northern edge.
    fn default() -> Self {
        Self {
            bounds: Bounds::new(Vec2::new(-100.0, -100.0), Vec2::new(100.0, 100.0)),
            zones: vec![
                Zone {
                    name: "fertile-center".to_owned(),
                    kind: ZoneKind::Fertile,
                    bounds: Bounds::new(Vec2::new(-20.0, -20.0), Vec2::new(20.0, 20.0)),
                    growth_multiplier: 1.2,
                    energy_cost: 0.0,
                    health_drain: 0.0,
                },
                Zone {
                    name: "rocky-north".to_owned(),
                    kind: ZoneKind::Rocky,
                    bounds: Bounds::new(Vec2::new(-100.0, 50.0), Vec2::new(100.0, 100.0)),
                    growth_multiplier: 0.7,
                    energy_cost: 5.0,
                    health_drain: 2.0,
                },
            ],
        }
    }
}
