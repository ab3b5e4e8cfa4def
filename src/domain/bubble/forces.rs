//! Velocity forces composed by [`Simulation`](super::Simulation).
//!
//! Each force only nudges `vx`/`vy`; integration and clamping happen in the
//! simulation step.

use super::entities::BubbleNode;
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Offset used to separate coincident nodes.
const JIGGLE: f64 = 1e-6;

/// A per-tick velocity mutation over the active nodes.
pub trait Force {
    fn apply(&mut self, nodes: &mut [BubbleNode], alpha: f64);
}

impl<F> Force for F
where
    F: FnMut(&mut [BubbleNode], f64),
{
    fn apply(&mut self, nodes: &mut [BubbleNode], alpha: f64) {
        self(nodes, alpha)
    }
}

/// Pulls every node toward `target` on the x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterX {
    pub target: f64,
    pub strength: f64,
}

impl Force for CenterX {
    fn apply(&mut self, nodes: &mut [BubbleNode], alpha: f64) {
        for node in nodes {
            node.vx += (self.target - node.x) * self.strength * alpha;
        }
    }
}

/// Pulls every node toward `target` on the y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterY {
    pub target: f64,
    pub strength: f64,
}

impl Force for CenterY {
    fn apply(&mut self, nodes: &mut [BubbleNode], alpha: f64) {
        for node in nodes {
            node.vy += (self.target - node.y) * self.strength * alpha;
        }
    }
}

/// Resolves overlaps between circles of `radius + padding`.
///
/// Uses next-step positions (`x + vx`) and splits the correction by squared
/// radii so that small bubbles yield to big ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collide {
    pub padding: f64,
    pub strength: f64,
}

impl Force for Collide {
    fn apply(&mut self, nodes: &mut [BubbleNode], _alpha: f64) {
        for j in 1..nodes.len() {
            let (head, tail) = nodes.split_at_mut(j);
            let b = &mut tail[0];
            let rb = b.radius + self.padding;

            for a in head.iter_mut() {
                let ra = a.radius + self.padding;
                let reach = ra + rb;

                let mut dx = (a.x + a.vx) - (b.x + b.vx);
                let mut dy = (a.y + a.vy) - (b.y + b.vy);
                let mut dist2 = dx * dx + dy * dy;
                if dist2 >= reach * reach {
                    continue;
                }
                if dx == 0.0 {
                    dx = JIGGLE;
                    dist2 += dx * dx;
                }
                if dy == 0.0 {
                    dy = JIGGLE;
                    dist2 += dy * dy;
                }

                let dist = dist2.sqrt();
                let push = (reach - dist) / dist * self.strength;
                dx *= push;
                dy *= push;

                let weight = rb * rb / (ra * ra + rb * rb);
                a.vx += dx * weight;
                a.vy += dy * weight;
                b.vx -= dx * (1.0 - weight);
                b.vy -= dy * (1.0 - weight);
            }
        }
    }
}

/// Pairwise charge. Negative strength repels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManyBody {
    pub strength: f64,
    pub distance_min: f64,
}

impl ManyBody {
    pub fn new(strength: f64) -> Self {
        Self { strength, distance_min: 1.0 }
    }
}

impl Force for ManyBody {
    fn apply(&mut self, nodes: &mut [BubbleNode], alpha: f64) {
        let positions: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x, n.y)).collect();
        let min2 = self.distance_min * self.distance_min;

        for (i, node) in nodes.iter_mut().enumerate() {
            for (j, &(xj, yj)) in positions.iter().enumerate() {
                if i == j {
                    continue;
                }
                let mut dx = xj - node.x;
                let mut dy = yj - node.y;
                if dx == 0.0 && dy == 0.0 {
                    // Coincident pair: push along x in opposite directions.
                    dx = if i < j { JIGGLE } else { -JIGGLE };
                    dy = 0.0;
                }
                let mut dist2 = dx * dx + dy * dy;
                if dist2 < min2 {
                    dist2 = (min2 * dist2).sqrt();
                }
                node.vx += dx * self.strength * alpha / dist2;
                node.vy += dy * self.strength * alpha / dist2;
            }
        }
    }
}

/// Random velocity jitter scaled by alpha; keeps the cluster floating.
#[derive(Debug, Clone)]
pub struct Drift {
    pub magnitude: f64,
    rng: SmallRng,
}

impl Drift {
    pub fn new(magnitude: f64, seed: u64) -> Self {
        Self { magnitude, rng: SmallRng::seed_from_u64(seed) }
    }
}

impl Force for Drift {
    fn apply(&mut self, nodes: &mut [BubbleNode], alpha: f64) {
        for node in nodes {
            node.vx += self.rng.gen_range(-0.5..0.5) * self.magnitude * alpha;
            node.vy += self.rng.gen_range(-0.5..0.5) * self.magnitude * alpha;
        }
    }
}
