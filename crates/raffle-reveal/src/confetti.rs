//! Decorative confetti spawned on reveal

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Particle palette (RGB hex)
pub const CONFETTI_COLORS: [&str; 6] = [
    "#2563EB", "#F59E0B", "#10B981", "#EF4444", "#8B5CF6", "#EC4899",
];

/// One confetti particle.
///
/// Positions are normalized to the view (0.0..1.0 horizontally); the renderer
/// owns the actual trajectory animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfettiParticle {
    pub id: usize,
    /// Horizontal start position (fraction of width)
    pub x: f32,
    /// Start offset above the top edge (px, negative)
    pub y: f32,
    /// Initial rotation (degrees)
    pub rotation: f32,
    pub scale: f32,
    pub color: String,
    /// Delay before falling (ms)
    pub delay_ms: f32,
    /// Fall duration (ms)
    pub fall_ms: f32,
    /// Horizontal drift waypoints (px)
    pub drift: [f32; 4],
}

/// Spawn `count` particles
pub fn spawn_confetti<R: Rng>(count: usize, rng: &mut R) -> Vec<ConfettiParticle> {
    (0..count)
        .map(|id| ConfettiParticle {
            id,
            x: rng.random::<f32>(),
            y: -50.0 - rng.random::<f32>() * 200.0,
            rotation: rng.random::<f32>() * 360.0,
            scale: 0.5 + rng.random::<f32>() * 0.5,
            color: CONFETTI_COLORS
                .choose(rng)
                .copied()
                .unwrap_or(CONFETTI_COLORS[0])
                .to_string(),
            delay_ms: rng.random::<f32>() * 500.0,
            fall_ms: 2000.0 + rng.random::<f32>() * 1000.0,
            drift: std::array::from_fn(|_| (rng.random::<f32>() - 0.5) * 100.0),
        })
        .collect()
}
