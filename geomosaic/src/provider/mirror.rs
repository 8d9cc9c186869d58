//! Mirror selection strategies.
//!
//! Public tile servers are usually reachable through several equivalent
//! subdomains (`a`, `b`, `c`, ...). All of them serve identical content, so
//! which one is used only matters for spreading load. The strategy is
//! injected into the fetcher so tests can pin a deterministic choice.

use rand::Rng;

use crate::coord::TileCoord;

/// Chooses which mirror serves a tile request.
pub trait MirrorSelector: Send + Sync {
    /// Returns an index in `0..mirror_count`.
    ///
    /// Only called with `mirror_count > 0`.
    fn select(&self, tile: &TileCoord, mirror_count: usize) -> usize;
}

/// Picks a mirror uniformly at random for every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMirror;

impl MirrorSelector for RandomMirror {
    fn select(&self, _tile: &TileCoord, mirror_count: usize) -> usize {
        rand::rng().random_range(0..mirror_count)
    }
}

/// Always uses the same mirror.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMirror(pub usize);

impl MirrorSelector for FixedMirror {
    fn select(&self, _tile: &TileCoord, mirror_count: usize) -> usize {
        self.0 % mirror_count
    }
}

/// Derives the mirror from the tile position: `(x + y) % mirror_count`.
///
/// Deterministic, and neighbouring tiles land on different mirrors.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateMirror;

impl MirrorSelector for CoordinateMirror {
    fn select(&self, tile: &TileCoord, mirror_count: usize) -> usize {
        ((tile.x as u64 + tile.y as u64) % mirror_count as u64) as usize
    }
}
