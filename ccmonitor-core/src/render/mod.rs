//! Timeline rendering model
//!
//! Pure computation of what a timeline view shows: per-column density tiers
//! for every timeline and a shared, adaptive time axis. No terminal or
//! styling code lives here; front ends map [`DensityTier`]s to glyphs and
//! colours themselves.

pub mod axis;
pub mod density;
mod grid;

pub use axis::{time_axis, AxisTick, AxisUnit, TimeAxis};
pub use density::{bucket_counts, density_row, DensityTier};
pub use grid::{GridRow, TimelineGrid, THREAD_PREFIX};
