//! Map surface for terminals.

use firesim_core::{GeoBounds, InMemoryMap, MapSurface, Overlay, OverlayId, OverlayKind};
use tracing::{debug, info};

/// Keeps overlays in memory and reports every change through tracing.
#[derive(Debug, Default)]
pub struct ConsoleMap {
    inner: InMemoryMap,
}

impl ConsoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible_steps(&self) -> Vec<u32> {
        self.inner.visible_steps()
    }

    pub fn heat_visible(&self) -> bool {
        self.inner.heat_visible()
    }

    pub fn last_fit(&self) -> Option<(GeoBounds, u32)> {
        self.inner.last_fit()
    }
}

impl MapSurface for ConsoleMap {
    fn add_overlay(&mut self, overlay: &Overlay) {
        match overlay.kind() {
            OverlayKind::Zone(zone) => debug!(
                id = overlay.id().0,
                step = zone.step,
                color = %zone.style.color(),
                fill_opacity = zone.style.fill_opacity,
                "show zone"
            ),
            OverlayKind::Heat(heat) => {
                debug!(id = overlay.id().0, points = heat.points.len(), "show heat overlay")
            }
        }
        self.inner.add_overlay(overlay);
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        debug!(id = id.0, "hide overlay");
        self.inner.remove_overlay(id);
    }

    fn has_overlay(&self, id: OverlayId) -> bool {
        self.inner.has_overlay(id)
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: u32) {
        let center = bounds.center();
        info!(
            south = bounds.south,
            west = bounds.west,
            north = bounds.north,
            east = bounds.east,
            center_lat = center.latitude,
            center_lon = center.longitude,
            padding_px,
            "fit view to spread extent"
        );
        self.inner.fit_bounds(bounds, padding_px);
    }
}
