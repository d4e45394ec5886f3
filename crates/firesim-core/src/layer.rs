//! Zone visualization layer.
//!
//! Derives one polygon overlay per zone plus an optional heat overlay from a
//! result's zone list, and filters their visibility by time step. Overlays are
//! built once per result; moving the time window only shows or hides them.

use tracing::debug;

use crate::geometry::GeoBounds;
use crate::models::FireZone;
use crate::overlay::{HeatOverlay, MapSurface, Overlay, OverlayId, OverlayKind, ZoneOverlay};

/// Padding applied when fitting the map view to the spread extent.
pub const FIT_PADDING_PX: u32 = 50;

/// Owns the overlay set for the current result and the map it is drawn on.
pub struct ZoneVisualizationLayer<M: MapSurface> {
    map: M,
    zones: Vec<Overlay>,
    heat: Option<Overlay>,
    time_window: Option<i64>,
    next_id: u64,
}

impl<M: MapSurface> ZoneVisualizationLayer<M> {
    pub fn new(map: M) -> Self {
        Self {
            map,
            zones: Vec::new(),
            heat: None,
            time_window: None,
            next_id: 1,
        }
    }

    /// Replace all overlays with ones derived from `zones`.
    ///
    /// An empty zone list is legal and leaves the layer empty without
    /// touching the map view.
    pub fn rebuild(&mut self, zones: &[FireZone]) {
        self.clear();

        for zone in zones {
            let overlay = Overlay::new(
                self.allocate_id(),
                OverlayKind::Zone(ZoneOverlay::from_zone(zone)),
            );
            self.map.add_overlay(&overlay);
            self.zones.push(overlay);
        }

        let Some(last) = zones.last() else {
            return;
        };

        let heat = Overlay::new(
            self.allocate_id(),
            OverlayKind::Heat(HeatOverlay::from_zones(zones)),
        );
        self.map.add_overlay(&heat);
        self.heat = Some(heat);

        if let Some(bounds) = GeoBounds::from_points(&last.perimeter) {
            self.map.fit_bounds(bounds, FIT_PADDING_PX);
        }

        debug!(zones = self.zones.len(), "rebuilt fire zone overlays");
    }

    /// Show overlays with `step <= max_step` and hide the rest.
    ///
    /// The heat overlay is shown whenever `max_step >= 0`. No-op while empty.
    pub fn set_time_window(&mut self, max_step: i64) {
        if !self.is_built() {
            return;
        }

        for overlay in &self.zones {
            let visible = overlay
                .step()
                .is_some_and(|step| i64::from(step) <= max_step);
            apply_visibility(&mut self.map, overlay, visible);
        }
        if let Some(heat) = &self.heat {
            apply_visibility(&mut self.map, heat, max_step >= 0);
        }

        self.time_window = Some(max_step);
        debug!(max_step, "applied time window");
    }

    /// Remove every overlay from the map and forget it. Idempotent.
    pub fn clear(&mut self) {
        let removed = self.zones.len() + usize::from(self.heat.is_some());
        for overlay in self.zones.drain(..).chain(self.heat.take()) {
            if self.map.has_overlay(overlay.id()) {
                self.map.remove_overlay(overlay.id());
            }
        }
        self.time_window = None;
        if removed > 0 {
            debug!(removed, "cleared fire zone overlays");
        }
    }

    pub fn is_built(&self) -> bool {
        !self.zones.is_empty()
    }

    /// Every overlay owned by the layer, shown or not.
    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> {
        self.zones.iter().chain(self.heat.iter())
    }

    pub fn zone_overlays(&self) -> &[Overlay] {
        &self.zones
    }

    pub fn heat_overlay(&self) -> Option<&Overlay> {
        self.heat.as_ref()
    }

    /// Overlays currently displayed on the map.
    pub fn visible_overlays(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays()
            .filter(move |overlay| self.map.has_overlay(overlay.id()))
    }

    /// Last applied upper bound. `None` means everything built is shown.
    pub fn time_window(&self) -> Option<i64> {
        self.time_window
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    fn allocate_id(&mut self) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        id
    }
}

fn apply_visibility<M: MapSurface>(map: &mut M, overlay: &Overlay, visible: bool) {
    match (visible, map.has_overlay(overlay.id())) {
        (true, false) => map.add_overlay(overlay),
        (false, true) => map.remove_overlay(overlay.id()),
        _ => {}
    }
}
