//! Renderable overlays and the map surface they are drawn on.

use std::collections::BTreeMap;

use crate::geometry::GeoBounds;
use crate::models::{FireZone, LatLon};
use crate::style::{clamp_intensity, HeatOptions, ZoneStyle};

/// Identity of an overlay for the lifetime of the layer that built it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(pub u64);

/// Polygon derived from a single zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneOverlay {
    pub step: u32,
    pub ring: Vec<LatLon>,
    pub style: ZoneStyle,
    pub popup: String,
}

impl ZoneOverlay {
    pub fn from_zone(zone: &FireZone) -> Self {
        let style = ZoneStyle::for_intensity(zone.intensity);
        let popup = format!(
            "Fire Zone {}\nTime: {} min\nDistance: {:.0} m\nIntensity: {:.0}%",
            zone.step,
            zone.time,
            zone.distance,
            style.intensity * 100.0
        );
        Self {
            step: zone.step,
            ring: zone.perimeter.clone(),
            style,
            popup,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub position: LatLon,
    /// Clamped intensity of the zone the point came from
    pub weight: f64,
}

/// Aggregated intensity overlay built from every perimeter point of every zone.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatOverlay {
    pub points: Vec<HeatPoint>,
    pub options: HeatOptions,
}

impl HeatOverlay {
    pub fn from_zones(zones: &[FireZone]) -> Self {
        let points = zones
            .iter()
            .flat_map(|zone| {
                let weight = clamp_intensity(zone.intensity);
                zone.perimeter
                    .iter()
                    .map(move |&position| HeatPoint { position, weight })
            })
            .collect();
        Self {
            points,
            options: HeatOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayKind {
    Zone(ZoneOverlay),
    Heat(HeatOverlay),
}

/// One renderable unit handed to the map surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    id: OverlayId,
    kind: OverlayKind,
}

impl Overlay {
    pub fn new(id: OverlayId, kind: OverlayKind) -> Self {
        Self { id, kind }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn kind(&self) -> &OverlayKind {
        &self.kind
    }

    /// Step of the source zone. `None` for the heat overlay.
    pub fn step(&self) -> Option<u32> {
        match &self.kind {
            OverlayKind::Zone(zone) => Some(zone.step),
            OverlayKind::Heat(_) => None,
        }
    }

    pub fn is_heat(&self) -> bool {
        matches!(self.kind, OverlayKind::Heat(_))
    }
}

/// Map collaborator that displays overlays.
///
/// Implementations only render; the visualization layer decides what is shown.
pub trait MapSurface {
    fn add_overlay(&mut self, overlay: &Overlay);

    fn remove_overlay(&mut self, id: OverlayId);

    fn has_overlay(&self, id: OverlayId) -> bool;

    fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: u32);
}

/// Headless map that keeps displayed overlays in memory.
#[derive(Debug, Default)]
pub struct InMemoryMap {
    displayed: BTreeMap<OverlayId, Overlay>,
    last_fit: Option<(GeoBounds, u32)>,
    added: usize,
    removed: usize,
}

impl InMemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn displayed(&self) -> impl Iterator<Item = &Overlay> {
        self.displayed.values()
    }

    /// Steps of displayed zone overlays, ascending.
    pub fn visible_steps(&self) -> Vec<u32> {
        let mut steps: Vec<u32> = self.displayed.values().filter_map(Overlay::step).collect();
        steps.sort_unstable();
        steps
    }

    pub fn heat_visible(&self) -> bool {
        self.displayed.values().any(Overlay::is_heat)
    }

    pub fn len(&self) -> usize {
        self.displayed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displayed.is_empty()
    }

    pub fn last_fit(&self) -> Option<(GeoBounds, u32)> {
        self.last_fit
    }

    /// Total add calls received.
    pub fn added(&self) -> usize {
        self.added
    }

    /// Total remove calls that removed something.
    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl MapSurface for InMemoryMap {
    fn add_overlay(&mut self, overlay: &Overlay) {
        self.added += 1;
        self.displayed.insert(overlay.id(), overlay.clone());
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        if self.displayed.remove(&id).is_some() {
            self.removed += 1;
        }
    }

    fn has_overlay(&self, id: OverlayId) -> bool {
        self.displayed.contains_key(&id)
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: u32) {
        self.last_fit = Some((bounds, padding_px));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(step: u32, intensity: f64) -> FireZone {
        FireZone {
            step,
            time: step * 5,
            distance: 487.8,
            intensity,
            perimeter: vec![
                LatLon::new(34.0, -118.0),
                LatLon::new(34.1, -118.0),
                LatLon::new(34.0, -118.1),
            ],
        }
    }

    #[test]
    fn zone_overlay_popup_describes_zone() {
        let overlay = ZoneOverlay::from_zone(&zone(3, 0.75));
        assert_eq!(overlay.step, 3);
        assert_eq!(
            overlay.popup,
            "Fire Zone 3\nTime: 15 min\nDistance: 488 m\nIntensity: 75%"
        );
    }

    #[test]
    fn heat_points_carry_clamped_zone_intensity() {
        let heat = HeatOverlay::from_zones(&[zone(0, 1.5), zone(1, -0.2)]);
        assert_eq!(heat.points.len(), 6);
        assert!(heat.points[..3].iter().all(|p| p.weight == 1.0));
        assert!(heat.points[3..].iter().all(|p| p.weight == 0.0));
    }

    #[test]
    fn in_memory_map_tracks_displayed_overlays() {
        let mut map = InMemoryMap::new();
        let overlay = Overlay::new(
            OverlayId(7),
            OverlayKind::Zone(ZoneOverlay::from_zone(&zone(2, 0.5))),
        );

        map.add_overlay(&overlay);
        assert!(map.has_overlay(OverlayId(7)));
        assert_eq!(map.visible_steps(), vec![2]);
        assert!(!map.heat_visible());

        map.remove_overlay(OverlayId(7));
        map.remove_overlay(OverlayId(7));
        assert!(map.is_empty());
        assert_eq!(map.added(), 1);
        assert_eq!(map.removed(), 1);
    }
}
