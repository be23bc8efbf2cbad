//! Entity classification and geometry extraction
//!
//! Pure functions over merged entity records: semantic category, icon lookup,
//! polygon vertices, and centroid placement for icon quads.

use geo::Centroid;
use geo_types::{LineString, Polygon};
use glam::Vec2;

use crate::core::types::EntityId;
use crate::entity::record::RawRecord;

/// Concrete entity type as tagged in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Civilian,
    AmbulanceTeam,
    FireBrigade,
    PoliceForce,
    Blockade,
    Road,
    Hydrant,
    Building,
    Refuge,
    AmbulanceCentre,
    FireStation,
    PoliceOffice,
    GasStation,
}

impl EntityKind {
    /// Resolve a log type tag. Unrecognized tags classify as plain buildings.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Civilian" => Self::Civilian,
            "AmbulanceTeam" => Self::AmbulanceTeam,
            "FireBrigade" => Self::FireBrigade,
            "PoliceForce" => Self::PoliceForce,
            "Blockade" => Self::Blockade,
            "Road" => Self::Road,
            "Hydrant" => Self::Hydrant,
            "Building" => Self::Building,
            "Refuge" => Self::Refuge,
            "AmbulanceCentre" => Self::AmbulanceCentre,
            "FireStation" => Self::FireStation,
            "PoliceOffice" => Self::PoliceOffice,
            "GasStation" => Self::GasStation,
            _ => Self::Building,
        }
    }

    /// Semantic category used for cycle snapshot partitioning
    pub const fn category(self) -> Category {
        match self {
            Self::Civilian | Self::AmbulanceTeam | Self::FireBrigade | Self::PoliceForce => {
                Category::Human
            }
            Self::Blockade => Category::Blockade,
            Self::Road | Self::Hydrant => Category::Road,
            Self::Building
            | Self::Refuge
            | Self::AmbulanceCentre
            | Self::FireStation
            | Self::PoliceOffice
            | Self::GasStation => Category::Building,
        }
    }

    /// Icon for entity kinds that are drawn with a texture
    pub const fn icon(self) -> Option<IconKind> {
        match self {
            Self::PoliceOffice => Some(IconKind::PoliceOffice),
            Self::AmbulanceCentre => Some(IconKind::AmbulanceCentre),
            Self::FireStation => Some(IconKind::FireStation),
            Self::Refuge => Some(IconKind::Refuge),
            Self::GasStation => Some(IconKind::GasStation),
            Self::Hydrant => Some(IconKind::Hydrant),
            _ => None,
        }
    }

    /// True for kinds that contribute filled-area polygon geometry.
    /// Humans and hydrants are point entities.
    pub const fn is_surface(self) -> bool {
        match self {
            Self::Civilian
            | Self::AmbulanceTeam
            | Self::FireBrigade
            | Self::PoliceForce
            | Self::Hydrant => false,
            _ => true,
        }
    }
}

/// Mutually exclusive render category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Human,
    Blockade,
    Road,
    Building,
}

/// Icons available in the viewer texture atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum IconKind {
    PoliceOffice,
    AmbulanceCentre,
    FireStation,
    Refuge,
    GasStation,
    Hydrant,
}

impl IconKind {
    /// All icons, in the order the host's texture list is conventionally built
    pub const ALL: [IconKind; 6] = [
        IconKind::PoliceOffice,
        IconKind::AmbulanceCentre,
        IconKind::FireStation,
        IconKind::Refuge,
        IconKind::GasStation,
        IconKind::Hydrant,
    ];
}

/// A classified entity, immutable once built for a cycle.
///
/// Later deltas for the same id never mutate an `Entity`; they produce a new
/// one through [`Entity::merged`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    vertices: Vec<f32>,
    x: Option<f32>,
    y: Option<f32>,
    hp: Option<u32>,
    buriedness: Option<u32>,
    repair_cost: Option<u32>,
    fieryness: Option<u32>,
}

impl Entity {
    /// Classify a raw record into a full entity. Records without a type tag
    /// fall back to the building category.
    pub fn from_record(record: &RawRecord) -> Self {
        Self {
            id: EntityId(record.id),
            kind: record
                .kind
                .as_deref()
                .map(EntityKind::from_tag)
                .unwrap_or(EntityKind::Building),
            vertices: record.apexes.clone().unwrap_or_default(),
            x: record.x,
            y: record.y,
            hp: record.hp,
            buriedness: record.buriedness,
            repair_cost: record.repair_cost,
            fieryness: record.fieryness,
        }
    }

    /// Overlay a delta record onto this entity, field by field.
    ///
    /// Fields absent from the delta keep their previous value; fields present
    /// replace it. The id is taken from the existing entity.
    pub fn merged(&self, delta: &RawRecord) -> Self {
        Self {
            id: self.id,
            kind: delta
                .kind
                .as_deref()
                .map(EntityKind::from_tag)
                .unwrap_or(self.kind),
            vertices: delta
                .apexes
                .clone()
                .unwrap_or_else(|| self.vertices.clone()),
            x: delta.x.or(self.x),
            y: delta.y.or(self.y),
            hp: delta.hp.or(self.hp),
            buriedness: delta.buriedness.or(self.buriedness),
            repair_cost: delta.repair_cost.or(self.repair_cost),
            fieryness: delta.fieryness.or(self.fieryness),
        }
    }

    pub const fn id(&self) -> EntityId {
        self.id
    }

    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    pub const fn category(&self) -> Category {
        self.kind.category()
    }

    pub const fn icon(&self) -> Option<IconKind> {
        self.kind.icon()
    }

    /// Flat polygon outline; empty for point entities
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub const fn is_surface(&self) -> bool {
        self.kind.is_surface()
    }

    pub const fn hp(&self) -> Option<u32> {
        self.hp
    }

    pub const fn buriedness(&self) -> Option<u32> {
        self.buriedness
    }

    pub const fn repair_cost(&self) -> Option<u32> {
        self.repair_cost
    }

    pub const fn fieryness(&self) -> Option<u32> {
        self.fieryness
    }

    /// Recorded point position, if the record carried one
    pub fn position(&self) -> Option<Vec2> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Vec2::new(x, y)),
            _ => None,
        }
    }

    /// Placement point for icon quads: the polygon centroid when the entity
    /// has a footprint, otherwise the recorded point position.
    pub fn center(&self) -> Option<Vec2> {
        if self.vertices.len() >= 6 {
            let ring: Vec<(f32, f32)> = self
                .vertices
                .chunks_exact(2)
                .map(|pair| (pair[0], pair[1]))
                .collect();
            let polygon = Polygon::new(LineString::from(ring), vec![]);
            if let Some(point) = polygon.centroid() {
                return Some(Vec2::new(point.x(), point.y()));
            }
        }
        self.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_record(id: u64, kind: &str) -> RawRecord {
        let mut record = RawRecord::tagged(id, kind);
        record.apexes = Some(vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0]);
        record
    }

    #[test]
    fn test_classification_is_total() {
        // Any tag, recognized or not, lands in exactly one category
        for tag in ["Civilian", "Blockade", "Road", "Refuge", "SomethingNew", ""] {
            let kind = EntityKind::from_tag(tag);
            let _ = kind.category();
        }
        assert_eq!(EntityKind::from_tag("Mystery").category(), Category::Building);
    }

    #[test]
    fn test_human_kinds_classify_as_human() {
        for tag in ["Civilian", "AmbulanceTeam", "FireBrigade", "PoliceForce"] {
            assert_eq!(EntityKind::from_tag(tag).category(), Category::Human);
        }
    }

    #[test]
    fn test_hydrant_is_road_point_entity() {
        let kind = EntityKind::from_tag("Hydrant");
        assert_eq!(kind.category(), Category::Road);
        assert!(!kind.is_surface());
        assert_eq!(kind.icon(), Some(IconKind::Hydrant));
    }

    #[test]
    fn test_plain_buildings_have_no_icon() {
        assert_eq!(EntityKind::Building.icon(), None);
        assert_eq!(EntityKind::Road.icon(), None);
        assert_eq!(EntityKind::PoliceOffice.icon(), Some(IconKind::PoliceOffice));
    }

    #[test]
    fn test_centroid_of_square() {
        let entity = Entity::from_record(&square_record(1, "Building"));
        let center = entity.center().unwrap();
        assert!((center.x - 5.0).abs() < 1e-4);
        assert!((center.y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_center_falls_back_to_point_position() {
        let mut record = RawRecord::tagged(2, "Civilian");
        record.x = Some(3.0);
        record.y = Some(4.0);
        let entity = Entity::from_record(&record);
        assert_eq!(entity.center(), Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn test_center_of_nothing_is_none() {
        let entity = Entity::from_record(&RawRecord::tagged(3, "Civilian"));
        assert_eq!(entity.center(), None);
    }

    #[test]
    fn test_merge_preserves_absent_fields() {
        let mut base = square_record(5, "Civilian");
        base.x = Some(1.0);
        base.y = Some(2.0);
        base.hp = Some(10_000);
        base.buriedness = Some(3);
        let entity = Entity::from_record(&base);

        let mut delta = RawRecord::tagged(5, "Civilian");
        delta.kind = None;
        delta.x = Some(6.0);
        let merged = entity.merged(&delta);

        assert_eq!(merged.position(), Some(Vec2::new(6.0, 2.0)));
        assert_eq!(merged.hp(), Some(10_000));
        assert_eq!(merged.buriedness(), Some(3));
        assert_eq!(merged.kind(), EntityKind::Civilian);
        assert_eq!(merged.vertices(), entity.vertices());
    }

    #[test]
    fn test_merge_overlays_present_fields() {
        let entity = Entity::from_record(&square_record(6, "Blockade"));
        let mut delta = RawRecord::tagged(6, "Blockade");
        delta.kind = None;
        delta.repair_cost = Some(40);
        delta.apexes = Some(vec![0.0, 0.0, 2.0, 0.0, 2.0, 2.0]);

        let merged = entity.merged(&delta);
        assert_eq!(merged.repair_cost(), Some(40));
        assert_eq!(merged.vertices().len(), 6);
    }
}
