//! Color mapping for entity categories and visual states

use crate::core::types::Color;
use crate::entity::classify::{Category, Entity, EntityKind};

/// Health ceiling used by the simulator for humans
pub const MAX_HP: u32 = 10_000;

/// Burial depth at which a human renders fully darkened
const MAX_BURIEDNESS: u32 = 60;

/// Repair cost at which a blockade renders fully darkened
const MAX_REPAIR_COST: u32 = 100;

/// Fire intensity ceiling for buildings
const MAX_FIERYNESS: u32 = 8;

/// Deterministic color table for the replay viewer.
///
/// Hosts may override any entry; every lookup stays a pure function of the
/// entity's category and state scalars.
#[derive(Debug, Clone)]
pub struct Palette {
    pub road: Color,
    pub building: Color,
    /// Interpolation target for buildings as fieryness rises
    pub building_burning: Color,
    pub blockade: Color,
    pub civilian: Color,
    pub ambulance_team: Color,
    pub fire_brigade: Color,
    pub police_force: Color,
    /// Interpolation target for humans as hp drops
    pub casualty: Color,
    /// Border outline color around roads and buildings
    pub border: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            road: Color::rgb(0.45, 0.45, 0.45),
            building: Color::rgb(0.62, 0.57, 0.50),
            building_burning: Color::rgb(0.85, 0.25, 0.05),
            blockade: Color::rgb(0.15, 0.15, 0.18),
            civilian: Color::rgb(0.25, 0.80, 0.30),
            ambulance_team: Color::rgb(0.95, 0.95, 0.95),
            fire_brigade: Color::rgb(0.90, 0.20, 0.15),
            police_force: Color::rgb(0.20, 0.40, 0.90),
            casualty: Color::rgb(0.10, 0.10, 0.10),
            border: Color::BLACK,
        }
    }
}

impl Palette {
    /// Resolve the draw color for an entity from its category and state
    pub fn color(&self, entity: &Entity) -> Color {
        match entity.category() {
            Category::Road => self.road,
            Category::Building => {
                let burn = entity.fieryness().unwrap_or(0).min(MAX_FIERYNESS);
                self.building
                    .lerp(self.building_burning, burn as f32 / MAX_FIERYNESS as f32)
            }
            Category::Blockade => {
                let cost = entity.repair_cost().unwrap_or(0).min(MAX_REPAIR_COST);
                self.blockade
                    .darken(1.0 - 0.5 * cost as f32 / MAX_REPAIR_COST as f32)
            }
            Category::Human => {
                let base = self.human_base(entity.kind());
                let tinted = self.health_tint(base, entity.hp().unwrap_or(MAX_HP));
                burial_tint(tinted, entity.buriedness().unwrap_or(0))
            }
        }
    }

    /// Base color for a human kind
    pub fn human_base(&self, kind: EntityKind) -> Color {
        match kind {
            EntityKind::AmbulanceTeam => self.ambulance_team,
            EntityKind::FireBrigade => self.fire_brigade,
            EntityKind::PoliceForce => self.police_force,
            _ => self.civilian,
        }
    }

    /// Interpolate toward the casualty color as hp drops
    pub fn health_tint(&self, base: Color, hp: u32) -> Color {
        let ratio = (hp.min(MAX_HP) as f32) / MAX_HP as f32;
        self.casualty.lerp(base, ratio)
    }
}

/// Darken with burial depth (deeper = darker, capped at 60% darkening)
pub fn burial_tint(base: Color, buriedness: u32) -> Color {
    let depth = (buriedness.min(MAX_BURIEDNESS) as f32) / MAX_BURIEDNESS as f32;
    base.darken(1.0 - depth * 0.6)
}
