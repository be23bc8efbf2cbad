//! Incremental cycle reconstruction and render baking
//!
//! Builds the baseline world from the first log record, folds each later
//! delta into a fresh snapshot, and bakes every cycle into a historian.
//! Road geometry is baked exactly once: the baseline historian is frozen
//! after cycle 0 and every later cycle starts from a clone of it, as does
//! the border-outline line list.

use crossbeam_channel::Sender;
use glam::Vec2;

use crate::core::config::ReplaySettings;
use crate::core::error::Result;
use crate::core::types::Cycle;
use crate::entity::classify::{Category, Entity, IconKind};
use crate::geometry::bounds::MapBounds;
use crate::geometry::position::{mirror_y, quad_around, PositionMaker};
use crate::history::historian::Historian;
use crate::history::manager::HistoryManager;
use crate::replay::log::ReplayLog;
use crate::replay::snapshot::CycleSnapshot;
use crate::replay::worker::{IconAtlas, WorkerEvent};

/// Icon placement captured once during the baseline scan. Icon-bearing
/// entities are stationary, so the center never needs re-deriving.
#[derive(Debug, Clone, Copy)]
struct IconSprite {
    icon: IconKind,
    center: Vec2,
}

/// The stateful fold-and-bake machine. Strictly sequential: cycle N is built
/// from cycle N-1's snapshot, and each cycle is baked and emitted before the
/// next fold begins.
pub struct CycleReconstructor {
    settings: ReplaySettings,
    atlas: IconAtlas,
    events: Sender<WorkerEvent>,
    maker: PositionMaker,
    base_historian: Historian,
    base_line_list: Vec<f32>,
    icon_sprites: Vec<IconSprite>,
}

impl CycleReconstructor {
    pub fn new(settings: ReplaySettings, atlas: IconAtlas, events: Sender<WorkerEvent>) -> Self {
        Self {
            settings,
            atlas,
            events,
            maker: PositionMaker::new(),
            base_historian: Historian::default(),
            base_line_list: Vec::new(),
            icon_sprites: Vec::new(),
        }
    }

    /// Run the full pipeline over a decoded log, emitting one historian per
    /// cycle in cycle order
    pub fn run(&mut self, log: &ReplayLog) -> Result<()> {
        let mut snapshot = self.build_baseline(log)?;
        let last_cycle = log.cycles() - 1;

        for cycle in 1..log.cycles() {
            let mut next = snapshot.next_cycle_base();
            // Release the previous cycle's state before folding; live memory
            // stays bounded to two cycles of entity maps.
            drop(snapshot);

            for record in log.entities(cycle) {
                next.apply_record(record);
            }
            self.bake_cycle(cycle, &next);
            self.progress(
                format!("Reconstructed cycle {cycle}/{last_cycle}"),
                Some(100.0 * cycle as f32 / last_cycle as f32),
            );
            snapshot = next;
        }

        self.progress("Game cycle entities are loaded.".to_string(), Some(100.0));
        Ok(())
    }

    /// Scan the complete cycle-0 entity list: classify and bucket every
    /// record, capture icon placements, accumulate map bounds over surface
    /// geometry, then bake and freeze the road baseline.
    fn build_baseline(&mut self, log: &ReplayLog) -> Result<CycleSnapshot> {
        let mut info = log.info().cloned().unwrap_or_default();
        info.last_cycle = Some(log.cycles() - 1);
        self.send(WorkerEvent::Info(info));

        let mut snapshot = CycleSnapshot::new();
        let mut bounds = MapBounds::default();
        for record in log.entities(0) {
            let entity = Entity::from_record(record);
            if let (Some(icon), Some(center)) = (entity.icon(), entity.center()) {
                self.icon_sprites.push(IconSprite { icon, center });
            }
            if entity.is_surface() {
                bounds.include_vertices(entity.vertices());
            }
            snapshot.insert(entity);
        }
        tracing::info!(
            entities = snapshot.len(),
            icons = self.icon_sprites.len(),
            "baseline world scanned"
        );

        self.send(WorkerEvent::MapBounds(bounds));
        self.progress("Map entities are loaded.".to_string(), None);
        self.bake_cycle(0, &snapshot);
        Ok(snapshot)
    }

    /// Bake one cycle into a historian seeded from the frozen baseline and
    /// emit it. Submission order is fixed: buildings, blockades, border
    /// outlines, humans, icons; later submissions layer on top of earlier
    /// ones.
    fn bake_cycle(&mut self, cycle: Cycle, snapshot: &CycleSnapshot) {
        let mut manager = HistoryManager::new(self.base_historian.clone());

        if cycle == 0 {
            let mut lines = Vec::new();
            self.collect_border_lines(snapshot, Category::Road, &mut lines);
            self.collect_border_lines(snapshot, Category::Building, &mut lines);
            self.base_line_list = lines;

            self.fill_polygons(&mut manager, snapshot, Category::Road);
            self.base_historian = manager.historian().clone();
        }

        self.fill_polygons(&mut manager, snapshot, Category::Building);
        self.fill_polygons(&mut manager, snapshot, Category::Blockade);
        if self.settings.draw_border_lines {
            let border = self.settings.palette.border;
            manager.set_color(border.r, border.g, border.b, border.a);
            manager.submit(&self.base_line_list);
        }
        self.fill_humans(&mut manager, snapshot);
        self.fill_icons(&mut manager);

        let historian = manager.into_historian();
        tracing::debug!(cycle, submissions = historian.len(), "cycle baked");
        self.send(WorkerEvent::CycleData { cycle, historian });
    }

    /// Triangulate and submit every surface entity of one category, in id
    /// order. Entities without a usable outline are skipped.
    fn fill_polygons(
        &mut self,
        manager: &mut HistoryManager,
        snapshot: &CycleSnapshot,
        category: Category,
    ) {
        let partition = snapshot.partition(category);
        for id in snapshot.sorted_ids(category) {
            let Some(entity) = partition.get(&id) else {
                continue;
            };
            if entity.vertices().len() < 6 {
                continue;
            }
            self.maker.reset();
            self.maker.add_polygon(&mirror_y(entity.vertices()));

            let color = self.settings.palette.color(entity);
            manager.set_color(color.r, color.g, color.b, color.a);
            manager.submit(self.maker.positions());
        }
    }

    /// Extrude border outlines for one category into `lines`. Built once at
    /// the baseline cycle and reused verbatim afterwards.
    fn collect_border_lines(
        &mut self,
        snapshot: &CycleSnapshot,
        category: Category,
        lines: &mut Vec<f32>,
    ) {
        if !self.settings.draw_border_lines {
            return;
        }
        let partition = snapshot.partition(category);
        for id in snapshot.sorted_ids(category) {
            let Some(entity) = partition.get(&id) else {
                continue;
            };
            self.maker.reset();
            self.maker.add_closed_sequence_line(
                &mirror_y(entity.vertices()),
                self.settings.border_line_width,
            );
            lines.extend_from_slice(self.maker.positions());
        }
    }

    /// Humans are point entities: each becomes an icon-sized quad at its
    /// position, painted with its state color.
    fn fill_humans(&mut self, manager: &mut HistoryManager, snapshot: &CycleSnapshot) {
        let radius = self.settings.icon_radius;
        let partition = snapshot.partition(Category::Human);
        for id in snapshot.sorted_ids(Category::Human) {
            let Some(entity) = partition.get(&id) else {
                continue;
            };
            let Some(center) = entity.center() else {
                continue;
            };
            let color = self.settings.palette.color(entity);
            manager.set_color(color.r, color.g, color.b, color.a);
            manager.submit(&quad_around(center, radius));
        }
    }

    /// Texture-mapped quads for the icon placements captured at baseline
    fn fill_icons(&mut self, manager: &mut HistoryManager) {
        let radius = self.settings.icon_radius;
        manager.set_color(1.0, 1.0, 1.0, 1.0);
        for sprite in &self.icon_sprites {
            let Some(slot) = self.atlas.slot(sprite.icon) else {
                continue;
            };
            manager.set_texture_slot(slot);
            manager.set_texture_resolution(radius * 4.0, radius * 4.0);
            manager.set_texture_translation(sprite.center.x - radius, radius - sprite.center.y);
            manager.submit(&quad_around(sprite.center, radius));
        }
    }

    fn send(&self, event: WorkerEvent) {
        // A dropped receiver means the host abandoned the replay; the fold
        // still runs to completion, there is no cancellation primitive.
        let _ = self.events.send(event);
    }

    fn progress(&self, text: String, percent: Option<f32>) {
        self.send(WorkerEvent::Progress { text, percent });
    }
}
