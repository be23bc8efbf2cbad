//! Per-cycle reconstructed world state

use std::sync::Arc;

use ahash::AHashMap;

use crate::core::types::EntityId;
use crate::entity::classify::{Category, Entity};
use crate::entity::record::RawRecord;

/// Full world state at one cycle: every known entity plus one partition per
/// render category.
///
/// Entities are shared through `Arc`, so carrying state forward to the next
/// cycle copies pointers rather than entity payloads; only entities touched
/// by a delta get new allocations. Every id in `all` lives in exactly one
/// partition.
#[derive(Debug, Clone, Default)]
pub struct CycleSnapshot {
    all: AHashMap<EntityId, Arc<Entity>>,
    building: AHashMap<EntityId, Arc<Entity>>,
    road: AHashMap<EntityId, Arc<Entity>>,
    blockade: AHashMap<EntityId, Arc<Entity>>,
    human: AHashMap<EntityId, Arc<Entity>>,
}

impl CycleSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entity, moving it between partitions if its
    /// category changed
    pub fn insert(&mut self, entity: Entity) {
        let id = entity.id();
        let category = entity.category();
        if let Some(previous) = self.all.get(&id) {
            let previous_category = previous.category();
            if previous_category != category {
                self.partition_mut(previous_category).remove(&id);
            }
        }
        let shared = Arc::new(entity);
        self.all.insert(id, Arc::clone(&shared));
        self.partition_mut(category).insert(id, shared);
    }

    /// Fold one delta record in: overlay onto the known entity for that id,
    /// or classify and insert as new
    pub fn apply_record(&mut self, record: &RawRecord) {
        let id = EntityId(record.id);
        let merged = match self.all.get(&id) {
            Some(previous) => previous.merged(record),
            None => Entity::from_record(record),
        };
        self.insert(merged);
    }

    /// Begin the next cycle's state: everything carries forward except
    /// roads, which are re-derived from what the next delta reports. The
    /// renderable road baseline lives in the frozen base historian, not here.
    pub fn next_cycle_base(&self) -> Self {
        let mut all = self.all.clone();
        for id in self.road.keys() {
            all.remove(id);
        }
        Self {
            all,
            building: self.building.clone(),
            road: AHashMap::new(),
            blockade: self.blockade.clone(),
            human: self.human.clone(),
        }
    }

    pub fn all(&self) -> &AHashMap<EntityId, Arc<Entity>> {
        &self.all
    }

    pub fn partition(&self, category: Category) -> &AHashMap<EntityId, Arc<Entity>> {
        match category {
            Category::Building => &self.building,
            Category::Road => &self.road,
            Category::Blockade => &self.blockade,
            Category::Human => &self.human,
        }
    }

    fn partition_mut(&mut self, category: Category) -> &mut AHashMap<EntityId, Arc<Entity>> {
        match category {
            Category::Building => &mut self.building,
            Category::Road => &mut self.road,
            Category::Blockade => &mut self.blockade,
            Category::Human => &mut self.human,
        }
    }

    /// Ids of a partition in ascending order, for deterministic iteration
    pub fn sorted_ids(&self, category: Category) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.partition(category).keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}
