use bevy::prelude::*;
use std::collections::BTreeMap;

pub mod config;
pub mod grid;
pub mod input;
pub mod line_editor;
pub mod modes;
pub mod names;
pub mod planner;
pub mod snap;
pub mod streets;
pub mod terrain;
pub mod transit_map;
pub mod world_init;

#[cfg(test)]
pub mod test_harness;

// ---------------------------------------------------------------------------
// Save extensions
// ---------------------------------------------------------------------------

/// A resource persisted through the save file's extension map.
///
/// Implementors own their serialized form. The save path asks every registered
/// type for bytes and stores whatever comes back under `SAVE_KEY`, so a module
/// opts into persistence from its own plugin and the save path never changes.
pub trait Saveable: Resource + Default + Send + Sync + 'static {
    /// Extension map key. Stable across versions; renaming it orphans
    /// previously written saves.
    const SAVE_KEY: &'static str;

    /// Serialize, or `None` to stay out of the save file entirely (typically
    /// when the resource holds nothing worth keeping).
    fn save_to_bytes(&self) -> Option<Vec<u8>>;

    fn load_from_bytes(bytes: &[u8]) -> Self;
}

/// `bitcode::decode` with a fallback: undecodable bytes log a warning and
/// yield the type's default instead of failing the whole load.
pub fn decode_or_warn<T: bitcode::DecodeOwned + Default>(key: &str, bytes: &[u8]) -> T {
    match bitcode::decode(bytes) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                "save extension '{}': discarding {} undecodable bytes: {}",
                key,
                bytes.len(),
                e
            );
            T::default()
        }
    }
}

type SaveFn = Box<dyn Fn(&World) -> Option<Vec<u8>> + Send + Sync>;
type LoadFn = Box<dyn Fn(&mut World, &[u8]) + Send + Sync>;

struct SaveableEntry {
    key: String,
    save_fn: SaveFn,
    load_fn: LoadFn,
}

/// Every `Saveable` type known to this build, collected while plugins run.
///
/// `save_all` and `load_all` walk the entries, so the code driving a save
/// never names individual resource types.
#[derive(Resource, Default)]
pub struct SaveableRegistry {
    entries: Vec<SaveableEntry>,
}

impl SaveableRegistry {
    /// Add a type to the registry. A second registration under the same
    /// `SAVE_KEY` is a contract violation and is ignored.
    pub fn register<T: Saveable>(&mut self) {
        let key = T::SAVE_KEY.to_string();
        if self.entries.iter().any(|e| e.key == key) {
            warn!(
                "SaveableRegistry: duplicate key '{}', ignoring second registration",
                key
            );
            debug_assert!(false, "SaveableRegistry: duplicate key '{}'", key);
            return;
        }
        self.entries.push(SaveableEntry {
            key,
            save_fn: Box::new(|world: &World| {
                world.get_resource::<T>().and_then(|r| r.save_to_bytes())
            }),
            load_fn: Box::new(|world: &mut World, bytes: &[u8]| {
                world.insert_resource(T::load_from_bytes(bytes));
            }),
        });
    }

    /// Bytes for every registered resource that wants saving.
    pub fn save_all(&self, world: &World) -> BTreeMap<String, Vec<u8>> {
        let mut extensions = BTreeMap::new();
        for entry in &self.entries {
            if let Some(bytes) = (entry.save_fn)(world) {
                extensions.insert(entry.key.clone(), bytes);
            }
        }
        extensions
    }

    /// Restore registered resources from an extension map. A key absent from
    /// the map leaves that resource at its current value.
    pub fn load_all(&self, world: &mut World, extensions: &BTreeMap<String, Vec<u8>>) {
        for entry in &self.entries {
            if let Some(bytes) = extensions.get(&entry.key) {
                (entry.load_fn)(world, bytes);
            }
        }
    }
}

/// One-line saveable registration for feature plugins.
pub trait SaveableAppExt {
    fn register_saveable<T: Saveable>(&mut self) -> &mut Self;
}

impl SaveableAppExt for App {
    fn register_saveable<T: Saveable>(&mut self) -> &mut Self {
        self.init_resource::<SaveableRegistry>();
        self.world_mut()
            .resource_mut::<SaveableRegistry>()
            .register::<T>();
        self
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct TransitPlugin;

impl Plugin for TransitPlugin {
    fn build(&self, app: &mut App) {
        // Core resources and events that don't belong to any feature module
        app.init_resource::<grid::WorldGrid>()
            .init_resource::<world_init::MapSeed>()
            .init_resource::<snap::SnapController>()
            .init_resource::<input::InputListeners>()
            .init_resource::<SaveableRegistry>()
            .add_event::<input::PointerEvent>()
            .add_systems(Startup, world_init::init_world);

        app.add_plugins((
            streets::StreetsPlugin,
            transit_map::TransitMapPlugin,
            line_editor::LineEditorPlugin,
        ));
    }
}
