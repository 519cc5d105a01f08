//! Voxel type registry: maps [`VoxelTypeId`] values to [`VoxelTypeDef`] metadata.
//!
//! The registry is a sparse table indexed by id. Id 0 is Air and never holds a
//! definition, so zero-initialized chunk memory represents empty space. Any
//! other id is valid only while a definition occupies its slot.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Identifier stored inside every voxel cell.
///
/// Region files store ids in three bytes, so only ids up to
/// [`VoxelTypeId::MAX_STORED`] can be persisted.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VoxelTypeId(pub u32);

impl VoxelTypeId {
    /// Empty space.
    pub const AIR: Self = Self(0);

    /// Largest id that fits the 24-bit on-disk encoding.
    pub const MAX_STORED: u32 = 0x00FF_FFFF;

    /// Returns `true` for Air (id 0).
    pub fn is_air(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for VoxelTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Descriptor for a voxel type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelTypeDef {
    /// Human-readable name (e.g. "stone", "grass").
    pub name: String,
    /// Secondary id further specifying the asset. Not used for meshing.
    #[serde(default)]
    pub sub_id: u32,
    /// Material bound to the mesh section of this type, if any.
    #[serde(default)]
    pub material: Option<String>,
}

impl VoxelTypeDef {
    /// Creates a definition with a material named after the type.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            material: Some(format!("M_{name}")),
            name,
            sub_id: 0,
        }
    }
}

/// Errors that can occur during voxel type registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A type with the same name has already been registered.
    #[error("duplicate voxel type name: {0}")]
    DuplicateName(String),
    /// Id 0 is reserved for Air.
    #[error("voxel type id 0 is reserved for air")]
    ReservedId,
    /// The requested slot already holds a definition.
    #[error("voxel type id {0} is already registered")]
    Occupied(VoxelTypeId),
    /// The id does not fit the on-disk encoding.
    #[error("voxel type id {0} exceeds the storable range")]
    OutOfRange(VoxelTypeId),
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Sparse `VoxelTypeId → VoxelTypeDef` table with reverse lookup by name.
#[derive(Clone, Debug)]
pub struct VoxelTypeRegistry {
    /// Slot `i` holds the definition for `VoxelTypeId(i)`; slot 0 is always empty.
    types: Vec<Option<VoxelTypeDef>>,
    /// Reverse lookup: name → ID.
    name_to_id: HashMap<String, VoxelTypeId>,
}

impl VoxelTypeRegistry {
    /// Creates a registry containing only the reserved Air slot.
    pub fn new() -> Self {
        Self {
            types: vec![None],
            name_to_id: HashMap::new(),
        }
    }

    /// Builds a registry from assets that carry their own ids.
    ///
    /// Gaps between ids stay empty and are treated as invalid.
    pub fn from_assets(
        assets: impl IntoIterator<Item = (VoxelTypeId, VoxelTypeDef)>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for (id, def) in assets {
            registry.insert_at(id, def)?;
        }
        Ok(registry)
    }

    /// Registers a new voxel type at the next free id past the highest slot.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateName`] if the name is taken, or
    /// [`RegistryError::OutOfRange`] once the 24-bit id space is exhausted.
    pub fn register(&mut self, def: VoxelTypeDef) -> Result<VoxelTypeId, RegistryError> {
        let id = VoxelTypeId(self.types.len() as u32);
        self.insert_at(id, def)?;
        Ok(id)
    }

    /// Registers a voxel type at an explicit id.
    pub fn insert_at(&mut self, id: VoxelTypeId, def: VoxelTypeDef) -> Result<(), RegistryError> {
        if id.is_air() {
            return Err(RegistryError::ReservedId);
        }
        if id.0 > VoxelTypeId::MAX_STORED {
            return Err(RegistryError::OutOfRange(id));
        }
        if self.name_to_id.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        let slot = id.0 as usize;
        if slot < self.types.len() && self.types[slot].is_some() {
            return Err(RegistryError::Occupied(id));
        }
        if slot >= self.types.len() {
            self.types.resize(slot + 1, None);
        }
        self.name_to_id.insert(def.name.clone(), id);
        self.types[slot] = Some(def);
        Ok(())
    }

    /// Returns the definition for `id`, or `None` for Air, gaps, and unknown ids.
    pub fn get(&self, id: VoxelTypeId) -> Option<&VoxelTypeDef> {
        self.types.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Returns `true` if `id` may be stored in a chunk.
    ///
    /// Air is always valid; any other id needs a definition in its slot.
    pub fn is_valid(&self, id: VoxelTypeId) -> bool {
        id.is_air() || self.get(id).is_some()
    }

    /// Returns the ID for a named voxel type, or `None` if not found.
    pub fn lookup_by_name(&self, name: &str) -> Option<VoxelTypeId> {
        self.name_to_id.get(name).copied()
    }

    /// Number of registered (non-Air) types.
    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    /// Returns `true` if no voxel type besides Air is registered.
    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }

    /// Number of id slots, i.e. one past the highest registered id.
    pub fn slot_count(&self) -> usize {
        self.types.len()
    }

    /// Iterates over registered `(id, definition)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (VoxelTypeId, &VoxelTypeDef)> {
        self.types
            .iter()
            .enumerate()
            .filter_map(|(i, def)| def.as_ref().map(|d| (VoxelTypeId(i as u32), d)))
    }
}

impl Default for VoxelTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
