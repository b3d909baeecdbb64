//! Equipment and rune layers.
//!
//! Each equipped item occupies one [`EquipSlot`]; each rune is addressed by
//! its [`RuneId`]. Installing into an occupied slot replaces the previous
//! bundle, so a slot can never contribute twice.

use std::collections::BTreeMap;

use super::bonus::StatBundle;

/// Equipment slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EquipSlot {
    Weapon,
    Armor,
    Helmet,
    Boots,
    Accessory,
}

/// Caller-assigned rune identifier (resolved by the inventory subsystem).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuneId(pub u32);

/// Active modifier layers of a combatant.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierLayers {
    equipment: BTreeMap<EquipSlot, StatBundle>,
    runes: BTreeMap<RuneId, StatBundle>,
}

impl ModifierLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `bundle` in `slot`, returning the bundle it replaced.
    pub fn equip(&mut self, slot: EquipSlot, bundle: StatBundle) -> Option<StatBundle> {
        self.equipment.insert(slot, bundle)
    }

    /// Removes whatever occupies `slot`.
    pub fn unequip(&mut self, slot: EquipSlot) -> Option<StatBundle> {
        self.equipment.remove(&slot)
    }

    pub fn equipped(&self, slot: EquipSlot) -> Option<&StatBundle> {
        self.equipment.get(&slot)
    }

    /// Applies a rune, returning the bundle previously stored under `id`.
    pub fn apply_rune(&mut self, id: RuneId, bundle: StatBundle) -> Option<StatBundle> {
        self.runes.insert(id, bundle)
    }

    pub fn remove_rune(&mut self, id: RuneId) -> Option<StatBundle> {
        self.runes.remove(&id)
    }

    pub fn rune(&self, id: RuneId) -> Option<&StatBundle> {
        self.runes.get(&id)
    }

    /// All layers in fold order: equipment by slot, then runes by id.
    pub fn iter(&self) -> impl Iterator<Item = &StatBundle> {
        self.equipment.values().chain(self.runes.values())
    }

    pub fn is_empty(&self) -> bool {
        self.equipment.is_empty() && self.runes.is_empty()
    }
}
