//! Data point ids and the two schema generations that assign them.

use std::borrow::Cow;

use serde_json::Value;

use super::DpsMap;
use super::codec::LengthPrefix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DpsId(pub u16);

impl DpsId {
    /// The decimal string used as the key in wire maps.
    pub fn key(self) -> String {
        self.0.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DpsKey {
    PlayPause,
    WorkMode,
    WorkStatus,
    CleaningParameters,
    Direction,
    MultiMapSw,
    CleanSpeed,
    FindRobot,
    BatteryLevel,
    MapEdit,
    MapData,
    MapStream,
    CleaningStatistics,
    AccessoriesStatus,
    MapManage,
    MapEditRequest,
    GoHome,
    StationStatus,
    Unsetting,
    ErrorCode,
    SceneInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaGeneration {
    Legacy,
    #[default]
    Novel,
}

impl SchemaGeneration {
    pub fn length_prefix(self) -> LengthPrefix {
        match self {
            SchemaGeneration::Novel => LengthPrefix::Varint,
            SchemaGeneration::Legacy => LengthPrefix::SingleByte,
        }
    }

    /// Novel iff any id only the novel table assigns shows up in `dps`.
    pub fn detect(dps: &DpsMap) -> Self {
        let novel = Schema::new(SchemaGeneration::Novel);
        let found = dps.keys().any(|k| {
            k.parse::<u16>()
                .ok()
                .is_some_and(|id| novel.key_of(DpsId(id)).is_some())
        });
        if found {
            SchemaGeneration::Novel
        } else {
            SchemaGeneration::Legacy
        }
    }
}

/// Id lookups for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Schema {
    pub generation: SchemaGeneration,
}

const NOVEL: &[(DpsKey, u16)] = &[
    (DpsKey::PlayPause, 152),
    (DpsKey::WorkMode, 153),
    (DpsKey::WorkStatus, 153),
    (DpsKey::CleaningParameters, 154),
    (DpsKey::Direction, 155),
    (DpsKey::MultiMapSw, 156),
    (DpsKey::CleanSpeed, 158),
    (DpsKey::FindRobot, 160),
    (DpsKey::BatteryLevel, 163),
    (DpsKey::MapEdit, 164),
    (DpsKey::MapData, 165),
    (DpsKey::MapStream, 166),
    (DpsKey::CleaningStatistics, 167),
    (DpsKey::AccessoriesStatus, 168),
    (DpsKey::MapManage, 169),
    (DpsKey::MapEditRequest, 170),
    (DpsKey::GoHome, 173),
    (DpsKey::StationStatus, 173),
    (DpsKey::Unsetting, 176),
    (DpsKey::ErrorCode, 177),
    (DpsKey::SceneInfo, 180),
];

const LEGACY: &[(DpsKey, u16)] = &[
    (DpsKey::PlayPause, 2),
    (DpsKey::Direction, 3),
    (DpsKey::WorkMode, 5),
    (DpsKey::WorkStatus, 15),
    (DpsKey::GoHome, 101),
    (DpsKey::CleanSpeed, 102),
    (DpsKey::FindRobot, 103),
    (DpsKey::BatteryLevel, 104),
    (DpsKey::ErrorCode, 106),
];

impl Schema {
    pub fn new(generation: SchemaGeneration) -> Self {
        Self { generation }
    }

    fn table(&self) -> &'static [(DpsKey, u16)] {
        match self.generation {
            SchemaGeneration::Novel => NOVEL,
            SchemaGeneration::Legacy => LEGACY,
        }
    }

    pub fn id(&self, key: DpsKey) -> Option<DpsId> {
        self.table()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, id)| DpsId(*id))
    }

    /// First symbolic name assigned to `id`. Shared ids resolve to the
    /// earlier table entry.
    pub fn key_of(&self, id: DpsId) -> Option<DpsKey> {
        self.table()
            .iter()
            .find(|(_, n)| *n == id.0)
            .map(|(k, _)| *k)
    }

    /// Raw value for `key` in `dps`, if this generation assigns it.
    pub fn get<'a>(&self, dps: &'a DpsMap, key: DpsKey) -> Option<&'a Value> {
        dps.get(&self.id(key)?.key())
    }

    pub fn length_prefix(&self) -> LengthPrefix {
        self.generation.length_prefix()
    }
}

/// Text form of a DPS value. Strings pass through; numbers and booleans are
/// rendered the way the appliance would send them as strings.
pub fn value_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

/// Integer form of a DPS value, accepting `85` and `"85"`.
pub fn value_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Boolean form of a DPS value, accepting `true` and `"true"`.
pub fn value_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => Some(s.trim().eq_ignore_ascii_case("true")),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}
