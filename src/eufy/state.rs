//! Canonical appliance state as published to the host.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::DpsMap;
use super::proto::clean_param::{
    CleanParam, clean_extent, clean_type, fan, mop_mode,
};
use super::proto::station::AutoActionCfg;
use super::proto::station::auto_action_cfg::{
    CollectDustV2, Dry, Wash, collect_dust_v2, dry, wash,
};
use super::proto::common::{Numerical, Switch};

/// Fan speed labels in the order the novel schema indexes them.
pub const FAN_SPEEDS: [&str; 4] = ["Quiet", "Standard", "Turbo", "Max"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    #[default]
    Idle,
    Cleaning,
    Docked,
    Error,
    Returning,
    Paused,
}

impl Activity {
    pub fn as_str(self) -> &'static str {
        match self {
            Activity::Idle => "idle",
            Activity::Cleaning => "cleaning",
            Activity::Docked => "docked",
            Activity::Error => "error",
            Activity::Returning => "returning",
            Activity::Paused => "paused",
        }
    }

    /// "docked" -> "Docked"
    pub fn title(self) -> String {
        let s = self.as_str();
        let mut out = String::with_capacity(s.len());
        let mut chars = s.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSource {
    #[default]
    Unknown,
    App,
    Button,
    Schedule,
    Robot,
    RemoteControl,
}

impl TriggerSource {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => TriggerSource::App,
            2 => TriggerSource::Button,
            3 => TriggerSource::Schedule,
            4 => TriggerSource::Robot,
            5 => TriggerSource::RemoteControl,
            _ => TriggerSource::Unknown,
        }
    }
}

/// What the dock is doing. Serialized as the human label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DockStatus {
    Idle,
    Washing,
    Drying,
    #[serde(rename = "Emptying dust")]
    EmptyingDust,
    #[serde(rename = "Adding clean water")]
    AddingCleanWater,
    #[serde(rename = "Recycling waste water")]
    RecyclingWasteWater,
    #[serde(rename = "Making disinfectant")]
    MakingDisinfectant,
    #[serde(rename = "Cutting hair")]
    CuttingHair,
    Unknown,
}

impl DockStatus {
    /// Statuses that describe an operation in progress.
    pub fn is_active(self) -> bool {
        !matches!(self, DockStatus::Idle | DockStatus::Unknown)
    }

    /// Statuses during which a paused, charging robot is still mid-wash.
    pub fn is_wash_cycle(self) -> bool {
        matches!(
            self,
            DockStatus::Washing | DockStatus::AddingCleanWater | DockStatus::RecyclingWasteWater
        )
    }
}

/// Names of the state fields an update can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Activity,
    BatteryLevel,
    FanSpeed,
    ErrorCode,
    ErrorMessage,
    Charging,
    StatusCode,
    CleaningTime,
    CleaningArea,
    TaskStatus,
    TriggerSource,
    DockStatus,
    StationCleanWater,
    DockAutoCfg,
    CurrentScene,
    Scenes,
    MapId,
    Rooms,
    Accessories,
    CleaningPreferences,
    FindRobot,
}

/// Hours of use per consumable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AccessoryState {
    pub filter_usage: u32,
    pub main_brush_usage: u32,
    pub side_brush_usage: u32,
    pub sensor_usage: u32,
    pub scrape_usage: u32,
    pub mop_usage: u32,
    pub dustbag_usage: u32,
    pub dirty_watertank_usage: u32,
    pub dirty_waterfilter_usage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scene {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub id: u32,
    pub name: String,
}

/// Cleaning parameters as reported on the cleaning-parameters data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningPreferences {
    pub fan_speed: Option<String>,
    pub water_level: Option<String>,
    pub clean_mode: Option<String>,
    pub clean_intensity: Option<String>,
    pub edge_mopping: Option<bool>,
    pub clean_times: u32,
}

impl From<&CleanParam> for CleaningPreferences {
    fn from(p: &CleanParam) -> Self {
        let fan_speed = p
            .fan
            .and_then(|f| fan::Suction::try_from(f.suction).ok())
            .map(|s| match s {
                fan::Suction::Quiet => "Quiet",
                fan::Suction::Standard => "Standard",
                fan::Suction::Turbo => "Turbo",
                fan::Suction::Max => "Max",
                fan::Suction::MaxPlus => "Max+",
            })
            .map(String::from);
        let water_level = p
            .mop_mode
            .and_then(|m| mop_mode::Level::try_from(m.level).ok())
            .map(|l| match l {
                mop_mode::Level::Low => "low",
                mop_mode::Level::Middle => "middle",
                mop_mode::Level::High => "high",
            })
            .map(String::from);
        let edge_mopping = p
            .mop_mode
            .map(|m| m.corner_clean == mop_mode::CornerClean::Deep as i32);
        let clean_mode = p
            .clean_type
            .and_then(|t| clean_type::Value::try_from(t.value).ok())
            .map(|t| match t {
                clean_type::Value::SweepOnly => "vacuum",
                clean_type::Value::MopOnly => "mop",
                clean_type::Value::SweepAndMop => "vacuum_mop",
                clean_type::Value::SweepThenMop => "mopping_after_sweeping",
            })
            .map(String::from);
        let clean_intensity = p
            .clean_extent
            .and_then(|e| clean_extent::Value::try_from(e.value).ok())
            .map(|e| match e {
                clean_extent::Value::Normal => "normal",
                clean_extent::Value::Narrow => "narrow",
                clean_extent::Value::Quick => "quick",
            })
            .map(String::from);
        Self {
            fan_speed,
            water_level,
            clean_mode,
            clean_intensity,
            edge_mopping,
            clean_times: p.clean_times,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WashFrequencyMode {
    #[default]
    ByPartition,
    ByTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DryDuration {
    #[default]
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyMode {
    #[default]
    Smart,
    ByTask,
    ByTime,
}

/// Dock automation settings. Host `set_auto_cfg` params are overlaid on this
/// by field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DockAutoConfig {
    pub auto_mop_wash: bool,
    pub wash_frequency_mode: WashFrequencyMode,
    /// Minutes (by time) or area (by partition) between mop washes.
    pub wash_frequency_value: u32,
    pub auto_dry: bool,
    pub dry_duration: DryDuration,
    pub detergent: bool,
    pub auto_empty: bool,
    pub auto_empty_mode: EmptyMode,
    /// Minutes between emptying runs in `by_time` mode.
    pub auto_empty_interval: u32,
}

impl From<&AutoActionCfg> for DockAutoConfig {
    fn from(cfg: &AutoActionCfg) -> Self {
        let mut out = DockAutoConfig {
            detergent: cfg.detergent,
            ..Default::default()
        };
        if let Some(w) = &cfg.wash {
            out.auto_mop_wash = w.cfg == wash::Cfg::Standard as i32;
            if let Some(freq) = &w.wash_freq {
                out.wash_frequency_mode = match freq.mode() {
                    wash::wash_freq::Mode::ByPartition => WashFrequencyMode::ByPartition,
                    wash::wash_freq::Mode::ByTime => WashFrequencyMode::ByTime,
                };
                out.wash_frequency_value = freq.time_or_area.map(|n| n.value).unwrap_or(0);
            }
        }
        if let Some(d) = &cfg.dry {
            out.auto_dry = d.cfg == dry::Cfg::Standard as i32;
            if let Some(duration) = &d.duration {
                out.dry_duration = match duration.level() {
                    dry::duration::Level::Short => DryDuration::Short,
                    dry::duration::Level::Medium => DryDuration::Medium,
                    dry::duration::Level::Long => DryDuration::Long,
                };
            }
        }
        if let Some(c) = &cfg.collectdust_v2 {
            out.auto_empty = c.sw.map(|s| s.value).unwrap_or(false);
            if let Some(mode) = &c.mode {
                out.auto_empty_mode = match mode.value() {
                    collect_dust_v2::mode::Value::Smart => EmptyMode::Smart,
                    collect_dust_v2::mode::Value::ByTask => EmptyMode::ByTask,
                    collect_dust_v2::mode::Value::ByTime => EmptyMode::ByTime,
                };
                out.auto_empty_interval = mode.time;
            }
        }
        out
    }
}

impl DockAutoConfig {
    pub fn to_proto(&self) -> AutoActionCfg {
        let wash_cfg = if self.auto_mop_wash {
            wash::Cfg::Standard
        } else {
            wash::Cfg::Close
        };
        let freq_mode = match self.wash_frequency_mode {
            WashFrequencyMode::ByPartition => wash::wash_freq::Mode::ByPartition,
            WashFrequencyMode::ByTime => wash::wash_freq::Mode::ByTime,
        };
        let dry_cfg = if self.auto_dry {
            dry::Cfg::Standard
        } else {
            dry::Cfg::Close
        };
        let dry_level = match self.dry_duration {
            DryDuration::Short => dry::duration::Level::Short,
            DryDuration::Medium => dry::duration::Level::Medium,
            DryDuration::Long => dry::duration::Level::Long,
        };
        let empty_mode = match self.auto_empty_mode {
            EmptyMode::Smart => collect_dust_v2::mode::Value::Smart,
            EmptyMode::ByTask => collect_dust_v2::mode::Value::ByTask,
            EmptyMode::ByTime => collect_dust_v2::mode::Value::ByTime,
        };
        AutoActionCfg {
            wash: Some(Wash {
                wash_freq: Some(wash::WashFreq {
                    mode: freq_mode as i32,
                    time_or_area: Some(Numerical {
                        value: self.wash_frequency_value,
                    }),
                }),
                cfg: wash_cfg as i32,
            }),
            dry: Some(Dry {
                cfg: dry_cfg as i32,
                duration: Some(dry::Duration {
                    level: dry_level as i32,
                }),
            }),
            detergent: self.detergent,
            collectdust_v2: Some(CollectDustV2 {
                sw: Some(Switch {
                    value: self.auto_empty,
                }),
                mode: Some(collect_dust_v2::Mode {
                    value: empty_mode as i32,
                    time: self.auto_empty_interval,
                }),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplianceState {
    pub activity: Activity,
    pub battery_level: u8,
    pub fan_speed: String,
    pub error_code: u32,
    pub error_message: String,
    pub charging: bool,
    /// Raw work-status state number.
    pub status_code: i32,
    /// Last run, seconds.
    pub cleaning_time: u32,
    /// Last run, square metres.
    pub cleaning_area: u32,
    pub task_status: String,
    pub trigger_source: TriggerSource,
    pub dock_status: Option<DockStatus>,
    pub station_clean_water: u32,
    pub dock_auto_cfg: Option<DockAutoConfig>,
    pub current_scene_id: u32,
    pub current_scene_name: Option<String>,
    pub scenes: Vec<Scene>,
    pub map_id: u32,
    pub rooms: Vec<Room>,
    pub accessories: AccessoryState,
    pub cleaning_preferences: Option<CleaningPreferences>,
    pub find_robot: bool,
    pub raw_dps: DpsMap,
    pub received_fields: BTreeSet<Field>,
}

impl Default for ApplianceState {
    fn default() -> Self {
        Self {
            activity: Activity::Idle,
            battery_level: 0,
            fan_speed: "Standard".into(),
            error_code: 0,
            error_message: String::new(),
            charging: false,
            status_code: 0,
            cleaning_time: 0,
            cleaning_area: 0,
            task_status: "idle".into(),
            trigger_source: TriggerSource::Unknown,
            dock_status: None,
            station_clean_water: 0,
            dock_auto_cfg: None,
            current_scene_id: 0,
            current_scene_name: None,
            scenes: Vec::new(),
            map_id: 0,
            rooms: Vec::new(),
            accessories: AccessoryState::default(),
            cleaning_preferences: None,
            find_robot: false,
            raw_dps: DpsMap::new(),
            received_fields: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dock_status_serializes_as_label() {
        let json = serde_json::to_string(&Some(DockStatus::EmptyingDust)).unwrap();
        assert_eq!(json, "\"Emptying dust\"");
        for (s, label) in [
            (DockStatus::Idle, "Idle"),
            (DockStatus::RecyclingWasteWater, "Recycling waste water"),
            (DockStatus::CuttingHair, "Cutting hair"),
        ] {
            assert_eq!(serde_json::to_value(s).unwrap(), label);
        }
    }

    #[test]
    fn activity_title_case() {
        assert_eq!(Activity::Docked.title(), "Docked");
        assert_eq!(Activity::Idle.title(), "Idle");
    }

    #[test]
    fn dock_auto_config_survives_proto_conversion() {
        let cfg = DockAutoConfig {
            auto_mop_wash: true,
            wash_frequency_mode: WashFrequencyMode::ByTime,
            wash_frequency_value: 20,
            auto_dry: true,
            dry_duration: DryDuration::Medium,
            detergent: true,
            auto_empty: true,
            auto_empty_mode: EmptyMode::ByTime,
            auto_empty_interval: 15,
        };
        assert_eq!(DockAutoConfig::from(&cfg.to_proto()), cfg);
    }

    #[test]
    fn dock_auto_config_rejects_unknown_keys() {
        let err = serde_json::from_str::<DockAutoConfig>(r#"{"auto_emtpy": true}"#);
        assert!(err.is_err());
        let ok: DockAutoConfig = serde_json::from_str(r#"{"auto_empty": true}"#).unwrap();
        assert!(ok.auto_empty);
        assert!(!ok.auto_dry);
    }

    #[test]
    fn default_state_matches_an_unseen_appliance() {
        let s = ApplianceState::default();
        assert_eq!(s.fan_speed, "Standard");
        assert_eq!(s.task_status, "idle");
        assert!(s.dock_status.is_none());
        assert!(s.received_fields.is_empty());
    }
}
