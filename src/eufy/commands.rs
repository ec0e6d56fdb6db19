//! High-level actions -> DPS writes.
//!
//! [`CommandBuilder::build`] never fails: an unknown action or unusable
//! parameters produce no writes and a warning.

use prost::Message;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::codec;
use super::dps::{DpsKey, Schema, SchemaGeneration};
use super::proto::clean_param::{CleanExtent, CleanType, Fan, MopMode, mop_mode};
use super::proto::consumable::consumable_request;
use super::proto::control::{AutoClean, SceneClean, SelectRoomsClean, mode_ctrl_request, select_rooms_clean};
use super::proto::map_edit::map_edit_request::{self, RoomsCustom, rooms_custom};
use super::proto::station::ManualActionCmd;
use super::proto::{ConsumableRequest, MapEditRequest, ModeCtrlRequest, StationRequest};
use super::state::{DockAutoConfig, FAN_SPEEDS};
use super::{DpsMap, Params};

use mode_ctrl_request::Method;

/// Scene ids in the public scene list sit this far below the ids the
/// appliance's scene control expects.
pub const SCENE_ID_OFFSET: u32 = 3;

pub const DEFAULT_MAP_ID: u32 = 3;

#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder {
    schema: Schema,
}

impl CommandBuilder {
    pub fn new(generation: SchemaGeneration) -> Self {
        Self {
            schema: Schema::new(generation),
        }
    }

    /// One map per write, in send order.
    pub fn build(&self, action: &str, params: &Params) -> Vec<DpsMap> {
        let action = action.trim().to_ascii_lowercase();
        let writes = match self.schema.generation {
            SchemaGeneration::Novel => self.build_novel(&action, params),
            SchemaGeneration::Legacy => self.build_legacy(&action, params),
        };
        match writes {
            Some(writes) => {
                debug!("Built {} write(s) for {}", writes.len(), action);
                writes
            }
            None => {
                warn!("No writes for action {} with params {:?}", action, params);
                Vec::new()
            }
        }
    }

    fn build_novel(&self, action: &str, params: &Params) -> Option<Vec<DpsMap>> {
        let one = |w: DpsMap| Some(vec![w]);
        match action {
            "start_auto" => one(self.mode_ctrl(
                Method::StartAutoClean,
                Some(mode_ctrl_request::Param::AutoClean(AutoClean {
                    clean_times: 1,
                    force_mapping: false,
                })),
            )?),
            "play" | "resume" => one(self.mode_ctrl(Method::ResumeTask, None)?),
            "pause" => one(self.mode_ctrl(Method::PauseTask, None)?),
            "stop" => one(self.mode_ctrl(Method::StopTask, None)?),
            "return_to_base" | "go_home" => one(self.mode_ctrl(Method::StartGohome, None)?),
            "clean_spot" => one(self.mode_ctrl(Method::StartSpotClean, None)?),
            "find_robot" | "locate" => {
                let active = params.get("active").and_then(Value::as_bool).unwrap_or(true);
                one(self.plain(DpsKey::FindRobot, json!(active))?)
            }
            "set_fan_speed" => {
                let label = params.get("fan_speed").and_then(Value::as_str)?;
                let index = fan_speed_index(label)?;
                one(self.plain(DpsKey::CleanSpeed, json!(index.to_string()))?)
            }
            "scene_clean" => {
                let scene_id = param_u32(params, "scene_id")?;
                one(self.mode_ctrl(
                    Method::StartSceneClean,
                    Some(mode_ctrl_request::Param::SceneClean(SceneClean {
                        scene_id: scene_id.checked_add(SCENE_ID_OFFSET)?,
                    })),
                )?)
            }
            "room_clean" => self.room_clean(params),
            "set_room_custom" => {
                let req = RoomCleanParams::from_params(params)?;
                one(self.rooms_custom(&req)?)
            }
            "reset_accessory" => {
                let kind = params.get("reset_type").and_then(accessory_type)?;
                let msg = ConsumableRequest {
                    reset_types: vec![kind as i32],
                };
                one(self.proto(DpsKey::AccessoriesStatus, &msg)?)
            }
            "set_auto_cfg" => {
                let cfg: DockAutoConfig = serde_json::from_value(Value::Object(params.clone()))
                    .map_err(|e| warn!("Invalid dock auto config: {}", e))
                    .ok()?;
                let msg = StationRequest {
                    auto_cfg: Some(cfg.to_proto()),
                    manual_cmd: None,
                };
                one(self.proto(DpsKey::GoHome, &msg)?)
            }
            "go_dry" => one(self.manual(ManualActionCmd { go_dry: true, ..Default::default() })?),
            "stop_dry" => one(self.manual(ManualActionCmd::default())?),
            "go_selfcleaning" => one(self.manual(ManualActionCmd {
                go_selfcleaning: true,
                ..Default::default()
            })?),
            "collect_dust" => one(self.manual(ManualActionCmd {
                go_collect_dust: true,
                ..Default::default()
            })?),
            _ => None,
        }
    }

    fn build_legacy(&self, action: &str, params: &Params) -> Option<Vec<DpsMap>> {
        let write = match action {
            "play" | "resume" => self.plain(DpsKey::PlayPause, json!(true)),
            "pause" => self.plain(DpsKey::PlayPause, json!(false)),
            "return_to_base" | "go_home" => self.plain(DpsKey::GoHome, json!(true)),
            "start_auto" => self.plain(DpsKey::WorkMode, json!("auto")),
            "clean_spot" => self.plain(DpsKey::WorkMode, json!("Spot")),
            "set_fan_speed" => {
                let label = params.get("fan_speed").and_then(Value::as_str)?;
                self.plain(DpsKey::CleanSpeed, json!(label))
            }
            "find_robot" | "locate" => {
                let active = params.get("active").and_then(Value::as_bool).unwrap_or(true);
                self.plain(DpsKey::FindRobot, json!(active))
            }
            _ => None,
        };
        write.map(|w| vec![w])
    }

    fn plain(&self, key: DpsKey, value: Value) -> Option<DpsMap> {
        let id = self.schema.id(key)?;
        Some(DpsMap::from([(id.key(), value)]))
    }

    fn proto<M: Message>(&self, key: DpsKey, msg: &M) -> Option<DpsMap> {
        match codec::encode(msg, self.schema.length_prefix()) {
            Ok(text) => self.plain(key, Value::String(text)),
            Err(e) => {
                warn!("Failed to encode {:?} write: {}", key, e);
                None
            }
        }
    }

    fn mode_ctrl(&self, method: Method, param: Option<mode_ctrl_request::Param>) -> Option<DpsMap> {
        let msg = ModeCtrlRequest {
            method: method as i32,
            param,
        };
        self.proto(DpsKey::PlayPause, &msg)
    }

    fn manual(&self, cmd: ManualActionCmd) -> Option<DpsMap> {
        let msg = StationRequest {
            auto_cfg: None,
            manual_cmd: Some(cmd),
        };
        self.proto(DpsKey::GoHome, &msg)
    }

    /// Plain room clean, or per-room settings followed by a customised clean
    /// when any setting is given.
    fn room_clean(&self, params: &Params) -> Option<Vec<DpsMap>> {
        let req = RoomCleanParams::from_params(params)?;
        let customize = req.has_custom()
            || req
                .mode
                .as_deref()
                .is_some_and(|m| m.eq_ignore_ascii_case("customize"));

        let mut writes = Vec::with_capacity(2);
        if req.has_custom() {
            writes.push(self.rooms_custom(&req)?);
        }
        let mode = if customize {
            select_rooms_clean::Mode::Customize
        } else {
            select_rooms_clean::Mode::General
        };
        let clean = SelectRoomsClean {
            rooms: req
                .room_ids()
                .into_iter()
                .zip(1..)
                .map(|(id, order)| select_rooms_clean::Room { id, order })
                .collect(),
            clean_times: 1,
            map_id: req.map_id(),
            mode: mode as i32,
        };
        writes.push(self.mode_ctrl(
            Method::StartSelectRoomsClean,
            Some(mode_ctrl_request::Param::SelectRoomsClean(clean)),
        )?);
        Some(writes)
    }

    fn rooms_custom(&self, req: &RoomCleanParams) -> Option<DpsMap> {
        let rooms = if req.rooms.is_empty() {
            let custom = req.custom.to_proto();
            req.room_ids
                .iter()
                .map(|&id| rooms_custom::Room {
                    id,
                    custom: Some(custom),
                })
                .collect()
        } else {
            req.rooms
                .iter()
                .map(|r| rooms_custom::Room {
                    id: r.id,
                    custom: Some(req.custom.overlaid(&r.custom).to_proto()),
                })
                .collect()
        };
        let msg = MapEditRequest {
            method: map_edit_request::Method::SetRoomsCustom as i32,
            map_id: req.map_id(),
            rooms_custom: Some(RoomsCustom {
                rooms_parm: Some(rooms_custom::Parm { rooms }),
                condition: 0,
            }),
        };
        self.proto(DpsKey::MapEditRequest, &msg)
    }
}

/// Per-room clean settings as the host names them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RoomCustom {
    fan_speed: Option<String>,
    water_level: Option<String>,
    clean_times: Option<u32>,
    clean_mode: Option<String>,
    clean_intensity: Option<String>,
    edge_mopping: Option<bool>,
}

impl RoomCustom {
    fn is_set(&self) -> bool {
        self.fan_speed.is_some()
            || self.water_level.is_some()
            || self.clean_times.is_some()
            || self.clean_mode.is_some()
            || self.clean_intensity.is_some()
            || self.edge_mopping.is_some()
    }

    /// `room` settings win over `self`.
    fn overlaid(&self, room: &RoomCustom) -> RoomCustom {
        RoomCustom {
            fan_speed: room.fan_speed.clone().or_else(|| self.fan_speed.clone()),
            water_level: room.water_level.clone().or_else(|| self.water_level.clone()),
            clean_times: room.clean_times.or(self.clean_times),
            clean_mode: room.clean_mode.clone().or_else(|| self.clean_mode.clone()),
            clean_intensity: room.clean_intensity.clone().or_else(|| self.clean_intensity.clone()),
            edge_mopping: room.edge_mopping.or(self.edge_mopping),
        }
    }

    /// Unrecognised labels are left unset.
    fn to_proto(&self) -> rooms_custom::Custom {
        let label = |v: &Option<String>| v.as_deref().map(str::to_ascii_lowercase);

        let clean_type = label(&self.clean_mode)
            .and_then(|m| clean_mode_value(&m))
            .map(|value| CleanType { value });
        let clean_extent = label(&self.clean_intensity)
            .and_then(|i| clean_intensity_value(&i))
            .map(|value| CleanExtent { value });
        let fan = self
            .fan_speed
            .as_deref()
            .and_then(fan_speed_index)
            .map(|i| Fan { suction: i as i32 });
        let level = label(&self.water_level).and_then(|w| water_level_value(&w));
        let corner = self.edge_mopping.map(|deep| {
            if deep {
                mop_mode::CornerClean::Deep as i32
            } else {
                mop_mode::CornerClean::Normal as i32
            }
        });
        let mop_mode = (level.is_some() || corner.is_some()).then(|| MopMode {
            level: level.unwrap_or(mop_mode::Level::Low as i32),
            corner_clean: corner.unwrap_or(mop_mode::CornerClean::Normal as i32),
        });

        rooms_custom::Custom {
            clean_type,
            fan,
            mop_mode,
            clean_extent,
            clean_times: self.clean_times.filter(|&n| n > 0).unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RoomEntry {
    id: u32,
    #[serde(flatten)]
    custom: RoomCustom,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RoomCleanParams {
    room_ids: Vec<u32>,
    rooms: Vec<RoomEntry>,
    map_id: Option<u32>,
    mode: Option<String>,
    #[serde(flatten)]
    custom: RoomCustom,
}

impl RoomCleanParams {
    fn from_params(params: &Params) -> Option<Self> {
        let req: RoomCleanParams = serde_json::from_value(Value::Object(params.clone()))
            .map_err(|e| warn!("Invalid room parameters: {}", e))
            .ok()?;
        if req.room_ids().is_empty() {
            warn!("Room action without any room ids");
            return None;
        }
        Some(req)
    }

    fn room_ids(&self) -> Vec<u32> {
        if self.room_ids.is_empty() {
            self.rooms.iter().map(|r| r.id).collect()
        } else {
            self.room_ids.clone()
        }
    }

    fn has_custom(&self) -> bool {
        self.custom.is_set() || !self.rooms.is_empty()
    }

    fn map_id(&self) -> u32 {
        self.map_id.filter(|&id| id != 0).unwrap_or(DEFAULT_MAP_ID)
    }
}

/// Case-insensitive position in [`FAN_SPEEDS`].
pub fn fan_speed_index(label: &str) -> Option<usize> {
    FAN_SPEEDS
        .iter()
        .position(|s| s.eq_ignore_ascii_case(label.trim()))
}

fn clean_mode_value(mode: &str) -> Option<i32> {
    match mode {
        "vacuum" => Some(0),
        "mop" => Some(1),
        "vacuum_mop" => Some(2),
        "mopping_after_sweeping" => Some(3),
        _ => None,
    }
}

fn clean_intensity_value(intensity: &str) -> Option<i32> {
    match intensity {
        "normal" => Some(0),
        "narrow" | "deep" => Some(1),
        "quick" => Some(2),
        _ => None,
    }
}

fn water_level_value(level: &str) -> Option<i32> {
    match level {
        "low" => Some(mop_mode::Level::Low as i32),
        "middle" | "medium" => Some(mop_mode::Level::Middle as i32),
        "high" => Some(mop_mode::Level::High as i32),
        _ => None,
    }
}

fn accessory_type(value: &Value) -> Option<consumable_request::Type> {
    use consumable_request::Type;
    if let Some(n) = value.as_i64() {
        return i32::try_from(n).ok().and_then(|n| Type::try_from(n).ok());
    }
    let kind = match value.as_str()?.trim().to_ascii_lowercase().as_str() {
        "filter" | "filter_mesh" => Type::FilterMesh,
        "main_brush" | "rolling_brush" => Type::RollingBrush,
        "side_brush" => Type::SideBrush,
        "sensor" => Type::Sensor,
        "scrape" | "cleaning_tray" => Type::Scrape,
        "mop" => Type::Mop,
        "dustbag" => Type::Dustbag,
        "dirty_watertank" => Type::DirtyWatertank,
        "dirty_waterfilter" => Type::DirtyWaterfilter,
        other => return other.parse::<i32>().ok().and_then(|n| Type::try_from(n).ok()),
    };
    Some(kind)
}

fn param_u32(params: &Params, key: &str) -> Option<u32> {
    match params.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
