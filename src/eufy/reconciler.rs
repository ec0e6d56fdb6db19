//! Folds inbound DPS maps into [`ApplianceState`].
//!
//! [`apply`] is pure: it takes the previous snapshot and returns a new one
//! plus the set of fields written by this update. Each data point is decoded
//! on its own; a value that fails to decode is logged and skipped, and the
//! previous value of that field is kept.

use std::collections::BTreeSet;

use prost::Message;
use serde_json::Value;
use tracing::{debug, warn};

use super::DpsMap;
use super::codec::{self, CodecError, LengthPrefix};
use super::dps::{DpsKey, Schema, SchemaGeneration, value_bool, value_int, value_text};
use super::proto::station::station_response::{StationStatus, station_status};
use super::proto::work_status::work_status::{self, go_home, go_wash};
use super::proto::{
    CleanParamResponse, CleanStatistics, ConsumableResponse, ErrorCode, RoomParams,
    SceneResponse, StationResponse, UniversalDataResponse, WorkStatus,
};
use super::state::{
    AccessoryState, Activity, ApplianceState, CleaningPreferences, DockAutoConfig, DockStatus,
    FAN_SPEEDS, Field, Room, Scene, TriggerSource,
};

/// Result of reading one data point out of an update.
#[derive(Debug)]
pub enum FieldOutcome<T> {
    Absent,
    Malformed(String),
    Present(T),
}

impl<T> FieldOutcome<T> {
    /// Logs a malformed value and yields the decoded one, if any.
    fn present(self, what: &str) -> Option<T> {
        match self {
            FieldOutcome::Present(v) => Some(v),
            FieldOutcome::Absent => None,
            FieldOutcome::Malformed(reason) => {
                warn!("Skipping malformed {}: {}", what, reason);
                None
            }
        }
    }
}

/// Reads `key` from `dps` and decodes it as `M`.
pub fn decode_field<M: Message + Default>(
    dps: &DpsMap,
    schema: &Schema,
    key: DpsKey,
) -> FieldOutcome<M> {
    let Some(value) = schema.get(dps, key) else {
        return FieldOutcome::Absent;
    };
    let Some(text) = value.as_str() else {
        return FieldOutcome::Malformed(format!("expected base64 text, got {value}"));
    };
    match codec::decode(text, schema.length_prefix()) {
        Ok(msg) => FieldOutcome::Present(msg),
        Err(e) => FieldOutcome::Malformed(e.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub state: ApplianceState,
    pub changed: BTreeSet<Field>,
}

struct Update {
    state: ApplianceState,
    changed: BTreeSet<Field>,
}

impl Update {
    fn mark(&mut self, field: Field) {
        self.changed.insert(field);
    }
}

pub fn apply(state: &ApplianceState, dps: &DpsMap, schema: &Schema) -> Applied {
    let mut up = Update {
        state: state.clone(),
        changed: BTreeSet::new(),
    };
    up.state
        .raw_dps
        .extend(dps.iter().map(|(k, v)| (k.clone(), v.clone())));

    match schema.generation {
        SchemaGeneration::Novel => apply_novel(&mut up, dps, schema),
        SchemaGeneration::Legacy => apply_legacy(&mut up, dps, schema),
    }

    let Update { mut state, changed } = up;
    state.received_fields.extend(changed.iter().copied());
    Applied { state, changed }
}

fn apply_novel(up: &mut Update, dps: &DpsMap, schema: &Schema) {
    // Station first: work status reads the dock status it produces.
    if let Some(station) =
        decode_field::<StationResponse>(dps, schema, DpsKey::StationStatus).present("station status")
    {
        debug!("Decoded station status: {:?}", station);
        apply_station(up, &station);
    }

    if let Some(ws) =
        decode_field::<WorkStatus>(dps, schema, DpsKey::WorkStatus).present("work status")
    {
        debug!("Decoded work status: {:?}", ws);
        apply_work_status(up, &ws);
    }

    if let Some(value) = schema.get(dps, DpsKey::BatteryLevel) {
        apply_battery(up, value);
    }

    if let Some(value) = schema.get(dps, DpsKey::CleanSpeed) {
        up.state.fan_speed = fan_speed_label(value);
        up.mark(Field::FanSpeed);
    }

    if let Some(err) = decode_field::<ErrorCode>(dps, schema, DpsKey::ErrorCode).present("error code") {
        apply_error_code(up, err.warn.first().copied());
    }

    if let Some(resp) =
        decode_field::<ConsumableResponse>(dps, schema, DpsKey::AccessoriesStatus).present("accessories")
    {
        if let Some(accessories) = merge_accessories(&up.state.accessories, &resp) {
            up.state.accessories = accessories;
            up.mark(Field::Accessories);
        }
    }

    if let Some(stats) = decode_field::<CleanStatistics>(dps, schema, DpsKey::CleaningStatistics)
        .present("cleaning statistics")
    {
        if let Some(single) = stats.single {
            up.state.cleaning_time = single.clean_duration;
            up.state.cleaning_area = single.clean_area;
            up.mark(Field::CleaningTime);
            up.mark(Field::CleaningArea);
        }
    }

    if let Some(resp) = decode_field::<SceneResponse>(dps, schema, DpsKey::SceneInfo).present("scene list") {
        up.state.scenes = scenes(&resp);
        up.mark(Field::Scenes);
    }

    if let Some(value) = schema.get(dps, DpsKey::MapData) {
        match value.as_str().and_then(|text| parse_map_data(text, schema.length_prefix())) {
            Some(table) => {
                up.state.map_id = table.map_id;
                up.state.rooms = table.rooms;
                up.mark(Field::MapId);
                up.mark(Field::Rooms);
            }
            None => warn!("Map data matched no known shape: {}", value),
        }
    }

    if let Some(resp) = decode_field::<CleanParamResponse>(dps, schema, DpsKey::CleaningParameters)
        .present("cleaning parameters")
    {
        if let Some(param) = resp.clean_param.or(resp.running_clean_param) {
            up.state.cleaning_preferences = Some(CleaningPreferences::from(&param));
            up.mark(Field::CleaningPreferences);
        }
    }

    if let Some(value) = schema.get(dps, DpsKey::FindRobot) {
        apply_find_robot(up, value);
    }
}

fn apply_station(up: &mut Update, station: &StationResponse) {
    up.state.dock_status = Some(dock_status(station.status.as_ref()));
    up.mark(Field::DockStatus);

    if let Some(water) = station.clean_water {
        up.state.station_clean_water = water.value;
        up.mark(Field::StationCleanWater);
    }
    if let Some(cfg) = &station.auto_cfg_status {
        up.state.dock_auto_cfg = Some(DockAutoConfig::from(cfg));
        up.mark(Field::DockAutoCfg);
    }
}

/// Busy flags win, in fixed order; otherwise the station's own state.
fn dock_status(status: Option<&StationStatus>) -> DockStatus {
    let default = StationStatus::default();
    let status = status.unwrap_or(&default);
    let flags = [
        (status.collecting_dust, DockStatus::EmptyingDust),
        (status.clear_water_adding, DockStatus::AddingCleanWater),
        (status.waste_water_recycling, DockStatus::RecyclingWasteWater),
        (status.disinfectant_making, DockStatus::MakingDisinfectant),
        (status.cutting_hair, DockStatus::CuttingHair),
    ];
    if let Some((_, label)) = flags.iter().find(|(set, _)| *set) {
        return *label;
    }
    match station_status::State::try_from(status.state) {
        Ok(station_status::State::Idle) => DockStatus::Idle,
        Ok(station_status::State::Washing) => DockStatus::Washing,
        Ok(station_status::State::Drying) => DockStatus::Drying,
        Err(_) => DockStatus::Unknown,
    }
}

fn apply_work_status(up: &mut Update, ws: &WorkStatus) {
    let activity = activity(ws);
    up.state.activity = activity;
    up.state.status_code = ws.state;
    up.state.task_status = task_status(ws, activity, up.state.dock_status);
    up.state.charging = ws
        .charging
        .is_some_and(|c| c.state == work_status::charging::State::Doing as i32);
    up.state.trigger_source = trigger_source(ws);
    for f in [Field::Activity, Field::StatusCode, Field::TaskStatus, Field::Charging, Field::TriggerSource] {
        up.mark(f);
    }

    cross_check_dock(up, ws);
    track_scene(up, ws);
}

fn activity(ws: &WorkStatus) -> Activity {
    match ws.state {
        0 | 1 => Activity::Idle,
        2 => Activity::Error,
        3 => Activity::Docked,
        4 | 6 | 8 => Activity::Cleaning,
        5 => {
            let drying = ws
                .go_wash
                .is_some_and(|g| g.mode == go_wash::Mode::Drying as i32);
            if drying {
                Activity::Docked
            } else {
                Activity::Cleaning
            }
        }
        7 => Activity::Returning,
        _ => Activity::Idle,
    }
}

fn task_status(ws: &WorkStatus, activity: Activity, dock: Option<DockStatus>) -> String {
    let state = ws.state;

    if let Some(gw) = ws.go_wash {
        match go_wash::Mode::try_from(gw.mode) {
            Ok(go_wash::Mode::Drying) => return "Completed".into(),
            Ok(go_wash::Mode::Washing) => return "Washing Mop".into(),
            Ok(go_wash::Mode::Navigation) if state == 5 => return "Returning to Wash".into(),
            _ => {}
        }
    }

    let resumable = ws
        .breakpoint
        .is_some_and(|b| b.state == work_status::breakpoint::State::Doing as i32);

    let label = match state {
        3 => {
            if resumable {
                "Charging (Resume)"
            } else if ws
                .cleaning
                .is_some_and(|c| c.state == work_status::cleaning::State::Paused as i32)
                && dock.is_some_and(DockStatus::is_wash_cycle)
            {
                // still mid-task, the robot only reports charging while the dock washes
                "Washing Mop"
            } else {
                "Completed"
            }
        }
        7 => {
            if resumable {
                "Returning to Charge"
            } else if ws
                .go_home
                .is_some_and(|g| g.mode == go_home::Mode::CollectDust as i32)
            {
                "Returning to Empty"
            } else {
                "Returning"
            }
        }
        5 => "Cleaning",
        4 => "Positioning",
        2 => "Error",
        6 => "Remote Control",
        15 => "Paused",
        _ => return activity.title(),
    };
    label.into()
}

fn trigger_source(ws: &WorkStatus) -> TriggerSource {
    let mut source = ws
        .trigger
        .map(|t| TriggerSource::from_code(t.source))
        .unwrap_or_default();
    if source == TriggerSource::Unknown
        && ws.mode.is_some_and(|m| (1..=9).contains(&m.value))
    {
        source = TriggerSource::App;
    }
    if ws.cleaning.is_some_and(|c| c.scheduled_task) {
        source = TriggerSource::Schedule;
    }
    source
}

/// Keeps the dock status from sticking on an operation the robot no longer
/// reports.
fn cross_check_dock(up: &mut Update, ws: &WorkStatus) {
    match &ws.station {
        Some(st) => {
            let mut reported = false;
            if let Some(wd) = st.washing_drying_system {
                reported = true;
                up.state.dock_status = Some(
                    if wd.state == work_status::station::washing_drying_system::State::Drying as i32 {
                        DockStatus::Drying
                    } else {
                        DockStatus::Washing
                    },
                );
                up.mark(Field::DockStatus);
            }
            if st.dust_collection_system.is_some() {
                reported = true;
                up.state.dock_status = Some(DockStatus::EmptyingDust);
                up.mark(Field::DockStatus);
            }
            if let Some(wi) = st.water_injection_system {
                reported = true;
                if wi.state == work_status::station::water_injection_system::State::Adding as i32 {
                    up.state.dock_status = Some(DockStatus::AddingCleanWater);
                    up.mark(Field::DockStatus);
                }
            }
            if !reported && dock_is_active(&up.state) {
                up.state.dock_status = Some(DockStatus::Idle);
                up.mark(Field::DockStatus);
            }
        }
        None => {
            if ws.state == work_status::State::Charging as i32 && dock_is_active(&up.state) {
                up.state.dock_status = Some(DockStatus::Idle);
                up.mark(Field::DockStatus);
            }
        }
    }
}

fn dock_is_active(state: &ApplianceState) -> bool {
    state.dock_status.is_some_and(DockStatus::is_active)
}

/// An empty work status leaves the scene alone; only an explicit scene,
/// non-scene mode, or charging/going-home state touches it.
fn track_scene(up: &mut Update, ws: &WorkStatus) {
    if let Some(scene) = &ws.current_scene {
        up.state.current_scene_id = scene.id;
        up.state.current_scene_name = (!scene.name.is_empty()).then(|| scene.name.clone());
    } else if ws
        .mode
        .is_some_and(|m| m.value != work_status::mode::Value::Scene as i32)
        || ws.state == work_status::State::Charging as i32
        || ws.state == work_status::State::GoHome as i32
    {
        up.state.current_scene_id = 0;
        up.state.current_scene_name = None;
    } else {
        return;
    }
    up.mark(Field::CurrentScene);
}

fn apply_battery(up: &mut Update, value: &Value) {
    match value_int(value).and_then(|n| u8::try_from(n.clamp(0, 100)).ok()) {
        Some(level) => {
            up.state.battery_level = level;
            up.mark(Field::BatteryLevel);
        }
        None => warn!("Skipping malformed battery level: {}", value),
    }
}

fn apply_find_robot(up: &mut Update, value: &Value) {
    match value_bool(value) {
        Some(on) => {
            up.state.find_robot = on;
            up.mark(Field::FindRobot);
        }
        None => warn!("Skipping malformed find robot value: {}", value),
    }
}

fn apply_error_code(up: &mut Update, code: Option<u32>) {
    match code {
        Some(code) => {
            up.state.error_code = code;
            up.state.error_message = error_message(code).to_string();
        }
        None => {
            up.state.error_code = 0;
            up.state.error_message = "no error".into();
        }
    }
    up.mark(Field::ErrorCode);
    up.mark(Field::ErrorMessage);
}

/// An index into [`FAN_SPEEDS`], or a literal label. Out-of-range indices
/// read as "Standard".
fn fan_speed_label(value: &Value) -> String {
    let index = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s.parse().ok(),
        Value::String(s) => return s.clone(),
        other => return value_text(other).map(|t| t.into_owned()).unwrap_or_default(),
    };
    index
        .and_then(|i| usize::try_from(i).ok())
        .and_then(|i| FAN_SPEEDS.get(i))
        .unwrap_or(&"Standard")
        .to_string()
}

/// Only the components present in the message are updated.
fn merge_accessories(current: &AccessoryState, resp: &ConsumableResponse) -> Option<AccessoryState> {
    let rt = resp.runtime?;
    let mut out = *current;
    let slots = [
        (rt.filter_mesh, &mut out.filter_usage),
        (rt.rolling_brush, &mut out.main_brush_usage),
        (rt.side_brush, &mut out.side_brush_usage),
        (rt.sensor, &mut out.sensor_usage),
        (rt.scrape, &mut out.scrape_usage),
        (rt.mop, &mut out.mop_usage),
        (rt.dustbag, &mut out.dustbag_usage),
        (rt.dirty_watertank, &mut out.dirty_watertank_usage),
        (rt.dirty_waterfilter, &mut out.dirty_waterfilter_usage),
    ];
    for (reported, slot) in slots {
        if let Some(d) = reported {
            *slot = d.duration;
        }
    }
    Some(out)
}

fn scenes(resp: &SceneResponse) -> Vec<Scene> {
    resp.infos
        .iter()
        .filter(|info| info.valid && !info.name.is_empty())
        .map(|info| Scene {
            id: info.id.map(|id| id.value).unwrap_or(0),
            name: info.name.clone(),
            kind: info.r#type,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomTable {
    pub map_id: u32,
    pub rooms: Vec<Room>,
}

type MapDecoder = fn(&str, LengthPrefix) -> Result<Option<RoomTable>, CodecError>;

/// Shapes the map data point arrives in, tried in this order.
const MAP_DATA_SHAPES: [(&str, MapDecoder); 2] = [
    ("universal data", decode_universal_rooms),
    ("room params", decode_room_params),
];

fn decode_universal_rooms(text: &str, prefix: LengthPrefix) -> Result<Option<RoomTable>, CodecError> {
    let resp: UniversalDataResponse = codec::decode(text, prefix)?;
    Ok(resp.cur_map_room.filter(|t| t.map_id != 0).map(|t| RoomTable {
        map_id: t.map_id,
        rooms: t.data.into_iter().map(|r| Room { id: r.id, name: r.name }).collect(),
    }))
}

fn decode_room_params(text: &str, prefix: LengthPrefix) -> Result<Option<RoomTable>, CodecError> {
    let params: RoomParams = codec::decode(text, prefix)?;
    Ok((params.map_id != 0).then(|| RoomTable {
        map_id: params.map_id,
        rooms: params.rooms.into_iter().map(|r| Room { id: r.id, name: r.name }).collect(),
    }))
}

/// First shape that decodes with a non-zero map id wins.
pub fn parse_map_data(text: &str, prefix: LengthPrefix) -> Option<RoomTable> {
    MAP_DATA_SHAPES.iter().find_map(|(name, decode)| match decode(text, prefix) {
        Ok(Some(table)) => Some(table),
        Ok(None) => {
            debug!("Map data as {} carried no map id", name);
            None
        }
        Err(e) => {
            debug!("Map data is not {}: {}", name, e);
            None
        }
    })
}

fn apply_legacy(up: &mut Update, dps: &DpsMap, schema: &Schema) {
    if let Some(value) = schema.get(dps, DpsKey::WorkStatus) {
        match value.as_str().and_then(legacy_activity) {
            Some(activity) => {
                up.state.activity = activity;
                up.state.task_status = activity.title();
                up.state.charging = value
                    .as_str()
                    .is_some_and(|s| s.trim().eq_ignore_ascii_case("charging"));
                up.mark(Field::Activity);
                up.mark(Field::TaskStatus);
                up.mark(Field::Charging);
            }
            None => warn!("Skipping unrecognized work status: {}", value),
        }
    }

    if let Some(value) = schema.get(dps, DpsKey::BatteryLevel) {
        apply_battery(up, value);
    }

    if let Some(value) = schema.get(dps, DpsKey::CleanSpeed) {
        up.state.fan_speed = fan_speed_label(value);
        up.mark(Field::FanSpeed);
    }

    if let Some(value) = schema.get(dps, DpsKey::ErrorCode) {
        let code = match value_int(value) {
            Some(n) => u32::try_from(n).ok().map(|n| (n != 0).then_some(n)),
            None => value
                .as_str()
                .and_then(|text| codec::decode::<ErrorCode>(text, schema.length_prefix()).ok())
                .map(|e| e.warn.first().copied()),
        };
        match code {
            Some(code) => apply_error_code(up, code),
            None => warn!("Skipping malformed error code: {}", value),
        }
    }

    if let Some(value) = schema.get(dps, DpsKey::FindRobot) {
        apply_find_robot(up, value);
    }
}

fn legacy_activity(status: &str) -> Option<Activity> {
    let activity = match status.trim().to_ascii_lowercase().as_str() {
        "running" | "cleaning" | "spot" | "auto" | "room" | "edge" => Activity::Cleaning,
        "charging" | "completed" | "charge_done" => Activity::Docked,
        "recharge" | "go home" | "go_home" | "gohome" => Activity::Returning,
        "standby" | "pause" | "paused" => Activity::Paused,
        "sleeping" | "sleep" => Activity::Idle,
        "fault" | "error" => Activity::Error,
        _ => return None,
    };
    Some(activity)
}

const ERROR_CODES: &[(u32, &str)] = &[
    (0, "NONE"),
    (1, "CRASH BUFFER STUCK"),
    (2, "WHEEL STUCK"),
    (3, "SIDE BRUSH STUCK"),
    (4, "ROLLING BRUSH STUCK"),
    (5, "HOST TRAPPED CLEAR OBST"),
    (6, "MACHINE TRAPPED MOVE"),
    (7, "WHEEL OVERHANGING"),
    (8, "POWER LOW SHUTDOWN"),
    (13, "HOST TILTED"),
    (14, "NO DUST BOX"),
    (17, "FORBIDDEN AREA DETECTED"),
    (18, "LASER COVER STUCK"),
    (19, "LASER SENSOR STUCK"),
    (20, "LASER BLOCKED"),
    (21, "DOCK FAILED"),
    (26, "POWER APPOINT START FAIL"),
    (31, "SUCTION PORT OBSTRUCTION"),
    (32, "WIPE HOLDER MOTOR STUCK"),
    (33, "WIPING BRACKET MOTOR STUCK"),
    (39, "POSITIONING FAIL CLEAN END"),
    (40, "MOP CLOTH DISLODGED"),
    (41, "AIRDRYER HEATER ABNORMAL"),
    (50, "MACHINE ON CARPET"),
    (51, "CAMERA BLOCK"),
    (52, "UNABLE LEAVE STATION"),
    (55, "EXPLORING STATION FAIL"),
    (70, "CLEAN DUST COLLECTOR"),
    (71, "WALL SENSOR FAIL"),
    (72, "ROBOVAC LOW WATER"),
    (73, "DIRTY TANK FULL"),
    (74, "CLEAN WATER LOW"),
    (75, "WATER TANK ABSENT"),
    (76, "CAMERA ABNORMAL"),
    (77, "3D TOF ABNORMAL"),
    (78, "ULTRASONIC ABNORMAL"),
    (79, "CLEAN TRAY NOT INSTALLED"),
    (80, "ROBOVAC COMM FAIL"),
    (81, "SEWAGE TANK LEAK"),
    (82, "CLEAN TRAY NEEDS CLEAN"),
    (83, "POOR CHARGING CONTACT"),
    (101, "BATTERY ABNORMAL"),
    (102, "WHEEL MODULE ABNORMAL"),
    (103, "SIDE BRUSH ABNORMAL"),
    (104, "FAN ABNORMAL"),
    (105, "ROLLER BRUSH MOTOR ABNORMAL"),
    (106, "HOST PUMP ABNORMAL"),
    (107, "LASER SENSOR ABNORMAL"),
    (111, "ROTATION MOTOR ABNORMAL"),
    (112, "LIFT MOTOR ABNORMAL"),
    (113, "WATER SPRAY ABNORMAL"),
    (114, "WATER PUMP ABNORMAL"),
    (117, "ULTRASONIC ABNORMAL"),
    (119, "WIFI BLUETOOTH ABNORMAL"),
    (6010, "STATION CLEAN WATER TANK NOT CONNECTED"),
    (6011, "STATION LOW CLEAN WATER"),
    (6025, "STATION FULL CLEAN WATER OR DIRTY WATER TANK NOT IN PLACE"),
    (6030, "STATION CLEANING TRAY NOT INSTALLED"),
    (6113, "STATION NO DUST BAG INSTALLED"),
];

pub fn error_message(code: u32) -> &'static str {
    ERROR_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, msg)| *msg)
        .unwrap_or("Unknown Error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eufy::proto::consumable::{ConsumableRuntime, Duration};
    use crate::eufy::proto::map::{RoomName, universal_data_response};
    use crate::eufy::proto::scene::scene_response;
    use serde_json::json;

    const CLEANING_SCHEDULED: &str = "EgoCCAEQBRoAMgIYAXICIgB6AA==";
    const PAUSED_WASHING_STATION_DRYING: &str = "HAoCCAEQBRoAMgQIARgBOgIQAXIGCgIIASIAegA=";
    const PAUSED_WASHING_STATION_WASHING: &str = "GgoCCAEQBRoAMgQIARgBOgIQAXIECgAiAHoA";
    const CLEANING_PAUSED_GO_WASH: &str = "GAoCCAEQBRoAMgIIAToCEAFyBAoAIgB6AA==";
    const CHARGING_CLEANING_PAUSED: &str = "EgoCCAEQAxoAMgIIAXICIgB6AA==";
    const CHARGING_BARE: &str = "ChADGgByAiIAegA=";

    const DOCK_ADDING_WATER: &str =
        "NgooCgwKBggBGgIIFBIAGAESBggBEgIIASABMg4KAggBEgQIAhgPGgIIARIGCAEQASABKgIIOg==";
    const DOCK_IDLE: &str =
        "MgooCgwKBggBGgIIFBIAGAESBggBEgIIASABMg4KAggBEgQIAhgPGgIIARICCAEqAgg6";
    const DOCK_RECYCLING: &str =
        "NgooCgwKBggBGgIIFBIAGAESBggBEgIIASABMg4KAggBEgQIAhgPGgIIARIGCAEQASgBKgIIOA==";
    const DOCK_WASHING: &str =
        "NAooCgwKBggBGgIIFBIAGAESBggBEgIIASABMg4KAggBEgQIAhgPGgIIARIECAEQASoCCDc=";
    const DOCK_IDLE_LOW_WATER: &str =
        "MgooCgwKBggBGgIIFBIAGAESBggBEgIIASABMg4KAggBEgQIAhgPGgIIARICCAEqAggz";

    fn novel() -> Schema {
        Schema::new(SchemaGeneration::Novel)
    }

    fn dps(pairs: &[(&str, Value)]) -> DpsMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn step(state: &ApplianceState, pairs: &[(&str, Value)]) -> ApplianceState {
        apply(state, &dps(pairs), &novel()).state
    }

    fn work(state: &ApplianceState, b64: &str) -> ApplianceState {
        step(state, &[("153", json!(b64))])
    }

    fn station(state: &ApplianceState, b64: &str) -> ApplianceState {
        step(state, &[("173", json!(b64))])
    }

    fn enc<M: Message>(msg: &M) -> Value {
        json!(codec::encode(msg, LengthPrefix::Varint).unwrap())
    }

    #[test]
    fn battery_from_string() {
        let s = step(&ApplianceState::default(), &[("163", json!("85"))]);
        assert_eq!(s.battery_level, 85);
        let s = step(&s, &[("163", json!(140))]);
        assert_eq!(s.battery_level, 100);
    }

    #[test]
    fn error_code_from_first_warning() {
        let err = ErrorCode {
            warn: vec![1, 6011],
            ..Default::default()
        };
        let s = step(&ApplianceState::default(), &[("177", enc(&err))]);
        assert_eq!(s.error_code, 1);
        assert_eq!(s.error_message, "CRASH BUFFER STUCK");

        let s = step(&s, &[("177", enc(&ErrorCode::default()))]);
        assert_eq!(s.error_code, 0);
        assert_eq!(s.error_message, "no error");

        let err = ErrorCode {
            warn: vec![4242],
            ..Default::default()
        };
        let s = step(&s, &[("177", enc(&err))]);
        assert_eq!(s.error_message, "Unknown Error");
    }

    #[test]
    fn collecting_dust_maps_to_emptying_dust() {
        let resp = StationResponse {
            status: Some(StationStatus {
                collecting_dust: true,
                clear_water_adding: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        let s = step(&ApplianceState::default(), &[("173", enc(&resp))]);
        assert_eq!(s.dock_status, Some(DockStatus::EmptyingDust));
    }

    #[test]
    fn captured_station_statuses() {
        let s = ApplianceState::default();
        let s = station(&s, DOCK_ADDING_WATER);
        assert_eq!(s.dock_status, Some(DockStatus::AddingCleanWater));
        assert_eq!(s.station_clean_water, 58);
        let cfg = s.dock_auto_cfg.unwrap();
        assert!(cfg.auto_mop_wash);
        assert!(cfg.auto_empty);
        assert_eq!(cfg.auto_empty_interval, 15);
        assert!(cfg.detergent);

        assert_eq!(station(&s, DOCK_IDLE).dock_status, Some(DockStatus::Idle));
        assert_eq!(station(&s, DOCK_RECYCLING).dock_status, Some(DockStatus::RecyclingWasteWater));
        assert_eq!(station(&s, DOCK_WASHING).dock_status, Some(DockStatus::Washing));
        let low = station(&s, DOCK_IDLE_LOW_WATER);
        assert_eq!(low.station_clean_water, 51);
    }

    #[test]
    fn cleaning_with_schedule_flag() {
        let s = work(&ApplianceState::default(), CLEANING_SCHEDULED);
        assert_eq!(s.activity, Activity::Cleaning);
        assert_eq!(s.task_status, "Cleaning");
        assert_eq!(s.trigger_source, TriggerSource::Schedule);
        assert_eq!(s.status_code, 5);
    }

    #[test]
    fn mid_cleaning_wash_reads_washing_mop() {
        let s = work(&ApplianceState::default(), CLEANING_SCHEDULED);
        let s = work(&s, PAUSED_WASHING_STATION_DRYING);
        assert_eq!(s.task_status, "Washing Mop");
        assert_eq!(s.activity, Activity::Cleaning);
        assert_eq!(s.dock_status, Some(DockStatus::Drying));

        let s = station(&s, DOCK_ADDING_WATER);
        assert_eq!(s.dock_status, Some(DockStatus::AddingCleanWater));

        let s = work(&s, PAUSED_WASHING_STATION_WASHING);
        assert_eq!(s.task_status, "Washing Mop");
        assert_eq!(s.dock_status, Some(DockStatus::Washing));
    }

    #[test]
    fn charging_while_dock_washes_does_not_flap_to_completed() {
        let s = station(&ApplianceState::default(), DOCK_RECYCLING);
        assert_eq!(s.dock_status, Some(DockStatus::RecyclingWasteWater));

        let s = work(&s, CHARGING_CLEANING_PAUSED);
        assert_eq!(s.task_status, "Washing Mop");
        assert_eq!(s.status_code, 3);

        let s = work(&s, CLEANING_PAUSED_GO_WASH);
        assert_eq!(s.task_status, "Washing Mop");

        let s = work(&s, CHARGING_CLEANING_PAUSED);
        assert_eq!(s.task_status, "Washing Mop");

        let s = station(&s, DOCK_IDLE_LOW_WATER);
        assert_eq!(s.dock_status, Some(DockStatus::Idle));
        let s = work(&s, CHARGING_CLEANING_PAUSED);
        assert_eq!(s.task_status, "Completed");
    }

    #[test]
    fn post_cleaning_stays_completed() {
        let s = work(&ApplianceState::default(), CHARGING_BARE);
        assert_eq!(s.task_status, "Completed");
        assert_eq!(s.activity, Activity::Docked);
        assert!(s.charging);

        for dock in [DOCK_WASHING, DOCK_RECYCLING, DOCK_ADDING_WATER] {
            let s2 = station(&s, dock);
            let s2 = work(&s2, CHARGING_BARE);
            assert_eq!(s2.task_status, "Completed");
        }
    }

    #[test]
    fn station_without_activity_resets_active_dock() {
        let s = station(&ApplianceState::default(), DOCK_RECYCLING);
        // station sub-message present but carrying none of the known systems
        let s = work(&s, CLEANING_SCHEDULED);
        assert_eq!(s.dock_status, Some(DockStatus::Idle));
    }

    #[test]
    fn charging_without_station_resets_active_dock() {
        let s = station(&ApplianceState::default(), DOCK_WASHING);
        let ws = WorkStatus {
            state: 3,
            ..Default::default()
        };
        let applied = apply(&s, &dps(&[("153", enc(&ws))]), &novel());
        assert_eq!(applied.state.dock_status, Some(DockStatus::Idle));
        assert!(applied.changed.contains(&Field::DockStatus));

        // not charging: left alone
        let ws = WorkStatus {
            state: 5,
            ..Default::default()
        };
        let s = step(&s, &[("153", enc(&ws))]);
        assert_eq!(s.dock_status, Some(DockStatus::Washing));
    }

    #[test]
    fn drying_wash_trip_reports_docked() {
        let ws = WorkStatus {
            state: 5,
            go_wash: Some(work_status::GoWash {
                mode: go_wash::Mode::Drying as i32,
            }),
            ..Default::default()
        };
        let s = step(&ApplianceState::default(), &[("153", enc(&ws))]);
        assert_eq!(s.activity, Activity::Docked);
        assert_eq!(s.task_status, "Completed");
    }

    #[test]
    fn breakpoint_and_go_home_labels() {
        let resumable = Some(work_status::Breakpoint { state: 0 });
        let base = ApplianceState::default();

        let ws = WorkStatus { state: 3, breakpoint: resumable, ..Default::default() };
        assert_eq!(step(&base, &[("153", enc(&ws))]).task_status, "Charging (Resume)");

        let ws = WorkStatus { state: 7, breakpoint: resumable, ..Default::default() };
        assert_eq!(step(&base, &[("153", enc(&ws))]).task_status, "Returning to Charge");

        let ws = WorkStatus {
            state: 7,
            go_home: Some(work_status::GoHome { mode: 1 }),
            ..Default::default()
        };
        let s = step(&base, &[("153", enc(&ws))]);
        assert_eq!(s.task_status, "Returning to Empty");
        assert_eq!(s.activity, Activity::Returning);

        let ws = WorkStatus { state: 7, ..Default::default() };
        assert_eq!(step(&base, &[("153", enc(&ws))]).task_status, "Returning");

        let ws = WorkStatus {
            state: 5,
            go_wash: Some(work_status::GoWash { mode: 0 }),
            ..Default::default()
        };
        assert_eq!(step(&base, &[("153", enc(&ws))]).task_status, "Returning to Wash");

        let ws = WorkStatus { state: 1, ..Default::default() };
        assert_eq!(step(&base, &[("153", enc(&ws))]).task_status, "Idle");
    }

    #[test]
    fn trigger_inferred_from_mode() {
        let ws = WorkStatus {
            state: 5,
            mode: Some(work_status::Mode { value: 1 }),
            ..Default::default()
        };
        let s = step(&ApplianceState::default(), &[("153", enc(&ws))]);
        assert_eq!(s.trigger_source, TriggerSource::App);

        let ws = WorkStatus {
            state: 5,
            mode: Some(work_status::Mode { value: 0 }),
            trigger: Some(work_status::Trigger { source: 2 }),
            ..Default::default()
        };
        let s = step(&ApplianceState::default(), &[("153", enc(&ws))]);
        assert_eq!(s.trigger_source, TriggerSource::Button);

        let ws = WorkStatus { state: 5, ..Default::default() };
        let s = step(&ApplianceState::default(), &[("153", enc(&ws))]);
        assert_eq!(s.trigger_source, TriggerSource::Unknown);
    }

    #[test]
    fn scene_bookkeeping() {
        let in_scene = WorkStatus {
            state: 5,
            mode: Some(work_status::Mode { value: 8 }),
            current_scene: Some(work_status::CurrentScene {
                id: 4,
                name: "After dinner".into(),
            }),
            ..Default::default()
        };
        let s = step(&ApplianceState::default(), &[("153", enc(&in_scene))]);
        assert_eq!(s.current_scene_id, 4);
        assert_eq!(s.current_scene_name.as_deref(), Some("After dinner"));

        // decoded but empty: untouched
        let applied = apply(&s, &dps(&[("153", enc(&WorkStatus::default()))]), &novel());
        assert_eq!(applied.state.current_scene_id, 4);
        assert!(!applied.changed.contains(&Field::CurrentScene));

        // scene mode without scene info: untouched
        let ws = WorkStatus {
            state: 5,
            mode: Some(work_status::Mode { value: 8 }),
            ..Default::default()
        };
        assert_eq!(step(&s, &[("153", enc(&ws))]).current_scene_id, 4);

        // explicit non-scene mode clears
        let ws = WorkStatus {
            state: 5,
            mode: Some(work_status::Mode { value: 1 }),
            ..Default::default()
        };
        let cleared = step(&s, &[("153", enc(&ws))]);
        assert_eq!(cleared.current_scene_id, 0);
        assert_eq!(cleared.current_scene_name, None);

        // going home clears
        let ws = WorkStatus { state: 7, ..Default::default() };
        assert_eq!(step(&s, &[("153", enc(&ws))]).current_scene_id, 0);
    }

    #[test]
    fn fan_speed_index_or_label() {
        let s = step(&ApplianceState::default(), &[("158", json!("2"))]);
        assert_eq!(s.fan_speed, "Turbo");
        let s = step(&s, &[("158", json!(3))]);
        assert_eq!(s.fan_speed, "Max");
        let s = step(&s, &[("158", json!("9"))]);
        assert_eq!(s.fan_speed, "Standard");
        let s = step(&s, &[("158", json!("Quiet"))]);
        assert_eq!(s.fan_speed, "Quiet");
    }

    #[test]
    fn accessories_merge_only_reported_components() {
        let mut s = ApplianceState::default();
        s.accessories.side_brush_usage = 40;
        let resp = ConsumableResponse {
            runtime: Some(ConsumableRuntime {
                filter_mesh: Some(Duration { duration: 12 }),
                mop: Some(Duration { duration: 3 }),
                ..Default::default()
            }),
        };
        let s = step(&s, &[("168", enc(&resp))]);
        assert_eq!(s.accessories.filter_usage, 12);
        assert_eq!(s.accessories.mop_usage, 3);
        assert_eq!(s.accessories.side_brush_usage, 40);
    }

    #[test]
    fn cleaning_statistics_use_the_last_run() {
        use crate::eufy::proto::clean_statistics::clean_statistics::{Single, Total};
        let stats = CleanStatistics {
            single: Some(Single { clean_duration: 1800, clean_area: 42 }),
            total: Some(Total { clean_duration: 90000, clean_area: 3000, clean_count: 70 }),
        };
        let s = step(&ApplianceState::default(), &[("167", enc(&stats))]);
        assert_eq!(s.cleaning_time, 1800);
        assert_eq!(s.cleaning_area, 42);
    }

    #[test]
    fn scene_list_drops_unnamed_and_invalid() {
        let info = |id: u32, valid: bool, name: &str| scene_response::Info {
            id: Some(scene_response::info::Id { value: id }),
            valid,
            name: name.into(),
            r#type: 1,
        };
        let resp = SceneResponse {
            infos: vec![info(1, true, "Kitchen"), info(2, false, "Gone"), info(3, true, "")],
        };
        let s = step(&ApplianceState::default(), &[("180", enc(&resp))]);
        assert_eq!(
            s.scenes,
            vec![Scene { id: 1, name: "Kitchen".into(), kind: 1 }]
        );
    }

    #[test]
    fn map_data_tries_universal_then_room_params() {
        let universal = UniversalDataResponse {
            cur_map_room: Some(universal_data_response::RoomTable {
                map_id: 5,
                data: vec![RoomName { id: 1, name: "Hall".into() }],
            }),
        };
        let s = step(&ApplianceState::default(), &[("165", enc(&universal))]);
        assert_eq!(s.map_id, 5);
        assert_eq!(s.rooms, vec![Room { id: 1, name: "Hall".into() }]);

        let params = RoomParams {
            rooms: vec![
                RoomName { id: 2, name: "Bedroom".into() },
                RoomName { id: 3, name: "Office".into() },
            ],
            map_id: 7,
        };
        let table = parse_map_data(
            &codec::encode(&params, LengthPrefix::Varint).unwrap(),
            LengthPrefix::Varint,
        )
        .unwrap();
        assert_eq!(table.map_id, 7);
        assert_eq!(table.rooms.len(), 2);

        let s = step(&s, &[("165", json!("AA=="))]);
        assert_eq!(s.map_id, 5, "unparseable map data keeps the previous table");
    }

    #[test]
    fn undecodable_entry_does_not_block_the_rest() {
        let applied = apply(
            &ApplianceState::default(),
            &dps(&[
                ("163", json!("85")),
                ("177", json!("@@not base64@@")),
                ("158", json!("1")),
            ]),
            &novel(),
        );
        assert_eq!(applied.state.battery_level, 85);
        assert_eq!(applied.state.fan_speed, "Standard");
        assert_eq!(
            applied.changed,
            BTreeSet::from([Field::BatteryLevel, Field::FanSpeed])
        );
        assert_eq!(applied.state.raw_dps.len(), 3);
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let map = dps(&[
            ("153", json!(CHARGING_CLEANING_PAUSED)),
            ("173", json!(DOCK_RECYCLING)),
            ("163", json!(77)),
        ]);
        let once = apply(&ApplianceState::default(), &map, &novel());
        let twice = apply(&once.state, &map, &novel());
        assert_eq!(once.state, twice.state);
    }

    #[test]
    fn received_fields_accumulate() {
        let s = step(&ApplianceState::default(), &[("163", json!(50))]);
        let s = step(&s, &[("160", json!(true))]);
        assert!(s.find_robot);
        assert_eq!(
            s.received_fields,
            BTreeSet::from([Field::BatteryLevel, Field::FindRobot])
        );
    }

    #[test]
    fn cleaning_parameters_become_preferences() {
        use crate::eufy::proto::clean_param::{CleanParam, CleanType, Fan, MopMode};
        let resp = CleanParamResponse {
            clean_param: Some(CleanParam {
                clean_type: Some(CleanType { value: 2 }),
                fan: Some(Fan { suction: 2 }),
                mop_mode: Some(MopMode { level: 2, corner_clean: 1 }),
                clean_times: 2,
                ..Default::default()
            }),
            ..Default::default()
        };
        let s = step(&ApplianceState::default(), &[("154", enc(&resp))]);
        let prefs = s.cleaning_preferences.unwrap();
        assert_eq!(prefs.clean_mode.as_deref(), Some("vacuum_mop"));
        assert_eq!(prefs.fan_speed.as_deref(), Some("Turbo"));
        assert_eq!(prefs.water_level.as_deref(), Some("high"));
        assert_eq!(prefs.edge_mopping, Some(true));
        assert_eq!(prefs.clean_times, 2);
    }

    #[test]
    fn legacy_plain_values() {
        let legacy = Schema::new(SchemaGeneration::Legacy);
        let map = dps(&[
            ("15", json!("Running")),
            ("104", json!(64)),
            ("102", json!("Boost_IQ")),
            ("106", json!(2)),
            ("103", json!(false)),
        ]);
        let s = apply(&ApplianceState::default(), &map, &legacy).state;
        assert_eq!(s.activity, Activity::Cleaning);
        assert_eq!(s.task_status, "Cleaning");
        assert_eq!(s.battery_level, 64);
        assert_eq!(s.fan_speed, "Boost_IQ");
        assert_eq!(s.error_code, 2);
        assert_eq!(s.error_message, "WHEEL STUCK");

        let s = apply(&s, &dps(&[("15", json!("Charging")), ("106", json!(0))]), &legacy).state;
        assert_eq!(s.activity, Activity::Docked);
        assert!(s.charging);
        assert_eq!(s.error_message, "no error");

        let s = apply(&s, &dps(&[("15", json!("Recharge"))]), &legacy).state;
        assert_eq!(s.activity, Activity::Returning);
        let s = apply(&s, &dps(&[("15", json!("standby"))]), &legacy).state;
        assert_eq!(s.activity, Activity::Paused);
    }

    #[test]
    fn legacy_error_code_in_single_byte_message() {
        let legacy = Schema::new(SchemaGeneration::Legacy);
        let err = ErrorCode { warn: vec![19], ..Default::default() };
        let text = codec::encode(&err, LengthPrefix::SingleByte).unwrap();
        let s = apply(&ApplianceState::default(), &dps(&[("106", json!(text))]), &legacy).state;
        assert_eq!(s.error_code, 19);
        assert_eq!(s.error_message, "LASER SENSOR STUCK");
    }
}
