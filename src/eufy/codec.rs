//! Base64 text <-> length-prefixed protobuf.
//!
//! Every binary DPS value is `base64(prefix || message)`. Novel appliances
//! prefix the message with its length as a protobuf varint; older firmware
//! used one raw length byte. Some call sites carry no prefix at all.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use prost::Message;
use thiserror::Error;

/// Standard alphabet, emits padding, accepts input with or without it.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthPrefix {
    Varint,
    SingleByte,
    None,
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is empty, expected a length prefix")]
    MissingPrefix,
    #[error("invalid varint length prefix")]
    BadPrefix,
    #[error("declared length {declared} exceeds the {available} bytes available")]
    Truncated { declared: usize, available: usize },
    #[error("message is {0} bytes, too long for a single-byte length prefix")]
    TooLong(usize),
    #[error("malformed message: {0}")]
    Malformed(#[from] prost::DecodeError),
}

/// Decode one DPS value into `M`.
pub fn decode<M: Message + Default>(text: &str, prefix: LengthPrefix) -> Result<M, CodecError> {
    let bytes = BASE64.decode(text.trim())?;
    let body = strip_prefix(&bytes, prefix)?;
    Ok(M::decode(body)?)
}

/// Encode `msg` into a DPS value.
pub fn encode<M: Message>(msg: &M, prefix: LengthPrefix) -> Result<String, CodecError> {
    let body = msg.encode_to_vec();
    let mut out = Vec::with_capacity(body.len() + 2);
    match prefix {
        LengthPrefix::Varint => prost::encoding::encode_varint(body.len() as u64, &mut out),
        LengthPrefix::SingleByte => {
            let len = u8::try_from(body.len()).map_err(|_| CodecError::TooLong(body.len()))?;
            out.push(len);
        }
        LengthPrefix::None => {}
    }
    out.extend_from_slice(&body);
    Ok(BASE64.encode(out))
}

/// Returns the message body bounded by the declared length. Bytes past the
/// declared length are ignored.
fn strip_prefix(bytes: &[u8], prefix: LengthPrefix) -> Result<&[u8], CodecError> {
    let (declared, rest) = match prefix {
        LengthPrefix::None => return Ok(bytes),
        LengthPrefix::SingleByte => {
            let (&len, rest) = bytes.split_first().ok_or(CodecError::MissingPrefix)?;
            (usize::from(len), rest)
        }
        LengthPrefix::Varint => {
            if bytes.is_empty() {
                return Err(CodecError::MissingPrefix);
            }
            let mut cursor = bytes;
            let len =
                prost::encoding::decode_varint(&mut cursor).map_err(|_| CodecError::BadPrefix)?;
            let len = usize::try_from(len).map_err(|_| CodecError::BadPrefix)?;
            (len, cursor)
        }
    };
    if declared > rest.len() {
        return Err(CodecError::Truncated {
            declared,
            available: rest.len(),
        });
    }
    Ok(&rest[..declared])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eufy::proto::control::{mode_ctrl_request, select_rooms_clean};
    use crate::eufy::proto::station::station_response::StationStatus;
    use crate::eufy::proto::work_status::work_status::{self, go_wash};
    use crate::eufy::proto::{
        ErrorCode, ModeCtrlRequest, SceneResponse, StationResponse, WorkStatus,
        control::SelectRoomsClean, scene::scene_response,
    };

    #[test]
    fn decodes_captured_work_status() {
        let ws: WorkStatus =
            decode("GgoCCAEQBRoAMgQIARgBOgIQAXIECgAiAHoA", LengthPrefix::Varint).unwrap();
        assert_eq!(ws.state, work_status::State::Cleaning as i32);
        assert_eq!(ws.mode.unwrap().value, 1);
        assert_eq!(ws.go_wash.unwrap().mode, go_wash::Mode::Washing as i32);
        let cleaning = ws.cleaning.unwrap();
        assert_eq!(cleaning.state, 1);
        assert!(cleaning.scheduled_task);
        assert!(ws.station.unwrap().washing_drying_system.is_some());
    }

    #[test]
    fn decodes_captured_station_status() {
        let st: StationResponse = decode(
            "NgooCgwKBggBGgIIFBIAGAESBggBEgIIASABMg4KAggBEgQIAhgPGgIIARIGCAEQASABKgIIOg==",
            LengthPrefix::Varint,
        )
        .unwrap();
        let status = st.status.unwrap();
        assert!(status.connected);
        assert!(status.clear_water_adding);
        assert!(!status.collecting_dust);
        assert_eq!(st.clean_water.unwrap().value, 58);
        assert!(st.auto_cfg_status.is_some());
    }

    #[test]
    fn accepts_unpadded_base64() {
        let ws: WorkStatus = decode("ChADGgByAiIAegA", LengthPrefix::Varint).unwrap();
        assert_eq!(ws.state, 3);
        assert!(ws.charging.is_some());
    }

    #[test]
    fn round_trips_in_every_prefix_mode() {
        let msg = ModeCtrlRequest {
            method: mode_ctrl_request::Method::StartSelectRoomsClean as i32,
            param: Some(mode_ctrl_request::Param::SelectRoomsClean(SelectRoomsClean {
                rooms: vec![
                    select_rooms_clean::Room { id: 3, order: 1 },
                    select_rooms_clean::Room { id: 7, order: 2 },
                ],
                clean_times: 1,
                map_id: 4,
                mode: select_rooms_clean::Mode::Customize as i32,
            })),
        };
        for prefix in [LengthPrefix::Varint, LengthPrefix::SingleByte, LengthPrefix::None] {
            let text = encode(&msg, prefix).unwrap();
            let back: ModeCtrlRequest = decode(&text, prefix).unwrap();
            assert_eq!(back, msg, "{prefix:?}");
        }
    }

    fn assert_round_trip<M>(msg: &M)
    where
        M: Message + Default + PartialEq + std::fmt::Debug,
    {
        for prefix in [LengthPrefix::Varint, LengthPrefix::SingleByte] {
            let text = encode(msg, prefix).unwrap();
            let back: M = decode(&text, prefix).unwrap();
            assert_eq!(&back, msg, "{prefix:?}");
        }
    }

    #[test]
    fn every_message_type_round_trips() {
        use crate::eufy::proto::clean_param::{
            CleanExtent, CleanParam, CleanTimes, CleanType, Fan, MopMode,
        };
        use crate::eufy::proto::clean_statistics::clean_statistics::{Single, Total};
        use crate::eufy::proto::common::{Numerical, Switch};
        use crate::eufy::proto::consumable::{ConsumableRuntime, Duration, consumable_request};
        use crate::eufy::proto::map::{RoomName, universal_data_response::RoomTable};
        use crate::eufy::proto::map_edit::map_edit_request::{self, RoomsCustom, rooms_custom};
        use crate::eufy::proto::station::{AutoActionCfg, ManualActionCmd, auto_action_cfg};
        use crate::eufy::proto::{
            CleanParamResponse, CleanStatistics, ConsumableRequest, ConsumableResponse,
            MapEditRequest, RoomParams, StationRequest, UniversalDataResponse,
        };

        let auto_cfg = AutoActionCfg {
            wash: Some(auto_action_cfg::Wash {
                wash_freq: Some(auto_action_cfg::wash::WashFreq {
                    mode: auto_action_cfg::wash::wash_freq::Mode::ByTime as i32,
                    time_or_area: Some(Numerical { value: 15 }),
                }),
                cfg: auto_action_cfg::wash::Cfg::Standard as i32,
            }),
            dry: Some(auto_action_cfg::Dry {
                cfg: auto_action_cfg::dry::Cfg::Standard as i32,
                duration: Some(auto_action_cfg::dry::Duration {
                    level: auto_action_cfg::dry::duration::Level::Long as i32,
                }),
            }),
            detergent: true,
            collectdust_v2: Some(auto_action_cfg::CollectDustV2 {
                sw: Some(Switch { value: true }),
                mode: Some(auto_action_cfg::collect_dust_v2::Mode {
                    value: auto_action_cfg::collect_dust_v2::mode::Value::ByTime as i32,
                    time: 30,
                }),
            }),
        };
        let clean_param = CleanParam {
            clean_type: Some(CleanType { value: 2 }),
            clean_carpet: None,
            clean_extent: Some(CleanExtent { value: 1 }),
            mop_mode: Some(MopMode { level: 2, corner_clean: 1 }),
            smart_mode_sw: Some(Switch { value: true }),
            fan: Some(Fan { suction: 3 }),
            clean_times: 2,
        };
        let rooms = vec![
            RoomName { id: 1, name: "Kitchen".into() },
            RoomName { id: 2, name: "Hall".into() },
        ];

        assert_round_trip(&WorkStatus {
            mode: Some(work_status::Mode { value: 8 }),
            state: work_status::State::Cleaning as i32,
            charging: Some(work_status::Charging { state: 1 }),
            cleaning: Some(work_status::Cleaning {
                state: 1,
                mode: 2,
                scheduled_task: true,
            }),
            go_wash: Some(work_status::GoWash {
                mode: go_wash::Mode::Drying as i32,
            }),
            go_home: Some(work_status::GoHome { mode: 1 }),
            breakpoint: Some(work_status::Breakpoint { state: 1 }),
            station: Some(work_status::Station {
                washing_drying_system: Some(work_status::station::WashingDryingSystem { state: 1 }),
                dust_collection_system: Some(work_status::station::DustCollectionSystem {
                    state: 0,
                }),
                water_injection_system: Some(work_status::station::WaterInjectionSystem {
                    state: 1,
                }),
            }),
            trigger: Some(work_status::Trigger { source: 2 }),
            current_scene: Some(work_status::CurrentScene {
                id: 4,
                name: "After dinner".into(),
            }),
        });
        assert_round_trip(&StationRequest {
            auto_cfg: Some(auto_cfg),
            manual_cmd: Some(ManualActionCmd {
                go_selfcleaning: true,
                go_dry: false,
                go_collect_dust: true,
            }),
        });
        assert_round_trip(&StationResponse {
            auto_cfg_status: Some(auto_cfg),
            status: Some(StationStatus {
                connected: true,
                state: 2,
                collecting_dust: true,
                clear_water_adding: false,
                waste_water_recycling: true,
                disinfectant_making: false,
                cutting_hair: true,
            }),
            clean_water: Some(Numerical { value: 58 }),
        });
        assert_round_trip(&MapEditRequest {
            method: map_edit_request::Method::SetRoomsCustom as i32,
            map_id: 6,
            rooms_custom: Some(RoomsCustom {
                rooms_parm: Some(rooms_custom::Parm {
                    rooms: vec![rooms_custom::Room {
                        id: 3,
                        custom: Some(rooms_custom::Custom {
                            clean_type: Some(CleanType { value: 1 }),
                            fan: Some(Fan { suction: 2 }),
                            mop_mode: Some(MopMode { level: 1, corner_clean: 1 }),
                            clean_extent: Some(CleanExtent { value: 2 }),
                            clean_times: 2,
                        }),
                    }],
                }),
                condition: 1,
            }),
        });
        assert_round_trip(&ConsumableRequest {
            reset_types: vec![
                consumable_request::Type::SideBrush as i32,
                consumable_request::Type::Dustbag as i32,
            ],
        });
        let hours = |duration| Some(Duration { duration });
        assert_round_trip(&ConsumableResponse {
            runtime: Some(ConsumableRuntime {
                filter_mesh: hours(12),
                rolling_brush: hours(40),
                side_brush: hours(41),
                sensor: hours(7),
                scrape: hours(300),
                mop: hours(5),
                dustbag: hours(9),
                dirty_watertank: hours(11),
                dirty_waterfilter: hours(13),
            }),
        });
        assert_round_trip(&ErrorCode {
            last_time: 1_700_000_000_000,
            error: vec![7, 2013],
            warn: vec![1],
        });
        assert_round_trip(&CleanStatistics {
            single: Some(Single {
                clean_duration: 1800,
                clean_area: 32,
            }),
            total: Some(Total {
                clean_duration: 360_000,
                clean_area: 4_200,
                clean_count: 97,
            }),
        });
        assert_round_trip(&SceneResponse {
            infos: vec![scene_response::Info {
                id: Some(scene_response::info::Id { value: 2 }),
                valid: true,
                name: "Full house".into(),
                r#type: 1,
            }],
        });
        assert_round_trip(&UniversalDataResponse {
            cur_map_room: Some(RoomTable {
                map_id: 3,
                data: rooms.clone(),
            }),
        });
        assert_round_trip(&RoomParams { rooms, map_id: 3 });
        assert_round_trip(&CleanParamResponse {
            clean_param: Some(clean_param),
            clean_times: Some(CleanTimes {
                auto_clean: 1,
                select_rooms: 2,
                spot_clean: 1,
            }),
            area_clean_param: None,
            running_clean_param: Some(clean_param),
        });
    }

    #[test]
    fn varint_prefix_spans_multiple_bytes_for_long_bodies() {
        let msg = SceneResponse {
            infos: (0..20)
                .map(|i| scene_response::Info {
                    id: Some(scene_response::info::Id { value: i }),
                    valid: true,
                    name: format!("Scene number {i}"),
                    r#type: 1,
                })
                .collect(),
        };
        let body_len = msg.encoded_len();
        assert!(body_len > 255);

        let text = encode(&msg, LengthPrefix::Varint).unwrap();
        let raw = BASE64.decode(&text).unwrap();
        assert!(raw[0] & 0x80 != 0);
        assert_eq!(raw.len(), body_len + prost::length_delimiter_len(body_len));
        let back: SceneResponse = decode(&text, LengthPrefix::Varint).unwrap();
        assert_eq!(back, msg);

        assert!(matches!(
            encode(&msg, LengthPrefix::SingleByte),
            Err(CodecError::TooLong(n)) if n == body_len
        ));
    }

    #[test]
    fn declared_length_past_end_is_truncated() {
        let text = BASE64.encode([0x05, 0x18, 0x01]);
        let err = decode::<ErrorCode>(&text, LengthPrefix::Varint).unwrap_err();
        assert!(matches!(err, CodecError::Truncated { declared: 5, available: 2 }));
    }

    #[test]
    fn trailing_bytes_after_declared_length_are_ignored() {
        // body = warn [1], followed by junk that would not parse on its own
        let text = BASE64.encode([0x02, 0x18, 0x01, 0xff, 0xff]);
        let err: ErrorCode = decode(&text, LengthPrefix::Varint).unwrap();
        assert_eq!(err.warn, vec![1]);
    }

    #[test]
    fn single_byte_prefix_is_not_read_as_varint() {
        let msg = StationResponse {
            status: Some(StationStatus {
                collecting_dust: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        let text = encode(&msg, LengthPrefix::SingleByte).unwrap();
        let raw = BASE64.decode(&text).unwrap();
        assert_eq!(usize::from(raw[0]), raw.len() - 1);
        let back: StationResponse = decode(&text, LengthPrefix::SingleByte).unwrap();
        assert!(back.status.unwrap().collecting_dust);
    }

    #[test]
    fn errors_are_returned_not_panicked() {
        assert!(matches!(
            decode::<WorkStatus>("not base64!!", LengthPrefix::Varint),
            Err(CodecError::Base64(_))
        ));
        assert!(matches!(
            decode::<WorkStatus>("", LengthPrefix::Varint),
            Err(CodecError::MissingPrefix)
        ));
        // an unterminated varint
        let text = BASE64.encode([0xff, 0xff]);
        assert!(decode::<WorkStatus>(&text, LengthPrefix::Varint).is_err());
        // a body with a wire-type that cannot be parsed
        let text = BASE64.encode([0x02, 0x0f, 0x00]);
        assert!(matches!(
            decode::<WorkStatus>(&text, LengthPrefix::Varint),
            Err(CodecError::Malformed(_))
        ));
    }
}
