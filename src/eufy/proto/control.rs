//! Task control requests written to DPS 152.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModeCtrlRequest {
    #[prost(enumeration = "mode_ctrl_request::Method", tag = "1")]
    pub method: i32,
    #[prost(oneof = "mode_ctrl_request::Param", tags = "2, 3, 9")]
    pub param: ::core::option::Option<mode_ctrl_request::Param>,
}

pub mod mode_ctrl_request {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Method {
        StartAutoClean = 0,
        StartSelectRoomsClean = 1,
        StartSelectZonesClean = 2,
        StartSpotClean = 3,
        StartGotoClean = 4,
        StartRcClean = 5,
        StartGohome = 6,
        StartScheduleAutoClean = 7,
        StartScheduleRoomsClean = 8,
        StartFastMapping = 9,
        StartGowash = 10,
        StopTask = 12,
        PauseTask = 13,
        ResumeTask = 14,
        StopGohome = 15,
        StopRcClean = 16,
        StopGowash = 17,
        StopSmartFollow = 18,
        StartGlobalCruise = 20,
        StartPointCruise = 21,
        StartZonesCruise = 22,
        StartScheduleCruise = 23,
        StartSceneClean = 24,
        StartMappingThenClean = 25,
    }

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Param {
        #[prost(message, tag = "2")]
        AutoClean(super::AutoClean),
        #[prost(message, tag = "3")]
        SelectRoomsClean(super::SelectRoomsClean),
        #[prost(message, tag = "9")]
        SceneClean(super::SceneClean),
    }
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct AutoClean {
    #[prost(uint32, tag = "1")]
    pub clean_times: u32,
    #[prost(bool, tag = "2")]
    pub force_mapping: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SelectRoomsClean {
    #[prost(message, repeated, tag = "1")]
    pub rooms: ::prost::alloc::vec::Vec<select_rooms_clean::Room>,
    #[prost(uint32, tag = "2")]
    pub clean_times: u32,
    #[prost(uint32, tag = "3")]
    pub map_id: u32,
    #[prost(enumeration = "select_rooms_clean::Mode", tag = "4")]
    pub mode: i32,
}

pub mod select_rooms_clean {
    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct Room {
        #[prost(uint32, tag = "1")]
        pub id: u32,
        #[prost(uint32, tag = "2")]
        pub order: u32,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Mode {
        General = 0,
        Customize = 1,
    }
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct SceneClean {
    #[prost(uint32, tag = "1")]
    pub scene_id: u32,
}
