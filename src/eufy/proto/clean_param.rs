//! Cleaning parameters (DPS 154) and the building blocks reused by
//! per-room customization.

use super::common::Switch;

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Fan {
    #[prost(enumeration = "fan::Suction", tag = "1")]
    pub suction: i32,
}

pub mod fan {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Suction {
        Quiet = 0,
        Standard = 1,
        Turbo = 2,
        Max = 3,
        MaxPlus = 4,
    }
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct MopMode {
    #[prost(enumeration = "mop_mode::Level", tag = "1")]
    pub level: i32,
    #[prost(enumeration = "mop_mode::CornerClean", tag = "2")]
    pub corner_clean: i32,
}

pub mod mop_mode {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Level {
        Low = 0,
        Middle = 1,
        High = 2,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum CornerClean {
        Normal = 0,
        Deep = 1,
    }
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct CleanCarpet {
    #[prost(enumeration = "clean_carpet::Strategy", tag = "1")]
    pub strategy: i32,
}

pub mod clean_carpet {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Strategy {
        AutoRaise = 0,
        Avoid = 1,
        Ignore = 2,
    }
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct CleanType {
    #[prost(enumeration = "clean_type::Value", tag = "1")]
    pub value: i32,
}

pub mod clean_type {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Value {
        SweepOnly = 0,
        MopOnly = 1,
        SweepAndMop = 2,
        SweepThenMop = 3,
    }
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct CleanExtent {
    #[prost(enumeration = "clean_extent::Value", tag = "1")]
    pub value: i32,
}

pub mod clean_extent {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Value {
        Normal = 0,
        Narrow = 1,
        Quick = 2,
    }
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct CleanTimes {
    #[prost(uint32, tag = "1")]
    pub auto_clean: u32,
    #[prost(uint32, tag = "2")]
    pub select_rooms: u32,
    #[prost(uint32, tag = "4")]
    pub spot_clean: u32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct CleanParam {
    #[prost(message, optional, tag = "1")]
    pub clean_type: ::core::option::Option<CleanType>,
    #[prost(message, optional, tag = "2")]
    pub clean_carpet: ::core::option::Option<CleanCarpet>,
    #[prost(message, optional, tag = "3")]
    pub clean_extent: ::core::option::Option<CleanExtent>,
    #[prost(message, optional, tag = "4")]
    pub mop_mode: ::core::option::Option<MopMode>,
    #[prost(message, optional, tag = "5")]
    pub smart_mode_sw: ::core::option::Option<Switch>,
    #[prost(message, optional, tag = "6")]
    pub fan: ::core::option::Option<Fan>,
    #[prost(uint32, tag = "7")]
    pub clean_times: u32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct CleanParamResponse {
    #[prost(message, optional, tag = "1")]
    pub clean_param: ::core::option::Option<CleanParam>,
    #[prost(message, optional, tag = "2")]
    pub clean_times: ::core::option::Option<CleanTimes>,
    #[prost(message, optional, tag = "3")]
    pub area_clean_param: ::core::option::Option<CleanParam>,
    #[prost(message, optional, tag = "4")]
    pub running_clean_param: ::core::option::Option<CleanParam>,
}
