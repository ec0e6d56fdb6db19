//! Accessory wear counters (DPS 168).

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Duration {
    /// Hours of use.
    #[prost(uint32, tag = "1")]
    pub duration: u32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ConsumableRuntime {
    #[prost(message, optional, tag = "1")]
    pub filter_mesh: ::core::option::Option<Duration>,
    #[prost(message, optional, tag = "2")]
    pub rolling_brush: ::core::option::Option<Duration>,
    #[prost(message, optional, tag = "3")]
    pub side_brush: ::core::option::Option<Duration>,
    #[prost(message, optional, tag = "4")]
    pub sensor: ::core::option::Option<Duration>,
    #[prost(message, optional, tag = "5")]
    pub scrape: ::core::option::Option<Duration>,
    #[prost(message, optional, tag = "6")]
    pub mop: ::core::option::Option<Duration>,
    #[prost(message, optional, tag = "7")]
    pub dustbag: ::core::option::Option<Duration>,
    #[prost(message, optional, tag = "8")]
    pub dirty_watertank: ::core::option::Option<Duration>,
    #[prost(message, optional, tag = "9")]
    pub dirty_waterfilter: ::core::option::Option<Duration>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ConsumableResponse {
    #[prost(message, optional, tag = "1")]
    pub runtime: ::core::option::Option<ConsumableRuntime>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConsumableRequest {
    #[prost(enumeration = "consumable_request::Type", repeated, tag = "1")]
    pub reset_types: ::prost::alloc::vec::Vec<i32>,
}

pub mod consumable_request {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        FilterMesh = 0,
        RollingBrush = 1,
        SideBrush = 2,
        Sensor = 3,
        Scrape = 4,
        Mop = 5,
        Dustbag = 6,
        DirtyWatertank = 7,
        DirtyWaterfilter = 8,
    }
}
