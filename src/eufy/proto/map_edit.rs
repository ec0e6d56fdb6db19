//! Per-room customisation written to DPS 170 ahead of a customised room clean.

use super::clean_param::{CleanExtent, CleanType, Fan, MopMode};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MapEditRequest {
    #[prost(enumeration = "map_edit_request::Method", tag = "1")]
    pub method: i32,
    #[prost(uint32, tag = "2")]
    pub map_id: u32,
    #[prost(message, optional, tag = "6")]
    pub rooms_custom: ::core::option::Option<map_edit_request::RoomsCustom>,
}

pub mod map_edit_request {
    use super::{CleanExtent, CleanType, Fan, MopMode};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Method {
        Unknown = 0,
        SetRoomsCustom = 5,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct RoomsCustom {
        #[prost(message, optional, tag = "1")]
        pub rooms_parm: ::core::option::Option<rooms_custom::Parm>,
        #[prost(uint32, tag = "2")]
        pub condition: u32,
    }

    pub mod rooms_custom {
        use super::{CleanExtent, CleanType, Fan, MopMode};

        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Parm {
            #[prost(message, repeated, tag = "1")]
            pub rooms: ::prost::alloc::vec::Vec<Room>,
        }

        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct Room {
            #[prost(uint32, tag = "1")]
            pub id: u32,
            #[prost(message, optional, tag = "2")]
            pub custom: ::core::option::Option<Custom>,
        }

        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct Custom {
            #[prost(message, optional, tag = "1")]
            pub clean_type: ::core::option::Option<CleanType>,
            #[prost(message, optional, tag = "2")]
            pub fan: ::core::option::Option<Fan>,
            #[prost(message, optional, tag = "3")]
            pub mop_mode: ::core::option::Option<MopMode>,
            #[prost(message, optional, tag = "4")]
            pub clean_extent: ::core::option::Option<CleanExtent>,
            #[prost(uint32, tag = "5")]
            pub clean_times: u32,
        }
    }
}
