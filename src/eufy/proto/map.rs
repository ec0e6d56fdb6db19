//! The two shapes a map/room table arrives in on DPS 165.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RoomName {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UniversalDataResponse {
    #[prost(message, optional, tag = "2")]
    pub cur_map_room: ::core::option::Option<universal_data_response::RoomTable>,
}

pub mod universal_data_response {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct RoomTable {
        #[prost(uint32, tag = "1")]
        pub map_id: u32,
        #[prost(message, repeated, tag = "2")]
        pub data: ::prost::alloc::vec::Vec<super::RoomName>,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RoomParams {
    #[prost(message, repeated, tag = "1")]
    pub rooms: ::prost::alloc::vec::Vec<RoomName>,
    #[prost(uint32, tag = "3")]
    pub map_id: u32,
}
