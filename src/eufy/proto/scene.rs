//! Saved cleaning scenes (DPS 180).

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SceneResponse {
    #[prost(message, repeated, tag = "1")]
    pub infos: ::prost::alloc::vec::Vec<scene_response::Info>,
}

pub mod scene_response {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Info {
        #[prost(message, optional, tag = "1")]
        pub id: ::core::option::Option<info::Id>,
        #[prost(bool, tag = "2")]
        pub valid: bool,
        #[prost(string, tag = "3")]
        pub name: ::prost::alloc::string::String,
        #[prost(uint32, tag = "4")]
        pub r#type: u32,
    }

    pub mod info {
        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct Id {
            #[prost(uint32, tag = "1")]
            pub value: u32,
        }
    }
}
