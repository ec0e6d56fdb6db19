#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct CleanStatistics {
    #[prost(message, optional, tag = "1")]
    pub single: ::core::option::Option<clean_statistics::Single>,
    #[prost(message, optional, tag = "2")]
    pub total: ::core::option::Option<clean_statistics::Total>,
}

pub mod clean_statistics {
    /// Most recent run. Duration in seconds, area in square metres.
    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct Single {
        #[prost(uint32, tag = "1")]
        pub clean_duration: u32,
        #[prost(uint32, tag = "2")]
        pub clean_area: u32,
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct Total {
        #[prost(uint32, tag = "1")]
        pub clean_duration: u32,
        #[prost(uint32, tag = "2")]
        pub clean_area: u32,
        #[prost(uint32, tag = "3")]
        pub clean_count: u32,
    }
}
