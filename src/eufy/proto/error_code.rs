#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ErrorCode {
    #[prost(uint64, tag = "1")]
    pub last_time: u64,
    #[prost(uint32, repeated, tag = "2")]
    pub error: ::prost::alloc::vec::Vec<u32>,
    #[prost(uint32, repeated, tag = "3")]
    pub warn: ::prost::alloc::vec::Vec<u32>,
}
