//! Shared wrapper messages used across the appliance schema.

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Switch {
    #[prost(bool, tag = "1")]
    pub value: bool,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Numerical {
    #[prost(uint32, tag = "1")]
    pub value: u32,
}
