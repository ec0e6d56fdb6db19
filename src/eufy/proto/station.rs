//! Dock station status (DPS 173 inbound) and dock requests (DPS 173
//! outbound).

use super::common::{Numerical, Switch};

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct AutoActionCfg {
    #[prost(message, optional, tag = "1")]
    pub wash: ::core::option::Option<auto_action_cfg::Wash>,
    #[prost(message, optional, tag = "2")]
    pub dry: ::core::option::Option<auto_action_cfg::Dry>,
    #[prost(bool, tag = "4")]
    pub detergent: bool,
    #[prost(message, optional, tag = "6")]
    pub collectdust_v2: ::core::option::Option<auto_action_cfg::CollectDustV2>,
}

pub mod auto_action_cfg {
    use super::{Numerical, Switch};

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct Wash {
        #[prost(message, optional, tag = "1")]
        pub wash_freq: ::core::option::Option<wash::WashFreq>,
        #[prost(enumeration = "wash::Cfg", tag = "3")]
        pub cfg: i32,
    }

    pub mod wash {
        use super::Numerical;

        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum Cfg {
            Close = 0,
            Standard = 1,
        }

        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct WashFreq {
            #[prost(enumeration = "wash_freq::Mode", tag = "1")]
            pub mode: i32,
            #[prost(message, optional, tag = "3")]
            pub time_or_area: ::core::option::Option<Numerical>,
        }

        pub mod wash_freq {
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
            #[repr(i32)]
            pub enum Mode {
                ByPartition = 0,
                ByTime = 1,
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct Dry {
        #[prost(enumeration = "dry::Cfg", tag = "1")]
        pub cfg: i32,
        #[prost(message, optional, tag = "2")]
        pub duration: ::core::option::Option<dry::Duration>,
    }

    pub mod dry {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum Cfg {
            Close = 0,
            Standard = 1,
        }

        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct Duration {
            #[prost(enumeration = "duration::Level", tag = "1")]
            pub level: i32,
        }

        pub mod duration {
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
            #[repr(i32)]
            pub enum Level {
                Short = 0,
                Medium = 1,
                Long = 2,
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct CollectDustV2 {
        #[prost(message, optional, tag = "1")]
        pub sw: ::core::option::Option<Switch>,
        #[prost(message, optional, tag = "2")]
        pub mode: ::core::option::Option<collect_dust_v2::Mode>,
    }

    pub mod collect_dust_v2 {
        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct Mode {
            #[prost(enumeration = "mode::Value", tag = "1")]
            pub value: i32,
            /// Minutes between emptying runs when `value` is `ByTime`.
            #[prost(uint32, tag = "3")]
            pub time: u32,
        }

        pub mod mode {
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
            #[repr(i32)]
            pub enum Value {
                Smart = 0,
                ByTask = 1,
                ByTime = 2,
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ManualActionCmd {
    #[prost(bool, tag = "1")]
    pub go_selfcleaning: bool,
    #[prost(bool, tag = "2")]
    pub go_dry: bool,
    #[prost(bool, tag = "3")]
    pub go_collect_dust: bool,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct StationRequest {
    #[prost(message, optional, tag = "1")]
    pub auto_cfg: ::core::option::Option<AutoActionCfg>,
    #[prost(message, optional, tag = "2")]
    pub manual_cmd: ::core::option::Option<ManualActionCmd>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct StationResponse {
    #[prost(message, optional, tag = "1")]
    pub auto_cfg_status: ::core::option::Option<AutoActionCfg>,
    #[prost(message, optional, tag = "2")]
    pub status: ::core::option::Option<station_response::StationStatus>,
    #[prost(message, optional, tag = "5")]
    pub clean_water: ::core::option::Option<Numerical>,
}

pub mod station_response {
    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct StationStatus {
        #[prost(bool, tag = "1")]
        pub connected: bool,
        #[prost(enumeration = "station_status::State", tag = "2")]
        pub state: i32,
        #[prost(bool, tag = "3")]
        pub collecting_dust: bool,
        #[prost(bool, tag = "4")]
        pub clear_water_adding: bool,
        #[prost(bool, tag = "5")]
        pub waste_water_recycling: bool,
        #[prost(bool, tag = "6")]
        pub disinfectant_making: bool,
        #[prost(bool, tag = "7")]
        pub cutting_hair: bool,
    }

    pub mod station_status {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum State {
            Idle = 0,
            Washing = 1,
            Drying = 2,
        }
    }
}
