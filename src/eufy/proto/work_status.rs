//! Work status (DPS 153): the appliance's main state plus the embedded
//! sub-messages that refine it.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WorkStatus {
    #[prost(message, optional, tag = "1")]
    pub mode: ::core::option::Option<work_status::Mode>,
    #[prost(enumeration = "work_status::State", tag = "2")]
    pub state: i32,
    #[prost(message, optional, tag = "3")]
    pub charging: ::core::option::Option<work_status::Charging>,
    #[prost(message, optional, tag = "6")]
    pub cleaning: ::core::option::Option<work_status::Cleaning>,
    #[prost(message, optional, tag = "7")]
    pub go_wash: ::core::option::Option<work_status::GoWash>,
    #[prost(message, optional, tag = "8")]
    pub go_home: ::core::option::Option<work_status::GoHome>,
    #[prost(message, optional, tag = "10")]
    pub breakpoint: ::core::option::Option<work_status::Breakpoint>,
    #[prost(message, optional, tag = "14")]
    pub station: ::core::option::Option<work_status::Station>,
    #[prost(message, optional, tag = "15")]
    pub trigger: ::core::option::Option<work_status::Trigger>,
    #[prost(message, optional, tag = "16")]
    pub current_scene: ::core::option::Option<work_status::CurrentScene>,
}

pub mod work_status {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum State {
        Standby = 0,
        Sleep = 1,
        Fault = 2,
        Charging = 3,
        FastMapping = 4,
        Cleaning = 5,
        RemoteCtrl = 6,
        GoHome = 7,
        Cruising = 8,
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct Mode {
        #[prost(enumeration = "mode::Value", tag = "1")]
        pub value: i32,
    }

    pub mod mode {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum Value {
            Auto = 0,
            SelectRoom = 1,
            SelectZone = 2,
            Spot = 3,
            FastMapping = 4,
            GlobalCruise = 5,
            ZonesCruise = 6,
            PointCruise = 7,
            Scene = 8,
            SmartFollow = 9,
        }
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct Charging {
        #[prost(enumeration = "charging::State", tag = "1")]
        pub state: i32,
    }

    pub mod charging {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum State {
            Doing = 0,
            Done = 1,
            Abnormal = 2,
        }
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct Cleaning {
        #[prost(enumeration = "cleaning::State", tag = "1")]
        pub state: i32,
        #[prost(enumeration = "cleaning::Mode", tag = "2")]
        pub mode: i32,
        #[prost(bool, tag = "3")]
        pub scheduled_task: bool,
    }

    pub mod cleaning {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum State {
            Doing = 0,
            Paused = 1,
        }

        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum Mode {
            Cleaning = 0,
            Relocating = 1,
            GotoPos = 2,
            PoopCleaning = 3,
        }
    }

    /// Mop wash trip. The mode lives on tag 2 in every capture seen so far.
    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct GoWash {
        #[prost(enumeration = "go_wash::Mode", tag = "2")]
        pub mode: i32,
    }

    pub mod go_wash {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum Mode {
            Navigation = 0,
            Washing = 1,
            Drying = 2,
        }
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct GoHome {
        #[prost(enumeration = "go_home::Mode", tag = "1")]
        pub mode: i32,
    }

    pub mod go_home {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum Mode {
            CompleteTask = 0,
            CollectDust = 1,
        }
    }

    /// Recharge-and-resume marker.
    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct Breakpoint {
        #[prost(enumeration = "breakpoint::State", tag = "1")]
        pub state: i32,
    }

    pub mod breakpoint {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum State {
            Doing = 0,
            Done = 1,
        }
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct Station {
        #[prost(message, optional, tag = "1")]
        pub washing_drying_system: ::core::option::Option<station::WashingDryingSystem>,
        #[prost(message, optional, tag = "2")]
        pub dust_collection_system: ::core::option::Option<station::DustCollectionSystem>,
        #[prost(message, optional, tag = "3")]
        pub water_injection_system: ::core::option::Option<station::WaterInjectionSystem>,
    }

    pub mod station {
        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct WashingDryingSystem {
            #[prost(enumeration = "washing_drying_system::State", tag = "1")]
            pub state: i32,
        }

        pub mod washing_drying_system {
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
            #[repr(i32)]
            pub enum State {
                Washing = 0,
                Drying = 1,
            }
        }

        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct DustCollectionSystem {
            #[prost(enumeration = "dust_collection_system::State", tag = "1")]
            pub state: i32,
        }

        pub mod dust_collection_system {
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
            #[repr(i32)]
            pub enum State {
                Emptying = 0,
            }
        }

        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct WaterInjectionSystem {
            #[prost(enumeration = "water_injection_system::State", tag = "1")]
            pub state: i32,
        }

        pub mod water_injection_system {
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
            #[repr(i32)]
            pub enum State {
                Adding = 0,
                Emptying = 1,
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct Trigger {
        #[prost(enumeration = "trigger::Source", tag = "1")]
        pub source: i32,
    }

    pub mod trigger {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum Source {
            Unknown = 0,
            App = 1,
            Key = 2,
            Timing = 3,
            Robot = 4,
            RemoteCtrl = 5,
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CurrentScene {
        #[prost(uint32, tag = "1")]
        pub id: u32,
        #[prost(string, tag = "2")]
        pub name: ::prost::alloc::string::String,
    }
}
