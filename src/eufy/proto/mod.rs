//! Hand-declared protobuf messages carried inside DPS values.
//!
//! Only the fields this bridge reads or writes are declared; prost skips
//! unknown fields on decode.

pub mod clean_param;
pub mod clean_statistics;
pub mod common;
pub mod consumable;
pub mod control;
pub mod error_code;
pub mod map;
pub mod map_edit;
pub mod scene;
pub mod station;
pub mod work_status;

pub use clean_param::CleanParamResponse;
pub use clean_statistics::CleanStatistics;
pub use consumable::{ConsumableRequest, ConsumableResponse};
pub use control::ModeCtrlRequest;
pub use error_code::ErrorCode;
pub use map::{RoomParams, UniversalDataResponse};
pub use map_edit::MapEditRequest;
pub use scene::SceneResponse;
pub use station::{StationRequest, StationResponse};
pub use work_status::WorkStatus;
