mod bind_transmitter;
mod command_id;
mod command_status;
mod data_coding;
mod enquire_link;
mod generic_nack;
pub(crate) mod interface_version;
pub(crate) mod numeric_plan_indicator;
mod submit_sm;
pub mod tlv;
mod type_of_number;
mod unbind;

pub use bind_transmitter::{
    BindTransmitter, BindTransmitterResponse, MAX_PASSWORD_LENGTH, MAX_SYSTEM_ID_LENGTH,
};
pub use command_id::CommandId;
pub use command_status::CommandStatus;
pub use data_coding::DataCoding;
pub use enquire_link::{EnquireLink, EnquireLinkResponse};
pub use generic_nack::GenericNack;
pub use interface_version::InterfaceVersion;
pub use numeric_plan_indicator::NumericPlanIndicator;
pub use submit_sm::{SubmitSm, SubmitSmResponse, MAX_SHORT_MESSAGE_LENGTH};
pub use tlv::Tlv;
pub use type_of_number::TypeOfNumber;
pub use unbind::{Unbind, UnbindResponse};
