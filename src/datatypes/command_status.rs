use num_enum::{FromPrimitive, IntoPrimitive};

/// The command_status field of an SMPP response indicates the success or
/// failure of the matching request. Requests always carry `Ok`.
///
/// SMSCs routinely return vendor-specific codes (0x400-0x4FF), so any value
/// missing from the table is kept as `Other` rather than rejected.
#[derive(FromPrimitive, IntoPrimitive)]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandStatus {
    /// No Error
    Ok = 0x0000_0000,
    /// Message Length is invalid
    InvalidMsgLength = 0x0000_0001,
    /// Command Length is invalid
    InvalidCommandLength = 0x0000_0002,
    /// Invalid Command ID
    InvalidCommandId = 0x0000_0003,
    /// Incorrect BIND Status for given command
    IncorrectBindStatus = 0x0000_0004,
    /// ESME Already in Bound State
    AlreadyBoundState = 0x0000_0005,
    /// Invalid Priority Flag
    InvalidPriorityFlag = 0x0000_0006,
    /// Invalid Registered Delivery Flag
    InvalidRegisteredDeliveryFlag = 0x0000_0007,
    /// System Error
    SystemError = 0x0000_0008,
    /// Invalid Source Address
    InvalidSourceAddress = 0x0000_000A,
    /// Invalid Dest Addr
    InvalidDestinationAddress = 0x0000_000B,
    /// Message ID is invalid
    InvalidMessageId = 0x0000_000C,
    /// Bind Failed
    BindFailed = 0x0000_000D,
    /// Invalid Password
    InvalidPassword = 0x0000_000E,
    /// Invalid System ID
    InvalidSystemId = 0x0000_000F,
    /// Message Queue Full
    MessageQueueFull = 0x0000_0014,
    /// Invalid Service Type
    InvalidServiceType = 0x0000_0015,
    /// submit_sm or submit_multi failed
    SubmitFailed = 0x0000_0045,
    /// Invalid Source address TON
    InvalidSourceTon = 0x0000_0048,
    /// Invalid Source address NPI
    InvalidSourceNpi = 0x0000_0049,
    /// Invalid Destination address TON
    InvalidDestTon = 0x0000_0050,
    /// Invalid Destination address NPI
    InvalidDestNpi = 0x0000_0051,
    /// Invalid system_type field
    InvalidSystemType = 0x0000_0053,
    /// Throttling error (ESME has exceeded allowed message limits)
    ThrottlingError = 0x0000_0058,
    /// Invalid Scheduled Delivery Time
    InvalidScheduledDeliveryTime = 0x0000_0061,
    /// Invalid message validity period
    InvalidValidityPeriod = 0x0000_0062,
    /// Optional Parameter not allowed
    OptionalParameterNotAllowed = 0x0000_00C1,
    /// Invalid Parameter Length
    InvalidParameterLength = 0x0000_00C2,
    /// Expected Optional Parameter missing
    MissingOptionalParameter = 0x0000_00C3,
    /// Invalid Optional Parameter Value
    InvalidOptionalParameterValue = 0x0000_00C4,
    /// Delivery Failure (used for data_sm_resp)
    DeliveryFailure = 0x0000_00FE,
    /// Unknown Error
    UnknownError = 0x0000_00FF,
    #[num_enum(catch_all)]
    Other(u32),
}

impl CommandStatus {
    pub fn is_ok(&self) -> bool {
        *self == CommandStatus::Ok
    }

    /// Raw wire value, used when echoing the status back to HTTP callers
    pub fn code(&self) -> u32 {
        u32::from(*self)
    }
}
