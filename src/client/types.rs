// ABOUTME: Supporting types for the transmitter client: bind credentials, outbound messages, receipts
// ABOUTME: Turns an already-encoded message into a submit_sm with address numbering filled in

use crate::datatypes::tlv::tags;
use crate::datatypes::{
    CommandStatus, DataCoding, NumericPlanIndicator, SubmitSm, Tlv, TypeOfNumber,
    MAX_SHORT_MESSAGE_LENGTH,
};
use crate::client::error::{SmppError, SmppResult};
use bytes::Bytes;

/// SMPP bind_transmitter credentials
#[derive(Debug, Clone)]
pub struct BindCredentials {
    pub system_id: String,
    pub password: String,
    /// Empty unless the carrier asks for one
    pub system_type: String,
}

impl BindCredentials {
    pub fn transmitter(system_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            system_id: system_id.into(),
            password: password.into(),
            system_type: String::new(),
        }
    }

    pub fn with_system_type(mut self, system_type: impl Into<String>) -> Self {
        self.system_type = system_type.into();
        self
    }
}

/// An outbound short message whose text has already been encoded.
#[derive(Debug, Clone)]
pub struct SmsMessage {
    /// Destination MSISDN, with or without a leading '+'
    pub to: String,
    /// Sender number or alphanumeric sender id
    pub from: String,
    /// Encoded payload for short_message
    pub body: Bytes,
    pub options: SmsOptions,
}

#[derive(Debug, Clone, Default)]
pub struct SmsOptions {
    pub data_coding: DataCoding,
    /// Request delivery receipt (0 = no, 1 = yes)
    pub registered_delivery: u8,
    /// Sent as the receipted_message_id TLV so carrier-side records can be
    /// tied back to our identifier
    pub correlation_id: Option<String>,
}

impl SmsMessage {
    pub fn new(to: impl Into<String>, from: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            body: body.into(),
            options: SmsOptions::default(),
        }
    }

    pub fn with_data_coding(mut self, data_coding: DataCoding) -> Self {
        self.options.data_coding = data_coding;
        self
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.options.correlation_id = Some(id.into());
        self
    }

    /// Builds the submit_sm PDU for this message.
    pub fn to_submit_sm(&self, sequence_number: u32) -> SmppResult<SubmitSm> {
        if self.body.len() > MAX_SHORT_MESSAGE_LENGTH {
            return Err(SmppError::InvalidData(format!(
                "message body is {} octets, short_message holds at most {MAX_SHORT_MESSAGE_LENGTH}",
                self.body.len()
            )));
        }

        let (source_addr, source_ton, source_npi) = numbering(&self.from);
        let (dest_addr, dest_ton, dest_npi) = numbering(&self.to);

        let mut submit = SubmitSm::new(sequence_number, source_addr, dest_addr, self.body.clone());
        submit.source_addr_ton = source_ton;
        submit.source_addr_npi = source_npi;
        submit.dest_addr_ton = dest_ton;
        submit.dest_addr_npi = dest_npi;
        submit.data_coding = self.options.data_coding;
        submit.registered_delivery = self.options.registered_delivery;

        if let Some(id) = &self.options.correlation_id {
            submit
                .tlvs
                .push(Tlv::cstring(tags::RECEIPTED_MESSAGE_ID, id));
        }

        Ok(submit)
    }
}

/// Picks TON/NPI for an address. "+447700900123" goes out as international
/// ISDN without the plus; anything with letters is an alphanumeric sender.
fn numbering(address: &str) -> (&str, TypeOfNumber, NumericPlanIndicator) {
    if let Some(digits) = address.strip_prefix('+') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return (digits, TypeOfNumber::International, NumericPlanIndicator::Isdn);
        }
    }

    if !address.is_empty() && address.bytes().all(|b| b.is_ascii_digit()) {
        (address, TypeOfNumber::Unknown, NumericPlanIndicator::Isdn)
    } else if address.is_empty() {
        (address, TypeOfNumber::Unknown, NumericPlanIndicator::Unknown)
    } else {
        (address, TypeOfNumber::Alphanumeric, NumericPlanIndicator::Unknown)
    }
}

/// What the SMSC returned for an accepted submit_sm
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReceipt {
    pub message_id: String,
    pub command_status: CommandStatus,
}
