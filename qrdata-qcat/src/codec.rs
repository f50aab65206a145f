//! QCAT ticket codec
//!
//! # Wire Layout
//!
//! ```text
//! 85 05 "CPV01"
//! 61 len
//!    [4F len adf-name] [5A len pan]
//!    63 len
//!       C1 ticket id ... D5 funding provider
//!       [DE len version-byte signature]
//! ```
//!
//! All tags and lengths are BER. Integers are minimal big-endian. The ticket
//! fields are read from the pre-order flattening of the decoded tree, so the
//! template headers and their contents appear as one forward sequence.

use crate::poi::EmvPoiData;
use crate::signature::placeholder_signature;
use crate::ticket::{Ticket, TicketBuilder};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use qrdata_core::{ByteCursor, QrDataError, QrDataResult, Reporter, minimal_be_bytes};
use qrdata_tlv::ber::{self, BerDecoder, BerEncoder};
use qrdata_tlv::{TlvNode, flatten};
use std::iter::Peekable;
use std::time::Duration;

pub const TAG_PAYLOAD_FORMAT_INDICATOR: u32 = 0x85;
pub const TAG_APPLICATION_TEMPLATE: u32 = 0x61;
pub const TAG_ADF_NAME: u32 = 0x4F;
pub const TAG_APPLICATION_PAN: u32 = 0x5A;
pub const TAG_TRANSPARENT_TEMPLATE: u32 = 0x63;

pub const TAG_TICKET_ID: u32 = 0xC1;
pub const TAG_CREATOR_ID: u32 = 0xC2;
pub const TAG_CREATION_TIME: u32 = 0xC3;
pub const TAG_VALIDITY_PERIOD: u32 = 0xC4;
pub const TAG_VALIDITY_DOMAIN: u32 = 0xC5;
pub const TAG_TRANSPORT_OPERATOR: u32 = 0xC6;
pub const TAG_EFFECTIVE_TIME: u32 = 0xC7;
pub const TAG_REFRESH_TIME: u32 = 0xC8;
pub const TAG_TICKET_TYPE: u32 = 0xC9;
pub const TAG_ACCOUNT_ID: u32 = 0xCA;
pub const TAG_BOARDING_STATION: u32 = 0xCB;
pub const TAG_DESTINATION_STATION: u32 = 0xCC;
pub const TAG_VEHICLE_ID: u32 = 0xCD;
pub const TAG_ROUTE_ID: u32 = 0xCE;
pub const TAG_SEAT_NUMBER: u32 = 0xCF;
pub const TAG_SEAT_CLASS: u32 = 0xD0;
pub const TAG_MAX_AUTHORIZED_AMOUNT: u32 = 0xD1;
pub const TAG_SIGNATURE_KEY_ID: u32 = 0xD2;
pub const TAG_TERMINAL_ID: u32 = 0xD3;
pub const TAG_FUNDING_SOURCE_TYPE: u32 = 0xD4;
pub const TAG_FUNDING_SOURCE_PROVIDER: u32 = 0xD5;
pub const TAG_SIGNATURE: u32 = 0xDE;

/// Value of the payload format indicator
pub const PAYLOAD_FORMAT_INDICATOR: &[u8] = b"CPV01";

type NodeIter<'a> = Peekable<std::iter::Enumerate<std::vec::IntoIter<&'a TlvNode>>>;

impl Ticket {
    /// Decode a BER encoded ticket
    ///
    /// Decoding is all-or-nothing. The first error is recorded with the
    /// reporter and returned.
    pub fn decode(bytes: &[u8], reporter: &mut dyn Reporter) -> QrDataResult<Ticket> {
        debug!("Decoding QCAT ticket from {} bytes", bytes.len());
        let nodes = BerDecoder::new().decode(bytes, reporter)?;
        Self::from_tlv_nodes(&nodes).inspect_err(|e| reporter.add_report(e.to_string()))
    }

    /// Decode a ticket from its standard base64 text form
    pub fn decode_base64(encoded: &str, reporter: &mut dyn Reporter) -> QrDataResult<Ticket> {
        let bytes = STANDARD.decode(encoded.trim()).map_err(|e| {
            let error = QrDataError::InvalidData(format!("Invalid base64 ticket: {}", e));
            reporter.add_report(error.to_string());
            error
        })?;
        Self::decode(&bytes, reporter)
    }

    /// Interpret an already decoded BER tree as a ticket
    pub fn from_tlv_nodes(nodes: &[TlvNode]) -> QrDataResult<Ticket> {
        let mut iter: NodeIter<'_> = flatten(nodes).into_iter().enumerate().peekable();

        expect_payload_indicator(&mut iter)?;
        let template = expect_tag(&mut iter, TAG_APPLICATION_TEMPLATE, "Application Template")?;
        debug!("Application template of {} bytes", template.length);
        let poi_data = read_poi_data(&mut iter);
        expect_tag(&mut iter, TAG_TRANSPARENT_TEMPLATE, "Transparent Template")?;

        let builder = read_fields(&mut iter)?.poi_data(poi_data);
        let ticket = builder.build()?;

        if ticket.signature_version().is_some() {
            warn!("Signature not verified (creator ID: {})", ticket.creator_id());
        }
        Ok(ticket)
    }

    /// Encode the ticket to BER bytes
    ///
    /// If a signature version is set and the ticket carries no signature
    /// bytes, a placeholder of the version's signature length is framed
    /// instead.
    pub fn encode(&self) -> QrDataResult<Vec<u8>> {
        let nodes = self.to_tlv_nodes()?;
        let mut encoder = BerEncoder::new();
        encoder.encode_nodes(&nodes)?;
        debug!("Encoded ticket {} into {} bytes", self.ticket_id(), encoder.as_bytes().len());
        Ok(encoder.into_bytes())
    }

    /// Build the TLV tree of the ticket
    pub fn to_tlv_nodes(&self) -> QrDataResult<Vec<TlvNode>> {
        let mut fields = Vec::new();

        push_uint(&mut fields, TAG_TICKET_ID, u64::from(self.ticket_id()));
        push_uint(&mut fields, TAG_CREATOR_ID, u64::from(self.creator_id()));
        fields.push(time_node(TAG_CREATION_TIME, self.creation_time())?);
        push_uint(&mut fields, TAG_VALIDITY_PERIOD, self.validity_period().as_secs());
        for &domain in self.validity_domains() {
            push_uint(&mut fields, TAG_VALIDITY_DOMAIN, u64::from(domain));
        }
        for &operator in self.transport_operator_ids() {
            push_uint(&mut fields, TAG_TRANSPORT_OPERATOR, u64::from(operator));
        }
        if let Some(time) = self.effective_time() {
            fields.push(time_node(TAG_EFFECTIVE_TIME, time)?);
        }
        if let Some(time) = self.refresh_time() {
            fields.push(time_node(TAG_REFRESH_TIME, time)?);
        }
        for &ticket_type in self.ticket_types() {
            push_uint(&mut fields, TAG_TICKET_TYPE, u64::from(ticket_type));
        }
        push_str(&mut fields, TAG_ACCOUNT_ID, self.account_id());
        push_opt_uint(&mut fields, TAG_BOARDING_STATION, self.boarding_station());
        push_opt_uint(&mut fields, TAG_DESTINATION_STATION, self.destination_station());
        push_opt_uint(&mut fields, TAG_VEHICLE_ID, self.vehicle_id());
        push_opt_uint(&mut fields, TAG_ROUTE_ID, self.route_id());
        push_str(&mut fields, TAG_SEAT_NUMBER, self.seat_number());
        push_str(&mut fields, TAG_SEAT_CLASS, self.seat_class());
        push_opt_uint(&mut fields, TAG_MAX_AUTHORIZED_AMOUNT, self.max_authorized_amount());
        push_str(&mut fields, TAG_SIGNATURE_KEY_ID, self.signature_key_identifier());
        push_str(&mut fields, TAG_TERMINAL_ID, self.terminal_identifier());
        push_opt_uint(&mut fields, TAG_FUNDING_SOURCE_TYPE, self.funding_source_type());
        push_str(&mut fields, TAG_FUNDING_SOURCE_PROVIDER, self.funding_source_provider());

        if let Some(version) = self.signature_version() {
            let signature = match self.signature() {
                Some(signature) if !signature.is_empty() => signature.to_vec(),
                _ => placeholder_signature(version),
            };
            let mut block = Vec::with_capacity(signature.len() + 1);
            block.push(version);
            block.extend_from_slice(&signature);
            fields.push(TlvNode::primitive(TAG_SIGNATURE, block));
        }

        let mut application = Vec::new();
        if let Some(poi) = self.poi_data() {
            if let Some(adf_name) = &poi.adf_name {
                application.push(TlvNode::primitive(TAG_ADF_NAME, adf_name.clone()));
            }
            if let Some(pan) = &poi.app_pan {
                application.push(TlvNode::primitive(TAG_APPLICATION_PAN, pan.clone()));
            }
        }
        application.push(ber::constructed(TAG_TRANSPARENT_TEMPLATE, fields)?);

        Ok(vec![
            TlvNode::primitive(TAG_PAYLOAD_FORMAT_INDICATOR, PAYLOAD_FORMAT_INDICATOR),
            ber::constructed(TAG_APPLICATION_TEMPLATE, application)?,
        ])
    }
}

fn expect_payload_indicator(iter: &mut NodeIter<'_>) -> QrDataResult<()> {
    let node = expect_tag(iter, TAG_PAYLOAD_FORMAT_INDICATOR, "Payload Format Indicator")?;
    if node.value != PAYLOAD_FORMAT_INDICATOR {
        return Err(QrDataError::TicketValidation(format!(
            "Payload Format Indicator should be 'CPV01', but is '{}' (length {})",
            String::from_utf8_lossy(&node.value),
            node.length
        )));
    }
    Ok(())
}

fn expect_tag<'a>(iter: &mut NodeIter<'a>, tag: u32, name: &str) -> QrDataResult<&'a TlvNode> {
    match iter.next() {
        Some((_, node)) if node.tag == tag => Ok(node),
        Some((index, node)) => Err(QrDataError::TicketValidation(format!(
            "{} tag should be 0x{:02X}, but is 0x{:02X} at index {}",
            name, tag, node.tag, index
        ))),
        None => Err(QrDataError::TicketValidation(format!(
            "{} (tag 0x{:02X}) missing",
            name, tag
        ))),
    }
}

/// Read ADF name and PAN up to the first other tag, which is left in place
fn read_poi_data(iter: &mut NodeIter<'_>) -> Option<EmvPoiData> {
    let mut poi = EmvPoiData::default();
    let is_poi = |(_, node): &(usize, &TlvNode)| matches!(node.tag, TAG_ADF_NAME | TAG_APPLICATION_PAN);
    while let Some((_, node)) = iter.next_if(is_poi) {
        if node.tag == TAG_ADF_NAME {
            poi.adf_name = Some(node.value.clone());
        } else {
            poi.app_pan = Some(node.value.clone());
        }
    }
    (!poi.is_empty()).then_some(poi)
}

/// Mandatory fields collected before the builder can exist
#[derive(Default)]
struct Mandatory {
    ticket_id: Option<u32>,
    creator_id: Option<u16>,
    creation_time: Option<DateTime<Utc>>,
    validity_period: Option<Duration>,
}

impl Mandatory {
    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.ticket_id.is_none() {
            missing.push("Ticket ID");
        }
        if self.creator_id.is_none() {
            missing.push("Creator ID");
        }
        if self.creation_time.is_none() {
            missing.push("Creation Timestamp");
        }
        if self.validity_period.is_none() {
            missing.push("Validity Period");
        }
        missing
    }
}

fn read_fields(iter: &mut NodeIter<'_>) -> QrDataResult<TicketBuilder> {
    let mut mandatory = Mandatory::default();
    // Parked until the mandatory fields are known
    let mut staged = TicketBuilder::new(0, 0, DateTime::UNIX_EPOCH, Duration::ZERO);

    while let Some((index, node)) = iter.next() {
        let field = Field { node, index };
        match node.tag {
            TAG_TICKET_ID => mandatory.ticket_id = Some(field.u32("Ticket ID")?),
            TAG_CREATOR_ID => mandatory.creator_id = Some(field.u16("Creator ID")?),
            TAG_CREATION_TIME => mandatory.creation_time = Some(field.time("Creation Timestamp")?),
            TAG_VALIDITY_PERIOD => {
                mandatory.validity_period =
                    Some(Duration::from_secs(field.uint("Validity Period", 8)?))
            }
            TAG_VALIDITY_DOMAIN => staged.validity_domains.push(field.u16("Validity Domain")?),
            TAG_TRANSPORT_OPERATOR => {
                staged.transport_operator_ids.push(field.u32("Transport Operator ID")?)
            }
            TAG_EFFECTIVE_TIME => staged.effective_time = Some(field.time("Effective Time")?),
            TAG_REFRESH_TIME => staged.refresh_time = Some(field.time("Refresh Time")?),
            TAG_TICKET_TYPE => staged.ticket_types.push(field.u16("Ticket Type")?),
            TAG_ACCOUNT_ID => staged.account_id = Some(field.string("Account ID")?),
            TAG_BOARDING_STATION => staged.boarding_station = Some(field.u32("Boarding Station")?),
            TAG_DESTINATION_STATION => {
                staged.destination_station = Some(field.u32("Destination Station")?)
            }
            TAG_VEHICLE_ID => staged.vehicle_id = Some(field.u32("Vehicle ID")?),
            TAG_ROUTE_ID => staged.route_id = Some(field.u32("Route ID")?),
            TAG_SEAT_NUMBER => staged.seat_number = Some(field.string("Seat Number")?),
            TAG_SEAT_CLASS => staged.seat_class = Some(field.string("Seat Class")?),
            TAG_MAX_AUTHORIZED_AMOUNT => {
                staged.max_authorized_amount = Some(field.u32("Max Authorized Amount")?)
            }
            TAG_SIGNATURE_KEY_ID => {
                staged.signature_key_identifier = Some(field.string("Signature Key ID")?)
            }
            TAG_TERMINAL_ID => staged.terminal_identifier = Some(field.string("Terminal ID")?),
            TAG_FUNDING_SOURCE_TYPE => {
                staged.funding_source_type = Some(field.u16("Funding Source Type")?)
            }
            TAG_FUNDING_SOURCE_PROVIDER => {
                staged.funding_source_provider = Some(field.string("Funding Source Provider")?)
            }
            TAG_SIGNATURE => {
                let (version, signature) = node.value.split_first().ok_or_else(|| {
                    QrDataError::TicketValidation(format!(
                        "Signature block at index {} has no version byte",
                        index
                    ))
                })?;
                staged.signature_version = Some(*version);
                staged.signature = (!signature.is_empty()).then(|| signature.to_vec());

                if let Some((next_index, next)) = iter.next() {
                    return Err(QrDataError::TicketValidation(format!(
                        "Data after signature: tag 0x{:02X} at index {}",
                        next.tag, next_index
                    )));
                }
            }
            other => {
                return Err(QrDataError::TicketValidation(format!(
                    "Unknown tag in QCAT payload data: 0x{:02X} at index {}",
                    other, index
                )));
            }
        }
    }

    let missing = mandatory.missing();
    match mandatory {
        Mandatory {
            ticket_id: Some(ticket_id),
            creator_id: Some(creator_id),
            creation_time: Some(creation_time),
            validity_period: Some(validity_period),
        } => {
            staged.ticket_id = ticket_id;
            staged.creator_id = creator_id;
            staged.creation_time = creation_time;
            staged.validity_period = validity_period;
            Ok(staged)
        }
        _ => Err(QrDataError::TicketValidation(format!(
            "Mandatory field(s) missing: {}",
            missing.join(", ")
        ))),
    }
}

/// One ticket field node and its position in the flattened sequence
struct Field<'a> {
    node: &'a TlvNode,
    index: usize,
}

impl Field<'_> {
    fn error(&self, name: &str, reason: &str) -> QrDataError {
        QrDataError::TicketValidation(format!(
            "{} (tag 0x{:02X}) at index {}: {}",
            name, self.node.tag, self.index, reason
        ))
    }

    fn uint(&self, name: &str, max_width: usize) -> QrDataResult<u64> {
        let width = self.node.value.len();
        if width == 0 {
            return Err(self.error(name, "empty value"));
        }
        if width > max_width {
            return Err(self.error(
                name,
                &format!("{} bytes exceed the maximum of {}", width, max_width),
            ));
        }
        ByteCursor::new(&self.node.value).read_uint(width)
    }

    fn u16(&self, name: &str) -> QrDataResult<u16> {
        let value = self.uint(name, 2)?;
        u16::try_from(value).map_err(|_| self.error(name, "value out of range"))
    }

    fn u32(&self, name: &str) -> QrDataResult<u32> {
        let value = self.uint(name, 4)?;
        u32::try_from(value).map_err(|_| self.error(name, "value out of range"))
    }

    fn time(&self, name: &str) -> QrDataResult<DateTime<Utc>> {
        let seconds = self.uint(name, 8)?;
        i64::try_from(seconds)
            .ok()
            .and_then(|s| DateTime::from_timestamp(s, 0))
            .ok_or_else(|| self.error(name, "timestamp out of range"))
    }

    fn string(&self, name: &str) -> QrDataResult<String> {
        String::from_utf8(self.node.value.clone()).map_err(|_| self.error(name, "invalid UTF-8"))
    }
}

fn push_uint(fields: &mut Vec<TlvNode>, tag: u32, value: u64) {
    fields.push(TlvNode::primitive(tag, minimal_be_bytes(value)));
}

fn push_opt_uint<T: Into<u64>>(fields: &mut Vec<TlvNode>, tag: u32, value: Option<T>) {
    if let Some(value) = value {
        push_uint(fields, tag, value.into());
    }
}

fn push_str(fields: &mut Vec<TlvNode>, tag: u32, value: Option<&str>) {
    if let Some(value) = value {
        fields.push(TlvNode::primitive(tag, value.as_bytes()));
    }
}

fn time_node(tag: u32, time: DateTime<Utc>) -> QrDataResult<TlvNode> {
    let seconds = u64::try_from(time.timestamp()).map_err(|_| {
        QrDataError::EncodingConstraint(format!(
            "Time {} before 1970 cannot be encoded in tag 0x{:02X}",
            time, tag
        ))
    })?;
    Ok(TlvNode::primitive(tag, minimal_be_bytes(seconds)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poi::QCAT_ADF_NAME;
    use chrono::TimeZone;
    use qrdata_core::{MemoryReporter, NullReporter};

    const QCAT_SAMPLE: &str = "hQVDUFYwMWFuTwZRQ0FUMDFjZMECEwfCAgEGwwRd6cfcxAMD9IDGAgEGyQEBywEBzAEAzgEL0wUzMDI4Mt44AjA1Ahhz3dBM7DqCOUzUZjtuQqfDITW3bGlX6G0CGQCoAyQM7geTFZQSU0C9APUeqNLYNUKBwDc=";

    fn full_ticket() -> Ticket {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        Ticket::builder(0x0001_0203, 262, created, Duration::from_secs(86_400))
            .validity_domains(vec![1, 2])
            .transport_operator_ids(vec![262, 0x0100_0000])
            .effective_time(created)
            .refresh_time(Utc.with_ymd_and_hms(2024, 3, 1, 8, 31, 0).unwrap())
            .ticket_types(vec![17])
            .account_id("acct-0001")
            .boarding_station(1)
            .destination_station(0)
            .vehicle_id(4711)
            .route_id(11)
            .seat_number("12A")
            .seat_class("B")
            .max_authorized_amount(5000)
            .signature_key_identifier("key-1")
            .terminal_identifier("T_01")
            .funding_source_type(2)
            .funding_source_provider("GCASH")
            .signature_version(5)
            .build()
            .unwrap()
    }

    fn encode_fields(fields: &[TlvNode]) -> Vec<u8> {
        encode_payload(vec![TlvNode::primitive(TAG_ADF_NAME, QCAT_ADF_NAME)], fields)
    }

    fn encode_payload(poi: Vec<TlvNode>, fields: &[TlvNode]) -> Vec<u8> {
        let mut children = poi;
        children.push(ber::constructed(TAG_TRANSPARENT_TEMPLATE, fields.to_vec()).unwrap());
        let application = ber::constructed(TAG_APPLICATION_TEMPLATE, children).unwrap();
        let mut encoder = BerEncoder::new();
        encoder
            .encode_nodes(&[
                TlvNode::primitive(TAG_PAYLOAD_FORMAT_INDICATOR, PAYLOAD_FORMAT_INDICATOR),
                application,
            ])
            .unwrap();
        encoder.into_bytes()
    }

    fn mandatory_fields() -> Vec<TlvNode> {
        vec![
            TlvNode::primitive(TAG_TICKET_ID, vec![0x13, 0x07]),
            TlvNode::primitive(TAG_CREATOR_ID, vec![0x01, 0x06]),
            TlvNode::primitive(TAG_CREATION_TIME, vec![0x5D, 0xE9, 0xC7, 0xDC]),
            TlvNode::primitive(TAG_VALIDITY_PERIOD, vec![0x03, 0xF4, 0x80]),
        ]
    }

    #[test]
    fn test_round_trip() {
        let ticket = full_ticket();
        let bytes = ticket.encode().unwrap();
        let decoded = Ticket::decode(&bytes, &mut NullReporter).unwrap();

        assert!(decoded.is_same(&ticket, false));
        assert_eq!(decoded.refresh_time(), ticket.refresh_time());
        assert_eq!(decoded.signature().map(<[u8]>::len), Some(16));
        assert_eq!(decoded.encode().unwrap(), bytes);
    }

    #[test]
    fn test_decode_sample() {
        let mut reporter = MemoryReporter::new();
        let ticket = Ticket::decode_base64(QCAT_SAMPLE, &mut reporter).unwrap();

        assert_eq!(ticket.ticket_id(), 0x1307);
        assert_eq!(ticket.creator_id(), 262);
        assert_eq!(ticket.creation_time().timestamp(), 0x5DE9_C7DC);
        assert_eq!(ticket.validity_period(), Duration::from_secs(259_200));
        assert_eq!(ticket.transport_operator_ids(), &[262]);
        assert_eq!(ticket.ticket_types(), &[1]);
        assert_eq!(ticket.boarding_station(), Some(1));
        assert_eq!(ticket.destination_station(), Some(0));
        assert_eq!(ticket.route_id(), Some(11));
        assert_eq!(ticket.terminal_identifier(), Some("30282"));
        assert_eq!(ticket.signature_version(), Some(2));
        assert_eq!(ticket.signature().map(<[u8]>::len), Some(55));
        assert_eq!(ticket.poi_data(), Some(&EmvPoiData::qcat()));
        assert!(reporter.reports().is_empty());
    }

    #[test]
    fn test_sample_reencodes_identically() {
        let bytes = STANDARD.decode(QCAT_SAMPLE).unwrap();
        let ticket = Ticket::decode(&bytes, &mut NullReporter).unwrap();
        assert_eq!(ticket.encode().unwrap(), bytes);
    }

    #[test]
    fn test_missing_validity_period() {
        let mut fields = mandatory_fields();
        fields.remove(3);
        let mut reporter = MemoryReporter::new();
        let err = Ticket::decode(&encode_fields(&fields), &mut reporter).unwrap_err();

        assert!(matches!(err, QrDataError::TicketValidation(_)));
        assert!(err.to_string().contains("Validity Period"));
        assert_eq!(reporter.message_number(), 1);
    }

    #[test]
    fn test_all_missing_fields_named() {
        let fields = vec![TlvNode::primitive(TAG_ROUTE_ID, vec![0x01])];
        let err = Ticket::decode(&encode_fields(&fields), &mut NullReporter).unwrap_err();
        assert!(err.to_string().ends_with(
            "Mandatory field(s) missing: Ticket ID, Creator ID, Creation Timestamp, Validity Period"
        ));
    }

    #[test]
    fn test_unknown_tag() {
        let mut fields = mandatory_fields();
        fields.insert(2, TlvNode::primitive(0xD9, vec![0x00]));
        let err = Ticket::decode(&encode_fields(&fields), &mut NullReporter).unwrap_err();
        // 85, 61, 4F, 63, C1, C2, D9
        assert!(err.to_string().contains("0xD9 at index 6"));
    }

    #[test]
    fn test_data_after_signature() {
        let mut fields = mandatory_fields();
        fields.push(TlvNode::primitive(TAG_SIGNATURE, vec![0x03, 0xAA, 0xBB]));
        fields.push(TlvNode::primitive(TAG_ROUTE_ID, vec![0x01]));
        let err = Ticket::decode(&encode_fields(&fields), &mut NullReporter).unwrap_err();
        assert!(err.to_string().contains("Data after signature"));
    }

    #[test]
    fn test_envelope_checks() {
        let bytes = hex::decode("8505435056303261024F00").unwrap();
        let err = Ticket::decode(&bytes, &mut NullReporter).unwrap_err();
        assert!(err.to_string().contains("CPV02"));

        let bytes = hex::decode("850543505630318000").unwrap();
        let err = Ticket::decode(&bytes, &mut NullReporter).unwrap_err();
        assert!(err.to_string().contains("Application Template tag should be 0x61"));
    }

    #[test]
    fn test_poi_data_optional() {
        let transparent = ber::constructed(TAG_TRANSPARENT_TEMPLATE, mandatory_fields()).unwrap();
        let application = ber::constructed(TAG_APPLICATION_TEMPLATE, vec![transparent]).unwrap();
        let mut encoder = BerEncoder::new();
        encoder
            .encode_nodes(&[
                TlvNode::primitive(TAG_PAYLOAD_FORMAT_INDICATOR, PAYLOAD_FORMAT_INDICATOR),
                application,
            ])
            .unwrap();

        let ticket = Ticket::decode(encoder.as_bytes(), &mut NullReporter).unwrap();
        assert_eq!(ticket.poi_data(), None);
        assert_eq!(ticket.encode().unwrap(), encoder.into_bytes());
    }

    #[test]
    fn test_application_pan() {
        let pan = hex::decode("1107004000000000").unwrap();

        let bytes = encode_payload(
            vec![
                TlvNode::primitive(TAG_ADF_NAME, QCAT_ADF_NAME),
                TlvNode::primitive(TAG_APPLICATION_PAN, pan.clone()),
            ],
            &mandatory_fields(),
        );
        let ticket = Ticket::decode(&bytes, &mut NullReporter).unwrap();
        let poi = ticket.poi_data().unwrap();
        assert_eq!(poi.adf_name.as_deref(), Some(QCAT_ADF_NAME));
        assert_eq!(poi.app_pan.as_deref(), Some(&pan[..]));
        assert_eq!(ticket.encode().unwrap(), bytes);

        let bytes = encode_payload(
            vec![TlvNode::primitive(TAG_APPLICATION_PAN, pan.clone())],
            &mandatory_fields(),
        );
        let ticket = Ticket::decode(&bytes, &mut NullReporter).unwrap();
        assert_eq!(ticket.poi_data(), Some(&EmvPoiData::new(None, Some(pan))));
        assert_eq!(ticket.encode().unwrap(), bytes);
    }

    #[test]
    fn test_field_width_limits() {
        let mut fields = mandatory_fields();
        fields[1] = TlvNode::primitive(TAG_CREATOR_ID, vec![0x01, 0x00, 0x00]);
        let err = Ticket::decode(&encode_fields(&fields), &mut NullReporter).unwrap_err();
        assert!(err.to_string().contains("Creator ID (tag 0xC2)"));

        let mut fields = mandatory_fields();
        fields[0] = TlvNode::primitive(TAG_TICKET_ID, Vec::new());
        let err = Ticket::decode(&encode_fields(&fields), &mut NullReporter).unwrap_err();
        assert!(err.to_string().contains("empty value"));
    }

    #[test]
    fn test_signature_framing() {
        let created = Utc.timestamp_opt(1_575_601_372, 0).unwrap();
        let base = Ticket::builder(1, 1, created, Duration::from_secs(60));

        let unsigned = base.clone().build().unwrap();
        let decoded = Ticket::decode(&unsigned.encode().unwrap(), &mut NullReporter).unwrap();
        assert_eq!(decoded.signature_version(), None);

        let unknown = base.clone().signature_version(9).build().unwrap();
        let decoded = Ticket::decode(&unknown.encode().unwrap(), &mut NullReporter).unwrap();
        assert_eq!(decoded.signature_version(), Some(9));
        assert_eq!(decoded.signature(), None);

        let signed = base.signature_version(3).signature(vec![0xCA, 0xFE]).build().unwrap();
        let decoded = Ticket::decode(&signed.encode().unwrap(), &mut NullReporter).unwrap();
        assert_eq!(decoded.signature(), Some(&[0xCA, 0xFE][..]));
    }

    #[test]
    fn test_invalid_base64() {
        let mut reporter = MemoryReporter::new();
        let err = Ticket::decode_base64("not base64!", &mut reporter).unwrap_err();
        assert!(matches!(err, QrDataError::InvalidData(_)));
        assert_eq!(reporter.message_number(), 1);
    }
}
