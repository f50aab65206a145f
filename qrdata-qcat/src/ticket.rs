//! QCAT ticket entity
//!
//! A [`Ticket`] is immutable once built. All construction goes through
//! [`TicketBuilder`], which validates the character-set and length
//! constraints of the string fields and truncates times to whole seconds.
//!
//! # Equality
//!
//! Tickets have two equality tiers:
//! - `PartialEq`/`Hash` compare the identifying fields only: ticket id,
//!   creator id, creation time, validity period and terminal id.
//! - [`Ticket::is_same`] compares the full content. Lists are compared as
//!   sets and the refresh time is ignored, because it belongs to a QR
//!   rendering and not to the ticket.

use crate::poi::EmvPoiData;
use crate::signature::SignatureVersion;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use qrdata_core::{QrDataError, QrDataResult};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// Maximum number of characters of seat number and seat class
pub const MAX_SEAT_LENGTH: usize = 5;

static IDENTIFIER_PATTERN: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[0-9A-Za-z_-]*$"));

/// Decoded QCAT transit ticket
#[derive(Debug, Clone, Serialize)]
pub struct Ticket {
    poi_data: Option<EmvPoiData>,
    ticket_id: u32,
    creator_id: u16,
    creation_time: DateTime<Utc>,
    validity_period: Duration,
    validity_domains: Vec<u16>,
    transport_operator_ids: Vec<u32>,
    effective_time: Option<DateTime<Utc>>,
    refresh_time: Option<DateTime<Utc>>,
    ticket_types: Vec<u16>,
    account_id: Option<String>,
    boarding_station: Option<u32>,
    destination_station: Option<u32>,
    vehicle_id: Option<u32>,
    route_id: Option<u32>,
    seat_number: Option<String>,
    seat_class: Option<String>,
    max_authorized_amount: Option<u32>,
    signature_key_identifier: Option<String>,
    terminal_identifier: Option<String>,
    funding_source_type: Option<u16>,
    funding_source_provider: Option<String>,
    signature_version: Option<u8>,
    #[serde(with = "serde_bytes")]
    signature: Option<Vec<u8>>,
}

impl Ticket {
    pub fn builder(
        ticket_id: u32,
        creator_id: u16,
        creation_time: DateTime<Utc>,
        validity_period: Duration,
    ) -> TicketBuilder {
        TicketBuilder::new(ticket_id, creator_id, creation_time, validity_period)
    }

    /// Builder pre-filled with every field of this ticket
    pub fn to_builder(&self) -> TicketBuilder {
        TicketBuilder {
            poi_data: self.poi_data.clone(),
            ticket_id: self.ticket_id,
            creator_id: self.creator_id,
            creation_time: self.creation_time,
            validity_period: self.validity_period,
            validity_domains: self.validity_domains.clone(),
            transport_operator_ids: self.transport_operator_ids.clone(),
            effective_time: self.effective_time,
            refresh_time: self.refresh_time,
            ticket_types: self.ticket_types.clone(),
            account_id: self.account_id.clone(),
            boarding_station: self.boarding_station,
            destination_station: self.destination_station,
            vehicle_id: self.vehicle_id,
            route_id: self.route_id,
            seat_number: self.seat_number.clone(),
            seat_class: self.seat_class.clone(),
            max_authorized_amount: self.max_authorized_amount,
            signature_key_identifier: self.signature_key_identifier.clone(),
            terminal_identifier: self.terminal_identifier.clone(),
            funding_source_type: self.funding_source_type,
            funding_source_provider: self.funding_source_provider.clone(),
            signature_version: self.signature_version,
            signature: self.signature.clone(),
        }
    }

    pub fn poi_data(&self) -> Option<&EmvPoiData> {
        self.poi_data.as_ref()
    }

    pub fn ticket_id(&self) -> u32 {
        self.ticket_id
    }

    pub fn creator_id(&self) -> u16 {
        self.creator_id
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    pub fn validity_period(&self) -> Duration {
        self.validity_period
    }

    /// End of validity: creation time plus validity period
    pub fn expiry_time(&self) -> Option<DateTime<Utc>> {
        let period = chrono::Duration::from_std(self.validity_period).ok()?;
        self.creation_time.checked_add_signed(period)
    }

    pub fn validity_domains(&self) -> &[u16] {
        &self.validity_domains
    }

    pub fn transport_operator_ids(&self) -> &[u32] {
        &self.transport_operator_ids
    }

    pub fn effective_time(&self) -> Option<DateTime<Utc>> {
        self.effective_time
    }

    pub fn refresh_time(&self) -> Option<DateTime<Utc>> {
        self.refresh_time
    }

    pub fn ticket_types(&self) -> &[u16] {
        &self.ticket_types
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn boarding_station(&self) -> Option<u32> {
        self.boarding_station
    }

    pub fn destination_station(&self) -> Option<u32> {
        self.destination_station
    }

    pub fn vehicle_id(&self) -> Option<u32> {
        self.vehicle_id
    }

    pub fn route_id(&self) -> Option<u32> {
        self.route_id
    }

    pub fn seat_number(&self) -> Option<&str> {
        self.seat_number.as_deref()
    }

    pub fn seat_class(&self) -> Option<&str> {
        self.seat_class.as_deref()
    }

    /// Fare ceiling in minor currency units
    pub fn max_authorized_amount(&self) -> Option<u32> {
        self.max_authorized_amount
    }

    pub fn signature_key_identifier(&self) -> Option<&str> {
        self.signature_key_identifier.as_deref()
    }

    pub fn terminal_identifier(&self) -> Option<&str> {
        self.terminal_identifier.as_deref()
    }

    pub fn funding_source_type(&self) -> Option<u16> {
        self.funding_source_type
    }

    pub fn funding_source_provider(&self) -> Option<&str> {
        self.funding_source_provider.as_deref()
    }

    /// Raw signature version byte, which may name an unknown algorithm
    pub fn signature_version(&self) -> Option<u8> {
        self.signature_version
    }

    /// Signature algorithm, if the version byte names a known one
    pub fn signature_algorithm(&self) -> Option<SignatureVersion> {
        self.signature_version.and_then(SignatureVersion::from_byte)
    }

    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    /// Content equality
    ///
    /// Requires identity equality first. Then compares every optional field
    /// except the refresh time, with lists compared as sets. Signatures are
    /// compared only when `compare_signature` is set and both tickets carry
    /// one.
    pub fn is_same(&self, other: &Ticket, compare_signature: bool) -> bool {
        if self != other {
            return false;
        }

        let same_content = self.poi_data == other.poi_data
            && as_set(&self.validity_domains) == as_set(&other.validity_domains)
            && as_set(&self.transport_operator_ids) == as_set(&other.transport_operator_ids)
            && self.effective_time == other.effective_time
            && as_set(&self.ticket_types) == as_set(&other.ticket_types)
            && self.account_id == other.account_id
            && self.boarding_station == other.boarding_station
            && self.destination_station == other.destination_station
            && self.vehicle_id == other.vehicle_id
            && self.route_id == other.route_id
            && self.seat_number == other.seat_number
            && self.seat_class == other.seat_class
            && self.max_authorized_amount == other.max_authorized_amount
            && self.signature_key_identifier == other.signature_key_identifier
            && self.funding_source_type == other.funding_source_type
            && self.funding_source_provider == other.funding_source_provider
            && self.signature_version == other.signature_version;

        if !same_content {
            return false;
        }

        match (&self.signature, &other.signature) {
            (Some(ours), Some(theirs)) if compare_signature => ours == theirs,
            _ => true,
        }
    }

    /// Hash over all content except the refresh time
    ///
    /// Lists are hashed as sets, so tickets that are [`is_same`](Self::is_same)
    /// with identical signatures have the same content hash.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        self.poi_data.hash(&mut hasher);
        as_set(&self.validity_domains).hash(&mut hasher);
        as_set(&self.transport_operator_ids).hash(&mut hasher);
        self.effective_time.hash(&mut hasher);
        as_set(&self.ticket_types).hash(&mut hasher);
        self.account_id.hash(&mut hasher);
        self.boarding_station.hash(&mut hasher);
        self.destination_station.hash(&mut hasher);
        self.vehicle_id.hash(&mut hasher);
        self.route_id.hash(&mut hasher);
        self.seat_number.hash(&mut hasher);
        self.seat_class.hash(&mut hasher);
        self.max_authorized_amount.hash(&mut hasher);
        self.signature_key_identifier.hash(&mut hasher);
        self.funding_source_type.hash(&mut hasher);
        self.funding_source_provider.hash(&mut hasher);
        self.signature_version.hash(&mut hasher);
        self.signature.hash(&mut hasher);
        hasher.finish()
    }
}

impl PartialEq for Ticket {
    fn eq(&self, other: &Self) -> bool {
        self.ticket_id == other.ticket_id
            && self.creator_id == other.creator_id
            && self.creation_time == other.creation_time
            && self.validity_period == other.validity_period
            && self.terminal_identifier == other.terminal_identifier
    }
}

impl Eq for Ticket {}

impl Hash for Ticket {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ticket_id.hash(state);
        self.creator_id.hash(state);
        self.creation_time.hash(state);
        self.validity_period.hash(state);
        self.terminal_identifier.hash(state);
    }
}

fn as_set<T: Ord + Copy>(values: &[T]) -> BTreeSet<T> {
    values.iter().copied().collect()
}

/// Builder for [`Ticket`]
///
/// The four mandatory fields are taken by [`TicketBuilder::new`]. POI data
/// defaults to the QCAT application.
#[derive(Debug, Clone)]
pub struct TicketBuilder {
    pub(crate) poi_data: Option<EmvPoiData>,
    pub(crate) ticket_id: u32,
    pub(crate) creator_id: u16,
    pub(crate) creation_time: DateTime<Utc>,
    pub(crate) validity_period: Duration,
    pub(crate) validity_domains: Vec<u16>,
    pub(crate) transport_operator_ids: Vec<u32>,
    pub(crate) effective_time: Option<DateTime<Utc>>,
    pub(crate) refresh_time: Option<DateTime<Utc>>,
    pub(crate) ticket_types: Vec<u16>,
    pub(crate) account_id: Option<String>,
    pub(crate) boarding_station: Option<u32>,
    pub(crate) destination_station: Option<u32>,
    pub(crate) vehicle_id: Option<u32>,
    pub(crate) route_id: Option<u32>,
    pub(crate) seat_number: Option<String>,
    pub(crate) seat_class: Option<String>,
    pub(crate) max_authorized_amount: Option<u32>,
    pub(crate) signature_key_identifier: Option<String>,
    pub(crate) terminal_identifier: Option<String>,
    pub(crate) funding_source_type: Option<u16>,
    pub(crate) funding_source_provider: Option<String>,
    pub(crate) signature_version: Option<u8>,
    pub(crate) signature: Option<Vec<u8>>,
}

impl TicketBuilder {
    pub fn new(
        ticket_id: u32,
        creator_id: u16,
        creation_time: DateTime<Utc>,
        validity_period: Duration,
    ) -> Self {
        Self {
            poi_data: Some(EmvPoiData::qcat()),
            ticket_id,
            creator_id,
            creation_time,
            validity_period,
            validity_domains: Vec::new(),
            transport_operator_ids: Vec::new(),
            effective_time: None,
            refresh_time: None,
            ticket_types: Vec::new(),
            account_id: None,
            boarding_station: None,
            destination_station: None,
            vehicle_id: None,
            route_id: None,
            seat_number: None,
            seat_class: None,
            max_authorized_amount: None,
            signature_key_identifier: None,
            terminal_identifier: None,
            funding_source_type: None,
            funding_source_provider: None,
            signature_version: None,
            signature: None,
        }
    }

    /// Set or clear the POI data; empty POI data counts as none
    pub fn poi_data(mut self, poi_data: Option<EmvPoiData>) -> Self {
        self.poi_data = poi_data;
        self
    }

    pub fn validity_domains(mut self, domains: Vec<u16>) -> Self {
        self.validity_domains = domains;
        self
    }

    pub fn transport_operator_ids(mut self, operators: Vec<u32>) -> Self {
        self.transport_operator_ids = operators;
        self
    }

    pub fn effective_time(mut self, time: DateTime<Utc>) -> Self {
        self.effective_time = Some(time);
        self
    }

    pub fn refresh_time(mut self, time: DateTime<Utc>) -> Self {
        self.refresh_time = Some(time);
        self
    }

    pub fn ticket_types(mut self, types: Vec<u16>) -> Self {
        self.ticket_types = types;
        self
    }

    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn boarding_station(mut self, station: u32) -> Self {
        self.boarding_station = Some(station);
        self
    }

    pub fn destination_station(mut self, station: u32) -> Self {
        self.destination_station = Some(station);
        self
    }

    pub fn vehicle_id(mut self, vehicle_id: u32) -> Self {
        self.vehicle_id = Some(vehicle_id);
        self
    }

    pub fn route_id(mut self, route_id: u32) -> Self {
        self.route_id = Some(route_id);
        self
    }

    pub fn seat_number(mut self, seat_number: impl Into<String>) -> Self {
        self.seat_number = Some(seat_number.into());
        self
    }

    pub fn seat_class(mut self, seat_class: impl Into<String>) -> Self {
        self.seat_class = Some(seat_class.into());
        self
    }

    pub fn max_authorized_amount(mut self, amount: u32) -> Self {
        self.max_authorized_amount = Some(amount);
        self
    }

    pub fn signature_key_identifier(mut self, key_id: impl Into<String>) -> Self {
        self.signature_key_identifier = Some(key_id.into());
        self
    }

    pub fn terminal_identifier(mut self, terminal_id: impl Into<String>) -> Self {
        self.terminal_identifier = Some(terminal_id.into());
        self
    }

    pub fn funding_source_type(mut self, source_type: u16) -> Self {
        self.funding_source_type = Some(source_type);
        self
    }

    pub fn funding_source_provider(mut self, provider: impl Into<String>) -> Self {
        self.funding_source_provider = Some(provider.into());
        self
    }

    pub fn signature_version(mut self, version: u8) -> Self {
        self.signature_version = Some(version);
        self
    }

    /// Attach signature bytes; requires a signature version
    pub fn signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Validate the fields and build the ticket
    ///
    /// # Error Handling
    /// Returns [`QrDataError::TicketValidation`] if:
    /// - seat number or seat class is longer than 5 characters or not printable ASCII
    /// - key id, terminal id or funding provider contain characters outside `[0-9A-Za-z_-]`
    /// - a time lies before 1970, which the wire format cannot carry
    /// - a signature is attached without a signature version
    pub fn build(self) -> QrDataResult<Ticket> {
        validate_seat("Seat Number", self.seat_number.as_deref())?;
        validate_seat("Seat Class", self.seat_class.as_deref())?;
        validate_identifier("Signature Key ID", self.signature_key_identifier.as_deref())?;
        validate_identifier("Terminal ID", self.terminal_identifier.as_deref())?;
        validate_identifier(
            "Funding Source Provider",
            self.funding_source_provider.as_deref(),
        )?;

        validate_time("Creation Timestamp", Some(self.creation_time))?;
        validate_time("Effective Time", self.effective_time)?;
        validate_time("Refresh Time", self.refresh_time)?;

        if self.signature.is_some() && self.signature_version.is_none() {
            return Err(QrDataError::TicketValidation(
                "Signature present without signature version".to_string(),
            ));
        }

        Ok(Ticket {
            poi_data: self.poi_data.filter(|poi| !poi.is_empty()),
            ticket_id: self.ticket_id,
            creator_id: self.creator_id,
            creation_time: whole_seconds(self.creation_time),
            validity_period: Duration::from_secs(self.validity_period.as_secs()),
            validity_domains: self.validity_domains,
            transport_operator_ids: self.transport_operator_ids,
            effective_time: self.effective_time.map(whole_seconds),
            refresh_time: self.refresh_time.map(whole_seconds),
            ticket_types: self.ticket_types,
            account_id: self.account_id,
            boarding_station: self.boarding_station,
            destination_station: self.destination_station,
            vehicle_id: self.vehicle_id,
            route_id: self.route_id,
            seat_number: self.seat_number,
            seat_class: self.seat_class,
            max_authorized_amount: self.max_authorized_amount,
            signature_key_identifier: self.signature_key_identifier,
            terminal_identifier: self.terminal_identifier,
            funding_source_type: self.funding_source_type,
            funding_source_provider: self.funding_source_provider,
            signature_version: self.signature_version,
            signature: self.signature,
        })
    }
}

fn whole_seconds(time: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or(time)
}

fn validate_time(field: &str, value: Option<DateTime<Utc>>) -> QrDataResult<()> {
    match value {
        Some(time) if time.timestamp() < 0 => Err(QrDataError::TicketValidation(format!(
            "{} {} lies before 1970",
            field, time
        ))),
        _ => Ok(()),
    }
}

fn validate_seat(field: &str, value: Option<&str>) -> QrDataResult<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if value.chars().count() > MAX_SEAT_LENGTH {
        return Err(QrDataError::TicketValidation(format!(
            "{} '{}' longer than {} characters",
            field, value, MAX_SEAT_LENGTH
        )));
    }
    if !value.chars().all(|c| (' '..='~').contains(&c)) {
        return Err(QrDataError::TicketValidation(format!(
            "{} '{}' contains non-printable or non-ASCII characters",
            field, value
        )));
    }
    Ok(())
}

fn validate_identifier(field: &str, value: Option<&str>) -> QrDataResult<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let pattern = IDENTIFIER_PATTERN
        .as_ref()
        .map_err(|e| QrDataError::InvalidData(format!("Identifier pattern: {}", e)))?;
    if !pattern.is_match(value) {
        return Err(QrDataError::TicketValidation(format!(
            "{} '{}' may only contain 0-9, A-Z, a-z, '_' and '-'",
            field, value
        )));
    }
    Ok(())
}
