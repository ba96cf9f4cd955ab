//! Event emission: the hand-off point to the off-chain relayer.
//!
//! Events use the same JSON envelope on every chain so one relayer can
//! index them all. Identities and payload bytes are hex-encoded.

use serde::Serialize;

use crate::registry::SealRecord;

const EVENT_STANDARD: &str = "ika_tensei";
const EVENT_VERSION: &str = "1.0.0";

/// Emitted once per committed seal; carries everything the relayer needs
/// to drive the destination-chain mint, including the raw payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealInitiated {
    pub nft_contract: [u8; 32],
    pub token_id: [u8; 32],
    pub deposit_address: [u8; 32],
    pub receiver: [u8; 32],
    pub token_uri: String,
    pub sequence: u64,
    pub source_chain_id: u16,
    pub payload: Vec<u8>,
}

/// Diagnostic: the asset exposed no metadata URI. The seal still proceeds
/// with an empty URI field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenUriUnavailable {
    pub nft_contract: [u8; 32],
    pub token_id: [u8; 32],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SealInitiated(SealInitiated),
    TokenUriUnavailable(TokenUriUnavailable),
}

#[derive(Serialize)]
struct SealInitiatedData {
    nft_contract: String,
    token_id: String,
    deposit_address: String,
    receiver: String,
    token_uri: String,
    sequence: u64,
    source_chain_id: u16,
    payload: String,
}

#[derive(Serialize)]
struct TokenUriUnavailableData {
    nft_contract: String,
    token_id: String,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::SealInitiated(_) => "seal_initiated",
            Event::TokenUriUnavailable(_) => "token_uri_unavailable",
        }
    }

    /// Render the event in the standard envelope:
    /// `{"standard":"ika_tensei","version":"1.0.0","event":...,"data":[...]}`
    pub fn to_event_json(&self) -> String {
        let data = match self {
            Event::SealInitiated(ev) => {
                let data = SealInitiatedData {
                    nft_contract: hex::encode(ev.nft_contract),
                    token_id: hex::encode(ev.token_id),
                    deposit_address: hex::encode(ev.deposit_address),
                    receiver: hex::encode(ev.receiver),
                    token_uri: ev.token_uri.clone(),
                    sequence: ev.sequence,
                    source_chain_id: ev.source_chain_id,
                    payload: hex::encode(&ev.payload),
                };
                serde_json::json!([data])
            }
            Event::TokenUriUnavailable(ev) => {
                let data = TokenUriUnavailableData {
                    nft_contract: hex::encode(ev.nft_contract),
                    token_id: hex::encode(ev.token_id),
                };
                serde_json::json!([data])
            }
        };

        let event = serde_json::json!({
            "standard": EVENT_STANDARD,
            "version": EVENT_VERSION,
            "event": self.name(),
            "data": data,
        });

        serde_json::to_string(&event).unwrap()
    }
}

impl SealInitiated {
    pub(crate) fn from_record(record: &SealRecord, payload: Vec<u8>) -> Self {
        Self {
            nft_contract: record.nft_contract,
            token_id: record.token_id,
            deposit_address: record.deposit_address,
            receiver: record.receiver,
            token_uri: record.token_uri.clone(),
            sequence: record.sequence,
            source_chain_id: record.source_chain_id,
            payload,
        }
    }
}

/// Append-only outbound channel for protocol events. The core's obligation
/// ends at emission; it never awaits acknowledgement. Only committed calls
/// reach the sink.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

/// Default sink: writes each event as an `EVENT_JSON:` log line, the format
/// chain indexers scrape.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: Event) {
        tracing::info!(target: "seal_initiator", "EVENT_JSON:{}", event.to_event_json());
    }
}

/// Sink that retains every event in order, for tests and embedded indexers.
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    events: Vec<Event>,
}

impl VecSink {
    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

impl EventSink for VecSink {
    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_initiated_envelope() {
        let event = Event::SealInitiated(SealInitiated {
            nft_contract: [1; 32],
            token_id: [2; 32],
            deposit_address: [3; 32],
            receiver: [4; 32],
            token_uri: "ipfs://QmTest".to_string(),
            sequence: 7,
            source_chain_id: 15,
            payload: vec![0x01, 0x00, 0x0F],
        });

        let json: serde_json::Value = serde_json::from_str(&event.to_event_json()).unwrap();
        assert_eq!(json["standard"], "ika_tensei");
        assert_eq!(json["version"], "1.0.0");
        assert_eq!(json["event"], "seal_initiated");
        assert_eq!(json["data"][0]["nft_contract"], hex::encode([1u8; 32]));
        assert_eq!(json["data"][0]["sequence"], 7);
        assert_eq!(json["data"][0]["payload"], "01000f");
    }

    #[test]
    fn test_token_uri_unavailable_envelope() {
        let event = Event::TokenUriUnavailable(TokenUriUnavailable {
            nft_contract: [1; 32],
            token_id: [2; 32],
        });

        let json: serde_json::Value = serde_json::from_str(&event.to_event_json()).unwrap();
        assert_eq!(json["event"], "token_uri_unavailable");
        assert_eq!(json["data"][0]["token_id"], hex::encode([2u8; 32]));
    }

    #[test]
    fn test_vec_sink_keeps_order() {
        let mut sink = VecSink::default();
        sink.emit(Event::TokenUriUnavailable(TokenUriUnavailable {
            nft_contract: [0; 32],
            token_id: [0; 32],
        }));
        sink.emit(Event::TokenUriUnavailable(TokenUriUnavailable {
            nft_contract: [1; 32],
            token_id: [1; 32],
        }));
        assert_eq!(sink.events().len(), 2);
    }
}
