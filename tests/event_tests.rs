// Wire-format tests for the telephony media-stream protocol.

use base64::Engine;
use dialbridge::telephony::{OutboundMessage, TelephonyEvent};

#[test]
fn test_connected_event() {
    let json = r#"{"event":"connected","protocol":"Call","version":"1.0.0"}"#;
    let event: TelephonyEvent = serde_json::from_str(json).unwrap();
    assert!(matches!(event, TelephonyEvent::Connected));
}

#[test]
fn test_start_event() {
    let json = r#"{
        "event": "start",
        "sequenceNumber": "1",
        "start": {
            "accountSid": "AC000",
            "callSid": "CA123",
            "streamSid": "MZ456",
            "tracks": ["inbound"],
            "mediaFormat": {"encoding": "audio/x-mulaw", "sampleRate": 8000, "channels": 1}
        },
        "streamSid": "MZ456"
    }"#;

    let event: TelephonyEvent = serde_json::from_str(json).unwrap();
    match event {
        TelephonyEvent::Start { start, stream_sid } => {
            assert_eq!(start.call_sid, "CA123");
            assert_eq!(start.stream_sid, "MZ456");
            assert_eq!(stream_sid, "MZ456");
        }
        other => panic!("expected start, got {}", other.kind()),
    }
}

#[test]
fn test_start_event_missing_call_sid() {
    // A start without callSid still parses; the handshake rejects it.
    let json = r#"{"event":"start","start":{"streamSid":"MZ456"},"streamSid":"MZ456"}"#;
    let event: TelephonyEvent = serde_json::from_str(json).unwrap();
    match event {
        TelephonyEvent::Start { start, .. } => {
            assert!(start.call_sid.is_empty());
            assert_eq!(start.stream_sid, "MZ456");
        }
        other => panic!("expected start, got {}", other.kind()),
    }
}

#[test]
fn test_media_event() {
    let payload = base64::engine::general_purpose::STANDARD.encode([0xFFu8; 160]);
    let json = format!(
        r#"{{"event":"media","media":{{"track":"inbound","chunk":"2","timestamp":"20","payload":"{}"}},"streamSid":"MZ456"}}"#,
        payload
    );

    let event: TelephonyEvent = serde_json::from_str(&json).unwrap();
    match event {
        TelephonyEvent::Media { media } => assert_eq!(media.payload, payload),
        other => panic!("expected media, got {}", other.kind()),
    }
}

#[test]
fn test_dtmf_event() {
    let json = r#"{"event":"dtmf","dtmf":{"track":"inbound_track","digit":"5"},"streamSid":"MZ456"}"#;
    let event: TelephonyEvent = serde_json::from_str(json).unwrap();
    match event {
        TelephonyEvent::Dtmf { dtmf } => assert_eq!(dtmf.digit, "5"),
        other => panic!("expected dtmf, got {}", other.kind()),
    }
}

#[test]
fn test_stop_and_mark_events() {
    let stop: TelephonyEvent =
        serde_json::from_str(r#"{"event":"stop","stop":{"callSid":"CA123"},"streamSid":"MZ456"}"#)
            .unwrap();
    assert!(matches!(stop, TelephonyEvent::Stop));

    let mark: TelephonyEvent =
        serde_json::from_str(r#"{"event":"mark","mark":{"name":"m1"},"streamSid":"MZ456"}"#)
            .unwrap();
    assert!(matches!(mark, TelephonyEvent::Mark));
}

#[test]
fn test_unknown_event_kind() {
    let json = r#"{"event":"somethingelse","data":{}}"#;
    let event: TelephonyEvent = serde_json::from_str(json).unwrap();
    assert!(matches!(event, TelephonyEvent::Other));
}

#[test]
fn test_outbound_media_serialization() {
    let msg = OutboundMessage::media("MZ456", &[0u8; 320]);
    let json = serde_json::to_value(&msg).unwrap();

    assert_eq!(json["event"], "media");
    assert_eq!(json["streamSid"], "MZ456");
    assert_eq!(json["media"]["rate"], 8000);
    assert_eq!(json["media"]["track"], "outbound");

    let payload = json["media"]["payload"].as_str().unwrap();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .unwrap();
    assert_eq!(decoded.len(), 320);
}

#[test]
fn test_outbound_mark_serialization() {
    let msg = OutboundMessage::mark("MZ456", "timeout-announcement");
    let json = serde_json::to_value(&msg).unwrap();

    assert_eq!(json["event"], "mark");
    assert_eq!(json["streamSid"], "MZ456");
    assert_eq!(json["mark"]["name"], "timeout-announcement");
}
