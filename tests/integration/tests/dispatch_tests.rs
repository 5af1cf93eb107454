//! Handler registration and dispatch through the public API
//!
//! Run with: cargo test -p integration-tests --test dispatch_tests

use std::sync::Arc;

use botgate_core::Intents;
use botgate_gateway::protocol::WsPayload;
use botgate_gateway::{dispatch, DispatchError, EventHandler, EventHandlers};
use parking_lot::Mutex;
use serde_json::json;

type Log = Arc<Mutex<Vec<String>>>;

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

// ============================================================================
// Intents
// ============================================================================

#[test]
fn test_register_returns_union_of_categories() {
    let handlers = EventHandlers::new();
    let intents = handlers.register([
        EventHandler::guild(|_, _| Ok(())),
        EventHandler::guild_member(|_, _| Ok(())),
        EventHandler::message_reaction(|_, _| Ok(())),
        EventHandler::at_message(|_, _| Ok(())),
    ]);

    assert_eq!(
        intents,
        Intents::GUILDS
            | Intents::GUILD_MEMBERS
            | Intents::GUILD_MESSAGE_REACTIONS
            | Intents::GUILD_AT_MESSAGE
    );
    assert_eq!(handlers.intents(), intents);
}

#[test]
fn test_guild_and_channel_share_one_bit() {
    let intents = EventHandlers::new().register([
        EventHandler::guild(|_, _| Ok(())),
        EventHandler::channel(|_, _| Ok(())),
    ]);
    assert_eq!(intents, Intents::GUILDS);
}

#[test]
fn test_handlers_without_intents_contribute_nothing() {
    let intents = EventHandlers::new().register([
        EventHandler::ready(|_, _| Ok(())),
        EventHandler::error_notify(|_| {}),
        EventHandler::plain(|_, _| Ok(())),
    ]);
    assert!(intents.is_empty());
}

#[test]
fn test_every_category_bit() {
    let intents = EventHandlers::new().register([
        EventHandler::message(|_, _| Ok(())),
        EventHandler::direct_message(|_, _| Ok(())),
        EventHandler::audio(|_, _| Ok(())),
        EventHandler::message_audit(|_, _| Ok(())),
    ]);
    assert_eq!(
        intents,
        Intents::GUILD_MESSAGES | Intents::DIRECT_MESSAGE | Intents::AUDIO | Intents::AUDIT
    );
}

#[test]
fn test_registrations_accumulate() {
    let handlers = EventHandlers::new();
    handlers.register([EventHandler::audio(|_, _| Ok(()))]);
    let intents = handlers.register([EventHandler::direct_message(|_, _| Ok(()))]);
    assert_eq!(intents, Intents::AUDIO | Intents::DIRECT_MESSAGE);
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_reregistering_keeps_latest_handler() {
    let seen = log();
    let first = Arc::clone(&seen);
    let second = Arc::clone(&seen);

    let handlers = EventHandlers::new();
    handlers.register([
        EventHandler::message(move |_, _| {
            first.lock().push("first".into());
            Ok(())
        }),
        EventHandler::message(move |_, _| {
            second.lock().push("second".into());
            Ok(())
        }),
    ]);

    let frame = WsPayload::dispatch("MESSAGE_CREATE", 3, json!({"id": "m"}));
    dispatch(&handlers, &frame).unwrap();

    assert_eq!(*seen.lock(), vec!["second".to_string()]);
}

#[test]
fn test_member_event_decoded() {
    let seen = log();
    let sink = Arc::clone(&seen);
    let handlers = EventHandlers::new().with(EventHandler::guild_member(move |payload, member| {
        sink.lock().push(format!(
            "{}:{}",
            payload.t.as_deref().unwrap_or_default(),
            member.display_name()
        ));
        Ok(())
    }));

    let frame = WsPayload::dispatch(
        "GUILD_MEMBER_ADD",
        5,
        json!({
            "guild_id": "g",
            "nick": "ana",
            "user": {"id": "u1", "username": "ana_bot"},
            "roles": ["1"]
        }),
    );
    dispatch(&handlers, &frame).unwrap();

    assert_eq!(*seen.lock(), vec!["GUILD_MEMBER_ADD:ana".to_string()]);
}

#[test]
fn test_reaction_event_decoded() {
    let seen = log();
    let sink = Arc::clone(&seen);
    let handlers = EventHandlers::new().with(EventHandler::message_reaction(move |_, reaction| {
        sink.lock().push(reaction.target.id.clone());
        Ok(())
    }));

    let frame = WsPayload::dispatch(
        "MESSAGE_REACTION_REMOVE",
        8,
        json!({
            "user_id": "u",
            "channel_id": "c",
            "guild_id": "g",
            "target": {"id": "msg-1", "type": 0},
            "emoji": {"id": "4", "type": 1}
        }),
    );
    dispatch(&handlers, &frame).unwrap();

    assert_eq!(*seen.lock(), vec!["msg-1".to_string()]);
}

#[test]
fn test_unmapped_frame_goes_to_plain() {
    let seen = log();
    let sink = Arc::clone(&seen);
    let handlers = EventHandlers::new().with(EventHandler::plain(move |payload, raw| {
        sink.lock().push(format!("{:?}:{}", payload.t, raw.len()));
        Ok(())
    }));

    let raw = br#"{"op":0,"s":1,"t":"INTERACTION_CREATE","d":{}}"#;
    dispatch(&handlers, &WsPayload::from_bytes(raw).unwrap()).unwrap();

    assert_eq!(
        *seen.lock(),
        vec![format!("{:?}:{}", Some("INTERACTION_CREATE"), raw.len())]
    );
}

#[test]
fn test_unmapped_frame_without_plain_is_noop() {
    let handlers = EventHandlers::new().with(EventHandler::guild(|_, _| {
        panic!("guild handler must not run")
    }));
    let frame = WsPayload::dispatch("INTERACTION_CREATE", 1, json!({}));
    assert!(dispatch(&handlers, &frame).is_ok());
}

#[test]
fn test_malformed_payload_skips_handler() {
    let handlers = EventHandlers::new().with(EventHandler::channel(|_, _| {
        panic!("channel handler must not run")
    }));
    let frame = WsPayload::dispatch("CHANNEL_UPDATE", 1, json!({"id": ["not", "a", "string"]}));

    let err = dispatch(&handlers, &frame).unwrap_err();
    assert!(matches!(err, DispatchError::Decode { .. }));
    assert_eq!(err.event_type(), "CHANNEL_UPDATE");
}

#[test]
fn test_handler_error_surfaces() {
    let handlers = EventHandlers::new().with(EventHandler::direct_message(|_, _| {
        Err(anyhow::anyhow!("downstream unavailable"))
    }));
    let frame = WsPayload::dispatch("DIRECT_MESSAGE_CREATE", 1, json!({"id": "dm"}));

    let err = dispatch(&handlers, &frame).unwrap_err();
    assert!(matches!(err, DispatchError::Handler { .. }));
    assert!(err.to_string().contains("DIRECT_MESSAGE_CREATE"));
}
