//! Event dispatch table
//!
//! Maps `(op, event type)` to a function that decodes the frame's `d`
//! sub-document into the category structure and calls the registered callback.
//! Frames without an entry go to the catch-all callback.

use std::collections::HashMap;
use std::sync::LazyLock;

use botgate_core::{
    AudioAction, Channel, EventType, Guild, Member, Message, MessageAudit, MessageReaction,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::error::DispatchError;
use super::handlers::{Callback, EventHandlers, Slots};
use crate::protocol::{OpCode, ReadyData, WsPayload};

type ParseFn = fn(&EventHandlers, &WsPayload) -> Result<(), DispatchError>;

static DISPATCH_TABLE: LazyLock<HashMap<(OpCode, EventType), ParseFn>> = LazyLock::new(|| {
    let entries: [(EventType, ParseFn); 22] = [
        (EventType::Ready, |h, p| decode_and_invoke(h, p, ready)),
        (EventType::GuildCreate, |h, p| decode_and_invoke(h, p, guild)),
        (EventType::GuildUpdate, |h, p| decode_and_invoke(h, p, guild)),
        (EventType::GuildDelete, |h, p| decode_and_invoke(h, p, guild)),
        (EventType::ChannelCreate, |h, p| decode_and_invoke(h, p, channel)),
        (EventType::ChannelUpdate, |h, p| decode_and_invoke(h, p, channel)),
        (EventType::ChannelDelete, |h, p| decode_and_invoke(h, p, channel)),
        (EventType::GuildMemberAdd, |h, p| decode_and_invoke(h, p, member)),
        (EventType::GuildMemberUpdate, |h, p| decode_and_invoke(h, p, member)),
        (EventType::GuildMemberRemove, |h, p| decode_and_invoke(h, p, member)),
        (EventType::MessageCreate, |h, p| decode_and_invoke(h, p, message)),
        (EventType::AtMessageCreate, |h, p| decode_and_invoke(h, p, at_message)),
        (EventType::DirectMessageCreate, |h, p| decode_and_invoke(h, p, direct_message)),
        (EventType::MessageReactionAdd, |h, p| decode_and_invoke(h, p, reaction)),
        (EventType::MessageReactionRemove, |h, p| decode_and_invoke(h, p, reaction)),
        (EventType::AudioStart, |h, p| decode_and_invoke(h, p, audio)),
        (EventType::AudioFinish, |h, p| decode_and_invoke(h, p, audio)),
        (EventType::AudioOnMic, |h, p| decode_and_invoke(h, p, audio)),
        (EventType::AudioOffMic, |h, p| decode_and_invoke(h, p, audio)),
        (EventType::MessageAuditPass, |h, p| decode_and_invoke(h, p, audit)),
        (EventType::MessageAuditReject, |h, p| decode_and_invoke(h, p, audit)),
        // RESUMED has no payload worth decoding; it goes through like an unmapped frame
        (EventType::Resumed, plain),
    ];

    entries
        .into_iter()
        .map(|(event, parse)| ((OpCode::Dispatch, event), parse))
        .collect()
});

fn ready(s: &Slots) -> Option<Callback<ReadyData>> {
    s.ready.clone()
}

fn guild(s: &Slots) -> Option<Callback<Guild>> {
    s.guild.clone()
}

fn channel(s: &Slots) -> Option<Callback<Channel>> {
    s.channel.clone()
}

fn member(s: &Slots) -> Option<Callback<Member>> {
    s.guild_member.clone()
}

fn message(s: &Slots) -> Option<Callback<Message>> {
    s.message.clone()
}

fn at_message(s: &Slots) -> Option<Callback<Message>> {
    s.at_message.clone()
}

fn direct_message(s: &Slots) -> Option<Callback<Message>> {
    s.direct_message.clone()
}

fn reaction(s: &Slots) -> Option<Callback<MessageReaction>> {
    s.message_reaction.clone()
}

fn audio(s: &Slots) -> Option<Callback<AudioAction>> {
    s.audio.clone()
}

fn audit(s: &Slots) -> Option<Callback<MessageAudit>> {
    s.message_audit.clone()
}

/// Deliver one received frame to its callback
///
/// Mapped frames are decoded first; a decode failure is returned without
/// calling anything. A mapped frame without a registered callback is dropped.
/// Unmapped frames go to the catch-all callback, or are dropped if there is none.
pub fn dispatch(handlers: &EventHandlers, payload: &WsPayload) -> Result<(), DispatchError> {
    let entry = payload.event_type().and_then(|event| {
        DISPATCH_TABLE
            .get(&(payload.op, event))
            .map(|parse| (event, parse))
    });

    let Some((event, parse)) = entry else {
        return plain(handlers, payload);
    };

    let intents = handlers.intents();
    if !intents.allows(event) {
        tracing::debug!(
            event_type = %event,
            intents = %intents,
            "Event received outside subscribed intents"
        );
    }
    parse(handlers, payload)
}

fn plain(handlers: &EventHandlers, payload: &WsPayload) -> Result<(), DispatchError> {
    let Some(callback) = handlers.slot(|s| s.plain.clone()) else {
        tracing::trace!(op = %payload.op, event_type = ?payload.t, "No handler for frame");
        return Ok(());
    };

    callback(payload, &payload.raw_message).map_err(|source| DispatchError::Handler {
        event_type: event_name(payload),
        source,
    })
}

fn decode_and_invoke<T>(
    handlers: &EventHandlers,
    payload: &WsPayload,
    pick: fn(&Slots) -> Option<Callback<T>>,
) -> Result<(), DispatchError>
where
    T: DeserializeOwned,
{
    let data: T = parse_data(payload).map_err(|source| DispatchError::Decode {
        event_type: event_name(payload),
        source,
    })?;

    let Some(callback) = handlers.slot(pick) else {
        return Ok(());
    };

    callback(payload, &data).map_err(|source| DispatchError::Handler {
        event_type: event_name(payload),
        source,
    })
}

/// Envelope view that only looks at `d`
#[derive(Deserialize)]
struct DataEnvelope {
    #[serde(default)]
    d: Value,
}

/// Extract `d` from the frame, then decode it into the target structure
fn parse_data<T: DeserializeOwned>(payload: &WsPayload) -> Result<T, serde_json::Error> {
    let envelope = if payload.raw_message.is_empty() {
        DataEnvelope {
            d: payload.d.clone().unwrap_or_default(),
        }
    } else {
        serde_json::from_slice::<DataEnvelope>(&payload.raw_message)?
    };
    serde_json::from_value(envelope.d)
}

fn event_name(payload: &WsPayload) -> String {
    payload.t.clone().unwrap_or_else(|| payload.op.name().to_string())
}
