//! Event handler registry
//!
//! `EventHandlers` is the caller-owned set of callbacks for one bot. Each
//! registered category contributes its intent bits; the accumulated intents are
//! declared by every subsequent Identify.

use std::fmt;
use std::sync::Arc;

use botgate_core::{
    AudioAction, Channel, EventType, Guild, Intents, Member, Message, MessageAudit,
    MessageReaction,
};
use parking_lot::RwLock;

use crate::connection::GatewayError;
use crate::protocol::{ReadyData, WsPayload};

/// Typed event callback
pub type Callback<T> = Arc<dyn Fn(&WsPayload, &T) -> anyhow::Result<()> + Send + Sync>;

/// Callback for connection errors reported by the transport
pub type ErrorNotifyHandler = Arc<dyn Fn(&GatewayError) + Send + Sync>;

/// Catch-all callback receiving the raw frame of events without a typed category
pub type PlainEventHandler = Arc<dyn Fn(&WsPayload, &[u8]) -> anyhow::Result<()> + Send + Sync>;

/// One registrable callback
///
/// Every variant fills exactly one slot of [`EventHandlers`].
#[derive(Clone)]
pub enum EventHandler {
    Ready(Callback<ReadyData>),
    ErrorNotify(ErrorNotifyHandler),
    Plain(PlainEventHandler),
    Guild(Callback<Guild>),
    GuildMember(Callback<Member>),
    Channel(Callback<Channel>),
    Message(Callback<Message>),
    MessageReaction(Callback<MessageReaction>),
    AtMessage(Callback<Message>),
    DirectMessage(Callback<Message>),
    Audio(Callback<AudioAction>),
    MessageAudit(Callback<MessageAudit>),
}

impl EventHandler {
    pub fn ready<F>(f: F) -> Self
    where
        F: Fn(&WsPayload, &ReadyData) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::Ready(Arc::new(f))
    }

    pub fn error_notify<F>(f: F) -> Self
    where
        F: Fn(&GatewayError) + Send + Sync + 'static,
    {
        Self::ErrorNotify(Arc::new(f))
    }

    pub fn plain<F>(f: F) -> Self
    where
        F: Fn(&WsPayload, &[u8]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::Plain(Arc::new(f))
    }

    pub fn guild<F>(f: F) -> Self
    where
        F: Fn(&WsPayload, &Guild) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::Guild(Arc::new(f))
    }

    pub fn guild_member<F>(f: F) -> Self
    where
        F: Fn(&WsPayload, &Member) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::GuildMember(Arc::new(f))
    }

    pub fn channel<F>(f: F) -> Self
    where
        F: Fn(&WsPayload, &Channel) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::Channel(Arc::new(f))
    }

    pub fn message<F>(f: F) -> Self
    where
        F: Fn(&WsPayload, &Message) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::Message(Arc::new(f))
    }

    pub fn message_reaction<F>(f: F) -> Self
    where
        F: Fn(&WsPayload, &MessageReaction) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::MessageReaction(Arc::new(f))
    }

    pub fn at_message<F>(f: F) -> Self
    where
        F: Fn(&WsPayload, &Message) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::AtMessage(Arc::new(f))
    }

    pub fn direct_message<F>(f: F) -> Self
    where
        F: Fn(&WsPayload, &Message) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::DirectMessage(Arc::new(f))
    }

    pub fn audio<F>(f: F) -> Self
    where
        F: Fn(&WsPayload, &AudioAction) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::Audio(Arc::new(f))
    }

    pub fn message_audit<F>(f: F) -> Self
    where
        F: Fn(&WsPayload, &MessageAudit) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::MessageAudit(Arc::new(f))
    }

    /// Event types delivered to this callback
    ///
    /// Empty for the ready, error and catch-all callbacks, which own no intent.
    pub fn event_types(&self) -> &'static [EventType] {
        match self {
            Self::Ready(_) | Self::ErrorNotify(_) | Self::Plain(_) => &[],
            Self::Guild(_) => &[
                EventType::GuildCreate,
                EventType::GuildUpdate,
                EventType::GuildDelete,
            ],
            Self::GuildMember(_) => &[
                EventType::GuildMemberAdd,
                EventType::GuildMemberUpdate,
                EventType::GuildMemberRemove,
            ],
            Self::Channel(_) => &[
                EventType::ChannelCreate,
                EventType::ChannelUpdate,
                EventType::ChannelDelete,
            ],
            Self::Message(_) => &[EventType::MessageCreate],
            Self::MessageReaction(_) => &[
                EventType::MessageReactionAdd,
                EventType::MessageReactionRemove,
            ],
            Self::AtMessage(_) => &[EventType::AtMessageCreate],
            Self::DirectMessage(_) => &[EventType::DirectMessageCreate],
            Self::Audio(_) => &[
                EventType::AudioStart,
                EventType::AudioFinish,
                EventType::AudioOnMic,
                EventType::AudioOffMic,
            ],
            Self::MessageAudit(_) => &[EventType::MessageAuditPass, EventType::MessageAuditReject],
        }
    }

    /// Intent bits owned by this callback's category
    pub fn intents(&self) -> Intents {
        Intents::for_events(self.event_types().iter().copied())
    }

    /// Name of the slot this callback fills
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ready(_) => "ready",
            Self::ErrorNotify(_) => "error_notify",
            Self::Plain(_) => "plain",
            Self::Guild(_) => "guild",
            Self::GuildMember(_) => "guild_member",
            Self::Channel(_) => "channel",
            Self::Message(_) => "message",
            Self::MessageReaction(_) => "message_reaction",
            Self::AtMessage(_) => "at_message",
            Self::DirectMessage(_) => "direct_message",
            Self::Audio(_) => "audio",
            Self::MessageAudit(_) => "message_audit",
        }
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler::{}", self.name())
    }
}

/// Registered callbacks, one optional slot per category
#[derive(Default)]
pub(crate) struct Slots {
    pub(crate) ready: Option<Callback<ReadyData>>,
    pub(crate) error_notify: Option<ErrorNotifyHandler>,
    pub(crate) plain: Option<PlainEventHandler>,
    pub(crate) guild: Option<Callback<Guild>>,
    pub(crate) guild_member: Option<Callback<Member>>,
    pub(crate) channel: Option<Callback<Channel>>,
    pub(crate) message: Option<Callback<Message>>,
    pub(crate) message_reaction: Option<Callback<MessageReaction>>,
    pub(crate) at_message: Option<Callback<Message>>,
    pub(crate) direct_message: Option<Callback<Message>>,
    pub(crate) audio: Option<Callback<AudioAction>>,
    pub(crate) message_audit: Option<Callback<MessageAudit>>,
    intents: Intents,
}

impl Slots {
    fn fill(&mut self, handler: EventHandler) {
        self.intents |= handler.intents();
        match handler {
            EventHandler::Ready(h) => self.ready = Some(h),
            EventHandler::ErrorNotify(h) => self.error_notify = Some(h),
            EventHandler::Plain(h) => self.plain = Some(h),
            EventHandler::Guild(h) => self.guild = Some(h),
            EventHandler::GuildMember(h) => self.guild_member = Some(h),
            EventHandler::Channel(h) => self.channel = Some(h),
            EventHandler::Message(h) => self.message = Some(h),
            EventHandler::MessageReaction(h) => self.message_reaction = Some(h),
            EventHandler::AtMessage(h) => self.at_message = Some(h),
            EventHandler::DirectMessage(h) => self.direct_message = Some(h),
            EventHandler::Audio(h) => self.audio = Some(h),
            EventHandler::MessageAudit(h) => self.message_audit = Some(h),
        }
    }
}

/// Caller-owned handler registry shared by the dispatch table and every shard
///
/// Register everything before starting the manager. Later registrations are
/// seen by future handshakes and future dispatches only.
#[derive(Default)]
pub struct EventHandlers {
    slots: RwLock<Slots>,
}

impl EventHandlers {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register callbacks and return the accumulated intents
    ///
    /// Registering the same category twice keeps the last callback.
    pub fn register<I>(&self, handlers: I) -> Intents
    where
        I: IntoIterator<Item = EventHandler>,
    {
        let mut slots = self.slots.write();
        for handler in handlers {
            tracing::debug!(slot = handler.name(), "Registering event handler");
            slots.fill(handler);
        }
        slots.intents
    }

    /// Register one callback, builder style
    #[must_use]
    pub fn with(self, handler: EventHandler) -> Self {
        self.register([handler]);
        self
    }

    /// Union of the intents of every registered category
    pub fn intents(&self) -> Intents {
        self.slots.read().intents
    }

    /// Report a connection error to the error callback, if any
    pub fn notify_error(&self, err: &GatewayError) {
        let callback = self.slots.read().error_notify.clone();
        if let Some(callback) = callback {
            callback(err);
        }
    }

    /// Copy one slot out so the lock is not held while the callback runs
    pub(crate) fn slot<T>(&self, pick: impl FnOnce(&Slots) -> Option<T>) -> Option<T> {
        pick(&self.slots.read())
    }
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlers")
            .field("intents", &self.intents())
            .finish_non_exhaustive()
    }
}
