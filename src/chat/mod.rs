//! Simulated conversation with a freight driver.
//!
//! Every outbound message starts its own reply chain on the tokio runtime:
//! the driver starts typing, answers with one of a few canned lines, and
//! reads the answer a little later. Chains may overlap. The session keeps
//! the abort handle of every chain so closing it (or dropping it) stops all
//! pending updates.

mod dice;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::{sleep, sleep_until, Instant};

use crate::models::{DeliveryStatus, Message, Sender};

pub use dice::{Dice, OsDice};

/// Canned answers; one is picked uniformly per reply.
pub const REPLIES: [&str; 5] = [
    "Entendi! Vou verificar minha agenda e te retorno em instantes.",
    "Perfeito! Posso fazer esse transporte. Vamos acertar os detalhes?",
    "Ótimo! Tenho disponibilidade para esse horário. Qual o valor do frete que você está pensando?",
    "Recebi sua mensagem! Posso ajudar sim. Vou preparar uma proposta para você.",
    "Tudo certo! Vou passar no local antes para avaliar melhor o volume da carga.",
];

/// Delays of one reply chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTiming {
    /// From send until the driver starts typing
    pub typing_delay: Duration,
    /// Shortest time from send until the reply arrives
    pub reply_min: Duration,
    /// Upper bound (exclusive) of the random extra reply delay
    pub reply_jitter: Duration,
    /// From reply until it is marked read
    pub read_delay: Duration,
}

impl Default for ChatTiming {
    fn default() -> Self {
        Self {
            typing_delay: Duration::from_millis(500),
            reply_min: Duration::from_millis(2000),
            reply_jitter: Duration::from_millis(2000),
            read_delay: Duration::from_millis(2000),
        }
    }
}

/// Changes pushed to whoever renders the conversation
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    MessageAdded(Message),
    StatusChanged { id: String, status: DeliveryStatus },
    /// The typing indicator turned on or off
    Typing(bool),
}

#[derive(Debug)]
struct State {
    messages: Vec<Message>,
    /// Chains currently between "typing" and "reply"
    typing: usize,
    closed: bool,
}

type Shared = Arc<Mutex<State>>;

fn lock(state: &Shared) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Conversation opened from a driver's listing
pub struct ChatSession {
    recipient: String,
    state: Shared,
    tasks: Vec<AbortHandle>,
    events: mpsc::UnboundedSender<ChatEvent>,
    timing: ChatTiming,
    dice: Arc<dyn Dice>,
}

impl ChatSession {
    /// Open a conversation seeded with the usual opening exchange.
    ///
    /// The receiver yields every change made after opening; the seed
    /// transcript is only available through [`ChatSession::messages`].
    pub fn open(
        recipient: impl Into<String>,
        timing: ChatTiming,
        dice: Arc<dyn Dice>,
    ) -> (Self, mpsc::UnboundedReceiver<ChatEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let recipient = recipient.into();
        tracing::debug!("Opening chat with {}", recipient);

        let session = Self {
            recipient,
            state: Arc::new(Mutex::new(State {
                messages: seed_transcript(),
                typing: 0,
                closed: false,
            })),
            tasks: Vec::new(),
            events,
            timing,
            dice,
        };
        (session, rx)
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn messages(&self) -> Vec<Message> {
        lock(&self.state).messages.clone()
    }

    pub fn is_typing(&self) -> bool {
        lock(&self.state).typing > 0
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }

    /// Append a message from the local user and schedule the driver's reply.
    ///
    /// Blank text is ignored. Returns the id of the new message. Must be
    /// called from within a tokio runtime.
    pub fn send(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let message = Message::text(
            uuid::Uuid::new_v4().to_string(),
            text,
            Sender::Me,
            DeliveryStatus::Sent,
        );
        let id = message.id.clone();
        {
            let mut state = lock(&self.state);
            if state.closed {
                tracing::debug!("Ignoring message on closed chat");
                return None;
            }
            state.messages.push(message.clone());
        }
        let _ = self.events.send(ChatEvent::MessageAdded(message));

        let jitter = jitter(self.dice.as_ref(), self.timing.reply_jitter);
        let pick = self.dice.below(REPLIES.len() as u64) as usize;
        let reply = REPLIES[pick.min(REPLIES.len() - 1)];
        tracing::debug!(
            "Scheduling reply in {}ms",
            (self.timing.reply_min + jitter).as_millis()
        );

        let chain = reply_chain(
            Arc::clone(&self.state),
            self.events.clone(),
            self.timing,
            self.timing.reply_min + jitter,
            reply,
        );
        self.tasks.retain(|h| !h.is_finished());
        self.tasks.push(tokio::spawn(chain).abort_handle());

        Some(id)
    }

    /// Stop every pending reply chain. The transcript stays as it is.
    pub fn close(&mut self) {
        for handle in self.tasks.drain(..) {
            handle.abort();
        }

        let mut state = lock(&self.state);
        if !state.closed {
            tracing::debug!("Closed chat with {}", self.recipient);
        }
        state.closed = true;
        state.typing = 0;
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.close();
    }
}

fn jitter(dice: &dyn Dice, max: Duration) -> Duration {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(dice.below(max_ms).min(max_ms - 1))
}

async fn reply_chain(
    state: Shared,
    events: mpsc::UnboundedSender<ChatEvent>,
    timing: ChatTiming,
    reply_after: Duration,
    text: &'static str,
) {
    let reply_at = Instant::now() + reply_after;

    sleep(timing.typing_delay).await;
    {
        let mut s = lock(&state);
        if s.closed {
            return;
        }
        s.typing += 1;
        if s.typing == 1 {
            let _ = events.send(ChatEvent::Typing(true));
        }
    }

    sleep_until(reply_at).await;
    let reply = Message::text(
        uuid::Uuid::new_v4().to_string(),
        text,
        Sender::Them,
        DeliveryStatus::Delivered,
    );
    let id = reply.id.clone();
    {
        let mut s = lock(&state);
        if s.closed {
            return;
        }
        s.typing = s.typing.saturating_sub(1);
        if s.typing == 0 {
            let _ = events.send(ChatEvent::Typing(false));
        }
        s.messages.push(reply.clone());
    }
    let _ = events.send(ChatEvent::MessageAdded(reply));

    sleep(timing.read_delay).await;
    let mut s = lock(&state);
    if s.closed {
        return;
    }
    if let Some(msg) = s.messages.iter_mut().find(|m| m.id == id) {
        if msg.advance(DeliveryStatus::Read) {
            let _ = events.send(ChatEvent::StatusChanged {
                id,
                status: DeliveryStatus::Read,
            });
        }
    }
}

fn seed_transcript() -> Vec<Message> {
    let now = Utc::now();
    let seed = [
        (
            "1",
            "Olá! Vi que você tem interesse no frete. Podemos conversar sobre os detalhes?",
            Sender::Them,
            5,
        ),
        (
            "2",
            "Oi! Sim, claro. Preciso transportar alguns móveis amanhã pela manhã.",
            Sender::Me,
            4,
        ),
        (
            "3",
            "Perfeito! Qual o endereço de origem e destino? Posso dar uma cotação mais precisa.",
            Sender::Them,
            3,
        ),
    ];

    seed.into_iter()
        .map(|(id, text, sender, minutes_ago)| {
            let mut msg = Message::text(id, text, sender, DeliveryStatus::Read);
            msg.timestamp = now - chrono::Duration::minutes(minutes_ago);
            msg
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always rolls the same value, clamped to the bound
    struct FixedDice(u64);

    impl Dice for FixedDice {
        fn below(&self, bound: u64) -> u64 {
            self.0.min(bound.saturating_sub(1))
        }
    }

    /// Ignores the bound altogether
    struct UnboundedDice;

    impl Dice for UnboundedDice {
        fn below(&self, _bound: u64) -> u64 {
            u64::MAX
        }
    }

    /// Slowest possible reply: arrives at 3999ms, read at 5999ms
    fn slow_chat() -> (ChatSession, mpsc::UnboundedReceiver<ChatEvent>) {
        ChatSession::open(
            "Carlos Oliveira",
            ChatTiming::default(),
            Arc::new(FixedDice(u64::MAX)),
        )
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_seed_transcript() {
        let (chat, _rx) = slow_chat();
        let messages = chat.messages();

        assert_eq!(messages.len(), 3);
        assert!(messages.iter().all(|m| m.status == DeliveryStatus::Read));
        assert_eq!(messages[1].sender, Sender::Me);
        assert!(messages[0].timestamp < messages[2].timestamp);
        assert!(!chat.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_message_ignored() {
        let (mut chat, mut rx) = slow_chat();
        assert_eq!(chat.send("   "), None);
        assert_eq!(chat.messages().len(), 3);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_appends_one_sent_message() {
        let (mut chat, _rx) = slow_chat();
        let id = chat.send("  Oi ").unwrap();

        let messages = chat.messages();
        assert_eq!(messages.len(), 4);
        let last = messages.last().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.text, "Oi");
        assert_eq!(last.sender, Sender::Me);
        assert_eq!(last.status, DeliveryStatus::Sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_delivered_then_read() {
        let (mut chat, _rx) = slow_chat();
        chat.send("Oi").unwrap();

        sleep(ms(100)).await;
        assert!(!chat.is_typing());

        sleep(ms(500)).await;
        assert!(chat.is_typing());
        assert_eq!(chat.messages().len(), 4);

        sleep(ms(3400)).await;
        let messages = chat.messages();
        assert_eq!(messages.len(), 5);
        let reply = messages.last().unwrap();
        assert_eq!(reply.sender, Sender::Them);
        assert_eq!(reply.status, DeliveryStatus::Delivered);
        assert!(REPLIES.contains(&reply.text.as_str()));
        assert!(!chat.is_typing());

        sleep(ms(2000)).await;
        let messages = chat.messages();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages.last().unwrap().status, DeliveryStatus::Read);
        // the user's own message is never marked delivered
        assert_eq!(messages[3].status, DeliveryStatus::Sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_random_reply_within_bounds() {
        let (mut chat, _rx) =
            ChatSession::open("Ana Costa", ChatTiming::default(), Arc::new(OsDice));
        chat.send("Oi").unwrap();

        sleep(ms(1999)).await;
        assert_eq!(chat.messages().len(), 4);

        sleep(ms(2001)).await;
        assert_eq!(chat.messages().len(), 5);

        sleep(ms(2000)).await;
        assert_eq!(chat.messages().last().unwrap().status, DeliveryStatus::Read);
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_dice_is_clamped() {
        let (mut chat, _rx) =
            ChatSession::open("Ana Costa", ChatTiming::default(), Arc::new(UnboundedDice));
        chat.send("Oi").unwrap();

        sleep(ms(4000)).await;
        let messages = chat.messages();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages.last().unwrap().text, REPLIES[REPLIES.len() - 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_in_order() {
        let (mut chat, mut rx) = slow_chat();
        let id = chat.send("Oi").unwrap();
        sleep(ms(6000)).await;

        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }

        assert_eq!(events.len(), 5);
        assert!(matches!(&events[0], ChatEvent::MessageAdded(m) if m.id == id));
        assert_eq!(events[1], ChatEvent::Typing(true));
        assert_eq!(events[2], ChatEvent::Typing(false));
        let reply_id = match &events[3] {
            ChatEvent::MessageAdded(m) => m.id.clone(),
            other => panic!("unexpected event {:?}", other),
        };
        assert_eq!(
            events[4],
            ChatEvent::StatusChanged {
                id: reply_id,
                status: DeliveryStatus::Read
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_chains_keep_typing_on() {
        let timing = ChatTiming::default();
        let (mut chat, mut rx) = ChatSession::open("João Silva", timing, Arc::new(FixedDice(0)));

        chat.send("Primeira").unwrap();
        sleep(ms(1000)).await;
        chat.send("Segunda").unwrap();

        // first reply lands at 2000ms while the second chain is still typing
        sleep(ms(1100)).await;
        assert_eq!(chat.messages().len(), 6);
        assert!(chat.is_typing());

        sleep(ms(1000)).await;
        assert_eq!(chat.messages().len(), 7);
        assert!(!chat.is_typing());

        let mut typing = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if let ChatEvent::Typing(on) = ev {
                typing.push(on);
            }
        }
        assert_eq!(typing, vec![true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_freezes_transcript() {
        let (mut chat, _rx) = slow_chat();
        chat.send("Oi").unwrap();
        sleep(ms(1000)).await;
        assert!(chat.is_typing());

        chat.close();
        assert!(chat.is_closed());
        assert!(!chat.is_typing());

        sleep(ms(10_000)).await;
        assert_eq!(chat.messages().len(), 4);
        assert_eq!(chat.send("Alguém?"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_pending_replies() {
        let (mut chat, mut rx) = slow_chat();
        chat.send("Oi").unwrap();
        drop(chat);

        sleep(ms(10_000)).await;
        let mut added = 0;
        while let Ok(ev) = rx.try_recv() {
            if matches!(ev, ChatEvent::MessageAdded(_)) {
                added += 1;
            }
        }
        assert_eq!(added, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reopen_starts_from_seed() {
        let (mut chat, _rx) = slow_chat();
        chat.send("Oi").unwrap();
        sleep(ms(6000)).await;
        assert_eq!(chat.messages().len(), 5);
        drop(chat);

        let (chat, _rx) = slow_chat();
        assert_eq!(chat.messages().len(), 3);
    }
}
