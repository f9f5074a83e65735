//! Chat session store.
//!
//! `ChatStore` is the exclusive owner of all mutable chat state for one
//! client session: the current session descriptor, the session summary list,
//! and the conversation transcript. UI components invoke its actions and
//! observe it through snapshots or the event channel; nothing else mutates
//! this state.
//!
//! The send path is optimistic: the user's pair is appended before the
//! network call resolves, then reconciled with the server's canonical echo on
//! success or removed on failure. Reconciliation is keyed by the pair's
//! locally generated exchange id, so overlapping sends to the same session
//! settle their own placeholders.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use tutor_core::error::{Result, TutorError};
use tutor_core::session::{
    ChatEvent, ChatGateway, ImageAttachment, ImageRef, MessagePair, MessageReply, Session,
    SessionSummary, parse_user_input,
};
use tutor_rag::{RagClient, RagConfig};

use crate::preview::PreviewRegistry;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Snapshot of everything the store owns. Serializable so a UI bridge can
/// ship it across an IPC boundary as-is.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatState {
    /// The currently active session, if any.
    pub current_session: Option<Session>,
    /// Summary list of the student's sessions, refreshed wholesale.
    pub session_history: Vec<SessionSummary>,
    /// Descriptor returned by the most recent detail fetch.
    pub session_detail: Option<Session>,
    /// The active conversation transcript, in chronological order.
    pub conversation: Vec<MessagePair>,
    /// Whether a lifecycle call (create/history/detail/delete) is in flight.
    pub is_loading: bool,
    /// Whether a message send is in flight.
    pub is_sending: bool,
    /// The most recent gateway failure, until cleared.
    pub last_error: Option<TutorError>,
}

/// The chat state machine.
///
/// All methods take `&self`; state lives behind a single `RwLock` and the
/// write lock is held only for state transitions, never across a gateway
/// call, so the UI stays responsive while a send is pending.
pub struct ChatStore {
    gateway: Arc<dyn ChatGateway>,
    state: Arc<RwLock<ChatState>>,
    previews: PreviewRegistry,
    events: broadcast::Sender<ChatEvent>,
}

impl ChatStore {
    /// Creates a store backed by the given gateway.
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            gateway,
            state: Arc::new(RwLock::new(ChatState::default())),
            previews: PreviewRegistry::new(),
            events,
        }
    }

    /// Creates a store backed by a [`RagClient`] built from the given
    /// configuration.
    pub fn connect(config: RagConfig) -> Self {
        Self::new(Arc::new(RagClient::new(config)))
    }

    /// Subscribes to state-change events.
    ///
    /// A lagging or dropped receiver never blocks or fails a store mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    /// The registry of live image preview references.
    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    fn emit(&self, event: ChatEvent) {
        // A send error only means nobody is subscribed right now.
        let _ = self.events.send(event);
    }

    // ============================================================================
    // Session lifecycle
    // ============================================================================

    /// Creates a new session and makes it current.
    ///
    /// On success the current session is replaced with the returned
    /// descriptor and the conversation is cleared. On failure the store is
    /// left unchanged apart from the recorded error, which is also returned
    /// so the caller can surface it.
    ///
    /// The store does not serialize concurrent create calls; the caller is
    /// expected not to double-invoke.
    pub async fn create_session(&self, student_id: &str) -> Result<Session> {
        self.begin_loading().await;

        match self.gateway.create_session(student_id).await {
            Ok(session) => {
                {
                    let mut state = self.state.write().await;
                    state.current_session = Some(session.clone());
                    state.conversation.clear();
                    state.is_loading = false;
                }
                tracing::info!(session_id = %session.id, "session created");
                self.emit(ChatEvent::SessionCreated {
                    session_id: session.id.clone(),
                });
                Ok(session)
            }
            Err(err) => Err(self.record_failure(err).await),
        }
    }

    /// Deletes a session server-side.
    ///
    /// Deliberately touches neither the cached summary list nor the current
    /// session: callers that show a list are expected to refresh or prune it
    /// themselves, and callers deleting the active session must also clear it
    /// (see [`ChatStore::clear_current_session`]).
    pub async fn delete_session(&self, session_id: &str, student_id: &str) -> Result<()> {
        self.begin_loading().await;

        match self.gateway.delete_session(session_id, student_id).await {
            Ok(()) => {
                self.end_loading().await;
                tracing::info!(session_id, "session deleted");
                self.emit(ChatEvent::SessionDeleted {
                    session_id: session_id.to_string(),
                });
                Ok(())
            }
            Err(err) => Err(self.record_failure(err).await),
        }
    }

    /// Fetches the student's session list and replaces the stored list
    /// wholesale. An empty result is valid and clears any previous list.
    pub async fn get_session_history(&self, student_id: &str) -> Result<()> {
        self.begin_loading().await;

        match self.gateway.session_history(student_id).await {
            Ok(sessions) => {
                let count = sessions.len();
                {
                    let mut state = self.state.write().await;
                    state.session_history = sessions;
                    state.is_loading = false;
                }
                self.emit(ChatEvent::HistoryRefreshed { count });
                Ok(())
            }
            Err(err) => {
                let err = {
                    let mut state = self.state.write().await;
                    state.session_history.clear();
                    state.is_loading = false;
                    state.last_error = Some(err.clone());
                    err
                };
                Err(err)
            }
        }
    }

    /// Fetches one session's transcript and replaces the stored conversation
    /// wholesale.
    ///
    /// Every historical user turn is run through the input parser first: the
    /// backend embeds image references inline in the text, and the rest of
    /// the client expects them separated.
    pub async fn get_session_detail(&self, session_id: &str, student_id: &str) -> Result<()> {
        self.begin_loading().await;

        match self.gateway.session_detail(session_id, student_id).await {
            Ok(detail) => {
                let conversation: Vec<MessagePair> = detail
                    .conversation
                    .into_iter()
                    .map(|mut pair| {
                        let parsed = parse_user_input(&pair.user.content);
                        pair.user.content = parsed.content;
                        pair.user.image = parsed.image.map(ImageRef::Url);
                        pair
                    })
                    .collect();
                let pairs = conversation.len();
                {
                    let mut state = self.state.write().await;
                    state.session_detail = Some(detail.session);
                    state.conversation = conversation;
                    state.is_loading = false;
                }
                self.emit(ChatEvent::ConversationReplaced {
                    session_id: session_id.to_string(),
                    pairs,
                });
                Ok(())
            }
            Err(err) => {
                let err = {
                    let mut state = self.state.write().await;
                    state.session_detail = None;
                    state.conversation.clear();
                    state.is_loading = false;
                    state.last_error = Some(err.clone());
                    err
                };
                Err(err)
            }
        }
    }

    // ============================================================================
    // Message send protocol
    // ============================================================================

    /// Sends a message with optimistic rendering.
    ///
    /// The pair is appended immediately with an empty assistant placeholder,
    /// then either settled with the server's canonical echo and reply, or
    /// removed again if the gateway call fails. A validation failure of the
    /// attachment rejects the send before any state is touched.
    ///
    /// # Errors
    ///
    /// - `TutorError::Validation` if the attachment is not an image or
    ///   exceeds the size limit; the store is untouched.
    /// - Any gateway error, after the optimistic pair has been rolled back
    ///   and the error recorded.
    pub async fn send_message(
        &self,
        session_id: &str,
        user_input: &str,
        student_id: &str,
        image: Option<ImageAttachment>,
    ) -> Result<()> {
        if let Some(image) = &image {
            image.validate()?;
        }

        {
            let mut state = self.state.write().await;
            state.is_sending = true;
            state.last_error = None;
        }

        let preview = match &image {
            Some(attachment) => Some(self.previews.register(attachment).await),
            None => None,
        };

        let pair = MessagePair::pending(user_input, preview.clone().map(ImageRef::Preview));
        let exchange_id = pair.exchange_id.clone();
        {
            let mut state = self.state.write().await;
            state.conversation.push(pair);
        }
        self.emit(ChatEvent::PairAppended {
            session_id: session_id.to_string(),
            exchange_id: exchange_id.clone(),
        });

        match self
            .gateway
            .send_message(session_id, user_input, student_id, image.as_ref())
            .await
        {
            Ok(reply) => {
                self.reconcile(session_id, &exchange_id, preview, reply).await;
                Ok(())
            }
            Err(err) => {
                self.rollback(session_id, &exchange_id, preview, err.clone())
                    .await;
                Err(err)
            }
        }
    }

    /// Replaces the optimistic pair with the server's version of the exchange.
    async fn reconcile(
        &self,
        session_id: &str,
        exchange_id: &str,
        preview: Option<String>,
        reply: MessageReply,
    ) {
        let parsed = parse_user_input(&reply.user_input);

        let mut release = None;
        let mut settled = false;
        {
            let mut state = self.state.write().await;
            if let Some(pair) = state
                .conversation
                .iter_mut()
                .find(|pair| pair.exchange_id == exchange_id)
            {
                // The server-confirmed URL supersedes the local preview; when
                // the echo carried no token the preview stays live so the
                // turn never regresses to "no image".
                let image = match (parsed.image, preview) {
                    (Some(url), preview) => {
                        release = preview;
                        Some(ImageRef::Url(url))
                    }
                    (None, Some(reference)) => Some(ImageRef::Preview(reference)),
                    (None, None) => None,
                };
                pair.settle(parsed.content, image, reply.response);
                settled = true;

                if let Some(session) = state.current_session.as_mut()
                    && session.id == session_id
                {
                    session.message_count += 1;
                    session.touch();
                }
            } else {
                // The transcript was replaced while the send was in flight.
                // Nothing to settle, but the preview must not leak.
                release = preview;
            }
            state.is_sending = false;
        }

        if let Some(reference) = release {
            self.previews.release(&reference).await;
        }

        if settled {
            tracing::debug!(session_id, exchange_id, "send reconciled");
            self.emit(ChatEvent::PairSettled {
                session_id: session_id.to_string(),
                exchange_id: exchange_id.to_string(),
            });
        } else {
            tracing::debug!(
                session_id,
                exchange_id,
                "send completed after transcript replacement; reply dropped"
            );
        }
    }

    /// Removes the optimistic pair after a failed send and records the error.
    async fn rollback(
        &self,
        session_id: &str,
        exchange_id: &str,
        preview: Option<String>,
        err: TutorError,
    ) {
        tracing::warn!(session_id, error = %err, "send failed; rolling back");

        let mut removed = false;
        {
            let mut state = self.state.write().await;
            if let Some(index) = state
                .conversation
                .iter()
                .position(|pair| pair.exchange_id == exchange_id)
            {
                state.conversation.remove(index);
                removed = true;
            }
            state.is_sending = false;
            state.last_error = Some(err);
        }

        if let Some(reference) = preview {
            self.previews.release(&reference).await;
        }

        if removed {
            self.emit(ChatEvent::PairRolledBack {
                session_id: session_id.to_string(),
                exchange_id: exchange_id.to_string(),
            });
        }
    }

    // ============================================================================
    // Setters and clears
    // ============================================================================

    /// Replaces the current session descriptor.
    pub async fn set_current_session(&self, session: Option<Session>) {
        let mut state = self.state.write().await;
        state.current_session = session;
    }

    /// Replaces the conversation transcript.
    pub async fn set_conversation(&self, conversation: Vec<MessagePair>) {
        let mut state = self.state.write().await;
        state.conversation = conversation;
    }

    /// Appends one pair to the conversation.
    pub async fn append_pair(&self, pair: MessagePair) {
        let mut state = self.state.write().await;
        state.conversation.push(pair);
    }

    /// Clears the current session, its conversation, and any recorded error.
    pub async fn clear_current_session(&self) {
        let mut state = self.state.write().await;
        state.current_session = None;
        state.conversation.clear();
        state.last_error = None;
    }

    /// Clears the session summary list and any recorded error.
    pub async fn clear_session_history(&self) {
        let mut state = self.state.write().await;
        state.session_history.clear();
        state.last_error = None;
    }

    /// Clears the detail descriptor, the conversation, and any recorded error.
    pub async fn clear_session_detail(&self) {
        let mut state = self.state.write().await;
        state.session_detail = None;
        state.conversation.clear();
        state.last_error = None;
    }

    /// Clears the recorded error.
    pub async fn clear_error(&self) {
        let mut state = self.state.write().await;
        state.last_error = None;
    }

    /// Resets the store to its initial state and releases all outstanding
    /// preview references.
    pub async fn clear_all(&self) {
        {
            let mut state = self.state.write().await;
            *state = ChatState::default();
        }
        self.previews.clear().await;
    }

    // ============================================================================
    // Read access
    // ============================================================================

    /// Returns a full snapshot of the store's state.
    pub async fn snapshot(&self) -> ChatState {
        self.state.read().await.clone()
    }

    /// The currently active session, if any.
    pub async fn current_session(&self) -> Option<Session> {
        self.state.read().await.current_session.clone()
    }

    /// The active conversation transcript.
    pub async fn conversation(&self) -> Vec<MessagePair> {
        self.state.read().await.conversation.clone()
    }

    /// The cached session summary list.
    pub async fn session_history(&self) -> Vec<SessionSummary> {
        self.state.read().await.session_history.clone()
    }

    /// The descriptor from the most recent detail fetch.
    pub async fn session_detail(&self) -> Option<Session> {
        self.state.read().await.session_detail.clone()
    }

    /// The most recent recorded error.
    pub async fn last_error(&self) -> Option<TutorError> {
        self.state.read().await.last_error.clone()
    }

    /// Whether a message send is in flight.
    pub async fn is_sending(&self) -> bool {
        self.state.read().await.is_sending
    }

    /// Whether a lifecycle call is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    // ============================================================================
    // Internal helpers
    // ============================================================================

    async fn begin_loading(&self) {
        let mut state = self.state.write().await;
        state.is_loading = true;
        state.last_error = None;
    }

    async fn end_loading(&self) {
        let mut state = self.state.write().await;
        state.is_loading = false;
    }

    async fn record_failure(&self, err: TutorError) -> TutorError {
        let mut state = self.state.write().await;
        state.is_loading = false;
        state.last_error = Some(err.clone());
        err
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
