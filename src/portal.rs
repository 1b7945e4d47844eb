//! Portal facade.
//!
//! `Portal` is the one object a shell embeds: it owns the session
//! manager, the HTTP client, the triage wizard, the support chat, and
//! the cached server data, and exposes every user-facing operation as
//! an async method. Each method validates locally first, then calls
//! the API, and mutates state only on success, so a failed call leaves
//! everything exactly where it was.
//!
//! Key properties:
//! - One triage flow and one chat transcript per signed-in account
//! - Login and logout both reset per-account state, so accounts never
//!   see each other's data
//! - At most one booking request in flight at a time

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::{self, ApiClient, ApiError};
use crate::chat::SupportChat;
use crate::config::PortalConfig;
use crate::models::{
    AnswerValue, BookingRequest, ChatMessage, ChatReply, Consultation, CredentialsResponse,
    Specialty, TriageHistoryItem, TriageOutcome, User,
};
use crate::patient_state::{self, PatientState};
use crate::session::{RouteContext, SessionError, SessionManager};
use crate::triage::{TriageError, TriageFlow, TriageStep, TriageView};
use crate::validation::{self, ValidationError};

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

/// Umbrella error for every portal operation. Wrapped messages are
/// already user-facing and pass through untouched; the shell renders
/// `Display` directly.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Triage(#[from] TriageError),
    #[error("{0}")]
    Session(#[from] SessionError),
    #[error("A booking request is already in flight")]
    BookingInFlight,
    #[error("No failed message to retry")]
    NothingToRetry,
}

// ═══════════════════════════════════════════════════════════
// Booking latch
// ═══════════════════════════════════════════════════════════

/// Holds the single-booking latch for the duration of one request.
/// Released on drop, so the latch cannot stay stuck when the request
/// errors or the calling future is cancelled mid-flight.
struct BookingGuard<'a> {
    latch: &'a AtomicBool,
}

impl<'a> BookingGuard<'a> {
    fn acquire(latch: &'a AtomicBool) -> Option<Self> {
        latch
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { latch })
    }
}

impl Drop for BookingGuard<'_> {
    fn drop(&mut self) {
        self.latch.store(false, Ordering::Release);
    }
}

// ═══════════════════════════════════════════════════════════
// Portal
// ═══════════════════════════════════════════════════════════

/// Client core of the telehealth portal. Construct once, share freely;
/// every method takes `&self`.
pub struct Portal {
    config: PortalConfig,
    session: Arc<SessionManager>,
    client: ApiClient,
    /// Triage wizard state. A tokio mutex: submit holds it across the
    /// network call so the flow cannot move under an in-flight request.
    flow: Mutex<TriageFlow>,
    /// Support chat transcript, serialized the same way.
    chat: Mutex<SupportChat>,
    /// Last fetched triage history, newest data wins.
    history: RwLock<Vec<TriageHistoryItem>>,
    /// Last fetched consultation list.
    consultations: RwLock<Vec<Consultation>>,
    booking_in_flight: AtomicBool,
}

impl Portal {
    pub fn new(config: PortalConfig) -> Self {
        let session = Arc::new(SessionManager::new(&config.data_dir));
        let client = ApiClient::new(&config, Arc::clone(&session));
        Self {
            config,
            session,
            client,
            flow: Mutex::new(TriageFlow::new()),
            chat: Mutex::new(SupportChat::new()),
            history: RwLock::new(Vec::new()),
            consultations: RwLock::new(Vec::new()),
            booking_in_flight: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    // ── Auth ────────────────────────────────────────────────

    /// Sign in with email and password. The email gets a structural
    /// check before anything goes on the wire; a 401 here carries the
    /// server's own message, since bad credentials are not an expired
    /// session.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, PortalError> {
        validation::validate_email(email)?;
        let credentials = api::auth::login(&self.client, email.trim(), password).await?;
        let session = self.session.establish(credentials)?;
        self.reset_account_state().await;
        Ok(session.user)
    }

    /// Create an account and sign in with the returned credentials.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
        full_name: &str,
    ) -> Result<User, PortalError> {
        validation::validate_email(email)?;
        validation::validate_password_pair(password, confirm_password)?;
        validation::validate_full_name(full_name)?;
        let credentials =
            api::auth::register(&self.client, email.trim(), password, full_name.trim()).await?;
        let session = self.session.establish(credentials)?;
        self.reset_account_state().await;
        Ok(session.user)
    }

    /// Adopt credentials obtained out of band (a token hand-off from
    /// another surface). Same account reset as a regular login.
    pub async fn login_with_credentials(
        &self,
        credentials: CredentialsResponse,
    ) -> Result<User, PortalError> {
        let session = self.session.establish(credentials)?;
        self.reset_account_state().await;
        Ok(session.user)
    }

    /// Change the signed-in user's password. The new pair is checked
    /// client-side first; the old password is only ever verified by
    /// the server.
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), PortalError> {
        self.require_signed_in()?;
        validation::validate_password_pair(new_password, confirm_password)?;
        api::auth::change_password(&self.client, old_password, new_password).await?;
        tracing::info!("Password changed");
        Ok(())
    }

    /// Sign out and drop everything tied to the account.
    pub async fn logout(&self) -> Result<(), PortalError> {
        self.session.clear()?;
        self.reset_account_state().await;
        Ok(())
    }

    /// Startup restore: adopt the persisted session, then revalidate
    /// the token with an identity call.
    ///
    /// Returns `None` when nothing is persisted or the server rejects
    /// the token. An unreachable server keeps the cached identity so
    /// the portal starts offline; the next 401 invalidates it anyway.
    pub async fn restore(&self) -> Result<Option<User>, PortalError> {
        let Some(cached) = self.session.restore_cached() else {
            return Ok(None);
        };
        match api::auth::me(&self.client).await {
            Ok(fresh) => {
                self.session.update_user(fresh.clone())?;
                Ok(Some(fresh))
            }
            Err(ApiError::Unauthorized) => Ok(None),
            Err(e) => {
                tracing::warn!("Could not revalidate restored session: {e}");
                Ok(Some(cached))
            }
        }
    }

    fn require_signed_in(&self) -> Result<(), PortalError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(SessionError::NotAuthenticated.into())
        }
    }

    /// Clear the triage flow, the chat, and the data caches. Runs on
    /// every login and logout.
    async fn reset_account_state(&self) {
        self.flow.lock().await.restart();
        self.chat.lock().await.clear();
        if let Ok(mut history) = self.history.write() {
            history.clear();
        }
        if let Ok(mut consultations) = self.consultations.write() {
            consultations.clear();
        }
    }

    // ── Triage ──────────────────────────────────────────────

    /// Open a triage session from a chief complaint and move the wizard
    /// to its question list. Rejected outside the Start step before any
    /// validation or network traffic happens.
    pub async fn start_triage(&self, chief_complaint: &str) -> Result<TriageFlow, PortalError> {
        let mut flow = self.flow.lock().await;
        flow.require_step(TriageStep::Start, "start a session")?;
        let chief_complaint = validation::validate_chief_complaint(chief_complaint)?;
        let response = api::triage::start(&self.client, &chief_complaint).await?;
        tracing::info!(
            session_id = %response.session_id,
            questions = response.questions.len(),
            "Triage session started"
        );
        flow.begin(chief_complaint, response.session_id, response.questions)?;
        Ok(flow.clone())
    }

    /// Record one answer in the running session. Purely local.
    pub async fn answer_question(&self, key: &str, value: AnswerValue) -> Result<(), PortalError> {
        let mut flow = self.flow.lock().await;
        flow.answer(key, value)?;
        Ok(())
    }

    /// Submit the recorded answers for scoring and move the wizard to
    /// the Result step. Unanswered questions are simply absent from the
    /// payload; whether that is acceptable is the server's call.
    ///
    /// The history cache refreshes before the flow lock is released, so
    /// the History pane already lists the new record when the Result
    /// step renders. The refresh is best effort: the submit has already
    /// succeeded.
    pub async fn submit_triage(&self) -> Result<TriageOutcome, PortalError> {
        let mut flow = self.flow.lock().await;
        flow.require_step(TriageStep::Questions, "submit answers")?;
        let session_id = flow.session_id().ok_or(TriageError::NoActiveSession)?;
        let outcome = api::triage::submit(&self.client, session_id, flow.answers()).await?;
        flow.complete(outcome.clone())?;
        tracing::info!(
            session_id = %session_id,
            risk = outcome.risk_level.as_str(),
            action = outcome.recommended_action.as_str(),
            "Triage submitted"
        );

        match api::triage::history(&self.client).await {
            Ok(items) => self.store_history(items),
            Err(e) => tracing::warn!("Could not refresh triage history after submit: {e}"),
        }
        Ok(outcome)
    }

    /// Abandon or finish the current episode and return to a blank
    /// Start step. Always valid.
    pub async fn restart_triage(&self) {
        self.flow.lock().await.restart();
    }

    /// Toggle between the wizard and the history pane.
    pub async fn set_triage_view(&self, view: TriageView) {
        self.flow.lock().await.set_view(view);
    }

    /// Snapshot of the wizard for rendering.
    pub async fn triage_state(&self) -> TriageFlow {
        self.flow.lock().await.clone()
    }

    /// Cached triage history, as of the last refresh.
    pub fn triage_history(&self) -> Vec<TriageHistoryItem> {
        self.history.read().map(|h| h.clone()).unwrap_or_default()
    }

    pub async fn refresh_triage_history(&self) -> Result<Vec<TriageHistoryItem>, PortalError> {
        let items = api::triage::history(&self.client).await?;
        self.store_history(items.clone());
        Ok(items)
    }

    fn store_history(&self, items: Vec<TriageHistoryItem>) {
        if let Ok(mut history) = self.history.write() {
            *history = items;
        }
    }

    // ── Dashboard ───────────────────────────────────────────

    /// Patient state as computed by the server. Authoritative for the
    /// dashboard.
    pub async fn patient_state(&self) -> Result<PatientState, PortalError> {
        Ok(api::dashboard::patient_state(&self.client).await?)
    }

    /// Patient state derived from the local caches and the running
    /// wizard. Serves renders between refreshes and offline starts;
    /// agrees with the server whenever the caches are current.
    pub async fn local_patient_state(&self) -> PatientState {
        let in_progress = self.flow.lock().await.in_progress();
        let history = self.triage_history();
        let consultations = self.consultations();
        patient_state::derive(&history, in_progress, &consultations)
    }

    // ── Consultations ───────────────────────────────────────

    /// Cached consultation list, as of the last refresh.
    pub fn consultations(&self) -> Vec<Consultation> {
        self.consultations
            .read()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    pub async fn refresh_consultations(&self) -> Result<Vec<Consultation>, PortalError> {
        let items = api::consultations::list(&self.client).await?;
        if let Ok(mut cache) = self.consultations.write() {
            *cache = items.clone();
        }
        Ok(items)
    }

    /// Book a consultation, optionally tied to the triage session that
    /// recommended it. A second call while one is in flight is rejected
    /// instead of queued; double-submits from an impatient click must
    /// not become double bookings.
    pub async fn book_consultation(
        &self,
        specialty: Specialty,
        triage_session_id: Option<Uuid>,
    ) -> Result<Consultation, PortalError> {
        let _guard =
            BookingGuard::acquire(&self.booking_in_flight).ok_or(PortalError::BookingInFlight)?;
        let request = BookingRequest {
            specialty,
            triage_session_id,
        };
        let consultation = api::consultations::book(&self.client, &request).await?;
        tracing::info!(
            id = %consultation.id,
            specialty = specialty.as_str(),
            from_triage = triage_session_id.is_some(),
            "Consultation booked"
        );
        if let Ok(mut cache) = self.consultations.write() {
            cache.push(consultation.clone());
        }
        Ok(consultation)
    }

    /// Move a consultation to in-progress and reflect the result in
    /// the cache. The server enforces who may do this.
    pub async fn start_consultation(&self, id: Uuid) -> Result<Consultation, PortalError> {
        let updated = api::consultations::start(&self.client, id).await?;
        self.replace_consultation(&updated);
        Ok(updated)
    }

    /// Close out an in-progress consultation.
    pub async fn complete_consultation(&self, id: Uuid) -> Result<Consultation, PortalError> {
        let updated = api::consultations::complete(&self.client, id).await?;
        self.replace_consultation(&updated);
        Ok(updated)
    }

    fn replace_consultation(&self, updated: &Consultation) {
        if let Ok(mut cache) = self.consultations.write() {
            if let Some(slot) = cache.iter_mut().find(|c| c.id == updated.id) {
                *slot = updated.clone();
            } else {
                cache.push(updated.clone());
            }
        }
    }

    // ── Support chat ────────────────────────────────────────

    /// Send a message to the support assistant. The whole transcript
    /// plus the shell's current route go out with the turn. On failure
    /// the message stays in the transcript and flips the retry flag.
    pub async fn send_chat_message(&self, message: &str) -> Result<ChatReply, PortalError> {
        let message = validation::validate_chat_message(message)?;
        let mut chat = self.chat.lock().await;
        chat.push_user(message);
        self.run_chat_turn(&mut chat).await
    }

    /// Resend the transcript after a failed turn, without appending
    /// anything new.
    pub async fn retry_chat_message(&self) -> Result<ChatReply, PortalError> {
        let mut chat = self.chat.lock().await;
        if !chat.needs_retry() {
            return Err(PortalError::NothingToRetry);
        }
        self.run_chat_turn(&mut chat).await
    }

    async fn run_chat_turn(&self, chat: &mut SupportChat) -> Result<ChatReply, PortalError> {
        let route = self.session.current_route();
        match api::chatbot::chat_turn(&self.client, chat.outbound(), &route.path, &route.title)
            .await
        {
            Ok(reply) => {
                chat.push_reply(&reply);
                Ok(reply)
            }
            Err(e) => {
                chat.mark_failed();
                Err(e.into())
            }
        }
    }

    pub async fn chat_transcript(&self) -> Vec<ChatMessage> {
        self.chat.lock().await.messages().to_vec()
    }

    pub async fn chat_suggestions(&self) -> Vec<String> {
        self.chat.lock().await.suggestions().to_vec()
    }

    pub async fn chat_needs_retry(&self) -> bool {
        self.chat.lock().await.needs_retry()
    }

    // ── Session reads and route context ─────────────────────

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Record the shell's current location, for the 401 redirect check
    /// and the chat's page context.
    pub fn set_route(&self, path: &str, title: &str) {
        self.session.set_route(path, title);
    }

    pub fn current_route(&self) -> RouteContext {
        self.session.current_route()
    }

    /// Drain the navigation request produced by session invalidation.
    pub fn take_pending_redirect(&self) -> Option<String> {
        self.session.take_pending_redirect()
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
