use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use super::answer_parser::{parse_closing_trigger, TriggerMatch};
use super::extraction::{parse_extracted_entry, ExtractionGateway};
use super::session_store::{SessionSnapshot, SessionStore};
use super::step_sequencer::StepSequencer;
use crate::core::money::format_brl;
use crate::core::{AppError, Result};
use crate::modules::assistant::models::{
    AssistantReply, ChatMessage, ClosingStage, ConversationState, PendingEntry,
};
use crate::modules::catalogs::services::CatalogService;
use crate::modules::closings::models::{ClosingContext, ClosingResult};
use crate::modules::closings::services::ClosingService;
use crate::modules::ledger::models::LedgerEntry;
use crate::modules::ledger::services::LedgerService;

pub const USAGE_HINT: &str =
    "Para iniciar um fechamento envie: Fechamento CVT 02 2025 (franquia CVT ou CVF, mês e ano).";
pub const CATALOG_LOAD_FAILED: &str =
    "Erro ao carregar gastos. Verifique os catálogos de gastos padrão e variáveis.";
pub const EXTRACTION_FAILED: &str = "Erro ao conectar com o assistente.";
pub const CLOSING_SAVED: &str =
    "Fechamento registrado e lançamento financeiro enviado para o Pessoal!";
pub const CLOSING_SAVED_WITHOUT_PAYMENT: &str =
    "Fechamento registrado. Não há valor a repassar ao franqueado.";
pub const CLOSING_SAVE_FAILED: &str = "Erro ao salvar o fechamento. Tente novamente.";
pub const ENTRY_SAVED: &str = "Lançamento gravado no banco com sucesso.";
pub const ENTRY_DISCARDED: &str = "Lançamento descartado.";

/// Routes chat messages to the closing sequencer or the extraction model
/// and performs the confirmations that write to storage
pub struct AssistantService {
    sessions: SessionStore,
    extraction: Arc<dyn ExtractionGateway>,
    catalog_service: Arc<CatalogService>,
    closing_service: Arc<ClosingService>,
    ledger_service: Arc<LedgerService>,
}

impl AssistantService {
    pub fn new(
        extraction: Arc<dyn ExtractionGateway>,
        catalog_service: Arc<CatalogService>,
        closing_service: Arc<ClosingService>,
        ledger_service: Arc<LedgerService>,
    ) -> Self {
        Self {
            sessions: SessionStore::new(),
            extraction,
            catalog_service,
            closing_service,
            ledger_service,
        }
    }

    /// Handle one user message
    ///
    /// # Errors
    /// `Conflict` while a previous message of the same session is pending,
    /// `Validation` for a blank message. Collaborator failures are reported
    /// in the reply instead.
    pub async fn handle_message(&self, session_id: &str, text: &str) -> Result<AssistantReply> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Message cannot be empty"));
        }

        let mut session = self.sessions.begin(session_id)?;
        session.push_turn(ChatMessage::user(text));

        let reply = match parse_closing_trigger(text) {
            TriggerMatch::Trigger(context) => {
                self.start_closing(session_id, &mut session, context).await
            }
            // mid-closing, a keyword is just part of the answer
            TriggerMatch::Malformed | TriggerMatch::NotATrigger
                if session.state.is_collecting_answers() =>
            {
                Self::answer_closing_step(&mut session, text)
            }
            TriggerMatch::Malformed => AssistantReply::text(USAGE_HINT),
            TriggerMatch::NotATrigger => {
                // the model's own turn is recorded by extract_entry
                let reply = self.extract_entry(session_id, &mut session).await;
                session.finish();
                return Ok(reply);
            }
        };

        session.push_turn(ChatMessage::assistant(reply.message()));
        session.finish();

        Ok(reply)
    }

    async fn start_closing(
        &self,
        session_id: &str,
        session: &mut SessionSnapshot,
        context: ClosingContext,
    ) -> AssistantReply {
        if let ConversationState::Closing(previous) = &session.state {
            info!(
                session_id = %session_id,
                previous = %previous.context.period_label(),
                "Abandoning closing in progress"
            );
        }
        session.state = ConversationState::Idle;

        match self.catalog_service.load_for_closing().await {
            Ok(catalog) => {
                info!(
                    session_id = %session_id,
                    franchise = %context.franchise,
                    period = %context.period_label(),
                    fixed = catalog.fixed_entries.len(),
                    variable = catalog.variable_entries.len(),
                    "Closing started"
                );
                let (flow, prompt) = StepSequencer::start(context, catalog);
                session.state = ConversationState::Closing(flow);
                AssistantReply::text(prompt)
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Failed to load catalogs for closing");
                AssistantReply::text(CATALOG_LOAD_FAILED)
            }
        }
    }

    fn answer_closing_step(session: &mut SessionSnapshot, text: &str) -> AssistantReply {
        let ConversationState::Closing(flow) = std::mem::take(&mut session.state) else {
            return AssistantReply::text(USAGE_HINT);
        };

        let advance = StepSequencer::advance(flow, text);
        let reply = match &advance.flow.stage {
            ClosingStage::Summary { result } if advance.accepted => {
                AssistantReply::ClosingSummary {
                    context: advance.flow.context.clone(),
                    result: result.clone(),
                    text: advance.prompt.clone(),
                }
            }
            _ => AssistantReply::text(advance.prompt.clone()),
        };
        session.state = ConversationState::Closing(advance.flow);
        reply
    }

    async fn extract_entry(&self, session_id: &str, session: &mut SessionSnapshot) -> AssistantReply {
        let content = match self.extraction.complete(&session.transcript).await {
            Ok(content) => content,
            Err(e) => {
                error!(
                    session_id = %session_id,
                    gateway = self.extraction.name(),
                    error = %e,
                    "Extraction request failed"
                );
                return AssistantReply::text(EXTRACTION_FAILED);
            }
        };
        session.push_turn(ChatMessage::assistant(content.clone()));

        match parse_extracted_entry(&content) {
            Some(extracted) => {
                let entry = extracted.into_new_entry();
                let id = Uuid::new_v4().to_string();
                let text = format!(
                    "{} - {} (pago por {}, caixa {}). Confirma o lançamento?",
                    format_brl(entry.amount),
                    entry.description,
                    entry.payer,
                    entry.cash_book
                );
                session.pending_entries.push(PendingEntry {
                    id: id.clone(),
                    entry: entry.clone(),
                });
                info!(session_id = %session_id, entry_id = %id, "Ledger entry extracted");
                AssistantReply::EntryCandidate { id, text, entry }
            }
            None => AssistantReply::text(content),
        }
    }

    /// Save the closing shown in the summary and book the franchisee payment
    ///
    /// The session returns to idle whether or not the writes succeed.
    ///
    /// # Errors
    /// `Conflict` when no closing is awaiting confirmation
    pub async fn confirm_closing(&self, session_id: &str) -> Result<AssistantReply> {
        let mut session = self.sessions.begin(session_id)?;

        let (context, result) = match &session.state {
            ConversationState::Closing(flow) => match &flow.stage {
                ClosingStage::Summary { result } => (flow.context.clone(), result.clone()),
                _ => {
                    return Err(AppError::conflict(
                        "The closing has unanswered questions",
                    ));
                }
            },
            ConversationState::Idle => {
                return Err(AppError::conflict("No closing is awaiting confirmation"));
            }
        };
        session.state = ConversationState::Idle;

        let reply = match self.persist_closing(&context, &result).await {
            Ok(Some(entry)) => AssistantReply::Recorded {
                text: CLOSING_SAVED.to_string(),
                entry: Some(entry),
            },
            Ok(None) => AssistantReply::Recorded {
                text: CLOSING_SAVED_WITHOUT_PAYMENT.to_string(),
                entry: None,
            },
            Err(e) => {
                error!(
                    session_id = %session_id,
                    franchise = %context.franchise,
                    period = %context.period_label(),
                    error = %e,
                    "Failed to confirm closing"
                );
                AssistantReply::text(CLOSING_SAVE_FAILED)
            }
        };

        session.push_turn(ChatMessage::assistant(reply.message()));
        session.finish();
        Ok(reply)
    }

    async fn persist_closing(
        &self,
        context: &ClosingContext,
        result: &ClosingResult,
    ) -> Result<Option<LedgerEntry>> {
        self.closing_service.save(context, result).await?;
        self.ledger_service
            .record_closing_payment(context, result.franchisee_share_amount)
            .await
    }

    /// Write a pending extracted entry to the ledger
    ///
    /// # Errors
    /// `NotFound` for an unknown entry id; a storage error leaves the entry
    /// pending and is returned as is
    pub async fn confirm_entry(&self, session_id: &str, entry_id: &str) -> Result<AssistantReply> {
        let mut session = self.sessions.begin(session_id)?;

        let Some(pending) = session.take_pending(entry_id) else {
            return Err(AppError::not_found(format!("Pending entry '{}'", entry_id)));
        };

        match self.ledger_service.record(pending.entry.clone()).await {
            Ok(entry) => {
                let reply = AssistantReply::Recorded {
                    text: ENTRY_SAVED.to_string(),
                    entry: Some(entry),
                };
                session.push_turn(ChatMessage::assistant(reply.message()));
                session.finish();
                Ok(reply)
            }
            Err(e) => {
                warn!(session_id = %session_id, entry_id = %entry_id, error = %e, "Failed to record entry");
                session.pending_entries.push(pending);
                session.finish();
                Err(e)
            }
        }
    }

    /// Drop a pending extracted entry
    pub async fn discard_entry(&self, session_id: &str, entry_id: &str) -> Result<AssistantReply> {
        let mut session = self.sessions.begin(session_id)?;

        if session.take_pending(entry_id).is_none() {
            return Err(AppError::not_found(format!("Pending entry '{}'", entry_id)));
        }

        let reply = AssistantReply::text(ENTRY_DISCARDED);
        session.push_turn(ChatMessage::assistant(reply.message()));
        session.finish();
        Ok(reply)
    }

    /// Abandon any closing in progress and drop pending entries
    pub async fn reset(&self, session_id: &str) -> Result<()> {
        self.sessions.abandon(session_id)?;
        info!(session_id = %session_id, "Session reset");
        Ok(())
    }

    /// Forget a session
    pub async fn end_session(&self, session_id: &str) -> Result<()> {
        if !self.sessions.remove(session_id)? {
            return Err(AppError::not_found(format!("Session '{}'", session_id)));
        }
        info!(session_id = %session_id, "Session ended");
        Ok(())
    }

    /// Current state, transcript and pending entries of a session
    pub async fn session(&self, session_id: &str) -> Result<SessionSnapshot> {
        self.sessions
            .view(session_id)
            .ok_or_else(|| AppError::not_found(format!("Session '{}'", session_id)))
    }
}
