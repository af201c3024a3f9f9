use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{RoundEntity, Score},
    dto::{entry::EntryProgress, round::RoundDetail},
    error::ServiceError,
    identity::Identity,
    services::round_service,
    state::{
        EntryKey, SharedState,
        entry::{self, EntrySession, FinishOutcome, RecordOutcome, UndoOutcome},
    },
};

/// Open or resume score entry for a round: the session starts at the first
/// empty end with a clear buffer.
pub async fn open_entry(
    state: &SharedState,
    identity: &Identity,
    round_id: Uuid,
) -> Result<EntryProgress, ServiceError> {
    let store = state.require_round_store().await?;
    let round = round_service::fetch_owned(&store, &identity.user_id, round_id).await?;

    let key = entry_key(identity, round_id);
    let session = state
        .entries()
        .entry(key)
        .or_insert_with(|| EntrySession::open(&round))
        .value()
        .clone();

    Ok(EntryProgress::new(round, &session))
}

/// Record one score token for the active end.
///
/// When the buffer reaches the configured arrow count the end is finalized
/// and the round is persisted in a single write carrying the full ends array
/// plus the recomputed aggregates.
pub async fn record_score(
    state: &SharedState,
    identity: &Identity,
    round_id: Uuid,
    token: &str,
) -> Result<EntryProgress, ServiceError> {
    let score =
        Score::parse(token).map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let store = state.require_round_store().await?;
    let mut round = round_service::fetch_owned(&store, &identity.user_id, round_id).await?;

    let key = entry_key(identity, round_id);
    let mut session = current_session(state, &key, &round);

    let outcome = entry::record_score(&mut round, &mut session, score)?;
    if let RecordOutcome::EndCompleted { end_number } = outcome {
        round.updated_at = SystemTime::now();
        store.save_round(round.clone()).await?;
        info!(round_id = %round_id, end_number, total = round.total_score, "end recorded");
    }

    state.entries().insert(key, session.clone());
    Ok(EntryProgress::new(round, &session))
}

/// Undo the most recent entry action: drop the newest buffered score, or
/// reopen the previous end into the buffer. A no-op at the very start.
pub async fn undo_score(
    state: &SharedState,
    identity: &Identity,
    round_id: Uuid,
) -> Result<EntryProgress, ServiceError> {
    let store = state.require_round_store().await?;
    let mut round = round_service::fetch_owned(&store, &identity.user_id, round_id).await?;

    let key = entry_key(identity, round_id);
    let mut session = current_session(state, &key, &round);

    let outcome = entry::undo(&mut round, &mut session);
    if let UndoOutcome::EndReopened { end_number } = outcome {
        round.updated_at = SystemTime::now();
        store.save_round(round.clone()).await?;
        info!(round_id = %round_id, end_number, "end reopened for editing");
    }

    state.entries().insert(key, session.clone());
    Ok(EntryProgress::new(round, &session))
}

/// Finish entry, persisting a partially filled final end when scores are
/// buffered, and discard the session. Trailing ends stay empty; entry can
/// resume later at the first empty end.
pub async fn finish_entry(
    state: &SharedState,
    identity: &Identity,
    round_id: Uuid,
) -> Result<RoundDetail, ServiceError> {
    let store = state.require_round_store().await?;
    let mut round = round_service::fetch_owned(&store, &identity.user_id, round_id).await?;

    let key = entry_key(identity, round_id);
    let mut session = current_session(state, &key, &round);

    if let FinishOutcome::EndFinalized { end_number } = entry::finish(&mut round, &mut session) {
        round.updated_at = SystemTime::now();
        store.save_round(round.clone()).await?;
        info!(round_id = %round_id, end_number, "entry finished with a partial end");
    }

    state.entries().remove(&key);
    Ok(round.into())
}

fn entry_key(identity: &Identity, round_id: Uuid) -> EntryKey {
    (identity.user_id.clone(), round_id)
}

/// Clone the stored session, or open a fresh one aligned with the persisted
/// round. Cloning keeps the registry lock out of the storage await points.
fn current_session(state: &SharedState, key: &EntryKey, round: &RoundEntity) -> EntrySession {
    state
        .entries()
        .get(key)
        .map(|entry| entry.value().clone())
        .unwrap_or_else(|| EntrySession::open(round))
}
