use std::sync::Arc;
use std::time::SystemTime;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::{
        models::{RoundEntity, RoundType},
        round_store::RoundStore,
    },
    dto::{
        parse_system_time,
        round::{CreateRoundRequest, RoundDetail, RoundSummary, UpdateRoundRequest},
    },
    error::ServiceError,
    identity::Identity,
    state::{
        SharedState,
        round::{self, DEFAULT_ARROWS_PER_END, RoundConfig},
    },
};

/// Create a round from a validated request and persist it with all ends
/// pre-allocated empty.
pub async fn create_round(
    state: &SharedState,
    identity: &Identity,
    request: CreateRoundRequest,
) -> Result<RoundDetail, ServiceError> {
    let config = resolve_config(request)?;
    let round = round::new_round(identity.user_id.clone(), config);

    let store = state.require_round_store().await?;
    store.save_round(round.clone()).await?;

    info!(round_id = %round.id, user_id = %round.user_id, "round created");
    Ok(round.into())
}

/// List the caller's rounds, most recent practice date first.
pub async fn list_rounds(
    state: &SharedState,
    identity: &Identity,
) -> Result<Vec<RoundSummary>, ServiceError> {
    let store = state.require_round_store().await?;
    let rounds = store.list_rounds(identity.user_id.clone()).await?;
    Ok(rounds.into_iter().map(Into::into).collect())
}

/// Fetch one round, owner-checked.
pub async fn get_round(
    state: &SharedState,
    identity: &Identity,
    id: Uuid,
) -> Result<RoundDetail, ServiceError> {
    let store = state.require_round_store().await?;
    let round = fetch_owned(&store, &identity.user_id, id).await?;
    Ok(round.into())
}

/// Merge-update a round's editable metadata and bump `updated_at`.
///
/// Only `date`, `location`, and `memo` are patchable; identity, configuration,
/// and scoring fields never change through this path.
pub async fn update_round(
    state: &SharedState,
    identity: &Identity,
    id: Uuid,
    request: UpdateRoundRequest,
) -> Result<RoundDetail, ServiceError> {
    let store = state.require_round_store().await?;
    let mut round = fetch_owned(&store, &identity.user_id, id).await?;

    if let Some(date) = request.date {
        round.date = parse_date(&date)?;
    }
    if let Some(location) = request.location {
        round.location = none_if_blank(location);
    }
    if let Some(memo) = request.memo {
        round.memo = none_if_blank(memo);
    }
    round.updated_at = SystemTime::now();

    store.save_round(round.clone()).await?;
    Ok(round.into())
}

/// Delete a round, owner-checked, and discard any entry session for it.
pub async fn delete_round(
    state: &SharedState,
    identity: &Identity,
    id: Uuid,
) -> Result<(), ServiceError> {
    let store = state.require_round_store().await?;
    let round = fetch_owned(&store, &identity.user_id, id).await?;

    let deleted = store.delete_round(round.id).await?;
    if !deleted {
        return Err(ServiceError::NotFound(format!("round `{id}` not found")));
    }

    state
        .entries()
        .remove(&(identity.user_id.clone(), round.id));
    info!(round_id = %id, user_id = %identity.user_id, "round deleted");
    Ok(())
}

/// Fetch a round by id and verify the caller owns it. Fails closed before
/// any round data is returned.
pub(crate) async fn fetch_owned(
    store: &Arc<dyn RoundStore>,
    user_id: &str,
    id: Uuid,
) -> Result<RoundEntity, ServiceError> {
    let Some(round) = store.find_round(id).await? else {
        return Err(ServiceError::NotFound(format!("round `{id}` not found")));
    };
    ensure_owner(&round, user_id)?;
    Ok(round)
}

/// Owner check applied before every mutating or single-record operation.
pub(crate) fn ensure_owner(round: &RoundEntity, user_id: &str) -> Result<(), ServiceError> {
    if round.user_id != user_id {
        warn!(round_id = %round.id, "ownership mismatch on round access");
        return Err(ServiceError::Unauthorized(
            "rounds can only be accessed by their owner".into(),
        ));
    }
    Ok(())
}

/// Resolve the request into a full round configuration, applying the
/// standard presets and defaults.
fn resolve_config(request: CreateRoundRequest) -> Result<RoundConfig, ServiceError> {
    let ends_count = match request.round_type {
        RoundType::Standard => round::standard_ends_count(request.distance),
        RoundType::Custom => request.ends_count.ok_or_else(|| {
            ServiceError::InvalidInput("ends_count is required for custom rounds".into())
        })?,
    };

    let date = match request.date.as_deref() {
        Some(value) => parse_date(value)?,
        None => SystemTime::now(),
    };

    Ok(RoundConfig {
        round_type: request.round_type,
        distance: request.distance,
        ends_count,
        arrows_per_end: request.arrows_per_end.unwrap_or(DEFAULT_ARROWS_PER_END),
        date,
        location: request.location.and_then(none_if_blank),
        memo: request.memo.and_then(none_if_blank),
    })
}

fn parse_date(value: &str) -> Result<SystemTime, ServiceError> {
    parse_system_time(value).map_err(|_| {
        ServiceError::InvalidInput(format!("`{value}` is not an RFC 3339 timestamp"))
    })
}

fn none_if_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::round::sample_round;

    fn create_request(round_type: RoundType, distance: u32) -> CreateRoundRequest {
        CreateRoundRequest {
            round_type,
            distance,
            ends_count: None,
            arrows_per_end: None,
            date: None,
            location: None,
            memo: None,
        }
    }

    #[test]
    fn owner_mismatch_is_unauthorized() {
        let round = sample_round(30, 6);
        assert!(matches!(
            ensure_owner(&round, "somebody-else"),
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(ensure_owner(&round, "user-1").is_ok());
    }

    #[test]
    fn standard_config_uses_distance_preset() {
        let config = resolve_config(create_request(RoundType::Standard, 30)).unwrap();
        assert_eq!(config.ends_count, 5);
        assert_eq!(config.arrows_per_end, 6);

        let config = resolve_config(create_request(RoundType::Standard, 70)).unwrap();
        assert_eq!(config.ends_count, 6);
    }

    #[test]
    fn standard_config_ignores_supplied_ends_count() {
        let mut request = create_request(RoundType::Standard, 30);
        request.ends_count = Some(12);
        let config = resolve_config(request).unwrap();
        assert_eq!(config.ends_count, 5);
    }

    #[test]
    fn custom_config_requires_ends_count() {
        assert!(matches!(
            resolve_config(create_request(RoundType::Custom, 18)),
            Err(ServiceError::InvalidInput(_))
        ));

        let mut request = create_request(RoundType::Custom, 18);
        request.ends_count = Some(10);
        request.arrows_per_end = Some(3);
        let config = resolve_config(request).unwrap();
        assert_eq!(config.ends_count, 10);
        assert_eq!(config.arrows_per_end, 3);
    }

    #[test]
    fn blank_optional_text_is_dropped() {
        let mut request = create_request(RoundType::Standard, 50);
        request.location = Some("   ".into());
        request.memo = Some("windy".into());
        let config = resolve_config(request).unwrap();
        assert_eq!(config.location, None);
        assert_eq!(config.memo.as_deref(), Some("windy"));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut request = create_request(RoundType::Standard, 50);
        request.date = Some("yesterday".into());
        assert!(matches!(
            resolve_config(request),
            Err(ServiceError::InvalidInput(_))
        ));
    }
}
