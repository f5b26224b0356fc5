//! Therapist roster: client list, per-client details and pending requests.

use std::collections::HashMap;

use futures_util::future::join_all;

use crate::domain::client::{ClientDetail, ClientSummary};
use crate::domain::member::AuthenticatedUser;
use crate::domain::types::ClientId;
use crate::dto::roster::RosterPageData;
use crate::repository::ScheduleReader;
use crate::services::{ServiceError, ServiceResult};

/// Loads the roster for the signed-in therapist.
///
/// Only the summary fetch can fail the page. Detail requests run
/// concurrently and a failed one just leaves its client out of the map.
pub async fn load_roster<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<RosterPageData>
where
    R: ScheduleReader + ?Sized,
{
    if !user.is_therapist() {
        return Err(ServiceError::Unauthorized);
    }

    let clients = repo.list_therapist_clients().await.map_err(|err| {
        log::error!("Failed to load client roster: {err}");
        ServiceError::from(err)
    })?;

    let details = fetch_details(repo, &clients).await;
    let pending_requests = count_pending_requests(repo).await;

    Ok(RosterPageData::new(clients, details, pending_requests))
}

/// Issues one detail request per client and keeps the successful ones.
pub async fn fetch_details<R>(repo: &R, clients: &[ClientSummary]) -> HashMap<ClientId, ClientDetail>
where
    R: ScheduleReader + ?Sized,
{
    let requests = clients.iter().map(|client| async move {
        (client.client_id, repo.get_client_detail(client.client_id).await)
    });

    join_all(requests)
        .await
        .into_iter()
        .filter_map(|(client_id, result)| match result {
            Ok(detail) => Some((client_id, detail)),
            Err(err) => {
                log::warn!("Skipping detail for client {client_id}: {err}");
                None
            }
        })
        .collect()
}

/// Number of pending match requests, `0` when the count is unavailable.
pub async fn count_pending_requests<R>(repo: &R) -> usize
where
    R: ScheduleReader + ?Sized,
{
    repo.count_pending_requests().await.unwrap_or_else(|err| {
        log::warn!("Failed to count pending requests: {err}");
        0
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::character::Character;
    use crate::domain::member::UserType;
    use crate::domain::types::MemberId;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn therapist() -> AuthenticatedUser {
        AuthenticatedUser {
            access_token: "token".to_string(),
            member_id: MemberId::new(10).unwrap(),
            name: "Dr. Kim".to_string(),
            user_type: UserType::Therapist,
        }
    }

    fn summary(id: i64, name: &str) -> ClientSummary {
        serde_json::from_value(json!({ "clientId": id, "name": name, "age": 6 })).unwrap()
    }

    fn detail(profile: i64) -> ClientDetail {
        serde_json::from_value(json!({ "name": "child", "profile": profile })).unwrap()
    }

    #[tokio::test]
    async fn failed_detail_is_dropped_without_failing_the_roster() {
        let mut repo = MockRepository::new();
        repo.expect_list_therapist_clients()
            .times(1)
            .returning(|| Ok(vec![summary(1, "Mina"), summary(2, "Joon"), summary(3, "Hana")]));
        repo.expect_get_client_detail().times(3).returning(|id| {
            if id.get() == 2 {
                Err(RepositoryError::Http {
                    status: 500,
                    body: "boom".to_string(),
                })
            } else {
                Ok(detail(6))
            }
        });
        repo.expect_count_pending_requests()
            .times(1)
            .returning(|| Ok(4));

        let page = load_roster(&repo, &therapist()).await.unwrap();

        let mut keys: Vec<i64> = page.details.keys().map(|id| id.get()).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![1, 3]);
        assert_eq!(page.entries.len(), 3);
        assert_eq!(page.entries[0].character, Character::Penguin);
        assert!(!page.entries[1].has_detail);
        assert_eq!(page.entries[1].character, Character::Bear);
        assert_eq!(page.pending_requests, 4);
    }

    #[tokio::test]
    async fn summary_failure_fails_the_roster() {
        let mut repo = MockRepository::new();
        repo.expect_list_therapist_clients()
            .times(1)
            .returning(|| Err(RepositoryError::ConnectionError("down".to_string())));
        repo.expect_get_client_detail().times(0);
        repo.expect_count_pending_requests().times(0);

        let result = load_roster(&repo, &therapist()).await;

        assert!(matches!(result, Err(ServiceError::Repository(_))));
    }

    #[tokio::test]
    async fn pending_count_defaults_to_zero() {
        let mut repo = MockRepository::new();
        repo.expect_list_therapist_clients()
            .returning(|| Ok(Vec::new()));
        repo.expect_count_pending_requests()
            .returning(|| Err(RepositoryError::Unauthorized));

        let page = load_roster(&repo, &therapist()).await.unwrap();

        assert!(page.is_empty());
        assert_eq!(page.pending_requests, 0);
    }

    #[tokio::test]
    async fn non_therapists_are_rejected_before_any_request() {
        let mut repo = MockRepository::new();
        repo.expect_list_therapist_clients().times(0);
        let user = AuthenticatedUser {
            user_type: UserType::User,
            ..therapist()
        };

        let result = load_roster(&repo, &user).await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
