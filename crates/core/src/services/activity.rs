//! Activity log service.

use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use wilaiety_common::{AppError, AppResult, IdGenerator};
use wilaiety_db::entities::activity_log;
use wilaiety_db::repositories::ActivityLogRepository;

use crate::policy::{Permission, Policy, Principal};

/// Default number of rows returned by [`ActivityService::list`].
pub const DEFAULT_ACTIVITY_LIMIT: u64 = 100;

/// Origin of a request, recorded with every log row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestMeta {
    pub ip_address: String,
    pub user_agent: Option<String>,
}

impl RequestMeta {
    /// Meta with an unknown client address.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            ip_address: UNKNOWN_IP.to_string(),
            user_agent: None,
        }
    }
}

const UNKNOWN_IP: &str = "unknown";

/// Client address as seen behind a proxy.
///
/// Takes the first entry of `x-forwarded-for`, then `cf-connecting-ip`,
/// then `"unknown"`.
#[must_use]
pub fn client_ip(forwarded_for: Option<&str>, cf_connecting_ip: Option<&str>) -> String {
    forwarded_for
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| cf_connecting_ip.map(str::trim).filter(|v| !v.is_empty()))
        .unwrap_or(UNKNOWN_IP)
        .to_string()
}

/// One row to append.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub user_id: String,
    pub user_email: Option<String>,
    pub action: String,
    pub details: Option<serde_json::Value>,
}

impl ActivityEntry {
    /// Entry attributed to an authenticated caller.
    pub fn by(principal: &Principal, action: impl Into<String>) -> Self {
        Self {
            user_id: principal.user_id.clone(),
            user_email: Some(principal.email.clone()),
            action: action.into(),
            details: None,
        }
    }

    /// Attach structured details.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Body of the `log-activity` function.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LogActivityInput {
    #[serde(default)]
    pub user_id: String,
    pub user_email: Option<String>,
    #[serde(default)]
    pub action: String,
    pub details: Option<serde_json::Value>,
}

/// Service for the append-only activity trail.
#[derive(Clone)]
pub struct ActivityService {
    activity_repo: ActivityLogRepository,
    id_gen: IdGenerator,
}

impl ActivityService {
    /// Create a new activity service.
    #[must_use]
    pub const fn new(activity_repo: ActivityLogRepository) -> Self {
        Self {
            activity_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append one row.
    pub async fn log(
        &self,
        entry: ActivityEntry,
        meta: &RequestMeta,
    ) -> AppResult<activity_log::Model> {
        let model = activity_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(entry.user_id),
            user_email: Set(entry.user_email),
            action: Set(entry.action),
            details: Set(entry.details),
            ip_address: Set(meta.ip_address.clone()),
            user_agent: Set(meta.user_agent.clone()),
            created_at: Set(Utc::now()),
        };

        let row = self.activity_repo.insert(model).await?;
        tracing::debug!(user_id = %row.user_id, action = %row.action, "Activity logged");
        Ok(row)
    }

    /// Append a row but only warn on failure.
    ///
    /// Used after the main write already succeeded.
    pub async fn log_quietly(&self, entry: ActivityEntry, meta: &RequestMeta) {
        let action = entry.action.clone();
        if let Err(e) = self.log(entry, meta).await {
            tracing::warn!(error = %e, action = %action, "Failed to write activity log");
        }
    }

    /// Handle a `log-activity` function call.
    pub async fn log_from_function(
        &self,
        input: LogActivityInput,
        meta: &RequestMeta,
    ) -> AppResult<()> {
        if input.user_id.trim().is_empty() || input.action.trim().is_empty() {
            return Err(AppError::Validation(
                "user_id and action are required".to_string(),
            ));
        }

        self.log(
            ActivityEntry {
                user_id: input.user_id,
                user_email: input.user_email.filter(|e| !e.trim().is_empty()),
                action: input.action,
                details: input.details,
            },
            meta,
        )
        .await?;
        Ok(())
    }

    /// Recent activity visible to `principal`.
    ///
    /// Admins see every row; other users only their own.
    pub async fn list(
        &self,
        principal: &Principal,
        limit: u64,
    ) -> AppResult<Vec<activity_log::Model>> {
        let limit = limit.clamp(1, 500);
        if Policy::allows(principal, Permission::ViewAllActivity) {
            self.activity_repo.find_recent(limit).await
        } else {
            self.activity_repo
                .find_recent_for_user(&principal.user_id, limit)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Role;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};
    use std::sync::Arc;

    fn row(user_id: &str, action: &str) -> activity_log::Model {
        activity_log::Model {
            id: "a1".to_string(),
            user_id: user_id.to_string(),
            user_email: None,
            action: action.to_string(),
            details: None,
            ip_address: "10.0.0.1".to_string(),
            user_agent: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        assert_eq!(
            client_ip(Some("41.188.1.2, 10.0.0.1"), Some("1.1.1.1")),
            "41.188.1.2"
        );
        assert_eq!(client_ip(None, Some("1.1.1.1")), "1.1.1.1");
        assert_eq!(client_ip(Some("  "), Some("1.1.1.1")), "1.1.1.1");
        assert_eq!(client_ip(None, None), "unknown");
    }

    #[tokio::test]
    async fn test_function_requires_user_and_action() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = ActivityService::new(ActivityLogRepository::new(db));

        let input = LogActivityInput {
            user_id: "u1".to_string(),
            action: "  ".to_string(),
            ..LogActivityInput::default()
        };
        let result = service.log_from_function(input, &RequestMeta::unknown()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let input = LogActivityInput {
            action: "login".to_string(),
            ..LogActivityInput::default()
        };
        let result = service.log_from_function(input, &RequestMeta::unknown()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_function_inserts_one_row() {
        let mock = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[row("u1", "page_view")]])
            .into_connection();
        let db = Arc::new(mock);
        let service = ActivityService::new(ActivityLogRepository::new(db.clone()));

        let input = LogActivityInput {
            user_id: "u1".to_string(),
            action: "page_view".to_string(),
            ..LogActivityInput::default()
        };
        let meta = RequestMeta {
            ip_address: "10.0.0.1".to_string(),
            user_agent: Some("test".to_string()),
        };
        service.log_from_function(input, &meta).await.unwrap();
        drop(service);

        let conn = Arc::try_unwrap(db).unwrap();
        let log: Vec<Transaction> = conn.into_transaction_log();
        assert_eq!(log.len(), 1);
    }

    async fn listed_sql(role: Role) -> String {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row("u2", "login")]])
                .into_connection(),
        );
        let service = ActivityService::new(ActivityLogRepository::new(db.clone()));
        let principal = Principal {
            user_id: "u2".to_string(),
            email: "u2@wilaya.mr".to_string(),
            role,
        };

        service.list(&principal, 50).await.unwrap();
        drop(service);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 1);
        log[0].statements()[0].sql.clone()
    }

    #[tokio::test]
    async fn test_user_list_filters_on_own_id() {
        let sql = listed_sql(Role::User).await;
        assert!(sql.contains(r#""activity_logs"."user_id" = $1"#), "{sql}");
    }

    #[tokio::test]
    async fn test_admin_list_is_unfiltered() {
        let sql = listed_sql(Role::Admin).await;
        assert!(!sql.contains("WHERE"), "{sql}");
    }
}
