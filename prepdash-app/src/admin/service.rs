//! Composite User Update Coordinator

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use tracing::{debug, info};

use prepdash_api::{PlatformApi, UserDetail};
use prepdash_core::{AccountStatus, PrepdashResult, Role, SubscriptionTier};

use crate::admin::types::{SubOperation, UserUpdateRequest};
use crate::session::{Session, SessionManager};
use crate::{AdminError, AdminResult};

/// Applies composite user updates and exam entitlement grants.
///
/// All calls go through the session manager's token path, so a stale
/// access token is refreshed transparently before the fan-out starts.
pub struct AdminService {
    api: Arc<dyn PlatformApi>,
    sessions: SessionManager,
}

impl AdminService {
    pub fn new(api: Arc<dyn PlatformApi>) -> Self {
        Self {
            sessions: SessionManager::new(Arc::clone(&api)),
            api,
        }
    }

    /// Apply a partial update to a user record.
    ///
    /// The role update (when requested) is awaited before anything else:
    /// permission assignment is only valid once the finalized role is
    /// known. The remaining applicable sub-operations are issued
    /// concurrently and all of them run to completion. A request with no
    /// fields resolves immediately without any network call.
    ///
    /// On failure, the first failing sub-operation (in dispatch order)
    /// is surfaced; completed sub-operations are NOT rolled back. The
    /// user record may be left partially updated; callers should
    /// [`fetch_user`](Self::fetch_user) to reconcile.
    pub async fn update_user(
        &self,
        session: &mut Session,
        user_id: &str,
        request: &UserUpdateRequest,
    ) -> AdminResult<()> {
        if request.is_empty() {
            debug!(user_id = %user_id, "Composite update with no fields; nothing to do");
            return Ok(());
        }

        let token = self.sessions.get_valid_access_token(session).await;

        // Step 1: role, awaited before anything permission-dependent
        let mut resolved_role = None;
        if let Some(raw) = &request.role {
            let role = Role::normalize(raw);
            self.api
                .update_user_role(&token, user_id, role.as_str())
                .await
                .map_err(|e| AdminError::SubOperation {
                    operation: SubOperation::Role,
                    source: e,
                })?;
            resolved_role = Some(role);
        }

        // Step 2: everything else, concurrently
        let tier = request
            .subscription_tier
            .as_deref()
            .map(SubscriptionTier::normalize);

        let mut ops: Vec<(SubOperation, BoxFuture<'_, PrepdashResult<()>>)> = Vec::new();

        if let Some(tier) = &tier {
            ops.push((
                SubOperation::Subscription,
                self.api.update_subscription(&token, user_id, tier.as_str()),
            ));
        }

        if !request.permissions.is_empty() {
            if resolved_role == Some(Role::SubAdmin) {
                ops.push((
                    SubOperation::Permissions,
                    self.api
                        .update_permissions(&token, user_id, &request.permissions),
                ));
            } else {
                debug!(
                    user_id = %user_id,
                    "Dropping permissions update; resolved role is not sub-admin"
                );
            }
        }

        if let Some(is_active) = request.is_active {
            let status = AccountStatus::from(is_active);
            ops.push((
                SubOperation::Status,
                self.api
                    .update_user_status(&token, user_id, status.as_str()),
            ));
        }

        if let Some(password) = &request.temp_password {
            ops.push((
                SubOperation::Password,
                self.api.set_temporary_password(&token, user_id, password),
            ));
        }

        if ops.is_empty() {
            return Ok(());
        }

        // All sub-operations run to completion even when one fails; the
        // first failure (in dispatch order) is what the caller sees.
        let (labels, futures): (Vec<_>, Vec<_>) = ops.into_iter().unzip();
        let results = join_all(futures).await;
        for (operation, result) in labels.into_iter().zip(results) {
            result.map_err(|e| AdminError::SubOperation {
                operation,
                source: e,
            })?;
        }

        info!(user_id = %user_id, "Composite user update applied");
        Ok(())
    }

    /// Grant the exam entitlements present in `desired` but not in
    /// `previously_unlocked`.
    ///
    /// Unlock calls run concurrently with each other, but strictly after
    /// any composite update: the user record must be in its final state
    /// first. Already-granted entitlements are never re-issued and never
    /// revoked. Returns the exam ids that were newly unlocked.
    pub async fn sync_exam_entitlements(
        &self,
        session: &mut Session,
        user_id: &str,
        previously_unlocked: &[String],
        desired: &[String],
    ) -> AdminResult<Vec<String>> {
        let known: HashSet<&str> = previously_unlocked.iter().map(String::as_str).collect();

        let mut new_unlocks: Vec<&str> = Vec::new();
        for exam_id in desired {
            if !known.contains(exam_id.as_str()) && !new_unlocks.contains(&exam_id.as_str()) {
                new_unlocks.push(exam_id);
            }
        }

        if new_unlocks.is_empty() {
            debug!(user_id = %user_id, "No new exam entitlements to provision");
            return Ok(Vec::new());
        }

        let token = self.sessions.get_valid_access_token(session).await;

        let results = join_all(
            new_unlocks
                .iter()
                .map(|exam_id| self.api.unlock_exam(&token, exam_id, user_id)),
        )
        .await;

        for result in results {
            result.map_err(|e| AdminError::SubOperation {
                operation: SubOperation::ExamUnlock,
                source: e,
            })?;
        }

        info!(
            user_id = %user_id,
            count = new_unlocks.len(),
            "Provisioned exam entitlements"
        );
        Ok(new_unlocks.into_iter().map(String::from).collect())
    }

    /// Apply a composite update, then provision entitlements.
    ///
    /// The entitlement step only starts once every sub-operation of the
    /// update has completed.
    pub async fn update_user_and_entitlements(
        &self,
        session: &mut Session,
        user_id: &str,
        request: &UserUpdateRequest,
        previously_unlocked: &[String],
        desired_unlocked: &[String],
    ) -> AdminResult<Vec<String>> {
        self.update_user(session, user_id, request).await?;
        self.sync_exam_entitlements(session, user_id, previously_unlocked, desired_unlocked)
            .await
    }

    /// Fetch the authoritative user record.
    ///
    /// After a composite failure this is how callers find out which
    /// fields actually applied.
    pub async fn fetch_user(
        &self,
        session: &mut Session,
        user_id: &str,
    ) -> AdminResult<UserDetail> {
        let token = self.sessions.get_valid_access_token(session).await;
        Ok(self.api.get_user(&token, user_id).await?)
    }
}
