//! Invitation handlers: review, create, confirm, invalidate.
//!
//! Store errors never escape this module; they become 500 envelopes with the
//! underlying message interpolated. Confirm's decision chain reports its
//! informational outcomes (already expired, already confirmed, invalidated)
//! as 200s with `success: true`; only malformed input (422) and store
//! failures (500) are non-success.

use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{debug, warn};
use usher_storage::{
    generate_code, timestamps, Invitation, InvitationUpdate, InviteStatus, Store,
    DEFAULT_VALID_DAYS,
};

use crate::api::ApiResponse;
use crate::query::{self, ReviewFilter};
use crate::server::UsherServer;

pub async fn review(server: &UsherServer, query_params: &HashMap<String, String>) -> ApiResponse {
    let filter = ReviewFilter::from_query_params(query_params);
    debug!(?filter, "reviewing invitations");

    match query::run_query(&server.store, &filter).await {
        Ok(items) => ApiResponse::ok(None, Some(json!(items))),
        Err(e) => {
            warn!(error = %e, "review query failed");
            ApiResponse::error(500, format!("Error querying invitations. Err: {e}"))
        }
    }
}

pub async fn create(server: &UsherServer, body: Option<&Value>) -> ApiResponse {
    let Some(email) = body.and_then(|b| b.get("email")).and_then(Value::as_str) else {
        return ApiResponse::error(422, "Missing email.".to_string());
    };

    let invitation = Invitation::issue(email, generate_code(), DEFAULT_VALID_DAYS);
    // No collision retry: a code collision surfaces from the put-if-absent
    // create like any other store failure.
    match server.store.create_invitation(&invitation).await {
        Ok(()) => {
            debug!(email, code = %invitation.code, "invitation created");
            ApiResponse::ok(
                Some("Invitation created!".to_string()),
                Some(json!(invitation)),
            )
        }
        Err(e) => {
            warn!(email, error = %e, "create failed");
            ApiResponse::error(500, format!("Error generating invitation. Err: {e}"))
        }
    }
}

pub async fn confirm(server: &UsherServer, body: Option<&Value>) -> ApiResponse {
    let email = body.and_then(|b| b.get("email")).and_then(Value::as_str);
    let code = body.and_then(|b| b.get("code")).and_then(Value::as_str);
    let (Some(email), Some(code)) = (email, code) else {
        return ApiResponse::error(422, "Missing 'code' or 'email'.".to_string());
    };

    let now = timestamps::truncate_to_seconds(Utc::now());
    let invitation = match server.store.get_invitation(email, code).await {
        Ok(found) => found,
        Err(e) => {
            warn!(email, code, error = %e, "confirm lookup failed");
            return ApiResponse::error(500, format!("Error confirming invitation. Err: {e}"));
        }
    };

    // Decision chain; first match wins.
    let Some(invitation) = invitation else {
        return ApiResponse::with_status(
            404,
            Some(format!("Invite code: {code} is invalid or does not exist.")),
            None,
        );
    };

    if invitation.is_expired_at(now) || invitation.invite_status == InviteStatus::Expired {
        // Reported, not mutated; only the sweep transitions on expiry.
        return ApiResponse::ok(
            Some(format!("Invite code: {code} already expired.")),
            Some(json!(invitation)),
        );
    }

    if invitation.invite_status == InviteStatus::Confirmed {
        return ApiResponse::ok(
            Some(format!("Invite code: {code} already confirmed.")),
            Some(json!(invitation)),
        );
    }

    if invitation.invite_status == InviteStatus::Invalidated {
        return ApiResponse::ok(
            Some(format!("Invite code: {code} is invalidated.")),
            Some(json!(invitation)),
        );
    }

    let update = InvitationUpdate::status(InviteStatus::Confirmed);
    match server.store.update_invitation(email, code, &update).await {
        Ok(updated) => {
            debug!(email, code, "invitation confirmed");
            // A record that vanished between read and write leaves data null.
            ApiResponse::ok(
                Some(format!("Invite code: {code} status changed to confirmed.")),
                updated.map(|confirmed| json!(confirmed)),
            )
        }
        Err(e) => {
            warn!(email, code, error = %e, "confirm update failed");
            ApiResponse::error(500, format!("Error confirming invitation. Err: {e}"))
        }
    }
}

pub async fn invalidate(_server: &UsherServer, _body: Option<&Value>) -> ApiResponse {
    // Deliberate stub: records leave circulation through the expiry sweep,
    // not deletion.
    ApiResponse::ok(Some("Not implemented.".to_string()), None)
}
