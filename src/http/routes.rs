//! Response-endpoint route handlers

use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::Json;
use chrono::Utc;
use log::{error, info, warn};
use serde_json::{json, Value};
use std::sync::Arc;

use super::AppContext;
use crate::features::analytics::CampaignStats;
use crate::store::{ContactStatus, TrackingAction, TrackingEvent};

/// Static confirmation page for not-interested clicks
const THANK_YOU_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Thank You</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            display: flex;
            justify-content: center;
            align-items: center;
            height: 100vh;
            margin: 0;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
        }
        .container {
            background: white;
            padding: 50px;
            border-radius: 10px;
            box-shadow: 0 4px 6px rgba(0,0,0,0.1);
            text-align: center;
            max-width: 500px;
        }
        h1 {
            color: #333;
            margin-bottom: 20px;
        }
        p {
            color: #666;
            font-size: 16px;
            line-height: 1.6;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>Thank You for Your Response</h1>
        <p>We appreciate you taking the time to respond.</p>
        <p>If you change your mind in the future, feel free to reach out to us anytime.</p>
        <p>Have a great day!</p>
    </div>
</body>
</html>
"#;

/// Service banner listing the endpoints
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Outreach response endpoint is running!",
        "endpoints": {
            "interested": "/interested/{contact_id}",
            "not_interested": "/not-interested/{contact_id}",
            "stats": "/stats",
            "contacts": "/contacts",
        },
    }))
}

/// Interested click: resolve the contact and hand off to the scheduling link
pub async fn interested(
    State(ctx): State<Arc<AppContext>>,
    Path(contact_id): Path<u32>,
) -> Redirect {
    record_response(
        &ctx,
        contact_id,
        ContactStatus::Interested,
        TrackingAction::Interested,
    )
    .await;
    Redirect::to(&ctx.config.calendly_link)
}

/// Not-interested click: resolve the contact and confirm
pub async fn not_interested(
    State(ctx): State<Arc<AppContext>>,
    Path(contact_id): Path<u32>,
) -> Html<&'static str> {
    record_response(
        &ctx,
        contact_id,
        ContactStatus::NotInterested,
        TrackingAction::NotInterested,
    )
    .await;
    Html(THANK_YOU_PAGE)
}

/// Aggregate campaign statistics
pub async fn stats(State(ctx): State<Arc<AppContext>>) -> Json<CampaignStats> {
    let contacts = ctx.store.contacts().await;
    let events = ctx.store.events().await;
    Json(CampaignStats::collect(&contacts, &events))
}

/// Full contact dump
pub async fn contacts(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let contacts = ctx.store.contacts().await;
    Json(json!({
        "total": contacts.len(),
        "contacts": contacts,
    }))
}

/// Mark a contact resolved and append the matching tracking event.
///
/// Unknown ids and persistence failures are logged only; the recipient's
/// response stays success-shaped either way.
async fn record_response(
    ctx: &AppContext,
    contact_id: u32,
    status: ContactStatus,
    action: TrackingAction,
) {
    let now = Utc::now();
    let updated = ctx
        .store
        .update_contact(contact_id, |c| {
            c.status = status;
            c.updated_at = Some(now);
            c.next_reminder_at = None;
        })
        .await;

    match updated {
        Ok(Some(contact)) => {
            info!("📩 Contact {} ({}) marked {}", contact.name, contact.id, status);
            if let Err(e) = ctx
                .store
                .append_event(TrackingEvent::new(&contact, action, now))
                .await
            {
                error!("Failed to record {action} for contact {contact_id}: {e}");
            }
        }
        Ok(None) => warn!("Response for unknown contact {contact_id} ignored"),
        Err(e) => error!("Failed to update contact {contact_id}: {e}"),
    }
}
