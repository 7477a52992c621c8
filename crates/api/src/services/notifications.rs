//! In-process notification hub backed by a `tokio::sync::broadcast` channel.
//!
//! Approval decisions and new submissions are published here and fanned out
//! to connected dashboard clients over SSE, replacing interval polling of
//! the pending-count endpoints. The pending-count endpoints remain for
//! clients that cannot hold a stream open.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use shared::jwt::TokenRole;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// What happened to a BOM request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BomEventKind {
    Submitted,
    GuideApproved,
    GuideRejected,
    LabApproved,
    LabRejected,
    Updated,
    Deleted,
}

/// A notification about a BOM request, fanned out to subscribed clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BomEvent {
    pub kind: BomEventKind,
    /// The request the event concerns.
    pub request_id: Uuid,
    /// The student who owns the request.
    pub student_id: Uuid,
    /// The faculty guide supervising the request.
    pub guide_id: Uuid,
    /// The user whose action produced the event.
    pub actor_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl BomEvent {
    pub fn new(
        kind: BomEventKind,
        request_id: Uuid,
        student_id: Uuid,
        guide_id: Uuid,
        actor_id: Uuid,
    ) -> Self {
        Self {
            kind,
            request_id,
            student_id,
            guide_id,
            actor_id,
            timestamp: Utc::now(),
        }
    }

    /// Whether a subscriber with the given identity should see this event.
    ///
    /// Students see events on their own requests, guides see events on
    /// requests they supervise, lab in-charges and admins see everything.
    pub fn visible_to(&self, user_id: Uuid, role: TokenRole) -> bool {
        match role {
            TokenRole::Student => self.student_id == user_id,
            TokenRole::Faculty => self.guide_id == user_id,
            TokenRole::Lab | TokenRole::Admin => true,
        }
    }
}

/// In-process fan-out hub for BOM events.
///
/// Shared through [`AppState`](crate::app::AppState); any number of SSE
/// subscribers can independently receive every published event.
#[derive(Debug, Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<BomEvent>,
}

impl NotificationHub {
    /// Create a hub with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// A send error only means there are zero receivers, which is fine.
    pub fn publish(&self, event: BomEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<BomEvent> {
        self.sender.subscribe()
    }

    /// Number of currently connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: BomEventKind, student: Uuid, guide: Uuid) -> BomEvent {
        BomEvent::new(kind, Uuid::new_v4(), student, guide, Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let hub = NotificationHub::default();
        let mut rx = hub.subscribe();

        let student = Uuid::new_v4();
        hub.publish(event(BomEventKind::Submitted, student, Uuid::new_v4()));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, BomEventKind::Submitted);
        assert_eq!(received.student_id, student);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_silent() {
        let hub = NotificationHub::default();
        // No receiver; must not panic or error.
        hub.publish(event(
            BomEventKind::GuideApproved,
            Uuid::new_v4(),
            Uuid::new_v4(),
        ));
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_all_receive() {
        let hub = NotificationHub::default();
        let mut rx1 = hub.subscribe();
        let mut rx2 = hub.subscribe();

        hub.publish(event(
            BomEventKind::LabApproved,
            Uuid::new_v4(),
            Uuid::new_v4(),
        ));

        assert_eq!(rx1.recv().await.unwrap().kind, BomEventKind::LabApproved);
        assert_eq!(rx2.recv().await.unwrap().kind, BomEventKind::LabApproved);
    }

    #[test]
    fn test_visibility_student_own_requests_only() {
        let student = Uuid::new_v4();
        let other = Uuid::new_v4();
        let e = event(BomEventKind::GuideApproved, student, Uuid::new_v4());

        assert!(e.visible_to(student, TokenRole::Student));
        assert!(!e.visible_to(other, TokenRole::Student));
    }

    #[test]
    fn test_visibility_guide_supervised_only() {
        let guide = Uuid::new_v4();
        let e = event(BomEventKind::Submitted, Uuid::new_v4(), guide);

        assert!(e.visible_to(guide, TokenRole::Faculty));
        assert!(!e.visible_to(Uuid::new_v4(), TokenRole::Faculty));
    }

    #[test]
    fn test_visibility_lab_and_admin_see_all() {
        let e = event(BomEventKind::Submitted, Uuid::new_v4(), Uuid::new_v4());
        assert!(e.visible_to(Uuid::new_v4(), TokenRole::Lab));
        assert!(e.visible_to(Uuid::new_v4(), TokenRole::Admin));
    }

    #[test]
    fn test_event_serialization() {
        let e = event(BomEventKind::LabRejected, Uuid::new_v4(), Uuid::new_v4());
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["kind"], "lab_rejected");
        assert!(json["request_id"].is_string());
    }
}
