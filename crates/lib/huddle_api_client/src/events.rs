//! Category and event endpoints.

use huddle_core::models::{
    Category, CreateEvent, Event, EventFilter, EventParticipant, ParticipantDecision,
};
use serde::Serialize;

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiResult;

#[derive(Serialize)]
struct DecisionBody {
    status: ParticipantDecision,
}

impl ApiClient {
    /// `GET /categories`
    pub async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.send_json(&ApiRequest::get(&["categories"])).await
    }

    /// `GET /events` filtered by position, radius and category.
    pub async fn list_events(&self, filter: &EventFilter) -> ApiResult<Vec<Event>> {
        let request = ApiRequest::get(&["events"]).query(filter.query_pairs());
        self.send_json(&request).await
    }

    /// `GET /events/{id}`
    pub async fn event(&self, id: &str) -> ApiResult<Event> {
        self.send_json(&ApiRequest::get(&["events", id])).await
    }

    /// `GET /events/{id}/participants`
    pub async fn event_participants(&self, id: &str) -> ApiResult<Vec<EventParticipant>> {
        self.send_json(&ApiRequest::get(&["events", id, "participants"]))
            .await
    }

    /// `POST /events`. The payload is validated before anything is sent.
    pub async fn create_event(&self, payload: &CreateEvent) -> ApiResult<Event> {
        payload.validate()?;
        let request = ApiRequest::post(&["events"]).json(payload)?;
        self.send_json(&request).await
    }

    /// `POST /events/{id}/participants`
    pub async fn join_event(&self, id: &str) -> ApiResult<()> {
        self.send_empty(&ApiRequest::post(&["events", id, "participants"]))
            .await
    }

    /// `DELETE /events/{id}/participants`
    pub async fn leave_event(&self, id: &str) -> ApiResult<()> {
        self.send_empty(&ApiRequest::delete(&["events", id, "participants"]))
            .await
    }

    /// `PATCH /events/{id}/participants/{user_id}`
    pub async fn decide_participant(
        &self,
        event_id: &str,
        user_id: &str,
        decision: ParticipantDecision,
    ) -> ApiResult<()> {
        let request = ApiRequest::patch(&["events", event_id, "participants", user_id])
            .json(&DecisionBody { status: decision })?;
        self.send_empty(&request).await
    }

    /// `DELETE /events/{id}`
    pub async fn delete_event(&self, id: &str) -> ApiResult<()> {
        self.send_empty(&ApiRequest::delete(&["events", id])).await
    }

    /// `GET /my-events`
    pub async fn my_events(&self) -> ApiResult<Vec<Event>> {
        self.send_json(&ApiRequest::get(&["my-events"])).await
    }
}
