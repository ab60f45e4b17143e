//! REST endpoint handlers.
//!
//! Handlers stay thin: parse the wire shapes, run a usecase (or a plain
//! store read for the list endpoints), translate the result. The
//! [`ApiError`] wrapper is the single place error kinds become HTTP
//! status codes.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::domain::{
    Conversation, ConversationId, MessageId, MessageStatus, UserId, assign_name,
};
use crate::infrastructure::dto::http::{
    AckResponse, ConversationCreatedDto, ConversationDetailDto, ConversationSummaryDto,
    CreateConversationRequest, ListConversationsQuery, MarkReadQuery, MarkReadResponse,
    MessageDto, SendMessageRequest, UpdateStatusQuery,
};
use crate::infrastructure::dto::websocket::RoomEvent;
use crate::time::timestamp_to_hhmm;
use crate::ui::state::AppState;
use crate::usecase::{
    ChatError, FindOrCreateConversationUseCase, MarkConversationReadUseCase,
    SendMessageUseCase, UpdateMessageStatusUseCase,
};

/// ChatError carried out of a handler.
pub struct ApiError(pub ChatError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ChatError::NotFound(_) => StatusCode::NOT_FOUND,
            ChatError::Forbidden(_) => StatusCode::FORBIDDEN,
            ChatError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self.0);
        }
        (status, Json(serde_json::json!({ "detail": self.0.to_string() }))).into_response()
    }
}

impl<E: Into<ChatError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn parse_user_id(raw: String) -> Result<UserId, ApiError> {
    Ok(UserId::new(raw)?)
}

fn parse_conversation_id(raw: i64) -> Result<ConversationId, ApiError> {
    Ok(ConversationId::new(raw)?)
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn summarize(
    state: &AppState,
    conversation: &Conversation,
) -> Result<ConversationSummaryDto, ApiError> {
    let last = state.store.latest_message(conversation.id).await?;
    // Rows created before naming existed fall back to the assigner
    // without being rewritten.
    let name = conversation
        .name
        .clone()
        .unwrap_or_else(|| assign_name(conversation.id, state.name_catalog).to_string());
    Ok(ConversationSummaryDto {
        id: conversation.id.value(),
        name: Some(name),
        avatar: None,
        last_message: last
            .as_ref()
            .map(|m| m.content.as_str().to_string()),
        last_message_time: last.as_ref().map(|m| timestamp_to_hhmm(m.timestamp)),
    })
}

/// List the caller's conversations with last-message previews.
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListConversationsQuery>,
) -> Result<Json<Vec<ConversationSummaryDto>>, ApiError> {
    let Some(user_id) = query.user_id.filter(|id| !id.is_empty()) else {
        return Ok(Json(Vec::new()));
    };
    let user = parse_user_id(user_id)?;

    let conversations = state.store.conversations_for_user(&user).await?;
    let mut summaries = Vec::with_capacity(conversations.len());
    for conversation in &conversations {
        summaries.push(summarize(&state, conversation).await?);
    }
    Ok(Json(summaries))
}

/// Conversation detail with full ascending message history.
pub async fn get_conversation_detail(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<i64>,
) -> Result<Json<ConversationDetailDto>, ApiError> {
    let id = parse_conversation_id(conversation_id)?;
    if state.store.conversation(id).await?.is_none() {
        return Err(ApiError(ChatError::NotFound(
            "conversation not found".to_string(),
        )));
    }

    let messages = state.store.messages(id).await?;
    Ok(Json(ConversationDetailDto {
        id: id.value(),
        messages: messages.iter().map(MessageDto::from).collect(),
    }))
}

/// Plain ascending message list.
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<i64>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let id = parse_conversation_id(conversation_id)?;
    let messages = state.store.messages(id).await?;
    Ok(Json(messages.iter().map(MessageDto::from).collect()))
}

/// Find-or-create the conversation between the caller and a peer.
pub async fn create_conversation(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationCreatedDto>), ApiError> {
    let current_user = parse_user_id(request.current_user_id)?;
    let peer = parse_user_id(request.participant_id)?;
    // An empty initial message means "none", matching the existing wire
    // contract where clients send "".
    let initial_message = match request.initial_message.filter(|m| !m.is_empty()) {
        Some(content) => Some(content.try_into().map_err(ChatError::from)?),
        None => None,
    };

    let usecase = FindOrCreateConversationUseCase::new(
        state.store.clone(),
        state.pair_locks.clone(),
        state.name_catalog,
    );
    let conversation = usecase.execute(current_user, peer, initial_message).await?;

    Ok((
        StatusCode::CREATED,
        Json(ConversationCreatedDto {
            id: conversation.id.value(),
            name: conversation.name,
        }),
    ))
}

/// Persist a message, then fan it out to the room's live sessions.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<i64>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<MessageDto>, ApiError> {
    let id = parse_conversation_id(conversation_id)?;
    let sender = parse_user_id(request.sender_id)?;

    let usecase = SendMessageUseCase::new(state.store.clone());
    let message = usecase.execute(id, sender, request.content).await?;

    // Durable write first; fan-out is best-effort and never fails the
    // request.
    state.broadcaster.broadcast(id, &RoomEvent::message(&message));

    Ok(Json(MessageDto::from(&message)))
}

/// Bulk read transition plus a read-receipt broadcast when anything
/// changed.
pub async fn mark_conversation_read(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<i64>,
    Query(query): Query<MarkReadQuery>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    let id = parse_conversation_id(conversation_id)?;
    let Some(user_id) = query.user_id.filter(|u| !u.is_empty()) else {
        return Err(ApiError(ChatError::Validation(
            "user_id is required".to_string(),
        )));
    };
    let reader = parse_user_id(user_id)?;

    let usecase = MarkConversationReadUseCase::new(state.store.clone());
    let updated = usecase.execute(id, reader.clone()).await?;

    if updated > 0 {
        state.broadcaster.broadcast(
            id,
            &RoomEvent::MessagesRead {
                conversation_id: id.value(),
                user_id: reader.into_string(),
                count: updated,
            },
        );
    }

    Ok(Json(MarkReadResponse {
        ok: true,
        updated_count: updated,
        conversation_id: id.value(),
    }))
}

/// Externally driven status override.
pub async fn update_message_status(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<i64>,
    Query(query): Query<UpdateStatusQuery>,
) -> Result<Json<AckResponse>, ApiError> {
    let id = MessageId::new(message_id).map_err(ChatError::from)?;
    let status: MessageStatus = query.status.parse().map_err(ChatError::from)?;

    let usecase = UpdateMessageStatusUseCase::new(state.store.clone());
    usecase.execute(id, status).await?;

    Ok(Json(AckResponse { ok: true }))
}
