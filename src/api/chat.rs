use crate::api::AppState;
use crate::api::schemas::chat::{
    ChatRoomsResponse, MessagesResponse, SendMessage, SendMessageResponse, ValidSendMessage,
};
use crate::error::{AppError, Result};
use axum::{
    Form, Json,
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::header,
    response::IntoResponse,
};

const SEND_MESSAGE_FAILED: &str = "An error occurred while sending the message";
const LIST_CHAT_ROOMS_FAILED: &str = "An error occurred while getting chatrooms";
const LIST_MESSAGES_FAILED: &str = "An error occurred while getting messages";

/// `POST /send-message` body, accepted as JSON or form-encoded. A request
/// without a body, or with any other content type, yields an empty payload.
#[derive(Debug)]
pub struct SendMessageBody(pub SendMessage);

impl<S> FromRequest<S> for SendMessageBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let mime = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if mime == "application/x-www-form-urlencoded" {
            let Form(payload) = Form::<SendMessage>::from_request(req, state).await.map_err(invalid_body)?;
            return Ok(Self(payload));
        }

        if mime == "application/json" || mime.ends_with("+json") {
            let bytes = Bytes::from_request(req, state).await.map_err(invalid_body)?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Self(SendMessage::default()));
            }
            let Json(payload) = Json::<SendMessage>::from_bytes(&bytes).map_err(invalid_body)?;
            return Ok(Self(payload));
        }

        Ok(Self(SendMessage::default()))
    }
}

fn invalid_body(e: impl std::fmt::Display) -> AppError {
    tracing::debug!(error = %e, "Rejected send-message body");
    AppError::BadRequest("Invalid request body".to_string())
}

/// Sends a text message, creating the pair's chat room on first contact.
///
/// # Errors
/// Returns `AppError::BadRequest` for a malformed body, missing fields or a self-addressed message.
/// Returns `AppError::NotFound` if the sender or receiver does not exist.
/// Returns `AppError::Internal` if storage fails.
pub async fn send_message(
    State(state): State<AppState>,
    SendMessageBody(payload): SendMessageBody,
) -> Result<impl IntoResponse> {
    let request = ValidSendMessage::try_from(payload)?;

    state
        .chat_service
        .send_message(&request.sender_id, &request.receiver_id, &request.content)
        .await
        .map_err(|e| e.or_internal(SEND_MESSAGE_FAILED))?;

    Ok(Json(SendMessageResponse { message: "Message sent successfully" }))
}

/// Lists every chat room the user is a member of.
///
/// # Errors
/// Returns `AppError::NotFound` if the user does not exist.
/// Returns `AppError::Internal` if storage fails.
pub async fn list_chat_rooms(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse> {
    let rooms =
        state.chat_service.list_chat_rooms(&user_id).await.map_err(|e| e.or_internal(LIST_CHAT_ROOMS_FAILED))?;

    Ok(Json(ChatRoomsResponse { chat_rooms: rooms.into_iter().map(Into::into).collect() }))
}

/// Lists a chat room's messages, oldest first.
///
/// # Errors
/// Returns `AppError::BadRequest` if the id is not an integer.
/// Returns `AppError::NotFound` if the room does not exist.
/// Returns `AppError::Internal` if storage fails.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(chat_room_id): Path<String>,
) -> Result<impl IntoResponse> {
    let chat_room_id: i64 =
        chat_room_id.parse().map_err(|_| AppError::BadRequest("Invalid chat room ID".to_string()))?;

    let messages =
        state.chat_service.list_messages(chat_room_id).await.map_err(|e| e.or_internal(LIST_MESSAGES_FAILED))?;

    Ok(Json(MessagesResponse { messages: messages.into_iter().map(Into::into).collect() }))
}
