//! Telegram Bot API wire types (the subset the bot consumes)

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_updates_response_deserializes() {
        let raw = r#"{
            "ok": true,
            "result": [
                {
                    "update_id": 123456,
                    "message": {
                        "message_id": 42,
                        "chat": {"id": 987, "type": "private"},
                        "text": "Сколько всего видео есть в системе?"
                    }
                },
                {
                    "update_id": 123457,
                    "edited_message": {}
                }
            ]
        }"#;
        let response: ApiResponse<Vec<Update>> = serde_json::from_str(raw).unwrap();
        assert!(response.ok);
        let updates = response.result.unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].update_id, 123456);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, 987);
        assert_eq!(
            message.text.as_deref(),
            Some("Сколько всего видео есть в системе?")
        );
        // Non-message updates carry no message payload
        assert!(updates[1].message.is_none());
    }

    #[test]
    fn error_response_deserializes() {
        let raw = r#"{"ok": false, "description": "Unauthorized"}"#;
        let response: ApiResponse<Vec<Update>> = serde_json::from_str(raw).unwrap();
        assert!(!response.ok);
        assert_eq!(response.description.as_deref(), Some("Unauthorized"));
    }
}
