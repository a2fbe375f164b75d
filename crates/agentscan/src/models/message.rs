use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of a chat transcript.
///
/// User messages are immutable once appended; the assistant message at the
/// tail of a transcript grows while a response streams in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message with the given text
    pub fn user<S: Into<String>>(content: S) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message, empty by default so streamed content can
    /// be written into it
    pub fn assistant() -> Self {
        Message {
            role: Role::Assistant,
            content: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_roles_serialize_lowercase() {
        let user = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(user["role"], "user");
        assert_eq!(user["content"], "hi");

        let assistant = serde_json::to_value(Message::assistant()).unwrap();
        assert_eq!(assistant["role"], "assistant");
        assert_eq!(assistant["content"], "");
    }

    #[test]
    fn test_message_round_trip() {
        let mut message = Message::assistant();
        message.content = "OLAS is a framework.".to_string();
        let json = serde_json::to_string(&message).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
    }
}
