use serde::Deserialize;
use validator::Validate;

use crate::forms::not_blank;

#[derive(Debug, Deserialize, Validate)]
/// Text typed into the chat panel.
pub struct ChatMessageForm {
    #[validate(custom(function = "not_blank"))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_messages_are_rejected() {
        let form = ChatMessageForm {
            content: " \t\n".to_string(),
        };
        assert!(form.validate().is_err());

        let form = ChatMessageForm {
            content: " hi ".to_string(),
        };
        assert!(form.validate().is_ok());
    }
}
