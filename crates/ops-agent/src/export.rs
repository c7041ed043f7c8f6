//! JSON export of a conversation.

use ops_agent_core::Conversation;
use ops_agent_core::model::ModelDescriptor;
use serde::Serialize;

#[derive(Serialize)]
struct ConversationExport<'a> {
    model: &'a ModelDescriptor,
    conversation: &'a Conversation,
}

/// Renders `conversation` as pretty-printed JSON, together with the
/// model that was selected when it was exported.
pub fn to_json(
    conversation: &Conversation,
    model: &ModelDescriptor,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ConversationExport {
        model,
        conversation,
    })
}

#[cfg(test)]
mod tests {
    use ops_agent_core::model::ModelCatalog;
    use serde_json::Value;

    use super::*;
    use crate::seed;

    #[test]
    fn test_export_seed_conversation() {
        let conversation = &seed::conversations()[0];
        let catalog = ModelCatalog::builtin();
        let model = catalog.get("gpt-4o").unwrap();

        let json = to_json(conversation, model).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["model"]["id"], "gpt-4o");
        assert_eq!(value["conversation"]["id"], "1");
        assert_eq!(value["conversation"]["messages"][0]["role"], "user");
        assert_eq!(value["conversation"]["messages"][1]["role"], "assistant");

        let back: Conversation =
            serde_json::from_value(value["conversation"].clone()).unwrap();
        assert_eq!(&back, conversation);
    }
}
