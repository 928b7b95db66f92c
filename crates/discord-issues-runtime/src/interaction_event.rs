//! Discord interaction payload parsing into router events.

use discord_issues_forms::{SubmittedForm, SubmittedValue};
use serde_json::Value;

const INTERACTION_TYPE_PING: u64 = 1;
const INTERACTION_TYPE_APPLICATION_COMMAND: u64 = 2;
const INTERACTION_TYPE_MODAL_SUBMIT: u64 = 5;
const COMMAND_TYPE_MESSAGE: u64 = 3;
const COMPONENT_TYPE_ACTION_ROW: u64 = 1;
const COMPONENT_TYPE_TEXT_INPUT: u64 = 4;
const COMPONENT_TYPE_LABEL: u64 = 18;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetMessage {
    pub content: String,
    pub author: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command_name: String,
    pub user: String,
    pub target_message: Option<TargetMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub form_id: String,
    pub user: String,
    pub values: Vec<(String, SubmittedValue)>,
    /// Application and token addressing the interaction's follow-up webhook.
    pub application_id: String,
    pub interaction_token: String,
}

impl FormSubmission {
    pub fn decode(&self) -> SubmittedForm {
        SubmittedForm::decode(self.values.iter().cloned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEvent {
    Ping,
    CommandInvoked(CommandInvocation),
    FormSubmitted(FormSubmission),
    Unsupported { interaction_type: u64 },
}

/// Parse one interaction payload as delivered to the interactions endpoint.
pub fn parse_interaction(payload: &Value) -> InteractionEvent {
    let interaction_type = payload.get("type").and_then(Value::as_u64).unwrap_or(0);
    match interaction_type {
        INTERACTION_TYPE_PING => InteractionEvent::Ping,
        INTERACTION_TYPE_APPLICATION_COMMAND => {
            let data = &payload["data"];
            if data.get("type").and_then(Value::as_u64) != Some(COMMAND_TYPE_MESSAGE) {
                return InteractionEvent::Unsupported { interaction_type };
            }
            InteractionEvent::CommandInvoked(CommandInvocation {
                command_name: string_field(data, "name"),
                user: interaction_user_tag(payload),
                target_message: target_message(payload),
            })
        }
        INTERACTION_TYPE_MODAL_SUBMIT => {
            let data = &payload["data"];
            let mut values = Vec::new();
            if let Some(components) = data.get("components").and_then(Value::as_array) {
                for component in components {
                    collect_submitted_values(component, &mut values);
                }
            }
            InteractionEvent::FormSubmitted(FormSubmission {
                form_id: string_field(data, "custom_id"),
                user: interaction_user_tag(payload),
                values,
                application_id: string_field(payload, "application_id"),
                interaction_token: string_field(payload, "token"),
            })
        }
        _ => InteractionEvent::Unsupported { interaction_type },
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Render a user the way Discord clients show it: `name` or legacy `name#1234`.
pub fn user_tag(user: &Value) -> String {
    let username = string_field(user, "username");
    match user.get("discriminator").and_then(Value::as_str) {
        Some(discriminator) if !discriminator.is_empty() && discriminator != "0" => {
            format!("{username}#{discriminator}")
        }
        _ => username,
    }
}

fn interaction_user_tag(payload: &Value) -> String {
    let user = payload
        .get("member")
        .and_then(|member| member.get("user"))
        .or_else(|| payload.get("user"));
    user.map(user_tag).unwrap_or_else(|| "unknown".to_string())
}

fn target_message(payload: &Value) -> Option<TargetMessage> {
    let data = payload.get("data")?;
    let target_id = data.get("target_id").and_then(Value::as_str)?;
    let message = data.get("resolved")?.get("messages")?.get(target_id)?;
    let channel_id = message
        .get("channel_id")
        .and_then(Value::as_str)
        .or_else(|| payload.get("channel_id").and_then(Value::as_str))
        .unwrap_or_default();
    let guild_id = payload
        .get("guild_id")
        .and_then(Value::as_str)
        .unwrap_or("@me");
    Some(TargetMessage {
        content: string_field(message, "content"),
        author: message
            .get("author")
            .map(user_tag)
            .unwrap_or_else(|| "unknown".to_string()),
        url: format!("https://discord.com/channels/{guild_id}/{channel_id}/{target_id}"),
    })
}

fn collect_submitted_values(component: &Value, values: &mut Vec<(String, SubmittedValue)>) {
    match component.get("type").and_then(Value::as_u64) {
        Some(COMPONENT_TYPE_ACTION_ROW) => {
            if let Some(children) = component.get("components").and_then(Value::as_array) {
                for child in children {
                    collect_submitted_values(child, values);
                }
            }
        }
        Some(COMPONENT_TYPE_LABEL) => {
            if let Some(child) = component.get("component") {
                collect_submitted_values(child, values);
            }
        }
        Some(COMPONENT_TYPE_TEXT_INPUT) => {
            let custom_id = string_field(component, "custom_id");
            if !custom_id.is_empty() {
                values.push((
                    custom_id,
                    SubmittedValue::Text(string_field(component, "value")),
                ));
            }
        }
        _ => {
            let custom_id = string_field(component, "custom_id");
            let Some(selected) = component.get("values").and_then(Value::as_array) else {
                return;
            };
            if custom_id.is_empty() {
                return;
            }
            let selected = selected
                .iter()
                .filter_map(Value::as_str)
                .map(ToOwned::to_owned)
                .collect();
            values.push((custom_id, SubmittedValue::Choices(selected)));
        }
    }
}

#[cfg(test)]
mod tests {
    use discord_issues_forms::SubmittedValue;
    use serde_json::json;

    use super::{parse_interaction, user_tag, InteractionEvent};

    #[test]
    fn unit_parse_interaction_recognizes_ping_and_unsupported_types() {
        assert_eq!(parse_interaction(&json!({"type": 1})), InteractionEvent::Ping);
        assert_eq!(
            parse_interaction(&json!({"type": 3, "data": {}})),
            InteractionEvent::Unsupported {
                interaction_type: 3
            }
        );
        assert_eq!(
            parse_interaction(&json!({"type": 2, "data": {"type": 1, "name": "slash"}})),
            InteractionEvent::Unsupported {
                interaction_type: 2
            }
        );
    }

    #[test]
    fn functional_parse_interaction_extracts_message_command_target() {
        let payload = json!({
            "type": 2,
            "guild_id": "100",
            "channel_id": "200",
            "member": {"user": {"username": "carol", "discriminator": "0"}},
            "data": {
                "type": 3,
                "name": "To Github Bug",
                "target_id": "300",
                "resolved": {"messages": {"300": {
                    "id": "300",
                    "channel_id": "200",
                    "content": "it crashes",
                    "author": {"username": "dave", "discriminator": "4242"}
                }}}
            }
        });
        let InteractionEvent::CommandInvoked(invocation) = parse_interaction(&payload) else {
            panic!("expected command invocation");
        };
        assert_eq!(invocation.command_name, "To Github Bug");
        assert_eq!(invocation.user, "carol");
        let target = invocation.target_message.expect("target message");
        assert_eq!(target.content, "it crashes");
        assert_eq!(target.author, "dave#4242");
        assert_eq!(target.url, "https://discord.com/channels/100/200/300");
    }

    #[test]
    fn functional_parse_interaction_reads_label_and_action_row_submissions() {
        let payload = json!({
            "type": 5,
            "application_id": "app-1",
            "token": "token-1",
            "user": {"username": "erin"},
            "data": {
                "custom_id": "create github issue Task",
                "components": [
                    {"type": 18, "id": 1, "component": {"type": 4, "custom_id": "title*", "value": "Fix crash"}},
                    {"type": 1, "components": [{"type": 4, "custom_id": "desc*", "value": "detail"}]},
                    {"type": 18, "id": 3, "component": {"type": 3, "custom_id": "labels", "values": ["bug", "ui"]}},
                    {"type": 18, "id": 4, "component": {"type": 3, "custom_id": "milestone", "values": []}}
                ]
            }
        });
        let InteractionEvent::FormSubmitted(submission) = parse_interaction(&payload) else {
            panic!("expected form submission");
        };
        assert_eq!(submission.form_id, "create github issue Task");
        assert_eq!(submission.user, "erin");
        assert_eq!(submission.application_id, "app-1");
        assert_eq!(submission.interaction_token, "token-1");
        assert_eq!(
            submission.values,
            vec![
                ("title*".to_string(), SubmittedValue::Text("Fix crash".to_string())),
                ("desc*".to_string(), SubmittedValue::Text("detail".to_string())),
                (
                    "labels".to_string(),
                    SubmittedValue::Choices(vec!["bug".to_string(), "ui".to_string()])
                ),
                ("milestone".to_string(), SubmittedValue::Choices(Vec::new())),
            ]
        );
        let decoded = submission.decode();
        assert_eq!(decoded.text("title"), "Fix crash");
        assert_eq!(decoded.single_choice("milestone"), None);
    }

    #[test]
    fn regression_user_tag_omits_zero_discriminator() {
        assert_eq!(user_tag(&json!({"username": "a", "discriminator": "0"})), "a");
        assert_eq!(user_tag(&json!({"username": "a", "discriminator": "0001"})), "a#0001");
        assert_eq!(user_tag(&json!({"username": "a"})), "a");
    }
}
