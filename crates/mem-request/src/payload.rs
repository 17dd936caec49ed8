//! Body construction for message-style operations.

use mem_types::{Message, Messages, Params};
use serde_json::{json, Value};

fn message_value(message: &Message) -> Value {
    let mut fields = message.extra.clone();
    fields.insert("role".to_string(), json!(message.role));
    fields.insert("content".to_string(), json!(message.content));
    Value::Object(fields)
}

/// Build the `add` body: normalized `messages` plus every non-null option.
///
/// Plain text becomes a single `user` message; a structured list passes
/// through as given. Options are merged after `messages`.
pub fn message_payload(messages: &Messages, options: Params) -> Params {
    let list = match messages {
        Messages::Text(text) => vec![message_value(&Message::user(text.as_str()))],
        Messages::List(list) => list.iter().map(message_value).collect(),
    };
    let mut payload = Params::new();
    payload.insert("messages".to_string(), Value::Array(list));
    payload.extend(options.into_iter().filter(|(_, v)| !v.is_null()));
    payload
}
