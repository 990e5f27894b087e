// services.rs
use serde_json::{json, Map, Value};

use crate::error::{AppError, AppResult};
use crate::models::{ResponseDraft, ResponseRow, TemplateDraft};

/// Legacy `name` column value when a created template carries no title key.
pub const NEW_TEMPLATE_NAME: &str = "Новый тест";
/// Same, for updates.
pub const UPDATED_TEMPLATE_NAME: &str = "Тест";

/// Decode a request body. An absent body counts as `{}`; a present one must
/// be a JSON object.
pub fn parse_body(raw: Option<&str>) -> AppResult<Map<String, Value>> {
    let Some(raw) = raw else {
        return Ok(Map::new());
    };

    match serde_json::from_str(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::InvalidBody(
            "request body must be a JSON object".to_string(),
        )),
    }
}

fn text(body: &Map<String, Value>, key: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub fn template_draft(body: &Map<String, Value>, default_name: &str) -> TemplateDraft {
    let name = body
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(default_name)
        .to_string();
    let questions = match body.get("questions") {
        None | Some(Value::Null) => Value::Array(Vec::new()),
        Some(questions) => questions.clone(),
    };

    TemplateDraft {
        title: text(body, "title"),
        name,
        description: text(body, "description"),
        welcome_title: text(body, "welcomeTitle"),
        welcome_subtitle: text(body, "welcomeSubtitle"),
        questions: questions.to_string(),
    }
}

/// Explicit template id from a PUT body. `None` selects the current template.
///
/// Falsy values (`null`, `false`, `0`, `""`) mean "current"; integral floats
/// such as `1.0` address that row.
pub fn requested_template_id(body: &Map<String, Value>) -> AppResult<Option<i32>> {
    let id = match body.get("id") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(Value::String(s)) if s.is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    match id.map(i32::try_from) {
        Some(Ok(0)) => Ok(None),
        Some(Ok(id)) => Ok(Some(id)),
        _ => Err(AppError::InvalidBody(format!(
            "invalid template id: {}",
            body["id"]
        ))),
    }
}

/// First non-empty value of `key` at the top level, then under `contact`.
fn contact_field(body: &Map<String, Value>, key: &str) -> String {
    let flat = body.get(key).and_then(Value::as_str).filter(|v| !v.is_empty());
    let nested = || {
        body.get("contact")
            .and_then(Value::as_object)
            .and_then(|contact| contact.get(key))
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    };
    flat.or_else(nested).unwrap_or_default().to_string()
}

pub fn response_draft(body: Map<String, Value>, template_id: Option<i32>) -> ResponseDraft {
    let name = contact_field(&body, "name");
    let phone = contact_field(&body, "phone");
    let email = contact_field(&body, "email");

    let nested = body.get("contact").is_some_and(Value::is_object);
    let answers = if nested {
        body.get("answers").map(Value::to_string)
    } else {
        None
    };
    let answers = answers.unwrap_or_else(|| Value::Object(body).to_string());

    ResponseDraft {
        template_id,
        name,
        phone,
        email,
        answers,
    }
}

/// Flat admin listing entry: identity fields, then the keys of a
/// mapping-valued answers blob. Identity fields are never overwritten.
pub fn admin_entry(row: ResponseRow) -> Map<String, Value> {
    let mut entry = Map::new();
    entry.insert("id".to_string(), json!(row.id));
    entry.insert("name".to_string(), json!(row.name.unwrap_or_default()));
    entry.insert("phone".to_string(), json!(row.phone.unwrap_or_default()));
    entry.insert("email".to_string(), json!(row.email.unwrap_or_default()));
    entry.insert("completed_at".to_string(), json!(row.completed_at));

    let Some(answers) = row.answers.filter(|a| !a.is_empty()) else {
        return entry;
    };

    match serde_json::from_str::<Value>(&answers) {
        Ok(Value::Object(fields)) => {
            for (key, value) in fields {
                entry.entry(key).or_insert(value);
            }
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(response_id = row.id, error = %e, "Error parsing answers");
        }
    }

    entry
}
