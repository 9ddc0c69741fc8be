use serde_json::Value;
use url::Url;

pub fn string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(ToString::to_string)
}

/// Non-negative finite number, also accepted as a numeric string
pub fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    (n.is_finite() && n >= 0.0).then_some(n)
}

pub fn count(value: Option<&Value>) -> Option<u64> {
    if let Some(n) = value.and_then(Value::as_u64) {
        return Some(n);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    number(value).map(|x| x.floor() as u64)
}

/// An absolute http(s) url.
///
/// Objects are searched for the first of `keys` holding one.
pub fn url(value: Option<&Value>, keys: &[&str]) -> Option<Url> {
    match value? {
        Value::String(s) => Url::parse(s.trim())
            .ok()
            .filter(|x| matches!(x.scheme(), "http" | "https")),
        Value::Object(o) => keys.iter().find_map(|k| url(o.get(*k), &[])),
        _ => None,
    }
}

/// Author handle, from either a plain string or an author object
pub fn author(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(_) => string(value).map(|x| as_handle(&x)),
        Value::Object(o) => ["unique_id", "uniqueId", "username"]
            .iter()
            .find_map(|k| string(o.get(*k)))
            .map(|x| as_handle(&x))
            .or_else(|| string(o.get("nickname"))),
        _ => None,
    }
}

fn as_handle(name: &str) -> String {
    if name.starts_with('@') || name.contains(char::is_whitespace) {
        name.to_string()
    } else {
        format!("@{name}")
    }
}
