use crate::domain::attributes::{AttributeSet, AttributeValue};
use crate::domain::signals::CustomEvent;
use anyhow::Result;

/// Build an ad-hoc event from `key=value` pairs. Later pairs overwrite
/// earlier ones with the same key.
pub fn build_custom_event<S: AsRef<str>>(event_type: &str, pairs: &[S]) -> Result<CustomEvent> {
    let event_type = event_type.trim();
    if event_type.is_empty() {
        anyhow::bail!("Event type must not be empty");
    }

    let mut attributes = AttributeSet::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Invalid attribute: {}. Must be 'key=value'", pair))?;
        let key = key.trim();
        if key.is_empty() || key == "eventType" {
            anyhow::bail!("Invalid attribute key in: {}", pair);
        }
        attributes = attributes.with(key, AttributeValue::parse(value.trim()));
    }

    Ok(CustomEvent {
        event_type: event_type.to_string(),
        attributes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_typed_attributes() {
        let event = build_custom_event("Purchase", &["account=5", "amount=400", "gift=false"]).unwrap();

        assert_eq!(event.event_type, "Purchase");
        assert_eq!(event.attributes.get("account"), Some(&AttributeValue::Int(5)));
        assert_eq!(event.attributes.get("gift"), Some(&AttributeValue::Bool(false)));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let event = build_custom_event("Query", &["filter=a=b"]).unwrap();
        assert_eq!(event.attributes.get("filter"), Some(&AttributeValue::from("a=b")));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(build_custom_event("", &["a=1"]).is_err());
        assert!(build_custom_event("Purchase", &["amount"]).is_err());
        assert!(build_custom_event("Purchase", &["=1"]).is_err());
        assert!(build_custom_event("Purchase", &["eventType=Other"]).is_err());
    }
}
