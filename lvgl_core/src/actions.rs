//! # Event Actions
//!
//! Widgets map trigger names (`on_click`, `on_value`, ...) to an ordered
//! list of action invocations. Invocations are opaque to the model: each is
//! a single-key mapping from an action identifier to its parameter, e.g.
//! `{lvgl.page.show: settings_page}`.
//!
//! The canonical form is ESPHome's automation shape:
//!
//! ```yaml
//! on_click:
//!   then:
//!     - logger.log: Start button clicked
//!     - lvgl.page.show: settings_page
//! ```
//!
//! Two shorthands are accepted on input: a bare list of invocations, and a
//! single invocation mapping.
//!
//! ## Example
//!
//! ```rust
//! use lvgl_core::actions::ActionSpec;
//! use serde_json::json;
//!
//! let spec = ActionSpec::new().then("lvgl.page.show", json!("settings_page"));
//! assert_eq!(spec.to_value(), json!({"then": [{"lvgl.page.show": "settings_page"}]}));
//!
//! let parsed = ActionSpec::from_value(&json!([{"logger.log": "hi"}])).unwrap();
//! assert_eq!(parsed.then[0].action, "logger.log");
//! ```

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Trigger name → action list, in insertion order.
pub type Actions = IndexMap<String, ActionSpec>;

/// Prefix shared by every LVGL/ESPHome widget trigger.
pub const TRIGGER_PREFIX: &str = "on_";

/// Key the action list lives under inside an automation mapping.
const THEN: &str = "then";

/// One invocation: action identifier plus its (opaque) parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCall {
    pub action: String,
    pub param: Value,
}

impl ActionCall {
    pub fn new(action: impl Into<String>, param: Value) -> Self {
        ActionCall {
            action: action.into(),
            param,
        }
    }

    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Object(map) if map.len() == 1 => {
                let (action, param) = map.iter().next().ok_or("empty invocation")?;
                Ok(ActionCall::new(action.clone(), param.clone()))
            }
            Value::Object(map) => Err(format!(
                "an invocation must have exactly one key, found {}",
                map.len()
            )),
            Value::String(action) => Ok(ActionCall::new(action.clone(), Value::Null)),
            other => Err(format!("expected an invocation mapping, found {}", other)),
        }
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(self.action.clone(), self.param.clone());
        Value::Object(map)
    }
}

/// Ordered action list bound to one trigger.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionSpec {
    pub then: Vec<ActionCall>,
}

impl ActionSpec {
    pub fn new() -> Self {
        ActionSpec::default()
    }

    /// Append an invocation (builder style).
    pub fn then(mut self, action: impl Into<String>, param: Value) -> Self {
        self.then.push(ActionCall::new(action, param));
        self
    }

    /// Parse any of the accepted shapes.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let calls = match value {
            Value::Object(map) => match map.get(THEN) {
                Some(Value::Array(items)) => items.as_slice(),
                Some(single @ Value::Object(_)) => std::slice::from_ref(single),
                Some(other) => return Err(format!("'then' must be a list, found {}", other)),
                None => std::slice::from_ref(value),
            },
            Value::Array(items) => items.as_slice(),
            other => return Err(format!("expected an action mapping or list, found {}", other)),
        };

        let then = calls
            .iter()
            .map(ActionCall::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ActionSpec { then })
    }

    /// Canonical `{then: [...]}` form.
    ///
    /// Whatever shape [`ActionSpec::from_value`] accepted comes back out in
    /// this form: a single invocation or a bare list is wrapped in `then`,
    /// and a bare action name becomes `{name: null}`. Re-exported configs
    /// are equivalent to the imported ones, not identical text.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            THEN.to_string(),
            Value::Array(self.then.iter().map(ActionCall::to_value).collect()),
        );
        Value::Object(map)
    }

    /// Identifiers of every invocation, in order.
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.then.iter().map(|c| c.action.as_str())
    }
}

/// Whether a document key names a trigger.
pub fn is_trigger_name(key: &str) -> bool {
    key.len() > TRIGGER_PREFIX.len() && key.starts_with(TRIGGER_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_then_form() {
        let value = json!({"then": [
            {"logger.log": "Start button clicked"},
            {"lvgl.page.show": "settings_page"}
        ]});
        let spec = ActionSpec::from_value(&value).unwrap();
        assert_eq!(spec.then.len(), 2);
        assert_eq!(
            spec.action_names().collect::<Vec<_>>(),
            vec!["logger.log", "lvgl.page.show"]
        );
        assert_eq!(spec.to_value(), value);
    }

    #[test]
    fn test_parse_shorthands() {
        let single = ActionSpec::from_value(&json!({"lvgl.page.next": {}})).unwrap();
        assert_eq!(single.then[0].action, "lvgl.page.next");

        let bare = ActionSpec::from_value(&json!(["lvgl.widget.redraw"])).unwrap();
        assert_eq!(bare.then[0].param, Value::Null);
    }

    #[test]
    fn test_shorthands_written_in_then_form() {
        let single = ActionSpec::from_value(&json!({"lvgl.page.next": {}})).unwrap();
        assert_eq!(single.to_value(), json!({"then": [{"lvgl.page.next": {}}]}));

        let bare = ActionSpec::from_value(&json!(["lvgl.widget.redraw", {"logger.log": "x"}])).unwrap();
        assert_eq!(
            bare.to_value(),
            json!({"then": [{"lvgl.widget.redraw": null}, {"logger.log": "x"}]})
        );

        let inner = ActionSpec::from_value(&json!({"then": {"logger.log": "x"}})).unwrap();
        assert_eq!(inner.to_value(), json!({"then": [{"logger.log": "x"}]}));
        // and the canonical form reads back the same
        assert_eq!(ActionSpec::from_value(&bare.to_value()).unwrap(), bare);
    }

    #[test]
    fn test_reject_bad_shapes() {
        assert!(ActionSpec::from_value(&json!(42)).is_err());
        assert!(ActionSpec::from_value(&json!({"then": "nope"})).is_err());
        assert!(ActionSpec::from_value(&json!([{"a": 1, "b": 2}])).is_err());
    }

    #[test]
    fn test_trigger_names() {
        assert!(is_trigger_name("on_click"));
        assert!(is_trigger_name("on_value_changed"));
        assert!(!is_trigger_name("on_"));
        assert!(!is_trigger_name("options"));
    }
}
