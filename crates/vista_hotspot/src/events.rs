//! Declarative events: `{ "click": "action-1", "hover": ["a", "b"] }`.
//!
//! The hotspot does not run actions itself; [`HotspotEvents::trigger`] hands
//! the action uids to whoever listens on `on_event`.

use std::collections::HashMap;

use serde_json::Value;
use vista_core::Signal;

#[derive(Debug, Clone, PartialEq)]
pub struct HotspotEvent {
    pub name: String,
    pub actions: Vec<String>,
}

#[derive(Debug, Default)]
pub struct HotspotEvents {
    map: HashMap<String, Vec<String>>,
    pub on_event: Signal<HotspotEvent>,
}

impl HotspotEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &HashMap<String, Value>) -> Self {
        let mut events = Self::new();
        events.load(config);
        events
    }

    /// Replace the event table.  Entries that are neither a string nor an
    /// array are dropped with a warning; non-string array items likewise.
    pub fn load(&mut self, config: &HashMap<String, Value>) {
        self.map.clear();
        for (name, value) in config {
            let actions = match value {
                Value::String(uid) => vec![uid.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(|item| match item.as_str() {
                        Some(uid) => Some(uid.to_string()),
                        None => {
                            log::warn!("event `{name}`: ignoring non-string action {item}");
                            None
                        }
                    })
                    .collect(),
                other => {
                    log::warn!("event `{name}`: unsupported descriptor {other}");
                    continue;
                }
            };
            self.map.insert(name.clone(), actions);
        }
    }

    pub fn actions(&self, name: &str) -> &[String] {
        self.map.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Dispatch `name` if it is registered.  Returns whether it was.
    pub fn trigger(&mut self, name: &str) -> bool {
        let Some(actions) = self.map.get(name) else {
            return false;
        };
        let event = HotspotEvent { name: name.to_string(), actions: actions.clone() };
        log::debug!("event `{name}` -> {:?}", event.actions);
        self.on_event.dispatch(&event);
        true
    }

    pub fn destroy(&mut self) {
        self.on_event.clear();
        self.map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn table(v: Value) -> HashMap<String, Value> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn string_and_array_descriptors() {
        let events = HotspotEvents::from_config(&table(json!({
            "click": "open-door",
            "hover": ["glow", 3, "hum"],
            "bad": { "nested": true }
        })));
        assert_eq!(events.actions("click"), ["open-door".to_string()]);
        assert_eq!(events.actions("hover"), ["glow".to_string(), "hum".to_string()]);
        assert!(events.actions("bad").is_empty());
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn trigger_dispatches_actions() {
        let mut events = HotspotEvents::from_config(&table(json!({ "click": ["a", "b"] })));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        events.on_event.add(move |e: &HotspotEvent| s.borrow_mut().push(e.clone()));

        assert!(events.trigger("click"));
        assert!(!events.trigger("missing"));
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].actions, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn destroy_empties_everything() {
        let mut events = HotspotEvents::from_config(&table(json!({ "click": "a" })));
        events.on_event.add(|_| {});
        events.destroy();
        assert!(events.is_empty());
        assert!(events.on_event.is_empty());
    }
}
