use std::{fmt, rc::Rc};

use serde::Serialize;
use serde_json::Value;

/// Failure reported by a [`Decoder`] when an event payload does not have the
/// shape it expects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct DecodeError(pub String);

type DecodeFn = dyn Fn(&Value) -> Result<Value, DecodeError>;

/// Opaque event decoder supplied by application code.
///
/// Turns a raw event payload into an application message. Snapshots never
/// look inside a decoder; two decoders are only ever compared by identity.
#[derive(Clone)]
pub struct Decoder(Rc<DecodeFn>);

impl Decoder {
    pub fn new<F>(decode: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, DecodeError> + 'static,
    {
        Self(Rc::new(decode))
    }

    /// Decoder that ignores the payload and always produces `message`.
    pub fn succeed(message: Value) -> Self {
        Self::new(move |_| Ok(message.clone()))
    }

    /// Decoder that reads the value at `path` inside the payload,
    /// e.g. `["target", "value"]` for input events.
    pub fn at<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path: Vec<String> = path.into_iter().map(Into::into).collect();
        Self::new(move |payload| {
            let mut current = payload;
            for field in &path {
                current = current.get(field).ok_or_else(|| {
                    DecodeError(format!("expecting an object with a field named `{field}`"))
                })?;
            }
            Ok(current.clone())
        })
    }

    pub fn decode(&self, payload: &Value) -> Result<Value, DecodeError> {
        (self.0)(payload)
    }

    pub fn ptr_eq(a: &Decoder, b: &Decoder) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Decoder(<opaque>)")
    }
}

/// Propagation flags attached to a handler. Plain data, so they appear in
/// snapshots next to the event name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOptions {
    pub stop_propagation: bool,
    pub prevent_default: bool,
}

#[derive(Debug, Clone)]
pub struct EventDescriptor {
    pub decoder: Decoder,
    pub options: EventOptions,
}

impl EventDescriptor {
    pub fn new(decoder: Decoder) -> Self {
        Self {
            decoder,
            options: EventOptions::default(),
        }
    }

    pub fn with_options(decoder: Decoder, options: EventOptions) -> Self {
        Self { decoder, options }
    }
}

/// Per-node mapping from event name to its handler.
///
/// Names are unique and iteration follows insertion order, which keeps
/// serialized snapshots stable.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    entries: Vec<(String, EventDescriptor)>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `descriptor` under `name`. An existing handler with the same
    /// name is replaced in place and returned.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        descriptor: EventDescriptor,
    ) -> Option<EventDescriptor> {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, descriptor)),
            None => {
                self.entries.push((name, descriptor));
                None
            }
        }
    }

    pub fn on(mut self, name: impl Into<String>, decoder: Decoder) -> Self {
        self.insert(name, EventDescriptor::new(decoder));
        self
    }

    pub fn get(&self, name: &str) -> Option<&EventDescriptor> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, descriptor)| descriptor)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EventDescriptor)> {
        self.entries
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, EventDescriptor)> for EventTable {
    fn from_iter<T: IntoIterator<Item = (S, EventDescriptor)>>(iter: T) -> Self {
        let mut table = EventTable::new();
        for (name, descriptor) in iter {
            table.insert(name, descriptor);
        }
        table
    }
}

/// Returns the decoder registered for `event_name`, or `None` when the node
/// has no handler for that event.
pub fn find_event_decoder<'a>(event_name: &str, events: &'a EventTable) -> Option<&'a Decoder> {
    events.get(event_name).map(|descriptor| &descriptor.decoder)
}
