use std::{collections::VecDeque, fmt};

use crate::record::{CommandId, Record};

/// Read-only view of one of the history stacks, oldest entry first.
pub struct StackView<'a, C> {
    inner: &'a VecDeque<Record<C>>,
}

impl<'a, C> StackView<'a, C> {
    pub(crate) fn new(inner: &'a VecDeque<Record<C>>) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The most recently pushed entry.
    #[must_use]
    pub fn top(&self) -> Option<&'a Record<C>> {
        self.inner.back()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a Record<C>> {
        self.inner.get(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &'a Record<C>> + ExactSizeIterator {
        self.inner.iter()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<CommandId> {
        self.inner.iter().map(Record::id).collect()
    }
}

impl<C> Clone for StackView<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for StackView<'_, C> {}

impl<C> fmt::Debug for StackView<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.inner.iter().map(Record::id))
            .finish()
    }
}

/// Notification emitted synchronously on every stack-affecting operation.
#[derive(Debug)]
pub enum HistoryEvent<'a, C> {
    StackChanged {
        undo: StackView<'a, C>,
        redo: StackView<'a, C>,
    },
    /// Emitted once per `undo` call. `step` is the number of requested steps
    /// that could not be satisfied because the stack ran out.
    Undo {
        step: usize,
        command: Option<&'a Record<C>>,
    },
    /// Emitted once per `redo` call, with the same `step` meaning as `Undo`.
    Redo {
        step: usize,
        command: Option<&'a Record<C>>,
    },
    Destroy,
}

impl<C> HistoryEvent<'_, C> {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            HistoryEvent::StackChanged { .. } => "stack:changed",
            HistoryEvent::Undo { .. } => "history:undo",
            HistoryEvent::Redo { .. } => "history:redo",
            HistoryEvent::Destroy => "history:destroy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerResult {
    Continue,
    /// Remove the handler after this call.
    Unsubscribe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Handler<C> = Box<dyn FnMut(&HistoryEvent<'_, C>) -> HandlerResult + Send>;

pub(crate) struct Listeners<C> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<C>)>,
}

impl<C> Listeners<C> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }

    pub(crate) fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&HistoryEvent<'_, C>) -> HandlerResult + Send + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.handlers.push((id, Box::new(handler)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub, _)| *sub != id);
        self.handlers.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    pub(crate) fn emit(&mut self, event: &HistoryEvent<'_, C>) {
        tracing::trace!(event = event.name(), listeners = self.handlers.len(), "emit");
        self.handlers
            .retain_mut(|(_, handler)| handler(event) == HandlerResult::Continue);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    fn stack(ids: &[u64]) -> VecDeque<Record<()>> {
        ids.iter()
            .map(|&id| Record::new(CommandId::new(id), ()))
            .collect()
    }

    #[test]
    fn test_stack_view() {
        let inner = stack(&[1, 2, 3]);
        let view = StackView::new(&inner);

        assert_eq!(view.len(), 3);
        assert!(!view.is_empty());
        assert_eq!(view.top().map(Record::id), Some(CommandId::new(3)));
        assert_eq!(view.get(0).map(Record::id), Some(CommandId::new(1)));
        assert_eq!(view.ids(), [1, 2, 3].map(CommandId::new));
        assert_eq!(format!("{view:?}"), "[CommandId(1), CommandId(2), CommandId(3)]");
    }

    #[test]
    fn test_event_names() {
        let empty = stack(&[]);
        let view = StackView::new(&empty);
        let events = [
            HistoryEvent::StackChanged { undo: view, redo: view },
            HistoryEvent::Undo { step: 0, command: None },
            HistoryEvent::Redo { step: 0, command: None },
            HistoryEvent::Destroy,
        ];
        let names: Vec<_> = events.iter().map(|event| event.name()).collect();
        assert_eq!(
            names,
            ["stack:changed", "history:undo", "history:redo", "history:destroy"]
        );
    }

    #[test]
    fn test_listeners_unsubscribe_from_handler() {
        let mut listeners = Listeners::<()>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        listeners.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            HandlerResult::Unsubscribe
        });

        listeners.emit(&HistoryEvent::Destroy);
        listeners.emit(&HistoryEvent::Destroy);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn test_listeners_unsubscribe_by_id() {
        let mut listeners = Listeners::<()>::new();
        let id = listeners.subscribe(|_| HandlerResult::Continue);

        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        assert_eq!(listeners.len(), 0);
    }
}
