use crate::domain::Cursor;

/// A page request produced by a state transition
///
/// `generation` identifies the session the request belongs to. The result
/// must be reported back with the same generation so that results of
/// superseded sessions can be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest<P> {
    pub generation: u64,
    pub params: P,
    pub cursor: Cursor,
}

/// Change to the accumulated list, published to subscribers as a delta
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange<T> {
    Cleared,
    Appended(Vec<T>),
    Prepended(Vec<T>),
}

impl<T> ListChange<T> {
    /// Apply the change to a published list, returning whether it changed
    pub fn apply(self, list: &mut Vec<T>) -> bool {
        match self {
            ListChange::Cleared => {
                let changed = !list.is_empty();
                list.clear();
                changed
            }
            ListChange::Appended(items) => {
                let changed = !items.is_empty();
                list.extend(items);
                changed
            }
            ListChange::Prepended(mut items) => {
                let changed = !items.is_empty();
                items.append(list);
                *list = items;
                changed
            }
        }
    }
}

/// Side effects requested by `PaginationState::update`
///
/// The state machine is pure; the accumulator service executes these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd<P, T> {
    /// Dispatch a fetch for the given request
    Fetch(FetchRequest<P>),
    /// Publish a change of the accumulated list to subscribers
    EmitItems(ListChange<T>),
}

impl<P, T> Cmd<P, T> {
    pub fn as_fetch(&self) -> Option<&FetchRequest<P>> {
        match self {
            Cmd::Fetch(request) => Some(request),
            Cmd::EmitItems(_) => None,
        }
    }
}
