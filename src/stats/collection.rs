//! Ordered collection view kept in step with the aggregate.
//!
//! Every operation is pure so the caller can feed the same before/after
//! values to the reducer and to the list.

use uuid::Uuid;

use super::descriptor::Tally;

/// Prepend `entity`; the view is newest first.
pub fn insert<T: Tally + Clone>(list: &[T], entity: T) -> Vec<T> {
    let mut next = Vec::with_capacity(list.len() + 1);
    next.push(entity);
    next.extend_from_slice(list);
    next
}

/// Substitute the entity with the same key, keeping its position.
pub fn replace<T: Tally + Clone>(list: &[T], entity: T) -> Vec<T> {
    let key = entity.key();
    list.iter()
        .map(|existing| {
            if existing.key() == key {
                entity.clone()
            } else {
                existing.clone()
            }
        })
        .collect()
}

/// Drop the entity with key `id`.
pub fn remove<T: Tally + Clone>(list: &[T], id: Uuid) -> Vec<T> {
    list.iter().filter(|e| e.key() != id).cloned().collect()
}

pub fn find<T: Tally>(list: &[T], id: Uuid) -> Option<&T> {
    list.iter().find(|e| e.key() == id)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::stats::descriptor::{Dimension, StatusSet};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
    enum Open {
        Yes,
    }

    impl StatusSet for Open {
        const ALL: &'static [Self] = &[Open::Yes];

        fn as_str(self) -> &'static str {
            "yes"
        }

        fn label(self) -> &'static str {
            "Yes"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Uuid,
        text: &'static str,
    }

    impl Tally for Note {
        type Status = Open;

        fn key(&self) -> Uuid {
            self.id
        }

        fn status(&self) -> Open {
            Open::Yes
        }

        fn dimensions() -> &'static [Dimension<Self>] {
            &[]
        }
    }

    fn note(n: u128, text: &'static str) -> Note {
        Note {
            id: Uuid::from_u128(n),
            text,
        }
    }

    #[test]
    fn insert_prepends() {
        let list = vec![note(1, "a"), note(2, "b")];
        let next = insert(&list, note(3, "c"));
        assert_eq!(next.iter().map(|n| n.text).collect::<Vec<_>>(), ["c", "a", "b"]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn replace_preserves_position() {
        let list = vec![note(1, "a"), note(2, "b"), note(3, "c")];
        let next = replace(&list, note(2, "B"));
        assert_eq!(next.iter().map(|n| n.text).collect::<Vec<_>>(), ["a", "B", "c"]);
    }

    #[test]
    fn replace_unknown_key_is_a_no_op() {
        let list = vec![note(1, "a")];
        assert_eq!(replace(&list, note(9, "z")), list);
    }

    #[test]
    fn remove_filters_by_key() {
        let list = vec![note(1, "a"), note(2, "b")];
        let next = remove(&list, Uuid::from_u128(1));
        assert_eq!(next, vec![note(2, "b")]);
        assert_eq!(remove(&next, Uuid::from_u128(7)), next);
    }

    #[test]
    fn find_by_key() {
        let list = vec![note(1, "a"), note(2, "b")];
        assert_eq!(find(&list, Uuid::from_u128(2)).map(|n| n.text), Some("b"));
        assert!(find(&list, Uuid::from_u128(3)).is_none());
    }
}
