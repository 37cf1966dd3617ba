//! Bounded ordered media sets
//!
//! A [`MediaSet`] is the edited image list of one entity. It holds two views:
//! - `current`: what the editor sees, a dense ordered list of [`AssetHandle`]s
//! - `baseline`: the last list the backend confirmed, used only for diffing
//!
//! Nothing here touches the network.

use crate::asset::{AssetHandle, LocalFile, PreviewHandle, Reference};

/// Errors raised by local media set edits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    /// The set already holds `capacity` handles
    #[error("media set is full: capacity {capacity}")]
    CapacityExceeded { capacity: usize },

    /// Index past the end of the set
    #[error("index {index} out of range for media set of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Capacity must be at least one slot
    #[error("media set capacity must be at least 1")]
    InvalidCapacity,
}

/// Ordered, capacity-bounded edit state of an entity's images
///
/// # Invariants
/// - `current.len() <= capacity` after every operation, failed ones included
/// - `current` is dense; removing shifts later handles left
/// - `baseline` only holds persisted references and only changes through
///   [`MediaSet::advance_baseline`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSet {
    capacity: usize,
    baseline: Vec<Reference>,
    current: Vec<AssetHandle>,
}

impl MediaSet {
    /// Create an empty set
    ///
    /// # Errors
    /// Returns `MediaError::InvalidCapacity` for a zero capacity
    pub fn new(capacity: usize) -> Result<Self, MediaError> {
        if capacity == 0 {
            return Err(MediaError::InvalidCapacity);
        }
        Ok(Self {
            capacity,
            baseline: Vec::new(),
            current: Vec::new(),
        })
    }

    /// Create a set from an entity's stored references
    ///
    /// Empty references are unfilled slots and are skipped, so the stored
    /// `["a", "", "b", ""]` loads as `[a, b]`.
    ///
    /// # Errors
    /// - `MediaError::InvalidCapacity` for a zero capacity
    /// - `MediaError::CapacityExceeded` if more than `capacity` references are filled
    pub fn load<I, R>(capacity: usize, references: I) -> Result<Self, MediaError>
    where
        I: IntoIterator<Item = R>,
        R: Into<Reference>,
    {
        let mut set = Self::new(capacity)?;
        let baseline: Vec<Reference> = references
            .into_iter()
            .map(Into::into)
            .filter(|r: &Reference| !r.is_empty())
            .collect();
        if baseline.len() > capacity {
            return Err(MediaError::CapacityExceeded { capacity });
        }
        set.current = baseline.iter().cloned().map(AssetHandle::remote).collect();
        set.baseline = baseline;
        Ok(set)
    }

    /// Stage a local file at the end of the set
    ///
    /// # Errors
    /// Returns `MediaError::CapacityExceeded` if the set is full; the set is
    /// left unchanged.
    pub fn add_local(&mut self, file: LocalFile) -> Result<PreviewHandle, MediaError> {
        if self.is_full() {
            return Err(MediaError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let preview = PreviewHandle::new();
        self.current.push(AssetHandle::PendingLocal { file, preview });
        Ok(preview)
    }

    /// Remove the handle at `index`, closing the gap
    ///
    /// Returns the removed handle so the caller can release its preview.
    ///
    /// # Errors
    /// Returns `MediaError::IndexOutOfRange` if `index >= len()`
    pub fn remove_at(&mut self, index: usize) -> Result<AssetHandle, MediaError> {
        self.check_index(index)?;
        Ok(self.current.remove(index))
    }

    /// Move the handle at `from` so that it ends up at `to`
    ///
    /// # Errors
    /// Returns `MediaError::IndexOutOfRange` if either index is past the end
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), MediaError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from != to {
            let handle = self.current.remove(from);
            self.current.insert(to, handle);
        }
        Ok(())
    }

    /// Read-only view of the current handles, for rendering
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &[AssetHandle] {
        &self.current
    }

    /// Last confirmed persisted references
    #[inline]
    #[must_use]
    pub fn baseline(&self) -> &[Reference] {
        &self.baseline
    }

    /// Maximum number of slots
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of filled slots
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// True when no slot is filled
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// True when another add would be rejected
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.current.len() >= self.capacity
    }

    /// Free slots
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.current.len())
    }

    /// Number of staged files awaiting upload
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.current.iter().filter(|h| h.is_pending()).count()
    }

    /// True when the current list differs from the baseline
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.current.len() != self.baseline.len()
            || self
                .current
                .iter()
                .zip(&self.baseline)
                .any(|(handle, base)| handle.reference() != Some(base))
    }

    /// Record a successful commit
    ///
    /// Both views become `references`; every slot is now persisted.
    ///
    /// # Errors
    /// Returns `MediaError::CapacityExceeded` if `references` does not fit
    pub fn advance_baseline(&mut self, references: Vec<Reference>) -> Result<(), MediaError> {
        if references.len() > self.capacity {
            return Err(MediaError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.current = references.iter().cloned().map(AssetHandle::remote).collect();
        self.baseline = references;
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), MediaError> {
        if index >= self.current.len() {
            return Err(MediaError::IndexOutOfRange {
                index,
                len: self.current.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn file(name: &str) -> LocalFile {
        LocalFile::new(name, "image/jpeg", name.as_bytes().to_vec())
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(MediaSet::new(0), Err(MediaError::InvalidCapacity));
    }

    #[test]
    fn load_skips_unfilled_slots() {
        let set = MediaSet::load(4, ["a", "", "b", ""]).unwrap();
        assert_eq!(set.baseline(), &[Reference::new("a"), Reference::new("b")]);
        assert_eq!(set.len(), 2);
        assert!(!set.is_dirty());
    }

    #[test]
    fn load_rejects_overfull_baseline() {
        let result = MediaSet::load(2, ["a", "b", "c"]);
        assert_eq!(result, Err(MediaError::CapacityExceeded { capacity: 2 }));
    }

    #[test]
    fn add_local_when_full_is_noop() {
        let mut set = MediaSet::load(2, ["a", "b"]).unwrap();
        let before = set.clone();

        let result = set.add_local(file("x"));

        assert_eq!(result, Err(MediaError::CapacityExceeded { capacity: 2 }));
        assert_eq!(set, before);
    }

    #[test]
    fn remove_at_closes_gap() {
        let mut set = MediaSet::load(4, ["a", "b", "c"]).unwrap();
        let removed = set.remove_at(1).unwrap();

        assert_eq!(removed.reference(), Some(&Reference::new("b")));
        let refs: Vec<_> = set.snapshot().iter().filter_map(AssetHandle::reference).collect();
        assert_eq!(refs, vec![&Reference::new("a"), &Reference::new("c")]);
        assert!(set.is_dirty());
    }

    #[test]
    fn remove_at_out_of_range() {
        let mut set = MediaSet::load(4, ["a"]).unwrap();
        assert_eq!(
            set.remove_at(1),
            Err(MediaError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn removed_pending_returns_its_preview() {
        let mut set = MediaSet::new(4).unwrap();
        let preview = set.add_local(file("x")).unwrap();
        let removed = set.remove_at(0).unwrap();
        assert_eq!(removed.preview(), Some(preview));
    }

    #[test]
    fn move_item_reorders() {
        let mut set = MediaSet::load(4, ["a", "b", "c"]).unwrap();
        set.move_item(0, 2).unwrap();

        let refs: Vec<_> = set
            .snapshot()
            .iter()
            .filter_map(|h| h.reference().map(Reference::as_str))
            .collect();
        assert_eq!(refs, vec!["b", "c", "a"]);
        assert!(set.is_dirty());
        assert!(set.move_item(0, 3).is_err());
    }

    #[test]
    fn advance_baseline_persists_everything() {
        let mut set = MediaSet::load(4, ["a"]).unwrap();
        set.add_local(file("x")).unwrap();
        assert_eq!(set.pending_count(), 1);

        set.advance_baseline(vec![Reference::new("a"), Reference::new("x2")])
            .unwrap();

        assert_eq!(set.pending_count(), 0);
        assert!(!set.is_dirty());
        assert_eq!(set.baseline().len(), 2);
    }

    #[derive(Debug, Clone)]
    enum Edit {
        Add,
        Remove(usize),
        Move(usize, usize),
    }

    fn edit() -> impl Strategy<Value = Edit> {
        prop_oneof![
            Just(Edit::Add),
            (0..8usize).prop_map(Edit::Remove),
            (0..8usize, 0..8usize).prop_map(|(a, b)| Edit::Move(a, b)),
        ]
    }

    proptest! {
        #[test]
        fn prop_len_never_exceeds_capacity(
            capacity in 1..6usize,
            edits in proptest::collection::vec(edit(), 0..40)
        ) {
            let mut set = MediaSet::new(capacity).unwrap();
            for (i, e) in edits.into_iter().enumerate() {
                let _ = match e {
                    Edit::Add => set.add_local(file(&format!("f{i}"))).map(|_| ()),
                    Edit::Remove(idx) => set.remove_at(idx).map(|_| ()),
                    Edit::Move(a, b) => set.move_item(a, b),
                };
                prop_assert!(set.len() <= set.capacity());
                prop_assert_eq!(set.remaining(), set.capacity() - set.len());
            }
        }
    }
}
