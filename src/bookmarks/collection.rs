use std::collections::HashMap;

use rand::Rng;

use crate::bookmarks::tree::{collect_all, BookmarkNode, FlatBookmark, PathIndex};
use crate::error::{AppError, Result};

/// How the next bookmark is drawn while avoiding the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Draw once from the `len - 1` entries other than the previous one.
    #[default]
    Bounded,
    /// Draw from all entries, redrawing while the previous one comes up.
    Rejection,
}

impl SelectionStrategy {
    /// Parse the strategy from a config string.
    pub fn from_str(s: &str) -> Self {
        match s {
            "rejection" => SelectionStrategy::Rejection,
            _ => SelectionStrategy::Bounded,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SelectionStrategy::Bounded => "bounded",
            SelectionStrategy::Rejection => "rejection",
        }
    }
}

/// Choose an index in `0..len` that differs from `previous` whenever `len > 1`.
///
/// Returns `None` only for an empty range.
pub fn pick_index<R: Rng + ?Sized>(
    len: usize,
    previous: Option<usize>,
    strategy: SelectionStrategy,
    rng: &mut R,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let prev = match previous {
        Some(prev) if len > 1 && prev < len => prev,
        _ => return Some(rng.gen_range(0..len)),
    };
    let index = match strategy {
        SelectionStrategy::Bounded => {
            let draw = rng.gen_range(0..len - 1);
            if draw >= prev {
                draw + 1
            } else {
                draw
            }
        }
        SelectionStrategy::Rejection => loop {
            let draw = rng.gen_range(0..len);
            if draw != prev {
                break draw;
            }
        },
    };
    Some(index)
}

/// The current triage pass: flattened bookmarks, their paths, and the last one shown.
#[derive(Debug, Default)]
pub struct Collection {
    items: Vec<FlatBookmark>,
    /// Identifier → position in `items`.
    positions: HashMap<String, usize>,
    path_index: PathIndex,
    previous: Option<String>,
    strategy: SelectionStrategy,
}

impl Collection {
    pub fn new(strategy: SelectionStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// Replace the whole collection with the bookmarks under `root`.
    ///
    /// Selection state is reset, so the next pick may be any entry.
    pub fn collect(&mut self, root: &BookmarkNode) -> &[FlatBookmark] {
        let (items, path_index) = collect_all(root);
        self.positions = items
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id.clone(), i))
            .collect();
        self.items = items;
        self.path_index = path_index;
        self.previous = None;
        tracing::info!(count = self.items.len(), "collected bookmarks");
        &self.items
    }

    /// Pick a random bookmark other than the previously shown one.
    pub fn pick_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&FlatBookmark> {
        let previous = self
            .previous
            .as_deref()
            .and_then(|id| self.positions.get(id).copied());
        let index = pick_index(self.items.len(), previous, self.strategy, rng)
            .ok_or(AppError::EmptyCollection)?;
        let chosen = &self.items[index];
        self.previous = Some(chosen.id.clone());
        Ok(chosen)
    }

    /// Drop the bookmark with `id` and its path entry.
    ///
    /// Later entries keep their relative order. Returns `false` when no such
    /// bookmark is in the collection.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        let Some(pos) = self.positions.remove(id) else {
            return false;
        };
        self.items.remove(pos);
        for (i, shifted) in self.items.iter().enumerate().skip(pos) {
            self.positions.insert(shifted.id.clone(), i);
        }
        self.path_index.remove(id);
        true
    }

    #[cfg(test)]
    pub fn items(&self) -> &[FlatBookmark] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identifier of the bookmark shown last, if any since the last collect.
    #[cfg(test)]
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&FlatBookmark> {
        self.positions.get(id).map(|&i| &self.items[i])
    }

    pub fn path_of(&self, id: &str) -> Option<&[String]> {
        self.path_index.get(id).map(Vec::as_slice)
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }
}
