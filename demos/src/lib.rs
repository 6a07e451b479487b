// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Helpers shared by the reorder demos.

use std::fmt::Write as _;

use kurbo::Point;
use understory_reorder::ItemId;
use understory_reorder::memory::MemoryList;

/// A [`MemoryList`] whose rows carry printable labels.
#[derive(Clone, Debug)]
pub struct LabeledList {
    /// The rows.
    pub list: MemoryList,
    labels: Vec<(ItemId, String)>,
}

impl LabeledList {
    /// One row of height `extent` per label, all with class `class`.
    pub fn new(class: &str, width: f64, extent: f64, labels: &[&str]) -> Self {
        let mut list = MemoryList::new(width);
        let labels = labels
            .iter()
            .map(|&label| (list.push(class, extent), label.to_owned()))
            .collect();
        Self { list, labels }
    }

    /// Same as [`LabeledList::new`], with a handle of class `handle` on every row.
    pub fn with_handles(
        class: &str,
        handle: &str,
        width: f64,
        extent: f64,
        labels: &[&str],
    ) -> Self {
        let mut list = MemoryList::new(width);
        let labels = labels
            .iter()
            .map(|&label| (list.push_with_handle(class, extent, handle), label.to_owned()))
            .collect();
        Self { list, labels }
    }

    /// The id of the row labeled `label`.
    pub fn id(&self, label: &str) -> Option<ItemId> {
        self.labels.iter().find(|(_, l)| l == label).map(|&(id, _)| id)
    }

    /// The label of row `id`.
    pub fn label(&self, id: ItemId) -> &str {
        self.labels
            .iter()
            .find(|&&(i, _)| i == id)
            .map_or("?", |(_, l)| l.as_str())
    }

    /// Labels in display order.
    pub fn labels(&self) -> Vec<&str> {
        self.list.order().into_iter().map(|id| self.label(id)).collect()
    }

    /// One line: the list state, then the rows with the dragged one bracketed.
    pub fn render(&self) -> String {
        let mut out = format!("{:<30}", self.list.list_state());
        for id in self.list.order() {
            let label = self.label(id);
            if self.list.is_marked(id) {
                let _ = write!(out, " [{label}]");
            } else {
                let _ = write!(out, " {label}");
            }
        }
        out
    }
}

/// `steps` evenly spaced points from `from` (exclusive) to `to` (inclusive).
pub fn drag_path(from: Point, to: Point, steps: usize) -> impl Iterator<Item = Point> {
    let steps = steps.max(1);
    (1..=steps).map(move |i| from.lerp(to, i as f64 / steps as f64))
}
