//! Label rendering and mapping picker output back to items.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::{Picker, Result};

/// Base used for index labels.
pub const DECIMAL: u32 = 10;

/// Number of digits needed to label `n` items: `ceil(log_base(n + 1))`.
///
/// Zero items need zero digits. Bases below 2 are treated as 2.
pub fn digit_width(n: usize, base: u32) -> usize {
    let base = u128::from(base.max(2));
    let target = n as u128 + 1;
    let mut span: u128 = 1;
    let mut width = 0;
    while span < target {
        span *= base;
        width += 1;
    }
    width
}

/// Zero-pad `index` to `width` decimal digits.
pub fn pad_index(index: usize, width: usize) -> String {
    format!("{index:0width$}")
}

/// Items rendered to picker labels for a single invocation.
///
/// The digit width is computed once from the item count so every label in
/// the menu is padded the same way.
pub struct Menu<'a, T> {
    items: &'a [T],
    labels: Vec<String>,
    lookup: HashMap<String, usize>,
    width: usize,
}

impl<'a, T> Menu<'a, T> {
    /// Render every item with `template(item, index, width)`.
    ///
    /// A label that repeats an earlier one is left out; the earlier item keeps it.
    pub fn new<F>(items: &'a [T], template: F) -> Self
    where
        F: Fn(&T, usize, usize) -> String,
    {
        let width = digit_width(items.len(), DECIMAL);
        let mut labels = Vec::with_capacity(items.len());
        let mut lookup = HashMap::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let label = template(item, index, width);
            if lookup.contains_key(&label) {
                debug!(index, %label, "duplicate picker label skipped");
                continue;
            }
            lookup.insert(label.clone(), index);
            labels.push(label);
        }
        Self {
            items,
            labels,
            lookup,
            width,
        }
    }

    /// Digit width used for this menu.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rendered labels in item order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Newline-delimited picker input.
    pub fn input(&self) -> String {
        self.labels.join("\n")
    }

    /// Map picker output back to items by exact label match.
    ///
    /// Lines that match no label are dropped, as are repeats; the result
    /// follows the order of `output`.
    pub fn select(&self, output: &str) -> Vec<&'a T> {
        let mut taken = HashSet::new();
        let mut unknown = 0usize;
        let mut out = Vec::new();
        for line in output.lines() {
            match self.lookup.get(line) {
                Some(&index) => {
                    if taken.insert(index) {
                        out.push(&self.items[index]);
                    }
                }
                None if line.is_empty() => {}
                None => unknown += 1,
            }
        }
        if unknown > 0 {
            warn!(unknown, "picker returned unrecognized lines");
        }
        out
    }
}

/// Present `items` through `picker` and return the selected ones.
pub async fn pick_items<T, F, P>(picker: &P, items: &[T], template: F) -> Result<Vec<T>>
where
    T: Clone,
    F: Fn(&T, usize, usize) -> String,
    P: Picker + ?Sized,
{
    let menu = Menu::new(items, template);
    let output = picker.pick(&menu.input()).await?;
    Ok(menu.select(&output).into_iter().cloned().collect())
}
