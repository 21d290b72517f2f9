use crate::classify::Category;

/// Running keypress tallies. `total` always equals the sum of the
/// per-category slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterState {
    total: u64,
    per_category: [u64; 4],
}

impl CounterState {
    /// Build from per-category values; the total is derived. Callers keep the
    /// sum within `u64`, past that the total saturates.
    pub fn from_parts(letter: u64, number: u64, function_key: u64, other: u64) -> Self {
        let per_category = [letter, number, function_key, other];
        Self {
            total: per_category.iter().fold(0, |acc, v| acc.saturating_add(*v)),
            per_category,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn get(&self, category: Category) -> u64 {
        self.per_category[category.index()]
    }

    /// Count one keypress. A saturated total stops counting.
    pub fn record(&mut self, category: Category) {
        if self.total == u64::MAX {
            return;
        }
        let slot = &mut self.per_category[category.index()];
        *slot = slot.saturating_add(1);
        self.total = self.total.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        Category::ALL.iter().map(|&c| (c, self.get(c)))
    }
}
