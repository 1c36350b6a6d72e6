use std::collections::BTreeMap;

/// Occurrence counts per byte of an input buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u64>,
    total: u64,
}

impl FrequencyTable {
    /// Count every byte of `bytes`, control characters and line terminators included.
    pub fn analyze(bytes: &[u8]) -> Self {
        let counts: BTreeMap<u8, u64> = bytes.iter()
            .copied()
            .fold(BTreeMap::new(), |mut acc, byte| {
                *acc.entry(byte).or_insert(0) += 1;
                acc
            });

        FrequencyTable {
            counts,
            total: bytes.len() as u64,
        }
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// Relative frequency of `symbol`, in (0, 1] for present symbols and 0 otherwise.
    pub fn frequency(&self, symbol: u8) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(symbol) as f64 / self.total as f64
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// (symbol, count) pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}

impl From<&[u8]> for FrequencyTable {
    fn from(bytes: &[u8]) -> Self {
        FrequencyTable::analyze(bytes)
    }
}

/// Builds a table from explicit counts. Zero counts are dropped.
impl FromIterator<(u8, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        let mut total = 0;
        for (symbol, count) in iter {
            if count == 0 {
                continue;
            }
            *counts.entry(symbol).or_insert(0) += count;
            total += count;
        }
        FrequencyTable { counts, total }
    }
}
