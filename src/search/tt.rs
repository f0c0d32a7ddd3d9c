use shakmaty::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreBound {
    /// Score is the exact evaluation [alpha <= score <= beta]
    Exact,
    /// Score is at least this value, i.e, beta cutoff [score >= beta]
    Lower,
    /// Score is at most this value, i.e, alpha not improved [score <= alpha]
    Upper,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranspositionEntry {
    pub hash: u64,
    pub depth: u8,
    pub score: i32,
    pub bound: ScoreBound,
    pub best_move: Option<Move>,
}

impl Default for TranspositionEntry {
    fn default() -> Self {
        Self {
            hash: 0,
            depth: 0,
            score: 0,
            bound: ScoreBound::Exact,
            best_move: None,
        }
    }
}

/// Fixed-size hash table of search results, indexed by the low bits of the
/// Zobrist key. The full key is stored so an index collision between two
/// different positions reads as a miss rather than a wrong hit.
pub struct TranspositionTable {
    entries: Vec<TranspositionEntry>,
    size: usize,
}

impl TranspositionTable {
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<TranspositionEntry>();
        let num_entries = (size_mb * 1024 * 1024) / entry_size;
        let size = num_entries.next_power_of_two();
        Self {
            entries: vec![TranspositionEntry::default(); size],
            size,
        }
    }

    #[inline(always)]
    fn index(&self, hash: u64) -> usize {
        hash as usize & (self.size - 1)
    }

    pub fn probe(&self, hash: u64) -> Option<TranspositionEntry> {
        let entry = &self.entries[self.index(hash)];
        if entry.hash == hash {
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Always-replace scheme. The newest search result wins the slot.
    pub fn store(&mut self, new_entry: TranspositionEntry) {
        let index = self.index(new_entry.hash);
        self.entries[index] = new_entry;
    }

    pub fn clear(&mut self) {
        self.entries.fill(TranspositionEntry::default());
    }

    /// Occupancy of a leading sample of the table, in per-mille.
    pub fn hash_full(&self) -> u16 {
        let sample = self.size.min(1000);
        let used = self.entries[..sample]
            .iter()
            .filter(|e| e.hash != 0)
            .count();
        ((used * 1000) / sample) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(hash: u64, depth: u8, score: i32) -> TranspositionEntry {
        TranspositionEntry {
            hash,
            depth,
            score,
            bound: ScoreBound::Exact,
            best_move: None,
        }
    }

    #[test]
    fn store_then_probe_round_trips() {
        let mut tt = TranspositionTable::new(1);
        let stored = entry(0xDEAD_BEEF, 5, 42);
        tt.store(stored.clone());
        assert_eq!(tt.probe(0xDEAD_BEEF), Some(stored));
    }

    #[test]
    fn probe_miss_on_empty_table() {
        let tt = TranspositionTable::new(1);
        assert_eq!(tt.probe(0xDEAD_BEEF), None);
    }

    #[test]
    fn index_collision_reads_as_miss() {
        let mut tt = TranspositionTable::new(1);
        let a = 0x1234_5678_9ABC_DEF0u64;
        // Same low bits, different full key.
        let b = a ^ (1u64 << 63);
        tt.store(entry(a, 3, 10));
        assert!(tt.probe(a).is_some());
        assert_eq!(tt.probe(b), None);
    }

    #[test]
    fn newer_entry_replaces_older_regardless_of_depth() {
        let mut tt = TranspositionTable::new(1);
        tt.store(entry(7, 9, 100));
        tt.store(entry(7, 1, -5));
        let got = tt.probe(7).unwrap();
        assert_eq!(got.depth, 1);
        assert_eq!(got.score, -5);
    }

    #[test]
    fn clear_empties_the_table() {
        let mut tt = TranspositionTable::new(1);
        tt.store(entry(7, 2, 1));
        tt.clear();
        assert_eq!(tt.probe(7), None);
        assert_eq!(tt.hash_full(), 0);
    }
}
