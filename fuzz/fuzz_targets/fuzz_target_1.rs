#![no_main]

use hopmap::SkipList;
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

// Replays the fuzz input as an insert/remove sequence against a BTreeMap
// oracle, then checks the per-level topology: strictly increasing chains,
// higher levels subsets of lower ones, level 0 equal to the oracle.
fuzz_target!(|data: &[u8]| {
    let mut list = SkipList::new();
    let mut oracle = BTreeMap::new();

    for chunk in data.chunks(2) {
        let key = chunk[0];
        let op = chunk.get(1).copied().unwrap_or(0);

        if op % 5 == 0 {
            assert_eq!(list.remove(&key), oracle.remove(&key).map(|v| (key, v)));
        } else {
            assert_eq!(list.insert(key, op), oracle.insert(key, op));
        }
    }

    assert_eq!(list.len(), oracle.len());
    assert!(oracle.keys().eq(list.level_keys(0)));

    for level in 0..list.level() {
        let keys = list.level_keys(level);
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }
    for level in 1..list.level() {
        let lower = list.level_keys(level - 1);
        for key in list.level_keys(level) {
            assert!(lower.contains(&key));
        }
    }

    for (key, value) in &oracle {
        assert_eq!(list.get(key).map(|e| *e.value()), Some(*value));
    }
});
