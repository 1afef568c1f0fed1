//! Class-frequency statistics over a job's per-item results.

use std::collections::BTreeMap;

use crate::detection::Detection;

/// Reduce per-item result lists into a class-name to count histogram.
///
/// A `BTreeMap` keeps iteration (and therefore serialization) order
/// stable, so a completed job's snapshot reads the same on every poll.
pub fn class_frequencies(results: &[Vec<Detection>]) -> BTreeMap<String, u64> {
    let mut stats = BTreeMap::new();
    for detection in results.iter().flatten() {
        *stats.entry(detection.class.clone()).or_insert(0) += 1;
    }
    stats
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn det(class: &str) -> Detection {
        Detection::new(class, [0, 0, 10, 10])
    }

    #[test]
    fn counts_across_items() {
        let results = vec![vec![det("Cat")], vec![det("Cat"), det("Dog")]];
        let stats = class_frequencies(&results);
        assert_eq!(stats.get("Cat"), Some(&2));
        assert_eq!(stats.get("Dog"), Some(&1));
        assert_eq!(stats.len(), 2);
    }

    #[test]
    fn empty_results_give_empty_stats() {
        assert!(class_frequencies(&[]).is_empty());
        assert!(class_frequencies(&[Vec::new(), Vec::new()]).is_empty());
    }

    #[test]
    fn single_class_many_items() {
        let results = vec![vec![det("Cat")]; 5];
        let stats = class_frequencies(&results);
        assert_eq!(stats.get("Cat"), Some(&5));
    }

    #[test]
    fn total_count_matches_detections() {
        let results = vec![
            vec![det("Cat"), det("Dog")],
            Vec::new(),
            vec![det("Bird"), det("Dog"), det("Dog")],
        ];
        let stats = class_frequencies(&results);
        let total: u64 = stats.values().sum();
        let detections: usize = results.iter().map(Vec::len).sum();
        assert_eq!(total, detections as u64);
    }
}
