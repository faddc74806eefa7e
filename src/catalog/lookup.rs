use super::types::EvidenceScore;
use std::collections::HashMap;

/// Evidence indexed by product, then subcriterion.
///
/// Later records for the same pair overwrite earlier ones.
#[derive(Debug, Default)]
pub struct EvidenceIndex<'a> {
    by_product: HashMap<&'a str, HashMap<&'a str, &'a EvidenceScore>>,
}

impl<'a> EvidenceIndex<'a> {
    pub fn new(evidence: &'a [EvidenceScore]) -> Self {
        let mut by_product: HashMap<&str, HashMap<&str, &EvidenceScore>> = HashMap::new();
        for record in evidence {
            by_product
                .entry(record.product_id.as_str())
                .or_default()
                .insert(record.subcriterion_id.as_str(), record);
        }
        Self { by_product }
    }

    pub fn get(&self, product_id: &str, subcriterion_id: &str) -> Option<&'a EvidenceScore> {
        self.by_product
            .get(product_id)
            .and_then(|subs| subs.get(subcriterion_id))
            .copied()
    }

    /// Score for a pair, 0 when no record exists.
    pub fn score_or_zero(&self, product_id: &str, subcriterion_id: &str) -> u8 {
        self.get(product_id, subcriterion_id)
            .map(|r| r.score)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::fixtures::evidence;

    #[test]
    fn test_missing_evidence_is_zero() {
        let records = vec![evidence("p1", "s1", 2)];
        let index = EvidenceIndex::new(&records);
        assert_eq!(index.score_or_zero("p1", "s1"), 2);
        assert_eq!(index.score_or_zero("p1", "s2"), 0);
        assert_eq!(index.score_or_zero("p2", "s1"), 0);
        assert!(index.get("p2", "s1").is_none());
    }

    #[test]
    fn test_duplicate_pair_last_wins() {
        let records = vec![evidence("p1", "s1", 2), evidence("p1", "s1", 1)];
        let index = EvidenceIndex::new(&records);
        assert_eq!(index.score_or_zero("p1", "s1"), 1);
    }
}
