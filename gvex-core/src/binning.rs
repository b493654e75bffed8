use crate::consts::DEFAULT_BIN_SIZE;
use crate::errors::ExpandError;
use crate::models::{BinKey, Record};

/// Assigns records to fixed-width genome-position bins ahead of the
/// external shuffle.
///
/// A variant lands in exactly one bin, the bin of its start position; its
/// reference-block matches are drawn from that single bin only. A
/// reference-matching block is duplicated into every bin its interval
/// touches so each bin sees the blocks spanning into it.
#[derive(Debug, Clone)]
pub struct Binner {
    bin_size: u64,
}

impl Binner {
    /// Panics if `bin_size` is zero.
    pub fn new(bin_size: u64) -> Self {
        assert!(bin_size > 0, "bin size must be a positive integer");
        Binner { bin_size }
    }

    /// Compute the `(bin key, record)` pairs for one record. All pairs
    /// borrow the same unmodified record.
    pub fn bin<'a>(&self, record: &'a Record) -> Result<Vec<(BinKey, &'a Record)>, ExpandError> {
        let reference_name = record.reference_name()?;
        let start_bin = record.start()? / self.bin_size;
        let end_bin = if record.is_variant() {
            start_bin
        } else {
            record.end()? / self.bin_size
        };

        Ok((start_bin..=end_bin)
            .map(|bin| (BinKey::new(reference_name, bin), record))
            .collect())
    }
}

impl Default for Binner {
    fn default() -> Self {
        Binner::new(DEFAULT_BIN_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn snp() -> Record {
        serde_json::from_str(
            r#"{
                "reference_name": "13",
                "start": "102265642",
                "end": "102265643",
                "reference_bases": "A",
                "alternate_bases": ["G"],
                "call": [{"call_set_name": "hu52B7E5", "genotype": [1, 0]}]
            }"#,
        )
        .unwrap()
    }

    #[fixture]
    fn spanning_block() -> Record {
        serde_json::from_str(
            r#"{
                "reference_name": "13",
                "start": "102265642",
                "reference_bases": "A",
                "END": "102265842",
                "call": [{"call_set_name": "same_start", "genotype": [0, 0]}]
            }"#,
        )
        .unwrap()
    }

    #[rstest]
    fn test_variant_lands_in_exactly_one_bin(snp: Record) {
        let binner = Binner::default();
        let pairs = binner.bin(&snp).unwrap();

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, BinKey::new("13", 1022656));
        assert_eq!(*pairs[0].1, snp);
    }

    #[rstest]
    fn test_block_is_duplicated_into_every_bin_it_touches(spanning_block: Record) {
        let binner = Binner::default();
        let pairs = binner.bin(&spanning_block).unwrap();

        let keys: Vec<BinKey> = pairs.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            keys,
            vec![
                BinKey::new("13", 1022656),
                BinKey::new("13", 1022657),
                BinKey::new("13", 1022658),
            ]
        );
        for (_, record) in &pairs {
            assert_eq!(**record, spanning_block);
        }
    }

    #[rstest]
    fn test_short_block_stays_in_one_bin() {
        let block: Record = serde_json::from_str(
            r#"{
                "reference_name": "13",
                "start": "102265642",
                "end": "102265645",
                "reference_bases": "TGA",
                "alternate_bases": [],
                "call": [{"call_set_name": "no_call", "genotype": [-1, -1]}]
            }"#,
        )
        .unwrap();

        let pairs = Binner::default().bin(&block).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, BinKey::new("13", 1022656));
    }

    #[rstest]
    fn test_adjacent_positions_straddle_a_bin_boundary() {
        let binner = Binner::new(1000);

        let at_999: Record = serde_json::from_str(
            r#"{"reference_name": "1", "start": 999, "end": 1000,
                "reference_bases": "A", "alternate_bases": ["T"], "call": []}"#,
        )
        .unwrap();
        let at_1000: Record = serde_json::from_str(
            r#"{"reference_name": "1", "start": 1000, "end": 1001,
                "reference_bases": "A", "alternate_bases": ["T"], "call": []}"#,
        )
        .unwrap();

        assert_eq!(binner.bin(&at_999).unwrap()[0].0, BinKey::new("1", 0));
        assert_eq!(binner.bin(&at_1000).unwrap()[0].0, BinKey::new("1", 1));
    }

    #[rstest]
    #[should_panic(expected = "bin size must be a positive integer")]
    fn test_zero_bin_size_is_rejected() {
        Binner::new(0);
    }

    #[rstest]
    fn test_block_without_end_is_fatal() {
        let block: Record = serde_json::from_str(
            r#"{"reference_name": "13", "start": "102265642", "call": []}"#,
        )
        .unwrap();

        assert!(matches!(
            Binner::default().bin(&block),
            Err(ExpandError::MissingField("end"))
        ));
    }
}
