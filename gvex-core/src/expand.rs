use std::collections::BTreeMap;
use std::mem;

use serde_json::Value;

use crate::consts::DEFAULT_BIN_SIZE;
use crate::errors::ExpandError;
use crate::models::{BinKey, Record, call_set_name};

/// Options fixed at construction time.
#[derive(Debug, Clone)]
pub struct ExpanderConfig {
    /// Width of a genome-position bin; must match the mapper's.
    pub bin_size: u64,
    /// When set, a sample already called in a variant never receives a
    /// second reference entry for that variant. Naive: does not compare
    /// call quality between the variant call and the reference call.
    pub filter_ref_matches: bool,
    /// When set, each reference block is also emitted unmodified, exactly
    /// once, from the bin where it starts.
    pub emit_ref_blocks: bool,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        ExpanderConfig {
            bin_size: DEFAULT_BIN_SIZE,
            filter_ref_matches: false,
            emit_ref_blocks: true,
        }
    }
}

/// The most recent reference block seen for one sample, with its interval
/// pre-parsed so the overlap loop is infallible.
#[derive(Debug)]
struct SampleRef {
    start: u64,
    end: u64,
    block: Record,
}

/// Streaming reducer over `(bin key, record)` pairs.
///
/// The external shuffle guarantees that all pairs sharing a key arrive
/// contiguously; within a key this expander sorts for itself. Records for
/// the current key are accumulated, and the group is expanded when the key
/// changes or on [`GvcfExpander::finalize`]. Memory is bounded by one
/// group plus the per-sample reference-block map; no more than one key's
/// records are ever buffered.
#[derive(Debug, Default)]
pub struct GvcfExpander {
    config: ExpanderConfig,
    current_key: Option<BinKey>,
    binned_records: Vec<Record>,
    sample_refs: BTreeMap<String, SampleRef>,
}

impl GvcfExpander {
    /// Panics if `config.bin_size` is zero.
    pub fn new(config: ExpanderConfig) -> Self {
        assert!(
            config.bin_size > 0,
            "bin size must be a positive integer"
        );
        GvcfExpander {
            config,
            current_key: None,
            binned_records: Vec::new(),
            sample_refs: BTreeMap::new(),
        }
    }

    /// Feed one pair from the shuffled stream. Returns the expanded output
    /// of the *previous* key when `key` opens a new group, otherwise
    /// nothing: accumulation never emits on its own.
    pub fn consume(&mut self, key: BinKey, record: Record) -> Result<Vec<Record>, ExpandError> {
        let mut expanded = Vec::new();

        let same_key = self.current_key.as_ref() == Some(&key);
        if !same_key {
            if self.current_key.is_some() {
                expanded = self.flush_current()?;
            }
            self.current_key = Some(key);
        }

        self.binned_records.push(record);
        Ok(expanded)
    }

    /// Flush whatever key is still open. Must be called exactly once after
    /// the input stream is exhausted; only then is the last group's data
    /// guaranteed to be emitted.
    pub fn finalize(&mut self) -> Result<Vec<Record>, ExpandError> {
        self.flush_current()
    }

    fn flush_current(&mut self) -> Result<Vec<Record>, ExpandError> {
        let bin = match self.current_key.take() {
            Some(key) => key.bin,
            None => return Ok(Vec::new()),
        };

        let expanded = self.expand_group(bin)?;
        self.sample_refs.clear();
        Ok(expanded)
    }

    fn expand_group(&mut self, current_bin: u64) -> Result<Vec<Record>, ExpandError> {
        let mut group: Vec<(u64, usize, Record)> = mem::take(&mut self.binned_records)
            .into_iter()
            .map(|record| Ok((record.start()?, record.alternate_bases().len(), record)))
            .collect::<Result<_, ExpandError>>()?;

        // Ascending start; at equal start, reference blocks (zero alternate
        // alleles) strictly before variants so a block beginning at a
        // variant's exact position is visible when the variant expands.
        group.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut expanded = Vec::new();
        for (start, _, record) in group {
            if record.is_variant() {
                expanded.push(self.expand_variant(record)?);
            } else {
                // Emit only from the bin where the block starts, so a block
                // spanning several bins appears once in the overall output.
                if self.config.emit_ref_blocks && start / self.config.bin_size == current_bin {
                    expanded.push(record.clone());
                }
                self.accumulate_block(record)?;
            }
        }

        Ok(expanded)
    }

    /// Stash the block as its sample's current reference interval. The
    /// group is processed in ascending start order, so a plain overwrite
    /// retains exactly the most recent block per sample.
    fn accumulate_block(&mut self, block: Record) -> Result<(), ExpandError> {
        let sample = block.first_call_set_name()?.to_string();
        let entry = SampleRef {
            start: block.start()?,
            end: block.end()?,
            block,
        };
        self.sample_refs.insert(sample, entry);
        Ok(())
    }

    fn expand_variant(&mut self, mut variant: Record) -> Result<Record, ExpandError> {
        // Only SNPs are expanded. Indels and other variant types pass
        // through untouched.
        if !variant.is_snp() {
            return Ok(variant);
        }

        let position = variant.start()?;

        let mut expansion_calls: Vec<Value> = Vec::new();
        self.sample_refs.retain(|_, sample_ref| {
            // Unit-point overlap test, correct for SNPs only; supporting
            // indels would need interval overlap on the variant's own span.
            if sample_ref.start <= position && sample_ref.end >= position + 1 {
                expansion_calls.extend(sample_ref.block.calls().iter().cloned());
                true
            } else {
                // Later variants in this group start at or after `position`,
                // so a block that fails here can never overlap again. Evict
                // now; this eager delete is what keeps the map bounded.
                false
            }
        });

        if self.config.filter_ref_matches {
            let existing: Vec<String> = variant
                .call_set_names()?
                .into_iter()
                .map(str::to_string)
                .collect();
            let mut deduped = Vec::with_capacity(expansion_calls.len());
            for call in expansion_calls {
                let name =
                    call_set_name(&call).ok_or(ExpandError::MissingField("call_set_name"))?;
                if !existing.iter().any(|e| e == name) {
                    deduped.push(call);
                }
            }
            variant.extend_calls(deduped)?;
        } else {
            variant.extend_calls(expansion_calls)?;
        }

        Ok(variant)
    }
}
