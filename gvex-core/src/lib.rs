//! Core library for gvex: expansion of compressed gVCF variant data.
//!
//! gVCF data compresses runs of reference-matching genotype calls into
//! interval blocks instead of one record per position. This crate finds the
//! reference-matching blocks which overlap a SNP and adds their sample
//! genotypes to the variant record, so every expanded SNP carries the calls
//! of all samples covered at that position. Other variant types (insertions,
//! deletions, non-SNP multi-allelic sites) pass through unchanged.
//!
//! The work is split across a mapper and a reducer designed to run under an
//! external distributed shuffle: [`binning::Binner`] assigns each record to
//! fixed-width genome-position bins, and [`expand::GvcfExpander`] consumes
//! the shuffled `(bin key, record)` stream one group at a time with bounded
//! memory.
//!
//! ```
//! use gvex_core::expand::GvcfExpander;
//! use gvex_core::models::{BinKey, Record};
//!
//! let record: Record = serde_json::from_str(
//!     r#"{"reference_name": "13", "start": 4, "end": 5,
//!         "reference_bases": "A", "alternate_bases": ["G"], "call": []}"#,
//! ).unwrap();
//!
//! let mut expander = GvcfExpander::default();
//! let out = expander.consume(BinKey::new("13", 0), record).unwrap();
//! assert!(out.is_empty()); // accumulation never emits on its own
//!
//! let out = expander.finalize().unwrap();
//! assert_eq!(out.len(), 1);
//! ```

pub mod binning;
pub mod consts;
pub mod errors;
pub mod expand;
pub mod filter;
pub mod models;
pub mod utils;
