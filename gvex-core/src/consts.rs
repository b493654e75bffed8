/// Width of a genome-position bin. The operational pipelines run with 1000;
/// 100 is the historical library default.
pub const DEFAULT_BIN_SIZE: u64 = 100;

/// Field added by [`crate::filter::flag_ambiguous_calls`].
pub const AMBIGUOUS_CALLS_FIELD: &str = "ambiguousCalls";

/// Per-call filter list consulted by [`crate::filter::filter_failing_calls`].
pub const CALL_FILTER_FIELD: &str = "FILTER";

/// The filter value marking a passing call.
pub const PASSING_FILTER: &str = "PASS";
