/*!
 * Translation engine for RPG Maker MV data files.
 *
 * The engine is split into several submodules, leaves first:
 *
 * - `client`: Provider wrapper with casing rules and retry
 * - `reflow`: Greedy line wrapping with control-code aware widths
 * - `nodes`: Command node classification
 * - `merger`: Run merging of consecutive text lines
 * - `scheduler`: Concurrent per-container translation and write-back
 * - `records`: Keyed-field translation for database tables
 * - `walker`: Document traversal per file family
 * - `report`: Anomaly log and translated-unit tally
 */

// Re-export main types for easier usage
pub use self::client::{RetryPolicy, TranslationClient, TranslationOutcome};
pub use self::merger::{Run, RunMergerState};
pub use self::nodes::{NodeKind, NodeShape};
pub use self::report::{AnomalyLog, LogEntry, TranslationTally};
pub use self::scheduler::{ContainerMode, TranslationScheduler, Unit};
pub use self::walker::DocumentWalker;

// Submodules
pub mod client;
pub mod merger;
pub mod nodes;
pub mod records;
pub mod reflow;
pub mod report;
pub mod scheduler;
pub mod walker;
