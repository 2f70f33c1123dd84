/*!
 * # rpgtl - RPG Maker MV data translator
 *
 * A Rust library for machine translation of RPG Maker MV game data.
 *
 * ## Features
 *
 * - Translate map dialogue, common events and database records
 * - Merge multi-line message boxes into one paragraph per translation
 * - Reflow translations to the message window width, ignoring control codes
 * - Keep every node, key and non-text value of the documents intact
 * - Translate using various providers:
 *   - Google (public translate endpoint)
 *   - Ollama (local LLM)
 *   - OpenAI API and LM Studio
 *   - Anthropic API
 * - Bounded concurrency with fixed-delay retries that never abort a file
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: The translation engine:
 *   - `translation::nodes`: Command node classification
 *   - `translation::merger`: Run merging of consecutive text lines
 *   - `translation::reflow`: Line wrapping
 *   - `translation::client`: Provider wrapper with retries
 *   - `translation::scheduler`: Concurrent per-container translation
 *   - `translation::walker`: Document traversal
 * - `file_utils`: File system operations and document families
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for translation providers
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, FileOutcome, RunSummary};
pub use errors::{AppError, DocumentError, ProviderError, ReflowError, SchemaAnomaly};
pub use file_utils::DocumentFamily;
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t, provider_codes_match};
pub use translation::{DocumentWalker, TranslationClient, TranslationOutcome};
