/*!
 * Vocabulary corpus and token resolution.
 *
 * - `corpus`: the dictionary/frequency corpus, indexed by headword and reading
 * - `resolver`: two-pass token lookup producing enriched tokens
 */

pub mod corpus;
pub mod resolver;

pub use corpus::{VocabCorpus, VocabEntry};
pub use resolver::{Alternative, CountedToken, EnrichedToken, Resolver};
