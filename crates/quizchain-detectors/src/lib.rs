pub mod answer;
pub mod content;
pub mod submit;

pub use answer::{AnswerPipeline, DerivationInput, Rule, RuleOutcome};
pub use submit::{ResolutionStep, ResolvedEndpoint, ResolverInput, SubmitResolver};
