pub mod console;
pub mod decision;
pub mod session;

pub use console::ConsoleProvider;
pub use decision::{Decision, DecisionProvider, Prompt, RejectingProvider, ScriptedProvider};
pub use session::{Outcome, RejectKind, Resolution, ResolutionReport, Resolver, SkipReason};
