pub mod dom;
pub mod errors;
pub mod markup;
pub mod memory;
pub mod model;
pub mod page_script;
pub mod ports;
pub mod quirks;

mod runner;

pub use dom::{EditableElement, PageDocument, SyntheticEvent};
pub use errors::{DomError, InjectError};
pub use memory::{DomOp, MemoryDocument, MemoryElement};
pub use model::{InjectOutcome, InjectReport, InjectStep, InjectionRequest, StepError};
pub use ports::{EvaluatingScriptPort, MemoryPageHost, ScriptEvaluator, ScriptPort};
pub use quirks::{EditorQuirks, DEFAULT_RICH_EDITOR_HOSTS};
pub use runner::inject;
