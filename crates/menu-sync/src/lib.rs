//! Context-menu synchronisation for prompt favorites.
//!
//! [`MenuSynchronizer`] rebuilds the browser's context menu for a URL from the
//! stored settings. [`Coordinator`] is the background side: it reacts to tab,
//! install, message and click events, rebuilding menus and running injections
//! through the [`ScriptPort`](text_injector::ScriptPort).

pub mod coordinator;
pub mod errors;
pub mod menu;
pub mod ports;
pub mod sync;

pub use coordinator::{
    BrowserEvent, ClickOutcome, Coordinator, CoordinatorEvent, CoordinatorEventBus, MenuClick,
    MessageAck, RuntimeMessage, SkipReason, UPDATE_MENU_ACTION,
};
pub use errors::MenuError;
pub use menu::{
    enabled_prompts, plan_menu, MenuEntry, MenuSnapshot, EDITABLE_CONTEXT, NO_CONFIG_MENU_ID, NO_CONFIG_TITLE,
    NO_PROMPTS_MENU_ID, NO_PROMPTS_TITLE, PARENT_MENU_ID, PARENT_TITLE,
};
pub use ports::{ContextMenuPort, Tab, TabsPort};
pub use sync::{ActiveTabRefresher, MenuSynchronizer};
