pub mod input;
pub mod interaction;
pub mod menu;
pub mod prompt;
pub mod shortcuts;
pub mod snap;

pub use input::{InputEvent, Modifiers, PointerButton};
pub use interaction::{Canvas, CanvasState, Feedback};
pub use menu::{ContextMenu, MenuAction, MenuItem, MenuTarget, menu_items};
pub use prompt::{NoPrompt, Prompt, ScriptedPrompt};
pub use shortcuts::{ShortcutAction, ShortcutMap};
