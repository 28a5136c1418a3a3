//! Domain layer: conversation entities and UI state.

pub mod events;
pub mod message;
pub mod message_input_state;
pub mod shell_state;
pub mod thread;
pub mod typing;
pub mod user;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
