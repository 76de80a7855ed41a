// Draft tracking: styles and pick arithmetic, the slot grid, drafted state.

pub mod pick;
pub mod slots;
pub mod state;
