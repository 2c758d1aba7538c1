//! nRF52840 bindings of the collaborator traits.

pub mod clock;
pub mod front_end;
pub mod input;
pub mod oled;
