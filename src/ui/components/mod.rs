pub mod alert;
pub mod challenge_panel;
pub mod header;
pub mod intro;
pub mod keyboard_diagram;
pub mod progress_bar;
pub mod submit_button;
