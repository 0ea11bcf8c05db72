pub mod card;
pub mod dialog;
pub mod help;
pub mod status_bar;
