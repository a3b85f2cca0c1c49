pub mod player_panel;
pub mod side_panel;
