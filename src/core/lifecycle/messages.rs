//=========================================================================
// Lifecycle Messages
//=========================================================================
//
// Marker events published on the bus to request lifecycle changes.
//
//=========================================================================

/// Ends the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuitApplication;

/// Switches from gameplay to the menu scene set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadMenu;

/// Switches from the menu to the gameplay scene set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadGameplay;

/// Reloads everything and returns to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestartApplication;
