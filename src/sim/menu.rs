//! Pause and debug-tuning menu state
//!
//! Only reachable while paused. The main menu lists session actions; the debug
//! submenu nudges the equipped gun's transform offsets. Nothing here touches
//! score, health or round progress.

use serde::Serialize;

use crate::consts::*;
use crate::tuning::GunConfig;

/// Main pause menu entries, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MenuItem {
    LogOffsets,
    EnterDebug,
    ToggleSpawnMode,
    Restart,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::LogOffsets,
        MenuItem::EnterDebug,
        MenuItem::ToggleSpawnMode,
        MenuItem::Restart,
        MenuItem::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::LogOffsets => "Log Offsets",
            MenuItem::EnterDebug => "Debug Tuning",
            MenuItem::ToggleSpawnMode => "Toggle Spawn Mode",
            MenuItem::Restart => "Restart",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Adjustable gun properties in the debug submenu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DebugItem {
    PosX,
    PosY,
    PosZ,
    RotX,
    RotY,
    RotZ,
    Scale,
    Exit,
}

impl DebugItem {
    pub const ALL: [DebugItem; 8] = [
        DebugItem::PosX,
        DebugItem::PosY,
        DebugItem::PosZ,
        DebugItem::RotX,
        DebugItem::RotY,
        DebugItem::RotZ,
        DebugItem::Scale,
        DebugItem::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DebugItem::PosX => "Pos X",
            DebugItem::PosY => "Pos Y",
            DebugItem::PosZ => "Pos Z",
            DebugItem::RotX => "Rot X",
            DebugItem::RotY => "Rot Y",
            DebugItem::RotZ => "Rot Z",
            DebugItem::Scale => "Scale",
            DebugItem::Exit => "Exit",
        }
    }
}

/// Which controller role produced a menu input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    /// Gun hand trigger
    Next,
    /// Gun hand squeeze
    Previous,
    /// Off hand trigger
    Confirm,
    /// Off hand squeeze
    Back,
}

/// What the session should do after a menu input
#[derive(Debug, Clone, PartialEq)]
pub enum MenuCommand {
    None,
    Resume,
    LogOffsets(String),
    ToggleSpawnMode,
    Restart,
    Quit,
    GunAdjusted,
}

#[derive(Debug, Clone, Default)]
pub struct PauseMenu {
    /// Debug submenu open
    pub debug: bool,
    pub selected: usize,
    pub selected_debug: usize,
}

impl PauseMenu {
    /// Back to the first main-menu entry
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn selected_item(&self) -> MenuItem {
        MenuItem::ALL[self.selected % MenuItem::ALL.len()]
    }

    pub fn selected_debug_item(&self) -> DebugItem {
        DebugItem::ALL[self.selected_debug % DebugItem::ALL.len()]
    }

    fn cycle(&mut self, forward: bool) {
        let (index, len) = if self.debug {
            (&mut self.selected_debug, DebugItem::ALL.len())
        } else {
            (&mut self.selected, MenuItem::ALL.len())
        };
        *index = if forward {
            (*index + 1) % len
        } else {
            (*index + len - 1) % len
        };
        if self.debug {
            log::debug!("Debug menu: {}", self.selected_debug_item().label());
        } else {
            log::debug!("Menu: {}", self.selected_item().label());
        }
    }

    /// Apply one input. `gun` is the equipped gun, if any, for debug edits.
    pub fn handle_input(&mut self, input: MenuInput, gun: Option<&mut GunConfig>) -> MenuCommand {
        match input {
            MenuInput::Next => {
                self.cycle(true);
                MenuCommand::None
            }
            MenuInput::Previous => {
                self.cycle(false);
                MenuCommand::None
            }
            MenuInput::Confirm if self.debug => self.debug_step(gun, 1.0),
            MenuInput::Back if self.debug => self.debug_step(gun, -1.0),
            MenuInput::Confirm => self.activate(gun),
            MenuInput::Back => MenuCommand::Resume,
        }
    }

    fn activate(&mut self, gun: Option<&mut GunConfig>) -> MenuCommand {
        match self.selected_item() {
            MenuItem::LogOffsets => match gun {
                Some(gun) => {
                    let text = format_offsets(gun);
                    log::info!("{}", text);
                    MenuCommand::LogOffsets(text)
                }
                None => MenuCommand::None,
            },
            MenuItem::EnterDebug => {
                self.debug = true;
                self.selected_debug = 0;
                MenuCommand::None
            }
            MenuItem::ToggleSpawnMode => MenuCommand::ToggleSpawnMode,
            MenuItem::Restart => MenuCommand::Restart,
            MenuItem::Quit => MenuCommand::Quit,
        }
    }

    fn debug_step(&mut self, gun: Option<&mut GunConfig>, sign: f32) -> MenuCommand {
        let item = self.selected_debug_item();
        if item == DebugItem::Exit {
            self.debug = false;
            return MenuCommand::None;
        }
        match gun {
            Some(gun) => {
                adjust(gun, item, sign);
                MenuCommand::GunAdjusted
            }
            None => MenuCommand::None,
        }
    }
}

/// Nudge one property by a fixed step in the direction of `sign`
pub fn adjust(gun: &mut GunConfig, item: DebugItem, sign: f32) {
    match item {
        DebugItem::PosX => gun.position_offset.x += sign * POSITION_STEP,
        DebugItem::PosY => gun.position_offset.y += sign * POSITION_STEP,
        DebugItem::PosZ => gun.position_offset.z += sign * POSITION_STEP,
        DebugItem::RotX => gun.rotation_offset.x += sign * ROTATION_STEP,
        DebugItem::RotY => gun.rotation_offset.y += sign * ROTATION_STEP,
        DebugItem::RotZ => gun.rotation_offset.z += sign * ROTATION_STEP,
        DebugItem::Scale => gun.scale = (gun.scale + sign * SCALE_STEP).max(MIN_SCALE),
        DebugItem::Exit => {}
    }
}

/// Current offsets in a copy-pasteable form (rotations in degrees)
pub fn format_offsets(gun: &GunConfig) -> String {
    let p = gun.position_offset;
    let r = gun.rotation_offset;
    format!(
        "{}: scale={:.3} position=({:.3}, {:.3}, {:.3}) rotation=({:.1}, {:.1}, {:.1})",
        gun.name,
        gun.scale,
        p.x,
        p.y,
        p.z,
        r.x.to_degrees(),
        r.y.to_degrees(),
        r.z.to_degrees()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn pistol() -> GunConfig {
        Tuning::default().guns[0].clone()
    }

    #[test]
    fn test_cycle_wraps_both_ways() {
        let mut menu = PauseMenu::default();
        menu.handle_input(MenuInput::Previous, None);
        assert_eq!(menu.selected_item(), MenuItem::Quit);
        menu.handle_input(MenuInput::Next, None);
        assert_eq!(menu.selected_item(), MenuItem::LogOffsets);
    }

    #[test]
    fn test_back_resumes_from_main_menu() {
        let mut menu = PauseMenu::default();
        assert_eq!(menu.handle_input(MenuInput::Back, None), MenuCommand::Resume);
    }

    #[test]
    fn test_debug_adjust_and_exit() {
        let mut gun = pistol();
        let start_x = gun.position_offset.x;
        let mut menu = PauseMenu::default();
        menu.handle_input(MenuInput::Next, None);
        assert_eq!(menu.selected_item(), MenuItem::EnterDebug);
        menu.handle_input(MenuInput::Confirm, Some(&mut gun));
        assert!(menu.debug);

        assert_eq!(
            menu.handle_input(MenuInput::Confirm, Some(&mut gun)),
            MenuCommand::GunAdjusted
        );
        assert!((gun.position_offset.x - start_x - POSITION_STEP).abs() < 1e-6);

        // Previous from PosX wraps to Exit
        menu.handle_input(MenuInput::Previous, None);
        assert_eq!(menu.selected_debug_item(), DebugItem::Exit);
        menu.handle_input(MenuInput::Back, Some(&mut gun));
        assert!(!menu.debug);
        assert_eq!(menu.selected_item(), MenuItem::EnterDebug);
    }

    #[test]
    fn test_scale_floor() {
        let mut gun = pistol();
        gun.scale = 0.0015;
        adjust(&mut gun, DebugItem::Scale, -1.0);
        assert_eq!(gun.scale, MIN_SCALE);
        adjust(&mut gun, DebugItem::Scale, -1.0);
        assert_eq!(gun.scale, MIN_SCALE);
    }

    #[test]
    fn test_rotation_step_is_five_degrees() {
        let mut gun = pistol();
        adjust(&mut gun, DebugItem::RotY, 1.0);
        assert!((gun.rotation_offset.y.to_degrees() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_log_offsets_text() {
        let gun = pistol();
        let mut menu = PauseMenu::default();
        let mut copy = gun.clone();
        match menu.handle_input(MenuInput::Confirm, Some(&mut copy)) {
            MenuCommand::LogOffsets(text) => {
                assert!(text.starts_with("Pistol: scale=0.035"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(copy, gun);
    }
}
