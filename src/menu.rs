//! Menu buttons and click hit-testing
//!
//! The core never draws, but it owns where buttons are so a click can be
//! turned into the same command a key press would give.

use glam::Vec2;

use crate::sim::rect::Rect;
use crate::sim::state::GamePhase;

pub const BUTTON_WIDTH: f32 = 300.0;
pub const BUTTON_HEIGHT: f32 = 60.0;
/// Vertical distance between stacked button centres
pub const BUTTON_GAP: f32 = 80.0;

/// A command a menu screen can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    HighScores,
    Back,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub action: MenuAction,
    pub label: &'static str,
    pub rect: Rect,
}

/// Buttons shown in `phase`, top to bottom
pub fn buttons_for(phase: GamePhase, screen: Vec2) -> Vec<Button> {
    let entries: &[(MenuAction, &'static str)] = match phase {
        GamePhase::Start => &[
            (MenuAction::Play, "Play"),
            (MenuAction::HighScores, "High Scores"),
            (MenuAction::Quit, "Quit"),
        ],
        GamePhase::GameOver => &[
            (MenuAction::Play, "Play Again"),
            (MenuAction::HighScores, "High Scores"),
            (MenuAction::Back, "Main Menu"),
            (MenuAction::Quit, "Quit"),
        ],
        GamePhase::HighScores { .. } => {
            let center = Vec2::new(screen.x / 2.0, screen.y - BUTTON_HEIGHT * 1.5);
            return vec![Button {
                action: MenuAction::Back,
                label: "Back",
                rect: Rect::from_center(center, Vec2::new(BUTTON_WIDTH, BUTTON_HEIGHT)),
            }];
        }
        GamePhase::Playing | GamePhase::Terminated => &[],
    };

    let first = screen / 2.0;
    entries
        .iter()
        .enumerate()
        .map(|(i, &(action, label))| Button {
            action,
            label,
            rect: Rect::from_center(
                first + Vec2::new(0.0, i as f32 * BUTTON_GAP),
                Vec2::new(BUTTON_WIDTH, BUTTON_HEIGHT),
            ),
        })
        .collect()
}

/// Action of the button under `point`, if any
pub fn hit_test(phase: GamePhase, screen: Vec2, point: Vec2) -> Option<MenuAction> {
    buttons_for(phase, screen)
        .into_iter()
        .find(|b| b.rect.contains_point(point))
        .map(|b| b.action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ReturnPhase;

    const SCREEN: Vec2 = Vec2::new(1200.0, 800.0);

    #[test]
    fn test_play_button_is_centred() {
        let buttons = buttons_for(GamePhase::Start, SCREEN);
        assert_eq!(buttons[0].action, MenuAction::Play);
        assert_eq!(buttons[0].rect.center(), Vec2::new(600.0, 400.0));
        assert_eq!(buttons[0].rect.size, Vec2::new(300.0, 60.0));
    }

    #[test]
    fn test_hit_test() {
        assert_eq!(
            hit_test(GamePhase::Start, SCREEN, Vec2::new(600.0, 400.0)),
            Some(MenuAction::Play)
        );
        assert_eq!(
            hit_test(GamePhase::Start, SCREEN, Vec2::new(600.0, 480.0)),
            Some(MenuAction::HighScores)
        );
        assert_eq!(
            hit_test(GamePhase::GameOver, SCREEN, Vec2::new(600.0, 560.0)),
            Some(MenuAction::Back)
        );
        assert_eq!(hit_test(GamePhase::Start, SCREEN, Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_no_buttons_while_playing() {
        assert!(buttons_for(GamePhase::Playing, SCREEN).is_empty());
        assert_eq!(hit_test(GamePhase::Playing, SCREEN, Vec2::new(600.0, 400.0)), None);
    }

    #[test]
    fn test_high_scores_back_button() {
        let phase = GamePhase::HighScores {
            back_to: ReturnPhase::Start,
        };
        let buttons = buttons_for(phase, SCREEN);
        assert_eq!(buttons.len(), 1);
        let center = buttons[0].rect.center();
        assert_eq!(hit_test(phase, SCREEN, center), Some(MenuAction::Back));
    }
}
