use std::rc::Rc;

use log::debug;
use yew::functional::Reducible;

use crate::config::AppConfig;
use crate::deck::{Deck, PointerDown};
use crate::gallery::Gallery;
use crate::gesture::{Direction, KeyCommand};
use crate::profiles::Profile;

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub config: AppConfig,
    pub deck: Deck,
    pub gallery: Option<Gallery>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Reset(Vec<Profile>),
    PointerDown {
        card_id: String,
        pointer_id: i32,
        x: f64,
        y: f64,
        time_ms: f64,
    },
    PointerMove {
        pointer_id: i32,
        x: f64,
        y: f64,
    },
    PointerUp {
        pointer_id: i32,
        x: f64,
        y: f64,
    },
    PointerCancel {
        pointer_id: i32,
    },
    Key {
        card_id: String,
        key: String,
    },
    DismissTop(Direction),
    TransitionFinished {
        card_id: String,
    },
    CloseGallery,
}

impl AppState {
    pub fn new(config: AppConfig, profiles: Vec<Profile>) -> Self {
        let mut deck = Deck::new(config.gesture);
        deck.reset(profiles);
        Self {
            config,
            deck,
            gallery: None,
        }
    }

    pub fn apply(&mut self, action: AppAction) {
        match action {
            AppAction::Reset(profiles) => {
                self.deck.reset(profiles);
                self.gallery = None;
            }
            AppAction::PointerDown {
                card_id,
                pointer_id,
                x,
                y,
                time_ms,
            } => {
                if self.deck.pointer_down(&card_id, pointer_id, x, y, time_ms)
                    == PointerDown::OpenGallery
                {
                    self.open_gallery(&card_id);
                }
            }
            AppAction::PointerMove { pointer_id, x, y } => {
                self.deck.pointer_move(pointer_id, x, y);
            }
            AppAction::PointerUp { pointer_id, x, y } => {
                if let Some(release) = self.deck.pointer_up(pointer_id, x, y) {
                    debug!("Pointer {} released: {:?}", pointer_id, release);
                }
            }
            AppAction::PointerCancel { pointer_id } => {
                self.deck.pointer_cancel(pointer_id);
            }
            AppAction::Key { card_id, key } => {
                if !self.deck.is_top(&card_id) {
                    return;
                }
                match KeyCommand::from_key(&key) {
                    Some(KeyCommand::Dismiss(direction)) => {
                        self.deck.dismiss(&card_id, direction);
                    }
                    Some(KeyCommand::OpenGallery) => self.open_gallery(&card_id),
                    None => {}
                }
            }
            AppAction::DismissTop(direction) => {
                self.deck.dismiss_top(direction);
            }
            AppAction::TransitionFinished { card_id } => {
                self.deck.finish_transition(&card_id);
            }
            AppAction::CloseGallery => self.gallery = None,
        }
    }

    fn open_gallery(&mut self, card_id: &str) {
        if let Some(profile) = self.deck.profile(card_id) {
            self.gallery = Some(Gallery::for_profile(profile));
        }
    }
}

impl Reducible for AppState {
    type Action = AppAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::generate_profiles_with;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn state(count: usize) -> AppState {
        let mut rng = StdRng::seed_from_u64(1);
        AppState::new(AppConfig::default(), generate_profiles_with(&mut rng, count))
    }

    fn top_id(state: &AppState) -> String {
        state
            .deck
            .top()
            .map(|card| card.id().to_string())
            .unwrap_or_default()
    }

    fn key(card_id: &str, key: &str) -> AppAction {
        AppAction::Key {
            card_id: card_id.to_string(),
            key: key.to_string(),
        }
    }

    fn finish(card_id: &str) -> AppAction {
        AppAction::TransitionFinished {
            card_id: card_id.to_string(),
        }
    }

    #[test]
    fn reduce_produces_new_state() {
        let initial = Rc::new(state(3));
        let next = initial.clone().reduce(AppAction::DismissTop(Direction::Right));
        assert_eq!(initial.deck.active().len(), 3);
        assert_eq!(next.deck.active().len(), 2);
    }

    #[test]
    fn arrow_keys_only_work_on_top_card() {
        let mut state = state(3);
        let bottom = state.deck.cards()[0].id().to_string();

        state.apply(key(&bottom, "ArrowLeft"));
        assert_eq!(state.deck.active().len(), 3);

        let top = top_id(&state);
        state.apply(key(&top, "ArrowLeft"));
        assert_eq!(state.deck.active().len(), 2);
    }

    #[test]
    fn enter_opens_gallery_and_close_hides_it() {
        let mut state = state(2);
        let top = top_id(&state);

        state.apply(key(&top, "Enter"));
        let gallery = state.gallery.clone().expect("gallery open");
        assert_eq!(gallery.profile_id, top);
        assert_eq!(gallery.images.len(), 3);

        state.apply(AppAction::CloseGallery);
        assert!(state.gallery.is_none());
    }

    #[test]
    fn double_tap_opens_gallery() {
        let mut state = state(2);
        let top = top_id(&state);
        let down = |time_ms| AppAction::PointerDown {
            card_id: top.clone(),
            pointer_id: 1,
            x: 10.0,
            y: 10.0,
            time_ms,
        };

        state.apply(down(100.0));
        state.apply(AppAction::PointerUp {
            pointer_id: 1,
            x: 10.0,
            y: 10.0,
        });
        assert!(state.gallery.is_none());

        state.apply(down(250.0));
        assert_eq!(state.gallery.as_ref().map(|g| g.profile_id.clone()), Some(top));
    }

    #[test]
    fn button_and_key_racing_dismiss_only_once() {
        let mut state = state(3);
        let top = top_id(&state);

        state.apply(AppAction::DismissTop(Direction::Right));
        state.apply(key(&top, "ArrowUp"));
        state.apply(AppAction::DismissTop(Direction::Left));

        assert_eq!(state.deck.active().len(), 2);
    }

    #[test]
    fn exhausting_and_shuffling() {
        let mut state = state(2);
        for _ in 0..2 {
            let top = top_id(&state);
            state.apply(AppAction::DismissTop(Direction::Left));
            assert!(!state.deck.is_exhausted());
            state.apply(finish(&top));
        }
        assert!(state.deck.is_exhausted());
        assert!(state.deck.active().is_empty());

        let mut rng = StdRng::seed_from_u64(2);
        state.apply(AppAction::Reset(generate_profiles_with(&mut rng, 12)));
        assert!(!state.deck.is_exhausted());
        assert_eq!(state.deck.cards().len(), 12);
    }

    #[test]
    fn vertical_drag_super_likes() {
        let mut state = state(2);
        let top = top_id(&state);

        state.apply(AppAction::PointerDown {
            card_id: top.clone(),
            pointer_id: 9,
            x: 100.0,
            y: 400.0,
            time_ms: 0.0,
        });
        state.apply(AppAction::PointerMove {
            pointer_id: 9,
            x: 100.0,
            y: 320.0,
        });
        state.apply(AppAction::PointerUp {
            pointer_id: 9,
            x: 100.0,
            y: 280.0,
        });

        assert_eq!(state.deck.leaving_ids(), vec![top]);
        assert_eq!(state.deck.active().len(), 1);
    }
}
