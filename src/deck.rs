use std::rc::Rc;

use log::{debug, info};

use crate::gesture::{
    classify_release, is_double_tap, Direction, DragSession, GestureConfig, Release,
};
use crate::profiles::Profile;

#[derive(Debug, Clone, PartialEq)]
pub enum CardPhase {
    Idle,
    Dragging(DragSession),
    SnappingBack,
    Leaving(Direction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    profile: Rc<Profile>,
    phase: CardPhase,
    last_tap_ms: Option<f64>,
}

impl Card {
    fn new(profile: Rc<Profile>) -> Self {
        Self {
            profile,
            phase: CardPhase::Idle,
            last_tap_ms: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.profile.id
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn phase(&self) -> &CardPhase {
        &self.phase
    }

    pub fn is_leaving(&self) -> bool {
        matches!(self.phase, CardPhase::Leaving(_))
    }

    fn drag_session(&self) -> Option<&DragSession> {
        match &self.phase {
            CardPhase::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// Ends an in-flight drag without dismissing. A card that never moved goes
    /// straight back to idle since no transition will fire for it.
    fn settle(&mut self) {
        if let CardPhase::Dragging(session) = &self.phase {
            let (dx, dy) = session.delta();
            self.phase = if dx == 0.0 && dy == 0.0 {
                CardPhase::Idle
            } else {
                CardPhase::SnappingBack
            };
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDown {
    OpenGallery,
    DragStarted,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Settled,
    Removed { exhausted: bool },
}

/// The card stack and the set of profiles still in play.
///
/// `cards` mirrors the rendered stack (bottom first) and still holds cards
/// that are flying out; `active` only holds profiles that have not been
/// dismissed. The last card is the top card and the only interactive one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Deck {
    cards: Vec<Card>,
    active: Vec<Rc<Profile>>,
    config: GestureConfig,
}

impl Deck {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            cards: Vec::new(),
            active: Vec::new(),
            config,
        }
    }

    pub fn reset(&mut self, profiles: Vec<Profile>) {
        self.active = profiles.into_iter().map(Rc::new).collect();
        self.cards = self.active.iter().cloned().map(Card::new).collect();
        info!("Dealt a fresh deck of {} profiles", self.active.len());
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn active(&self) -> &[Rc<Profile>] {
        &self.active
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.find(id).map(|index| self.cards[index].profile())
    }

    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn is_top(&self, id: &str) -> bool {
        self.top().map(|card| card.id() == id).unwrap_or(false)
    }

    pub fn tab_index(&self, id: &str) -> i32 {
        if self.is_top(id) {
            0
        } else {
            -1
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn leaving_ids(&self) -> Vec<String> {
        self.cards
            .iter()
            .filter(|card| card.is_leaving())
            .map(|card| card.id().to_string())
            .collect()
    }

    pub fn dismiss_top(&mut self, direction: Direction) -> bool {
        let Some(id) = self.top().map(|card| card.id().to_string()) else {
            return false;
        };
        self.dismiss(&id, direction)
    }

    /// Starts the exit of `id`. Only the top card is eligible, and a card that
    /// is already leaving is left alone.
    pub fn dismiss(&mut self, id: &str, direction: Direction) -> bool {
        if !self.is_top(id) {
            return false;
        }
        let Some(card) = self.cards.last_mut() else {
            return false;
        };
        if card.is_leaving() {
            return false;
        }

        card.phase = CardPhase::Leaving(direction);
        self.active.retain(|profile| profile.id != id);
        debug!("Dismissed {} to the {}", id, direction.label());
        true
    }

    /// Called once the card's CSS transition has finished.
    pub fn finish_transition(&mut self, id: &str) -> Option<TransitionOutcome> {
        let index = self.find(id)?;
        let phase = self.cards[index].phase.clone();
        match phase {
            CardPhase::Leaving(_) => {
                self.cards.remove(index);
                let exhausted = self.cards.is_empty();
                if exhausted {
                    info!("Deck exhausted");
                }
                Some(TransitionOutcome::Removed { exhausted })
            }
            CardPhase::SnappingBack => {
                self.cards[index].phase = CardPhase::Idle;
                Some(TransitionOutcome::Settled)
            }
            _ => None,
        }
    }

    pub fn pointer_down(
        &mut self,
        id: &str,
        pointer_id: i32,
        x: f64,
        y: f64,
        now_ms: f64,
    ) -> PointerDown {
        let config = self.config;
        let drag_in_progress = self.dragging_index().is_some();
        let is_top = self.is_top(id);
        let Some(index) = self.find(id) else {
            return PointerDown::Ignored;
        };
        let card = &mut self.cards[index];

        if is_double_tap(card.last_tap_ms, now_ms, &config) {
            card.last_tap_ms = None;
            card.settle();
            return PointerDown::OpenGallery;
        }
        card.last_tap_ms = Some(now_ms);

        if !is_top || card.is_leaving() || drag_in_progress {
            return PointerDown::Ignored;
        }

        card.phase = CardPhase::Dragging(DragSession::start(pointer_id, x, y));
        PointerDown::DragStarted
    }

    pub fn pointer_move(&mut self, pointer_id: i32, x: f64, y: f64) -> bool {
        let Some(index) = self.dragging_index_for(pointer_id) else {
            return false;
        };
        if let CardPhase::Dragging(session) = &mut self.cards[index].phase {
            session.move_to(x, y);
            return true;
        }
        false
    }

    pub fn pointer_up(&mut self, pointer_id: i32, x: f64, y: f64) -> Option<Release> {
        let index = self.dragging_index_for(pointer_id)?;
        let card = &mut self.cards[index];
        let (dx, dy) = match &mut card.phase {
            CardPhase::Dragging(session) => {
                session.move_to(x, y);
                session.delta()
            }
            _ => return None,
        };

        let release = classify_release(dx, dy, &self.config);
        let id = card.id().to_string();
        match release {
            Release::Dismiss(direction) if self.dismiss(&id, direction) => {}
            _ => self.cards[index].settle(),
        }
        Some(release)
    }

    /// A cancelled pointer always snaps the card back.
    pub fn pointer_cancel(&mut self, pointer_id: i32) -> bool {
        let Some(index) = self.dragging_index_for(pointer_id) else {
            return false;
        };
        self.cards[index].settle();
        true
    }

    fn find(&self, id: &str) -> Option<usize> {
        self.cards.iter().position(|card| card.id() == id)
    }

    fn dragging_index(&self) -> Option<usize> {
        self.cards
            .iter()
            .position(|card| card.drag_session().is_some())
    }

    fn dragging_index_for(&self, pointer_id: i32) -> Option<usize> {
        self.cards.iter().position(|card| {
            card.drag_session()
                .map(|session| session.pointer_id == pointer_id)
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::generate_profiles_with;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dealt(count: usize) -> Deck {
        let mut rng = StdRng::seed_from_u64(42);
        let mut deck = Deck::new(GestureConfig::default());
        deck.reset(generate_profiles_with(&mut rng, count));
        deck
    }

    fn active_ids(deck: &Deck) -> Vec<String> {
        deck.active().iter().map(|p| p.id.clone()).collect()
    }

    fn top_id(deck: &Deck) -> String {
        deck.top().map(|c| c.id().to_string()).unwrap_or_default()
    }

    fn focusable_count(deck: &Deck) -> usize {
        deck.cards()
            .iter()
            .filter(|c| deck.tab_index(c.id()) == 0)
            .count()
    }

    #[test]
    fn only_top_card_is_focusable() {
        let deck = dealt(5);
        assert_eq!(focusable_count(&deck), 1);
        assert_eq!(deck.tab_index(&top_id(&deck)), 0);
        assert_eq!(deck.tab_index(deck.cards()[0].id()), -1);
    }

    #[test]
    fn dismiss_removes_one_profile_and_keeps_order() {
        let mut deck = dealt(5);
        let before = active_ids(&deck);

        assert!(deck.dismiss_top(Direction::Right));

        let after = active_ids(&deck);
        assert_eq!(after.len(), 4);
        assert_eq!(after, before[..4].to_vec());
    }

    #[test]
    fn promotion_after_exit_transition() {
        let mut deck = dealt(3);
        let leaving = top_id(&deck);
        let next = deck.cards()[1].id().to_string();

        deck.dismiss_top(Direction::Left);
        assert_eq!(
            deck.finish_transition(&leaving),
            Some(TransitionOutcome::Removed { exhausted: false })
        );

        assert_eq!(deck.cards().len(), 2);
        assert_eq!(top_id(&deck), next);
        assert_eq!(focusable_count(&deck), 1);
    }

    #[test]
    fn leaving_card_ignores_second_dismiss() {
        let mut deck = dealt(3);
        let id = top_id(&deck);

        assert!(deck.dismiss(&id, Direction::Right));
        assert!(!deck.dismiss(&id, Direction::Left));
        assert!(!deck.dismiss_top(Direction::Up));

        assert_eq!(deck.active().len(), 2);
        assert_eq!(
            deck.top().map(|c| c.phase().clone()),
            Some(CardPhase::Leaving(Direction::Right))
        );
    }

    #[test]
    fn lower_and_stale_cards_cannot_be_dismissed() {
        let mut deck = dealt(3);
        let bottom = deck.cards()[0].id().to_string();
        assert!(!deck.dismiss(&bottom, Direction::Right));

        let top = top_id(&deck);
        deck.dismiss_top(Direction::Right);
        deck.finish_transition(&top);
        assert!(!deck.dismiss(&top, Direction::Right));
        assert_eq!(deck.finish_transition(&top), None);
        assert_eq!(deck.active().len(), 2);
    }

    #[test]
    fn last_removal_reports_exhaustion_once() {
        let mut deck = dealt(1);
        let id = top_id(&deck);

        deck.dismiss_top(Direction::Up);
        assert!(!deck.is_exhausted());
        assert_eq!(
            deck.finish_transition(&id),
            Some(TransitionOutcome::Removed { exhausted: true })
        );
        assert!(deck.is_exhausted());
        assert_eq!(deck.finish_transition(&id), None);
        assert!(!deck.dismiss_top(Direction::Up));
    }

    #[test]
    fn drag_release_dismisses_right() {
        let mut deck = dealt(2);
        let id = top_id(&deck);

        assert_eq!(deck.pointer_down(&id, 1, 200.0, 300.0, 0.0), PointerDown::DragStarted);
        assert!(deck.pointer_move(1, 260.0, 300.0));
        assert_eq!(
            deck.pointer_up(1, 350.0, 300.0),
            Some(Release::Dismiss(Direction::Right))
        );
        assert!(deck.top().map(Card::is_leaving).unwrap_or(false));
        assert_eq!(deck.active().len(), 1);
    }

    #[test]
    fn short_drag_snaps_back() {
        let mut deck = dealt(2);
        let id = top_id(&deck);

        deck.pointer_down(&id, 1, 0.0, 0.0, 0.0);
        assert_eq!(deck.pointer_up(1, 50.0, -50.0), Some(Release::SnapBack));
        assert_eq!(deck.top().map(|c| c.phase().clone()), Some(CardPhase::SnappingBack));
        assert_eq!(deck.finish_transition(&id), Some(TransitionOutcome::Settled));
        assert_eq!(deck.top().map(|c| c.phase().clone()), Some(CardPhase::Idle));
        assert_eq!(deck.active().len(), 2);
    }

    #[test]
    fn cancel_never_dismisses() {
        let mut deck = dealt(2);
        let id = top_id(&deck);

        deck.pointer_down(&id, 4, 0.0, 0.0, 0.0);
        deck.pointer_move(4, 400.0, 0.0);
        assert!(deck.pointer_cancel(4));
        assert_eq!(deck.top().map(|c| c.phase().clone()), Some(CardPhase::SnappingBack));
        assert_eq!(deck.active().len(), 2);
        assert_eq!(deck.pointer_up(4, 400.0, 0.0), None);
    }

    #[test]
    fn lower_card_does_not_drag() {
        let mut deck = dealt(2);
        let bottom = deck.cards()[0].id().to_string();
        assert_eq!(deck.pointer_down(&bottom, 1, 0.0, 0.0, 0.0), PointerDown::Ignored);
        assert!(!deck.pointer_move(1, 10.0, 0.0));
    }

    #[test]
    fn double_tap_opens_gallery_and_aborts_drag() {
        let mut deck = dealt(2);
        let id = top_id(&deck);

        deck.pointer_down(&id, 1, 0.0, 0.0, 1000.0);
        deck.pointer_up(1, 0.0, 0.0);
        assert_eq!(deck.pointer_down(&id, 1, 0.0, 0.0, 1200.0), PointerDown::OpenGallery);
        assert_eq!(deck.top().map(|c| c.phase().clone()), Some(CardPhase::Idle));

        assert_eq!(deck.pointer_down(&id, 1, 0.0, 0.0, 2000.0), PointerDown::DragStarted);
    }

    #[test]
    fn leaving_card_does_not_start_drag() {
        let mut deck = dealt(2);
        let id = top_id(&deck);
        deck.dismiss_top(Direction::Left);
        assert_eq!(deck.pointer_down(&id, 1, 0.0, 0.0, 0.0), PointerDown::Ignored);
    }

    #[test]
    fn reset_restores_a_full_deck() {
        let mut deck = dealt(1);
        let id = top_id(&deck);
        deck.dismiss_top(Direction::Right);
        deck.finish_transition(&id);
        assert!(deck.is_exhausted());

        let mut rng = StdRng::seed_from_u64(5);
        deck.reset(generate_profiles_with(&mut rng, 12));
        assert!(!deck.is_exhausted());
        assert_eq!(deck.cards().len(), 12);
        assert_eq!(deck.active().len(), 12);
    }
}
