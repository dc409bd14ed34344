//! Gesture labels and edge-triggered debouncing.
//!
//! A hit check runs only when a hand enters the trigger gesture, never while it
//! is held, so a sustained fist scores once.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Tracking index the detector assigns to a hand.
pub type HandId = usize;

/// Classification labels produced by the detector's gesture recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Gesture {
    #[default]
    None,
    ClosedFist,
    OpenPalm,
    PointingUp,
    ThumbDown,
    ThumbUp,
    Victory,
    ILoveYou,
    /// Label outside the known vocabulary, kept verbatim.
    Other(String),
}

impl Gesture {
    pub fn from_label(label: &str) -> Self {
        match label {
            "" | "None" => Gesture::None,
            "Closed_Fist" => Gesture::ClosedFist,
            "Open_Palm" => Gesture::OpenPalm,
            "Pointing_Up" => Gesture::PointingUp,
            "Thumb_Down" => Gesture::ThumbDown,
            "Thumb_Up" => Gesture::ThumbUp,
            "Victory" => Gesture::Victory,
            "ILoveYou" => Gesture::ILoveYou,
            other => Gesture::Other(other.to_owned()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Gesture::None => "None",
            Gesture::ClosedFist => "Closed_Fist",
            Gesture::OpenPalm => "Open_Palm",
            Gesture::PointingUp => "Pointing_Up",
            Gesture::ThumbDown => "Thumb_Down",
            Gesture::ThumbUp => "Thumb_Up",
            Gesture::Victory => "Victory",
            Gesture::ILoveYou => "ILoveYou",
            Gesture::Other(label) => label,
        }
    }
}

impl FromStr for Gesture {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Gesture::from_label(s))
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    NoTrigger,
    TriggerActive,
}

/// Last observed gesture per tracked hand.
#[derive(Debug, Clone, Default)]
pub struct GestureDebouncer {
    last: HashMap<HandId, Gesture>,
}

impl GestureDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `gesture` for `hand` and returns `true` on a rising edge into
    /// `trigger`. The stored gesture is updated whether or not the edge fired.
    pub fn observe(&mut self, hand: HandId, gesture: &Gesture, trigger: &Gesture) -> bool {
        let was_triggered = self.last.get(&hand) == Some(trigger);
        let fire = gesture == trigger && !was_triggered;

        self.last.insert(hand, gesture.clone());
        fire
    }

    pub fn last_gesture(&self, hand: HandId) -> &Gesture {
        static NONE: Gesture = Gesture::None;
        self.last.get(&hand).unwrap_or(&NONE)
    }

    pub fn state(&self, hand: HandId, trigger: &Gesture) -> TriggerState {
        if self.last_gesture(hand) == trigger {
            TriggerState::TriggerActive
        } else {
            TriggerState::NoTrigger
        }
    }

    /// Drops hands that are no longer tracked; they restart from `None`.
    pub fn retain_hands(&mut self, present: &[HandId]) {
        self.last.retain(|hand, _| present.contains(hand));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_parser() {
        for label in ["None", "Closed_Fist", "Open_Palm", "Victory", "ILoveYou"] {
            assert_eq!(Gesture::from_label(label).label(), label);
        }
        assert_eq!(Gesture::from_label(""), Gesture::None);
        assert_eq!(
            "Wave".parse::<Gesture>().unwrap(),
            Gesture::Other("Wave".to_owned())
        );
    }

    #[test]
    fn sustained_trigger_fires_once_per_press() {
        let trigger = Gesture::ClosedFist;
        let sequence = [
            Gesture::None,
            Gesture::None,
            Gesture::ClosedFist,
            Gesture::ClosedFist,
            Gesture::ClosedFist,
            Gesture::None,
            Gesture::ClosedFist,
        ];

        let mut debouncer = GestureDebouncer::new();
        let fired: Vec<usize> = sequence
            .iter()
            .enumerate()
            .filter(|(_, g)| debouncer.observe(0, g, &trigger))
            .map(|(i, _)| i)
            .collect();

        // first and last trigger occurrences only
        assert_eq!(fired, vec![2, 6]);
    }

    #[test]
    fn first_frame_trigger_fires() {
        let mut debouncer = GestureDebouncer::new();
        assert!(debouncer.observe(3, &Gesture::ClosedFist, &Gesture::ClosedFist));
    }

    #[test]
    fn hands_are_independent() {
        let fist = Gesture::ClosedFist;
        let mut debouncer = GestureDebouncer::new();

        assert!(debouncer.observe(0, &fist, &fist));
        assert!(debouncer.observe(1, &fist, &fist));
        assert!(!debouncer.observe(0, &fist, &fist));
        assert_eq!(debouncer.state(1, &fist), TriggerState::TriggerActive);
        assert_eq!(debouncer.state(2, &fist), TriggerState::NoTrigger);
    }

    #[test]
    fn other_gestures_release_the_trigger() {
        let fist = Gesture::ClosedFist;
        let mut debouncer = GestureDebouncer::new();

        assert!(debouncer.observe(0, &fist, &fist));
        assert!(!debouncer.observe(0, &Gesture::OpenPalm, &fist));
        assert_eq!(debouncer.last_gesture(0), &Gesture::OpenPalm);
        assert!(debouncer.observe(0, &fist, &fist));
    }

    #[test]
    fn forgotten_hand_restarts_from_none() {
        let fist = Gesture::ClosedFist;
        let mut debouncer = GestureDebouncer::new();

        debouncer.observe(0, &fist, &fist);
        debouncer.retain_hands(&[]);
        assert_eq!(debouncer.last_gesture(0), &Gesture::None);
        assert!(debouncer.observe(0, &fist, &fist));
    }
}
