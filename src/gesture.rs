use serde::{Deserialize, Serialize};

const ROTATION_PER_PX: f64 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
}

impl Direction {
    pub fn fly_class(self) -> &'static str {
        match self {
            Direction::Left => "card--fly-left",
            Direction::Right => "card--fly-right",
            Direction::Up => "card--fly-up",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Left => "nope",
            Direction::Right => "like",
            Direction::Up => "super",
        }
    }
}

/// Thresholds and timings for drag interpretation, in CSS pixels and milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub swipe_x: f64,
    pub swipe_y: f64,
    pub label_fade_start: f64,
    pub label_fade_end: f64,
    pub super_label_max_dx: f64,
    pub double_tap_ms: f64,
    pub snap_back_ms: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_x: 100.0,
            swipe_y: 80.0,
            label_fade_start: 20.0,
            label_fade_end: 80.0,
            super_label_max_dx: 60.0,
            double_tap_ms: 280.0,
            snap_back_ms: 350,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub pointer_id: i32,
    pub start_x: f64,
    pub start_y: f64,
    pub current_x: f64,
    pub current_y: f64,
}

impl DragSession {
    pub fn start(pointer_id: i32, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            start_x: x,
            start_y: y,
            current_x: x,
            current_y: y,
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.current_x = x;
        self.current_y = y;
    }

    pub fn delta(&self) -> (f64, f64) {
        (self.current_x - self.start_x, self.current_y - self.start_y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Dismiss(Direction),
    SnapBack,
}

/// Horizontal thresholds win over the vertical one; an upward release only
/// counts while the card stays within the horizontal threshold.
pub fn classify_release(dx: f64, dy: f64, config: &GestureConfig) -> Release {
    if dx > config.swipe_x {
        Release::Dismiss(Direction::Right)
    } else if dx < -config.swipe_x {
        Release::Dismiss(Direction::Left)
    } else if dy < -config.swipe_y && dx.abs() < config.swipe_x {
        Release::Dismiss(Direction::Up)
    } else {
        Release::SnapBack
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabelOpacity {
    pub like: f64,
    pub nope: f64,
    pub superlike: f64,
}

impl LabelOpacity {
    pub fn for_direction(direction: Direction) -> Self {
        let mut opacity = Self::default();
        match direction {
            Direction::Left => opacity.nope = 1.0,
            Direction::Right => opacity.like = 1.0,
            Direction::Up => opacity.superlike = 1.0,
        }
        opacity
    }
}

pub fn label_opacity(dx: f64, dy: f64, config: &GestureConfig) -> LabelOpacity {
    let fade = |value: f64| {
        let range = (config.label_fade_end - config.label_fade_start).max(f64::EPSILON);
        ((value - config.label_fade_start) / range).clamp(0.0, 1.0)
    };

    LabelOpacity {
        like: fade(dx),
        nope: fade(-dx),
        superlike: if dx.abs() < config.super_label_max_dx {
            fade(-dy)
        } else {
            0.0
        },
    }
}

pub fn drag_transform(dx: f64, dy: f64) -> String {
    format!(
        "translate({:.1}px, {:.1}px) rotate({:.2}deg)",
        dx,
        dy,
        dx * ROTATION_PER_PX
    )
}

pub fn snap_back_transition(config: &GestureConfig) -> String {
    format!(
        "transform {}ms cubic-bezier(.23,1,.32,1)",
        config.snap_back_ms
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Dismiss(Direction),
    OpenGallery,
}

impl KeyCommand {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" => Some(KeyCommand::Dismiss(Direction::Right)),
            "ArrowLeft" => Some(KeyCommand::Dismiss(Direction::Left)),
            "ArrowUp" => Some(KeyCommand::Dismiss(Direction::Up)),
            "Enter" => Some(KeyCommand::OpenGallery),
            _ => None,
        }
    }
}

pub fn is_double_tap(last_tap_ms: Option<f64>, now_ms: f64, config: &GestureConfig) -> bool {
    last_tap_ms
        .map(|last| now_ms - last < config.double_tap_ms)
        .unwrap_or(false)
}
