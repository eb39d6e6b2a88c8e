// SPDX-License-Identifier: MPL-2.0
//! Lightbox navigator component.
//!
//! Owns the selected photo, the paging direction, zoom and gesture state. The
//! photo sequence itself belongs to the gallery and is passed in on every call,
//! so the current index is always derived from the selected id and can never
//! point past the end of the list.

use super::gesture::{self, PinchEvent, PinchState, SwipeAction, SwipeSettings};
use super::keyboard::{self as keys, KeyAction};
use super::transition::Transition;
use crate::config::LightboxConfig;
use crate::domain::gallery::{position_of, Photo, RecordId};
use crate::domain::lightbox::{scale_bounds, Direction};
use crate::ui::state::{zoom::CENTERED, DragRelease, DragState, ZoomState};
use iced::widget::scrollable::{AbsoluteOffset, RelativeOffset};
use iced::widget::{operation, Id};
use iced::{event, keyboard, mouse, time, touch, window, Point, Rectangle, Size, Subscription};
use iced::{Task, Vector};
use std::time::{Duration, Instant};

/// Identifier used for the zoomed image scrollable.
pub const SCROLLABLE_ID: &str = "lightbox-image-scrollable";

const ANIMATION_FRAME: Duration = Duration::from_millis(16);

/// Navigator settings derived from the `[lightbox]` config section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub swipe: SwipeSettings,
    /// Delay between starting to close and clearing the selection.
    pub close_delay: Duration,
    /// Scale change per wheel notch.
    pub wheel_step: f32,
    /// Widest viewport that still asks for full-screen presentation.
    pub fullscreen_max_width: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&LightboxConfig::default())
    }
}

impl From<&LightboxConfig> for Settings {
    fn from(config: &LightboxConfig) -> Self {
        Self {
            swipe: SwipeSettings::from(config),
            close_delay: config.close_delay(),
            wheel_step: config.wheel_step(),
            fullscreen_max_width: config.fullscreen_max_width(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    /// A grid thumbnail was activated.
    Open(RecordId),
    Next,
    Previous,
    Close,
    Download,
    /// Deferred end of a close, tagged with the close generation it belongs to.
    ClearSelection(u64),
    Wheel(mouse::ScrollDelta),
    ViewportChanged {
        bounds: Rectangle,
        content_bounds: Rectangle,
        offset: AbsoluteOffset,
    },
    RawEvent {
        window: window::Id,
        event: event::Event,
    },
    AnimationTick,
}

/// Side effects the application should perform after handling a lightbox message.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// The lightbox opened on `photo`.
    Opened {
        photo: RecordId,
        enter_fullscreen: bool,
    },
    /// Paging moved to another photo.
    Moved(RecordId),
    /// Closing started; the selection clears after the configured delay.
    Closing { exit_fullscreen: bool },
    /// The user asked to save the full-resolution file.
    Download(RecordId),
}

/// Data owned by the application that the navigator reads.
#[derive(Debug, Clone, Copy)]
pub struct Env<'a> {
    pub photos: &'a [Photo],
    pub window_size: Size,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Viewport {
    bounds: Rectangle,
    content_bounds: Rectangle,
    offset: AbsoluteOffset,
}

/// How the active drag is being interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragMode {
    #[default]
    Swipe,
    Pan,
}

#[derive(Debug, Clone)]
pub struct State {
    settings: Settings,
    selected: Option<RecordId>,
    direction: Direction,
    closing: bool,
    close_generation: u64,
    fullscreen_requested: bool,
    zoom: ZoomState,
    drag: DragState,
    drag_mode: DragMode,
    drag_offset: Vector,
    pinch: PinchState,
    cursor: Option<Point>,
    viewport: Option<Viewport>,
    transition: Transition,
}

impl Default for State {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl State {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            selected: None,
            direction: Direction::Still,
            closing: false,
            close_generation: 0,
            fullscreen_requested: false,
            zoom: ZoomState::default(),
            drag: DragState::default(),
            drag_mode: DragMode::Swipe,
            drag_offset: Vector::ZERO,
            pinch: PinchState::default(),
            cursor: None,
            viewport: None,
            transition: Transition::default(),
        }
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Keyboard input is honored only while a photo is shown and not closing.
    #[must_use]
    pub fn accepts_keyboard(&self) -> bool {
        self.is_open() && !self.closing
    }

    #[must_use]
    pub fn selected(&self) -> Option<&RecordId> {
        self.selected.as_ref()
    }

    /// Index of the selected photo in `photos`.
    #[must_use]
    pub fn current_index(&self, photos: &[Photo]) -> Option<usize> {
        position_of(photos, self.selected.as_ref()?)
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    #[must_use]
    pub fn close_generation(&self) -> u64 {
        self.close_generation
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging
    }

    /// Current translation of the image while swiping.
    #[must_use]
    pub fn drag_offset(&self) -> Vector {
        self.drag_offset
    }

    #[must_use]
    pub fn is_animating(&self, now: Instant) -> bool {
        self.transition.is_animating(now)
    }

    /// Horizontal slide offset for the current frame.
    #[must_use]
    pub fn transition_offset(&self, viewport_width: f32, now: Instant) -> f32 {
        self.transition.offset(viewport_width, now)
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Shows `id` with the given paging direction.
    ///
    /// Asks for full-screen presentation on narrow viewports. Opening also
    /// invalidates any deferred clear still pending from an earlier close.
    pub fn open(
        &mut self,
        photos: &[Photo],
        id: &RecordId,
        direction: Direction,
        viewport_width: f32,
    ) -> Effect {
        if position_of(photos, id).is_none() {
            tracing::debug!(photo = %id, "lightbox open ignored, photo not in sequence");
            return Effect::None;
        }

        self.selected = Some(id.clone());
        self.direction = direction;
        self.closing = false;
        self.close_generation = self.close_generation.wrapping_add(1);
        self.reset_gestures();
        self.transition.start(direction, Instant::now());

        let enter_fullscreen = viewport_width <= self.settings.fullscreen_max_width;
        self.fullscreen_requested = enter_fullscreen;
        tracing::debug!(photo = %id, enter_fullscreen, "lightbox opened");

        Effect::Opened {
            photo: id.clone(),
            enter_fullscreen,
        }
    }

    /// Moves one step in `direction`, wrapping at both ends.
    pub fn advance(&mut self, photos: &[Photo], direction: Direction) -> Effect {
        if direction == Direction::Still || self.closing {
            return Effect::None;
        }
        let Some(index) = self.current_index(photos) else {
            return Effect::None;
        };
        let Some(next) = direction.step(index, photos.len()) else {
            return Effect::None;
        };

        let id = photos[next].id.clone();
        tracing::debug!(from = index, to = next, "lightbox advanced");
        self.selected = Some(id.clone());
        self.direction = direction;
        self.reset_gestures();
        self.transition.start(direction, Instant::now());
        Effect::Moved(id)
    }

    /// Starts closing: stops input and schedules the deferred clear.
    pub fn close(&mut self) -> (Effect, Task<Message>) {
        if !self.is_open() || self.closing {
            return (Effect::None, Task::none());
        }

        self.closing = true;
        self.close_generation = self.close_generation.wrapping_add(1);
        self.drag.stop();
        self.drag_offset = Vector::ZERO;
        self.pinch.reset();

        let generation = self.close_generation;
        let delay = self.settings.close_delay;
        let exit_fullscreen = std::mem::take(&mut self.fullscreen_requested);
        tracing::debug!(generation, "lightbox closing");

        let task = Task::perform(async move { tokio::time::sleep(delay).await }, move |()| {
            Message::ClearSelection(generation)
        });
        (Effect::Closing { exit_fullscreen }, task)
    }

    /// Ends a close. Stale generations (the lightbox was reopened meanwhile) are ignored.
    pub fn clear_selection(&mut self, generation: u64) -> bool {
        if !self.closing || generation != self.close_generation {
            return false;
        }
        self.selected = None;
        self.closing = false;
        self.direction = Direction::Still;
        self.zoom.reset();
        self.transition.stop();
        self.viewport = None;
        true
    }

    /// Closes the lightbox when its photo is no longer part of `photos`.
    pub fn sync(&mut self, photos: &[Photo]) -> (Effect, Task<Message>) {
        match &self.selected {
            Some(id) if !self.closing && position_of(photos, id).is_none() => {
                tracing::debug!(photo = %id, "selected photo left the sequence");
                self.close()
            }
            _ => (Effect::None, Task::none()),
        }
    }

    // ------------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------------

    /// Scores a released drag. Ignored entirely while zoomed.
    pub fn on_drag_end(
        &mut self,
        photos: &[Photo],
        release: DragRelease,
    ) -> (Effect, Task<Message>) {
        if self.zoom.is_zoomed {
            return (Effect::None, Task::none());
        }
        match gesture::classify(release, &self.settings.swipe) {
            SwipeAction::Advance(direction) => (self.advance(photos, direction), Task::none()),
            SwipeAction::Close => self.close(),
            SwipeAction::None => (Effect::None, Task::none()),
        }
    }

    /// Applies a live zoom scale; shrinking far enough closes the lightbox.
    pub fn on_zoom_transform(&mut self, scale: f32) -> (Effect, Task<Message>) {
        if self.closing {
            return (Effect::None, Task::none());
        }
        if scale < scale_bounds::CLOSE_BELOW {
            return self.close();
        }
        self.zoom.set_scale(scale);
        self.zoom.is_zoomed = self.zoom.scale.is_zoomed();
        (Effect::None, Task::none())
    }

    /// Settles a zoom gesture; a slightly shrunk image springs back to fit.
    pub fn on_zoom_stop(&mut self, scale: f32) -> Task<Message> {
        if (scale_bounds::CLOSE_BELOW..scale_bounds::NEUTRAL).contains(&scale) {
            self.zoom.reset();
            return operation::snap_to(Id::new(SCROLLABLE_ID), CENTERED);
        }
        Task::none()
    }

    pub fn on_zoom_start(&mut self) {
        self.zoom.is_zoomed = true;
    }

    pub fn on_pan_start(&mut self) {
        self.zoom.is_zoomed = true;
    }

    /// One wheel notch: a transform immediately followed by a zoom stop.
    pub fn on_wheel(&mut self, delta: mouse::ScrollDelta) -> (Effect, Task<Message>) {
        let notches = wheel_notches(delta);
        if notches == 0.0 || self.closing {
            return (Effect::None, Task::none());
        }

        let target = self.zoom.scale.value() + notches * self.settings.wheel_step;
        let (effect, close_task) = self.on_zoom_transform(target);
        if self.closing {
            return (effect, close_task);
        }
        let stop_task = self.on_zoom_stop(target);
        let keep_pan = operation::snap_to(Id::new(SCROLLABLE_ID), self.zoom.pan);
        (effect, Task::batch([stop_task, keep_pan]))
    }

    // ------------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------------

    pub fn handle(&mut self, message: Message, env: Env<'_>) -> (Effect, Task<Message>) {
        match message {
            Message::Open(id) => {
                let effect = self.open(env.photos, &id, Direction::Forward, env.window_size.width);
                (effect, Task::none())
            }
            Message::Next => (self.advance(env.photos, Direction::Forward), Task::none()),
            Message::Previous => (self.advance(env.photos, Direction::Backward), Task::none()),
            Message::Close => self.close(),
            Message::Download => match &self.selected {
                Some(id) if !self.closing => (Effect::Download(id.clone()), Task::none()),
                _ => (Effect::None, Task::none()),
            },
            Message::ClearSelection(generation) => {
                if !self.clear_selection(generation) {
                    tracing::debug!(generation, "stale lightbox clear ignored");
                }
                (Effect::None, Task::none())
            }
            Message::Wheel(delta) => self.on_wheel(delta),
            Message::ViewportChanged {
                bounds,
                content_bounds,
                offset,
            } => {
                let viewport = Viewport {
                    bounds,
                    content_bounds,
                    offset,
                };
                if let Some(relative) = relative_offset(&viewport, offset) {
                    self.zoom.set_pan(relative);
                }
                self.viewport = Some(viewport);
                (Effect::None, Task::none())
            }
            Message::RawEvent { event, .. } => self.handle_raw_event(env, event, Instant::now()),
            Message::AnimationTick => {
                if !self.transition.is_animating(Instant::now()) {
                    self.transition.stop();
                }
                (Effect::None, Task::none())
            }
        }
    }

    fn handle_raw_event(
        &mut self,
        env: Env<'_>,
        event: event::Event,
        now: Instant,
    ) -> (Effect, Task<Message>) {
        if !self.accepts_keyboard() {
            return (Effect::None, Task::none());
        }

        match event {
            event::Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => {
                match keys::action_for(&key) {
                    Some(KeyAction::Advance(direction)) => {
                        (self.advance(env.photos, direction), Task::none())
                    }
                    Some(KeyAction::Close) => self.close(),
                    None => (Effect::None, Task::none()),
                }
            }
            event::Event::Mouse(mouse_event) => match mouse_event {
                mouse::Event::CursorMoved { position } => {
                    self.cursor = Some(position);
                    (Effect::None, self.pointer_moved(position, now))
                }
                mouse::Event::ButtonPressed(mouse::Button::Left) => {
                    if let Some(position) = self.cursor {
                        self.pointer_pressed(position, now);
                    }
                    (Effect::None, Task::none())
                }
                mouse::Event::ButtonReleased(mouse::Button::Left) => {
                    match self.cursor {
                        Some(position) => self.pointer_released(env.photos, position, now),
                        None => (Effect::None, Task::none()),
                    }
                }
                mouse::Event::CursorLeft => {
                    self.cursor = None;
                    self.drag.stop();
                    self.drag_offset = Vector::ZERO;
                    (Effect::None, Task::none())
                }
                _ => (Effect::None, Task::none()),
            },
            event::Event::Touch(touch_event) => self.handle_touch(env, touch_event, now),
            _ => (Effect::None, Task::none()),
        }
    }

    fn handle_touch(
        &mut self,
        env: Env<'_>,
        event: touch::Event,
        now: Instant,
    ) -> (Effect, Task<Message>) {
        match event {
            touch::Event::FingerPressed { id, position } => {
                match self.pinch.press(id, position, self.zoom.scale.value()) {
                    Some(PinchEvent::Started) => {
                        self.drag.stop();
                        self.drag_offset = Vector::ZERO;
                        self.on_zoom_start();
                    }
                    _ if self.pinch.finger_count() == 1 => {
                        if self.zoom.scale.value() > scale_bounds::NEUTRAL {
                            // The scrollable pans zoomed content under a single finger
                            self.on_pan_start();
                        } else {
                            self.pointer_pressed(position, now);
                        }
                    }
                    _ => {}
                }
                (Effect::None, Task::none())
            }
            touch::Event::FingerMoved { id, position } => {
                if let Some(PinchEvent::Transform(scale)) = self.pinch.moved(id, position) {
                    return self.on_zoom_transform(scale);
                }
                (Effect::None, self.pointer_moved(position, now))
            }
            touch::Event::FingerLifted { id, position } => {
                if let Some(PinchEvent::Stopped(scale)) = self.pinch.lift(id) {
                    return (Effect::None, self.on_zoom_stop(scale));
                }
                self.pointer_released(env.photos, position, now)
            }
            touch::Event::FingerLost { id, .. } => {
                if let Some(PinchEvent::Stopped(scale)) = self.pinch.lift(id) {
                    return (Effect::None, self.on_zoom_stop(scale));
                }
                self.drag.stop();
                self.drag_offset = Vector::ZERO;
                (Effect::None, Task::none())
            }
        }
    }

    fn pointer_pressed(&mut self, position: Point, now: Instant) {
        let offset = self.viewport.map(|v| v.offset).unwrap_or_default();
        self.drag_mode = if self.zoom.scale.value() > scale_bounds::NEUTRAL {
            self.on_pan_start();
            DragMode::Pan
        } else {
            DragMode::Swipe
        };
        self.drag.start(position, offset, now);
    }

    fn pointer_moved(&mut self, position: Point, now: Instant) -> Task<Message> {
        if !self.drag.is_dragging {
            return Task::none();
        }
        match self.drag_mode {
            DragMode::Swipe => {
                self.drag.record(position, now);
                self.drag_offset = self.drag.current_offset(position).unwrap_or(Vector::ZERO);
                Task::none()
            }
            DragMode::Pan => self.pan_to(position),
        }
    }

    fn pointer_released(
        &mut self,
        photos: &[Photo],
        position: Point,
        now: Instant,
    ) -> (Effect, Task<Message>) {
        if !self.drag.is_dragging {
            return (Effect::None, Task::none());
        }
        self.drag_offset = Vector::ZERO;
        match self.drag_mode {
            DragMode::Pan => {
                self.drag.stop();
                (Effect::None, Task::none())
            }
            DragMode::Swipe => match self.drag.finish(position, now) {
                Some(release) => self.on_drag_end(photos, release),
                None => (Effect::None, Task::none()),
            },
        }
    }

    /// Scrolls the zoomed image so it follows the cursor.
    fn pan_to(&mut self, position: Point) -> Task<Message> {
        let (Some(proposed), Some(viewport)) =
            (self.drag.calculate_offset(position), self.viewport)
        else {
            return Task::none();
        };
        let Some(relative) = relative_offset(&viewport, proposed) else {
            return Task::none();
        };
        self.zoom.set_pan(relative);
        operation::snap_to(Id::new(SCROLLABLE_ID), self.zoom.pan)
    }

    fn reset_gestures(&mut self) {
        self.zoom.reset();
        self.drag.stop();
        self.drag_offset = Vector::ZERO;
        self.pinch.reset();
    }

    // ------------------------------------------------------------------------
    // Subscription
    // ------------------------------------------------------------------------

    /// Raw input is only listened to while the lightbox is open and not closing.
    pub fn subscription(&self) -> Subscription<Message> {
        if !self.accepts_keyboard() {
            return Subscription::none();
        }

        let input = event::listen_with(|event, status, window| {
            let forward = match &event {
                event::Event::Keyboard(keyboard::Event::KeyPressed { .. }) => {
                    status == event::Status::Ignored
                }
                // Releases and moves must reach the drag tracker even over chrome
                event::Event::Mouse(
                    mouse::Event::CursorMoved { .. }
                    | mouse::Event::CursorLeft
                    | mouse::Event::ButtonReleased(mouse::Button::Left),
                ) => true,
                event::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                    status == event::Status::Ignored
                }
                event::Event::Touch(_) => true,
                _ => false,
            };
            forward.then_some(Message::RawEvent { window, event })
        });

        let animation = if self.transition.is_animating(Instant::now()) {
            time::every(ANIMATION_FRAME).map(|_| Message::AnimationTick)
        } else {
            Subscription::none()
        };

        Subscription::batch([input, animation])
    }
}

/// Converts an absolute scroll offset to the relative form used by `snap_to`.
fn relative_offset(viewport: &Viewport, offset: AbsoluteOffset) -> Option<RelativeOffset> {
    let max_x = (viewport.content_bounds.width - viewport.bounds.width).max(0.0);
    let max_y = (viewport.content_bounds.height - viewport.bounds.height).max(0.0);
    if max_x <= 0.0 && max_y <= 0.0 {
        return None;
    }
    let axis = |value: f32, max: f32| {
        if max > 0.0 {
            value.clamp(0.0, max) / max
        } else {
            0.5
        }
    };
    Some(RelativeOffset {
        x: axis(offset.x, max_x),
        y: axis(offset.y, max_y),
    })
}

/// Direction of a wheel event as +1 (zoom in), -1 (zoom out) or 0.
fn wheel_notches(delta: mouse::ScrollDelta) -> f32 {
    let y = match delta {
        mouse::ScrollDelta::Lines { y, .. } | mouse::ScrollDelta::Pixels { y, .. } => y,
    };
    if y.abs() < f32::EPSILON {
        0.0
    } else {
        y.signum()
    }
}
