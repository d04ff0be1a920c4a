//! Redaction session: the single-owner state machine behind the UI.
//!
//! One session owns the loaded image, the selection history, the
//! coordinate mapper, and the in-flight gesture. All mutation funnels
//! through `&mut self` methods, so there is no interior locking; a
//! frontend drives the session from its event loop and re-renders when
//! the revision counter moves.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::PixelBuffer;
use crate::compose;
use crate::export::{self, ExportError, ExportRequest};
use crate::filter::EffectConfig;
use crate::geometry::{ImagePoint, Region, ViewPoint};
use crate::history::History;
use crate::mapper::ScaleState;
use crate::selection::stroke::StrokeState;
use crate::selection::{self, SelectionSet};

pub const DEFAULT_BRUSH_DIAMETER: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Rectangle,
    Brush,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no image is loaded")]
    NoImage,
    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushOptions {
    diameter: u32,
}

impl Default for BrushOptions {
    fn default() -> Self {
        Self {
            diameter: DEFAULT_BRUSH_DIAMETER,
        }
    }
}

impl BrushOptions {
    pub const fn diameter(&self) -> u32 {
        self.diameter
    }

    pub fn set_diameter(&mut self, diameter: u32) {
        self.diameter = diameter.max(1);
    }
}

/// The gesture in progress between pointer-down and pointer-up.
enum Gesture {
    Idle,
    RectangleDrag {
        start: ImagePoint,
        current: ImagePoint,
        square: bool,
    },
    BrushStroke {
        stroke: StrokeState,
        working: SelectionSet,
    },
}

pub struct RedactionSession {
    image: Option<PixelBuffer>,
    history: History<SelectionSet>,
    scale: ScaleState,
    view_size: (f32, f32),
    effect: EffectConfig,
    brush: BrushOptions,
    gesture: Gesture,
    preview_enabled: bool,
    revision: u64,
    on_change: Option<Box<dyn FnMut(u64)>>,
}

impl Default for RedactionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RedactionSession {
    pub fn new() -> Self {
        Self {
            image: None,
            history: History::new(SelectionSet::new()),
            scale: ScaleState::identity(),
            view_size: (0.0, 0.0),
            effect: EffectConfig::default(),
            brush: BrushOptions::default(),
            gesture: Gesture::Idle,
            preview_enabled: true,
            revision: 0,
            on_change: None,
        }
    }

    /// Install `image` as the session source. Existing selections and
    /// history are dropped; the mapper is refit to the current view.
    pub fn load_image(&mut self, image: PixelBuffer) {
        tracing::info!(
            width = image.width(),
            height = image.height(),
            "image loaded into session"
        );
        self.scale = ScaleState::fit(image.width(), image.height(), self.view_size.0, self.view_size.1);
        self.image = Some(image);
        self.history.reset(SelectionSet::new());
        self.gesture = Gesture::Idle;
        self.preview_enabled = true;
        self.bump();
    }

    pub fn remove_image(&mut self) {
        self.image = None;
        self.history.reset(SelectionSet::new());
        self.gesture = Gesture::Idle;
        self.scale = ScaleState::identity();
        self.bump();
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn image(&self) -> Option<&PixelBuffer> {
        self.image.as_ref()
    }

    pub fn set_view_size(&mut self, width: f32, height: f32) {
        self.view_size = (width, height);
        if let Some(image) = &self.image {
            self.scale = ScaleState::fit(image.width(), image.height(), width, height);
        }
        self.bump();
    }

    pub fn scale_state(&self) -> ScaleState {
        self.scale
    }

    pub fn effect(&self) -> &EffectConfig {
        &self.effect
    }

    pub fn set_effect(&mut self, effect: EffectConfig) {
        self.effect = effect;
        self.bump();
    }

    pub fn brush(&self) -> &BrushOptions {
        &self.brush
    }

    pub fn set_brush_diameter(&mut self, diameter: u32) {
        self.brush.set_diameter(diameter);
        self.bump();
    }

    /// Begin a gesture at a view-space point. The live preview is
    /// suspended until pointer-up so drawing stays responsive.
    pub fn pointer_down(&mut self, tool: Tool, point: ViewPoint, constrain_square: bool) {
        if self.image.is_none() {
            return;
        }
        let image_point = self.scale.to_image_space(point);
        self.preview_enabled = false;

        match tool {
            Tool::Rectangle => {
                self.gesture = Gesture::RectangleDrag {
                    start: image_point,
                    current: image_point,
                    square: constrain_square,
                };
            }
            Tool::Brush => {
                let mut stroke = StrokeState::new(self.brush.diameter());
                let mut working = self.history.present().clone();
                stroke.add_sample(image_point, &mut working);
                self.gesture = Gesture::BrushStroke { stroke, working };
            }
        }
        self.bump();
    }

    pub fn pointer_move(&mut self, point: ViewPoint, constrain_square: bool) {
        let image_point = self.scale.to_image_space(point);
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::RectangleDrag {
                current, square, ..
            } => {
                *current = image_point;
                *square = constrain_square;
                self.bump();
            }
            Gesture::BrushStroke { stroke, working } => {
                if stroke.add_sample(image_point, working) > 0 {
                    self.bump();
                }
            }
        }
    }

    /// End the gesture and commit its result as one history entry.
    /// Tiny rectangle drags and empty strokes leave the history
    /// untouched; the preview is re-enabled either way.
    pub fn pointer_up(&mut self, point: ViewPoint, constrain_square: bool) {
        let image_point = self.scale.to_image_space(point);
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => {}
            Gesture::RectangleDrag { start, .. } => {
                if let Some(rectangle) =
                    selection::rectangle_from_drag(start, image_point, constrain_square)
                {
                    let mut next = self.history.present().clone();
                    next.push(rectangle);
                    if self.history.commit(next) {
                        tracing::debug!("rectangle selection committed");
                    }
                }
            }
            Gesture::BrushStroke {
                mut stroke,
                mut working,
            } => {
                stroke.add_sample(image_point, &mut working);
                stroke.end();
                if self.history.commit(working) {
                    tracing::debug!(
                        selections = self.history.present().len(),
                        "brush stroke committed"
                    );
                }
            }
        }
        self.preview_enabled = true;
        self.bump();
    }

    /// The in-progress rectangle, for overlay rendering. `None` unless
    /// a rectangle drag is underway.
    pub fn active_rectangle(&self) -> Option<Region> {
        match &self.gesture {
            Gesture::RectangleDrag {
                start,
                current,
                square,
            } => Some(selection::drag_region(*start, *current, *square)),
            _ => None,
        }
    }

    /// What the canvas should draw right now: the committed set, or
    /// the stroke's working set while a brush gesture is underway.
    pub fn visible_selections(&self) -> &SelectionSet {
        match &self.gesture {
            Gesture::BrushStroke { working, .. } => working,
            _ => self.history.present(),
        }
    }

    /// Remove the topmost selection under a view-space point. The
    /// removal is one undoable history entry.
    pub fn delete_selection_at(&mut self, point: ViewPoint) -> bool {
        let image_point = self.scale.to_image_space(point);
        let mut next = self.history.present().clone();
        if next.remove_hit(image_point).is_none() {
            return false;
        }
        self.history.commit(next);
        self.bump();
        true
    }

    /// Drop every selection in one undoable step.
    pub fn clear_selections(&mut self) {
        if self.history.commit(SelectionSet::new()) {
            self.bump();
        }
    }

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            self.bump();
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            self.bump();
        }
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Full-resolution composed frame for the live preview, or `None`
    /// when no image is loaded or the preview is suspended mid-gesture.
    pub fn preview(&self) -> Option<PixelBuffer> {
        if !self.preview_enabled {
            return None;
        }
        let image = self.image.as_ref()?;
        Some(compose::compose(image, self.visible_selections(), &self.effect))
    }

    /// Compose the committed selections against the source at native
    /// resolution, regardless of preview state.
    pub fn compose_current(&self) -> SessionResult<PixelBuffer> {
        let image = self.image.as_ref().ok_or(SessionError::NoImage)?;
        Ok(compose::compose(image, self.history.present(), &self.effect))
    }

    pub fn export(&self, request: &ExportRequest) -> SessionResult<Vec<u8>> {
        let composed = self.compose_current()?;
        Ok(export::encode(&composed, request)?)
    }

    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Register a change listener, invoked with the new revision after
    /// every observable state change. Replaces any previous listener.
    pub fn set_on_change(&mut self, callback: impl FnMut(u64) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        let revision = self.revision;
        if let Some(callback) = &mut self.on_change {
            callback(revision);
        }
    }
}
