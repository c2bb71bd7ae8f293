//! Render Surface
//!
//! The drawing itself happens outside this crate. The session hands each new
//! set of layer descriptors to a `RenderSurface`; the surface pairs them with
//! the camera, which is user input and never touched by the event pipeline.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::layers::LayerDescriptor;
use super::panel::PanelView;
use super::view::ViewState;
use crate::error::{AppError, AppResult};

/// Output of one pipeline pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerFrame {
    /// Increments on every pass of one session
    pub sequence: u64,
    pub layers: Vec<LayerDescriptor>,
    pub panel: PanelView,
}

/// What an external renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderState {
    pub sequence: u64,
    pub view_state: ViewState,
    pub layers: Vec<LayerDescriptor>,
    pub panel: Option<PanelView>,
}

pub trait RenderSurface: Send + Sync {
    /// Accept the newest frame; must not block the session
    fn present(&self, frame: LayerFrame);
}

// ============================================================================
// FRAME SURFACE
// ============================================================================

/// Surface that keeps the newest frame and the camera for external renderers.
/// Watchers are notified whenever either changes.
pub struct FrameSurface {
    frame: watch::Sender<Option<Arc<LayerFrame>>>,
    view: RwLock<ViewState>,
    changes: watch::Sender<u64>,
}

impl FrameSurface {
    pub fn new(initial_view: ViewState) -> Self {
        let (frame, _) = watch::channel(None);
        let (changes, _) = watch::channel(0);
        Self {
            frame,
            view: RwLock::new(initial_view.sanitized()),
            changes,
        }
    }

    pub fn latest_frame(&self) -> Option<Arc<LayerFrame>> {
        self.frame.borrow().clone()
    }

    pub fn view_state(&self) -> ViewState {
        *self.view.read()
    }

    /// Replace the camera; returns the stored (sanitized) value
    pub fn set_view_state(&self, view: ViewState) -> AppResult<ViewState> {
        if !view.is_finite() {
            return Err(AppError::Validation("view state must be finite".to_string()));
        }

        let view = view.sanitized();
        *self.view.write() = view;
        self.bump();
        Ok(view)
    }

    /// Camera plus the newest frame; empty layers before the first frame
    pub fn render_state(&self) -> RenderState {
        let view_state = self.view_state();
        match self.latest_frame() {
            Some(frame) => RenderState {
                sequence: frame.sequence,
                view_state,
                layers: frame.layers.clone(),
                panel: Some(frame.panel.clone()),
            },
            None => RenderState {
                sequence: 0,
                view_state,
                layers: Vec::new(),
                panel: None,
            },
        }
    }

    /// Receiver that changes whenever the frame or the camera does
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    fn bump(&self) {
        self.changes.send_modify(|n| *n = n.wrapping_add(1));
    }
}

impl RenderSurface for FrameSurface {
    fn present(&self, frame: LayerFrame) {
        self.frame.send_replace(Some(Arc::new(frame)));
        self.bump();
    }
}

impl<S: RenderSurface + ?Sized> RenderSurface for Arc<S> {
    fn present(&self, frame: LayerFrame) {
        (**self).present(frame)
    }
}
