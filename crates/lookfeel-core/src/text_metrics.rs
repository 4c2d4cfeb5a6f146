//! Text measurement boundary and off-thread measurement.

use crate::layers::{Layer, LayerId, TextLayer, Typographic};
use crate::scene::Scene;
use kurbo::Size;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread;
use std::time::Duration;

/// Family used when a requested font is unknown.
pub const DEFAULT_FONT_NAME: &str = "system-ui";

/// Font and text measurement service.
///
/// Implementations are called from worker threads.
pub trait TextMetrics: Send + Sync {
    /// Natural rendered size of `text`, or `None` if `font_name` is unknown.
    fn natural_size(&self, font_name: &str, font_size: f64, text: &str) -> Option<Size>;

    /// Member names (styles) of a font family. Empty if unknown.
    fn family_members(&self, family: &str) -> Vec<String>;
}

/// Font-independent size estimate, used when no provider can measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateMetrics {
    /// Average glyph advance as a fraction of the font size.
    pub advance: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
}

impl Default for ApproximateMetrics {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
        }
    }
}

impl ApproximateMetrics {
    pub fn measure(&self, font_size: f64, text: &str) -> Size {
        let lines: Vec<&str> = text.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        Size::new(
            longest as f64 * font_size * self.advance,
            lines.len() as f64 * font_size * self.line_height,
        )
    }
}

impl TextMetrics for ApproximateMetrics {
    fn natural_size(&self, _font_name: &str, font_size: f64, text: &str) -> Option<Size> {
        Some(self.measure(font_size, text))
    }

    fn family_members(&self, _family: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Measure `text`, falling back to the default family and then to an
/// estimate. Never fails.
pub fn measure_with_fallback(
    metrics: &dyn TextMetrics,
    font_name: &str,
    font_size: f64,
    text: &str,
) -> Size {
    if let Some(size) = metrics.natural_size(font_name, font_size, text) {
        return size;
    }
    log::warn!(
        "Unknown font '{}', falling back to {}",
        font_name,
        DEFAULT_FONT_NAME
    );
    if let Some(size) = metrics.natural_size(DEFAULT_FONT_NAME, font_size, text) {
        return size;
    }
    log::debug!("Default font unavailable, estimating text size");
    ApproximateMetrics::default().measure(font_size, text)
}

struct Completion {
    layer: LayerId,
    ticket: u64,
    natural_size: Size,
}

/// Collects text measurements made on worker threads and applies them on
/// the thread that owns the [`Scene`].
///
/// Each request gets a ticket; only the latest ticket per layer is applied,
/// so a slow stale measurement never overwrites a newer one.
pub struct MetricsInbox {
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    latest: HashMap<LayerId, u64>,
    next_ticket: u64,
}

impl Default for MetricsInbox {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            latest: HashMap::new(),
            next_ticket: 0,
        }
    }
}

impl MetricsInbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure `layer`'s current content and font on a worker thread.
    /// Returns the request ticket.
    pub fn request(&mut self, layer: &TextLayer, metrics: Arc<dyn TextMetrics>) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.latest.insert(layer.id(), ticket);

        let id = layer.id();
        let text = layer.content().to_string();
        let font_name = layer.typography().font_name.clone();
        let font_size = layer.typography().font_size;
        let sender = self.sender.clone();

        thread::spawn(move || {
            let natural_size = measure_with_fallback(&*metrics, &font_name, font_size, &text);
            let _ = sender.send(Completion {
                layer: id,
                ticket,
                natural_size,
            });
        });

        log::trace!("Requested metrics for {} (ticket {})", id, ticket);
        ticket
    }

    /// Number of layers with a measurement still outstanding.
    pub fn in_flight(&self) -> usize {
        self.latest.len()
    }

    /// Apply every completion that has already arrived. Returns how many
    /// were applied.
    pub fn apply_pending(&mut self, scene: &mut Scene) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.receiver.try_recv() {
            if self.apply(scene, completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait up to `timeout` for one completion and apply it. Returns the
    /// layer it updated, or `None` on timeout or if it was discarded.
    pub fn apply_next(&mut self, scene: &mut Scene, timeout: Duration) -> Option<LayerId> {
        match self.receiver.recv_timeout(timeout) {
            Ok(completion) => {
                let id = completion.layer;
                self.apply(scene, completion).then_some(id)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    fn apply(&mut self, scene: &mut Scene, completion: Completion) -> bool {
        if self.latest.get(&completion.layer) != Some(&completion.ticket) {
            log::trace!(
                "Discarding stale metrics for {} (ticket {})",
                completion.layer,
                completion.ticket
            );
            return false;
        }
        self.latest.remove(&completion.layer);

        let natural_size = completion.natural_size;
        let applied = scene
            .update_layer(completion.layer, |layer| {
                if let Layer::Text(text) = layer {
                    text.apply_natural_size(natural_size, true);
                }
            })
            .is_some();
        if !applied {
            log::debug!("Dropping metrics for removed layer {}", completion.layer);
        }
        applied
    }
}
