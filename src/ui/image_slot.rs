/// Product image with a one-shot fallback
///
/// When the current source fails, the slot clears it, waits briefly, and
/// then swaps in a replacement: the fallback if the product image failed,
/// otherwise the product image again (or the fallback if there is none).
/// Only one such retry happens per slot; a second failure leaves it
/// exhausted and a text placeholder is shown instead.

use std::time::Duration;

use iced::widget::{container, image, text};
use iced::{Element, Length, Task};
use tracing::debug;

use crate::images::{EntryState, ImageCache, Preloaded};

/// Progress of an image shown by a view
#[derive(Debug, Clone, PartialEq)]
pub enum ImageEvent {
    /// The preload for `src` finished
    Settled { src: String, outcome: Preloaded },
    /// The retry delay after `failed` broke has elapsed
    Retry { failed: String },
}

#[derive(Debug, Clone)]
pub struct ImageSlot {
    src: Option<String>,
    product_url: Option<String>,
    fallback: &'static str,
    retried: bool,
    exhausted: bool,
}

impl ImageSlot {
    pub fn new(product_url: Option<&str>, fallback: &'static str) -> Self {
        let product_url = product_url.map(str::to_string);
        Self {
            src: Some(product_url.clone().unwrap_or_else(|| fallback.to_string())),
            product_url,
            fallback,
            retried: false,
            exhausted: false,
        }
    }

    #[cfg(test)]
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    #[cfg(test)]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Ask the cache for the current source
    pub fn load(&self, images: &ImageCache) -> Task<ImageEvent> {
        let Some(src) = self.src.clone() else {
            return Task::none();
        };
        let images = images.clone();
        Task::perform(
            async move {
                let outcome = images.preload(&src).await;
                (src, outcome)
            },
            |(src, outcome)| ImageEvent::Settled { src, outcome },
        )
    }

    pub fn update(
        &mut self,
        event: ImageEvent,
        images: &ImageCache,
        retry_delay: Duration,
    ) -> Task<ImageEvent> {
        match event {
            ImageEvent::Settled { src, outcome: Preloaded::SoftFailure } => {
                self.fail(src, retry_delay)
            }
            ImageEvent::Settled { .. } => Task::none(),
            ImageEvent::Retry { failed } => {
                self.retry(&failed);
                self.load(images)
            }
        }
    }

    /// Re-read the cache for the current source. Picks up failures of
    /// background preloads this slot did not start itself.
    pub fn refresh(&mut self, images: &ImageCache, retry_delay: Duration) -> Task<ImageEvent> {
        let Some(src) = self.src.clone() else {
            return Task::none();
        };
        match images.state(&src) {
            EntryState::Failed => self.fail(src, retry_delay),
            EntryState::NotRequested => self.load(images),
            EntryState::Loading | EntryState::Loaded => Task::none(),
        }
    }

    /// Whether the slot still needs `refresh` calls to reach a final image
    pub fn is_pending(&self, images: &ImageCache) -> bool {
        match self.src.as_deref() {
            Some(src) => !images.is_cached(src),
            None => !self.exhausted,
        }
    }

    fn fail(&mut self, src: String, retry_delay: Duration) -> Task<ImageEvent> {
        // Stale result for a source this slot has already moved away from
        if self.src.as_deref() != Some(src.as_str()) || !self.on_error(&src) {
            return Task::none();
        }
        Task::perform(retry_after(src, retry_delay), |failed| ImageEvent::Retry { failed })
    }

    /// Record a render failure of `failed`. Returns whether a retry should
    /// be scheduled.
    pub fn on_error(&mut self, failed: &str) -> bool {
        self.src = None;
        if self.retried {
            self.exhausted = true;
            debug!("Giving up on image after retry: {}", failed);
            return false;
        }
        self.retried = true;
        true
    }

    /// Pick the replacement source after `failed` broke
    pub fn retry(&mut self, failed: &str) {
        let next = match self.product_url.as_deref() {
            Some(url) if url == failed => self.fallback,
            Some(url) => url,
            None => self.fallback,
        };
        debug!("Retrying image {} -> {}", failed, next);
        self.src = Some(next.to_string());
    }

    /// The loaded image, or a text placeholder while loading or after giving up
    pub fn view<'a, M: 'a>(&self, images: &ImageCache, height: f32) -> Element<'a, M> {
        let content: Element<'a, M> = match self.src.as_deref().and_then(|src| images.handle(src)) {
            Some(handle) => image(handle)
                .width(Length::Fill)
                .height(Length::Fixed(height))
                .into(),
            None if self.exhausted => text("Image unavailable").size(14).into(),
            None => text("Loading image…").size(14).into(),
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fixed(height))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(height))
            .into()
    }
}

/// Hand `failed` back once `delay` has passed
async fn retry_after(failed: String, delay: Duration) -> String {
    tokio::time::sleep(delay).await;
    failed
}
