use std::collections::BTreeMap;

use iced::widget::{button, column, container, scrollable, text};
use iced::{Element, Length, Task};
use iced_aw::Wrap;
use tracing::{debug, error, info};

use super::image_slot::{ImageEvent, ImageSlot};
use super::Action;
use crate::config::CARD_FALLBACK_IMAGE;
use crate::error::CatalogError;
use crate::images::ImageCache;
use crate::route::Route;
use crate::state::data::Product;
use crate::state::service::CatalogService;

const CARD_WIDTH: f32 = 280.0;
const CARD_IMAGE_HEIGHT: f32 = 180.0;

/// Where the list is in its load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Loading,
    Populated,
    LoadingError,
}

/// Identifies one `load` call. Results tagged with an older request are
/// dropped.
pub type Request = u64;

#[derive(Debug, Clone)]
pub enum Message {
    /// The catalog answered
    Loaded(Request, Result<Vec<Product>, CatalogError>),
    /// A card was chosen
    Selected(u32),
    /// Image progress for the card of the given product
    Image(Request, u32, ImageEvent),
}

/// The product grid
pub struct ProductList {
    state: ListState,
    products: Vec<Product>,
    /// One image slot per card, keyed by product ID
    images: BTreeMap<u32, ImageSlot>,
    /// The load the grid currently shows
    request: Request,
}

impl ProductList {
    pub fn new() -> Self {
        Self {
            state: ListState::Idle,
            products: Vec::new(),
            images: BTreeMap::new(),
            request: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> ListState {
        self.state
    }

    #[cfg(test)]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Enter the loading state and request every product
    pub fn load(&mut self, service: &CatalogService) -> Task<Message> {
        self.request += 1;
        self.state = ListState::Loading;

        let request = self.request;
        let service = service.clone();
        Task::perform(
            async move { service.list_products().await },
            move |result| Message::Loaded(request, result),
        )
    }

    pub fn update(&mut self, message: Message, service: &CatalogService) -> Action<Message> {
        let request = self.request;
        match message {
            Message::Loaded(from, _) | Message::Image(from, ..) if from != request => {
                debug!("Dropping result of superseded request {}", from);
                Action::None
            }
            Message::Loaded(_, Ok(products)) => {
                info!("📋 Showing {} products", products.len());
                self.images = products
                    .iter()
                    .map(|product| {
                        (product.id, ImageSlot::new(product.image(), CARD_FALLBACK_IMAGE))
                    })
                    .collect();
                self.products = products;
                self.state = ListState::Populated;
                Action::Run(self.refresh(service))
            }
            Message::Loaded(_, Err(err)) => {
                error!("❌ Error fetching products: {}", err);
                self.products.clear();
                self.images.clear();
                self.state = ListState::LoadingError;
                Action::None
            }
            Message::Selected(id) => Action::Navigate(Route::product(id)),
            Message::Image(_, id, event) => match self.images.get_mut(&id) {
                Some(slot) => Action::Run(
                    slot.update(event, service.images(), service.latency().image_retry)
                        .map(move |event| Message::Image(request, id, event)),
                ),
                None => Action::None,
            },
        }
    }

    /// Re-check every card image against the cache
    pub fn refresh(&mut self, service: &CatalogService) -> Task<Message> {
        let request = self.request;
        let retry_delay = service.latency().image_retry;
        Task::batch(self.images.iter_mut().map(|(&id, slot)| {
            slot.refresh(service.images(), retry_delay)
                .map(move |event| Message::Image(request, id, event))
        }))
    }

    /// Whether any card image is still settling
    pub fn has_pending_images(&self, images: &ImageCache) -> bool {
        self.images.values().any(|slot| slot.is_pending(images))
    }

    pub fn view(&self, images: &ImageCache) -> Element<'_, Message> {
        let body: Element<'_, Message> = match self.state {
            ListState::Idle | ListState::Loading => text("Loading products...").size(18).into(),
            ListState::LoadingError => text("Could not load products. Please try again later.")
                .size(18)
                .into(),
            ListState::Populated if self.products.is_empty() => {
                text("No products available.").size(18).into()
            }
            ListState::Populated => {
                let cards = self
                    .products
                    .iter()
                    .map(|product| container(self.card(product, images)).padding(10).into())
                    .collect();
                Wrap::with_elements(cards).into()
            }
        };

        scrollable(container(body).padding(10).width(Length::Fill)).into()
    }

    fn card<'a>(&'a self, product: &'a Product, images: &ImageCache) -> Element<'a, Message> {
        let image: Element<'a, Message> = match self.images.get(&product.id) {
            Some(slot) => slot.view(images, CARD_IMAGE_HEIGHT),
            None => text("").into(),
        };

        let content = column![
            image,
            text(&product.name).size(20),
            text(product.display_price()).size(16),
            text(&product.description).size(14),
            button("View details")
                .on_press(Message::Selected(product.id))
                .padding(8),
        ]
        .spacing(8);

        container(content)
            .padding(12)
            .width(Length::Fixed(CARD_WIDTH))
            .style(container::rounded_box)
            .into()
    }
}

impl Default for ProductList {
    fn default() -> Self {
        Self::new()
    }
}
