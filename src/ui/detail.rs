use iced::widget::{button, column, container, scrollable, text};
use iced::{Element, Length, Task};
use tracing::{debug, error, warn};

use super::image_slot::{ImageEvent, ImageSlot};
use super::Action;
use crate::config::DETAIL_FALLBACK_IMAGE;
use crate::error::CatalogError;
use crate::images::ImageCache;
use crate::route::Route;
use crate::state::data::Product;
use crate::state::service::CatalogService;

const DETAIL_IMAGE_HEIGHT: f32 = 360.0;

/// Where the detail page is in its load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailState {
    Idle,
    Loading,
    Found,
    NotFound,
    InvalidId,
    LoadError,
}

impl DetailState {
    /// User-facing message for the error states
    pub fn error_message(self) -> Option<&'static str> {
        match self {
            DetailState::InvalidId => Some("Invalid product ID"),
            DetailState::NotFound => Some("Product not found"),
            DetailState::LoadError => Some("Error loading product details"),
            DetailState::Idle | DetailState::Loading | DetailState::Found => None,
        }
    }
}

/// Identifies one `open` call. Results tagged with an older request are
/// dropped.
pub type Request = u64;

#[derive(Debug, Clone)]
pub enum Message {
    /// The catalog answered the lookup
    Loaded(Request, Result<Option<Product>, CatalogError>),
    /// "Back to products" was pressed
    Back,
    Image(Request, ImageEvent),
}

/// A single product page
pub struct ProductDetail {
    state: DetailState,
    product: Option<Product>,
    image: Option<ImageSlot>,
    /// The request the page currently shows
    request: Request,
}

/// Parse the `id` route parameter the way a leading-digits integer parse
/// does: leading whitespace and an optional sign are skipped, then digits are
/// read up to the first non-digit. `"3abc"` is 3, `"2.5"` is 2. Only positive
/// integers in the product ID range are accepted.
pub fn parse_id(param: Option<&str>) -> Option<u32> {
    let param = param?.trim_start();
    let (negative, rest) = match param.as_bytes().first() {
        Some(b'-') => (true, &param[1..]),
        Some(b'+') => (false, &param[1..]),
        _ => (false, param),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let id: u32 = rest[..end].parse().ok()?;

    (!negative && id > 0).then_some(id)
}

impl ProductDetail {
    pub fn new() -> Self {
        Self {
            state: DetailState::Idle,
            product: None,
            image: None,
            request: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> DetailState {
        self.state
    }

    #[cfg(test)]
    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    /// Start resolving the product named by the `id` route parameter.
    ///
    /// An absent or malformed identifier settles immediately as
    /// `InvalidId` and never reaches the catalog.
    pub fn open(&mut self, param: Option<&str>, service: &CatalogService) -> Action<Message> {
        self.request += 1;
        self.state = DetailState::Loading;
        self.product = None;
        self.image = None;

        let Some(id) = parse_id(param) else {
            warn!("⚠️  Invalid product id: {:?}", param);
            self.state = DetailState::InvalidId;
            return Action::None;
        };

        let request = self.request;
        let service = service.clone();
        Action::Run(Task::perform(
            async move { service.get_product(id).await },
            move |result| Message::Loaded(request, result),
        ))
    }

    pub fn update(&mut self, message: Message, service: &CatalogService) -> Action<Message> {
        let request = self.request;
        match message {
            Message::Loaded(from, _) | Message::Image(from, _) if from != request => {
                debug!("Dropping result of superseded request {}", from);
                Action::None
            }
            Message::Loaded(_, Ok(Some(product))) => {
                let slot = ImageSlot::new(product.image(), DETAIL_FALLBACK_IMAGE);
                let task = slot
                    .load(service.images())
                    .map(move |event| Message::Image(request, event));
                self.image = Some(slot);
                self.product = Some(product);
                self.state = DetailState::Found;
                Action::Run(task)
            }
            Message::Loaded(_, Ok(None)) => {
                self.state = DetailState::NotFound;
                Action::None
            }
            Message::Loaded(_, Err(err)) => {
                error!("❌ Error fetching product details: {}", err);
                self.state = DetailState::LoadError;
                Action::None
            }
            Message::Back => Action::Navigate(Route::ProductList),
            Message::Image(_, event) => match self.image.as_mut() {
                Some(slot) => Action::Run(
                    slot.update(event, service.images(), service.latency().image_retry)
                        .map(move |event| Message::Image(request, event)),
                ),
                None => Action::None,
            },
        }
    }

    /// Re-check the product image against the cache
    pub fn refresh(&mut self, service: &CatalogService) -> Task<Message> {
        let request = self.request;
        match self.image.as_mut() {
            Some(slot) => slot
                .refresh(service.images(), service.latency().image_retry)
                .map(move |event| Message::Image(request, event)),
            None => Task::none(),
        }
    }

    pub fn has_pending_images(&self, images: &ImageCache) -> bool {
        self.image.as_ref().is_some_and(|slot| slot.is_pending(images))
    }

    pub fn view(&self, images: &ImageCache) -> Element<'_, Message> {
        let back = button("← Back to products").on_press(Message::Back).padding(8);

        let body: Element<'_, Message> = match (self.state, &self.product) {
            (DetailState::Found, Some(product)) => {
                let image: Element<'_, Message> = match &self.image {
                    Some(slot) => slot.view(images, DETAIL_IMAGE_HEIGHT),
                    None => text("").into(),
                };
                column![
                    back,
                    image,
                    text(&product.name).size(32),
                    text(product.display_price()).size(22),
                    text(&product.description).size(16),
                ]
                .spacing(16)
                .into()
            }
            (state, _) => match state.error_message() {
                Some(message) => column![text(message).size(20), back].spacing(16).into(),
                None => text("Loading product details...").size(18).into(),
            },
        };

        scrollable(
            container(body)
                .padding(30)
                .max_width(900.0)
                .width(Length::Fill),
        )
        .into()
    }
}

impl Default for ProductDetail {
    fn default() -> Self {
        Self::new()
    }
}
