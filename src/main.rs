use iced::widget::{button, column, container, horizontal_space, row, text};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod config;
mod error;
mod images;
mod logging;
mod platform;
mod route;
mod state;
mod ui;

use config::AppConfig;
use images::{HttpImageLoader, ImageCache};
use route::Route;
use state::catalog::Catalog;
use state::preferences::FileStore;
use state::service::CatalogService;
use state::theme::ThemeController;
use ui::detail::{self, ProductDetail};
use ui::list::{self, ProductList};
use ui::Action;

/// How often views re-check images that are still loading
const IMAGE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Main application state
struct CatalogApp {
    /// Catalog access with image preloading
    service: CatalogService,
    /// Light/dark mode and its persisted flag
    theme: ThemeController,
    /// Where the user currently is
    route: Route,
    list: ProductList,
    detail: ProductDetail,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    List(list::Message),
    Detail(detail::Message),
    /// User clicked the theme button
    ToggleTheme,
    /// Periodic re-check of images still loading
    Tick,
}

impl CatalogApp {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load();

        let images = ImageCache::new(Arc::new(HttpImageLoader::new()), config.platform);
        let catalog = Catalog::seeded();
        let service = CatalogService::new(catalog, images, config.latency);

        let mut theme = ThemeController::new(
            config.platform,
            Arc::new(FileStore::open(&config.preferences_path)),
        );
        theme.init();

        info!("🛍️  Product catalog initialized with {} products", catalog.len());

        let mut app = CatalogApp {
            service,
            theme,
            route: Route::ProductList,
            list: ProductList::new(),
            detail: ProductDetail::new(),
        };

        // Warm-up spawns onto the runtime, so it has to run inside a task
        let service = app.service.clone();
        let warm_up = Task::perform(async move { service.warm_up() }, |_| Message::Tick);
        let open = app.navigate(Route::parse("/"));

        (app, Task::batch([warm_up, open]))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::List(message) => {
                let action = self.list.update(message, &self.service);
                self.perform(action, Message::List)
            }
            Message::Detail(message) => {
                let action = self.detail.update(message, &self.service);
                self.perform(action, Message::Detail)
            }
            Message::ToggleTheme => {
                let mode = self.theme.toggle();
                info!("🎨 Theme switched to {:?}", mode);
                Task::none()
            }
            Message::Tick => match self.route {
                Route::ProductList => self.list.refresh(&self.service).map(Message::List),
                Route::ProductDetail { .. } => {
                    self.detail.refresh(&self.service).map(Message::Detail)
                }
            },
        }
    }

    /// Switch pages. Every visit reloads the page's data.
    fn navigate(&mut self, route: Route) -> Task<Message> {
        info!("🧭 Navigating to {}", route.path());
        self.route = route.clone();

        match route {
            Route::ProductList => self.list.load(&self.service).map(Message::List),
            Route::ProductDetail { id } => {
                let action = self.detail.open(Some(id.as_str()), &self.service);
                self.perform(action, Message::Detail)
            }
        }
    }

    /// Run what a view asked for
    fn perform<M>(&mut self, action: Action<M>, wrap: fn(M) -> Message) -> Task<Message>
    where
        M: Send + 'static,
    {
        match action {
            Action::None => Task::none(),
            Action::Run(task) => task.map(wrap),
            Action::Navigate(route) => self.navigate(route),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let images = self.service.images();

        let theme_label = if self.theme.mode().is_dark() {
            "☀️ Light mode"
        } else {
            "🌙 Dark mode"
        };

        let header = row![
            text("Product Catalog").size(28),
            text(self.route.path()).size(14),
            horizontal_space(),
            button(theme_label).on_press(Message::ToggleTheme).padding(8),
        ]
        .spacing(16)
        .align_y(Alignment::Center);

        let page = match self.route {
            Route::ProductList => self.list.view(images).map(Message::List),
            Route::ProductDetail { .. } => self.detail.view(images).map(Message::Detail),
        };

        let content = column![header, page].spacing(20).padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Keep polling while the current page still has images on the way
    fn subscription(&self) -> Subscription<Message> {
        let images = self.service.images();
        let pending = match self.route {
            Route::ProductList => self.list.has_pending_images(images),
            Route::ProductDetail { .. } => self.detail.has_pending_images(images),
        };

        if pending {
            iced::time::every(IMAGE_POLL_INTERVAL).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        self.theme.mode().iced_theme()
    }
}

fn main() -> iced::Result {
    logging::init_logging();

    iced::application(
        "Product Catalog",
        CatalogApp::update,
        CatalogApp::view,
    )
    .theme(CatalogApp::theme)
    .subscription(CatalogApp::subscription)
    .centered()
    .run_with(CatalogApp::new)
}
