use std::time::Instant;

use eframe::egui;

use rainpage::content::{Article, ArticleLoader};
use rainpage::prefs;
use rainpage::rain::{DropKind, RainConfig, RainField};
use rainpage::scene::{self, HeadScene};

/// Where the article document lives. An argument overrides the default.
const DEFAULT_ARTICLES_URL: &str = "http://127.0.0.1:8080/articles/articles.json";

const HEAD_PANEL_WIDTH: f32 = 280.0;
/// Pixel budget for the sphere-traced head texture.
const HEAD_RENDER_SIZE: usize = 224;

fn main() {
    env_logger::init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ARTICLES_URL.to_string());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rainpage",
        options,
        Box::new(move |cc| Ok(Box::new(RainPageApp::new(cc, url)))),
    )
    .expect("Failed to start Rainpage");
}

struct RainPageApp {
    articles: Vec<Article>,
    titles: Vec<String>,
    loader: ArticleLoader,
    /// Set once the fetch has settled, success or not. Rain waits for it.
    loaded: bool,
    dark_mode: bool,
    rain: RainField,
    clock: Instant,
    /// Next rain tick on the app clock, seconds. None until loading settles.
    next_tick: Option<f64>,
    head: HeadScene,
    head_texture: Option<egui::TextureHandle>,
    pointer_ndc: (f32, f32),
}

impl RainPageApp {
    fn new(cc: &eframe::CreationContext<'_>, url: String) -> Self {
        let dark_mode = prefs::read_dark_mode(cc.storage);
        cc.egui_ctx.set_visuals(prefs::visuals(dark_mode));

        let mut loader = ArticleLoader::new();
        loader.start(&url, cc.egui_ctx.clone());

        Self {
            articles: Vec::new(),
            titles: Vec::new(),
            loader,
            loaded: false,
            dark_mode,
            rain: RainField::new(RainConfig::default()),
            clock: Instant::now(),
            next_tick: None,
            head: scene::head_scene(),
            head_texture: None,
            pointer_ndc: (0.0, 0.0),
        }
    }

    fn now(&self) -> f64 {
        self.clock.elapsed().as_secs_f64()
    }

    /// Consume the fetch result once it lands. The rain clock starts
    /// whether the fetch succeeded or not; failures only leave the title
    /// pool and the article column empty.
    fn check_fetch(&mut self) {
        if self.loaded {
            return;
        }
        if let Some(result) = self.loader.poll() {
            match result {
                Ok(articles) => {
                    log::info!("loaded {} articles", articles.len());
                    self.titles = rainpage::content::titles(&articles);
                    self.articles = articles;
                }
                Err(e) => {
                    log::error!("error loading articles: {}", e);
                }
            }
            self.loaded = true;
            self.next_tick = Some(self.now());
        }
    }

    /// Run the fixed-period spawner against the rain surface.
    fn advance_rain(&mut self, now: f64, width: f32) {
        let Some(mut next) = self.next_tick else {
            return;
        };
        let period = self.rain.config().tick_period;

        // Resync after a long stall instead of replaying every missed tick
        if now - next > 1.0 {
            next = now;
        }
        while next <= now {
            self.rain.tick(next, width, &self.titles);
            next += period;
        }
        self.next_tick = Some(next);
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, frame: &mut eframe::Frame) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);
            ui.heading("Rainpage");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(8.0);
                if ui.checkbox(&mut self.dark_mode, "Dark mode").changed() {
                    ctx.set_visuals(prefs::visuals(self.dark_mode));
                    if let Some(storage) = frame.storage_mut() {
                        prefs::write_dark_mode(storage, self.dark_mode);
                    }
                }
                if self.loader.in_flight() {
                    ui.spinner();
                }
            });
        });
    }

    fn draw_articles(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(8.0);
                for article in &self.articles {
                    ui.heading(&article.title);
                    ui.label(
                        egui::RichText::new(format!("Published on {}", article.date))
                            .small()
                            .weak(),
                    );
                    ui.add_space(4.0);
                    ui.label(&article.content);
                    ui.add_space(12.0);
                    ui.separator();
                }
            });
    }

    /// Paint the drops over `rect` on a foreground layer so they fall
    /// across the article column.
    fn draw_rain(&self, ctx: &egui::Context, rect: egui::Rect, now: f64) {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("rain_overlay"),
        ));

        let (symbol_color, title_color) = if self.dark_mode {
            (
                egui::Color32::from_rgb(0, 230, 118),
                egui::Color32::from_rgb(170, 255, 200),
            )
        } else {
            (
                egui::Color32::from_rgb(0, 130, 60),
                egui::Color32::from_rgb(0, 90, 40),
            )
        };

        for drop in self.rain.drops() {
            let progress = drop.progress(now);
            let pos = egui::pos2(rect.left() + drop.x, rect.top() + progress * rect.height());
            let fade = 1.0 - progress * progress;

            match drop.kind {
                DropKind::Symbol => {
                    painter.text(
                        pos,
                        egui::Align2::CENTER_TOP,
                        &drop.content,
                        egui::FontId::monospace(15.0),
                        symbol_color.gamma_multiply(fade),
                    );
                }
                DropKind::Title => {
                    painter.text(
                        pos,
                        egui::Align2::CENTER_TOP,
                        &drop.content,
                        egui::FontId::proportional(17.0),
                        title_color.gamma_multiply(fade),
                    );
                }
            }
        }
    }

    fn draw_head(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.add_space(8.0);
        ui.label(egui::RichText::new("Always watching").small().weak());
        ui.add_space(4.0);

        let side = ui.available_width().min(HEAD_RENDER_SIZE as f32);
        let (rect, _response) =
            ui.allocate_exact_size(egui::vec2(side, side), egui::Sense::hover());

        if let Some(pos) = ctx.input(|i| i.pointer.hover_pos()) {
            self.pointer_ndc = scene::pointer_ndc(pos, rect);
        }
        let pose = scene::head_rotation(self.pointer_ndc.0, self.pointer_ndc.1);

        let pixels = scene::render_head(&self.head, HEAD_RENDER_SIZE, HEAD_RENDER_SIZE, pose);
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [HEAD_RENDER_SIZE, HEAD_RENDER_SIZE],
            &pixels,
        );
        match self.head_texture.as_mut() {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.head_texture =
                    Some(ctx.load_texture("head-scene", image, egui::TextureOptions::LINEAR));
            }
        }

        if let Some(texture) = &self.head_texture {
            let painter = ui.painter_at(rect);
            painter.image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
    }
}

impl eframe::App for RainPageApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.check_fetch();
        let now = self.now();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui, ctx, frame);
        });

        egui::SidePanel::right("head_panel")
            .resizable(false)
            .exact_width(HEAD_PANEL_WIDTH)
            .show(ctx, |ui| {
                self.draw_head(ui, ctx);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let rain_rect = ui.max_rect();
            self.advance_rain(now, rain_rect.width());
            self.draw_articles(ui);
            self.draw_rain(ctx, rain_rect, now);
        });

        // Keep the rain and the head moving
        ctx.request_repaint_after(std::time::Duration::from_millis(16));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        prefs::write_dark_mode(storage, self.dark_mode);
    }
}
