/*!
 * GUI application for countries_rs - browse, search and inspect countries
 *
 * A cross-platform desktop application providing:
 * - A country list with name search and region filter
 * - A detail page per country with clickable border countries
 * - A persisted dark-mode toggle
 *
 * Platform support: Windows, macOS, Linux
 */

use countries_rs::detail::{LOAD_FAILED, country_route, parse_route};
use countries_rs::models::NO_CAPITAL;
use countries_rs::prefs::FilePreferences;
use countries_rs::query::REGIONS;
use countries_rs::{
    Client, Config, CountrySource, DarkMode, DetailResolver, FetchState, QueryResolver, format,
};
use eframe::egui;
use std::sync::Arc;
use std::time::Duration;

const HOME_ROUTE: &str = "/";

fn main() -> Result<(), eframe::Error> {
    // Enable logging for better debugging
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("Where in the world?"),
        ..Default::default()
    };

    eframe::run_native(
        "Where in the world?",
        options,
        Box::new(|cc| Ok(Box::new(ExplorerApp::new(cc)))),
    )
}

/// Main application state
struct ExplorerApp {
    queries: QueryResolver,
    details: DetailResolver,
    dark_mode: DarkMode,

    // Input fields
    search_text: String,
    region: String,
    locale: String,

    // "/" or "/country/{encoded name}"
    route: String,
}

impl ExplorerApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = Config::default();
        let source: Arc<dyn CountrySource> = Arc::new(Client::new(&config));

        let ctx = cc.egui_ctx.clone();
        let dark_mode = DarkMode::init(FilePreferences::default_location()).with_observer(
            move |dark| {
                ctx.set_visuals(if dark {
                    egui::Visuals::dark()
                } else {
                    egui::Visuals::light()
                })
            },
        );

        let mut queries = QueryResolver::new(Arc::clone(&source), config.clone());
        queries.refresh();

        Self {
            queries,
            details: DetailResolver::new(source, config),
            dark_mode,
            search_text: String::new(),
            region: REGIONS[0].to_string(),
            locale: "en".to_string(),
            route: HOME_ROUTE.to_string(),
        }
    }

    fn open_country(&mut self, name: &str) {
        self.route = country_route(name);
    }

    fn header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Where in the world?");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let label = if self.dark_mode.is_enabled() {
                    "☀ Light Mode"
                } else {
                    "🌙 Dark Mode"
                };
                if ui.button(label).clicked() {
                    self.dark_mode.toggle();
                }
            });
        });
    }

    fn list_view(&mut self, ui: &mut egui::Ui) {
        let mut search_changed = false;
        let mut region_changed = false;

        ui.horizontal(|ui| {
            search_changed = ui
                .add(
                    egui::TextEdit::singleline(&mut self.search_text)
                        .hint_text("Search for a country..."),
                )
                .changed();

            egui::ComboBox::from_id_salt("filter-by-region")
                .selected_text(self.region.as_str())
                .show_ui(ui, |ui| {
                    for region in REGIONS {
                        if ui
                            .selectable_value(&mut self.region, region.to_string(), region)
                            .changed()
                        {
                            region_changed = true;
                        }
                    }
                });
        });
        ui.add_space(10.0);

        if search_changed {
            self.queries.set_search_text(self.search_text.clone());
        } else if region_changed {
            self.queries.set_region(self.region.clone());
        }

        let mut navigate_to = None;
        match self.queries.state() {
            FetchState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading...");
                });
            }
            FetchState::Failed(msg) => {
                ui.colored_label(egui::Color32::RED, msg);
            }
            FetchState::Ready(list) if list.is_empty() => {
                ui.label("No countries match your search.");
            }
            FetchState::Ready(list) => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for c in list {
                        ui.group(|ui| {
                            ui.set_width(ui.available_width());
                            if ui
                                .link(egui::RichText::new(&c.common_name).strong().size(16.0))
                                .clicked()
                            {
                                navigate_to = Some(c.common_name.clone());
                            }
                            ui.label(format!(
                                "Population: {}",
                                format::population(c.population, &self.locale)
                            ));
                            ui.label(format!("Region: {}", c.region));
                            ui.label(format!(
                                "Capital: {}",
                                c.capital.as_deref().unwrap_or(NO_CAPITAL)
                            ));
                        });
                    }
                });
            }
        }

        if let Some(name) = navigate_to {
            self.open_country(&name);
        }
    }

    fn detail_view(&mut self, ui: &mut egui::Ui) {
        if ui.button("← Back").clicked() {
            self.route = HOME_ROUTE.to_string();
            return;
        }
        ui.add_space(10.0);

        let mut navigate_to = None;
        let mut retry = false;
        match self.details.state() {
            FetchState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading...");
                });
            }
            FetchState::Failed(msg) => {
                ui.colored_label(egui::Color32::RED, msg);
                if msg != LOAD_FAILED {
                    retry = ui.button("Retry").clicked();
                }
            }
            FetchState::Ready(view) => {
                let d = &view.detail;
                let shown = d.display();
                ui.heading(&d.common_name);
                if !d.flag_url.is_empty() {
                    ui.hyperlink_to("Flag", &d.flag_url);
                }
                ui.add_space(8.0);

                egui::Grid::new("country-facts")
                    .num_columns(2)
                    .spacing([24.0, 6.0])
                    .show(ui, |ui| {
                        let row = |ui: &mut egui::Ui, label: &str, value: &str| {
                            ui.strong(label);
                            ui.label(value);
                            ui.end_row();
                        };
                        row(ui, "Native Name:", &shown.native_name);
                        row(ui, "Capital:", &shown.capital);
                        row(
                            ui,
                            "Population:",
                            &format::population(d.population, &self.locale),
                        );
                        row(ui, "Region:", &shown.region);
                        if let Some(sub) = &shown.subregion {
                            row(ui, "Subregion:", sub);
                        }
                        row(ui, "Top Level Domain:", &shown.top_level_domain);
                        row(ui, "Currency:", &shown.currencies);
                        row(ui, "Languages:", &shown.languages);
                    });

                ui.add_space(12.0);
                ui.strong("Border Countries:");
                ui.horizontal_wrapped(|ui| {
                    if view.borders.is_empty() {
                        ui.label("No border countries");
                    }
                    for border in &view.borders {
                        if ui.button(&border.common_name).clicked() {
                            navigate_to = Some(border.common_name.clone());
                        }
                    }
                });
            }
        }

        if retry {
            self.details.reload();
        }
        if let Some(name) = navigate_to {
            self.open_country(&name);
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed background fetches
        self.queries.poll();
        self.details.poll();

        let detail_name = parse_route(&self.route);
        if let Some(name) = &detail_name {
            self.details.navigate(name);
        }

        // Keep repainting while a fetch is in flight (spinner + result pickup)
        let loading = match detail_name {
            Some(_) => self.details.state().is_loading(),
            None => self.queries.state().is_loading(),
        };
        if loading {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            self.header(ui);
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if detail_name.is_some() {
                self.detail_view(ui);
            } else {
                self.list_view(ui);
            }
        });
    }
}
