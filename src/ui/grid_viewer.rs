use eframe::egui::{self, ColorImage, TextureHandle, Vec2};
use tracing::{error, info};

use crate::core::sample::{GridLayout, GridPresenter, Tile};

const TILE_SPACING: f32 = 12.0;
const LABEL_HEIGHT: f32 = 24.0;

/// Opens a native window showing the preview tiles in a labeled grid.
///
/// Blocks until the window is closed.
pub struct EguiGridPresenter {
    title: String,
    tile_size: f32,
}

impl EguiGridPresenter {
    pub fn new(title: impl Into<String>, tile_size: f32) -> Self {
        Self {
            title: title.into(),
            tile_size: tile_size.max(16.0),
        }
    }

    /// Window size needed to show the whole grid without scrolling.
    pub fn window_size(&self, layout: GridLayout) -> [f32; 2] {
        let cols = layout.cols.max(1) as f32;
        let rows = layout.rows.max(1) as f32;
        [
            cols * (self.tile_size + TILE_SPACING) + 2.0 * TILE_SPACING,
            rows * (self.tile_size + LABEL_HEIGHT + TILE_SPACING) + 2.0 * TILE_SPACING,
        ]
    }
}

impl GridPresenter for EguiGridPresenter {
    fn present(&mut self, tiles: Vec<Tile>, layout: GridLayout) {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(self.window_size(layout))
                .with_title(&self.title),
            ..Default::default()
        };

        let tile_size = self.tile_size;
        info!("Opening preview window with {} tiles", tiles.len());
        let result = eframe::run_native(
            &self.title,
            options,
            Box::new(move |cc| {
                Ok(Box::new(SampleGridApp::new(
                    &cc.egui_ctx,
                    tiles,
                    layout,
                    tile_size,
                )))
            }),
        );

        if let Err(e) = result {
            error!("Preview window failed: {}", e);
        }
    }
}

/// Scale that fits an image inside a square tile, upscaling small digits.
pub fn fit_to_tile(width: u32, height: u32, tile_size: f32) -> Vec2 {
    let largest = width.max(height).max(1) as f32;
    let scale = tile_size / largest;
    Vec2::new(width as f32 * scale, height as f32 * scale)
}

struct LoadedTile {
    label: String,
    name: String,
    texture: TextureHandle,
    size: Vec2,
}

struct SampleGridApp {
    tiles: Vec<LoadedTile>,
    layout: GridLayout,
}

impl SampleGridApp {
    fn new(ctx: &egui::Context, tiles: Vec<Tile>, layout: GridLayout, tile_size: f32) -> Self {
        let tiles = tiles
            .into_iter()
            .map(|tile| {
                let (width, height) = tile.image.dimensions();
                let color_image =
                    ColorImage::from_gray([width as usize, height as usize], tile.image.as_raw());
                let texture = ctx.load_texture(
                    tile.name.clone(),
                    color_image,
                    egui::TextureOptions::NEAREST,
                );
                LoadedTile {
                    label: tile.label.to_string(),
                    name: tile.name,
                    texture,
                    size: fit_to_tile(width, height, tile_size),
                }
            })
            .collect();

        Self { tiles, layout }
    }
}

impl eframe::App for SampleGridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                egui::Grid::new("sample_grid")
                    .spacing([TILE_SPACING, TILE_SPACING])
                    .show(ui, |ui| {
                        let cols = self.layout.cols.max(1);
                        for (index, tile) in self.tiles.iter().enumerate() {
                            ui.vertical_centered(|ui| {
                                ui.label(egui::RichText::new(&tile.label).strong().size(16.0));
                                ui.image((tile.texture.id(), tile.size))
                                    .on_hover_text(&tile.name);
                            });
                            if (index + 1) % cols == 0 {
                                ui.end_row();
                            }
                        }
                    });
            });
        });
    }
}
